use std::fmt;

/// Name of a declared parameter or return type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeInfo {
    name: &'static str,
}

impl TypeInfo {
    pub fn of<T: ?Sized>() -> Self {
        Self {
            name: std::any::type_name::<T>(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Recorded shape of one registered method.
///
/// `params` lists the positional parameters only; a context parameter is
/// reported through `takes_context` and never counted. `returns` includes the
/// trailing error type when `last_return_is_error` is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    name: String,
    params: Vec<TypeInfo>,
    returns: Vec<TypeInfo>,
    takes_context: bool,
    last_return_is_error: bool,
}

impl Signature {
    pub fn new(
        name: impl Into<String>,
        params: Vec<TypeInfo>,
        returns: Vec<TypeInfo>,
        takes_context: bool,
        last_return_is_error: bool,
    ) -> Self {
        Self {
            name: name.into(),
            params,
            returns,
            takes_context,
            last_return_is_error,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[TypeInfo] {
        &self.params
    }

    /// Number of positional parameters a request must supply.
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    pub fn returns(&self) -> &[TypeInfo] {
        &self.returns
    }

    pub fn takes_context(&self) -> bool {
        self.takes_context
    }

    pub fn last_return_is_error(&self) -> bool {
        self.last_return_is_error
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        let mut first = true;
        if self.takes_context {
            f.write_str("ctx")?;
            first = false;
        }
        for param in &self.params {
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{}", param)?;
            first = false;
        }
        f.write_str(")")?;
        match self.returns.as_slice() {
            [] => Ok(()),
            [single] => write!(f, " -> {}", single),
            many => {
                f.write_str(" -> (")?;
                for (i, ret) in many.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", ret)?;
                }
                f.write_str(")")
            }
        }
    }
}
