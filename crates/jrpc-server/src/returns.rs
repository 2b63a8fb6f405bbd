//! Conversion of a method's return value into response values.

use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

use crate::error::MethodError;
use crate::signature::TypeInfo;

/// Values produced by one invocation, error return already split off.
pub type Outcome = Result<Vec<Value>, MethodError>;

/// Return type of a registered method.
///
/// `()` yields no values, a single serializable value yields one, a tuple
/// yields one value per element, and `Result<R, E>` adds a trailing
/// error-like return to whatever `R` yields. Wrap any other serializable type
/// in [`Json`].
pub trait IntoReturns: Send + 'static {
    fn return_types() -> Vec<TypeInfo>;

    fn last_is_error() -> bool {
        false
    }

    fn into_outcome(self) -> Outcome;
}

fn serialize<T: Serialize>(value: &T) -> Result<Value, MethodError> {
    serde_json::to_value(value).map_err(MethodError::internal)
}

impl IntoReturns for () {
    fn return_types() -> Vec<TypeInfo> {
        Vec::new()
    }

    fn into_outcome(self) -> Outcome {
        Ok(Vec::new())
    }
}

/// Wrapper that makes any `Serialize` type a single return value.
///
/// ```rust
/// use jrpc_server::{IntoReturns, Json};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Stats { count: u32 }
///
/// let values = Json(Stats { count: 3 }).into_outcome().unwrap();
/// assert_eq!(values, vec![serde_json::json!({"count": 3})]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Json<T>(pub T);

impl<T> IntoReturns for Json<T>
where
    T: Serialize + Send + 'static,
{
    fn return_types() -> Vec<TypeInfo> {
        vec![TypeInfo::of::<T>()]
    }

    fn into_outcome(self) -> Outcome {
        Ok(vec![serialize(&self.0)?])
    }
}

macro_rules! impl_single_return {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IntoReturns for $ty {
                fn return_types() -> Vec<TypeInfo> {
                    vec![TypeInfo::of::<$ty>()]
                }

                fn into_outcome(self) -> Outcome {
                    Ok(vec![serialize(&self)?])
                }
            }
        )*
    };
}

impl_single_return!(
    bool,
    char,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    f32,
    f64,
    String,
    &'static str,
    Value,
);

macro_rules! impl_generic_single_return {
    ($($ty:ident<$($param:ident),+>),* $(,)?) => {
        $(
            impl<$($param,)+> IntoReturns for $ty<$($param,)+>
            where
                $ty<$($param,)+>: Serialize + Send + 'static,
            {
                fn return_types() -> Vec<TypeInfo> {
                    vec![TypeInfo::of::<Self>()]
                }

                fn into_outcome(self) -> Outcome {
                    Ok(vec![serialize(&self)?])
                }
            }
        )*
    };
}

impl_generic_single_return!(Vec<T>, Option<T>, HashMap<K, V>, BTreeMap<K, V>);

macro_rules! impl_tuple_returns {
    ($($ty:ident),+) => {
        impl<$($ty,)+> IntoReturns for ($($ty,)+)
        where
            $($ty: Serialize + Send + 'static,)+
        {
            fn return_types() -> Vec<TypeInfo> {
                vec![$(TypeInfo::of::<$ty>()),+]
            }

            #[allow(non_snake_case)]
            fn into_outcome(self) -> Outcome {
                let ($($ty,)+) = self;
                Ok(vec![$(serialize(&$ty)?),+])
            }
        }
    };
}

impl_tuple_returns!(A, B);
impl_tuple_returns!(A, B, C);
impl_tuple_returns!(A, B, C, D);
impl_tuple_returns!(A, B, C, D, E);
impl_tuple_returns!(A, B, C, D, E, F);

impl<R, E> IntoReturns for Result<R, E>
where
    R: IntoReturns,
    E: Into<MethodError> + Send + 'static,
{
    fn return_types() -> Vec<TypeInfo> {
        let mut types = R::return_types();
        types.push(TypeInfo::of::<E>());
        types
    }

    fn last_is_error() -> bool {
        true
    }

    fn into_outcome(self) -> Outcome {
        match self {
            Ok(returns) => returns.into_outcome(),
            Err(err) => Err(err.into()),
        }
    }
}
