//! Positional parameter binding.
//!
//! [`positional`] performs the shape and arity check against a method's
//! signature, [`FromParams`] decodes each element into its declared type.

use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use thiserror::Error;

use crate::error::ErrorObject;
use crate::signature::TypeInfo;

/// Why a request's `params` could not be bound to a method.
#[derive(Debug, Error)]
pub enum BindError {
    #[error("params must be a positional array")]
    NotAnArray,

    #[error("expected {expected} params, received {received}")]
    Arity { expected: usize, received: usize },

    #[error("param {index} must be {expected} ({source})")]
    Decode {
        index: usize,
        expected: TypeInfo,
        #[source]
        source: serde_json::Error,
    },
}

impl BindError {
    pub fn into_error_object(self) -> ErrorObject {
        let data = match &self {
            BindError::NotAnArray => None,
            BindError::Arity { expected, received } => {
                Some(json!({ "expected": expected, "received": received }))
            }
            BindError::Decode {
                index, expected, ..
            } => Some(json!({ "index": index, "expected": expected.name() })),
        };
        ErrorObject::invalid_params(data).with_cause(self)
    }
}

/// Check that `params` is an array of exactly `arity` elements and unwrap it.
///
/// With `allow_omitted`, an absent or `null` params member counts as `[]`.
pub fn positional(
    params: Option<Value>,
    arity: usize,
    allow_omitted: bool,
) -> Result<Vec<Value>, BindError> {
    let params = match params {
        Some(Value::Array(params)) => params,
        None | Some(Value::Null) if allow_omitted => Vec::new(),
        _ => return Err(BindError::NotAnArray),
    };
    if params.len() != arity {
        return Err(BindError::Arity {
            expected: arity,
            received: params.len(),
        });
    }
    Ok(params)
}

fn decode<T: DeserializeOwned>(index: usize, value: Value) -> Result<T, BindError> {
    serde_json::from_value(value).map_err(|source| BindError::Decode {
        index,
        expected: TypeInfo::of::<T>(),
        source,
    })
}

/// A tuple of positional parameter types.
///
/// Implemented for tuples of up to eight `DeserializeOwned` elements.
pub trait FromParams: Sized + Send + 'static {
    fn param_types() -> Vec<TypeInfo>;

    /// Decode each element in order; the first failure wins.
    fn from_params(params: Vec<Value>) -> Result<Self, BindError>;
}

macro_rules! impl_from_params {
    ($($index:tt $ty:ident),*) => {
        impl<$($ty,)*> FromParams for ($($ty,)*)
        where
            $($ty: DeserializeOwned + Send + 'static,)*
        {
            fn param_types() -> Vec<TypeInfo> {
                vec![$(TypeInfo::of::<$ty>()),*]
            }

            #[allow(unused_mut, unused_variables)]
            fn from_params(params: Vec<Value>) -> Result<Self, BindError> {
                let expected = Self::param_types().len();
                if params.len() != expected {
                    return Err(BindError::Arity {
                        expected,
                        received: params.len(),
                    });
                }
                let mut params = params.into_iter();
                Ok(($(decode::<$ty>($index, params.next().unwrap_or(Value::Null))?,)*))
            }
        }
    };
}

impl_from_params!();
impl_from_params!(0 A);
impl_from_params!(0 A, 1 B);
impl_from_params!(0 A, 1 B, 2 C);
impl_from_params!(0 A, 1 B, 2 C, 3 D);
impl_from_params!(0 A, 1 B, 2 C, 3 D, 4 E);
impl_from_params!(0 A, 1 B, 2 C, 3 D, 4 E, 5 F);
impl_from_params!(0 A, 1 B, 2 C, 3 D, 4 E, 5 F, 6 G);
impl_from_params!(0 A, 1 B, 2 C, 3 D, 4 E, 5 F, 6 G, 7 H);
