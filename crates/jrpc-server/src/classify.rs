//! Single-versus-batch classification of a raw payload.

use serde_json::value::RawValue;

use crate::error::ErrorObject;
use crate::request::decode_error;

/// The shape of an inbound payload.
#[derive(Debug)]
pub enum Payload<'a> {
    /// One request, passed on undecoded.
    Single(&'a [u8]),
    /// Batch elements, each still undecoded.
    Batch(Vec<Box<RawValue>>),
    /// Exactly the two bytes `[]`: answered with a single Invalid Request.
    /// Any other array with no elements is an ordinary batch that yields
    /// nothing.
    EmptyBatch,
    /// The batch array itself could not be decoded.
    Malformed(ErrorObject),
}

/// Classify a payload by its first and last bytes.
///
/// No whitespace is trimmed: only a payload that literally starts with `[`
/// and ends with `]` is batch-shaped. An empty payload is a single request
/// (which then fails to parse).
pub fn classify(payload: &[u8]) -> Payload<'_> {
    let batch_shaped = matches!(
        (payload.first(), payload.last()),
        (Some(b'['), Some(b']'))
    ) && payload.len() >= 2;
    if !batch_shaped {
        return Payload::Single(payload);
    }
    if payload == b"[]" {
        return Payload::EmptyBatch;
    }
    match serde_json::from_slice::<Vec<Box<RawValue>>>(payload) {
        Ok(elements) => Payload::Batch(elements),
        Err(err) => Payload::Malformed(decode_error(err)),
    }
}
