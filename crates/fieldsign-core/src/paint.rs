//! Small helpers for building content-stream operations

use crate::config::Rgb;
use crate::error::EmbedFailure;
use lopdf::content::{Content, Operation};
use lopdf::Object;

pub(crate) fn real(value: f64) -> Object {
    Object::Real(value as f32)
}

pub(crate) fn op(operator: &str, operands: Vec<Object>) -> Operation {
    Operation::new(operator, operands)
}

pub(crate) fn fill_color(color: Rgb) -> Operation {
    op("rg", color.iter().map(|&c| real(f64::from(c))).collect())
}

pub(crate) fn stroke_color(color: Rgb) -> Operation {
    op("RG", color.iter().map(|&c| real(f64::from(c))).collect())
}

/// Serialize operations, wrapped in their own q/Q pair
pub(crate) fn encode_isolated(operations: Vec<Operation>) -> Result<Vec<u8>, EmbedFailure> {
    let mut wrapped = Vec::with_capacity(operations.len() + 2);
    wrapped.push(op("q", vec![]));
    wrapped.extend(operations);
    wrapped.push(op("Q", vec![]));

    Content {
        operations: wrapped,
    }
    .encode()
    .map_err(|e| EmbedFailure::Content(e.to_string()))
}
