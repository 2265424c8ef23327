//! NBT error types.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum NbtError {
    #[error("unexpected end of input at position {position}")]
    UnexpectedEof { position: usize },

    #[error("expected '{expected}' at position {position}")]
    Expected { expected: char, position: usize },

    #[error("expected key at position {position}")]
    ExpectedKey { position: usize },

    #[error("expected value at position {position}")]
    ExpectedValue { position: usize },

    #[error("unexpected trailing data at position {position}")]
    TrailingData { position: usize },

    #[error("invalid escape sequence '\\{escape}' at position {position}")]
    InvalidEscape { escape: char, position: usize },

    #[error("invalid array type '{0}'")]
    InvalidArrayType(char),

    #[error("can't insert {found} into list of {expected}")]
    MixedList {
        found: &'static str,
        expected: &'static str,
    },

    #[error("can't insert {found} into {array}")]
    MixedArray {
        found: &'static str,
        array: &'static str,
    },

    #[error("nesting too deep (limit: {limit})")]
    NestingTooDeep { limit: usize },
}
