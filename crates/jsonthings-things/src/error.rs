//! Thing parsing, building and loading errors.

use std::path::PathBuf;

use jsonthings_nbt::NbtError;
use thiserror::Error;

use crate::key::ResourceKey;

/// An error attributable to one document or one builder.
#[derive(Debug, Error)]
pub enum ThingError {
    #[error("missing required field '{field}'")]
    MissingField { field: String },

    #[error("'{field}' must be {expected}")]
    WrongType {
        field: String,
        expected: &'static str,
    },

    #[error("'{field}' must be between {min} and {max} (both inclusive), got {value}")]
    OutOfRange {
        field: String,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("'{field}' must be one of: {}; got '{value}'", .allowed.join(", "))]
    InvalidEnum {
        field: String,
        value: String,
        allowed: &'static [&'static str],
    },

    #[error("invalid '{field}': {reason}")]
    Invalid { field: String, reason: String },

    #[error("invalid resource key '{0}'")]
    InvalidKey(String),

    #[error("there is no known {kind} with name {name}")]
    NotFound { kind: String, name: ResourceKey },

    /// A name from a closed, non-registry set (such as color handlers).
    #[error("there is no known {kind} named '{name}'")]
    UnknownName { kind: String, name: String },

    #[error("{kind} {name} is already registered")]
    Duplicate { kind: String, name: ResourceKey },

    #[error("failed to parse NBT data")]
    Nbt(#[from] NbtError),

    #[error(
        "error building {display_name} {key}{}",
        .contained_in.map(|c| format!(" (contained in {c})")).unwrap_or_default()
    )]
    Build {
        display_name: &'static str,
        key: ResourceKey,
        contained_in: Option<&'static str>,
        #[source]
        source: Box<ThingError>,
    },
}

impl ThingError {
    pub(crate) fn missing(field: &str) -> Self {
        ThingError::MissingField {
            field: field.to_string(),
        }
    }

    pub(crate) fn wrong_type(field: &str, expected: &'static str) -> Self {
        ThingError::WrongType {
            field: field.to_string(),
            expected,
        }
    }

    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        ThingError::Invalid {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn not_found(kind: &str, name: &ResourceKey) -> Self {
        ThingError::NotFound {
            kind: kind.to_string(),
            name: name.clone(),
        }
    }

    pub(crate) fn unknown_name(kind: &str, name: &str) -> Self {
        ThingError::UnknownName {
            kind: kind.to_string(),
            name: name.to_string(),
        }
    }

    /// Walks `Build` wrappers down to the underlying cause.
    pub fn root_cause(&self) -> &ThingError {
        match self {
            ThingError::Build { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// A fatal failure of a whole load. One bad document fails the batch.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("error while parsing {thing_type} from {key}")]
    Parse {
        thing_type: String,
        key: ResourceKey,
        #[source]
        source: ThingError,
    },

    #[error("error while finishing {thing_type}")]
    Finish {
        thing_type: String,
        #[source]
        source: ThingError,
    },

    #[error("a parser for '{0}' is already registered")]
    DuplicateParser(String),

    #[error("no parser registered for '{0}'")]
    UnknownThingType(String),

    #[error("thing parsers were already finished")]
    AlreadyFinished,

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid pack metadata in {}: {reason}", .path.display())]
    PackMeta { path: PathBuf, reason: String },

    #[error("thing loader task failed: {0}")]
    Task(String),
}

impl LoadError {
    /// The document-level error behind a parse or finish failure, if any.
    pub fn thing_error(&self) -> Option<&ThingError> {
        match self {
            LoadError::Parse { source, .. } | LoadError::Finish { source, .. } => Some(source),
            _ => None,
        }
    }
}
