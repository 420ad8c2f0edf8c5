//! Error types shared by the library and the CLI.
use thiserror::Error;

use crate::diagnostic;
use crate::matcher::Mismatch;

/// A descriptor was declared with an argument of the wrong shape. This is a
/// mistake in the declaration itself and is reported when the descriptor is
/// built, never at match time.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DescriptorError {
    #[error("unknown primitive type `{0}`")]
    UnknownPrimitive(String),

    #[error("{at}: one-of literals must be strings, found {found}")]
    NonStringLiteral { at: String, found: String },

    #[error("{at}: unknown class `{name}`")]
    UnknownClass { at: String, name: String },

    #[error("{at}: {reason}")]
    Malformed { at: String, reason: String },
}

/// A runtime value or argument set did not satisfy its declaration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{}", diagnostic::mismatch_message(.owner, .property, .mismatch))]
    Mismatch {
        owner: String,
        property: String,
        mismatch: Mismatch,
    },

    #[error("{}", diagnostic::unexpected_message(.owner, .names))]
    UnexpectedArguments { owner: String, names: Vec<String> },

    #[error("{}", diagnostic::missing_message(.owner, .names))]
    MissingArguments { owner: String, names: Vec<String> },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file ({path}): {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config ({path}): {source}")]
    Parse {
        path: String,
        #[source]
        source: crate::path_de::PathedError,
    },

    #[error("validation config was already installed")]
    AlreadyInstalled,
}
