use thiserror::Error;

use crate::introspect::TypeRef;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Unknown member category in token '{0}'")]
    UnknownCategory(String),

    #[error("Malformed token '{token}': {reason}")]
    MalformedToken { token: String, reason: &'static str },

    #[error("Token '{token}' matches no live member of {type_name}")]
    Unresolved { token: String, type_name: String },

    #[error("Reference target is no longer available")]
    TargetMissing,

    #[error("Reference target is already borrowed")]
    TargetBusy,

    #[error("No member is resolved for this reference")]
    NotResolved,

    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: TypeRef, found: String },

    #[error("Missing value to write into '{0}'")]
    MissingArgument(String),

    #[error("'{name}' takes {expected} argument(s), got {found}")]
    ArgumentCount {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("'{0}' is read-only")]
    ReadOnly(String),

    #[error("'{0}' has no accessor bound to it")]
    NotBound(String),

    #[error("Invocation of '{name}' failed: {message}")]
    Invocation { name: String, message: String },

    #[error("'{name}' panicked: {message}")]
    Panicked { name: String, message: String },

    #[error("{what} '{name}' {defect}")]
    InvalidName {
        what: &'static str,
        name: String,
        defect: &'static str,
    },

    #[error("Unknown scope flag '{0}'")]
    UnknownScopeFlag(String),

    #[error("Invalid manifest: {0}")]
    InvalidManifest(String),

    #[error("Manifest error: {0}")]
    Manifest(#[from] serde_json::Error),
}

impl Error {
    /// Failure raised by the body of a registered accessor or callable.
    pub fn invocation(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Invocation {
            name: name.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
