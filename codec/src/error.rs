//! Error types for codec operations

use crate::{escape, Kind};
use thiserror::Error;

/// Boxed error returned by user hooks and carried as the cause of scalar parse failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error type for codec operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid form data: {0}")]
    InvalidPayload(#[from] escape::Error),
    #[error("unsupported map key type: {0}")]
    UnsupportedKeyType(&'static str),
    #[error("unsupported type: {0}")]
    UnsupportedType(&'static str),
    #[error("cannot parse {literal:?} as {kind}")]
    ParseScalar {
        kind: Kind,
        literal: String,
        #[source]
        cause: BoxError,
    },
    #[error("failed to set field {field}")]
    FieldAssign {
        field: String,
        #[source]
        cause: Box<Error>,
    },
    #[error("failed to set element {index}")]
    Element {
        index: usize,
        #[source]
        cause: Box<Error>,
    },
    #[error("failed to set map value for key {key}")]
    Entry {
        key: String,
        #[source]
        cause: Box<Error>,
    },
    #[error("hook failed")]
    HookFailure(#[source] BoxError),
    #[error("failed to read body")]
    ReadFailure(#[source] std::io::Error),
    #[error("failed to write body")]
    WriteFailure(#[source] std::io::Error),
    #[error("length exceeded: {0} > {1}")]
    LengthExceeded(usize, usize), // found, max
    #[error("too many values: {0} > {1}")]
    TooManyValues(usize, usize), // found, max
}

impl Error {
    /// Attributes `cause` to the record field `field`.
    pub(crate) fn field(field: &str, cause: Error) -> Self {
        Self::FieldAssign {
            field: field.to_string(),
            cause: Box::new(cause),
        }
    }

    /// Attributes `cause` to the sequence element at `index`.
    pub(crate) fn element(index: usize, cause: Error) -> Self {
        Self::Element {
            index,
            cause: Box::new(cause),
        }
    }

    /// Attributes `cause` to the map entry under `key`.
    pub(crate) fn entry(key: &str, cause: Error) -> Self {
        Self::Entry {
            key: key.to_string(),
            cause: Box::new(cause),
        }
    }

    /// Returns the innermost error, skipping field, element and entry context.
    pub fn root(&self) -> &Error {
        match self {
            Self::FieldAssign { cause, .. }
            | Self::Element { cause, .. }
            | Self::Entry { cause, .. } => cause.root(),
            _ => self,
        }
    }
}
