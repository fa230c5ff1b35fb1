use thiserror::Error;

use crate::schema::Kind;

/// Specific kinds of errors that can occur while encoding or decoding a
/// record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    #[error("field `{field}` of kind {kind} has no codec")]
    UnsupportedType { field: &'static str, kind: Kind },

    #[error("variable-length field `{field}` has no size annotation")]
    MissingSizeAnnotation { field: &'static str },

    #[error("size reference `{reference}` of field `{field}` does not name a decoded field")]
    UnresolvedSizeReference {
        field: &'static str,
        reference: &'static str,
    },

    #[error("size reference `{reference}` of field `{field}` does not hold a byte count")]
    InvalidSizeValue {
        field: &'static str,
        reference: &'static str,
    },

    #[error("length {length} cannot be stored in field `{field}` of kind {kind}")]
    UnsupportedCast {
        field: &'static str,
        kind: Kind,
        length: usize,
    },

    #[error("input ended while reading {needed} bytes for field `{field}`")]
    TruncatedInput { field: &'static str, needed: usize },

    #[error("sequence `{field}` ends in a partial element of {bytes_remaining} bytes")]
    MalformedSequence {
        field: &'static str,
        bytes_remaining: usize,
    },

    #[error("field `{field}` encodes to {actual} bytes but declares a size of {expected}")]
    SizeMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("extra data after decoding `{field}`: {bytes_remaining} bytes remaining")]
    ExtraData {
        field: &'static str,
        bytes_remaining: usize,
    },

    #[error("no field at position {index} of the record being decoded")]
    UnknownField { index: usize },

    #[error("invalid UTF-8 in string field `{field}`")]
    InvalidUtf8 { field: &'static str },

    #[error("I/O error while reading field `{field}`: {kind}")]
    Io {
        field: &'static str,
        kind: std::io::ErrorKind,
    },
}

/// Error type returned when marshalling or unmarshalling a record fails.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("bytestruct error: {kind}")]
pub struct Error {
    /// The specific kind of error that occurred.
    kind: ErrorKind,
}

impl Error {
    /// Creates a new Error with the given kind.
    pub const fn new(kind: ErrorKind) -> Self {
        Self { kind }
    }

    /// Returns the specific kind of error that occurred.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub(crate) fn read_failure(field: &'static str, needed: usize, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::UnexpectedEof => {
                Self::new(ErrorKind::TruncatedInput { field, needed })
            }
            kind => Self::new(ErrorKind::Io { field, kind }),
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

/// Result type for codec operations.
pub type Result<T> = std::result::Result<T, Error>;
