use crate::{ErrorKind, FinsightError};
use serde::Serialize;

/// Serializable projection of a [`FinsightError`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorRecord {
    /// Which class of failure occurred
    pub kind: ErrorKind,

    /// Human-readable message embedding the offending input and cause
    pub message: String,
}

impl From<&FinsightError> for ErrorRecord {
    fn from(err: &FinsightError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

impl From<FinsightError> for ErrorRecord {
    fn from(err: FinsightError) -> Self {
        Self::from(&err)
    }
}

/// Tagged success-or-error result
///
/// Serializes as `{"status":"success","data":...}` or
/// `{"status":"error","error":{"kind":...,"message":...}}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome<T> {
    Success { data: T },
    Error { error: ErrorRecord },
}

impl<T> Outcome<T> {
    pub fn success(data: T) -> Self {
        Self::Success { data }
    }

    pub fn failure(err: &FinsightError) -> Self {
        Self::Error {
            error: ErrorRecord::from(err),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Returns the success value, if any
    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Success { data } => Some(data),
            Self::Error { .. } => None,
        }
    }

    /// Returns the error record, if any
    pub fn error(&self) -> Option<&ErrorRecord> {
        match self {
            Self::Success { .. } => None,
            Self::Error { error } => Some(error),
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Outcome<U> {
        match self {
            Self::Success { data } => Outcome::Success { data: f(data) },
            Self::Error { error } => Outcome::Error { error },
        }
    }
}

impl<T> From<Result<T, FinsightError>> for Outcome<T> {
    fn from(result: Result<T, FinsightError>) -> Self {
        match result {
            Ok(data) => Self::success(data),
            Err(e) => Self::failure(&e),
        }
    }
}
