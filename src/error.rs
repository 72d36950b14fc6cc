use std::fmt;
use thiserror::Error;

/// Why a single transport attempt produced no HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkErrorKind {
    /// The remote did not answer within the per-call timeout.
    Timeout,
    /// No connection could be established; the service is presumed unreachable.
    ConnectionFailed,
    /// Any other transport failure.
    Other(String),
}

impl fmt::Display for NetworkErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "Request timed out - server may be busy"),
            Self::ConnectionFailed => write!(f, "Connection failed - check network connection"),
            Self::Other(detail) => write!(f, "Request error: {}", detail),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind}")]
pub struct NetworkError {
    pub kind: NetworkErrorKind,
}

impl From<NetworkErrorKind> for NetworkError {
    fn from(kind: NetworkErrorKind) -> Self {
        Self { kind }
    }
}

/// Terminal failure of an identity challenge.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityRejection {
    #[error("badge does not match the logged-in employee")]
    Mismatched,
    #[error("badge scan failed")]
    CaptureFailed,
    #[error("invalid badge format")]
    InvalidFormat,
}

#[derive(Error, Debug)]
pub enum EquipError {
    #[error(transparent)]
    Network(#[from] NetworkError),
    #[error("identity rejected: {0}")]
    IdentityRejected(IdentityRejection),
    #[error("not logged in")]
    NotAuthenticated,
    #[error("HTTP {status}: {message}")]
    RemoteRejected { status: u16, message: String },
    #[error("HTTP {status}: {raw_text}")]
    RemoteOpaqueFailure { status: u16, raw_text: String },
    #[error("another action is still in progress")]
    Busy,
    #[error("background task ended before completing")]
    TaskAborted,
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl From<IdentityRejection> for EquipError {
    fn from(rejection: IdentityRejection) -> Self {
        Self::IdentityRejected(rejection)
    }
}

impl From<NetworkErrorKind> for EquipError {
    fn from(kind: NetworkErrorKind) -> Self {
        Self::Network(NetworkError { kind })
    }
}

pub type Result<T> = std::result::Result<T, EquipError>;
