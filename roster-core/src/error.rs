//! Error types for ROSTER operations

use crate::{Direction, RecordId};
use thiserror::Error;

/// Remote fetch failures.
///
/// Callers treat every variant the same way: the record is currently
/// unavailable and the call may be retried later. The variants only exist
/// so logs can say what went wrong.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("Transport failure for {url}: {reason}")]
    Transport { url: String, reason: String },

    #[error("Unexpected status {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Malformed payload from {url}: {reason}")]
    Decode { url: String, reason: String },
}

impl FetchError {
    /// The URL (or source-specific locator) the failed request targeted.
    pub fn url(&self) -> &str {
        match self {
            Self::Transport { url, .. } | Self::Status { url, .. } | Self::Decode { url, .. } => {
                url
            }
        }
    }
}

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required configuration field: {field}")]
    MissingRequired { field: String },

    #[error("Invalid value for {field}: {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

/// Master error type for all ROSTER errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RosterError {
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("No record named {name:?}")]
    NotFound { name: String },

    #[error("Invalid argument {field}: {reason}")]
    InvalidArgument { field: String, reason: String },

    #[error("No resolvable record found searching {direction:?} from {start} after {probes} probes")]
    NoValidIdFound {
        start: RecordId,
        direction: Direction,
        probes: usize,
    },

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias for ROSTER operations.
pub type RosterResult<T> = Result<T, RosterError>;

/// Coarse classification used by presentation layers to pick an error page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The remote catalog (or the part of it we needed) is unreachable.
    Unavailable,
    /// A lookup was malformed or matched nothing.
    SearchMiss,
    /// The process was started with an invalid configuration.
    Misconfigured,
}

impl RosterError {
    pub fn invalid_argument(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Fetch(_) | Self::NoValidIdFound { .. } => ErrorKind::Unavailable,
            Self::NotFound { .. } | Self::InvalidArgument { .. } => ErrorKind::SearchMiss,
            Self::Config(_) => ErrorKind::Misconfigured,
        }
    }

    /// Returns true if retrying the same call later may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Fetch(_) | Self::NoValidIdFound { .. })
    }
}

// =============================================================================
// TESTS
// =============================================================================
