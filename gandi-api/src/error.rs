use serde::{Deserialize, Serialize};

/// Unified error type for all Gandi API calls.
///
/// Each variant carries the XML-RPC `method` that produced it (for example
/// `domain.zone.record.list`), plus variant-specific context. All variants are
/// serializable for structured error reporting.
///
/// XML-RPC faults are mapped onto the specific variants by their Gandi cause
/// (see `client::error`); faults without a known cause end up in
/// [`Fault`](Self::Fault).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum ApiError {
    /// A network-level error occurred (DNS resolution failure, connection refused, etc.).
    NetworkError {
        /// Method that was being called.
        method: String,
        /// Error details.
        detail: String,
    },

    /// The HTTP request timed out.
    Timeout {
        /// Method that was being called.
        method: String,
        /// Error details.
        detail: String,
    },

    /// The API rate limit has been exceeded (HTTP 429).
    RateLimited {
        /// Method that was being called.
        method: String,
        /// Original response body, if available.
        raw_message: Option<String>,
    },

    /// The API key is invalid, expired or not enabled for the selected environment.
    InvalidCredentials {
        /// Method that was being called.
        method: String,
        /// Original fault string, if available.
        raw_message: Option<String>,
    },

    /// The API key is valid but lacks access to the requested object.
    PermissionDenied {
        /// Method that was being called.
        method: String,
        /// Original fault string, if available.
        raw_message: Option<String>,
    },

    /// The requested object (zone, version, record) does not exist.
    ObjectNotFound {
        /// Method that was being called.
        method: String,
        /// Gandi object kind, e.g. `OBJECT_ZONE`.
        object: String,
        /// Original fault string, if available.
        raw_message: Option<String>,
    },

    /// The object being created already exists.
    ObjectExists {
        /// Method that was being called.
        method: String,
        /// Gandi object kind, e.g. `OBJECT_RECORD`.
        object: String,
        /// Original fault string, if available.
        raw_message: Option<String>,
    },

    /// A call parameter was rejected by the remote API.
    InvalidParameter {
        /// Method that was being called.
        method: String,
        /// Parameter name, or `"general"` when Gandi does not say.
        param: String,
        /// Error details.
        detail: String,
    },

    /// The XML-RPC response could not be parsed or had an unexpected shape.
    ParseError {
        /// Method that was being called.
        method: String,
        /// Details about the parse failure.
        detail: String,
    },

    /// An XML-RPC fault that is not mapped to a more specific variant.
    Fault {
        /// Method that was being called.
        method: String,
        /// Raw `faultCode`.
        fault_code: i64,
        /// Raw `faultString`.
        fault_string: String,
    },
}

impl ApiError {
    /// Whether the error is expected behavior (bad input, missing object, ...),
    /// used to pick the log level.
    ///
    /// `true` should be logged at `warn`, `false` at `error`.
    /// **Update this method when adding variants.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials { .. }
                | Self::PermissionDenied { .. }
                | Self::ObjectNotFound { .. }
                | Self::ObjectExists { .. }
                | Self::InvalidParameter { .. }
        )
    }

    /// Whether the remote system reported that the object does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ObjectNotFound { .. })
    }

    /// The XML-RPC method the error originated from.
    #[must_use]
    pub fn method(&self) -> &str {
        match self {
            Self::NetworkError { method, .. }
            | Self::Timeout { method, .. }
            | Self::RateLimited { method, .. }
            | Self::InvalidCredentials { method, .. }
            | Self::PermissionDenied { method, .. }
            | Self::ObjectNotFound { method, .. }
            | Self::ObjectExists { method, .. }
            | Self::InvalidParameter { method, .. }
            | Self::ParseError { method, .. }
            | Self::Fault { method, .. } => method,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NetworkError { method, detail } => {
                write!(f, "[{method}] Network error: {detail}")
            }
            Self::Timeout { method, detail } => {
                write!(f, "[{method}] Request timeout: {detail}")
            }
            Self::RateLimited { method, .. } => write!(f, "[{method}] Rate limited"),
            Self::InvalidCredentials {
                method,
                raw_message,
            } => {
                if let Some(msg) = raw_message {
                    write!(f, "[{method}] Invalid API key: {msg}")
                } else {
                    write!(f, "[{method}] Invalid API key")
                }
            }
            Self::PermissionDenied {
                method,
                raw_message,
            } => {
                if let Some(msg) = raw_message {
                    write!(f, "[{method}] Permission denied: {msg}")
                } else {
                    write!(f, "[{method}] Permission denied")
                }
            }
            Self::ObjectNotFound { method, object, .. } => {
                write!(f, "[{method}] {object} not found")
            }
            Self::ObjectExists { method, object, .. } => {
                write!(f, "[{method}] {object} already exists")
            }
            Self::InvalidParameter {
                method,
                param,
                detail,
            } => {
                write!(f, "[{method}] Invalid parameter '{param}': {detail}")
            }
            Self::ParseError { method, detail } => {
                write!(f, "[{method}] Parse error: {detail}")
            }
            Self::Fault {
                method,
                fault_code,
                fault_string,
            } => {
                write!(f, "[{method}] Fault {fault_code}: {fault_string}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

/// Convenience type alias for `Result<T, ApiError>`.
pub type Result<T> = std::result::Result<T, ApiError>;
