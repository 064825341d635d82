//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

// Re-export the API error type
pub use gandi_api::ApiError;

/// Resource layer error type
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum ResourceError {
    /// Remote API error (converted from the client library)
    #[error("{0}")]
    Transport(#[from] ApiError),

    /// The targeted entity does not exist remotely
    #[error("{kind} not found: {id}")]
    NotFound { kind: String, id: String },

    /// A stored resource id could not be decoded
    #[error("Malformed id '{id}': {reason}")]
    MalformedId { id: String, reason: String },

    /// A resource attribute has an invalid value
    #[error("Invalid value for '{field}': {reason}")]
    InvalidField { field: String, reason: String },

    /// The requested zone version number is already taken
    #[error("Zone version {version} already exists in zone {zone_id}")]
    VersionAlreadyExists { zone_id: i64, version: i64 },

    /// Cloning a zone version failed
    #[error("Cannot create a new version of zone {zone_id}: {source}")]
    VersionCreateFailed { zone_id: i64, source: ApiError },

    /// The remote system assigned another number than the requested one
    #[error(
        "Zone {zone_id}: requested version {requested} but the remote system assigned {assigned}"
    )]
    VersionNumberMismatch {
        zone_id: i64,
        requested: i64,
        assigned: i64,
    },

    /// A record could not be found again in a freshly cloned version
    #[error(
        "Record '{name}' ({record_type} {value}) not found in version {version} of zone {zone_id} after cloning"
    )]
    RecordNotFoundAfterClone {
        zone_id: i64,
        version: i64,
        name: String,
        record_type: String,
        value: String,
    },

    /// Resource type not handled by this provider
    #[error("Unknown resource type: {0}")]
    UnknownResourceType(String),

    /// Provider configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ResourceError {
    /// Whether the error is caused by user input or remote drift, used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    /// **Please update this method simultaneously when new variants are added.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::NotFound { .. }
            | Self::MalformedId { .. }
            | Self::InvalidField { .. }
            | Self::VersionAlreadyExists { .. }
            | Self::VersionNumberMismatch { .. }
            | Self::UnknownResourceType(_)
            | Self::Config(_) => true,
            Self::Transport(e) => e.is_expected(),
            Self::VersionCreateFailed { .. } | Self::RecordNotFoundAfterClone { .. } => false,
        }
    }

    pub(crate) fn not_found(kind: &str, id: impl ToString) -> Self {
        Self::NotFound {
            kind: kind.to_string(),
            id: id.to_string(),
        }
    }

    pub(crate) fn invalid_field(field: &str, reason: impl ToString) -> Self {
        Self::InvalidField {
            field: field.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Resource layer Result type alias
pub type Result<T> = std::result::Result<T, ResourceError>;
