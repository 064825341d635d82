use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ============ Environment ============

/// Production XML-RPC endpoint.
pub const PRODUCTION_ENDPOINT: &str = "https://rpc.gandi.net/xmlrpc/";
/// Operational test environment (OTE) XML-RPC endpoint.
pub const TESTING_ENDPOINT: &str = "https://rpc.ote.gandi.net/xmlrpc/";

/// Which Gandi environment a client talks to.
///
/// API keys are environment specific: an OTE key is rejected by production and
/// vice versa.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SystemType {
    /// `rpc.gandi.net`
    Production,
    /// `rpc.ote.gandi.net`, the sandbox.
    #[default]
    Testing,
}

impl SystemType {
    /// Endpoint URL of this environment.
    #[must_use]
    pub fn endpoint(self) -> &'static str {
        match self {
            Self::Production => PRODUCTION_ENDPOINT,
            Self::Testing => TESTING_ENDPOINT,
        }
    }

    /// `Testing` when `testing` is set, `Production` otherwise.
    #[must_use]
    pub fn from_testing_flag(testing: bool) -> Self {
        if testing {
            Self::Testing
        } else {
            Self::Production
        }
    }
}

impl std::fmt::Display for SystemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

// ============ Zone Types ============

/// Entry of `domain.zone.list`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ZoneSummary {
    /// Zone id.
    pub id: i64,
    /// Zone name.
    pub name: String,
    /// Active version number.
    pub version: i64,
    /// Whether the zone is a shared public zone.
    pub public: bool,
}

/// Result of `domain.zone.info` and `domain.zone.create`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ZoneInfo {
    /// Zone id.
    pub id: i64,
    /// Zone name.
    pub name: String,
    /// Active version number; `0` when the zone has no active version.
    pub version: i64,
    /// All version numbers of the zone.
    pub versions: Vec<i64>,
    /// Number of domains using the zone.
    pub domains: i64,
    /// Whether the zone is a shared public zone.
    pub public: bool,
    /// Last modification time, as reported by the API.
    pub date_updated: Option<NaiveDateTime>,
}

// ============ Version Types ============

/// Entry of `domain.zone.version.list`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VersionInfo {
    /// Version number, unique within its zone.
    pub id: i64,
    /// Creation time.
    pub date_created: Option<NaiveDateTime>,
}

// ============ Record Types ============

/// A DNS record as returned by `domain.zone.record.list`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecordInfo {
    /// Record id, only meaningful within the zone version it was read from.
    pub id: i64,
    /// Relative record name (`@` for the apex).
    pub name: String,
    /// Record type (`A`, `TXT`, ...).
    #[serde(rename = "type")]
    pub record_type: String,
    /// Record value. Gandi returns `TXT`/`SPF`/`SRV` values quoted.
    pub value: String,
    /// Time to live in seconds.
    pub ttl: i64,
}

/// Parameters of `domain.zone.record.add` and `domain.zone.record.update`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecordSpec {
    /// Relative record name.
    pub name: String,
    /// Record type.
    #[serde(rename = "type")]
    pub record_type: String,
    /// Record value.
    pub value: String,
    /// Time to live in seconds.
    pub ttl: i64,
}
