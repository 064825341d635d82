//! Provider configuration
//!
//! Read from the provider block JSON with environment fallbacks:
//!
//! | Attribute | Environment | Default |
//! |-----------|-------------|---------|
//! | `key` | `GANDI_KEY` | required |
//! | `testing` | `GANDI_TESTING` | `true` (OTE sandbox) |

use std::env;
use std::fmt;
use std::sync::Arc;

use gandi_api::{GandiApi, GandiClient, SystemType};
use serde::{Deserialize, Serialize};

use crate::error::{ResourceError, Result};

pub const KEY_ENV: &str = "GANDI_KEY";
pub const TESTING_ENV: &str = "GANDI_TESTING";

/// How a zone version number requested by the user is reconciled with the
/// number the remote system assigns on clone
///
/// Only zone version creation is governed. A `base_version` change clones
/// while the resource's own number still exists, so the replacement always
/// gets a new number whatever the setting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionNumbering {
    /// The requested number is only checked for existence; state takes the
    /// assigned number.
    #[default]
    RemoteAssigned,
    /// A different assigned number deletes the fresh clone and fails.
    Requested,
}

/// How record attribute changes are applied
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordUpdateMode {
    /// `domain.zone.record.update`
    #[default]
    InPlace,
    /// Delete then re-add; the record gets a new id.
    Replace,
}

/// Provider block as written by the user, before environment fallbacks
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawProviderConfig {
    #[serde(default)]
    key: Option<String>,
    #[serde(default)]
    testing: Option<bool>,
    #[serde(default)]
    endpoint: Option<String>,
    #[serde(default)]
    version_numbering: VersionNumbering,
    #[serde(default)]
    record_update_mode: RecordUpdateMode,
}

/// Resolved provider configuration
#[derive(Clone)]
pub struct ProviderConfig {
    pub key: String,
    pub testing: bool,
    /// Explicit endpoint URL, overrides `testing`
    pub endpoint: Option<String>,
    pub version_numbering: VersionNumbering,
    pub record_update_mode: RecordUpdateMode,
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("key", &"********")
            .field("testing", &self.testing)
            .field("endpoint", &self.endpoint)
            .field("version_numbering", &self.version_numbering)
            .field("record_update_mode", &self.record_update_mode)
            .finish()
    }
}

impl ProviderConfig {
    /// Configuration from the environment only
    pub fn from_env() -> Result<Self> {
        Self::resolve(RawProviderConfig::default(), |name| env::var(name).ok())
    }

    /// Configuration from a provider block, falling back to the environment
    pub fn from_json(value: serde_json::Value) -> Result<Self> {
        let raw = Self::parse_raw(value)?;
        Self::resolve(raw, |name| env::var(name).ok())
    }

    fn parse_raw(value: serde_json::Value) -> Result<RawProviderConfig> {
        if value.is_null() {
            return Ok(RawProviderConfig::default());
        }
        serde_json::from_value(value)
            .map_err(|e| ResourceError::Config(format!("invalid provider block: {e}")))
    }

    fn resolve(
        raw: RawProviderConfig,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let key = raw
            .key
            .filter(|k| !k.is_empty())
            .or_else(|| lookup(KEY_ENV).filter(|k| !k.is_empty()))
            .ok_or_else(|| {
                ResourceError::Config(format!("missing API key: set `key` or {KEY_ENV}"))
            })?;

        let testing = match raw.testing {
            Some(testing) => testing,
            None => match lookup(TESTING_ENV) {
                Some(v) => parse_bool(&v).ok_or_else(|| {
                    ResourceError::Config(format!("{TESTING_ENV} is not a boolean: '{v}'"))
                })?,
                None => true,
            },
        };

        Ok(Self {
            key,
            testing,
            endpoint: raw.endpoint,
            version_numbering: raw.version_numbering,
            record_update_mode: raw.record_update_mode,
        })
    }

    /// Target Gandi environment
    pub fn system_type(&self) -> SystemType {
        SystemType::from_testing_flag(self.testing)
    }

    /// Endpoint URL the client talks to
    pub fn endpoint_url(&self) -> &str {
        self.endpoint
            .as_deref()
            .unwrap_or_else(|| self.system_type().endpoint())
    }

    /// Build the shared API client
    pub fn client(&self) -> Arc<dyn GandiApi> {
        log::info!(
            "Gandi provider configured for {} environment",
            self.system_type()
        );
        Arc::new(GandiClient::with_endpoint(
            self.key.clone(),
            self.endpoint_url(),
        ))
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
impl ProviderConfig {
    pub fn for_tests() -> Self {
        Self {
            key: "test-key".to_string(),
            testing: true,
            endpoint: None,
            version_numbering: VersionNumbering::default(),
            record_update_mode: RecordUpdateMode::default(),
        }
    }
}
