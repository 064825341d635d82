//! # terraform-provider-gandi
//!
//! Resource logic of a Terraform-style provider for Gandi DNS zones, zone
//! versions and records. The plugin host (schema diffing, plan/apply, the
//! plugin protocol) stays outside; it calls [`Provider`] with JSON states.
//!
//! ## Resources
//!
//! | Type | Id | Notes |
//! |------|----|-------|
//! | `gandi_zone` | `{zone_id}` | `name` forces a new zone |
//! | `gandi_zone_version` | `{zone_id}_{version}` | cloned from `base_version` |
//! | `gandi_record` | `{record_id}` | unset `version` follows the active version |
//!
//! Records without an explicit version go through the implicit-version
//! workflow (see [`workflow`]): the active version is cloned, changed, then
//! activated, since Gandi never lets the active version be modified.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use serde_json::json;
//! use terraform_provider_gandi::{Provider, ProviderConfig};
//!
//! # async fn example() -> terraform_provider_gandi::Result<()> {
//! let config = ProviderConfig::from_json(json!({ "testing": true }))?;
//! let provider = Provider::new(config);
//!
//! let _state = provider
//!     .create(
//!         "gandi_record",
//!         json!({ "zone_id": "1234", "name": "www", "type": "A", "value": "192.0.2.1", "ttl": 3600 }),
//!     )
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Every verb returns [`Result<T, ResourceError>`](ResourceError). A read
//! never fails because the entity is gone: it returns `None` (or clears the
//! state id). Remote errors surface as [`ResourceError::Transport`].

pub mod config;
pub mod error;
pub mod id;
pub mod lookup;
pub mod provider;
mod quoting;
pub mod resources;
pub mod schema;
pub mod workflow;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use config::{ProviderConfig, RecordUpdateMode, VersionNumbering};
pub use error::{ResourceError, Result};
pub use provider::Provider;
pub use resources::{Resource, ResourceState};
pub use schema::ProviderSchema;
