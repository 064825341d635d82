//! # gandi-api
//!
//! Async client for the Gandi XML-RPC API, limited to what a DNS zone
//! provider needs: zones, zone versions and records.
//!
//! ## Environments
//!
//! | [`SystemType`] | Endpoint |
//! |----------------|----------|
//! | `Production` | `https://rpc.gandi.net/xmlrpc/` |
//! | `Testing` *(default)* | `https://rpc.ote.gandi.net/xmlrpc/` |
//!
//! API keys are environment specific.
//!
//! ## Feature Flags
//!
//! - **`native-tls`** *(default)*: use the platform's native TLS implementation.
//! - **`rustls`**: use rustls.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use gandi_api::{GandiApi, GandiClient, RecordSpec, SystemType};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = GandiClient::new("your-api-key".to_string(), SystemType::Testing);
//!
//!     let zone = client.zone_create("example zone").await?;
//!     let version = client.version_new(zone.id, 0).await?;
//!
//!     let record = RecordSpec {
//!         name: "www".to_string(),
//!         record_type: "A".to_string(),
//!         value: "192.0.2.1".to_string(),
//!         ttl: 3600,
//!     };
//!     client.record_add(zone.id, version, &record).await?;
//!     client.version_set(zone.id, version).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Every call returns [`Result<T, ApiError>`](ApiError). Gandi faults are
//! mapped by cause:
//!
//! - [`ApiError::InvalidCredentials`]: unknown or disabled API key
//! - [`ApiError::ObjectNotFound`]: zone, version or record does not exist
//! - [`ApiError::ObjectExists`]: the object already exists
//! - [`ApiError::Fault`]: any other fault, with its raw code and string
//!
//! Calls are never retried.

mod client;
mod error;
mod http_client;
mod traits;
mod types;
mod utils;
pub mod xmlrpc;

// Re-export error types
pub use error::{ApiError, Result};

// Re-export the API trait and its XML-RPC implementation
pub use client::GandiClient;
pub use traits::GandiApi;

// Re-export types
pub use types::{
    PRODUCTION_ENDPOINT, RecordInfo, RecordSpec, SystemType, TESTING_ENDPOINT, VersionInfo,
    ZoneInfo, ZoneSummary,
};
