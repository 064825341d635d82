//! Gandi XML-RPC client

mod api;
mod error;
mod http;

use reqwest::Client;

use crate::http_client::create_http_client;
use crate::types::SystemType;
use crate::utils::log_sanitizer::mask_secret;

/// Gandi XML-RPC client
///
/// Implements [`GandiApi`](crate::GandiApi). Built once at provider configuration
/// time and shared behind an `Arc`.
pub struct GandiClient {
    pub(crate) client: Client,
    pub(crate) api_key: String,
    pub(crate) endpoint: String,
}

impl GandiClient {
    /// Client for the given environment.
    pub fn new(api_key: String, system: SystemType) -> Self {
        Self::with_endpoint(api_key, system.endpoint())
    }

    /// Client for an explicit endpoint URL (proxies, local fakes).
    pub fn with_endpoint(api_key: String, endpoint: impl Into<String>) -> Self {
        let endpoint = endpoint.into();
        log::info!(
            "[gandi] Client configured for URL: {endpoint} with key: {}",
            mask_secret(&api_key)
        );
        Self {
            client: create_http_client(),
            api_key,
            endpoint,
        }
    }
}
