//! Generic HTTP client tools
//!
//! Sends XML-RPC documents and turns transport-level failures into
//! [`ApiError`] values. XML-RPC faults travel inside a `200 OK` body and are
//! left to the caller, which knows how to map them.
//!
//! No retries: every failure is returned to the caller as-is.

use reqwest::RequestBuilder;
use std::time::Duration;

use crate::error::ApiError;
use crate::utils::log_sanitizer::truncate_for_log;
use crate::xmlrpc::{self, Response};

/// Default connect timeout (seconds)
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
/// Default request timeout (seconds)
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Create an HTTP client with timeouts configured
pub fn create_http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
        .timeout(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
        .build()
        .unwrap_or_default()
}

/// HTTP tool function set
pub struct HttpUtils;

impl HttpUtils {
    /// Performs an HTTP request and returns the response text
    ///
    /// # Arguments
    /// * `request_builder` - configured request (URL, headers, body)
    /// * `method_name` - XML-RPC method name (for logs and errors)
    /// * `endpoint` - endpoint URL (for logs)
    ///
    /// # Returns
    /// * `Ok(response_text)` on any 2xx status
    /// * `Err(ApiError::Timeout | NetworkError | RateLimited | Fault)` otherwise
    pub async fn execute_request(
        request_builder: RequestBuilder,
        method_name: &str,
        endpoint: &str,
    ) -> Result<String, ApiError> {
        log::debug!("[gandi] POST {endpoint} ({method_name})");

        let response = request_builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::Timeout {
                    method: method_name.to_string(),
                    detail: e.to_string(),
                }
            } else {
                ApiError::NetworkError {
                    method: method_name.to_string(),
                    detail: e.to_string(),
                }
            }
        })?;

        let status_code = response.status().as_u16();
        log::debug!("[gandi] Response Status: {status_code}");

        if status_code == 429 {
            let body = response.text().await.unwrap_or_default();
            log::warn!("[gandi] Rate limited (HTTP 429) on {method_name}");
            return Err(ApiError::RateLimited {
                method: method_name.to_string(),
                raw_message: Some(body),
            });
        }

        if matches!(status_code, 502..=504) {
            let body = response.text().await.unwrap_or_default();
            log::warn!("[gandi] Server error (HTTP {status_code}) on {method_name}");
            return Err(ApiError::NetworkError {
                method: method_name.to_string(),
                detail: format!("HTTP {status_code}: {}", truncate_for_log(&body)),
            });
        }

        let response_text = response
            .text()
            .await
            .map_err(|e| ApiError::NetworkError {
                method: method_name.to_string(),
                detail: format!("Failed to read response body: {e}"),
            })?;

        log::debug!(
            "[gandi] Response Body: {}",
            truncate_for_log(&response_text)
        );

        if !(200..300).contains(&status_code) {
            log::error!("[gandi] Unexpected HTTP {status_code} on {method_name}");
            return Err(ApiError::Fault {
                method: method_name.to_string(),
                fault_code: i64::from(status_code),
                fault_string: truncate_for_log(&response_text),
            });
        }

        Ok(response_text)
    }

    /// Parse an XML-RPC response
    ///
    /// # Returns
    /// * `Ok(Response)` - a value or a fault
    /// * `Err(ApiError::ParseError)` - the body is not a `methodResponse`
    pub fn parse_xmlrpc(response_text: &str, method_name: &str) -> Result<Response, ApiError> {
        xmlrpc::parse_response(response_text).map_err(|detail| {
            log::error!("[gandi] XML-RPC parse failed for {method_name}: {detail}");
            log::error!(
                "[gandi] Raw response: {}",
                truncate_for_log(response_text)
            );
            ApiError::ParseError {
                method: method_name.to_string(),
                detail,
            }
        })
    }
}
