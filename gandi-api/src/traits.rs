use async_trait::async_trait;

use crate::error::{ApiError, Result};
use crate::types::{RecordInfo, RecordSpec, VersionInfo, ZoneInfo, ZoneSummary};

/// Raw API fault (internal use)
#[derive(Debug, Clone)]
pub(crate) struct RawApiError {
    /// XML-RPC `faultCode`
    pub code: Option<i64>,
    /// XML-RPC `faultString`
    pub message: String,
}

impl RawApiError {
    pub fn with_code(code: i64, message: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            message: message.into(),
        }
    }
}

/// Maps raw faults onto [`ApiError`] (internal use)
pub(crate) trait ApiErrorMapper {
    /// Map a raw fault raised by `method` onto the unified error type
    fn map_error(&self, method: &str, raw: RawApiError) -> ApiError;

    /// Shortcut: response could not be parsed
    fn parse_error(&self, method: &str, detail: impl ToString) -> ApiError {
        ApiError::ParseError {
            method: method.to_string(),
            detail: detail.to_string(),
        }
    }

    /// Shortcut: unmapped fault (fallback)
    fn unknown_error(&self, method: &str, raw: RawApiError) -> ApiError {
        ApiError::Fault {
            method: method.to_string(),
            fault_code: raw.code.unwrap_or_default(),
            fault_string: raw.message,
        }
    }
}

/// The Gandi zone API.
///
/// One method per XML-RPC call used by the provider. The API key is held by the
/// implementation and passed as the first parameter of every call.
///
/// The remote API has no get-by-id for versions and records: callers list and
/// search.
#[async_trait]
pub trait GandiApi: Send + Sync {
    /// Endpoint URL, for logging.
    fn endpoint(&self) -> &str;

    /// `domain.zone.list`
    async fn zone_list(&self) -> Result<Vec<ZoneSummary>>;

    /// `domain.zone.info`
    async fn zone_info(&self, zone_id: i64) -> Result<ZoneInfo>;

    /// `domain.zone.create`
    async fn zone_create(&self, name: &str) -> Result<ZoneInfo>;

    /// `domain.zone.delete`. Returns the remote success flag.
    async fn zone_delete(&self, zone_id: i64) -> Result<bool>;

    /// `domain.zone.version.list`
    async fn version_list(&self, zone_id: i64) -> Result<Vec<VersionInfo>>;

    /// `domain.zone.version.new`: clone `base_version` (`0` = the active version).
    ///
    /// Returns the number the remote system assigned to the new version.
    async fn version_new(&self, zone_id: i64, base_version: i64) -> Result<i64>;

    /// `domain.zone.version.delete`. The active version cannot be deleted.
    async fn version_delete(&self, zone_id: i64, version: i64) -> Result<bool>;

    /// `domain.zone.version.set`: make `version` the active one.
    async fn version_set(&self, zone_id: i64, version: i64) -> Result<bool>;

    /// `domain.zone.record.list`
    async fn record_list(&self, zone_id: i64, version: i64) -> Result<Vec<RecordInfo>>;

    /// `domain.zone.record.add`
    async fn record_add(
        &self,
        zone_id: i64,
        version: i64,
        record: &RecordSpec,
    ) -> Result<RecordInfo>;

    /// `domain.zone.record.update`. Returns the updated records.
    async fn record_update(
        &self,
        zone_id: i64,
        version: i64,
        record_id: i64,
        record: &RecordSpec,
    ) -> Result<Vec<RecordInfo>>;

    /// `domain.zone.record.delete`. Returns whether a record was deleted.
    async fn record_delete(&self, zone_id: i64, version: i64, record_id: i64) -> Result<bool>;
}
