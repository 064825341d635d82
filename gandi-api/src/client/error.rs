//! Gandi fault mapping

use crate::error::ApiError;
use crate::traits::{ApiErrorMapper, RawApiError};

use super::GandiClient;

/// Parts of a Gandi fault string.
///
/// Gandi formats faults as
/// `Error on object : OBJECT_ZONE (CAUSE_NOTFOUND) [zone 42 does not exist]`.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct FaultParts<'a> {
    pub object: Option<&'a str>,
    pub cause: Option<&'a str>,
    pub detail: Option<&'a str>,
}

pub(crate) fn split_fault(message: &str) -> FaultParts<'_> {
    let object = message
        .split_whitespace()
        .find(|w| w.starts_with("OBJECT_"));

    let cause = message.find("(CAUSE_").and_then(|start| {
        let rest = &message[start + 1..];
        rest.find(')').map(|end| &rest[..end])
    });

    let detail = message.find('[').and_then(|start| {
        let rest = &message[start + 1..];
        rest.rfind(']').map(|end| rest[..end].trim())
    });

    FaultParts {
        object,
        cause,
        detail,
    }
}

/// Gandi fault cause mapping
/// Reference: <http://doc.rpc.gandi.net/errors/fault_codes.html>
impl ApiErrorMapper for GandiClient {
    fn map_error(&self, method: &str, raw: RawApiError) -> ApiError {
        let parts = split_fault(&raw.message);
        let on_account = parts.object == Some("OBJECT_ACCOUNT");
        let object = parts.object.unwrap_or("OBJECT_UNKNOWN").to_string();
        let cause = parts.cause.map(str::to_string);
        let detail = parts.detail.map(str::to_string);

        match cause.as_deref() {
            // Unknown or disabled API key is reported on OBJECT_ACCOUNT
            Some("CAUSE_NORIGHT") if on_account => {
                ApiError::InvalidCredentials {
                    method: method.to_string(),
                    raw_message: detail.or(Some(raw.message)),
                }
            }
            Some("CAUSE_NORIGHT") => ApiError::PermissionDenied {
                method: method.to_string(),
                raw_message: detail.or(Some(raw.message)),
            },
            Some("CAUSE_NOTFOUND") => ApiError::ObjectNotFound {
                method: method.to_string(),
                object,
                raw_message: detail.or(Some(raw.message)),
            },
            Some("CAUSE_EXIST") => ApiError::ObjectExists {
                method: method.to_string(),
                object,
                raw_message: detail.or(Some(raw.message)),
            },
            Some("CAUSE_BADPARAMETER") => ApiError::InvalidParameter {
                method: method.to_string(),
                param: "general".to_string(),
                detail: detail.unwrap_or(raw.message),
            },
            _ if raw.message.contains("Invalid API key") => ApiError::InvalidCredentials {
                method: method.to_string(),
                raw_message: Some(raw.message),
            },
            _ => self.unknown_error(method, raw),
        }
    }
}
