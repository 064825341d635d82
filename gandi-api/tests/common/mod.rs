//! Shared helpers for live tests against the Gandi OTE sandbox

#![allow(dead_code)]

use std::env;
use std::sync::Arc;

use gandi_api::{GandiApi, GandiClient, RecordSpec, SystemType};

/// Skip the test when an environment variable is missing
#[macro_export]
macro_rules! skip_if_no_credentials {
    ($($var:expr),+) => {
        $(
            if std::env::var($var).is_err() {
                eprintln!("skipping test: missing environment variable {}", $var);
                return;
            }
        )+
    };
}

/// Unique record name for a test run
pub fn generate_test_record_name() -> String {
    let uuid = uuid::Uuid::new_v4();
    format!("_test-{}", &uuid.to_string()[..8])
}

/// TXT record used by the record tests
pub fn test_record(name: &str, text: &str) -> RecordSpec {
    RecordSpec {
        name: name.to_string(),
        record_type: "TXT".to_string(),
        value: format!("\"{text}\""),
        ttl: 3600,
    }
}

/// Test context: a client and the id of a zone reserved for tests
pub struct TestContext {
    pub api: Arc<dyn GandiApi>,
    pub zone_id: i64,
}

impl TestContext {
    /// Build from `GANDI_KEY` and `GANDI_ZONE_ID`
    pub fn from_env() -> Option<Self> {
        let key = env::var("GANDI_KEY").ok()?;
        let zone_id = env::var("GANDI_ZONE_ID").ok()?.parse().ok()?;
        let testing = env::var("GANDI_TESTING").map_or(true, |v| v != "false" && v != "0");

        Some(Self {
            api: Arc::new(GandiClient::new(key, SystemType::from_testing_flag(testing))),
            zone_id,
        })
    }

    /// Clone the active version into a scratch version
    pub async fn scratch_version(&self) -> Option<i64> {
        self.api.version_new(self.zone_id, 0).await.ok()
    }

    /// Delete a scratch version, ignoring failures
    pub async fn cleanup_version(&self, version: i64) {
        let _ = self.api.version_delete(self.zone_id, version).await;
    }
}
