//! Resource adapters
//!
//! One adapter per resource kind. Each adapter works on a typed state struct
//! decoded once at the provider boundary.

mod record;
mod zone;
mod zone_version;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::Result;

pub use record::{RecordResource, RecordState};
pub use zone::{ZoneResource, ZoneState};
pub use zone_version::{ZoneVersionResource, ZoneVersionState};

pub(crate) use record::apply_update;

pub const ZONE: &str = "gandi_zone";
pub const ZONE_VERSION: &str = "gandi_zone_version";
pub const RECORD: &str = "gandi_record";

/// Typed state of one resource kind
pub trait ResourceState: Serialize + DeserializeOwned + Default + Send + Sync {
    /// Resource id; empty when the resource does not exist
    fn id(&self) -> &str;
}

/// CRUD verbs of a resource kind
///
/// `read` refreshes the state in place and clears the id when the remote
/// entity is gone; `delete` clears the id on success.
#[async_trait]
pub trait Resource: Send + Sync {
    type State: ResourceState;

    async fn create(&self, state: &mut Self::State) -> Result<()>;

    async fn read(&self, state: &mut Self::State) -> Result<()>;

    async fn update(&self, prior: &Self::State, planned: &mut Self::State) -> Result<()>;

    async fn delete(&self, state: &mut Self::State) -> Result<()>;

    /// Minimal state to read an existing entity from an import id
    fn import_state(&self, id: &str) -> Result<Self::State>;
}

/// Integer attributes stored as strings, read from strings or integers
pub(crate) mod int_string {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Str(String),
        Null(()),
    }

    fn parse<E: Error>(raw: Raw) -> Result<Option<i64>, E> {
        match raw {
            Raw::Int(v) => Ok(Some(v)),
            Raw::Str(s) if s.trim().is_empty() => Ok(None),
            Raw::Str(s) => s
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| E::custom(format!("invalid integer '{s}'"))),
            Raw::Null(()) => Ok(None),
        }
    }

    #[allow(clippy::trivially_copy_pass_by_ref)]
    pub fn serialize<S: Serializer>(value: &i64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    /// Empty strings and `null` read as `0`
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        parse(Raw::deserialize(deserializer)?).map(Option::unwrap_or_default)
    }

    pub mod option {
        use serde::{Deserialize, Deserializer, Serializer};

        use super::{Raw, parse};

        #[allow(clippy::ref_option)]
        pub fn serialize<S: Serializer>(
            value: &Option<i64>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(v) => serializer.collect_str(v),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<i64>, D::Error> {
            parse(Raw::deserialize(deserializer)?)
        }
    }
}
