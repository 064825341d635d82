//! `gandi_zone` adapter

use std::sync::Arc;

use async_trait::async_trait;
use gandi_api::GandiApi;
use serde::{Deserialize, Serialize};

use super::{Resource, ResourceState, int_string};
use crate::error::{ResourceError, Result};
use crate::id;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneState {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Accepted but not sent: the zone API has no domain association
    #[serde(
        default,
        with = "int_string::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub domain_id: Option<i64>,
    #[serde(default, with = "int_string")]
    pub active_version: i64,
}

impl ResourceState for ZoneState {
    fn id(&self) -> &str {
        &self.id
    }
}

pub struct ZoneResource {
    api: Arc<dyn GandiApi>,
}

impl ZoneResource {
    pub fn new(api: Arc<dyn GandiApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Resource for ZoneResource {
    type State = ZoneState;

    async fn create(&self, state: &mut ZoneState) -> Result<()> {
        let zone = self.api.zone_create(&state.name).await?;
        state.id = id::encode_zone_id(zone.id);
        log::info!("Created zone with id {}", state.id);
        self.read(state).await
    }

    /// Any remote error is treated as drift: the id is cleared.
    async fn read(&self, state: &mut ZoneState) -> Result<()> {
        if state.id.is_empty() {
            return Ok(());
        }
        let zone_id = id::decode_zone_id(&state.id)?;
        log::debug!("Reading zone {zone_id}");

        match self.api.zone_info(zone_id).await {
            Ok(zone) => {
                state.name = zone.name;
                state.active_version = zone.version;
            }
            Err(e) => {
                log::debug!("Unable to read zone {zone_id}: {e}. Removing it from state");
                state.id.clear();
            }
        }
        Ok(())
    }

    /// Nothing on a zone can change in place
    async fn update(&self, prior: &ZoneState, planned: &mut ZoneState) -> Result<()> {
        planned.id.clone_from(&prior.id);
        self.read(planned).await
    }

    async fn delete(&self, state: &mut ZoneState) -> Result<()> {
        if state.id.is_empty() {
            return Ok(());
        }
        let zone_id = id::decode_zone_id(&state.id)?;
        log::debug!("Deleting zone {zone_id}");

        if !self.api.zone_delete(zone_id).await? {
            return Err(ResourceError::not_found("zone", zone_id));
        }
        log::debug!("Deleted zone {zone_id}");
        state.id.clear();
        Ok(())
    }

    fn import_state(&self, import_id: &str) -> Result<ZoneState> {
        Ok(ZoneState {
            id: id::encode_zone_id(id::decode_zone_id(import_id)?),
            ..ZoneState::default()
        })
    }
}
