//! `gandi_record` adapter

use std::sync::Arc;

use async_trait::async_trait;
use gandi_api::{GandiApi, RecordInfo, RecordSpec};
use serde::{Deserialize, Serialize};

use super::{Resource, ResourceState, int_string};
use crate::config::RecordUpdateMode;
use crate::error::{ResourceError, Result};
use crate::id::{self, SEPARATOR};
use crate::lookup::find_by_id;
use crate::quoting::display_value;
use crate::workflow::{self, RecordOperation, WorkflowOutcome};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordState {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, with = "int_string")]
    pub zone_id: i64,
    /// `0` follows the active version. Filled in with the version the record
    /// lives in once it exists.
    #[serde(default, with = "int_string")]
    pub version: i64,
    /// `version` tracks the active version of the zone
    #[serde(default)]
    pub follows_active: bool,
    #[serde(default, rename = "type")]
    pub record_type: String,
    #[serde(default)]
    pub value: String,
    #[serde(default, with = "int_string")]
    pub ttl: i64,
}

impl RecordState {
    fn spec(&self) -> RecordSpec {
        RecordSpec {
            name: self.name.clone(),
            record_type: self.record_type.clone(),
            value: self.value.clone(),
            ttl: self.ttl,
        }
    }

    fn apply(&mut self, record: &RecordInfo) {
        self.name.clone_from(&record.name);
        self.record_type.clone_from(&record.record_type);
        self.value = display_value(&record.record_type, &record.value);
        self.ttl = record.ttl;
    }
}

impl RecordState {
    /// Changes go through a fresh clone of the active version
    fn is_implicit(&self) -> bool {
        self.version == 0 || self.follows_active
    }

    fn track(&mut self, outcome: &WorkflowOutcome) {
        self.version = outcome.version;
        // an inactive clone cannot be followed through the active version
        self.follows_active = outcome.activated;
    }
}

impl ResourceState for RecordState {
    fn id(&self) -> &str {
        &self.id
    }
}

pub struct RecordResource {
    api: Arc<dyn GandiApi>,
    update_mode: RecordUpdateMode,
}

impl RecordResource {
    pub fn new(api: Arc<dyn GandiApi>, update_mode: RecordUpdateMode) -> Self {
        Self { api, update_mode }
    }

    /// Version to read from: the explicit one, or the zone's active version
    async fn resolve_version(&self, state: &RecordState) -> gandi_api::Result<i64> {
        if !state.is_implicit() {
            return Ok(state.version);
        }
        Ok(self.api.zone_info(state.zone_id).await?.version)
    }

    /// Record and the version it was found in
    async fn find(
        &self,
        state: &RecordState,
        record_id: i64,
    ) -> gandi_api::Result<Option<(i64, RecordInfo)>> {
        let version = self.resolve_version(state).await?;
        log::debug!(
            "Reading records from zone {} version {version}",
            state.zone_id
        );
        let records = self.api.record_list(state.zone_id, version).await?;
        Ok(find_by_id(&records, record_id).map(|r| (version, r.clone())))
    }
}

/// Change a record inside a non-active version
pub(crate) async fn apply_update(
    api: &dyn GandiApi,
    zone_id: i64,
    version: i64,
    record_id: i64,
    record: &RecordSpec,
    mode: RecordUpdateMode,
) -> Result<RecordInfo> {
    match mode {
        RecordUpdateMode::InPlace => {
            let updated = api.record_update(zone_id, version, record_id, record).await?;
            find_by_id(&updated, record_id)
                .or_else(|| updated.first())
                .cloned()
                .ok_or_else(|| ResourceError::not_found("record", record_id))
        }
        RecordUpdateMode::Replace => {
            if !api.record_delete(zone_id, version, record_id).await? {
                return Err(ResourceError::not_found("record", record_id));
            }
            Ok(api.record_add(zone_id, version, record).await?)
        }
    }
}

#[async_trait]
impl Resource for RecordResource {
    type State = RecordState;

    async fn create(&self, state: &mut RecordState) -> Result<()> {
        let spec = state.spec();
        log::debug!(
            "Creating record {} {} in zone {} version {}",
            spec.name,
            spec.record_type,
            state.zone_id,
            state.version
        );

        let record_id = if state.version == 0 {
            let outcome = workflow::run(
                self.api.as_ref(),
                state.zone_id,
                RecordOperation::Create(&spec),
            )
            .await?;
            state.track(&outcome);
            outcome
                .record
                .map(|r| r.id)
                .ok_or_else(|| ResourceError::not_found("record", &spec.name))?
        } else {
            state.follows_active = false;
            self.api
                .record_add(state.zone_id, state.version, &spec)
                .await?
                .id
        };

        state.id = id::encode_record_id(record_id);
        log::info!("Created record {}", state.id);
        self.read(state).await
    }

    async fn read(&self, state: &mut RecordState) -> Result<()> {
        if state.id.is_empty() {
            return Ok(());
        }
        let record_id = id::decode_record_id(&state.id)?;

        match self.find(state, record_id).await {
            Ok(Some((version, record))) => {
                if state.is_implicit() {
                    state.version = version;
                    state.follows_active = true;
                }
                state.apply(&record);
            }
            Ok(None) => {
                log::debug!("Record {} not found, removing it from state", state.id);
                state.id.clear();
            }
            Err(e) if e.is_not_found() => {
                log::debug!("Record {} is gone with its zone or version: {e}", state.id);
                state.id.clear();
            }
            Err(e) => return Err(e.into()),
        }
        Ok(())
    }

    async fn update(&self, prior: &RecordState, planned: &mut RecordState) -> Result<()> {
        let record_id = id::decode_record_id(&prior.id)?;
        let spec = planned.spec();
        log::debug!("Updating record {record_id}");

        // an unchanged version that tracked the active one keeps tracking it
        let implicit = planned.version == 0
            || (prior.follows_active && planned.version == prior.version);
        let record = if implicit {
            let outcome = workflow::run(
                self.api.as_ref(),
                planned.zone_id,
                RecordOperation::Update {
                    record_id,
                    record: &spec,
                    mode: self.update_mode,
                },
            )
            .await?;
            planned.track(&outcome);
            outcome
                .record
                .ok_or_else(|| ResourceError::not_found("record", record_id))?
        } else {
            planned.follows_active = false;
            apply_update(
                self.api.as_ref(),
                planned.zone_id,
                planned.version,
                record_id,
                &spec,
                self.update_mode,
            )
            .await?
        };

        planned.id = id::encode_record_id(record.id);
        log::debug!("Updated record {record_id}, now {}", planned.id);
        self.read(planned).await
    }

    async fn delete(&self, state: &mut RecordState) -> Result<()> {
        if state.id.is_empty() {
            return Ok(());
        }
        let record_id = id::decode_record_id(&state.id)?;
        log::debug!("Deleting record {record_id}");

        if state.is_implicit() {
            workflow::run(
                self.api.as_ref(),
                state.zone_id,
                RecordOperation::Delete { record_id },
            )
            .await?;
        } else if !self
            .api
            .record_delete(state.zone_id, state.version, record_id)
            .await?
        {
            return Err(ResourceError::not_found("record", record_id));
        }

        log::debug!("Deleted record {record_id}");
        state.id.clear();
        Ok(())
    }

    /// `{zone_id}_{record_id}` follows the active version,
    /// `{zone_id}_{version}_{record_id}` pins one
    fn import_state(&self, import_id: &str) -> Result<RecordState> {
        let (zone_id, version, record_id) = match import_id.split(SEPARATOR).count() {
            2 => {
                let parts = id::decode(import_id, 2)?;
                (parts[0], 0, parts[1])
            }
            _ => {
                let parts = id::decode(import_id, 3)?;
                (parts[0], parts[1], parts[2])
            }
        };
        Ok(RecordState {
            id: id::encode_record_id(record_id),
            zone_id,
            version,
            follows_active: version == 0,
            ..RecordState::default()
        })
    }
}
