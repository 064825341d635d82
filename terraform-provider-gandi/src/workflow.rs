//! Implicit-version workflow
//!
//! Gandi refuses to modify the active version of a zone. When a record is
//! managed without an explicit version, every change goes through:
//!
//! 1. look up the active version `A`;
//! 2. clone `A` into a new version `N`;
//! 3. (update/delete) find the record in `A` by id, then in `N` by its
//!    `(name, type, value)` key since ids do not survive a clone;
//! 4. apply the operation in `N`;
//! 5. activate `N` when the zone had an active version.
//!
//! Nothing is rolled back: a failure after step 2 leaves `N` orphaned.

use gandi_api::{GandiApi, RecordInfo, RecordSpec};

use crate::config::RecordUpdateMode;
use crate::error::{ResourceError, Result};
use crate::lookup::{find_by_id, find_by_natural_key};
use crate::resources::apply_update;

/// Record operation applied to the cloned version
#[derive(Debug, Clone, Copy)]
pub enum RecordOperation<'a> {
    Create(&'a RecordSpec),
    Update {
        record_id: i64,
        record: &'a RecordSpec,
        mode: RecordUpdateMode,
    },
    Delete {
        record_id: i64,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowOutcome {
    /// Version that was active when the workflow started
    pub previous_version: i64,
    /// The cloned version the operation was applied to
    pub version: i64,
    /// Whether the clone is now the active version
    pub activated: bool,
    /// Created or updated record, in the cloned version
    pub record: Option<RecordInfo>,
}

pub async fn run(
    api: &dyn GandiApi,
    zone_id: i64,
    operation: RecordOperation<'_>,
) -> Result<WorkflowOutcome> {
    let active = api.zone_info(zone_id).await?.version;
    log::debug!("Zone {zone_id} active version: {active}");

    let version = api
        .version_new(zone_id, active)
        .await
        .map_err(|source| ResourceError::VersionCreateFailed { zone_id, source })?;
    log::info!("Cloned zone {zone_id} version {active} into version {version}");

    match apply(api, zone_id, active, version, operation).await {
        Ok(outcome) => Ok(outcome),
        Err(e) => {
            log::warn!("Zone {zone_id} version {version} is left orphaned: {e}");
            Err(e)
        }
    }
}

async fn apply(
    api: &dyn GandiApi,
    zone_id: i64,
    active: i64,
    version: i64,
    operation: RecordOperation<'_>,
) -> Result<WorkflowOutcome> {
    let record = match operation {
        RecordOperation::Create(spec) => Some(api.record_add(zone_id, version, spec).await?),
        RecordOperation::Update {
            record_id,
            record,
            mode,
        } => {
            let moved = relocate(api, zone_id, active, version, record_id).await?;
            Some(apply_update(api, zone_id, version, moved, record, mode).await?)
        }
        RecordOperation::Delete { record_id } => {
            let moved = relocate(api, zone_id, active, version, record_id).await?;
            if !api.record_delete(zone_id, version, moved).await? {
                return Err(ResourceError::not_found("record", moved));
            }
            None
        }
    };

    let activated = if active > 0 {
        let set = api.version_set(zone_id, version).await?;
        if set {
            log::info!("Activated zone {zone_id} version {version}");
        } else {
            log::warn!("Zone {zone_id} refused to activate version {version}");
        }
        set
    } else {
        log::debug!("Zone {zone_id} had no active version, version {version} left inactive");
        false
    };

    Ok(WorkflowOutcome {
        previous_version: active,
        version,
        activated,
        record,
    })
}

/// Id in `version` of the record known as `record_id` in `active`
async fn relocate(
    api: &dyn GandiApi,
    zone_id: i64,
    active: i64,
    version: i64,
    record_id: i64,
) -> Result<i64> {
    let original = api.record_list(zone_id, active).await?;
    let original = find_by_id(&original, record_id)
        .ok_or_else(|| ResourceError::not_found("record", record_id))?;

    let cloned = api.record_list(zone_id, version).await?;
    find_by_natural_key(
        &cloned,
        &original.name,
        &original.record_type,
        &original.value,
    )
    .map(|r| r.id)
    .ok_or_else(|| ResourceError::RecordNotFoundAfterClone {
        zone_id,
        version,
        name: original.name.clone(),
        record_type: original.record_type.clone(),
        value: original.value.clone(),
    })
}
