//! Entity lookup in remote list results
//!
//! The Gandi API has no get-by-id for zone versions and records, so callers
//! list and search.

use gandi_api::{GandiApi, RecordInfo, VersionInfo, ZoneSummary};

use crate::error::Result;

/// Entities carrying a remote integer id
pub trait Identified {
    fn id(&self) -> i64;
}

impl Identified for RecordInfo {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Identified for VersionInfo {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Identified for ZoneSummary {
    fn id(&self) -> i64 {
        self.id
    }
}

/// Find the entity with id `target`, whatever the order of `entities`
///
/// Ids are sorted and binary searched; the input slice is left untouched.
pub fn find_by_id<E: Identified>(entities: &[E], target: i64) -> Option<&E> {
    let mut order: Vec<usize> = (0..entities.len()).collect();
    order.sort_by_key(|&i| entities[i].id());
    order
        .binary_search_by_key(&target, |&i| entities[i].id())
        .ok()
        .map(|pos| &entities[order[pos]])
}

/// Find a record by its `(name, type, value)` natural key
///
/// Record ids do not survive a version clone; the natural key does.
pub fn find_by_natural_key<'a>(
    records: &'a [RecordInfo],
    name: &str,
    record_type: &str,
    value: &str,
) -> Option<&'a RecordInfo> {
    records
        .iter()
        .find(|r| r.name == name && r.record_type == record_type && r.value == value)
}

/// Whether `version` exists in zone `zone_id`
///
/// A failing list call is returned as an error, never as "absent".
pub async fn version_exists(api: &dyn GandiApi, zone_id: i64, version: i64) -> Result<bool> {
    let versions = api.version_list(zone_id).await?;
    let found = find_by_id(&versions, version).is_some();
    log::debug!("Zone {zone_id} version {version} found: {found}");
    Ok(found)
}
