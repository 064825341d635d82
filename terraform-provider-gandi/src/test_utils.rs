//! Test helpers
//!
//! An in-memory Gandi backend implementing [`GandiApi`]. It assigns zone ids,
//! record ids and version numbers the way the remote system does, refuses to
//! modify the active version, and quotes `TXT`/`SPF`/`SRV` values.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use gandi_api::{
    ApiError, GandiApi, RecordInfo, RecordSpec, Result, VersionInfo, ZoneInfo, ZoneSummary,
};
use tokio::sync::{RwLock, RwLockWriteGuard};

use crate::config::ProviderConfig;
use crate::provider::Provider;

pub fn record_spec(name: &str, record_type: &str, value: &str, ttl: i64) -> RecordSpec {
    RecordSpec {
        name: name.to_string(),
        record_type: record_type.to_string(),
        value: value.to_string(),
        ttl,
    }
}

/// Provider wired to a fresh mock backend
pub fn mock_provider(config: ProviderConfig) -> (Provider, Arc<MockGandiApi>) {
    let api = Arc::new(MockGandiApi::new());
    let provider = Provider::with_client(config, api.clone());
    (provider, api)
}

fn not_found(method: &str, object: &str) -> ApiError {
    ApiError::ObjectNotFound {
        method: method.to_string(),
        object: object.to_string(),
        raw_message: None,
    }
}

/// Gandi stores these types as escaped string literals
fn remote_value(record_type: &str, value: &str) -> String {
    let quoted = matches!(record_type, "TXT" | "SPF" | "SRV");
    if quoted && !value.starts_with('"') {
        let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
        format!("\"{escaped}\"")
    } else {
        value.to_string()
    }
}

struct MockZone {
    name: String,
    active: i64,
    versions: BTreeMap<i64, Vec<RecordInfo>>,
}

impl MockZone {
    fn resolve(&self, version: i64) -> i64 {
        if version == 0 { self.active } else { version }
    }

    fn next_version(&self) -> i64 {
        self.versions.keys().next_back().copied().unwrap_or(0) + 1
    }

    fn writable(&mut self, method: &str, version: i64) -> Result<&mut Vec<RecordInfo>> {
        let version = self.resolve(version);
        if version == self.active {
            return Err(ApiError::InvalidParameter {
                method: method.to_string(),
                param: "version".to_string(),
                detail: "cannot modify the active version".to_string(),
            });
        }
        self.versions
            .get_mut(&version)
            .ok_or_else(|| not_found(method, "OBJECT_VERSION"))
    }

    fn info(&self, id: i64) -> ZoneInfo {
        ZoneInfo {
            id,
            name: self.name.clone(),
            version: self.active,
            versions: self.versions.keys().copied().collect(),
            domains: 0,
            public: false,
            date_updated: None,
        }
    }
}

struct MockState {
    zones: BTreeMap<i64, MockZone>,
    next_zone_id: i64,
    next_record_id: i64,
    version_gap: i64,
    drift_next_clone: bool,
    failures: Vec<String>,
    calls: Vec<String>,
}

impl MockState {
    fn zone(&self, method: &str, zone_id: i64) -> Result<&MockZone> {
        self.zones
            .get(&zone_id)
            .ok_or_else(|| not_found(method, "OBJECT_ZONE"))
    }

    fn zone_mut(&mut self, method: &str, zone_id: i64) -> Result<&mut MockZone> {
        self.zones
            .get_mut(&zone_id)
            .ok_or_else(|| not_found(method, "OBJECT_ZONE"))
    }

    fn alloc_record_id(&mut self) -> i64 {
        self.next_record_id += 1;
        self.next_record_id
    }

    fn materialize(&mut self, spec: &RecordSpec) -> RecordInfo {
        RecordInfo {
            id: self.alloc_record_id(),
            name: spec.name.clone(),
            record_type: spec.record_type.clone(),
            value: remote_value(&spec.record_type, &spec.value),
            ttl: spec.ttl,
        }
    }
}

pub struct MockGandiApi {
    state: RwLock<MockState>,
}

impl MockGandiApi {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(MockState {
                zones: BTreeMap::new(),
                next_zone_id: 1000,
                next_record_id: 5000,
                version_gap: 0,
                drift_next_clone: false,
                failures: Vec::new(),
                calls: Vec::new(),
            }),
        }
    }

    /// Zone whose active version 1 holds `records`
    pub async fn seed_zone(&self, name: &str, records: &[RecordSpec]) -> i64 {
        let mut state = self.state.write().await;
        state.next_zone_id += 1;
        let zone_id = state.next_zone_id;
        let records: Vec<RecordInfo> = records.iter().map(|r| state.materialize(r)).collect();
        state.zones.insert(
            zone_id,
            MockZone {
                name: name.to_string(),
                active: 1,
                versions: BTreeMap::from([(1, records)]),
            },
        );
        zone_id
    }

    /// Inactive version holding `records`
    pub async fn seed_version(&self, zone_id: i64, records: &[RecordSpec]) -> i64 {
        let mut state = self.state.write().await;
        let records: Vec<RecordInfo> = records.iter().map(|r| state.materialize(r)).collect();
        let Some(zone) = state.zones.get_mut(&zone_id) else {
            return 0;
        };
        let number = zone.next_version();
        zone.versions.insert(number, records);
        number
    }

    /// Make the next `method` call fail with a fault
    pub async fn fail_next(&self, method: &str) {
        self.state.write().await.failures.push(method.to_string());
    }

    /// Skip `gap` numbers when assigning new version numbers
    pub async fn set_version_gap(&self, gap: i64) {
        self.state.write().await.version_gap = gap;
    }

    /// Make the next clone alter the value of every record it copies
    pub async fn drift_next_clone(&self) {
        self.state.write().await.drift_next_clone = true;
    }

    /// Names of the methods called so far, in order
    pub async fn calls(&self) -> Vec<String> {
        self.state.read().await.calls.clone()
    }

    pub async fn clear_calls(&self) {
        self.state.write().await.calls.clear();
    }

    pub async fn active_version(&self, zone_id: i64) -> i64 {
        self.state
            .read()
            .await
            .zones
            .get(&zone_id)
            .map_or(0, |z| z.active)
    }

    pub async fn versions(&self, zone_id: i64) -> Vec<i64> {
        self.state
            .read()
            .await
            .zones
            .get(&zone_id)
            .map(|z| z.versions.keys().copied().collect())
            .unwrap_or_default()
    }

    pub async fn records(&self, zone_id: i64, version: i64) -> Vec<RecordInfo> {
        self.state
            .read()
            .await
            .zones
            .get(&zone_id)
            .and_then(|z| z.versions.get(&z.resolve(version)).cloned())
            .unwrap_or_default()
    }

    async fn enter(&self, method: &str) -> Result<RwLockWriteGuard<'_, MockState>> {
        let mut state = self.state.write().await;
        state.calls.push(method.to_string());
        if let Some(pos) = state.failures.iter().position(|m| m == method) {
            state.failures.remove(pos);
            return Err(ApiError::Fault {
                method: method.to_string(),
                fault_code: 500_000,
                fault_string: "injected failure".to_string(),
            });
        }
        Ok(state)
    }
}

#[async_trait]
impl GandiApi for MockGandiApi {
    fn endpoint(&self) -> &str {
        "mock://gandi"
    }

    async fn zone_list(&self) -> Result<Vec<ZoneSummary>> {
        let state = self.enter("domain.zone.list").await?;
        Ok(state
            .zones
            .iter()
            .map(|(&id, z)| ZoneSummary {
                id,
                name: z.name.clone(),
                version: z.active,
                public: false,
            })
            .collect())
    }

    async fn zone_info(&self, zone_id: i64) -> Result<ZoneInfo> {
        const M: &str = "domain.zone.info";
        let state = self.enter(M).await?;
        Ok(state.zone(M, zone_id)?.info(zone_id))
    }

    async fn zone_create(&self, name: &str) -> Result<ZoneInfo> {
        let mut state = self.enter("domain.zone.create").await?;
        state.next_zone_id += 1;
        let zone_id = state.next_zone_id;
        let zone = MockZone {
            name: name.to_string(),
            active: 1,
            versions: BTreeMap::from([(1, Vec::new())]),
        };
        let info = zone.info(zone_id);
        state.zones.insert(zone_id, zone);
        Ok(info)
    }

    async fn zone_delete(&self, zone_id: i64) -> Result<bool> {
        const M: &str = "domain.zone.delete";
        let mut state = self.enter(M).await?;
        state
            .zones
            .remove(&zone_id)
            .map(|_| true)
            .ok_or_else(|| not_found(M, "OBJECT_ZONE"))
    }

    async fn version_list(&self, zone_id: i64) -> Result<Vec<VersionInfo>> {
        const M: &str = "domain.zone.version.list";
        let state = self.enter(M).await?;
        // newest first, lookups must not depend on the order
        Ok(state
            .zone(M, zone_id)?
            .versions
            .keys()
            .rev()
            .map(|&id| VersionInfo {
                id,
                date_created: None,
            })
            .collect())
    }

    async fn version_new(&self, zone_id: i64, base_version: i64) -> Result<i64> {
        const M: &str = "domain.zone.version.new";
        let mut state = self.enter(M).await?;
        let gap = state.version_gap;
        let drift = std::mem::take(&mut state.drift_next_clone);
        let (base_records, number) = {
            let zone = state.zone(M, zone_id)?;
            let records = zone
                .versions
                .get(&zone.resolve(base_version))
                .cloned()
                .ok_or_else(|| not_found(M, "OBJECT_VERSION"))?;
            (records, zone.next_version() + gap)
        };
        let cloned: Vec<RecordInfo> = base_records
            .into_iter()
            .map(|mut r| {
                r.id = state.alloc_record_id();
                if drift {
                    r.value.push_str(".drifted");
                }
                r
            })
            .collect();
        state.zone_mut(M, zone_id)?.versions.insert(number, cloned);
        Ok(number)
    }

    async fn version_delete(&self, zone_id: i64, version: i64) -> Result<bool> {
        const M: &str = "domain.zone.version.delete";
        let mut state = self.enter(M).await?;
        let zone = state.zone_mut(M, zone_id)?;
        if version == zone.active {
            return Err(ApiError::InvalidParameter {
                method: M.to_string(),
                param: "version".to_string(),
                detail: "cannot delete the active version".to_string(),
            });
        }
        zone.versions
            .remove(&version)
            .map(|_| true)
            .ok_or_else(|| not_found(M, "OBJECT_VERSION"))
    }

    async fn version_set(&self, zone_id: i64, version: i64) -> Result<bool> {
        const M: &str = "domain.zone.version.set";
        let mut state = self.enter(M).await?;
        let zone = state.zone_mut(M, zone_id)?;
        if !zone.versions.contains_key(&version) {
            return Err(not_found(M, "OBJECT_VERSION"));
        }
        zone.active = version;
        Ok(true)
    }

    async fn record_list(&self, zone_id: i64, version: i64) -> Result<Vec<RecordInfo>> {
        const M: &str = "domain.zone.record.list";
        let state = self.enter(M).await?;
        let zone = state.zone(M, zone_id)?;
        zone.versions
            .get(&zone.resolve(version))
            .cloned()
            .ok_or_else(|| not_found(M, "OBJECT_VERSION"))
    }

    async fn record_add(
        &self,
        zone_id: i64,
        version: i64,
        record: &RecordSpec,
    ) -> Result<RecordInfo> {
        const M: &str = "domain.zone.record.add";
        let mut state = self.enter(M).await?;
        let info = state.materialize(record);
        state
            .zone_mut(M, zone_id)?
            .writable(M, version)?
            .push(info.clone());
        Ok(info)
    }

    async fn record_update(
        &self,
        zone_id: i64,
        version: i64,
        record_id: i64,
        record: &RecordSpec,
    ) -> Result<Vec<RecordInfo>> {
        const M: &str = "domain.zone.record.update";
        let mut state = self.enter(M).await?;
        let records = state.zone_mut(M, zone_id)?.writable(M, version)?;
        let existing = records
            .iter_mut()
            .find(|r| r.id == record_id)
            .ok_or_else(|| not_found(M, "OBJECT_RECORD"))?;
        existing.name.clone_from(&record.name);
        existing.record_type.clone_from(&record.record_type);
        existing.value = remote_value(&record.record_type, &record.value);
        existing.ttl = record.ttl;
        Ok(vec![existing.clone()])
    }

    async fn record_delete(&self, zone_id: i64, version: i64, record_id: i64) -> Result<bool> {
        const M: &str = "domain.zone.record.delete";
        let mut state = self.enter(M).await?;
        let records = state.zone_mut(M, zone_id)?.writable(M, version)?;
        let before = records.len();
        records.retain(|r| r.id != record_id);
        Ok(records.len() < before)
    }
}
