//! `gandi_zone_version` adapter
//!
//! `domain.zone.version.new` cannot be told which number to use: the remote
//! system assigns one. The requested `zone_version` is checked for existence
//! first; what happens when the assigned number differs on creation is
//! governed by [`VersionNumbering`].

use std::sync::Arc;

use async_trait::async_trait;
use gandi_api::GandiApi;
use serde::{Deserialize, Serialize};

use super::{Resource, ResourceState, int_string};
use crate::config::VersionNumbering;
use crate::error::{ResourceError, Result};
use crate::id;
use crate::lookup::version_exists;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneVersionState {
    #[serde(default)]
    pub id: String,
    #[serde(default, with = "int_string")]
    pub zone_id: i64,
    #[serde(default, with = "int_string")]
    pub base_version: i64,
    #[serde(default, with = "int_string")]
    pub zone_version: i64,
}

impl ResourceState for ZoneVersionState {
    fn id(&self) -> &str {
        &self.id
    }
}

pub struct ZoneVersionResource {
    api: Arc<dyn GandiApi>,
    numbering: VersionNumbering,
}

impl ZoneVersionResource {
    pub fn new(api: Arc<dyn GandiApi>, numbering: VersionNumbering) -> Self {
        Self { api, numbering }
    }

    async fn clone_version(&self, zone_id: i64, base_version: i64) -> Result<i64> {
        let version = self
            .api
            .version_new(zone_id, base_version)
            .await
            .map_err(|source| ResourceError::VersionCreateFailed { zone_id, source })?;
        log::info!("Cloned zone {zone_id} version {base_version} into version {version}");
        Ok(version)
    }
}

#[async_trait]
impl Resource for ZoneVersionResource {
    type State = ZoneVersionState;

    async fn create(&self, state: &mut ZoneVersionState) -> Result<()> {
        let zone_id = state.zone_id;
        let requested = state.zone_version;

        if version_exists(self.api.as_ref(), zone_id, requested).await? {
            return Err(ResourceError::VersionAlreadyExists {
                zone_id,
                version: requested,
            });
        }

        let assigned = self.clone_version(zone_id, state.base_version).await?;
        if assigned != requested {
            if self.numbering == VersionNumbering::Requested {
                if let Err(e) = self.api.version_delete(zone_id, assigned).await {
                    log::warn!("Zone {zone_id} version {assigned} is left orphaned: {e}");
                }
                return Err(ResourceError::VersionNumberMismatch {
                    zone_id,
                    requested,
                    assigned,
                });
            }
            log::info!("Zone {zone_id}: requested version {requested}, remote assigned {assigned}");
        }

        state.zone_version = assigned;
        state.id = id::encode_zone_version_id(zone_id, assigned);
        log::info!("Created zone version with id {}", state.id);
        self.read(state).await
    }

    async fn read(&self, state: &mut ZoneVersionState) -> Result<()> {
        if state.id.is_empty() {
            return Ok(());
        }
        let (zone_id, version) = id::decode_zone_version_id(&state.id)?;

        match version_exists(self.api.as_ref(), zone_id, version).await {
            Ok(true) => {
                state.zone_id = zone_id;
                state.zone_version = version;
            }
            Ok(false) => {
                log::debug!("Zone version {} not found, removing it from state", state.id);
                state.id.clear();
            }
            Err(ResourceError::Transport(e)) if e.is_not_found() => {
                log::debug!("Zone of version {} is gone: {e}", state.id);
                state.id.clear();
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }

    /// A new `base_version` clones a fresh version, then drops the old one
    async fn update(&self, prior: &ZoneVersionState, planned: &mut ZoneVersionState) -> Result<()> {
        planned.id.clone_from(&prior.id);
        if prior.base_version == planned.base_version {
            return self.read(planned).await;
        }

        let (zone_id, old_version) = id::decode_zone_version_id(&prior.id)?;
        // the resource's own number already exists: no conflict check, and the
        // clone cannot get it back whatever the numbering
        let assigned = self.clone_version(zone_id, planned.base_version).await?;

        if let Err(e) = self.api.version_delete(zone_id, old_version).await {
            log::warn!(
                "Zone {zone_id} version {assigned} is left orphaned, version {old_version} could not be deleted: {e}"
            );
            return Err(e.into());
        }

        planned.zone_version = assigned;
        planned.id = id::encode_zone_version_id(zone_id, assigned);
        log::info!("Zone version {} replaced by {}", prior.id, planned.id);
        self.read(planned).await
    }

    async fn delete(&self, state: &mut ZoneVersionState) -> Result<()> {
        if state.id.is_empty() {
            return Ok(());
        }
        let (zone_id, version) = id::decode_zone_version_id(&state.id)?;
        log::debug!("Deleting zone version {}", state.id);

        if !self.api.version_delete(zone_id, version).await? {
            return Err(ResourceError::not_found("zone version", &state.id));
        }
        log::debug!("Deleted zone version {}", state.id);
        state.id.clear();
        Ok(())
    }

    fn import_state(&self, import_id: &str) -> Result<ZoneVersionState> {
        let (zone_id, zone_version) = id::decode_zone_version_id(import_id)?;
        Ok(ZoneVersionState {
            id: id::encode_zone_version_id(zone_id, zone_version),
            zone_id,
            zone_version,
            ..ZoneVersionState::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockGandiApi;

    fn planned(zone_id: i64, base_version: i64, zone_version: i64) -> ZoneVersionState {
        ZoneVersionState {
            id: String::new(),
            zone_id,
            base_version,
            zone_version,
        }
    }

    #[tokio::test]
    async fn create_with_free_number() {
        let api = Arc::new(MockGandiApi::new());
        let zone = api.seed_zone("example", &[]).await;
        let versions = ZoneVersionResource::new(api.clone(), VersionNumbering::RemoteAssigned);

        let mut state = planned(zone, 1, 2);
        versions.create(&mut state).await.unwrap();

        assert_eq!(state.id, format!("{zone}_2"));
        assert_eq!(state.zone_version, 2);
        assert_eq!(api.versions(zone).await, vec![1, 2]);
    }

    #[tokio::test]
    async fn create_with_existing_number_fails() {
        let api = Arc::new(MockGandiApi::new());
        let zone = api.seed_zone("example", &[]).await;
        let versions = ZoneVersionResource::new(api.clone(), VersionNumbering::RemoteAssigned);

        let mut state = planned(zone, 1, 1);
        let err = versions.create(&mut state).await.unwrap_err();

        assert!(matches!(
            err,
            ResourceError::VersionAlreadyExists { version: 1, .. }
        ));
        assert!(state.id.is_empty());
        assert_eq!(api.versions(zone).await, vec![1]);
    }

    #[tokio::test]
    async fn create_when_listing_fails() {
        let api = Arc::new(MockGandiApi::new());
        let zone = api.seed_zone("example", &[]).await;
        let versions = ZoneVersionResource::new(api.clone(), VersionNumbering::RemoteAssigned);
        api.fail_next("domain.zone.version.list").await;

        let mut state = planned(zone, 1, 2);
        assert!(matches!(
            versions.create(&mut state).await,
            Err(ResourceError::Transport(_))
        ));
        assert!(state.id.is_empty());
    }

    #[tokio::test]
    async fn remote_assigned_number_wins() {
        let api = Arc::new(MockGandiApi::new());
        let zone = api.seed_zone("example", &[]).await;
        api.set_version_gap(3).await;
        let versions = ZoneVersionResource::new(api.clone(), VersionNumbering::RemoteAssigned);

        let mut state = planned(zone, 1, 2);
        versions.create(&mut state).await.unwrap();

        assert_eq!(state.zone_version, 5);
        assert_eq!(state.id, format!("{zone}_5"));
    }

    #[tokio::test]
    async fn requested_number_mismatch_removes_clone() {
        let api = Arc::new(MockGandiApi::new());
        let zone = api.seed_zone("example", &[]).await;
        api.set_version_gap(3).await;
        let versions = ZoneVersionResource::new(api.clone(), VersionNumbering::Requested);

        let mut state = planned(zone, 1, 2);
        let err = versions.create(&mut state).await.unwrap_err();

        assert!(matches!(
            err,
            ResourceError::VersionNumberMismatch {
                requested: 2,
                assigned: 5,
                ..
            }
        ));
        assert!(state.id.is_empty());
        assert_eq!(api.versions(zone).await, vec![1]);
    }

    #[tokio::test]
    async fn read_populates_from_id_and_detects_removal() {
        let api = Arc::new(MockGandiApi::new());
        let zone = api.seed_zone("example", &[]).await;
        let versions = ZoneVersionResource::new(api.clone(), VersionNumbering::RemoteAssigned);

        let mut state = versions.import_state(&format!("{zone}_1")).unwrap();
        versions.read(&mut state).await.unwrap();
        assert_eq!((state.zone_id, state.zone_version), (zone, 1));

        let mut gone = versions.import_state(&format!("{zone}_9")).unwrap();
        versions.read(&mut gone).await.unwrap();
        assert!(gone.id.is_empty());

        let mut no_zone = versions.import_state("77_1").unwrap();
        versions.read(&mut no_zone).await.unwrap();
        assert!(no_zone.id.is_empty());
    }

    #[tokio::test]
    async fn update_base_version_replaces_version() {
        let api = Arc::new(MockGandiApi::new());
        let zone = api.seed_zone("example", &[]).await;
        let versions = ZoneVersionResource::new(api.clone(), VersionNumbering::RemoteAssigned);
        let mut prior = planned(zone, 1, 2);
        versions.create(&mut prior).await.unwrap();

        let mut next = prior.clone();
        next.base_version = 2;
        versions.update(&prior, &mut next).await.unwrap();

        assert_eq!(next.id, format!("{zone}_3"));
        assert_eq!(next.zone_version, 3);
        assert_eq!(api.versions(zone).await, vec![1, 3]);
    }

    #[tokio::test]
    async fn requested_numbering_only_binds_creation() {
        let api = Arc::new(MockGandiApi::new());
        let zone = api.seed_zone("example", &[]).await;
        let versions = ZoneVersionResource::new(api.clone(), VersionNumbering::Requested);
        let mut prior = planned(zone, 1, 2);
        versions.create(&mut prior).await.unwrap();
        api.set_version_gap(4).await;

        let mut next = prior.clone();
        next.base_version = 2;
        versions.update(&prior, &mut next).await.unwrap();

        assert_eq!(next.zone_version, 7);
        assert_eq!(next.id, format!("{zone}_7"));
        assert_eq!(api.versions(zone).await, vec![1, 7]);
    }

    #[tokio::test]
    async fn update_without_base_change_is_a_refresh() {
        let api = Arc::new(MockGandiApi::new());
        let zone = api.seed_zone("example", &[]).await;
        let versions = ZoneVersionResource::new(api.clone(), VersionNumbering::RemoteAssigned);
        let mut prior = planned(zone, 1, 2);
        versions.create(&mut prior).await.unwrap();
        api.clear_calls().await;

        let mut next = prior.clone();
        next.id.clear();
        versions.update(&prior, &mut next).await.unwrap();

        assert_eq!(next.id, prior.id);
        assert_eq!(api.calls().await, vec!["domain.zone.version.list"]);
    }

    #[tokio::test]
    async fn delete_version() {
        let api = Arc::new(MockGandiApi::new());
        let zone = api.seed_zone("example", &[]).await;
        let versions = ZoneVersionResource::new(api.clone(), VersionNumbering::RemoteAssigned);
        let mut state = planned(zone, 1, 2);
        versions.create(&mut state).await.unwrap();

        versions.delete(&mut state).await.unwrap();

        assert!(state.id.is_empty());
        assert_eq!(api.versions(zone).await, vec![1]);
    }

    #[tokio::test]
    async fn deleting_the_active_version_surfaces() {
        let api = Arc::new(MockGandiApi::new());
        let zone = api.seed_zone("example", &[]).await;
        let versions = ZoneVersionResource::new(api.clone(), VersionNumbering::RemoteAssigned);
        let mut state = versions.import_state(&format!("{zone}_1")).unwrap();

        assert!(versions.delete(&mut state).await.is_err());
        assert!(!state.id.is_empty());
    }

    #[test]
    fn import_rejects_simple_ids() {
        let versions = ZoneVersionResource::new(
            Arc::new(MockGandiApi::new()),
            VersionNumbering::RemoteAssigned,
        );
        assert!(matches!(
            versions.import_state("1234"),
            Err(ResourceError::MalformedId { .. })
        ));
    }
}
