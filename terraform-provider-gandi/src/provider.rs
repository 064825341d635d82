//! JSON entry point used by the plugin host
//!
//! States cross the boundary as JSON objects. They are checked against the
//! resource schema, decoded into the typed state of the resource kind, handed
//! to its adapter and encoded back.

use std::sync::Arc;

use gandi_api::GandiApi;
use serde_json::Value;

use crate::config::ProviderConfig;
use crate::error::{ResourceError, Result};
use crate::resources::{
    RECORD, RecordResource, Resource, ResourceState, ZONE, ZONE_VERSION, ZoneResource,
    ZoneVersionResource,
};
use crate::schema::{AttributeType, ProviderSchema, ResourceSchema};

/// Resource kinds handled by the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ResourceKind {
    Zone,
    ZoneVersion,
    Record,
}

impl ResourceKind {
    fn from_type(resource_type: &str) -> Result<Self> {
        match resource_type {
            ZONE => Ok(Self::Zone),
            ZONE_VERSION => Ok(Self::ZoneVersion),
            RECORD => Ok(Self::Record),
            other => Err(ResourceError::UnknownResourceType(other.to_string())),
        }
    }
}

/// Run `$body` with `$resource` bound to the adapter of `$kind`
macro_rules! dispatch {
    ($self:ident, $kind:expr, $resource:ident => $body:expr) => {
        match $kind {
            ResourceKind::Zone => {
                let $resource = &$self.zones;
                $body
            }
            ResourceKind::ZoneVersion => {
                let $resource = &$self.zone_versions;
                $body
            }
            ResourceKind::Record => {
                let $resource = &$self.records;
                $body
            }
        }
    };
}

pub struct Provider {
    config: ProviderConfig,
    schema: ProviderSchema,
    zones: ZoneResource,
    zone_versions: ZoneVersionResource,
    records: RecordResource,
}

impl Provider {
    /// Provider talking to the Gandi endpoint selected by `config`
    pub fn new(config: ProviderConfig) -> Self {
        let api = config.client();
        Self::with_client(config, api)
    }

    /// Provider over an existing client
    pub fn with_client(config: ProviderConfig, api: Arc<dyn GandiApi>) -> Self {
        log::debug!("Gandi provider using endpoint {}", api.endpoint());
        Self {
            zones: ZoneResource::new(api.clone()),
            zone_versions: ZoneVersionResource::new(api.clone(), config.version_numbering),
            records: RecordResource::new(api, config.record_update_mode),
            schema: ProviderSchema::gandi(),
            config,
        }
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    pub fn schema(&self) -> &ProviderSchema {
        &self.schema
    }

    /// Create a resource from its planned state; returns the new state
    pub async fn create(&self, resource_type: &str, planned: Value) -> Result<Value> {
        let result = async {
            let kind = ResourceKind::from_type(resource_type)?;
            let schema = self.schema.resource(resource_type)?;
            dispatch!(self, kind, resource => create_with(resource, schema, planned).await)
        }
        .await;
        logged("create", resource_type, result)
    }

    /// Refresh a resource; `None` when it no longer exists
    pub async fn read(&self, resource_type: &str, state: Value) -> Result<Option<Value>> {
        let result = async {
            let kind = ResourceKind::from_type(resource_type)?;
            let schema = self.schema.resource(resource_type)?;
            dispatch!(self, kind, resource => read_with(resource, schema, state).await)
        }
        .await;
        logged("read", resource_type, result)
    }

    /// Apply the planned state over the prior one; returns the new state
    pub async fn update(&self, resource_type: &str, prior: Value, planned: Value) -> Result<Value> {
        let result = async {
            let kind = ResourceKind::from_type(resource_type)?;
            let schema = self.schema.resource(resource_type)?;
            dispatch!(self, kind, resource => update_with(resource, schema, prior, planned).await)
        }
        .await;
        logged("update", resource_type, result)
    }

    pub async fn delete(&self, resource_type: &str, state: Value) -> Result<()> {
        let result = async {
            let kind = ResourceKind::from_type(resource_type)?;
            let schema = self.schema.resource(resource_type)?;
            dispatch!(self, kind, resource => delete_with(resource, schema, state).await)
        }
        .await;
        logged("delete", resource_type, result)
    }

    /// Read an existing remote entity from an import id
    ///
    /// | Resource | Import id |
    /// |----------|-----------|
    /// | `gandi_zone` | `{zone_id}` |
    /// | `gandi_zone_version` | `{zone_id}_{version}` |
    /// | `gandi_record` | `{zone_id}_{record_id}` or `{zone_id}_{version}_{record_id}` |
    pub async fn import(&self, resource_type: &str, import_id: &str) -> Result<Option<Value>> {
        let result = async {
            let kind = ResourceKind::from_type(resource_type)?;
            let schema = self.schema.resource(resource_type)?;
            dispatch!(self, kind, resource => import_with(resource, schema, import_id).await)
        }
        .await;
        logged("import", resource_type, result)
    }

    /// Changed attributes that force a replacement
    ///
    /// An optional computed attribute left unset in `planned` keeps its prior
    /// value and never forces a replacement.
    pub fn requires_replace(
        &self,
        resource_type: &str,
        prior: &Value,
        planned: &Value,
    ) -> Result<Vec<String>> {
        let schema = self.schema.resource(resource_type)?;
        Ok(schema
            .force_new_attributes()
            .filter(|attr| !(attr.computed && is_unset(planned.get(attr.name))))
            .filter(|attr| {
                normalize(attr.kind, prior.get(attr.name))
                    != normalize(attr.kind, planned.get(attr.name))
            })
            .map(|attr| attr.name.to_string())
            .collect())
    }
}

fn logged<T>(verb: &str, resource_type: &str, result: Result<T>) -> Result<T> {
    if let Err(e) = &result {
        if e.is_expected() {
            log::warn!("{verb} {resource_type} failed: {e}");
        } else {
            log::error!("{verb} {resource_type} failed: {e}");
        }
    }
    result
}

fn is_unset(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}

/// Integers compare by value: `"5"`, `5` and `" 5"` are equal, unset is `0`
fn normalize(kind: AttributeType, value: Option<&Value>) -> Option<String> {
    let value = value.filter(|v| !v.is_null());
    match (kind, value) {
        (AttributeType::Int, None) => Some("0".to_string()),
        (AttributeType::Int, Some(Value::String(s))) => Some(
            s.trim()
                .parse::<i64>()
                .map_or_else(|_| s.clone(), |n| n.to_string()),
        ),
        (_, Some(Value::String(s))) => Some(s.clone()),
        (_, other) => other.map(Value::to_string),
    }
}

fn decode<S: ResourceState>(schema: &ResourceSchema, value: Value) -> Result<S> {
    serde_json::from_value(value).map_err(|e| ResourceError::invalid_field(schema.name, e))
}

fn encode<S: ResourceState>(schema: &ResourceSchema, state: &S) -> Result<Value> {
    serde_json::to_value(state).map_err(|e| ResourceError::invalid_field(schema.name, e))
}

async fn create_with<R: Resource>(
    resource: &R,
    schema: &ResourceSchema,
    planned: Value,
) -> Result<Value> {
    schema.check_state(&planned)?;
    let mut state: R::State = decode(schema, planned)?;
    resource.create(&mut state).await?;
    encode(schema, &state)
}

async fn read_with<R: Resource>(
    resource: &R,
    schema: &ResourceSchema,
    state: Value,
) -> Result<Option<Value>> {
    let mut state: R::State = decode(schema, state)?;
    resource.read(&mut state).await?;
    if state.id().is_empty() {
        return Ok(None);
    }
    encode(schema, &state).map(Some)
}

async fn update_with<R: Resource>(
    resource: &R,
    schema: &ResourceSchema,
    prior: Value,
    planned: Value,
) -> Result<Value> {
    schema.check_state(&planned)?;
    let prior: R::State = decode(schema, prior)?;
    let mut planned: R::State = decode(schema, planned)?;
    resource.update(&prior, &mut planned).await?;
    encode(schema, &planned)
}

async fn delete_with<R: Resource>(resource: &R, schema: &ResourceSchema, state: Value) -> Result<()> {
    let mut state: R::State = decode(schema, state)?;
    resource.delete(&mut state).await
}

async fn import_with<R: Resource>(
    resource: &R,
    schema: &ResourceSchema,
    import_id: &str,
) -> Result<Option<Value>> {
    let mut state = resource.import_state(import_id)?;
    resource.read(&mut state).await?;
    if state.id().is_empty() {
        return Ok(None);
    }
    encode(schema, &state).map(Some)
}
