//! Schema surface exposed to the host
//!
//! Numeric attributes are declared [`AttributeType::Int`] and accept both JSON
//! integers and integer strings.

use std::collections::HashSet;

use serde::Serialize;

use crate::config::{KEY_ENV, TESTING_ENV};
use crate::error::{ResourceError, Result};
use crate::resources::{RECORD, ZONE, ZONE_VERSION};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeType {
    String,
    Int,
    Bool,
}

impl AttributeType {
    fn label(self) -> &'static str {
        match self {
            Self::String => "a non-empty string",
            Self::Int => "an integer",
            Self::Bool => "a boolean",
        }
    }
}

/// One attribute of a resource or of the provider block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub kind: AttributeType,
    pub required: bool,
    pub optional: bool,
    pub computed: bool,
    /// A change forces the resource to be replaced
    pub force_new: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub env_default: Option<&'static str>,
    pub description: &'static str,
}

impl Attribute {
    const fn new(name: &'static str, kind: AttributeType) -> Self {
        Self {
            name,
            kind,
            required: false,
            optional: false,
            computed: false,
            force_new: false,
            env_default: None,
            description: "",
        }
    }

    pub const fn required(name: &'static str, kind: AttributeType) -> Self {
        let mut attr = Self::new(name, kind);
        attr.required = true;
        attr
    }

    pub const fn optional(name: &'static str, kind: AttributeType) -> Self {
        let mut attr = Self::new(name, kind);
        attr.optional = true;
        attr
    }

    pub const fn computed(name: &'static str, kind: AttributeType) -> Self {
        let mut attr = Self::new(name, kind);
        attr.computed = true;
        attr
    }

    /// Optional attribute the provider fills in when left unset
    pub const fn also_computed(mut self) -> Self {
        self.computed = true;
        self
    }

    pub const fn force_new(mut self) -> Self {
        self.force_new = true;
        self
    }

    pub const fn env(mut self, var: &'static str) -> Self {
        self.env_default = Some(var);
        self
    }

    pub const fn describe(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ResourceSchema {
    pub name: &'static str,
    pub attributes: Vec<Attribute>,
}

impl ResourceSchema {
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Attributes whose change forces a replacement
    pub fn force_new_attributes(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.iter().filter(|a| a.force_new)
    }

    /// Check that `state` is an object holding every required attribute with
    /// a value of the declared type
    pub fn check_state(&self, state: &serde_json::Value) -> Result<()> {
        let Some(object) = state.as_object() else {
            return Err(ResourceError::invalid_field(
                self.name,
                "state must be a JSON object",
            ));
        };

        for attr in &self.attributes {
            let value = object.get(attr.name).filter(|v| !v.is_null());
            let Some(value) = value else {
                if attr.required {
                    return Err(ResourceError::invalid_field(
                        attr.name,
                        "required attribute is missing",
                    ));
                }
                continue;
            };
            check_value(attr, value)?;
        }
        Ok(())
    }
}

fn check_value(attr: &Attribute, value: &serde_json::Value) -> Result<()> {
    use serde_json::Value;

    let ok = match (attr.kind, value) {
        (AttributeType::String, Value::String(s)) => !attr.required || !s.is_empty(),
        (AttributeType::Bool, Value::Bool(_)) => true,
        (AttributeType::Int, Value::Number(n)) => n.is_i64(),
        (AttributeType::Int, Value::String(s)) if s.trim().is_empty() => !attr.required,
        (AttributeType::Int, Value::String(s)) => s.trim().parse::<i64>().is_ok(),
        _ => false,
    };

    if ok {
        Ok(())
    } else {
        Err(ResourceError::invalid_field(
            attr.name,
            format!("expected {}, got {value}", attr.kind.label()),
        ))
    }
}

/// Provider block and resource kinds
#[derive(Debug, Clone, Serialize)]
pub struct ProviderSchema {
    pub provider: Vec<Attribute>,
    pub resources: Vec<ResourceSchema>,
}

impl ProviderSchema {
    pub fn gandi() -> Self {
        use AttributeType::{Bool, Int, String};

        Self {
            provider: vec![
                Attribute::optional("key", String)
                    .env(KEY_ENV)
                    .describe("Gandi API key"),
                Attribute::optional("testing", Bool)
                    .env(TESTING_ENV)
                    .describe("Use the OTE sandbox endpoint (default true)"),
            ],
            resources: vec![
                ResourceSchema {
                    name: ZONE,
                    attributes: vec![
                        Attribute::required("name", String).force_new(),
                        Attribute::optional("domain_id", Int),
                        Attribute::computed("active_version", Int)
                            .describe("Version currently served"),
                    ],
                },
                ResourceSchema {
                    name: ZONE_VERSION,
                    attributes: vec![
                        Attribute::required("zone_id", Int).force_new(),
                        Attribute::required("base_version", Int)
                            .describe("Version the new one is cloned from"),
                        Attribute::required("zone_version", Int).force_new(),
                    ],
                },
                ResourceSchema {
                    name: RECORD,
                    attributes: vec![
                        Attribute::required("name", String),
                        Attribute::required("zone_id", Int).force_new(),
                        Attribute::optional("version", Int)
                            .also_computed()
                            .force_new()
                            .describe("Zone version; 0 or unset follows the active version"),
                        Attribute::computed("follows_active", Bool)
                            .describe("Whether the record tracks the active version"),
                        Attribute::required("type", String),
                        Attribute::required("value", String),
                        Attribute::required("ttl", Int),
                    ],
                },
            ],
        }
    }

    pub fn resource(&self, name: &str) -> Result<&ResourceSchema> {
        self.resources
            .iter()
            .find(|r| r.name == name)
            .ok_or_else(|| ResourceError::UnknownResourceType(name.to_string()))
    }

    /// Internal consistency check of the schema
    pub fn validate(&self) -> Result<()> {
        let mut names = HashSet::new();
        for resource in &self.resources {
            if !resource.name.starts_with("gandi_") {
                return Err(ResourceError::Config(format!(
                    "resource '{}' must be prefixed with 'gandi_'",
                    resource.name
                )));
            }
            if !names.insert(resource.name) {
                return Err(ResourceError::Config(format!(
                    "resource '{}' declared twice",
                    resource.name
                )));
            }
            validate_attributes(resource.name, &resource.attributes)?;
        }
        validate_attributes("provider", &self.provider)
    }
}

fn validate_attributes(owner: &str, attributes: &[Attribute]) -> Result<()> {
    let mut seen = HashSet::new();
    for attr in attributes {
        let fail = |reason: &str| {
            Err(ResourceError::Config(format!(
                "{owner}.{}: {reason}",
                attr.name
            )))
        };

        if attr.name == "id" {
            return fail("'id' is reserved");
        }
        if !seen.insert(attr.name) {
            return fail("declared twice");
        }
        if attr.required && attr.optional {
            return fail("required and optional are mutually exclusive");
        }
        if attr.required && attr.computed {
            return fail("required and computed are mutually exclusive");
        }
        if !attr.required && !attr.optional && !attr.computed {
            return fail("one of required, optional or computed must be set");
        }
        if attr.computed && !attr.optional && attr.force_new {
            return fail("computed-only attributes cannot force a replacement");
        }
        if attr.required && attr.env_default.is_some() {
            return fail("an environment default makes no sense on a required attribute");
        }
    }
    Ok(())
}
