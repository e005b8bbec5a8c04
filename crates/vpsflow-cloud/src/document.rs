//! Provisioning document
//!
//! The document maps server labels to server definitions:
//!
//! ```yaml
//! web-1:
//!   region:
//!     name: New Jersey
//!   vpsplanid: "201"
//!   os:
//!     family: ubuntu
//!     arch: x64
//!   scriptid: "123"
//! ```
//!
//! Each of the three resolvable fields is given either as a concrete id
//! (`dcid`, `vpsplanid`, `osid`) or as a criteria filter (`region`, `plan`,
//! `os`). Everything else is passed to the create call as-is.

use crate::criteria::Criteria;
use crate::error::{CloudError, Result};
use crate::provider::ListingKind;
use indexmap::IndexMap;
use serde_yaml::{Mapping, Value};

/// A field given either as a concrete id or as a filter to resolve
#[derive(Debug, Clone, PartialEq)]
pub enum Resolvable {
    Identifier(String),
    Filter(Criteria),
}

/// The three fields resolved before a server can be created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolvableField {
    Region,
    Plan,
    Os,
}

impl ResolvableField {
    pub const ALL: [ResolvableField; 3] = [
        ResolvableField::Region,
        ResolvableField::Plan,
        ResolvableField::Os,
    ];

    /// Key holding a concrete id
    pub fn static_key(&self) -> &'static str {
        match self {
            ResolvableField::Region => "dcid",
            ResolvableField::Plan => "vpsplanid",
            ResolvableField::Os => "osid",
        }
    }

    /// Key holding a criteria filter
    pub fn dynamic_key(&self) -> &'static str {
        match self {
            ResolvableField::Region => "region",
            ResolvableField::Plan => "plan",
            ResolvableField::Os => "os",
        }
    }

    /// Listing searched when the field is given as a filter
    pub fn listing(&self) -> ListingKind {
        match self {
            ResolvableField::Region => ListingKind::Regions,
            ResolvableField::Plan => ListingKind::Plans,
            ResolvableField::Os => ListingKind::OperatingSystems,
        }
    }

    /// Attribute carrying the id in listing records
    ///
    /// Provider-returned ids are upper-case (`dcid` -> `DCID`).
    pub fn id_attribute(&self) -> String {
        self.static_key().to_uppercase()
    }
}

/// One server definition, decoded
#[derive(Debug, Clone, PartialEq)]
pub struct ServerSpec {
    pub label: String,
    pub dcid: Resolvable,
    pub vpsplanid: Resolvable,
    pub osid: Resolvable,

    /// Remaining create-time parameters, in document order
    pub params: IndexMap<String, String>,
}

impl ServerSpec {
    /// Decode a server definition, consuming the resolvable keys
    pub fn from_mapping(label: &str, mut mapping: Mapping) -> Result<Self> {
        let dcid = take_resolvable(label, &mut mapping, ResolvableField::Region)?;
        let vpsplanid = take_resolvable(label, &mut mapping, ResolvableField::Plan)?;
        let osid = take_resolvable(label, &mut mapping, ResolvableField::Os)?;

        let mut params = IndexMap::new();
        for (key, value) in mapping {
            let key = scalar_string(&key).ok_or_else(|| {
                CloudError::InvalidConfig(format!("{}: parameter names must be scalars", label))
            })?;
            if value.is_null() {
                continue;
            }
            let value = param_value(&value).ok_or_else(|| {
                CloudError::InvalidConfig(format!("{}: parameter '{}' must be a scalar", label, key))
            })?;
            params.insert(key, value);
        }

        Ok(Self {
            label: label.to_string(),
            dcid,
            vpsplanid,
            osid,
            params,
        })
    }

    pub fn resolvable(&self, field: ResolvableField) -> &Resolvable {
        match field {
            ResolvableField::Region => &self.dcid,
            ResolvableField::Plan => &self.vpsplanid,
            ResolvableField::Os => &self.osid,
        }
    }
}

/// Labeled server definitions in document order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProvisionDocument {
    servers: Vec<ServerSpec>,
}

impl ProvisionDocument {
    /// Parse a YAML document; empty input is an empty document
    pub fn parse(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }

        let root: Value = serde_yaml::from_str(text)?;
        let mapping = match root {
            Value::Null => return Ok(Self::default()),
            Value::Mapping(mapping) => mapping,
            _ => {
                return Err(CloudError::InvalidConfig(
                    "top level must map server labels to definitions".to_string(),
                ));
            }
        };

        let mut servers = Vec::with_capacity(mapping.len());
        for (key, value) in mapping {
            let label = scalar_string(&key).ok_or_else(|| {
                CloudError::InvalidConfig("server labels must be scalars".to_string())
            })?;
            let body = match value {
                Value::Mapping(body) => body,
                Value::Null => Mapping::new(),
                _ => {
                    return Err(CloudError::InvalidConfig(format!(
                        "{}: server definition must be a mapping",
                        label
                    )));
                }
            };
            servers.push(ServerSpec::from_mapping(&label, body)?);
        }

        Ok(Self { servers })
    }

    pub fn servers(&self) -> &[ServerSpec] {
        &self.servers
    }

    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.servers.len()
    }
}

/// Remove both keys of a field and decide which form applies
///
/// A usable static id wins; a redundant filter next to it is dropped.
fn take_resolvable(
    label: &str,
    mapping: &mut Mapping,
    field: ResolvableField,
) -> Result<Resolvable> {
    let static_value = mapping.shift_remove(field.static_key());
    let dynamic_value = mapping
        .shift_remove(field.dynamic_key())
        .filter(|v| !v.is_null());

    let id = static_value
        .as_ref()
        .map(|v| static_id(label, field, v))
        .transpose()?
        .flatten();

    if let Some(id) = id {
        if dynamic_value.is_some() {
            tracing::warn!(
                "{}: '{}' is ignored because '{}' is set",
                label,
                field.dynamic_key(),
                field.static_key()
            );
        }
        return Ok(Resolvable::Identifier(id));
    }

    match dynamic_value {
        None => Err(CloudError::MissingField {
            label: label.to_string(),
            static_key: field.static_key(),
            dynamic_key: field.dynamic_key(),
        }),
        Some(Value::String(literal)) => Ok(Resolvable::Filter(literal.parse()?)),
        Some(value @ Value::Mapping(_)) => serde_yaml::from_value(value)
            .map(Resolvable::Filter)
            .map_err(|e| {
                CloudError::InvalidConfig(format!(
                    "{}: '{}' is not a valid filter: {}",
                    label,
                    field.dynamic_key(),
                    e
                ))
            }),
        Some(_) => Err(CloudError::InvalidConfig(format!(
            "{}: '{}' must be a mapping of attribute to value",
            label,
            field.dynamic_key()
        ))),
    }
}

/// A static id; `null`, `false`, `0` and `""` count as absent
fn static_id(label: &str, field: ResolvableField, value: &Value) -> Result<Option<String>> {
    match value {
        Value::Null | Value::Bool(false) => Ok(None),
        Value::Number(n) if n.as_f64() == Some(0.0) => Ok(None),
        Value::String(s) if s.is_empty() => Ok(None),
        Value::String(_) | Value::Number(_) | Value::Bool(true) => Ok(scalar_string(value)),
        _ => Err(CloudError::InvalidConfig(format!(
            "{}: '{}' must be a scalar id",
            label,
            field.static_key()
        ))),
    }
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Parameter values; booleans use the provider's yes/no spelling
fn param_value(value: &Value) -> Option<String> {
    match value {
        Value::Bool(true) => Some("yes".to_string()),
        Value::Bool(false) => Some("no".to_string()),
        other => scalar_string(other),
    }
}
