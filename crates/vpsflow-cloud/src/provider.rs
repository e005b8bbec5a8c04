//! VPS provider trait definition

use crate::error::{CloudError, Result};
use async_trait::async_trait;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single resource record as returned by a listing call
///
/// Records are flat: attribute name to scalar value.
pub type Record = serde_json::Map<String, Value>;

/// VPS provider abstraction trait
///
/// The workflows in this crate only talk to the provider through this trait,
/// so they can be exercised against an in-memory implementation.
#[async_trait]
pub trait VpsProvider: Send + Sync {
    /// Returns the provider name (e.g., "vultr")
    fn name(&self) -> &str;

    /// Perform one listing call
    async fn list(&self, kind: ListingKind) -> Result<Listing>;

    /// Create a server; the returned record holds at least `SUBID`
    async fn create_server(&self, request: &CreateServerRequest) -> Result<Record>;

    /// Destroy a server by subscription id
    async fn destroy_server(&self, subid: &str) -> Result<()>;
}

/// Listable resource types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingKind {
    Apps,
    Backups,
    DnsDomains,
    Isos,
    OperatingSystems,
    Plans,
    Regions,
    Servers,
    Snapshots,
    SshKeys,
    StartupScripts,
}

impl ListingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingKind::Apps => "apps",
            ListingKind::Backups => "backups",
            ListingKind::DnsDomains => "dns domains",
            ListingKind::Isos => "isos",
            ListingKind::OperatingSystems => "operating systems",
            ListingKind::Plans => "plans",
            ListingKind::Regions => "regions",
            ListingKind::Servers => "servers",
            ListingKind::Snapshots => "snapshots",
            ListingKind::SshKeys => "ssh keys",
            ListingKind::StartupScripts => "startup scripts",
        }
    }
}

impl std::fmt::Display for ListingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a listing call: record id to record, in provider order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Listing(IndexMap<String, Record>);

impl Listing {
    /// Build a listing from a provider response body
    ///
    /// Accepts an object of objects (keyed listing), an array of objects
    /// (keyed by position) or `null`. The provider answers `[]` for an empty
    /// keyed listing, which ends up empty either way.
    pub fn from_value(value: Value) -> Result<Self> {
        let entries: Vec<(String, Value)> = match value {
            Value::Null => Vec::new(),
            Value::Object(map) => map.into_iter().collect(),
            Value::Array(items) => items
                .into_iter()
                .enumerate()
                .map(|(i, item)| (i.to_string(), item))
                .collect(),
            other => {
                return Err(CloudError::UnexpectedResponse(format!(
                    "expected a listing, got {}",
                    other
                )));
            }
        };

        entries
            .into_iter()
            .map(|(id, item)| match item {
                Value::Object(record) => Ok((id, record)),
                other => Err(CloudError::UnexpectedResponse(format!(
                    "listing entry '{}' is not an object: {}",
                    id, other
                ))),
            })
            .collect()
    }

    pub fn get(&self, id: &str) -> Option<&Record> {
        self.0.get(id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Record)> {
        self.0.iter()
    }

    /// Drop the ids and keep the records, in listing order
    pub fn into_records(self) -> Vec<Record> {
        self.0.into_values().collect()
    }
}

impl FromIterator<(String, Record)> for Listing {
    fn from_iter<I: IntoIterator<Item = (String, Record)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Parameters of a create-server call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateServerRequest {
    /// Data-center id
    pub dcid: String,

    /// Plan id
    pub vpsplanid: String,

    /// Operating system id
    pub osid: String,

    /// Extra create-time parameters, passed through verbatim
    pub params: IndexMap<String, String>,
}

impl CreateServerRequest {
    pub fn new(
        dcid: impl Into<String>,
        vpsplanid: impl Into<String>,
        osid: impl Into<String>,
    ) -> Self {
        Self {
            dcid: dcid.into(),
            vpsplanid: vpsplanid.into(),
            osid: osid.into(),
            params: IndexMap::new(),
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

/// Render a scalar JSON value as the string the provider expects
///
/// Returns `None` for `null`, arrays and objects.
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Read a scalar attribute of a record as a string
pub fn record_str(record: &Record, key: &str) -> Option<String> {
    record.get(key).and_then(scalar_to_string)
}

/// Key not yet used in `map`: `key`, else `key (tag)`, else `key (tag #n)`
///
/// Keeps every record visible when labels collide in a keyed output.
pub fn unique_key<V>(map: &IndexMap<String, V>, key: String, tag: &str) -> String {
    if !map.contains_key(&key) {
        return key;
    }
    let tagged = format!("{} ({})", key, tag);
    if !map.contains_key(&tagged) {
        return tagged;
    }
    (2..)
        .map(|n| format!("{} ({} #{})", key, tag, n))
        .find(|k| !map.contains_key(k))
        .unwrap_or(tagged)
}
