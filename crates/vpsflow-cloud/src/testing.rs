//! In-memory provider used by the workflow tests

use crate::error::{CloudError, Result};
use crate::provider::{CreateServerRequest, Listing, ListingKind, Record, VpsProvider};
use async_trait::async_trait;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    List(ListingKind),
    Create(CreateServerRequest),
    Destroy(String),
}

/// Serves canned listings and records every call
#[derive(Default)]
pub struct FakeProvider {
    listings: HashMap<ListingKind, Listing>,
    fail_destroy: Option<String>,
    calls: Mutex<Vec<Call>>,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_listing(mut self, kind: ListingKind, listing: Listing) -> Self {
        self.listings.insert(kind, listing);
        self
    }

    /// Make `destroy_server` fail for this subscription id
    pub fn failing_destroy(mut self, subid: &str) -> Self {
        self.fail_destroy = Some(subid.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn created(&self) -> Vec<CreateServerRequest> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Create(request) => Some(request),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl VpsProvider for FakeProvider {
    fn name(&self) -> &str {
        "fake"
    }

    async fn list(&self, kind: ListingKind) -> Result<Listing> {
        self.record(Call::List(kind));
        Ok(self.listings.get(&kind).cloned().unwrap_or_default())
    }

    async fn create_server(&self, request: &CreateServerRequest) -> Result<Record> {
        self.record(Call::Create(request.clone()));
        let subid = 1000 + self.created().len();
        Ok(record(json!({ "SUBID": subid.to_string() })))
    }

    async fn destroy_server(&self, subid: &str) -> Result<()> {
        self.record(Call::Destroy(subid.to_string()));
        if self.fail_destroy.as_deref() == Some(subid) {
            return Err(CloudError::ApiError(format!("cannot destroy {}", subid)));
        }
        Ok(())
    }
}

pub fn record(value: Value) -> Record {
    match value {
        Value::Object(map) => map,
        other => panic!("record must be an object: {}", other),
    }
}

pub fn listing(value: Value) -> Listing {
    Listing::from_value(value).unwrap()
}

/// Regions, plans and operating systems as the provider documents them
pub fn catalog() -> FakeProvider {
    FakeProvider::new()
        .with_listing(
            ListingKind::Regions,
            listing(json!({
                "1": {
                    "DCID": "1", "name": "New Jersey", "country": "US",
                    "continent": "North America", "state": "NJ",
                    "ddos_protection": true, "block_storage": true, "regioncode": "EWR"
                },
                "2": {
                    "DCID": "2", "name": "Chicago", "country": "US",
                    "continent": "North America", "state": "IL",
                    "ddos_protection": false, "block_storage": false, "regioncode": "ORD"
                }
            })),
        )
        .with_listing(
            ListingKind::Plans,
            listing(json!({
                "1": {
                    "VPSPLANID": "1", "name": "Starter", "vcpu_count": "1", "ram": "512",
                    "disk": "20", "bandwidth": "1", "price_per_month": "5.00",
                    "windows": false, "plan_type": "SSD", "available_locations": [1, 2, 3]
                },
                "2": {
                    "VPSPLANID": "2", "name": "Basic", "vcpu_count": "1", "ram": "1024",
                    "disk": "30", "bandwidth": "2", "price_per_month": "8.00",
                    "windows": false, "plan_type": "SATA", "available_locations": [],
                    "deprecated": true
                }
            })),
        )
        .with_listing(
            ListingKind::OperatingSystems,
            listing(json!({
                "127": {
                    "OSID": "127", "name": "CentOS 6 x64", "arch": "x64",
                    "family": "centos", "windows": false
                },
                "148": {
                    "OSID": "148", "name": "Ubuntu 12.04 i386", "arch": "i386",
                    "family": "ubuntu", "windows": false
                }
            })),
        )
}
