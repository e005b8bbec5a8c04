//! Vultr provider implementation

use crate::client::{ServerListFilter, VultrClient};
use async_trait::async_trait;
use serde_json::Value;
use vpsflow_cloud::{CloudError, CreateServerRequest, Listing, ListingKind, Record, VpsProvider};

/// Vultr provider
pub struct VultrProvider {
    client: VultrClient,
}

impl VultrProvider {
    pub fn new(client: VultrClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &VultrClient {
        &self.client
    }
}

#[async_trait]
impl VpsProvider for VultrProvider {
    fn name(&self) -> &str {
        "vultr"
    }

    async fn list(&self, kind: ListingKind) -> vpsflow_cloud::Result<Listing> {
        let client = &self.client;
        let value = match kind {
            ListingKind::Apps => client.app_list().await,
            ListingKind::Backups => client.backup_list().await,
            ListingKind::DnsDomains => client.dns_list().await,
            ListingKind::Isos => client.iso_list().await,
            ListingKind::OperatingSystems => client.os_list().await,
            ListingKind::Plans => client.plans_list().await,
            ListingKind::Regions => client.regions_list().await,
            ListingKind::Servers => client.server_list(&ServerListFilter::default()).await,
            ListingKind::Snapshots => client.snapshot_list().await,
            ListingKind::SshKeys => client.sshkey_list().await,
            ListingKind::StartupScripts => client.startupscript_list().await,
        }
        .map_err(|e| CloudError::ApiError(e.to_string()))?;

        Listing::from_value(value)
    }

    async fn create_server(&self, request: &CreateServerRequest) -> vpsflow_cloud::Result<Record> {
        let value = self
            .client
            .server_create(request)
            .await
            .map_err(|e| CloudError::ApiError(e.to_string()))?;

        match value {
            Value::Object(record) => Ok(record),
            other => Err(CloudError::UnexpectedResponse(format!(
                "server/create returned {}",
                other
            ))),
        }
    }

    async fn destroy_server(&self, subid: &str) -> vpsflow_cloud::Result<()> {
        self.client
            .server_destroy(subid)
            .await
            .map_err(|e| CloudError::ApiError(e.to_string()))?;
        Ok(())
    }
}
