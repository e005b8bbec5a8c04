//! Provisioning workflow

use crate::document::{ProvisionDocument, ResolvableField, ServerSpec};
use crate::error::Result;
use crate::provider::{CreateServerRequest, VpsProvider, record_str};
use crate::resolver::resolve;
use serde::Serialize;

/// One server created by [`provision`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProvisionedServer {
    pub label: String,
    /// Subscription id reported by the provider, when it reports one
    pub subid: Option<String>,
}

/// Create every server of the document, in document order
///
/// Each label resolves region, plan and OS one after the other and then
/// issues a single create call. The first failure aborts the run; servers
/// created before it stay created.
pub async fn provision<P>(provider: &P, document: &ProvisionDocument) -> Result<Vec<ProvisionedServer>>
where
    P: VpsProvider + ?Sized,
{
    let mut created = Vec::with_capacity(document.len());
    for spec in document.servers() {
        let request = build_request(provider, spec).await?;
        let response = provider.create_server(&request).await?;
        let subid = record_str(&response, "SUBID");

        tracing::info!(
            "Created server {} (SUBID: {})",
            spec.label,
            subid.as_deref().unwrap_or("-")
        );
        created.push(ProvisionedServer {
            label: spec.label.clone(),
            subid,
        });
    }
    Ok(created)
}

/// Parse a YAML document and provision it
pub async fn provision_text<P>(provider: &P, text: &str) -> Result<Vec<ProvisionedServer>>
where
    P: VpsProvider + ?Sized,
{
    let document = ProvisionDocument::parse(text)?;
    provision(provider, &document).await
}

async fn build_request<P>(provider: &P, spec: &ServerSpec) -> Result<CreateServerRequest>
where
    P: VpsProvider + ?Sized,
{
    // Region, then plan, then OS
    let mut ids: [String; 3] = Default::default();
    for (slot, field) in ids.iter_mut().zip(ResolvableField::ALL) {
        *slot = resolve(provider, field, spec.resolvable(field)).await?;
    }
    let [dcid, vpsplanid, osid] = ids;

    let mut request = CreateServerRequest::new(dcid, vpsplanid, osid);
    request.params = spec.params.clone();
    request.params.insert("label".to_string(), spec.label.clone());
    Ok(request)
}
