//! Vultr provider for vpsflow
//!
//! This crate implements the `VpsProvider` trait on top of the Vultr v1 API
//! and exposes the raw client for the resource commands of the CLI.
//!
//! # Requirements
//!
//! - An API key with access enabled for the calling IP address
//!
//! # Example
//!
//! ```ignore
//! use vpsflow_cloud::{ProvisionDocument, provision};
//! use vpsflow_cloud_vultr::{VultrClient, VultrProvider};
//!
//! let provider = VultrProvider::new(VultrClient::new(api_key));
//!
//! let document = ProvisionDocument::parse(&text)?;
//! for server in provision(&provider, &document).await? {
//!     println!("{} -> {:?}", server.label, server.subid);
//! }
//! ```

pub mod client;
pub mod error;
pub mod provider;

pub use client::{
    DnsRecordRequest, ServerListFilter, VULTR_API_BASE, VultrClient, create_server_form,
};
pub use error::{Result, VultrError};
pub use provider::VultrProvider;
