//! vpsflow core
//!
//! Provider abstraction plus the workflows built on top of it: resource
//! queries, criteria resolution, provisioning, wipe and roster export.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                   vps CLI                        │
//! │         (provision / wipe / roster / list)       │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │                vpsflow-cloud                     │
//! │  ┌──────────────┐  ┌──────────────┐             │
//! │  │   document   │  │   criteria   │             │
//! │  └──────┬───────┘  └──────┬───────┘             │
//! │  ┌──────▼─────────────────▼───────┐             │
//! │  │   provision ─► resolver ─► query│             │
//! │  └──────────────┬─────────────────┘             │
//! │  ┌──────────────▼─────────────────┐             │
//! │  │   trait VpsProvider { ... }    │             │
//! │  └────────────────────────────────┘             │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//!           ┌───────▼───────┐
//!           │ vpsflow-cloud │
//!           │    -vultr     │
//!           └───────────────┘
//! ```

pub mod criteria;
pub mod document;
pub mod error;
pub mod provider;
pub mod provision;
pub mod query;
pub mod resolver;
pub mod roster;
pub mod wipe;

#[cfg(test)]
pub(crate) mod testing;

// Re-exports
pub use criteria::Criteria;
pub use document::{ProvisionDocument, Resolvable, ResolvableField, ServerSpec};
pub use error::{CloudError, Result};
pub use provider::{
    CreateServerRequest, Listing, ListingKind, Record, VpsProvider, record_str, scalar_to_string,
    unique_key,
};
pub use provision::{ProvisionedServer, provision, provision_text};
pub use query::{filter, query, query_literal};
pub use resolver::resolve;
pub use roster::{ROSTER_USER, Roster, RosterEntry, salt_roster};
pub use wipe::{wipe, wipe_targets};
