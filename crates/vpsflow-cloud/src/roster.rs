//! Salt-SSH roster export

use crate::error::Result;
use crate::provider::{ListingKind, VpsProvider, record_str, unique_key};
use indexmap::IndexMap;
use serde::Serialize;

/// Login user written for every host
pub const ROSTER_USER: &str = "root";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RosterEntry {
    pub host: String,
    pub user: String,
}

/// Server label to connection entry
pub type Roster = IndexMap<String, RosterEntry>;

/// Build a roster from the current server listing
///
/// Servers without a main IP are skipped. A label seen before is keyed as
/// `label (SUBID)`.
pub async fn salt_roster<P>(provider: &P) -> Result<Roster>
where
    P: VpsProvider + ?Sized,
{
    let listing = provider.list(ListingKind::Servers).await?;

    let mut roster = Roster::with_capacity(listing.len());
    for (id, server) in listing.iter() {
        let Some(host) = record_str(server, "main_ip").filter(|ip| !ip.is_empty()) else {
            tracing::debug!("Skipping server {} without main_ip", id);
            continue;
        };
        let subid = record_str(server, "SUBID").unwrap_or_else(|| id.clone());
        let label = record_str(server, "label")
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| subid.clone());
        let key = unique_key(&roster, label, &subid);
        roster.insert(
            key,
            RosterEntry {
                host,
                user: ROSTER_USER.to_string(),
            },
        );
    }
    Ok(roster)
}
