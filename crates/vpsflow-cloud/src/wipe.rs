//! Bulk teardown of every server on the account

use crate::error::{CloudError, Result};
use crate::provider::{ListingKind, Record, VpsProvider, record_str, unique_key};
use indexmap::IndexMap;

/// Servers a wipe would destroy: label to SUBID, in listing order
///
/// Unlabeled servers are keyed by their SUBID. Two servers sharing a label
/// are both kept, the later one keyed as `label (SUBID)`.
pub fn wipe_targets(servers: &[Record]) -> Result<IndexMap<String, String>> {
    let mut targets = IndexMap::with_capacity(servers.len());
    for server in servers {
        let subid = record_str(server, "SUBID").ok_or_else(|| CloudError::MissingAttribute {
            field: "server",
            attribute: "SUBID".to_string(),
        })?;
        let label = record_str(server, "label")
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| subid.clone());
        let key = unique_key(&targets, label, &subid);
        targets.insert(key, subid);
    }
    Ok(targets)
}

/// List every server and destroy them one by one
///
/// Returns label to SUBID of the destroyed servers. The first failure
/// aborts; servers destroyed before it stay destroyed.
pub async fn wipe<P>(provider: &P) -> Result<IndexMap<String, String>>
where
    P: VpsProvider + ?Sized,
{
    let servers = provider.list(ListingKind::Servers).await?.into_records();
    let targets = wipe_targets(&servers)?;

    for (label, subid) in &targets {
        provider.destroy_server(subid).await?;
        tracing::info!("Destroyed server {} (SUBID: {})", label, subid);
    }
    Ok(targets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Call, FakeProvider, listing};
    use serde_json::json;

    fn servers() -> FakeProvider {
        FakeProvider::new().with_listing(
            ListingKind::Servers,
            listing(json!({
                "576965": {"SUBID": "576965", "label": "web", "main_ip": "203.0.113.10"},
                "576966": {"SUBID": "576966", "label": "db", "main_ip": "203.0.113.11"}
            })),
        )
    }

    #[tokio::test]
    async fn test_wipe_destroys_in_listing_order() {
        let provider = servers();
        let destroyed = wipe(&provider).await.unwrap();

        assert_eq!(
            destroyed.into_iter().collect::<Vec<_>>(),
            vec![
                ("web".to_string(), "576965".to_string()),
                ("db".to_string(), "576966".to_string())
            ]
        );
        assert_eq!(
            provider.calls(),
            vec![
                Call::List(ListingKind::Servers),
                Call::Destroy("576965".to_string()),
                Call::Destroy("576966".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_wipe_without_servers() {
        let provider = FakeProvider::new();
        assert!(wipe(&provider).await.unwrap().is_empty());
        assert_eq!(provider.calls(), vec![Call::List(ListingKind::Servers)]);
    }

    #[tokio::test]
    async fn test_wipe_stops_at_first_failure() {
        let provider = servers().failing_destroy("576965");
        let err = wipe(&provider).await.unwrap_err();

        assert!(matches!(err, CloudError::ApiError(_)));
        assert_eq!(
            provider.calls(),
            vec![
                Call::List(ListingKind::Servers),
                Call::Destroy("576965".to_string()),
            ]
        );
    }

    #[test]
    fn test_targets_for_unlabeled_and_duplicate_servers() {
        let records = listing(json!({
            "1": {"SUBID": "1", "label": ""},
            "2": {"SUBID": "2", "label": "web"},
            "3": {"SUBID": 3, "label": "web"}
        }))
        .into_records();

        let targets = wipe_targets(&records).unwrap();
        assert_eq!(
            targets.into_iter().collect::<Vec<_>>(),
            vec![
                ("1".to_string(), "1".to_string()),
                ("web".to_string(), "2".to_string()),
                ("web (3)".to_string(), "3".to_string()),
            ]
        );
    }

    #[test]
    fn test_targets_require_subid() {
        let records = listing(json!({"x": {"label": "orphan"}})).into_records();
        assert!(matches!(
            wipe_targets(&records),
            Err(CloudError::MissingAttribute { .. })
        ));
    }
}
