//! Resource queries: one listing call, optionally filtered

use crate::criteria::Criteria;
use crate::error::Result;
use crate::provider::{ListingKind, Record, VpsProvider};

/// Keep the records matching every pair of `criteria`, in order
pub fn filter(records: Vec<Record>, criteria: &Criteria) -> Vec<Record> {
    if criteria.is_empty() {
        return records;
    }
    records.into_iter().filter(|r| criteria.matches(r)).collect()
}

/// List one resource type and filter the records
pub async fn query<P>(provider: &P, kind: ListingKind, criteria: &Criteria) -> Result<Vec<Record>>
where
    P: VpsProvider + ?Sized,
{
    tracing::debug!("Listing {} from {} (criteria: {})", kind, provider.name(), criteria);

    let listing = provider.list(kind).await?;
    if listing.is_empty() {
        return Ok(Vec::new());
    }

    let records = filter(listing.into_records(), criteria);
    tracing::debug!("{} {} matched", records.len(), kind);
    Ok(records)
}

/// Same as [`query`], with the criteria given as a mapping literal
///
/// The literal is parsed before any provider call is made.
pub async fn query_literal<P>(
    provider: &P,
    kind: ListingKind,
    criteria: Option<&str>,
) -> Result<Vec<Record>>
where
    P: VpsProvider + ?Sized,
{
    let criteria = Criteria::parse_optional(criteria)?;
    query(provider, kind, &criteria).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CloudError;
    use crate::testing::{Call, FakeProvider, listing};
    use serde_json::json;

    fn regions() -> FakeProvider {
        FakeProvider::new().with_listing(
            ListingKind::Regions,
            listing(json!({
                "1": {"DCID": "1", "name": "New Jersey", "country": "US", "state": "NJ"},
                "2": {"DCID": "2", "name": "Chicago", "country": "US", "state": "IL"},
                "9": {"DCID": "9", "name": "Frankfurt", "country": "DE", "state": ""}
            })),
        )
    }

    #[tokio::test]
    async fn test_query_without_criteria_returns_everything_in_order() {
        let provider = regions();
        let records = query(&provider, ListingKind::Regions, &Criteria::new())
            .await
            .unwrap();

        let ids: Vec<_> = records.iter().map(|r| r["DCID"].clone()).collect();
        assert_eq!(ids, vec![json!("1"), json!("2"), json!("9")]);
        assert_eq!(provider.calls(), vec![Call::List(ListingKind::Regions)]);
    }

    #[tokio::test]
    async fn test_query_filters_by_every_pair() {
        let provider = regions();
        let criteria = Criteria::new().with("country", "US").with("state", "IL");
        let records = query(&provider, ListingKind::Regions, &criteria)
            .await
            .unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["name"], json!("Chicago"));
    }

    #[tokio::test]
    async fn test_query_excludes_falsy_attributes() {
        let provider = regions();
        let criteria = Criteria::new().with("state", "");
        let records = query(&provider, ListingKind::Regions, &criteria)
            .await
            .unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_query_empty_listing() {
        let provider = FakeProvider::new();
        let records = query(
            &provider,
            ListingKind::Servers,
            &Criteria::new().with("label", "x"),
        )
        .await
        .unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_query_literal() {
        let provider = regions();
        let records = query_literal(&provider, ListingKind::Regions, Some("{'country': 'US'}"))
            .await
            .unwrap();
        assert_eq!(records.len(), 2);

        let unmatched =
            query_literal(&provider, ListingKind::Regions, Some("{'fake key': 'fake value'}"))
                .await
                .unwrap();
        assert!(unmatched.is_empty());
    }

    #[tokio::test]
    async fn test_query_literal_malformed_makes_no_call() {
        let provider = regions();
        let err = query_literal(&provider, ListingKind::Regions, Some("{'country' 'US'}"))
            .await
            .unwrap_err();

        assert!(matches!(err, CloudError::MalformedCriteria { .. }));
        assert!(provider.calls().is_empty());
    }

    #[test]
    fn test_filter_is_subset_in_order() {
        let records: Vec<Record> = listing(json!({
            "a": {"k": "1", "n": "a"},
            "b": {"k": "2", "n": "b"},
            "c": {"k": "1", "n": "c"}
        }))
        .into_records();

        let kept = filter(records.clone(), &Criteria::new().with("k", "1"));
        assert_eq!(kept, vec![records[0].clone(), records[2].clone()]);
        assert_eq!(filter(records.clone(), &Criteria::new()), records);
    }
}
