//! Resolve a field to a concrete provider id

use crate::document::{Resolvable, ResolvableField};
use crate::error::{CloudError, Result};
use crate::provider::{VpsProvider, record_str};
use crate::query::query;

/// Turn a resolvable field into an id
///
/// A concrete id is returned as-is without any provider call. A filter is
/// run against the field's listing and must match exactly one record.
pub async fn resolve<P>(
    provider: &P,
    field: ResolvableField,
    resolvable: &Resolvable,
) -> Result<String>
where
    P: VpsProvider + ?Sized,
{
    let criteria = match resolvable {
        Resolvable::Identifier(id) => return Ok(id.clone()),
        Resolvable::Filter(criteria) => criteria,
    };

    let mut candidates = query(provider, field.listing(), criteria).await?;
    match candidates.len() {
        0 => Err(CloudError::NoMatch {
            field: field.dynamic_key(),
            criteria: criteria.to_string(),
        }),
        1 => {
            let record = candidates.remove(0);
            let attribute = field.id_attribute();
            let id = record_str(&record, &attribute).ok_or(CloudError::MissingAttribute {
                field: field.dynamic_key(),
                attribute,
            })?;
            tracing::debug!("Resolved {} {} to {}", field.dynamic_key(), criteria, id);
            Ok(id)
        }
        _ => Err(CloudError::AmbiguousCriteria {
            field: field.dynamic_key(),
            criteria: criteria.to_string(),
        }),
    }
}
