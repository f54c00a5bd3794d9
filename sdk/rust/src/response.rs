//! Projection of response envelopes onto typed entities.
//!
//! An envelope looks like
//! `{ "<operation>": { "data": { "<tag>": ... }, "errors": { "message": ... } } }`.
//! Unwrapping never paginates or filters; it only extracts.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sphere_query::Operation;
use sphere_schema::{fields, EntityTag, PageType};

use crate::error::{SdkError, SdkResult};

/// One page of a `selectAll` listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityPage<T> {
    pub items: Vec<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PageType>,
}

impl<T> Default for EntityPage<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            pagination: None,
        }
    }
}

impl<T> EntityPage<T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns true if the server reports a following page.
    pub fn has_next(&self) -> bool {
        self.pagination
            .and_then(|p| p.next)
            .zip(self.pagination.and_then(|p| p.current_page))
            .is_some_and(|(next, current)| next > current)
    }
}

/// Extracts `data.<tag>` of the operation's result.
///
/// A null envelope or entity slot yields `Ok(None)`; a non-empty
/// `errors.message` fails with [`SdkError::ApiResponse`].
pub fn unwrap_entity<T: DeserializeOwned>(
    envelope: Option<Value>,
    operation: Operation,
    tag: EntityTag,
) -> SdkResult<Option<T>> {
    let Some(mut envelope) = envelope.filter(|v| !v.is_null()) else {
        return Ok(None);
    };
    check_errors(&envelope, operation)?;

    match take(&mut envelope, &data_pointer(operation, tag)) {
        Some(value) => Ok(Some(serde_json::from_value(value)?)),
        None => Ok(None),
    }
}

/// Extracts the entity list and pagination block of a `selectAll` result.
pub fn unwrap_page<T: DeserializeOwned>(
    envelope: Option<Value>,
    tag: EntityTag,
) -> SdkResult<Option<EntityPage<T>>> {
    let operation = Operation::SelectAll;
    let Some(mut envelope) = envelope.filter(|v| !v.is_null()) else {
        return Ok(None);
    };
    check_errors(&envelope, operation)?;

    let items = match take(&mut envelope, &data_pointer(operation, tag)) {
        Some(value) => serde_json::from_value(value)?,
        None => Vec::new(),
    };
    let pagination_pointer = format!("/{operation}/{}", fields::PAGINATION);
    let pagination = match take(&mut envelope, &pagination_pointer) {
        Some(value) => Some(serde_json::from_value(value)?),
        None => None,
    };

    Ok(Some(EntityPage { items, pagination }))
}

fn check_errors(envelope: &Value, operation: Operation) -> SdkResult<()> {
    let pointer = format!("/{operation}/{}/{}", fields::ERRORS, fields::MESSAGE);
    match envelope.pointer(&pointer) {
        Some(Value::String(message)) if !message.is_empty() => {
            Err(SdkError::api_response(message.as_str()))
        }
        _ => Ok(()),
    }
}

fn data_pointer(operation: Operation, tag: EntityTag) -> String {
    format!("/{operation}/{}/{tag}", fields::DATA)
}

/// Moves the value at `pointer` out, treating null as absent.
fn take(envelope: &mut Value, pointer: &str) -> Option<Value> {
    envelope
        .pointer_mut(pointer)
        .map(Value::take)
        .filter(|v| !v.is_null())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use sphere_schema::{EndCustomerType, PartnerType};

    #[test]
    fn test_unwrap_single_entity() {
        let envelope = json!({
            "selectOne": { "data": { "partner": { "id": 1, "name": "Partner 1" } } }
        });
        let partner: PartnerType =
            unwrap_entity(Some(envelope), Operation::SelectOne, EntityTag::Partner)
                .unwrap()
                .unwrap();
        assert_eq!(partner.id, Some(1));
        assert_eq!(partner.name.as_deref(), Some("Partner 1"));
    }

    #[test]
    fn test_null_envelope_is_none() {
        let result: Option<PartnerType> =
            unwrap_entity(None, Operation::SelectOne, EntityTag::Partner).unwrap();
        assert!(result.is_none());

        let result: Option<PartnerType> =
            unwrap_entity(Some(Value::Null), Operation::SelectOne, EntityTag::Partner).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_error_message_raises() {
        let envelope = json!({
            "selectOne": { "data": { "partner": {} }, "errors": { "message": "Bad query" } }
        });
        let err =
            unwrap_entity::<PartnerType>(Some(envelope), Operation::SelectOne, EntityTag::Partner)
                .unwrap_err();
        assert_eq!(err.to_string(), "Error: Bad query");
    }

    #[test]
    fn test_empty_error_message_is_ignored() {
        let envelope = json!({
            "selectOne": { "data": { "partner": null }, "errors": { "message": "" } }
        });
        let result =
            unwrap_entity::<PartnerType>(Some(envelope), Operation::SelectOne, EntityTag::Partner)
                .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_unwrap_page_keeps_pagination() {
        let envelope = json!({
            "selectAll": {
                "data": { "endCustomer": [{ "id": 1 }, { "id": 2 }] },
                "pagination": { "currentPage": 1, "next": 2, "perPage": 2, "total": 11 }
            }
        });
        let page: EntityPage<EndCustomerType> = unwrap_page(Some(envelope), EntityTag::EndCustomer)
            .unwrap()
            .unwrap();

        assert_eq!(page.len(), 2);
        let pagination = page.pagination.unwrap();
        assert_eq!(pagination.total, Some(11));
        assert_eq!(pagination.per_page, Some(2));
        assert!(page.has_next());
    }

    #[test]
    fn test_unwrap_page_without_data() {
        let envelope = json!({ "selectAll": { "data": { "endCustomer": null } } });
        let page: EntityPage<EndCustomerType> = unwrap_page(Some(envelope), EntityTag::EndCustomer)
            .unwrap()
            .unwrap();
        assert!(page.is_empty());
        assert!(page.pagination.is_none());
        assert!(!page.has_next());
    }

    #[test]
    fn test_wrong_operation_slot_is_none() {
        let envelope = json!({ "selectAll": { "data": { "partner": [] } } });
        let result =
            unwrap_entity::<PartnerType>(Some(envelope), Operation::SelectOne, EntityTag::Partner)
                .unwrap();
        assert!(result.is_none());
    }
}
