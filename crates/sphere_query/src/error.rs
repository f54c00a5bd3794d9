//! Errors raised while building a query.

use sphere_schema::EntityTag;
use thiserror::Error;

use crate::query::Operation;

/// A query that cannot be rendered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// The selector has no truthy field, which would render `{  }`.
    #[error("selection for `{entity}` requests no field")]
    EmptySelection { entity: String },

    /// Pagination metadata only exists on `selectAll` responses.
    #[error("pagination fields can only be requested on selectAll")]
    PaginationFieldsOnSelectOne,

    /// The query was built for the other operation.
    #[error("expected a {expected} query, found {found}")]
    OperationMismatch {
        expected: Operation,
        found: Operation,
    },

    /// The selector source could not be read.
    #[error("invalid selector: {0}")]
    InvalidSelector(String),

    /// The filter operator name is not part of the closed set.
    #[error("unknown filter operator `{0}`")]
    UnknownOperator(String),

    /// A data selector must hold exactly one entity relation.
    #[error("data selector must select exactly one entity, found {0}")]
    DataSelector(String),
}

impl QueryError {
    pub(crate) fn empty(entity: EntityTag) -> Self {
        Self::EmptySelection {
            entity: entity.to_string(),
        }
    }
}

/// Result type for query construction.
pub type QueryResult<T> = Result<T, QueryError>;
