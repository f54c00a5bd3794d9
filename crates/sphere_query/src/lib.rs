//! Query construction for the Sphere GraphQL API.
//!
//! Turns typed selectors, filters and pagination options into the literal
//! query strings the server expects:
//! - `selector`: field selection trees and their `{ a b rel { c } }` encoding
//! - `arguments`: the `(filters: ..., pagination: ...)` clause
//! - `query`: assembly of `selectAll` / `selectOne` calls

pub mod arguments;
pub mod error;
pub mod query;
pub mod selector;

pub use arguments::{Arguments, FilterGroup, FilterItem, FilterOperator, PaginationOptions};
pub use error::{QueryError, QueryResult};
pub use query::{Operation, SelectQuery};
pub use selector::{Selection, Selector};
