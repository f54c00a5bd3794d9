//! Sphere GraphQL SDK
//!
//! A typed client for the Sphere business-entity API. Queries are built
//! from selectors, filters and pagination options, sent over HTTP, retried
//! once when a registered exception handler asks for it, and unwrapped into
//! typed entities.
//!
//! ```ignore
//! use sphere_sdk::{selector, Arguments, ClientConfig, FilterItem, SphereClient};
//! use sphere_sdk::schema::EndCustomerType;
//!
//! let client = SphereClient::with_config(ClientConfig::from_env()?)?;
//!
//! let page = client
//!     .find_all::<EndCustomerType>(
//!         selector! { id, name, country { code } },
//!         Arguments::new().filter(FilterItem::equals("active", true)),
//!     )
//!     .await?;
//! ```

pub mod client;
pub mod error;
pub mod exception;
pub mod response;
pub mod transport;

pub use sphere_query as query;
pub use sphere_schema as schema;

pub use sphere_query::{
    selector, Arguments, FilterGroup, FilterItem, FilterOperator, Operation, PaginationOptions,
    SelectQuery, Selection, Selector,
};
pub use sphere_schema::{Entity, EntityTag};

pub use client::{ClientConfig, SphereClient, API_KEY_HEADER};
pub use error::{ErrorCode, SdkError, SdkResult, TransportError};
pub use exception::{HandleOutcome, Hooks, HttpExceptionHandler, RetryOnStatus};
pub use response::{unwrap_entity, unwrap_page, EntityPage};
pub use transport::{
    GraphqlError, GraphqlPayload, Headers, HttpTransport, Transport, TransportRequest,
};
