//! Data shapes for the Sphere GraphQL API.
//!
//! This crate holds the static side of the client:
//! - `tag`: the entity discriminator occupying a response's `data` slot
//! - `entities`: the business entities (companies, orders, subscriptions, ...)
//! - `envelope`: the `selectAll` / `selectOne` response envelopes

pub mod entities;
pub mod envelope;
pub mod tag;

pub use entities::{
    ArrowCompanyType, CompanyExtraInformation, CompanyType, ContactsType, ContinentType,
    CountryType, EndCustomerType, OrderItemsType, OrdersType, PartnerType, PartnertagType,
    ProgramType, SpecialPriceRateType, SubscriptionType, WorkgroupType,
};
pub use envelope::{
    ErrorsType, PageType, SelectAllQueryType, SelectAllResponseData, SelectAllResultType,
    SelectOneQueryType, SelectOneResponseData, SelectOneResultType,
};
pub use tag::{Entity, EntityTag, UnknownEntityTag};

/// Wire keys shared by every query and response.
pub mod fields {
    /// Top-level key of a many-entity query.
    pub const SELECT_ALL: &str = "selectAll";
    /// Top-level key of a single-entity query.
    pub const SELECT_ONE: &str = "selectOne";
    /// Key of the entity payload.
    pub const DATA: &str = "data";
    /// Key of the server-reported error block.
    pub const ERRORS: &str = "errors";
    /// Key of the pagination metadata block.
    pub const PAGINATION: &str = "pagination";
    /// Field of the error block carrying the message.
    pub const MESSAGE: &str = "message";
}
