//! Response envelopes for the two server operations.
//!
//! A response is keyed by operation (`selectAll` or `selectOne`); inside it,
//! `data` holds exactly one populated entity slot, `errors` carries a
//! server-reported failure and, for `selectAll`, `pagination` describes the
//! returned page.

use serde::{Deserialize, Serialize};

use crate::entities::{
    ArrowCompanyType, ContinentType, CountryType, EndCustomerType, PartnerType, PartnertagType,
    SubscriptionType, WorkgroupType,
};
use crate::tag::EntityTag;

/// Server-reported error block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorsType {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorsType {
    /// Returns the message when it is present and non-empty.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref().filter(|m| !m.is_empty())
    }
}

/// Pagination metadata of a `selectAll` response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageType {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_page: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_page: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<u64>,
}

impl PageType {
    /// Wire names of every pagination field, in response order.
    pub const FIELDS: [&'static str; 7] = [
        "currentPage",
        "next",
        "perPage",
        "previous",
        "total",
        "totalPage",
        "totalPages",
    ];
}

/// Generates the per-tag `data` struct for one response cardinality.
macro_rules! response_data {
    ($(#[$meta:meta])* $name:ident, $wrap:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase")]
        pub struct $name {
            #[serde(skip_serializing_if = "Option::is_none")]
            pub arrow_company: Option<$wrap<ArrowCompanyType>>,
            #[serde(skip_serializing_if = "Option::is_none")]
            pub continent: Option<$wrap<ContinentType>>,
            #[serde(skip_serializing_if = "Option::is_none")]
            pub country: Option<$wrap<CountryType>>,
            #[serde(skip_serializing_if = "Option::is_none")]
            pub end_customer: Option<$wrap<EndCustomerType>>,
            #[serde(skip_serializing_if = "Option::is_none")]
            pub partner: Option<$wrap<PartnerType>>,
            #[serde(rename = "partnerTag", skip_serializing_if = "Option::is_none")]
            pub partnertag: Option<$wrap<PartnertagType>>,
            #[serde(skip_serializing_if = "Option::is_none")]
            pub subscription: Option<$wrap<SubscriptionType>>,
            #[serde(skip_serializing_if = "Option::is_none")]
            pub workgroup: Option<$wrap<WorkgroupType>>,
        }

        impl $name {
            /// Returns the tags whose slot is populated.
            pub fn populated(&self) -> Vec<EntityTag> {
                let slots = [
                    (EntityTag::ArrowCompany, self.arrow_company.is_some()),
                    (EntityTag::Continent, self.continent.is_some()),
                    (EntityTag::Country, self.country.is_some()),
                    (EntityTag::EndCustomer, self.end_customer.is_some()),
                    (EntityTag::Partner, self.partner.is_some()),
                    (EntityTag::Partnertag, self.partnertag.is_some()),
                    (EntityTag::Subscription, self.subscription.is_some()),
                    (EntityTag::Workgroup, self.workgroup.is_some()),
                ];
                slots
                    .into_iter()
                    .filter_map(|(tag, set)| set.then_some(tag))
                    .collect()
            }
        }
    };
}

type Many<T> = Vec<T>;
type One<T> = T;

response_data!(
    /// `data` block of a `selectAll` response: one list per entity.
    SelectAllResponseData,
    Many
);

response_data!(
    /// `data` block of a `selectOne` response: one entity per tag.
    SelectOneResponseData,
    One
);

/// Body of a `selectAll` response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectAllResultType {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<SelectAllResponseData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<ErrorsType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PageType>,
}

/// Body of a `selectOne` response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectOneResultType {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<SelectOneResponseData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<ErrorsType>,
}

/// Top-level `selectAll` envelope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectAllQueryType {
    #[serde(rename = "selectAll", skip_serializing_if = "Option::is_none")]
    pub select_all: Option<SelectAllResultType>,
}

/// Top-level `selectOne` envelope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectOneQueryType {
    #[serde(rename = "selectOne", skip_serializing_if = "Option::is_none")]
    pub select_one: Option<SelectOneResultType>,
}
