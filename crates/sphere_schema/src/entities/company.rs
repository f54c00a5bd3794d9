use serde::{Deserialize, Serialize};
use std::ops::{Deref, DerefMut};

use super::{
    ContactsType, CountryType, OrdersType, PartnertagType, SubscriptionType, WorkgroupType,
};

/// Fields shared by every kind of company.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyType {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acronym: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contacts: Option<Vec<ContactsType>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<CountryType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_contact: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_informations: Option<Vec<CompanyExtraInformation>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub internal_reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orders: Option<Vec<OrdersType>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_number: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub company_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workgroup: Option<WorkgroupType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
}

/// Free-form key/value attached to a company.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyExtraInformation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// A reseller partner.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerType {
    #[serde(flatten)]
    pub company: CompanyType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partner_tags: Option<Vec<PartnertagType>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscriptions: Option<Vec<SubscriptionType>>,
}

/// A customer managed by a partner.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndCustomerType {
    #[serde(flatten)]
    pub company: CompanyType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partner: Option<Box<PartnerType>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partner_tags: Option<Vec<PartnertagType>>,
}

/// An Arrow subsidiary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrowCompanyType {
    #[serde(flatten)]
    pub company: CompanyType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscriptions: Option<Vec<SubscriptionType>>,
}

macro_rules! deref_company {
    ($($ty:ty),+) => {
        $(
            impl Deref for $ty {
                type Target = CompanyType;

                fn deref(&self) -> &CompanyType {
                    &self.company
                }
            }

            impl DerefMut for $ty {
                fn deref_mut(&mut self) -> &mut CompanyType {
                    &mut self.company
                }
            }

            impl From<CompanyType> for $ty {
                fn from(company: CompanyType) -> Self {
                    Self {
                        company,
                        ..Default::default()
                    }
                }
            }
        )+
    };
}

deref_company!(PartnerType, EndCustomerType, ArrowCompanyType);
