//! Business entities returned by the API.
//!
//! Every field is optional: the server only returns what the selector asked
//! for, so a partially-populated struct is the normal case.

mod company;
mod contact;
mod order;
mod reference;
mod subscription;

pub use company::{
    ArrowCompanyType, CompanyExtraInformation, CompanyType, EndCustomerType, PartnerType,
};
pub use contact::ContactsType;
pub use order::{OrderItemsType, OrdersType, SpecialPriceRateType};
pub use reference::{ContinentType, CountryType, PartnertagType, WorkgroupType};
pub use subscription::{ProgramType, SubscriptionType};

use crate::tag::{Entity, EntityTag};

impl Entity for ArrowCompanyType {
    const TAG: EntityTag = EntityTag::ArrowCompany;
}

impl Entity for ContinentType {
    const TAG: EntityTag = EntityTag::Continent;
}

impl Entity for CountryType {
    const TAG: EntityTag = EntityTag::Country;
}

impl Entity for EndCustomerType {
    const TAG: EntityTag = EntityTag::EndCustomer;
}

impl Entity for PartnerType {
    const TAG: EntityTag = EntityTag::Partner;
}

impl Entity for PartnertagType {
    const TAG: EntityTag = EntityTag::Partnertag;
}

impl Entity for SubscriptionType {
    const TAG: EntityTag = EntityTag::Subscription;
}

impl Entity for WorkgroupType {
    const TAG: EntityTag = EntityTag::Workgroup;
}
