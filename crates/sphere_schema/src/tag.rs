//! Entity discriminator.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Identifies which business entity occupies the `data` slot of a response.
///
/// Exactly one tag is selected per query, and the server answers with the
/// same key under `data`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntityTag {
    ArrowCompany,
    Continent,
    Country,
    EndCustomer,
    Partner,
    #[serde(rename = "partnerTag")]
    Partnertag,
    Subscription,
    Workgroup,
}

impl EntityTag {
    /// Every tag, in declaration order.
    pub const ALL: [EntityTag; 8] = [
        Self::ArrowCompany,
        Self::Continent,
        Self::Country,
        Self::EndCustomer,
        Self::Partner,
        Self::Partnertag,
        Self::Subscription,
        Self::Workgroup,
    ];

    /// Returns the field name used on the wire.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ArrowCompany => "arrowCompany",
            Self::Continent => "continent",
            Self::Country => "country",
            Self::EndCustomer => "endCustomer",
            Self::Partner => "partner",
            Self::Partnertag => "partnerTag",
            Self::Subscription => "subscription",
            Self::Workgroup => "workgroup",
        }
    }
}

impl fmt::Display for EntityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string names no known entity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown entity `{0}`")]
pub struct UnknownEntityTag(pub String);

impl FromStr for EntityTag {
    type Err = UnknownEntityTag;

    /// Accepts the wire name as well as kebab-case and snake_case spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .flat_map(char::to_lowercase)
            .collect();

        Self::ALL
            .into_iter()
            .find(|tag| tag.as_str().to_lowercase() == normalized)
            .ok_or_else(|| UnknownEntityTag(s.to_string()))
    }
}

/// A business entity that can occupy the `data` slot of a response.
pub trait Entity: DeserializeOwned {
    /// The data key this entity is returned under.
    const TAG: EntityTag;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names_match_serde() {
        for tag in EntityTag::ALL {
            let json = serde_json::to_value(tag).unwrap();
            assert_eq!(json, serde_json::Value::String(tag.as_str().to_string()));
        }
    }

    #[test]
    fn test_parse_spellings() {
        assert_eq!("endCustomer".parse(), Ok(EntityTag::EndCustomer));
        assert_eq!("end-customer".parse(), Ok(EntityTag::EndCustomer));
        assert_eq!("arrow_company".parse(), Ok(EntityTag::ArrowCompany));
        assert_eq!("PARTNERTAG".parse(), Ok(EntityTag::Partnertag));
        assert_eq!(
            "invoice".parse::<EntityTag>(),
            Err(UnknownEntityTag("invoice".to_string()))
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(EntityTag::Partnertag.to_string(), "partnerTag");
    }
}
