//! Filter and pagination arguments.
//!
//! Filter groups are ORed together and the items of one group are ANDed;
//! that is evaluated by the server, the client only renders them:
//!
//! ```text
//! (filters: {groups: [{items: [{name: "id", operator: "EQUALS", value: ["1"]}]}]}, pagination: {page: 1, perPage: 10})
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::QueryError;

/// Comparison applied by a filter item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FilterOperator {
    Equals,
    NotEquals,
    Contains,
    In,
    NotIn,
    GreaterThan,
    GreaterThanOrEquals,
    LessThan,
    LessThanOrEquals,
    IsNull,
    IsNotNull,
}

impl FilterOperator {
    const ALL: [FilterOperator; 11] = [
        Self::Equals,
        Self::NotEquals,
        Self::Contains,
        Self::In,
        Self::NotIn,
        Self::GreaterThan,
        Self::GreaterThanOrEquals,
        Self::LessThan,
        Self::LessThanOrEquals,
        Self::IsNull,
        Self::IsNotNull,
    ];

    /// Returns the operator name as sent to the server.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Equals => "EQUALS",
            Self::NotEquals => "NOT_EQUALS",
            Self::Contains => "CONTAINS",
            Self::In => "IN",
            Self::NotIn => "NOT_IN",
            Self::GreaterThan => "GREATER_THAN",
            Self::GreaterThanOrEquals => "GREATER_THAN_OR_EQUALS",
            Self::LessThan => "LESS_THAN",
            Self::LessThanOrEquals => "LESS_THAN_OR_EQUALS",
            Self::IsNull => "IS_NULL",
            Self::IsNotNull => "IS_NOT_NULL",
        }
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterOperator {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|op| op.as_str() == upper)
            .ok_or_else(|| QueryError::UnknownOperator(s.to_string()))
    }
}

/// One `{name, operator, value}` condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterItem {
    pub name: String,
    pub operator: FilterOperator,
    /// Always sent as strings, whatever the source type.
    pub value: Vec<String>,
}

impl FilterItem {
    /// Creates an item; every value is stringified.
    pub fn new<I, V>(name: impl Into<String>, operator: FilterOperator, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: ToString,
    {
        Self {
            name: name.into(),
            operator,
            value: values.into_iter().map(|v| v.to_string()).collect(),
        }
    }

    /// Shorthand for a single-value `EQUALS` item.
    pub fn equals(name: impl Into<String>, value: impl ToString) -> Self {
        Self::new(name, FilterOperator::Equals, [value])
    }

    fn encode(&self) -> String {
        let values: Vec<String> = self.value.iter().map(|v| quote(v)).collect();
        format!(
            "{{name: {}, operator: {}, value: [{}]}}",
            quote(&self.name),
            quote(self.operator.as_str()),
            values.join(", ")
        )
    }
}

/// Items that must all match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterGroup {
    pub items: Vec<FilterItem>,
}

impl FilterGroup {
    /// Creates an empty group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an item.
    pub fn item(mut self, item: FilterItem) -> Self {
        self.items.push(item);
        self
    }

    fn encode(&self) -> String {
        let items: Vec<String> = self.items.iter().map(FilterItem::encode).collect();
        format!("{{items: [{}]}}", items.join(", "))
    }
}

impl From<Vec<FilterItem>> for FilterGroup {
    fn from(items: Vec<FilterItem>) -> Self {
        Self { items }
    }
}

impl From<FilterItem> for FilterGroup {
    fn from(item: FilterItem) -> Self {
        Self { items: vec![item] }
    }
}

/// Optional page selection; each half is sent only when set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u64>,
}

impl PaginationOptions {
    /// Creates options with neither half set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the page number.
    pub fn page(mut self, page: u64) -> Self {
        self.page = Some(page);
        self
    }

    /// Sets the page size.
    pub fn per_page(mut self, per_page: u64) -> Self {
        self.per_page = Some(per_page);
        self
    }

    /// Fills in the first page when no page is set.
    pub fn or_first_page(self) -> Self {
        Self {
            page: self.page.or(Some(1)),
            ..self
        }
    }

    /// Returns true when neither half is set.
    pub fn is_empty(&self) -> bool {
        self.page.is_none() && self.per_page.is_none()
    }

    fn encode(&self) -> Option<String> {
        let mut parts = Vec::with_capacity(2);
        if let Some(page) = self.page {
            parts.push(format!("page: {page}"));
        }
        if let Some(per_page) = self.per_page {
            parts.push(format!("perPage: {per_page}"));
        }
        if parts.is_empty() {
            None
        } else {
            Some(format!("{{{}}}", parts.join(", ")))
        }
    }
}

/// The argument clause of a query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Arguments {
    pub filters: Vec<FilterGroup>,
    pub pagination: Option<PaginationOptions>,
}

impl Arguments {
    /// Creates an empty argument clause.
    pub fn new() -> Self {
        Self::default()
    }

    /// Filters on `id EQUALS <id>`.
    pub fn by_id(id: impl ToString) -> Self {
        Self {
            filters: vec![FilterItem::equals("id", id).into()],
            pagination: None,
        }
    }

    /// Appends a filter group.
    pub fn filter(mut self, group: impl Into<FilterGroup>) -> Self {
        self.filters.push(group.into());
        self
    }

    /// Sets the pagination options.
    pub fn paginate(mut self, pagination: PaginationOptions) -> Self {
        self.pagination = Some(pagination);
        self
    }

    /// Renders the clause without its parentheses.
    ///
    /// Returns `None` when there is nothing to send, in which case the
    /// operation is called bare.
    pub fn encode(&self) -> Option<String> {
        let mut parts = Vec::with_capacity(2);
        if !self.filters.is_empty() {
            let groups: Vec<String> = self.filters.iter().map(FilterGroup::encode).collect();
            parts.push(format!("filters: {{groups: [{}]}}", groups.join(", ")));
        }
        if let Some(pagination) = self.pagination.as_ref().and_then(PaginationOptions::encode) {
            parts.push(format!("pagination: {pagination}"));
        }

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }
}

/// Quotes a string the way GraphQL string literals are written.
fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
