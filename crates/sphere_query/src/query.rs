//! Query assembly for the two server operations.

use sphere_schema::{EntityTag, PageType};
use std::fmt;

use crate::arguments::{Arguments, FilterGroup, PaginationOptions};
use crate::error::{QueryError, QueryResult};
use crate::selector::{Selection, Selector};

/// The closed set of server operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    SelectAll,
    SelectOne,
}

impl Operation {
    /// Returns the operation name used on the wire.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SelectAll => sphere_schema::fields::SELECT_ALL,
            Self::SelectOne => sphere_schema::fields::SELECT_ONE,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `selectAll` or `selectOne` call for one entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectQuery {
    pub operation: Operation,
    pub entity: EntityTag,
    pub selector: Selector,
    pub arguments: Arguments,
    /// Pagination metadata to request; `selectAll` only.
    pub pagination_fields: Option<Selector>,
}

impl SelectQuery {
    /// Creates a query for the given operation and entity.
    pub fn new(operation: Operation, entity: EntityTag, selector: Selector) -> Self {
        Self {
            operation,
            entity,
            selector,
            arguments: Arguments::new(),
            pagination_fields: None,
        }
    }

    /// Creates a `selectAll` query.
    pub fn select_all(entity: EntityTag, selector: Selector) -> Self {
        Self::new(Operation::SelectAll, entity, selector)
    }

    /// Creates a `selectOne` query.
    pub fn select_one(entity: EntityTag, selector: Selector) -> Self {
        Self::new(Operation::SelectOne, entity, selector)
    }

    /// Creates a query from a selector keyed by entity, e.g.
    /// `{ partner: { id: true, name: true } }`.
    ///
    /// The selector must name exactly one entity, with a nested selection.
    pub fn from_data_selector(operation: Operation, data: &Selector) -> QueryResult<Self> {
        let mut entries = data.iter();
        let (Some((name, selection)), None) = (entries.next(), entries.next()) else {
            return Err(QueryError::DataSelector(format!("{} keys", data.len())));
        };

        let entity: EntityTag = name
            .parse()
            .map_err(|_| QueryError::DataSelector(format!("unknown entity `{name}`")))?;
        let Selection::Relation(selector) = selection else {
            return Err(QueryError::DataSelector(format!(
                "`{name}` needs a nested selection"
            )));
        };

        Ok(Self::new(operation, entity, selector.clone()))
    }

    /// Appends a filter group.
    pub fn filter(mut self, group: impl Into<FilterGroup>) -> Self {
        self.arguments = self.arguments.filter(group);
        self
    }

    /// Appends every filter group.
    pub fn filters(mut self, groups: impl IntoIterator<Item = FilterGroup>) -> Self {
        self.arguments.filters.extend(groups);
        self
    }

    /// Sets the pagination options.
    pub fn paginate(mut self, pagination: PaginationOptions) -> Self {
        self.arguments = self.arguments.paginate(pagination);
        self
    }

    /// Replaces the whole argument clause.
    pub fn arguments(mut self, arguments: Arguments) -> Self {
        self.arguments = arguments;
        self
    }

    /// Requests the given pagination fields alongside the data.
    pub fn with_pagination_fields(mut self, fields: Selector) -> Self {
        self.pagination_fields = Some(fields);
        self
    }

    /// Requests every pagination field.
    pub fn with_all_pagination_fields(self) -> Self {
        self.with_pagination_fields(Selector::from_fields(PageType::FIELDS))
    }

    /// Fails unless this query targets `expected`.
    pub fn expect_operation(&self, expected: Operation) -> QueryResult<()> {
        if self.operation == expected {
            Ok(())
        } else {
            Err(QueryError::OperationMismatch {
                expected,
                found: self.operation,
            })
        }
    }

    /// Renders the query string:
    ///
    /// ```text
    /// {<op> (<args>) { data { <entity> { ... } } errors { message } [pagination { ... }] }}
    /// ```
    ///
    /// The argument clause is left out when there is no filter and no
    /// pagination.
    pub fn build(&self) -> QueryResult<String> {
        let selection = self
            .selector
            .encode()
            .ok_or_else(|| QueryError::empty(self.entity))?;

        let mut body = format!(
            "data {{ {} {selection} }} errors {{ message }}",
            self.entity
        );

        if let Some(fields) = &self.pagination_fields {
            if self.operation != Operation::SelectAll {
                return Err(QueryError::PaginationFieldsOnSelectOne);
            }
            if let Some(pagination) = fields.encode() {
                body.push_str(" pagination ");
                body.push_str(&pagination);
            }
        }

        Ok(match self.arguments.encode() {
            Some(arguments) => format!("{{{} ({arguments}) {{ {body} }}}}", self.operation),
            None => format!("{{{} {{ {body} }}}}", self.operation),
        })
    }
}
