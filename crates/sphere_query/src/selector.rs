//! Field selectors and their selection-set encoding.
//!
//! A [`Selector`] maps field names to either a flag (include the scalar
//! field or not) or a nested selector (include the relation with its own
//! sub-fields). Insertion order is preserved and governs the rendered order.
//!
//! ```ignore
//! use sphere_query::{selector, Selector};
//!
//! let a = selector! { id, name, contacts { id, email } };
//! let b: Selector = "id name contacts { id email }".parse()?;
//! assert_eq!(a.encode(), b.encode());
//! // Some("{ id name contacts { id email } }")
//! ```

use indexmap::IndexMap;
use serde_json::Value;
use std::str::FromStr;

use crate::error::{QueryError, QueryResult};

/// What a selector asks for under one field name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// A scalar field; `false` keeps the key but leaves it out of the query.
    Scalar(bool),
    /// A relation with its own sub-selection.
    Relation(Selector),
}

impl Selection {
    fn encode(&self, name: &str) -> Option<String> {
        match self {
            Self::Scalar(true) => Some(name.to_string()),
            Self::Scalar(false) => None,
            Self::Relation(inner) => inner.encode().map(|set| format!("{name} {set}")),
        }
    }
}

/// An ordered tree of requested fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selector {
    fields: IndexMap<String, Selection>,
}

impl Selector {
    /// Creates an empty selector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a selector including every given scalar field.
    pub fn from_fields<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new().with_fields(names)
    }

    /// Includes a scalar field.
    pub fn field(mut self, name: impl Into<String>) -> Self {
        self.insert(name, Selection::Scalar(true));
        self
    }

    /// Includes every given scalar field.
    pub fn with_fields<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            self.insert(name, Selection::Scalar(true));
        }
        self
    }

    /// Records a field as explicitly not requested.
    pub fn exclude(mut self, name: impl Into<String>) -> Self {
        self.insert(name, Selection::Scalar(false));
        self
    }

    /// Includes a relation with its sub-selection.
    pub fn relation(mut self, name: impl Into<String>, selector: Selector) -> Self {
        self.insert(name, Selection::Relation(selector));
        self
    }

    /// Sets the selection for a field.
    ///
    /// Re-inserting a name keeps its original position.
    pub fn insert(&mut self, name: impl Into<String>, selection: Selection) {
        self.fields.insert(name.into(), selection);
    }

    /// Returns the selection recorded for a field.
    pub fn get(&self, name: &str) -> Option<&Selection> {
        self.fields.get(name)
    }

    /// Iterates over every recorded key, truthy or not, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Selection)> {
        self.fields.iter().map(|(name, sel)| (name.as_str(), sel))
    }

    /// Number of recorded keys.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true when no key is recorded.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Renders the selection set, e.g. `{ id name contacts { id } }`.
    ///
    /// Returns `None` when nothing would be requested. Relations whose
    /// sub-selection is empty are dropped.
    pub fn encode(&self) -> Option<String> {
        let parts: Vec<String> = self
            .fields
            .iter()
            .filter_map(|(name, selection)| selection.encode(name))
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(format!("{{ {} }}", parts.join(" ")))
        }
    }

    /// Builds a selector from a JSON object of `true`/`false`/nested objects.
    ///
    /// `null` counts as `false`. Key order is preserved.
    pub fn from_json(value: &Value) -> QueryResult<Self> {
        let Value::Object(map) = value else {
            return Err(QueryError::InvalidSelector(format!(
                "expected an object, found {value}"
            )));
        };

        let mut selector = Self::new();
        for (name, entry) in map {
            let selection = match entry {
                Value::Bool(flag) => Selection::Scalar(*flag),
                Value::Null => Selection::Scalar(false),
                Value::Object(_) => Selection::Relation(Self::from_json(entry)?),
                other => {
                    return Err(QueryError::InvalidSelector(format!(
                        "field `{name}` must be a boolean or an object, found {other}"
                    )))
                }
            };
            selector.insert(name.clone(), selection);
        }
        Ok(selector)
    }
}

impl<S: Into<String>> FromIterator<S> for Selector {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::from_fields(iter)
    }
}

impl FromStr for Selector {
    type Err = QueryError;

    /// Parses the compact form `id name contacts { id email }`.
    ///
    /// Commas are accepted as separators and the whole list may be wrapped
    /// in braces.
    fn from_str(source: &str) -> QueryResult<Self> {
        let tokens = tokenize(source)?;
        let mut pos = 0;
        let wrapped = matches!(tokens.first(), Some(Token::Open));
        if wrapped {
            pos = 1;
        }

        let selector = parse_list(&tokens, &mut pos, wrapped)?;
        if pos != tokens.len() {
            return Err(QueryError::InvalidSelector(
                "unexpected input after closing `}`".to_string(),
            ));
        }
        Ok(selector)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    Name(&'a str),
    Open,
    Close,
}

fn tokenize(source: &str) -> QueryResult<Vec<Token<'_>>> {
    let mut tokens = Vec::new();
    let mut chars = source.char_indices().peekable();

    while let Some((start, c)) = chars.next() {
        match c {
            c if c.is_whitespace() || c == ',' => {}
            '{' => tokens.push(Token::Open),
            '}' => tokens.push(Token::Close),
            c if c.is_ascii_alphabetic() || c == '_' => {
                let mut end = start + c.len_utf8();
                while let Some(&(i, next)) = chars.peek() {
                    if next.is_ascii_alphanumeric() || next == '_' {
                        end = i + next.len_utf8();
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Name(&source[start..end]));
            }
            other => {
                return Err(QueryError::InvalidSelector(format!(
                    "unexpected `{other}` at offset {start}"
                )))
            }
        }
    }

    Ok(tokens)
}

fn parse_list(tokens: &[Token<'_>], pos: &mut usize, nested: bool) -> QueryResult<Selector> {
    let mut selector = Selector::new();

    loop {
        match tokens.get(*pos) {
            None if nested => {
                return Err(QueryError::InvalidSelector("unclosed `{`".to_string()));
            }
            None => return Ok(selector),
            Some(Token::Close) if nested => {
                *pos += 1;
                return Ok(selector);
            }
            Some(Token::Close) => {
                return Err(QueryError::InvalidSelector("unbalanced `}`".to_string()));
            }
            Some(Token::Open) => {
                return Err(QueryError::InvalidSelector(
                    "`{` must follow a field name".to_string(),
                ));
            }
            Some(Token::Name(name)) => {
                *pos += 1;
                if let Some(Token::Open) = tokens.get(*pos) {
                    *pos += 1;
                    let inner = parse_list(tokens, pos, true)?;
                    selector.insert(*name, Selection::Relation(inner));
                } else {
                    selector.insert(*name, Selection::Scalar(true));
                }
            }
        }
    }
}

/// Builds a [`Selector`] from a brace-nested field list.
///
/// ```ignore
/// let sel = selector! { id, name, contacts { id, email } };
/// ```
#[macro_export]
macro_rules! selector {
    (@fields $sel:ident;) => {};
    (@fields $sel:ident; $name:ident { $($inner:tt)* } $(, $($rest:tt)*)?) => {
        $sel = $sel.relation(stringify!($name), $crate::selector!($($inner)*));
        $crate::selector!(@fields $sel; $($($rest)*)?);
    };
    (@fields $sel:ident; $name:ident $(, $($rest:tt)*)?) => {
        $sel = $sel.field(stringify!($name));
        $crate::selector!(@fields $sel; $($($rest)*)?);
    };
    ($($body:tt)*) => {{
        #[allow(unused_mut)]
        let mut selector = $crate::Selector::new();
        $crate::selector!(@fields selector; $($body)*);
        selector
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_encode_flat() {
        let sel = Selector::new().field("id").field("name");
        assert_eq!(sel.encode().as_deref(), Some("{ id name }"));
    }

    #[test]
    fn test_encode_keeps_insertion_order() {
        let sel = Selector::from_fields(["name", "id", "city"]);
        assert_eq!(sel.encode().as_deref(), Some("{ name id city }"));
    }

    #[test]
    fn test_encode_skips_falsy_keys() {
        let sel = Selector::new().field("id").exclude("name").field("city");
        assert_eq!(sel.encode().as_deref(), Some("{ id city }"));
        assert_eq!(sel.len(), 3);
    }

    #[test]
    fn test_encode_relation() {
        let sel = Selector::new()
            .field("id")
            .relation("contacts", Selector::from_fields(["id", "email"]))
            .field("name");
        assert_eq!(
            sel.encode().as_deref(),
            Some("{ id contacts { id email } name }")
        );
    }

    #[test]
    fn test_encode_drops_empty_relation() {
        let sel = Selector::new()
            .field("id")
            .relation("contacts", Selector::new().exclude("id"));
        assert_eq!(sel.encode().as_deref(), Some("{ id }"));
    }

    #[test]
    fn test_encode_nothing_selected() {
        assert_eq!(Selector::new().encode(), None);
        assert_eq!(Selector::new().exclude("id").encode(), None);
    }

    #[test]
    fn test_encode_deep_nesting() {
        let sel: Selector = "orders { items { priceRates { id value } } }".parse().unwrap();
        assert_eq!(
            sel.encode().as_deref(),
            Some("{ orders { items { priceRates { id value } } } }")
        );
    }

    #[test]
    fn test_from_json() {
        let sel = Selector::from_json(&json!({
            "id": true,
            "name": false,
            "contacts": { "email": true, "phone": null },
            "reference": true
        }))
        .unwrap();

        assert_eq!(
            sel.encode().as_deref(),
            Some("{ id contacts { email } reference }")
        );
    }

    #[test]
    fn test_from_json_rejects_non_boolean() {
        let err = Selector::from_json(&json!({ "id": 1 })).unwrap_err();
        assert!(matches!(err, QueryError::InvalidSelector(_)));
        assert!(Selector::from_json(&json!(["id"])).is_err());
    }

    #[test]
    fn test_parse_compact_form() {
        let sel: Selector = "id, name contacts{id,email}".parse().unwrap();
        assert_eq!(
            sel.encode().as_deref(),
            Some("{ id name contacts { id email } }")
        );

        let wrapped: Selector = "{ id name }".parse().unwrap();
        assert_eq!(wrapped, Selector::from_fields(["id", "name"]));
    }

    #[test]
    fn test_parse_errors() {
        assert!("id {".parse::<Selector>().is_err());
        assert!("id }".parse::<Selector>().is_err());
        assert!("{ id } name".parse::<Selector>().is_err());
        assert!("{ { id } }".parse::<Selector>().is_err());
        assert!("id name!".parse::<Selector>().is_err());
    }

    #[test]
    fn test_selector_macro() {
        let sel = crate::selector! { id, name, contacts { id, email }, reference };
        assert_eq!(
            sel.encode().as_deref(),
            Some("{ id name contacts { id email } reference }")
        );

        let empty = crate::selector! {};
        assert!(empty.is_empty());
    }

    #[test]
    fn test_encode_is_idempotent() {
        let sel = crate::selector! { id, partnerTags { name } };
        assert_eq!(sel.encode(), sel.encode());
    }
}
