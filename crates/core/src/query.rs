//! Manual index query types
//!
//! A search against a manual index is either a pattern string in
//! `key:pattern` clause syntax or a single exact term. Clauses are
//! whitespace separated and combine with OR semantics; patterns may use
//! `*` (any run of characters) and `?` (any single character). A value in
//! double quotes is taken literally and may contain whitespace.

use serde::{Deserialize, Serialize};

use crate::error::{GraphError, GraphResult};
use crate::value::{Scalar, Value};

/// A query accepted by manual index search operations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum IndexQuery {
    /// Clause string such as `name:Kea* title:"The Matrix"`
    Pattern(String),
    /// Exact term lookup
    Term {
        /// Index key
        key: String,
        /// Value under the key
        value: Scalar,
    },
}

/// One `key:pattern` clause of a pattern query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryClause {
    /// Index key the clause applies to
    pub key: String,
    /// Value pattern; wildcards are only meaningful when `literal` is false
    pub pattern: String,
    /// True when the value was quoted
    pub literal: bool,
}

impl QueryClause {
    /// True when the clause contains wildcard characters
    pub fn has_wildcards(&self) -> bool {
        !self.literal && self.pattern.contains(['*', '?'])
    }
}

impl IndexQuery {
    /// Split the query into clauses.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an empty query or a clause without a key.
    pub fn clauses(&self) -> GraphResult<Vec<QueryClause>> {
        match self {
            IndexQuery::Term { key, value } => Ok(vec![QueryClause {
                key: key.clone(),
                pattern: value.index_text(),
                literal: true,
            }]),
            IndexQuery::Pattern(text) => parse_clauses(text),
        }
    }
}

impl TryFrom<Value> for IndexQuery {
    type Error = GraphError;

    /// Strings become pattern queries; a single-entry map `{key: value}`
    /// becomes an exact term.
    fn try_from(value: Value) -> GraphResult<Self> {
        match value {
            Value::String(s) => Ok(IndexQuery::Pattern(s)),
            Value::Map(map) if map.len() == 1 => {
                let (key, value) = map.into_iter().next().ok_or_else(|| {
                    GraphError::invalid_input("term query map must have one entry")
                })?;
                Ok(IndexQuery::Term {
                    key,
                    value: Scalar::try_from(value)?,
                })
            }
            Value::Map(_) => Err(GraphError::invalid_input(
                "term query map must have exactly one entry",
            )),
            other => Err(GraphError::unsupported_value(
                "String or single-entry Map",
                other.type_name(),
            )),
        }
    }
}

fn parse_clauses(text: &str) -> GraphResult<Vec<QueryClause>> {
    let mut clauses = Vec::new();
    let mut rest = text.trim_start();

    while !rest.is_empty() {
        let colon = rest
            .find(':')
            .ok_or_else(|| GraphError::invalid_input(format!("clause without key in query '{}'", text)))?;
        let key = &rest[..colon];
        if key.is_empty() || key.contains(char::is_whitespace) {
            return Err(GraphError::invalid_input(format!(
                "malformed clause key in query '{}'",
                text
            )));
        }
        rest = &rest[colon + 1..];

        let (pattern, literal, remaining) = if let Some(quoted) = rest.strip_prefix('"') {
            let end = quoted.find('"').ok_or_else(|| {
                GraphError::invalid_input(format!("unterminated quote in query '{}'", text))
            })?;
            (&quoted[..end], true, &quoted[end + 1..])
        } else {
            let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
            (&rest[..end], false, &rest[end..])
        };

        if pattern.is_empty() && !literal {
            return Err(GraphError::invalid_input(format!(
                "empty value for key '{}' in query '{}'",
                key, text
            )));
        }

        clauses.push(QueryClause {
            key: key.to_string(),
            pattern: pattern.to_string(),
            literal,
        });
        rest = remaining.trim_start();
    }

    if clauses.is_empty() {
        return Err(GraphError::invalid_input("empty index query"));
    }
    Ok(clauses)
}
