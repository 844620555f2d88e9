//! Argument types for procedure calls.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use stratagraph_core::{NodeId, RelationshipId, Value};

use crate::{Error, Result};

// =============================================================================
// Arg
// =============================================================================

/// A positional procedure argument.
///
/// Entity parameters take a reference to an existing node or relationship;
/// everything else is a plain [`Value`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Arg {
    /// Plain value (string, integer, map, null, ...)
    Value(Value),
    /// Reference to a node
    Node(NodeId),
    /// Reference to a relationship
    Relationship(RelationshipId),
}

impl Arg {
    /// Type name used in argument errors
    pub fn type_name(&self) -> &'static str {
        match self {
            Arg::Value(v) => v.type_name(),
            Arg::Node(_) => "Node",
            Arg::Relationship(_) => "Relationship",
        }
    }
}

impl From<Value> for Arg {
    fn from(value: Value) -> Self {
        Arg::Value(value)
    }
}

impl From<&str> for Arg {
    fn from(s: &str) -> Self {
        Arg::Value(Value::from(s))
    }
}

impl From<String> for Arg {
    fn from(s: String) -> Self {
        Arg::Value(Value::String(s))
    }
}

impl From<i64> for Arg {
    fn from(i: i64) -> Self {
        Arg::Value(Value::Int(i))
    }
}

impl From<NodeId> for Arg {
    fn from(id: NodeId) -> Self {
        Arg::Node(id)
    }
}

impl From<RelationshipId> for Arg {
    fn from(id: RelationshipId) -> Self {
        Arg::Relationship(id)
    }
}

// =============================================================================
// IndexSpecifier
// =============================================================================

/// A schema index named as `:Label(property)`.
///
/// Either name may be quoted in backticks, e.g. `` :`Film Noir`(`title`) ``.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndexSpecifier {
    label: String,
    property: String,
}

impl IndexSpecifier {
    /// Create a specifier from a label and property key name
    pub fn new(label: impl Into<String>, property: impl Into<String>) -> Self {
        IndexSpecifier {
            label: label.into(),
            property: property.into(),
        }
    }

    /// Parse `:Label(property)`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the text is not of that shape.
    pub fn parse(text: &str) -> Result<Self> {
        let invalid = || Error::InvalidArgument {
            reason: format!(
                "Cannot parse index specification '{}', expected ':Label(property)'",
                text
            ),
        };

        let body = text.trim().strip_prefix(':').ok_or_else(invalid)?;
        let (label, rest) = split_name(body, '(').ok_or_else(invalid)?;
        let (property, rest) = split_name(rest, ')').ok_or_else(invalid)?;
        if label.is_empty() || property.is_empty() || !rest.trim().is_empty() {
            return Err(invalid());
        }
        Ok(IndexSpecifier::new(label, property))
    }

    /// Label name
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Property key name
    pub fn property(&self) -> &str {
        &self.property
    }
}

/// Take a possibly backticked name up to `terminator`, returning the name
/// and the text after the terminator.
fn split_name(text: &str, terminator: char) -> Option<(&str, &str)> {
    let text = text.trim_start();
    if let Some(quoted) = text.strip_prefix('`') {
        let end = quoted.find('`')?;
        let rest = quoted[end + 1..].trim_start().strip_prefix(terminator)?;
        Some((&quoted[..end], rest))
    } else {
        let end = text.find(terminator)?;
        Some((text[..end].trim(), &text[end + 1..]))
    }
}

fn write_name(f: &mut fmt::Formatter<'_>, name: &str) -> fmt::Result {
    if name.chars().all(|c| c.is_alphanumeric() || c == '_') {
        write!(f, "{}", name)
    } else {
        write!(f, "`{}`", name)
    }
}

impl fmt::Display for IndexSpecifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":")?;
        write_name(f, &self.label)?;
        write!(f, "(")?;
        write_name(f, &self.property)?;
        write!(f, ")")
    }
}

impl FromStr for IndexSpecifier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        IndexSpecifier::parse(s)
    }
}
