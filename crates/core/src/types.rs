//! Core identifier types for StrataGraph
//!
//! This module defines the foundational types:
//! - NodeId / RelationshipId: Entity identifiers
//! - LabelId / PropertyKeyId / RelationshipTypeId: Token identifiers
//! - Token: A token id paired with its human-readable name
//! - EntityType: Discriminates node and relationship entities

use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of the automatic node index maintained by the engine.
pub const NODE_AUTO_INDEX: &str = "node_auto_index";

/// Name of the automatic relationship index maintained by the engine.
pub const RELATIONSHIP_AUTO_INDEX: &str = "relationship_auto_index";

/// Identifier of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u64);

impl NodeId {
    /// Get the raw id
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for NodeId {
    fn from(id: u64) -> Self {
        NodeId(id)
    }
}

/// Identifier of a relationship
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RelationshipId(pub u64);

impl RelationshipId {
    /// Get the raw id
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RelationshipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for RelationshipId {
    fn from(id: u64) -> Self {
        RelationshipId(id)
    }
}

/// Label token id
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LabelId(pub u32);

/// Property key token id
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PropertyKeyId(pub u32);

/// Relationship type token id
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RelationshipTypeId(pub u32);

/// A token id with its resolved name.
///
/// Produced by the "tokens in use" enumerations; the id space depends on the
/// enumeration it came from (labels, property keys or relationship types).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Token id
    pub id: u32,
    /// Human-readable token name
    pub name: String,
}

impl Token {
    /// Create a new token
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Token {
            id,
            name: name.into(),
        }
    }
}

/// Entity kind addressed by a manual index
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EntityType {
    /// Nodes
    Node,
    /// Relationships
    Relationship,
}

impl EntityType {
    /// Upper-case name used in index info records (`NODE`, `RELATIONSHIP`)
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Node => "NODE",
            EntityType::Relationship => "RELATIONSHIP",
        }
    }

    /// Name of the automatic index maintained for this entity kind
    pub fn auto_index_name(&self) -> &'static str {
        match self {
            EntityType::Node => NODE_AUTO_INDEX,
            EntityType::Relationship => RELATIONSHIP_AUTO_INDEX,
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityType::Node => write!(f, "Node"),
            EntityType::Relationship => write!(f, "Relationship"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_type_names() {
        assert_eq!(EntityType::Node.as_str(), "NODE");
        assert_eq!(EntityType::Relationship.as_str(), "RELATIONSHIP");
        assert_eq!(EntityType::Node.to_string(), "Node");
        assert_eq!(EntityType::Node.auto_index_name(), "node_auto_index");
        assert_eq!(
            EntityType::Relationship.auto_index_name(),
            "relationship_auto_index"
        );
    }

    #[test]
    fn test_ids_order_by_value() {
        assert!(NodeId(1) < NodeId(2));
        assert_eq!(RelationshipId::from(7).as_u64(), 7);
        assert_eq!(NodeId(42).to_string(), "42");
    }
}
