//! Materialized graph entities
//!
//! A [`Node`] or [`Relationship`] is a read-only snapshot of an entity taken
//! when it was resolved from its id. Token ids are already resolved to names.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::{NodeId, RelationshipId};
use crate::value::Value;

/// A materialized node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Node id
    pub id: NodeId,
    /// Label names, in label token order
    pub labels: Vec<String>,
    /// Properties by key name
    pub properties: BTreeMap<String, Value>,
}

impl Node {
    /// Check whether the node carries a label
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    /// Get a property by key name
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }
}

/// A materialized relationship
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    /// Relationship id
    pub id: RelationshipId,
    /// Relationship type name
    pub rel_type: String,
    /// Start node id
    pub start: NodeId,
    /// End node id
    pub end: NodeId,
    /// Properties by key name
    pub properties: BTreeMap<String, Value>,
}

impl Relationship {
    /// Get a property by key name
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }
}
