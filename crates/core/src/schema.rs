//! Schema descriptors
//!
//! Indexes and constraints are described in terms of token ids. Rendering a
//! human-readable description needs a [`TokenNameLookup`].

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::entity::{Node, Relationship};
use crate::traits::TokenNameLookup;
use crate::types::{LabelId, PropertyKeyId, RelationshipTypeId};

/// A (label, property) pair an index or constraint applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LabelSchemaDescriptor {
    /// Label the schema applies to
    pub label: LabelId,
    /// Property key the schema applies to
    pub property: PropertyKeyId,
}

impl LabelSchemaDescriptor {
    /// Create a new descriptor
    pub fn new(label: LabelId, property: PropertyKeyId) -> Self {
        LabelSchemaDescriptor { label, property }
    }

    /// Render as `:Label(property)`
    pub fn user_description(&self, tokens: &dyn TokenNameLookup) -> String {
        format!(
            ":{}({})",
            tokens.label_name(self.label),
            tokens.property_key_name(self.property)
        )
    }
}

/// Index type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum IndexKind {
    /// Plain label/property index
    General,
    /// Index backing a uniqueness constraint
    Unique,
}

impl IndexKind {
    /// Upper-case kind name used in descriptions
    pub fn name(&self) -> &'static str {
        match self {
            IndexKind::General => "GENERAL",
            IndexKind::Unique => "UNIQUE",
        }
    }

    /// User-facing index type name
    pub fn type_name(&self) -> &'static str {
        match self {
            IndexKind::General => "node_label_property",
            IndexKind::Unique => "node_unique_property",
        }
    }
}

/// A schema index over one label and property
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct IndexDescriptor {
    /// Indexed schema
    pub schema: LabelSchemaDescriptor,
    /// Index type tag
    pub kind: IndexKind,
}

impl IndexDescriptor {
    /// Create a general index descriptor
    pub fn general(label: LabelId, property: PropertyKeyId) -> Self {
        IndexDescriptor {
            schema: LabelSchemaDescriptor::new(label, property),
            kind: IndexKind::General,
        }
    }

    /// Create a unique index descriptor
    pub fn unique(label: LabelId, property: PropertyKeyId) -> Self {
        IndexDescriptor {
            schema: LabelSchemaDescriptor::new(label, property),
            kind: IndexKind::Unique,
        }
    }

    /// Render as `Index( GENERAL, :Label(property) )`
    pub fn user_description(&self, tokens: &dyn TokenNameLookup) -> String {
        format!(
            "Index( {}, {} )",
            self.kind.name(),
            self.schema.user_description(tokens)
        )
    }
}

/// Population state of a schema index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndexState {
    /// Index is being built
    Populating,
    /// Index is ready for use
    Online,
    /// Population failed
    Failed,
}

impl fmt::Display for IndexState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexState::Populating => write!(f, "POPULATING"),
            IndexState::Online => write!(f, "ONLINE"),
            IndexState::Failed => write!(f, "FAILED"),
        }
    }
}

/// Index sampling mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndexSamplingMode {
    /// Resample regardless of updates since the last sample
    RebuildAll,
    /// Resample only indexes updated since their last sample
    RebuildUpdated,
}

/// A schema constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConstraintDescriptor {
    /// Property value is unique among nodes with the label
    Uniqueness {
        /// Constrained label
        label: LabelId,
        /// Constrained property
        property: PropertyKeyId,
    },
    /// Nodes with the label must have the property
    NodePropertyExistence {
        /// Constrained label
        label: LabelId,
        /// Constrained property
        property: PropertyKeyId,
    },
    /// Relationships of the type must have the property
    RelationshipPropertyExistence {
        /// Constrained relationship type
        rel_type: RelationshipTypeId,
        /// Constrained property
        property: PropertyKeyId,
    },
}

impl ConstraintDescriptor {
    /// Render in constraint DDL form, e.g.
    /// `CONSTRAINT ON ( person:Person ) ASSERT person.name IS UNIQUE`
    pub fn pretty_print(&self, tokens: &dyn TokenNameLookup) -> String {
        match self {
            ConstraintDescriptor::Uniqueness { label, property } => {
                let label = tokens.label_name(*label);
                let var = label.to_lowercase();
                format!(
                    "CONSTRAINT ON ( {}:{} ) ASSERT {}.{} IS UNIQUE",
                    var,
                    label,
                    var,
                    tokens.property_key_name(*property)
                )
            }
            ConstraintDescriptor::NodePropertyExistence { label, property } => {
                let label = tokens.label_name(*label);
                let var = label.to_lowercase();
                format!(
                    "CONSTRAINT ON ( {}:{} ) ASSERT exists({}.{})",
                    var,
                    label,
                    var,
                    tokens.property_key_name(*property)
                )
            }
            ConstraintDescriptor::RelationshipPropertyExistence { rel_type, property } => {
                let rel_type = tokens.relationship_type_name(*rel_type);
                let var = rel_type.to_lowercase();
                format!(
                    "CONSTRAINT ON ()-[ {}:{} ]-() ASSERT exists({}.{})",
                    var,
                    rel_type,
                    var,
                    tokens.property_key_name(*property)
                )
            }
        }
    }
}

/// Meta-graph describing which labels exist and how they are connected
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaGraph {
    /// One virtual node per label
    pub nodes: Vec<Node>,
    /// One virtual relationship per observed (start label, type, end label)
    pub relationships: Vec<Relationship>,
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Names;

    impl TokenNameLookup for Names {
        fn label_name(&self, id: LabelId) -> String {
            ["Person", "Movie"][id.0 as usize].to_string()
        }
        fn property_key_name(&self, id: PropertyKeyId) -> String {
            ["name", "title", "since"][id.0 as usize].to_string()
        }
        fn relationship_type_name(&self, id: RelationshipTypeId) -> String {
            ["KNOWS"][id.0 as usize].to_string()
        }
    }

    #[test]
    fn test_index_descriptions() {
        let general = IndexDescriptor::general(LabelId(0), PropertyKeyId(0));
        assert_eq!(general.schema.user_description(&Names), ":Person(name)");
        assert_eq!(
            general.user_description(&Names),
            "Index( GENERAL, :Person(name) )"
        );
        let unique = IndexDescriptor::unique(LabelId(1), PropertyKeyId(1));
        assert_eq!(
            unique.user_description(&Names),
            "Index( UNIQUE, :Movie(title) )"
        );
        assert_eq!(unique.kind.type_name(), "node_unique_property");
        assert_eq!(general.kind.type_name(), "node_label_property");
    }

    #[test]
    fn test_constraint_pretty_print() {
        let unique = ConstraintDescriptor::Uniqueness {
            label: LabelId(0),
            property: PropertyKeyId(0),
        };
        assert_eq!(
            unique.pretty_print(&Names),
            "CONSTRAINT ON ( person:Person ) ASSERT person.name IS UNIQUE"
        );
        let exists = ConstraintDescriptor::NodePropertyExistence {
            label: LabelId(1),
            property: PropertyKeyId(1),
        };
        assert_eq!(
            exists.pretty_print(&Names),
            "CONSTRAINT ON ( movie:Movie ) ASSERT exists(movie.title)"
        );
        let rel = ConstraintDescriptor::RelationshipPropertyExistence {
            rel_type: RelationshipTypeId(0),
            property: PropertyKeyId(2),
        };
        assert_eq!(
            rel.pretty_print(&Names),
            "CONSTRAINT ON ()-[ knows:KNOWS ]-() ASSERT exists(knows.since)"
        );
    }

    #[test]
    fn test_index_state_display() {
        assert_eq!(IndexState::Online.to_string(), "ONLINE");
        assert_eq!(IndexState::Populating.to_string(), "POPULATING");
        assert_eq!(IndexState::Failed.to_string(), "FAILED");
    }
}
