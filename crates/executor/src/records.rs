//! Result records produced by procedures.
//!
//! Records are immutable projections of engine answers. Field names follow
//! the procedure's yield columns (`propertyKey`, `type`, ...) when
//! serialized.

use serde::{Deserialize, Serialize};
use stratagraph_core::{EntityType, IndexConfig, IndexDescriptor, IndexState, Node, Relationship};

/// A label in use
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelResult {
    /// Label name
    pub label: String,
}

/// A property key in use
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyKeyResult {
    /// Property key name
    #[serde(rename = "propertyKey")]
    pub property_key: String,
}

/// A relationship type in use
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipTypeResult {
    /// Relationship type name
    #[serde(rename = "relationshipType")]
    pub relationship_type: String,
}

/// A schema index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexResult {
    /// `INDEX ON :Label(property)`
    pub description: String,
    /// `ONLINE`, `POPULATING` or `FAILED`
    pub state: String,
    /// `node_label_property` or `node_unique_property`
    #[serde(rename = "type")]
    pub index_type: String,
}

impl IndexResult {
    /// Project an index, its rendered schema and its state
    pub fn new(index: &IndexDescriptor, schema_description: &str, state: IndexState) -> Self {
        IndexResult {
            description: format!("INDEX ON {}", schema_description),
            state: state.to_string(),
            index_type: index.kind.type_name().to_string(),
        }
    }
}

/// A schema constraint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintResult {
    /// Constraint in DDL form
    pub description: String,
}

/// A manual index and its configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyIndexInfo {
    /// `NODE` or `RELATIONSHIP`
    #[serde(rename = "type")]
    pub entity_type: String,
    /// Index name
    pub name: String,
    /// Index configuration
    pub config: IndexConfig,
}

impl LegacyIndexInfo {
    /// Describe a manual index
    pub fn new(entity: EntityType, name: impl Into<String>, config: IndexConfig) -> Self {
        LegacyIndexInfo {
            entity_type: entity.as_str().to_string(),
            name: name.into(),
            config,
        }
    }
}

/// A node found by a manual index seek
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeResult {
    /// The node
    pub node: Node,
}

/// A relationship found by a manual index seek
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipResult {
    /// The relationship
    pub relationship: Relationship,
}

/// A node found by a manual index search, with its score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedNodeResult {
    /// The node
    pub node: Node,
    /// Relevance score
    pub weight: f64,
}

/// A relationship found by a manual index search, with its score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedRelationshipResult {
    /// The relationship
    pub relationship: Relationship,
    /// Relevance score
    pub weight: f64,
}

/// Outcome of a manual index operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BooleanResult {
    /// Whether the operation succeeded (or the index exists)
    pub success: bool,
}

/// The schema meta-graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaGraphResult {
    /// One virtual node per label
    pub nodes: Vec<Node>,
    /// One virtual relationship per observed label/type/label triple
    pub relationships: Vec<Relationship>,
}

/// Any record a procedure can yield.
///
/// Every procedure yields a single record kind; the variant is fixed by
/// the procedure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Record {
    /// `db.labels`
    Label(LabelResult),
    /// `db.propertyKeys`
    PropertyKey(PropertyKeyResult),
    /// `db.relationshipTypes`
    RelationshipType(RelationshipTypeResult),
    /// `db.indexes`
    Index(IndexResult),
    /// `db.constraints`
    Constraint(ConstraintResult),
    /// Manual index administration
    LegacyIndexInfo(LegacyIndexInfo),
    /// Manual and automatic node seeks
    Node(NodeResult),
    /// Manual and automatic relationship seeks
    Relationship(RelationshipResult),
    /// Manual and automatic node searches
    WeightedNode(WeightedNodeResult),
    /// Manual and automatic relationship searches
    WeightedRelationship(WeightedRelationshipResult),
    /// Existence checks, add and remove
    Boolean(BooleanResult),
    /// `db.schema`
    SchemaGraph(SchemaGraphResult),
}

macro_rules! record_from {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Record {
                fn from(record: $ty) -> Self {
                    Record::$variant(record)
                }
            }
        )*
    };
}

record_from! {
    Label => LabelResult,
    PropertyKey => PropertyKeyResult,
    RelationshipType => RelationshipTypeResult,
    Index => IndexResult,
    Constraint => ConstraintResult,
    LegacyIndexInfo => LegacyIndexInfo,
    Node => NodeResult,
    Relationship => RelationshipResult,
    WeightedNode => WeightedNodeResult,
    WeightedRelationship => WeightedRelationshipResult,
    Boolean => BooleanResult,
    SchemaGraph => SchemaGraphResult,
}

impl Record {
    /// Serialize the record's columns as a JSON object
    pub fn to_json(&self) -> crate::Result<serde_json::Value> {
        let value = match self {
            Record::Label(r) => serde_json::to_value(r)?,
            Record::PropertyKey(r) => serde_json::to_value(r)?,
            Record::RelationshipType(r) => serde_json::to_value(r)?,
            Record::Index(r) => serde_json::to_value(r)?,
            Record::Constraint(r) => serde_json::to_value(r)?,
            Record::LegacyIndexInfo(r) => serde_json::to_value(r)?,
            Record::Node(r) => serde_json::to_value(r)?,
            Record::Relationship(r) => serde_json::to_value(r)?,
            Record::WeightedNode(r) => serde_json::to_value(r)?,
            Record::WeightedRelationship(r) => serde_json::to_value(r)?,
            Record::Boolean(r) => serde_json::to_value(r)?,
            Record::SchemaGraph(r) => serde_json::to_value(r)?,
        };
        Ok(value)
    }
}
