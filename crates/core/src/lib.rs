//! Core types and traits for StrataGraph
//!
//! This crate defines the foundational types used throughout the system:
//! - NodeId / RelationshipId / token ids: Entity and token identifiers
//! - Value / Scalar: Property values and indexable scalars
//! - IndexQuery: Manual index search queries
//! - Node / Relationship: Materialized entities
//! - Schema descriptors: indexes, constraints, index state, schema graph
//! - AccessMode / ProcedureMode: Transaction and procedure effect classes
//! - GraphError: Error type shared by all collaborators
//! - Traits: Collaborator contracts (transaction, statement, reads, indexing)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod entity;
pub mod error;
pub mod mode;
pub mod query;
pub mod schema;
pub mod traits;
pub mod types;
pub mod value;

pub use entity::{Node, Relationship};
pub use error::{GraphError, GraphResult};
pub use mode::{AccessMode, ProcedureMode};
pub use query::{IndexQuery, QueryClause};
pub use schema::{
    ConstraintDescriptor, IndexDescriptor, IndexKind, IndexSamplingMode, IndexState,
    LabelSchemaDescriptor, SchemaGraph,
};
pub use traits::{
    IndexConfig, IndexingService, KernelTransaction, LegacyIndexHits, ManualIndexManager,
    ReadOperations, SchemaGraphBuilder, Statement, TokenIter, TokenNameLookup,
};
pub use types::{
    EntityType, LabelId, NodeId, PropertyKeyId, RelationshipId, RelationshipTypeId, Token,
    NODE_AUTO_INDEX, RELATIONSHIP_AUTO_INDEX,
};
pub use value::{Scalar, Value};
