//! Collaborator trait definitions
//!
//! The procedure layer talks to the engine only through these traits:
//! - [`KernelTransaction`]: issues statements for one caller's transaction
//! - [`Statement`]: a scoped handle exposing [`ReadOperations`]
//! - [`LegacyIndexHits`]: id cursor over a manual index, with scores
//! - [`IndexingService`]: index population and sampling
//! - [`ManualIndexManager`]: manual index administration
//! - [`SchemaGraphBuilder`]: meta-graph construction
//! - [`TokenNameLookup`]: token id to name resolution

use std::collections::BTreeMap;
use std::time::Duration;

use crate::entity::{Node, Relationship};
use crate::error::GraphResult;
use crate::mode::AccessMode;
use crate::query::IndexQuery;
use crate::schema::{
    ConstraintDescriptor, IndexDescriptor, IndexSamplingMode, IndexState, LabelSchemaDescriptor,
    SchemaGraph,
};
use crate::types::{
    EntityType, LabelId, NodeId, PropertyKeyId, RelationshipId, RelationshipTypeId, Token,
};
use crate::value::Scalar;

/// Lazily produced tokens in use
pub type TokenIter = Box<dyn Iterator<Item = Token> + Send>;

/// Manual index configuration, e.g. `{type: exact, provider: lucene}`
pub type IndexConfig = BTreeMap<String, String>;

/// Resolves token ids to names for rendering.
///
/// Lookups never fail: an unknown id renders as a placeholder such as
/// `label[7]`.
pub trait TokenNameLookup {
    /// Name of a label
    fn label_name(&self, id: LabelId) -> String;

    /// Name of a property key
    fn property_key_name(&self, id: PropertyKeyId) -> String;

    /// Name of a relationship type
    fn relationship_type_name(&self, id: RelationshipTypeId) -> String;
}

/// Cursor over entity ids produced by a manual index lookup.
///
/// Emission order is the index's own order. Scores are only meaningful for
/// search queries; an exact lookup may report `None`.
pub trait LegacyIndexHits: Iterator<Item = u64> + Send {
    /// Score of the id most recently returned by `next()`
    fn current_score(&self) -> Option<f32>;
}

/// Reads available through a statement
pub trait ReadOperations {
    /// Labels carried by at least one node, in token order
    fn labels_in_use(&self) -> GraphResult<TokenIter>;

    /// Property keys used by at least one entity, in token order
    fn property_keys_in_use(&self) -> GraphResult<TokenIter>;

    /// Relationship types of at least one relationship, in token order
    fn relationship_types_in_use(&self) -> GraphResult<TokenIter>;

    /// Resolve a label name to its id
    fn label_get_for_name(&self, name: &str) -> Option<LabelId>;

    /// Resolve a property key name to its id
    fn property_key_get_for_name(&self, name: &str) -> Option<PropertyKeyId>;

    /// Name of a label id
    fn label_get_name(&self, id: LabelId) -> GraphResult<String>;

    /// Name of a property key id
    fn property_key_get_name(&self, id: PropertyKeyId) -> GraphResult<String>;

    /// Name of a relationship type id
    fn relationship_type_get_name(&self, id: RelationshipTypeId) -> GraphResult<String>;

    /// All schema indexes
    fn indexes_get_all(&self) -> GraphResult<Vec<IndexDescriptor>>;

    /// The index over a label/property pair; `IndexNotFound` if none
    fn index_get_for_schema(&self, schema: &LabelSchemaDescriptor) -> GraphResult<IndexDescriptor>;

    /// Population state of an index; `IndexNotFound` if it was dropped
    fn index_get_state(&self, index: &IndexDescriptor) -> GraphResult<IndexState>;

    /// All schema constraints
    fn constraints_get_all(&self) -> GraphResult<Vec<ConstraintDescriptor>>;

    /// Exact lookup in a node manual index; `LegacyIndexNotFound` if missing
    fn node_legacy_index_get(
        &self,
        index: &str,
        key: &str,
        value: &Scalar,
    ) -> GraphResult<Box<dyn LegacyIndexHits>>;

    /// Scored search in a node manual index; `LegacyIndexNotFound` if missing
    fn node_legacy_index_query(
        &self,
        index: &str,
        query: &IndexQuery,
    ) -> GraphResult<Box<dyn LegacyIndexHits>>;

    /// Exact lookup in a relationship manual index, optionally bounded by
    /// start and/or end node
    fn relationship_legacy_index_get(
        &self,
        index: &str,
        key: &str,
        value: &Scalar,
        start: Option<NodeId>,
        end: Option<NodeId>,
    ) -> GraphResult<Box<dyn LegacyIndexHits>>;

    /// Scored search in a relationship manual index, optionally bounded by
    /// start and/or end node
    fn relationship_legacy_index_query(
        &self,
        index: &str,
        query: &IndexQuery,
        start: Option<NodeId>,
        end: Option<NodeId>,
    ) -> GraphResult<Box<dyn LegacyIndexHits>>;

    /// Check whether a node exists
    fn node_exists(&self, id: NodeId) -> bool;

    /// Check whether a relationship exists
    fn relationship_exists(&self, id: RelationshipId) -> bool;

    /// Materialize a node
    fn node_get(&self, id: NodeId) -> GraphResult<Node>;

    /// Materialize a relationship
    fn relationship_get(&self, id: RelationshipId) -> GraphResult<Relationship>;
}

/// A transactional read handle.
///
/// Must be closed exactly once; closing consumes it.
pub trait Statement: Send {
    /// Reads bound to this statement
    fn read_operations(&self) -> &dyn ReadOperations;

    /// Release the statement back to its transaction
    fn close(self: Box<Self>);
}

/// The caller's transaction; only leased by the procedure layer
pub trait KernelTransaction: Send + Sync {
    /// Acquire a statement; fails with `TransactionUnavailable` if the
    /// transaction can no longer produce one
    fn acquire_statement(&self) -> GraphResult<Box<dyn Statement>>;

    /// Access mode the transaction was started with
    fn access_mode(&self) -> AccessMode;
}

/// Index population and sampling
pub trait IndexingService: Send + Sync {
    /// Block until the index is online, failed, or the timeout elapses
    fn await_index_online(&self, index: &IndexDescriptor, timeout: Duration) -> GraphResult<()>;

    /// Block until every index is online, one fails, or the timeout elapses
    fn await_all_online(&self, timeout: Duration) -> GraphResult<()>;

    /// Schedule sampling of one index
    fn trigger_sampling(&self, index: &IndexDescriptor, mode: IndexSamplingMode) -> GraphResult<()>;

    /// Schedule sampling of all indexes selected by `mode`
    fn trigger_sampling_all(&self, mode: IndexSamplingMode) -> GraphResult<()>;
}

/// Manual index administration
pub trait ManualIndexManager: Send + Sync {
    /// Get or create a manual index, returning its configuration
    fn get_or_create(&self, entity: EntityType, name: &str) -> GraphResult<IndexConfig>;

    /// Check whether a manual index exists
    fn exists(&self, entity: EntityType, name: &str) -> bool;

    /// Names of all manual indexes for an entity kind, in name order
    fn index_names(&self, entity: EntityType) -> Vec<String>;

    /// Configuration of an existing index; `LegacyIndexNotFound` if missing
    fn configuration(&self, entity: EntityType, name: &str) -> GraphResult<IndexConfig>;

    /// Delete an index; `LegacyIndexNotFound` if missing
    fn delete(&self, entity: EntityType, name: &str) -> GraphResult<()>;

    /// Add an entry, creating the index if needed
    fn add(
        &self,
        entity: EntityType,
        name: &str,
        id: u64,
        key: &str,
        value: &Scalar,
    ) -> GraphResult<()>;

    /// Remove the entity's entries under `key`, or all of its entries when
    /// `key` is `None`
    fn remove(&self, entity: EntityType, name: &str, id: u64, key: Option<&str>) -> GraphResult<()>;
}

/// Builds the schema meta-graph
pub trait SchemaGraphBuilder: Send + Sync {
    /// Build the meta-graph visible to the transaction
    fn build_schema_graph(&self, tx: &dyn KernelTransaction) -> GraphResult<SchemaGraph>;
}
