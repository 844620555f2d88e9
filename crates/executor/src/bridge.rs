//! Bridge module: the engine collaborators procedures call into.
//!
//! This module provides:
//!
//! - [`Collaborators`]: Holds the engine services that sit outside a statement
//! - [`StatementTokens`]: Token name lookup through a leased statement
//! - [`timeout_from_seconds`]: Validates a caller-supplied timeout

use std::sync::Arc;
use std::time::Duration;

use stratagraph_core::{
    IndexingService, LabelId, ManualIndexManager, PropertyKeyId, ReadOperations,
    RelationshipTypeId, SchemaGraphBuilder, TokenNameLookup,
};

use crate::{Error, Result};

// =============================================================================
// Collaborators
// =============================================================================

/// Engine services used alongside the caller's transaction.
///
/// Reads go through a statement leased from the transaction; these services
/// cover index population, manual index administration and the schema
/// meta-graph.
#[derive(Clone)]
pub struct Collaborators {
    /// Index population and sampling
    pub indexing: Arc<dyn IndexingService>,
    /// Manual index administration
    pub manual: Arc<dyn ManualIndexManager>,
    /// Schema meta-graph builder
    pub schema: Arc<dyn SchemaGraphBuilder>,
}

impl Collaborators {
    /// Assemble collaborators from separate services
    pub fn new(
        indexing: Arc<dyn IndexingService>,
        manual: Arc<dyn ManualIndexManager>,
        schema: Arc<dyn SchemaGraphBuilder>,
    ) -> Self {
        Collaborators {
            indexing,
            manual,
            schema,
        }
    }

    /// Use one engine for every service
    pub fn from_engine<E>(engine: Arc<E>) -> Self
    where
        E: IndexingService + ManualIndexManager + SchemaGraphBuilder + 'static,
    {
        Collaborators {
            indexing: engine.clone(),
            manual: engine.clone(),
            schema: engine,
        }
    }
}

// =============================================================================
// Token names
// =============================================================================

/// Resolves token names through a statement's reads.
///
/// A token that cannot be named renders as a placeholder such as
/// `label[3]` so descriptions can always be produced.
pub(crate) struct StatementTokens<'a> {
    read: &'a dyn ReadOperations,
}

impl<'a> StatementTokens<'a> {
    pub(crate) fn new(read: &'a dyn ReadOperations) -> Self {
        StatementTokens { read }
    }
}

impl TokenNameLookup for StatementTokens<'_> {
    fn label_name(&self, id: LabelId) -> String {
        self.read
            .label_get_name(id)
            .unwrap_or_else(|_| format!("label[{}]", id.0))
    }

    fn property_key_name(&self, id: PropertyKeyId) -> String {
        self.read
            .property_key_get_name(id)
            .unwrap_or_else(|_| format!("property[{}]", id.0))
    }

    fn relationship_type_name(&self, id: RelationshipTypeId) -> String {
        self.read
            .relationship_type_get_name(id)
            .unwrap_or_else(|_| format!("relationshipType[{}]", id.0))
    }
}

// =============================================================================
// Validation helpers
// =============================================================================

/// Convert a `timeOutSeconds` argument into a duration.
///
/// # Errors
///
/// Returns `InvalidArgument` for negative values.
pub(crate) fn timeout_from_seconds(seconds: i64) -> Result<Duration> {
    u64::try_from(seconds)
        .map(Duration::from_secs)
        .map_err(|_| Error::InvalidArgument {
            reason: format!("timeOutSeconds must not be negative, got {}", seconds),
        })
}
