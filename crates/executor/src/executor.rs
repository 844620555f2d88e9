//! The Executor - single entry point for procedure calls.
//!
//! The Executor is a stateless dispatcher that routes procedures to their
//! handlers. Every call takes the caller's transaction explicitly; the
//! executor never creates or closes transactions, it only leases statements
//! from them.

use std::sync::Arc;

use stratagraph_core::{
    EntityType, IndexingService, KernelTransaction, ManualIndexManager, SchemaGraphBuilder,
};
use tracing::debug;

use crate::bridge::Collaborators;
use crate::handlers::legacy::IndexTarget;
use crate::handlers::manual::EntityRef;
use crate::procedure::Procedure;
use crate::types::Arg;
use crate::{Error, Output, Result};

/// The procedure executor.
///
/// The Executor is **stateless**: it holds references to the engine
/// collaborators but maintains no state of its own.
///
/// # Thread Safety
///
/// Executor is `Send + Sync` and can be shared across threads; each call
/// works only with the transaction it is given.
///
/// # Example
///
/// ```ignore
/// use stratagraph_executor::{Arg, Executor, Procedure};
///
/// let executor = Executor::from_engine(db.clone());
///
/// // Typed call
/// let output = executor.execute(&tx, Procedure::Labels)?;
///
/// // Call by name with positional arguments
/// let output = executor.call(&tx, "db.awaitIndex", vec![Arg::from(":Person(name)")])?;
/// ```
pub struct Executor {
    collaborators: Arc<Collaborators>,
}

impl Executor {
    /// Create a new executor over the given collaborators.
    pub fn new(collaborators: Collaborators) -> Self {
        Self {
            collaborators: Arc::new(collaborators),
        }
    }

    /// Create an executor whose collaborators are all one engine.
    pub fn from_engine<E>(engine: Arc<E>) -> Self
    where
        E: IndexingService + ManualIndexManager + SchemaGraphBuilder + 'static,
    {
        Self::new(Collaborators::from_engine(engine))
    }

    /// Collaborators the executor calls into
    pub fn collaborators(&self) -> &Collaborators {
        &self.collaborators
    }

    /// Bind positional arguments to the procedure called `name` and execute it.
    ///
    /// See [`Procedure::bind`] for binding failures.
    pub fn call(&self, tx: &dyn KernelTransaction, name: &str, args: Vec<Arg>) -> Result<Output> {
        let procedure = Procedure::bind(name, args)?;
        self.execute(tx, procedure)
    }

    /// Execute a single procedure in the caller's transaction.
    ///
    /// Write procedures are refused in read-only transactions before any
    /// statement is acquired.
    pub fn execute(&self, tx: &dyn KernelTransaction, procedure: Procedure) -> Result<Output> {
        let name = procedure.name();
        if !tx.access_mode().allows(procedure.mode()) {
            return Err(Error::AccessDenied {
                procedure: name.to_string(),
            });
        }
        debug!(target: "stratagraph::executor", procedure = name, "Executing procedure");

        let c = &self.collaborators;
        match procedure {
            // Tokens
            Procedure::Labels => crate::handlers::tokens::labels(tx),
            Procedure::PropertyKeys => crate::handlers::tokens::property_keys(tx),
            Procedure::RelationshipTypes => crate::handlers::tokens::relationship_types(tx),

            // Schema
            Procedure::Indexes => crate::handlers::schema::indexes(tx),
            Procedure::Constraints => crate::handlers::schema::constraints(tx),
            Procedure::Schema => crate::handlers::schema::schema_graph(c, tx),
            Procedure::AwaitIndex {
                index,
                timeout_seconds,
            } => crate::handlers::indexing::await_index(c, tx, &index, timeout_seconds),
            Procedure::AwaitIndexes { timeout_seconds } => {
                crate::handlers::indexing::await_indexes(c, timeout_seconds)
            }
            Procedure::ResampleIndex { index } => {
                crate::handlers::indexing::resample_index(c, tx, &index)
            }
            Procedure::ResampleOutdatedIndexes => {
                crate::handlers::indexing::resample_outdated_indexes(c)
            }

            // Manual index reads
            Procedure::ManualSeekNodes {
                index_name,
                key,
                value,
            } => crate::handlers::legacy::seek_nodes(
                tx,
                IndexTarget::Named(&index_name),
                &key,
                value,
            ),
            Procedure::ManualSearchNodes { index_name, query } => {
                crate::handlers::legacy::search_nodes(tx, IndexTarget::Named(&index_name), query)
            }
            Procedure::ManualSeekRelationships {
                index_name,
                key,
                value,
            } => crate::handlers::legacy::seek_relationships(
                tx,
                IndexTarget::Named(&index_name),
                &key,
                value,
            ),
            Procedure::ManualSearchRelationships { index_name, query } => {
                crate::handlers::legacy::search_relationships(
                    tx,
                    IndexTarget::Named(&index_name),
                    query,
                    None,
                    None,
                )
            }
            Procedure::ManualSearchRelationshipsFrom {
                index_name,
                start,
                query,
            } => crate::handlers::legacy::search_relationships(
                tx,
                IndexTarget::Named(&index_name),
                query,
                Some(start),
                None,
            ),
            Procedure::ManualSearchRelationshipsTo {
                index_name,
                end,
                query,
            } => crate::handlers::legacy::search_relationships(
                tx,
                IndexTarget::Named(&index_name),
                query,
                None,
                Some(end),
            ),
            Procedure::ManualSearchRelationshipsBetween {
                index_name,
                start,
                end,
                query,
            } => crate::handlers::legacy::search_relationships(
                tx,
                IndexTarget::Named(&index_name),
                query,
                Some(start),
                Some(end),
            ),

            // Automatic index reads
            Procedure::AutoSeekNodes { key, value } => crate::handlers::legacy::seek_nodes(
                tx,
                IndexTarget::Auto(EntityType::Node),
                &key,
                value,
            ),
            Procedure::AutoSearchNodes { query } => crate::handlers::legacy::search_nodes(
                tx,
                IndexTarget::Auto(EntityType::Node),
                query,
            ),
            Procedure::AutoSeekRelationships { key, value } => {
                crate::handlers::legacy::seek_relationships(
                    tx,
                    IndexTarget::Auto(EntityType::Relationship),
                    &key,
                    value,
                )
            }
            Procedure::AutoSearchRelationships { query } => {
                crate::handlers::legacy::search_relationships(
                    tx,
                    IndexTarget::Auto(EntityType::Relationship),
                    query,
                    None,
                    None,
                )
            }

            // Manual index management
            Procedure::ManualForNodes { index_name } => {
                crate::handlers::manual::get_or_create(c, EntityType::Node, index_name)
            }
            Procedure::ManualForRelationships { index_name } => {
                crate::handlers::manual::get_or_create(c, EntityType::Relationship, index_name)
            }
            Procedure::ManualExistsForNodes { index_name } => {
                crate::handlers::manual::exists(c, EntityType::Node, &index_name)
            }
            Procedure::ManualExistsForRelationships { index_name } => {
                crate::handlers::manual::exists(c, EntityType::Relationship, &index_name)
            }
            Procedure::ManualList => crate::handlers::manual::list(c),
            Procedure::ManualDrop { index_name } => {
                crate::handlers::manual::drop_index(c, &index_name)
            }
            Procedure::ManualAddNode {
                index_name,
                node,
                key,
                value,
            } => crate::handlers::manual::add(
                c,
                tx,
                &index_name,
                EntityRef::Node(node),
                &key,
                value,
            ),
            Procedure::ManualAddRelationship {
                index_name,
                relationship,
                key,
                value,
            } => crate::handlers::manual::add(
                c,
                tx,
                &index_name,
                EntityRef::Relationship(relationship),
                &key,
                value,
            ),
            Procedure::ManualRemoveNode {
                index_name,
                node,
                key,
            } => crate::handlers::manual::remove(
                c,
                tx,
                &index_name,
                EntityRef::Node(node),
                key.as_deref(),
            ),
            Procedure::ManualRemoveRelationship {
                index_name,
                relationship,
                key,
            } => crate::handlers::manual::remove(
                c,
                tx,
                &index_name,
                EntityRef::Relationship(relationship),
                key.as_deref(),
            ),
        }
    }
}
