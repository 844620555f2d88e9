//! Test modules for the executor crate.

pub mod legacy;

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use stratagraph_core::{
    AccessMode, ConstraintDescriptor, GraphError, GraphResult, IndexDescriptor, IndexQuery,
    IndexState, KernelTransaction, LabelId, LabelSchemaDescriptor, LegacyIndexHits, Node, NodeId,
    PropertyKeyId, ReadOperations, Relationship, RelationshipId, RelationshipTypeId, Scalar,
    Statement, Token, TokenIter,
};
use stratagraph_engine::{Database, IndexHits, Transaction};

use crate::{Executor, Output, Record};

// =============================================================================
// Engine-backed helpers
// =============================================================================

/// In-memory database, an executor over it and a read-write transaction
pub(crate) fn setup() -> (Arc<Database>, Executor, Transaction) {
    let db = Database::cache();
    let executor = Executor::from_engine(db.clone());
    let tx = db.begin_transaction(AccessMode::ReadWrite);
    (db, executor, tx)
}

/// Drain an output, panicking on the first failed record
pub(crate) fn drain(output: Output) -> Vec<Record> {
    output.collect_records().unwrap()
}

// =============================================================================
// Scripted transaction
// =============================================================================

/// What a [`ScriptedTransaction`]'s statements answer
#[derive(Default)]
pub(crate) struct Script {
    /// Refuse to issue statements
    pub fail_acquire: bool,
    /// Labels in use; `None` makes the enumeration fail
    pub labels: Option<Vec<&'static str>>,
    /// Label names by id
    pub label_names: Vec<&'static str>,
    /// Property key names by id
    pub property_names: Vec<&'static str>,
    /// Schema indexes; a `None` state reports the index as not found
    pub indexes: Vec<(IndexDescriptor, Option<IndexState>)>,
    /// Hits of every manual index query, as (id, score)
    pub hits: Vec<(u64, f32)>,
    /// Node ids that no longer resolve
    pub deleted_nodes: Vec<u64>,
}

/// A transaction whose statements follow a [`Script`] and count every
/// acquire and close.
pub(crate) struct ScriptedTransaction {
    script: Arc<Script>,
    mode: AccessMode,
    acquired: Arc<AtomicUsize>,
    closed: Arc<AtomicUsize>,
}

impl ScriptedTransaction {
    pub(crate) fn new(script: Script) -> Self {
        ScriptedTransaction {
            script: Arc::new(script),
            mode: AccessMode::ReadWrite,
            acquired: Arc::new(AtomicUsize::new(0)),
            closed: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub(crate) fn with_labels(labels: &[&'static str]) -> Self {
        Self::new(Script {
            labels: Some(labels.to_vec()),
            ..Script::default()
        })
    }

    pub(crate) fn acquired(&self) -> usize {
        self.acquired.load(Ordering::SeqCst)
    }

    pub(crate) fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }

    /// Acquired statements not yet closed
    pub(crate) fn open(&self) -> usize {
        self.acquired() - self.closed()
    }
}

impl KernelTransaction for ScriptedTransaction {
    fn acquire_statement(&self) -> GraphResult<Box<dyn Statement>> {
        if self.script.fail_acquire {
            return Err(GraphError::transaction_unavailable("scripted failure"));
        }
        self.acquired.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(ScriptedStatement {
            script: Arc::clone(&self.script),
            closed: Arc::clone(&self.closed),
        }))
    }

    fn access_mode(&self) -> AccessMode {
        self.mode
    }
}

struct ScriptedStatement {
    script: Arc<Script>,
    closed: Arc<AtomicUsize>,
}

impl Statement for ScriptedStatement {
    fn read_operations(&self) -> &dyn ReadOperations {
        self
    }

    fn close(self: Box<Self>) {
        self.closed.fetch_add(1, Ordering::SeqCst);
    }
}

fn name_of(names: &[&'static str], id: u32) -> GraphResult<String> {
    names
        .get(id as usize)
        .map(|name| name.to_string())
        .ok_or_else(|| GraphError::TokenNotFound(format!("token[{}]", id)))
}

fn id_of(names: &[&'static str], name: &str) -> Option<u32> {
    names.iter().position(|n| *n == name).map(|i| i as u32)
}

impl ScriptedStatement {
    fn hits(&self) -> Box<dyn LegacyIndexHits> {
        Box::new(IndexHits::scored(self.script.hits.clone()))
    }
}

impl ReadOperations for ScriptedStatement {
    fn labels_in_use(&self) -> GraphResult<TokenIter> {
        match &self.script.labels {
            Some(labels) => {
                let tokens: Vec<Token> = labels
                    .iter()
                    .enumerate()
                    .map(|(id, name)| Token::new(id as u32, *name))
                    .collect();
                Ok(Box::new(tokens.into_iter()))
            }
            None => Err(GraphError::internal("scripted labels failure")),
        }
    }

    fn property_keys_in_use(&self) -> GraphResult<TokenIter> {
        Ok(Box::new(std::iter::empty()))
    }

    fn relationship_types_in_use(&self) -> GraphResult<TokenIter> {
        Ok(Box::new(std::iter::empty()))
    }

    fn label_get_for_name(&self, name: &str) -> Option<LabelId> {
        id_of(&self.script.label_names, name).map(LabelId)
    }

    fn property_key_get_for_name(&self, name: &str) -> Option<PropertyKeyId> {
        id_of(&self.script.property_names, name).map(PropertyKeyId)
    }

    fn label_get_name(&self, id: LabelId) -> GraphResult<String> {
        name_of(&self.script.label_names, id.0)
    }

    fn property_key_get_name(&self, id: PropertyKeyId) -> GraphResult<String> {
        name_of(&self.script.property_names, id.0)
    }

    fn relationship_type_get_name(&self, id: RelationshipTypeId) -> GraphResult<String> {
        Err(GraphError::TokenNotFound(format!("relationship type {}", id.0)))
    }

    fn indexes_get_all(&self) -> GraphResult<Vec<IndexDescriptor>> {
        Ok(self.script.indexes.iter().map(|(index, _)| *index).collect())
    }

    fn index_get_for_schema(&self, schema: &LabelSchemaDescriptor) -> GraphResult<IndexDescriptor> {
        self.script
            .indexes
            .iter()
            .map(|(index, _)| *index)
            .find(|index| index.schema == *schema)
            .ok_or_else(|| GraphError::IndexNotFound {
                index: format!("{:?}", schema),
            })
    }

    fn index_get_state(&self, index: &IndexDescriptor) -> GraphResult<IndexState> {
        self.script
            .indexes
            .iter()
            .find(|(candidate, _)| candidate == index)
            .and_then(|(_, state)| *state)
            .ok_or_else(|| GraphError::IndexNotFound {
                index: format!("{:?}", index),
            })
    }

    fn constraints_get_all(&self) -> GraphResult<Vec<ConstraintDescriptor>> {
        Ok(Vec::new())
    }

    fn node_legacy_index_get(
        &self,
        _index: &str,
        _key: &str,
        _value: &Scalar,
    ) -> GraphResult<Box<dyn LegacyIndexHits>> {
        Ok(self.hits())
    }

    fn node_legacy_index_query(
        &self,
        _index: &str,
        _query: &IndexQuery,
    ) -> GraphResult<Box<dyn LegacyIndexHits>> {
        Ok(self.hits())
    }

    fn relationship_legacy_index_get(
        &self,
        _index: &str,
        _key: &str,
        _value: &Scalar,
        _start: Option<NodeId>,
        _end: Option<NodeId>,
    ) -> GraphResult<Box<dyn LegacyIndexHits>> {
        Ok(self.hits())
    }

    fn relationship_legacy_index_query(
        &self,
        _index: &str,
        _query: &IndexQuery,
        _start: Option<NodeId>,
        _end: Option<NodeId>,
    ) -> GraphResult<Box<dyn LegacyIndexHits>> {
        Ok(self.hits())
    }

    fn node_exists(&self, id: NodeId) -> bool {
        !self.script.deleted_nodes.contains(&id.0)
    }

    fn relationship_exists(&self, _id: RelationshipId) -> bool {
        false
    }

    fn node_get(&self, id: NodeId) -> GraphResult<Node> {
        if !self.node_exists(id) {
            return Err(GraphError::NodeNotFound(id));
        }
        Ok(Node {
            id,
            labels: Vec::new(),
            properties: BTreeMap::new(),
        })
    }

    fn relationship_get(&self, id: RelationshipId) -> GraphResult<Relationship> {
        Err(GraphError::RelationshipNotFound(id))
    }
}
