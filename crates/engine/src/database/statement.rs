//! Statements and the read operations they expose

use std::sync::Arc;

use stratagraph_core::{
    ConstraintDescriptor, EntityType, GraphError, GraphResult, IndexDescriptor, IndexQuery,
    IndexState, LabelId, LabelSchemaDescriptor, LegacyIndexHits, Node, NodeId, PropertyKeyId,
    ReadOperations, Relationship, RelationshipId, RelationshipTypeId, Scalar, Statement, Token,
    TokenIter,
};
use tracing::trace;

use super::transactions::TransactionState;
use super::Shared;
use crate::legacy::IndexHits;
use crate::store::{GraphStore, TokenKind};

/// A statement over the shared store.
///
/// Each read takes the store's read lock for its own duration only.
pub(crate) struct EngineStatement {
    shared: Arc<Shared>,
    state: Arc<TransactionState>,
}

impl EngineStatement {
    pub(crate) fn new(shared: Arc<Shared>, state: Arc<TransactionState>) -> Self {
        trace!(target: "stratagraph::txn", "Statement acquired");
        EngineStatement { shared, state }
    }

    fn in_use(&self, kind: TokenKind) -> TokenIter {
        Box::new(InUseTokens {
            shared: Arc::clone(&self.shared),
            kind,
            next: 0,
        })
    }
}

impl Statement for EngineStatement {
    fn read_operations(&self) -> &dyn ReadOperations {
        self
    }

    fn close(self: Box<Self>) {
        trace!(target: "stratagraph::txn", "Statement closed");
        self.state.statement_closed();
    }
}

/// Lazy enumeration of tokens in use.
///
/// Advances through the token id space, checking usage when pulled.
struct InUseTokens {
    shared: Arc<Shared>,
    kind: TokenKind,
    next: u32,
}

impl Iterator for InUseTokens {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let store = self.shared.store.read();
        let registry = store.registry(self.kind);
        while (self.next as usize) < registry.len() {
            let id = self.next;
            self.next += 1;
            if store.token_in_use(self.kind, id) {
                if let Some(name) = registry.name_of(id) {
                    return Some(Token::new(id, name));
                }
            }
        }
        None
    }
}

fn within_bounds(
    store: &GraphStore,
    id: u64,
    start: Option<NodeId>,
    end: Option<NodeId>,
) -> bool {
    if start.is_none() && end.is_none() {
        return true;
    }
    match store.relationships.get(&RelationshipId(id)) {
        Some(rel) => {
            start.map_or(true, |s| rel.start == s) && end.map_or(true, |e| rel.end == e)
        }
        None => false,
    }
}

impl EngineStatement {
    fn legacy_get(
        &self,
        entity: EntityType,
        index: &str,
        key: &str,
        value: &Scalar,
        start: Option<NodeId>,
        end: Option<NodeId>,
    ) -> GraphResult<Box<dyn LegacyIndexHits>> {
        let store = self.shared.store.read();
        let ids = store
            .manual
            .get(entity, index)?
            .get(key, &value.index_text())
            .into_iter()
            .filter(|id| within_bounds(&store, *id, start, end))
            .collect();
        Ok(Box::new(IndexHits::unscored(ids)))
    }

    fn legacy_query(
        &self,
        entity: EntityType,
        index: &str,
        query: &IndexQuery,
        start: Option<NodeId>,
        end: Option<NodeId>,
    ) -> GraphResult<Box<dyn LegacyIndexHits>> {
        let store = self.shared.store.read();
        let manual = store.manual.get(entity, index)?;
        let clauses = query.clauses()?;
        let hits = manual
            .query(&clauses)
            .into_iter()
            .filter(|(id, _)| within_bounds(&store, *id, start, end))
            .collect();
        Ok(Box::new(IndexHits::scored(hits)))
    }
}

impl ReadOperations for EngineStatement {
    fn labels_in_use(&self) -> GraphResult<TokenIter> {
        Ok(self.in_use(TokenKind::Label))
    }

    fn property_keys_in_use(&self) -> GraphResult<TokenIter> {
        Ok(self.in_use(TokenKind::PropertyKey))
    }

    fn relationship_types_in_use(&self) -> GraphResult<TokenIter> {
        Ok(self.in_use(TokenKind::RelationshipType))
    }

    fn label_get_for_name(&self, name: &str) -> Option<LabelId> {
        self.shared.store.read().labels.id_of(name).map(LabelId)
    }

    fn property_key_get_for_name(&self, name: &str) -> Option<PropertyKeyId> {
        self.shared
            .store
            .read()
            .property_keys
            .id_of(name)
            .map(PropertyKeyId)
    }

    fn label_get_name(&self, id: LabelId) -> GraphResult<String> {
        self.shared
            .store
            .read()
            .labels
            .name_of(id.0)
            .map(str::to_string)
            .ok_or_else(|| GraphError::TokenNotFound(format!("label {}", id.0)))
    }

    fn property_key_get_name(&self, id: PropertyKeyId) -> GraphResult<String> {
        self.shared
            .store
            .read()
            .property_keys
            .name_of(id.0)
            .map(str::to_string)
            .ok_or_else(|| GraphError::TokenNotFound(format!("property key {}", id.0)))
    }

    fn relationship_type_get_name(&self, id: RelationshipTypeId) -> GraphResult<String> {
        self.shared
            .store
            .read()
            .relationship_types
            .name_of(id.0)
            .map(str::to_string)
            .ok_or_else(|| GraphError::TokenNotFound(format!("relationship type {}", id.0)))
    }

    fn indexes_get_all(&self) -> GraphResult<Vec<IndexDescriptor>> {
        Ok(self.shared.store.read().indexes.keys().copied().collect())
    }

    fn index_get_for_schema(&self, schema: &LabelSchemaDescriptor) -> GraphResult<IndexDescriptor> {
        let store = self.shared.store.read();
        store
            .indexes
            .keys()
            .find(|descriptor| descriptor.schema == *schema)
            .copied()
            .ok_or_else(|| GraphError::IndexNotFound {
                index: schema.user_description(&*store),
            })
    }

    fn index_get_state(&self, index: &IndexDescriptor) -> GraphResult<IndexState> {
        let store = self.shared.store.read();
        store
            .indexes
            .get(index)
            .map(|entry| entry.state)
            .ok_or_else(|| GraphError::IndexNotFound {
                index: index.user_description(&*store),
            })
    }

    fn constraints_get_all(&self) -> GraphResult<Vec<ConstraintDescriptor>> {
        Ok(self.shared.store.read().constraints.clone())
    }

    fn node_legacy_index_get(
        &self,
        index: &str,
        key: &str,
        value: &Scalar,
    ) -> GraphResult<Box<dyn LegacyIndexHits>> {
        self.legacy_get(EntityType::Node, index, key, value, None, None)
    }

    fn node_legacy_index_query(
        &self,
        index: &str,
        query: &IndexQuery,
    ) -> GraphResult<Box<dyn LegacyIndexHits>> {
        self.legacy_query(EntityType::Node, index, query, None, None)
    }

    fn relationship_legacy_index_get(
        &self,
        index: &str,
        key: &str,
        value: &Scalar,
        start: Option<NodeId>,
        end: Option<NodeId>,
    ) -> GraphResult<Box<dyn LegacyIndexHits>> {
        self.legacy_get(EntityType::Relationship, index, key, value, start, end)
    }

    fn relationship_legacy_index_query(
        &self,
        index: &str,
        query: &IndexQuery,
        start: Option<NodeId>,
        end: Option<NodeId>,
    ) -> GraphResult<Box<dyn LegacyIndexHits>> {
        self.legacy_query(EntityType::Relationship, index, query, start, end)
    }

    fn node_exists(&self, id: NodeId) -> bool {
        self.shared.store.read().nodes.contains_key(&id)
    }

    fn relationship_exists(&self, id: RelationshipId) -> bool {
        self.shared.store.read().relationships.contains_key(&id)
    }

    fn node_get(&self, id: NodeId) -> GraphResult<Node> {
        self.shared.store.read().node(id)
    }

    fn relationship_get(&self, id: RelationshipId) -> GraphResult<Relationship> {
        self.shared.store.read().relationship(id)
    }
}
