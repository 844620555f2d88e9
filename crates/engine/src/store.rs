//! In-memory graph store
//!
//! Holds tokens, entities, schema and manual indexes. The store is always
//! accessed under the database's `RwLock`; nothing here synchronizes.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use stratagraph_core::{
    ConstraintDescriptor, EntityType, GraphError, GraphResult, IndexDescriptor, IndexState,
    LabelId, Node, NodeId, PropertyKeyId, Relationship, RelationshipId, RelationshipTypeId,
    TokenNameLookup, Value,
};

use crate::legacy::ManualIndexes;

/// Token namespace
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenKind {
    Label,
    PropertyKey,
    RelationshipType,
}

/// Name registry for one token namespace; ids are dense and assigned in
/// creation order.
#[derive(Debug, Default)]
pub(crate) struct TokenRegistry {
    names: Vec<String>,
    ids: HashMap<String, u32>,
}

impl TokenRegistry {
    pub(crate) fn get_or_create(&mut self, name: &str) -> u32 {
        if let Some(id) = self.ids.get(name) {
            return *id;
        }
        let id = self.names.len() as u32;
        self.names.push(name.to_string());
        self.ids.insert(name.to_string(), id);
        id
    }

    pub(crate) fn id_of(&self, name: &str) -> Option<u32> {
        self.ids.get(name).copied()
    }

    pub(crate) fn name_of(&self, id: u32) -> Option<&str> {
        self.names.get(id as usize).map(String::as_str)
    }

    pub(crate) fn len(&self) -> usize {
        self.names.len()
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct NodeRecord {
    pub(crate) labels: BTreeSet<LabelId>,
    pub(crate) properties: BTreeMap<PropertyKeyId, Value>,
}

#[derive(Debug, Clone)]
pub(crate) struct RelationshipRecord {
    pub(crate) rel_type: RelationshipTypeId,
    pub(crate) start: NodeId,
    pub(crate) end: NodeId,
    pub(crate) properties: BTreeMap<PropertyKeyId, Value>,
}

/// Bookkeeping for one schema index
#[derive(Debug, Clone)]
pub(crate) struct IndexEntry {
    pub(crate) state: IndexState,
    pub(crate) updates_since_sample: u64,
    pub(crate) sample_count: u64,
}

impl IndexEntry {
    pub(crate) fn new(state: IndexState) -> Self {
        IndexEntry {
            state,
            updates_since_sample: 0,
            sample_count: 0,
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct GraphStore {
    pub(crate) labels: TokenRegistry,
    pub(crate) property_keys: TokenRegistry,
    pub(crate) relationship_types: TokenRegistry,
    pub(crate) nodes: BTreeMap<NodeId, NodeRecord>,
    pub(crate) relationships: BTreeMap<RelationshipId, RelationshipRecord>,
    pub(crate) next_node_id: u64,
    pub(crate) next_relationship_id: u64,
    pub(crate) indexes: BTreeMap<IndexDescriptor, IndexEntry>,
    pub(crate) constraints: Vec<ConstraintDescriptor>,
    pub(crate) manual: ManualIndexes,
}

impl GraphStore {
    pub(crate) fn registry(&self, kind: TokenKind) -> &TokenRegistry {
        match kind {
            TokenKind::Label => &self.labels,
            TokenKind::PropertyKey => &self.property_keys,
            TokenKind::RelationshipType => &self.relationship_types,
        }
    }

    /// A token is in use when at least one live entity references it
    pub(crate) fn token_in_use(&self, kind: TokenKind, id: u32) -> bool {
        match kind {
            TokenKind::Label => self
                .nodes
                .values()
                .any(|n| n.labels.contains(&LabelId(id))),
            TokenKind::PropertyKey => {
                let key = PropertyKeyId(id);
                self.nodes.values().any(|n| n.properties.contains_key(&key))
                    || self
                        .relationships
                        .values()
                        .any(|r| r.properties.contains_key(&key))
            }
            TokenKind::RelationshipType => self
                .relationships
                .values()
                .any(|r| r.rel_type == RelationshipTypeId(id)),
        }
    }

    pub(crate) fn entity_exists(&self, entity: EntityType, id: u64) -> bool {
        match entity {
            EntityType::Node => self.nodes.contains_key(&NodeId(id)),
            EntityType::Relationship => self.relationships.contains_key(&RelationshipId(id)),
        }
    }

    fn property_map(&self, properties: &BTreeMap<PropertyKeyId, Value>) -> BTreeMap<String, Value> {
        properties
            .iter()
            .map(|(key, value)| (self.property_key_name(*key), value.clone()))
            .collect()
    }

    pub(crate) fn label_name(&self, id: LabelId) -> String {
        self.labels
            .name_of(id.0)
            .map(str::to_string)
            .unwrap_or_else(|| format!("label[{}]", id.0))
    }

    pub(crate) fn property_key_name(&self, id: PropertyKeyId) -> String {
        self.property_keys
            .name_of(id.0)
            .map(str::to_string)
            .unwrap_or_else(|| format!("property[{}]", id.0))
    }

    pub(crate) fn relationship_type_name(&self, id: RelationshipTypeId) -> String {
        self.relationship_types
            .name_of(id.0)
            .map(str::to_string)
            .unwrap_or_else(|| format!("relationshipType[{}]", id.0))
    }

    pub(crate) fn node(&self, id: NodeId) -> GraphResult<Node> {
        let record = self.nodes.get(&id).ok_or(GraphError::NodeNotFound(id))?;
        Ok(Node {
            id,
            labels: record.labels.iter().map(|l| self.label_name(*l)).collect(),
            properties: self.property_map(&record.properties),
        })
    }

    pub(crate) fn relationship(&self, id: RelationshipId) -> GraphResult<Relationship> {
        let record = self
            .relationships
            .get(&id)
            .ok_or(GraphError::RelationshipNotFound(id))?;
        Ok(Relationship {
            id,
            rel_type: self.relationship_type_name(record.rel_type),
            start: record.start,
            end: record.end,
            properties: self.property_map(&record.properties),
        })
    }

    /// Fails if another node with `label` already holds `value` under a
    /// uniqueness-constrained `key`.
    pub(crate) fn check_unique(
        &self,
        node: NodeId,
        labels: &BTreeSet<LabelId>,
        key: PropertyKeyId,
        value: &Value,
    ) -> GraphResult<()> {
        for constraint in &self.constraints {
            if let ConstraintDescriptor::Uniqueness { label, property } = constraint {
                if *property != key || !labels.contains(label) {
                    continue;
                }
                let clash = self.nodes.iter().any(|(id, other)| {
                    *id != node
                        && other.labels.contains(label)
                        && other.properties.get(&key) == Some(value)
                });
                if clash {
                    return Err(GraphError::ConstraintViolation(format!(
                        "Node({}) already exists with label `{}` and property `{}`",
                        node,
                        self.label_name(*label),
                        self.property_key_name(key)
                    )));
                }
            }
        }
        Ok(())
    }

    /// Fails if a node carrying `labels` lacks a property required by an
    /// existence constraint.
    pub(crate) fn check_node_existence(
        &self,
        labels: &BTreeSet<LabelId>,
        properties: &BTreeMap<PropertyKeyId, Value>,
    ) -> GraphResult<()> {
        for constraint in &self.constraints {
            if let ConstraintDescriptor::NodePropertyExistence { label, property } = constraint {
                if labels.contains(label) && !properties.contains_key(property) {
                    return Err(GraphError::ConstraintViolation(format!(
                        "Node with label `{}` must have the property `{}`",
                        self.label_name(*label),
                        self.property_key_name(*property)
                    )));
                }
            }
        }
        Ok(())
    }

    pub(crate) fn check_relationship_existence(
        &self,
        rel_type: RelationshipTypeId,
        properties: &BTreeMap<PropertyKeyId, Value>,
    ) -> GraphResult<()> {
        for constraint in &self.constraints {
            if let ConstraintDescriptor::RelationshipPropertyExistence {
                rel_type: constrained,
                property,
            } = constraint
            {
                if *constrained == rel_type && !properties.contains_key(property) {
                    return Err(GraphError::ConstraintViolation(format!(
                        "Relationship of type `{}` must have the property `{}`",
                        self.relationship_type_name(rel_type),
                        self.property_key_name(*property)
                    )));
                }
            }
        }
        Ok(())
    }

    /// Count an update against every index covering a (label, key) pair
    pub(crate) fn record_index_updates(&mut self, labels: &BTreeSet<LabelId>, key: PropertyKeyId) {
        for (descriptor, entry) in self.indexes.iter_mut() {
            if descriptor.schema.property == key && labels.contains(&descriptor.schema.label) {
                entry.updates_since_sample += 1;
            }
        }
    }
}

impl TokenNameLookup for GraphStore {
    fn label_name(&self, id: LabelId) -> String {
        GraphStore::label_name(self, id)
    }

    fn property_key_name(&self, id: PropertyKeyId) -> String {
        GraphStore::property_key_name(self, id)
    }

    fn relationship_type_name(&self, id: RelationshipTypeId) -> String {
        GraphStore::relationship_type_name(self, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_registry_assigns_dense_ids() {
        let mut registry = TokenRegistry::default();
        assert_eq!(registry.get_or_create("Person"), 0);
        assert_eq!(registry.get_or_create("Movie"), 1);
        assert_eq!(registry.get_or_create("Person"), 0);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.id_of("Movie"), Some(1));
        assert_eq!(registry.name_of(1), Some("Movie"));
        assert_eq!(registry.name_of(9), None);
    }

    #[test]
    fn test_unknown_tokens_render_placeholders() {
        let store = GraphStore::default();
        assert_eq!(store.label_name(LabelId(3)), "label[3]");
        assert_eq!(store.property_key_name(PropertyKeyId(1)), "property[1]");
    }

    #[test]
    fn test_label_in_use_requires_a_node() {
        let mut store = GraphStore::default();
        let person = store.labels.get_or_create("Person");
        assert!(!store.token_in_use(TokenKind::Label, person));

        let mut record = NodeRecord::default();
        record.labels.insert(LabelId(person));
        store.nodes.insert(NodeId(0), record);
        assert!(store.token_in_use(TokenKind::Label, person));
    }
}
