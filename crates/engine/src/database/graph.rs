//! Node and relationship writes
//!
//! Writes keep the automatic indexes in step: a configured property key is
//! copied into `node_auto_index` / `relationship_auto_index`, creating the
//! index on the first matching write.

use std::collections::{BTreeMap, BTreeSet};

use stratagraph_core::{
    EntityType, GraphError, GraphResult, LabelId, NodeId, PropertyKeyId, RelationshipId,
    RelationshipTypeId, Scalar, Value,
};
use tracing::debug;

use super::Database;
use crate::store::{GraphStore, NodeRecord, RelationshipRecord};

impl Database {
    /// Create a node with labels and properties. Null properties are skipped.
    ///
    /// # Errors
    ///
    /// Returns `ConstraintViolation` if a uniqueness or existence constraint
    /// would be broken.
    pub fn create_node(&self, labels: &[&str], properties: &[(&str, Value)]) -> GraphResult<NodeId> {
        let mut store = self.shared.store.write();
        let id = NodeId(store.next_node_id);

        let mut record = NodeRecord::default();
        for label in labels {
            record.labels.insert(LabelId(store.labels.get_or_create(label)));
        }
        for (key, value) in properties {
            if value.is_null() {
                continue;
            }
            let key = PropertyKeyId(store.property_keys.get_or_create(key));
            record.properties.insert(key, value.clone());
        }

        for (key, value) in &record.properties {
            store.check_unique(id, &record.labels, *key, value)?;
        }
        store.check_node_existence(&record.labels, &record.properties)?;

        for key in record.properties.keys() {
            store.record_index_updates(&record.labels, *key);
        }
        self.auto_index(&mut store, EntityType::Node, id.0, properties);
        store.nodes.insert(id, record);
        store.next_node_id += 1;
        debug!(target: "stratagraph::db", node = id.0, "Node created");
        Ok(id)
    }

    /// Add a label to a node
    pub fn add_label(&self, node: NodeId, label: &str) -> GraphResult<()> {
        let mut store = self.shared.store.write();
        if !store.nodes.contains_key(&node) {
            return Err(GraphError::NodeNotFound(node));
        }
        let label = LabelId(store.labels.get_or_create(label));
        let record = store.nodes.get(&node).cloned().unwrap_or_default();
        let mut labels = record.labels.clone();
        labels.insert(label);

        for (key, value) in &record.properties {
            store.check_unique(node, &labels, *key, value)?;
        }
        store.check_node_existence(&labels, &record.properties)?;

        let added: BTreeSet<LabelId> = [label].into_iter().collect();
        for key in record.properties.keys() {
            store.record_index_updates(&added, *key);
        }
        if let Some(record) = store.nodes.get_mut(&node) {
            record.labels = labels;
        }
        Ok(())
    }

    /// Set a node property; a `Null` value removes it
    pub fn set_node_property(&self, node: NodeId, key: &str, value: Value) -> GraphResult<()> {
        let mut store = self.shared.store.write();
        let labels = match store.nodes.get(&node) {
            Some(record) => record.labels.clone(),
            None => return Err(GraphError::NodeNotFound(node)),
        };
        let key_id = PropertyKeyId(store.property_keys.get_or_create(key));

        if value.is_null() {
            let mut remaining = store
                .nodes
                .get(&node)
                .map(|r| r.properties.clone())
                .unwrap_or_default();
            remaining.remove(&key_id);
            store.check_node_existence(&labels, &remaining)?;
        } else {
            store.check_unique(node, &labels, key_id, &value)?;
        }

        store.record_index_updates(&labels, key_id);
        self.reindex(&mut store, EntityType::Node, node.0, key, &value);
        if let Some(record) = store.nodes.get_mut(&node) {
            if value.is_null() {
                record.properties.remove(&key_id);
            } else {
                record.properties.insert(key_id, value);
            }
        }
        Ok(())
    }

    /// Delete a node.
    ///
    /// Its automatic index entries are removed; manual index entries are
    /// left in place and resolve to `NodeNotFound`.
    ///
    /// # Errors
    ///
    /// Returns `ConstraintViolation` if the node still has relationships.
    pub fn delete_node(&self, node: NodeId) -> GraphResult<()> {
        let mut store = self.shared.store.write();
        if !store.nodes.contains_key(&node) {
            return Err(GraphError::NodeNotFound(node));
        }
        if store
            .relationships
            .values()
            .any(|r| r.start == node || r.end == node)
        {
            return Err(GraphError::ConstraintViolation(format!(
                "Node({}) still has relationships",
                node
            )));
        }
        if let Some(record) = store.nodes.remove(&node) {
            for key in record.properties.keys() {
                store.record_index_updates(&record.labels, *key);
            }
        }
        Self::unindex(&mut store, EntityType::Node, node.0);
        Ok(())
    }

    /// Create a relationship between two existing nodes
    pub fn create_relationship(
        &self,
        start: NodeId,
        rel_type: &str,
        end: NodeId,
        properties: &[(&str, Value)],
    ) -> GraphResult<RelationshipId> {
        let mut store = self.shared.store.write();
        for node in [start, end] {
            if !store.nodes.contains_key(&node) {
                return Err(GraphError::NodeNotFound(node));
            }
        }
        let id = RelationshipId(store.next_relationship_id);
        let rel_type = RelationshipTypeId(store.relationship_types.get_or_create(rel_type));
        let mut props = BTreeMap::new();
        for (key, value) in properties {
            if value.is_null() {
                continue;
            }
            props.insert(PropertyKeyId(store.property_keys.get_or_create(key)), value.clone());
        }
        store.check_relationship_existence(rel_type, &props)?;

        self.auto_index(&mut store, EntityType::Relationship, id.0, properties);
        store.relationships.insert(
            id,
            RelationshipRecord {
                rel_type,
                start,
                end,
                properties: props,
            },
        );
        store.next_relationship_id += 1;
        debug!(target: "stratagraph::db", relationship = id.0, "Relationship created");
        Ok(id)
    }

    /// Delete a relationship
    pub fn delete_relationship(&self, id: RelationshipId) -> GraphResult<()> {
        let mut store = self.shared.store.write();
        store
            .relationships
            .remove(&id)
            .ok_or(GraphError::RelationshipNotFound(id))?;
        Self::unindex(&mut store, EntityType::Relationship, id.0);
        Ok(())
    }

    fn auto_index(
        &self,
        store: &mut GraphStore,
        entity: EntityType,
        id: u64,
        properties: &[(&str, Value)],
    ) {
        let settings = self.config.auto_index(entity);
        for (key, value) in properties {
            if !settings.indexes_key(key) {
                continue;
            }
            if let Ok(scalar) = Scalar::try_from(value.clone()) {
                store
                    .manual
                    .get_or_create(entity, entity.auto_index_name())
                    .add(id, key, scalar.index_text());
            }
        }
    }

    fn reindex(&self, store: &mut GraphStore, entity: EntityType, id: u64, key: &str, value: &Value) {
        if !self.config.auto_index(entity).indexes_key(key) {
            return;
        }
        if let Ok(index) = store.manual.get_mut(entity, entity.auto_index_name()) {
            index.remove(id, Some(key));
        }
        self.auto_index(store, entity, id, &[(key, value.clone())]);
    }

    fn unindex(store: &mut GraphStore, entity: EntityType, id: u64) {
        if let Ok(index) = store.manual.get_mut(entity, entity.auto_index_name()) {
            index.remove(id, None);
        }
    }
}
