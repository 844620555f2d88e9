//! Schema writes and the schema meta-graph

use std::collections::{BTreeMap, BTreeSet};

use stratagraph_core::{
    ConstraintDescriptor, GraphError, GraphResult, IndexDescriptor, IndexState,
    KernelTransaction, LabelId, Node, NodeId, PropertyKeyId, Relationship, RelationshipId,
    RelationshipTypeId, SchemaGraph, SchemaGraphBuilder, Value,
};
use tracing::info;

use super::{Database, IndexPopulation};
use crate::store::{GraphStore, IndexEntry, TokenKind};

impl Database {
    /// Create a general index over `:label(property)`.
    ///
    /// The index is `ONLINE` immediately, or `POPULATING` when the database
    /// is configured for deferred population.
    pub fn create_index(&self, label: &str, property: &str) -> GraphResult<IndexDescriptor> {
        let state = match self.config.index_population {
            IndexPopulation::Immediate => IndexState::Online,
            IndexPopulation::Deferred => IndexState::Populating,
        };
        let descriptor = {
            let mut store = self.shared.store.write();
            let descriptor = IndexDescriptor::general(
                LabelId(store.labels.get_or_create(label)),
                PropertyKeyId(store.property_keys.get_or_create(property)),
            );
            Self::insert_index(&mut store, descriptor, state)?;
            descriptor
        };
        self.shared.notify_index_change();
        Ok(descriptor)
    }

    fn insert_index(
        store: &mut GraphStore,
        descriptor: IndexDescriptor,
        state: IndexState,
    ) -> GraphResult<()> {
        let description = descriptor.schema.user_description(&*store);
        if store.indexes.keys().any(|d| d.schema == descriptor.schema) {
            return Err(GraphError::ConstraintViolation(format!(
                "There already exists an index {}",
                description
            )));
        }
        store.indexes.insert(descriptor, IndexEntry::new(state));
        info!(target: "stratagraph::db", index = %description, state = %state, "Index created");
        Ok(())
    }

    /// Drop an index
    pub fn drop_index(&self, descriptor: &IndexDescriptor) -> GraphResult<()> {
        {
            let mut store = self.shared.store.write();
            let description = descriptor.user_description(&*store);
            if store.indexes.remove(descriptor).is_none() {
                return Err(GraphError::IndexNotFound { index: description });
            }
            info!(target: "stratagraph::db", index = %description, "Index dropped");
        }
        self.shared.notify_index_change();
        Ok(())
    }

    /// Mark a populating index online and wake waiters
    pub fn complete_index_population(&self, descriptor: &IndexDescriptor) -> GraphResult<()> {
        self.set_index_state(descriptor, IndexState::Online)
    }

    /// Mark a populating index failed and wake waiters
    pub fn fail_index_population(&self, descriptor: &IndexDescriptor) -> GraphResult<()> {
        self.set_index_state(descriptor, IndexState::Failed)
    }

    fn set_index_state(&self, descriptor: &IndexDescriptor, state: IndexState) -> GraphResult<()> {
        {
            let mut store = self.shared.store.write();
            let description = descriptor.user_description(&*store);
            let entry = store
                .indexes
                .get_mut(descriptor)
                .ok_or_else(|| GraphError::IndexNotFound {
                    index: description.clone(),
                })?;
            entry.state = state;
            info!(target: "stratagraph::db", index = %description, state = %state, "Index state changed");
        }
        self.shared.notify_index_change();
        Ok(())
    }

    /// Number of times the index has been sampled
    pub fn index_sample_count(&self, descriptor: &IndexDescriptor) -> GraphResult<u64> {
        self.with_index_entry(descriptor, |entry| entry.sample_count)
    }

    /// Updates applied to the index since its last sample
    pub fn index_updates_since_sample(&self, descriptor: &IndexDescriptor) -> GraphResult<u64> {
        self.with_index_entry(descriptor, |entry| entry.updates_since_sample)
    }

    fn with_index_entry<T>(
        &self,
        descriptor: &IndexDescriptor,
        f: impl FnOnce(&IndexEntry) -> T,
    ) -> GraphResult<T> {
        let store = self.shared.store.read();
        store
            .indexes
            .get(descriptor)
            .map(f)
            .ok_or_else(|| GraphError::IndexNotFound {
                index: descriptor.user_description(&*store),
            })
    }

    /// Create a uniqueness constraint and its backing unique index.
    ///
    /// # Errors
    ///
    /// Returns `ConstraintViolation` if existing nodes already share a value,
    /// or an index over the same schema exists.
    pub fn create_uniqueness_constraint(
        &self,
        label: &str,
        property: &str,
    ) -> GraphResult<ConstraintDescriptor> {
        let constraint = {
            let mut store = self.shared.store.write();
            let label = LabelId(store.labels.get_or_create(label));
            let property = PropertyKeyId(store.property_keys.get_or_create(property));

            let mut seen = Vec::new();
            for record in store.nodes.values() {
                if !record.labels.contains(&label) {
                    continue;
                }
                if let Some(value) = record.properties.get(&property) {
                    if seen.contains(&value) {
                        return Err(GraphError::ConstraintViolation(format!(
                            "Existing nodes with label `{}` share a value for `{}`",
                            store.label_name(label),
                            store.property_key_name(property)
                        )));
                    }
                    seen.push(value);
                }
            }

            let constraint = ConstraintDescriptor::Uniqueness { label, property };
            Self::insert_index(
                &mut store,
                IndexDescriptor::unique(label, property),
                IndexState::Online,
            )?;
            Self::insert_constraint(&mut store, constraint)?;
            constraint
        };
        self.shared.notify_index_change();
        Ok(constraint)
    }

    /// Require every node with `label` to have `property`
    pub fn create_node_property_existence_constraint(
        &self,
        label: &str,
        property: &str,
    ) -> GraphResult<ConstraintDescriptor> {
        let mut store = self.shared.store.write();
        let label = LabelId(store.labels.get_or_create(label));
        let property = PropertyKeyId(store.property_keys.get_or_create(property));
        let violated = store
            .nodes
            .values()
            .any(|n| n.labels.contains(&label) && !n.properties.contains_key(&property));
        if violated {
            return Err(GraphError::ConstraintViolation(format!(
                "Existing nodes with label `{}` lack `{}`",
                store.label_name(label),
                store.property_key_name(property)
            )));
        }
        let constraint = ConstraintDescriptor::NodePropertyExistence { label, property };
        Self::insert_constraint(&mut store, constraint)?;
        Ok(constraint)
    }

    /// Require every relationship of `rel_type` to have `property`
    pub fn create_relationship_property_existence_constraint(
        &self,
        rel_type: &str,
        property: &str,
    ) -> GraphResult<ConstraintDescriptor> {
        let mut store = self.shared.store.write();
        let rel_type = RelationshipTypeId(store.relationship_types.get_or_create(rel_type));
        let property = PropertyKeyId(store.property_keys.get_or_create(property));
        let violated = store
            .relationships
            .values()
            .any(|r| r.rel_type == rel_type && !r.properties.contains_key(&property));
        if violated {
            return Err(GraphError::ConstraintViolation(format!(
                "Existing relationships of type `{}` lack `{}`",
                store.relationship_type_name(rel_type),
                store.property_key_name(property)
            )));
        }
        let constraint = ConstraintDescriptor::RelationshipPropertyExistence { rel_type, property };
        Self::insert_constraint(&mut store, constraint)?;
        Ok(constraint)
    }

    fn insert_constraint(store: &mut GraphStore, constraint: ConstraintDescriptor) -> GraphResult<()> {
        if store.constraints.contains(&constraint) {
            return Err(GraphError::ConstraintViolation(format!(
                "Constraint already exists: {}",
                constraint.pretty_print(&*store)
            )));
        }
        info!(
            target: "stratagraph::db",
            constraint = %constraint.pretty_print(&*store),
            "Constraint created"
        );
        store.constraints.push(constraint);
        Ok(())
    }

    fn schema_graph(&self) -> SchemaGraph {
        let store = self.shared.store.read();

        let mut nodes = Vec::new();
        let mut virtual_ids: BTreeMap<LabelId, NodeId> = BTreeMap::new();
        for id in 0..store.labels.len() as u32 {
            if !store.token_in_use(TokenKind::Label, id) {
                continue;
            }
            let name = store.label_name(LabelId(id));
            let node_id = NodeId(nodes.len() as u64);
            virtual_ids.insert(LabelId(id), node_id);
            nodes.push(Node {
                id: node_id,
                labels: vec![name.clone()],
                properties: [("name".to_string(), Value::String(name))].into_iter().collect(),
            });
        }

        let mut triples: BTreeSet<(LabelId, RelationshipTypeId, LabelId)> = BTreeSet::new();
        for rel in store.relationships.values() {
            let (Some(start), Some(end)) = (store.nodes.get(&rel.start), store.nodes.get(&rel.end))
            else {
                continue;
            };
            for s in &start.labels {
                for e in &end.labels {
                    triples.insert((*s, rel.rel_type, *e));
                }
            }
        }

        let relationships = triples
            .into_iter()
            .filter_map(|(s, t, e)| Some((*virtual_ids.get(&s)?, t, *virtual_ids.get(&e)?)))
            .enumerate()
            .map(|(i, (start, t, end))| Relationship {
                id: RelationshipId(i as u64),
                rel_type: store.relationship_type_name(t),
                start,
                end,
                properties: BTreeMap::new(),
            })
            .collect();

        SchemaGraph {
            nodes,
            relationships,
        }
    }
}

impl SchemaGraphBuilder for Database {
    fn build_schema_graph(&self, tx: &dyn KernelTransaction) -> GraphResult<SchemaGraph> {
        // holding a statement proves the transaction is still usable
        let statement = tx.acquire_statement()?;
        let graph = self.schema_graph();
        statement.close();
        Ok(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::super::{Database, GraphConfig, IndexPopulation};
    use stratagraph_core::{
        AccessMode, GraphError, IndexState, KernelTransaction, SchemaGraphBuilder, Value,
    };

    #[test]
    fn test_index_state_follows_population_mode() {
        let db = Database::cache();
        let online = db.create_index("Person", "name").unwrap();

        let deferred = Database::with_config(
            GraphConfig::default().with_index_population(IndexPopulation::Deferred),
        );
        let populating = deferred.create_index("Person", "name").unwrap();

        let tx = db.begin_transaction(AccessMode::ReadOnly);
        let statement = tx.acquire_statement().unwrap();
        assert_eq!(
            statement.read_operations().index_get_state(&online).unwrap(),
            IndexState::Online
        );
        statement.close();

        let tx = deferred.begin_transaction(AccessMode::ReadOnly);
        let statement = tx.acquire_statement().unwrap();
        assert_eq!(
            statement.read_operations().index_get_state(&populating).unwrap(),
            IndexState::Populating
        );
        statement.close();
    }

    #[test]
    fn test_duplicate_index_rejected() {
        let db = Database::cache();
        db.create_index("Person", "name").unwrap();
        assert!(matches!(
            db.create_index("Person", "name"),
            Err(GraphError::ConstraintViolation(_))
        ));
    }

    #[test]
    fn test_uniqueness_constraint_enforced() {
        let db = Database::cache();
        db.create_node(&["Person"], &[("name", Value::from("Keanu"))]).unwrap();
        db.create_uniqueness_constraint("Person", "name").unwrap();
        assert!(matches!(
            db.create_node(&["Person"], &[("name", Value::from("Keanu"))]),
            Err(GraphError::ConstraintViolation(_))
        ));
        db.create_node(&["Movie"], &[("name", Value::from("Keanu"))]).unwrap();
    }

    #[test]
    fn test_uniqueness_constraint_rejects_existing_duplicates() {
        let db = Database::cache();
        db.create_node(&["Person"], &[("name", Value::from("Keanu"))]).unwrap();
        db.create_node(&["Person"], &[("name", Value::from("Keanu"))]).unwrap();
        assert!(db.create_uniqueness_constraint("Person", "name").is_err());
    }

    #[test]
    fn test_existence_constraints() {
        let db = Database::cache();
        db.create_node_property_existence_constraint("Person", "name").unwrap();
        assert!(db.create_node(&["Person"], &[]).is_err());
        let id = db.create_node(&["Person"], &[("name", Value::from("Keanu"))]).unwrap();
        assert!(db.set_node_property(id, "name", Value::Null).is_err());

        db.create_relationship_property_existence_constraint("KNOWS", "since").unwrap();
        let other = db.create_node(&[], &[]).unwrap();
        assert!(db.create_relationship(id, "KNOWS", other, &[]).is_err());
        assert!(db
            .create_relationship(id, "KNOWS", other, &[("since", Value::Int(1999))])
            .is_ok());
    }

    #[test]
    fn test_schema_graph_one_node_per_label() {
        let db = Database::cache();
        let keanu = db.create_node(&["Person"], &[]).unwrap();
        let matrix = db.create_node(&["Movie"], &[]).unwrap();
        let carrie = db.create_node(&["Person"], &[]).unwrap();
        db.create_relationship(keanu, "ACTED_IN", matrix, &[]).unwrap();
        db.create_relationship(carrie, "ACTED_IN", matrix, &[]).unwrap();

        let tx = db.begin_transaction(AccessMode::ReadOnly);
        let graph = db.build_schema_graph(&tx).unwrap();
        assert_eq!(tx.open_statements(), 0);

        let names: Vec<&str> = graph.nodes.iter().map(|n| n.labels[0].as_str()).collect();
        assert_eq!(names, vec!["Person", "Movie"]);
        assert_eq!(graph.nodes[0].property("name"), Some(&Value::from("Person")));
        assert_eq!(graph.relationships.len(), 1);
        let rel = &graph.relationships[0];
        assert_eq!(rel.rel_type, "ACTED_IN");
        assert_eq!(rel.start, graph.nodes[0].id);
        assert_eq!(rel.end, graph.nodes[1].id);
    }

    #[test]
    fn test_schema_graph_needs_live_transaction() {
        let db = Database::cache();
        let tx = db.begin_transaction(AccessMode::ReadOnly);
        tx.close().unwrap();
        assert!(matches!(
            db.build_schema_graph(&tx),
            Err(GraphError::TransactionUnavailable { .. })
        ));
    }
}
