//! Manual index administration

use stratagraph_core::{
    EntityType, GraphError, GraphResult, IndexConfig, ManualIndexManager, NodeId, RelationshipId,
    Scalar,
};
use tracing::{debug, info};

use super::Database;

impl ManualIndexManager for Database {
    fn get_or_create(&self, entity: EntityType, name: &str) -> GraphResult<IndexConfig> {
        let mut store = self.shared.store.write();
        if !store.manual.indexes(entity).contains_key(name) {
            info!(target: "stratagraph::db", entity = %entity, index = name, "Manual index created");
        }
        Ok(store.manual.get_or_create(entity, name).config().clone())
    }

    fn exists(&self, entity: EntityType, name: &str) -> bool {
        self.shared
            .store
            .read()
            .manual
            .indexes(entity)
            .contains_key(name)
    }

    fn index_names(&self, entity: EntityType) -> Vec<String> {
        self.shared
            .store
            .read()
            .manual
            .indexes(entity)
            .keys()
            .cloned()
            .collect()
    }

    fn configuration(&self, entity: EntityType, name: &str) -> GraphResult<IndexConfig> {
        let store = self.shared.store.read();
        Ok(store.manual.get(entity, name)?.config().clone())
    }

    fn delete(&self, entity: EntityType, name: &str) -> GraphResult<()> {
        let mut store = self.shared.store.write();
        store
            .manual
            .indexes_mut(entity)
            .remove(name)
            .ok_or_else(|| GraphError::LegacyIndexNotFound {
                entity,
                name: name.to_string(),
            })?;
        info!(target: "stratagraph::db", entity = %entity, index = name, "Manual index dropped");
        Ok(())
    }

    fn add(
        &self,
        entity: EntityType,
        name: &str,
        id: u64,
        key: &str,
        value: &Scalar,
    ) -> GraphResult<()> {
        let mut store = self.shared.store.write();
        if !store.entity_exists(entity, id) {
            return Err(match entity {
                EntityType::Node => GraphError::NodeNotFound(NodeId(id)),
                EntityType::Relationship => GraphError::RelationshipNotFound(RelationshipId(id)),
            });
        }
        store
            .manual
            .get_or_create(entity, name)
            .add(id, key, value.index_text());
        debug!(target: "stratagraph::db", entity = %entity, index = name, id, key, "Manual index entry added");
        Ok(())
    }

    fn remove(&self, entity: EntityType, name: &str, id: u64, key: Option<&str>) -> GraphResult<()> {
        let mut store = self.shared.store.write();
        store.manual.get_mut(entity, name)?.remove(id, key);
        debug!(target: "stratagraph::db", entity = %entity, index = name, id, key = ?key, "Manual index entries removed");
        Ok(())
    }
}
