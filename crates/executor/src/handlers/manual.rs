//! Manual index management handlers.
//!
//! These go straight to the manual index manager. Only `add` and `remove`
//! lease a statement, to check that the entity exists in the caller's
//! transaction before touching the index.

use std::sync::Arc;

use stratagraph_core::{
    EntityType, KernelTransaction, NodeId, ReadOperations, RelationshipId, Scalar, Value,
};
use tracing::debug;

use crate::bridge::Collaborators;
use crate::lease::with_statement;
use crate::records::{BooleanResult, LegacyIndexInfo};
use crate::{Error, Output, Result};

use super::records;

/// An entity addressed by add/remove
#[derive(Debug, Clone, Copy)]
pub enum EntityRef {
    Node(NodeId),
    Relationship(RelationshipId),
}

impl EntityRef {
    fn entity_type(self) -> EntityType {
        match self {
            EntityRef::Node(_) => EntityType::Node,
            EntityRef::Relationship(_) => EntityType::Relationship,
        }
    }

    fn id(self) -> u64 {
        match self {
            EntityRef::Node(id) => id.as_u64(),
            EntityRef::Relationship(id) => id.as_u64(),
        }
    }

    fn ensure_exists(self, read: &dyn ReadOperations) -> Result<()> {
        match self {
            EntityRef::Node(id) if !read.node_exists(id) => {
                Err(Error::NodeNotFound { id: id.as_u64() })
            }
            EntityRef::Relationship(id) if !read.relationship_exists(id) => {
                Err(Error::RelationshipNotFound { id: id.as_u64() })
            }
            _ => Ok(()),
        }
    }
}

fn success() -> Output {
    records(vec![BooleanResult { success: true }])
}

/// Handle `db.index.manual.forNodes` and `db.index.manual.forRelationships`.
pub fn get_or_create(c: &Arc<Collaborators>, entity: EntityType, name: String) -> Result<Output> {
    let config = c.manual.get_or_create(entity, &name)?;
    Ok(records(vec![LegacyIndexInfo::new(entity, name, config)]))
}

/// Handle `db.index.manual.exists.forNodes` and
/// `db.index.manual.exists.forRelationships`.
pub fn exists(c: &Arc<Collaborators>, entity: EntityType, name: &str) -> Result<Output> {
    Ok(records(vec![BooleanResult {
        success: c.manual.exists(entity, name),
    }]))
}

/// Handle `db.index.manual.list`.
///
/// Node indexes come first, then relationship indexes, each in name order.
pub fn list(c: &Arc<Collaborators>) -> Result<Output> {
    let mut infos = Vec::new();
    for entity in [EntityType::Node, EntityType::Relationship] {
        for name in c.manual.index_names(entity) {
            let config = c.manual.configuration(entity, &name)?;
            infos.push(LegacyIndexInfo::new(entity, name, config));
        }
    }
    Ok(records(infos))
}

/// Handle `db.index.manual.drop`.
///
/// Yields one record for each entity kind that had an index of this name.
pub fn drop_index(c: &Arc<Collaborators>, name: &str) -> Result<Output> {
    let mut dropped = Vec::with_capacity(2);
    for entity in [EntityType::Node, EntityType::Relationship] {
        if c.manual.exists(entity, name) {
            let config = c.manual.configuration(entity, name)?;
            c.manual.delete(entity, name)?;
            dropped.push(LegacyIndexInfo::new(entity, name, config));
        }
    }
    debug!(target: "stratagraph::executor", index = name, dropped = dropped.len(), "Manual index dropped");
    Ok(records(dropped))
}

/// Handle `db.index.manual.add.node` and `db.index.manual.add.relationship`.
pub fn add(
    c: &Arc<Collaborators>,
    tx: &dyn KernelTransaction,
    name: &str,
    entity: EntityRef,
    key: &str,
    value: Value,
) -> Result<Output> {
    let value = Scalar::try_from(value)?;
    with_statement(tx, |read| entity.ensure_exists(read))?;
    c.manual
        .add(entity.entity_type(), name, entity.id(), key, &value)?;
    Ok(success())
}

/// Handle `db.index.manual.remove.node` and
/// `db.index.manual.remove.relationship`.
///
/// Without a key every entry of the entity is removed. The index is
/// created if it does not exist yet.
pub fn remove(
    c: &Arc<Collaborators>,
    tx: &dyn KernelTransaction,
    name: &str,
    entity: EntityRef,
    key: Option<&str>,
) -> Result<Output> {
    with_statement(tx, |read| entity.ensure_exists(read))?;
    c.manual.get_or_create(entity.entity_type(), name)?;
    c.manual.remove(entity.entity_type(), name, entity.id(), key)?;
    Ok(success())
}
