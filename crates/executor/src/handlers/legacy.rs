//! Manual and automatic index read handlers.
//!
//! Each handler leases a statement, opens a hit cursor and moves both into
//! the returned stream. Entities are materialized as records are pulled.
//!
//! A missing index is treated according to how it was addressed:
//! a user-named index that does not exist is a `LegacyIndexNotFound`
//! failure, while a missing automatic index reads as empty (it only comes
//! into existence on the first matching write).

use stratagraph_core::{
    EntityType, GraphResult, IndexQuery, KernelTransaction, LegacyIndexHits, NodeId,
    ReadOperations, RelationshipId, Scalar, Value,
};

use crate::lease::StatementLease;
use crate::records::{
    NodeResult, Record, RelationshipResult, WeightedNodeResult, WeightedRelationshipResult,
};
use crate::scored::{ScoredHit, ScoredHits};
use crate::stream::ResultStream;
use crate::{Output, Result};

// =============================================================================
// Index targets
// =============================================================================

/// Which manual index an operation addresses
#[derive(Debug, Clone, Copy)]
pub enum IndexTarget<'a> {
    /// A user-named index
    Named(&'a str),
    /// The automatic index of an entity kind
    Auto(EntityType),
}

impl<'a> IndexTarget<'a> {
    fn name(self) -> &'a str {
        match self {
            IndexTarget::Named(name) => name,
            IndexTarget::Auto(entity) => entity.auto_index_name(),
        }
    }
}

/// A leased statement and the cursor opened through it
type Opened = (StatementLease, Box<dyn LegacyIndexHits>);

/// Lease a statement and open a cursor on `target`.
///
/// Returns `None` when the target is an automatic index that does not
/// exist; the lease is already released in that case.
fn open<F>(tx: &dyn KernelTransaction, target: IndexTarget<'_>, lookup: F) -> Result<Option<Opened>>
where
    F: FnOnce(&dyn ReadOperations, &str) -> GraphResult<Box<dyn LegacyIndexHits>>,
{
    let lease = StatementLease::acquire(tx)?;
    let opened = lookup(lease.read()?, target.name());
    match opened {
        Ok(hits) => Ok(Some((lease, hits))),
        Err(e) if e.is_legacy_index_not_found() => {
            lease.close();
            match target {
                IndexTarget::Auto(_) => Ok(None),
                IndexTarget::Named(_) => Err(e.into()),
            }
        }
        Err(e) => Err(e.into()),
    }
}

// =============================================================================
// Streams
// =============================================================================

fn empty() -> Output {
    Output::Records(ResultStream::empty())
}

fn node_stream(opened: Option<Opened>) -> Output {
    let Some((lease, hits)) = opened else {
        return empty();
    };
    Output::Records(ResultStream::leased(lease, hits, |read, id| {
        Ok(Record::from(NodeResult {
            node: read.node_get(NodeId(id))?,
        }))
    }))
}

fn relationship_stream(opened: Option<Opened>) -> Output {
    let Some((lease, hits)) = opened else {
        return empty();
    };
    Output::Records(ResultStream::leased(lease, hits, |read, id| {
        Ok(Record::from(RelationshipResult {
            relationship: read.relationship_get(RelationshipId(id))?,
        }))
    }))
}

fn weighted_node_stream(opened: Option<Opened>) -> Output {
    let Some((lease, hits)) = opened else {
        return empty();
    };
    Output::Records(ResultStream::leased(
        lease,
        ScoredHits::new(hits),
        |read, hit: ScoredHit| {
            Ok(Record::from(WeightedNodeResult {
                node: read.node_get(NodeId(hit.id))?,
                weight: hit.weight(),
            }))
        },
    ))
}

fn weighted_relationship_stream(opened: Option<Opened>) -> Output {
    let Some((lease, hits)) = opened else {
        return empty();
    };
    Output::Records(ResultStream::leased(
        lease,
        ScoredHits::new(hits),
        |read, hit: ScoredHit| {
            Ok(Record::from(WeightedRelationshipResult {
                relationship: read.relationship_get(RelationshipId(hit.id))?,
                weight: hit.weight(),
            }))
        },
    ))
}

// =============================================================================
// Handlers
// =============================================================================

/// Handle `db.index.manual.seek.nodes` and `db.index.auto.seek.nodes`.
pub fn seek_nodes(
    tx: &dyn KernelTransaction,
    target: IndexTarget<'_>,
    key: &str,
    value: Value,
) -> Result<Output> {
    let value = Scalar::try_from(value)?;
    let opened = open(tx, target, |read, index| {
        read.node_legacy_index_get(index, key, &value)
    })?;
    Ok(node_stream(opened))
}

/// Handle `db.index.manual.nodes` and `db.index.auto.nodes`.
pub fn search_nodes(
    tx: &dyn KernelTransaction,
    target: IndexTarget<'_>,
    query: Value,
) -> Result<Output> {
    let query = IndexQuery::try_from(query)?;
    let opened = open(tx, target, |read, index| {
        read.node_legacy_index_query(index, &query)
    })?;
    Ok(weighted_node_stream(opened))
}

/// Handle `db.index.manual.seek.relationships` and
/// `db.index.auto.seek.relationships`.
pub fn seek_relationships(
    tx: &dyn KernelTransaction,
    target: IndexTarget<'_>,
    key: &str,
    value: Value,
) -> Result<Output> {
    let value = Scalar::try_from(value)?;
    let opened = open(tx, target, |read, index| {
        read.relationship_legacy_index_get(index, key, &value, None, None)
    })?;
    Ok(relationship_stream(opened))
}

/// Handle the relationship searches: `db.index.manual.relationships`,
/// `db.index.auto.relationships` and the bounded `in`, `out` and `between`
/// variants.
///
/// `start` and `end` restrict hits to relationships with that start or end
/// node; `None` leaves the side unbounded.
pub fn search_relationships(
    tx: &dyn KernelTransaction,
    target: IndexTarget<'_>,
    query: Value,
    start: Option<NodeId>,
    end: Option<NodeId>,
) -> Result<Output> {
    let query = IndexQuery::try_from(query)?;
    let opened = open(tx, target, |read, index| {
        read.relationship_legacy_index_query(index, &query, start, end)
    })?;
    Ok(weighted_relationship_stream(opened))
}
