//! Schema listing handlers.
//!
//! Index and constraint listings are sorted, so they are fully materialized
//! and the statement is released before the stream is handed back.

use std::sync::Arc;

use stratagraph_core::{GraphError, KernelTransaction, ReadOperations};

use crate::bridge::{Collaborators, StatementTokens};
use crate::lease::with_statement;
use crate::records::{ConstraintResult, IndexResult, SchemaGraphResult};
use crate::{Error, Output, Result};

use super::records;

/// Handle `db.indexes`.
///
/// Indexes are ordered by their rendered description. An index whose state
/// cannot be read fails the whole listing.
pub fn indexes(tx: &dyn KernelTransaction) -> Result<Output> {
    let listed = with_statement(tx, list_indexes)?;
    Ok(records(listed))
}

fn list_indexes(read: &dyn ReadOperations) -> Result<Vec<IndexResult>> {
    let tokens = StatementTokens::new(read);
    let mut indexes = read.indexes_get_all()?;
    indexes.sort_by_cached_key(|index| index.user_description(&tokens));

    indexes
        .iter()
        .map(|index| {
            let state = read.index_get_state(index).map_err(|e| match e {
                GraphError::IndexNotFound { .. } => Error::IndexNotFound {
                    index: index.user_description(&tokens),
                },
                other => other.into(),
            })?;
            Ok(IndexResult::new(
                index,
                &index.schema.user_description(&tokens),
                state,
            ))
        })
        .collect()
}

/// Handle `db.constraints`.
pub fn constraints(tx: &dyn KernelTransaction) -> Result<Output> {
    let mut descriptions = with_statement(tx, |read| {
        let tokens = StatementTokens::new(read);
        Ok(read
            .constraints_get_all()?
            .iter()
            .map(|constraint| constraint.pretty_print(&tokens))
            .collect::<Vec<_>>())
    })?;
    descriptions.sort();

    Ok(records(
        descriptions
            .into_iter()
            .map(|description| ConstraintResult { description })
            .collect(),
    ))
}

/// Handle `db.schema`.
pub fn schema_graph(c: &Arc<Collaborators>, tx: &dyn KernelTransaction) -> Result<Output> {
    let graph = c.schema.build_schema_graph(tx)?;
    Ok(records(vec![SchemaGraphResult {
        nodes: graph.nodes,
        relationships: graph.relationships,
    }]))
}
