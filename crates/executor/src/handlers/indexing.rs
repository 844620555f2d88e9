//! Index lifecycle handlers: await and resample.
//!
//! The index is resolved through a leased statement; for `db.awaitIndex`
//! the lease is held until the wait ends.

use std::sync::Arc;

use stratagraph_core::{
    GraphError, IndexDescriptor, IndexSamplingMode, KernelTransaction, LabelSchemaDescriptor,
    ReadOperations,
};
use tracing::debug;

use crate::bridge::{timeout_from_seconds, Collaborators};
use crate::lease::{with_statement, StatementLease};
use crate::types::IndexSpecifier;
use crate::{Error, Output, Result};

/// Resolve `:Label(property)` to the index over it
fn resolve(read: &dyn ReadOperations, specifier: &IndexSpecifier) -> Result<IndexDescriptor> {
    let label = read
        .label_get_for_name(specifier.label())
        .ok_or_else(|| Error::NoSuchLabel {
            label: specifier.label().to_string(),
        })?;
    let property = read
        .property_key_get_for_name(specifier.property())
        .ok_or_else(|| Error::NoSuchPropertyKey {
            property: specifier.property().to_string(),
        })?;
    read.index_get_for_schema(&LabelSchemaDescriptor::new(label, property))
        .map_err(|e| match e {
            GraphError::IndexNotFound { .. } => Error::IndexNotFound {
                index: specifier.to_string(),
            },
            other => other.into(),
        })
}

/// Handle `db.awaitIndex`.
pub fn await_index(
    c: &Arc<Collaborators>,
    tx: &dyn KernelTransaction,
    index: &str,
    timeout_seconds: i64,
) -> Result<Output> {
    let timeout = timeout_from_seconds(timeout_seconds)?;
    let specifier = IndexSpecifier::parse(index)?;

    let lease = StatementLease::acquire(tx)?;
    let descriptor = resolve(lease.read()?, &specifier)?;
    let waited = c.indexing.await_index_online(&descriptor, timeout);
    lease.close();

    match waited {
        Ok(()) => Ok(Output::Unit),
        Err(GraphError::Timeout { .. }) => Err(Error::ProcedureTimedOut {
            waiting_for: format!("index on {} to come online", specifier),
            seconds: timeout.as_secs(),
        }),
        Err(GraphError::IndexFailed { .. }) => Err(Error::IndexFailed {
            index: specifier.to_string(),
        }),
        Err(e) => Err(e.into()),
    }
}

/// Handle `db.awaitIndexes`.
pub fn await_indexes(c: &Arc<Collaborators>, timeout_seconds: i64) -> Result<Output> {
    let timeout = timeout_from_seconds(timeout_seconds)?;
    c.indexing.await_all_online(timeout)?;
    Ok(Output::Unit)
}

/// Handle `db.resampleIndex`.
pub fn resample_index(
    c: &Arc<Collaborators>,
    tx: &dyn KernelTransaction,
    index: &str,
) -> Result<Output> {
    let specifier = IndexSpecifier::parse(index)?;
    let descriptor = with_statement(tx, |read| resolve(read, &specifier))?;
    c.indexing
        .trigger_sampling(&descriptor, IndexSamplingMode::RebuildAll)?;
    debug!(target: "stratagraph::executor", index = %specifier, "Index resampling scheduled");
    Ok(Output::Unit)
}

/// Handle `db.resampleOutdatedIndexes`.
pub fn resample_outdated_indexes(c: &Arc<Collaborators>) -> Result<Output> {
    c.indexing
        .trigger_sampling_all(IndexSamplingMode::RebuildUpdated)?;
    Ok(Output::Unit)
}
