//! Token listing handlers.
//!
//! Tokens in use are enumerated lazily by the engine, so the statement lease
//! moves into the returned stream.

use stratagraph_core::{GraphResult, KernelTransaction, ReadOperations, Token, TokenIter};

use crate::lease::StatementLease;
use crate::records::{LabelResult, PropertyKeyResult, Record, RelationshipTypeResult};
use crate::stream::ResultStream;
use crate::{Output, Result};

fn token_stream<R>(
    tx: &dyn KernelTransaction,
    in_use: fn(&dyn ReadOperations) -> GraphResult<TokenIter>,
    project: fn(Token) -> R,
) -> Result<Output>
where
    R: Into<Record> + 'static,
{
    let lease = StatementLease::acquire(tx)?;
    let tokens = in_use(lease.read()?)?;
    Ok(Output::Records(ResultStream::leased(
        lease,
        tokens,
        move |_, token| Ok(project(token).into()),
    )))
}

/// Handle `db.labels`.
pub fn labels(tx: &dyn KernelTransaction) -> Result<Output> {
    token_stream(tx, |read| read.labels_in_use(), |token| LabelResult {
        label: token.name,
    })
}

/// Handle `db.propertyKeys`.
pub fn property_keys(tx: &dyn KernelTransaction) -> Result<Output> {
    token_stream(tx, |read| read.property_keys_in_use(), |token| {
        PropertyKeyResult {
            property_key: token.name,
        }
    })
}

/// Handle `db.relationshipTypes`.
pub fn relationship_types(tx: &dyn KernelTransaction) -> Result<Output> {
    token_stream(tx, |read| read.relationship_types_in_use(), |token| {
        RelationshipTypeResult {
            relationship_type: token.name,
        }
    })
}
