//! # StrataGraph Executor
//!
//! The procedure layer of StrataGraph: named, typed procedures that read the
//! graph through a statement leased from the caller's transaction.
//!
//! This crate provides:
//! - [`Executor`] - Dispatches a [`Procedure`] against a transaction
//! - [`Procedure`] - One variant per callable procedure, with typed arguments
//! - [`ResultStream`] - Lazy result sequence that owns its statement lease
//! - [`StatementLease`] - A statement released exactly once
//! - Result records ([`LabelResult`], [`IndexResult`], [`WeightedNodeResult`], ...)
//!
//! ## Quick Start
//!
//! ```text
//! use stratagraph_engine::Database;
//! use stratagraph_executor::{Executor, Procedure};
//! use stratagraph_core::AccessMode;
//!
//! let db = Database::cache();
//! let executor = Executor::from_engine(db.clone());
//! let tx = db.begin_transaction(AccessMode::ReadOnly);
//!
//! for record in executor.execute(&tx, Procedure::Labels)?.into_stream() {
//!     println!("{:?}", record?);
//! }
//! ```
//!
//! ## Statement lifecycle
//!
//! | Procedure kind | Lease disposal |
//! |----------------|----------------|
//! | Token listings, manual index reads | Owned by the returned stream, released on exhaustion or drop |
//! | Index/constraint listings | Released before the materialized stream is returned |
//! | Await, resample, add, remove | Released before the call returns |
//! | Index management (`forNodes`, `list`, `drop`, ...) | No statement needed |

#![warn(missing_docs)]

pub(crate) mod bridge;
mod convert;
mod error;
mod executor;
mod lease;
mod output;
mod procedure;
mod records;
mod scored;
mod stream;
mod types;

// Handler modules
mod handlers;

// Test modules
#[cfg(test)]
mod tests;

// =============================================================================
// Public API
// =============================================================================

pub use bridge::Collaborators;
pub use error::Error;
pub use executor::Executor;
pub use lease::{with_statement, StatementLease};
pub use output::Output;
pub use procedure::{
    signature, signatures, Parameter, ParameterDefault, ParameterType, Procedure,
    ProcedureSignature, DEFAULT_AWAIT_TIMEOUT_SECONDS,
};
pub use records::{
    BooleanResult, ConstraintResult, IndexResult, LabelResult, LegacyIndexInfo, NodeResult,
    PropertyKeyResult, Record, RelationshipResult, RelationshipTypeResult, SchemaGraphResult,
    WeightedNodeResult, WeightedRelationshipResult,
};
pub use scored::{ScoredHit, ScoredHits};
pub use stream::ResultStream;
pub use types::{Arg, IndexSpecifier};

// Re-exported so callers need only this crate for argument construction
pub use stratagraph_core::{AccessMode, NodeId, ProcedureMode, RelationshipId, Value};

/// Result type for executor operations
pub type Result<T> = std::result::Result<T, Error>;
