//! StrataGraph - embedded property graph with a procedure layer
//!
//! StrataGraph exposes schema introspection, index lifecycle and manual
//! index access as named procedures (`db.labels`, `db.awaitIndex`,
//! `db.index.manual.seek.nodes`, ...). Every procedure reads through a
//! statement leased from the caller's transaction, and lazily produced
//! results release that statement once they are consumed or dropped.
//!
//! # Quick Start
//!
//! ```ignore
//! use stratagraph::{AccessMode, Arg, Database, Executor, Value};
//!
//! let db = Database::cache();
//! db.create_node(&["Person"], &[("name", Value::from("Keanu"))])?;
//!
//! let executor = Executor::from_engine(db.clone());
//! let tx = db.begin_transaction(AccessMode::ReadOnly);
//!
//! for record in executor.call(&tx, "db.labels", vec![])?.into_stream() {
//!     println!("{:?}", record?);
//! }
//! ```
//!
//! # Architecture
//!
//! All procedures go through the [`Executor`]. The engine types re-exported
//! here ([`Database`], [`Transaction`], [`GraphConfig`]) are what an
//! embedding application needs to open a graph and start transactions;
//! store internals are not exposed.

// Re-export the public API from stratagraph-executor
pub use stratagraph_executor::*;

pub use stratagraph_engine::{Database, GraphConfig, IndexPopulation, Transaction};
