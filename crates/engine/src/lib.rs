//! In-memory graph engine for StrataGraph
//!
//! This crate implements every collaborator the procedure layer consumes:
//! - Database: token registries, nodes, relationships and schema
//! - Transaction: statement issuing with open-statement accounting
//! - Manual indexes: exact lookups and scored pattern queries
//! - Automatic indexes maintained from configured property keys
//! - Index population waits and sampling
//!
//! Nothing is persisted; configuration is the only thing read from disk.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod database;
pub mod legacy;
mod store;

pub use database::{
    AutoIndexConfig, Database, GraphConfig, IndexPopulation, Transaction, CONFIG_FILE_NAME,
};
pub use legacy::{default_index_config, IndexHits};
