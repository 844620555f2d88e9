//! Database struct and open logic
//!
//! The [`Database`] is an in-memory graph engine implementing every
//! collaborator the procedure layer consumes:
//! - Transactions and statements (`KernelTransaction`, `Statement`, `ReadOperations`)
//! - Schema index population and sampling (`IndexingService`)
//! - Manual index administration (`ManualIndexManager`)
//! - Schema meta-graph construction (`SchemaGraphBuilder`)
//!
//! Graph and schema writes go through inherent methods (see `graph.rs` and
//! `schema.rs`); they are not transactional.

pub mod config;
mod graph;
mod indexing;
mod manual;
mod schema;
mod statement;
mod transactions;

pub use config::{AutoIndexConfig, GraphConfig, IndexPopulation, CONFIG_FILE_NAME};
pub use transactions::Transaction;

use parking_lot::{Condvar, Mutex, RwLock};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use stratagraph_core::{AccessMode, GraphError, GraphResult};
use tracing::info;

use crate::store::GraphStore;

/// State shared between the database, its transactions and their statements
pub(crate) struct Shared {
    pub(crate) store: RwLock<GraphStore>,
    /// Bumped whenever an index changes state; guards `index_changed`
    pub(crate) index_signal: Mutex<u64>,
    pub(crate) index_changed: Condvar,
}

impl Shared {
    /// Wake every waiter blocked on an index state change.
    ///
    /// Must be called after the store write lock is released.
    pub(crate) fn notify_index_change(&self) {
        let mut generation = self.index_signal.lock();
        *generation += 1;
        self.index_changed.notify_all();
    }
}

/// In-memory graph database
///
/// # Example
///
/// ```text
/// use stratagraph_engine::Database;
/// use stratagraph_core::AccessMode;
///
/// let db = Database::cache();
/// db.create_node(&["Person"], &[("name", "Keanu".into())])?;
/// let tx = db.begin_transaction(AccessMode::ReadOnly);
/// ```
pub struct Database {
    shared: Arc<Shared>,
    config: GraphConfig,
    next_txn_id: AtomicU64,
}

impl Database {
    /// Create an empty database with default configuration
    pub fn cache() -> Arc<Self> {
        Self::with_config(GraphConfig::default())
    }

    /// Create an empty database with the given configuration
    pub fn with_config(config: GraphConfig) -> Arc<Self> {
        info!(
            target: "stratagraph::db",
            index_population = ?config.index_population,
            node_auto_index = config.node_auto_index.enabled,
            relationship_auto_index = config.relationship_auto_index.enabled,
            "Opened in-memory graph database"
        );
        Arc::new(Database {
            shared: Arc::new(Shared {
                store: RwLock::new(GraphStore::default()),
                index_signal: Mutex::new(0),
                index_changed: Condvar::new(),
            }),
            config,
            next_txn_id: AtomicU64::new(1),
        })
    }

    /// Create an empty database configured from `stratagraph.toml` in `dir`.
    ///
    /// The directory and a default config file are created if missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be created, read or
    /// parsed.
    pub fn open<P: AsRef<Path>>(dir: P) -> GraphResult<Arc<Self>> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir).map_err(|e| {
            GraphError::internal(format!(
                "Failed to create config directory '{}': {}",
                dir.display(),
                e
            ))
        })?;
        let path = dir.join(CONFIG_FILE_NAME);
        GraphConfig::write_default_if_missing(&path)?;
        let config = GraphConfig::from_file(&path)?;
        info!(target: "stratagraph::db", path = ?path, "Loaded configuration");
        Ok(Self::with_config(config))
    }

    /// Configuration the database was created with
    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// Start a transaction in the given access mode
    pub fn begin_transaction(&self, mode: AccessMode) -> Transaction {
        let id = self.next_txn_id.fetch_add(1, Ordering::Relaxed);
        Transaction::new(id, mode, Arc::clone(&self.shared))
    }
}
