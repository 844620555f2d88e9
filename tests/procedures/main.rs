//! Procedure Integration Test Suite
//!
//! End-to-end coverage of the procedure layer through the `stratagraph`
//! facade: calls by name against an engine-backed database, with statement
//! accounting checked on the caller's transaction.
//!
//! ## Modules
//!
//! - `movies`: a small movie graph exercised through every procedure family
//! - `config`: databases opened from a `stratagraph.toml` directory
//! - `concurrency`: many transactions calling procedures in parallel
//! - `leaks`: random procedure sequences never leak a statement
//!
//! ## Running Tests
//!
//! ```bash
//! # Run the whole suite
//! cargo test --test procedures
//!
//! # Run one module
//! cargo test --test procedures movies::
//! ```

use std::sync::Arc;

use stratagraph::{AccessMode, Database, Executor, Output, Record, Transaction, Value};

/// A database holding a few people, movies and the relationships between them
pub struct Movies {
    pub db: Arc<Database>,
    pub executor: Executor,
    pub keanu: stratagraph::NodeId,
    pub carrie: stratagraph::NodeId,
    pub matrix: stratagraph::NodeId,
    pub neo: stratagraph::RelationshipId,
}

impl Movies {
    pub fn new() -> Self {
        Self::with_db(Database::cache())
    }

    pub fn with_db(db: Arc<Database>) -> Self {
        let keanu = db
            .create_node(
                &["Person"],
                &[("name", Value::from("Keanu Reeves")), ("born", Value::Int(1964))],
            )
            .unwrap();
        let carrie = db
            .create_node(
                &["Person"],
                &[("name", Value::from("Carrie-Anne Moss")), ("born", Value::Int(1967))],
            )
            .unwrap();
        let matrix = db
            .create_node(&["Movie"], &[("title", Value::from("The Matrix"))])
            .unwrap();
        let neo = db
            .create_relationship(keanu, "ACTED_IN", matrix, &[("role", Value::from("Neo"))])
            .unwrap();
        db.create_relationship(carrie, "ACTED_IN", matrix, &[("role", Value::from("Trinity"))])
            .unwrap();

        let executor = Executor::from_engine(db.clone());
        Movies {
            db,
            executor,
            keanu,
            carrie,
            matrix,
            neo,
        }
    }

    pub fn read(&self) -> Transaction {
        self.db.begin_transaction(AccessMode::ReadOnly)
    }

    pub fn write(&self) -> Transaction {
        self.db.begin_transaction(AccessMode::ReadWrite)
    }
}

/// Drain an output, panicking on the first failed record
pub fn drain(output: Output) -> Vec<Record> {
    output.collect_records().unwrap()
}

/// Serialize every record's columns
pub fn rows(output: Output) -> Vec<serde_json::Value> {
    drain(output)
        .iter()
        .map(|record| record.to_json().unwrap())
        .collect()
}

mod concurrency;
mod config;
mod leaks;
mod movies;
