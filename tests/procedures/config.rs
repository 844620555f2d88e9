//! Databases configured from a `stratagraph.toml` directory

use std::fs;

use stratagraph::{Arg, Database, GraphConfig, IndexPopulation, Record, Value};
use tempfile::TempDir;

use crate::{drain, Movies};

const AUTO_INDEXED: &str = r#"
index_population = "deferred"

[node_auto_index]
enabled = true
keys = ["name"]

[relationship_auto_index]
enabled = true
keys = ["role"]
"#;

fn open_configured() -> (TempDir, Movies) {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("stratagraph.toml"), AUTO_INDEXED).unwrap();
    let db = Database::open(dir.path()).unwrap();
    (dir, Movies::with_db(db))
}

#[test]
fn test_open_writes_defaults() {
    let dir = TempDir::new().unwrap();
    let db = Database::open(dir.path()).unwrap();
    assert_eq!(db.config(), &GraphConfig::default());
    assert!(dir.path().join("stratagraph.toml").exists());
}

#[test]
fn test_open_reads_existing_file() {
    let (_dir, movies) = open_configured();
    let config = movies.db.config();
    assert_eq!(config.index_population, IndexPopulation::Deferred);
    assert!(config.node_auto_index.indexes_key("name"));
    assert!(!config.node_auto_index.indexes_key("born"));
}

#[test]
fn test_auto_indexes_follow_config() {
    let (_dir, movies) = open_configured();
    let tx = movies.read();

    let found = drain(
        movies
            .executor
            .call(
                &tx,
                "db.index.auto.seek.nodes",
                vec![Arg::from("name"), Arg::from("Carrie-Anne Moss")],
            )
            .unwrap(),
    );
    assert!(matches!(found.as_slice(), [Record::Node(r)] if r.node.id == movies.carrie));

    let born = drain(
        movies
            .executor
            .call(
                &tx,
                "db.index.auto.seek.nodes",
                vec![Arg::from("born"), Arg::from(Value::Int(1964))],
            )
            .unwrap(),
    );
    assert!(born.is_empty());

    let roles = drain(
        movies
            .executor
            .call(&tx, "db.index.auto.relationships", vec![Arg::from("role:Trin*")])
            .unwrap(),
    );
    assert_eq!(roles.len(), 1);
    assert_eq!(tx.open_statements(), 0);
}

#[test]
fn test_deferred_population_times_out() {
    let (_dir, movies) = open_configured();
    movies.db.create_index("Person", "name").unwrap();
    let tx = movies.read();

    let indexes = drain(movies.executor.call(&tx, "db.indexes", vec![]).unwrap());
    assert!(matches!(indexes.as_slice(), [Record::Index(r)] if r.state == "POPULATING"));

    let err = movies
        .executor
        .call(&tx, "db.awaitIndex", vec![Arg::from(":Person(name)"), Arg::from(0i64)])
        .unwrap_err();
    assert_eq!(err.status(), "TransientError.Procedure.ProcedureTimedOut");
    assert_eq!(tx.open_statements(), 0);
}

#[test]
fn test_malformed_file_is_rejected() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("stratagraph.toml"), "index_population = 7").unwrap();
    assert!(Database::open(dir.path()).is_err());
}
