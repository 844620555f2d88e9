//! Manual and automatic index read tests

use std::collections::BTreeMap;

use stratagraph_core::{
    AccessMode, EntityType, ManualIndexManager, NodeId, RelationshipId, Scalar, Value,
};
use stratagraph_engine::{Database, GraphConfig};

use super::{drain, setup, Script, ScriptedTransaction};
use crate::{Error, Executor, Procedure, Record};

fn node_ids(records: Vec<Record>) -> Vec<u64> {
    records
        .into_iter()
        .map(|r| match r {
            Record::Node(result) => result.node.id.as_u64(),
            Record::WeightedNode(result) => result.node.id.as_u64(),
            other => panic!("expected node record, got {:?}", other),
        })
        .collect()
}

fn relationship_ids(records: Vec<Record>) -> Vec<u64> {
    let mut ids: Vec<u64> = records
        .into_iter()
        .map(|r| match r {
            Record::Relationship(result) => result.relationship.id.as_u64(),
            Record::WeightedRelationship(result) => result.relationship.id.as_u64(),
            other => panic!("expected relationship record, got {:?}", other),
        })
        .collect();
    ids.sort_unstable();
    ids
}

fn term(key: &str, value: &str) -> Value {
    let mut map = BTreeMap::new();
    map.insert(key.to_string(), Value::from(value));
    Value::Map(map)
}

// =============================================================================
// Missing indexes
// =============================================================================

#[test]
fn test_missing_named_index_fails_and_releases() {
    let (_db, executor, tx) = setup();
    let err = executor
        .execute(
            &tx,
            Procedure::ManualSeekNodes {
                index_name: "actors".into(),
                key: "name".into(),
                value: Value::from("Keanu"),
            },
        )
        .unwrap_err();

    assert_eq!(
        err,
        Error::LegacyIndexNotFound {
            entity: EntityType::Node,
            name: "actors".into()
        }
    );
    assert!(err.to_string().contains("actors"));
    assert_eq!(err.status(), "ClientError.LegacyIndex.LegacyIndexNotFound");
    assert_eq!(tx.statements_acquired(), 1);
    assert_eq!(tx.open_statements(), 0);
}

#[test]
fn test_missing_named_relationship_index_on_bounded_search() {
    let (_db, executor, tx) = setup();
    let err = executor
        .execute(
            &tx,
            Procedure::ManualSearchRelationshipsBetween {
                index_name: "roles".into(),
                start: NodeId(0),
                end: NodeId(1),
                query: Value::from("role:*"),
            },
        )
        .unwrap_err();
    assert!(matches!(
        err,
        Error::LegacyIndexNotFound {
            entity: EntityType::Relationship,
            ..
        }
    ));
    assert_eq!(tx.open_statements(), 0);
}

#[test]
fn test_missing_auto_index_reads_empty() {
    let (_db, executor, tx) = setup();
    for procedure in [
        Procedure::AutoSeekNodes {
            key: "name".into(),
            value: Value::from("Keanu"),
        },
        Procedure::AutoSearchNodes {
            query: Value::from("name:K*"),
        },
        Procedure::AutoSeekRelationships {
            key: "role".into(),
            value: Value::from("Neo"),
        },
        Procedure::AutoSearchRelationships {
            query: Value::from("role:N*"),
        },
    ] {
        let records = drain(executor.execute(&tx, procedure).unwrap());
        assert!(records.is_empty());
        assert_eq!(tx.open_statements(), 0);
    }
    assert_eq!(tx.statements_acquired(), 4);
}

// =============================================================================
// Seeks and searches
// =============================================================================

#[test]
fn test_manual_seek_nodes() {
    let (db, executor, tx) = setup();
    let keanu = db
        .create_node(&["Person"], &[("name", Value::from("Keanu"))])
        .unwrap();
    let carrie = db
        .create_node(&["Person"], &[("name", Value::from("Carrie"))])
        .unwrap();
    db.add(EntityType::Node, "actors", keanu.0, "name", &Scalar::from("Keanu"))
        .unwrap();
    db.add(EntityType::Node, "actors", carrie.0, "name", &Scalar::from("Carrie"))
        .unwrap();

    let records = drain(
        executor
            .execute(
                &tx,
                Procedure::ManualSeekNodes {
                    index_name: "actors".into(),
                    key: "name".into(),
                    value: Value::from("Keanu"),
                },
            )
            .unwrap(),
    );
    assert_eq!(records.len(), 1);
    match &records[0] {
        Record::Node(result) => {
            assert_eq!(result.node.id, keanu);
            assert_eq!(result.node.property("name"), Some(&Value::from("Keanu")));
        }
        other => panic!("expected node record, got {:?}", other),
    }
    assert_eq!(tx.open_statements(), 0);
}

#[test]
fn test_seek_matches_on_index_text() {
    let (db, executor, tx) = setup();
    let keanu = db.create_node(&["Person"], &[]).unwrap();
    db.add(EntityType::Node, "actors", keanu.0, "born", &Scalar::Int(1964))
        .unwrap();

    let records = drain(
        executor
            .execute(
                &tx,
                Procedure::ManualSeekNodes {
                    index_name: "actors".into(),
                    key: "born".into(),
                    value: Value::from("1964"),
                },
            )
            .unwrap(),
    );
    assert_eq!(node_ids(records), vec![keanu.0]);
}

#[test]
fn test_auto_index_seek_and_search() {
    let db = Database::with_config(GraphConfig::default().with_node_auto_index(&["name"]));
    let executor = Executor::from_engine(db.clone());
    let tx = db.begin_transaction(AccessMode::ReadOnly);
    let keanu = db
        .create_node(&["Person"], &[("name", Value::from("Keanu"))])
        .unwrap();
    let kevin = db
        .create_node(&["Person"], &[("name", Value::from("Kevin"))])
        .unwrap();
    db.create_node(&["Person"], &[("name", Value::from("Carrie"))])
        .unwrap();

    let seek = drain(
        executor
            .execute(
                &tx,
                Procedure::AutoSeekNodes {
                    key: "name".into(),
                    value: Value::from("Kevin"),
                },
            )
            .unwrap(),
    );
    assert_eq!(node_ids(seek), vec![kevin.0]);

    let mut found = node_ids(drain(
        executor
            .execute(
                &tx,
                Procedure::AutoSearchNodes {
                    query: Value::from("name:Ke*"),
                },
            )
            .unwrap(),
    ));
    found.sort_unstable();
    assert_eq!(found, vec![keanu.0, kevin.0]);
}

#[test]
fn test_term_query_search() {
    let (db, executor, tx) = setup();
    let keanu = db.create_node(&["Person"], &[]).unwrap();
    db.add(EntityType::Node, "actors", keanu.0, "name", &Scalar::from("Keanu Reeves"))
        .unwrap();

    let records = drain(
        executor
            .execute(
                &tx,
                Procedure::ManualSearchNodes {
                    index_name: "actors".into(),
                    query: term("name", "Keanu Reeves"),
                },
            )
            .unwrap(),
    );
    assert_eq!(records.len(), 1);
    match &records[0] {
        Record::WeightedNode(result) => {
            assert_eq!(result.node.id, keanu);
            assert!(result.weight >= 0.0);
        }
        other => panic!("expected weighted node, got {:?}", other),
    }
}

#[test]
fn test_weights_follow_their_own_hit() {
    let tx = ScriptedTransaction::new(Script {
        hits: vec![(3, 0.5), (1, 2.0), (2, 1.25)],
        ..Script::default()
    });
    let executor = Executor::from_engine(Database::cache());
    let records = drain(
        executor
            .execute(
                &tx,
                Procedure::ManualSearchNodes {
                    index_name: "anything".into(),
                    query: Value::from("name:*"),
                },
            )
            .unwrap(),
    );

    let pairs: Vec<(u64, f64)> = records
        .into_iter()
        .map(|r| match r {
            Record::WeightedNode(result) => (result.node.id.as_u64(), result.weight),
            other => panic!("expected weighted node, got {:?}", other),
        })
        .collect();
    assert_eq!(pairs, vec![(3, 0.5), (1, 2.0), (2, 1.25)]);
    assert_eq!(tx.closed(), 1);
}

#[test]
fn test_stale_hit_fails_that_record_only() {
    let tx = ScriptedTransaction::new(Script {
        hits: vec![(0, 1.0), (1, 1.0), (2, 1.0)],
        deleted_nodes: vec![1],
        ..Script::default()
    });
    let executor = Executor::from_engine(Database::cache());
    let mut stream = executor
        .execute(
            &tx,
            Procedure::ManualSearchNodes {
                index_name: "actors".into(),
                query: Value::from("name:*"),
            },
        )
        .unwrap()
        .into_stream();

    assert!(stream.next().unwrap().is_ok());
    assert_eq!(
        stream.next().unwrap().unwrap_err(),
        Error::NodeNotFound { id: 1 }
    );
    assert!(stream.next().unwrap().is_ok());
    assert!(stream.next().is_none());
    assert_eq!(tx.closed(), 1);
}

#[test]
fn test_collect_stops_at_stale_hit_and_releases() {
    let tx = ScriptedTransaction::new(Script {
        hits: vec![(0, 1.0), (7, 1.0), (2, 1.0)],
        deleted_nodes: vec![7],
        ..Script::default()
    });
    let executor = Executor::from_engine(Database::cache());
    let err = executor
        .execute(
            &tx,
            Procedure::ManualSearchNodes {
                index_name: "actors".into(),
                query: Value::from("name:*"),
            },
        )
        .unwrap()
        .collect_records()
        .unwrap_err();
    assert_eq!(err.status(), "ClientError.Statement.EntityNotFound");
    assert_eq!(tx.closed(), 1);
}

// =============================================================================
// Relationship searches
// =============================================================================

struct Cast {
    keanu: NodeId,
    carrie: NodeId,
    matrix: NodeId,
    neo: RelationshipId,
    trinity: RelationshipId,
    knows: RelationshipId,
}

fn cast(db: &Database) -> Cast {
    let keanu = db.create_node(&["Person"], &[]).unwrap();
    let carrie = db.create_node(&["Person"], &[]).unwrap();
    let matrix = db.create_node(&["Movie"], &[]).unwrap();
    let neo = db
        .create_relationship(keanu, "ACTED_IN", matrix, &[])
        .unwrap();
    let trinity = db
        .create_relationship(carrie, "ACTED_IN", matrix, &[])
        .unwrap();
    let knows = db.create_relationship(keanu, "KNOWS", carrie, &[]).unwrap();
    for rel in [neo, trinity, knows] {
        db.add(EntityType::Relationship, "credits", rel.0, "film", &Scalar::from("The Matrix"))
            .unwrap();
    }
    Cast {
        keanu,
        carrie,
        matrix,
        neo,
        trinity,
        knows,
    }
}

#[test]
fn test_relationship_search_bounds() {
    let (db, executor, tx) = setup();
    let cast = cast(&db);
    let query = || term("film", "The Matrix");
    let search = |procedure| relationship_ids(drain(executor.execute(&tx, procedure).unwrap()));

    let all = search(Procedure::ManualSearchRelationships {
        index_name: "credits".into(),
        query: query(),
    });
    assert_eq!(all, vec![cast.neo.0, cast.trinity.0, cast.knows.0]);

    let from_keanu = search(Procedure::ManualSearchRelationshipsFrom {
        index_name: "credits".into(),
        start: cast.keanu,
        query: query(),
    });
    assert_eq!(from_keanu, vec![cast.neo.0, cast.knows.0]);

    let into_matrix = search(Procedure::ManualSearchRelationshipsTo {
        index_name: "credits".into(),
        end: cast.matrix,
        query: query(),
    });
    assert_eq!(into_matrix, vec![cast.neo.0, cast.trinity.0]);

    let between = search(Procedure::ManualSearchRelationshipsBetween {
        index_name: "credits".into(),
        start: cast.keanu,
        end: cast.carrie,
        query: query(),
    });
    assert_eq!(between, vec![cast.knows.0]);

    assert_eq!(tx.open_statements(), 0);
}

#[test]
fn test_relationship_seek() {
    let (db, executor, tx) = setup();
    let cast = cast(&db);
    let records = drain(
        executor
            .execute(
                &tx,
                Procedure::ManualSeekRelationships {
                    index_name: "credits".into(),
                    key: "film".into(),
                    value: Value::from("The Matrix"),
                },
            )
            .unwrap(),
    );
    assert_eq!(
        relationship_ids(records),
        vec![cast.neo.0, cast.trinity.0, cast.knows.0]
    );
}

#[test]
fn test_relationship_auto_index() {
    let db = Database::with_config(GraphConfig::default().with_relationship_auto_index(&["role"]));
    let executor = Executor::from_engine(db.clone());
    let tx = db.begin_transaction(AccessMode::ReadOnly);
    let keanu = db.create_node(&["Person"], &[]).unwrap();
    let matrix = db.create_node(&["Movie"], &[]).unwrap();
    let neo = db
        .create_relationship(keanu, "ACTED_IN", matrix, &[("role", Value::from("Neo"))])
        .unwrap();

    let records = drain(
        executor
            .execute(
                &tx,
                Procedure::AutoSearchRelationships {
                    query: Value::from("role:Neo"),
                },
            )
            .unwrap(),
    );
    assert_eq!(relationship_ids(records), vec![neo.0]);
}

// =============================================================================
// Argument values
// =============================================================================

#[test]
fn test_unsupported_values_fail_before_leasing() {
    let (db, executor, tx) = setup();
    db.get_or_create(EntityType::Node, "actors").unwrap();

    let err = executor
        .execute(
            &tx,
            Procedure::ManualSeekNodes {
                index_name: "actors".into(),
                key: "name".into(),
                value: Value::Null,
            },
        )
        .unwrap_err();
    assert!(matches!(err, Error::UnsupportedValue { ref actual, .. } if actual == "Null"));
    assert_eq!(err.status(), "ClientError.Statement.TypeError");

    let err = executor
        .execute(
            &tx,
            Procedure::ManualSearchNodes {
                index_name: "actors".into(),
                query: Value::Int(3),
            },
        )
        .unwrap_err();
    assert!(matches!(err, Error::UnsupportedValue { .. }));

    assert_eq!(tx.statements_acquired(), 0);
}

#[test]
fn test_malformed_query_is_invalid_argument() {
    let (db, executor, tx) = setup();
    db.get_or_create(EntityType::Node, "actors").unwrap();
    let err = executor
        .execute(
            &tx,
            Procedure::ManualSearchNodes {
                index_name: "actors".into(),
                query: Value::from(""),
            },
        )
        .unwrap_err();
    assert!(matches!(err, Error::InvalidArgument { .. }));
    assert_eq!(tx.open_statements(), 0);
}
