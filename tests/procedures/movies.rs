//! A movie graph driven entirely through calls by name

use serde_json::json;
use stratagraph::{Arg, Error, Record};

use crate::{drain, rows, Movies};

#[test]
fn test_token_listings() {
    let movies = Movies::new();
    let tx = movies.read();

    assert_eq!(
        rows(movies.executor.call(&tx, "db.labels", vec![]).unwrap()),
        vec![json!({ "label": "Person" }), json!({ "label": "Movie" })]
    );
    assert_eq!(
        rows(movies.executor.call(&tx, "db.relationshipTypes", vec![]).unwrap()),
        vec![json!({ "relationshipType": "ACTED_IN" })]
    );
    let keys = rows(movies.executor.call(&tx, "db.propertyKeys", vec![]).unwrap());
    assert_eq!(keys.len(), 4);
    assert!(keys.contains(&json!({ "propertyKey": "role" })));

    assert_eq!(tx.statements_acquired(), 3);
    assert_eq!(tx.open_statements(), 0);
    tx.close().unwrap();
}

#[test]
fn test_schema_lifecycle() {
    let movies = Movies::new();
    movies.db.create_index("Person", "name").unwrap();
    movies
        .db
        .create_uniqueness_constraint("Movie", "title")
        .unwrap();
    let tx = movies.read();

    movies
        .executor
        .call(&tx, "db.awaitIndexes", vec![Arg::from(5i64)])
        .unwrap();
    movies
        .executor
        .call(&tx, "db.resampleIndex", vec![Arg::from(":Person(name)")])
        .unwrap();

    let indexes = rows(movies.executor.call(&tx, "db.indexes", vec![]).unwrap());
    assert_eq!(
        indexes,
        vec![
            json!({
                "description": "INDEX ON :Person(name)",
                "state": "ONLINE",
                "type": "node_label_property"
            }),
            json!({
                "description": "INDEX ON :Movie(title)",
                "state": "ONLINE",
                "type": "node_unique_property"
            }),
        ]
    );

    let constraints = drain(movies.executor.call(&tx, "db.constraints", vec![]).unwrap());
    assert_eq!(constraints.len(), 1);
    tx.close().unwrap();
}

#[test]
fn test_manual_index_round_trip() {
    let movies = Movies::new();
    let writer = movies.write();
    let executor = &movies.executor;

    executor
        .call(&writer, "db.index.manual.forNodes", vec![Arg::from("actors")])
        .unwrap();
    for (node, name) in [(movies.keanu, "Keanu Reeves"), (movies.carrie, "Carrie-Anne Moss")] {
        executor
            .call(
                &writer,
                "db.index.manual.add.node",
                vec![
                    Arg::from("actors"),
                    Arg::from(node),
                    Arg::from("name"),
                    Arg::from(name),
                ],
            )
            .unwrap();
    }
    executor
        .call(
            &writer,
            "db.index.manual.add.relationship",
            vec![
                Arg::from("roles"),
                Arg::from(movies.neo),
                Arg::from("role"),
                Arg::from("Neo"),
            ],
        )
        .unwrap();
    writer.close().unwrap();

    let reader = movies.read();
    let found = drain(
        executor
            .call(
                &reader,
                "db.index.manual.seek.nodes",
                vec![Arg::from("actors"), Arg::from("name"), Arg::from("Keanu Reeves")],
            )
            .unwrap(),
    );
    assert!(matches!(found.as_slice(), [Record::Node(r)] if r.node.id == movies.keanu));

    let searched = drain(
        executor
            .call(
                &reader,
                "db.index.manual.nodes",
                vec![Arg::from("actors"), Arg::from("name:*e*")],
            )
            .unwrap(),
    );
    assert_eq!(searched.len(), 2);

    let roles = drain(
        executor
            .call(
                &reader,
                "db.index.manual.between",
                vec![
                    Arg::from("roles"),
                    Arg::from(movies.keanu),
                    Arg::from(movies.matrix),
                    Arg::from("role:Neo"),
                ],
            )
            .unwrap(),
    );
    assert!(matches!(
        roles.as_slice(),
        [Record::WeightedRelationship(r)] if r.relationship.id == movies.neo
    ));

    let listed = rows(executor.call(&reader, "db.index.manual.list", vec![]).unwrap());
    let names: Vec<&str> = listed.iter().filter_map(|r| r["name"].as_str()).collect();
    assert_eq!(names, vec!["actors", "roles"]);
    reader.close().unwrap();
}

#[test]
fn test_failed_call_leaves_transaction_clean() {
    let movies = Movies::new();
    let tx = movies.read();

    let err = movies
        .executor
        .call(
            &tx,
            "db.index.manual.seek.nodes",
            vec![Arg::from("nope"), Arg::from("name"), Arg::from("x")],
        )
        .unwrap_err();
    assert!(matches!(err, Error::LegacyIndexNotFound { .. }));

    let err = movies
        .executor
        .call(&tx, "db.awaitIndex", vec![Arg::from(":Person(name)"), Arg::from(1i64)])
        .unwrap_err();
    assert!(matches!(err, Error::IndexNotFound { .. }));

    assert_eq!(tx.open_statements(), 0);
    tx.close().unwrap();
}

#[test]
fn test_abandoned_stream_releases_statement() {
    let movies = Movies::new();
    let tx = movies.read();

    let mut stream = movies
        .executor
        .call(&tx, "db.labels", vec![])
        .unwrap()
        .into_stream();
    assert!(stream.next().is_some());
    assert_eq!(tx.open_statements(), 1);

    drop(stream);
    assert_eq!(tx.open_statements(), 0);
    tx.close().unwrap();
}

#[test]
fn test_unreleased_stream_is_reported_on_close() {
    let movies = Movies::new();
    let tx = movies.read();

    let stream = movies
        .executor
        .call(&tx, "db.propertyKeys", vec![])
        .unwrap()
        .into_stream();
    assert!(tx.close().is_err());
    assert!(tx.is_closed());
    drop(stream);
    assert_eq!(tx.open_statements(), 0);
}
