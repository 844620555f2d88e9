//! Random call sequences never leave a statement open

use proptest::prelude::*;
use stratagraph::{Arg, Output};

use crate::Movies;

/// Read calls whose results may be left unconsumed
const CALLS: &[(&str, &[&str])] = &[
    ("db.labels", &[]),
    ("db.propertyKeys", &[]),
    ("db.relationshipTypes", &[]),
    ("db.indexes", &[]),
    ("db.constraints", &[]),
    ("db.schema", &[]),
    ("db.index.manual.seek.nodes", &["actors", "name", "Keanu Reeves"]),
    ("db.index.manual.nodes", &["actors", "name:*"]),
    ("db.index.manual.seek.nodes", &["missing", "name", "x"]),
    ("db.index.auto.nodes", &["name:*"]),
    ("db.awaitIndex", &[":Person(nope)"]),
];

#[derive(Debug, Clone, Copy)]
enum Consume {
    Drain,
    TakeOne,
    Drop,
}

fn consume(output: Output, how: Consume) {
    let mut stream = output.into_stream();
    match how {
        Consume::Drain => {
            for _ in stream.by_ref() {}
        }
        Consume::TakeOne => {
            stream.next();
        }
        Consume::Drop => {}
    }
}

fn consume_strategy() -> impl Strategy<Value = Consume> {
    prop_oneof![
        Just(Consume::Drain),
        Just(Consume::TakeOne),
        Just(Consume::Drop),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn call_sequences_release_every_statement(
        steps in prop::collection::vec((0..CALLS.len(), consume_strategy()), 1..20)
    ) {
        let movies = Movies::new();
        let writer = movies.write();
        movies
            .executor
            .call(
                &writer,
                "db.index.manual.add.node",
                vec![
                    Arg::from("actors"),
                    Arg::from(movies.keanu),
                    Arg::from("name"),
                    Arg::from("Keanu Reeves"),
                ],
            )
            .unwrap();
        writer.close().unwrap();

        let tx = movies.read();
        for (call, how) in steps {
            let (name, args) = CALLS[call];
            let args = args.iter().map(|a| Arg::from(*a)).collect();
            if let Ok(output) = movies.executor.call(&tx, name, args) {
                consume(output, how);
            }
            prop_assert_eq!(tx.open_statements(), 0);
            prop_assert_eq!(tx.statements_closed(), tx.statements_acquired());
        }
        prop_assert!(tx.close().is_ok());
    }
}
