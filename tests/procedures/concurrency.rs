//! Many transactions calling procedures at once

use std::sync::Arc;
use std::thread;

use stratagraph::{Arg, Executor, Procedure};

use crate::{drain, Movies};

#[test]
fn test_parallel_readers() {
    let movies = Movies::new();
    let executor = Arc::new(Executor::from_engine(movies.db.clone()));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let db = movies.db.clone();
            let executor = Arc::clone(&executor);
            thread::spawn(move || {
                let tx = db.begin_transaction(stratagraph::AccessMode::ReadOnly);
                for _ in 0..50 {
                    let labels = drain(executor.execute(&tx, Procedure::Labels).unwrap());
                    assert_eq!(labels.len(), 2);
                    // every other round abandons its stream half read
                    if i % 2 == 0 {
                        let mut stream = executor
                            .execute(&tx, Procedure::PropertyKeys)
                            .unwrap()
                            .into_stream();
                        stream.next();
                    }
                }
                assert_eq!(tx.open_statements(), 0);
                tx.close().unwrap();
                tx.statements_acquired()
            })
        })
        .collect();

    let acquired: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    for (i, count) in acquired.into_iter().enumerate() {
        assert_eq!(count, if i % 2 == 0 { 100 } else { 50 });
    }
}

#[test]
fn test_writers_and_readers() {
    let movies = Movies::new();
    let executor = Arc::new(Executor::from_engine(movies.db.clone()));
    let keanu = movies.keanu;

    let writers: Vec<_> = (0..4)
        .map(|i| {
            let db = movies.db.clone();
            let executor = Arc::clone(&executor);
            thread::spawn(move || {
                let tx = db.begin_transaction(stratagraph::AccessMode::ReadWrite);
                executor
                    .call(
                        &tx,
                        "db.index.manual.add.node",
                        vec![
                            Arg::from("actors"),
                            Arg::from(keanu),
                            Arg::from(format!("alias{}", i)),
                            Arg::from("Neo"),
                        ],
                    )
                    .unwrap();
                tx.close().unwrap();
            })
        })
        .collect();
    for writer in writers {
        writer.join().unwrap();
    }

    let tx = movies.read();
    for i in 0..4 {
        let found = drain(
            executor
                .call(
                    &tx,
                    "db.index.manual.seek.nodes",
                    vec![
                        Arg::from("actors"),
                        Arg::from(format!("alias{}", i)),
                        Arg::from("Neo"),
                    ],
                )
                .unwrap(),
        );
        assert_eq!(found.len(), 1);
    }
    tx.close().unwrap();
}
