//! TableActor Tests
//!
//! Tests verify:
//! - CRUD through a handle
//! - Closures and visitors running on the actor thread
//! - Many client threads against one actor
//! - Shutdown hands the table back and rejects later requests

use std::thread;

use keytable::{
    entity, KeyVisitor, OrderedIteratorFactory, Table, TableActor, TableConfig, TableError,
    TableHandle,
};

entity! {
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Job {
        pub command: String,
        pub retries: i64,
    }
}

fn job(command: &str, retries: i64) -> Job {
    Job {
        command: command.to_string(),
        retries,
    }
}

fn spawn(capacity: Option<usize>) -> TableActor<u64, Job> {
    let table = Table::new("jobs")
        .with_schema(&Job::default())
        .with_iterator_factory(OrderedIteratorFactory::ascending());
    TableActor::spawn(table, capacity).unwrap()
}

// =============================================================================
// Basic Operations
// =============================================================================

#[test]
fn test_actor_crud() {
    let actor = spawn(Some(16));
    let handle = actor.handle();

    handle.insert(1, job("build", 0)).unwrap();
    assert!(matches!(
        handle.insert(1, job("other", 9)),
        Err(TableError::PrimaryKeyConflict)
    ));

    handle.update(1, job("build", 2)).unwrap();
    let mut dest = Job::default();
    handle.query_by_primary_key(1, &mut dest).unwrap();
    assert_eq!(dest, job("build", 2));

    handle.delete(1).unwrap();
    assert!(matches!(handle.delete(1), Err(TableError::RecordNotFound)));
    assert!(matches!(
        handle.update(1, job("x", 0)),
        Err(TableError::RecordNotFound)
    ));
}

#[test]
fn test_actor_failed_query_leaves_dest_untouched() {
    let actor = spawn(Some(4));
    let handle = actor.handle();

    let mut dest = job("keep", 7);
    let result = handle.query_by_primary_key(42, &mut dest);
    assert!(matches!(result, Err(TableError::RecordNotFound)));
    assert_eq!(dest, job("keep", 7));
}

#[test]
fn test_actor_with_and_accept() {
    let actor = spawn(None);
    let handle = actor.handle();
    for key in [3, 1, 2] {
        handle.insert(key, job("j", 0)).unwrap();
    }

    assert_eq!(handle.len().unwrap(), 3);
    let name = handle.with(|table| table.name().to_string()).unwrap();
    assert_eq!(name, "jobs");

    let keys = handle.accept(KeyVisitor).unwrap();
    assert_eq!(keys, vec![1, 2, 3]);
}

#[test]
fn test_actor_from_config() {
    let config = TableConfig::builder()
        .name("Queue")
        .actor_queue_capacity(2)
        .build();
    let actor: TableActor<u64, Job> = TableActor::from_config(&config).unwrap();
    let handle = actor.handle();

    handle.insert(1, job("a", 0)).unwrap();
    let table = actor.shutdown().unwrap();
    assert_eq!(table.name(), "queue");
    assert_eq!(table.len(), 1);
}

// =============================================================================
// Concurrency Tests
// =============================================================================

fn hammer(handle: TableHandle<u64, Job>) {
    let mut workers = vec![];
    for t in 0..4u64 {
        let handle = handle.clone();
        workers.push(thread::spawn(move || {
            for i in 0..50u64 {
                handle.insert(t * 1_000 + i, job("work", 0)).unwrap();
            }
        }));
    }
    for worker in workers {
        worker.join().unwrap();
    }
}

#[test]
fn test_actor_many_clients_bounded_queue() {
    let actor = spawn(Some(1));
    hammer(actor.handle());
    assert_eq!(actor.handle().len().unwrap(), 200);
}

#[test]
fn test_actor_many_clients_unbounded_queue() {
    let actor = spawn(None);
    hammer(actor.handle());
    assert_eq!(actor.handle().len().unwrap(), 200);
}

// =============================================================================
// Shutdown Tests
// =============================================================================

#[test]
fn test_shutdown_returns_table() {
    let actor = spawn(Some(8));
    let handle = actor.handle();
    handle.insert(7, job("deploy", 1)).unwrap();

    let table = actor.shutdown().unwrap();
    let mut dest = Job::default();
    table.query_by_primary_key(&7, &mut dest).unwrap();
    assert_eq!(dest, job("deploy", 1));
}

#[test]
fn test_requests_after_shutdown_fail() {
    let actor = spawn(Some(8));
    let handle = actor.handle();
    actor.shutdown().unwrap();

    assert!(matches!(
        handle.insert(1, job("late", 0)),
        Err(TableError::ActorUnavailable)
    ));
    assert!(matches!(handle.len(), Err(TableError::ActorUnavailable)));
}

#[test]
fn test_drop_stops_actor() {
    let handle = {
        let actor = spawn(None);
        actor.handle()
    };
    assert!(matches!(
        handle.delete(1),
        Err(TableError::ActorUnavailable)
    ));
}
