//! Table actor
//!
//! One worker thread owns the table. Handles send requests over a crossbeam
//! channel and block on a per-request reply channel, so operations are
//! applied strictly in arrival order.

use std::hash::Hash;
use std::thread::{self, JoinHandle};

use crossbeam::channel::{bounded, unbounded, Receiver, Sender};

use crate::config::TableConfig;
use crate::error::{Result, TableError};
use crate::schema::Entity;
use crate::table::{Table, TableVisitor};

type Job<K> = Box<dyn FnOnce(&mut Table<K>) + Send>;

enum Request<K, E> {
    Insert {
        key: K,
        value: E,
        reply: Sender<Result<()>>,
    },
    Update {
        key: K,
        value: E,
        reply: Sender<Result<()>>,
    },
    Delete {
        key: K,
        reply: Sender<Result<()>>,
    },
    Query {
        key: K,
        dest: E,
        reply: Sender<Result<E>>,
    },
    Run(Job<K>),
    Shutdown,
}

/// Cloneable client for a running `TableActor`
pub struct TableHandle<K, E> {
    sender: Sender<Request<K, E>>,
}

impl<K, E> Clone for TableHandle<K, E> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<K, E> TableHandle<K, E>
where
    K: Send + 'static,
    E: Entity + Clone + Send + 'static,
{
    pub fn insert(&self, key: K, value: E) -> Result<()> {
        self.call(|reply| Request::Insert { key, value, reply })
    }

    pub fn update(&self, key: K, value: E) -> Result<()> {
        self.call(|reply| Request::Update { key, value, reply })
    }

    pub fn delete(&self, key: K) -> Result<()> {
        self.call(|reply| Request::Delete { key, reply })
    }

    /// Populate `dest` from the record under `key`.
    /// The actor fills a clone of `dest`, which replaces `dest` on success.
    pub fn query_by_primary_key(&self, key: K, dest: &mut E) -> Result<()> {
        let template = dest.clone();
        *dest = self.call(|reply| Request::Query {
            key,
            dest: template,
            reply,
        })?;
        Ok(())
    }

    /// Run `f` on the actor thread with exclusive access to the table.
    ///
    /// `f` must not call back into a `TableHandle` of the same actor: the
    /// worker would block waiting on itself.
    pub fn with<R, F>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&mut Table<K>) -> R + Send + 'static,
        R: Send + 'static,
    {
        let (reply, response) = bounded(1);
        let job: Job<K> = Box::new(move |table| {
            let _ = reply.send(f(table));
        });
        self.sender
            .send(Request::Run(job))
            .map_err(|_| TableError::ActorUnavailable)?;
        response.recv().map_err(|_| TableError::ActorUnavailable)
    }

    /// Run a visitor on the actor thread
    pub fn accept<V>(&self, visitor: V) -> Result<Vec<V::Item>>
    where
        V: TableVisitor<K> + Send + 'static,
        V::Item: Send + 'static,
    {
        self.with(move |table| {
            let mut visitor = visitor;
            table.accept(&mut visitor)
        })?
    }

    pub fn len(&self) -> Result<usize> {
        self.with(|table| table.len())
    }

    fn call<T>(&self, make: impl FnOnce(Sender<Result<T>>) -> Request<K, E>) -> Result<T> {
        let (reply, response) = bounded(1);
        self.sender
            .send(make(reply))
            .map_err(|_| TableError::ActorUnavailable)?;
        response.recv().map_err(|_| TableError::ActorUnavailable)?
    }
}

/// Owns the worker thread that owns the table
///
/// Dropping the actor stops the worker; `shutdown` also hands the table back.
pub struct TableActor<K, E> {
    handle: TableHandle<K, E>,
    worker: Option<JoinHandle<Table<K>>>,
}

impl<K, E> TableActor<K, E>
where
    K: Eq + Hash + Clone + Send + 'static,
    E: Entity + Clone + Send + 'static,
{
    /// Move `table` onto a new worker thread.
    ///
    /// `queue_capacity` bounds the request queue; `None` leaves it unbounded.
    pub fn spawn(table: Table<K>, queue_capacity: Option<usize>) -> Result<Self> {
        let (sender, receiver) = match queue_capacity {
            Some(capacity) => bounded(capacity),
            None => unbounded(),
        };

        let worker = thread::Builder::new()
            .name(format!("table-{}", table.name()))
            .spawn(move || run(table, receiver))?;

        Ok(Self {
            handle: TableHandle { sender },
            worker: Some(worker),
        })
    }

    /// Build the table and the actor from a config
    pub fn from_config(config: &TableConfig) -> Result<Self> {
        Self::spawn(Table::from_config(config), config.actor_queue_capacity)
    }

    pub fn handle(&self) -> TableHandle<K, E> {
        self.handle.clone()
    }

    /// Stop the worker after it drains earlier requests and return the table.
    /// Requests queued after the shutdown fail with `ActorUnavailable`.
    pub fn shutdown(mut self) -> Result<Table<K>> {
        let worker = self.worker.take().ok_or(TableError::ActorUnavailable)?;
        let _ = self.handle.sender.send(Request::Shutdown);
        worker.join().map_err(|_| TableError::ActorUnavailable)
    }
}

impl<K, E> Drop for TableActor<K, E> {
    fn drop(&mut self) {
        if let Some(worker) = self.worker.take() {
            let _ = self.handle.sender.send(Request::Shutdown);
            let _ = worker.join();
        }
    }
}

fn run<K, E>(mut table: Table<K>, requests: Receiver<Request<K, E>>) -> Table<K>
where
    K: Eq + Hash + Clone,
    E: Entity + Clone,
{
    tracing::debug!(table = %table.name(), "table actor started");

    for request in requests.iter() {
        match request {
            Request::Insert { key, value, reply } => {
                let _ = reply.send(table.insert(key, &value));
            }
            Request::Update { key, value, reply } => {
                let _ = reply.send(table.update(key, &value));
            }
            Request::Delete { key, reply } => {
                let _ = reply.send(table.delete(&key));
            }
            Request::Query {
                key,
                mut dest,
                reply,
            } => {
                let result = table.query_by_primary_key(&key, &mut dest).map(|()| dest);
                let _ = reply.send(result);
            }
            Request::Run(job) => job(&mut table),
            Request::Shutdown => break,
        }
    }

    tracing::debug!(table = %table.name(), records = table.len(), "table actor stopped");
    table
}
