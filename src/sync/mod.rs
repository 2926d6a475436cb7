//! Sync Module
//!
//! Two ways to share a [`Table`](crate::table::Table) across threads.
//!
//! - [`SharedTable`]: one writer-exclusive / multi-reader lock around the table.
//!   Queries, iteration and visitors run concurrently; writers are exclusive.
//! - [`TableActor`]: one thread owns the table and serializes every request
//!   received on a crossbeam channel.
//!
//! Every CRUD call is a single indivisible step under both models.

mod actor;
mod shared;

pub use actor::{TableActor, TableHandle};
pub use shared::SharedTable;
