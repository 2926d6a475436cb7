//! # keytable
//!
//! An in-memory keyed record table with:
//! - Schema derivation from a sample value's shape
//! - Primary-key CRUD with conflict / not-found semantics
//! - Replaceable iteration strategies (random by default)
//! - Read-only traversal through visitors
//! - Lock-guarded and actor-owned sharing across threads
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────────────────────┐   ┌──────────────────────────────┐
//! │         SharedTable          │   │     TableActor / Handle      │
//! │        (RwLock guard)        │   │   (crossbeam request queue)  │
//! └──────────────┬───────────────┘   └──────────────┬───────────────┘
//!                └────────────────┬─────────────────┘
//!                                 ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                             Table                               │
//! │   schema: name → slot    records: key → Record    factory       │
//! └───────┬──────────────────────────┬────────────────────┬─────────┘
//!         │                          │                    │
//!         ▼                          ▼                    ▼
//!  ┌─────────────┐          ┌─────────────────┐   ┌───────────────┐
//!  │   Schema    │          │     Record      │   │ IteratorFac-  │
//!  │  (derived)  │          │ (value transfer)│   │ tory → Visitor│
//!  └─────────────┘          └─────────────────┘   └───────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use keytable::{entity, Table, TableError};
//!
//! entity! {
//!     #[derive(Debug, Clone, Default, PartialEq)]
//!     pub struct User {
//!         pub id: i64,
//!         pub name: String,
//!     }
//! }
//!
//! let mut users = Table::new("Users").with_schema(&User::default());
//! users.insert(1, &User { id: 1, name: "ada".into() }).unwrap();
//!
//! let mut found = User::default();
//! users.query_by_primary_key(&1, &mut found).unwrap();
//! assert_eq!(found.name, "ada");
//!
//! let again = users.insert(1, &User::default());
//! assert!(matches!(again, Err(TableError::PrimaryKeyConflict)));
//! assert_eq!(users.name(), "users");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;

pub mod schema;
pub mod shell;
pub mod sync;
pub mod table;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use config::TableConfig;
pub use error::{Result, TableError};
pub use schema::{Entity, FieldDef, FieldType, Row, Schema, Shape, Shaped, Value, ValueKind};
pub use sync::{SharedTable, TableActor, TableHandle};
pub use table::{
    visit_fn, CollectVisitor, FilterVisitor, FilteredIteratorFactory, FnVisitor, IteratorFactory,
    KeyVisitor, OrderedIteratorFactory, ProjectVisitor, RandomIteratorFactory, Record, Table,
    TableIter, TableVisitor,
};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of keytable
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
