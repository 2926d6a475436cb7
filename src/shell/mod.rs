//! Shell Module
//!
//! Line-oriented command language over a table of dynamic rows.
//!
//! ## Commands
//! ```text
//! insert <key> <value>...   store a new record (one value per field)
//! update <key> <value>...   replace an existing record
//! delete <key>              remove a record
//! get <key>                 print `key {json}`
//! scan                      print every record in iteration order
//! keys                      print every key in iteration order
//! count                     print the record count
//! name                      print the table name
//! schema                    print `field:kind,...`
//! ```
//!
//! Values are whitespace separated and parsed according to the field kind;
//! `null` is accepted for any field and always means a null value, so the
//! literal text `null` cannot be stored in a `text` field. Lines starting
//! with `#` are comments. A line that is not valid UTF-8 fails on its own.

mod command;
mod session;

pub use command::Command;
pub use session::{RunSummary, Session};
