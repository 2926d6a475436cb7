//! Command definitions
//!
//! Represents one line of a shell script.

use crate::error::{Result, TableError};

/// A parsed command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Insert a new record
    Insert { key: String, values: Vec<String> },

    /// Replace an existing record
    Update { key: String, values: Vec<String> },

    /// Delete a record
    Delete { key: String },

    /// Print one record by primary key
    Get { key: String },

    /// Print every record in iteration order
    Scan,

    /// Print every primary key in iteration order
    Keys,

    /// Print the record count
    Count,

    /// Print the normalized table name
    Name,

    /// Print the table schema
    Schema,
}

impl Command {
    /// Parse a line.
    ///
    /// Returns `Ok(None)` for blank lines and `#` comments.
    pub fn parse(line: &str) -> Result<Option<Command>> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let mut tokens = line.split_whitespace();
        let verb = tokens.next().unwrap_or_default().to_ascii_lowercase();
        let args: Vec<String> = tokens.map(str::to_string).collect();

        let command = match verb.as_str() {
            "insert" => {
                let (key, values) = split_key(&verb, args)?;
                Command::Insert { key, values }
            }
            "update" => {
                let (key, values) = split_key(&verb, args)?;
                Command::Update { key, values }
            }
            "delete" | "del" => Command::Delete {
                key: single_key(&verb, args)?,
            },
            "get" => Command::Get {
                key: single_key(&verb, args)?,
            },
            "scan" => no_args(&verb, args, Command::Scan)?,
            "keys" => no_args(&verb, args, Command::Keys)?,
            "count" => no_args(&verb, args, Command::Count)?,
            "name" => no_args(&verb, args, Command::Name)?,
            "schema" => no_args(&verb, args, Command::Schema)?,
            other => {
                return Err(TableError::Command(format!("unknown command `{}`", other)));
            }
        };

        Ok(Some(command))
    }

    /// Command verb, for logging
    pub fn name(&self) -> &'static str {
        match self {
            Command::Insert { .. } => "insert",
            Command::Update { .. } => "update",
            Command::Delete { .. } => "delete",
            Command::Get { .. } => "get",
            Command::Scan => "scan",
            Command::Keys => "keys",
            Command::Count => "count",
            Command::Name => "name",
            Command::Schema => "schema",
        }
    }
}

fn split_key(verb: &str, mut args: Vec<String>) -> Result<(String, Vec<String>)> {
    if args.is_empty() {
        return Err(TableError::Command(format!("`{}` needs a key", verb)));
    }
    let key = args.remove(0);
    Ok((key, args))
}

fn single_key(verb: &str, args: Vec<String>) -> Result<String> {
    match <[String; 1]>::try_from(args) {
        Ok([key]) => Ok(key),
        Err(args) => Err(TableError::Command(format!(
            "`{}` takes exactly one key, got {} arguments",
            verb,
            args.len()
        ))),
    }
}

fn no_args(verb: &str, args: Vec<String>, command: Command) -> Result<Command> {
    if args.is_empty() {
        Ok(command)
    } else {
        Err(TableError::Command(format!("`{}` takes no arguments", verb)))
    }
}
