//! Shell session
//!
//! Owns a `Table<String>` of dynamic rows and executes commands against it.

use std::io::{BufRead, Write};

use crate::config::TableConfig;
use crate::error::{Result, TableError};
use crate::schema::{Row, Shape, Value};
use crate::table::{KeyVisitor, OrderedIteratorFactory, Table, TableVisitor};

use super::Command;

/// Outcome counts of a script run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub succeeded: usize,
    pub failed: usize,
}

/// A table plus the shape every row in it uses
pub struct Session {
    table: Table<String>,
    shape: Shape,
}

impl Session {
    /// Wrap `table`, deriving its schema from `shape`
    pub fn new(mut table: Table<String>, shape: Shape) -> Self {
        table.set_schema(&shape);
        Self { table, shape }
    }

    /// Build the table from a config; `ordered` iterates in key order
    pub fn from_config(config: &TableConfig, shape: Shape, ordered: bool) -> Self {
        let mut table = Table::from_config(config);
        if ordered {
            table.set_iterator_factory(OrderedIteratorFactory::ascending());
        }
        Self::new(table, shape)
    }

    pub fn table(&self) -> &Table<String> {
        &self.table
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Parse and execute one line; blank lines produce no output
    pub fn execute_line(&mut self, line: &str) -> Result<Vec<String>> {
        match Command::parse(line)? {
            Some(command) => self.execute(command),
            None => Ok(Vec::new()),
        }
    }

    /// Execute a command and return its output lines
    pub fn execute(&mut self, command: Command) -> Result<Vec<String>> {
        match command {
            Command::Insert { key, values } => {
                let row = self.row_from_tokens(&values)?;
                self.table.insert(key, &row)?;
                Ok(vec!["ok".to_string()])
            }
            Command::Update { key, values } => {
                let row = self.row_from_tokens(&values)?;
                self.table.update(key, &row)?;
                Ok(vec!["ok".to_string()])
            }
            Command::Delete { key } => {
                self.table.delete(key.as_str())?;
                Ok(vec!["ok".to_string()])
            }
            Command::Get { key } => {
                let mut row = Row::blank(&self.shape);
                self.table.query_by_primary_key(key.as_str(), &mut row)?;
                Ok(vec![format!("{} {}", key, serde_json::to_string(&row)?)])
            }
            Command::Scan => self.table.accept(&mut RowDump { shape: &self.shape }),
            Command::Keys => self.table.accept(&mut KeyVisitor),
            Command::Count => Ok(vec![self.table.len().to_string()]),
            Command::Name => Ok(vec![self.table.name().to_string()]),
            Command::Schema => {
                let fields: Vec<String> = self
                    .table
                    .schema()
                    .fields()
                    .iter()
                    .map(|f| format!("{}:{}", f.name(), f.kind()))
                    .collect();
                Ok(vec![fields.join(",")])
            }
        }
    }

    /// Execute a script line by line.
    ///
    /// Failed lines produce `error: line N: ...` and execution continues.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> Result<RunSummary> {
        let mut summary = RunSummary::default();

        for (index, bytes) in input.split(b'\n').enumerate() {
            let number = index + 1;

            let line = match decode_line(bytes?) {
                Ok(line) => line,
                Err(e) => {
                    summary.failed += 1;
                    writeln!(output, "error: line {}: {}", number, e)?;
                    continue;
                }
            };

            let command = match Command::parse(&line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(e) => {
                    summary.failed += 1;
                    writeln!(output, "error: line {}: {}", number, e)?;
                    continue;
                }
            };

            tracing::trace!(line = number, command = command.name(), "executing command");

            match self.execute(command) {
                Ok(lines) => {
                    summary.succeeded += 1;
                    for out in lines {
                        writeln!(output, "{}", out)?;
                    }
                }
                Err(e) => {
                    summary.failed += 1;
                    writeln!(output, "error: line {}: {}", number, e)?;
                }
            }
        }

        output.flush()?;
        Ok(summary)
    }

    fn row_from_tokens(&self, tokens: &[String]) -> Result<Row> {
        if tokens.len() != self.shape.len() {
            return Err(TableError::mismatch(format!(
                "expected {} values, got {}",
                self.shape.len(),
                tokens.len()
            )));
        }

        let values = self
            .shape
            .fields()
            .iter()
            .zip(tokens)
            .map(|(field, token)| {
                Value::parse(token, field.kind()).map_err(|e| e.for_field(field.name()))
            })
            .collect::<Result<Vec<_>>>()?;

        Row::from_values(&self.shape, values)
    }
}

/// Line contents without the trailing `\r`; undecodable bytes fail the line only
fn decode_line(mut bytes: Vec<u8>) -> Result<String> {
    if bytes.last() == Some(&b'\r') {
        bytes.pop();
    }
    String::from_utf8(bytes)
        .map_err(|e| TableError::Command(format!("line is not valid UTF-8: {}", e.utf8_error())))
}

/// Renders every record as `key {json}`
struct RowDump<'s> {
    shape: &'s Shape,
}

impl TableVisitor<String> for RowDump<'_> {
    type Item = String;

    fn visit(&mut self, table: &Table<String>) -> Result<Vec<String>> {
        table
            .iterator()
            .map(|record| {
                let mut row = Row::blank(self.shape);
                record.populate(table.schema(), &mut row)?;
                Ok(format!("{} {}", record.key(), serde_json::to_string(&row)?))
            })
            .collect()
    }
}
