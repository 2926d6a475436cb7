//! Shell Tests
//!
//! Tests verify:
//! - Command parsing (verbs, aliases, comments, argument errors)
//! - Command execution against a session
//! - Script runs: output lines, error lines, summary counts

use std::io::{BufReader, Cursor, Write};

use keytable::shell::{Command, RunSummary, Session};
use keytable::{Shape, TableConfig, TableError};
use tempfile::NamedTempFile;

// =============================================================================
// Helper Functions
// =============================================================================

fn session() -> Session {
    let config = TableConfig::builder().name("People").build();
    let shape = Shape::parse("name:text,age:int").unwrap();
    Session::from_config(&config, shape, true)
}

fn run_script(session: &mut Session, script: &str) -> (String, RunSummary) {
    let mut output = Vec::new();
    let summary = session.run(Cursor::new(script), &mut output).unwrap();
    (String::from_utf8(output).unwrap(), summary)
}

// =============================================================================
// Parse Tests
// =============================================================================

#[test]
fn test_parse_commands() {
    assert_eq!(
        Command::parse("insert k1 ada 36").unwrap(),
        Some(Command::Insert {
            key: "k1".into(),
            values: vec!["ada".into(), "36".into()],
        })
    );
    assert_eq!(
        Command::parse("  GET k1 ").unwrap(),
        Some(Command::Get { key: "k1".into() })
    );
    assert_eq!(
        Command::parse("del k1").unwrap(),
        Some(Command::Delete { key: "k1".into() })
    );
    assert_eq!(Command::parse("scan").unwrap(), Some(Command::Scan));
    assert_eq!(Command::parse("count").unwrap().map(|c| c.name()), Some("count"));
}

#[test]
fn test_parse_skips_blank_and_comment_lines() {
    assert_eq!(Command::parse("").unwrap(), None);
    assert_eq!(Command::parse("   ").unwrap(), None);
    assert_eq!(Command::parse("# insert k1 x 1").unwrap(), None);
}

#[test]
fn test_parse_errors() {
    assert!(matches!(Command::parse("frobnicate"), Err(TableError::Command(_))));
    assert!(matches!(Command::parse("insert"), Err(TableError::Command(_))));
    assert!(matches!(Command::parse("get a b"), Err(TableError::Command(_))));
    assert!(matches!(Command::parse("count 3"), Err(TableError::Command(_))));
}

// =============================================================================
// Execute Tests
// =============================================================================

#[test]
fn test_execute_crud() {
    let mut session = session();

    assert_eq!(session.execute_line("insert k1 ada 36").unwrap(), vec!["ok"]);
    assert_eq!(
        session.execute_line("get k1").unwrap(),
        vec![r#"k1 {"name":"ada","age":36}"#]
    );

    session.execute_line("update k1 ada 37").unwrap();
    assert_eq!(
        session.execute_line("get k1").unwrap(),
        vec![r#"k1 {"name":"ada","age":37}"#]
    );

    session.execute_line("delete k1").unwrap();
    assert!(matches!(
        session.execute_line("get k1"),
        Err(TableError::RecordNotFound)
    ));
}

#[test]
fn test_execute_errors() {
    let mut session = session();
    session.execute_line("insert k1 ada 36").unwrap();

    assert!(matches!(
        session.execute_line("insert k1 bob 20"),
        Err(TableError::PrimaryKeyConflict)
    ));
    assert!(matches!(
        session.execute_line("update nope bob 20"),
        Err(TableError::RecordNotFound)
    ));
    assert!(matches!(
        session.execute_line("insert k2 bob"),
        Err(TableError::ShapeMismatch(_))
    ));
    match session.execute_line("insert k2 bob old") {
        Err(TableError::ShapeMismatch(message)) => assert!(message.contains("age")),
        other => panic!("unexpected result: {:?}", other),
    }
    assert_eq!(session.table().len(), 1);
}

#[test]
fn test_execute_metadata_commands() {
    let mut session = session();
    assert_eq!(session.execute_line("name").unwrap(), vec!["people"]);
    assert_eq!(session.execute_line("schema").unwrap(), vec!["name:text,age:int"]);
    assert_eq!(session.execute_line("count").unwrap(), vec!["0"]);
    assert!(session.execute_line("# nothing").unwrap().is_empty());
}

#[test]
fn test_execute_scan_and_keys_in_order() {
    let mut session = session();
    session.execute_line("insert b bob 20").unwrap();
    session.execute_line("insert a ada null").unwrap();

    assert_eq!(
        session.execute_line("scan").unwrap(),
        vec![
            r#"a {"name":"ada","age":null}"#,
            r#"b {"name":"bob","age":20}"#,
        ]
    );
    assert_eq!(session.execute_line("keys").unwrap(), vec!["a", "b"]);
}

// =============================================================================
// Script Tests
// =============================================================================

#[test]
fn test_run_script() {
    let mut session = session();
    let script = "\
# seed data
insert k1 ada 36
insert k2 bob 20

insert k1 dup 1
get k2
count
";
    let (output, summary) = run_script(&mut session, script);

    assert_eq!(
        output,
        "ok\n\
         ok\n\
         error: line 5: primary key conflict\n\
         k2 {\"name\":\"bob\",\"age\":20}\n\
         2\n"
    );
    assert_eq!(
        summary,
        RunSummary {
            succeeded: 4,
            failed: 1
        }
    );
}

#[test]
fn test_run_reports_parse_errors_and_continues() {
    let mut session = session();
    let (output, summary) = run_script(&mut session, "bogus\ninsert k1 ada 36\n");

    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("error: line 1: "));
    assert_eq!(lines[1], "ok");
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.succeeded, 1);
}

#[test]
fn test_run_continues_after_invalid_utf8_line() {
    let mut session = session();
    let script = b"insert k1 ada 36\n\xff\xfe\ninsert k2 bob 1\n".to_vec();
    let mut output = Vec::new();
    let summary = session.run(Cursor::new(script), &mut output).unwrap();

    let output = String::from_utf8(output).unwrap();
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "ok");
    assert!(lines[1].starts_with("error: line 2: "));
    assert_eq!(lines[2], "ok");
    assert_eq!(
        summary,
        RunSummary {
            succeeded: 2,
            failed: 1
        }
    );
    assert_eq!(session.table().len(), 2);
}

#[test]
fn test_run_accepts_crlf_line_endings() {
    let mut session = session();
    let (output, summary) = run_script(&mut session, "insert k1 ada 36\r\nget k1\r\n");
    assert_eq!(output, "ok\nk1 {\"name\":\"ada\",\"age\":36}\n");
    assert_eq!(summary.failed, 0);
}

#[test]
fn test_null_token_is_null_in_text_field() {
    let mut session = session();
    session.execute_line("insert k1 null 1").unwrap();
    assert_eq!(
        session.execute_line("get k1").unwrap(),
        vec![r#"k1 {"name":null,"age":1}"#]
    );
}

#[test]
fn test_run_script_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "insert k1 ada 36").unwrap();
    writeln!(file, "delete k1").unwrap();
    writeln!(file, "delete k1").unwrap();
    file.flush().unwrap();

    let mut session = session();
    let reader = BufReader::new(file.reopen().unwrap());
    let mut output = Vec::new();
    let summary = session.run(reader, &mut output).unwrap();

    assert_eq!(
        String::from_utf8(output).unwrap(),
        "ok\nok\nerror: line 3: record not found\n"
    );
    assert_eq!(summary.failed, 1);
    assert!(session.table().is_empty());
}
