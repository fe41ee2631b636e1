//! 命令行工具测试

use std::io::Write;
use std::process::{Command, Output, Stdio};
use tempfile::NamedTempFile;

const VACUUM_LINE: &str = r#"{"timestamp":"2024-03-01 10:15:02.123456 UTC","backend_type":"autovacuum worker","message":"automatic vacuum of table \"live.tickets.q_tickets\": index scans: 1\n\tpages: 0 removed, 590 remain, 115 scanned (19.49% of total)\n\tWAL usage: 149 records, 0 full page images, 10712 bytes"}"#;
const CLIENT_LINE: &str = r#"{"timestamp":"2024-03-01 10:15:03.000000 UTC","backend_type":"client backend","message":"automatic vacuum of table \"live.tickets.q_tickets\": index scans: 1"}"#;

const EXPECTED_ROW: &str =
    "2024-03-01 10:15:02, live.tickets.q_tickets, 1, 0, 590, 115, 19.49, , , , , , 149, 0, 10712";

fn run_with_stdin(args: &[&str], input: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_pg-vacuum-stats"))
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn pg-vacuum-stats");

    child
        .stdin
        .take()
        .unwrap()
        .write_all(input.as_bytes())
        .unwrap();
    child.wait_with_output().unwrap()
}

#[test]
fn test_stdin_jsonlog() {
    let input = format!("{VACUUM_LINE}\n{CLIENT_LINE}\n");
    let output = run_with_stdin(&[], &input);

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("timestamp, database.schema.table, index_scans"));
    assert_eq!(lines[1], EXPECTED_ROW);
}

#[test]
fn test_dash_reads_stdin() {
    let output = run_with_stdin(&["-", "--no-header"], &format!("{VACUUM_LINE}\n"));

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(String::from_utf8(output.stdout).unwrap(), format!("{EXPECTED_ROW}\n"));
}

#[test]
fn test_client_backend_produces_no_rows() {
    let output = run_with_stdin(&["--no-header"], &format!("{CLIENT_LINE}\n"));

    assert_eq!(output.status.code(), Some(0));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_file_input_plain_text() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "2024-03-01 10:15:02 UTC [4242]: [3-1] user=,db=,host=,app= LOG:  automatic vacuum of table \"live.tickets.q_tickets\": index scans: 1\n\
         \tpages: 0 removed, 590 remain, 115 scanned (19.49% of total)\n\
         \tWAL usage: 149 records, 0 full page images, 10712 bytes"
    )
    .unwrap();
    file.flush().unwrap();

    let path = file.path().to_str().unwrap();
    let output = run_with_stdin(&["--no-header", "--format", "plain", path], "");

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(String::from_utf8(output.stdout).unwrap(), format!("{EXPECTED_ROW}\n"));
}

#[test]
fn test_extended_and_json_output() {
    let output = run_with_stdin(&["--extended", "--no-header"], &format!("{VACUUM_LINE}\n"));
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with(EXPECTED_ROW));
    assert!(stdout.trim_end().len() > EXPECTED_ROW.len());

    let output = run_with_stdin(&["--output", "json"], &format!("{VACUUM_LINE}\n"));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["table"], "live.tickets.q_tickets");
}

#[test]
fn test_malformed_jsonlog_exits_2() {
    let input = format!("{VACUUM_LINE}\n{{\"timestamp\":\n");
    let output = run_with_stdin(&["--no-header"], &input);

    assert_eq!(output.status.code(), Some(2));
    // 出错之前的行已经输出
    assert_eq!(String::from_utf8(output.stdout).unwrap(), format!("{EXPECTED_ROW}\n"));
    assert!(String::from_utf8(output.stderr).unwrap().contains("line 2"));
}

#[test]
fn test_missing_file_exits_2() {
    let output = run_with_stdin(&["/nonexistent/postgresql.json"], "");

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8(output.stderr).unwrap().contains("cannot open input file"));
}

#[test]
fn test_closed_output_pipe_exits_1_silently() {
    let mut child = Command::new(env!("CARGO_BIN_EXE_pg-vacuum-stats"))
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();

    // 下游在读取任何内容之前就关闭
    drop(child.stdout.take());

    let input = format!("{VACUUM_LINE}\n").repeat(2_000);
    let mut stdin = child.stdin.take().unwrap();
    // 进程可能在读完输入之前就已退出
    let _ = stdin.write_all(input.as_bytes());
    drop(stdin);

    let output = child.wait_with_output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stderr.is_empty());
}
