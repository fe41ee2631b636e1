use pg_autovacuum_log_parser::{ParseError, PlainLogParser, RecordParser};

const HEADER: &str = "2024-03-01 10:15:02 UTC [4242]: [3-1] user=,db=,host=,app= LOG:  ";

#[test]
fn test_parser_single_line() {
    let data = format!("{HEADER}checkpoint starting: time");
    let parser = RecordParser::new(data.as_bytes());

    let records: Vec<_> = parser.collect();
    assert_eq!(records.len(), 1);
    assert!(records[0].is_ok());
}

#[test]
fn test_parser_multiple_records() {
    let data = "2024-03-01 10:15:02 UTC [1]: [1-1] user=,db=,host=,app= LOG:  one\n\
                2024-03-01 10:15:03.5 UTC [2]: [1-1] user=,db=,host=,app= LOG:  two\n\
                2024-03-01 10:15:04 UTC [3]: [1-1] user=,db=,host=,app= LOG:  three";
    let parser = RecordParser::new(data.as_bytes());

    let records: Vec<_> = parser.collect();
    assert_eq!(records.len(), 3);
    assert!(records.iter().all(|r| r.is_ok()));
}

#[test]
fn test_parser_multiline_record() {
    let data = format!(
        "{HEADER}automatic vacuum of table \"a.b.c\": index scans: 0\n\
         \tpages: 0 removed, 10 remain, 10 scanned (100.00% of total)\n\
         \tWAL usage: 1 records, 0 full page images, 100 bytes"
    );
    let parser = RecordParser::new(data.as_bytes());

    let records: Vec<_> = parser.collect();
    assert_eq!(records.len(), 1);

    let record = records[0].as_ref().unwrap();
    assert_eq!(record.lines.len(), 3);
    assert!(record.lines[2].contains("WAL usage"));
}

#[test]
fn test_parser_skip_invalid_lines() {
    let data = format!("invalid line\nanother invalid\n{HEADER}one\n{HEADER}two");
    let parser = RecordParser::new(data.as_bytes());

    let records: Vec<_> = parser.collect();
    assert_eq!(records.len(), 2);
}

#[test]
fn test_parser_empty_input() {
    let parser = RecordParser::new("".as_bytes());

    let records: Vec<_> = parser.collect();
    assert_eq!(records.len(), 0);
}

#[test]
fn test_parser_only_invalid_lines() {
    let data = "no header here\n\tpages: 0 removed\n2024 was a year";
    let parser = RecordParser::new(data.as_bytes());

    assert_eq!(parser.count(), 0);
}

#[test]
fn test_body_line_with_timestamp_but_no_pid() {
    let data = format!(
        "{HEADER}automatic vacuum of table \"a.b.c\": index scans: 0\n\
         2024-03-01 10:15:03 UTC replication slot note\n\
         {HEADER}next"
    );
    let records: Vec<_> = RecordParser::new(data.as_bytes()).collect();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].as_ref().unwrap().lines.len(), 2);
}

#[test]
fn test_trailing_empty_lines_stay_in_body() {
    let data = format!("{HEADER}one\n\n\n");
    let records: Vec<_> = RecordParser::new(data.as_bytes()).collect();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].as_ref().unwrap().lines.len(), 3);
}

#[test]
fn test_plain_log_parser_yields_log_records() {
    let data = format!("{HEADER}first\n\tcontinued\n{HEADER}second");
    let records: Vec<_> = PlainLogParser::new(data.as_bytes()).collect();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].as_ref().unwrap().message, "first\n\tcontinued");
    assert_eq!(records[1].as_ref().unwrap().message, "second");
}

#[test]
fn test_plain_log_parser_reports_bad_header_and_continues() {
    let data = format!(
        "2024-03-01 10:15:02 UTC [4242]: LOG:  short prefix\n\
         {HEADER}after"
    );
    let records: Vec<_> = PlainLogParser::new(data.as_bytes()).collect();

    assert_eq!(records.len(), 2);
    let err = records[0].as_ref().unwrap_err();
    assert!(matches!(err, ParseError::InvalidRecordHeader { .. }));
    assert!(!err.is_fatal());
    assert_eq!(records[1].as_ref().unwrap().message, "after");
}
