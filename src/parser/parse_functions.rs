//! 核心解析函数
//!
//! 把一条原始记录（纯文本的若干行，或 jsonlog 的一行）还原为 `LogRecord`。

use crate::error::ParseError;
use crate::log_record::{LogMeta, LogRecord};
use crate::parser::constants::*;
use crate::tools::is_record_start_line;
use chrono::NaiveDateTime;
use serde::Deserialize;

/// 从行数组解析成 LogRecord 结构
///
/// 纯文本日志的主要解析函数：第一行是带行前缀的起始行，后续行是消息正文的继续行。
///
/// # 参数
///
/// * `lines` - 包含日志记录的行（第一行必须是有效的起始行，后续行是继续行）
///
/// # 返回
///
/// * `Ok(LogRecord)` - 解析成功
/// * `Err(ParseError)` - 解析失败
///
/// # 错误
///
/// - `EmptyInput` - 输入为空
/// - `InvalidRecordHeader` - 第一行不符合完整的行前缀格式
/// - `InvalidTimestamp` - 时间戳无法解析
///
/// # 示例
///
/// ```
/// use pg_autovacuum_log_parser::parse_record;
///
/// let lines = vec![
///     "2024-03-01 10:15:02 UTC [4242]: [3-1] user=,db=,host=,app= LOG:  automatic vacuum of table \"live.public.t\": index scans: 0",
///     "\tpages: 0 removed, 10 remain, 10 scanned (100.00% of total)",
/// ];
/// let record = parse_record(&lines).unwrap();
///
/// assert_eq!(record.timezone, "UTC");
/// assert_eq!(record.meta.pid, Some(4242));
/// assert!(record.message.starts_with("automatic vacuum of table"));
/// assert!(record.message.ends_with("(100.00% of total)"));
/// ```
pub fn parse_record(lines: &[&str]) -> Result<LogRecord, ParseError> {
    let first_line = *lines.first().ok_or(ParseError::EmptyInput)?;

    if !is_record_start_line(first_line) {
        return Err(ParseError::InvalidRecordHeader {
            raw: first_line.to_string(),
        });
    }

    let caps = HEADER_PATTERN
        .captures(first_line)
        .ok_or_else(|| ParseError::InvalidRecordHeader {
            raw: first_line.to_string(),
        })?;

    // 正则保证了 ts/tz/pid/line/msg 分组一定存在
    let group = |name: &str| caps.name(name).map_or("", |m| m.as_str());

    let timestamp = parse_naive_timestamp(group("ts"))?;
    let meta = LogMeta {
        pid: group("pid").parse().ok(),
        session_line: group("line").parse().ok(),
        user: group("user").to_string(),
        database: group("db").to_string(),
        host: group("host").to_string(),
        application: group("app").to_string(),
        level: group("level").to_string(),
    };

    let body_start = caps.name("msg").map_or(first_line.len(), |m| m.start());
    let message = build_body(first_line, body_start, &lines[1..]);

    Ok(LogRecord {
        timestamp,
        timezone: group("tz").to_string(),
        backend_kind: None,
        message,
        meta,
    })
}

/// 构建完整的消息正文（包含所有继续行）
///
/// 将起始行的消息部分和所有继续行用换行符拼接。使用预分配内存。
#[inline]
pub(crate) fn build_body(first_line: &str, body_start: usize, continuation_lines: &[&str]) -> String {
    let first_part = first_line.get(body_start..).unwrap_or("");
    if continuation_lines.is_empty() {
        return first_part.to_string();
    }

    let total_len = first_part.len()
        + continuation_lines.iter().map(|s| s.len()).sum::<usize>()
        + continuation_lines.len();

    let mut result = String::with_capacity(total_len);
    result.push_str(first_part);
    for line in continuation_lines {
        result.push('\n');
        result.push_str(line);
    }
    result
}

/// 解析 `YYYY-MM-DD HH:MM:SS[.ffffff] TZ` 格式的时间戳
///
/// # 返回
///
/// 返回（不含时区的时间戳，时区标签）
pub fn parse_timestamp(value: &str) -> Result<(NaiveDateTime, String), ParseError> {
    let invalid = || ParseError::InvalidTimestamp {
        value: value.to_string(),
    };

    let (datetime, tz) = value.trim().rsplit_once(' ').ok_or_else(invalid)?;
    if tz.is_empty() || datetime.ends_with(' ') {
        return Err(invalid());
    }

    let ts = NaiveDateTime::parse_from_str(datetime, TIMESTAMP_FORMAT).map_err(|_| invalid())?;
    Ok((ts, tz.to_string()))
}

#[inline]
fn parse_naive_timestamp(value: &str) -> Result<NaiveDateTime, ParseError> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT).map_err(|_| ParseError::InvalidTimestamp {
        value: value.to_string(),
    })
}

/// jsonlog 中的一行
///
/// `timestamp`、`backend_type`、`message` 是必需的键，其余键缺失时为 `None`。
#[derive(Debug, Deserialize)]
struct JsonLogEntry {
    timestamp: String,
    backend_type: String,
    message: String,
    pid: Option<u32>,
    line_num: Option<u64>,
    user: Option<String>,
    dbname: Option<String>,
    remote_host: Option<String>,
    application_name: Option<String>,
    error_severity: Option<String>,
}

/// 解析 jsonlog 的一行
///
/// # 参数
///
/// * `line` - 一个完整的 JSON 对象
/// * `line_no` - 行号（从 1 开始，用于错误信息）
///
/// # 示例
///
/// ```
/// use pg_autovacuum_log_parser::parse_json_line;
///
/// let line = r#"{"timestamp":"2024-03-01 10:15:02.123456 UTC","backend_type":"autovacuum worker","message":"automatic vacuum of table \"a.b.c\": index scans: 0"}"#;
/// let record = parse_json_line(line, 1).unwrap();
///
/// assert_eq!(record.backend_kind.as_deref(), Some("autovacuum worker"));
/// assert_eq!(record.timezone, "UTC");
/// ```
pub fn parse_json_line(line: &str, line_no: usize) -> Result<LogRecord, ParseError> {
    let entry: JsonLogEntry =
        serde_json::from_str(line).map_err(|e| ParseError::InvalidJsonEntry {
            line: line_no,
            reason: e.to_string(),
        })?;

    let (timestamp, timezone) = parse_timestamp(&entry.timestamp)?;

    Ok(LogRecord {
        timestamp,
        timezone,
        backend_kind: Some(entry.backend_type),
        message: entry.message,
        meta: LogMeta {
            pid: entry.pid,
            session_line: entry.line_num,
            user: entry.user.unwrap_or_default(),
            database: entry.dbname.unwrap_or_default(),
            host: entry.remote_host.unwrap_or_default(),
            application: entry.application_name.unwrap_or_default(),
            level: entry.error_severity.unwrap_or_default(),
        },
    })
}
