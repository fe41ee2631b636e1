//! VacuumEventParser - 将 LogRecord 流转换为 VacuumEvent 流
//!
//! 过滤掉非 autovacuum 记录，对剩下的记录提取报告。

use crate::error::ParseError;
use crate::log_record::LogRecord;
use crate::parser::vacuum_functions::{extract_vacuum_report, is_autovacuum_candidate};
use crate::vacuum::VacuumEvent;
use tracing::debug;

/// LogRecord 迭代器到 VacuumEvent 迭代器的适配器
///
/// - 上游的错误原样传递
/// - 不是 autovacuum 报告的记录静默跳过
/// - 报告正文缺少表名或索引扫描次数的记录整体丢弃
///
/// # 示例
///
/// ```
/// use pg_autovacuum_log_parser::{JsonLogParser, VacuumEventParser};
///
/// let log = concat!(
///     r#"{"timestamp":"2024-03-01 10:15:02.000001 UTC","backend_type":"client backend","message":"automatic vacuum of table \"a.b.c\": index scans: 0"}"#,
///     "\n",
///     r#"{"timestamp":"2024-03-01 10:15:03.000001 UTC","backend_type":"autovacuum worker","message":"automatic vacuum of table \"a.b.c\": index scans: 0"}"#,
/// );
/// let events: Vec<_> = VacuumEventParser::new(JsonLogParser::new(log.as_bytes())).collect();
///
/// assert_eq!(events.len(), 1);
/// ```
pub struct VacuumEventParser<I> {
    records: I,
}

impl<I> VacuumEventParser<I>
where
    I: Iterator<Item = Result<LogRecord, ParseError>>,
{
    pub fn new(records: I) -> Self {
        Self { records }
    }
}

/// 对单条记录应用过滤和提取
pub fn log_record_to_event(record: LogRecord) -> Option<VacuumEvent> {
    if !is_autovacuum_candidate(&record) {
        return None;
    }

    let report = extract_vacuum_report(&record.message)?;
    Some(VacuumEvent {
        timestamp: record.timestamp,
        timezone: record.timezone,
        report,
    })
}

impl<I> Iterator for VacuumEventParser<I>
where
    I: Iterator<Item = Result<LogRecord, ParseError>>,
{
    type Item = Result<VacuumEvent, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.records.next()? {
                Ok(record) => {
                    let ts = record.timestamp;
                    match log_record_to_event(record) {
                        Some(event) => return Some(Ok(event)),
                        None => debug!(timestamp = %ts, "record is not an autovacuum report"),
                    }
                }
                Err(e) => return Some(Err(e)),
            }
        }
    }
}
