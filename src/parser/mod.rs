//! Parser 模块 - 解析 PostgreSQL 日志并提取 autovacuum 报告
//!
//! 此模块提供了完整的解析功能,包括:
//! - 纯文本日志的 Record 切分和解析
//! - jsonlog 的逐行解码
//! - autovacuum 报告提取
//! - 便捷 API 函数

mod api;
mod constants;
pub mod jsonlog_parser;
pub(crate) mod parse_functions;
pub mod record;
pub mod record_parser;
pub(crate) mod vacuum_functions;
pub mod vacuum_parser;

pub use api::{
    LogRecords, for_each_vacuum_event, iter_log_records_from_file, iter_vacuum_events_from_file,
    parse_vacuum_events_from_string,
};
pub use constants::{AUTOVACUUM_BACKEND_TYPE, TIMESTAMP_FORMAT, VACUUM_ANNOUNCEMENT_PREFIX};
pub use jsonlog_parser::JsonLogParser;
pub use parse_functions::{parse_json_line, parse_record, parse_timestamp};
pub use record::Record;
pub use record_parser::{PlainLogParser, RecordParser};
pub use vacuum_functions::{extract_vacuum_report, is_autovacuum_candidate};
pub use vacuum_parser::{VacuumEventParser, log_record_to_event};
