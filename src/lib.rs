//! # PostgreSQL Autovacuum Log Parser
//!
//! 从 PostgreSQL 服务器日志中提取 autovacuum 统计信息，每次 vacuum 生成一条结构化记录。
//!
//! ## 功能特性
//!
//! - **两种输入编码**: jsonlog（每行一个 JSON 对象）和带行前缀的纯文本日志
//! - **流式处理**: 逐行读取，纯文本日志最多缓冲一条记录
//! - **与顺序无关的提取**: 报告中每个段落独立定位，缺失的段落为 `None` 而不是 0
//! - **精确数值**: 整数和小数都保留原文，不丢失精度
//!
//! ## 快速开始
//!
//! ### 提取单条报告
//!
//! ```rust
//! use pg_autovacuum_log_parser::extract_vacuum_report;
//!
//! let message = "automatic vacuum of table \"live.tickets.q_tickets\": index scans: 1\n\
//!                pages: 0 removed, 590 remain, 115 scanned (19.49% of total)";
//! let report = extract_vacuum_report(message).unwrap();
//!
//! assert_eq!(report.table.to_string(), "live.tickets.q_tickets");
//! assert_eq!(report.pages.unwrap().remaining.unwrap().as_str(), "590");
//! ```
//!
//! ### 流式处理
//!
//! ```rust
//! use pg_autovacuum_log_parser::{InputFormat, for_each_vacuum_event};
//!
//! let log = r#"{"timestamp":"2024-03-01 10:15:02.123456 UTC","backend_type":"autovacuum worker","message":"automatic vacuum of table \"a.b.c\": index scans: 0"}"#;
//!
//! for_each_vacuum_event(log.as_bytes(), InputFormat::Auto, |event| {
//!     let event = event.unwrap();
//!     println!("{} {}", event.formatted_timestamp(), event.report.table);
//! })
//! .unwrap();
//! ```
//!
//! ## 日志格式
//!
//! 纯文本日志的行前缀（`log_line_prefix = '%t [%p]: [%l-1] user=%u,db=%d,host=%h,app=%a '`）：
//!
//! ```text
//! 2024-03-01 10:15:02 UTC [4242]: [3-1] user=,db=,host=,app= LOG:  automatic vacuum of table "live.tickets.q_tickets": index scans: 1
//!         pages: 0 removed, 590 remain, 115 scanned (19.49% of total)
//!         WAL usage: 149 records, 0 full page images, 10712 bytes
//! ```

pub mod config;
pub mod error;
pub mod log_record;
pub mod numeric;
pub mod output;
pub mod parser;
pub mod tools;
pub mod vacuum;

pub use config::{InputFormat, OutputFormat, ParserConfig};
pub use error::ParseError;
pub use log_record::{LogMeta, LogRecord};
pub use numeric::{Decimal, Int};
pub use output::{Column, RowWriter};
pub use parser::{
    JsonLogParser, LogRecords, PlainLogParser, Record, RecordParser, VacuumEventParser,
    extract_vacuum_report, for_each_vacuum_event, is_autovacuum_candidate,
    iter_log_records_from_file, iter_vacuum_events_from_file, parse_json_line, parse_record,
    parse_timestamp, parse_vacuum_events_from_string,
};
pub use vacuum::{TableName, VacuumEvent, VacuumReport};
