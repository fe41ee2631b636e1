//! 便捷 API 函数
//!
//! 提供了一组方便使用的高层 API，用于快速从文件、字符串或任意 Reader 中提取
//! autovacuum 事件。

use crate::config::InputFormat;
use crate::error::ParseError;
use crate::log_record::LogRecord;
use crate::parser::jsonlog_parser::JsonLogParser;
use crate::parser::record_parser::PlainLogParser;
use crate::parser::vacuum_parser::VacuumEventParser;
use crate::tools::looks_like_jsonlog;
use crate::vacuum::VacuumEvent;
use memchr::memchr_iter;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// 与输入编码无关的 LogRecord 迭代器
///
/// 隐藏 jsonlog 和纯文本两种物理编码的差别。
pub enum LogRecords<R: BufRead> {
    Json(JsonLogParser<R>),
    Plain(PlainLogParser<R>),
}

impl<R: BufRead> LogRecords<R> {
    /// 按指定编码创建迭代器
    ///
    /// `InputFormat::Auto` 以第一个非空白字节判断编码。开头的纯空白内容会被消耗，
    /// 直到出现非空白字节或到达输入末尾；全空白输入按纯文本处理。
    pub fn new(mut reader: R, format: InputFormat) -> Result<Self, ParseError> {
        let (format, skipped_lines) = match format {
            InputFormat::Auto => detect_format(&mut reader)?,
            other => (other, 0),
        };

        Ok(match format {
            InputFormat::Json => {
                LogRecords::Json(JsonLogParser::with_line_offset(reader, skipped_lines))
            }
            _ => LogRecords::Plain(PlainLogParser::new(reader)),
        })
    }

    /// 实际使用的输入编码
    pub fn format(&self) -> InputFormat {
        match self {
            LogRecords::Json(_) => InputFormat::Json,
            LogRecords::Plain(_) => InputFormat::Plain,
        }
    }
}

impl<R: BufRead> Iterator for LogRecords<R> {
    type Item = Result<LogRecord, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            LogRecords::Json(parser) => parser.next(),
            LogRecords::Plain(parser) => parser.next(),
        }
    }
}

/// 跳过开头的空白块并判断编码
///
/// 返回编码和被消耗的换行数。
fn detect_format<R: BufRead>(reader: &mut R) -> Result<(InputFormat, usize), ParseError> {
    let mut skipped_lines = 0;
    loop {
        let buf = reader.fill_buf()?;
        match looks_like_jsonlog(buf) {
            Some(true) => return Ok((InputFormat::Json, skipped_lines)),
            Some(false) => return Ok((InputFormat::Plain, skipped_lines)),
            None if buf.is_empty() => return Ok((InputFormat::Plain, skipped_lines)),
            None => {
                let len = buf.len();
                skipped_lines += memchr_iter(b'\n', buf).count();
                reader.consume(len);
            }
        }
    }
}

fn open_file(path: &Path) -> Result<BufReader<File>, ParseError> {
    let file = File::open(path).map_err(|e| ParseError::FileNotFound {
        path: format!("{}: {}", path.display(), e),
    })?;
    Ok(BufReader::new(file))
}

/// 从文件读取并返回 LogRecord 迭代器（流式处理）
pub fn iter_log_records_from_file<P>(
    path: P,
    format: InputFormat,
) -> Result<LogRecords<BufReader<File>>, ParseError>
where
    P: AsRef<Path>,
{
    LogRecords::new(open_file(path.as_ref())?, format)
}

/// 从文件读取并返回 VacuumEvent 迭代器（流式处理）
///
/// # 示例
///
/// ```no_run
/// use pg_autovacuum_log_parser::{InputFormat, iter_vacuum_events_from_file};
///
/// for result in iter_vacuum_events_from_file("postgresql.json", InputFormat::Auto)? {
///     let event = result?;
///     println!("{} {}", event.formatted_timestamp(), event.report.table);
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn iter_vacuum_events_from_file<P>(
    path: P,
    format: InputFormat,
) -> Result<VacuumEventParser<LogRecords<BufReader<File>>>, ParseError>
where
    P: AsRef<Path>,
{
    Ok(VacuumEventParser::new(iter_log_records_from_file(path, format)?))
}

/// 从字符串解析全部 autovacuum 事件
///
/// # 返回
///
/// 返回（成功提取的事件，遇到的错误）
///
/// # 示例
///
/// ```
/// use pg_autovacuum_log_parser::{InputFormat, parse_vacuum_events_from_string};
///
/// let log = "2024-03-01 10:15:02 UTC [4242]: [3-1] user=,db=,host=,app= LOG:  automatic vacuum of table \"live.public.t\": index scans: 0\n\
///            \tpages: 0 removed, 10 remain, 10 scanned (100.00% of total)\n";
/// let (events, errors) = parse_vacuum_events_from_string(log, InputFormat::Plain);
///
/// assert_eq!(events.len(), 1);
/// assert!(errors.is_empty());
/// assert_eq!(events[0].report.table.to_string(), "live.public.t");
/// ```
pub fn parse_vacuum_events_from_string(
    text: &str,
    format: InputFormat,
) -> (Vec<VacuumEvent>, Vec<ParseError>) {
    let mut events = Vec::new();
    let mut errors = Vec::new();

    let result = for_each_vacuum_event(text.as_bytes(), format, |item| match item {
        Ok(event) => events.push(event),
        Err(err) => errors.push(err),
    });
    if let Err(err) = result {
        errors.push(err);
    }

    (events, errors)
}

/// 流式处理每个 autovacuum 事件（包括错误），不在内存中保留全部结果
pub fn for_each_vacuum_event<R, F>(reader: R, format: InputFormat, mut f: F) -> Result<(), ParseError>
where
    R: BufRead,
    F: FnMut(Result<VacuumEvent, ParseError>),
{
    for item in VacuumEventParser::new(LogRecords::new(reader, format)?) {
        f(item);
    }
    Ok(())
}
