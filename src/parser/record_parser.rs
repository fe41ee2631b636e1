//! RecordParser - 从 Reader 流式读取纯文本日志的 Record
//!
//! 提供了一个迭代器，可以从任何实现了 `BufRead` trait 的源中逐条读取日志记录。
//! 每条记录在遇到下一个起始行或输入结束时才算完整，因此最多缓冲一条记录。

use crate::error::ParseError;
use crate::log_record::LogRecord;
use crate::parser::record::Record;
use crate::tools::is_record_start_line;
use std::{
    io::{self, BufRead},
    mem,
};
use tracing::debug;

/// 从 Reader 中按行读取并组装成 Record 的迭代器
///
/// 自动识别记录的起始行和继续行，并将它们组合成完整的 `Record`。
/// 第一个起始行之前的行会被跳过。
///
/// # 类型参数
///
/// * `R` - 实现了 `BufRead` trait 的类型
pub struct RecordParser<R: BufRead> {
    reader: R,
    buffer: String,
    next_line: Option<String>,
    finished: bool,
    lines_read: usize,
}

impl<R: BufRead> RecordParser<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: String::new(),
            next_line: None,
            finished: false,
            lines_read: 0,
        }
    }

    /// 已读取的行数
    pub fn lines_read(&self) -> usize {
        self.lines_read
    }

    /// 读取下一行（去掉行尾的 `\n` / `\r\n`）
    fn read_line(&mut self) -> io::Result<Option<String>> {
        self.buffer.clear();
        if self.reader.read_line(&mut self.buffer)? == 0 {
            return Ok(None);
        }
        self.lines_read += 1;

        let trimmed_len = self.buffer.trim_end_matches(['\n', '\r']).len();
        self.buffer.truncate(trimmed_len);

        // 使用 mem::take 避免额外的克隆
        Ok(Some(mem::take(&mut self.buffer)))
    }

    /// 获取下一个记录的起始行
    fn get_start_line(&mut self) -> io::Result<Option<String>> {
        if let Some(line) = self.next_line.take() {
            return Ok(Some(line));
        }

        // 读取并跳过非起始行，直到找到第一个有效起始行
        loop {
            match self.read_line()? {
                Some(line) if is_record_start_line(&line) => return Ok(Some(line)),
                Some(_) => debug!(line = self.lines_read, "skipping line before first record"),
                None => {
                    self.finished = true;
                    return Ok(None);
                }
            }
        }
    }

    /// 读取当前记录的所有继续行
    fn read_continuation_lines(&mut self, record: &mut Record) -> io::Result<()> {
        loop {
            match self.read_line()? {
                Some(line) if is_record_start_line(&line) => {
                    // 遇到下一个起始行，保存它并结束当前记录
                    self.next_line = Some(line);
                    return Ok(());
                }
                Some(line) => record.add_line(line),
                None => {
                    self.finished = true;
                    return Ok(());
                }
            }
        }
    }
}

impl<R: BufRead> Iterator for RecordParser<R> {
    type Item = io::Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished && self.next_line.is_none() {
            return None;
        }

        let start_line = match self.get_start_line() {
            Ok(Some(line)) => line,
            Ok(None) => return None,
            Err(e) => {
                self.finished = true;
                return Some(Err(e));
            }
        };

        let mut record = Record::new(start_line);
        match self.read_continuation_lines(&mut record) {
            Ok(()) => Some(Ok(record)),
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

/// 将 RecordParser 转换为 LogRecord 迭代器的适配器
///
/// 在 `RecordParser` 的基础上，自动将每个 `Record` 解析为 `LogRecord`。
///
/// # 示例
///
/// ```
/// use pg_autovacuum_log_parser::PlainLogParser;
///
/// let log = "2024-03-01 10:15:02 UTC [1]: [1-1] user=,db=,host=,app= LOG:  checkpoint starting: time\n";
/// let records: Vec<_> = PlainLogParser::new(log.as_bytes()).collect();
///
/// assert_eq!(records.len(), 1);
/// assert_eq!(records[0].as_ref().unwrap().message, "checkpoint starting: time");
/// ```
pub struct PlainLogParser<R: BufRead> {
    record_parser: RecordParser<R>,
}

impl<R: BufRead> PlainLogParser<R> {
    pub fn new(reader: R) -> Self {
        Self {
            record_parser: RecordParser::new(reader),
        }
    }
}

impl<R: BufRead> Iterator for PlainLogParser<R> {
    type Item = Result<LogRecord, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.record_parser.next()? {
            Ok(record) => Some(record.parse_to_log_record()),
            Err(e) => Some(Err(ParseError::IoError(e.to_string()))),
        }
    }
}
