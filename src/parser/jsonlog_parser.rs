//! JsonLogParser - 逐行解码 PostgreSQL jsonlog
//!
//! jsonlog 中每行是一个独立的 JSON 对象，一行对应一条 `LogRecord`，
//! 不需要跨行拼接（消息中的换行以转义字符形式出现在字符串里）。

use crate::error::ParseError;
use crate::log_record::LogRecord;
use crate::parser::parse_functions::parse_json_line;
use std::io::BufRead;

/// jsonlog 迭代器
///
/// 空白行会被跳过；无法解码的行产生 `ParseError::InvalidJsonEntry`，
/// 时间戳格式不符的行产生 `ParseError::InvalidTimestamp`。
/// 读取错误之后迭代结束。
///
/// # 示例
///
/// ```
/// use pg_autovacuum_log_parser::JsonLogParser;
///
/// let log = concat!(
///     r#"{"timestamp":"2024-03-01 10:15:02.000001 UTC","backend_type":"client backend","message":"select 1"}"#,
///     "\n\n",
/// );
/// let records: Vec<_> = JsonLogParser::new(log.as_bytes()).collect();
///
/// assert_eq!(records.len(), 1);
/// assert_eq!(records[0].as_ref().unwrap().message, "select 1");
/// ```
pub struct JsonLogParser<R: BufRead> {
    reader: R,
    buffer: String,
    line_no: usize,
    finished: bool,
}

impl<R: BufRead> JsonLogParser<R> {
    pub fn new(reader: R) -> Self {
        Self::with_line_offset(reader, 0)
    }

    /// `reader` 之前已被消耗 `offset` 行时使用，保证错误中的行号仍对应原始输入
    pub(crate) fn with_line_offset(reader: R, offset: usize) -> Self {
        Self {
            reader,
            buffer: String::new(),
            line_no: offset,
            finished: false,
        }
    }

    /// 当前行号
    pub fn line_no(&self) -> usize {
        self.line_no
    }
}

impl<R: BufRead> Iterator for JsonLogParser<R> {
    type Item = Result<LogRecord, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.finished {
            self.buffer.clear();
            match self.reader.read_line(&mut self.buffer) {
                Ok(0) => self.finished = true,
                Ok(_) => {
                    self.line_no += 1;
                    let line = self.buffer.trim();
                    if line.is_empty() {
                        continue;
                    }
                    return Some(parse_json_line(line, self.line_no));
                }
                Err(e) => {
                    self.finished = true;
                    return Some(Err(ParseError::IoError(e.to_string())));
                }
            }
        }
        None
    }
}
