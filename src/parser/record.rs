//! Record 结构定义和相关方法
//!
//! Record 表示纯文本日志中的一条原始记录，可能包含多行（起始行 + 继续行）。

use crate::error::ParseError;
use crate::log_record::LogRecord;
use crate::parser::parse_functions;

/// 表示一条完整的纯文本日志记录（可能包含多行）
///
/// 日志记录由一个起始行和零个或多个继续行组成。起始行包含时间戳和行前缀元数据，
/// 继续行是消息正文的后续部分（vacuum 报告的 `pages:`、`tuples:` 等行）。
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// 记录的所有行（第一行是起始行，后续行是继续行）
    pub lines: Vec<String>,
}

impl Record {
    /// 创建新的记录
    pub fn new(start_line: String) -> Self {
        Self {
            lines: vec![start_line],
        }
    }

    /// 添加继续行
    pub fn add_line(&mut self, line: String) {
        self.lines.push(line);
    }

    /// 将 Record 解析为 LogRecord
    ///
    /// # 返回
    ///
    /// * `Ok(LogRecord)` - 解析成功
    /// * `Err(ParseError)` - 起始行不符合完整的行前缀格式
    pub fn parse_to_log_record(&self) -> Result<LogRecord, ParseError> {
        let lines: Vec<&str> = self.lines.iter().map(|s| s.as_str()).collect();
        parse_functions::parse_record(&lines)
    }
}
