//! 错误类型定义
//!
//! 定义了解析过程中可能出现的所有错误类型。

use thiserror::Error;

/// 解析错误类型
///
/// 包含了日志记录重建与 autovacuum 统计提取过程中可能遇到的所有错误情况。
/// 注意：不是 autovacuum 记录、或报告正文缺少必需字段，都不属于错误，
/// 这类记录会被直接跳过。
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// 文件未找到或无法访问
    #[error("file not found or inaccessible: {path}")]
    FileNotFound {
        /// 文件路径及底层错误描述
        path: String,
    },

    /// 读取输入时的 I/O 错误
    #[error("I/O error: {0}")]
    IoError(String),

    /// 输入为空
    #[error("empty input: no lines provided")]
    EmptyInput,

    /// jsonlog 行无法解码（JSON 语法错误或缺少必需的键）
    #[error("invalid JSON log entry at line {line}: {reason}")]
    InvalidJsonEntry {
        /// 行号（从 1 开始）
        line: usize,
        /// 解码失败原因
        reason: String,
    },

    /// 时间戳与 `YYYY-MM-DD HH:MM:SS.ffffff TZ` 格式不符
    #[error("invalid timestamp '{value}': expected 'YYYY-MM-DD HH:MM:SS.ffffff TZ'")]
    InvalidTimestamp {
        /// 原始时间戳字符串
        value: String,
    },

    /// 纯文本日志的起始行不符合完整的行前缀格式
    #[error("invalid record header: line does not match log_line_prefix format: {raw}")]
    InvalidRecordHeader {
        /// 原始起始行
        raw: String,
    },

    /// 数值解析失败
    #[error("failed to parse '{value}' as {kind}")]
    InvalidNumber {
        /// 期望的数值类型（integer / decimal）
        kind: &'static str,
        /// 原始文本
        value: String,
    },
}

impl ParseError {
    /// 是否应该中止整个处理过程
    ///
    /// 结构化输入解码失败、时间戳格式不符以及 I/O 错误说明生产者和消费者的格式约定
    /// 不一致，必须中止；纯文本日志中某个起始行不符合完整行前缀只影响这一条记录。
    pub fn is_fatal(&self) -> bool {
        !matches!(self, ParseError::InvalidRecordHeader { .. })
    }
}

impl From<std::io::Error> for ParseError {
    fn from(err: std::io::Error) -> Self {
        ParseError::IoError(err.to_string())
    }
}
