//! 运行配置
//!
//! 输入格式、输出格式、输出列和表头开关。命令行工具根据参数构建，
//! 库的使用者也可以直接构建。

use crate::output::Column;

/// 输入编码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputFormat {
    /// 根据第一个非空白字节自动判断：`{` 为 jsonlog，否则为纯文本
    #[default]
    Auto,
    /// PostgreSQL jsonlog（每行一个 JSON 对象）
    Json,
    /// 带 `log_line_prefix` 的纯文本日志
    Plain,
}

/// 输出编码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// 逗号加空格分隔的文本行
    #[default]
    Text,
    /// 每行一个 JSON 对象
    Json,
}

/// 解析与输出配置
#[derive(Debug, Clone, PartialEq)]
pub struct ParserConfig {
    /// 输入编码
    pub input_format: InputFormat,
    /// 输出编码
    pub output_format: OutputFormat,
    /// 文本输出的列（按顺序）
    pub columns: &'static [Column],
    /// 是否输出表头行（仅文本输出）
    pub header: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            input_format: InputFormat::Auto,
            output_format: OutputFormat::Text,
            columns: Column::BASIC,
            header: true,
        }
    }
}

impl ParserConfig {
    pub fn with_input_format(mut self, format: InputFormat) -> Self {
        self.input_format = format;
        self
    }

    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    /// 使用全部列（基础列 + 扩展列）
    pub fn with_extended_columns(mut self, extended: bool) -> Self {
        self.columns = if extended {
            Column::EXTENDED
        } else {
            Column::BASIC
        };
        self
    }

    pub fn with_header(mut self, header: bool) -> Self {
        self.header = header;
        self
    }
}
