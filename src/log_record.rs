use chrono::NaiveDateTime;

/// 日志记录
///
/// 表示一条逻辑日志记录，与输入编码（jsonlog 或纯文本）无关。
/// 由记录重建器构造一次，之后不再修改。
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    /// 时间戳（不含时区），精确到服务器打印的小数秒
    pub timestamp: NaiveDateTime,

    /// 时区标签，如 "UTC"、"CET"
    pub timezone: String,

    /// 进程类型（jsonlog 的 `backend_type`）。纯文本日志不含此信息，为 `None`
    pub backend_kind: Option<String>,

    /// 消息正文，可能跨多行
    pub message: String,

    /// 行前缀中的其他元数据
    pub meta: LogMeta,
}

/// 元数据部分
///
/// 两种输入编码都携带的行前缀信息。纯文本日志中为空的字段保存为空字符串。
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LogMeta {
    /// 进程 ID
    pub pid: Option<u32>,

    /// 会话内行号（纯文本 `[N-M]` 中的 N，jsonlog 的 `line_num`）
    pub session_line: Option<u64>,

    /// 数据库用户
    pub user: String,

    /// 数据库名
    pub database: String,

    /// 客户端主机
    pub host: String,

    /// 应用程序名称
    pub application: String,

    /// 日志级别，如 "LOG"
    pub level: String,
}
