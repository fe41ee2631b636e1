//! 解析器使用的常量定义
//!
//! 定义了解析过程中使用的所有常量，包括格式字符串、过滤条件和各段落的匹配模式。
//! 所有正则表达式在首次使用时编译一次，之后只读共享。

use once_cell::sync::Lazy;
use regex::Regex;

// 过滤条件

/// 只处理该进程类型产生的 jsonlog 记录
pub const AUTOVACUUM_BACKEND_TYPE: &str = "autovacuum worker";

/// vacuum 报告消息必须以此开头（锚定匹配）
pub const VACUUM_ANNOUNCEMENT_PREFIX: &str = "automatic vacuum of table";

// 时间戳

/// 时间戳中日期时间部分的格式（时区标签单独处理）
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

// 纯文本日志行前缀
//
// 2024-03-01 10:15:02 UTC [12345]: [3-1] user=,db=,host=,app= LOG:  message

/// 完整的行前缀模式
pub static HEADER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^(?P<ts>[0-9]{4}-[0-9]{2}-[0-9]{2} [0-9]{2}:[0-9]{2}:[0-9]{2}(?:\.[0-9]+)?) (?P<tz>[A-Z]+) ",
        r"\[(?P<pid>[0-9]+)\]:\s+",
        r"\[(?P<line>[0-9]+)-[0-9]+\]\s+",
        r"user=(?P<user>[^,\s]*)\s*,\s*",
        r"db=(?P<db>[^,\s]*)\s*,\s*",
        r"host=(?P<host>[^,\s]*)\s*,\s*",
        r"app=(?P<app>.*?)\s+",
        r"(?P<level>[A-Z]+):\s*",
        r"(?P<msg>.*)$",
    ))
    .expect("header pattern must compile")
});

// vacuum 报告各段落
//
// 每个模式只锚定在行首的标签上，互相独立，与行顺序无关。

/// `automatic vacuum of table "db.schema.table": index scans: N`
pub static ANNOUNCEMENT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^automatic vacuum of table[ \t]+"(\w+)\.(\w+)\.(\w+)":[ \t]+index scans:[ \t]+([0-9]+)"#)
        .expect("announcement pattern must compile")
});

/// `pages: 0 removed, 8566 remain, 589 scanned (6.88% of total)`
pub static PAGES_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?m)^[ \t]*pages:[ \t]+([0-9]+)[ \t]+removed",
        r"(?:,[ \t]+([0-9]+)[ \t]+remain)?",
        r"(?:,[ \t]+([0-9]+)[ \t]+scanned)?",
        r"(?:[ \t]+\(([0-9]+(?:\.[0-9]+)?)%[ \t]+of[ \t]+total\))?",
    ))
    .expect("pages pattern must compile")
});

/// `tuples: 8 removed, 8871 remain, 524 are dead but not yet removable`
pub static TUPLES_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?m)^[ \t]*tuples:[ \t]+([0-9]+)[ \t]+removed",
        r"(?:,[ \t]+([0-9]+)[ \t]+remain)?",
        r"(?:,[ \t]+([0-9]+)[ \t]+are[ \t]+dead[ \t]+but[ \t]+not[ \t]+yet[ \t]+removable)?",
    ))
    .expect("tuples pattern must compile")
});

/// `removable cutoff: 289809785, which was 1298 XIDs old when operation ended`
pub static REMOVABLE_CUTOFF_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?m)^[ \t]*removable[ \t]+cutoff:[ \t]+([0-9]+)",
        r"(?:,[ \t]+which[ \t]+was[ \t]+([0-9]+)[ \t]+XIDs[ \t]+old[ \t]+when[ \t]+operation[ \t]+ended)?",
    ))
    .expect("removable cutoff pattern must compile")
});

/// `new relfrozenxid: 286371019, which is 7110685 XIDs ahead of previous value`
pub static RELFROZENXID_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?m)^[ \t]*new[ \t]+relfrozenxid:[ \t]+([0-9]+)",
        r"(?:,[ \t]+which[ \t]+is[ \t]+([0-9]+)[ \t]+XIDs[ \t]+ahead[ \t]+of[ \t]+previous[ \t]+value)?",
    ))
    .expect("relfrozenxid pattern must compile")
});

/// `new relminmxid: 68673587, which is 7106 MXIDs ahead of previous value`
pub static RELMINMXID_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?m)^[ \t]*new[ \t]+relminmxid:[ \t]+([0-9]+)",
        r"(?:,[ \t]+which[ \t]+is[ \t]+([0-9]+)[ \t]+MXIDs[ \t]+ahead[ \t]+of[ \t]+previous[ \t]+value)?",
    ))
    .expect("relminmxid pattern must compile")
});

/// `frozen: 5 pages from table (0.06% of total) had 14 tuples frozen`
pub static FROZEN_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?m)^[ \t]*frozen:[ \t]+([0-9]+)[ \t]+pages[ \t]+from[ \t]+table",
        r"[ \t]+\(([0-9]+(?:\.[0-9]+)?)%[ \t]+of[ \t]+total\)",
        r"(?:[ \t]+had[ \t]+([0-9]+)[ \t]+tuples[ \t]+frozen)?",
    ))
    .expect("frozen pattern must compile")
});

/// `index scan not needed|bypassed|needed: 40 pages from table (6.78% of total) had 428 dead item identifiers ...`
///
/// 三种标签放在同一个模式里，第一个匹配即正文中最靠前的一个。
pub static INDEX_SCAN_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?m)^[ \t]*index[ \t]+scan[ \t]+(not[ \t]+needed|bypassed|needed):",
        r"[ \t]+([0-9]+)[ \t]+pages[ \t]+from[ \t]+table",
        r"[ \t]+\(([0-9]+(?:\.[0-9]+)?)%[ \t]+of[ \t]+total\)",
        r"[ \t]+(?:had|have)[ \t]+([0-9]+)[ \t]+dead[ \t]+item[ \t]+identifiers",
    ))
    .expect("index scan pattern must compile")
});

/// `index "pk_xxx": pages: 94 in total, 0 newly deleted, 0 currently deleted, 0 reusable`
pub static INDEX_PAGES_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r#"(?m)^[ \t]*index[ \t]+"([^"]+)":[ \t]+pages:[ \t]+([0-9]+)[ \t]+(?:in[ \t]+total|remain)"#,
        r"(?:,[ \t]+([0-9]+)[ \t]+newly[ \t]+deleted)?",
        r"(?:,[ \t]+([0-9]+)[ \t]+currently[ \t]+deleted)?",
        r"(?:,[ \t]+([0-9]+)[ \t]+reusable)?",
    ))
    .expect("index pages pattern must compile")
});

/// `I/O timings: read: 18.272 ms, write: 0.000 ms`（两项必须同时出现）
pub static IO_TIMINGS_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?m)^[ \t]*I/O[ \t]+timings:[ \t]+read:[ \t]+([0-9]+(?:\.[0-9]+)?)[ \t]+ms",
        r",[ \t]+write:[ \t]+([0-9]+(?:\.[0-9]+)?)[ \t]+ms",
    ))
    .expect("I/O timings pattern must compile")
});

/// `avg read rate: 48.657 MB/s, avg write rate: 242.241 MB/s`（两项必须同时出现）
pub static IO_RATE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?m)^[ \t]*avg[ \t]+read[ \t]+rate:[ \t]+([0-9]+(?:\.[0-9]+)?)[ \t]+MB/s",
        r",[ \t]+avg[ \t]+write[ \t]+rate:[ \t]+([0-9]+(?:\.[0-9]+)?)[ \t]+MB/s",
    ))
    .expect("I/O rate pattern must compile")
});

/// `buffer usage: 425 hits, 0 misses, 1 dirtied`
pub static BUFFER_USAGE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?m)^[ \t]*buffer[ \t]+usage:[ \t]+([0-9]+)[ \t]+hits",
        r"(?:,[ \t]+([0-9]+)[ \t]+misses,[ \t]+([0-9]+)[ \t]+dirtied)?",
    ))
    .expect("buffer usage pattern must compile")
});

/// `WAL usage: 149 records, 0 full page images, 10712 bytes[, 0 buffers full]`
pub static WAL_USAGE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?m)^[ \t]*WAL[ \t]+usage:[ \t]+([0-9]+)[ \t]+records",
        r"(?:,[ \t]+([0-9]+)[ \t]+full[ \t]+page[ \t]+images)?",
        r"(?:,[ \t]+([0-9]+)[ \t]+bytes)?",
        r"(?:,[ \t]+([0-9]+)[ \t]+buffers[ \t]+full)?",
    ))
    .expect("WAL usage pattern must compile")
});

/// `system usage: CPU: user: 0.03 s, system: 0.00 s, elapsed: 0.07 s`
pub static SYSTEM_USAGE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?m)^[ \t]*system[ \t]+usage:[ \t]+CPU:[ \t]+user:[ \t]+([0-9]+(?:\.[0-9]+)?)[ \t]+s",
        r",[ \t]+system:[ \t]+([0-9]+(?:\.[0-9]+)?)[ \t]+s",
        r",[ \t]+elapsed:[ \t]+([0-9]+(?:\.[0-9]+)?)[ \t]+s",
    ))
    .expect("system usage pattern must compile")
});
