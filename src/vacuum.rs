//! autovacuum 报告数据结构
//!
//! 一条 `automatic vacuum of table ...` 日志消息解析后的强类型表示。
//! 除表名和索引扫描次数外，所有分组都是可选的：日志中没有出现的行为 `None`，
//! 而不是 0。

use crate::numeric::{Decimal, Int};
use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};
use std::fmt;

/// 输出时间戳的格式（与行前缀一致，不含小数秒）
pub const OUTPUT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 一次 autovacuum 事件：时间戳 + 报告，对应一行输出
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VacuumEvent {
    /// 日志记录时间戳
    #[serde(serialize_with = "serialize_timestamp")]
    pub timestamp: NaiveDateTime,

    /// 时区标签
    pub timezone: String,

    /// 解析出的报告
    #[serde(flatten)]
    pub report: VacuumReport,
}

fn serialize_timestamp<S: Serializer>(ts: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(&ts.format("%Y-%m-%d %H:%M:%S%.f"))
}

/// autovacuum 报告
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VacuumReport {
    /// 完整表名（database.schema.table）
    pub table: TableName,

    /// 索引扫描次数
    pub index_scans: Int,

    /// `pages:` 行
    pub pages: Option<PageStats>,

    /// `tuples:` 行
    pub tuples: Option<TupleStats>,

    /// `index scan not needed/bypassed/needed:` 行（至多一个）
    pub index_scan: Option<IndexScanDetail>,

    /// 每个索引的 `index "name": pages: ...` 行，按出现顺序
    pub indexes: Vec<IndexPageStats>,

    /// `frozen:` 行
    pub frozen: Option<FrozenStats>,

    /// `removable cutoff:` 行
    pub removable_cutoff: Option<RemovableCutoff>,

    /// `new relfrozenxid:` 行
    pub new_relfrozenxid: Option<XidAdvance>,

    /// `new relminmxid:` 行
    pub new_relminmxid: Option<XidAdvance>,

    /// `WAL usage:` 行
    pub wal: Option<WalUsage>,

    /// `I/O timings:` 行
    pub io_timings: Option<IoTimings>,

    /// `avg read rate:` 行
    pub io_rate: Option<IoRate>,

    /// `buffer usage:` 行
    pub buffer_usage: Option<BufferUsage>,

    /// `system usage:` 行
    pub system_usage: Option<SystemUsage>,
}

/// 三段式表名
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableName {
    pub database: String,
    pub schema: String,
    pub table: String,
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.database, self.schema, self.table)
    }
}

impl Serialize for TableName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// `pages: 0 removed, 8566 remain, 589 scanned (6.88% of total)`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageStats {
    pub removed: Int,
    pub remaining: Option<Int>,
    pub scanned: Option<Int>,
    pub scanned_pct: Option<Decimal>,
}

/// `tuples: 8 removed, 8871 remain, 524 are dead but not yet removable`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TupleStats {
    pub removed: Int,
    pub remaining: Option<Int>,
    pub dead_not_removable: Option<Int>,
}

/// 索引扫描结论
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexScanKind {
    /// `index scan not needed:`
    NotNeeded,
    /// `index scan bypassed:`
    Bypassed,
    /// `index scan needed:`
    Needed,
}

impl IndexScanKind {
    /// 输出列中使用的简短名称
    pub fn as_str(self) -> &'static str {
        match self {
            IndexScanKind::NotNeeded => "not_needed",
            IndexScanKind::Bypassed => "bypassed",
            IndexScanKind::Needed => "needed",
        }
    }
}

/// `index scan needed: 40 pages from table (6.78% of total) had 428 dead item identifiers removed`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexScanDetail {
    pub kind: IndexScanKind,
    pub pages: Int,
    pub pages_pct: Decimal,
    pub dead_item_ids: Int,
}

/// `index "pk_xxx": pages: 94 in total, 0 newly deleted, 0 currently deleted, 0 reusable`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexPageStats {
    pub name: String,
    pub pages_total: Int,
    pub newly_deleted: Option<Int>,
    pub currently_deleted: Option<Int>,
    pub reusable: Option<Int>,
}

/// `frozen: 5 pages from table (0.06% of total) had 14 tuples frozen`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrozenStats {
    pub pages: Int,
    pub pages_pct: Decimal,
    pub tuples: Option<Int>,
}

/// `removable cutoff: 289809785, which was 1298 XIDs old when operation ended`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RemovableCutoff {
    pub txid: Int,
    pub xids_age: Option<Int>,
}

/// `new relfrozenxid: 286371019, which is 7110685 XIDs ahead of previous value`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct XidAdvance {
    pub xid: Int,
    pub ahead: Option<Int>,
}

/// `WAL usage: 149 records, 0 full page images, 10712 bytes`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WalUsage {
    pub records: Int,
    pub full_page_images: Option<Int>,
    pub bytes: Option<Int>,
    /// PostgreSQL 17 起附加的 `N buffers full`
    pub buffers_full: Option<Int>,
}

/// `I/O timings: read: 18.272 ms, write: 0.000 ms`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IoTimings {
    pub read_ms: Decimal,
    pub write_ms: Decimal,
}

/// `avg read rate: 48.657 MB/s, avg write rate: 242.241 MB/s`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IoRate {
    pub read_mb_s: Decimal,
    pub write_mb_s: Decimal,
}

/// `buffer usage: 425 hits, 0 misses, 1 dirtied`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BufferUsage {
    pub hits: Int,
    pub misses: Option<Int>,
    pub dirtied: Option<Int>,
}

/// `system usage: CPU: user: 0.03 s, system: 0.00 s, elapsed: 0.07 s`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemUsage {
    pub user_s: Decimal,
    pub system_s: Decimal,
    pub elapsed_s: Decimal,
}

impl VacuumReport {
    /// 创建只含必需字段的报告
    pub fn new(table: TableName, index_scans: Int) -> Self {
        Self {
            table,
            index_scans,
            pages: None,
            tuples: None,
            index_scan: None,
            indexes: Vec::new(),
            frozen: None,
            removable_cutoff: None,
            new_relfrozenxid: None,
            new_relminmxid: None,
            wal: None,
            io_timings: None,
            io_rate: None,
            buffer_usage: None,
            system_usage: None,
        }
    }
}

impl VacuumEvent {
    /// 按输出格式渲染时间戳
    pub fn formatted_timestamp(&self) -> String {
        self.timestamp.format(OUTPUT_TIMESTAMP_FORMAT).to_string()
    }
}
