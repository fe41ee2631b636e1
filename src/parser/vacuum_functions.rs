//! autovacuum 报告提取函数
//!
//! 报告正文的各段落在不同 PostgreSQL 版本中顺序和有无都不固定，
//! 因此每个段落用自己的标签独立定位，互不依赖；某个段落缺失只会让对应字段为 `None`。

use crate::log_record::LogRecord;
use crate::numeric::{Decimal, Int};
use crate::parser::constants::*;
use crate::vacuum::*;
use memchr::memchr;
use regex::{Captures, Regex};
use tracing::warn;

/// 判断一条记录是否可能是 autovacuum 报告
///
/// 1. 如果记录带有进程类型（jsonlog），必须恰好是 `autovacuum worker`。
/// 2. 消息必须以 `automatic vacuum of table` 开头（锚定，不是搜索）。
pub fn is_autovacuum_candidate(record: &LogRecord) -> bool {
    let backend_matches = record
        .backend_kind
        .as_deref()
        .is_none_or(|kind| kind == AUTOVACUUM_BACKEND_TYPE);

    backend_matches && record.message.starts_with(VACUUM_ANNOUNCEMENT_PREFIX)
}

/// 从消息正文中提取 vacuum 报告
///
/// 找不到表名或索引扫描次数时返回 `None`，调用方应跳过这条记录。
/// 其余段落独立提取，无法识别的行被忽略。
///
/// # 示例
///
/// ```
/// use pg_autovacuum_log_parser::extract_vacuum_report;
///
/// let message = "automatic vacuum of table \"live.tickets.q_tickets\": index scans: 1\n\
///                pages: 0 removed, 590 remain, 115 scanned (19.49% of total)\n\
///                WAL usage: 149 records, 0 full page images, 10712 bytes";
/// let report = extract_vacuum_report(message).unwrap();
///
/// assert_eq!(report.table.to_string(), "live.tickets.q_tickets");
/// assert_eq!(report.index_scans.as_str(), "1");
/// let pages = report.pages.unwrap();
/// assert_eq!(pages.scanned_pct.unwrap().as_str(), "19.49");
/// assert!(report.tuples.is_none());
/// ```
pub fn extract_vacuum_report(message: &str) -> Option<VacuumReport> {
    let first_line_end = memchr(b'\n', message.as_bytes()).unwrap_or(message.len());
    let first_line = message[..first_line_end].trim_end_matches('\r');

    let Some(caps) = ANNOUNCEMENT_PATTERN.captures(first_line) else {
        warn!(line = first_line, "vacuum announcement without a database.schema.table reference and index scan count");
        return None;
    };

    let table = TableName {
        database: caps[1].to_string(),
        schema: caps[2].to_string(),
        table: caps[3].to_string(),
    };
    let index_scans = int_at(&caps, 4)?;

    let mut report = VacuumReport::new(table, index_scans);
    report.pages = parse_pages(message);
    report.tuples = parse_tuples(message);
    report.index_scan = parse_index_scan(message);
    report.indexes = parse_index_pages(message);
    report.frozen = parse_frozen(message);
    report.removable_cutoff = parse_removable_cutoff(message);
    report.new_relfrozenxid = parse_xid_advance(&RELFROZENXID_PATTERN, message);
    report.new_relminmxid = parse_xid_advance(&RELMINMXID_PATTERN, message);
    report.wal = parse_wal_usage(message);
    report.io_timings = parse_io_timings(message);
    report.io_rate = parse_io_rate(message);
    report.buffer_usage = parse_buffer_usage(message);
    report.system_usage = parse_system_usage(message);

    Some(report)
}

/// 提取整数分组，分组不存在时为 `None`
#[inline]
pub(crate) fn int_at(caps: &Captures<'_>, i: usize) -> Option<Int> {
    caps.get(i).and_then(|m| m.as_str().parse().ok())
}

/// 提取小数分组，分组不存在时为 `None`
#[inline]
pub(crate) fn decimal_at(caps: &Captures<'_>, i: usize) -> Option<Decimal> {
    caps.get(i).and_then(|m| m.as_str().parse().ok())
}

pub(crate) fn parse_pages(body: &str) -> Option<PageStats> {
    let caps = PAGES_PATTERN.captures(body)?;
    Some(PageStats {
        removed: int_at(&caps, 1)?,
        remaining: int_at(&caps, 2),
        scanned: int_at(&caps, 3),
        scanned_pct: decimal_at(&caps, 4),
    })
}

pub(crate) fn parse_tuples(body: &str) -> Option<TupleStats> {
    let caps = TUPLES_PATTERN.captures(body)?;
    Some(TupleStats {
        removed: int_at(&caps, 1)?,
        remaining: int_at(&caps, 2),
        dead_not_removable: int_at(&caps, 3),
    })
}

/// 三种结论互斥；若正文中出现多个，取最靠前的一个
pub(crate) fn parse_index_scan(body: &str) -> Option<IndexScanDetail> {
    let caps = INDEX_SCAN_PATTERN.captures(body)?;
    let kind = match caps.get(1)?.as_str() {
        "bypassed" => IndexScanKind::Bypassed,
        "needed" => IndexScanKind::Needed,
        _ => IndexScanKind::NotNeeded,
    };
    Some(IndexScanDetail {
        kind,
        pages: int_at(&caps, 2)?,
        pages_pct: decimal_at(&caps, 3)?,
        dead_item_ids: int_at(&caps, 4)?,
    })
}

pub(crate) fn parse_index_pages(body: &str) -> Vec<IndexPageStats> {
    INDEX_PAGES_PATTERN
        .captures_iter(body)
        .filter_map(|caps| {
            Some(IndexPageStats {
                name: caps.get(1)?.as_str().to_string(),
                pages_total: int_at(&caps, 2)?,
                newly_deleted: int_at(&caps, 3),
                currently_deleted: int_at(&caps, 4),
                reusable: int_at(&caps, 5),
            })
        })
        .collect()
}

pub(crate) fn parse_frozen(body: &str) -> Option<FrozenStats> {
    let caps = FROZEN_PATTERN.captures(body)?;
    Some(FrozenStats {
        pages: int_at(&caps, 1)?,
        pages_pct: decimal_at(&caps, 2)?,
        tuples: int_at(&caps, 3),
    })
}

pub(crate) fn parse_removable_cutoff(body: &str) -> Option<RemovableCutoff> {
    let caps = REMOVABLE_CUTOFF_PATTERN.captures(body)?;
    Some(RemovableCutoff {
        txid: int_at(&caps, 1)?,
        xids_age: int_at(&caps, 2),
    })
}

pub(crate) fn parse_xid_advance(pattern: &Regex, body: &str) -> Option<XidAdvance> {
    let caps = pattern.captures(body)?;
    Some(XidAdvance {
        xid: int_at(&caps, 1)?,
        ahead: int_at(&caps, 2),
    })
}

pub(crate) fn parse_wal_usage(body: &str) -> Option<WalUsage> {
    let caps = WAL_USAGE_PATTERN.captures(body)?;
    Some(WalUsage {
        records: int_at(&caps, 1)?,
        full_page_images: int_at(&caps, 2),
        bytes: int_at(&caps, 3),
        buffers_full: int_at(&caps, 4),
    })
}

pub(crate) fn parse_io_timings(body: &str) -> Option<IoTimings> {
    let caps = IO_TIMINGS_PATTERN.captures(body)?;
    Some(IoTimings {
        read_ms: decimal_at(&caps, 1)?,
        write_ms: decimal_at(&caps, 2)?,
    })
}

pub(crate) fn parse_io_rate(body: &str) -> Option<IoRate> {
    let caps = IO_RATE_PATTERN.captures(body)?;
    Some(IoRate {
        read_mb_s: decimal_at(&caps, 1)?,
        write_mb_s: decimal_at(&caps, 2)?,
    })
}

pub(crate) fn parse_buffer_usage(body: &str) -> Option<BufferUsage> {
    let caps = BUFFER_USAGE_PATTERN.captures(body)?;
    Some(BufferUsage {
        hits: int_at(&caps, 1)?,
        misses: int_at(&caps, 2),
        dirtied: int_at(&caps, 3),
    })
}

pub(crate) fn parse_system_usage(body: &str) -> Option<SystemUsage> {
    let caps = SYSTEM_USAGE_PATTERN.captures(body)?;
    Some(SystemUsage {
        user_s: decimal_at(&caps, 1)?,
        system_s: decimal_at(&caps, 2)?,
        elapsed_s: decimal_at(&caps, 3)?,
    })
}
