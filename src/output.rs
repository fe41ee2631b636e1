//! 输出格式
//!
//! 把 `VacuumEvent` 渲染为逗号加空格分隔的文本行，或每行一个 JSON 对象。
//! 缺失的字段在文本输出中为空字段（不是 `0`），在 JSON 输出中为 `null`。

use crate::config::{OutputFormat, ParserConfig};
use crate::numeric::{Decimal, Int};
use crate::vacuum::VacuumEvent;
use std::io::{self, Write};

/// 文本输出的字段分隔符
pub const FIELD_SEPARATOR: &str = ", ";

/// 输出列
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Timestamp,
    Table,
    IndexScans,
    PagesRemoved,
    PagesRemaining,
    PagesScanned,
    PagesScannedPct,
    TuplesRemoved,
    TuplesRemaining,
    TuplesDeadNotRemovable,
    RemovableCutoffTxid,
    RemovableCutoffXidsAge,
    WalRecords,
    WalFullPageImages,
    WalBytes,
    // 扩展列
    IndexScanKind,
    IndexScanPages,
    IndexScanPagesPct,
    IndexScanDeadItemIds,
    IndexCount,
    FrozenPages,
    FrozenPagesPct,
    FrozenTuples,
    NewRelfrozenxid,
    NewRelfrozenxidAhead,
    NewRelminmxid,
    NewRelminmxidAhead,
    WalBuffersFull,
    IoReadMs,
    IoWriteMs,
    AvgReadRateMbs,
    AvgWriteRateMbs,
    BufferHits,
    BufferMisses,
    BufferDirtied,
    CpuUserS,
    CpuSystemS,
    ElapsedS,
}

impl Column {
    /// 基础列，顺序固定
    pub const BASIC: &'static [Column] = &[
        Column::Timestamp,
        Column::Table,
        Column::IndexScans,
        Column::PagesRemoved,
        Column::PagesRemaining,
        Column::PagesScanned,
        Column::PagesScannedPct,
        Column::TuplesRemoved,
        Column::TuplesRemaining,
        Column::TuplesDeadNotRemovable,
        Column::RemovableCutoffTxid,
        Column::RemovableCutoffXidsAge,
        Column::WalRecords,
        Column::WalFullPageImages,
        Column::WalBytes,
    ];

    /// 基础列之后追加其余全部字段
    pub const EXTENDED: &'static [Column] = &[
        Column::Timestamp,
        Column::Table,
        Column::IndexScans,
        Column::PagesRemoved,
        Column::PagesRemaining,
        Column::PagesScanned,
        Column::PagesScannedPct,
        Column::TuplesRemoved,
        Column::TuplesRemaining,
        Column::TuplesDeadNotRemovable,
        Column::RemovableCutoffTxid,
        Column::RemovableCutoffXidsAge,
        Column::WalRecords,
        Column::WalFullPageImages,
        Column::WalBytes,
        Column::IndexScanKind,
        Column::IndexScanPages,
        Column::IndexScanPagesPct,
        Column::IndexScanDeadItemIds,
        Column::IndexCount,
        Column::FrozenPages,
        Column::FrozenPagesPct,
        Column::FrozenTuples,
        Column::NewRelfrozenxid,
        Column::NewRelfrozenxidAhead,
        Column::NewRelminmxid,
        Column::NewRelminmxidAhead,
        Column::WalBuffersFull,
        Column::IoReadMs,
        Column::IoWriteMs,
        Column::AvgReadRateMbs,
        Column::AvgWriteRateMbs,
        Column::BufferHits,
        Column::BufferMisses,
        Column::BufferDirtied,
        Column::CpuUserS,
        Column::CpuSystemS,
        Column::ElapsedS,
    ];

    /// 表头中的列名
    pub fn name(self) -> &'static str {
        match self {
            Column::Timestamp => "timestamp",
            Column::Table => "database.schema.table",
            Column::IndexScans => "index_scans",
            Column::PagesRemoved => "pages_removed",
            Column::PagesRemaining => "pages_remaining",
            Column::PagesScanned => "pages_scanned",
            Column::PagesScannedPct => "pages_scanned_pct",
            Column::TuplesRemoved => "tuples_removed",
            Column::TuplesRemaining => "tuples_remaining",
            Column::TuplesDeadNotRemovable => "tuples_dead_not_removable",
            Column::RemovableCutoffTxid => "removable_cutoff_txid",
            Column::RemovableCutoffXidsAge => "removable_cutoff_xids_age",
            Column::WalRecords => "wal_records",
            Column::WalFullPageImages => "wal_full_page_images",
            Column::WalBytes => "wal_bytes",
            Column::IndexScanKind => "index_scan",
            Column::IndexScanPages => "index_scan_pages",
            Column::IndexScanPagesPct => "index_scan_pages_pct",
            Column::IndexScanDeadItemIds => "index_scan_dead_item_ids",
            Column::IndexCount => "index_count",
            Column::FrozenPages => "frozen_pages",
            Column::FrozenPagesPct => "frozen_pages_pct",
            Column::FrozenTuples => "frozen_tuples",
            Column::NewRelfrozenxid => "new_relfrozenxid",
            Column::NewRelfrozenxidAhead => "new_relfrozenxid_xids_ahead",
            Column::NewRelminmxid => "new_relminmxid",
            Column::NewRelminmxidAhead => "new_relminmxid_mxids_ahead",
            Column::WalBuffersFull => "wal_buffers_full",
            Column::IoReadMs => "io_read_ms",
            Column::IoWriteMs => "io_write_ms",
            Column::AvgReadRateMbs => "avg_read_rate_mbs",
            Column::AvgWriteRateMbs => "avg_write_rate_mbs",
            Column::BufferHits => "buffer_hits",
            Column::BufferMisses => "buffer_misses",
            Column::BufferDirtied => "buffer_dirtied",
            Column::CpuUserS => "cpu_user_s",
            Column::CpuSystemS => "cpu_system_s",
            Column::ElapsedS => "elapsed_s",
        }
    }

    /// 该列在事件中的值，缺失时为 `None`
    pub fn value(self, event: &VacuumEvent) -> Option<String> {
        let r = &event.report;
        let int = |v: Option<&Int>| v.map(Int::to_string);
        let dec = |v: Option<&Decimal>| v.map(Decimal::to_string);

        match self {
            Column::Timestamp => Some(event.formatted_timestamp()),
            Column::Table => Some(r.table.to_string()),
            Column::IndexScans => Some(r.index_scans.to_string()),
            Column::PagesRemoved => int(r.pages.as_ref().map(|p| &p.removed)),
            Column::PagesRemaining => int(r.pages.as_ref().and_then(|p| p.remaining.as_ref())),
            Column::PagesScanned => int(r.pages.as_ref().and_then(|p| p.scanned.as_ref())),
            Column::PagesScannedPct => dec(r.pages.as_ref().and_then(|p| p.scanned_pct.as_ref())),
            Column::TuplesRemoved => int(r.tuples.as_ref().map(|t| &t.removed)),
            Column::TuplesRemaining => int(r.tuples.as_ref().and_then(|t| t.remaining.as_ref())),
            Column::TuplesDeadNotRemovable => {
                int(r.tuples.as_ref().and_then(|t| t.dead_not_removable.as_ref()))
            }
            Column::RemovableCutoffTxid => int(r.removable_cutoff.as_ref().map(|c| &c.txid)),
            Column::RemovableCutoffXidsAge => {
                int(r.removable_cutoff.as_ref().and_then(|c| c.xids_age.as_ref()))
            }
            Column::WalRecords => int(r.wal.as_ref().map(|w| &w.records)),
            Column::WalFullPageImages => int(r.wal.as_ref().and_then(|w| w.full_page_images.as_ref())),
            Column::WalBytes => int(r.wal.as_ref().and_then(|w| w.bytes.as_ref())),
            Column::IndexScanKind => r.index_scan.as_ref().map(|i| i.kind.as_str().to_string()),
            Column::IndexScanPages => int(r.index_scan.as_ref().map(|i| &i.pages)),
            Column::IndexScanPagesPct => dec(r.index_scan.as_ref().map(|i| &i.pages_pct)),
            Column::IndexScanDeadItemIds => int(r.index_scan.as_ref().map(|i| &i.dead_item_ids)),
            Column::IndexCount => Some(r.indexes.len().to_string()),
            Column::FrozenPages => int(r.frozen.as_ref().map(|f| &f.pages)),
            Column::FrozenPagesPct => dec(r.frozen.as_ref().map(|f| &f.pages_pct)),
            Column::FrozenTuples => int(r.frozen.as_ref().and_then(|f| f.tuples.as_ref())),
            Column::NewRelfrozenxid => int(r.new_relfrozenxid.as_ref().map(|x| &x.xid)),
            Column::NewRelfrozenxidAhead => {
                int(r.new_relfrozenxid.as_ref().and_then(|x| x.ahead.as_ref()))
            }
            Column::NewRelminmxid => int(r.new_relminmxid.as_ref().map(|x| &x.xid)),
            Column::NewRelminmxidAhead => int(r.new_relminmxid.as_ref().and_then(|x| x.ahead.as_ref())),
            Column::WalBuffersFull => int(r.wal.as_ref().and_then(|w| w.buffers_full.as_ref())),
            Column::IoReadMs => dec(r.io_timings.as_ref().map(|t| &t.read_ms)),
            Column::IoWriteMs => dec(r.io_timings.as_ref().map(|t| &t.write_ms)),
            Column::AvgReadRateMbs => dec(r.io_rate.as_ref().map(|t| &t.read_mb_s)),
            Column::AvgWriteRateMbs => dec(r.io_rate.as_ref().map(|t| &t.write_mb_s)),
            Column::BufferHits => int(r.buffer_usage.as_ref().map(|b| &b.hits)),
            Column::BufferMisses => int(r.buffer_usage.as_ref().and_then(|b| b.misses.as_ref())),
            Column::BufferDirtied => int(r.buffer_usage.as_ref().and_then(|b| b.dirtied.as_ref())),
            Column::CpuUserS => dec(r.system_usage.as_ref().map(|s| &s.user_s)),
            Column::CpuSystemS => dec(r.system_usage.as_ref().map(|s| &s.system_s)),
            Column::ElapsedS => dec(r.system_usage.as_ref().map(|s| &s.elapsed_s)),
        }
    }
}

/// 按配置把事件写入输出流
///
/// 写入错误原样返回，调用方据此识别下游管道已关闭（`io::ErrorKind::BrokenPipe`）。
pub struct RowWriter<W: Write> {
    out: W,
    columns: &'static [Column],
    format: OutputFormat,
    rows_written: usize,
}

impl<W: Write> RowWriter<W> {
    pub fn new(out: W, config: &ParserConfig) -> Self {
        Self {
            out,
            columns: config.columns,
            format: config.output_format,
            rows_written: 0,
        }
    }

    /// 写入表头行（JSON 输出没有表头）
    pub fn write_header(&mut self) -> io::Result<()> {
        if self.format == OutputFormat::Json {
            return Ok(());
        }
        let names: Vec<&str> = self.columns.iter().map(|c| c.name()).collect();
        writeln!(self.out, "{}", names.join(FIELD_SEPARATOR))
    }

    /// 写入一行
    pub fn write_event(&mut self, event: &VacuumEvent) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => {
                let fields: Vec<String> = self
                    .columns
                    .iter()
                    .map(|c| c.value(event).unwrap_or_default())
                    .collect();
                writeln!(self.out, "{}", fields.join(FIELD_SEPARATOR))?;
            }
            OutputFormat::Json => {
                serde_json::to_writer(&mut self.out, event)?;
                self.out.write_all(b"\n")?;
            }
        }
        self.rows_written += 1;
        Ok(())
    }

    /// 已写入的行数（不含表头）
    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::extract_vacuum_report;
    use chrono::NaiveDate;

    fn sample_event(message: &str) -> VacuumEvent {
        VacuumEvent {
            timestamp: NaiveDate::from_ymd_opt(2024, 3, 1)
                .unwrap()
                .and_hms_micro_opt(10, 15, 2, 123456)
                .unwrap(),
            timezone: "UTC".to_string(),
            report: extract_vacuum_report(message).unwrap(),
        }
    }

    fn render(config: &ParserConfig, event: &VacuumEvent) -> String {
        let mut writer = RowWriter::new(Vec::new(), config);
        writer.write_event(event).unwrap();
        String::from_utf8(writer.into_inner()).unwrap()
    }

    #[test]
    fn header_has_basic_columns_in_order() {
        let mut writer = RowWriter::new(Vec::new(), &ParserConfig::default());
        writer.write_header().unwrap();
        let out = String::from_utf8(writer.into_inner()).unwrap();
        assert_eq!(
            out,
            "timestamp, database.schema.table, index_scans, pages_removed, pages_remaining, \
             pages_scanned, pages_scanned_pct, tuples_removed, tuples_remaining, \
             tuples_dead_not_removable, removable_cutoff_txid, removable_cutoff_xids_age, \
             wal_records, wal_full_page_images, wal_bytes\n"
        );
    }

    #[test]
    fn absent_fields_render_empty() {
        let event = sample_event(
            "automatic vacuum of table \"live.tickets.q_tickets\": index scans: 1\n\
             pages: 0 removed, 590 remain, 115 scanned (19.49% of total)\n\
             WAL usage: 149 records, 0 full page images, 10712 bytes",
        );
        let row = render(&ParserConfig::default(), &event);
        assert_eq!(
            row,
            "2024-03-01 10:15:02, live.tickets.q_tickets, 1, 0, 590, 115, 19.49, , , , , , 149, 0, 10712\n"
        );
    }

    #[test]
    fn extended_columns_match_header_width() {
        let config = ParserConfig::default().with_extended_columns(true);
        let event = sample_event("automatic vacuum of table \"a.b.c\": index scans: 0");
        let row = render(&config, &event);
        let fields: Vec<&str> = row.trim_end_matches('\n').split(FIELD_SEPARATOR).collect();
        assert_eq!(fields.len(), Column::EXTENDED.len());
        // 没有 index 行时计数为 0，其余扩展字段为空
        let idx = Column::EXTENDED
            .iter()
            .position(|c| *c == Column::IndexCount)
            .unwrap();
        assert_eq!(fields[idx], "0");
        assert_eq!(fields[idx + 1], "");
    }

    #[test]
    fn extended_columns_start_with_basic() {
        assert_eq!(&Column::EXTENDED[..Column::BASIC.len()], Column::BASIC);
    }

    #[test]
    fn json_output_uses_null_for_absent() {
        let config = ParserConfig::default().with_output_format(OutputFormat::Json);
        let event = sample_event(
            "automatic vacuum of table \"a.b.c\": index scans: 0\n\
             pages: 0 removed, 8566 remain, 589 scanned (6.88% of total)",
        );
        let line = render(&config, &event);
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["table"], "a.b.c");
        assert_eq!(value["timestamp"], "2024-03-01 10:15:02.123456");
        assert_eq!(value["pages"]["scanned_pct"], "6.88");
        assert!(value["tuples"].is_null());
    }

    #[test]
    fn json_output_has_no_header() {
        let config = ParserConfig::default().with_output_format(OutputFormat::Json);
        let mut writer = RowWriter::new(Vec::new(), &config);
        writer.write_header().unwrap();
        assert!(writer.into_inner().is_empty());
    }
}
