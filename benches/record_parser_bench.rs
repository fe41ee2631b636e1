use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use pg_autovacuum_log_parser::{JsonLogParser, PlainLogParser, RecordParser};

const MIXED_VALID_INVALID: &str = "garbage before first header\n\
2024-03-01 10:15:02 UTC [4242]: [3-1] user=,db=,host=,app= LOG:  automatic vacuum of table \"a.b.c\": index scans: 0\n\
\tpages: 0 removed, 10 remain, 10 scanned (100.00% of total)\n\
2024-03-01 10:15:03 UTC [4243]: LOG:  short prefix only\n\
2024-03-01 10:15:04 UTC [4244]: [1-1] user=,db=,host=,app= LOG:  checkpoint starting: time";

/// 生成纯文本测试数据：每 4 条记录中有 1 条 vacuum 报告
fn generate_plain_data(record_count: usize) -> String {
    let mut data = String::with_capacity(record_count * 200);
    for i in 0..record_count {
        if i % 4 == 0 {
            data.push_str(&format!(
                "2024-03-01 10:{:02}:{:02}.{:03} UTC [{}]: [{}-1] user=,db=,host=,app= LOG:  automatic vacuum of table \"live.public.t{}\": index scans: 1\n\
                 \tpages: 0 removed, {} remain, {} scanned (19.49% of total)\n\
                 \ttuples: 8 removed, 8871 remain, 0 are dead but not yet removable\n\
                 \tWAL usage: 149 records, 0 full page images, 10712 bytes\n",
                (i / 60) % 60,
                i % 60,
                i % 1000,
                4000 + i,
                i,
                i % 50,
                i * 3,
                i
            ));
        } else {
            data.push_str(&format!(
                "2024-03-01 10:{:02}:{:02}.{:03} UTC [{}]: [{}-1] user=app,db=live,host=10.0.0.2,app=web LOG:  duration: {}.{:03} ms\n",
                (i / 60) % 60,
                i % 60,
                i % 1000,
                100 + i % 16,
                i,
                i % 30,
                i % 1000
            ));
        }
    }
    data
}

/// 生成 jsonlog 测试数据
fn generate_json_data(record_count: usize) -> String {
    let mut data = String::with_capacity(record_count * 250);
    for i in 0..record_count {
        let line = serde_json::json!({
            "timestamp": format!("2024-03-01 10:{:02}:{:02}.{:06} UTC", (i / 60) % 60, i % 60, i),
            "pid": 4000 + i,
            "backend_type": if i % 4 == 0 { "autovacuum worker" } else { "client backend" },
            "message": format!(
                "automatic vacuum of table \"live.public.t{}\": index scans: 1\n\tpages: 0 removed, {} remain, {} scanned (19.49% of total)",
                i % 50, i * 3, i
            ),
        });
        data.push_str(&line.to_string());
        data.push('\n');
    }
    data
}

/// Benchmark RecordParser 切分记录
fn bench_record_parser_iteration(c: &mut Criterion) {
    let mut group = c.benchmark_group("record_parser_iteration");

    group.bench_function("mixed_valid_invalid", |b| {
        b.iter(|| RecordParser::new(black_box(MIXED_VALID_INVALID.as_bytes())).count())
    });

    for record_count in [100, 1_000, 10_000] {
        let data = generate_plain_data(record_count);
        group.throughput(Throughput::Elements(record_count as u64));
        group.bench_with_input(BenchmarkId::new("records", record_count), &data, |b, d| {
            b.iter(|| RecordParser::new(black_box(d.as_bytes())).count())
        });
    }

    group.finish();
}

/// Benchmark 纯文本和 jsonlog 还原为 LogRecord
fn bench_log_record_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("log_record_parsing");

    for record_count in [100, 1_000, 10_000] {
        let plain = generate_plain_data(record_count);
        let json = generate_json_data(record_count);
        group.throughput(Throughput::Elements(record_count as u64));

        group.bench_with_input(BenchmarkId::new("plain", record_count), &plain, |b, d| {
            b.iter(|| {
                PlainLogParser::new(black_box(d.as_bytes()))
                    .filter(|r| r.is_ok())
                    .count()
            })
        });

        group.bench_with_input(BenchmarkId::new("jsonlog", record_count), &json, |b, d| {
            b.iter(|| {
                JsonLogParser::new(black_box(d.as_bytes()))
                    .filter(|r| r.is_ok())
                    .count()
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_record_parser_iteration, bench_log_record_parsing);
criterion_main!(benches);
