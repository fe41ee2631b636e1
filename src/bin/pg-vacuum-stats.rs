//! pg-vacuum-stats - 从 PostgreSQL 日志中提取 autovacuum 统计信息
//!
//! 用法:
//!   pg-vacuum-stats postgresql.json          # 读取文件（自动识别 jsonlog / 纯文本）
//!   pg-vacuum-stats - < postgresql.log       # 读取标准输入
//!   pg-vacuum-stats --extended --no-header postgresql.log
//!   pg-vacuum-stats --output json postgresql.json | jq .
//!
//! 退出码: 0 正常结束；1 下游管道关闭或被中断；2 输入格式错误或无法读取。

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use pg_autovacuum_log_parser::{
    InputFormat, LogRecords, OutputFormat, ParseError, ParserConfig, RowWriter, VacuumEventParser,
};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

/// 下游管道关闭或收到中断信号
const EXIT_INTERRUPTED: u8 = 1;
/// 输入格式错误或无法读取
const EXIT_FAILURE: u8 = 2;

/// Extract autovacuum statistics from PostgreSQL server logs.
#[derive(Parser)]
#[command(name = "pg-vacuum-stats", version, about = "Extract autovacuum statistics from PostgreSQL logs")]
struct Args {
    /// Log file to read. `-` or omitted reads standard input.
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,

    /// Input encoding.
    #[arg(short, long, value_enum, default_value_t = FormatArg::Auto)]
    format: FormatArg,

    /// Output encoding.
    #[arg(short, long, value_enum, default_value_t = OutputArg::Text)]
    output: OutputArg,

    /// Emit every extracted field, not just the basic columns.
    #[arg(long)]
    extended: bool,

    /// Do not print the column header row.
    #[arg(long)]
    no_header: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Auto,
    Json,
    Plain,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputArg {
    Text,
    Json,
}

impl Args {
    fn config(&self) -> ParserConfig {
        let input_format = match self.format {
            FormatArg::Auto => InputFormat::Auto,
            FormatArg::Json => InputFormat::Json,
            FormatArg::Plain => InputFormat::Plain,
        };
        let output_format = match self.output {
            OutputArg::Text => OutputFormat::Text,
            OutputArg::Json => OutputFormat::Json,
        };

        ParserConfig::default()
            .with_input_format(input_format)
            .with_output_format(output_format)
            .with_extended_columns(self.extended)
            .with_header(!self.no_header)
    }

    fn open_input(&self) -> anyhow::Result<Box<dyn BufRead>> {
        match &self.input {
            Some(path) if path.as_os_str() != "-" => {
                let file = File::open(path)
                    .with_context(|| format!("cannot open input file {}", path.display()))?;
                Ok(Box::new(BufReader::new(file)))
            }
            _ => Ok(Box::new(io::stdin().lock())),
        }
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let config = args.config();
    let records = LogRecords::new(args.open_input()?, config.input_format)?;
    debug!(format = ?records.format(), "reading log records");

    let stdout = io::stdout();
    let mut writer = RowWriter::new(BufWriter::new(stdout.lock()), &config);
    if config.header {
        writer.write_header()?;
    }

    for item in VacuumEventParser::new(records) {
        match item {
            Ok(event) => writer.write_event(&event)?,
            Err(err) if !err.is_fatal() => warn!("skipping record: {err}"),
            Err(err) => return Err(err.into()),
        }
    }

    writer.flush()?;
    debug!(rows = writer.rows_written(), "done");
    Ok(())
}

/// 错误链中是否包含下游管道关闭
fn is_broken_pipe(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause
            .downcast_ref::<io::Error>()
            .is_some_and(|e| e.kind() == io::ErrorKind::BrokenPipe)
    })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();

    if let Err(e) = ctrlc::set_handler(|| std::process::exit(i32::from(EXIT_INTERRUPTED))) {
        warn!("failed to install Ctrl-C handler: {e}");
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) if is_broken_pipe(&err) => ExitCode::from(EXIT_INTERRUPTED),
        Err(err) => {
            match err.downcast_ref::<ParseError>() {
                Some(parse_err) => eprintln!("error: malformed input: {parse_err}"),
                None => eprintln!("error: {err:#}"),
            }
            ExitCode::from(EXIT_FAILURE)
        }
    }
}
