// ==========================================
// 纺织厂库存报表系统 - 命令行入口
// ==========================================
// 用法:
//   textile-inventory <ledger|packages|yarn|bills|fabrics|codes> [选项]
//
// 数据源: --db=<path> 或 --dir=<path>（<table>.csv / <table>.xlsx）
// 未知选项直接报错，避免筛选条件被静默忽略
// ==========================================

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;

use textile_inventory::config::{ConfigManager, ReportSettings};
use textile_inventory::db::{open_sqlite_connection, resolve_db_path};
use textile_inventory::domain::BillType;
use textile_inventory::engine::{DateRange, LedgerFilter, MonthYear};
use textile_inventory::logging::{self, LogFormat};
use textile_inventory::report::{
    ledger_document, range_document, CsvExporter, ReportDocument, Table,
};
use textile_inventory::repository::{EventSource, FileEventSource, SqliteEventSource};
use textile_inventory::{i18n, ReportApi, RunningBalances, VERSION};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
enum OutputFormat {
    Json,
    #[default]
    Csv,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
enum LogFormatArg {
    #[default]
    Text,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(value: LogFormatArg) -> Self {
        match value {
            LogFormatArg::Text => LogFormat::Text,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum BillArg {
    A,
    B,
    C,
}

impl From<BillArg> for BillType {
    fn from(value: BillArg) -> Self {
        match value {
            BillArg::A => BillType::A,
            BillArg::B => BillType::B,
            BillArg::C => BillType::C,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "textile-inventory", version, about = "纺织厂库存对账与报表")]
#[command(propagate_version = true)]
struct Cli {
    /// SQLite 工厂库（默认: $TEXTILE_INVENTORY_DB 或系统数据目录）
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// 导出文件目录，指定后不读 SQLite 事件表
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// 输出格式
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Csv)]
    format: OutputFormat,

    /// 输出文件（默认 stdout）
    #[arg(long, global = true)]
    out: Option<PathBuf>,

    /// 报表语言（th / en / zh-CN）
    #[arg(long, global = true)]
    locale: Option<String>,

    #[arg(long = "log-format", global = true, value_enum, default_value_t = LogFormatArg::Text)]
    log_format: LogFormatArg,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 成品面料台账
    Ledger(FilterArgs),
    /// 包材回收对账
    Packages(RangeArgs),
    /// 纱线库存
    Yarn(RangeArgs),
    /// 票据汇总
    Bills(FilterArgs),
    /// 各面料入库合计
    Fabrics(FilterArgs),
    /// 面料代码列表
    Codes(FilterArgs),
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Command::Ledger(_) => "ledger",
            Command::Packages(_) => "packages",
            Command::Yarn(_) => "yarn",
            Command::Bills(_) => "bills",
            Command::Fabrics(_) => "fabrics",
            Command::Codes(_) => "codes",
        }
    }
}

fn parse_month_year(value: &str) -> Result<MonthYear, String> {
    MonthYear::parse(value).map_err(|e| e.to_string())
}

#[derive(Args, Debug)]
struct FilterArgs {
    /// 面料代码（组织代码 / 面料编号 / 参考编号任一匹配）
    #[arg(long)]
    fabric: Option<String>,

    /// 票据类型（大小写均可）
    #[arg(long, value_enum, ignore_case = true)]
    bill: Option<BillArg>,

    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
    month: Option<u32>,

    #[arg(long)]
    year: Option<i32>,

    /// 起始年月 YYYY-MM
    #[arg(long, value_parser = parse_month_year)]
    from: Option<MonthYear>,

    /// 截止年月 YYYY-MM
    #[arg(long, value_parser = parse_month_year)]
    to: Option<MonthYear>,
}

impl FilterArgs {
    fn ledger_filter(&self) -> LedgerFilter {
        LedgerFilter {
            month: self.month,
            year: self.year,
            bill_type: self.bill.map(BillType::from),
            fabric_code: self.fabric.clone().filter(|f| !f.trim().is_empty()),
            from: self.from,
            to: self.to,
        }
    }
}

#[derive(Args, Debug)]
struct RangeArgs {
    /// 起始年月 YYYY-MM
    #[arg(long, value_parser = parse_month_year)]
    start: Option<MonthYear>,

    /// 截止年月 YYYY-MM
    #[arg(long, value_parser = parse_month_year)]
    end: Option<MonthYear>,
}

impl RangeArgs {
    fn range(&self) -> Result<DateRange> {
        Ok(DateRange::from_months(self.start, self.end)?)
    }
}

/// 数据源 + 报表设置
fn open_source(cli: &Cli) -> Result<(Arc<dyn EventSource>, ReportSettings)> {
    if let Some(dir) = &cli.dir {
        let settings = match &cli.db {
            Some(db) => ConfigManager::new(&db.to_string_lossy())?.get_report_settings()?,
            None => ReportSettings::default(),
        };
        let source = FileEventSource::new(dir)?;
        return Ok((Arc::new(source), settings));
    }

    let db_arg = cli.db.as_ref().map(|p| p.to_string_lossy().to_string());
    let db_path = resolve_db_path(db_arg.as_deref());
    if !db_path.exists() {
        bail!("数据库不存在: {}", db_path.display());
    }
    let db_path = db_path.to_string_lossy().to_string();
    tracing::info!(db_path = %db_path, "使用数据库");

    let conn = Arc::new(Mutex::new(open_sqlite_connection(&db_path)?));
    let settings = ConfigManager::from_connection(conn.clone())?.get_report_settings()?;
    let source = SqliteEventSource::from_connection(conn).with_fetch_limit(settings.fetch_limit);
    Ok((Arc::new(source), settings))
}

fn write_json<T: Serialize>(value: &T, out: Option<&Path>) -> Result<()> {
    let text = serde_json::to_string_pretty(value)?;
    match out {
        Some(path) => std::fs::write(path, text).with_context(|| format!("写入失败: {}", path.display()))?,
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", text)?;
        }
    }
    Ok(())
}

fn write_csv(doc: &ReportDocument, out: Option<&Path>) -> Result<()> {
    match out {
        Some(path) => CsvExporter::new().write_to_path(path, doc)?,
        None => CsvExporter { with_bom: false }.write(std::io::stdout().lock(), doc)?,
    }
    Ok(())
}

/// 输出: JSON 写原始结构，CSV 写格式化表格
fn emit<T: Serialize>(format: OutputFormat, value: &T, doc: impl FnOnce() -> ReportDocument, out: Option<&Path>) -> Result<()> {
    match format {
        OutputFormat::Json => write_json(value, out),
        OutputFormat::Csv => write_csv(&doc(), out),
    }
}

async fn run(cli: Cli) -> Result<()> {
    let (source, settings) = open_source(&cli)?;
    let settings = settings.with_locale(cli.locale.as_deref());
    if !i18n::is_supported(&settings.locale) {
        tracing::warn!(locale = %settings.locale, "未提供该语言的翻译，使用回退语言");
    }

    let api = ReportApi::new(source, settings);
    let formatter = api.formatter();
    let format = cli.format;
    let out = cli.out.as_deref();

    match &cli.command {
        Command::Ledger(args) => {
            let filter = args.ledger_filter();
            let report = api.fabric_ledger(&filter, RunningBalances::new()).await?;
            let resolved = filter.resolve()?;
            emit(format, &report, || {
                ledger_document(api.settings(), &resolved, formatter.ledger_table(&report.rows))
            }, out)
        }
        Command::Packages(args) => {
            let range = args.range()?;
            let report = api.package_summary(range).await?;
            emit(format, &report, || {
                range_document(
                    api.settings(),
                    "report.package_title",
                    &range,
                    formatter.package_table(&report.categories, &report.total),
                )
            }, out)
        }
        Command::Yarn(args) => {
            let range = args.range()?;
            let report = api.yarn_stock(range).await?;
            emit(format, &report, || {
                range_document(
                    api.settings(),
                    "report.yarn_title",
                    &range,
                    formatter.yarn_table(&report.lines, &report.total),
                )
            }, out)
        }
        Command::Bills(args) => {
            let bills = api.bill_summary(&args.ledger_filter()).await?;
            emit(format, &bills, || ReportDocument {
                table: formatter.bill_table(&bills),
                ..ReportDocument::default()
            }, out)
        }
        Command::Fabrics(args) => {
            let totals = api.fabric_totals(&args.ledger_filter()).await?;
            emit(format, &totals, || ReportDocument {
                table: formatter.fabric_total_table(&totals),
                ..ReportDocument::default()
            }, out)
        }
        Command::Codes(args) => {
            let codes = api.fabric_codes(&args.ledger_filter()).await?;
            emit(format, &codes, || ReportDocument {
                table: Table {
                    headers: vec![i18n::t_in("report.fabric_code", formatter.locale())],
                    rows: codes.iter().map(|c| vec![c.clone()]).collect(),
                },
                ..ReportDocument::default()
            }, out)
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_with_format(cli.log_format.into());

    tracing::info!(version = VERSION, command = cli.command.name(), "textile-inventory 启动");
    run(cli).await
}
