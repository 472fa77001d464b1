//! sla-runner: headless SLA report runner for helpdesk ticket exports.
//!
//! Usage:
//!   sla-runner --csv tickets.csv
//!   sla-runner --url "https://docs.google.com/.../pub?output=csv" --json
//!   sla-runner --csv tickets.csv --dept IT --label breached_open --from 2024-03-01
//!   sla-runner --csv tickets.csv --ipc-mode

mod http_source;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use http_source::HttpCsvSource;
use sladesk_core::{
    aggregate::{DateRange, Dimension, TicketFilter},
    cache::{RefreshStatus, ReportCache},
    clock::ReportClock,
    compliance::ComplianceLabel,
    config::SlaConfig,
    pipeline::parse_timestamp,
    report::ReportView,
    source::{CsvFileSource, TicketSource},
};
use std::env;
use std::io::{self, BufRead, Write};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    GetState,
    Refresh,
    Filter {
        #[serde(default)]
        filter: TicketFilter,
    },
    FocusDepartment {
        department: String,
    },
    Quit,
}

/// One reporting session: a source, its cache and the current filter.
struct Session {
    source: Box<dyn TicketSource>,
    config: SlaConfig,
    clock:  ReportClock,
    cache:  ReportCache,
    filter: TicketFilter,
}

impl Session {
    fn view(&mut self) -> Result<ReportView> {
        let now = self.clock.now();
        let status = self.cache.refresh(self.source.as_ref(), &self.config, now)?;
        let dataset = self
            .cache
            .dataset()
            .context("no dataset available after refresh")?;

        let filter = self.filter.clone().or_full_span(&dataset.tickets);
        let view = ReportView::build(dataset, &filter);
        Ok(match status {
            RefreshStatus::Stale(e) => view.with_warning(format!("showing cached data: {e}")),
            RefreshStatus::Fresh | RefreshStatus::Cached => view,
        })
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let json = args.iter().any(|a| a == "--json");

    let config = match arg_value(&args, "--config") {
        Some(path) => SlaConfig::load(path)?,
        None => SlaConfig::default(),
    };

    let source: Box<dyn TicketSource> = match (arg_value(&args, "--csv"), arg_value(&args, "--url")) {
        (Some(path), _) => Box::new(CsvFileSource::new(path)),
        (None, Some(url)) => Box::new(HttpCsvSource::new(url, config.fetch_timeout_secs)),
        (None, None) => bail!("one of --csv PATH or --url URL is required"),
    };

    let clock = match arg_value(&args, "--now") {
        Some(text) => match parse_timestamp(text, &config.timestamp_format) {
            Some(at) => ReportClock::Fixed(at),
            None => bail!("--now {text:?} does not match {}", config.timestamp_format),
        },
        None => ReportClock::System,
    };

    let filter = parse_filter(&args)?;

    if !ipc_mode && !json {
        println!("SLA Desk: sla-runner");
        println!("  source:    {}", source.name());
        println!("  now:       {}", clock.now());
        println!("  cache ttl: {}s", config.cache_ttl_secs);
        println!();
    }

    let mut session = Session {
        cache: ReportCache::from_config(&config),
        source,
        config,
        clock,
        filter,
    };

    if ipc_mode {
        return run_ipc_loop(&mut session);
    }

    match session.view() {
        Ok(view) if json => println!("{}", serde_json::to_string_pretty(&view)?),
        Ok(view) => print_summary(&view),
        Err(e) => {
            eprintln!("SLA report failed: {e}");
            std::process::exit(1);
        }
    }
    Ok(())
}

fn run_ipc_loop(session: &mut Session) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }
        if buffer.trim().is_empty() {
            continue;
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                write_error(&mut stdout, &e.to_string())?;
                continue;
            }
        };

        match cmd {
            IpcCommand::Quit => break,
            IpcCommand::GetState => {}
            IpcCommand::Refresh => session.cache.invalidate(),
            IpcCommand::Filter { filter } => session.filter = filter,
            IpcCommand::FocusDepartment { department } => {
                session.filter = session.filter.clone().focus_department(department);
            }
        }

        match session.view() {
            Ok(view) => writeln!(stdout, "{}", serde_json::to_string(&view)?)?,
            Err(e) => write_error(&mut stdout, &e.to_string())?,
        }
        stdout.flush()?;
    }
    Ok(())
}

fn write_error(out: &mut impl Write, message: &str) -> Result<()> {
    log::warn!("ipc error: {message}");
    let err_json = serde_json::json!({ "error": message });
    writeln!(out, "{}", err_json)?;
    out.flush()?;
    Ok(())
}

fn print_summary(view: &ReportView) {
    let s = &view.summary;

    if let Some(warning) = &view.warning {
        println!("!! {warning}");
        println!();
    }

    println!("=== SLA SUMMARY ===");
    println!("  reference now:  {}", view.reference_now);
    println!("  total cases:    {}", s.total);
    println!("  completed:      {}", s.closed);
    println!("  in progress:    {}", s.open);
    println!("  sla breached:   {}", s.breached);
    println!("  sla warning:    {}", s.warning);
    println!("  breach rate:    {:.1}%", s.breach_rate() * 100.0);

    let stats = &view.stats;
    println!();
    println!("=== DATA QUALITY ===");
    println!("  rows:                  {}", stats.rows);
    println!("  missing received:      {}", stats.missing_received);
    println!("  unparseable received:  {}", stats.unparseable_received);
    println!("  unparseable closed:    {}", stats.unparseable_closed);
    println!("  zero sla budget:       {}", stats.zero_budget);
    println!("  sentinel fills:        {}", stats.unspecified_filled);

    for (title, dim) in [
        ("SLA STATUS", Dimension::Compliance),
        ("STATUS", Dimension::Status),
        ("DEPARTMENT", Dimension::Department),
        ("CATEGORY", Dimension::CategoryPair),
    ] {
        println!();
        println!("=== {title} ===");
        let rows = view.counts(dim);
        if rows.is_empty() {
            println!("  (no tickets)");
        }
        for row in rows {
            println!("  {:>6}  {}", row.count, row.key);
        }
    }

    println!();
    println!("=== DAILY VOLUME ===");
    for day in &view.daily_volume {
        println!("  {}  {}", day.date, day.count);
    }
}

fn parse_filter(args: &[String]) -> Result<TicketFilter> {
    let from = arg_value(args, "--from").map(parse_date).transpose()?;
    let to = arg_value(args, "--to").map(parse_date).transpose()?;
    let date_range = match (from, to) {
        (Some(start), end) => Some(DateRange::new(start, end)),
        (None, Some(end)) => Some(DateRange::new(NaiveDate::MIN, Some(end))),
        (None, None) => None,
    };

    let labels = arg_values(args, "--label")
        .into_iter()
        .map(|s| s.parse::<ComplianceLabel>().map_err(anyhow::Error::msg))
        .collect::<Result<Vec<_>>>()?;

    Ok(TicketFilter {
        date_range,
        departments: arg_values(args, "--dept").into_iter().map(String::from).collect(),
        statuses: arg_values(args, "--status").into_iter().map(String::from).collect(),
        labels,
    })
}

fn parse_date(text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .with_context(|| format!("invalid date {text:?}, expected YYYY-MM-DD"))
}

fn arg_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn arg_values<'a>(args: &'a [String], flag: &str) -> Vec<&'a str> {
    args.windows(2)
        .filter(|w| w[0] == flag)
        .map(|w| w[1].as_str())
        .collect()
}
