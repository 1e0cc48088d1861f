// ==========================================
// Tupacery Reports - Command Line Entry
// ==========================================
// mining-reports <production|quality|diesel> <file> [from] [to]
//
// production: [from] [to] select the period (default period otherwise)
// quality:    dates are ignored; the latest valid day is the reference
// diesel:     [from] overrides "today" (the local date otherwise)
//
// Exit codes: 0 report printed, 2 no data for the selection,
//             1 anything else
// ==========================================

use anyhow::{anyhow, bail, Context};
use chrono::{Local, NaiveDate};
use mining_reports::api::{ApiError, ReportApi, ReportKind};
use mining_reports::config::ConfigManager;
use mining_reports::domain::DateRange;
use mining_reports::importer::sheet_reader::parse_date;
use mining_reports::{logging, APP_NAME, VERSION};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;

const USAGE: &str = "usage: mining-reports <production|quality|diesel> <file> [from] [to]";

struct Args {
    kind: ReportKind,
    file: PathBuf,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
}

fn parse_args(raw: &[String]) -> anyhow::Result<Args> {
    if raw.len() < 2 || raw.len() > 4 {
        bail!(USAGE);
    }
    let kind: ReportKind = raw[0].parse()?;
    let date_arg = |idx: usize| -> anyhow::Result<Option<NaiveDate>> {
        raw.get(idx)
            .map(|s| parse_date(s).ok_or_else(|| anyhow!("invalid date: {}", s)))
            .transpose()
    };
    Ok(Args {
        kind,
        file: PathBuf::from(&raw[1]),
        from: date_arg(2)?,
        to: date_arg(3)?,
    })
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let text = serde_json::to_string_pretty(value).context("serializing report")?;
    println!("{}", text);
    Ok(())
}

fn run(args: &Args) -> Result<(), ApiError> {
    let config = ConfigManager::resolve()?;
    let api = ReportApi::new(config);

    match args.kind {
        ReportKind::Production => {
            let range = match (args.from, args.to) {
                (Some(from), Some(to)) => Some(DateRange::new(from, to)),
                (Some(from), None) => Some(DateRange::new(from, Local::now().date_naive())),
                _ => None,
            };
            print_json(&api.production_report(&args.file, range)?)?;
        }
        ReportKind::Quality => {
            print_json(&api.quality_report(&args.file)?)?;
        }
        ReportKind::Diesel => {
            let today = args.from.unwrap_or_else(|| Local::now().date_naive());
            print_json(&api.diesel_report(&args.file, today)?)?;
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    logging::init();

    let raw: Vec<String> = std::env::args().skip(1).collect();
    let args = match parse_args(&raw) {
        Ok(args) => args,
        Err(err) => {
            eprintln!("{}", err);
            return ExitCode::from(1);
        }
    };

    tracing::debug!(app = APP_NAME, version = VERSION, kind = ?args.kind, file = %args.file.display(), "starting");

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) if err.is_no_data() => {
            eprintln!("{}", err);
            ExitCode::from(2)
        }
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::from(1)
        }
    }
}
