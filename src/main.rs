// ===============================
// src/main.rs
// ===============================
/*
 # contoh
 FILL_LOG=test_logs.csv cargo run --release
 cargo run -- --input fills.csv --format json --series-out out/series.csv
 cargo run -- --format prometheus --record-file out/diagnostics.jsonl --strict
*/
/*
=============================================================================
Project : fill_pnl_rust — realized PnL from fill logs in Rust
Module  : main.rs
Version : 0.5.0
License : MIT (see LICENSE)

Summary : Reads an ordered fill log (CSV), books weighted-average cost per
          instrument, reports realized PnL + cumulative PnL series (text,
          JSON, Prometheus), and records diagnostics as JSONL.
=============================================================================
*/
use std::{
    fs::{self, File},
    io::{self, BufWriter},
    path::Path,
    process::ExitCode,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use fill_pnl_rust::{config, process, recorder, report, AppError, CsvFillSource};

fn run(args: &config::Args) -> Result<(), AppError> {
    // ---- Source ----
    let fills = CsvFillSource::from_path(&args.input, args.delimiter)?.read_all()?;

    // ---- Engine ----
    let pnl = process(&fills);
    report::log_run(&pnl);

    // ---- Sinks ----
    let stdout = io::stdout();
    let mut out = stdout.lock();
    report::render(&mut out, &pnl, args.format)?;

    if let Some(path) = &args.series_out {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        report::write_series_csv(BufWriter::new(File::create(path)?), &pnl)?;
        info!(%path, instruments = pnl.cumulative.len(), "series written");
    }

    if let Some(path) = &args.record_file {
        recorder::record(path, &pnl.diagnostics)?;
    }

    if args.strict && !pnl.diagnostics.is_empty() {
        return Err(AppError::Strict(pnl.diagnostics.len()));
    }
    Ok(())
}

fn main() -> ExitCode {
    // ---- Load config ----
    let args = config::load();

    // ---- Logging (stderr; stdout dipakai untuk report) ----
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&args.log_filter))
        .with_writer(io::stderr)
        .init();

    info!(
        input = %args.input,
        delimiter = %(args.delimiter as char),
        format = ?args.format,
        series_out = ?args.series_out,
        record_file = ?args.record_file,
        strict = args.strict,
        "startup config"
    );

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(AppError::Strict(n)) => {
            error!(diagnostics = n, "strict mode: input had skipped records");
            ExitCode::from(2)
        }
        Err(e) => {
            error!(error = %e, "run failed");
            ExitCode::FAILURE
        }
    }
}
