// ===============================
// src/report.rs
// ===============================
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;
use tracing::{info, warn};

use crate::error::AppError;
use crate::metrics;
use crate::positions::PnlReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ReportFormat {
    Text,
    Json,
    Prometheus,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    generated_at: DateTime<Utc>,
    #[serde(flatten)]
    report: &'a PnlReport,
}

/// Render the final report. Diagnostics never suppress the summary.
pub fn render<W: Write>(out: &mut W, report: &PnlReport, format: ReportFormat) -> Result<(), AppError> {
    match format {
        ReportFormat::Text => write_text(out, report)?,
        ReportFormat::Json => {
            let doc = JsonReport { generated_at: Utc::now(), report };
            serde_json::to_writer_pretty(&mut *out, &doc)?;
            writeln!(out)?;
        }
        ReportFormat::Prometheus => out.write_all(metrics::encode(report)?.as_bytes())?,
    }
    Ok(())
}

pub fn write_text<W: Write>(out: &mut W, report: &PnlReport) -> std::io::Result<()> {
    writeln!(out, "1. Total Realized PnL: {}", report.total_realized)?;
    writeln!(out, "2. Realized PnL by Ticker:")?;
    for (sym, pnl) in &report.realized_by_instrument {
        writeln!(out, "   {sym:<12} {pnl}")?;
    }

    writeln!(out, "Inventory:")?;
    for (sym, inv) in &report.inventory {
        let avg = inv
            .average_cost()
            .map(|a| a.round_dp(6).normalize().to_string())
            .unwrap_or_else(|| "-".to_string());
        writeln!(
            out,
            "   {sym:<12} held={} cost_basis={} avg_cost={avg}",
            inv.held_quantity, inv.cost_basis
        )?;
    }

    let s = &report.stats;
    writeln!(
        out,
        "Records: {} (buys {}, sells {}, not filled {}, skipped {})",
        s.records, s.buys, s.sells, s.not_filled, s.rejected
    )?;

    if !report.diagnostics.is_empty() {
        writeln!(out, "Diagnostics ({}):", report.diagnostics.len())?;
        for d in &report.diagnostics {
            writeln!(out, "   [{}] {d}", d.label())?;
        }
    }
    Ok(())
}

/// Chart-ready series: one row per point, `step` counts from 0 per instrument.
pub fn write_series_csv<W: Write>(out: W, report: &PnlReport) -> Result<(), AppError> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(["instrument", "step", "cumulative_pnl"])?;
    for (sym, series) in &report.cumulative {
        for (step, v) in series.iter().enumerate() {
            let (step, v) = (step.to_string(), v.to_string());
            wtr.write_record([sym.as_str(), step.as_str(), v.as_str()])?;
        }
    }
    wtr.flush()?;
    Ok(())
}

/// Log every diagnostic, then a one-line summary.
pub fn log_run(report: &PnlReport) {
    for d in &report.diagnostics {
        warn!(
            index = d.index,
            instrument = %d.instrument,
            order_id = %d.order_id,
            kind = d.label(),
            reason = %d.kind,
            "record skipped"
        );
    }
    info!(
        records = report.stats.records,
        instruments = report.inventory.len(),
        diagnostics = report.diagnostics.len(),
        total_realized = %report.total_realized,
        "run complete"
    );
}
