// ===============================
// src/config.rs
// ===============================
/*
=============================================================================
Project : fill_pnl_rust — realized PnL from fill logs in Rust
Module  : config.rs
Version : 0.5.0
License : MIT (see LICENSE)

Summary : Reads an ordered fill log (CSV), books weighted-average cost per
          instrument, reports realized PnL + cumulative PnL series (text,
          JSON, Prometheus), and records diagnostics as JSONL.
=============================================================================
*/
use clap::Parser;
use dotenvy::dotenv;

use crate::report::ReportFormat;

/// Delimiter satu karakter ASCII; `tab` / `\t` untuk TSV.
fn parse_delimiter(s: &str) -> Result<u8, String> {
    match s {
        "tab" | "\\t" | "\t" => return Ok(b'\t'),
        _ => {}
    }
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii() => Ok(c as u8),
        _ => Err(format!("delimiter must be a single ASCII character, got {s:?}")),
    }
}

#[derive(Clone, Debug, Parser)]
#[command(name = "fill_pnl_rust", version, about = "Realized PnL per instrument from a fill log")]
pub struct Args {
    /// Fill log path
    #[arg(long, short, env = "FILL_LOG", default_value = "test_logs.csv")]
    pub input: String,

    /// Column delimiter of the fill log
    #[arg(long, env = "FILL_DELIMITER", default_value = ";", value_parser = parse_delimiter)]
    pub delimiter: u8,

    /// Report format printed on stdout
    #[arg(long, short, env = "REPORT_FORMAT", value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    /// Write cumulative PnL series (instrument,step,cumulative_pnl) here
    #[arg(long, env = "SERIES_FILE")]
    pub series_out: Option<String>,

    /// Append diagnostics as JSONL here
    #[arg(long, env = "RECORD_FILE")]
    pub record_file: Option<String>,

    /// Exit with failure when any record was skipped
    #[arg(long, env = "STRICT")]
    pub strict: bool,

    /// tracing filter directive, e.g. `info` or `fill_pnl_rust=debug`
    #[arg(long = "log", env = "LOG_FILTER", default_value = "info")]
    pub log_filter: String,
}

pub fn load() -> Args {
    // Pastikan .env dibaca (agar FILL_LOG, RECORD_FILE, dll ter-load)
    let _ = dotenv();
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delimiter_parsing() {
        assert_eq!(parse_delimiter(";"), Ok(b';'));
        assert_eq!(parse_delimiter(","), Ok(b','));
        assert_eq!(parse_delimiter("tab"), Ok(b'\t'));
        assert!(parse_delimiter(";;").is_err());
        assert!(parse_delimiter("é").is_err());
        assert!(parse_delimiter("").is_err());
    }

    #[test]
    fn cli_flags_override_defaults() {
        let args = Args::try_parse_from([
            "fill_pnl_rust",
            "--input",
            "fills.csv",
            "--delimiter",
            ",",
            "--format",
            "json",
            "--series-out",
            "out/series.csv",
            "--strict",
        ])
        .unwrap();
        assert_eq!(args.input, "fills.csv");
        assert_eq!(args.delimiter, b',');
        assert_eq!(args.format, ReportFormat::Json);
        assert_eq!(args.series_out.as_deref(), Some("out/series.csv"));
        assert!(args.strict);
    }

    #[test]
    fn unknown_format_is_rejected() {
        assert!(Args::try_parse_from(["fill_pnl_rust", "--format", "xml"]).is_err());
    }
}
