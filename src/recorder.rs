// ===============================
// src/recorder.rs
// ===============================
//
// JSONL recorder untuk diagnostics:
// - Satu Diagnostic per baris, mode append.
// - Bufer dengan BufWriter, flush sekali di akhir.
// - Otomatis membuat parent directory jika belum ada.
// - Diagnostic yang gagal di-serialize dilewati (dicatat via tracing).
//
// ENV: set `RECORD_FILE=/path/to/diagnostics.jsonl` agar aktif (lihat main.rs).
//
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::{
    fs::{self, File, OpenOptions},
    io::{self, BufWriter, Write},
    path::Path,
};
use tracing::{error, info};

use crate::error::Diagnostic;

#[derive(Serialize)]
struct Line<'a> {
    recorded_at: DateTime<Utc>,
    #[serde(flatten)]
    diagnostic: &'a Diagnostic,
}

fn open_writer(path: &Path) -> io::Result<BufWriter<File>> {
    // Pastikan parent directory ada (kalau ada)
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    Ok(BufWriter::new(file))
}

/// Write `diagnostics` to any sink, one JSON object per line. Returns lines written.
pub fn write_jsonl<W: Write>(out: &mut W, diagnostics: &[Diagnostic]) -> io::Result<usize> {
    let recorded_at = Utc::now();
    let mut written = 0;
    for d in diagnostics {
        let line = match serde_json::to_string(&Line { recorded_at, diagnostic: d }) {
            Ok(s) => s,
            Err(e) => {
                error!(?e, index = d.index, "recorder: serialize error, skip diagnostic");
                continue;
            }
        };
        out.write_all(line.as_bytes())?;
        out.write_all(b"\n")?;
        written += 1;
    }
    out.flush()?;
    Ok(written)
}

/// Append `diagnostics` to the JSONL file at `path`.
pub fn record<P: AsRef<Path>>(path: P, diagnostics: &[Diagnostic]) -> io::Result<usize> {
    let path = path.as_ref();
    let mut writer = open_writer(path)?;
    let n = write_jsonl(&mut writer, diagnostics)?;
    info!(path = %path.display(), lines = n, "recorder: diagnostics written");
    Ok(n)
}
