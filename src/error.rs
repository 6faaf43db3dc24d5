// ===============================
// src/error.rs
// ===============================
use serde::Serialize;
use thiserror::Error;

/// Why a filled record was skipped by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiagnosticKind {
    #[error("not enough inventory: tried to sell {requested} but only have {available} available")]
    InsufficientInventory { requested: u64, available: u64 },
    #[error("unknown side {side:?}")]
    UnknownSide { side: String },
    #[error("missing field {field}")]
    MissingField { field: &'static str },
    #[error("field {field} must be positive")]
    NonPositive { field: &'static str },
    #[error("decimal overflow")]
    ArithmeticOverflow,
}

/// A recoverable condition reported alongside the normal output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// 0-based position of the record in the input sequence.
    pub index: usize,
    pub timestamp: Option<i64>,
    pub order_id: String,
    pub instrument: String,
    #[serde(flatten)]
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    pub fn is_malformed(&self) -> bool {
        !matches!(self.kind, DiagnosticKind::InsufficientInventory { .. })
    }

    /// Short label used for metrics and logs.
    pub fn label(&self) -> &'static str {
        match self.kind {
            DiagnosticKind::InsufficientInventory { .. } => "insufficient_inventory",
            _ => "malformed_record",
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "record #{} ({} / {}): {}", self.index, self.instrument, self.order_id, self.kind)
    }
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("missing required header column '{0}'")]
    MissingHeader(&'static str),
    #[error("row {row}: cannot parse field '{field}' from value '{raw}'")]
    ParseField { row: usize, field: &'static str, raw: String },
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("csv write error: {0}")]
    Csv(#[from] csv::Error),
    #[error("metrics error: {0}")]
    Metrics(#[from] prometheus::Error),
    #[error("strict mode: {0} diagnostic(s) reported")]
    Strict(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_message_names_both_quantities() {
        let d = Diagnostic {
            index: 3,
            timestamp: Some(10),
            order_id: "o-1".into(),
            instrument: "AAPL".into(),
            kind: DiagnosticKind::InsufficientInventory { requested: 11, available: 6 },
        };
        assert!(!d.is_malformed());
        assert_eq!(d.label(), "insufficient_inventory");
        let s = d.to_string();
        assert!(s.contains("AAPL"));
        assert!(s.contains("tried to sell 11 but only have 6"));
    }

    #[test]
    fn diagnostic_serializes_flat() {
        let d = Diagnostic {
            index: 0,
            timestamp: None,
            order_id: "o-2".into(),
            instrument: "MSFT".into(),
            kind: DiagnosticKind::MissingField { field: "tradePx" },
        };
        assert!(d.is_malformed());
        let v = serde_json::to_value(&d).unwrap();
        assert_eq!(v["kind"], "missing_field");
        assert_eq!(v["field"], "tradePx");
        assert_eq!(v["instrument"], "MSFT");
    }
}
