// ===============================
// src/metrics.rs
// ===============================
use prometheus::{Encoder, Gauge, GaugeVec, IntCounterVec, IntGaugeVec, Opts, Registry, TextEncoder};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::positions::PnlReport;

fn f64_of(d: Decimal) -> f64 { d.to_f64().unwrap_or(f64::NAN) }

/// Fresh registry filled from one report (no process-wide statics).
pub fn registry_for(report: &PnlReport) -> Result<Registry, prometheus::Error> {
    let registry = Registry::new();

    // -------- PnL --------
    let realized = GaugeVec::new(
        Opts::new("pnl_realized", "realized PnL per instrument"),
        &["instrument"],
    )?;
    let realized_total = Gauge::new("pnl_realized_total", "realized PnL, all instruments")?;

    // -------- Inventory --------
    let inv_qty = IntGaugeVec::new(
        Opts::new("inventory_qty", "held quantity per instrument"),
        &["instrument"],
    )?;
    let inv_basis = GaugeVec::new(
        Opts::new("inventory_cost_basis", "total cost basis of held units"),
        &["instrument"],
    )?;

    // -------- Run --------
    let fills = IntCounterVec::new(
        Opts::new("fills_total", "records by outcome"),
        &["outcome"],
    )?;
    let diags = IntCounterVec::new(
        Opts::new("diagnostics_total", "skipped records by kind"),
        &["kind"],
    )?;

    registry.register(Box::new(realized.clone()))?;
    registry.register(Box::new(realized_total.clone()))?;
    registry.register(Box::new(inv_qty.clone()))?;
    registry.register(Box::new(inv_basis.clone()))?;
    registry.register(Box::new(fills.clone()))?;
    registry.register(Box::new(diags.clone()))?;

    for (sym, pnl) in &report.realized_by_instrument {
        realized.with_label_values(&[sym.as_str()]).set(f64_of(*pnl));
    }
    realized_total.set(f64_of(report.total_realized));

    for (sym, inv) in &report.inventory {
        inv_qty
            .with_label_values(&[sym.as_str()])
            .set(i64::try_from(inv.held_quantity).unwrap_or(i64::MAX));
        inv_basis.with_label_values(&[sym.as_str()]).set(f64_of(inv.cost_basis));
    }

    let s = &report.stats;
    for (outcome, n) in [
        ("buy", s.buys),
        ("sell", s.sells),
        ("not_filled", s.not_filled),
        ("rejected", s.rejected),
    ] {
        fills.with_label_values(&[outcome]).inc_by(n as u64);
    }
    for d in &report.diagnostics {
        diags.with_label_values(&[d.label()]).inc();
    }

    Ok(registry)
}

/// Prometheus text exposition of one report.
pub fn encode(report: &PnlReport) -> Result<String, prometheus::Error> {
    let families = registry_for(report)?.gather();
    let mut buf = Vec::new();
    TextEncoder::new().encode(&families, &mut buf)?;
    if buf.is_empty() {
        buf.extend_from_slice(b"# no metrics\n");
    }
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FillRecord, Side};
    use crate::positions::process;
    use rust_decimal_macros::dec;

    #[test]
    fn exposes_realized_and_inventory() {
        let report = process(&[
            FillRecord::filled(1, "AAPL", Side::Buy, 10, dec!(100)),
            FillRecord::filled(2, "AAPL", Side::Sell, 4, dec!(120)),
        ]);
        let text = encode(&report).unwrap();
        assert!(text.contains("pnl_realized{instrument=\"AAPL\"} 80"));
        assert!(text.contains("pnl_realized_total 80"));
        assert!(text.contains("inventory_qty{instrument=\"AAPL\"} 6"));
        assert!(text.contains("inventory_cost_basis{instrument=\"AAPL\"} 600"));
        assert!(text.contains("fills_total{outcome=\"sell\"} 1"));
    }

    #[test]
    fn registries_are_independent_per_report() {
        let a = process(&[FillRecord::filled(1, "A", Side::Buy, 1, dec!(1))]);
        let b = process(&[FillRecord::filled(1, "B", Side::Buy, 1, dec!(1))]);
        let ta = encode(&a).unwrap();
        let tb = encode(&b).unwrap();
        assert!(ta.contains("instrument=\"A\""));
        assert!(!tb.contains("instrument=\"A\""));
    }
}
