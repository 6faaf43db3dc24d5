// ===============================
// src/positions.rs (PnL & Inventory tracker)
// ===============================
//
// Weighted-average cost accounting over an ordered fill sequence.
// - buy  : cost_basis += px * qty, held += qty
// - sell : realize (px - avg_cost) * qty, release avg_cost * qty from basis
// - sell > held : skipped, reported as a Diagnostic
//
// Ordering only matters within one instrument; see `process_partitioned`.
//

use ahash::AHashMap as HashMap;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::domain::{new_series, CumulativeSeries, FillRecord, InventoryState, Side};
use crate::error::{Diagnostic, DiagnosticKind};

/// What a single record did to the engine state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FillOutcome {
    NotFilled,
    Bought,
    Sold { profit: Decimal },
    Rejected(DiagnosticKind),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    pub records: usize,
    pub not_filled: usize,
    pub buys: usize,
    pub sells: usize,
    pub rejected: usize,
}

impl RunStats {
    fn absorb(&mut self, other: &RunStats) {
        self.records += other.records;
        self.not_filled += other.not_filled;
        self.buys += other.buys;
        self.sells += other.sells;
        self.rejected += other.rejected;
    }
}

/// Everything a run produces. Maps are ordered by instrument key.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PnlReport {
    pub realized_by_instrument: BTreeMap<String, Decimal>,
    /// Sum of `realized_by_instrument`, added in ascending key order.
    pub total_realized: Decimal,
    pub cumulative: BTreeMap<String, CumulativeSeries>,
    pub inventory: BTreeMap<String, InventoryState>,
    pub diagnostics: Vec<Diagnostic>,
    pub stats: RunStats,
}

impl PnlReport {
    /// Fold in a report computed over a disjoint set of instruments.
    pub fn merge(&mut self, other: PnlReport) {
        self.realized_by_instrument.extend(other.realized_by_instrument);
        self.cumulative.extend(other.cumulative);
        self.inventory.extend(other.inventory);
        self.diagnostics.extend(other.diagnostics);
        self.diagnostics.sort_by_key(|d| d.index);
        self.stats.absorb(&other.stats);
        self.total_realized = sum_in_key_order(&self.realized_by_instrument);
    }
}

/// `None` when the total does not fit in a `Decimal`.
fn checked_sum_in_key_order(realized: &BTreeMap<String, Decimal>) -> Option<Decimal> {
    realized
        .values()
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(*v))
}

fn sum_in_key_order(realized: &BTreeMap<String, Decimal>) -> Decimal {
    checked_sum_in_key_order(realized).unwrap_or_else(|| {
        warn!(instruments = realized.len(), "total realized PnL overflows Decimal, capped");
        realized.values().fold(Decimal::ZERO, |acc, v| acc.saturating_add(*v))
    })
}

impl InventoryState {
    /// State after buying `qty` at `px`. `self` is left untouched.
    pub fn after_buy(&self, qty: u64, px: Decimal) -> Result<InventoryState, DiagnosticKind> {
        let cost = px.checked_mul(Decimal::from(qty)).ok_or(DiagnosticKind::ArithmeticOverflow)?;
        Ok(InventoryState {
            held_quantity: self.held_quantity.checked_add(qty).ok_or(DiagnosticKind::ArithmeticOverflow)?,
            cost_basis: self
                .cost_basis
                .checked_add(cost)
                .ok_or(DiagnosticKind::ArithmeticOverflow)?
                .normalize(),
            realized_pnl: self.realized_pnl,
        })
    }

    /// State after selling `qty` at `px`, plus the realized profit of this sell.
    ///
    /// Released basis is `cost_basis * qty / held` (avg_cost * qty with the
    /// division done last); when that product does not fit, `avg_cost * qty`
    /// is used instead. A sell that empties the position leaves the basis at
    /// exactly zero.
    pub fn after_sell(&self, qty: u64, px: Decimal) -> Result<(InventoryState, Decimal), DiagnosticKind> {
        if self.held_quantity < qty || self.held_quantity == 0 {
            return Err(DiagnosticKind::InsufficientInventory {
                requested: qty,
                available: self.held_quantity,
            });
        }
        let overflow = || DiagnosticKind::ArithmeticOverflow;
        let q = Decimal::from(qty);
        let held = Decimal::from(self.held_quantity);
        let released = self
            .cost_basis
            .checked_mul(q)
            .and_then(|x| x.checked_div(held))
            .or_else(|| self.cost_basis.checked_div(held).and_then(|avg| avg.checked_mul(q)))
            .ok_or_else(overflow)?;
        let proceeds = px.checked_mul(q).ok_or_else(overflow)?;
        let profit = proceeds.checked_sub(released).ok_or_else(overflow)?.normalize();

        let held_quantity = self.held_quantity - qty;
        let cost_basis = if held_quantity == 0 {
            Decimal::ZERO
        } else {
            self.cost_basis.checked_sub(released).ok_or_else(overflow)?.normalize()
        };
        let realized_pnl = self.realized_pnl.checked_add(profit).ok_or_else(overflow)?.normalize();
        Ok((InventoryState { held_quantity, cost_basis, realized_pnl }, profit))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Leg { Buy, Sell }

/// Checks a filled record before it may touch any state.
fn validate(rec: &FillRecord) -> Result<(Leg, Decimal, u64), DiagnosticKind> {
    let leg = match &rec.side {
        Side::Buy => Leg::Buy,
        Side::Sell => Leg::Sell,
        Side::Unknown(side) => return Err(DiagnosticKind::UnknownSide { side: side.clone() }),
    };
    let px = rec.price.ok_or(DiagnosticKind::MissingField { field: "tradePx" })?;
    let qty = rec.quantity.ok_or(DiagnosticKind::MissingField { field: "tradeAmt" })?;
    if px <= Decimal::ZERO {
        return Err(DiagnosticKind::NonPositive { field: "tradePx" });
    }
    let qty = match u64::try_from(qty) {
        Ok(q) if q > 0 => q,
        _ => return Err(DiagnosticKind::NonPositive { field: "tradeAmt" }),
    };
    Ok((leg, px, qty))
}

/// Per-run accounting state. One engine = one run; nothing is shared.
#[derive(Debug, Default)]
pub struct PnlEngine {
    inventory: HashMap<String, InventoryState>,
    series: HashMap<String, CumulativeSeries>,
    diagnostics: Vec<Diagnostic>,
    stats: RunStats,
}

impl PnlEngine {
    pub fn new() -> Self { Self::default() }

    /// Apply the next record; its index is the number of records seen so far.
    pub fn apply(&mut self, rec: &FillRecord) -> FillOutcome {
        let index = self.stats.records;
        self.apply_at(index, rec)
    }

    /// Apply a record whose position in the original input is `index`.
    pub fn apply_at(&mut self, index: usize, rec: &FillRecord) -> FillOutcome {
        self.stats.records += 1;
        if !rec.action.is_filled() {
            self.stats.not_filled += 1;
            return FillOutcome::NotFilled;
        }

        // record rusak -> jangan daftarkan instrument
        let (leg, px, qty) = match validate(rec) {
            Ok(v) => v,
            Err(kind) => return self.reject(index, rec, kind),
        };

        let current = self
            .inventory
            .entry(rec.instrument.clone())
            .or_default()
            .clone();
        self.series.entry(rec.instrument.clone()).or_insert_with(new_series);

        let next = match leg {
            Leg::Buy => current.after_buy(qty, px).map(|s| (s, None)),
            Leg::Sell => current.after_sell(qty, px).map(|(s, p)| (s, Some(p))),
        };

        match next {
            Ok((state, None)) => {
                self.inventory.insert(rec.instrument.clone(), state);
                self.stats.buys += 1;
                FillOutcome::Bought
            }
            Ok((state, Some(profit))) => {
                debug!(instrument = %rec.instrument, qty, px = %px, profit = %profit, "sell realized");
                if let Some(series) = self.series.get_mut(&rec.instrument) {
                    series.push(state.realized_pnl);
                }
                self.inventory.insert(rec.instrument.clone(), state);
                self.stats.sells += 1;
                FillOutcome::Sold { profit }
            }
            Err(kind) => self.reject(index, rec, kind),
        }
    }

    fn reject(&mut self, index: usize, rec: &FillRecord, kind: DiagnosticKind) -> FillOutcome {
        debug!(index, instrument = %rec.instrument, reason = %kind, "fill skipped");
        self.stats.rejected += 1;
        self.diagnostics.push(Diagnostic {
            index,
            timestamp: rec.timestamp,
            order_id: rec.order_id.clone(),
            instrument: rec.instrument.clone(),
            kind: kind.clone(),
        });
        FillOutcome::Rejected(kind)
    }

    pub fn inventory(&self, instrument: &str) -> Option<&InventoryState> {
        self.inventory.get(instrument)
    }

    pub fn series(&self, instrument: &str) -> Option<&CumulativeSeries> {
        self.series.get(instrument)
    }

    pub fn diagnostics(&self) -> &[Diagnostic] { &self.diagnostics }

    pub fn finish(self) -> PnlReport {
        let inventory: BTreeMap<String, InventoryState> = self.inventory.into_iter().collect();
        let realized_by_instrument: BTreeMap<String, Decimal> = inventory
            .iter()
            .map(|(k, v)| (k.clone(), v.realized_pnl))
            .collect();
        let total_realized = sum_in_key_order(&realized_by_instrument);
        PnlReport {
            realized_by_instrument,
            total_realized,
            cumulative: self.series.into_iter().collect(),
            inventory,
            diagnostics: self.diagnostics,
            stats: self.stats,
        }
    }
}

/// Single forward pass over `fills` in input order.
pub fn process<'a, I>(fills: I) -> PnlReport
where
    I: IntoIterator<Item = &'a FillRecord>,
{
    let mut engine = PnlEngine::new();
    for rec in fills {
        engine.apply(rec);
    }
    engine.finish()
}

/// Group records by instrument, keeping each record's original index and
/// each instrument's relative order.
pub fn partition_by_instrument(fills: &[FillRecord]) -> BTreeMap<&str, Vec<(usize, &FillRecord)>> {
    let mut parts: BTreeMap<&str, Vec<(usize, &FillRecord)>> = BTreeMap::new();
    for (i, rec) in fills.iter().enumerate() {
        parts.entry(rec.instrument.as_str()).or_default().push((i, rec));
    }
    parts
}

/// Same result as [`process`], computed one instrument at a time.
pub fn process_partitioned(fills: &[FillRecord]) -> PnlReport {
    let mut out = PnlReport::default();
    for (_, part) in partition_by_instrument(fills) {
        let mut engine = PnlEngine::new();
        for (i, rec) in part {
            engine.apply_at(i, rec);
        }
        out.merge(engine.finish());
    }
    out
}
