// ===============================
// src/domain.rs
// ===============================
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side { Buy, Sell, Unknown(String) }

impl Side {
    /// `buy` / `sell` persis seperti di log; selain itu `Unknown`.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "buy" => Side::Buy,
            "sell" => Side::Sell,
            other => Side::Unknown(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FillAction { Filled, Other(String) }

impl FillAction {
    pub fn parse(raw: &str) -> Self {
        if raw == "filled" { FillAction::Filled } else { FillAction::Other(raw.to_string()) }
    }
    pub fn is_filled(&self) -> bool { matches!(self, FillAction::Filled) }
}

/// One row of the fill log. `None` marks a field that was empty in the raw row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FillRecord {
    pub timestamp: Option<i64>,
    pub price: Option<Decimal>,
    /// Signed as logged; the engine rejects values <= 0 on filled records.
    pub quantity: Option<i64>,
    pub action: FillAction,
    pub order_id: String,
    pub instrument: String,
    pub side: Side,
}

impl FillRecord {
    /// Shorthand for a complete `filled` record.
    pub fn filled(ts: i64, instrument: &str, side: Side, quantity: i64, price: Decimal) -> Self {
        Self {
            timestamp: Some(ts),
            price: Some(price),
            quantity: Some(quantity),
            action: FillAction::Filled,
            order_id: format!("ORD-{ts}"),
            instrument: instrument.to_string(),
            side,
        }
    }
}

// Inventory structures
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InventoryState {
    pub held_quantity: u64,
    /// Total cost of the units still held (not the average).
    pub cost_basis: Decimal,
    pub realized_pnl: Decimal,
}

impl InventoryState {
    /// Weighted average cost; `None` while flat.
    pub fn average_cost(&self) -> Option<Decimal> {
        if self.held_quantity == 0 {
            return None;
        }
        self.cost_basis.checked_div(Decimal::from(self.held_quantity))
    }

    pub fn is_flat(&self) -> bool { self.held_quantity == 0 }
}

/// Realized PnL snapshots, seeded with a leading zero.
pub type CumulativeSeries = Vec<Decimal>;

pub fn new_series() -> CumulativeSeries { vec![Decimal::ZERO] }
