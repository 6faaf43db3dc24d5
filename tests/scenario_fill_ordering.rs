//! Scenario: ordering matters only within an instrument
//!
//! 1. Swapping adjacent fills of different instruments changes nothing.
//! 2. Swapping fills of the same instrument changes realized PnL.
//! 3. Per-instrument partitioned processing equals the sequential run.

use fill_pnl_rust::{partition_by_instrument, process, process_partitioned, FillRecord, Side};
use rust_decimal_macros::dec;

fn f(ts: i64, sym: &str, side: Side, qty: i64, px: rust_decimal::Decimal) -> FillRecord {
    FillRecord::filled(ts, sym, side, qty, px)
}

#[test]
fn scenario_cross_instrument_swap_is_invisible() {
    let a = vec![
        f(1, "A", Side::Buy, 10, dec!(100)),
        f(2, "B", Side::Buy, 5, dec!(20)),
        f(3, "A", Side::Sell, 5, dec!(110)),
        f(4, "B", Side::Sell, 5, dec!(18)),
    ];
    let b = vec![a[1].clone(), a[0].clone(), a[3].clone(), a[2].clone()];

    let ra = process(&a);
    let rb = process(&b);
    assert_eq!(ra.realized_by_instrument, rb.realized_by_instrument);
    assert_eq!(ra.total_realized, rb.total_realized);
    assert_eq!(ra.cumulative, rb.cumulative);
    assert_eq!(ra.inventory, rb.inventory);
}

#[test]
fn scenario_same_instrument_swap_changes_pnl() {
    let first = vec![
        f(1, "A", Side::Buy, 10, dec!(100)),
        f(2, "A", Side::Sell, 5, dec!(120)),
        f(3, "A", Side::Buy, 10, dec!(200)),
    ];
    let swapped = vec![first[0].clone(), first[2].clone(), first[1].clone()];

    // 5 * (120 - 100) vs 5 * (120 - 150)
    assert_eq!(process(&first).realized_by_instrument["A"], dec!(100));
    assert_eq!(process(&swapped).realized_by_instrument["A"], dec!(-150));
}

#[test]
fn scenario_partitions_preserve_relative_order() {
    let fills = vec![
        f(1, "A", Side::Buy, 1, dec!(1)),
        f(2, "B", Side::Buy, 1, dec!(1)),
        f(3, "A", Side::Sell, 1, dec!(2)),
        f(4, "A", Side::Sell, 1, dec!(2)),
    ];
    let parts = partition_by_instrument(&fills);
    let a_idx: Vec<usize> = parts["A"].iter().map(|(i, _)| *i).collect();
    assert_eq!(a_idx, vec![0, 2, 3]);
    assert_eq!(parts["B"].len(), 1);

    let seq = process(&fills);
    let par = process_partitioned(&fills);
    assert_eq!(par, seq);
    assert_eq!(par.diagnostics[0].index, 3);
}
