//! Scenario: negative tradeAmt in the fill log
//!
//! A negative amount is read, not rejected by the source. On a non-filled
//! row it is ignored; on a filled row it becomes a NonPositive diagnostic
//! and the run continues with the following records.

use fill_pnl_rust::{process, CsvFillSource, DiagnosticKind};
use rust_decimal_macros::dec;

const LOG: &str = "\
currentTime;tradePx;tradeAmt;action;orderId;orderProduct;orderSide
1;100;10;filled;o1;X;buy
2;100;-5;cancelled;o2;X;buy
3;100;-5;filled;o3;X;sell
4;110;5;filled;o4;X;sell
";

#[test]
fn scenario_negative_amount_is_diagnosed_not_fatal() {
    let fills = CsvFillSource::from_reader(LOG.as_bytes(), b';').read_all().unwrap();
    assert_eq!(fills.len(), 4);

    let pnl = process(&fills);
    assert_eq!(pnl.stats.not_filled, 1);
    assert_eq!(pnl.diagnostics.len(), 1);
    assert_eq!(pnl.diagnostics[0].index, 2);
    assert_eq!(pnl.diagnostics[0].kind, DiagnosticKind::NonPositive { field: "tradeAmt" });
    assert!(pnl.diagnostics[0].is_malformed());

    // the rejected sell left inventory untouched; the next sell still books
    assert_eq!(pnl.realized_by_instrument["X"], dec!(50));
    assert_eq!(pnl.inventory["X"].held_quantity, 5);
    assert_eq!(pnl.cumulative["X"], vec![dec!(0), dec!(50)]);
}
