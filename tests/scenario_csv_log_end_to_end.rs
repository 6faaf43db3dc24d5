//! Scenario: semicolon fill log -> engine -> text report
//!
//! Non-filled rows with empty price/amount are tolerated; a filled row with
//! an empty price becomes a malformed-record diagnostic.

use fill_pnl_rust::{process, report, CsvFillSource, DiagnosticKind};
use rust_decimal_macros::dec;

const LOG: &str = "\
currentTime;tradePx;tradeAmt;action;orderId;orderProduct;orderSide
1000;;;new;o-1;AAPL;buy
1001;100;10;filled;o-1;AAPL;buy
1002;120;4;filled;o-2;AAPL;sell
1003;;;cancelled;o-3;MSFT;buy
1004;90;5;filled;o-4;AAPL;buy
1005;;5;filled;o-5;MSFT;buy
1006;110;11;filled;o-6;AAPL;sell
1007;50;1;filled;o-7;AAPL;sell
";

#[test]
fn scenario_csv_log_to_report() {
    let fills = CsvFillSource::from_reader(LOG.as_bytes(), b';').read_all().unwrap();
    assert_eq!(fills.len(), 8);

    let pnl = process(&fills);
    assert_eq!(pnl.realized_by_instrument["AAPL"], dec!(240));
    assert_eq!(pnl.cumulative["AAPL"], vec![dec!(0), dec!(80), dec!(240)]);
    assert!(!pnl.inventory.contains_key("MSFT"));

    let kinds: Vec<_> = pnl.diagnostics.iter().map(|d| (d.index, d.kind.clone())).collect();
    assert_eq!(
        kinds,
        vec![
            (5, DiagnosticKind::MissingField { field: "tradePx" }),
            (7, DiagnosticKind::InsufficientInventory { requested: 1, available: 0 }),
        ]
    );

    let mut buf = Vec::new();
    report::write_text(&mut buf, &pnl).unwrap();
    let text = String::from_utf8(buf).unwrap();
    assert!(text.starts_with("1. Total Realized PnL: 240\n"));
    assert!(text.contains("Diagnostics (2):"));
}
