// ===============================
// src/source.rs
// ===============================
//
// Fill log reader (delimited text, header row required).
// - kolom wajib : currentTime, tradePx, tradeAmt, action, orderId, orderProduct, orderSide
// - urutan kolom bebas, kolom tambahan diabaikan
// - currentTime / tradePx / tradeAmt kosong -> None (bukan 0)
//
// Validation of filled records is the engine's job; this module only fails on
// rows it cannot decode at all.
//

use rust_decimal::Decimal;
use std::{fs::File, io::Read, path::Path, str::FromStr};
use tracing::info;

use crate::domain::{FillAction, FillRecord, Side};
use crate::error::SourceError;

pub const DEFAULT_DELIMITER: u8 = b';';

const COL_TIME: &str = "currentTime";
const COL_PX: &str = "tradePx";
const COL_AMT: &str = "tradeAmt";
const COL_ACTION: &str = "action";
const COL_ORDER_ID: &str = "orderId";
const COL_PRODUCT: &str = "orderProduct";
const COL_SIDE: &str = "orderSide";

struct Columns {
    time: usize,
    px: usize,
    amt: usize,
    action: usize,
    order_id: usize,
    product: usize,
    side: usize,
}

impl Columns {
    fn locate(headers: &csv::StringRecord) -> Result<Self, SourceError> {
        let find = |name: &'static str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or(SourceError::MissingHeader(name))
        };
        Ok(Columns {
            time: find(COL_TIME)?,
            px: find(COL_PX)?,
            amt: find(COL_AMT)?,
            action: find(COL_ACTION)?,
            order_id: find(COL_ORDER_ID)?,
            product: find(COL_PRODUCT)?,
            side: find(COL_SIDE)?,
        })
    }
}

/// Empty -> `None`; anything else must parse as `T`.
fn optional<T: FromStr>(raw: &str, row: usize, field: &'static str) -> Result<Option<T>, SourceError> {
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<T>()
        .map(Some)
        .map_err(|_| SourceError::ParseField { row, field, raw: raw.to_string() })
}

fn price(raw: &str, row: usize) -> Result<Option<Decimal>, SourceError> {
    if raw.is_empty() {
        return Ok(None);
    }
    // terima juga notasi ilmiah (1e2) yang kadang muncul di log
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .map(Some)
        .map_err(|_| SourceError::ParseField { row, field: COL_PX, raw: raw.to_string() })
}

/// Reads an entire fill log into memory, in file order.
pub struct CsvFillSource<R: Read> {
    reader: csv::Reader<R>,
}

impl CsvFillSource<File> {
    pub fn from_path<P: AsRef<Path>>(path: P, delimiter: u8) -> Result<Self, SourceError> {
        let file = File::open(path.as_ref()).map_err(csv::Error::from)?;
        info!(path = %path.as_ref().display(), "source: opened fill log");
        Ok(Self::from_reader(file, delimiter))
    }
}

impl<R: Read> CsvFillSource<R> {
    pub fn from_reader(rdr: R, delimiter: u8) -> Self {
        let reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(rdr);
        Self { reader }
    }

    pub fn read_all(mut self) -> Result<Vec<FillRecord>, SourceError> {
        let cols = Columns::locate(self.reader.headers()?)?;
        let mut out = Vec::new();
        for (i, result) in self.reader.records().enumerate() {
            let rec = result?;
            // row 1 = baris pertama setelah header
            let row = i + 1;
            let get = |idx: usize| rec.get(idx).unwrap_or("");
            out.push(FillRecord {
                timestamp: optional::<i64>(get(cols.time), row, COL_TIME)?,
                price: price(get(cols.px), row)?,
                quantity: optional::<i64>(get(cols.amt), row, COL_AMT)?,
                action: FillAction::parse(get(cols.action)),
                order_id: get(cols.order_id).to_string(),
                instrument: get(cols.product).to_string(),
                side: Side::parse(get(cols.side)),
            });
        }
        info!(records = out.len(), "source: fill log loaded");
        Ok(out)
    }
}
