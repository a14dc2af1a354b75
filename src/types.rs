use serde::{Deserialize, Serialize};

/// Column order of every sink row.
pub const SINK_HEADER: &str = "receive_ts;exchange_ts;price;quantity;side";

/// Field delimiter used by the sink format.
pub const SINK_DELIMITER: char = ';';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side { Bid, Ask }

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Bid => "bid",
            Side::Ask => "ask",
        }
    }

    pub fn parse(s: &str) -> Option<Side> {
        match s {
            "bid" => Some(Side::Bid),
            "ask" => Some(Side::Ask),
            _ => None,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "{}", self.as_str()) }
}

/// One synthetic order. Built once per surviving level, serialized to the
/// sink, then discarded. Price and quantity are kept in their serialized
/// 8-fractional-digit form so a row round-trips byte-for-byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRecord {
    /// Arrival timestamp, microseconds
    pub receive_ts: u64,
    /// Exchange timestamp, microseconds, shared by the whole batch
    pub exchange_ts: u64,
    pub price: String,
    pub quantity: String,
    pub side: Side,
}

impl OrderRecord {
    pub fn new(receive_ts: u64, exchange_ts: u64, price: f64, quantity: f64, side: Side) -> Self {
        Self {
            receive_ts,
            exchange_ts,
            price: format!("{price:.8}"),
            quantity: format!("{quantity:.8}"),
            side,
        }
    }

    /// Serialize to one sink row (without the trailing newline).
    pub fn to_row(&self) -> String {
        format!(
            "{}{d}{}{d}{}{d}{}{d}{}",
            self.receive_ts,
            self.exchange_ts,
            self.price,
            self.quantity,
            self.side,
            d = SINK_DELIMITER,
        )
    }

    /// Parse one sink row back into a record. Returns `None` for rows that
    /// do not have exactly five fields, valid integer timestamps, and a
    /// known side.
    pub fn parse_row(row: &str) -> Option<Self> {
        let mut fields = row.split(SINK_DELIMITER);
        let receive_ts = fields.next()?.parse().ok()?;
        let exchange_ts = fields.next()?.parse().ok()?;
        let price = fields.next()?.to_string();
        let quantity = fields.next()?.to_string();
        let side = Side::parse(fields.next()?)?;
        if fields.next().is_some() {
            return None;
        }
        Some(Self { receive_ts, exchange_ts, price, quantity, side })
    }
}
