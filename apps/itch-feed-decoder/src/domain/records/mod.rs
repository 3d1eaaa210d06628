//! Decoded Feed Records
//!
//! Canonical record types produced by the feed decoder. Each wire message
//! yields exactly one independent record; the decoder performs no
//! book-keeping or matching, and records are immutable once emitted.
//!
//! Field presence is encoded by shape: a field that a message variant does
//! not carry is an `Option` that is `None` for that variant, never a
//! sentinel value. `Order::side` is `None` exactly for replacements (the
//! original add message is the side's source of truth downstream), and
//! `Order::prev_order` is `Some` exactly for replacements.

use chrono::NaiveTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Nanoseconds in one second.
const NANOS_PER_SEC: u64 = 1_000_000_000;

// =============================================================================
// Timestamp
// =============================================================================

/// A feed timestamp: nanoseconds elapsed since midnight of the trading day.
///
/// The wire carries 48 bits; no date is recoverable, so only time-of-day
/// comparisons are meaningful. Ordering follows the raw nanosecond count.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Create a timestamp from nanoseconds since midnight.
    #[must_use]
    pub const fn from_nanos(nanos: u64) -> Self {
        Self(nanos)
    }

    /// Nanoseconds since midnight.
    #[must_use]
    pub const fn as_nanos(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let secs = self.0 / NANOS_PER_SEC;
        let frac = (self.0 % NANOS_PER_SEC) as u32;
        match u32::try_from(secs)
            .ok()
            .and_then(|s| NaiveTime::from_num_seconds_from_midnight_opt(s, frac))
        {
            Some(time) => write!(f, "{}", time.format("%H:%M:%S%.9f")),
            // Past 24:00:00 the value is not a valid time of day; show raw.
            None => write!(f, "{}ns", self.0),
        }
    }
}

// =============================================================================
// Side
// =============================================================================

/// Order side as carried by add messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Side {
    /// Buy order.
    Buy,
    /// Sell order.
    Sell,
}

impl Side {
    /// Canonical string form ("BUY" / "SELL").
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
        }
    }
}

// =============================================================================
// Record Types
// =============================================================================

/// An order added to or replaced on the book.
///
/// Emitted for add, attributed add, and replace messages. A replacement
/// carries `prev_order = Some(original id)` and `side = None`; the decoder
/// does not validate that `prev_order` refers to a previously seen order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Instrument identifier (stock locate).
    pub stock_id: u16,
    /// Time the message was generated.
    pub timestamp: Timestamp,
    /// Order reference number. Unique at creation within a session, but the
    /// matching engine may reuse it after a full delete.
    pub order_id: u64,
    /// Buy or sell. `None` for replace messages.
    pub side: Option<Side>,
    /// Displayed quantity in shares.
    pub quantity: u32,
    /// Limit price (4 implied decimal places on the wire).
    pub price: Decimal,
    /// Market participant attribution. Only attributed adds carry one.
    pub attribution: Option<String>,
    /// Order id this order replaces. `Some` only for replacements.
    pub prev_order: Option<u64>,
}

/// An execution against a resting order, or an anonymous trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Execution {
    /// Time the message was generated.
    pub timestamp: Timestamp,
    /// Executed order reference. `None` for anonymous trade messages.
    pub order_id: Option<u64>,
    /// Instrument identifier.
    pub stock_id: u16,
    /// Executed quantity in shares.
    pub quantity: u32,
    /// Execution price. `None` when the wire message carries no price; the
    /// true price must then be resolved downstream from the referenced order.
    pub price: Option<Decimal>,
}

/// A partial cancel or full delete of a resting order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cancellation {
    /// Time the message was generated.
    pub timestamp: Timestamp,
    /// Cancelled order reference.
    pub order_id: u64,
    /// Instrument identifier.
    pub stock_id: u16,
    /// Shares removed by a partial cancel. `None` for a full delete.
    pub quantity: Option<u32>,
}

/// Static per-instrument metadata, emitted once per instrument early in the
/// feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockDirectoryEntry {
    /// Instrument identifier every later record resolves against.
    pub stock_id: u16,
    /// Instrument symbol, right-trimmed of padding.
    pub name: String,
    /// Listing market category code.
    pub market_category: char,
    /// Financial status indicator code.
    pub financial_status_indicator: char,
    /// Number of shares in a round lot.
    pub round_lot_size: u32,
    /// Whether only round-lot orders are accepted.
    pub round_lots_only: bool,
    /// Issue classification code.
    pub issue_classification: char,
    /// Issue sub-type code (two characters).
    pub issue_sub_type: String,
    /// Authenticity code (live vs test issue).
    pub authenticity: char,
    /// Whether the instrument is on the short-sale threshold list.
    pub short_sale_threshold_indicator: bool,
    /// Whether the instrument is in its IPO quotation window.
    pub ipo_flag: bool,
    /// Limit Up / Limit Down reference price tier code.
    pub luld_reference_price_tier: char,
    /// Whether the instrument is an exchange-traded product.
    pub etp_flag: bool,
    /// ETP leverage multiplier.
    pub etp_leverage_factor: u32,
    /// Whether the ETP tracks its index inversely.
    pub inverse_indicator: bool,
}

/// A market-maker participation state change.
///
/// A point-in-time assignment fact, not a mutable entity; each message is a
/// new record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketMaker {
    /// Time the message was generated.
    pub timestamp: Timestamp,
    /// Instrument identifier.
    pub stock_id: u16,
    /// Market participant identifier, right-trimmed of padding.
    pub name: String,
    /// Whether this participant is the primary market maker.
    pub is_primary: bool,
    /// Market-making mode code.
    pub mode: char,
    /// Market participant state code.
    pub state: char,
}

// =============================================================================
// Record Sum Type
// =============================================================================

/// The kind of a decoded record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    /// Order add or replace.
    Order,
    /// Execution or anonymous trade.
    Execution,
    /// Partial cancel or full delete.
    Cancellation,
    /// Stock directory entry.
    StockDirectory,
    /// Market-maker state change.
    MarketMaker,
}

impl RecordKind {
    /// Stable lowercase name, used in logs and summaries.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Order => "order",
            Self::Execution => "execution",
            Self::Cancellation => "cancellation",
            Self::StockDirectory => "stock_directory",
            Self::MarketMaker => "market_maker",
        }
    }
}

/// A decoded record of any kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Record {
    /// Order add or replace.
    Order(Order),
    /// Execution or anonymous trade.
    Execution(Execution),
    /// Partial cancel or full delete.
    Cancellation(Cancellation),
    /// Stock directory entry.
    StockDirectory(StockDirectoryEntry),
    /// Market-maker state change.
    MarketMaker(MarketMaker),
}

impl Record {
    /// The kind tag of this record.
    #[must_use]
    pub const fn kind(&self) -> RecordKind {
        match self {
            Self::Order(_) => RecordKind::Order,
            Self::Execution(_) => RecordKind::Execution,
            Self::Cancellation(_) => RecordKind::Cancellation,
            Self::StockDirectory(_) => RecordKind::StockDirectory,
            Self::MarketMaker(_) => RecordKind::MarketMaker,
        }
    }

    /// The record's timestamp, if its message shape carries one.
    ///
    /// Directory entries are static metadata and have no timestamp.
    #[must_use]
    pub const fn timestamp(&self) -> Option<Timestamp> {
        match self {
            Self::Order(o) => Some(o.timestamp),
            Self::Execution(e) => Some(e.timestamp),
            Self::Cancellation(c) => Some(c.timestamp),
            Self::StockDirectory(_) => None,
            Self::MarketMaker(m) => Some(m.timestamp),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn timestamp_displays_time_of_day() {
        // 09:30:00 plus 123ns.
        let ts = Timestamp::from_nanos(34_200_000_000_123);
        assert_eq!(ts.to_string(), "09:30:00.000000123");
    }

    #[test]
    fn timestamp_past_midnight_falls_back_to_raw() {
        let ts = Timestamp::from_nanos(90_000_000_000_000);
        assert_eq!(ts.to_string(), "90000000000000ns");
    }

    #[test]
    fn timestamp_ordering_is_nanosecond_ordering() {
        assert!(Timestamp::from_nanos(1) < Timestamp::from_nanos(2));
    }

    #[test]
    fn side_as_str() {
        assert_eq!(Side::Buy.as_str(), "BUY");
        assert_eq!(Side::Sell.as_str(), "SELL");
    }

    #[test]
    fn record_kind_and_timestamp() {
        let record = Record::Execution(Execution {
            timestamp: Timestamp::from_nanos(42),
            order_id: Some(7),
            stock_id: 1,
            quantity: 100,
            price: Some(dec!(12.3400)),
        });
        assert_eq!(record.kind(), RecordKind::Execution);
        assert_eq!(record.timestamp(), Some(Timestamp::from_nanos(42)));
    }

    #[test]
    fn directory_record_has_no_timestamp() {
        let record = Record::StockDirectory(StockDirectoryEntry {
            stock_id: 1,
            name: "AAPL".to_string(),
            market_category: 'Q',
            financial_status_indicator: 'N',
            round_lot_size: 100,
            round_lots_only: false,
            issue_classification: 'C',
            issue_sub_type: "Z".to_string(),
            authenticity: 'P',
            short_sale_threshold_indicator: false,
            ipo_flag: false,
            luld_reference_price_tier: '1',
            etp_flag: false,
            etp_leverage_factor: 0,
            inverse_indicator: false,
        });
        assert_eq!(record.timestamp(), None);
        assert_eq!(record.kind(), RecordKind::StockDirectory);
    }

    #[test]
    fn record_serializes_with_kind_tag() {
        let record = Record::Cancellation(Cancellation {
            timestamp: Timestamp::from_nanos(1),
            order_id: 9,
            stock_id: 2,
            quantity: None,
        });
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains(r#""kind":"cancellation""#));
        assert!(json.contains(r#""quantity":null"#));
    }
}
