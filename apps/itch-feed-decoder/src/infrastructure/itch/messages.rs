//! Message Type Tags
//!
//! The recognized message-type tag set. The feed is a superset: tags outside
//! this set are a normal occurrence and are skipped without error, never
//! treated as a failure.
//!
//! | Tag | Message |
//! |-----|---------|
//! | `R` | Stock directory |
//! | `L` | Market participant (market maker) state |
//! | `A` | Order add |
//! | `F` | Order add with attribution |
//! | `E` | Order executed |
//! | `C` | Order executed with price |
//! | `P` | Trade (anonymous, non-attributable) |
//! | `X` | Order cancel (partial) |
//! | `D` | Order delete (full) |
//! | `U` | Order replace |

/// A recognized message-type tag.
///
/// Dispatch over this enum is an exhaustive `match`, so adding a tag without
/// wiring its decoder fails to compile; unrecognized bytes never construct a
/// value at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageType {
    /// `R` - static per-instrument metadata.
    StockDirectory,
    /// `L` - market-maker participation state change.
    MarketParticipant,
    /// `A` - order added to the book.
    AddOrder,
    /// `F` - order added with market participant attribution.
    AddOrderAttributed,
    /// `E` - order executed, price resolved from the referenced order.
    OrderExecuted,
    /// `C` - order executed at an explicit price.
    OrderExecutedWithPrice,
    /// `P` - anonymous trade with no order reference.
    Trade,
    /// `X` - partial cancel with a quantity decrement.
    OrderCancel,
    /// `D` - full delete.
    OrderDelete,
    /// `U` - order replaced under a new order id.
    OrderReplace,
}

impl MessageType {
    /// Map a tag byte to its message type; `None` means "skip this frame".
    #[must_use]
    pub const fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            b'R' => Some(Self::StockDirectory),
            b'L' => Some(Self::MarketParticipant),
            b'A' => Some(Self::AddOrder),
            b'F' => Some(Self::AddOrderAttributed),
            b'E' => Some(Self::OrderExecuted),
            b'C' => Some(Self::OrderExecutedWithPrice),
            b'P' => Some(Self::Trade),
            b'X' => Some(Self::OrderCancel),
            b'D' => Some(Self::OrderDelete),
            b'U' => Some(Self::OrderReplace),
            _ => None,
        }
    }

    /// The wire tag byte for this message type.
    #[must_use]
    pub const fn tag(self) -> u8 {
        match self {
            Self::StockDirectory => b'R',
            Self::MarketParticipant => b'L',
            Self::AddOrder => b'A',
            Self::AddOrderAttributed => b'F',
            Self::OrderExecuted => b'E',
            Self::OrderExecutedWithPrice => b'C',
            Self::Trade => b'P',
            Self::OrderCancel => b'X',
            Self::OrderDelete => b'D',
            Self::OrderReplace => b'U',
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
