//! Message Codec
//!
//! Dispatches payloads on their type tag and decodes each recognized message
//! shape into a domain record. Decoders are pure functions over fixed byte
//! offsets; the decoder holds no state across messages beyond the frame
//! cursor.
//!
//! # Data Flow
//!
//! ```text
//! FrameReader ──> tag dispatch ──> field decoder ──> SessionClassifier ──> FeedEvent
//! ```
//!
//! [`FeedDecoder`] exposes the whole pipeline as a lazy, forward-only
//! iterator of `Result<FeedEvent, FeedError>` in strict wire order. Frame
//! errors are fatal and fuse the iterator; record errors are yielded and
//! decoding continues at the next frame boundary, so the caller decides
//! whether to continue or abort.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::records::{
    Cancellation, Execution, MarketMaker, Order, Record, RecordKind, StockDirectoryEntry,
};
use crate::domain::session::{Session, SessionClassifier};

use super::frame::{FrameError, FrameReader};
use super::messages::MessageType;
use super::wire::{DecodeError, Payload};

// =============================================================================
// Errors
// =============================================================================

/// Errors produced by the decoded event stream.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum FeedError {
    /// Stream-level framing failure. Fatal: byte alignment is unrecoverable,
    /// the whole run must abort.
    #[error(transparent)]
    Frame(#[from] FrameError),

    /// A single record failed to decode. The record is dropped; the stream
    /// continues from the next frame boundary.
    #[error("undecodable record in frame at byte {offset}: {source}")]
    Record {
        /// Byte offset of the offending frame in the input buffer.
        offset: usize,
        /// The decode failure.
        #[source]
        source: DecodeError,
    },
}

impl FeedError {
    /// Whether this error aborts the whole run regardless of caller policy.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Frame(_))
    }
}

// =============================================================================
// Events
// =============================================================================

/// A decoded record tagged with its session partition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedEvent {
    /// Session partition. Present for order, execution, and cancellation
    /// records; directory and market-maker records are not partitioned.
    pub session: Option<Session>,
    /// The decoded record.
    #[serde(flatten)]
    pub record: Record,
}

// =============================================================================
// Message Dispatch
// =============================================================================

/// Decode one payload into a record.
///
/// Returns `Ok(None)` for unrecognized tags, a normal occurrence in a
/// superset feed, never an error. A payload without even a tag byte cannot
/// be classified and is a [`DecodeError::ShortPayload`].
pub fn decode_message(payload: &[u8]) -> Result<Option<Record>, DecodeError> {
    let payload = Payload::new(payload);
    let Some(tag) = payload.tag() else {
        return Err(DecodeError::ShortPayload {
            expected: 1,
            actual: 0,
        });
    };
    let Some(message_type) = MessageType::from_tag(tag) else {
        return Ok(None);
    };

    let record = match message_type {
        MessageType::StockDirectory => Record::StockDirectory(decode_stock_directory(payload)?),
        MessageType::MarketParticipant => Record::MarketMaker(decode_market_maker(payload)?),
        MessageType::AddOrder => Record::Order(decode_order_add(payload, false)?),
        MessageType::AddOrderAttributed => Record::Order(decode_order_add(payload, true)?),
        MessageType::OrderExecuted => Record::Execution(decode_order_execute(payload, false)?),
        MessageType::OrderExecutedWithPrice => {
            Record::Execution(decode_order_execute(payload, true)?)
        }
        MessageType::Trade => Record::Execution(decode_trade(payload)?),
        MessageType::OrderCancel => Record::Cancellation(decode_order_cancel(payload)?),
        MessageType::OrderDelete => Record::Cancellation(decode_order_delete(payload)?),
        MessageType::OrderReplace => Record::Order(decode_order_replace(payload)?),
    };
    Ok(Some(record))
}

// =============================================================================
// Field Decoders
// =============================================================================

fn decode_stock_directory(payload: Payload<'_>) -> Result<StockDirectoryEntry, DecodeError> {
    Ok(StockDirectoryEntry {
        stock_id: payload.u16_at(1)?,
        name: payload.ascii_at(11..19)?,
        market_category: payload.char_at(19)?,
        financial_status_indicator: payload.char_at(20)?,
        round_lot_size: payload.u32_at(21)?,
        round_lots_only: payload.flag_at(25)?,
        issue_classification: payload.char_at(26)?,
        issue_sub_type: payload.ascii_at(27..29)?,
        authenticity: payload.char_at(29)?,
        short_sale_threshold_indicator: payload.flag_at(30)?,
        ipo_flag: payload.flag_at(31)?,
        luld_reference_price_tier: payload.char_at(32)?,
        etp_flag: payload.flag_at(33)?,
        etp_leverage_factor: payload.u32_at(34)?,
        inverse_indicator: payload.flag_at(38)?,
    })
}

fn decode_market_maker(payload: Payload<'_>) -> Result<MarketMaker, DecodeError> {
    Ok(MarketMaker {
        stock_id: payload.u16_at(1)?,
        timestamp: payload.timestamp_at(5)?,
        name: payload.ascii_at(11..15)?,
        is_primary: payload.flag_at(23)?,
        mode: payload.char_at(24)?,
        state: payload.char_at(25)?,
    })
}

fn decode_order_add(payload: Payload<'_>, attributed: bool) -> Result<Order, DecodeError> {
    Ok(Order {
        stock_id: payload.u16_at(1)?,
        timestamp: payload.timestamp_at(5)?,
        order_id: payload.u64_at(11)?,
        side: Some(payload.side_at(19)?),
        quantity: payload.u32_at(20)?,
        price: payload.price_at(32)?,
        attribution: if attributed {
            Some(payload.ascii_at(36..40)?)
        } else {
            None
        },
        prev_order: None,
    })
}

fn decode_order_execute(payload: Payload<'_>, with_price: bool) -> Result<Execution, DecodeError> {
    Ok(Execution {
        stock_id: payload.u16_at(1)?,
        timestamp: payload.timestamp_at(5)?,
        order_id: Some(payload.u64_at(11)?),
        quantity: payload.u32_at(19)?,
        // Without an explicit price the true execution price must be
        // resolved by a consumer from the referenced order.
        price: if with_price {
            Some(payload.price_at(32)?)
        } else {
            None
        },
    })
}

fn decode_trade(payload: Payload<'_>) -> Result<Execution, DecodeError> {
    Ok(Execution {
        stock_id: payload.u16_at(1)?,
        timestamp: payload.timestamp_at(5)?,
        order_id: None,
        quantity: payload.u32_at(20)?,
        price: Some(payload.price_at(32)?),
    })
}

fn decode_order_cancel(payload: Payload<'_>) -> Result<Cancellation, DecodeError> {
    Ok(Cancellation {
        stock_id: payload.u16_at(1)?,
        timestamp: payload.timestamp_at(5)?,
        order_id: payload.u64_at(11)?,
        quantity: Some(payload.u32_at(19)?),
    })
}

fn decode_order_delete(payload: Payload<'_>) -> Result<Cancellation, DecodeError> {
    Ok(Cancellation {
        stock_id: payload.u16_at(1)?,
        timestamp: payload.timestamp_at(5)?,
        order_id: payload.u64_at(11)?,
        quantity: None,
    })
}

fn decode_order_replace(payload: Payload<'_>) -> Result<Order, DecodeError> {
    let original = payload.u64_at(11)?;
    Ok(Order {
        stock_id: payload.u16_at(1)?,
        timestamp: payload.timestamp_at(5)?,
        order_id: payload.u64_at(19)?,
        // The original add is the side's source of truth downstream.
        side: None,
        quantity: payload.u32_at(27)?,
        price: payload.price_at(31)?,
        attribution: None,
        prev_order: Some(original),
    })
}

// =============================================================================
// Feed Decoder
// =============================================================================

/// Lazy decoded event stream over a feed byte buffer.
///
/// Forward-only and non-restartable: restarting means constructing a new
/// decoder over the buffer. Event order always equals wire order.
#[derive(Debug, Clone)]
pub struct FeedDecoder<'a> {
    frames: FrameReader<'a>,
    classifier: SessionClassifier,
    frames_read: u64,
    skipped: u64,
    done: bool,
}

impl<'a> FeedDecoder<'a> {
    /// Create a decoder over `feed` with the default session classifier.
    #[must_use]
    pub fn new(feed: &'a [u8]) -> Self {
        Self {
            frames: FrameReader::new(feed),
            classifier: SessionClassifier::default(),
            frames_read: 0,
            skipped: 0,
            done: false,
        }
    }

    /// Replace the session classifier.
    #[must_use]
    pub const fn with_classifier(mut self, classifier: SessionClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Frames consumed so far, recognized or not.
    #[must_use]
    pub const fn frames_read(&self) -> u64 {
        self.frames_read
    }

    /// Frames skipped so far because their tag is outside the recognized set.
    #[must_use]
    pub const fn skipped(&self) -> u64 {
        self.skipped
    }

    /// Session partition for a record, where applicable.
    fn session_for(&self, record: &Record) -> Option<Session> {
        match record.kind() {
            RecordKind::Order | RecordKind::Execution | RecordKind::Cancellation => record
                .timestamp()
                .map(|timestamp| self.classifier.classify(timestamp)),
            RecordKind::StockDirectory | RecordKind::MarketMaker => None,
        }
    }
}

impl Iterator for FeedDecoder<'_> {
    type Item = Result<FeedEvent, FeedError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            match self.frames.next()? {
                Err(frame_error) => {
                    self.done = true;
                    return Some(Err(FeedError::Frame(frame_error)));
                }
                Ok(frame) => {
                    self.frames_read += 1;
                    match decode_message(frame.payload) {
                        Ok(Some(record)) => {
                            let session = self.session_for(&record);
                            return Some(Ok(FeedEvent { session, record }));
                        }
                        Ok(None) => {
                            self.skipped += 1;
                        }
                        Err(source) => {
                            return Some(Err(FeedError::Record {
                                offset: frame.offset,
                                source,
                            }));
                        }
                    }
                }
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::records::{Side, Timestamp};
    use rust_decimal_macros::dec;

    fn payload(len: usize, tag: u8) -> Vec<u8> {
        let mut bytes = vec![0u8; len];
        bytes[0] = tag;
        bytes
    }

    fn put(bytes: &mut [u8], at: usize, field: &[u8]) {
        bytes[at..at + field.len()].copy_from_slice(field);
    }

    fn put_timestamp(bytes: &mut [u8], nanos: u64) {
        put(bytes, 5, &nanos.to_be_bytes()[2..]);
    }

    fn add_order_payload() -> Vec<u8> {
        let mut bytes = payload(36, b'A');
        put(&mut bytes, 1, &7u16.to_be_bytes());
        put_timestamp(&mut bytes, 34_199_000_000_000);
        put(&mut bytes, 11, &42u64.to_be_bytes());
        bytes[19] = b'B';
        put(&mut bytes, 20, &100u32.to_be_bytes());
        put(&mut bytes, 32, &1_234_500u32.to_be_bytes());
        bytes
    }

    #[test]
    fn decodes_order_add() {
        let record = decode_message(&add_order_payload()).unwrap().unwrap();
        assert_eq!(
            record,
            Record::Order(Order {
                stock_id: 7,
                timestamp: Timestamp::from_nanos(34_199_000_000_000),
                order_id: 42,
                side: Some(Side::Buy),
                quantity: 100,
                price: dec!(123.4500),
                attribution: None,
                prev_order: None,
            })
        );
    }

    #[test]
    fn decodes_attributed_order_add() {
        let mut bytes = add_order_payload();
        bytes[0] = b'F';
        bytes.extend_from_slice(b"MPID");

        let Record::Order(order) = decode_message(&bytes).unwrap().unwrap() else {
            panic!("expected an order record");
        };
        assert_eq!(order.attribution.as_deref(), Some("MPID"));
    }

    #[test]
    fn rejects_invalid_side() {
        let mut bytes = add_order_payload();
        bytes[19] = b'X';
        assert_eq!(
            decode_message(&bytes),
            Err(DecodeError::InvalidSide { byte: b'X' })
        );
    }

    #[test]
    fn rejects_short_add_payload() {
        let bytes = &add_order_payload()[..24];
        assert_eq!(
            decode_message(bytes),
            Err(DecodeError::ShortPayload {
                expected: 36,
                actual: 24,
            })
        );
    }

    #[test]
    fn decodes_execute_without_price() {
        let mut bytes = payload(31, b'E');
        put(&mut bytes, 1, &3u16.to_be_bytes());
        put_timestamp(&mut bytes, 50_000_000_000_000);
        put(&mut bytes, 11, &42u64.to_be_bytes());
        put(&mut bytes, 19, &25u32.to_be_bytes());

        let record = decode_message(&bytes).unwrap().unwrap();
        assert_eq!(
            record,
            Record::Execution(Execution {
                timestamp: Timestamp::from_nanos(50_000_000_000_000),
                order_id: Some(42),
                stock_id: 3,
                quantity: 25,
                price: None,
            })
        );
    }

    #[test]
    fn decodes_execute_with_price() {
        let mut bytes = payload(36, b'C');
        put(&mut bytes, 1, &3u16.to_be_bytes());
        put_timestamp(&mut bytes, 1);
        put(&mut bytes, 11, &42u64.to_be_bytes());
        put(&mut bytes, 19, &25u32.to_be_bytes());
        put(&mut bytes, 32, &10_000u32.to_be_bytes());

        let Record::Execution(execution) = decode_message(&bytes).unwrap().unwrap() else {
            panic!("expected an execution record");
        };
        assert_eq!(execution.price, Some(dec!(1.0000)));
    }

    #[test]
    fn decodes_anonymous_trade() {
        let mut bytes = payload(44, b'P');
        put(&mut bytes, 1, &9u16.to_be_bytes());
        put_timestamp(&mut bytes, 1);
        put(&mut bytes, 20, &500u32.to_be_bytes());
        put(&mut bytes, 32, &250_000u32.to_be_bytes());

        let Record::Execution(trade) = decode_message(&bytes).unwrap().unwrap() else {
            panic!("expected an execution record");
        };
        assert_eq!(trade.order_id, None);
        assert_eq!(trade.quantity, 500);
        assert_eq!(trade.price, Some(dec!(25.0000)));
    }

    #[test]
    fn decodes_partial_cancel_and_full_delete() {
        let mut cancel = payload(23, b'X');
        put(&mut cancel, 1, &5u16.to_be_bytes());
        put_timestamp(&mut cancel, 2);
        put(&mut cancel, 11, &77u64.to_be_bytes());
        put(&mut cancel, 19, &10u32.to_be_bytes());

        let Record::Cancellation(partial) = decode_message(&cancel).unwrap().unwrap() else {
            panic!("expected a cancellation record");
        };
        assert_eq!(partial.quantity, Some(10));

        let mut delete = payload(19, b'D');
        put(&mut delete, 1, &5u16.to_be_bytes());
        put_timestamp(&mut delete, 2);
        put(&mut delete, 11, &77u64.to_be_bytes());

        let Record::Cancellation(full) = decode_message(&delete).unwrap().unwrap() else {
            panic!("expected a cancellation record");
        };
        assert_eq!(full.quantity, None);
        assert_eq!(full.order_id, 77);
    }

    #[test]
    fn replace_links_new_id_to_original() {
        let mut bytes = payload(35, b'U');
        put(&mut bytes, 1, &5u16.to_be_bytes());
        put_timestamp(&mut bytes, 3);
        put(&mut bytes, 11, &100u64.to_be_bytes());
        put(&mut bytes, 19, &101u64.to_be_bytes());
        put(&mut bytes, 27, &60u32.to_be_bytes());
        put(&mut bytes, 31, &999_900u32.to_be_bytes());

        let Record::Order(order) = decode_message(&bytes).unwrap().unwrap() else {
            panic!("expected an order record");
        };
        assert_eq!(order.order_id, 101);
        assert_eq!(order.prev_order, Some(100));
        assert_eq!(order.side, None);
        assert_eq!(order.quantity, 60);
        assert_eq!(order.price, dec!(99.9900));
    }

    #[test]
    fn decodes_stock_directory() {
        let mut bytes = payload(39, b'R');
        put(&mut bytes, 1, &7u16.to_be_bytes());
        put(&mut bytes, 11, b"AAPL    ");
        bytes[19] = b'Q';
        bytes[20] = b'N';
        put(&mut bytes, 21, &100u32.to_be_bytes());
        bytes[25] = b'N';
        bytes[26] = b'C';
        put(&mut bytes, 27, b"Z ");
        bytes[29] = b'P';
        bytes[30] = b'N';
        bytes[31] = b'N';
        bytes[32] = b'1';
        bytes[33] = b'Y';
        put(&mut bytes, 34, &2u32.to_be_bytes());
        bytes[38] = b'Y';

        let record = decode_message(&bytes).unwrap().unwrap();
        assert_eq!(
            record,
            Record::StockDirectory(StockDirectoryEntry {
                stock_id: 7,
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
                etp_flag: true,
                etp_leverage_factor: 2,
                inverse_indicator: true,
            })
        );
    }

    #[test]
    fn decodes_market_maker() {
        let mut bytes = payload(26, b'L');
        put(&mut bytes, 1, &7u16.to_be_bytes());
        put_timestamp(&mut bytes, 9);
        put(&mut bytes, 11, b"VIRT");
        bytes[23] = b'Y';
        bytes[24] = b'N';
        bytes[25] = b'A';

        let record = decode_message(&bytes).unwrap().unwrap();
        assert_eq!(
            record,
            Record::MarketMaker(MarketMaker {
                timestamp: Timestamp::from_nanos(9),
                stock_id: 7,
                name: "VIRT".to_string(),
                is_primary: true,
                mode: 'N',
                state: 'A',
            })
        );
    }

    #[test]
    fn unknown_tag_yields_no_record() {
        let bytes = payload(12, b'S');
        assert_eq!(decode_message(&bytes), Ok(None));
    }

    #[test]
    fn empty_payload_has_no_tag() {
        assert_eq!(
            decode_message(&[]),
            Err(DecodeError::ShortPayload {
                expected: 1,
                actual: 0,
            })
        );
    }

    // -------------------------------------------------------------------------
    // FeedDecoder
    // -------------------------------------------------------------------------

    fn frame(payload: &[u8]) -> Vec<u8> {
        let mut bytes = (payload.len() as u16).to_be_bytes().to_vec();
        bytes.extend_from_slice(payload);
        bytes
    }

    #[test]
    fn stream_classifies_and_skips() {
        let mut feed = frame(&add_order_payload()); // timestamp before the open
        feed.extend_from_slice(&frame(&payload(12, b'S'))); // unrecognized
        let mut after_open = add_order_payload();
        put_timestamp(&mut after_open, SessionClassifier::REGULAR_OPEN_NS);
        feed.extend_from_slice(&frame(&after_open));

        let mut decoder = FeedDecoder::new(&feed);
        let events: Vec<_> = decoder.by_ref().collect::<Result<_, _>>().unwrap();

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].session, Some(Session::PreMarket));
        assert_eq!(events[1].session, Some(Session::RegularMarket));
        assert_eq!(decoder.frames_read(), 3);
        assert_eq!(decoder.skipped(), 1);
    }

    #[test]
    fn directory_and_market_maker_are_not_partitioned() {
        let mut directory = payload(39, b'R');
        put(&mut directory, 11, b"AAPL    ");
        for at in [19, 20, 25, 26, 29, 30, 31, 32, 33] {
            directory[at] = b'N';
        }
        put(&mut directory, 27, b"  ");
        let feed = frame(&directory);

        let events: Vec<_> = FeedDecoder::new(&feed).collect::<Result<_, _>>().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].session, None);
    }

    #[test]
    fn record_error_does_not_stop_the_stream() {
        let mut bad = add_order_payload();
        bad[19] = b'Q';
        let mut feed = frame(&bad);
        feed.extend_from_slice(&frame(&add_order_payload()));

        let mut decoder = FeedDecoder::new(&feed);
        assert_eq!(
            decoder.next(),
            Some(Err(FeedError::Record {
                offset: 0,
                source: DecodeError::InvalidSide { byte: b'Q' },
            }))
        );
        assert!(decoder.next().is_some_and(|item| item.is_ok()));
        assert_eq!(decoder.next(), None);
    }

    #[test]
    fn frame_error_is_fatal_and_fuses() {
        let mut feed = frame(&add_order_payload());
        // Final frame declares more bytes than remain.
        feed.extend_from_slice(&200u16.to_be_bytes());
        feed.extend_from_slice(&[0u8; 4]);
        let prior_len = feed.len() - 6;

        let mut decoder = FeedDecoder::new(&feed);
        assert!(decoder.next().is_some_and(|item| item.is_ok()));
        let error = decoder.next().unwrap().unwrap_err();
        assert!(error.is_fatal());
        assert_eq!(
            error,
            FeedError::Frame(FrameError::Truncated {
                offset: prior_len,
                needed: 200,
                available: 4,
            })
        );
        assert_eq!(decoder.next(), None);
    }

    #[test]
    fn event_json_carries_kind_and_session() {
        let feed = frame(&add_order_payload());
        let events: Vec<_> = FeedDecoder::new(&feed).collect::<Result<_, _>>().unwrap();
        let json = serde_json::to_string(&events[0]).unwrap();
        assert!(json.contains(r#""session":"pre_market""#));
        assert!(json.contains(r#""kind":"order""#));
        assert!(json.contains(r#""price":"123.4500""#));
    }
}
