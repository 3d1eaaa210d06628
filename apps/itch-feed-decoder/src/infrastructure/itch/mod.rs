//! ITCH Wire-Format Adapter
//!
//! Decodes the length-prefixed binary feed into domain records.
//!
//! - `frame`: walks the byte buffer, extracting `(offset, payload)` frames
//!   without interpreting payload contents.
//! - `messages`: the recognized message-type tag set.
//! - `wire`: shared fixed-offset field decoding helpers (big-endian integers,
//!   fixed-width ASCII, flags, fixed-point prices).
//! - `codec`: per-message field decoders, tag dispatch, and the lazy decoded
//!   event stream.

pub mod codec;
pub mod frame;
pub mod messages;
pub mod wire;

pub use codec::{FeedDecoder, FeedError, FeedEvent, decode_message};
pub use frame::{Frame, FrameError, FrameReader};
pub use messages::MessageType;
pub use wire::DecodeError;
