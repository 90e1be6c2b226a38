//! Metadata extraction from GSM SMS signalling captured on the air interface.
//!
//! A DTAP message carrying SMS is decoded layer by layer: the connection
//! protocol (CP), the relay protocol (RP), the transfer protocol data unit
//! (TPDU) with its optional user data header (UDH), and finally either a
//! GSM 03.48 security envelope (OTA) or a text/data classification. Each
//! accepted short message becomes a [`DecodedMessage`] on the capture's
//! [`Session`], ready to be exported with [`to_insert_statement`].
//!
//! Malformed input never panics and never reads outside the frame: a failed
//! check rejects only the message being decoded and is reported as a
//! [`DecodeError`].
//!
//! # Examples
//!
//! ```rust
//! use smsmeta::{Decoder, DecoderConfig, Dispatch, Session, to_insert_statement};
//!
//! // CP-DATA / RP-DATA (network to mobile) / SMS-DELIVER "hello"
//! let dtap = [
//!     0x09, 0x01, 0x23, // CP header, CP-User-Data length
//!     0x01, 0x07, // RP-DATA MT, reference
//!     0x06, 0x91, 0x94, 0x71, 0x01, 0x67, 0xF0, // originator (SMSC)
//!     0x00, // no destination
//!     0x18, // TPDU length
//!     0x04, 0x0B, 0x91, 0x94, 0x71, 0x12, 0x32, 0x54, 0xF6, 0x00, 0x00,
//!     0x52, 0x10, 0x81, 0x21, 0x43, 0x65, 0x80,
//!     0x05, 0xE8, 0x32, 0x9B, 0xFD, 0x06,
//! ];
//!
//! let decoder = Decoder::new(DecoderConfig::default());
//! let mut session = Session::new(1);
//!
//! let dispatch = decoder.decode_sms(&mut session, &dtap)?;
//! assert_eq!(dispatch, Dispatch::Message { sequence: 0 });
//! assert_eq!(session.summary(), "SMS RP-DATA-DELIVER, FROM +49172123456");
//!
//! let message = session.latest().unwrap();
//! assert_eq!(message.smsc_display(), "+491710760");
//! assert!(to_insert_statement(session.id(), message).starts_with("INSERT INTO sms_meta"));
//! # Ok::<(), smsmeta::DecodeError>(())
//! ```

pub mod codec;
pub mod config;
pub mod datatypes;
pub mod export;
pub mod pdu;
pub mod session;

#[cfg(test)]
mod tests;

pub use codec::{DecodeError, Layer};
pub use config::DecoderConfig;
pub use datatypes::{
    Alphabet, Annotation, DecodedMessage, Direction, MessageClass, Tag, classify_alphabet,
    classify_class, decode_address, unpack_septets,
};
pub use export::to_insert_statement;
pub use pdu::{Decoder, Dispatch};
pub use session::{Session, SessionFlags};
