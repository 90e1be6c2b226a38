// ABOUTME: Decoded SMS metadata record and the ordered trace of decoding decisions attached to it
// ABOUTME: Tags stay structured until rendered at the export or logging boundary

use crate::datatypes::envelope::{Algorithm, CounterPolicy, IntegrityMode};
use crate::datatypes::{Alphabet, Direction, HexData, MessageClass};
use bytes::Bytes;
use std::fmt;

/// Sentinel for a message seen without an SMSC address
pub const NO_ADDRESS: &str = "<NO ADDRESS>";

/// One decoding decision
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Tag {
    /// Concatenated fragment `this` of `total`
    Fragment { this: u8, total: u8 },
    /// 8-bit application port pair
    Port8 { destination: u8, source: u8 },
    /// 16-bit application port pair
    Port16 { destination: u16, source: u16 },
    ReplyAddress(String),
    LanguageShift(u8),
    /// SIM toolkit / OTA content detected
    Ota,
    CounterPolicy(CounterPolicy),
    Ciphered(Algorithm),
    NotCiphered,
    Integrity(IntegrityMode),
    IntegrityAlgorithm(Algorithm),
    Tar([u8; 3]),
    Counter([u8; 5]),
    ProofOfReceipt(u8),
    /// Cryptographic checksum or signature, as opaque bytes
    Signature(Bytes),
    NoSignature,
    /// Security header ended before all fields were read
    EnvelopeTruncated,
    NoData,
    CompressedUnsupported,
    Text7Bit,
    DecodeFailed,
    Text16Bit,
    Data8Bit,
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tag::Fragment { this, total } => write!(f, "[{this}/{total}]"),
            Tag::Port8 {
                destination,
                source,
            } => write!(f, "PORT8 {source}->{destination}"),
            // 16-bit pairs print in wire order, unlike 8-bit ones
            Tag::Port16 {
                destination,
                source,
            } => write!(f, "PORT16 {destination}->{source}"),
            Tag::ReplyAddress(address) => write!(f, "REPLY_ADDR={address}"),
            Tag::LanguageShift(shift) => write!(f, "LANG_SHIFT={shift}"),
            Tag::Ota => f.write_str("OTA"),
            Tag::CounterPolicy(policy) => write!(f, "{policy}"),
            Tag::Ciphered(algorithm) => write!(f, "ENC {algorithm}"),
            Tag::NotCiphered => f.write_str("NOENC"),
            Tag::Integrity(mode) => write!(f, "{mode}"),
            Tag::IntegrityAlgorithm(algorithm) => write!(f, "{algorithm}"),
            Tag::Tar(tar) => write!(f, "TAR {}", HexData(tar)),
            Tag::Counter(counter) => write!(f, "CNTR {}", HexData(counter)),
            Tag::ProofOfReceipt(status) => write!(f, "POR {status:02X}"),
            Tag::Signature(signature) => write!(f, "CC {}", HexData(signature)),
            Tag::NoSignature => f.write_str("CC --"),
            Tag::EnvelopeTruncated => f.write_str("SEC_TRUNCATED"),
            Tag::NoData => f.write_str("<NO DATA>"),
            Tag::CompressedUnsupported => f.write_str("<COMPRESSED DATA>"),
            Tag::Text7Bit => f.write_str("TEXT_7BIT"),
            Tag::DecodeFailed => f.write_str("<FAILED TO DECODE TEXT>"),
            Tag::Text16Bit => f.write_str("TEXT_16BIT"),
            Tag::Data8Bit => f.write_str("DATA_8BIT"),
        }
    }
}

/// Append-only, ordered trace of decoding decisions
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Annotation {
    tags: Vec<Tag>,
}

impl Annotation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, tag: Tag) {
        self.tags.push(tag);
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn contains(&self, tag: &Tag) -> bool {
        self.tags.contains(tag)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

impl Extend<Tag> for Annotation {
    fn extend<I: IntoIterator<Item = Tag>>(&mut self, iter: I) {
        self.tags.extend(iter);
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, tag) in self.tags.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{tag}")?;
        }
        Ok(())
    }
}

/// Metadata for one successfully parsed TPDU.
///
/// Created by the transfer-layer decoder and handed to the session, which
/// assigns `sequence` on insertion. Nothing mutates a message afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedMessage {
    pub sequence: u32,
    pub direction: Direction,
    /// Sender for SMS-DELIVER, recipient for SMS-SUBMIT
    pub peer_address: String,
    pub smsc_address: Option<String>,
    pub protocol_id: u8,
    pub dcs_raw: u8,
    pub alphabet: Alphabet,
    pub compressed: bool,
    pub message_class: MessageClass,
    pub has_user_data_header: bool,
    pub is_concatenated_fragment: bool,
    pub is_ota_envelope: bool,
    /// TP-UDL as declared: septets for 7-bit text, octets otherwise
    pub user_data_length: u8,
    pub raw_user_data: Bytes,
    pub annotation: Annotation,
}

impl DecodedMessage {
    pub fn is_from_network(&self) -> bool {
        self.direction == Direction::FromNetwork
    }

    /// SMSC address, or the no-address sentinel
    pub fn smsc_display(&self) -> &str {
        self.smsc_address.as_deref().unwrap_or(NO_ADDRESS)
    }
}
