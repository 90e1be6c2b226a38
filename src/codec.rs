// SMS signalling codec - bounded readers and the rejection taxonomy
//
// Every layer of the decoder reads through the helpers in this module. A read
// never advances past the end of the slice it was handed; running short is
// reported as `DecodeError::TruncatedInput` naming the layer that ran out.

use crate::datatypes::Direction;
use bytes::Buf;
use std::io::Cursor;
use thiserror::Error;

/// Protocol layer a rejection was raised in
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Layer {
    Connection,
    Relay,
    Transfer,
    UserDataHeader,
    Envelope,
}

impl Layer {
    pub fn name(&self) -> &'static str {
        match self {
            Layer::Connection => "CP",
            Layer::Relay => "RP",
            Layer::Transfer => "TPDU",
            Layer::UserDataHeader => "UDH",
            Layer::Envelope => "SEC",
        }
    }
}

/// Decode errors with enough context to say which check failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("{} truncated: need {needed} bytes, {available} available", .layer.name())]
    TruncatedInput {
        layer: Layer,
        needed: usize,
        available: usize,
    },

    #[error("fragment {this_fragment} exceeds declared total {total_fragments} ({reference_bits}-bit reference)")]
    InconsistentFragment {
        this_fragment: u8,
        total_fragments: u8,
        reference_bits: u8,
    },

    #[error("SMSC address present on the {direction} side of an RP-DATA")]
    MisplacedAddress { direction: Direction },

    #[error("unrecognized {} message type {value:#04x}", .layer.name())]
    UnrecognizedType { layer: Layer, value: u8 },

    #[error("UDH element {iei:#04x} has length {actual}, expected {expected}")]
    InvalidElementLength { iei: u8, expected: usize, actual: usize },

    #[error("user data of {length} octets exceeds capacity of {capacity}")]
    Oversized { length: usize, capacity: usize },
}

impl DecodeError {
    /// Whether the error aborts the message being decoded
    pub fn is_fatal(&self) -> bool {
        !matches!(self, DecodeError::UnrecognizedType { .. })
    }

    /// Short reason code written into the session summary
    pub fn sanity_tag(&self) -> &'static str {
        match self {
            DecodeError::TruncatedInput { layer, .. } => match layer {
                Layer::Connection => "SMS_CP_LEN",
                Layer::Relay => "SMS_RP_LEN",
                Layer::Transfer => "SMS_TPDU_LEN",
                Layer::UserDataHeader => "UDH_IEI_LEN",
                Layer::Envelope => "SMS_SEC_LEN",
            },
            DecodeError::InconsistentFragment { reference_bits: 16, .. } => "SMS_FRAG_16",
            DecodeError::InconsistentFragment { .. } => "SMS_FRAG_8",
            DecodeError::MisplacedAddress { direction: Direction::FromMobile } => "SMS_SMSC_MO",
            DecodeError::MisplacedAddress { .. } => "SMS_SMSC_MT",
            DecodeError::UnrecognizedType { .. } => "SMS_TYPE",
            DecodeError::InvalidElementLength { .. } => "UDH_IEI_VLEN",
            DecodeError::Oversized { .. } => "SMS_DATA_CAP",
        }
    }
}

/// Decode a single byte
pub fn decode_u8(buf: &mut Cursor<&[u8]>, layer: Layer) -> Result<u8, DecodeError> {
    ensure_remaining(buf, 1, layer)?;
    Ok(buf.get_u8())
}

/// Decode a 16-bit big-endian integer
pub fn decode_u16(buf: &mut Cursor<&[u8]>, layer: Layer) -> Result<u16, DecodeError> {
    ensure_remaining(buf, 2, layer)?;
    Ok(buf.get_u16())
}

/// Borrow the next `len` bytes and advance past them
pub fn decode_bytes<'a>(
    buf: &mut Cursor<&'a [u8]>,
    len: usize,
    layer: Layer,
) -> Result<&'a [u8], DecodeError> {
    ensure_remaining(buf, len, layer)?;
    let start = buf.position() as usize;
    let data: &'a [u8] = *buf.get_ref();
    buf.advance(len);
    Ok(&data[start..start + len])
}

/// Decode a fixed-size byte array
pub fn decode_array<const N: usize>(
    buf: &mut Cursor<&[u8]>,
    layer: Layer,
) -> Result<[u8; N], DecodeError> {
    ensure_remaining(buf, N, layer)?;
    let mut out = [0u8; N];
    buf.copy_to_slice(&mut out);
    Ok(out)
}

/// Advance without reading
pub fn skip(buf: &mut Cursor<&[u8]>, len: usize, layer: Layer) -> Result<(), DecodeError> {
    ensure_remaining(buf, len, layer)?;
    buf.advance(len);
    Ok(())
}

/// Everything from the cursor position to the end of the slice
pub fn rest<'a>(buf: &Cursor<&'a [u8]>) -> &'a [u8] {
    let data: &'a [u8] = *buf.get_ref();
    let start = (buf.position() as usize).min(data.len());
    &data[start..]
}

fn ensure_remaining(buf: &Cursor<&[u8]>, needed: usize, layer: Layer) -> Result<(), DecodeError> {
    if buf.remaining() < needed {
        return Err(DecodeError::TruncatedInput {
            layer,
            needed,
            available: buf.remaining(),
        });
    }
    Ok(())
}
