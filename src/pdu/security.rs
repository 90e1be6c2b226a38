//! GSM 03.48 security envelopes carried in OTA short messages
//!
//! Both header shapes are read field by field through the bounded cursor.
//! Selectors are rendered as tags; no key material is touched and no checksum
//! is verified. A header that ends early keeps the tags read so far and gains
//! [`Tag::EnvelopeTruncated`] instead of failing the message.

use crate::codec::{DecodeError, Layer, decode_array, decode_u8, decode_u16, skip};
use crate::datatypes::envelope::{Algorithm, CounterPolicy, IntegrityMode, KeyRole};
use crate::datatypes::{Annotation, Tag};
use bytes::Bytes;
use std::io::Cursor;

/// Offset of the checksum/signature in a response packet
pub const RESPONSE_SIGNATURE_OFFSET: usize = 13;

/// Longest checksum/signature rendered from a response packet
pub const MAX_SIGNATURE_LEN: usize = 16;

/// SPI1 bit 2: ciphering in use
const SPI1_CIPHERED: u8 = 0x04;

/// Command packet (network to SIM) header fields up to the key identifiers
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CommandHeader {
    pub packet_length: u16,
    pub header_length: u8,
    pub spi1: u8,
    pub spi2: u8,
    pub kic: u8,
    pub kid: u8,
}

impl CommandHeader {
    pub fn decode(buf: &mut Cursor<&[u8]>) -> Result<Self, DecodeError> {
        Ok(Self {
            packet_length: decode_u16(buf, Layer::Envelope)?,
            header_length: decode_u8(buf, Layer::Envelope)?,
            spi1: decode_u8(buf, Layer::Envelope)?,
            spi2: decode_u8(buf, Layer::Envelope)?,
            kic: decode_u8(buf, Layer::Envelope)?,
            kid: decode_u8(buf, Layer::Envelope)?,
        })
    }

    pub fn is_ciphered(&self) -> bool {
        self.spi1 & SPI1_CIPHERED != 0
    }

    pub fn counter_policy(&self) -> CounterPolicy {
        CounterPolicy::from_spi1(self.spi1)
    }

    pub fn integrity(&self) -> IntegrityMode {
        IntegrityMode::from_spi1(self.spi1)
    }

    /// Selector tags in header order
    fn tags(&self) -> Vec<Tag> {
        let mut tags = vec![Tag::CounterPolicy(self.counter_policy())];

        if self.is_ciphered() {
            tags.push(Tag::Ciphered(Algorithm::from_key_identifier(
                self.kic,
                KeyRole::Ciphering,
            )));
        } else {
            tags.push(Tag::NotCiphered);
        }

        let integrity = self.integrity();
        tags.push(Tag::Integrity(integrity));
        if integrity != IntegrityMode::None {
            tags.push(Tag::IntegrityAlgorithm(Algorithm::from_key_identifier(
                self.kid,
                KeyRole::Integrity,
            )));
        }

        tags
    }
}

/// Tag an outbound command packet header
pub fn decode_command_packet(data: &[u8], annotation: &mut Annotation) {
    if command_packet(data, annotation).is_err() {
        annotation.push(Tag::EnvelopeTruncated);
    }
}

fn command_packet(data: &[u8], annotation: &mut Annotation) -> Result<(), DecodeError> {
    let mut buf = Cursor::new(data);
    let header = CommandHeader::decode(&mut buf)?;
    annotation.extend(header.tags());

    let tar: [u8; 3] = decode_array(&mut buf, Layer::Envelope)?;
    annotation.push(Tag::Tar(tar));

    if header.is_ciphered() {
        let counter: [u8; 5] = decode_array(&mut buf, Layer::Envelope)?;
        annotation.push(Tag::Counter(counter));
    }

    Ok(())
}

/// Tag an inbound response packet header and its checksum/signature
pub fn decode_response_packet(data: &[u8], annotation: &mut Annotation) {
    if response_header(data, annotation).is_err() {
        annotation.push(Tag::EnvelopeTruncated);
    }

    match response_signature(data) {
        Some(signature) => annotation.push(Tag::Signature(Bytes::copy_from_slice(signature))),
        None => annotation.push(Tag::NoSignature),
    }
}

fn response_header(data: &[u8], annotation: &mut Annotation) -> Result<(), DecodeError> {
    let mut buf = Cursor::new(data);
    // RPL and RHL
    skip(&mut buf, 3, Layer::Envelope)?;

    let tar: [u8; 3] = decode_array(&mut buf, Layer::Envelope)?;
    annotation.push(Tag::Tar(tar));

    // CNTR and PCNTR
    skip(&mut buf, 6, Layer::Envelope)?;

    let status = decode_u8(&mut buf, Layer::Envelope)?;
    annotation.push(Tag::ProofOfReceipt(status));

    Ok(())
}

/// Checksum/signature bytes of a response packet: `min(16, len - 13)` when the
/// packet is longer than 13 bytes
pub fn response_signature(data: &[u8]) -> Option<&[u8]> {
    let available = data.len().checked_sub(RESPONSE_SIGNATURE_OFFSET)?;
    if available == 0 {
        return None;
    }
    let len = available.min(MAX_SIGNATURE_LEN);
    data.get(RESPONSE_SIGNATURE_OFFSET..RESPONSE_SIGNATURE_OFFSET + len)
}
