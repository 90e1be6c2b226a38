use crate::config::DecoderConfig;
use crate::datatypes::{Alphabet, DecodedMessage, Tag, gsm7};

/// User data handed to the text decoder
#[derive(Clone, Copy, Debug)]
pub(crate) struct TextBody<'a> {
    pub data: &'a [u8],
    /// Padding bits before the first septet
    pub fill_bits: u8,
    /// Septets of text, meaningful for the 7-bit alphabet only
    pub septets: usize,
}

impl<'a> TextBody<'a> {
    pub fn new(data: &'a [u8], septets: usize) -> Self {
        Self {
            data,
            fill_bits: 0,
            septets,
        }
    }
}

/// Classify the user data by alphabet and tag the message.
///
/// Text content itself never reaches the annotation, only a marker.
pub(crate) fn decode_text(config: &DecoderConfig, message: &mut DecodedMessage, body: TextBody<'_>) {
    if body.data.is_empty() {
        message.annotation.push(Tag::NoData);
        return;
    }

    if message.compressed {
        message.annotation.push(Tag::CompressedUnsupported);
        return;
    }

    match message.alphabet {
        Alphabet::Default7Bit => {
            let budget = body.septets.min(config.max_text_septets);
            match gsm7::unpack_septets(body.data, body.fill_bits, budget) {
                Some(text) => {
                    tracing::trace!(chars = text.chars().count(), "decoded 7-bit text");
                    message.annotation.push(Tag::Text7Bit);
                }
                None => message.annotation.push(Tag::DecodeFailed),
            }
        }
        Alphabet::Ucs2 => message.annotation.push(Tag::Text16Bit),
        Alphabet::Data8Bit | Alphabet::Unknown => {
            if config.is_ota_indicator(message.protocol_id, message.dcs_raw) {
                message.is_ota_envelope = true;
                message.annotation.push(Tag::Ota);
            }
            message.annotation.push(Tag::Data8Bit);
        }
    }
}
