// ABOUTME: GSM 03.40 user data header walk: concatenation, ports, reply address, OTA markers
// ABOUTME: Chooses between the security envelope and the text decoder once the header is consumed

use crate::codec::{DecodeError, Layer, decode_bytes, decode_u8};
use crate::config::DecoderConfig;
use crate::datatypes::{AddressLength, Alphabet, DecodedMessage, HexData, Tag, decode_address, gsm7};
use crate::pdu::security;
use crate::pdu::text::{TextBody, decode_text};
use num_enum::TryFromPrimitive;
use std::io::Cursor;

/// Information element identifiers the header walk understands
#[derive(TryFromPrimitive)]
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InformationElement {
    /// Concatenated message, 8-bit reference
    Concatenated8 = 0x00,
    SpecialMessageIndication = 0x01,
    /// Application port addressing, 8-bit ports
    Port8 = 0x04,
    /// Application port addressing, 16-bit ports
    Port16 = 0x05,
    SmscControl = 0x06,
    SourceIndicator = 0x07,
    /// Concatenated message, 16-bit reference
    Concatenated16 = 0x08,
    TextFormatting = 0x0a,
    AlternateReplyAddress = 0x22,
    NationalLanguageShift = 0x24,
    /// GSM 03.48 command packet follows
    OtaCommand = 0x70,
    /// GSM 03.48 response packet follows
    OtaResponse = 0x71,
    /// SMSC specific use
    OperatorSpecific = 0xda,
}

impl InformationElement {
    /// Required value length, `None` when variable
    pub fn fixed_length(&self) -> Option<usize> {
        match self {
            InformationElement::Concatenated8 => Some(3),
            InformationElement::SpecialMessageIndication => Some(2),
            InformationElement::Port8 => Some(2),
            InformationElement::Port16 => Some(4),
            InformationElement::SmscControl => Some(1),
            InformationElement::SourceIndicator => Some(1),
            InformationElement::Concatenated16 => Some(4),
            InformationElement::NationalLanguageShift => Some(1),
            InformationElement::OtaCommand | InformationElement::OtaResponse => Some(0),
            InformationElement::TextFormatting
            | InformationElement::AlternateReplyAddress
            | InformationElement::OperatorSpecific => None,
        }
    }
}

/// Which security packet the header announced
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum OtaPacket {
    Command,
    Response,
}

/// Walk the user data header at the start of `payload` and decode what follows it.
///
/// `payload` is the whole TP-User-Data in octets; `user_data_length` is TP-UDL
/// as declared, needed to size the text after the header for 7-bit data.
pub(crate) fn decode_udh(
    config: &DecoderConfig,
    message: &mut DecodedMessage,
    payload: &[u8],
    user_data_length: u8,
) -> Result<(), DecodeError> {
    let Some((&header_length, after_length)) = payload.split_first() else {
        message.annotation.push(Tag::NoData);
        return Ok(());
    };

    let header_length = header_length as usize;
    if header_length > after_length.len() {
        return Err(DecodeError::TruncatedInput {
            layer: Layer::UserDataHeader,
            needed: header_length,
            available: after_length.len(),
        });
    }
    let (elements, body) = after_length.split_at(header_length);

    let mut ota = None;
    let mut buf = Cursor::new(elements);
    while (buf.position() as usize) < elements.len() {
        let iei = decode_u8(&mut buf, Layer::UserDataHeader)?;
        let vlen = decode_u8(&mut buf, Layer::UserDataHeader)? as usize;
        let value = decode_bytes(&mut buf, vlen, Layer::UserDataHeader)?;

        let Ok(element) = InformationElement::try_from(iei) else {
            tracing::debug!("Unhandled UDH-IEI {iei:#04x}, vlen={vlen}");
            continue;
        };

        if let Some(expected) = element.fixed_length() {
            if vlen != expected {
                return Err(DecodeError::InvalidElementLength {
                    iei,
                    expected,
                    actual: vlen,
                });
            }
        }

        match element {
            InformationElement::Concatenated8 => {
                let (total, this) = (value[1], value[2]);
                check_fragment(this, total, 8)?;
                message.annotation.push(Tag::Fragment { this, total });
                message.is_concatenated_fragment = true;
            }
            InformationElement::Concatenated16 => {
                check_fragment(value[3], value[2], 16)?;
                message.is_concatenated_fragment = true;
            }
            InformationElement::Port8 => message.annotation.push(Tag::Port8 {
                destination: value[0],
                source: value[1],
            }),
            InformationElement::Port16 => message.annotation.push(Tag::Port16 {
                destination: u16::from_be_bytes([value[0], value[1]]),
                source: u16::from_be_bytes([value[2], value[3]]),
            }),
            InformationElement::AlternateReplyAddress => {
                let Some((&digits, field)) = value.split_first() else {
                    return Err(DecodeError::InvalidElementLength {
                        iei,
                        expected: 1,
                        actual: 0,
                    });
                };
                let expected = digits as usize / 2 + 1;
                if vlen < expected {
                    return Err(DecodeError::InvalidElementLength {
                        iei,
                        expected,
                        actual: vlen,
                    });
                }
                let address = decode_address(field, AddressLength::Digits(digits));
                message.annotation.push(Tag::ReplyAddress(address));
            }
            InformationElement::NationalLanguageShift => {
                message.annotation.push(Tag::LanguageShift(value[0]))
            }
            InformationElement::OtaCommand => {
                message.is_ota_envelope = true;
                ota = Some(OtaPacket::Command);
            }
            InformationElement::OtaResponse => {
                message.is_ota_envelope = true;
                ota = Some(OtaPacket::Response);
            }
            InformationElement::OperatorSpecific => {
                tracing::debug!("SMSC-specific UDH element: {}", HexData(value));
            }
            InformationElement::SpecialMessageIndication
            | InformationElement::SmscControl
            | InformationElement::SourceIndicator
            | InformationElement::TextFormatting => {}
        }
    }

    match ota {
        Some(packet) => {
            message.annotation.push(Tag::Ota);
            match packet {
                OtaPacket::Command => security::decode_command_packet(body, &mut message.annotation),
                OtaPacket::Response => {
                    security::decode_response_packet(body, &mut message.annotation)
                }
            }
        }
        None => {
            let header_octets = header_length + 1;
            let text = if message.alphabet == Alphabet::Default7Bit && !message.compressed {
                TextBody {
                    data: body,
                    fill_bits: gsm7::fill_bits_after_header(header_octets),
                    septets: (user_data_length as usize)
                        .saturating_sub(gsm7::header_septets(header_octets)),
                }
            } else {
                TextBody::new(body, body.len())
            };
            decode_text(config, message, text);
        }
    }

    Ok(())
}

fn check_fragment(this: u8, total: u8, reference_bits: u8) -> Result<(), DecodeError> {
    if this > total {
        return Err(DecodeError::InconsistentFragment {
            this_fragment: this,
            total_fragments: total,
            reference_bits,
        });
    }
    Ok(())
}
