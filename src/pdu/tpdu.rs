// ABOUTME: GSM 03.40 SMS-DELIVER / SMS-SUBMIT parsing into a DecodedMessage appended to the session
// ABOUTME: Bounds-checks TP-User-Data against the remaining buffer and the configured capacity

use crate::codec::{DecodeError, Layer, decode_bytes, decode_u8, rest, skip};
use crate::datatypes::{
    AddressLength, Annotation, DataCodingScheme, DecodedMessage, Direction, decode_address,
};
use crate::pdu::text::{TextBody, decode_text};
use crate::pdu::udh::decode_udh;
use crate::pdu::{Decoder, Dispatch};
use crate::session::Session;
use bytes::Bytes;
use std::io::Cursor;

/// TP-UDHI, bit 6 of the first octet
const TP_UDHI: u8 = 0x40;

/// Timestamp (TP-SCTS) length in octets
const TIMESTAMP_LEN: usize = 7;

/// Validity period format, bits 4-3 of an SMS-SUBMIT first octet
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValidityPeriodFormat {
    NotPresent,
    Enhanced,
    Relative,
    Absolute,
}

impl ValidityPeriodFormat {
    pub fn from_first_octet(octet: u8) -> Self {
        match (octet >> 3) & 0x03 {
            0 => ValidityPeriodFormat::NotPresent,
            1 => ValidityPeriodFormat::Enhanced,
            2 => ValidityPeriodFormat::Relative,
            _ => ValidityPeriodFormat::Absolute,
        }
    }

    /// Octets TP-VP occupies
    pub fn octets(&self) -> usize {
        match self {
            ValidityPeriodFormat::NotPresent => 0,
            ValidityPeriodFormat::Relative => 1,
            ValidityPeriodFormat::Enhanced | ValidityPeriodFormat::Absolute => 7,
        }
    }
}

/// Which optional fields a TPDU carries, by direction
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct TpduLayout {
    /// TP-MR after the first octet (SMS-SUBMIT)
    message_reference: bool,
    /// TP-VP before TP-UDL (SMS-SUBMIT)
    validity_period: bool,
    /// TP-SCTS before TP-UDL (SMS-DELIVER)
    timestamp: bool,
}

impl TpduLayout {
    const DELIVER: TpduLayout = TpduLayout {
        message_reference: false,
        validity_period: false,
        timestamp: true,
    };

    const SUBMIT: TpduLayout = TpduLayout {
        message_reference: true,
        validity_period: true,
        timestamp: false,
    };

    fn for_direction(direction: Direction) -> Self {
        match direction {
            Direction::FromNetwork => Self::DELIVER,
            Direction::FromMobile => Self::SUBMIT,
        }
    }
}

impl Decoder {
    /// Decode an SMS-DELIVER (from the network) or SMS-SUBMIT (from the mobile)
    /// and append it to the session.
    ///
    /// On success the summary gains `, FROM <addr>` or `, TO <addr>` and the
    /// new message's sequence is returned. On failure the session keeps its
    /// messages and the summary notes the failed check.
    pub fn decode_tpdu(
        &self,
        session: &mut Session,
        tpdu: &[u8],
        direction: Direction,
        smsc: Option<&str>,
    ) -> Result<Dispatch, DecodeError> {
        let result = self.tpdu(session, tpdu, direction, smsc);
        self.report(session, result)
    }

    pub(crate) fn tpdu(
        &self,
        session: &mut Session,
        tpdu: &[u8],
        direction: Direction,
        smsc: Option<&str>,
    ) -> Result<Dispatch, DecodeError> {
        let message = self.parse_tpdu(tpdu, direction, smsc)?;

        let party = match direction {
            Direction::FromNetwork => "FROM",
            Direction::FromMobile => "TO",
        };
        session.append_summary(&format!(", {party} {}", message.peer_address));

        let message = session.push_message(message);
        tracing::debug!(
            sequence = message.sequence,
            %direction,
            annotation = %message.annotation,
            "SMS appended"
        );
        Ok(Dispatch::Message {
            sequence: message.sequence,
        })
    }

    fn parse_tpdu(
        &self,
        tpdu: &[u8],
        direction: Direction,
        smsc: Option<&str>,
    ) -> Result<DecodedMessage, DecodeError> {
        let layout = TpduLayout::for_direction(direction);
        let mut buf = Cursor::new(tpdu);

        let first = decode_u8(&mut buf, Layer::Transfer)?;
        if layout.message_reference {
            skip(&mut buf, 1, Layer::Transfer)?;
        }

        let digits = decode_u8(&mut buf, Layer::Transfer)?;
        let address_length = AddressLength::Digits(digits);
        let field = decode_bytes(&mut buf, address_length.octets(), Layer::Transfer)?;
        let peer_address = decode_address(field, address_length);

        let protocol_id = decode_u8(&mut buf, Layer::Transfer)?;
        let dcs = decode_u8(&mut buf, Layer::Transfer)?;

        if layout.validity_period {
            let format = ValidityPeriodFormat::from_first_octet(first);
            skip(&mut buf, format.octets(), Layer::Transfer)?;
        }
        if layout.timestamp {
            skip(&mut buf, TIMESTAMP_LEN, Layer::Transfer)?;
        }

        let user_data_length = decode_u8(&mut buf, Layer::Transfer)?;
        let scheme = DataCodingScheme::from_byte(dcs);
        let remaining = rest(&buf);

        let octets = scheme.octet_length(user_data_length);
        if octets > remaining.len() {
            tracing::warn!(
                declared = user_data_length,
                offset = buf.position(),
                remaining = remaining.len(),
                "TPDU user data length exceeds frame"
            );
            return Err(DecodeError::TruncatedInput {
                layer: Layer::Transfer,
                needed: octets,
                available: remaining.len(),
            });
        }
        if octets > self.config.max_user_data {
            return Err(DecodeError::Oversized {
                length: octets,
                capacity: self.config.max_user_data,
            });
        }
        let user_data = &remaining[..octets];

        let mut message = DecodedMessage {
            sequence: 0,
            direction,
            peer_address,
            smsc_address: smsc.map(str::to_string),
            protocol_id,
            dcs_raw: dcs,
            alphabet: scheme.alphabet(),
            compressed: scheme.is_compressed(),
            message_class: scheme.message_class(),
            has_user_data_header: first & TP_UDHI != 0,
            is_concatenated_fragment: false,
            is_ota_envelope: false,
            user_data_length,
            raw_user_data: Bytes::copy_from_slice(user_data),
            annotation: Annotation::new(),
        };

        if message.has_user_data_header {
            decode_udh(&self.config, &mut message, user_data, user_data_length)?;
        } else {
            let text = TextBody::new(user_data, user_data_length as usize);
            decode_text(&self.config, &mut message, text);
        }

        Ok(message)
    }
}
