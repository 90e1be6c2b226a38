// ABOUTME: GSM 04.11 relay layer: RP message type dispatch, SMSC address placement and TPDU extraction
// ABOUTME: Sets the session's MO/MT flags and the RP part of the summary

use crate::codec::{DecodeError, Layer, decode_bytes, decode_u8, rest};
use crate::datatypes::{AddressLength, Direction, decode_address};
use crate::pdu::{Decoder, Dispatch};
use crate::session::Session;
use num_enum::TryFromPrimitive;
use std::io::Cursor;

/// RP message type, low nibble of the first RPDU octet
#[derive(TryFromPrimitive)]
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RpMessageType {
    DataMo = 0x00,
    DataMt = 0x01,
    AckMo = 0x02,
    AckMt = 0x03,
    ErrorMo = 0x04,
    ErrorMt = 0x05,
    SmmaMo = 0x06,
}

impl RpMessageType {
    pub fn summary(&self) -> &'static str {
        match self {
            RpMessageType::DataMo | RpMessageType::DataMt => "SMS RP-DATA",
            RpMessageType::AckMo | RpMessageType::AckMt => "SMS RP-ACK",
            RpMessageType::ErrorMo | RpMessageType::ErrorMt => "SMS RP-ERROR",
            RpMessageType::SmmaMo => "SMS RP-SMMA",
        }
    }

    /// Whether the frame counts as mobile-originated traffic.
    ///
    /// Acks and errors travel opposite to the message they answer, so an
    /// RP-ACK sent by the mobile marks terminated traffic.
    pub fn marks_mobile_originated(&self) -> bool {
        matches!(
            self,
            RpMessageType::DataMo
                | RpMessageType::AckMt
                | RpMessageType::ErrorMt
                | RpMessageType::SmmaMo
        )
    }
}

/// TPDU type from TP-MTI, which depends on the direction it travels
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TpduType {
    Deliver,
    SubmitReport,
    StatusReport,
    DeliverReport,
    Submit,
    Command,
    Reserved,
}

impl TpduType {
    pub fn from_mti(first_octet: u8, direction: Direction) -> Self {
        match (direction, first_octet & 0x03) {
            (Direction::FromNetwork, 0) => TpduType::Deliver,
            (Direction::FromNetwork, 1) => TpduType::SubmitReport,
            (Direction::FromNetwork, 2) => TpduType::StatusReport,
            (Direction::FromMobile, 0) => TpduType::DeliverReport,
            (Direction::FromMobile, 1) => TpduType::Submit,
            (Direction::FromMobile, 2) => TpduType::Command,
            _ => TpduType::Reserved,
        }
    }

    /// Suffix appended to the RP-DATA summary
    pub fn summary_suffix(&self) -> &'static str {
        match self {
            TpduType::Deliver => "-DELIVER",
            TpduType::SubmitReport => "-SUBMIT-REPORT",
            TpduType::StatusReport => "-STATUS-REPORT",
            TpduType::DeliverReport => "-DELIVER-REPORT",
            TpduType::Submit => "-SUBMIT",
            TpduType::Command => "-COMMAND",
            TpduType::Reserved => "-RESERVED",
        }
    }

    /// Whether the TPDU is a short message the decoder records
    pub fn carries_message(&self) -> bool {
        matches!(self, TpduType::Deliver | TpduType::Submit)
    }
}

impl Decoder {
    /// Decode an RP-DATA body (after message type and reference).
    ///
    /// The originator address may only be present on RP-DATA from the
    /// network and the destination address only on RP-DATA from the mobile;
    /// whichever is present becomes the SMSC address of the message.
    pub fn decode_rp(
        &self,
        session: &mut Session,
        rp_data: &[u8],
        direction: Direction,
    ) -> Result<Dispatch, DecodeError> {
        let result = self.rp_data(session, rp_data, direction);
        self.report(session, result)
    }

    /// Dispatch a complete RPDU starting at its message type octet
    pub(crate) fn relay(&self, session: &mut Session, rpdu: &[u8]) -> Result<Dispatch, DecodeError> {
        let mut buf = Cursor::new(rpdu);
        let raw_type = decode_u8(&mut buf, Layer::Relay)?;
        let _reference = decode_u8(&mut buf, Layer::Relay)?;

        let Ok(message_type) = RpMessageType::try_from(raw_type & 0x0f) else {
            session.flags_mut().unknown = true;
            return Err(DecodeError::UnrecognizedType {
                layer: Layer::Relay,
                value: raw_type,
            });
        };

        session.set_summary(message_type.summary());
        if message_type.marks_mobile_originated() {
            session.flags_mut().mo = true;
        } else {
            session.flags_mut().mt = true;
        }

        let body = rest(&buf);
        match message_type {
            RpMessageType::DataMo => self.rp_data(session, body, Direction::FromMobile),
            RpMessageType::DataMt => self.rp_data(session, body, Direction::FromNetwork),
            _ => Ok(Dispatch::Signalling),
        }
    }

    fn rp_data(
        &self,
        session: &mut Session,
        rp_data: &[u8],
        direction: Direction,
    ) -> Result<Dispatch, DecodeError> {
        let mut buf = Cursor::new(rp_data);
        let mut smsc = None;

        let originator_len = decode_u8(&mut buf, Layer::Relay)?;
        if originator_len > 0 {
            if direction != Direction::FromNetwork {
                return Err(DecodeError::MisplacedAddress { direction });
            }
            let field = decode_bytes(&mut buf, originator_len as usize, Layer::Relay)?;
            smsc = Some(decode_address(field, AddressLength::Octets(originator_len)));
        }

        let destination_len = decode_u8(&mut buf, Layer::Relay)?;
        if destination_len > 0 {
            if direction != Direction::FromMobile {
                return Err(DecodeError::MisplacedAddress { direction });
            }
            let field = decode_bytes(&mut buf, destination_len as usize, Layer::Relay)?;
            smsc = Some(decode_address(field, AddressLength::Octets(destination_len)));
        }

        let user_data_len = decode_u8(&mut buf, Layer::Relay)?;
        let tpdu = decode_bytes(&mut buf, user_data_len as usize, Layer::Relay)?;
        let Some(&first) = tpdu.first() else {
            return Err(DecodeError::TruncatedInput {
                layer: Layer::Relay,
                needed: 1,
                available: 0,
            });
        };

        let tpdu_type = TpduType::from_mti(first, direction);
        session.append_summary(tpdu_type.summary_suffix());

        if tpdu_type.carries_message() {
            self.tpdu(session, tpdu, direction, smsc.as_deref())
        } else {
            Ok(Dispatch::Signalling)
        }
    }
}
