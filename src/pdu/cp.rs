// ABOUTME: GSM 04.11 connection layer: DTAP header, CP message type dispatch and CP-User-Data extraction
// ABOUTME: Entry point of the decode chain; records that the session carried SMS traffic

use crate::codec::{DecodeError, Layer, decode_bytes, decode_u8};
use crate::pdu::{Decoder, Dispatch};
use crate::session::Session;
use num_enum::TryFromPrimitive;
use std::io::Cursor;

/// CP message type, low five bits of the DTAP message type octet
#[derive(TryFromPrimitive)]
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CpMessageType {
    Data = 0x01,
    Ack = 0x04,
    Error = 0x10,
}

impl Decoder {
    /// Decode one SMS DTAP message: protocol discriminator / transaction id,
    /// message type, then for CP-DATA the length-prefixed RPDU.
    ///
    /// Any SMS frame marks the session as carrying SMS. Unknown message types
    /// mark it as unknown and come back as a non-fatal
    /// [`DecodeError::UnrecognizedType`].
    pub fn decode_sms(&self, session: &mut Session, dtap: &[u8]) -> Result<Dispatch, DecodeError> {
        let result = self.connection(session, dtap);
        self.report(session, result)
    }

    fn connection(&self, session: &mut Session, dtap: &[u8]) -> Result<Dispatch, DecodeError> {
        let mut buf = Cursor::new(dtap);
        let _discriminator = decode_u8(&mut buf, Layer::Connection)?;
        let raw_type = decode_u8(&mut buf, Layer::Connection)?;
        session.flags_mut().has_sms = true;

        match CpMessageType::try_from(raw_type & 0x1f) {
            Ok(CpMessageType::Data) => {
                let length = decode_u8(&mut buf, Layer::Connection)?;
                let rpdu = decode_bytes(&mut buf, length as usize, Layer::Connection)?;
                self.relay(session, rpdu)
            }
            Ok(CpMessageType::Ack) => {
                session.set_summary("SMS CP-ACK");
                Ok(Dispatch::Signalling)
            }
            Ok(CpMessageType::Error) => {
                session.set_summary("SMS CP-ERROR");
                Ok(Dispatch::Signalling)
            }
            Err(_) => {
                session.flags_mut().unknown = true;
                Err(DecodeError::UnrecognizedType {
                    layer: Layer::Connection,
                    value: raw_type,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cp_ack_is_signalling() {
        let mut session = Session::new(1);
        let dispatch = Decoder::default().decode_sms(&mut session, &[0x89, 0x04]).unwrap();
        assert_eq!(dispatch, Dispatch::Signalling);
        assert_eq!(session.summary(), "SMS CP-ACK");
        assert!(session.flags().has_sms);
        assert!(!session.flags().mo && !session.flags().mt);
    }

    #[test]
    fn cp_error_is_signalling() {
        let mut session = Session::new(1);
        Decoder::default()
            .decode_sms(&mut session, &[0x09, 0x10, 0x51])
            .unwrap();
        assert_eq!(session.summary(), "SMS CP-ERROR");
    }

    #[test]
    fn unknown_cp_type_is_not_fatal() {
        let mut session = Session::new(1);
        let err = Decoder::default()
            .decode_sms(&mut session, &[0x09, 0x1F])
            .unwrap_err();
        assert_eq!(
            err,
            DecodeError::UnrecognizedType {
                layer: Layer::Connection,
                value: 0x1F,
            }
        );
        assert!(session.flags().unknown);
        assert!(session.flags().has_sms);
        assert_eq!(session.summary(), "");
    }

    #[test]
    fn short_header_is_truncated() {
        let mut session = Session::new(1);
        let err = Decoder::default().decode_sms(&mut session, &[0x09]).unwrap_err();
        assert_eq!(err.sanity_tag(), "SMS_CP_LEN");
        assert!(!session.flags().has_sms);
    }

    #[test]
    fn cp_user_data_longer_than_frame() {
        let mut session = Session::new(1);
        let err = Decoder::default()
            .decode_sms(&mut session, &[0x09, 0x01, 0x20, 0x01, 0x02])
            .unwrap_err();
        assert!(matches!(
            err,
            DecodeError::TruncatedInput {
                layer: Layer::Connection,
                needed: 32,
                available: 2,
            }
        ));
    }

    #[test]
    fn rp_ack_from_mobile_marks_terminated() {
        let mut session = Session::new(1);
        let dispatch = Decoder::default()
            .decode_sms(&mut session, &[0x89, 0x01, 0x02, 0x02, 0x07])
            .unwrap();
        assert_eq!(dispatch, Dispatch::Signalling);
        assert_eq!(session.summary(), "SMS RP-ACK");
        assert!(session.flags().mt);
        assert!(!session.flags().mo);
    }

    #[test]
    fn rp_smma_marks_originated() {
        let mut session = Session::new(1);
        Decoder::default()
            .decode_sms(&mut session, &[0x09, 0x01, 0x02, 0x06, 0x01])
            .unwrap();
        assert_eq!(session.summary(), "SMS RP-SMMA");
        assert!(session.flags().mo);
    }
}
