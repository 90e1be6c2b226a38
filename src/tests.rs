//! Cross-layer tests driving complete DTAP frames through the decoder

use crate::codec::{DecodeError, Layer};
use crate::config::DecoderConfig;
use crate::datatypes::{Alphabet, Direction, MessageClass, Tag};
use crate::export::to_insert_statement;
use crate::pdu::{Decoder, Dispatch};
use crate::session::Session;

#[cfg(test)]
mod integration_tests {
    use super::*;

    /// SMSC +491710760 as an RP address value (type octet + digits)
    const SMSC: &[u8] = &[0x91, 0x94, 0x71, 0x01, 0x67, 0xF0];

    /// Wrap an RPDU in a CP-DATA DTAP message
    fn cp_data(rpdu: &[u8]) -> Vec<u8> {
        let mut dtap = vec![0x09, 0x01, rpdu.len() as u8];
        dtap.extend_from_slice(rpdu);
        dtap
    }

    /// RP-DATA network to mobile, SMSC as originator
    fn rp_data_mt(tpdu: &[u8]) -> Vec<u8> {
        let mut rpdu = vec![0x01, 0x2A, SMSC.len() as u8];
        rpdu.extend_from_slice(SMSC);
        rpdu.push(0x00);
        rpdu.push(tpdu.len() as u8);
        rpdu.extend_from_slice(tpdu);
        rpdu
    }

    /// RP-DATA mobile to network, SMSC as destination
    fn rp_data_mo(tpdu: &[u8]) -> Vec<u8> {
        let mut rpdu = vec![0x00, 0x2B, 0x00, SMSC.len() as u8];
        rpdu.extend_from_slice(SMSC);
        rpdu.push(tpdu.len() as u8);
        rpdu.extend_from_slice(tpdu);
        rpdu
    }

    /// SMS-DELIVER from +49172123456 with the given first octet, PID, DCS and user data
    fn deliver(first: u8, pid: u8, dcs: u8, udl: u8, user_data: &[u8]) -> Vec<u8> {
        let mut tpdu = vec![
            first, //
            0x0B, 0x91, 0x94, 0x71, 0x12, 0x32, 0x54, 0xF6, // OA
            pid, dcs, //
            0x52, 0x10, 0x81, 0x21, 0x43, 0x65, 0x80, // SCTS
            udl,
        ];
        tpdu.extend_from_slice(user_data);
        tpdu
    }

    /// SMS-SUBMIT to 1234 with a relative validity period
    fn submit(first: u8, pid: u8, dcs: u8, udl: u8, user_data: &[u8]) -> Vec<u8> {
        let mut tpdu = vec![
            first, 0x11, // MR
            0x04, 0x81, 0x21, 0x43, // DA
            pid, dcs, //
            0xA7, // VP
            udl,
        ];
        tpdu.extend_from_slice(user_data);
        tpdu
    }

    fn ota_command_packet() -> Vec<u8> {
        vec![
            0x00, 0x1D, // CPL
            0x15, // CHL
            0x16, // SPI1: CNTR_HI, ciphered, CC
            0x39, // SPI2
            0x15, // KIc
            0x15, // KID
            0xB0, 0x00, 0x10, // TAR
            0x00, 0x00, 0x00, 0x00, 0x2A, // CNTR
            0x03, // PCNTR
            0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, // CC
        ]
    }

    #[test]
    fn test_deliver_full_chain() {
        let hello = [0xE8, 0x32, 0x9B, 0xFD, 0x06];
        let dtap = cp_data(&rp_data_mt(&deliver(0x04, 0x00, 0x00, 5, &hello)));

        let decoder = Decoder::default();
        let mut session = Session::new(77);
        let dispatch = decoder.decode_sms(&mut session, &dtap).unwrap();

        assert_eq!(dispatch, Dispatch::Message { sequence: 0 });
        assert_eq!(session.summary(), "SMS RP-DATA-DELIVER, FROM +49172123456");
        assert!(session.flags().has_sms);
        assert!(session.flags().mt);
        assert!(!session.flags().mo);

        let msg = session.latest().unwrap();
        assert_eq!(msg.direction, Direction::FromNetwork);
        assert_eq!(msg.smsc_display(), "+491710760");
        assert_eq!(msg.alphabet, Alphabet::Default7Bit);
        assert_eq!(msg.annotation.tags(), &[Tag::Text7Bit]);
        assert_eq!(
            to_insert_statement(session.id(), msg),
            "INSERT INTO sms_meta (id,sequence,from_network,pid,dcs,alphabet,class,udhi,ota,concat,smsc,msisdn,info,length,data) \
             VALUES (77,0,1,0,0,1,4,0,0,0,'+491710760','+49172123456','TEXT_7BIT',5,X'E8329BFD06');\n"
        );
    }

    #[test]
    fn test_submit_full_chain() {
        let dtap = cp_data(&rp_data_mo(&submit(0x11, 0x00, 0x08, 4, &[0x00, 0x48, 0x00, 0x69])));

        let mut session = Session::new(1);
        Decoder::default().decode_sms(&mut session, &dtap).unwrap();

        assert_eq!(session.summary(), "SMS RP-DATA-SUBMIT, TO 1234");
        assert!(session.flags().mo);
        let msg = session.latest().unwrap();
        assert_eq!(msg.direction, Direction::FromMobile);
        assert_eq!(msg.peer_address, "1234");
        assert_eq!(msg.smsc_address.as_deref(), Some("+491710760"));
        assert_eq!(msg.alphabet, Alphabet::Ucs2);
        assert_eq!(msg.annotation.to_string(), "TEXT_16BIT");
        assert!(to_insert_statement(1, msg).contains("VALUES (1,0,0,0,8,2,4,0,0,0,"));
    }

    #[test]
    fn test_sequences_follow_session_head() {
        let decoder = Decoder::default();
        let mut session = Session::new(1);
        let dtap = cp_data(&rp_data_mt(&deliver(0x04, 0x00, 0x04, 1, &[0x42])));

        for expected in 0..3u32 {
            let dispatch = decoder.decode_sms(&mut session, &dtap).unwrap();
            assert_eq!(dispatch, Dispatch::Message { sequence: expected });
        }
        let sequences: Vec<u32> = session.messages().map(|m| m.sequence).collect();
        assert_eq!(sequences, vec![2, 1, 0]);
    }

    #[test]
    fn test_ota_command_packet() {
        let mut user_data = vec![0x02, 0x70, 0x00];
        user_data.extend_from_slice(&ota_command_packet());
        let tpdu = deliver(0x44, 0x7F, 0xF6, user_data.len() as u8, &user_data);
        let dtap = cp_data(&rp_data_mt(&tpdu));

        let mut session = Session::new(1);
        Decoder::default().decode_sms(&mut session, &dtap).unwrap();

        let msg = session.latest().unwrap();
        assert!(msg.has_user_data_header);
        assert!(msg.is_ota_envelope);
        assert_eq!(msg.message_class, MessageClass::Sim);
        assert_eq!(msg.alphabet, Alphabet::Data8Bit);
        assert_eq!(
            msg.annotation.to_string(),
            "OTA CNTR_HI ENC 3DES-2K CC 3DES-2K TAR B00010 CNTR 000000002A"
        );
    }

    #[test]
    fn test_ota_response_packet_with_signature() {
        let mut user_data = vec![0x02, 0x71, 0x00];
        user_data.extend_from_slice(&[
            0x00, 0x11, // RPL
            0x0A, // RHL
            0xB0, 0x00, 0x10, // TAR
            0x00, 0x00, 0x00, 0x00, 0x2A, // CNTR
            0x00, // PCNTR
            0x00, // status
            0xC1, 0xC2, 0xC3, 0xC4, 0xC5, 0xC6, 0xC7, // 7 signature bytes
        ]);
        let tpdu = submit(0x51, 0x7F, 0xF6, user_data.len() as u8, &user_data);
        let dtap = cp_data(&rp_data_mo(&tpdu));

        let mut session = Session::new(1);
        Decoder::default().decode_sms(&mut session, &dtap).unwrap();

        let msg = session.latest().unwrap();
        assert!(msg.is_ota_envelope);
        assert_eq!(
            msg.annotation.to_string(),
            "OTA TAR B00010 POR 00 CC C1C2C3C4C5C6C7"
        );
    }

    #[test]
    fn test_ota_response_packet_too_short_for_signature() {
        let mut user_data = vec![0x02, 0x71, 0x00];
        user_data.extend_from_slice(&[0x00, 0x08, 0x0A, 0xB0, 0x00, 0x10, 0x00, 0x00, 0x00, 0x00]);
        let tpdu = submit(0x51, 0x7F, 0xF6, user_data.len() as u8, &user_data);
        let dtap = cp_data(&rp_data_mo(&tpdu));

        let mut session = Session::new(1);
        let dispatch = Decoder::default().decode_sms(&mut session, &dtap).unwrap();
        assert_eq!(dispatch, Dispatch::Message { sequence: 0 });

        let msg = session.latest().unwrap();
        assert!(msg.annotation.contains(&Tag::NoSignature));
        assert!(msg.annotation.contains(&Tag::Tar([0xB0, 0x00, 0x10])));
    }

    #[test]
    fn test_ota_by_protocol_id_without_header() {
        let tpdu = deliver(0x04, 0x7F, 0x16, 3, &[0x01, 0x02, 0x03]);
        let dtap = cp_data(&rp_data_mt(&tpdu));

        let mut session = Session::new(1);
        Decoder::default().decode_sms(&mut session, &dtap).unwrap();
        let msg = session.latest().unwrap();
        assert!(msg.is_ota_envelope);
        assert!(!msg.has_user_data_header);
        assert_eq!(msg.annotation.to_string(), "OTA DATA_8BIT");
    }

    #[test]
    fn test_inconsistent_fragment_is_dropped() {
        let decoder = Decoder::default();
        let mut session = Session::new(1);

        let good = cp_data(&rp_data_mt(&deliver(0x04, 0x00, 0x04, 1, &[0x42])));
        decoder.decode_sms(&mut session, &good).unwrap();

        // Fragment 3 of 2
        let user_data = [0x05, 0x00, 0x03, 0x7E, 0x02, 0x03, 0x41, 0x42];
        let bad = cp_data(&rp_data_mt(&deliver(0x44, 0x00, 0x04, 8, &user_data)));
        let err = decoder.decode_sms(&mut session, &bad).unwrap_err();

        assert_eq!(
            err,
            DecodeError::InconsistentFragment {
                this_fragment: 3,
                total_fragments: 2,
                reference_bits: 8,
            }
        );
        assert_eq!(session.message_count(), 1);
        assert_eq!(session.next_sequence(), 1);
        assert_eq!(
            session.summary(),
            "SMS RP-DATA-DELIVER FAILED SANITY CHECK (SMS_FRAG_8)"
        );
    }

    #[test]
    fn test_concatenated_text_after_header() {
        // [1/2] then "hi" packed after one fill bit
        let user_data = [0x05, 0x00, 0x03, 0x7E, 0x02, 0x01, 0xD0, 0x69];
        let dtap = cp_data(&rp_data_mt(&deliver(0x44, 0x00, 0x00, 9, &user_data)));

        let mut session = Session::new(1);
        Decoder::default().decode_sms(&mut session, &dtap).unwrap();
        let msg = session.latest().unwrap();
        assert!(msg.is_concatenated_fragment);
        assert_eq!(msg.raw_user_data.len(), 8);
        assert_eq!(msg.annotation.to_string(), "[1/2] TEXT_7BIT");
    }

    #[test]
    fn test_tpdu_length_reject_keeps_sequence() {
        let decoder = Decoder::default();
        let mut session = Session::new(1);
        let good = cp_data(&rp_data_mt(&deliver(0x04, 0x00, 0x04, 1, &[0x42])));
        decoder.decode_sms(&mut session, &good).unwrap();

        // 160 septets declared, 5 octets present
        let bad = cp_data(&rp_data_mt(&deliver(0x04, 0x00, 0x00, 160, &[0xE8, 0x32, 0x9B, 0xFD, 0x06])));
        let err = decoder.decode_sms(&mut session, &bad).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::TruncatedInput {
                layer: Layer::Transfer,
                needed: 140,
                available: 5,
            }
        ));
        assert_eq!(session.message_count(), 1);

        decoder.decode_sms(&mut session, &good).unwrap();
        assert_eq!(session.latest().unwrap().sequence, 1);
    }

    #[test]
    fn test_misplaced_smsc_address() {
        // RP-DATA MO carrying an originator address
        let tpdu = submit(0x11, 0x00, 0x04, 1, &[0x42]);
        let mut rpdu = vec![0x00, 0x2B, SMSC.len() as u8];
        rpdu.extend_from_slice(SMSC);
        rpdu.push(0x00);
        rpdu.push(tpdu.len() as u8);
        rpdu.extend_from_slice(&tpdu);

        let mut session = Session::new(1);
        let err = Decoder::default()
            .decode_sms(&mut session, &cp_data(&rpdu))
            .unwrap_err();
        assert_eq!(
            err,
            DecodeError::MisplacedAddress {
                direction: Direction::FromMobile
            }
        );
        assert!(session.flags().mo);
        assert_eq!(session.summary(), "SMS RP-DATA FAILED SANITY CHECK (SMS_SMSC_MO)");
        assert!(session.latest().is_none());
    }

    #[test]
    fn test_signalling_frames() {
        let decoder = Decoder::default();
        let mut session = Session::new(1);

        assert_eq!(
            decoder.decode_sms(&mut session, &[0x89, 0x04]).unwrap(),
            Dispatch::Signalling
        );
        assert_eq!(session.summary(), "SMS CP-ACK");

        // RP-ERROR network to mobile
        decoder
            .decode_sms(&mut session, &cp_data(&[0x05, 0x2A, 0x01, 0x6F]))
            .unwrap();
        assert_eq!(session.summary(), "SMS RP-ERROR");
        assert!(session.flags().mo);

        // Deliver report from the mobile inside RP-DATA
        let report = cp_data(&[0x00, 0x2C, 0x00, 0x00, 0x02, 0x00, 0x00]);
        decoder.decode_sms(&mut session, &report).unwrap();
        assert_eq!(session.summary(), "SMS RP-DATA-DELIVER-REPORT");
        assert_eq!(session.message_count(), 0);
    }

    #[test]
    fn test_unknown_types_are_flagged() {
        let decoder = Decoder::default();
        let mut session = Session::new(1);

        let err = decoder.decode_sms(&mut session, &[0x09, 0x02]).unwrap_err();
        assert!(!err.is_fatal());

        let err = decoder
            .decode_sms(&mut session, &cp_data(&[0x0E, 0x01]))
            .unwrap_err();
        assert_eq!(
            err,
            DecodeError::UnrecognizedType {
                layer: Layer::Relay,
                value: 0x0E,
            }
        );
        assert!(session.flags().unknown);
        assert!(!session.summary().contains("FAILED"));
    }

    #[test]
    fn test_empty_user_data_exports_no_data() {
        let dtap = cp_data(&rp_data_mt(&deliver(0x04, 0x00, 0x00, 0, &[])));
        let mut session = Session::new(5);
        Decoder::default().decode_sms(&mut session, &dtap).unwrap();

        let msg = session.latest().unwrap();
        assert_eq!(msg.annotation.tags(), &[Tag::NoData]);
        let sql = to_insert_statement(session.id(), msg);
        assert!(sql.ends_with(",'<NO DATA>',0,'<NO DATA>');\n"));
    }

    #[test]
    fn test_custom_ota_indicators() {
        let decoder = Decoder::new(
            DecoderConfig::default()
                .with_ota_protocol_ids([0x41])
                .with_ota_coding_schemes([]),
        );
        let mut session = Session::new(1);

        let plain = cp_data(&rp_data_mt(&deliver(0x04, 0x7F, 0x04, 1, &[0x42])));
        decoder.decode_sms(&mut session, &plain).unwrap();
        assert!(!session.latest().unwrap().is_ota_envelope);

        let marked = cp_data(&rp_data_mt(&deliver(0x04, 0x41, 0x04, 1, &[0x42])));
        decoder.decode_sms(&mut session, &marked).unwrap();
        assert!(session.latest().unwrap().is_ota_envelope);
    }

    #[test]
    fn test_merge_independent_sessions() {
        let decoder = Decoder::default();
        let dtap = cp_data(&rp_data_mt(&deliver(0x04, 0x00, 0x04, 1, &[0x42])));

        let mut shared = Session::new(1);
        decoder.decode_sms(&mut shared, &dtap).unwrap();

        let mut worker = Session::new(1);
        decoder.decode_sms(&mut worker, &dtap).unwrap();
        decoder.decode_sms(&mut worker, &dtap).unwrap();

        shared.merge(worker);
        let sequences: Vec<u32> = shared.messages().map(|m| m.sequence).collect();
        assert_eq!(sequences, vec![2, 1, 0]);
        assert!(shared.flags().mt);
    }

    #[test]
    fn test_garbage_never_panics() {
        let decoder = Decoder::default();
        let mut session = Session::new(1);
        let seed = cp_data(&rp_data_mt(&deliver(0x44, 0x7F, 0xF6, 30, &[0x1F; 30])));

        for cut in 0..seed.len() {
            let _ = decoder.decode_sms(&mut session, &seed[..cut]);
        }
        for flip in 0..seed.len() {
            let mut frame = seed.clone();
            frame[flip] ^= 0xFF;
            let _ = decoder.decode_sms(&mut session, &frame);
        }
    }
}
