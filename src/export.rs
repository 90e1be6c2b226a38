// ABOUTME: Renders decoded message metadata as an SQL INSERT into the sms_meta table
// ABOUTME: All text columns are quoted and escaped here; nothing else builds SQL

use crate::datatypes::{DecodedMessage, HexData};

/// Column value used when a message carries no user data
pub const NO_DATA: &str = "'<NO DATA>'";

/// Upper-case hex of `bytes`, no separators
pub fn hex_upper(bytes: &[u8]) -> String {
    HexData(bytes).to_string()
}

/// Single-quote `value` with embedded quotes doubled, or `NULL` when empty
fn quote_or_null(value: &str) -> String {
    if value.is_empty() {
        return "NULL".to_string();
    }
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        if c == '\'' {
            out.push('\'');
        }
        out.push(c);
    }
    out.push('\'');
    out
}

/// Build one `INSERT INTO sms_meta ...;` statement, newline terminated.
///
/// The alphabet column carries the alphabet number with bit 7 set for
/// compressed data; the class column is 0-3, or 4 for no class.
pub fn to_insert_statement(session_id: u32, message: &DecodedMessage) -> String {
    let alphabet = message.alphabet as u8 | if message.compressed { 0x80 } else { 0 };
    let annotation = message.annotation.to_string();

    let data = if message.user_data_length == 0 {
        NO_DATA.to_string()
    } else {
        format!("X'{}'", HexData(&message.raw_user_data))
    };

    format!(
        "INSERT INTO sms_meta (id,sequence,from_network,pid,dcs,alphabet,class,udhi,ota,concat,smsc,msisdn,info,length,data) \
         VALUES ({},{},{},{},{},{},{},{},{},{},{},{},{},{},{});\n",
        session_id,
        message.sequence,
        u8::from(message.is_from_network()),
        message.protocol_id,
        message.dcs_raw,
        alphabet,
        message.message_class as u8,
        u8::from(message.has_user_data_header),
        u8::from(message.is_ota_envelope),
        u8::from(message.is_concatenated_fragment),
        quote_or_null(message.smsc_display()),
        quote_or_null(&message.peer_address),
        quote_or_null(&annotation),
        message.user_data_length,
        data,
    )
}
