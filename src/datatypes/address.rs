// ABOUTME: Semi-octet (BCD) address decoding for MSISDN, SMSC and alternate reply addresses
// ABOUTME: Degrades to the digits that are present instead of failing on short or odd input

use crate::datatypes::gsm7;

/// Type-of-number field (bits 6-4 of the address type octet)
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum TypeOfNumber {
    Unknown,
    International,
    National,
    NetworkSpecific,
    Subscriber,
    Alphanumeric,
    Abbreviated,
    Reserved,
}

impl TypeOfNumber {
    pub fn from_address_type(octet: u8) -> Self {
        match (octet >> 4) & 0x07 {
            0b000 => TypeOfNumber::Unknown,
            0b001 => TypeOfNumber::International,
            0b010 => TypeOfNumber::National,
            0b011 => TypeOfNumber::NetworkSpecific,
            0b100 => TypeOfNumber::Subscriber,
            0b101 => TypeOfNumber::Alphanumeric,
            0b110 => TypeOfNumber::Abbreviated,
            _ => TypeOfNumber::Reserved,
        }
    }
}

/// How the length octet in front of an address is counted
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AddressLength {
    /// Number of semi-octets (digits) after the type octet, as in TP addresses
    Digits(u8),
    /// Number of octets including the type octet, as in RP addresses
    Octets(u8),
}

impl AddressLength {
    /// Octets the address occupies, type octet included
    pub fn octets(&self) -> usize {
        match *self {
            AddressLength::Digits(digits) => (digits as usize).div_ceil(2) + 1,
            AddressLength::Octets(octets) => octets as usize,
        }
    }
}

fn digit_char(nibble: u8) -> Option<char> {
    match nibble {
        0..=9 => Some((b'0' + nibble) as char),
        0x0A => Some('*'),
        0x0B => Some('#'),
        0x0C => Some('a'),
        0x0D => Some('b'),
        0x0E => Some('c'),
        _ => None,
    }
}

/// Decode an address field starting at its type octet.
///
/// Never fails: bytes missing from `field` simply shorten the result, and an
/// empty field decodes to an empty string.
pub fn decode_address(field: &[u8], length: AddressLength) -> String {
    let octets = length.octets().min(field.len());
    let Some((&address_type, digits)) = field[..octets].split_first() else {
        return String::new();
    };

    let max_digits = match length {
        AddressLength::Digits(count) => count as usize,
        AddressLength::Octets(_) => digits.len() * 2,
    };

    match TypeOfNumber::from_address_type(address_type) {
        TypeOfNumber::Alphanumeric => {
            let septets = max_digits * 4 / 7;
            gsm7::unpack_septets(digits, 0, septets).unwrap_or_default()
        }
        ton => {
            let mut out = String::with_capacity(max_digits + 1);
            if ton == TypeOfNumber::International {
                out.push('+');
            }
            let nibbles = digits.iter().flat_map(|b| [b & 0x0F, b >> 4]);
            for nibble in nibbles.take(max_digits) {
                match digit_char(nibble) {
                    Some(c) => out.push(c),
                    None => break,
                }
            }
            out
        }
    }
}
