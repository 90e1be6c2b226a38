// ABOUTME: GSM 03.38 default alphabet unpacking from packed septets into text
// ABOUTME: Reads bit windows over a borrowed slice and stops at the septet budget or the last whole septet

/// Escape to the extension table
const ESC: u8 = 0x1B;

/// Stand-in for septets with no mapping
const REPLACEMENT: char = '?';

#[rustfmt::skip]
const GSM7_BASIC: [char; 128] = [
    '@', '£', '$', '¥', 'è', 'é', 'ù', 'ì', 'ò', 'Ç', '\n', 'Ø', 'ø', '\r', 'Å', 'å',
    'Δ', '_', 'Φ', 'Γ', 'Λ', 'Ω', 'Π', 'Ψ', 'Σ', 'Θ', 'Ξ', '\u{1B}', 'Æ', 'æ', 'ß', 'É',
    ' ', '!', '"', '#', '¤', '%', '&', '\'', '(', ')', '*', '+', ',', '-', '.', '/',
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', ':', ';', '<', '=', '>', '?',
    '¡', 'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O',
    'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z', 'Ä', 'Ö', 'Ñ', 'Ü', '§',
    '¿', 'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o',
    'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z', 'ä', 'ö', 'ñ', 'ü', 'à',
];

fn extension_char(code: u8) -> Option<char> {
    match code {
        0x0A => Some('\u{0C}'),
        0x14 => Some('^'),
        0x28 => Some('{'),
        0x29 => Some('}'),
        0x2F => Some('\\'),
        0x3C => Some('['),
        0x3D => Some('~'),
        0x3E => Some(']'),
        0x40 => Some('|'),
        0x65 => Some('€'),
        _ => None,
    }
}

/// Expand packed septets into raw 7-bit codes.
///
/// `fill_bits` skips padding at the start (used when the text follows a user
/// data header). At most `max_septets` codes are produced.
pub fn unpack_codes(bytes: &[u8], fill_bits: u8, max_septets: usize) -> Vec<u8> {
    let total_bits = bytes.len() * 8;
    let mut codes = Vec::with_capacity(max_septets.min(total_bits / 7));
    let mut bit = fill_bits as usize;

    while codes.len() < max_septets && bit + 7 <= total_bits {
        let index = bit / 8;
        let shift = bit % 8;
        let lo = bytes[index] as u16;
        let hi = bytes.get(index + 1).copied().unwrap_or(0) as u16;
        let window = (hi << 8) | lo;
        codes.push(((window >> shift) & 0x7F) as u8);
        bit += 7;
    }

    codes
}

/// Map 7-bit codes through the default and extension tables
pub fn decode_codes(codes: &[u8]) -> String {
    let mut text = String::with_capacity(codes.len());
    let mut iter = codes.iter().copied();

    while let Some(code) = iter.next() {
        if code == ESC {
            match iter.next() {
                Some(next) => text.push(extension_char(next).unwrap_or(REPLACEMENT)),
                None => text.push(REPLACEMENT),
            }
        } else {
            text.push(GSM7_BASIC[(code & 0x7F) as usize]);
        }
    }

    text
}

/// Unpack and decode default-alphabet text.
///
/// Returns `None` when nothing could be decoded.
pub fn unpack_septets(bytes: &[u8], fill_bits: u8, max_septets: usize) -> Option<String> {
    let codes = unpack_codes(bytes, fill_bits, max_septets);
    let text = decode_codes(&codes);
    if text.is_empty() { None } else { Some(text) }
}

/// Padding bits after a user data header of `header_octets` octets
/// (including the length octet) so the text starts on a septet boundary
pub fn fill_bits_after_header(header_octets: usize) -> u8 {
    ((7 - (header_octets * 8) % 7) % 7) as u8
}

/// Septet positions consumed by a user data header of `header_octets` octets
pub fn header_septets(header_octets: usize) -> usize {
    (header_octets * 8).div_ceil(7)
}
