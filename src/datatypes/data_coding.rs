// ABOUTME: GSM 03.38 data coding scheme classification into alphabet, compression and message class
// ABOUTME: Total over every byte value so untrusted DCS octets always map to a defined variant

use std::fmt;

/// Bit 5 of a general data coding group marks compressed user data
const DCS_COMPRESSED: u8 = 0x20;

/// Bit 4 of a general data coding group says the low two bits carry a class
const DCS_HAS_CLASS: u8 = 0x10;

/// Character set selected by a data coding scheme.
///
/// Discriminants are the `sms_meta.alphabet` column values: 0 none, 1 default,
/// 2 UCS-2, 3 8-bit.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
#[repr(u8)]
pub enum Alphabet {
    /// Reserved or undefined coding
    #[default]
    Unknown = 0,
    /// GSM 7-bit default alphabet, packed septets
    Default7Bit = 1,
    /// UCS-2, 16 bits per character
    Ucs2 = 2,
    /// 8-bit binary data
    Data8Bit = 3,
}

impl Alphabet {
    pub fn name(&self) -> &'static str {
        match self {
            Alphabet::Unknown => "unknown",
            Alphabet::Default7Bit => "GSM 7-bit default",
            Alphabet::Data8Bit => "8-bit data",
            Alphabet::Ucs2 => "UCS-2",
        }
    }
}

/// Message class carried by the data coding scheme
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
#[repr(u8)]
pub enum MessageClass {
    /// Class 0, displayed immediately (flash)
    Display = 0,
    /// Class 1, mobile equipment specific
    MobileEquipment = 1,
    /// Class 2, SIM specific
    Sim = 2,
    /// Class 3, terminal equipment specific
    TerminalEquipment = 3,
    /// No class given
    #[default]
    None = 4,
}

impl MessageClass {
    fn from_low_bits(dcs: u8) -> Self {
        match dcs & 0x03 {
            0 => MessageClass::Display,
            1 => MessageClass::MobileEquipment,
            2 => MessageClass::Sim,
            _ => MessageClass::TerminalEquipment,
        }
    }

    /// Returns a human-readable description of the message class
    pub fn description(&self) -> &'static str {
        match self {
            MessageClass::Display => "Class 0 (immediate display)",
            MessageClass::MobileEquipment => "Class 1 (ME specific)",
            MessageClass::Sim => "Class 2 (SIM specific)",
            MessageClass::TerminalEquipment => "Class 3 (TE specific)",
            MessageClass::None => "no class",
        }
    }
}

/// Classify the message class of a DCS octet.
///
/// Group `00xx` carries a class only when bit 4 is set, group `1111` always
/// does. All other groups have no class.
pub fn classify_class(dcs: u8) -> MessageClass {
    let coding_group = dcs >> 4;

    if coding_group & 0x0c == 0 {
        if dcs & DCS_HAS_CLASS != 0 {
            return MessageClass::from_low_bits(dcs);
        }
    } else if coding_group == 0x0f {
        return MessageClass::from_low_bits(dcs);
    }

    MessageClass::None
}

/// Classify the alphabet of a DCS octet, along with its compression flag.
///
/// `0x00` is the common case and short-circuits to the default alphabet.
pub fn classify_alphabet(dcs: u8) -> (Alphabet, bool) {
    if dcs == 0x00 {
        return (Alphabet::Default7Bit, false);
    }

    let coding_group = dcs >> 4;

    if coding_group & 0x0c == 0 {
        // General data coding, 00xx xxxx
        let alphabet = match (dcs >> 2) & 0x03 {
            0 => Alphabet::Default7Bit,
            1 => Alphabet::Data8Bit,
            2 => Alphabet::Ucs2,
            _ => Alphabet::Unknown,
        };
        return (alphabet, dcs & DCS_COMPRESSED != 0);
    }

    let alphabet = match coding_group {
        // Message waiting indication, discard or store
        0x0c | 0x0d => Alphabet::Default7Bit,
        // Message waiting indication, store, UCS-2
        0x0e => Alphabet::Ucs2,
        // Data coding / message class, 1111 xxxx
        0x0f if dcs & 0x04 != 0 => Alphabet::Data8Bit,
        0x0f => Alphabet::Default7Bit,
        _ => Alphabet::Unknown,
    };
    (alphabet, false)
}

/// A raw DCS octet together with its classification
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct DataCodingScheme {
    raw: u8,
    alphabet: Alphabet,
    compressed: bool,
    class: MessageClass,
}

impl DataCodingScheme {
    pub fn from_byte(raw: u8) -> Self {
        let (alphabet, compressed) = classify_alphabet(raw);
        Self {
            raw,
            alphabet,
            compressed,
            class: classify_class(raw),
        }
    }

    /// Returns the raw u8 value
    pub fn to_byte(&self) -> u8 {
        self.raw
    }

    pub fn alphabet(&self) -> Alphabet {
        self.alphabet
    }

    pub fn is_compressed(&self) -> bool {
        self.compressed
    }

    pub fn message_class(&self) -> MessageClass {
        self.class
    }

    /// Whether user data length counts septets, so the octet length is `ceil(len * 7 / 8)`
    pub fn counts_septets(&self) -> bool {
        self.alphabet == Alphabet::Default7Bit && !self.compressed
    }

    /// Octets occupied by `length` units of user data
    pub fn octet_length(&self, length: u8) -> usize {
        if self.counts_septets() {
            septets_to_octets(length as usize)
        } else {
            length as usize
        }
    }
}

/// Octets needed to carry `septets` packed 7-bit characters
pub fn septets_to_octets(septets: usize) -> usize {
    (septets * 7).div_ceil(8)
}

impl From<u8> for DataCodingScheme {
    fn from(value: u8) -> Self {
        Self::from_byte(value)
    }
}

impl fmt::Display for DataCodingScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.alphabet.name())?;
        if self.compressed {
            write!(f, ", compressed")?;
        }
        if self.class != MessageClass::None {
            write!(f, " ({})", self.class.description())?;
        }
        Ok(())
    }
}
