// ABOUTME: Value types for the GSM 03.48 security header selectors (SPI, KIc, KID)
// ABOUTME: Descriptive only; nothing here performs ciphering or checksum verification

use std::fmt;

/// Counter handling requested by SPI1 bits 4-3
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum CounterPolicy {
    /// No counter available
    NoCounter,
    /// Counter available, no replay checking
    Available,
    /// Process if counter is higher than the stored value
    Higher,
    /// Process if counter is exactly one higher
    OneHigher,
}

impl CounterPolicy {
    pub fn from_spi1(spi1: u8) -> Self {
        match (spi1 >> 3) & 0x03 {
            0 => CounterPolicy::NoCounter,
            1 => CounterPolicy::Available,
            2 => CounterPolicy::Higher,
            _ => CounterPolicy::OneHigher,
        }
    }
}

impl fmt::Display for CounterPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CounterPolicy::NoCounter => "NO_CNTR",
            CounterPolicy::Available => "CNTR_AV",
            CounterPolicy::Higher => "CNTR_HI",
            CounterPolicy::OneHigher => "CNTR_+1",
        })
    }
}

/// Redundancy check requested by SPI1 bits 1-0
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum IntegrityMode {
    None,
    RedundancyCheck,
    CryptographicChecksum,
    DigitalSignature,
}

impl IntegrityMode {
    pub fn from_spi1(spi1: u8) -> Self {
        match spi1 & 0x03 {
            0 => IntegrityMode::None,
            1 => IntegrityMode::RedundancyCheck,
            2 => IntegrityMode::CryptographicChecksum,
            _ => IntegrityMode::DigitalSignature,
        }
    }
}

impl fmt::Display for IntegrityMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            IntegrityMode::None => "NOCC",
            IntegrityMode::RedundancyCheck => "RC",
            IntegrityMode::CryptographicChecksum => "CC",
            IntegrityMode::DigitalSignature => "DS",
        })
    }
}

/// Which key identifier octet an algorithm selector was read from
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum KeyRole {
    /// KIc, ciphering key
    Ciphering,
    /// KID, redundancy check / signature key
    Integrity,
}

/// Algorithm selected by the low nibble of KIc or KID
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Algorithm {
    /// Algorithm known implicitly by both ends
    Implicit,
    DesCbc,
    TripleDes2Key,
    TripleDes3Key,
    DesEcb,
    Reserved,
    Proprietary,
}

impl Algorithm {
    /// Decode a key identifier octet. DES in ECB mode only exists for ciphering;
    /// the same selector in KID is reserved.
    pub fn from_key_identifier(octet: u8, role: KeyRole) -> Self {
        match octet & 0x03 {
            0 => Algorithm::Implicit,
            1 => match ((octet >> 2) & 0x03, role) {
                (0, _) => Algorithm::DesCbc,
                (1, _) => Algorithm::TripleDes2Key,
                (2, _) => Algorithm::TripleDes3Key,
                (_, KeyRole::Ciphering) => Algorithm::DesEcb,
                (_, KeyRole::Integrity) => Algorithm::Reserved,
            },
            2 => Algorithm::Reserved,
            _ => Algorithm::Proprietary,
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Algorithm::Implicit => "IMPLICIT",
            Algorithm::DesCbc => "1DES-CBC",
            Algorithm::TripleDes2Key => "3DES-2K",
            Algorithm::TripleDes3Key => "3DES-3K",
            Algorithm::DesEcb => "1DES-ECB",
            Algorithm::Reserved => "RESERVED",
            Algorithm::Proprietary => "PROPRIET",
        })
    }
}
