mod address;
mod data_coding;
pub mod envelope;
pub mod gsm7;
mod hex;
mod message;

pub use address::{AddressLength, TypeOfNumber, decode_address};
pub use data_coding::{
    Alphabet, DataCodingScheme, MessageClass, classify_alphabet, classify_class, septets_to_octets,
};
pub use gsm7::unpack_septets;
pub use hex::HexData;
pub use message::{Annotation, DecodedMessage, NO_ADDRESS, Tag};

use std::fmt;

/// Which side of the radio link sent the message
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Network to mobile (MT): SMS-DELIVER and its reports
    FromNetwork,
    /// Mobile to network (MO): SMS-SUBMIT and its reports
    FromMobile,
}

impl Direction {
    pub fn is_from_network(&self) -> bool {
        matches!(self, Direction::FromNetwork)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::FromNetwork => "network",
            Direction::FromMobile => "mobile",
        })
    }
}
