//! Layered SMS decoding: CP -> RP -> TPDU -> UDH -> {security envelope | text}
//!
//! Each layer lives in its own module and adds its entry points to [`Decoder`].
//! The chain is strictly top-down and never re-enters an earlier layer. A
//! rejection at any depth aborts only the message being decoded; the session
//! keeps every message and flag it had before, plus a sanity-check note in its
//! summary.

mod cp;
mod rp;
pub mod security;
mod text;
mod tpdu;
mod udh;

pub use cp::CpMessageType;
pub use rp::{RpMessageType, TpduType};
pub use tpdu::ValidityPeriodFormat;
pub use udh::InformationElement;

use crate::codec::DecodeError;
use crate::config::DecoderConfig;
use crate::session::Session;

/// What a decoded frame turned out to carry
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dispatch {
    /// A TPDU was decoded and appended to the session with this sequence
    Message { sequence: u32 },
    /// Signalling without a TPDU (acks, errors, reports, memory available)
    Signalling,
}

/// Stateless SMS decoder; all accumulated state lives in the [`Session`]
#[derive(Debug, Clone, Default)]
pub struct Decoder {
    config: DecoderConfig,
}

impl Decoder {
    pub fn new(config: DecoderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Note a rejection on the session and hand the result back
    fn report<T>(
        &self,
        session: &mut Session,
        result: Result<T, DecodeError>,
    ) -> Result<T, DecodeError> {
        if let Err(err) = &result {
            if err.is_fatal() {
                tracing::warn!("SMS decode rejected: {err}");
                session.append_summary(&format!(" FAILED SANITY CHECK ({})", err.sanity_tag()));
            } else {
                tracing::debug!("SMS decode skipped: {err}");
            }
        }
        result
    }
}
