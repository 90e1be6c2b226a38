// ABOUTME: Per-capture session accumulator: running summary text, SMS flags and decoded messages
// ABOUTME: Messages are kept latest-first; sequence numbers come from the current head

use crate::datatypes::DecodedMessage;
use std::collections::VecDeque;

/// Flags the connection and relay layers raise on a session
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionFlags {
    /// At least one SMS frame was seen
    pub has_sms: bool,
    /// Mobile-originated SMS traffic was seen
    pub mo: bool,
    /// Mobile-terminated SMS traffic was seen
    pub mt: bool,
    /// A frame with an unrecognized message type was seen
    pub unknown: bool,
}

/// Accumulates what the decoder learns about one capture session
#[derive(Clone, Debug, Default)]
pub struct Session {
    id: u32,
    summary: String,
    flags: SessionFlags,
    messages: VecDeque<DecodedMessage>,
}

impl Session {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    /// Running description of the current frame
    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// Overwrite the summary
    pub fn set_summary(&mut self, text: &str) {
        self.summary.clear();
        self.summary.push_str(text);
    }

    /// Append to the summary, no deduplication
    pub fn append_summary(&mut self, text: &str) {
        self.summary.push_str(text);
    }

    pub fn flags(&self) -> SessionFlags {
        self.flags
    }

    pub(crate) fn flags_mut(&mut self) -> &mut SessionFlags {
        &mut self.flags
    }

    /// Insert a decoded message at the head of the list and return it.
    ///
    /// The message's sequence is one past the current head, or 0 for an empty
    /// session.
    pub fn push_message(&mut self, mut message: DecodedMessage) -> &DecodedMessage {
        message.sequence = self.next_sequence();
        self.messages.push_front(message);
        &self.messages[0]
    }

    /// Sequence the next message will receive
    pub fn next_sequence(&self) -> u32 {
        self.messages
            .front()
            .map_or(0, |head| head.sequence.wrapping_add(1))
    }

    /// Decoded messages, most recent first
    pub fn messages(&self) -> impl DoubleEndedIterator<Item = &DecodedMessage> + ExactSizeIterator {
        self.messages.iter()
    }

    pub fn latest(&self) -> Option<&DecodedMessage> {
        self.messages.front()
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// Fold a session decoded independently into this one.
    ///
    /// Messages from `other` are appended oldest first and renumbered after
    /// this session's head; flags are OR-ed and the summary is appended.
    pub fn merge(&mut self, other: Session) {
        self.flags.has_sms |= other.flags.has_sms;
        self.flags.mo |= other.flags.mo;
        self.flags.mt |= other.flags.mt;
        self.flags.unknown |= other.flags.unknown;

        if !other.summary.is_empty() {
            if !self.summary.is_empty() {
                self.summary.push_str("; ");
            }
            self.summary.push_str(&other.summary);
        }

        for message in other.messages.into_iter().rev() {
            self.push_message(message);
        }
    }
}
