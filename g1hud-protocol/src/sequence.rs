//! Wrapping 8-bit sequence numbers
//!
//! Every outgoing command carries one byte of sequence. Valid values are
//! 0..=254; 255 is never produced, the counter wraps back to 0 instead.

/// Largest sequence number ever produced
pub const MAX_SEQUENCE: u8 = 254;

/// Sequence number generator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SequenceCounter {
    next: u8,
}

impl SequenceCounter {
    /// Counter whose first value is 0
    pub const fn new() -> Self {
        Self { next: 0 }
    }

    /// Value the next call to [`SequenceCounter::next_seq`] returns
    pub const fn peek(&self) -> u8 {
        self.next
    }

    /// Take the current value and advance
    pub fn next_seq(&mut self) -> u8 {
        let seq = self.next;
        self.next = if seq >= MAX_SEQUENCE { 0 } else { seq + 1 };
        seq
    }
}
