use crate::{Error, Result};

/// Number of bit slots in one telegram minute; second 59 is silent.
pub const TELEGRAM_BITS: usize = 59;

/// One telegram slot: either not yet received, or the decoded bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Symbol {
    #[default]
    Unset,
    Zero,
    One,
}

impl Symbol {
    fn bit(self) -> Option<u32> {
        match self {
            Symbol::Zero => Some(0),
            Symbol::One => Some(1),
            Symbol::Unset => None,
        }
    }
}

/// BCD place values for a field of up to 8 bits, least significant first.
const BCD_WEIGHTS: [u32; 8] = [1, 2, 4, 8, 10, 20, 40, 80];

/// A bit span within the telegram; `first` is the transmit second of the
/// least significant bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub first: usize,
    pub len: usize,
}

/// DCF77 field layout over bit positions 0-58.
pub mod fields {
    use super::Span;

    /// Standard/daylight-saving flag bits.
    pub const DST: Span = Span { first: 17, len: 2 };
    pub const MINUTE: Span = Span { first: 21, len: 7 };
    pub const HOUR: Span = Span { first: 29, len: 6 };
    /// Day of month.
    pub const DAY: Span = Span { first: 36, len: 6 };
    /// 1 = Monday .. 7 = Sunday.
    pub const WEEKDAY: Span = Span { first: 42, len: 3 };
    pub const MONTH: Span = Span { first: 45, len: 5 };
    /// Year without century.
    pub const YEAR: Span = Span { first: 50, len: 8 };
}

/// The 59 bit slots of one telegram minute, indexed by second-within-minute.
///
/// Slots are filled in increasing order, one per recognized pulse, so the set
/// slots always form a contiguous prefix. Each slot carries an explicit
/// [`Symbol::Unset`] tag rather than a sentinel value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitBuffer {
    slots: [Symbol; TELEGRAM_BITS],
}

impl Default for BitBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl BitBuffer {
    pub const LEN: usize = TELEGRAM_BITS;

    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: [Symbol::Unset; TELEGRAM_BITS],
        }
    }

    /// Build a buffer from a string of '0'/'1' characters, e.g. a logged
    /// telegram. Any other character leaves its slot unset; characters past
    /// position 58 are ignored.
    #[must_use]
    pub fn from_bits(s: &str) -> Self {
        let mut buf = Self::new();
        for (i, c) in s.chars().take(TELEGRAM_BITS).enumerate() {
            buf.slots[i] = match c {
                '0' => Symbol::Zero,
                '1' => Symbol::One,
                _ => Symbol::Unset,
            };
        }
        buf
    }

    /// Clear every slot back to unset.
    pub fn reset(&mut self) {
        self.slots = [Symbol::Unset; TELEGRAM_BITS];
    }

    /// Store a bit at the given second offset.
    ///
    /// # Errors
    /// [`Error::Overrun`] for offsets past the last slot; the buffer is left
    /// untouched.
    pub fn set(&mut self, second: u8, symbol: Symbol) -> Result<()> {
        let idx = usize::from(second);
        if idx >= TELEGRAM_BITS {
            return Err(Error::Overrun { second });
        }
        self.slots[idx] = symbol;
        Ok(())
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Symbol {
        self.slots.get(index).copied().unwrap_or(Symbol::Unset)
    }

    /// The telegram is complete once the last slot has been filled.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.slots[TELEGRAM_BITS - 1] != Symbol::Unset
    }

    /// Count of slots holding a decoded bit.
    #[must_use]
    pub fn filled(&self) -> usize {
        self.slots.iter().filter(|s| **s != Symbol::Unset).count()
    }

    /// Decode a BCD field as the weighted sum of its bits.
    ///
    /// Fields are at most 8 bits with weights summing to 165, so the result
    /// cannot overflow.
    ///
    /// # Errors
    /// [`Error::Incomplete`] if any slot in the span is unset.
    pub fn bcd_value(&self, span: Span) -> Result<u32> {
        debug_assert!(span.len <= BCD_WEIGHTS.len());
        let mut value = 0;
        for i in 0..span.len {
            let bit = self.get(span.first + i).bit().ok_or(Error::Incomplete {
                filled: self.filled(),
            })?;
            value += bit * BCD_WEIGHTS[i];
        }
        Ok(value)
    }

    /// Sum of the bits over `range`, for parity checks.
    ///
    /// # Errors
    /// [`Error::Incomplete`] if any slot in the range is unset.
    pub(crate) fn bit_sum(&self, range: std::ops::Range<usize>) -> Result<u32> {
        let mut sum = 0;
        for i in range {
            sum += self.get(i).bit().ok_or(Error::Incomplete {
                filled: self.filled(),
            })?;
        }
        Ok(sum)
    }
}
