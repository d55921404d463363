use std::fmt;
use std::ops::Range;

use super::bits::BitBuffer;
use crate::{Error, Result};

/// The three independently parity-protected bit groups of a telegram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParityGroup {
    Minutes,
    Hours,
    /// Day-of-month, weekday, month, and year together.
    Date,
}

impl ParityGroup {
    pub(crate) const ALL: [Self; 3] = [Self::Minutes, Self::Hours, Self::Date];

    /// Bit range covered by the group, its parity bit included.
    #[must_use]
    pub fn range(self) -> Range<usize> {
        match self {
            Self::Minutes => 21..29,
            Self::Hours => 29..36,
            Self::Date => 36..59,
        }
    }
}

impl fmt::Display for ParityGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Minutes => "minutes",
            Self::Hours => "hours",
            Self::Date => "date",
        })
    }
}

/// Check even parity over each protected group of a telegram.
///
/// Each group carries its own parity bit inside its range, so every group's
/// bit sum must be even on its own. Groups are checked independently rather
/// than as one combined sum; a combined sum would accept two corrupted groups
/// whose errors cancel, and could not name the group at fault.
///
/// # Errors
/// [`Error::Parity`] naming the first failing group, or [`Error::Incomplete`]
/// when a covered slot is unset.
pub fn validate(buffer: &BitBuffer) -> Result<()> {
    for group in ParityGroup::ALL {
        if buffer.bit_sum(group.range())? % 2 != 0 {
            return Err(Error::Parity(group));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // Documented example telegram: Sa 2016-03-05 09:39 MEZ.
    const EXAMPLE: &str = "01001101001001000010110011100100100010100001111000011010001";

    fn flipped(bits: &str, index: usize) -> String {
        bits.chars()
            .enumerate()
            .map(|(i, c)| {
                if i == index {
                    if c == '0' {
                        '1'
                    } else {
                        '0'
                    }
                } else {
                    c
                }
            })
            .collect()
    }

    #[test]
    fn example_telegram_passes_all_groups() {
        let buf = BitBuffer::from_bits(EXAMPLE);
        validate(&buf).unwrap();
    }

    #[test]
    fn flipped_minute_bit_fails_only_the_minutes_group() {
        let buf = BitBuffer::from_bits(&flipped(EXAMPLE, 24));
        assert_eq!(validate(&buf), Err(Error::Parity(ParityGroup::Minutes)));
        // Hours and date sums are untouched by the flip
        assert_eq!(buf.bit_sum(ParityGroup::Hours.range()).unwrap() % 2, 0);
        assert_eq!(buf.bit_sum(ParityGroup::Date.range()).unwrap() % 2, 0);
    }

    #[test]
    fn every_single_bit_flip_in_a_group_is_caught() {
        for group in ParityGroup::ALL {
            for index in group.range() {
                let buf = BitBuffer::from_bits(&flipped(EXAMPLE, index));
                assert_eq!(
                    validate(&buf),
                    Err(Error::Parity(group)),
                    "flip at bit {index}"
                );
            }
        }
    }

    #[test]
    fn flipped_parity_bit_itself_fails_its_group() {
        // Bit 28 is the minutes parity bit
        let buf = BitBuffer::from_bits(&flipped(EXAMPLE, 28));
        assert_eq!(validate(&buf), Err(Error::Parity(ParityGroup::Minutes)));
    }

    #[test]
    fn partial_buffer_reports_incomplete() {
        let buf = BitBuffer::from_bits(&EXAMPLE[..40]);
        assert!(matches!(validate(&buf), Err(Error::Incomplete { .. })));
    }
}
