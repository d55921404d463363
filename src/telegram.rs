//! Assembled telegrams and the caller-owned calendar record.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::decode::{fields, validate_parity, BitBuffer};
use crate::Result;

/// German weekday abbreviations indexed by the DCF77 weekday number
/// (1 = Monday); index 0 is the "unknown" placeholder.
const WEEKDAYS: [&str; 8] = ["--", "Mo", "Di", "Mi", "Do", "Fr", "Sa", "So"];

/// Standard vs daylight-saving disambiguation carried in bits 17-18.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DstFlag {
    /// Neither bit pattern matched; no zone information.
    #[default]
    Unknown,
    /// MEZ (CET), standard time.
    Standard,
    /// MESZ (CEST), daylight-saving time.
    Daylight,
}

impl DstFlag {
    fn from_bits(value: u32) -> Self {
        match value {
            2 => Self::Standard,
            1 => Self::Daylight,
            _ => Self::Unknown,
        }
    }

    /// Zone label used in the formatted timestamp.
    #[must_use]
    pub fn zone(self) -> &'static str {
        match self {
            Self::Standard => "MEZ",
            Self::Daylight => "MESZ",
            Self::Unknown => "---",
        }
    }
}

/// One fully decoded telegram minute.
///
/// Fields hold exactly what the broadcast encodes; calendar legality (e.g.
/// February 30th) is deliberately not checked here and is left to the caller.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Telegram {
    pub dst: DstFlag,
    pub minute: u8,
    pub hour: u8,
    /// Day of month, 1-31 as broadcast.
    pub day: u8,
    /// 1 = Monday .. 7 = Sunday.
    pub weekday: u8,
    /// 1 = January .. 12 = December.
    pub month: u8,
    /// Year without century, 0-99.
    pub year: u8,
}

impl Telegram {
    /// Assemble a telegram from a complete bit buffer.
    ///
    /// All three parity groups must pass before any field is extracted.
    ///
    /// # Errors
    /// [`crate::Error::Parity`] naming the failing group, or
    /// [`crate::Error::Incomplete`] if the buffer has unset slots.
    // BCD weights sum to 165 for the widest field, so u8 always fits.
    #[allow(clippy::cast_possible_truncation)]
    pub fn decode(buffer: &BitBuffer) -> Result<Self> {
        validate_parity(buffer)?;
        Ok(Telegram {
            dst: DstFlag::from_bits(buffer.bcd_value(fields::DST)?),
            minute: buffer.bcd_value(fields::MINUTE)? as u8,
            hour: buffer.bcd_value(fields::HOUR)? as u8,
            day: buffer.bcd_value(fields::DAY)? as u8,
            weekday: buffer.bcd_value(fields::WEEKDAY)? as u8,
            month: buffer.bcd_value(fields::MONTH)? as u8,
            year: buffer.bcd_value(fields::YEAR)? as u8,
        })
    }

    /// Write this minute into the caller's record.
    ///
    /// Seconds are forced to 0; a telegram encodes the start of its minute.
    pub fn apply_to(&self, record: &mut CalendarRecord) {
        record.seconds = 0;
        record.minute = self.minute;
        record.hour = self.hour;
        record.day = self.day;
        record.weekday = self.weekday;
        record.month = self.month;
        record.year = self.year;
        record.dst = self.dst;
    }

    #[must_use]
    pub fn weekday_name(&self) -> &'static str {
        WEEKDAYS
            .get(usize::from(self.weekday))
            .copied()
            .unwrap_or(WEEKDAYS[0])
    }
}

impl fmt::Display for Telegram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} 20{:02}-{:02}-{:02} {:02}:{:02}:00 {} DCF77",
            self.weekday_name(),
            self.year,
            self.month,
            self.day,
            self.hour,
            self.minute,
            self.dst.zone()
        )
    }
}

/// Broken-down time owned by the caller and updated in place by the decoder.
///
/// Seconds advance by one per accepted bit, reset to 0 at every minute mark,
/// and every field is overwritten when a parity-valid telegram decodes. After
/// a rejected minute the record keeps its previous (stale) value.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CalendarRecord {
    pub seconds: u8,
    pub minute: u8,
    pub hour: u8,
    pub day: u8,
    pub weekday: u8,
    pub month: u8,
    pub year: u8,
    pub dst: DstFlag,
}

impl fmt::Display for CalendarRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} 20{:02}-{:02}-{:02} {:02}:{:02}:{:02} {} DCF77",
            WEEKDAYS
                .get(usize::from(self.weekday))
                .copied()
                .unwrap_or(WEEKDAYS[0]),
            self.year,
            self.month,
            self.day,
            self.hour,
            self.minute,
            self.seconds,
            self.dst.zone()
        )
    }
}
