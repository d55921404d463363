use crate::decode::ParityGroup;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// Telegram assembly attempted before all 59 slots were filled.
    #[error("telegram incomplete: {filled} of 59 bits set")]
    Incomplete { filled: usize },

    /// Even parity did not hold over the named bit group.
    #[error("parity failure in {0} group")]
    Parity(ParityGroup),

    /// A bit was produced past the last telegram slot.
    #[error("telegram overrun at second {second}")]
    Overrun { second: u8 },
}

pub type Result<T> = std::result::Result<T, Error>;
