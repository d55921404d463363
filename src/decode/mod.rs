//! DCF77 telegram decoding.
//!
//! The pipeline runs once per detected edge. A rising edge closes a pause,
//! which is checked against the minute-gap window; a falling edge closes a
//! pulse whose width decodes to a single bit. Bits accumulate in a 59-slot
//! buffer and the filled buffer is parity-validated before any field is
//! extracted.

mod bits;
mod classify;
mod parity;

pub use bits::{fields, BitBuffer, Span, Symbol, TELEGRAM_BITS};
pub use classify::{PulseClass, Timing};
pub use parity::{validate as validate_parity, ParityGroup};

use tracing::{debug, trace, warn};

use crate::edge::{width_ms, EdgeEvent, Level};
use crate::telegram::{CalendarRecord, Telegram};

/// Synchronization state of the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncState {
    /// No minute gap seen yet; pulses are classified but never stored.
    #[default]
    Acquiring,
    /// Collecting bits; `second` is the next slot to fill.
    Synchronizing { second: u8 },
    /// All 59 slots filled; awaiting the next minute gap.
    Complete,
}

/// What a single edge did to the decoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Nothing changed: an ordinary pause ended, or a rising edge arrived
    /// while unsynchronized.
    Idle,
    /// A pulse was classified while still acquiring; nothing was stored.
    Acquiring(PulseClass),
    /// The minute gap was detected; the second counter restarted at 0.
    MinuteMark,
    /// A bit was stored at the given second offset.
    Bit { second: u8, bit: u8 },
    /// Pulse width matched neither bit window; sample dropped, counter held.
    Unrecognized { width_ms: u32 },
    /// A recognized pulse arrived where the silent second belongs; the
    /// minute was discarded and the decoder awaits resynchronization.
    Overrun,
}

impl Step {
    /// Diagnostic echo character: the stored bit, or `'*'` for a pulse seen
    /// before synchronization.
    #[must_use]
    pub fn echo(&self) -> Option<char> {
        match self {
            Step::Bit { bit: 0, .. } => Some('0'),
            Step::Bit { .. } => Some('1'),
            Step::Acquiring(_) => Some('*'),
            _ => None,
        }
    }
}

/// Decodes a stream of timestamped edge events into [`Telegram`]s.
///
/// Drive with [`Decoder::feed`] once per edge from the polling loop. The
/// decoder owns all measurement state; the interrupt side shares nothing with
/// it beyond the [`crate::edge::EdgeLatch`]. Every failure mode recovers by
/// listening for the next minute gap; there is no fatal state.
///
/// # Examples
/// Offline decode of a recorded edge stream:
/// ```no_run
/// use dcf77::decode::{decode_edges, Timing};
/// use dcf77::edge::EdgeEvent;
///
/// let edges: Vec<EdgeEvent> = vec![];
/// for telegram in decode_edges(Timing::default(), edges) {
///     println!("{telegram}");
/// }
/// ```
#[derive(Debug, Default)]
pub struct Decoder {
    timing: Timing,
    state: SyncState,
    buffer: BitBuffer,
    /// Timestamp of the last rising edge (pulse start, pause end).
    pulse_start_ms: u32,
    /// Timestamp of the last falling edge (pulse end, pause start).
    pulse_end_ms: u32,
    indicator: bool,
    telegram: Option<Telegram>,
    fresh: bool,
}

impl Decoder {
    #[must_use]
    pub fn new(timing: Timing) -> Self {
        Decoder {
            timing,
            ..Decoder::default()
        }
    }

    #[must_use]
    pub fn state(&self) -> SyncState {
        self.state
    }

    /// Toggled once per accepted bit; mirror to a pin or LED for a liveness
    /// signal visible on a logic analyzer.
    #[must_use]
    pub fn indicator(&self) -> bool {
        self.indicator
    }

    /// True when a parity-valid telegram arrived since the last
    /// [`Decoder::take_telegram`].
    #[must_use]
    pub fn has_new_telegram(&self) -> bool {
        self.fresh
    }

    /// The most recent parity-valid telegram, fresh or not.
    #[must_use]
    pub fn latest(&self) -> Option<&Telegram> {
        self.telegram.as_ref()
    }

    /// The freshly decoded telegram, if one arrived since the last take.
    pub fn take_telegram(&mut self) -> Option<Telegram> {
        if !self.fresh {
            return None;
        }
        self.fresh = false;
        self.telegram.clone()
    }

    /// Process one edge event, updating `record` as bits and minutes arrive.
    pub fn feed(&mut self, edge: EdgeEvent, record: &mut CalendarRecord) -> Step {
        match edge.level {
            Level::High => self.on_rising(edge.timestamp_ms, record),
            Level::Low => self.on_falling(edge.timestamp_ms, record),
        }
    }

    /// Pulse begins, pause ends: the only place the second counter resets.
    fn on_rising(&mut self, now_ms: u32, record: &mut CalendarRecord) -> Step {
        let gap = width_ms(self.pulse_end_ms, now_ms);
        self.pulse_start_ms = now_ms;

        if !self.timing.is_minute_gap(gap) {
            return Step::Idle;
        }

        if self.state == SyncState::Acquiring {
            debug!(gap_ms = gap, "synchronized on minute gap");
        }
        self.state = SyncState::Synchronizing { second: 0 };
        self.buffer.reset();
        record.seconds = 0;
        Step::MinuteMark
    }

    /// Pulse ends, pause begins: classify the width and store the bit.
    fn on_falling(&mut self, now_ms: u32, record: &mut CalendarRecord) -> Step {
        let width = width_ms(self.pulse_start_ms, now_ms);
        self.pulse_end_ms = now_ms;
        let class = self.timing.classify(width);

        let second = match self.state {
            SyncState::Acquiring => return Step::Acquiring(class),
            SyncState::Synchronizing { second } => second,
            SyncState::Complete => {
                if class == PulseClass::Unrecognized {
                    return Step::Unrecognized { width_ms: width };
                }
                warn!(width_ms = width, "pulse in the silent second, discarding minute");
                self.state = SyncState::Acquiring;
                return Step::Overrun;
            }
        };

        let symbol = match class {
            PulseClass::Zero => Symbol::Zero,
            PulseClass::One => Symbol::One,
            PulseClass::Unrecognized => {
                debug!(width_ms = width, second, "unrecognized pulse width, sample dropped");
                return Step::Unrecognized { width_ms: width };
            }
        };

        if let Err(err) = self.buffer.set(second, symbol) {
            // Unreachable while transitions cap the counter at 59; kept as an
            // out-of-bounds guard.
            warn!(second, "discarding minute: {err}");
            self.state = SyncState::Acquiring;
            return Step::Overrun;
        }

        self.indicator = !self.indicator;
        record.seconds = record.seconds.saturating_add(1);
        let bit = u8::from(symbol == Symbol::One);
        trace!(second, bit, "stored bit");

        if usize::from(second) + 1 == TELEGRAM_BITS {
            self.state = SyncState::Complete;
            self.assemble(record);
        } else {
            self.state = SyncState::Synchronizing { second: second + 1 };
        }

        Step::Bit { second, bit }
    }

    fn assemble(&mut self, record: &mut CalendarRecord) {
        match Telegram::decode(&self.buffer) {
            Ok(telegram) => {
                debug!(%telegram, "decoded telegram");
                telegram.apply_to(record);
                self.telegram = Some(telegram);
                self.fresh = true;
            }
            Err(err) => {
                warn!("discarding minute: {err}");
            }
        }
    }
}

/// Decode an iterator of edge events into telegrams.
///
/// Offline counterpart of [`Decoder::feed`] for logged or synthesized edge
/// streams. Rejected minutes are skipped silently, exactly as in the
/// interactive pipeline.
pub fn decode_edges<I>(timing: Timing, edges: I) -> impl Iterator<Item = Telegram>
where
    I: IntoIterator<Item = EdgeEvent>,
{
    let mut decoder = Decoder::new(timing);
    let mut record = CalendarRecord::default();
    edges.into_iter().filter_map(move |edge| {
        decoder.feed(edge, &mut record);
        decoder.take_telegram()
    })
}
