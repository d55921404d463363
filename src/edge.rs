//! Edge events and the interrupt-to-poll handoff.
//!
//! The interrupt context only records that an edge happened and at which
//! level; the clock read and all decoding run later in the polling loop.
//! Whatever poll latency elapses in between shows up as additive width noise
//! and is absorbed by the jitter tolerance in [`crate::decode::Timing`].

use std::sync::atomic::{AtomicU8, Ordering};

/// Logic level of the demodulated receiver output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Low,
    High,
}

/// A single electrical transition, timestamped on the polling side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeEvent {
    pub level: Level,
    /// Reading of a free-running millisecond counter.
    pub timestamp_ms: u32,
}

/// Elapsed milliseconds between two readings of a free-running u32 clock.
///
/// Wrapping subtraction keeps the difference correct across counter rollover
/// (every ~49.7 days at millisecond resolution).
#[must_use]
pub fn width_ms(earlier: u32, later: u32) -> u32 {
    later.wrapping_sub(earlier)
}

const LEVEL_HIGH: u8 = 0b01;
const FRESH: u8 = 0b10;

/// Single-producer/single-consumer cell carrying "an edge happened, at this
/// level" from the interrupt context to the polling loop.
///
/// The interrupt side only stores; the polling side clears the cell as it
/// consumes it. Flag and level share one byte so the pair cannot tear. An
/// unconsumed edge is overwritten by the next one, which is the intended
/// lossy behavior for a signal with one edge pair per second.
#[derive(Debug, Default)]
pub struct EdgeLatch(AtomicU8);

impl EdgeLatch {
    #[must_use]
    pub const fn new() -> Self {
        Self(AtomicU8::new(0))
    }

    /// Record an edge. Callable from an interrupt handler; never blocks.
    pub fn notify(&self, level: Level) {
        let bits = FRESH
            | match level {
                Level::High => LEVEL_HIGH,
                Level::Low => 0,
            };
        self.0.store(bits, Ordering::Release);
    }

    /// Consume the pending edge, if any, clearing the latch.
    pub fn take(&self) -> Option<Level> {
        let bits = self.0.swap(0, Ordering::Acquire);
        if bits & FRESH == 0 {
            return None;
        }
        Some(if bits & LEVEL_HIGH == 0 {
            Level::Low
        } else {
            Level::High
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_is_simple_difference_without_wrap() {
        assert_eq!(width_ms(1_000, 1_100), 100);
        assert_eq!(width_ms(0, 0), 0);
    }

    #[test]
    fn width_survives_counter_rollover() {
        assert_eq!(width_ms(u32::MAX - 99, 100), 200);
        assert_eq!(width_ms(u32::MAX, 0), 1);
    }

    #[test]
    fn latch_is_empty_until_notified() {
        let latch = EdgeLatch::new();
        assert_eq!(latch.take(), None);
    }

    #[test]
    fn latch_take_consumes_the_edge() {
        let latch = EdgeLatch::new();
        latch.notify(Level::High);
        assert_eq!(latch.take(), Some(Level::High));
        assert_eq!(latch.take(), None);

        latch.notify(Level::Low);
        assert_eq!(latch.take(), Some(Level::Low));
        assert_eq!(latch.take(), None);
    }

    #[test]
    fn latch_keeps_only_the_newest_edge() {
        let latch = EdgeLatch::new();
        latch.notify(Level::High);
        latch.notify(Level::Low);
        assert_eq!(latch.take(), Some(Level::Low));
        assert_eq!(latch.take(), None);
    }
}
