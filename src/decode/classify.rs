use typed_builder::TypedBuilder;

/// Classification of a single carrier-reduction pulse by its width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PulseClass {
    Zero,
    One,
    /// Width matched neither bit window; the sample is dropped.
    Unrecognized,
}

/// Pulse and gap timing windows, all in milliseconds.
///
/// Defaults follow the DCF77 broadcast: 100 ms carrier reductions for logical
/// 0, 200 ms for logical 1, and 1800..=1900 ms of silence before the minute
/// marker. `jitter_ms` widens every window on both ends to absorb receiver
/// noise and poll latency; all window bounds are inclusive.
#[derive(Debug, Clone, PartialEq, Eq, TypedBuilder)]
pub struct Timing {
    #[builder(default = 100)]
    pub zero_ms: u32,
    #[builder(default = 200)]
    pub one_ms: u32,
    #[builder(default = 35)]
    pub jitter_ms: u32,
    #[builder(default = 1800)]
    pub min_gap_ms: u32,
    #[builder(default = 1900)]
    pub max_gap_ms: u32,
}

impl Default for Timing {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Timing {
    /// Classify a pulse by its measured width.
    #[must_use]
    pub fn classify(&self, width_ms: u32) -> PulseClass {
        if self.in_window(width_ms, self.zero_ms) {
            PulseClass::Zero
        } else if self.in_window(width_ms, self.one_ms) {
            PulseClass::One
        } else {
            PulseClass::Unrecognized
        }
    }

    /// True when a pause is long enough to be the silent 59th second.
    #[must_use]
    pub fn is_minute_gap(&self, width_ms: u32) -> bool {
        width_ms >= self.min_gap_ms.saturating_sub(self.jitter_ms)
            && width_ms <= self.max_gap_ms + self.jitter_ms
    }

    fn in_window(&self, width_ms: u32, nominal_ms: u32) -> bool {
        width_ms >= nominal_ms.saturating_sub(self.jitter_ms)
            && width_ms <= nominal_ms + self.jitter_ms
    }
}
