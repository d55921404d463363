use dcf77::edge::{EdgeEvent, Level};

/// Milliseconds in one broadcast minute.
pub const MINUTE_MS: u32 = 60_000;

/// Build a 59-character telegram bit string with correct per-group parity.
///
/// `dst` is the raw two-bit flag value (2 = standard, 1 = daylight).
pub fn encode_telegram(
    dst: u8,
    minute: u8,
    hour: u8,
    day: u8,
    weekday: u8,
    month: u8,
    year: u8,
) -> String {
    let mut bits = ['0'; 59];
    // Start-of-time bit, always 1
    bits[20] = '1';
    set_bcd(&mut bits, 17, 2, dst);
    set_bcd(&mut bits, 21, 7, minute);
    set_bcd(&mut bits, 29, 6, hour);
    set_bcd(&mut bits, 36, 6, day);
    set_bcd(&mut bits, 42, 3, weekday);
    set_bcd(&mut bits, 45, 5, month);
    set_bcd(&mut bits, 50, 8, year);
    bits[28] = parity_bit(&bits, 21, 28);
    bits[35] = parity_bit(&bits, 29, 35);
    bits[58] = parity_bit(&bits, 36, 58);
    bits.iter().collect()
}

/// Write `value` as BCD: ones digit in the low four place values, tens above.
fn set_bcd(bits: &mut [char; 59], first: usize, len: usize, value: u8) {
    let packed = u32::from(value % 10) | (u32::from(value / 10) << 4);
    for i in 0..len {
        if packed >> i & 1 == 1 {
            bits[first + i] = '1';
        }
    }
}

/// Even-parity bit over `bits[first..last]`.
fn parity_bit(bits: &[char; 59], first: usize, last: usize) -> char {
    let ones = bits[first..last].iter().filter(|c| **c == '1').count();
    if ones % 2 == 1 {
        '1'
    } else {
        '0'
    }
}

/// A priming pulse so the decoder sees a minute gap before the first
/// telegram; the first minute should start at `start_ms + 2_000`.
pub fn preamble(start_ms: u32) -> Vec<EdgeEvent> {
    vec![
        EdgeEvent {
            level: Level::High,
            timestamp_ms: start_ms,
        },
        EdgeEvent {
            level: Level::Low,
            timestamp_ms: start_ms + 100,
        },
    ]
}

/// Convert a telegram bit string into the edge events of one broadcast
/// minute: one pulse per second, 100 ms for 0 and 200 ms for 1. The silent
/// 59th second falls out naturally before the next minute's first pulse.
pub fn edges_for_minute(bits: &str, start_ms: u32) -> Vec<EdgeEvent> {
    let mut edges = Vec::new();
    let mut t = start_ms;
    for c in bits.chars() {
        let width = if c == '1' { 200 } else { 100 };
        edges.push(EdgeEvent {
            level: Level::High,
            timestamp_ms: t,
        });
        edges.push(EdgeEvent {
            level: Level::Low,
            timestamp_ms: t + width,
        });
        t += 1_000;
    }
    edges
}
