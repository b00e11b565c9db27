//! Positional motion arguments.
//!
//! Numbers are parsed the way C `atoi` does: leading whitespace, an optional
//! sign, then the longest run of digits. Anything unparsable reads as 0
//! instead of failing, so `ptzcam abc` pans by zero degrees.

use ptzcam_common::config::MotionParameters;

/// Lenient integer parse; saturates at the `i32` bounds.
pub fn atoi(input: &str) -> i32 {
    let trimmed = input.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let mut value: i64 = 0;
    for digit in digits.bytes().take_while(u8::is_ascii_digit) {
        value = (value * 10 + i64::from(digit - b'0')).min(i64::from(i32::MAX) + 1);
    }
    if negative {
        value = -value;
    }
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// A timing argument; negative values become 0.
fn non_negative(name: &str, raw: &str) -> u32 {
    let value = atoi(raw);
    u32::try_from(value).unwrap_or_else(|_| {
        tracing::warn!("{name} of {value} ms is negative; using 0");
        0
    })
}

/// The four optional positionals as typed on the command line.
#[derive(Debug, Clone, Default)]
pub struct MotionArgs<'a> {
    pub pan: Option<&'a str>,
    pub tilt: Option<&'a str>,
    pub time: Option<&'a str>,
    pub wait: Option<&'a str>,
}

impl MotionArgs<'_> {
    /// Fill the given arguments over `defaults`.
    pub fn resolve(&self, defaults: MotionParameters) -> MotionParameters {
        MotionParameters {
            pan_delta: self.pan.map(atoi).unwrap_or(defaults.pan_delta),
            tilt_delta: self.tilt.map(atoi).unwrap_or(defaults.tilt_delta),
            settle_base_ms: self
                .time
                .map(|raw| non_negative("settle time", raw))
                .unwrap_or(defaults.settle_base_ms),
            per_degree_wait_ms: self
                .wait
                .map(|raw| non_negative("per-degree wait", raw))
                .unwrap_or(defaults.per_degree_wait_ms),
        }
    }
}
