//! Formatting helpers for vote tallies and durations.

/// Scale a raw on-chain amount down by the mint's decimal count, truncating.
pub fn token_amount(raw: u64, decimals: u32) -> u64 {
    raw / 10u64.pow(decimals)
}

/// Render an integer with `,` thousands separators.
pub fn thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// A duration broken into calendar-ish units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeParts {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

/// Break a second count into days/hours/minutes/seconds.
pub fn secs_to_parts(secs: i64) -> TimeParts {
    let minutes = secs / 60;
    let hours = minutes / 60;
    TimeParts {
        days: hours / 24,
        hours: hours % 24,
        minutes: minutes % 60,
        seconds: secs % 60,
    }
}

/// Compact rendering of a duration, omitting leading zero units.
pub fn secs_to_string(secs: i64) -> String {
    let parts = secs_to_parts(secs);
    let days = if parts.days > 0 {
        format!("{}d : ", parts.days)
    } else {
        String::new()
    };
    let hours = if parts.hours > 0 {
        format!("{}h : ", parts.hours)
    } else {
        String::new()
    };
    let minutes = if parts.minutes > 0 {
        format!("{}m", parts.minutes)
    } else {
        String::new()
    };
    format!("{days}{hours}{minutes}{}s", parts.seconds)
}
