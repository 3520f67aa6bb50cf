/// Parse `s`, `m:s` or `h:m:s` into a number of seconds.
///
/// Every field must be a non-negative integer; empty fields, more than three
/// fields, and values that overflow are rejected.
pub fn parse(input: &str) -> Option<u64> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    let parts = input
        .split(':')
        .map(|p| {
            let p = p.trim();
            if p.is_empty() || !p.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            p.parse::<u64>().ok()
        })
        .collect::<Option<Vec<_>>>()?;

    match parts.as_slice() {
        [s] => Some(*s),
        [m, s] => m.checked_mul(60)?.checked_add(*s),
        [h, m, s] => h.checked_mul(3600)?.checked_add(m.checked_mul(60)?)?.checked_add(*s),
        _ => None,
    }
}

/// Format seconds as `mm:ss`, or `hh:mm:ss` once there is at least an hour
pub fn format(seconds: u64) -> String {
    let h = seconds / 3600;
    let m = (seconds % 3600) / 60;
    let s = seconds % 60;
    if h > 0 {
        format!("{h:02}:{m:02}:{s:02}")
    } else {
        format!("{m:02}:{s:02}")
    }
}

/// Same as [`format`], clamping negative values to zero
pub fn format_signed(seconds: i64) -> String {
    format(seconds.max(0).unsigned_abs())
}
