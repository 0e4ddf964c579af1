// src/util.rs
use std::time::{SystemTime, UNIX_EPOCH};

/// Current unix timestamp in seconds. All persisted timestamps go through
/// this so tests can reason about ordering with plain integers.
pub fn now_unix() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

/// Render an integer price with thousands separators ("1234567" -> "1,234,567").
pub fn format_price(price: i64) -> String {
    let digits = price.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i != 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
