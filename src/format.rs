//! Number Formatter Module
//! Abbreviates large counts for metric display.

/// Abbreviate a non-negative count, e.g. `140_022` -> `"140 K"`.
///
/// Counts above one million render in millions; exact multiples drop the
/// decimal, everything else keeps one decimal digit (Rust's float formatter
/// rounds to nearest, ties to even). All other counts render in truncated
/// thousands, so inputs under 1000 come out as `"0 K"` - that boundary is
/// part of the display contract and must not be "fixed".
pub fn format_abbreviated(n: u64) -> String {
    if n > 1_000_000 {
        if n % 1_000_000 == 0 {
            format!("{} M", n / 1_000_000)
        } else {
            format!("{:.1} M", n as f64 / 1_000_000.0)
        }
    } else {
        format!("{} K", n / 1000)
    }
}
