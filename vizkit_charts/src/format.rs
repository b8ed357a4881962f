// Copyright 2025 the Vizkit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Number and label formatting.

extern crate alloc;

use alloc::format;
use alloc::string::String;

/// Default number of decimals kept by [`format_number`].
pub const DEFAULT_PRECISION: usize = 2;

/// Formats a value for labels and tooltips.
///
/// Magnitudes of at least a thousand, million or billion are divided down and suffixed with
/// `K`, `M` or `B`. `precision` decimals are kept and trailing zeros trimmed. Missing or
/// non-finite values render as `NA`, without prefix or suffix.
pub fn format_number(
    value: Option<f64>,
    prefix: &str,
    suffix: &str,
    precision: Option<usize>,
) -> String {
    let Some(v) = value.filter(|v| v.is_finite()) else {
        return String::from("NA");
    };
    let precision = precision.unwrap_or(DEFAULT_PRECISION);
    let abs = v.abs();
    let (scaled, unit) = if abs >= 1.0e9 {
        (v / 1.0e9, "B")
    } else if abs >= 1.0e6 {
        (v / 1.0e6, "M")
    } else if abs >= 1.0e3 {
        (v / 1.0e3, "K")
    } else {
        (v, "")
    };
    let digits = trim_fraction(format!("{scaled:.precision$}"));
    format!("{prefix}{digits}{unit}{suffix}")
}

/// Formats an axis tick value with the shortest decimals that distinguish ticks `step` apart.
pub fn format_tick(v: f64, step: f64) -> String {
    let step = step.abs();
    let mut decimals = 0_usize;
    if step.is_finite() && step > 0.0 {
        let mut s = step;
        while s < 1.0 - 1e-9 && decimals < 12 {
            s *= 10.0;
            decimals += 1;
        }
    }
    trim_fraction(format!("{v:.decimals$}"))
}

fn trim_fraction(mut s: String) -> String {
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
    if s == "-0" {
        s.remove(0);
    }
    s
}

/// Shortens `text` to its first `max_chars` characters followed by `...` once it reaches
/// `max_chars` characters.
pub fn truncate_label(text: &str, max_chars: usize) -> String {
    if text.chars().count() < max_chars {
        return String::from(text);
    }
    let mut out: String = text.chars().take(max_chars).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn numbers_get_magnitude_suffixes() {
        assert_eq!(format_number(Some(1_234.0), "", "", None), "1.23K");
        assert_eq!(format_number(Some(2_500_000.0), "$", "", None), "$2.5M");
        assert_eq!(format_number(Some(-3.0e9), "", "", Some(0)), "-3B");
        assert_eq!(format_number(Some(12.0), "", "%", None), "12%");
    }

    #[test]
    fn missing_values_render_na() {
        assert_eq!(format_number(None, "$", "%", None), "NA");
        assert_eq!(format_number(Some(f64::NAN), "", "", None), "NA");
    }

    #[test]
    fn negative_zero_is_plain_zero() {
        assert_eq!(format_number(Some(-0.001), "", "", None), "0");
        assert_eq!(format_tick(-0.0, 1.0), "0");
    }

    #[test]
    fn ticks_keep_step_decimals() {
        assert_eq!(format_tick(0.5, 0.5), "0.5");
        assert_eq!(format_tick(20.0, 10.0), "20");
        assert_eq!(format_tick(0.25, 0.05), "0.25");
    }

    #[test]
    fn labels_truncate_with_ellipsis() {
        assert_eq!(truncate_label("Kenya", 10), "Kenya");
        assert_eq!(truncate_label("Madagascar", 3), "Mad...");
    }
}
