// Copyright 2025 the Vizkit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Calendar time: parsing, formatting and tick generation.
//!
//! Time is modeled as seconds since the Unix epoch (UTC) so it can flow through linear scales.
//! Dates are parsed and formatted with strftime-style patterns via `chrono`.

extern crate alloc;

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use chrono::format::{Parsed, StrftimeItems, parse};
use chrono::{DateTime, Datelike, NaiveDate, NaiveTime};
use vizkit_core::{Error, Label, Result};

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;
use crate::scale::nice_step;

/// Date pattern used when a chart does not configure one.
pub const DEFAULT_DATE_FORMAT: &str = "%Y";

const DAY: f64 = 24.0 * 60.0 * 60.0;

/// Parses `text` with a strftime-style `format` into seconds since the Unix epoch.
///
/// Fields the format leaves out default to the start of their period: a `%Y` date is
/// January 1st at midnight.
pub fn parse_date(text: &str, format: &str) -> Result<f64> {
    let invalid = || Error::InvalidDate {
        value: text.to_string(),
        format: format.to_string(),
    };
    let mut parsed = Parsed::new();
    parse(&mut parsed, text.trim(), StrftimeItems::new(format)).map_err(|_| invalid())?;
    let date = match parsed.to_naive_date() {
        Ok(date) => date,
        Err(_) => {
            let year = parsed.year().ok_or_else(invalid)?;
            NaiveDate::from_ymd_opt(
                year,
                parsed.month().unwrap_or(1),
                parsed.day().unwrap_or(1),
            )
            .ok_or_else(invalid)?
        }
    };
    let time = parsed.to_naive_time().unwrap_or(NaiveTime::MIN);
    #[allow(
        clippy::cast_precision_loss,
        reason = "timestamps within the chrono range are far below 2^53"
    )]
    let seconds = date.and_time(time).and_utc().timestamp() as f64;
    Ok(seconds)
}

/// Parses a datum's date label: text goes through `format`, numbers are read as the formatted
/// text of the number (so `2020` under `%Y` is the year 2020).
pub fn parse_date_label(label: &Label, format: &str) -> Result<f64> {
    parse_date(&label.text(), format)
}

/// [`parse_date_label`] for chart input: unparsable dates are logged and yield `None`.
pub(crate) fn parse_date_lenient(label: &Label, format: &str) -> Option<f64> {
    match parse_date_label(label, format) {
        Ok(t) => Some(t),
        Err(err) => {
            tracing::warn!(%err, "skipping datum with an unparsable date");
            None
        }
    }
}

/// Formats seconds since the Unix epoch with a strftime-style `format`.
///
/// Timestamps outside the representable range render as their raw number.
pub fn format_date(seconds: f64, format: &str) -> String {
    let Some(dt) = to_datetime(seconds) else {
        return seconds.to_string();
    };
    dt.format(format).to_string()
}

fn to_datetime(seconds: f64) -> Option<DateTime<chrono::Utc>> {
    if !seconds.is_finite() {
        return None;
    }
    let secs = seconds.round().clamp(i64::MIN as f64, i64::MAX as f64);
    #[allow(clippy::cast_possible_truncation, reason = "clamped to the i64 range")]
    let secs = secs as i64;
    DateTime::from_timestamp(secs, 0)
}

/// Returns calendar-aligned ticks inside `[min, max]` (seconds), targeting `count` ticks.
///
/// Sub-day spans step through fixed second/minute/hour/day intervals; longer spans step through
/// whole months, then whole years.
pub fn time_ticks(mut min: f64, mut max: f64, count: usize) -> Vec<f64> {
    if count == 0 || !min.is_finite() || !max.is_finite() {
        return Vec::new();
    }
    if min == max {
        return alloc::vec![min];
    }
    if min > max {
        core::mem::swap(&mut min, &mut max);
    }
    let step0 = (max - min) / count.max(1) as f64;

    if step0 <= 7.0 * DAY {
        let step = fixed_step(step0);
        let start = (min / step).ceil() * step;
        let mut out = Vec::new();
        let mut t = start;
        while t <= max && out.len() < 10_000 {
            out.push(t);
            t += step;
        }
        return out;
    }

    let (Some(lo), Some(hi)) = (to_datetime(min), to_datetime(max)) else {
        return Vec::new();
    };
    let months = step0 / (30.4375 * DAY);
    if months < 12.0 {
        let every = [1_u32, 2, 3, 6]
            .into_iter()
            .find(|m| f64::from(*m) >= months)
            .unwrap_or(6);
        let mut out = Vec::new();
        let (mut year, mut month) = (lo.year(), lo.month0());
        month -= month % every;
        while out.len() < 10_000 {
            let Some(t) = month_start(year, month) else {
                break;
            };
            if t > max {
                break;
            }
            if t >= min {
                out.push(t);
            }
            month += every;
            if month >= 12 {
                month -= 12;
                year += 1;
            }
        }
        return out;
    }

    let every = nice_step(months / 12.0).max(1.0);
    #[allow(clippy::cast_possible_truncation, reason = "year steps are small integers")]
    let every = every.round() as i32;
    let first = lo.year().div_euclid(every) * every;
    (first..=hi.year())
        .step_by(usize::try_from(every).unwrap_or(1))
        .filter_map(|y| month_start(y, 0))
        .filter(|t| *t >= min && *t <= max)
        .collect()
}

fn month_start(year: i32, month0: u32) -> Option<f64> {
    let date = NaiveDate::from_ymd_opt(year, month0 + 1, 1)?;
    #[allow(
        clippy::cast_precision_loss,
        reason = "timestamps within the chrono range are far below 2^53"
    )]
    let seconds = date.and_time(NaiveTime::MIN).and_utc().timestamp() as f64;
    Some(seconds)
}

fn fixed_step(step: f64) -> f64 {
    const STEPS: &[f64] = &[
        1.0,
        5.0,
        15.0,
        30.0,
        60.0,
        5.0 * 60.0,
        15.0 * 60.0,
        30.0 * 60.0,
        60.0 * 60.0,
        3.0 * 60.0 * 60.0,
        6.0 * 60.0 * 60.0,
        12.0 * 60.0 * 60.0,
        DAY,
        2.0 * DAY,
        7.0 * DAY,
    ];

    STEPS
        .iter()
        .copied()
        .find(|s| *s >= step)
        .unwrap_or(7.0 * DAY)
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    const Y2020: f64 = 1_577_836_800.0;

    #[test]
    fn year_only_dates_start_in_january() {
        assert_eq!(parse_date("2020", "%Y"), Ok(Y2020));
        assert_eq!(parse_date_label(&Label::Number(2020.0), "%Y"), Ok(Y2020));
    }

    #[test]
    fn full_dates_and_months() {
        assert_eq!(parse_date("2020-01-02", "%Y-%m-%d"), Ok(Y2020 + DAY));
        assert_eq!(parse_date("02/2020", "%m/%Y"), Ok(Y2020 + 31.0 * DAY));
    }

    #[test]
    fn mismatched_dates_are_errors() {
        let err = parse_date("soon", "%Y").unwrap_err();
        assert_eq!(
            err,
            Error::InvalidDate {
                value: "soon".into(),
                format: "%Y".into()
            }
        );
    }

    #[test]
    fn formats_with_strftime_patterns() {
        assert_eq!(format_date(Y2020, DEFAULT_DATE_FORMAT), "2020");
        assert_eq!(format_date(Y2020 + DAY, "%d %b"), "02 Jan");
    }

    #[test]
    fn multi_year_spans_tick_on_years() {
        let lo = parse_date("2000", "%Y").unwrap();
        let hi = parse_date("2020", "%Y").unwrap();
        let ticks = time_ticks(lo, hi, 5);
        let years: std::vec::Vec<String> = ticks.iter().map(|t| format_date(*t, "%Y")).collect();
        assert_eq!(years, ["2000", "2005", "2010", "2015", "2020"]);
    }

    #[test]
    fn sub_year_spans_tick_on_months() {
        let lo = parse_date("2020-01", "%Y-%m").unwrap();
        let hi = parse_date("2020-12", "%Y-%m").unwrap();
        let ticks = time_ticks(lo, hi, 4);
        assert_eq!(ticks.first(), Some(&lo));
        assert!(
            ticks.iter().all(|t| format_date(*t, "%d") == "01"),
            "month ticks fall on the first"
        );
    }

    #[test]
    fn short_spans_use_fixed_steps() {
        let ticks = time_ticks(0.0, 300.0, 5);
        assert_eq!(ticks, [0.0, 60.0, 120.0, 180.0, 240.0, 300.0]);
    }
}
