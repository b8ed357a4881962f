// Copyright 2025 the Vizkit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Category labels and auxiliary records.

extern crate alloc;

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use core::fmt;

/// A category label or loosely-typed cell value.
///
/// Chart inputs routinely mix strings and numbers for the same field (`"2020"` vs `2020`), so
/// labels keep whichever form was supplied and compare by their rendered text.
#[derive(Clone, Debug)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(untagged)
)]
pub enum Label {
    /// Numeric label.
    Number(f64),
    /// Text label.
    Text(String),
}

/// Auxiliary per-item payload (the `data` field of chart inputs).
///
/// Tooltips and data tables read fields from it by name.
pub type Record = BTreeMap<String, Label>;

impl Label {
    /// Returns the label as a number, parsing text labels when possible.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }

    /// Returns the text form of this label.
    pub fn text(&self) -> String {
        self.to_string()
    }

    /// Returns `true` if this label is the empty string.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Text(s) if s.is_empty())
    }
}

impl PartialEq for Label {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::Text(a), Self::Text(b)) => a == b,
            _ => self.to_string() == other.to_string(),
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Number(v) => {
                if v.is_finite() && v.abs() < 1e15 {
                    #[allow(
                        clippy::cast_possible_truncation,
                        reason = "magnitude is bounded by 1e15, well inside i64"
                    )]
                    let whole = *v as i64;
                    if whole as f64 == *v {
                        return write!(f, "{whole}");
                    }
                }
                write!(f, "{v}")
            }
        }
    }
}

impl From<&str> for Label {
    fn from(value: &str) -> Self {
        Self::Text(value.into())
    }
}

impl From<String> for Label {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for Label {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for Label {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn integral_numbers_render_without_fraction() {
        assert_eq!(Label::from(2020).to_string(), "2020");
        assert_eq!(Label::from(2.5).to_string(), "2.5");
        assert_eq!(Label::from(-3.0).to_string(), "-3");
    }

    #[test]
    fn mixed_forms_compare_by_text() {
        assert_eq!(Label::from("2020"), Label::from(2020));
        assert_ne!(Label::from("A"), Label::from("B"));
        assert_eq!(Label::from(" 12 ").as_f64(), Some(12.0));
        assert_eq!(Label::from("x").as_f64(), None);
    }
}
