// Copyright 2025 the Vizkit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error type shared across the vizkit crates.

extern crate alloc;

use alloc::string::String;

/// Errors raised while parsing chart configuration.
///
/// Layout itself never fails on data: missing values degrade to "no shape". These errors cover
/// the configuration parsers (colors, dates, palettes, templates, table columns) and the base-map
/// collaborator.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A CSS color string could not be parsed.
    #[error("invalid color `{0}`")]
    InvalidColor(String),

    /// A date string did not match its format.
    #[error("date `{value}` does not match format `{format}`")]
    InvalidDate {
        /// The offending input.
        value: String,
        /// The strftime-style format it was parsed with.
        format: String,
    },

    /// A color scale was built from an empty palette.
    #[error("color palette is empty")]
    EmptyPalette,

    /// A data table operation named a column that is not configured.
    #[error("unknown column `{0}`")]
    UnknownColumn(String),

    /// A tooltip template opened a `{{` placeholder without closing it.
    #[error("unterminated placeholder at byte {offset}")]
    UnterminatedPlaceholder {
        /// Byte offset of the opening braces.
        offset: usize,
    },

    /// The external base-map renderer reported a failure.
    #[error("base map renderer failed: {0}")]
    BaseMap(String),
}

/// Result alias using [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use alloc::string::ToString;

    #[test]
    fn messages_name_the_offending_input() {
        let err = Error::InvalidDate {
            value: "20x0".into(),
            format: "%Y".into(),
        };
        assert_eq!(
            err.to_string(),
            "date `20x0` does not match format `%Y`",
            "date errors should quote both the value and the format"
        );
        assert_eq!(
            Error::UnterminatedPlaceholder { offset: 4 }.to_string(),
            "unterminated placeholder at byte 4"
        );
    }
}
