// Copyright 2025 the Vizkit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Palettes and category-to-color resolution.

extern crate alloc;

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use peniko::Color;
use vizkit_core::{Error, Result};

/// Reserved color for missing or unmapped categories.
pub const GRAY: Color = Color::from_rgb8(0xd4, 0xd6, 0xd8);

/// Single-series accent color.
pub const MAIN: Color = Color::from_rgb8(0x00, 0x6e, 0xb5);

/// The default ten-color categorical palette.
pub const CATEGORICAL: [Color; 10] = [
    Color::from_rgb8(0x00, 0x6e, 0xb5),
    Color::from_rgb8(0x5d, 0xd4, 0xf0),
    Color::from_rgb8(0x02, 0xa3, 0x8a),
    Color::from_rgb8(0xe7, 0x86, 0x25),
    Color::from_rgb8(0xe0, 0x52, 0x9e),
    Color::from_rgb8(0x75, 0x7a, 0xf0),
    Color::from_rgb8(0xa0, 0xc2, 0x36),
    Color::from_rgb8(0xfb, 0xc4, 0x12),
    Color::from_rgb8(0xbf, 0x8b, 0x2e),
    Color::from_rgb8(0xa9, 0xb1, 0xb7),
];

/// Parses `#RRGGBB` or `#RGB`.
pub fn parse_color(text: &str) -> Result<Color> {
    let invalid = || Error::InvalidColor(text.to_string());
    let hex = text.trim().strip_prefix('#').ok_or_else(invalid)?;
    if !hex.is_ascii() {
        return Err(invalid());
    }
    let digit = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
    match hex.len() {
        6 => Ok(Color::from_rgb8(
            digit(&hex[0..2])?,
            digit(&hex[2..4])?,
            digit(&hex[4..6])?,
        )),
        3 => {
            let short = |i: usize| digit(&hex[i..=i]).map(|v| v * 17);
            Ok(Color::from_rgb8(short(0)?, short(1)?, short(2)?))
        }
        _ => Err(invalid()),
    }
}

/// Parses a color, logging and falling back to [`GRAY`] when it is malformed.
pub(crate) fn parse_color_lenient(text: &str) -> Color {
    parse_color(text).unwrap_or_else(|err| {
        tracing::warn!(%err, "using the no-data gray");
        GRAY
    })
}

/// A non-empty ordered list of colors.
#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
    colors: Vec<Color>,
}

impl Default for Palette {
    fn default() -> Self {
        Self::categorical()
    }
}

impl Palette {
    /// The default categorical palette.
    pub fn categorical() -> Self {
        Self {
            colors: CATEGORICAL.to_vec(),
        }
    }

    /// A palette of CSS hex colors.
    pub fn new<S: AsRef<str>>(colors: impl IntoIterator<Item = S>) -> Result<Self> {
        let colors = colors
            .into_iter()
            .map(|c| parse_color(c.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Self::from_colors(colors)
    }

    /// A palette of already parsed colors.
    pub fn from_colors(colors: Vec<Color>) -> Result<Self> {
        if colors.is_empty() {
            return Err(Error::EmptyPalette);
        }
        Ok(Self { colors })
    }

    /// A single-color palette.
    pub fn single(color: Color) -> Self {
        Self {
            colors: alloc::vec![color],
        }
    }

    /// Number of colors.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always `false`; palettes hold at least one color.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// The color at `index`, cycling past the end.
    pub fn get(&self, index: usize) -> Color {
        self.colors[index % self.colors.len()]
    }

    /// The first color.
    pub fn first(&self) -> Color {
        self.colors[0]
    }

    /// All colors in order.
    pub fn colors(&self) -> &[Color] {
        &self.colors
    }
}

/// Maps category keys to palette colors by position in a domain.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorScale {
    domain: Vec<String>,
    palette: Palette,
}

impl ColorScale {
    /// Creates a scale mapping `domain[i]` to `palette.get(i)`.
    pub fn new<S: Into<String>>(domain: impl IntoIterator<Item = S>, palette: Palette) -> Self {
        Self {
            domain: domain.into_iter().map(Into::into).collect(),
            palette,
        }
    }

    /// Creates a scale over the distinct keys of `keys`, in first-seen order.
    pub fn from_keys<'a>(keys: impl IntoIterator<Item = Option<&'a str>>, palette: Palette) -> Self {
        let mut domain: Vec<String> = Vec::new();
        for key in keys.into_iter().flatten() {
            if !domain.iter().any(|d| d == key) {
                domain.push(key.to_string());
            }
        }
        Self { domain, palette }
    }

    /// The category keys.
    pub fn domain(&self) -> &[String] {
        &self.domain
    }

    /// The palette.
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Position of `key` in the domain.
    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.domain.iter().position(|d| d == key)
    }

    /// The color for `key`, or [`GRAY`] for missing and unmapped keys.
    pub fn color_of(&self, key: Option<&str>) -> Color {
        let Some(key) = key else {
            return GRAY;
        };
        match self.index_of(key) {
            Some(i) => self.palette.get(i),
            None => {
                tracing::warn!(key, "category missing from the color domain");
                GRAY
            }
        }
    }
}

/// Neutral shades for one theme, lightest role first.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Grays {
    /// Page background tint.
    pub gray_100: Color,
    /// Panel background.
    pub gray_200: Color,
    /// Gridlines.
    pub gray_300: Color,
    /// Rules and the no-data swatch.
    pub gray_400: Color,
    /// Muted strokes.
    pub gray_500: Color,
    /// Secondary text.
    pub gray_550: Color,
    /// Axis text.
    pub gray_600: Color,
    /// Primary text.
    pub gray_700: Color,
}

/// Light or dark chart chrome.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Theme {
    /// Dark text on a light background.
    #[default]
    Light,
    /// Light text on a dark background.
    Dark,
}

impl Theme {
    /// Neutral shades for this theme.
    pub fn grays(self) -> Grays {
        match self {
            Self::Light => Grays {
                gray_100: Color::from_rgb8(0xfa, 0xfa, 0xfa),
                gray_200: Color::from_rgb8(0xf7, 0xf7, 0xf7),
                gray_300: Color::from_rgb8(0xed, 0xef, 0xf0),
                gray_400: Color::from_rgb8(0xd4, 0xd6, 0xd8),
                gray_500: Color::from_rgb8(0xa9, 0xb1, 0xb7),
                gray_550: Color::from_rgb8(0x87, 0x90, 0x99),
                gray_600: Color::from_rgb8(0x55, 0x60, 0x6e),
                gray_700: Color::from_rgb8(0x23, 0x2e, 0x3d),
            },
            Self::Dark => Grays {
                gray_100: Color::from_rgb8(0x39, 0x42, 0x50),
                gray_200: Color::from_rgb8(0x47, 0x50, 0x5c),
                gray_300: Color::from_rgb8(0x57, 0x60, 0x6d),
                gray_400: Color::from_rgb8(0x78, 0x80, 0x8a),
                gray_500: Color::from_rgb8(0xaa, 0xb1, 0xb6),
                gray_550: Color::from_rgb8(0xaa, 0xb1, 0xb6),
                gray_600: Color::from_rgb8(0xd4, 0xd6, 0xd8),
                gray_700: Color::from_rgb8(0xea, 0xeb, 0xec),
            },
        }
    }

    /// Chart background.
    pub fn background(self) -> Color {
        match self {
            Self::Light => Color::WHITE,
            Self::Dark => Color::from_rgb8(0x23, 0x2e, 0x3d),
        }
    }
}
