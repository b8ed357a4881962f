// Copyright 2025 the Vizkit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `{{field}}` templates for tooltips and click details.

extern crate alloc;

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use vizkit_core::{Datum, Error, Label, Record, Result};

#[derive(Clone, Debug, PartialEq, Eq)]
enum Segment {
    Text(String),
    Field(String),
}

/// A parsed template.
///
/// Placeholders are `{{name}}` with optional surrounding whitespace. Names resolve against the
/// datum's primary fields first, then its auxiliary record; unknown names render as nothing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    /// Parses `source`.
    ///
    /// Fails on a `{{` without a matching `}}`.
    pub fn parse(source: &str) -> Result<Self> {
        let mut segments = Vec::new();
        let mut rest = source;
        let mut offset = 0;
        while let Some(open) = rest.find("{{") {
            if open > 0 {
                segments.push(Segment::Text(rest[..open].into()));
            }
            let after = &rest[open + 2..];
            let Some(close) = after.find("}}") else {
                return Err(Error::UnterminatedPlaceholder {
                    offset: offset + open,
                });
            };
            segments.push(Segment::Field(after[..close].trim().into()));
            let consumed = open + 2 + close + 2;
            offset += consumed;
            rest = &rest[consumed..];
        }
        if !rest.is_empty() {
            segments.push(Segment::Text(rest.into()));
        }
        Ok(Self { segments })
    }

    /// Field names referenced by the template, in order.
    pub fn fields(&self) -> impl Iterator<Item = &str> + '_ {
        self.segments.iter().filter_map(|s| match s {
            Segment::Field(name) => Some(name.as_str()),
            Segment::Text(_) => None,
        })
    }

    /// Renders with a custom field lookup.
    pub fn render_with(&self, mut lookup: impl FnMut(&str) -> Option<Label>) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Field(name) => {
                    if let Some(value) = lookup(name) {
                        out.push_str(&value.to_string());
                    }
                }
            }
        }
        out
    }

    /// Renders against a datum.
    pub fn render(&self, datum: &impl Datum) -> String {
        self.render_with(|name| datum.field(name))
    }

    /// Renders against a plain record.
    pub fn render_record(&self, record: &Record) -> String {
        self.render_with(|name| record.get(name).cloned())
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use vizkit_core::BarDatum;

    #[test]
    fn renders_primary_and_payload_fields() {
        let mut data = Record::new();
        data.insert("region".into(), Label::from("Asia"));
        let d = BarDatum::new("India", Some(12.5)).with_data(data);
        let t = Template::parse("<b>{{label}}</b> ({{ region }}): {{size}}{{nope}}").unwrap();
        assert_eq!(t.render(&d), "<b>India</b> (Asia): 12.5");
        assert_eq!(t.fields().collect::<Vec<_>>(), ["label", "region", "size", "nope"]);
    }

    #[test]
    fn unterminated_placeholder_reports_offset() {
        assert_eq!(
            Template::parse("ok {{a}} then {{b"),
            Err(Error::UnterminatedPlaceholder { offset: 14 })
        );
        assert!(Template::parse("no placeholders }}").is_ok());
    }
}
