// Copyright 2025 the Vizkit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-family chart inputs.
//!
//! Each chart family accepts its own datum shape. Values are `Option<f64>`: `None` means
//! "missing", which is excluded from extents but keeps its positional slot.

extern crate alloc;

use alloc::string::String;

use smallvec::SmallVec;

use crate::label::{Label, Record};

/// Ordered sub-values for multi-series datums (one per sub-series).
pub type Values = SmallVec<[Option<f64>; 4]>;

/// Common read access to chart inputs.
///
/// The normalizer uses [`Datum::label`] and [`Datum::values`]; tooltips and detail views use
/// [`Datum::field`].
pub trait Datum {
    /// Category label, if the datum has one.
    fn label(&self) -> Option<&Label>;

    /// Numeric values contributing to the value extent.
    fn values(&self) -> Values;

    /// Category color key, if the datum has one.
    fn color(&self) -> Option<&str> {
        None
    }

    /// Auxiliary payload.
    fn record(&self) -> Option<&Record> {
        None
    }

    /// Looks up a field by name: primary fields first, then the auxiliary payload.
    fn field(&self, name: &str) -> Option<Label> {
        self.record().and_then(|r| r.get(name).cloned())
    }
}

fn number(v: Option<f64>) -> Option<Label> {
    v.map(Label::Number)
}

fn indexed(values: &Values, name: &str, prefix: &str) -> Option<Label> {
    let idx: usize = name.strip_prefix(prefix)?.parse().ok()?;
    number(values.get(idx).copied().flatten())
}

/// A single bar (`{label, size, color?, data?}`).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct BarDatum {
    /// Category label.
    pub label: Label,
    /// Bar value.
    pub size: Option<f64>,
    /// Category color key.
    pub color: Option<String>,
    /// Auxiliary payload.
    pub data: Option<Record>,
}

impl BarDatum {
    /// Creates a bar datum.
    pub fn new(label: impl Into<Label>, size: Option<f64>) -> Self {
        Self {
            label: label.into(),
            size,
            color: None,
            data: None,
        }
    }

    /// Sets the category color key.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Sets the auxiliary payload.
    pub fn with_data(mut self, data: Record) -> Self {
        self.data = Some(data);
        self
    }
}

impl Datum for BarDatum {
    fn label(&self) -> Option<&Label> {
        Some(&self.label)
    }

    fn values(&self) -> Values {
        smallvec::smallvec![self.size]
    }

    fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    fn record(&self) -> Option<&Record> {
        self.data.as_ref()
    }

    fn field(&self, name: &str) -> Option<Label> {
        match name {
            "label" => Some(self.label.clone()),
            "size" => number(self.size),
            "color" => self.color.as_deref().map(Label::from),
            _ => self.data.as_ref().and_then(|r| r.get(name).cloned()),
        }
    }
}

/// A category with one value per sub-series (`{label, size: [..], data?}`).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct GroupedBarDatum {
    /// Category label.
    pub label: Label,
    /// Sub-series values.
    pub size: Values,
    /// Auxiliary payload.
    pub data: Option<Record>,
}

impl GroupedBarDatum {
    /// Creates a grouped bar datum.
    pub fn new(label: impl Into<Label>, size: impl IntoIterator<Item = Option<f64>>) -> Self {
        Self {
            label: label.into(),
            size: size.into_iter().collect(),
            data: None,
        }
    }

    /// Sets the auxiliary payload.
    pub fn with_data(mut self, data: Record) -> Self {
        self.data = Some(data);
        self
    }
}

impl Datum for GroupedBarDatum {
    fn label(&self) -> Option<&Label> {
        Some(&self.label)
    }

    fn values(&self) -> Values {
        self.size.clone()
    }

    fn record(&self) -> Option<&Record> {
        self.data.as_ref()
    }

    fn field(&self, name: &str) -> Option<Label> {
        match name {
            "label" => Some(self.label.clone()),
            _ => indexed(&self.size, name, "size")
                .or_else(|| self.data.as_ref().and_then(|r| r.get(name).cloned())),
        }
    }
}

/// A stacked bar for one date of an animated stacked bar chart.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct StackedBarDatum {
    /// Category label.
    pub label: Label,
    /// Stack segment values.
    pub size: Values,
    /// Date this row belongs to.
    pub date: Label,
    /// Auxiliary payload.
    pub data: Option<Record>,
}

impl StackedBarDatum {
    /// Creates a stacked bar datum.
    pub fn new(
        label: impl Into<Label>,
        date: impl Into<Label>,
        size: impl IntoIterator<Item = Option<f64>>,
    ) -> Self {
        Self {
            label: label.into(),
            size: size.into_iter().collect(),
            date: date.into(),
            data: None,
        }
    }

    /// Sum of the non-null segment values.
    pub fn total(&self) -> f64 {
        self.size.iter().flatten().sum()
    }
}

impl Datum for StackedBarDatum {
    fn label(&self) -> Option<&Label> {
        Some(&self.label)
    }

    fn values(&self) -> Values {
        self.size.clone()
    }

    fn record(&self) -> Option<&Record> {
        self.data.as_ref()
    }

    fn field(&self, name: &str) -> Option<Label> {
        match name {
            "label" => Some(self.label.clone()),
            "date" => Some(self.date.clone()),
            _ => indexed(&self.size, name, "size")
                .or_else(|| self.data.as_ref().and_then(|r| r.get(name).cloned())),
        }
    }
}

/// A dumbbell row (`{label, x: [..], data?}`).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct DumbbellDatum {
    /// Category label.
    pub label: Label,
    /// Dot positions, one per sub-series.
    pub x: Values,
    /// Auxiliary payload.
    pub data: Option<Record>,
}

impl DumbbellDatum {
    /// Creates a dumbbell datum.
    pub fn new(label: impl Into<Label>, x: impl IntoIterator<Item = Option<f64>>) -> Self {
        Self {
            label: label.into(),
            x: x.into_iter().collect(),
            data: None,
        }
    }
}

impl Datum for DumbbellDatum {
    fn label(&self) -> Option<&Label> {
        Some(&self.label)
    }

    fn values(&self) -> Values {
        self.x.clone()
    }

    fn record(&self) -> Option<&Record> {
        self.data.as_ref()
    }

    fn field(&self, name: &str) -> Option<Label> {
        match name {
            "label" => Some(self.label.clone()),
            _ => indexed(&self.x, name, "x")
                .or_else(|| self.data.as_ref().and_then(|r| r.get(name).cloned())),
        }
    }
}

/// A scatter point (`{x, y, radius?, color?, label?, data?}`).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct ScatterDatum {
    /// X value; rows with a missing coordinate are not drawn.
    pub x: Option<f64>,
    /// Y value.
    pub y: Option<f64>,
    /// Optional bubble size.
    pub radius: Option<f64>,
    /// Category color key.
    pub color: Option<String>,
    /// Point label.
    pub label: Option<Label>,
    /// Auxiliary payload.
    pub data: Option<Record>,
}

impl ScatterDatum {
    /// Creates a scatter point.
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            radius: None,
            color: None,
            label: None,
            data: None,
        }
    }

    /// Sets the bubble size.
    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = Some(radius);
        self
    }

    /// Sets the category color key.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Sets the point label.
    pub fn with_label(mut self, label: impl Into<Label>) -> Self {
        self.label = Some(label.into());
        self
    }
}

impl Datum for ScatterDatum {
    fn label(&self) -> Option<&Label> {
        self.label.as_ref()
    }

    fn values(&self) -> Values {
        smallvec::smallvec![self.x, self.y]
    }

    fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    fn record(&self) -> Option<&Record> {
        self.data.as_ref()
    }

    fn field(&self, name: &str) -> Option<Label> {
        match name {
            "x" => number(self.x),
            "y" => number(self.y),
            "radius" => number(self.radius),
            "color" => self.color.as_deref().map(Label::from),
            "label" => self.label.clone(),
            _ => self.data.as_ref().and_then(|r| r.get(name).cloned()),
        }
    }
}

/// A strip chart entry (`{label, position, color?, data?}`).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct StripDatum {
    /// Entry label.
    pub label: Label,
    /// Position along the value axis.
    pub position: f64,
    /// Category color key.
    pub color: Option<String>,
    /// Auxiliary payload.
    pub data: Option<Record>,
}

impl StripDatum {
    /// Creates a strip entry.
    pub fn new(label: impl Into<Label>, position: f64) -> Self {
        Self {
            label: label.into(),
            position,
            color: None,
            data: None,
        }
    }

    /// Sets the category color key.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

impl Datum for StripDatum {
    fn label(&self) -> Option<&Label> {
        Some(&self.label)
    }

    fn values(&self) -> Values {
        smallvec::smallvec![Some(self.position)]
    }

    fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    fn record(&self) -> Option<&Record> {
        self.data.as_ref()
    }

    fn field(&self, name: &str) -> Option<Label> {
        match name {
            "label" => Some(self.label.clone()),
            "position" => Some(Label::Number(self.position)),
            "color" => self.color.as_deref().map(Label::from),
            _ => self.data.as_ref().and_then(|r| r.get(name).cloned()),
        }
    }
}

/// A bee swarm entry (`{label, position, radius?, color?, data?}`).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct BeeSwarmDatum {
    /// Entry label.
    pub label: Label,
    /// Position along the value axis.
    pub position: f64,
    /// Optional bubble size.
    pub radius: Option<f64>,
    /// Category color key.
    pub color: Option<String>,
    /// Auxiliary payload.
    pub data: Option<Record>,
}

impl BeeSwarmDatum {
    /// Creates a bee swarm entry.
    pub fn new(label: impl Into<Label>, position: f64) -> Self {
        Self {
            label: label.into(),
            position,
            radius: None,
            color: None,
            data: None,
        }
    }

    /// Sets the bubble size.
    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = Some(radius);
        self
    }

    /// Sets the category color key.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

impl Datum for BeeSwarmDatum {
    fn label(&self) -> Option<&Label> {
        Some(&self.label)
    }

    fn values(&self) -> Values {
        smallvec::smallvec![Some(self.position)]
    }

    fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    fn record(&self) -> Option<&Record> {
        self.data.as_ref()
    }

    fn field(&self, name: &str) -> Option<Label> {
        match name {
            "label" => Some(self.label.clone()),
            "position" => Some(Label::Number(self.position)),
            "radius" => number(self.radius),
            "color" => self.color.as_deref().map(Label::from),
            _ => self.data.as_ref().and_then(|r| r.get(name).cloned()),
        }
    }
}

/// A time-series point with an optional confidence interval (`{date, y, yMin?, yMax?}`).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct IntervalDatum {
    /// Date, parsed with the chart's date format.
    pub date: Label,
    /// Primary value.
    pub y: Option<f64>,
    /// Lower interval bound (defaults to `y`).
    pub y_min: Option<f64>,
    /// Upper interval bound (defaults to `y`).
    pub y_max: Option<f64>,
    /// Auxiliary payload.
    pub data: Option<Record>,
}

impl IntervalDatum {
    /// Creates a point without interval bounds.
    pub fn new(date: impl Into<Label>, y: Option<f64>) -> Self {
        Self {
            date: date.into(),
            y,
            y_min: None,
            y_max: None,
            data: None,
        }
    }

    /// Sets both interval bounds.
    pub fn with_interval(mut self, y_min: f64, y_max: f64) -> Self {
        self.y_min = Some(y_min);
        self.y_max = Some(y_max);
        self
    }
}

impl Datum for IntervalDatum {
    fn label(&self) -> Option<&Label> {
        Some(&self.date)
    }

    fn values(&self) -> Values {
        smallvec::smallvec![self.y, self.y_min, self.y_max]
    }

    fn record(&self) -> Option<&Record> {
        self.data.as_ref()
    }

    fn field(&self, name: &str) -> Option<Label> {
        match name {
            "date" => Some(self.date.clone()),
            "y" => number(self.y),
            "yMin" => number(self.y_min.or(self.y)),
            "yMax" => number(self.y_max.or(self.y)),
            _ => self.data.as_ref().and_then(|r| r.get(name).cloned()),
        }
    }
}

/// A stacked-area row: one value per series at a date (`{date, y: [..]}`).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct AreaDatum {
    /// Date, parsed with the chart's date format.
    pub date: Label,
    /// Series values.
    pub y: Values,
}

impl AreaDatum {
    /// Creates an area row.
    pub fn new(date: impl Into<Label>, y: impl IntoIterator<Item = Option<f64>>) -> Self {
        Self {
            date: date.into(),
            y: y.into_iter().collect(),
        }
    }
}

impl Datum for AreaDatum {
    fn label(&self) -> Option<&Label> {
        Some(&self.date)
    }

    fn values(&self) -> Values {
        self.y.clone()
    }

    fn field(&self, name: &str) -> Option<Label> {
        match name {
            "date" => Some(self.date.clone()),
            _ => indexed(&self.y, name, "y"),
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn fields_resolve_primary_then_payload() {
        let mut data = Record::new();
        data.insert("country".into(), Label::from("Chile"));
        let d = BarDatum::new("A", Some(5.0)).with_data(data);
        assert_eq!(d.field("size"), Some(Label::Number(5.0)));
        assert_eq!(d.field("country"), Some(Label::from("Chile")));
        assert_eq!(d.field("missing"), None);
    }

    #[test]
    fn indexed_fields_read_sub_values() {
        let d = GroupedBarDatum::new("A", [Some(5.0), None, Some(3.0)]);
        assert_eq!(d.field("size0"), Some(Label::Number(5.0)));
        assert_eq!(d.field("size1"), None, "null sub-values have no field");
        assert_eq!(d.field("size2"), Some(Label::Number(3.0)));
    }

    #[test]
    fn interval_bounds_default_to_y() {
        let d = IntervalDatum::new("2020", Some(10.0));
        assert_eq!(d.field("yMin"), Some(Label::Number(10.0)));
        assert_eq!(d.field("yMax"), Some(Label::Number(10.0)));
    }

    #[test]
    fn stacked_total_skips_nulls() {
        let d = StackedBarDatum::new("A", 2020, [Some(1.0), None, Some(2.5)]);
        assert!((d.total() - 3.5).abs() < 1e-9, "total should ignore nulls");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn datums_deserialize_from_chart_json() {
        let json = r#"[
            {"label": "A", "size": 5, "color": "North"},
            {"label": 2, "size": null}
        ]"#;
        let bars: alloc::vec::Vec<BarDatum> = serde_json::from_str(json).unwrap();
        assert_eq!(bars[0].color.as_deref(), Some("North"));
        assert_eq!(bars[1].label, Label::Number(2.0));
        assert_eq!(bars[1].size, None);

        let line: IntervalDatum =
            serde_json::from_str(r#"{"date": "2020", "y": 10, "yMin": 8}"#).unwrap();
        assert_eq!(line.y_min, Some(8.0));
        assert_eq!(line.y_max, None);
    }
}
