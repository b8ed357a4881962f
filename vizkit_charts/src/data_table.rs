// Copyright 2025 the Vizkit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Data table model: column widths, filtering, sorting and cell text.
//!
//! The table is not drawn as marks. Hosts lay out rows themselves from
//! [`DataTableSpec::cells`] and feed header clicks into a [`TableView`].

extern crate alloc;

use alloc::collections::BTreeMap;
use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use peniko::Color;
use vizkit_core::{Error, Label, Record, Result};
use vizkit_transforms::{ColumnFilter, SortOrder, TableQuery};

use crate::color::Theme;
use crate::format::format_number;
use crate::interaction::InteractionController;

/// Horizontal alignment of a column's cells.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CellAlign {
    /// Flush left.
    #[default]
    Left,
    /// Centered.
    Center,
    /// Flush right.
    Right,
}

/// Background of chip cells whose value matches.
#[derive(Clone, Debug, PartialEq)]
pub struct ChipColor {
    /// Cell value.
    pub value: Label,
    /// Chip background.
    pub color: Color,
}

/// One table column.
#[derive(Clone, Debug, PartialEq)]
pub struct DataTableColumn {
    /// Record key.
    pub key: String,
    /// Header text; the key when absent.
    pub title: Option<String>,
    /// Relative width.
    pub width: f64,
    /// Cell alignment.
    pub align: CellAlign,
    /// Prepended to every cell value.
    pub prefix: String,
    /// Appended to every cell value.
    pub suffix: String,
    /// The header toggles sorting.
    pub sortable: bool,
    /// Values offered by the column filter; no filter when absent.
    pub filter_options: Option<Vec<Label>>,
    /// Splits text cells into several values.
    pub separator: Option<String>,
    /// Draw values as chips.
    pub chip: bool,
    /// Chip backgrounds by value.
    pub chip_colors: Vec<ChipColor>,
}

impl DataTableColumn {
    /// A left-aligned column of width 1.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            title: None,
            width: 1.0,
            align: CellAlign::Left,
            prefix: String::new(),
            suffix: String::new(),
            sortable: false,
            filter_options: None,
            separator: None,
            chip: false,
            chip_colors: Vec::new(),
        }
    }

    /// Sets the header text.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the relative width.
    pub fn with_width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }

    /// Sets the alignment.
    pub fn with_align(mut self, align: CellAlign) -> Self {
        self.align = align;
        self
    }

    /// Sets the value prefix and suffix.
    pub fn with_affixes(mut self, prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self.suffix = suffix.into();
        self
    }

    /// Makes the header sortable.
    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    /// Offers a filter over `options`.
    pub fn with_filter_options(mut self, options: Vec<Label>) -> Self {
        self.filter_options = Some(options);
        self
    }

    /// Splits text cells on `separator`.
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = Some(separator.into());
        self
    }

    /// Draws values as chips with the given backgrounds.
    pub fn with_chips(mut self, colors: Vec<ChipColor>) -> Self {
        self.chip = true;
        self.chip_colors = colors;
        self
    }

    /// Header text.
    pub fn header(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.key)
    }

    fn filter(&self, selected: impl IntoIterator<Item = Label>) -> ColumnFilter {
        let filter = ColumnFilter::new(self.key.clone(), selected);
        match &self.separator {
            Some(sep) => filter.with_separator(sep.clone()),
            None => filter,
        }
    }
}

/// One displayed value of a cell.
#[derive(Clone, Debug, PartialEq)]
pub struct CellText {
    /// Formatted text.
    pub text: String,
    /// Chip background, for chip columns.
    pub chip: Option<Color>,
}

/// A formatted cell.
#[derive(Clone, Debug, PartialEq)]
pub struct TableCell {
    /// Alignment inherited from the column.
    pub align: CellAlign,
    /// Values in display order; several when a separator splits the cell, none when it is missing.
    pub parts: Vec<CellText>,
}

/// Settings for a data table.
#[derive(Clone, Debug, PartialEq)]
pub struct DataTableSpec {
    /// Columns in display order.
    pub columns: Vec<DataTableColumn>,
    /// Chip colors fall back to this theme's panel gray.
    pub theme: Theme,
    /// Clicking the selected row again clears the selection.
    pub reset_selection_on_double_click: bool,
}

impl DataTableSpec {
    /// A table with the given columns.
    pub fn new(columns: Vec<DataTableColumn>) -> Self {
        Self {
            columns,
            theme: Theme::Light,
            reset_selection_on_double_click: true,
        }
    }

    /// Sets the theme.
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Sets whether clicking the selected row again clears the selection.
    pub fn with_reset_selection_on_double_click(mut self, reset: bool) -> Self {
        self.reset_selection_on_double_click = reset;
        self
    }

    /// Looks up a configured column.
    pub fn column(&self, key: &str) -> Result<&DataTableColumn> {
        self.columns
            .iter()
            .find(|c| c.key == key)
            .ok_or_else(|| Error::UnknownColumn(key.to_string()))
    }

    /// Column widths as percentages of the total.
    pub fn column_widths(&self) -> Vec<f64> {
        let total: f64 = self.columns.iter().map(|c| c.width).sum();
        if total <= 0.0 {
            return self.columns.iter().map(|_| 0.0).collect();
        }
        self.columns.iter().map(|c| 100.0 * c.width / total).collect()
    }

    /// Indices of `rows` whose `column` cell matches one of `selected`.
    ///
    /// Rows without the column pass.
    pub fn filter(
        &self,
        rows: &[Record],
        column: &str,
        selected: impl IntoIterator<Item = Label>,
    ) -> Result<Vec<usize>> {
        let filter = self.column(column)?.filter(selected);
        Ok(TableQuery::new().with_filter(filter).apply(rows))
    }

    /// Indices of `rows` sorted by `column`.
    ///
    /// Numbers compare numerically, everything else as text. Missing cells sort last either way.
    pub fn sort(&self, rows: &[Record], column: &str, order: SortOrder) -> Result<Vec<usize>> {
        let column = self.column(column)?;
        Ok(TableQuery::new()
            .with_sort(column.key.clone(), order)
            .apply(rows))
    }

    /// Indices of `rows` visible under `view`, in display order.
    pub fn visible_rows(&self, rows: &[Record], view: &TableView) -> Result<Vec<usize>> {
        let mut query = TableQuery::new();
        for (key, selected) in &view.filters {
            query = query.with_filter(self.column(key)?.filter(selected.iter().cloned()));
        }
        if let Some((key, order)) = &view.sort {
            query = query.with_sort(self.column(key)?.key.clone(), *order);
        }
        let visible = query.apply(rows);
        tracing::debug!(
            rows = rows.len(),
            visible = visible.len(),
            filters = view.filters.len(),
            sort = ?view.sort,
            "data table query"
        );
        Ok(visible)
    }

    /// Formatted cells of `row`, one per column.
    pub fn cells(&self, row: &Record) -> Vec<TableCell> {
        let panel = self.theme.grays().gray_300;
        self.columns
            .iter()
            .map(|column| {
                let chip = |value: &Label| {
                    column.chip.then(|| {
                        column
                            .chip_colors
                            .iter()
                            .find(|c| &c.value == value)
                            .map_or(panel, |c| c.color)
                    })
                };
                let parts = match row.get(&column.key) {
                    None => Vec::new(),
                    Some(value @ Label::Number(n)) => Vec::from([CellText {
                        text: format_number(Some(*n), &column.prefix, &column.suffix, None),
                        chip: chip(value),
                    }]),
                    Some(value @ Label::Text(text)) => {
                        let affix = |s: &str| format!("{}{s}{}", column.prefix, column.suffix);
                        match &column.separator {
                            Some(sep) => text
                                .split(sep.as_str())
                                .map(|part| CellText {
                                    text: affix(part),
                                    chip: chip(value),
                                })
                                .collect(),
                            None => Vec::from([CellText {
                                text: affix(text),
                                chip: chip(value),
                            }]),
                        }
                    }
                };
                TableCell {
                    align: column.align,
                    parts,
                }
            })
            .collect()
    }

    /// A row-selection controller; rows are identified by their input index.
    pub fn controller(&self) -> InteractionController<usize> {
        InteractionController::new().with_reset_on_double_click(self.reset_selection_on_double_click)
    }
}

/// Interactive table state: the sorted column and the per-column filter selections.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TableView {
    /// Sort column and order.
    pub sort: Option<(String, SortOrder)>,
    /// Selected filter options by column key.
    pub filters: BTreeMap<String, Vec<Label>>,
}

impl TableView {
    /// Initial state: unsorted, every filter option of `spec` selected.
    pub fn new(spec: &DataTableSpec) -> Self {
        let filters = spec
            .columns
            .iter()
            .filter_map(|c| {
                let options = c.filter_options.as_ref().filter(|o| !o.is_empty())?;
                Some((c.key.clone(), options.clone()))
            })
            .collect();
        Self {
            sort: None,
            filters,
        }
    }

    /// A header click on `column`: ascending, then descending, then unsorted.
    pub fn toggle_sort(&mut self, column: &str) {
        self.sort = match self.sort.take() {
            Some((key, SortOrder::Asc)) if key == column => Some((key, SortOrder::Desc)),
            Some((key, SortOrder::Desc)) if key == column => None,
            _ => Some((column.to_string(), SortOrder::Asc)),
        };
    }

    /// Replaces the selected filter options of `column`.
    pub fn set_filter(&mut self, column: impl Into<String>, selected: Vec<Label>) {
        self.filters.insert(column.into(), selected);
    }

    /// Returns `true` when `column`'s filter hides some of `spec`'s options.
    pub fn is_filter_applied(&self, spec: &DataTableSpec, column: &str) -> bool {
        let offered = spec
            .column(column)
            .ok()
            .and_then(|c| c.filter_options.as_ref())
            .map_or(0, Vec::len);
        self.filters
            .get(column)
            .is_some_and(|selected| selected.len() != offered)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use alloc::vec;

    fn row(country: &str, region: &str, value: Option<f64>) -> Record {
        let mut r = Record::new();
        r.insert("country".into(), Label::from(country));
        r.insert("region".into(), Label::from(region));
        if let Some(v) = value {
            r.insert("value".into(), Label::Number(v));
        }
        r
    }

    fn rows() -> Vec<Record> {
        vec![
            row("Chad", "Africa", Some(12_500.0)),
            row("Peru", "Americas", None),
            row("Fiji", "Asia;Pacific", Some(3.0)),
            row("Nepal", "Asia", Some(40.0)),
        ]
    }

    fn spec() -> DataTableSpec {
        DataTableSpec::new(vec![
            DataTableColumn::new("country").with_width(2.0).sortable(),
            DataTableColumn::new("region")
                .with_separator(";")
                .with_filter_options(vec!["Africa".into(), "Asia".into(), "Pacific".into()]),
            DataTableColumn::new("value")
                .with_title("Value")
                .with_align(CellAlign::Right)
                .with_affixes("$", "")
                .sortable(),
        ])
    }

    #[test]
    fn widths_are_percentages() {
        assert_eq!(spec().column_widths(), vec![50.0, 25.0, 25.0]);
    }

    #[test]
    fn unknown_columns_are_errors() {
        let s = spec();
        assert_eq!(
            s.sort(&rows(), "gdp", SortOrder::Asc),
            Err(Error::UnknownColumn("gdp".into()))
        );
        assert!(s.filter(&rows(), "gdp", [Label::from("x")]).is_err());
    }

    #[test]
    fn separator_cells_match_any_part() {
        let s = spec();
        let kept = s.filter(&rows(), "region", [Label::from("Pacific")]).unwrap();
        assert_eq!(kept, vec![2]);
    }

    #[test]
    fn numeric_sort_puts_missing_last() {
        let s = spec();
        assert_eq!(s.sort(&rows(), "value", SortOrder::Asc).unwrap(), vec![2, 3, 0, 1]);
        assert_eq!(s.sort(&rows(), "value", SortOrder::Desc).unwrap(), vec![0, 3, 2, 1]);
    }

    #[test]
    fn header_clicks_cycle_sort_order() {
        let mut view = TableView::new(&spec());
        view.toggle_sort("value");
        assert_eq!(view.sort, Some(("value".into(), SortOrder::Asc)));
        view.toggle_sort("value");
        assert_eq!(view.sort, Some(("value".into(), SortOrder::Desc)));
        view.toggle_sort("value");
        assert_eq!(view.sort, None);
    }

    #[test]
    fn view_combines_filters_and_sort() {
        let s = spec();
        let mut view = TableView::new(&s);
        assert!(!view.is_filter_applied(&s, "region"));
        view.set_filter("region", vec!["Asia".into()]);
        assert!(view.is_filter_applied(&s, "region"));
        view.toggle_sort("country");
        assert_eq!(s.visible_rows(&rows(), &view).unwrap(), vec![2, 3]);
    }

    #[test]
    fn cells_format_numbers_and_split_text() {
        let s = spec();
        let r = rows();
        let chad = s.cells(&r[0]);
        assert_eq!(chad[2].parts[0].text, "$12.5K");
        assert_eq!(chad[2].align, CellAlign::Right);
        let fiji = s.cells(&r[2]);
        let parts: Vec<&str> = fiji[1].parts.iter().map(|p| p.text.as_str()).collect();
        assert_eq!(parts, vec!["Asia", "Pacific"]);
        assert!(s.cells(&r[1])[2].parts.is_empty());
    }

    #[test]
    fn clicking_the_selected_row_again_clears_it() {
        let mut controller = spec().controller();
        controller.click(3);
        assert_eq!(controller.selection().clicked(), Some(&3));
        controller.click(3);
        assert!(controller.selection().is_idle());
    }
}
