// Copyright 2025 the Vizkit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Filter and sort queries over data-table records.

extern crate alloc;

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::cmp::Ordering;

use vizkit_core::{Label, Record};

/// Sorting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Ascending order.
    #[default]
    Asc,
    /// Descending order.
    Desc,
}

impl SortOrder {
    /// The other order.
    pub fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// Keeps rows whose cell in `column` matches one of `selected`.
///
/// With a `separator`, the cell is split into parts and matches when any part is selected.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnFilter {
    /// Column key.
    pub column: String,
    /// Accepted values.
    pub selected: Vec<Label>,
    /// Multi-value separator for the cell.
    pub separator: Option<String>,
}

impl ColumnFilter {
    /// Creates a filter accepting `selected` values of `column`.
    pub fn new(column: impl Into<String>, selected: impl IntoIterator<Item = Label>) -> Self {
        Self {
            column: column.into(),
            selected: selected.into_iter().collect(),
            separator: None,
        }
    }

    /// Splits cells on `separator` before matching.
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = Some(separator.into());
        self
    }

    /// Evaluates the filter for one row. Rows without the column pass.
    pub fn eval(&self, row: &Record) -> bool {
        let Some(cell) = row.get(&self.column) else {
            return true;
        };
        match &self.separator {
            Some(sep) => {
                let text = cell.to_string();
                text.split(sep.as_str())
                    .any(|part| self.selected.iter().any(|s| s.to_string() == part))
            }
            None => self.selected.contains(cell),
        }
    }
}

/// A data-table view: every filter must pass, then an optional sort.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableQuery {
    /// Filters combined with logical AND.
    pub filters: Vec<ColumnFilter>,
    /// Sort column and order.
    pub sort: Option<(String, SortOrder)>,
}

impl TableQuery {
    /// An unfiltered, unsorted query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a filter.
    pub fn with_filter(mut self, filter: ColumnFilter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Sorts by `column`.
    pub fn with_sort(mut self, column: impl Into<String>, order: SortOrder) -> Self {
        self.sort = Some((column.into(), order));
        self
    }

    /// Returns the indices of `rows` visible under this query, in display order.
    ///
    /// Sorting is stable in both orders and rows missing the sort column always come last.
    pub fn apply(&self, rows: &[Record]) -> Vec<usize> {
        let mut idx: Vec<usize> = rows
            .iter()
            .enumerate()
            .filter(|(_, r)| self.filters.iter().all(|f| f.eval(r)))
            .map(|(i, _)| i)
            .collect();
        if let Some((column, order)) = &self.sort {
            idx.sort_by(|&a, &b| compare_cells(rows[a].get(column), rows[b].get(column), *order));
        }
        idx
    }
}

fn compare_cells(a: Option<&Label>, b: Option<&Label>, order: SortOrder) -> Ordering {
    let (x, y) = match (a, b) {
        (None, None) => return Ordering::Equal,
        (None, Some(_)) => return Ordering::Greater,
        (Some(_), None) => return Ordering::Less,
        (Some(x), Some(y)) => (x, y),
    };
    let ord = match (x, y) {
        (Label::Number(x), Label::Number(y)) => x.total_cmp(y),
        _ => x.to_string().cmp(&y.to_string()),
    };
    match order {
        SortOrder::Asc => ord,
        SortOrder::Desc => ord.reverse(),
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use alloc::vec;

    fn row(country: &str, region: &str, value: f64) -> Record {
        let mut r = Record::new();
        r.insert("country".into(), Label::from(country));
        r.insert("region".into(), Label::from(region));
        r.insert("value".into(), Label::from(value));
        r
    }

    fn rows() -> Vec<Record> {
        vec![
            row("Chile", "Americas", 3.0),
            row("Kenya", "Africa", 10.0),
            row("Peru", "Americas;Pacific", 1.0),
        ]
    }

    #[test]
    fn filters_match_exact_values() {
        let q = TableQuery::new().with_filter(ColumnFilter::new("region", [Label::from("Africa")]));
        assert_eq!(q.apply(&rows()), vec![1]);
    }

    #[test]
    fn separator_filters_match_any_part() {
        let q = TableQuery::new().with_filter(
            ColumnFilter::new("region", [Label::from("Pacific"), Label::from("Africa")])
                .with_separator(";"),
        );
        assert_eq!(q.apply(&rows()), vec![1, 2]);
    }

    #[test]
    fn numeric_sort_both_ways() {
        let q = TableQuery::new().with_sort("value", SortOrder::Asc);
        assert_eq!(q.apply(&rows()), vec![2, 0, 1]);
        let q = TableQuery::new().with_sort("value", SortOrder::Desc);
        assert_eq!(q.apply(&rows()), vec![1, 0, 2]);
    }

    #[test]
    fn missing_cells_pass_filters_and_sort_last() {
        let mut data = rows();
        let mut bare = Record::new();
        bare.insert("country".into(), Label::from("Fiji"));
        data.insert(0, bare);
        let q = TableQuery::new()
            .with_filter(ColumnFilter::new("region", [Label::from("Americas")]))
            .with_sort("value", SortOrder::Asc);
        assert_eq!(q.apply(&data), vec![1, 0], "Fiji has no region and no value");
    }

    #[test]
    fn missing_cells_sort_last_when_descending() {
        let mut data = vec![row("Chile", "Americas", 3.0), row("Kenya", "Africa", 10.0)];
        let mut bare = Record::new();
        bare.insert("country".into(), Label::from("Fiji"));
        data.insert(1, bare);
        let q = TableQuery::new().with_sort("value", SortOrder::Desc);
        assert_eq!(q.apply(&data), vec![2, 0, 1], "Fiji has no value");
        let q = TableQuery::new().with_sort("value", SortOrder::Asc);
        assert_eq!(q.apply(&data), vec![0, 2, 1], "Fiji has no value");
    }
}
