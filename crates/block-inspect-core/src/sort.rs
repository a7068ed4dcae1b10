//! Row ordering.
//!
//! Rows are ordered by a [`SortSpec`]: a list of key columns compared in
//! priority order, with column 0 (the block id) as the final tie-breaker.
//! Each key is compared according to its column's [`ColumnKind`]. A typed
//! comparison is used only when both cells parse as that kind; otherwise the
//! pair is compared as plain text. The two rules are never mixed within one
//! pair of cells.
//!
//! The sort is stable, so rows that tie on every key and on the id keep
//! their input order.

use std::cmp::Ordering;

use snafu::prelude::*;

use crate::{
    columns::{ColumnKind, Header, Row},
    error::{
        ConfigError, ReportError, RowAritySnafu, SortIndexOutOfRangeSnafu, UnknownSortColumnSnafu,
    },
    format::{parse_bool, parse_duration_millis, parse_number, parse_timestamp},
};

/// Ordered sort key columns, first = primary key.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SortSpec {
    indices: Vec<usize>,
}

impl SortSpec {
    /// Create a spec from raw column indices.
    ///
    /// Indices are checked against the header when sorting.
    pub fn new(indices: Vec<usize>) -> Self {
        Self { indices }
    }

    /// Resolve column names (surrounding whitespace ignored) against
    /// `header`.
    ///
    /// # Errors
    ///
    /// [`ConfigError::UnknownSortColumn`] for the first name that is not in
    /// the header.
    pub fn resolve<S: AsRef<str>>(header: &Header, names: &[S]) -> Result<Self, ConfigError> {
        let indices = names
            .iter()
            .map(|name| {
                let name = name.as_ref().trim();
                header.position(name).context(UnknownSortColumnSnafu {
                    name,
                    available: header.names().join(","),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { indices })
    }

    /// Resolve a comma-separated list such as `FROM,UNTIL`.
    pub fn parse(header: &Header, spec: &str) -> Result<Self, ConfigError> {
        let names: Vec<&str> = spec.split(',').collect();
        Self::resolve(header, &names)
    }

    /// Key column indices in priority order.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    fn validate(&self, header: &Header) -> Result<(), ConfigError> {
        if let Some(&index) = self.indices.iter().find(|&&i| i >= header.len()) {
            return SortIndexOutOfRangeSnafu {
                index,
                len: header.len(),
            }
            .fail();
        }
        Ok(())
    }
}

/// Every row must have exactly one cell per header column.
pub(crate) fn check_arity(header: &Header, rows: &[Row]) -> Result<(), ReportError> {
    for (row, cells) in rows.iter().enumerate() {
        ensure!(
            cells.len() == header.len(),
            RowAritySnafu {
                row,
                expected: header.len(),
                actual: cells.len(),
            }
        );
    }
    Ok(())
}

fn both<T>(a: &str, b: &str, parse: impl Fn(&str) -> Option<T>) -> Option<(T, T)> {
    Some((parse(a)?, parse(b)?))
}

/// Compare two cells of a column of the given kind.
pub fn compare_values(kind: ColumnKind, a: &str, b: &str) -> Ordering {
    if a == b {
        return Ordering::Equal;
    }

    let typed = match kind {
        ColumnKind::String => None,
        ColumnKind::Timestamp => both(a, b, parse_timestamp).map(|(x, y)| x.cmp(&y)),
        ColumnKind::Integer | ColumnKind::Bytes => {
            both(a, b, parse_number).and_then(|(x, y)| x.partial_cmp(&y))
        }
        ColumnKind::Duration => both(a, b, parse_duration_millis).map(|(x, y)| x.cmp(&y)),
        ColumnKind::Boolean => both(a, b, parse_bool).map(|(x, y)| x.cmp(&y)),
    };

    typed.unwrap_or_else(|| a.cmp(b))
}

/// Compare two rows on the spec's keys, then on column 0.
pub fn compare_rows(header: &Header, spec: &SortSpec, a: &Row, b: &Row) -> Ordering {
    spec.indices
        .iter()
        .map(|&i| compare_values(header.kind(i), &a[i], &b[i]))
        .find(|ord| ord.is_ne())
        .unwrap_or_else(|| a.first().cmp(&b.first()))
}

/// Sort `rows` by `spec`.
///
/// # Errors
///
/// - [`ReportError::RowArity`] if a row does not match the header.
/// - [`ConfigError::SortIndexOutOfRange`] if a key is outside the header.
pub fn sort_rows(
    mut rows: Vec<Row>,
    header: &Header,
    spec: &SortSpec,
) -> Result<Vec<Row>, ReportError> {
    check_arity(header, &rows)?;
    spec.validate(header)?;

    rows.sort_by(|a, b| compare_rows(header, spec, a, b));
    Ok(rows)
}
