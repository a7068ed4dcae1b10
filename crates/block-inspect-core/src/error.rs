//! Configuration and report errors shared by the sort, render and report
//! modules.

use snafu::prelude::*;

/// Invalid user-supplied report configuration.
///
/// These are always fatal and are raised before any row is sorted or
/// emitted.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ConfigError {
    /// A requested sort column does not exist in the header.
    #[snafu(display("Unknown sort column '{name}'. Available columns: {available}"))]
    UnknownSortColumn {
        /// The requested column name.
        name: String,
        /// Comma-separated list of the header's column names.
        available: String,
    },

    /// A sort key index is outside the header.
    #[snafu(display("Sort column index {index} is out of range for a header with {len} columns"))]
    SortIndexOutOfRange {
        /// The offending index.
        index: usize,
        /// Number of header columns.
        len: usize,
    },

    /// The output mode is not one of `raw` or `markdown`.
    #[snafu(display("Unknown output mode '{mode}'. Expected 'raw' or 'markdown'"))]
    UnknownOutputMode {
        /// The requested output mode.
        mode: String,
    },
}

/// Errors raised while projecting, sorting or rendering a report.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ReportError {
    /// Invalid report configuration.
    #[snafu(transparent)]
    Config {
        /// The underlying configuration error.
        source: ConfigError,
    },

    /// A row does not have one cell per header column.
    #[snafu(display("Row {row} has {actual} cells but the header has {expected} columns"))]
    RowArity {
        /// Position of the offending row.
        row: usize,
        /// Header arity.
        expected: usize,
        /// Row arity.
        actual: usize,
    },
}
