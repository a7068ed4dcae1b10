//! Table rendering.
//!
//! Pure layout over final cell text: rows are neither reordered nor
//! reformatted.

use std::{fmt, str::FromStr};

use tabled::{
    builder::Builder,
    settings::{Alignment, Padding, Style},
};

use crate::{
    columns::{Header, Row},
    error::{ConfigError, ReportError},
    sort::check_arity,
};

/// Text layout of a rendered report.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputMode {
    /// Borderless columns separated by at least two spaces.
    Raw,
    /// Markdown table with a header separator line.
    #[default]
    Markdown,
}

impl FromStr for OutputMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "raw" => Ok(OutputMode::Raw),
            "markdown" => Ok(OutputMode::Markdown),
            other => Err(ConfigError::UnknownOutputMode {
                mode: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputMode::Raw => f.write_str("raw"),
            OutputMode::Markdown => f.write_str("markdown"),
        }
    }
}

/// Render `header` and `rows` in the given layout.
///
/// An empty header renders as an empty string.
pub fn render(header: &Header, rows: &[Row], mode: OutputMode) -> Result<String, ReportError> {
    check_arity(header, rows)?;

    if header.is_empty() {
        return Ok(String::new());
    }

    let names: Vec<String> = header.columns().iter().map(|c| c.name.clone()).collect();

    let mut builder = Builder::default();
    builder.push_record(&names);
    for row in rows {
        builder.push_record(row);
    }

    let mut table = builder.build();
    table.with(Alignment::left());

    let rendered = match mode {
        OutputMode::Raw => {
            table.with(Style::empty());
            table.with(Padding::new(0, 2, 0, 0));
            // Padding leaves trailing blanks after the last column.
            table
                .to_string()
                .lines()
                .map(str::trim_end)
                .collect::<Vec<_>>()
                .join("\n")
        }
        OutputMode::Markdown => {
            table.with(Style::markdown());
            table.to_string()
        }
    };

    Ok(rendered)
}
