//! Report columns and the row projector.
//!
//! A [`ColumnSet`] picks one of two static column lists. Each [`Column`] owns
//! its header name, its [`ColumnKind`] (which drives sorting) and exactly one
//! formatting rule.

use crate::{
    format::{
        format_duration_millis, format_mib, format_time_delta, format_timestamp_millis,
        group_thousands,
    },
    metrics::DerivedMetrics,
    model::MetadataRecord,
};

/// One rendered report row. Its arity always equals the header's.
pub type Row = Vec<String>;

/// Cell text of `UNTIL-COMP` when no further tier applies.
pub const NOT_APPLICABLE: &str = "-";

/// Semantic type of a column, used to pick a comparison rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    /// Free text, compared lexically.
    String,
    /// Grouped integer (`1,234`).
    Integer,
    /// Size estimate (`1.50MiB`).
    Bytes,
    /// Go-style duration (`2h3m4s`).
    Duration,
    /// Timestamp in [`crate::format::TIMESTAMP_FORMAT`].
    Timestamp,
    /// `true` / `false`.
    Boolean,
}

/// A column known to the projector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Column {
    /// Block id.
    Ulid,
    /// Start of the block's range.
    From,
    /// End of the block's range.
    Until,
    /// Length of the block's range.
    Range,
    /// Time until the next downsampling tier.
    UntilComp,
    /// Estimated size.
    Size,
    /// Series count.
    Series,
    /// Sample count.
    Samples,
    /// Chunk count.
    Chunks,
    /// Compaction level.
    CompLevel,
    /// Compaction failed flag.
    CompFailed,
    /// Replica label.
    Replica,
    /// Downsample resolution.
    Resolution,
    /// Producing component.
    Source,
}

impl Column {
    /// Header text.
    pub const fn name(self) -> &'static str {
        match self {
            Column::Ulid => "ULID",
            Column::From => "FROM",
            Column::Until => "UNTIL",
            Column::Range => "RANGE",
            Column::UntilComp => "UNTIL-COMP",
            Column::Size => "~SIZE",
            Column::Series => "#SERIES",
            Column::Samples => "#SAMPLES",
            Column::Chunks => "#CHUNKS",
            Column::CompLevel => "COMP-LEVEL",
            Column::CompFailed => "COMP-FAILED",
            Column::Replica => "REPLICA",
            Column::Resolution => "RESOLUTION",
            Column::Source => "SOURCE",
        }
    }

    /// Semantic type.
    pub const fn kind(self) -> ColumnKind {
        match self {
            Column::Ulid | Column::Replica | Column::Source => ColumnKind::String,
            Column::From | Column::Until => ColumnKind::Timestamp,
            Column::Range | Column::UntilComp | Column::Resolution => ColumnKind::Duration,
            Column::Size => ColumnKind::Bytes,
            Column::Series | Column::Samples | Column::Chunks | Column::CompLevel => {
                ColumnKind::Integer
            }
            Column::CompFailed => ColumnKind::Boolean,
        }
    }

    /// Render this column's cell for one record.
    pub fn render(self, record: &MetadataRecord, metrics: &DerivedMetrics) -> String {
        match self {
            Column::Ulid => record.id.to_string(),
            Column::From => format_timestamp_millis(record.min_time),
            Column::Until => format_timestamp_millis(record.max_time),
            Column::Range => format_time_delta(metrics.time_range),
            Column::UntilComp => metrics
                .eta_to_next_tier
                .map(format_time_delta)
                .unwrap_or_else(|| NOT_APPLICABLE.to_string()),
            Column::Size => format_mib(metrics.approx_size_bytes),
            Column::Series => group_thousands(record.num_series),
            Column::Samples => group_thousands(record.num_samples),
            Column::Chunks => group_thousands(record.num_chunks),
            Column::CompLevel => group_thousands(u64::from(record.compaction_level)),
            Column::CompFailed => record.compaction_failed.to_string(),
            Column::Replica => record.replica_label.clone().unwrap_or_default(),
            Column::Resolution => format_duration_millis(
                i64::try_from(record.downsample_resolution_millis).unwrap_or(i64::MAX),
            ),
            Column::Source => record.source.clone(),
        }
    }
}

const BASIC: &[Column] = &[
    Column::Ulid,
    Column::From,
    Column::Until,
    Column::Size,
    Column::Series,
    Column::Samples,
    Column::Chunks,
    Column::CompLevel,
    Column::Replica,
    Column::Resolution,
    Column::Source,
];

const EXTENDED: &[Column] = &[
    Column::Ulid,
    Column::From,
    Column::Until,
    Column::Range,
    Column::UntilComp,
    Column::Size,
    Column::Series,
    Column::Samples,
    Column::Chunks,
    Column::CompLevel,
    Column::CompFailed,
    Column::Replica,
    Column::Resolution,
    Column::Source,
];

/// Which columns a report shows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColumnSet {
    /// Identity, time bounds, counters and labels.
    Basic,
    /// [`ColumnSet::Basic`] plus range, tier ETA and the compaction-failed flag.
    #[default]
    Extended,
}

impl ColumnSet {
    /// Columns in display order. The first column is always [`Column::Ulid`].
    pub fn columns(self) -> &'static [Column] {
        match self {
            ColumnSet::Basic => BASIC,
            ColumnSet::Extended => EXTENDED,
        }
    }

    /// Header describing [`ColumnSet::columns`].
    pub fn header(self) -> Header {
        self.columns()
            .iter()
            .map(|c| HeaderColumn::new(c.name(), c.kind()))
            .collect()
    }
}

/// Name and kind of one header column.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeaderColumn {
    /// Column name as shown in the header.
    pub name: String,
    /// Semantic type.
    pub kind: ColumnKind,
}

impl HeaderColumn {
    /// Create a header column.
    pub fn new(name: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Ordered header columns of a table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Header {
    columns: Vec<HeaderColumn>,
}

impl Header {
    /// Create a header from its columns.
    pub fn new(columns: Vec<HeaderColumn>) -> Self {
        Self { columns }
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// True when the header has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// All columns in order.
    pub fn columns(&self) -> &[HeaderColumn] {
        &self.columns
    }

    /// Column names in order.
    pub fn names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Index of the column called `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Kind of the column at `index`, or [`ColumnKind::String`] when out of
    /// range.
    pub fn kind(&self, index: usize) -> ColumnKind {
        self.columns
            .get(index)
            .map_or(ColumnKind::String, |c| c.kind)
    }
}

impl FromIterator<HeaderColumn> for Header {
    fn from_iter<T: IntoIterator<Item = HeaderColumn>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Project one record into a row of `column_set`.
pub fn project(record: &MetadataRecord, metrics: &DerivedMetrics, column_set: ColumnSet) -> Row {
    column_set
        .columns()
        .iter()
        .map(|c| c.render(record, metrics))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        metrics::{TierPolicy, derive_metrics},
        model::RESOLUTION_5M,
        test_util::{HOUR_MS, record, with_replica},
    };

    #[test]
    fn header_arity_matches_projection() {
        let rec = record("01A", 0, HOUR_MS);
        let m = derive_metrics(&rec, &TierPolicy::default());

        for set in [ColumnSet::Basic, ColumnSet::Extended] {
            assert_eq!(project(&rec, &m, set).len(), set.header().len());
            assert_eq!(set.columns()[0], Column::Ulid);
        }
        assert_eq!(ColumnSet::Basic.header().len(), 11);
        assert_eq!(ColumnSet::Extended.header().len(), 14);
    }

    #[test]
    fn extended_row_formats_each_column() {
        let from = 1_546_300_800_000;
        let mut rec = with_replica(record("01A", from, from + 30 * HOUR_MS), "r1");
        rec.num_series = 1_234;
        rec.num_samples = 1_048_576;
        rec.num_chunks = 56;
        rec.compaction_level = 3;

        let m = derive_metrics(&rec, &TierPolicy::default());
        let row = project(&rec, &m, ColumnSet::Extended);

        assert_eq!(
            row,
            vec![
                "01A",
                "01-01-2019 00:00:00",
                "02-01-2019 06:00:00",
                "30h0m0s",
                "10h0m0s",
                "1.07MiB",
                "1,234",
                "1,048,576",
                "56",
                "3",
                "false",
                "r1",
                "0s",
                "sidecar",
            ]
        );
    }

    #[test]
    fn missing_replica_is_empty_and_unknown_tier_is_dash() {
        let mut rec = record("01A", 0, HOUR_MS);
        rec.downsample_resolution_millis = 60 * 60 * 1000;
        rec.source = String::new();

        let m = derive_metrics(&rec, &TierPolicy::default());
        let header = ColumnSet::Extended.header();
        let row = project(&rec, &m, ColumnSet::Extended);

        let cell = |name: &str| row[header.position(name).unwrap()].as_str();
        assert_eq!(cell("REPLICA"), "");
        assert_eq!(cell("SOURCE"), "");
        assert_eq!(cell("UNTIL-COMP"), NOT_APPLICABLE);
        assert_eq!(cell("RESOLUTION"), "1h0m0s");
    }

    #[test]
    fn basic_row_skips_extended_columns() {
        let mut rec = record("01A", 0, HOUR_MS);
        rec.downsample_resolution_millis = RESOLUTION_5M;
        let m = derive_metrics(&rec, &TierPolicy::default());
        let row = project(&rec, &m, ColumnSet::Basic);
        let header = ColumnSet::Basic.header();

        assert!(header.position("UNTIL-COMP").is_none());
        assert!(header.position("COMP-FAILED").is_none());
        assert_eq!(row[header.position("RESOLUTION").unwrap()], "5m0s");
    }

    #[test]
    fn kinds_follow_columns() {
        let header = ColumnSet::Extended.header();
        assert_eq!(header.kind(0), ColumnKind::String);
        assert_eq!(header.kind(header.position("FROM").unwrap()), ColumnKind::Timestamp);
        assert_eq!(header.kind(header.position("#SAMPLES").unwrap()), ColumnKind::Integer);
        assert_eq!(header.kind(header.position("UNTIL-COMP").unwrap()), ColumnKind::Duration);
        assert_eq!(header.kind(header.position("COMP-FAILED").unwrap()), ColumnKind::Boolean);
        assert_eq!(header.kind(99), ColumnKind::String);
    }
}
