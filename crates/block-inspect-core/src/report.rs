//! The report pipeline.
//!
//! `records -> replica filter -> derived metrics -> rows -> sort -> render`.
//! All configuration travels in [`ReportOptions`]; there is no global state.

use crate::{
    columns::{ColumnSet, Header, Row, project},
    error::{ConfigError, ReportError},
    metrics::{TierPolicy, derive_metrics},
    model::MetadataRecord,
    render::{OutputMode, render},
    sort::{SortSpec, sort_rows},
};

/// Sort keys used when none are requested.
pub const DEFAULT_SORT_BY: &str = "FROM,UNTIL";

/// Everything that shapes a report.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportOptions {
    /// Columns to show.
    pub column_set: ColumnSet,
    /// Keep only records whose replica label equals this value. `None` or an
    /// empty string keeps everything.
    pub replica_filter: Option<String>,
    /// Sort column names in priority order.
    pub sort_by: Vec<String>,
    /// Text layout.
    pub output: OutputMode,
    /// Downsampling thresholds for the tier ETA.
    pub tier_policy: TierPolicy,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            column_set: ColumnSet::default(),
            replica_filter: None,
            sort_by: DEFAULT_SORT_BY.split(',').map(str::to_string).collect(),
            output: OutputMode::default(),
            tier_policy: TierPolicy::default(),
        }
    }
}

/// A finished report.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Report {
    /// Header of the rendered table.
    pub header: Header,
    /// Sorted rows, as rendered.
    pub rows: Vec<Row>,
    /// Rendered text.
    pub rendered: String,
}

impl Report {
    /// Number of data rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Whether `record` passes the replica filter.
pub fn matches_replica(record: &MetadataRecord, filter: Option<&str>) -> bool {
    match filter {
        None | Some("") => true,
        Some(want) => record.replica_label.as_deref() == Some(want),
    }
}

/// Validated report configuration.
///
/// Building a `Reporter` resolves the sort columns, so configuration mistakes
/// surface before any descriptor is fetched.
#[derive(Clone, Debug)]
pub struct Reporter {
    options: ReportOptions,
    header: Header,
    sort_spec: SortSpec,
}

impl Reporter {
    /// Validate `options`.
    ///
    /// # Errors
    ///
    /// [`ConfigError::UnknownSortColumn`] if a sort column is not part of the
    /// selected column set.
    pub fn new(options: ReportOptions) -> Result<Self, ConfigError> {
        let header = options.column_set.header();
        let sort_spec = SortSpec::resolve(&header, &options.sort_by)?;
        Ok(Self {
            options,
            header,
            sort_spec,
        })
    }

    /// The options this reporter was built with.
    pub fn options(&self) -> &ReportOptions {
        &self.options
    }

    /// Header of the reports this reporter produces.
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Resolved sort keys.
    pub fn sort_spec(&self) -> &SortSpec {
        &self.sort_spec
    }

    /// Filter, project and sort `records` without rendering.
    pub fn rows(&self, records: &[MetadataRecord]) -> Result<Vec<Row>, ReportError> {
        let filter = self.options.replica_filter.as_deref();

        let rows = records
            .iter()
            .filter(|r| matches_replica(r, filter))
            .map(|r| {
                let metrics = derive_metrics(r, &self.options.tier_policy);
                project(r, &metrics, self.options.column_set)
            })
            .collect();

        sort_rows(rows, &self.header, &self.sort_spec)
    }

    /// Build and render a report over `records`.
    pub fn build(&self, records: &[MetadataRecord]) -> Result<Report, ReportError> {
        let rows = self.rows(records)?;
        let rendered = render(&self.header, &rows, self.options.output)?;
        Ok(Report {
            header: self.header.clone(),
            rows,
            rendered,
        })
    }
}

/// One-shot helper: validate `options` and build the report.
pub fn build_report(
    records: &[MetadataRecord],
    options: &ReportOptions,
) -> Result<Report, ReportError> {
    Reporter::new(options.clone())?.build(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{HOUR_MS, record, with_replica};

    fn records() -> Vec<MetadataRecord> {
        vec![
            record("01C", 2 * HOUR_MS, 3 * HOUR_MS),
            with_replica(record("01A", 0, HOUR_MS), "r1"),
            with_replica(record("01B", HOUR_MS, 2 * HOUR_MS), "r2"),
        ]
    }

    #[test]
    fn default_options_sort_by_time() {
        let report = build_report(&records(), &ReportOptions::default()).unwrap();
        let ids: Vec<&str> = report.rows.iter().map(|r| r[0].as_str()).collect();
        assert_eq!(ids, vec!["01A", "01B", "01C"]);
        assert_eq!(report.row_count(), 3);
        assert!(report.rendered.contains("UNTIL-COMP"));
    }

    #[test]
    fn replica_filter_keeps_exact_matches() {
        let mut recs = records();
        recs.push(with_replica(record("01D", 0, 1), ""));

        let options = ReportOptions {
            replica_filter: Some("r1".to_string()),
            ..ReportOptions::default()
        };
        let report = build_report(&recs, &options).unwrap();
        assert_eq!(report.row_count(), 1);
        assert_eq!(report.rows[0][0], "01A");
    }

    #[test]
    fn empty_replica_filter_keeps_everything() {
        let options = ReportOptions {
            replica_filter: Some(String::new()),
            ..ReportOptions::default()
        };
        assert_eq!(build_report(&records(), &options).unwrap().row_count(), 3);
    }

    #[test]
    fn unknown_sort_column_fails_before_any_row() {
        let options = ReportOptions {
            sort_by: vec!["FROM".to_string(), "NOPE".to_string()],
            ..ReportOptions::default()
        };
        assert!(matches!(
            Reporter::new(options.clone()),
            Err(ConfigError::UnknownSortColumn { .. })
        ));
        assert!(matches!(
            build_report(&records(), &options),
            Err(ReportError::Config { .. })
        ));
    }

    #[test]
    fn extended_only_columns_are_unknown_in_basic_set() {
        let options = ReportOptions {
            column_set: ColumnSet::Basic,
            sort_by: vec!["UNTIL-COMP".to_string()],
            ..ReportOptions::default()
        };
        assert!(Reporter::new(options).is_err());
    }

    #[test]
    fn sort_by_integer_column_is_numeric() {
        let mut recs = records();
        recs[0].num_samples = 9;
        recs[1].num_samples = 10_000;
        recs[2].num_samples = 200;

        let options = ReportOptions {
            column_set: ColumnSet::Basic,
            sort_by: vec!["#SAMPLES".to_string()],
            output: OutputMode::Raw,
            ..ReportOptions::default()
        };
        let report = build_report(&recs, &options).unwrap();
        let ids: Vec<&str> = report.rows.iter().map(|r| r[0].as_str()).collect();
        assert_eq!(ids, vec!["01C", "01B", "01A"]);
        assert!(report.rendered.starts_with("ULID"));
    }

    #[test]
    fn empty_input_renders_header_only() {
        let report = build_report(&[], &ReportOptions::default()).unwrap();
        assert_eq!(report.row_count(), 0);
        assert!(report.rendered.contains("ULID"));
        assert!(!report.rendered.contains("01"));
    }
}
