//! Core engine for inspecting time-series blocks stored in a bucket.
//!
//! This crate turns the `meta.json` descriptors written next to every block
//! into a sorted, human-readable report:
//!
//! - Typed block metadata decoded from descriptor JSON (`model` module).
//! - A collector with tolerant and strict failure policies (`collect`).
//! - Display-only derived metrics such as the estimated size and the time
//!   left until a block reaches its next downsampling tier (`metrics`).
//! - Column sets, column kinds and the row projector (`columns`).
//! - A stable, kind-aware multi-key row sort (`sort`).
//! - Raw and markdown table rendering (`render`).
//! - The end-to-end report pipeline (`report`).
//! - Object store listing and download helpers (`source`).
//!
//! Everything except `source` is synchronous and performs no I/O.
#![deny(missing_docs)]
pub mod collect;
pub mod columns;
pub mod error;
pub mod format;
pub mod metrics;
pub mod model;
pub mod render;
pub mod report;
pub mod sort;
pub mod source;

#[cfg(test)]
pub(crate) mod test_util;

pub use collect::{Collection, CollectError, CollectFailure, CollectPolicy, RawDescriptor, collect};
pub use columns::{Column, ColumnKind, ColumnSet, Header, HeaderColumn, Row, project};
pub use error::{ConfigError, ReportError};
pub use metrics::{DerivedMetrics, TierPolicy, derive_metrics};
pub use model::{BlockId, DescriptorError, MetadataRecord};
pub use render::{OutputMode, render};
pub use report::{Report, ReportOptions, Reporter, build_report};
pub use sort::{SortSpec, sort_rows};
