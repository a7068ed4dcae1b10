//! Block descriptor model.
//!
//! Every block in the bucket carries a `meta.json` descriptor. The
//! [`BlockDescriptor`] family of types mirrors that JSON layout, and
//! [`MetadataRecord`] is the flattened, validated view the rest of the crate
//! works with.
//!
//! This module is **pure**: it decodes bytes that were already fetched and
//! never touches storage.

use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};
use snafu::prelude::*;

/// Downsample resolution of raw, unaggregated blocks.
pub const RESOLUTION_RAW: u64 = 0;

/// Downsample resolution of the 5-minute tier, in milliseconds.
pub const RESOLUTION_5M: u64 = 5 * 60 * 1000;

/// Downsample resolution of the 1-hour tier, in milliseconds.
pub const RESOLUTION_1H: u64 = 60 * 60 * 1000;

/// Label key that names the ingestion replica of a block.
pub const REPLICA_LABEL: &str = "replica";

/// Identifier of a block (a ULID in practice).
///
/// The value is kept as opaque text. ULIDs sort lexically in creation order,
/// which is the only property the report relies on.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct BlockId(pub String);

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Series, sample and chunk counters of a block.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct BlockStats {
    /// Number of samples.
    pub num_samples: u64,
    /// Number of series.
    pub num_series: u64,
    /// Number of chunks.
    pub num_chunks: u64,
}

/// Compaction state of a block.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CompactionInfo {
    /// Number of compaction passes; 0 for freshly ingested blocks.
    pub level: u32,
    /// Blocks this block was compacted from.
    pub sources: Vec<BlockId>,
    /// Set when the compactor gave up on this block.
    pub failed: bool,
}

/// Downsampling state of a block.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DownsampleInfo {
    /// Sampling interval in milliseconds; 0 means raw resolution.
    pub resolution: u64,
}

/// Producer-specific section of the descriptor.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ThanosInfo {
    /// External labels of the block.
    pub labels: BTreeMap<String, String>,
    /// Downsampling state.
    pub downsample: DownsampleInfo,
    /// Component that produced the block (for example `sidecar`).
    pub source: String,
}

/// JSON layout of a block's `meta.json`.
///
/// Only `ulid`, `minTime` and `maxTime` are required; missing sections decode
/// to their zero values.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BlockDescriptor {
    /// Block identifier.
    pub ulid: BlockId,
    /// Inclusive lower bound of the block's data, epoch milliseconds.
    pub min_time: i64,
    /// Inclusive upper bound of the block's data, epoch milliseconds.
    pub max_time: i64,
    /// Counters.
    #[serde(default)]
    pub stats: BlockStats,
    /// Compaction state.
    #[serde(default)]
    pub compaction: CompactionInfo,
    /// Descriptor format version.
    #[serde(default)]
    pub version: u32,
    /// Producer-specific section.
    #[serde(default)]
    pub thanos: ThanosInfo,
}

/// Errors raised while decoding a single descriptor blob.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum DescriptorError {
    /// The blob is not a valid descriptor document.
    #[snafu(display("Malformed block descriptor: {source}"))]
    Json {
        /// Underlying JSON error.
        source: serde_json::Error,
    },

    /// The descriptor's time range is inverted.
    #[snafu(display("Block {id} has minTime {min_time} after maxTime {max_time}"))]
    InvalidTimeRange {
        /// Block identifier.
        id: BlockId,
        /// Declared lower bound.
        min_time: i64,
        /// Declared upper bound.
        max_time: i64,
    },
}

/// Validated metadata of one block.
///
/// Invariant: `min_time <= max_time`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MetadataRecord {
    /// Block identifier.
    pub id: BlockId,
    /// Inclusive lower bound, epoch milliseconds.
    pub min_time: i64,
    /// Inclusive upper bound, epoch milliseconds.
    pub max_time: i64,
    /// Number of series.
    pub num_series: u64,
    /// Number of samples.
    pub num_samples: u64,
    /// Number of chunks.
    pub num_chunks: u64,
    /// Number of compaction passes.
    pub compaction_level: u32,
    /// Whether compaction failed for this block.
    pub compaction_failed: bool,
    /// Number of blocks this block was compacted from.
    pub compaction_sources: usize,
    /// Value of the `replica` label, if any.
    pub replica_label: Option<String>,
    /// All external labels of the block.
    pub labels: BTreeMap<String, String>,
    /// Downsample resolution in milliseconds; 0 means raw.
    pub downsample_resolution_millis: u64,
    /// Producing component.
    pub source: String,
}

impl MetadataRecord {
    /// Decode and validate one descriptor blob.
    pub fn from_json(bytes: &[u8]) -> Result<Self, DescriptorError> {
        let descriptor: BlockDescriptor = serde_json::from_slice(bytes).context(JsonSnafu)?;
        Self::try_from(descriptor)
    }

    /// Length of the block's time range in milliseconds.
    pub fn time_range_millis(&self) -> i64 {
        self.max_time.saturating_sub(self.min_time)
    }
}

impl TryFrom<BlockDescriptor> for MetadataRecord {
    type Error = DescriptorError;

    fn try_from(d: BlockDescriptor) -> Result<Self, Self::Error> {
        ensure!(
            d.min_time <= d.max_time,
            InvalidTimeRangeSnafu {
                id: d.ulid.clone(),
                min_time: d.min_time,
                max_time: d.max_time,
            }
        );

        let replica_label = d.thanos.labels.get(REPLICA_LABEL).cloned();

        Ok(MetadataRecord {
            id: d.ulid,
            min_time: d.min_time,
            max_time: d.max_time,
            num_series: d.stats.num_series,
            num_samples: d.stats.num_samples,
            num_chunks: d.stats.num_chunks,
            compaction_level: d.compaction.level,
            compaction_failed: d.compaction.failed,
            compaction_sources: d.compaction.sources.len(),
            replica_label,
            labels: d.thanos.labels,
            downsample_resolution_millis: d.thanos.downsample.resolution,
            source: d.thanos.source,
        })
    }
}
