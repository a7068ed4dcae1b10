//! Display-only metrics derived from a [`MetadataRecord`].
//!
//! None of these values are authoritative. The size is an estimate based on
//! an average encoded sample size. The tier ETA is a heuristic that mirrors
//! the compactor's default downsampling thresholds without consulting the
//! compactor itself.

use chrono::TimeDelta;

use crate::model::{MetadataRecord, RESOLUTION_5M, RESOLUTION_RAW};

/// Average encoded size of one sample, in bytes. Empirical.
pub const BYTES_PER_SAMPLE_ESTIMATE: f64 = 1.07;

/// Range a block must span before it is eligible for the next
/// downsampling tier.
///
/// The defaults (40 hours for raw blocks, 10 days for 5-minute blocks)
/// match the stock compactor configuration. A deployment that changed those
/// thresholds should pass its own values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TierPolicy {
    /// Threshold for raw-resolution blocks.
    pub raw_threshold: TimeDelta,
    /// Threshold for 5-minute blocks.
    pub five_minute_threshold: TimeDelta,
}

impl Default for TierPolicy {
    fn default() -> Self {
        Self {
            raw_threshold: TimeDelta::hours(40),
            five_minute_threshold: TimeDelta::days(10),
        }
    }
}

impl TierPolicy {
    /// Threshold that applies to blocks of the given resolution, or `None`
    /// when no further tier is known.
    pub fn threshold_for(&self, resolution_millis: u64) -> Option<TimeDelta> {
        match resolution_millis {
            RESOLUTION_RAW => Some(self.raw_threshold),
            RESOLUTION_5M => Some(self.five_minute_threshold),
            _ => None,
        }
    }
}

/// Presentation-only values computed from one record.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DerivedMetrics {
    /// Approximate encoded size in bytes (`num_samples * 1.07`).
    pub approx_size_bytes: f64,
    /// `max_time - min_time`.
    pub time_range: TimeDelta,
    /// Time left until the block spans its tier threshold. Negative when the
    /// block is already eligible. `None` for failed compactions and for
    /// tiers without a successor.
    pub eta_to_next_tier: Option<TimeDelta>,
}

/// Compute the derived metrics of `record` under `policy`.
pub fn derive_metrics(record: &MetadataRecord, policy: &TierPolicy) -> DerivedMetrics {
    let time_range =
        TimeDelta::try_milliseconds(record.time_range_millis()).unwrap_or(TimeDelta::MAX);

    let eta_to_next_tier = if record.compaction_failed {
        None
    } else {
        policy
            .threshold_for(record.downsample_resolution_millis)
            .and_then(|threshold| threshold.checked_sub(&time_range))
    };

    DerivedMetrics {
        approx_size_bytes: record.num_samples as f64 * BYTES_PER_SAMPLE_ESTIMATE,
        time_range,
        eta_to_next_tier,
    }
}
