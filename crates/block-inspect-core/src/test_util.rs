use std::collections::BTreeMap;

use crate::model::{BlockId, MetadataRecord};

pub(crate) const HOUR_MS: i64 = 60 * 60 * 1000;

/// Raw-resolution record with the given id and time range.
pub(crate) fn record(id: &str, min_time: i64, max_time: i64) -> MetadataRecord {
    MetadataRecord {
        id: BlockId(id.to_string()),
        min_time,
        max_time,
        num_series: 10,
        num_samples: 1_000,
        num_chunks: 20,
        compaction_level: 1,
        compaction_failed: false,
        compaction_sources: 1,
        replica_label: None,
        labels: BTreeMap::new(),
        downsample_resolution_millis: 0,
        source: "sidecar".to_string(),
    }
}

pub(crate) fn with_replica(mut rec: MetadataRecord, replica: &str) -> MetadataRecord {
    rec.labels.insert("replica".to_string(), replica.to_string());
    rec.replica_label = Some(replica.to_string());
    rec
}

/// Descriptor JSON for a raw-resolution block.
pub(crate) fn descriptor_json(id: &str, min_time: i64, max_time: i64) -> String {
    format!(
        r#"{{"ulid":"{id}","minTime":{min_time},"maxTime":{max_time},"stats":{{"numSamples":100,"numSeries":1,"numChunks":2}},"compaction":{{"level":1,"sources":["{id}"]}},"version":1,"thanos":{{"labels":{{}},"downsample":{{"resolution":0}},"source":"sidecar"}}}}"#
    )
}
