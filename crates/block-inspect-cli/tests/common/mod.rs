#![allow(dead_code)]

use std::path::{Path, PathBuf};

use serde_json::json;
use tempfile::TempDir;

pub type TestResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

pub const HOUR_MS: i64 = 60 * 60 * 1000;
// 2024-01-01T00:00:00Z
pub const BASE_MS: i64 = 1_704_067_200_000;

/// Create an empty bucket directory inside `tmp`.
pub fn bucket_root(tmp: &TempDir) -> TestResult<PathBuf> {
    let root = tmp.path().join("bucket");
    std::fs::create_dir_all(&root)?;
    Ok(root)
}

pub fn write_object(root: &Path, key: &str, body: &[u8]) -> TestResult {
    let path = root.join(key);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, body)?;
    Ok(())
}

/// Write `<id>/meta.json` covering hours `min_h..max_h` after [`BASE_MS`].
pub fn write_descriptor(
    root: &Path,
    id: &str,
    min_h: i64,
    max_h: i64,
    replica: &str,
    samples: u64,
) -> TestResult {
    let meta = json!({
        "ulid": id,
        "minTime": BASE_MS + min_h * HOUR_MS,
        "maxTime": BASE_MS + max_h * HOUR_MS,
        "stats": {"numSamples": samples, "numSeries": 10, "numChunks": 20},
        "compaction": {"level": 1, "sources": [id]},
        "version": 1,
        "thanos": {
            "labels": {"replica": replica},
            "downsample": {"resolution": 0},
            "source": "sidecar"
        }
    });
    write_object(
        root,
        &format!("{id}/meta.json"),
        serde_json::to_vec_pretty(&meta)?.as_slice(),
    )
}

/// Three healthy blocks on two replicas.
pub fn sample_bucket(tmp: &TempDir) -> TestResult<PathBuf> {
    let root = bucket_root(tmp)?;
    write_descriptor(&root, "01C", 4, 6, "r2", 500)?;
    write_descriptor(&root, "01A", 0, 30, "r1", 2_000_000)?;
    write_descriptor(&root, "01B", 2, 3, "r1", 10)?;
    write_object(&root, "01A/index", b"not a descriptor")?;
    Ok(root)
}
