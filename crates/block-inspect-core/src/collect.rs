//! Metadata collection.
//!
//! Turns fetched descriptor blobs into [`MetadataRecord`] values. A bad blob
//! either gets reported and skipped ([`CollectPolicy::Tolerant`]) or aborts
//! the whole run ([`CollectPolicy::Strict`]).

use bytes::Bytes;
use log::warn;
use snafu::{IntoError, prelude::*};

use crate::model::{DescriptorError, MetadataRecord};

/// One fetched descriptor: the object it came from and its raw bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawDescriptor {
    /// Object key (or any other identifier) of the blob.
    pub object: String,
    /// Undecoded descriptor bytes.
    pub bytes: Bytes,
}

impl RawDescriptor {
    /// Create a descriptor blob.
    pub fn new(object: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            object: object.into(),
            bytes: bytes.into(),
        }
    }
}

/// What to do when a single descriptor cannot be read.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CollectPolicy {
    /// Report the failure and keep going.
    #[default]
    Tolerant,
    /// Abort on the first failure.
    Strict,
}

/// A descriptor that was skipped in tolerant mode.
#[derive(Debug)]
pub struct CollectFailure {
    /// Identifier of the skipped blob.
    pub object: String,
    /// Why it was skipped.
    pub error: DescriptorError,
}

/// Result of a collection run.
#[derive(Debug, Default)]
pub struct Collection {
    /// Successfully decoded records, in encounter order.
    pub records: Vec<MetadataRecord>,
    /// Skipped blobs, in encounter order. Always empty in strict mode.
    pub failures: Vec<CollectFailure>,
}

/// Errors that abort a collection run.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum CollectError {
    /// A descriptor could not be read in strict mode.
    #[snafu(display("Failed to read block descriptor {object}: {source}"))]
    Descriptor {
        /// Identifier of the failing blob.
        object: String,
        /// Underlying decode error.
        source: DescriptorError,
    },
}

/// Decode every blob according to `policy`.
///
/// The input is not modified. Duplicate block ids are kept as separate
/// records.
pub fn collect<I>(blobs: I, policy: CollectPolicy) -> Result<Collection, CollectError>
where
    I: IntoIterator<Item = RawDescriptor>,
{
    let mut out = Collection::default();

    for blob in blobs {
        match MetadataRecord::from_json(&blob.bytes) {
            Ok(record) => out.records.push(record),
            Err(error) => match policy {
                CollectPolicy::Strict => {
                    return Err(DescriptorSnafu {
                        object: blob.object,
                    }
                    .into_error(error));
                }
                CollectPolicy::Tolerant => {
                    warn!("skipping block descriptor {}: {error}", blob.object);
                    out.failures.push(CollectFailure {
                        object: blob.object,
                        error,
                    });
                }
            },
        }
    }

    Ok(out)
}
