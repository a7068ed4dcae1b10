//! Object store boundary.
//!
//! Lists the block descriptors in a bucket and downloads them. This is the
//! only async, I/O-performing module of the crate; its output feeds
//! [`crate::collect::collect`].
//!
//! Supported backends:
//!
//! - S3-compatible endpoints (AWS, minio) via `object_store::aws`.
//! - A local directory mirroring the bucket layout.
//! - An in-memory store, mostly for tests.

use std::{fmt, path::PathBuf, sync::Arc};

use futures::{TryStreamExt, future::ready};
use log::{debug, warn};
use object_store::{
    ObjectStore, aws::AmazonS3Builder, local::LocalFileSystem, memory::InMemory,
    path::Path as ObjectPath,
};
use snafu::{IntoError, prelude::*};

use crate::collect::{CollectPolicy, RawDescriptor};

/// Object keys containing this marker are block descriptors.
pub const DESCRIPTOR_MARKER: &str = "meta.json";

/// Connection settings of an S3-compatible bucket.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct S3Location {
    /// Endpoint URL including scheme, e.g. `https://s3.example.com`. `None`
    /// uses the AWS default endpoint.
    pub endpoint: Option<String>,
    /// Bucket name.
    pub bucket: String,
    /// Signing region. `None` uses the client default.
    pub region: Option<String>,
    /// Static access key.
    pub access_key: Option<String>,
    /// Static secret key.
    pub secret_key: Option<String>,
    /// Allow plain HTTP endpoints.
    pub allow_http: bool,
}

/// Where the descriptors live.
#[derive(Clone, Debug)]
pub enum BucketLocation {
    /// A local directory with one sub-directory per block.
    Local {
        /// Directory that plays the role of the bucket root.
        root: PathBuf,
    },
    /// An S3-compatible bucket.
    S3(S3Location),
    /// An in-memory store.
    Memory(Arc<InMemory>),
}

impl fmt::Display for BucketLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BucketLocation::Local { root } => write!(f, "{}", root.display()),
            BucketLocation::S3(s3) => match &s3.endpoint {
                Some(endpoint) => write!(f, "{endpoint}/{}", s3.bucket),
                None => write!(f, "s3://{}", s3.bucket),
            },
            BucketLocation::Memory(_) => f.write_str("memory://"),
        }
    }
}

/// Errors raised at the object store boundary.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum SourceError {
    /// The object store client could not be created.
    #[snafu(display("Failed to open bucket {location}: {source}"))]
    BuildStore {
        /// Display form of the location.
        location: String,
        /// Underlying client error.
        source: object_store::Error,
    },

    /// Listing the bucket failed.
    #[snafu(display("Failed to list objects in bucket: {source}"))]
    List {
        /// Underlying client error.
        source: object_store::Error,
    },

    /// Downloading one object failed.
    #[snafu(display("Failed to download {object}: {source}"))]
    Fetch {
        /// Key of the object.
        object: String,
        /// Underlying client error.
        source: object_store::Error,
    },
}

impl BucketLocation {
    /// Create the object store client for this location.
    pub fn open(&self) -> Result<Arc<dyn ObjectStore>, SourceError> {
        let location = self.to_string();

        let store: Arc<dyn ObjectStore> = match self {
            BucketLocation::Local { root } => Arc::new(
                LocalFileSystem::new_with_prefix(root).context(BuildStoreSnafu { location })?,
            ),
            BucketLocation::S3(s3) => {
                let mut builder = AmazonS3Builder::new()
                    .with_bucket_name(&s3.bucket)
                    .with_allow_http(s3.allow_http);
                if let Some(endpoint) = &s3.endpoint {
                    // minio and friends serve buckets as path segments.
                    builder = builder
                        .with_endpoint(endpoint)
                        .with_virtual_hosted_style_request(false);
                }
                if let Some(region) = &s3.region {
                    builder = builder.with_region(region);
                }
                if let Some(key) = &s3.access_key {
                    builder = builder.with_access_key_id(key);
                }
                if let Some(secret) = &s3.secret_key {
                    builder = builder.with_secret_access_key(secret);
                }
                Arc::new(builder.build().context(BuildStoreSnafu { location })?)
            }
            BucketLocation::Memory(store) => store.clone(),
        };

        Ok(store)
    }
}

/// List every descriptor key in the store, sorted lexically.
///
/// Sorting makes strict collection fail on the same descriptor every run,
/// whatever order the backend lists in.
pub async fn list_descriptor_keys(
    store: &dyn ObjectStore,
) -> Result<Vec<ObjectPath>, SourceError> {
    let mut keys: Vec<ObjectPath> = store
        .list(None)
        .map_ok(|meta| meta.location)
        .try_filter(|location| ready(location.as_ref().contains(DESCRIPTOR_MARKER)))
        .try_collect()
        .await
        .context(ListSnafu)?;

    keys.sort_by(|a, b| a.as_ref().cmp(b.as_ref()));
    debug!("found {} block descriptors", keys.len());
    Ok(keys)
}

/// A descriptor that could not be downloaded in tolerant mode.
#[derive(Debug)]
pub struct FetchFailure {
    /// Key of the object.
    pub object: String,
    /// Why the download failed.
    pub error: SourceError,
}

/// Downloaded descriptors plus tolerated download failures.
#[derive(Debug, Default)]
pub struct Fetched {
    /// Descriptor blobs in key order.
    pub descriptors: Vec<RawDescriptor>,
    /// Failed downloads in key order. Always empty in strict mode.
    pub failures: Vec<FetchFailure>,
}

/// Download `keys` one after another.
///
/// Download failures follow `policy` the same way decode failures do in
/// [`crate::collect::collect`].
pub async fn fetch_descriptors(
    store: &dyn ObjectStore,
    keys: &[ObjectPath],
    policy: CollectPolicy,
) -> Result<Fetched, SourceError> {
    let mut out = Fetched::default();

    for key in keys {
        let object = key.to_string();
        debug!("fetching {object}");

        let bytes = match store.get(key).await {
            Ok(result) => result.bytes().await,
            Err(e) => Err(e),
        };

        match bytes {
            Ok(bytes) => out.descriptors.push(RawDescriptor::new(object, bytes)),
            Err(source) => {
                let error = FetchSnafu {
                    object: object.clone(),
                }
                .into_error(source);
                match policy {
                    CollectPolicy::Strict => return Err(error),
                    CollectPolicy::Tolerant => {
                        warn!("cannot download block descriptor {object}: {error}");
                        out.failures.push(FetchFailure { object, error });
                    }
                }
            }
        }
    }

    Ok(out)
}

/// List and download all descriptors in the store.
pub async fn load_descriptors(
    store: &dyn ObjectStore,
    policy: CollectPolicy,
) -> Result<Fetched, SourceError> {
    let keys = list_descriptor_keys(store).await?;
    fetch_descriptors(store, &keys, policy).await
}
