//! minio-client style configuration (`~/.mc/config.json`).

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use block_inspect_core::source::S3Location;
use serde::Deserialize;
use snafu::{OptionExt, ResultExt};
use tokio::fs;

use crate::error::{
    CliResult, NoConfigFileSnafu, ParseConfigSnafu, ReadConfigSnafu, UnknownRegionSnafu,
};

/// One host alias in the config file.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct HostConfig {
    pub url: String,
    pub access_key: String,
    pub secret_key: String,
    pub api: String,
    pub lookup: String,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct McConfig {
    pub version: String,
    pub hosts: BTreeMap<String, HostConfig>,
}

impl McConfig {
    pub fn from_slice(path: &Path, bytes: &[u8]) -> CliResult<Self> {
        serde_json::from_slice(bytes).context(ParseConfigSnafu {
            path: path.to_path_buf(),
        })
    }

    /// Look up the host registered under `region`.
    pub fn host(&self, region: &str) -> CliResult<&HostConfig> {
        self.hosts.get(region).with_context(|| UnknownRegionSnafu {
            region: region.to_string(),
            known: self.hosts.keys().cloned().collect::<Vec<_>>().join(","),
        })
    }
}

pub fn default_config_path() -> CliResult<PathBuf> {
    let home = std::env::var_os("HOME").context(NoConfigFileSnafu)?;
    Ok(PathBuf::from(home).join(".mc").join("config.json"))
}

pub async fn load_config(path: &Path) -> CliResult<McConfig> {
    let bytes = fs::read(path).await.context(ReadConfigSnafu {
        path: path.to_path_buf(),
    })?;
    McConfig::from_slice(path, &bytes)
}

fn has_scheme(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

/// Endpoint for `host`, optionally replaced by `overwrite_url`.
///
/// An override without a scheme is plain HTTP (a local minio port-forward);
/// a configured URL without a scheme is HTTPS.
pub fn resolve_endpoint(host: &HostConfig, overwrite_url: Option<&str>) -> String {
    match overwrite_url.filter(|u| !u.is_empty()) {
        Some(url) if has_scheme(url) => url.to_string(),
        Some(url) => format!("http://{url}"),
        None if has_scheme(&host.url) => host.url.clone(),
        None => format!("https://{}", host.url),
    }
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}

/// Connection settings for `bucket` on `host`.
///
/// The region alias only selects the host; the signing region is left to
/// the client default.
pub fn s3_location(host: &HostConfig, bucket: &str, overwrite_url: Option<&str>) -> S3Location {
    let endpoint = resolve_endpoint(host, overwrite_url);
    let allow_http = endpoint.starts_with("http://");
    S3Location {
        endpoint: Some(endpoint.trim_end_matches('/').to_string()),
        bucket: bucket.to_string(),
        region: None,
        access_key: non_empty(&host.access_key),
        secret_key: non_empty(&host.secret_key),
        allow_http,
    }
}
