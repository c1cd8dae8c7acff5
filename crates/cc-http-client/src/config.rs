//! Client settings, loadable from a TOML file

use std::collections::BTreeMap;
use std::path::Path;

use cc_json::JsonSettings;
use config::{Config, File};
use serde::{Deserialize, Serialize};

use crate::response::Response;

/// HTTP client settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpClientSettings {
    /// Decompress gzip and deflate responses
    pub compression: bool,
    /// Refuse TLS versions older than 1.2
    pub tls12_only: bool,
    /// Total timeout of each request, in seconds
    pub timeout_secs: Option<u64>,
    /// Headers sent with every request
    pub default_headers: BTreeMap<String, String>,
    /// Options used when writing and reading JSON bodies
    pub json: JsonSettings,
}

impl Default for HttpClientSettings {
    fn default() -> Self {
        Self {
            compression: false,
            tls12_only: true,
            timeout_secs: None,
            default_headers: BTreeMap::new(),
            json: JsonSettings::default(),
        }
    }
}

impl HttpClientSettings {
    /// Load settings from `path`, with defaults for anything it leaves out
    pub fn from_file<P: AsRef<Path>>(path: P) -> Response<Self> {
        let default_settings = Self::default();
        let config = Config::builder()
            // use defaults
            .add_source(Config::try_from(&default_settings)?)
            // override with file contents
            .add_source(File::from(path.as_ref()))
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Load settings from `path`, falling back to defaults if it cannot be read
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        match Self::from_file(path) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::error!("Error reading client settings, falling back to defaults: {e}");
                Self::default()
            }
        }
    }
}
