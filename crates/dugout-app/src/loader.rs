// Concurrent dataset loading from a local directory or a remote base URL.
//
// Every required dataset is fetched at once; the snapshot is only built after
// all of them arrive. Any failure there is fatal. The glossary is optional.

use async_trait::async_trait;
use dugout_core::dataset::{DatasetError, LeagueSnapshot, RawDatasets};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::{Config, DataConfig, DataLocation};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read dataset {name}: {source}")]
    Io {
        name: String,
        source: std::io::Error,
    },

    #[error("failed to fetch dataset {name}: {source}")]
    Http {
        name: String,
        source: reqwest::Error,
    },

    #[error("dataset {name} returned HTTP {status}")]
    Status { name: String, status: u16 },

    #[error(transparent)]
    Dataset(#[from] DatasetError),
}

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

/// Somewhere raw dataset bytes can be fetched from by file name.
#[async_trait]
pub trait DatasetSource: Send + Sync {
    async fn fetch(&self, name: &str) -> Result<Vec<u8>, LoadError>;

    /// Human-readable location, for logs.
    fn describe(&self) -> String;
}

/// Datasets stored as files in one directory.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl DatasetSource for DirectorySource {
    async fn fetch(&self, name: &str) -> Result<Vec<u8>, LoadError> {
        tokio::fs::read(self.root.join(name))
            .await
            .map_err(|source| LoadError::Io {
                name: name.to_string(),
                source,
            })
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}

/// Datasets published under one base URL.
#[derive(Debug, Clone)]
pub struct HttpSource {
    http: reqwest::Client,
    base_url: String,
}

impl HttpSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    fn url_for(&self, name: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), name)
    }
}

#[async_trait]
impl DatasetSource for HttpSource {
    async fn fetch(&self, name: &str) -> Result<Vec<u8>, LoadError> {
        let http_err = |source| LoadError::Http {
            name: name.to_string(),
            source,
        };
        let response = self.http.get(self.url_for(name)).send().await.map_err(http_err)?;
        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Status {
                name: name.to_string(),
                status: status.as_u16(),
            });
        }
        let body = response.bytes().await.map_err(http_err)?;
        Ok(body.to_vec())
    }

    fn describe(&self) -> String {
        self.base_url.clone()
    }
}

/// The source the config points at.
pub fn source_from_config(config: &Config) -> Box<dyn DatasetSource> {
    match config.data_location() {
        DataLocation::Directory(path) => Box::new(DirectorySource::new(path)),
        DataLocation::Url(url) => Box::new(HttpSource::new(url)),
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Fetch every dataset concurrently and build the snapshot.
pub async fn load_snapshot(
    source: &dyn DatasetSource,
    data: &DataConfig,
) -> Result<LeagueSnapshot, LoadError> {
    info!("loading datasets from {}", source.describe());

    let required = async {
        tokio::try_join!(
            source.fetch(&data.hitting),
            source.fetch(&data.pitching),
            source.fetch(&data.players),
            source.fetch(&data.seasons),
            source.fetch(&data.scouting),
        )
    };
    let optional = async {
        let name = data.glossary.as_deref()?;
        match source.fetch(name).await {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                warn!("glossary unavailable: {e}");
                None
            }
        }
    };
    let (required, glossary) = tokio::join!(required, optional);
    let (hitting, pitching, players, seasons, scouting) = required?;

    let raw = RawDatasets {
        hitting,
        pitching,
        players,
        seasons,
        scouting,
        glossary,
    };
    Ok(LeagueSnapshot::from_raw(&raw)?)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
