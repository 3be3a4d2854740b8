use std::path::PathBuf;

use reqwest::blocking::Client;

use crate::error::{DelverError, Result};
use crate::ingest::GraphPayload;

/// Seam between the controller and whatever produces graph payloads.
pub trait GraphSource {
    fn fetch_graph(&self) -> Result<GraphPayload>;
}

#[derive(Debug, Clone)]
pub struct HttpSource {
    pub url: String,
    client: Client,
}

impl HttpSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: Client::new(),
        }
    }
}

impl GraphSource for HttpSource {
    fn fetch_graph(&self) -> Result<GraphPayload> {
        let response = self.client.get(&self.url).send().map_err(|err| {
            DelverError::Fetch(anyhow::anyhow!(format!(
                "graph request failed for {}: {}",
                self.url, err
            )))
        })?;
        let status = response.status();
        if !status.is_success() {
            return Err(DelverError::Fetch(anyhow::anyhow!(format!(
                "graph request for {} returned {}",
                self.url, status
            ))));
        }
        response.json().map_err(|err| {
            DelverError::Fetch(anyhow::anyhow!(format!(
                "invalid graph response from {}: {}",
                self.url, err
            )))
        })
    }
}

#[derive(Debug, Clone)]
pub struct FileSource {
    pub path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl GraphSource for FileSource {
    fn fetch_graph(&self) -> Result<GraphPayload> {
        let content = std::fs::read_to_string(&self.path)?;
        crate::ingest::parse_payload(&content)
    }
}
