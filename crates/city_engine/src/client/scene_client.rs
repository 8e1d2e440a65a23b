//! HTTP client for the generator API

use std::time::Duration;

use reqwest::blocking::Client;
use serde_json::Value;

use super::{LoadError, SceneSource};
use crate::core::config::ViewerConfig;
use crate::scene::SceneDocument;

/// Blocking client for the generator API
#[derive(Debug, Clone)]
pub struct SceneClient {
    client: Client,
    base_url: String,
}

impl SceneClient {
    /// Create a client for `base_url` with a request timeout
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, LoadError> {
        let client = Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    /// Create a client from configuration
    pub fn from_config(config: &ViewerConfig) -> Result<Self, LoadError> {
        Self::new(config.api_base_url.clone(), Duration::from_secs(config.request_timeout_secs))
    }

    /// Base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL of an endpoint
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// `GET /scene`
    pub fn fetch_scene(&self) -> Result<SceneDocument, LoadError> {
        let bytes = self.get_bytes("scene")?;
        Ok(SceneDocument::from_json_slice(&bytes)?)
    }

    /// `GET /cost`
    pub fn fetch_cost(&self) -> Result<Value, LoadError> {
        self.get_json("cost")
    }

    /// `GET /validation`
    pub fn fetch_validation(&self) -> Result<Value, LoadError> {
        self.get_json("validation")
    }

    /// `POST /solve`; asks the generator to re-run its solver
    pub fn trigger_solve(&self) -> Result<Value, LoadError> {
        let url = self.endpoint("solve");
        log::debug!("POST {}", url);
        let response = self.client.post(&url).send()?;
        Self::check_status(response.status())?;
        let bytes = response.bytes()?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn get_json(&self, path: &str) -> Result<Value, LoadError> {
        let bytes = self.get_bytes(path)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn get_bytes(&self, path: &str) -> Result<Vec<u8>, LoadError> {
        let url = self.endpoint(path);
        log::debug!("GET {}", url);
        let response = self.client.get(&url).send()?;
        Self::check_status(response.status())?;
        Ok(response.bytes()?.to_vec())
    }

    fn check_status(status: reqwest::StatusCode) -> Result<(), LoadError> {
        if status.is_success() {
            Ok(())
        } else {
            Err(LoadError::Status(status.as_u16()))
        }
    }
}

/// Scene source backed by the generator's HTTP API
#[derive(Debug, Clone)]
pub struct HttpSceneSource {
    client: SceneClient,
}

impl HttpSceneSource {
    /// Wrap a client
    pub fn new(client: SceneClient) -> Self {
        Self { client }
    }
}

impl SceneSource for HttpSceneSource {
    fn fetch(&self) -> Result<SceneDocument, LoadError> {
        self.client.fetch_scene()
    }

    fn describe(&self) -> String {
        self.client.endpoint("scene")
    }
}
