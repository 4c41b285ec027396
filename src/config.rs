/// Static configuration for the background worker
use url::Url;

use crate::error::{BackgroundError, Result};

/// Where the clustering service listens when nothing else is configured
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    backend_url: Url,
    cluster_endpoint: Url,
    health_endpoint: Url,
}

impl Config {
    /// Build a config from the clustering service's base url. A path on
    /// the base (e.g. behind a reverse proxy) is kept.
    pub fn from_base(base: &str) -> Result<Config> {
        let mut backend_url = Url::parse(base.trim())?;

        if !matches!(backend_url.scheme(), "http" | "https") {
            return Err(BackgroundError::Config(format!(
                "unsupported backend scheme: {}",
                backend_url.scheme()
            )));
        }

        if !backend_url.path().ends_with('/') {
            let path = format!("{}/", backend_url.path());
            backend_url.set_path(&path);
        }

        let cluster_endpoint = backend_url.join("api/cluster")?;
        let health_endpoint = backend_url.join("health")?;

        Ok(Config {
            backend_url,
            cluster_endpoint,
            health_endpoint,
        })
    }

    pub fn backend_url(&self) -> &Url {
        &self.backend_url
    }

    /// `POST {base}/api/cluster`
    pub fn cluster_endpoint(&self) -> &Url {
        &self.cluster_endpoint
    }

    /// `GET {base}/health`
    pub fn health_endpoint(&self) -> &Url {
        &self.health_endpoint
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::from_base(DEFAULT_BACKEND_URL).expect("default backend url is valid")
    }
}
