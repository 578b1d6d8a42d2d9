use std::{fs::File, io::Read, path::Path, time::Duration};

use serde::Deserialize;
use url::Url;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000/";
pub const DEFAULT_ENDPOINT: &str = "all_sims/";
pub const DEFAULT_USER_AGENT: &str = "SimBot";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to deserialize config.")]
    Serde(#[from] serde_yaml::Error),
    #[error("Failed to open config file")]
    Io(#[from] std::io::Error),
    #[error("Invalid base url {url:?}: {source}")]
    Url {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// What happens when responses to several triggers overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseOrdering {
    /// Every response is applied as it arrives, the last one to arrive stays
    /// on screen even if it belongs to an older trigger.
    LastArrival,
    /// A response is dropped if a newer trigger's response is already shown.
    LatestTrigger,
}

impl Default for ResponseOrdering {
    fn default() -> Self {
        ResponseOrdering::LastArrival
    }
}

#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// Url of the page the form lives on. The endpoint is resolved relative to it.
    pub base_url: Url,
    pub endpoint: String,
    /// `None` waits forever.
    pub timeout: Option<Duration>,
    pub ordering: ResponseOrdering,
    pub user_agent: String,
}

/// On-disk form of [`SiteConfig`], every field optional.
#[derive(Debug, Default, Deserialize)]
pub struct SiteConfigYaml {
    pub base_url: Option<String>,
    pub endpoint: Option<String>,
    pub timeout_secs: Option<u64>,
    pub ordering: Option<ResponseOrdering>,
    pub user_agent: Option<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base url is valid"),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: None,
            ordering: ResponseOrdering::default(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl SiteConfig {
    pub fn from_yaml(other: SiteConfigYaml) -> Result<Self, ConfigError> {
        let default = Self::default();
        Ok(Self {
            base_url: match other.base_url {
                Some(url) => parse_base_url(&url)?,
                None => default.base_url,
            },
            endpoint: other.endpoint.unwrap_or(default.endpoint),
            timeout: other.timeout_secs.map(Duration::from_secs),
            ordering: other.ordering.unwrap_or(default.ordering),
            user_agent: other.user_agent.unwrap_or(default.user_agent),
        })
    }

    /// Load from a yaml file. See `configs/simbot.yaml`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        info!("Loading {}", path.as_ref().to_string_lossy());
        let mut file = File::open(path)?;
        let mut s = String::new();
        file.read_to_string(&mut s)?;
        Self::parse(&s)
    }

    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let raw: SiteConfigYaml = serde_yaml::from_str(yaml)?;
        Self::from_yaml(raw)
    }

    pub fn with_base_url(mut self, url: &str) -> Result<Self, ConfigError> {
        self.base_url = parse_base_url(url)?;
        Ok(self)
    }
}

/// Parse a page url. The endpoint is later joined onto it the way a browser
/// resolves a relative link, so `/simbot/index.html` and `/simbot/` both put
/// `all_sims/` under `/simbot/`, while `/simbot` puts it at the root.
pub fn parse_base_url(url: &str) -> Result<Url, ConfigError> {
    Url::parse(url).map_err(|source| ConfigError::Url {
        url: url.to_string(),
        source,
    })
}
