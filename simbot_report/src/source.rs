use async_trait::async_trait;
use http::header::USER_AGENT;
use url::Url;

use crate::{
    config::SiteConfig,
    error::{ReportError, ReportResult},
    request::ReportRequest,
};

/// Something that turns a [`ReportRequest`] into a report fragment.
#[async_trait]
pub trait ReportSource: Send + Sync + 'static {
    async fn fetch(&self, request: &ReportRequest) -> ReportResult<String>;
}

/// Fetches the fragment from the site's `all_sims/` endpoint over HTTP.
#[derive(Debug, Clone)]
pub struct HttpReportSource {
    client: reqwest::Client,
    endpoint: Url,
    user_agent: String,
}

impl HttpReportSource {
    pub fn new(config: &SiteConfig) -> ReportResult<Self> {
        let endpoint = config
            .base_url
            .join(&config.endpoint)
            .map_err(|e| ReportError::InvalidUrl(format!("{} + {}: {}", config.base_url, config.endpoint, e)))?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            endpoint,
            user_agent: config.user_agent.clone(),
        })
    }

    /// The resolved endpoint, without query.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl ReportSource for HttpReportSource {
    async fn fetch(&self, request: &ReportRequest) -> ReportResult<String> {
        let res = self
            .client
            .get(self.endpoint.clone())
            .query(request)
            .header(USER_AGENT, self.user_agent.as_str())
            .send()
            .await?;

        let status = res.status();

        let data_str = res
            .text()
            .await?;

        if !status.is_success() {
            return Err(ReportError::Server { status, body: data_str });
        }

        Ok(data_str)
    }
}
