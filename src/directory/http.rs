//! reqwest implementation of [`DirectoryClient`].

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response};
use secrecy::{ExposeSecret, SecretBox};
use url::Url;

use crate::auth::Session;
use crate::config::Config;
use crate::error::{Result, RosterError};
use crate::types::{Page, RecordId, RecordPatch};

use super::error::{ApiError, Operation};
use super::{DirectoryClient, ListResponse};

/// HTTP client for the `/api/users` endpoints
pub struct HttpDirectoryClient {
    client: Client,
    base_url: Url,
    token: Option<SecretBox<String>>,
}

impl HttpDirectoryClient {
    /// Create a client against `base_url` with the given request timeout
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: parse_base_url(base_url)?,
            token: None,
        })
    }

    /// Create a client from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.base_url(), config.request_timeout())
    }

    /// Send the session token as a bearer credential on every request
    pub fn with_session(mut self, session: &Session) -> Self {
        self.token = Some(SecretBox::new(Box::new(
            session.token().expose_secret().clone(),
        )));
        self
    }

    pub(crate) fn page_url(&self, page: u32) -> Result<Url> {
        let mut url = self.endpoint("api/users")?;
        url.query_pairs_mut()
            .append_pair("page", &page.to_string());
        Ok(url)
    }

    pub(crate) fn record_url(&self, id: RecordId) -> Result<Url> {
        self.endpoint(&format!("api/users/{id}"))
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| RosterError::Config(format!("invalid endpoint '{path}': {e}")))
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.client.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }
}

/// Parse a base URL, making sure relative joins keep its full path.
pub(crate) fn parse_base_url(base_url: &str) -> Result<Url> {
    let mut url = Url::parse(base_url.trim())
        .map_err(|e| RosterError::Config(format!("invalid base URL '{base_url}': {e}")))?;
    if url.cannot_be_a_base() {
        return Err(RosterError::Config(format!(
            "invalid base URL '{base_url}': not a hierarchical URL"
        )));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Turn a non-2xx response into an error, keeping the body's `error` text.
pub(crate) async fn check_status(response: Response, operation: Operation) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ApiError::from_response(operation, status, &body).into())
}

impl DirectoryClient for HttpDirectoryClient {
    async fn fetch_page(&self, page: u32) -> Result<Page> {
        let url = self.page_url(page)?;
        tracing::debug!("GET {url}");

        let response = self.request(Method::GET, url).send().await?;
        let response = check_status(response, Operation::ListPage).await?;
        let body: ListResponse = response.json().await?;
        body.into_page(page)
    }

    async fn update_record(&self, id: RecordId, patch: &RecordPatch) -> Result<()> {
        let url = self.record_url(id)?;
        tracing::debug!("PUT {url}");

        let response = self.request(Method::PUT, url).json(patch).send().await?;
        check_status(response, Operation::Update).await?;
        Ok(())
    }

    async fn delete_record(&self, id: RecordId) -> Result<()> {
        let url = self.record_url(id)?;
        tracing::debug!("DELETE {url}");

        let response = self.request(Method::DELETE, url).send().await?;
        check_status(response, Operation::Delete).await?;
        Ok(())
    }
}
