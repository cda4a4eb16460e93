//! Login against `POST /api/login`.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::Config;
use crate::directory::error::Operation;
use crate::directory::http::{check_status, parse_base_url};
use crate::error::{Result, RosterError};

use super::Session;

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
}

/// Client for the account service's login endpoint
pub struct HttpAuthClient {
    client: Client,
    base_url: Url,
}

impl HttpAuthClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: parse_base_url(base_url)?,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.base_url(), config.request_timeout())
    }

    pub(crate) fn login_url(&self) -> Result<Url> {
        self.base_url
            .join("api/login")
            .map_err(|e| RosterError::Config(format!("invalid login endpoint: {e}")))
    }

    /// Exchange credentials for a session token
    pub async fn login(&self, email: &str, password: &str) -> Result<Session> {
        let url = self.login_url()?;
        tracing::debug!("POST {url}");

        let response = self
            .client
            .post(url)
            .json(&LoginRequest { email, password })
            .send()
            .await?;
        let response = check_status(response, Operation::Login).await?;
        let body: LoginResponse = response.json().await?;

        if body.token.is_empty() {
            return Err(RosterError::Auth(
                "login succeeded but no token was returned".to_string(),
            ));
        }
        Ok(Session::new(body.token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_url() {
        let client = HttpAuthClient::new("https://reqres.in", Duration::from_secs(5)).unwrap();
        assert_eq!(
            client.login_url().unwrap().as_str(),
            "https://reqres.in/api/login"
        );
    }

    #[test]
    fn test_login_request_shape() {
        let body = serde_json::to_value(LoginRequest {
            email: "eve.holt@reqres.in",
            password: "cityslicka",
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({ "email": "eve.holt@reqres.in", "password": "cityslicka" })
        );
    }
}
