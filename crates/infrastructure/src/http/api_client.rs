use domain::{DomainError, Page};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, error};

use crate::config::ApiConfig;
use crate::http::error::{from_response_body, from_transport};
use crate::http::{ListEnvelope, QueryParams};

const USER_AGENT: &str = concat!("opu-lab/", env!("CARGO_PKG_VERSION"));

/// Thin JSON client over the backend. Every call is a single attempt: no
/// retries, and the only timeout is the configured client-wide one.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self, DomainError> {
        if !config.base_url.starts_with("http://") && !config.base_url.starts_with("https://") {
            return Err(DomainError::InvalidConfiguration(format!(
                "api.base_url must be an http(s) URL, got '{}'",
                config.base_url
            )));
        }

        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout())
            .build()
            .map_err(|e| DomainError::InvalidConfiguration(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone().filter(|t| !t.is_empty()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!(%method, %url, "API request");
        let builder = self.http.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Sends a request and turns any non-2xx answer into `DomainError::Remote`.
    async fn send(&self, builder: RequestBuilder) -> Result<Response, DomainError> {
        let response = builder.send().await.map_err(|e| {
            error!(error = %e, "API request failed to complete");
            from_transport(e)
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let url = response.url().to_string();
        let body = response.text().await.unwrap_or_default();
        let err = from_response_body(status, &body);
        error!(%url, status = status.as_u16(), error = %err, "API returned an error");
        Err(err)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, DomainError> {
        let bytes = response.bytes().await.map_err(from_transport)?;
        serde_json::from_slice(&bytes).map_err(|e| DomainError::Decode(e.to_string()))
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str, query: &QueryParams) -> Result<T, DomainError> {
        let response = self
            .send(self.request(Method::GET, path).query(query.pairs()))
            .await?;
        Self::decode(response).await
    }

    /// GET that maps a 404 to `None`.
    pub async fn get_optional<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, DomainError> {
        match self.get(path, &QueryParams::new()).await {
            Ok(value) => Ok(Some(value)),
            Err(DomainError::Remote { status, .. }) if status == StatusCode::NOT_FOUND.as_u16() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// GET of a list endpoint, whatever envelope it answers with.
    pub async fn get_list<T: DeserializeOwned>(&self, path: &str, query: &QueryParams) -> Result<Page<T>, DomainError> {
        let envelope: ListEnvelope<T> = self.get(path, query).await?;
        Ok(envelope.normalize())
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, DomainError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .send(self.request(Method::POST, path).json(body))
            .await?;
        Self::decode(response).await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, DomainError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .send(self.request(Method::PUT, path).json(body))
            .await?;
        Self::decode(response).await
    }

    /// DELETE; any response body is ignored.
    pub async fn delete(&self, path: &str) -> Result<(), DomainError> {
        self.send(self.request(Method::DELETE, path)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_http_base_url() {
        let config = ApiConfig {
            base_url: "localhost:8000".to_string(),
            ..ApiConfig::default()
        };
        assert!(matches!(
            ApiClient::new(&config),
            Err(DomainError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_trims_trailing_slash_and_blank_token() {
        let config = ApiConfig {
            base_url: "http://lab.local/api/".to_string(),
            token: Some(String::new()),
            ..ApiConfig::default()
        };
        let client = ApiClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "http://lab.local/api");
        assert!(client.token.is_none());
    }
}
