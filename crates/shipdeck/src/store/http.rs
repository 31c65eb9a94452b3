//! Remote ship store over JSON/HTTP.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use super::ShipStore;
use crate::config::Config;
use crate::error::{Error, Operation, Result};
use crate::session::Session;
use crate::ship::{Ship, ShipDraft, ShipQuery};

const APPLICATION_JSON: &str = "application/json";

/// Body of the service's health endpoint.
#[derive(Debug, Deserialize)]
struct PingBody {
    message: String,
}

/// Client for the remote ship service.
///
/// Endpoints, relative to the base URL:
/// - `GET /ships`, `POST /ships`
/// - `GET|PUT|DELETE /ships/{id}`
/// - `GET /` (health)
#[derive(Debug, Clone)]
pub struct HttpShipStore {
    client: reqwest::Client,
    base_url: Url,
    session: Arc<dyn Session>,
}

impl HttpShipStore {
    /// Create a client for the service at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot hold path segments or the HTTP
    /// client cannot be built.
    pub fn new(base_url: &str, timeout: Duration, session: Arc<dyn Session>) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| Error::internal(format!("invalid base url '{base_url}': {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::internal(format!(
                "base url '{base_url}' cannot hold a path"
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            session,
        })
    }

    /// Create a client from the `[api]` configuration section.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be built.
    pub fn from_config(config: &Config, session: Arc<dyn Session>) -> Result<Self> {
        Self::new(&config.api.base_url, config.request_timeout(), session)
    }

    /// The base URL requests are made against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn ships_url(&self, id: Option<&str>) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| Error::internal("base url cannot hold a path"))?;
            segments.pop_if_empty().push("ships");
            if let Some(id) = id {
                segments.push(id);
            }
        }
        Ok(url)
    }

    fn headers(&self, operation: Operation) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));
        headers.insert(ACCEPT, HeaderValue::from_static(APPLICATION_JSON));
        if let Some(token) = self.session.session_token() {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| Error::network(operation, format!("invalid auth header: {e}")))?;
            headers.insert(AUTHORIZATION, value);
        }
        Ok(headers)
    }

    async fn send(&self, operation: Operation, request: RequestBuilder) -> Result<Response> {
        let response = request
            .headers(self.headers(operation)?)
            .send()
            .await
            .map_err(|e| {
                warn!(%operation, error = %e, "request failed");
                Error::network(operation, e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(%operation, %status, "request rejected");
            return Err(Error::network(operation, format!("HTTP {status}")));
        }
        debug!(%operation, %status, "request succeeded");
        Ok(response)
    }

    async fn read_json<T: DeserializeOwned>(operation: Operation, response: Response) -> Result<T> {
        response
            .json::<T>()
            .await
            .map_err(|e| Error::network(operation, format!("invalid response body: {e}")))
    }
}

#[async_trait]
impl ShipStore for HttpShipStore {
    #[instrument(name = "store_http_list", skip(self))]
    async fn list(&self) -> Result<Vec<Ship>> {
        let op = Operation::List;
        let response = self.send(op, self.client.get(self.ships_url(None)?)).await?;
        Self::read_json(op, response).await
    }

    #[instrument(name = "store_http_create", skip(self, draft), fields(name = %draft.name))]
    async fn create(&self, draft: ShipDraft) -> Result<Ship> {
        let op = Operation::Create;
        let ship = Ship::from_draft(Ship::mint_id(), draft);
        debug!(id = %ship.id, "minted ship id");
        let request = self.client.post(self.ships_url(None)?).json(&ship);
        let response = self.send(op, request).await?;
        Self::read_json(op, response).await
    }

    #[instrument(name = "store_http_update", skip(self, draft))]
    async fn update(&self, id: &str, draft: ShipDraft) -> Result<Ship> {
        let op = Operation::Update;
        let ship = Ship::from_draft(id, draft);
        let request = self.client.put(self.ships_url(Some(id))?).json(&ship);
        let response = self.send(op, request).await?;
        Self::read_json(op, response).await
    }

    #[instrument(name = "store_http_delete", skip(self))]
    async fn delete(&self, id: &str) -> Result<()> {
        let op = Operation::Delete;
        self.send(op, self.client.delete(self.ships_url(Some(id))?))
            .await?;
        Ok(())
    }

    #[instrument(name = "store_http_get", skip(self))]
    async fn get(&self, id: &str) -> Result<Ship> {
        let op = Operation::Get;
        let response = self.send(op, self.client.get(self.ships_url(Some(id))?)).await?;
        Self::read_json(op, response).await
    }

    #[instrument(name = "store_http_search", skip(self))]
    async fn search(&self, query: &ShipQuery) -> Result<Vec<Ship>> {
        let op = Operation::Search;
        let request = self.client.get(self.ships_url(None)?).query(query);
        let response = self.send(op, request).await?;
        Self::read_json(op, response).await
    }

    #[instrument(name = "store_http_ping", skip(self))]
    async fn ping(&self) -> Result<String> {
        let op = Operation::Ping;
        let response = self.send(op, self.client.get(self.base_url.clone())).await?;
        let status = response.status();
        match response.json::<PingBody>().await {
            Ok(body) => Ok(body.message),
            Err(_) => Ok(status.to_string()),
        }
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
