//! Async HTTP client wrapping the famtree JSON API.
//!
//! [`ApiClient`] implements [`FamilyStore`] on top of the `/api` routes, so
//! the same editing functions drive a remote server and a local file.

use std::time::Duration;

use famtree_core::{NewPerson, Person, PersonId, store::FamilyStore};
use reqwest::{Client, Response, StatusCode};
use thiserror::Error;

/// Connection settings for the famtree API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
}

#[derive(Debug, Error)]
pub enum ClientError {
  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  /// The server answered with a non-success status.
  #[error("{method} {path} → {status}: {message}")]
  Api {
    method:  &'static str,
    path:    String,
    status:  StatusCode,
    message: String,
  },
}

/// Async HTTP client for the famtree JSON REST API.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self, ClientError> {
    let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
    Ok(Self { client, config })
  }

  fn root(&self) -> &str { self.config.base_url.trim_end_matches('/') }

  fn url(&self, path: &str) -> String { format!("{}/api{}", self.root(), path) }

  /// `GET /health` with a short timeout; `false` on any failure.
  pub async fn is_reachable(&self) -> bool {
    let resp = self
      .client
      .get(format!("{}/health", self.root()))
      .timeout(Duration::from_secs(2))
      .send()
      .await;
    matches!(resp, Ok(r) if r.status().is_success())
  }

  /// Turn a non-success response into [`ClientError::Api`], keeping the
  /// server's `{"error": ...}` message when there is one.
  async fn check(
    method: &'static str,
    path: String,
    resp: Response,
  ) -> Result<Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
      return Ok(resp);
    }
    let message = resp
      .json::<serde_json::Value>()
      .await
      .ok()
      .and_then(|v| v["error"].as_str().map(str::to_owned))
      .unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_owned());
    Err(ClientError::Api {
      method,
      path,
      status,
      message,
    })
  }
}

// ─── FamilyStore impl ────────────────────────────────────────────────────────

impl FamilyStore for ApiClient {
  type Error = ClientError;

  /// `GET /api/people`
  async fn list_people(&self) -> Result<Vec<Person>, ClientError> {
    let path = "/people".to_owned();
    let resp = self.client.get(self.url(&path)).send().await?;
    Ok(Self::check("GET", path, resp).await?.json().await?)
  }

  /// `GET /api/people/:id`; a 404 is `None`.
  async fn get_person(&self, id: PersonId) -> Result<Option<Person>, ClientError> {
    let path = format!("/people/{id}");
    let resp = self.client.get(self.url(&path)).send().await?;
    if resp.status() == StatusCode::NOT_FOUND {
      return Ok(None);
    }
    Ok(Some(Self::check("GET", path, resp).await?.json().await?))
  }

  /// `POST /api/people`. The server recomputes the lineage flag itself.
  async fn insert_person(
    &self,
    input: NewPerson,
    _is_main_lineage: bool,
  ) -> Result<Person, ClientError> {
    let path = "/people".to_owned();
    let resp = self.client.post(self.url(&path)).json(&input).send().await?;
    Ok(Self::check("POST", path, resp).await?.json().await?)
  }

  /// `PUT /api/people/:id`
  async fn update_person(&self, person: Person) -> Result<Person, ClientError> {
    let path = format!("/people/{}", person.id);
    let resp = self.client.put(self.url(&path)).json(&person).send().await?;
    Ok(Self::check("PUT", path, resp).await?.json().await?)
  }

  /// `DELETE /api/people/:id`
  async fn delete_person(&self, id: PersonId) -> Result<(), ClientError> {
    let path = format!("/people/{id}");
    let resp = self.client.delete(self.url(&path)).send().await?;
    Self::check("DELETE", path, resp).await?;
    Ok(())
  }

  /// `POST /api/import` with the records as the body.
  async fn replace_all(&self, people: Vec<Person>) -> Result<(), ClientError> {
    let path = "/import".to_owned();
    let resp = self.client.post(self.url(&path)).json(&people).send().await?;
    Self::check("POST", path, resp).await?;
    Ok(())
  }
}
