//! HTTP boundary for highlight persistence.
//!
//! `HighlightApi` is the seam the store adapter talks through; the reqwest
//! implementation speaks the `/api/v1/highlights` contract. No retries and no
//! client-side timeout: a call is a single round-trip on the client's defaults.

use std::future::Future;

use reqwest::header::USER_AGENT;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::config::ClientConfig;
use crate::domain::{Highlight, NewHighlight};
use crate::error::{ApiError, ErrorBody};
use crate::protocol::{DeleteHighlightIn, ListHighlightsOut};

pub trait HighlightApi {
  fn list(&self, user_id: i64, passage_title: &str) -> impl Future<Output = Result<Vec<Highlight>, ApiError>> + Send;

  fn create(&self, req: &NewHighlight) -> impl Future<Output = Result<Highlight, ApiError>> + Send;

  fn delete(&self, user_id: i64, highlight_id: i64) -> impl Future<Output = Result<(), ApiError>> + Send;
}

#[derive(Clone)]
pub struct HttpHighlightApi {
  client: reqwest::Client,
  base_url: String,
}

impl HttpHighlightApi {
  pub fn new(cfg: &ClientConfig) -> Result<Self, ApiError> {
    let client = reqwest::Client::builder().build()?;
    Ok(Self { client, base_url: cfg.base_url.clone() })
  }

  pub fn from_env() -> Result<Self, ApiError> {
    Self::new(&ClientConfig::from_env())
  }

  fn url(&self, path: &str) -> String {
    format!("{}/api/v1{}", self.base_url, path)
  }
}

/// Turn non-2xx responses into `ApiError::Status`, preferring the server's message.
async fn check(res: reqwest::Response) -> Result<reqwest::Response, ApiError> {
  if res.status().is_success() {
    return Ok(res);
  }
  let status = res.status().as_u16();
  let body = res.text().await.unwrap_or_default();
  let message = serde_json::from_str::<ErrorBody>(&body)
    .map(|e| e.message)
    .unwrap_or(body);
  Err(ApiError::Status { status, message })
}

async fn decode<T: for<'a> Deserialize<'a>>(res: reqwest::Response) -> Result<T, ApiError> {
  let bytes = res.bytes().await?;
  serde_json::from_slice::<T>(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
}

impl HighlightApi for HttpHighlightApi {
  #[instrument(level = "debug", skip(self), fields(base_url = %self.base_url))]
  async fn list(&self, user_id: i64, passage_title: &str) -> Result<Vec<Highlight>, ApiError> {
    let res = self.client.get(self.url("/highlights"))
      .header(USER_AGENT, "passage-highlighter/0.1")
      .query(&[("userId", user_id.to_string()), ("passageTitle", passage_title.to_string())])
      .send().await?;
    let out: ListHighlightsOut = decode(check(res).await?).await?;
    debug!(target: "highlight_store", count = out.highlights.len(), "Fetched highlights");
    Ok(out.highlights)
  }

  #[instrument(level = "debug", skip(self, req), fields(user_id = req.user_id, start = req.start_position, end = req.end_position))]
  async fn create(&self, req: &NewHighlight) -> Result<Highlight, ApiError> {
    let res = self.client.post(self.url("/highlights"))
      .header(USER_AGENT, "passage-highlighter/0.1")
      .json(req)
      .send().await?;
    decode(check(res).await?).await
  }

  #[instrument(level = "debug", skip(self))]
  async fn delete(&self, user_id: i64, highlight_id: i64) -> Result<(), ApiError> {
    let res = self.client.delete(self.url(&format!("/highlights/{}", highlight_id)))
      .header(USER_AGENT, "passage-highlighter/0.1")
      .json(&DeleteHighlightIn { user_id })
      .send().await?;
    check(res).await?;
    Ok(())
  }
}
