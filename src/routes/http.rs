//! HTTP endpoint handlers. Thin wrappers over `AppState` and `logic`.

use std::sync::Arc;

use axum::{
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
  Json,
};
use tracing::{info, instrument};

use crate::domain::NewHighlight;
use crate::error::{AppError, AppResult};
use crate::logic::{do_translate, render_for_user, resolve_selection};
use crate::protocol::*;
use crate::state::AppState;

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

#[instrument(level = "info", skip(state), fields(user_id = q.user_id, passage = %q.passage_title))]
pub async fn http_list_highlights(
  State(state): State<Arc<AppState>>,
  Query(q): Query<HighlightsQuery>,
) -> impl IntoResponse {
  let highlights = state.list_highlights(q.user_id, &q.passage_title).await;
  info!(target: "highlight_store", count = highlights.len(), "HTTP highlights listed");
  Json(ListHighlightsOut { highlights })
}

#[instrument(level = "info", skip(state, body), fields(user_id = body.user_id, passage = %body.passage_title, text_len = body.highlighted_text.len()))]
pub async fn http_create_highlight(
  State(state): State<Arc<AppState>>,
  Json(body): Json<NewHighlight>,
) -> AppResult<impl IntoResponse> {
  let created = state.create_highlight(body).await?;
  Ok((StatusCode::OK, Json(created)))
}

#[instrument(level = "info", skip(state, body), fields(user_id = body.user_id))]
pub async fn http_delete_highlight(
  State(state): State<Arc<AppState>>,
  Path(id): Path<i64>,
  Json(body): Json<DeleteHighlightIn>,
) -> AppResult<StatusCode> {
  state.delete_highlight(body.user_id, id).await?;
  Ok(StatusCode::NO_CONTENT)
}

#[instrument(level = "info", skip(state))]
pub async fn http_list_passages(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  let mut passages: Vec<PassageSummary> = state
    .passages
    .values()
    .map(|p| PassageSummary { title: p.title.clone(), paragraphs: p.segments().len(), length: p.len() })
    .collect();
  passages.sort_by(|a, b| a.title.cmp(&b.title));
  Json(PassagesOut { passages })
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_passage(
  State(state): State<Arc<AppState>>,
  Path(title): Path<String>,
) -> AppResult<Json<PassageOut>> {
  let p = state.passage(&title).ok_or_else(|| AppError::NotFound(format!("passage '{}'", title)))?;
  Ok(Json(PassageOut { title: p.title.clone(), text: p.text.clone(), segments: p.segments() }))
}

#[instrument(level = "info", skip(state), fields(user_id = ?q.user_id))]
pub async fn http_render_passage(
  State(state): State<Arc<AppState>>,
  Path(title): Path<String>,
  Query(q): Query<RenderQuery>,
) -> AppResult<Json<RenderOut>> {
  let p = state.passage(&title).ok_or_else(|| AppError::NotFound(format!("passage '{}'", title)))?;
  Ok(Json(render_for_user(&state, p, q.user_id).await))
}

#[instrument(level = "info", skip(state, body), fields(paragraph = body.paragraph, start = body.start, end = body.end))]
pub async fn http_resolve_selection(
  State(state): State<Arc<AppState>>,
  Path(title): Path<String>,
  Json(body): Json<SelectionIn>,
) -> AppResult<Json<SelectionOut>> {
  let p = state.passage(&title).ok_or_else(|| AppError::NotFound(format!("passage '{}'", title)))?;
  resolve_selection(p, &body)
    .map(Json)
    .ok_or_else(|| AppError::BadRequest("empty selection or unknown paragraph".into()))
}

#[instrument(level = "info", skip(state, body), fields(text_len = body.text.len(), target = %body.target_language))]
pub async fn http_post_translate(
  State(state): State<Arc<AppState>>,
  Json(body): Json<TranslateIn>,
) -> impl IntoResponse {
  Json(do_translate(&state, &body.text, &body.target_language).await)
}
