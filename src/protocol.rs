//! Public request/response structs for the HTTP API (serde ready).
//! Field names are camelCase on the wire to match the browser frontend.

use serde::{Deserialize, Serialize};

use crate::domain::{Highlight, HighlightType, Segment};
use crate::render::RenderedSegment;

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightsQuery {
    pub user_id: i64,
    pub passage_title: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListHighlightsOut {
    pub highlights: Vec<Highlight>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteHighlightIn {
    pub user_id: i64,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassageSummary {
    pub title: String,
    pub paragraphs: usize,
    pub length: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PassagesOut {
    pub passages: Vec<PassageSummary>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PassageOut {
    pub title: String,
    pub text: String,
    pub segments: Vec<Segment>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderQuery {
    pub user_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct RenderOut {
    pub title: String,
    pub segments: Vec<RenderedSegment>,
    pub html: String,
}

/// A selection expressed as local offsets within one paragraph.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionIn {
    pub paragraph: usize,
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionOut {
    pub selected_text: String,
    pub start_position: usize,
    pub end_position: usize,
    pub highlight_type: HighlightType,
    pub default_color: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateIn {
    pub text: String,
    #[serde(default = "default_target_language")]
    pub target_language: String,
}

fn default_target_language() -> String {
    "English".into()
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateOut {
    pub original_text: String,
    pub translated_text: String,
    pub target_language: String,
}
