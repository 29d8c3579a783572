//! Behaviors behind the HTTP handlers that go beyond plain CRUD:
//! rendering a passage for a user, resolving a paragraph selection, and
//! translating a selection.

use tracing::{debug, error, instrument};

use crate::classify::classify;
use crate::domain::Passage;
use crate::offsets::{resolve, RenderedPassage};
use crate::protocol::{RenderOut, SelectionIn, SelectionOut, TranslateOut};
use crate::render::{passage_to_html, render_passage};
use crate::state::AppState;
use crate::text::trunc_for_log;

#[instrument(level = "info", skip(state, passage), fields(title = %passage.title))]
pub async fn render_for_user(state: &AppState, passage: &Passage, user_id: Option<i64>) -> RenderOut {
  let highlights = match user_id {
    Some(uid) => state.list_highlights(uid, &passage.title).await,
    None => Vec::new(),
  };
  let segments = render_passage(passage, &highlights);
  debug!(target: "passage_render", segments = segments.len(), highlights = highlights.len(), "Passage rendered");
  RenderOut { title: passage.title.clone(), html: passage_to_html(&segments), segments }
}

/// Resolve a paragraph-local selection to global offsets and classify it.
/// `None` for an unknown paragraph or an empty/blank selection.
pub fn resolve_selection(passage: &Passage, sel: &SelectionIn) -> Option<SelectionOut> {
  let rendered = RenderedPassage::new(passage);
  let range = rendered.select_in_segment(sel.paragraph, sel.start, sel.end)?;
  let resolved = resolve(&range)?;
  let highlight_type = classify(&resolved.selected_text);
  Some(SelectionOut {
    selected_text: resolved.selected_text,
    start_position: resolved.start_position,
    end_position: resolved.end_position,
    highlight_type,
    default_color: highlight_type.default_color().to_string(),
  })
}

#[instrument(level = "info", skip(state, text), fields(text_len = text.len()))]
pub async fn do_translate(state: &AppState, text: &str, target_language: &str) -> TranslateOut {
  let translated_text = match &state.openai {
    Some(oa) => match oa.translate(&state.prompts, text, target_language).await {
      Ok(t) => t,
      Err(e) => {
        error!(target: "highlighter", error = %e, "OpenAI translate failed; using stub fallback.");
        translate_stub(text)
      }
    },
    None => translate_stub(text),
  };
  debug!(target: "highlighter", preview = %trunc_for_log(&translated_text, 40), "Translation ready");
  TranslateOut {
    original_text: text.to_string(),
    translated_text,
    target_language: target_language.to_string(),
  }
}

fn translate_stub(text: &str) -> String {
  let s = text.trim();
  if s.is_empty() {
    return String::new();
  }
  format!("{} (translation unavailable)", s)
}
