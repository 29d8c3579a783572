//! Application state for the highlight service: passage catalog, in-memory
//! highlight store, prompts, and the optional OpenAI client.
//!
//! Highlights are keyed by `(user_id, passage_title)` and kept in creation
//! order. Ids come from a single counter and are never reused.

use std::{
    collections::HashMap,
    sync::atomic::{AtomicI64, Ordering},
    sync::Arc,
};
use tokio::sync::RwLock;
use tracing::{info, instrument, warn};

use crate::config::{load_config_from_env, HighlighterConfig, Prompts};
use crate::domain::{Highlight, NewHighlight, Passage};
use crate::error::{AppError, AppResult};
use crate::openai::OpenAI;
use crate::palette;
use crate::seeds::seed_passages;

pub type HighlightKey = (i64, String);

pub struct AppState {
    pub passages: HashMap<String, Passage>,
    pub highlights: Arc<RwLock<HashMap<HighlightKey, Vec<Highlight>>>>,
    next_id: AtomicI64,
    pub openai: Option<OpenAI>,
    pub prompts: Prompts,
}

impl AppState {
    /// Build state from env: load config, seed passages, init OpenAI.
    #[instrument(level = "info", skip_all)]
    pub fn new() -> Self {
        let openai = OpenAI::from_env();
        if let Some(oa) = &openai {
            info!(target: "highlighter", base_url = %oa.base_url, fast_model = %oa.fast_model, "OpenAI enabled.");
        } else {
            info!(target: "highlighter", "OpenAI disabled (no OPENAI_API_KEY). Using stub translation.");
        }
        Self::with_config(load_config_from_env(), openai)
    }

    pub fn with_config(cfg: Option<HighlighterConfig>, openai: Option<OpenAI>) -> Self {
        let cfg = cfg.unwrap_or_default();

        let mut passages = HashMap::<String, Passage>::new();
        for p in seed_passages() {
            passages.insert(p.title.clone(), p);
        }
        // Config passages override seeds with the same title.
        for pc in &cfg.passages {
            if passages.insert(pc.title.clone(), pc.to_passage()).is_some() {
                warn!(target: "highlighter", title = %pc.title, "Config passage replaces built-in passage");
            }
        }
        info!(target: "highlighter", passages = passages.len(), "Passage catalog ready");

        Self {
            passages,
            highlights: Arc::new(RwLock::new(HashMap::new())),
            next_id: AtomicI64::new(1),
            openai,
            prompts: cfg.prompts,
        }
    }

    pub fn passage(&self, title: &str) -> Option<&Passage> {
        self.passages.get(title)
    }

    #[instrument(level = "debug", skip(self))]
    pub async fn list_highlights(&self, user_id: i64, passage_title: &str) -> Vec<Highlight> {
        let map = self.highlights.read().await;
        map.get(&(user_id, passage_title.to_string()))
            .cloned()
            .unwrap_or_default()
    }

    /// Validate and persist a highlight, assigning the next id.
    #[instrument(level = "info", skip(self, req), fields(user_id = req.user_id, passage = %req.passage_title))]
    pub async fn create_highlight(&self, req: NewHighlight) -> AppResult<Highlight> {
        if req.start_position >= req.end_position {
            return Err(AppError::BadRequest(format!(
                "startPosition ({}) must be less than endPosition ({})",
                req.start_position, req.end_position
            )));
        }
        if let Some(p) = self.passage(&req.passage_title) {
            if req.end_position > p.len() {
                return Err(AppError::BadRequest(format!(
                    "endPosition ({}) is past the end of the passage ({})",
                    req.end_position,
                    p.len()
                )));
            }
        }
        if !palette::is_known(&req.highlight_color) {
            return Err(AppError::BadRequest(format!("unknown highlightColor '{}'", req.highlight_color)));
        }

        let highlight = Highlight {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            passage_title: req.passage_title.clone(),
            highlighted_text: req.highlighted_text,
            start_position: req.start_position,
            end_position: req.end_position,
            highlight_type: req.highlight_type,
            highlight_color: req.highlight_color,
        };
        self.highlights
            .write()
            .await
            .entry((req.user_id, req.passage_title))
            .or_default()
            .push(highlight.clone());
        info!(target: "highlight_store", id = highlight.id, start = highlight.start_position, end = highlight.end_position, "Highlight stored");
        Ok(highlight)
    }

    /// Remove a highlight owned by `user_id`.
    #[instrument(level = "info", skip(self))]
    pub async fn delete_highlight(&self, user_id: i64, highlight_id: i64) -> AppResult<()> {
        let mut map = self.highlights.write().await;
        let found = map
            .iter()
            .filter(|((owner, _), _)| *owner == user_id)
            .find_map(|(key, list)| list.iter().position(|h| h.id == highlight_id).map(|pos| (key.clone(), pos)));
        let Some((key, pos)) = found else {
            return Err(AppError::NotFound(format!("highlight {} for user {}", highlight_id, user_id)));
        };
        if let Some(list) = map.get_mut(&key) {
            list.remove(pos);
            if list.is_empty() {
                map.remove(&key);
            }
        }
        info!(target: "highlight_store", id = highlight_id, "Highlight deleted");
        Ok(())
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_config(None, None)
    }
}
