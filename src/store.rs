//! Highlight store adapter: the view-side owner of one `(user, passage)`
//! highlight list.
//!
//! Creates and deletes are confirmed-then-applied: local state only changes
//! after the API call succeeds, and every change swaps in a fresh list
//! snapshot instead of mutating the old one. Failures never propagate out of
//! here; they become a destructive notification plus an error log.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{mpsc, RwLock};
use tracing::{error, info, instrument, warn};

use crate::client::HighlightApi;
use crate::domain::{Highlight, HighlightType, NewHighlight};
use crate::offsets::ResolvedSelection;
use crate::ui::SelectionState;

pub const CREATE_FAILED: &str = "Failed to create highlight. Please try again.";
pub const DELETE_FAILED: &str = "Failed to remove highlight. Please try again.";
pub const LOAD_FAILED: &str = "Failed to load highlights. Please refresh the page.";

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
  Default,
  Destructive,
}

/// A transient user-facing message (a toast).
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct Notification {
  pub title: String,
  pub description: String,
  pub variant: Variant,
}

impl Notification {
  fn info(title: &str, description: &str) -> Self {
    Self { title: title.into(), description: description.into(), variant: Variant::Default }
  }

  fn failure(description: &str) -> Self {
    Self { title: "Error".into(), description: description.into(), variant: Variant::Destructive }
  }
}

/// Sink for notifications.
pub trait Notifier: Send + Sync {
  fn notify(&self, notification: Notification);
}

impl Notifier for mpsc::UnboundedSender<Notification> {
  fn notify(&self, notification: Notification) {
    if self.send(notification).is_err() {
      warn!(target: "highlight_store", "Notification receiver dropped");
    }
  }
}

type ChangeCallback = Box<dyn Fn(&Arc<Vec<Highlight>>) + Send + Sync>;

pub struct HighlightStore<A> {
  api: A,
  user_id: i64,
  passage_title: String,
  highlights: RwLock<Arc<Vec<Highlight>>>,
  selection: RwLock<SelectionState>,
  notifier: Option<Box<dyn Notifier>>,
  on_change: Option<ChangeCallback>,
}

impl<A: HighlightApi> HighlightStore<A> {
  pub fn new(api: A, user_id: i64, passage_title: impl Into<String>) -> Self {
    Self {
      api,
      user_id,
      passage_title: passage_title.into(),
      highlights: RwLock::new(Arc::new(Vec::new())),
      selection: RwLock::new(SelectionState::NoSelection),
      notifier: None,
      on_change: None,
    }
  }

  /// Seed with a list the view already has.
  pub fn with_highlights(self, highlights: Vec<Highlight>) -> Self {
    Self { highlights: RwLock::new(Arc::new(highlights)), ..self }
  }

  pub fn with_notifier(mut self, notifier: impl Notifier + 'static) -> Self {
    self.notifier = Some(Box::new(notifier));
    self
  }

  /// Called with the new snapshot after every successful change.
  pub fn on_change(mut self, f: impl Fn(&Arc<Vec<Highlight>>) + Send + Sync + 'static) -> Self {
    self.on_change = Some(Box::new(f));
    self
  }

  pub async fn snapshot(&self) -> Arc<Vec<Highlight>> {
    self.highlights.read().await.clone()
  }

  pub async fn selection_state(&self) -> SelectionState {
    self.selection.read().await.clone()
  }

  pub async fn on_selection(&self, resolved: Option<&ResolvedSelection>) {
    self.selection.write().await.on_selection(resolved);
  }

  pub async fn on_highlight_clicked(&self, highlight_id: i64) {
    self.selection.write().await.on_highlight_clicked(highlight_id);
  }

  pub async fn dismiss(&self) {
    self.selection.write().await.dismiss();
  }

  fn notify(&self, n: Notification) {
    if let Some(notifier) = &self.notifier {
      notifier.notify(n);
    }
  }

  /// Swap in a new list built from the current one, then fire the callback.
  async fn replace(&self, f: impl FnOnce(&[Highlight]) -> Vec<Highlight>) -> Arc<Vec<Highlight>> {
    let next = {
      let mut guard = self.highlights.write().await;
      let next = Arc::new(f(guard.as_slice()));
      *guard = next.clone();
      next
    };
    if let Some(cb) = &self.on_change {
      cb(&next);
    }
    next
  }

  /// Fetch the authoritative list, replacing whatever is held locally.
  #[instrument(level = "info", skip(self), fields(user_id = self.user_id, passage = %self.passage_title))]
  pub async fn load(&self) -> bool {
    match self.api.list(self.user_id, &self.passage_title).await {
      Ok(list) => {
        info!(target: "highlight_store", count = list.len(), "Highlights loaded");
        self.replace(move |_| list).await;
        true
      }
      Err(e) => {
        error!(target: "highlight_store", error = %e, "Failed to load highlights");
        self.notify(Notification::failure(LOAD_FAILED));
        false
      }
    }
  }

  /// Persist a new highlight and append the server's copy locally.
  /// Closes any open popup before the call goes out.
  #[instrument(level = "info", skip(self, selected_text), fields(user_id = self.user_id, passage = %self.passage_title))]
  pub async fn create(
    &self,
    selected_text: &str,
    start_position: usize,
    end_position: usize,
    highlight_type: HighlightType,
    highlight_color: &str,
  ) -> Option<Highlight> {
    self.selection.write().await.take_popup();

    let req = NewHighlight {
      user_id: self.user_id,
      passage_title: self.passage_title.clone(),
      highlighted_text: selected_text.to_string(),
      start_position,
      end_position,
      highlight_type,
      highlight_color: highlight_color.to_string(),
    };
    match self.api.create(&req).await {
      Ok(created) => {
        info!(target: "highlight_store", id = created.id, "Highlight created");
        let appended = created.clone();
        self.replace(move |cur| {
          let mut next = cur.to_vec();
          next.push(appended);
          next
        })
        .await;
        Some(created)
      }
      Err(e) => {
        error!(target: "highlight_store", error = %e, "Failed to create highlight");
        self.notify(Notification::failure(CREATE_FAILED));
        None
      }
    }
  }

  /// Create from the open popup. `color` defaults by highlight type.
  pub async fn create_from_popup(&self, color: Option<&str>) -> Option<Highlight> {
    let pending = self.selection.write().await.take_popup()?;
    let color = color.unwrap_or_else(|| pending.highlight_type.default_color());
    self
      .create(&pending.selected_text, pending.start_position, pending.end_position, pending.highlight_type, color)
      .await
  }

  /// Remove a highlight server-side, then locally by id. An id missing from the
  /// local list leaves it untouched.
  #[instrument(level = "info", skip(self), fields(user_id = self.user_id, passage = %self.passage_title))]
  pub async fn delete(&self, highlight_id: i64) -> bool {
    match self.api.delete(self.user_id, highlight_id).await {
      Ok(()) => {
        let next = self.replace(|cur| cur.iter().filter(|h| h.id != highlight_id).cloned().collect()).await;
        info!(target: "highlight_store", id = highlight_id, remaining = next.len(), "Highlight removed");
        {
          let mut sel = self.selection.write().await;
          if sel.pending_delete() == Some(highlight_id) {
            sel.dismiss();
          }
        }
        self.notify(Notification::info("Highlight Removed", "The highlight has been removed."));
        true
      }
      Err(e) => {
        error!(target: "highlight_store", id = highlight_id, error = %e, "Failed to delete highlight");
        self.notify(Notification::failure(DELETE_FAILED));
        false
      }
    }
  }

  /// Delete whatever highlight the user clicked, if any.
  pub async fn confirm_delete(&self) -> bool {
    let pending = self.selection.read().await.pending_delete();
    match pending {
      Some(id) => self.delete(id).await,
      None => false,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::ApiError;
  use crate::offsets::{Origin, ResolvedSelection};
  use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};

  #[derive(Default)]
  struct FakeApi {
    next_id: AtomicI64,
    fail: AtomicBool,
  }

  impl FakeApi {
    fn failing() -> Self {
      Self { fail: AtomicBool::new(true), ..Default::default() }
    }

    fn err(&self) -> Result<(), ApiError> {
      if self.fail.load(Ordering::SeqCst) {
        Err(ApiError::Status { status: 503, message: "unavailable".into() })
      } else {
        Ok(())
      }
    }
  }

  impl HighlightApi for FakeApi {
    async fn list(&self, _user_id: i64, passage_title: &str) -> Result<Vec<Highlight>, ApiError> {
      self.err()?;
      Ok(vec![hl(100, passage_title, 0, 4)])
    }

    async fn create(&self, req: &NewHighlight) -> Result<Highlight, ApiError> {
      self.err()?;
      Ok(Highlight {
        id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
        passage_title: req.passage_title.clone(),
        highlighted_text: req.highlighted_text.clone(),
        start_position: req.start_position,
        end_position: req.end_position,
        highlight_type: req.highlight_type,
        highlight_color: req.highlight_color.clone(),
      })
    }

    async fn delete(&self, _user_id: i64, _highlight_id: i64) -> Result<(), ApiError> {
      self.err()
    }
  }

  fn hl(id: i64, passage: &str, start: usize, end: usize) -> Highlight {
    Highlight {
      id,
      passage_title: passage.into(),
      highlighted_text: String::new(),
      start_position: start,
      end_position: end,
      highlight_type: HighlightType::Word,
      highlight_color: "yellow".into(),
    }
  }

  fn store_with_toasts(api: FakeApi) -> (HighlightStore<FakeApi>, mpsc::UnboundedReceiver<Notification>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (HighlightStore::new(api, 1, "Demo").with_notifier(tx), rx)
  }

  #[tokio::test]
  async fn create_appends_and_fires_callback() {
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = calls.clone();
    let store = HighlightStore::new(FakeApi::default(), 1, "Demo").on_change(move |list| {
      seen.store(list.len(), Ordering::SeqCst);
    });

    let before = store.snapshot().await;
    let created = store.create("two", 21, 24, HighlightType::Word, "yellow").await.expect("created");
    assert_eq!(created.id, 1);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(before.is_empty(), "old snapshot must not be mutated");
    assert_eq!(store.snapshot().await.as_slice(), &[created]);
  }

  #[tokio::test]
  async fn failed_create_leaves_state_and_toasts() {
    let (store, mut rx) = store_with_toasts(FakeApi::failing());
    assert!(store.create("two", 21, 24, HighlightType::Word, "yellow").await.is_none());
    assert!(store.snapshot().await.is_empty());
    let toast = rx.try_recv().expect("toast");
    assert_eq!(toast.description, CREATE_FAILED);
    assert_eq!(toast.variant, Variant::Destructive);
  }

  #[tokio::test]
  async fn deleting_unknown_id_is_a_quiet_no_op() {
    let (store, _rx) = store_with_toasts(FakeApi::default());
    let store = store.with_highlights(vec![hl(5, "Demo", 0, 3)]);
    assert!(store.delete(42).await);
    assert_eq!(store.snapshot().await.len(), 1);
  }

  #[tokio::test]
  async fn failed_delete_keeps_highlight() {
    let (store, mut rx) = store_with_toasts(FakeApi::failing());
    let store = store.with_highlights(vec![hl(5, "Demo", 0, 3)]);
    store.on_highlight_clicked(5).await;
    assert!(!store.confirm_delete().await);
    assert_eq!(store.snapshot().await.len(), 1);
    assert_eq!(store.selection_state().await.pending_delete(), Some(5));
    assert_eq!(rx.try_recv().expect("toast").description, DELETE_FAILED);
  }

  #[tokio::test]
  async fn confirm_delete_removes_clicked_highlight() {
    let (store, mut rx) = store_with_toasts(FakeApi::default());
    let store = store.with_highlights(vec![hl(5, "Demo", 0, 3), hl(6, "Demo", 4, 8)]);
    store.on_highlight_clicked(5).await;
    assert!(store.confirm_delete().await);
    let ids: Vec<_> = store.snapshot().await.iter().map(|h| h.id).collect();
    assert_eq!(ids, vec![6]);
    assert!(store.selection_state().await.is_idle());
    assert_eq!(rx.try_recv().expect("toast").title, "Highlight Removed");
  }

  #[tokio::test]
  async fn popup_create_uses_type_default_color_and_closes_popup() {
    let store = HighlightStore::new(FakeApi::default(), 1, "Demo");
    let resolved = ResolvedSelection {
      selected_text: "the quick brown fox jumps".into(),
      start_position: 0,
      end_position: 25,
      origin: Origin::Segment { start: 0 },
      anchor: None,
    };
    store.on_selection(Some(&resolved)).await;
    let created = store.create_from_popup(None).await.expect("created");
    assert_eq!(created.highlight_type, HighlightType::Sentence);
    assert_eq!(created.highlight_color, "lightblue");
    assert!(store.selection_state().await.is_idle());
    assert!(store.create_from_popup(None).await.is_none());
  }

  #[tokio::test]
  async fn concurrent_creates_are_both_kept() {
    let store = HighlightStore::new(FakeApi::default(), 1, "Demo");
    let (a, b) = tokio::join!(
      store.create("one", 5, 8, HighlightType::Word, "yellow"),
      store.create("two", 21, 24, HighlightType::Word, "green"),
    );
    assert!(a.is_some() && b.is_some());
    assert_eq!(store.snapshot().await.len(), 2);
  }

  #[tokio::test]
  async fn load_replaces_local_list() {
    let (store, mut rx) = store_with_toasts(FakeApi::default());
    let store = store.with_highlights(vec![hl(5, "Demo", 0, 3)]);
    assert!(store.load().await);
    let ids: Vec<_> = store.snapshot().await.iter().map(|h| h.id).collect();
    assert_eq!(ids, vec![100]);
    assert!(rx.try_recv().is_err());
  }
}
