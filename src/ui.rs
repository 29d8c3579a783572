//! Selection/popup state owned by the view that hosts a passage.
//!
//! Transitions are plain methods on a serializable value, so a frontend can
//! persist or inspect it without any framework state.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::classify::classify;
use crate::domain::HighlightType;
use crate::offsets::{PopupAnchor, ResolvedSelection};

/// A selection waiting for the user to pick an action in the popup.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PendingSelection {
  pub selected_text: String,
  pub start_position: usize,
  pub end_position: usize,
  pub highlight_type: HighlightType,
}

impl From<&ResolvedSelection> for PendingSelection {
  fn from(r: &ResolvedSelection) -> Self {
    Self {
      selected_text: r.selected_text.clone(),
      start_position: r.start_position,
      end_position: r.end_position,
      highlight_type: classify(&r.selected_text),
    }
  }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SelectionState {
  #[default]
  NoSelection,
  PendingPopup {
    selection: PendingSelection,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    anchor: Option<PopupAnchor>,
  },
  PendingDelete {
    #[serde(rename = "highlightId")]
    highlight_id: i64,
  },
}

impl SelectionState {
  /// Mouse-up / touch-end. An unresolvable selection leaves the state alone.
  pub fn on_selection(&mut self, resolved: Option<&ResolvedSelection>) {
    if let Some(r) = resolved {
      debug!(target: "highlighter", start = r.start_position, end = r.end_position, "Popup opened");
      *self = SelectionState::PendingPopup { selection: PendingSelection::from(r), anchor: r.anchor };
    }
  }

  /// Click on an existing highlighted run.
  pub fn on_highlight_clicked(&mut self, highlight_id: i64) {
    *self = SelectionState::PendingDelete { highlight_id };
  }

  pub fn dismiss(&mut self) {
    *self = SelectionState::NoSelection;
  }

  /// Take the pending popup selection, closing the popup.
  pub fn take_popup(&mut self) -> Option<PendingSelection> {
    match std::mem::take(self) {
      SelectionState::PendingPopup { selection, .. } => Some(selection),
      other => {
        *self = other;
        None
      }
    }
  }

  pub fn pending_delete(&self) -> Option<i64> {
    match self {
      SelectionState::PendingDelete { highlight_id } => Some(*highlight_id),
      _ => None,
    }
  }

  pub fn is_idle(&self) -> bool {
    matches!(self, SelectionState::NoSelection)
  }
}
