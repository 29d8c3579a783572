//! Selection → passage offsets.
//!
//! The arithmetic here is pure. Whatever reads a live selection (a browser
//! range, a terminal cursor, a test fixture) implements [`SelectionRange`] and
//! hands it to [`resolve`]. [`RenderedPassage`] is the in-memory rendition of
//! the rendered passage used by the service and by tests.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::domain::{Passage, Segment};
use crate::text::{slice_units, utf16_len};

/// Screen rectangle in CSS pixels.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Rect {
  pub left: f64,
  pub top: f64,
  pub width: f64,
  pub height: f64,
}

/// Where the selection popup should be drawn, relative to the content container.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct PopupAnchor {
  pub x: f64,
  pub y: f64,
}

/// Horizontal midpoint of the selection, 10px above it.
pub fn popup_anchor(selection: Rect, container: Rect) -> PopupAnchor {
  PopupAnchor {
    x: selection.left - container.left + selection.width / 2.0,
    y: selection.top - container.top - 10.0,
  }
}

/// What a text-selection API must expose for offset resolution.
pub trait SelectionRange {
  fn is_collapsed(&self) -> bool;

  /// Rendered text of the selection, untrimmed.
  fn text(&self) -> String;

  /// For the nearest ancestor of the selection's start carrying a
  /// `data-segment-start` marker: that marker value, and the rendered text
  /// from the start of the marked container up to the selection start.
  fn marked_prefix(&self) -> Option<(usize, String)>;

  /// Rendered text from the start of the whole content block up to the
  /// selection start.
  fn content_prefix(&self) -> String;

  /// Bounding box of the selection and of the content container, if known.
  fn bounds(&self) -> Option<(Rect, Rect)> {
    None
  }
}

/// Which coordinate origin the start offset was measured from.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Origin {
  Segment { start: usize },
  /// No marked ancestor; offsets are relative to the whole content block and
  /// may be shifted by decoration text such as paragraph labels.
  Content,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedSelection {
  pub selected_text: String,
  pub start_position: usize,
  pub end_position: usize,
  pub origin: Origin,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub anchor: Option<PopupAnchor>,
}

/// `segment_start + local`.
pub fn global_offset(segment_start: usize, local: usize) -> usize {
  segment_start + local
}

/// Global `[start, end)` from an origin, the rendered prefix before the
/// selection, and the trimmed selected text.
pub fn span_from_prefix(origin: usize, prefix: &str, selected_text: &str) -> (usize, usize) {
  let start = global_offset(origin, utf16_len(prefix));
  (start, start + utf16_len(selected_text))
}

/// Intersection of `[start, end)` with `[seg_start, seg_end)`, in
/// segment-local coordinates. `None` when they do not overlap.
pub fn clamp_to_segment(start: usize, end: usize, seg_start: usize, seg_end: usize) -> Option<(usize, usize)> {
  let lo = start.max(seg_start);
  let hi = end.min(seg_end);
  if lo < hi {
    Some((lo - seg_start, hi - seg_start))
  } else {
    None
  }
}

/// Resolve a live selection to global offsets. Collapsed or whitespace-only
/// selections resolve to `None`.
#[instrument(level = "debug", skip(range))]
pub fn resolve<R: SelectionRange + ?Sized>(range: &R) -> Option<ResolvedSelection> {
  if range.is_collapsed() {
    return None;
  }
  let raw = range.text();
  let selected_text = raw.trim();
  if selected_text.is_empty() {
    return None;
  }

  let (origin, (start_position, end_position)) = match range.marked_prefix() {
    Some((segment_start, prefix)) => (
      Origin::Segment { start: segment_start },
      span_from_prefix(segment_start, &prefix, selected_text),
    ),
    None => {
      let prefix = range.content_prefix();
      debug!(target: "highlighter", prefix_len = utf16_len(&prefix), "No segment marker; using content origin");
      (Origin::Content, span_from_prefix(0, &prefix, selected_text))
    }
  };

  let anchor = range.bounds().map(|(sel, container)| popup_anchor(sel, container));

  Some(ResolvedSelection {
    selected_text: selected_text.to_string(),
    start_position,
    end_position,
    origin,
    anchor,
  })
}

/// A passage as it appears on screen: each paragraph in a marked block,
/// optionally preceded by an unmarked label such as `"A. "`.
#[derive(Clone, Debug)]
pub struct RenderedPassage {
  blocks: Vec<Block>,
  content: Vec<u16>,
}

#[derive(Clone, Debug)]
struct Block {
  segment: Segment,
  label_len: usize,
  // content offset of the block's first unit (label included)
  content_start: usize,
  text_len: usize,
}

impl RenderedPassage {
  pub fn new(passage: &Passage) -> Self {
    Self::with_labels(passage, &[])
  }

  /// Labels are paired with paragraphs by index; missing labels are empty.
  pub fn with_labels(passage: &Passage, labels: &[String]) -> Self {
    let mut blocks = Vec::new();
    let mut content: Vec<u16> = Vec::new();
    for segment in passage.segments() {
      let label = labels.get(segment.index).map(String::as_str).unwrap_or("");
      let content_start = content.len();
      content.extend(label.encode_utf16());
      content.extend(segment.text.encode_utf16());
      blocks.push(Block {
        label_len: utf16_len(label),
        text_len: utf16_len(&segment.text),
        content_start,
        segment,
      });
    }
    Self { blocks, content }
  }

  /// Rendered text of the whole content block (labels included, no separators).
  pub fn content_text(&self) -> String {
    String::from_utf16_lossy(&self.content)
  }

  pub fn segments(&self) -> impl Iterator<Item = &Segment> {
    self.blocks.iter().map(|b| &b.segment)
  }

  /// Select `[start, end)` in rendered-content coordinates.
  pub fn select(&self, start: usize, end: usize) -> RenderedSelection<'_> {
    let end = end.min(self.content.len());
    RenderedSelection { passage: self, start: start.min(end), end, bounds: None }
  }

  /// Select `[local_start, local_end)` within paragraph `index`.
  /// `None` unless `local_start <= local_end <= ` the paragraph's length.
  pub fn select_in_segment(&self, index: usize, local_start: usize, local_end: usize) -> Option<RenderedSelection<'_>> {
    let block = self.blocks.get(index)?;
    if local_start > local_end || local_end > block.text_len {
      return None;
    }
    let text_begin = block.content_start + block.label_len;
    Some(self.select(text_begin + local_start, text_begin + local_end))
  }

  fn block_at(&self, pos: usize) -> Option<&Block> {
    let last = self.blocks.len().checked_sub(1)?;
    self.blocks.iter().enumerate().find_map(|(i, b)| {
      let text_begin = b.content_start + b.label_len;
      let text_end = text_begin + b.text_len;
      let inside = pos >= text_begin && (pos < text_end || (i == last && pos == text_end));
      inside.then_some(b)
    })
  }
}

/// A selection over a [`RenderedPassage`].
#[derive(Clone, Debug)]
pub struct RenderedSelection<'a> {
  passage: &'a RenderedPassage,
  start: usize,
  end: usize,
  bounds: Option<(Rect, Rect)>,
}

impl<'a> RenderedSelection<'a> {
  pub fn with_bounds(mut self, selection: Rect, container: Rect) -> Self {
    self.bounds = Some((selection, container));
    self
  }
}

impl SelectionRange for RenderedSelection<'_> {
  fn is_collapsed(&self) -> bool {
    self.start == self.end
  }

  fn text(&self) -> String {
    slice_units(&self.passage.content, self.start, self.end)
  }

  fn marked_prefix(&self) -> Option<(usize, String)> {
    let block = self.passage.block_at(self.start)?;
    let text_begin = block.content_start + block.label_len;
    Some((block.segment.start, slice_units(&self.passage.content, text_begin, self.start)))
  }

  fn content_prefix(&self) -> String {
    slice_units(&self.passage.content, 0, self.start)
  }

  fn bounds(&self) -> Option<(Rect, Rect)> {
    self.bounds
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn two_paragraphs() -> Passage {
    Passage::new("Demo", "Para one text.\n\nPara two text.")
  }

  #[test]
  fn local_offset_shifts_by_segment_start() {
    assert_eq!(span_from_prefix(42, "The ", "quick"), (46, 51));
  }

  #[test]
  fn selecting_inside_second_paragraph() {
    let rendered = RenderedPassage::new(&two_paragraphs());
    let sel = rendered.select_in_segment(1, 5, 8).expect("segment");
    let resolved = resolve(&sel).expect("resolved");
    assert_eq!(resolved.selected_text, "two");
    assert_eq!((resolved.start_position, resolved.end_position), (21, 24));
    assert_eq!(resolved.origin, Origin::Segment { start: 16 });
  }

  #[test]
  fn collapsed_and_blank_selections_resolve_to_nothing() {
    let rendered = RenderedPassage::new(&two_paragraphs());
    assert!(resolve(&rendered.select(3, 3)).is_none());
    // the space between "Para" and "one"
    assert!(resolve(&rendered.select(4, 5)).is_none());
  }

  #[test]
  fn end_offset_uses_trimmed_length() {
    let rendered = RenderedPassage::new(&two_paragraphs());
    // "one " -> trimmed "one"
    let resolved = resolve(&rendered.select(5, 9)).expect("resolved");
    assert_eq!(resolved.selected_text, "one");
    assert_eq!((resolved.start_position, resolved.end_position), (5, 8));
  }

  #[test]
  fn selection_starting_in_label_falls_back_to_content_origin() {
    let labels = vec!["A. ".to_string(), "B. ".to_string()];
    let rendered = RenderedPassage::with_labels(&two_paragraphs(), &labels);
    assert_eq!(rendered.content_text(), "A. Para one text.B. Para two text.");
    // starts on the "B" label, runs into "Para"
    let resolved = resolve(&rendered.select(17, 24)).expect("resolved");
    assert_eq!(resolved.origin, Origin::Content);
    assert_eq!(resolved.selected_text, "B. Para");
    assert_eq!((resolved.start_position, resolved.end_position), (17, 24));
  }

  #[test]
  fn labels_do_not_shift_marked_offsets() {
    let labels = vec!["A. ".to_string(), "B. ".to_string()];
    let rendered = RenderedPassage::with_labels(&two_paragraphs(), &labels);
    let sel = rendered.select_in_segment(1, 5, 8).expect("segment");
    let resolved = resolve(&sel).expect("resolved");
    assert_eq!((resolved.start_position, resolved.end_position), (21, 24));
  }

  #[test]
  fn segment_selection_stays_inside_its_paragraph() {
    let rendered = RenderedPassage::new(&two_paragraphs());
    // "Para one text." is 14 units; 20..22 would land in paragraph two
    assert!(rendered.select_in_segment(0, 20, 22).is_none());
    assert!(rendered.select_in_segment(0, 10, 15).is_none());
    assert!(rendered.select_in_segment(0, 8, 5).is_none());
    assert!(rendered.select_in_segment(1, usize::MAX, usize::MAX).is_none());
    assert!(rendered.select_in_segment(0, 14, 14).is_some());
  }

  #[test]
  fn cross_paragraph_selection_keeps_start_origin() {
    let rendered = RenderedPassage::new(&two_paragraphs());
    // "text." from paragraph one through "Para" of paragraph two
    let resolved = resolve(&rendered.select(9, 18)).expect("resolved");
    assert_eq!(resolved.origin, Origin::Segment { start: 0 });
    assert_eq!(resolved.selected_text, "text.Para");
    assert_eq!((resolved.start_position, resolved.end_position), (9, 18));
  }

  #[test]
  fn anchor_is_midpoint_above_selection() {
    let rendered = RenderedPassage::new(&two_paragraphs());
    let sel = rendered.select(0, 4).with_bounds(
      Rect { left: 110.0, top: 60.0, width: 40.0, height: 16.0 },
      Rect { left: 100.0, top: 20.0, width: 600.0, height: 400.0 },
    );
    let resolved = resolve(&sel).expect("resolved");
    assert_eq!(resolved.anchor, Some(PopupAnchor { x: 30.0, y: 30.0 }));
  }

  #[test]
  fn clamps_spans_to_segment() {
    assert_eq!(clamp_to_segment(10, 20, 16, 30), Some((0, 4)));
    assert_eq!(clamp_to_segment(18, 40, 16, 30), Some((2, 14)));
    assert_eq!(clamp_to_segment(0, 14, 16, 30), None);
  }
}
