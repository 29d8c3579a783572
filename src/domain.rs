//! Domain models: highlights, their type/color, and passages split into segments.

use serde::{Deserialize, Serialize};

use crate::text::utf16_len;

/// Separator between paragraphs of a passage.
pub const PASSAGE_SEPARATOR: &str = "\n\n";

/// Word vs sentence, assigned once at creation time and never re-validated.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum HighlightType {
  Word,
  Sentence,
}

impl HighlightType {
  /// Color used when the popup creates a highlight without an explicit choice.
  /// Sentences still carry the legacy `lightblue` name.
  pub fn default_color(&self) -> &'static str {
    match self {
      HighlightType::Word => "yellow",
      HighlightType::Sentence => "lightblue",
    }
  }
}

/// Canonical display colors. Stored highlights keep whatever color name they
/// were created with; see `palette` for how names map onto these.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum HighlightColor {
  Yellow,
  Blue,
  Green,
}

/// A persisted annotation over a passage. `[start_position, end_position)` in
/// UTF-16 units of the full passage text.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Highlight {
  pub id: i64,
  #[serde(default)]
  pub passage_title: String,
  pub highlighted_text: String,
  pub start_position: usize,
  pub end_position: usize,
  pub highlight_type: HighlightType,
  pub highlight_color: String,
}

impl Highlight {
  /// Whether `[start, end)` of this highlight intersects `[seg_start, seg_end)`.
  pub fn overlaps(&self, seg_start: usize, seg_end: usize) -> bool {
    self.end_position > seg_start && self.start_position < seg_end
  }
}

/// Body of a create request (camelCase on the wire).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewHighlight {
  pub user_id: i64,
  pub passage_title: String,
  pub highlighted_text: String,
  pub start_position: usize,
  pub end_position: usize,
  pub highlight_type: HighlightType,
  pub highlight_color: String,
}

/// One paragraph plus its global offset origin within the passage.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
  pub index: usize,
  pub start: usize,
  pub text: String,
}

impl Segment {
  pub fn end(&self) -> usize {
    self.start + utf16_len(&self.text)
  }
}

/// A reading passage: paragraphs joined by [`PASSAGE_SEPARATOR`].
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Passage {
  pub title: String,
  pub text: String,
}

impl Passage {
  pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
    Self { title: title.into(), text: text.into() }
  }

  pub fn from_paragraphs(title: impl Into<String>, paragraphs: &[String]) -> Self {
    Self::new(title, paragraphs.join(PASSAGE_SEPARATOR))
  }

  pub fn len(&self) -> usize {
    utf16_len(&self.text)
  }

  pub fn is_empty(&self) -> bool {
    self.text.is_empty()
  }

  /// Split into segments, each tagged with the offset of its first unit.
  pub fn segments(&self) -> Vec<Segment> {
    self.segments_with(PASSAGE_SEPARATOR)
  }

  pub fn segments_with(&self, separator: &str) -> Vec<Segment> {
    let sep_len = utf16_len(separator);
    let mut start = 0;
    self.text
      .split(separator)
      .enumerate()
      .map(|(index, para)| {
        let seg = Segment { index, start, text: para.to_string() };
        start += utf16_len(para) + sep_len;
        seg
      })
      .collect()
  }
}
