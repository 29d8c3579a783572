//! Segment rendering: split a paragraph into plain and highlighted runs.
//!
//! Highlights are walked in start order behind a cursor. A highlight that the
//! cursor has already passed is skipped, and one that starts behind the cursor
//! only contributes its remainder. Colors are never merged, so the runs always
//! tile the paragraph exactly once.

use serde::Serialize;
use tracing::{instrument, trace};

use crate::domain::{Highlight, HighlightColor, Passage, Segment};
use crate::offsets::clamp_to_segment;
use crate::palette;
use crate::text::{escape_html, slice_units};

/// One styled run of a paragraph. `start`/`end` are segment-local.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Run {
  Plain {
    text: String,
    start: usize,
    end: usize,
  },
  Highlighted {
    #[serde(rename = "highlightId")]
    highlight_id: i64,
    color: HighlightColor,
    class: &'static str,
    text: String,
    start: usize,
    end: usize,
  },
}

impl Run {
  pub fn text(&self) -> &str {
    match self {
      Run::Plain { text, .. } | Run::Highlighted { text, .. } => text,
    }
  }

  pub fn len(&self) -> usize {
    match self {
      Run::Plain { start, end, .. } | Run::Highlighted { start, end, .. } => end - start,
    }
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  pub fn highlight_id(&self) -> Option<i64> {
    match self {
      Run::Highlighted { highlight_id, .. } => Some(*highlight_id),
      Run::Plain { .. } => None,
    }
  }
}

/// Render one paragraph whose first unit sits at `segment_start` in the passage.
#[instrument(level = "trace", skip(text, highlights), fields(candidates = highlights.len()))]
pub fn render_segment(text: &str, segment_start: usize, highlights: &[Highlight]) -> Vec<Run> {
  let units: Vec<u16> = text.encode_utf16().collect();
  let seg_len = units.len();
  let seg_end = segment_start + seg_len;

  let mut hits: Vec<&Highlight> = highlights
    .iter()
    .filter(|h| h.overlaps(segment_start, seg_end))
    .collect();
  // stable: equal starts keep list order
  hits.sort_by_key(|h| h.start_position);

  let plain = |start: usize, end: usize| Run::Plain { text: slice_units(&units, start, end), start, end };

  let mut runs = Vec::new();
  let mut last = 0;
  for h in hits {
    let Some((local_start, local_end)) = clamp_to_segment(h.start_position, h.end_position, segment_start, seg_end) else {
      continue;
    };
    if local_end <= last {
      trace!(target: "passage_render", id = h.id, "Highlight covered by an earlier run; skipped");
      continue;
    }
    let local_start = local_start.max(last);
    if local_start > last {
      runs.push(plain(last, local_start));
    }
    let color = palette::resolve(&h.highlight_color);
    runs.push(Run::Highlighted {
      highlight_id: h.id,
      color,
      class: color.class(),
      text: slice_units(&units, local_start, local_end),
      start: local_start,
      end: local_end,
    });
    last = local_end;
  }
  if last < seg_len {
    runs.push(plain(last, seg_len));
  }
  runs
}

/// A paragraph with its runs.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct RenderedSegment {
  pub index: usize,
  pub start: usize,
  pub runs: Vec<Run>,
}

pub fn render_passage(passage: &Passage, highlights: &[Highlight]) -> Vec<RenderedSegment> {
  passage
    .segments()
    .into_iter()
    .map(|Segment { index, start, text }| RenderedSegment {
      index,
      start,
      runs: render_segment(&text, start, highlights),
    })
    .collect()
}

/// `<p data-segment-start="N">` with each highlighted run in a `<mark>`.
pub fn runs_to_html(segment_start: usize, runs: &[Run]) -> String {
  let mut out = format!("<p data-segment-start=\"{}\">", segment_start);
  for run in runs {
    match run {
      Run::Plain { text, .. } => out.push_str(&escape_html(text)),
      Run::Highlighted { highlight_id, class, text, .. } => {
        out.push_str(&format!(
          "<mark class=\"{}\" data-highlight-id=\"{}\">{}</mark>",
          class,
          highlight_id,
          escape_html(text)
        ));
      }
    }
  }
  out.push_str("</p>");
  out
}

pub fn passage_to_html(segments: &[RenderedSegment]) -> String {
  segments
    .iter()
    .map(|s| runs_to_html(s.start, &s.runs))
    .collect::<Vec<_>>()
    .join("\n")
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::HighlightType;

  fn hl(id: i64, start: usize, end: usize, color: &str) -> Highlight {
    Highlight {
      id,
      passage_title: "Demo".into(),
      highlighted_text: String::new(),
      start_position: start,
      end_position: end,
      highlight_type: HighlightType::Word,
      highlight_color: color.into(),
    }
  }

  fn joined(runs: &[Run]) -> String {
    runs.iter().map(Run::text).collect()
  }

  #[test]
  fn no_highlights_yields_single_plain_run() {
    let runs = render_segment("abc", 5, &[]);
    assert_eq!(runs, vec![Run::Plain { text: "abc".into(), start: 0, end: 3 }]);
  }

  #[test]
  fn nested_highlight_is_advanced_past() {
    let hs = vec![hl(1, 0, 10, "yellow"), hl(2, 3, 6, "green")];
    let runs = render_segment("0123456789", 0, &hs);
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].highlight_id(), Some(1));
    assert_eq!(runs[0].len(), 10);
  }

  #[test]
  fn partial_overlap_only_renders_the_remainder() {
    let hs = vec![hl(2, 4, 8, "green"), hl(1, 0, 6, "yellow")];
    let runs = render_segment("0123456789", 0, &hs);
    let ids: Vec<_> = runs.iter().map(Run::highlight_id).collect();
    assert_eq!(ids, vec![Some(1), Some(2), None]);
    assert_eq!(runs[1].text(), "67");
    assert_eq!(joined(&runs), "0123456789");
  }

  #[test]
  fn highlights_are_clamped_to_paragraph() {
    // paragraph occupies [16, 30)
    let hs = vec![hl(1, 10, 20, "blue"), hl(2, 28, 40, "yellow"), hl(3, 0, 5, "yellow")];
    let runs = render_segment("Para two text.", 16, &hs);
    assert_eq!(runs[0].text(), "Para");
    assert_eq!(runs[0].highlight_id(), Some(1));
    assert_eq!(runs[1].text(), " two tex");
    assert_eq!(runs[2].text(), "t.");
    assert_eq!(runs[2].highlight_id(), Some(2));
    assert_eq!(runs.len(), 3);
  }

  #[test]
  fn legacy_color_gets_blue_class() {
    let runs = render_segment("abc", 0, &[hl(1, 0, 3, "lightblue")]);
    match &runs[0] {
      Run::Highlighted { color, class, .. } => {
        assert_eq!(*color, HighlightColor::Blue);
        assert_eq!(*class, HighlightColor::Blue.class());
      }
      other => panic!("unexpected run {other:?}"),
    }
  }

  #[test]
  fn runs_always_tile_the_paragraph() {
    let text = "Reading passages are split into paragraphs.";
    let n = text.len();
    let seg_start = 7;
    // small LCG so the case set is deterministic
    let mut seed: u64 = 0x2545F4914F6CDD1D;
    let mut next = |m: usize| {
      seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
      ((seed >> 33) as usize) % m
    };
    for _ in 0..300 {
      let count = next(6);
      let hs: Vec<Highlight> = (0..count)
        .map(|i| {
          let a = next(n + 20);
          let b = next(n + 20);
          hl(i as i64, a, b, "yellow")
        })
        .collect();
      let runs = render_segment(text, seg_start, &hs);
      assert_eq!(runs.iter().map(Run::len).sum::<usize>(), n);
      assert_eq!(joined(&runs), text);
      assert!(runs.iter().all(|r| !r.is_empty()));
    }
  }

  #[test]
  fn passage_rendering_splits_second_paragraph_into_three_runs() {
    let passage = Passage::new("Demo", "Para one text.\n\nPara two text.");
    let segs = render_passage(&passage, &[hl(9, 21, 24, "yellow")]);
    assert_eq!(segs[0].runs.len(), 1);
    let texts: Vec<_> = segs[1].runs.iter().map(Run::text).collect();
    assert_eq!(texts, vec!["Para ", "two", " text."]);
    assert_eq!(segs[1].runs[1].highlight_id(), Some(9));
  }

  #[test]
  fn html_marks_carry_ids_and_segment_origin() {
    let runs = render_segment("a <b> c", 16, &[hl(4, 18, 21, "green")]);
    assert_eq!(
      runs_to_html(16, &runs),
      "<p data-segment-start=\"16\">a <mark class=\"bg-green-200 dark:bg-green-800\" data-highlight-id=\"4\">&lt;b&gt;</mark> c</p>"
    );
  }
}
