//! Word vs sentence classification of a selection.

use crate::domain::HighlightType;

/// Selections with at most this many space-separated tokens count as words.
pub const MAX_WORD_TOKENS: usize = 3;

/// `word` if the text has no space or splits on single spaces into at most
/// [`MAX_WORD_TOKENS`] pieces; `sentence` otherwise. Short sentences land in
/// `word`; that is the expected outcome.
///
/// Splitting is on the literal `' '` character, so consecutive spaces yield
/// empty tokens that still count.
pub fn classify(text: &str) -> HighlightType {
  let is_word = !text.contains(' ') || text.split(' ').count() <= MAX_WORD_TOKENS;
  if is_word {
    HighlightType::Word
  } else {
    HighlightType::Sentence
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn boundary_cases() {
    assert_eq!(classify("cat"), HighlightType::Word);
    assert_eq!(classify("the quick brown"), HighlightType::Word);
    assert_eq!(classify("the quick brown fox"), HighlightType::Sentence);
    assert_eq!(classify("the quick brown fox jumps"), HighlightType::Sentence);
  }

  #[test]
  fn empty_tokens_from_double_spaces_count() {
    // "a", "", "b", "c"
    assert_eq!(classify("a  b c"), HighlightType::Sentence);
  }

  #[test]
  fn newlines_are_not_separators() {
    assert_eq!(classify("one\ntwo\nthree\nfour"), HighlightType::Word);
  }
}
