//! Color lookup: stored color names → canonical colors → display classes.
//!
//! Legacy names are plain table rows; adding an alias is a data change.

use crate::domain::HighlightColor;

/// Every color name we accept, including legacy aliases.
const COLOR_NAMES: &[(&str, HighlightColor)] = &[
  ("yellow", HighlightColor::Yellow),
  ("blue", HighlightColor::Blue),
  ("green", HighlightColor::Green),
  ("lightblue", HighlightColor::Blue),
];

/// Color used for names missing from the table.
pub const FALLBACK_COLOR: HighlightColor = HighlightColor::Yellow;

/// Resolve a stored color name (case-insensitive, surrounding whitespace ignored).
pub fn resolve(name: &str) -> HighlightColor {
  let key = name.trim().to_ascii_lowercase();
  COLOR_NAMES
    .iter()
    .find(|(n, _)| *n == key)
    .map(|(_, c)| *c)
    .unwrap_or(FALLBACK_COLOR)
}

/// True if the name is a known color or alias.
pub fn is_known(name: &str) -> bool {
  let key = name.trim().to_ascii_lowercase();
  COLOR_NAMES.iter().any(|(n, _)| *n == key)
}

impl HighlightColor {
  /// CSS class applied to a highlighted run.
  pub fn class(&self) -> &'static str {
    match self {
      HighlightColor::Yellow => "bg-yellow-200 dark:bg-yellow-800",
      HighlightColor::Blue => "bg-blue-200 dark:bg-blue-800",
      HighlightColor::Green => "bg-green-200 dark:bg-green-800",
    }
  }
}
