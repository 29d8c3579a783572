//! Small text helpers used across modules.
//!
//! Passage offsets are UTF-16 code units so they line up with what a browser
//! reports for `String.length`. Everything that measures or slices passage
//! text goes through here.

/// Length of `s` in UTF-16 code units.
pub fn utf16_len(s: &str) -> usize {
  s.encode_utf16().count()
}

/// Slice `s` by UTF-16 code unit offsets, clamping both ends to the string.
/// A cut through a surrogate pair decodes lossily instead of panicking.
pub fn slice_utf16(s: &str, start: usize, end: usize) -> String {
  let units: Vec<u16> = s.encode_utf16().collect();
  slice_units(&units, start, end)
}

/// Same as [`slice_utf16`] over pre-encoded units (avoids re-encoding in loops).
pub fn slice_units(units: &[u16], start: usize, end: usize) -> String {
  let end = end.min(units.len());
  let start = start.min(end);
  String::from_utf16_lossy(&units[start..end])
}

/// Very small and safe string templating.
/// Replaces occurrences of `{key}` in the template with provided values.
pub fn fill_template(tpl: &str, pairs: &[(&str, &str)]) -> String {
  let mut out = tpl.to_string();
  for (k, v) in pairs {
    let needle = format!("{{{}}}", k);
    out = out.replace(&needle, v);
  }
  out
}

/// Log-safe truncation for large strings (char aware).
pub fn trunc_for_log(s: &str, max: usize) -> String {
  let count = s.chars().count();
  if count <= max {
    s.to_string()
  } else {
    format!("{}… ({} chars total)", s.chars().take(max).collect::<String>(), count)
  }
}

/// Minimal HTML escaping for text nodes and attribute values.
pub fn escape_html(s: &str) -> String {
  let mut out = String::with_capacity(s.len());
  for ch in s.chars() {
    match ch {
      '&' => out.push_str("&amp;"),
      '<' => out.push_str("&lt;"),
      '>' => out.push_str("&gt;"),
      '"' => out.push_str("&quot;"),
      '\'' => out.push_str("&#39;"),
      _ => out.push(ch),
    }
  }
  out
}
