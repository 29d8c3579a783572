//! Configuration: optional TOML file (prompts + extra passages) and env-driven
//! settings for the server and the client adapter.
//!
//! Env variables:
//!   HIGHLIGHTER_CONFIG_PATH : TOML file, see `HighlighterConfig`
//!   PORT                    : server port (default 3000)
//!   IELTS_API_BASE_URL      : origin the client adapter talks to

use serde::Deserialize;
use tracing::{error, info};

use crate::domain::Passage;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:3000";

#[derive(Clone, Debug, Deserialize, Default)]
pub struct HighlighterConfig {
  #[serde(default)]
  pub prompts: Prompts,
  #[serde(default)]
  pub passages: Vec<PassageCfg>,
}

/// Passage entry accepted in TOML. Paragraphs are joined with the passage separator.
#[derive(Clone, Debug, Deserialize)]
pub struct PassageCfg {
  pub title: String,
  pub paragraphs: Vec<String>,
}

impl PassageCfg {
  pub fn to_passage(&self) -> Passage {
    Passage::from_paragraphs(self.title.clone(), &self.paragraphs)
  }
}

/// Prompts used when translating a selection through OpenAI.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Prompts {
  pub translate_system: String,
  pub translate_user_template: String,
}

impl Default for Prompts {
  fn default() -> Self {
    Self {
      translate_system: "You translate short excerpts from English reading passages for IELTS learners. Output ONLY the translation text.".into(),
      translate_user_template: "Translate into {target_language}:\n{text}".into(),
    }
  }
}

pub fn parse_config(raw: &str) -> Result<HighlighterConfig, toml::de::Error> {
  toml::from_str::<HighlighterConfig>(raw)
}

/// Attempt to load `HighlighterConfig` from HIGHLIGHTER_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_config_from_env() -> Option<HighlighterConfig> {
  let path = std::env::var("HIGHLIGHTER_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match parse_config(&s) {
      Ok(cfg) => {
        info!(target: "highlighter", %path, passages = cfg.passages.len(), "Loaded config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "highlighter", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "highlighter", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}

pub fn port_from_env() -> u16 {
  std::env::var("PORT")
    .ok()
    .and_then(|p| p.parse::<u16>().ok())
    .unwrap_or(DEFAULT_PORT)
}

/// Where the client adapter sends highlight requests.
#[derive(Clone, Debug)]
pub struct ClientConfig {
  pub base_url: String,
}

impl ClientConfig {
  pub fn new(base_url: impl Into<String>) -> Self {
    Self { base_url: base_url.into().trim_end_matches('/').to_string() }
  }

  pub fn from_env() -> Self {
    Self::new(std::env::var("IELTS_API_BASE_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.into()))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_prompts_and_passages() {
    let raw = r#"
      [prompts]
      translate_system = "Translate tersely."

      [[passages]]
      title = "Bees"
      paragraphs = ["Bees pollinate crops.", "Colonies are declining."]
    "#;
    let cfg = parse_config(raw).expect("parse");
    assert_eq!(cfg.prompts.translate_system, "Translate tersely.");
    assert_eq!(cfg.prompts.translate_user_template, Prompts::default().translate_user_template);
    let p = cfg.passages[0].to_passage();
    assert_eq!(p.text, "Bees pollinate crops.\n\nColonies are declining.");
  }

  #[test]
  fn empty_config_uses_defaults() {
    let cfg = parse_config("").expect("parse");
    assert!(cfg.passages.is_empty());
    assert!(!cfg.prompts.translate_system.is_empty());
  }

  #[test]
  fn client_base_url_drops_trailing_slash() {
    assert_eq!(ClientConfig::new("http://localhost:4000/").base_url, "http://localhost:4000");
  }
}
