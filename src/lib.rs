//! Passage highlighting for reading practice.
//!
//! - `offsets`  : selection → global passage offsets
//! - `classify` : word vs sentence
//! - `render`   : paragraph → plain/highlighted runs
//! - `store`    : view-side highlight list synced through `client::HighlightApi`
//! - `routes`   : axum service exposing the highlight API

pub mod classify;
pub mod client;
pub mod config;
pub mod domain;
pub mod error;
pub mod logic;
pub mod offsets;
pub mod openai;
pub mod palette;
pub mod protocol;
pub mod render;
pub mod routes;
pub mod seeds;
pub mod state;
pub mod store;
pub mod telemetry;
pub mod text;
pub mod ui;

pub use client::{HighlightApi, HttpHighlightApi};
pub use domain::{Highlight, HighlightColor, HighlightType, NewHighlight, Passage, Segment};
pub use offsets::{resolve, RenderedPassage, ResolvedSelection, SelectionRange};
pub use render::{render_passage, render_segment, Run};
pub use store::{HighlightStore, Notification, Notifier};
pub use ui::SelectionState;
