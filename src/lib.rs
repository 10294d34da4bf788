//! ScholarSelect
//!
//! A chat-style college counselor. Students describe themselves in a chat
//! form and a local Ollama model suggests colleges from a ranked dataset; a
//! JSON endpoint turns structured preferences into stream, career and
//! institution recommendations.
//!
//! # Architecture
//!
//! - **Server**: Axum HTTP server rendering the chat page and the JSON API
//! - **Model runner**: `ollama run` subprocesses behind the [`ollama::ModelRunner`] trait
//! - **UI**: maud-rendered HTML; browser behavior lives in the `scholar-select-web` WASM crate
//!
//! # Modules
//!
//! - [`config`]: CLI and layered configuration
//! - [`colleges`]: College dataset used as prompt context
//! - [`recommend`]: Prompts, output parsing and the recommendation service
//! - [`server`]: Router, handlers and startup
//! - [`ui`]: Chat page rendering

pub mod colleges;
pub mod config;
pub mod error;
pub mod ollama;
pub mod recommend;
pub mod server;
pub mod ui;

use crate::config::AppConfig;
use crate::recommend::Recommender;

use std::sync::Arc;

/// Application state shared across all handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Global Configuration
    pub config: Arc<AppConfig>,
    /// Model-backed recommendation service.
    pub recommender: Arc<Recommender>,
}
