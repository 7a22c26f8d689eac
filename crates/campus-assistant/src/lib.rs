//! Campus chat assistant.
//!
//! Wraps a hosted generative-AI text API behind the [`TextGenerator`]
//! trait. The [`Assistant`] never surfaces a raw error to the user: any
//! failure (missing key, network, quota, malformed response) becomes the
//! configured apology text.
//!
//! # Modules
//!
//! - [`config`] — [`AssistantConfig`]: model, temperature, system instruction
//! - [`generator`] — [`TextGenerator`] trait and [`ChatRequest`]
//! - [`gemini`] — [`GeminiClient`], the HTTP backend
//! - [`assistant`] — [`Assistant`] and its [`Reply`]

pub mod assistant;
pub mod config;
pub mod error;
pub mod gemini;
pub mod generator;

pub use assistant::{Assistant, Reply};
pub use config::AssistantConfig;
pub use error::{AssistantError, Result};
pub use gemini::GeminiClient;
pub use generator::{ChatRequest, TextGenerator};
