//! Gemini-backed Question Provider and Answer Evaluator.
//!
//! [`GeminiClient`] is constructed explicitly from a [`GeminiConfig`] and
//! handed to the lifecycle service; there is no process-wide session.

mod client;
mod config;
mod prompt;

pub mod error;

pub use client::GeminiClient;
pub use config::{GeminiConfig, SafetyThreshold};
pub use error::{Error, Result};
