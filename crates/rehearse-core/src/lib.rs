//! Core types and logic for the Rehearse interview practice service.
//!
//! This crate is deliberately free of HTTP and database dependencies. Storage
//! and the AI collaborators are reached through the traits in [`store`] and
//! [`ai`].

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod ai;
pub mod analytics;
pub mod error;
pub mod interview;
pub mod lifecycle;
pub mod scoring;
pub mod store;
pub mod user;

pub use error::{Error, Result};
