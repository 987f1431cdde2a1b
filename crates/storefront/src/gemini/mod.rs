//! Gemini (Generative Language API) integration.
//!
//! Used by the chat assistant, the comparison tool and the service detail
//! enrichment features.

mod client;
mod error;
pub mod types;

pub use client::GeminiClient;
pub use error::GeminiError;
