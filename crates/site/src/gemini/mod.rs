//! Gemini API integration for the topic-suggestion flow.
//!
//! One operation is used: `generateContent` with a JSON response schema,
//! so the model's output arrives as a machine-checkable `{"topics": [...]}`
//! document rather than prose.

mod client;
mod error;
mod types;

pub use client::GeminiClient;
pub use error::GeminiError;
