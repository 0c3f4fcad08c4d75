//! Vision-capable language model clients.

mod openai;

pub use openai::{DEFAULT_OPENAI_API_BASE, DEFAULT_OPENAI_MODEL, OpenAiVisionModel};
