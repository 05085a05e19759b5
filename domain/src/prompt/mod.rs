//! Prompt domain
//!
//! Pure templating: `(request) -> prompt string`, plus the sampling
//! parameters that go with each prompt.

mod template;

pub use template::{GenerationParams, PromptTemplate};
