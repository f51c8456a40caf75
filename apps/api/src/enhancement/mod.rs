// Resume Enhancement Pipeline
// Implements: style templates, per-section prompts, model-output sanitization,
// concurrent section fan-out. All model calls go through providers; no direct
// API calls here.

pub mod enhancer;
pub mod prompts;
pub mod sanitize;
pub mod styles;

pub use enhancer::{enhance_document, PipelineError};
