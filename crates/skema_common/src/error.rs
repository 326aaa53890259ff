//! Error types for Skema.

use thiserror::Error;

use crate::gemini::GeminiError;

#[derive(Error, Debug)]
pub enum SkemaError {
    #[error("Requirements text is empty. Describe the application before generating.")]
    EmptyRequirements,

    #[error("Generation failed: {0}")]
    Generation(#[from] GeminiError),
}
