//! Skema Common - shared model and plumbing for the Skema schema designer.
//!
//! A requirements text goes in, a generated NoSQL schema with its
//! justification comes out. Everything here is the machinery around that
//! single external model call: the wire data model, the canonical
//! normalizer and variant grouper behind the robustness test, requirement
//! highlighting, the generation client, configuration, and the
//! per-feature state machines.

pub mod config;
pub mod error;
pub mod gemini;
pub mod highlight;
pub mod normalize;
pub mod prompts;
pub mod robustness;
pub mod schema;
pub mod state;

pub use error::SkemaError;
pub use schema::{Collection, Field, GenerationResponse, Schema};
