//! Prompt building and the structured-output contract for schema
//! generation.
//!
//! The response schema pins the exact shape of the model's JSON output:
//! every collection and every field is required to carry its name, its
//! description, and the requirement snippets that justify it.

use serde_json::{json, Value};

use crate::error::SkemaError;

/// Output rules suffix (constant size, always included)
const OUTPUT_RULES: &str = r#"

=== OUTPUT RULES (MANDATORY) ===
1. Respond with a single JSON object matching the response schema.
2. Every collection and every field carries a description and its relevantRequirements.
3. relevantRequirements entries MUST be verbatim substrings of the requirements text above.
4. Field types are short textual hints (e.g. "string", "number", "array of references").
5. Never invent requirements that are not in the text."#;

/// Reject empty or whitespace-only requirements before any network call.
pub fn validate_requirements(text: &str) -> Result<&str, SkemaError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(SkemaError::EmptyRequirements);
    }
    Ok(trimmed)
}

/// Build the generation prompt around the user's requirements text.
pub fn build_schema_prompt(requirements: &str) -> String {
    format!(
        "You are a NoSQL data modeler. Design a document-database schema \
         (collections and fields) for the application described below, and \
         justify the design in plain language.\n\n\
         === REQUIREMENTS ===\n{}{}",
        requirements, OUTPUT_RULES
    )
}

/// The fixed structured-output contract sent with every generation call.
pub fn response_schema() -> Value {
    let requirement_list = json!({
        "type": "ARRAY",
        "items": { "type": "STRING" }
    });
    json!({
        "type": "OBJECT",
        "required": ["schema", "justification"],
        "properties": {
            "schema": {
                "type": "OBJECT",
                "required": ["collections"],
                "properties": {
                    "collections": {
                        "type": "ARRAY",
                        "items": {
                            "type": "OBJECT",
                            "required": ["name", "description", "relevantRequirements", "fields"],
                            "properties": {
                                "name": { "type": "STRING" },
                                "description": { "type": "STRING" },
                                "relevantRequirements": requirement_list.clone(),
                                "fields": {
                                    "type": "ARRAY",
                                    "items": {
                                        "type": "OBJECT",
                                        "required": ["name", "type", "description", "relevantRequirements"],
                                        "properties": {
                                            "name": { "type": "STRING" },
                                            "type": { "type": "STRING" },
                                            "description": { "type": "STRING" },
                                            "relevantRequirements": requirement_list
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            },
            "justification": { "type": "STRING" }
        }
    })
}
