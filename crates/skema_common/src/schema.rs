//! Generated schema data model.
//!
//! Wire contract shared with the generation API: camelCase member names,
//! every element carries the requirement snippets that justify it.
//! Missing sequences deserialize as empty so a sparse model response
//! never fails to parse.

use serde::{Deserialize, Serialize};

/// A named, typed attribute of a collection.
///
/// `field_type` is a free-form textual hint ("string", "array of
/// references", ...) - it is not validated against an enum.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    #[serde(default)]
    pub name: String,

    #[serde(rename = "type", default)]
    pub field_type: String,

    #[serde(default)]
    pub description: String,

    /// Verbatim substrings of the requirements text that justify this field.
    #[serde(default)]
    pub relevant_requirements: Vec<String>,
}

/// A logical grouping of records in the generated design, analogous to a table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub fields: Vec<Field>,

    /// Verbatim substrings of the requirements text that justify this collection.
    #[serde(default)]
    pub relevant_requirements: Vec<String>,
}

/// The generated NoSQL design.
///
/// Collection names (and field names within a collection) are expected
/// unique but duplicates pass through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    #[serde(default)]
    pub collections: Vec<Collection>,
}

/// One response per generation call: the schema plus a natural-language
/// justification. `schema` is optional because a model can return a
/// well-formed payload that still omits it; such responses are skipped
/// during grouping rather than failing the whole run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationResponse {
    #[serde(default)]
    pub schema: Option<Schema>,

    #[serde(default)]
    pub justification: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_payload() {
        let raw = r#"{
            "schema": {
                "collections": [{
                    "name": "users",
                    "description": "Registered users",
                    "relevantRequirements": ["Users can create posts"],
                    "fields": [{
                        "name": "email",
                        "type": "string",
                        "description": "Login identity",
                        "relevantRequirements": ["Users sign in with email"]
                    }]
                }]
            },
            "justification": "One collection per actor."
        }"#;

        let resp: GenerationResponse = serde_json::from_str(raw).unwrap();
        let schema = resp.schema.unwrap();
        assert_eq!(schema.collections.len(), 1);
        assert_eq!(schema.collections[0].fields[0].field_type, "string");
        assert_eq!(
            schema.collections[0].relevant_requirements,
            vec!["Users can create posts".to_string()]
        );
    }

    #[test]
    fn sparse_payload_defaults_to_empty() {
        let resp: GenerationResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.schema.is_none());
        assert!(resp.justification.is_empty());

        let schema: Schema = serde_json::from_str(r#"{"collections":[{"name":"a"}]}"#).unwrap();
        assert!(schema.collections[0].fields.is_empty());
        assert!(schema.collections[0].relevant_requirements.is_empty());
    }

    #[test]
    fn field_type_round_trips_as_type() {
        let field = Field {
            name: "age".into(),
            field_type: "number".into(),
            ..Default::default()
        };
        let raw = serde_json::to_string(&field).unwrap();
        assert!(raw.contains(r#""type":"number""#));
        assert!(raw.contains(r#""relevantRequirements":[]"#));
    }
}
