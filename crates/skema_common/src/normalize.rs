//! Canonical, order-independent schema form.
//!
//! Two schemas are considered the same variant iff they have the same set
//! of collection names and, per collection, the same set of field
//! `(name, type)` pairs. Ordering, whitespace, descriptions, and
//! requirement snippets never influence the result. The canonical form
//! serializes to a byte-stable key, which is the sole equality mechanism
//! used by variant grouping.

use serde::Serialize;
use serde_json::json;

use crate::schema::Schema;

/// A field reduced to its structural content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedField {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
}

/// A collection reduced to its structural content, fields sorted by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedCollection {
    pub name: String,
    pub fields: Vec<NormalizedField>,
}

/// The canonical form of a schema, collections sorted by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedSchema {
    pub collections: Vec<NormalizedCollection>,
}

/// Byte-stable grouping key derived from a [`NormalizedSchema`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct NormalizedKey(String);

impl NormalizedKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Reduce a schema to its canonical form.
///
/// Names and types are trimmed; a missing name or type is already the
/// empty string at the model layer and stays empty here. Sorting uses
/// Rust's lexicographic `str` order, a deterministic total order.
pub fn normalize(schema: &Schema) -> NormalizedSchema {
    let mut collections: Vec<NormalizedCollection> = schema
        .collections
        .iter()
        .map(|collection| {
            let mut fields: Vec<NormalizedField> = collection
                .fields
                .iter()
                .map(|field| NormalizedField {
                    name: field.name.trim().to_string(),
                    field_type: field.field_type.trim().to_string(),
                })
                .collect();
            fields.sort_by(|a, b| a.name.cmp(&b.name));
            NormalizedCollection {
                name: collection.name.trim().to_string(),
                fields,
            }
        })
        .collect();
    collections.sort_by(|a, b| a.name.cmp(&b.name));
    NormalizedSchema { collections }
}

impl NormalizedSchema {
    /// Serialize the canonical form to its grouping key.
    ///
    /// Built as a `serde_json::Value` whose object keys land in the
    /// default (sorted) map order, so two canonicalizations of
    /// structurally identical schemas are byte-for-byte identical.
    pub fn key(&self) -> NormalizedKey {
        let value = json!({
            "collections": self
                .collections
                .iter()
                .map(|collection| {
                    json!({
                        "name": collection.name,
                        "fields": collection
                            .fields
                            .iter()
                            .map(|field| json!({
                                "name": field.name,
                                "type": field.field_type,
                            }))
                            .collect::<Vec<_>>(),
                    })
                })
                .collect::<Vec<_>>(),
        });
        NormalizedKey(value.to_string())
    }
}

/// Convenience: canonical key straight from a schema.
pub fn schema_key(schema: &Schema) -> NormalizedKey {
    normalize(schema).key()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Collection, Field, Schema};

    fn field(name: &str, field_type: &str, description: &str) -> Field {
        Field {
            name: name.into(),
            field_type: field_type.into(),
            description: description.into(),
            relevant_requirements: vec![description.into()],
        }
    }

    fn collection(name: &str, fields: Vec<Field>) -> Collection {
        Collection {
            name: name.into(),
            description: format!("{} collection", name),
            fields,
            relevant_requirements: vec![],
        }
    }

    #[test]
    fn permuting_collections_and_fields_is_invariant() {
        let a = Schema {
            collections: vec![
                collection("users", vec![field("email", "string", "a"), field("age", "number", "b")]),
                collection("posts", vec![field("title", "string", "c")]),
            ],
        };
        let b = Schema {
            collections: vec![
                collection("posts", vec![field("title", "string", "c")]),
                collection("users", vec![field("age", "number", "b"), field("email", "string", "a")]),
            ],
        };
        assert_eq!(schema_key(&a), schema_key(&b));
    }

    #[test]
    fn descriptive_text_is_ignored() {
        let mut a = Schema {
            collections: vec![collection("users", vec![field("email", "string", "login")])],
        };
        let mut b = a.clone();
        b.collections[0].description = "something else entirely".into();
        b.collections[0].fields[0].description = "changed".into();
        b.collections[0].fields[0].relevant_requirements = vec!["other".into()];
        a.collections[0].relevant_requirements = vec!["evidence".into()];
        assert_eq!(schema_key(&a), schema_key(&b));
    }

    #[test]
    fn whitespace_in_names_and_types_is_trimmed() {
        let a = Schema {
            collections: vec![collection(" users ", vec![field(" email ", " string ", "x")])],
        };
        let b = Schema {
            collections: vec![collection("users", vec![field("email", "string", "x")])],
        };
        assert_eq!(schema_key(&a), schema_key(&b));
    }

    #[test]
    fn differing_structure_differs() {
        let a = Schema {
            collections: vec![collection("users", vec![field("email", "string", "x")])],
        };
        let b = Schema {
            collections: vec![collection("users", vec![field("email", "text", "x")])],
        };
        assert_ne!(schema_key(&a), schema_key(&b));
    }

    #[test]
    fn normalization_is_idempotent() {
        let schema = Schema {
            collections: vec![
                collection("zeta", vec![field("b", "string", "x"), field("a", "number", "y")]),
                collection("alpha", vec![]),
            ],
        };
        let once = normalize(&schema);

        // Rebuild a schema from the canonical form and normalize again.
        let rebuilt = Schema {
            collections: once
                .collections
                .iter()
                .map(|c| Collection {
                    name: c.name.clone(),
                    description: String::new(),
                    fields: c
                        .fields
                        .iter()
                        .map(|f| Field {
                            name: f.name.clone(),
                            field_type: f.field_type.clone(),
                            description: String::new(),
                            relevant_requirements: vec![],
                        })
                        .collect(),
                    relevant_requirements: vec![],
                })
                .collect(),
        };
        assert_eq!(once.key(), normalize(&rebuilt).key());
    }

    #[test]
    fn empty_schema_has_stable_key() {
        assert_eq!(schema_key(&Schema::default()).as_str(), r#"{"collections":[]}"#);
    }
}
