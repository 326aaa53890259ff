//! Formatting for generation and stability results.
//!
//! Formatters return strings so they stay deterministic and testable;
//! printing is left to the command handlers.

use anyhow::{bail, Result};
use owo_colors::OwoColorize;

use skema_common::highlight::{schema_phrases, HighlightStrategy, SubstringHighlighter};
use skema_common::robustness::{RobustnessGroup, RobustnessReport};
use skema_common::schema::{Collection, Field};
use skema_common::GenerationResponse;

use crate::ui::{colors, HR};

/// Render a generated schema, its justification, and the requirements
/// text with every matched requirement snippet highlighted.
pub fn format_generation(response: &GenerationResponse, requirements: &str) -> String {
    let mut out = String::new();

    out.push_str(&format!("{}SCHEMA{}\n", colors::BOLD, colors::RESET));
    match &response.schema {
        Some(schema) if !schema.collections.is_empty() => {
            for collection in &schema.collections {
                out.push_str(&format_collection(collection));
            }
        }
        _ => out.push_str("  (the model returned no collections)\n"),
    }
    out.push('\n');

    if !response.justification.is_empty() {
        out.push_str(&format!("{}JUSTIFICATION{}\n", colors::BOLD, colors::RESET));
        for line in response.justification.lines() {
            out.push_str(&format!("  {}\n", line));
        }
        out.push('\n');
    }

    if let Some(schema) = &response.schema {
        let phrases = schema_phrases(schema);
        out.push_str(&format!("{}REQUIREMENTS{}\n", colors::BOLD, colors::RESET));
        out.push_str(&indent(&highlight_text(requirements, &phrases)));
        out.push('\n');
    }

    out
}

fn format_collection(collection: &Collection) -> String {
    let mut out = String::new();
    let title = if collection.description.is_empty() {
        collection.name.clone()
    } else {
        format!("{} - {}", collection.name, collection.description)
    };
    out.push_str(&format!("  {}{}{}\n", colors::HEADER, title, colors::RESET));
    for field in &collection.fields {
        out.push_str(&format!("    {}\n", format_field(field)));
    }
    out
}

fn format_field(field: &Field) -> String {
    let mut line = format!("{}: {}", field.name, field.field_type);
    if !field.description.is_empty() {
        line.push_str(&format!(
            "  {}{}{}",
            colors::DIM,
            field.description,
            colors::RESET
        ));
    }
    line
}

/// Render one element's description and its requirement evidence.
/// `target` is a collection name or `collection.field`, matched
/// case-insensitively.
pub fn format_explain(
    response: &GenerationResponse,
    requirements: &str,
    target: &str,
) -> Result<String> {
    let schema = match &response.schema {
        Some(schema) => schema,
        None => bail!("the model returned no schema, nothing to explain"),
    };

    let (collection_name, field_name) = match target.split_once('.') {
        Some((c, f)) => (c, Some(f)),
        None => (target, None),
    };

    let collection = schema
        .collections
        .iter()
        .find(|c| c.name.eq_ignore_ascii_case(collection_name));
    let collection = match collection {
        Some(collection) => collection,
        None => {
            let known: Vec<&str> = schema.collections.iter().map(|c| c.name.as_str()).collect();
            bail!(
                "no collection named '{}' (known: {})",
                collection_name,
                known.join(", ")
            );
        }
    };

    let (title, description, phrases) = match field_name {
        Some(field_name) => {
            let field = collection
                .fields
                .iter()
                .find(|f| f.name.eq_ignore_ascii_case(field_name));
            match field {
                Some(field) => (
                    format!("{}.{} ({})", collection.name, field.name, field.field_type),
                    field.description.clone(),
                    field.relevant_requirements.clone(),
                ),
                None => {
                    let known: Vec<&str> =
                        collection.fields.iter().map(|f| f.name.as_str()).collect();
                    bail!(
                        "no field named '{}' in '{}' (known: {})",
                        field_name,
                        collection.name,
                        known.join(", ")
                    );
                }
            }
        }
        None => (
            collection.name.clone(),
            collection.description.clone(),
            collection.relevant_requirements.clone(),
        ),
    };

    let mut out = String::new();
    out.push_str(&format!("{}{}{}\n", colors::HEADER, title, colors::RESET));
    if !description.is_empty() {
        out.push_str(&format!("  {}\n", description));
    }
    if phrases.is_empty() {
        out.push_str("  (no requirement evidence attached)\n");
    } else {
        out.push_str(&format!("\n{}EVIDENCE{}\n", colors::BOLD, colors::RESET));
        for phrase in &phrases {
            out.push_str(&format!("  {} {}\n", crate::ui::symbols::ARROW, phrase));
        }
    }
    out.push_str(&format!("\n{}REQUIREMENTS{}\n", colors::BOLD, colors::RESET));
    out.push_str(&indent(&highlight_text(requirements, &phrases)));
    Ok(out)
}

/// Render a robustness report: score, group table, skipped samples.
pub fn format_stability(report: &RobustnessReport) -> String {
    let mut out = String::new();

    out.push_str(&format!("{}STABILITY{}\n", colors::BOLD, colors::RESET));
    out.push_str(&format!("  score:   {}\n", paint_score(report.stability_score)));
    out.push_str(&format!(
        "  samples: {} ({} skipped)\n",
        report.sample_count,
        report.skipped.len()
    ));
    out.push_str(&format!("  groups:  {}\n\n", report.groups.len()));

    if !report.groups.is_empty() {
        out.push_str(&format!("{}GROUPS{}\n", colors::BOLD, colors::RESET));
        for (rank, group) in report.groups.iter().enumerate() {
            out.push_str(&format_group(rank + 1, group));
        }
        out.push('\n');
    }

    if !report.skipped.is_empty() {
        out.push_str(&format!("{}SKIPPED{}\n", colors::BOLD, colors::RESET));
        for skipped in &report.skipped {
            out.push_str(&format!("  {}  {}\n", skipped.temperature, skipped.reason));
        }
        out.push('\n');
    }

    out
}

fn format_group(rank: usize, group: &RobustnessGroup) -> String {
    let temps: Vec<String> = group.temperatures.iter().map(|t| t.to_string()).collect();
    let mut out = format!(
        "  #{}  x{}  temperatures {}\n",
        rank,
        group.count,
        temps.join(", ")
    );
    if let Some(schema) = &group.representative.schema {
        let names: Vec<&str> = schema.collections.iter().map(|c| c.name.as_str()).collect();
        out.push_str(&format!(
            "      {}collections: {}{}\n",
            colors::DIM,
            names.join(", "),
            colors::RESET
        ));
    }
    out
}

fn paint_score(score: u8) -> String {
    let label = format!("{}%", score);
    if score >= 75 {
        label.green().to_string()
    } else if score >= 50 {
        label.yellow().to_string()
    } else {
        label.red().to_string()
    }
}

/// Mark every matched requirement snippet inside the text.
pub fn highlight_text(text: &str, phrases: &[String]) -> String {
    let spans = SubstringHighlighter.spans(text, phrases);
    let mut out = String::new();
    let mut pos = 0;
    for span in spans {
        out.push_str(&text[pos..span.start]);
        out.push_str(colors::MARK);
        out.push_str(&text[span.start..span.end]);
        out.push_str(colors::RESET);
        pos = span.end;
    }
    out.push_str(&text[pos..]);
    out
}

fn indent(text: &str) -> String {
    let mut out = String::new();
    for line in text.lines() {
        out.push_str("  ");
        out.push_str(line);
        out.push('\n');
    }
    out
}

/// Horizontal separator between a styled section and whatever follows.
pub fn separator() -> String {
    format!("{}{}{}", colors::DIM, HR, colors::RESET)
}

#[cfg(test)]
mod tests {
    use super::*;
    use skema_common::robustness::{group_samples, TemperatureSample};
    use skema_common::schema::Schema;

    fn blog_response() -> GenerationResponse {
        serde_json::from_str(
            r#"{
                "schema": { "collections": [
                    { "name": "users", "description": "People",
                      "relevantRequirements": ["Users can create posts"],
                      "fields": [
                        { "name": "email", "type": "string",
                          "description": "Login identity",
                          "relevantRequirements": ["sign in"] }
                      ] }
                ] },
                "justification": "One collection."
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn highlights_matched_phrases_only() {
        let text = "Users can create posts. Admins moderate.";
        let painted = highlight_text(text, &["posts".to_string(), "missing".to_string()]);
        assert!(painted.contains(&format!("{}posts{}", colors::MARK, colors::RESET)));
        assert!(painted.contains("Admins moderate."));
    }

    #[test]
    fn generation_output_names_every_section() {
        let out = format_generation(&blog_response(), "Users can create posts. They sign in.");
        assert!(out.contains("SCHEMA"));
        assert!(out.contains("users"));
        assert!(out.contains("email: string"));
        assert!(out.contains("JUSTIFICATION"));
        assert!(out.contains("REQUIREMENTS"));
    }

    #[test]
    fn explain_resolves_collection_and_field() {
        let response = blog_response();
        let text = "Users can create posts. They sign in.";

        let out = format_explain(&response, text, "users").unwrap();
        assert!(out.contains("People"));
        assert!(out.contains("Users can create posts"));

        let out = format_explain(&response, text, "Users.EMAIL").unwrap();
        assert!(out.contains("users.email (string)"));
        assert!(out.contains("Login identity"));
    }

    #[test]
    fn explain_unknown_target_lists_known_names() {
        let response = blog_response();
        let err = format_explain(&response, "text", "orders").unwrap_err();
        assert!(err.to_string().contains("known: users"));

        let err = format_explain(&response, "text", "users.age").unwrap_err();
        assert!(err.to_string().contains("known: email"));
    }

    #[test]
    fn stability_output_ranks_groups() {
        let schema: Schema =
            serde_json::from_str(r#"{"collections":[{"name":"users","fields":[]}]}"#).unwrap();
        let samples: Vec<_> = [0.5f32, 0.6, 0.7]
            .iter()
            .map(|&t| TemperatureSample {
                temperature: t,
                response: Some(GenerationResponse {
                    schema: Some(schema.clone()),
                    justification: String::new(),
                }),
                error: None,
            })
            .collect();
        let report = group_samples(&samples);

        let out = format_stability(&report);
        assert!(out.contains("STABILITY"));
        assert!(out.contains("#1  x3  temperatures 0.5, 0.6, 0.7"));
        assert!(out.contains("collections: users"));
        assert!(!out.contains("SKIPPED"));
    }
}
