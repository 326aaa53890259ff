//! Requirement-substring highlighting.
//!
//! Maps the `relevantRequirements` snippets of a generated schema back
//! onto the requirements text as byte spans. Matching is a replaceable
//! strategy behind [`HighlightStrategy`]; the default does
//! case-insensitive (ASCII fold) exact-substring search, longest match
//! first so a long phrase is never shadowed by one of its own substrings.

use std::collections::HashSet;

use serde::Serialize;

use crate::schema::Schema;

/// A highlighted region, as byte offsets into the original text.
/// Offsets always land on char boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HighlightSpan {
    pub start: usize,
    pub end: usize,
}

/// Strategy seam so an exact-span (offset-based) matcher can replace
/// substring search without touching callers.
pub trait HighlightStrategy {
    /// Compute non-overlapping spans, sorted by start offset.
    fn spans(&self, text: &str, phrases: &[String]) -> Vec<HighlightSpan>;
}

/// Default matcher: de-duplicates phrases, searches longest-first,
/// drops matches that would overlap an already-claimed span.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubstringHighlighter;

impl HighlightStrategy for SubstringHighlighter {
    fn spans(&self, text: &str, phrases: &[String]) -> Vec<HighlightSpan> {
        // Duplicate phrases are de-duplicated before matching.
        let mut seen = HashSet::new();
        let mut candidates: Vec<&str> = Vec::new();
        for phrase in phrases {
            let trimmed = phrase.trim();
            if trimmed.is_empty() {
                continue;
            }
            if seen.insert(trimmed.to_ascii_lowercase()) {
                candidates.push(trimmed);
            }
        }
        // Longest first to avoid partial-phrase shadowing.
        candidates.sort_by(|a, b| b.len().cmp(&a.len()));

        let mut spans: Vec<HighlightSpan> = Vec::new();
        for phrase in candidates {
            let mut from = 0;
            while let Some(span) = find_ignore_ascii_case(text, phrase, from) {
                from = span.end;
                if !overlaps_any(&spans, span) {
                    spans.push(span);
                }
            }
        }
        spans.sort_by_key(|span| span.start);
        spans
    }
}

fn overlaps_any(spans: &[HighlightSpan], candidate: HighlightSpan) -> bool {
    spans
        .iter()
        .any(|span| candidate.start < span.end && span.start < candidate.end)
}

/// Find the next ASCII-case-insensitive occurrence of `needle` at or
/// after byte offset `from`, respecting char boundaries.
fn find_ignore_ascii_case(text: &str, needle: &str, from: usize) -> Option<HighlightSpan> {
    let width = needle.len();
    if width == 0 || from + width > text.len() {
        return None;
    }
    let mut at = from;
    while at + width <= text.len() {
        if text.is_char_boundary(at)
            && text.is_char_boundary(at + width)
            && text[at..at + width].eq_ignore_ascii_case(needle)
        {
            return Some(HighlightSpan {
                start: at,
                end: at + width,
            });
        }
        at += 1;
    }
    None
}

/// Every requirement snippet carried by a schema, in document order.
/// De-duplication is left to the matching strategy.
pub fn schema_phrases(schema: &Schema) -> Vec<String> {
    let mut phrases = Vec::new();
    for collection in &schema.collections {
        phrases.extend(collection.relevant_requirements.iter().cloned());
        for field in &collection.fields {
            phrases.extend(field.relevant_requirements.iter().cloned());
        }
    }
    phrases
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spans_of(text: &str, phrases: &[&str]) -> Vec<HighlightSpan> {
        let phrases: Vec<String> = phrases.iter().map(|p| p.to_string()).collect();
        SubstringHighlighter.spans(text, &phrases)
    }

    #[test]
    fn marks_substrings_case_insensitively() {
        let text = "Users can create posts.";
        let spans = spans_of(text, &["posts", "users"]);
        assert_eq!(spans.len(), 2);
        assert_eq!(&text[spans[0].start..spans[0].end], "Users");
        assert_eq!(&text[spans[1].start..spans[1].end], "posts");
    }

    #[test]
    fn duplicates_do_not_produce_duplicate_spans() {
        let text = "Users can create posts.";
        let spans = spans_of(text, &["posts", "Users", "POSTS", "users "]);
        assert_eq!(spans.len(), 2);
    }

    #[test]
    fn longest_match_wins_over_contained_phrase() {
        let text = "Users can create posts.";
        let spans = spans_of(text, &["posts", "create posts"]);
        assert_eq!(spans.len(), 1);
        assert_eq!(&text[spans[0].start..spans[0].end], "create posts");
    }

    #[test]
    fn repeated_occurrences_all_marked() {
        let text = "posts link to other posts";
        let spans = spans_of(text, &["posts"]);
        assert_eq!(spans.len(), 2);
        assert!(spans[0].end <= spans[1].start);
    }

    #[test]
    fn unmatched_and_empty_phrases_are_ignored() {
        let text = "Users can create posts.";
        let spans = spans_of(text, &["", "   ", "comments"]);
        assert!(spans.is_empty());
    }

    #[test]
    fn multibyte_text_keeps_char_boundaries() {
        let text = "Usuários can créate posts.";
        let spans = spans_of(text, &["posts", "can"]);
        for span in &spans {
            assert!(text.is_char_boundary(span.start));
            assert!(text.is_char_boundary(span.end));
        }
        assert_eq!(spans.len(), 2);
    }

    #[test]
    fn gathers_phrases_in_document_order() {
        use crate::schema::{Collection, Field, Schema};
        let schema = Schema {
            collections: vec![Collection {
                name: "users".into(),
                relevant_requirements: vec!["Users sign up".into()],
                fields: vec![Field {
                    name: "email".into(),
                    relevant_requirements: vec!["with an email".into()],
                    ..Default::default()
                }],
                ..Default::default()
            }],
        };
        assert_eq!(
            schema_phrases(&schema),
            vec!["Users sign up".to_string(), "with an email".to_string()]
        );
    }
}
