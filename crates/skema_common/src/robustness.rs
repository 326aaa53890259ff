//! Robustness test: repeated generation across sampling temperatures,
//! grouped by structural identity.
//!
//! All temperature calls are issued concurrently and every call settles
//! before the run completes. A failed call or a response without a schema
//! becomes a skipped sample carried in the report; the run as a whole
//! fails only when every call fails.

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::SkemaError;
use crate::gemini::{GeminiClient, GeminiError};
use crate::normalize::schema_key;
use crate::schema::GenerationResponse;

/// Sampling temperatures for the deployed robustness run, ascending.
pub const ROBUSTNESS_TEMPERATURES: [f32; 5] = [0.5, 0.6, 0.7, 0.8, 0.9];

/// One generation attempt at a given temperature. `response` is `None`
/// when the call itself failed; `error` then carries the reason.
#[derive(Debug, Clone, Serialize)]
pub struct TemperatureSample {
    pub temperature: f32,
    pub response: Option<GenerationResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Samples whose schemas normalized identically.
///
/// `representative` is the first response observed with the group's key;
/// `temperatures` lists every producing temperature in processed order.
#[derive(Debug, Clone, Serialize)]
pub struct RobustnessGroup {
    pub representative: GenerationResponse,
    pub temperatures: Vec<f32>,
    pub count: usize,
}

/// A sample excluded from grouping, with the reason.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedSample {
    pub temperature: f32,
    pub reason: String,
}

/// Outcome of a robustness run: groups ranked largest-first plus the
/// 0-100 stability score.
#[derive(Debug, Clone, Serialize)]
pub struct RobustnessReport {
    pub groups: Vec<RobustnessGroup>,
    pub skipped: Vec<SkippedSample>,
    pub sample_count: usize,
    pub stability_score: u8,
}

impl RobustnessReport {
    pub fn largest_group(&self) -> Option<&RobustnessGroup> {
        self.groups.first()
    }
}

/// Group samples by normalized-schema key.
///
/// Groups are ordered by count descending; ties keep first-insertion
/// order, so with ascending-temperature input the group seen at the lower
/// temperature wins.
pub fn group_samples(samples: &[TemperatureSample]) -> RobustnessReport {
    let mut groups: Vec<RobustnessGroup> = Vec::new();
    let mut index: HashMap<_, usize> = HashMap::new();
    let mut skipped = Vec::new();

    for sample in samples {
        let response = match &sample.response {
            Some(response) => response,
            None => {
                let reason = sample
                    .error
                    .clone()
                    .unwrap_or_else(|| "no response".to_string());
                warn!(temperature = sample.temperature, %reason, "sample skipped");
                skipped.push(SkippedSample {
                    temperature: sample.temperature,
                    reason,
                });
                continue;
            }
        };
        let schema = match &response.schema {
            Some(schema) => schema,
            None => {
                warn!(
                    temperature = sample.temperature,
                    "response carried no schema, sample skipped"
                );
                skipped.push(SkippedSample {
                    temperature: sample.temperature,
                    reason: "response carried no schema".to_string(),
                });
                continue;
            }
        };

        let key = schema_key(schema);
        if let Some(&slot) = index.get(&key) {
            groups[slot].temperatures.push(sample.temperature);
        } else {
            index.insert(key, groups.len());
            groups.push(RobustnessGroup {
                representative: response.clone(),
                temperatures: vec![sample.temperature],
                count: 0,
            });
        }
    }

    for group in &mut groups {
        group.count = group.temperatures.len();
    }
    // Stable sort: equal counts keep insertion (ascending temperature) order.
    groups.sort_by(|a, b| b.count.cmp(&a.count));

    let max_count = groups.first().map(|g| g.count).unwrap_or(0);
    let stability_score = stability_score(max_count, samples.len());
    debug!(
        groups = groups.len(),
        skipped = skipped.len(),
        stability_score,
        "grouping complete"
    );

    RobustnessReport {
        groups,
        skipped,
        sample_count: samples.len(),
        stability_score,
    }
}

/// Map the largest group's size to a 0-100 stability score.
///
/// `score = round(100 * (max_count - 1) / (sample_count - 1))`, which for
/// a 5-sample run yields 5=>100, 4=>75, 3=>50, 2=>25 and <=1 => 0. A run
/// with at most one sample cannot measure stability and scores 0.
pub fn stability_score(max_count: usize, sample_count: usize) -> u8 {
    if sample_count <= 1 || max_count <= 1 {
        return 0;
    }
    let max_count = max_count.min(sample_count);
    (((max_count - 1) * 100) as f64 / (sample_count - 1) as f64).round() as u8
}

/// Run the robustness test: one concurrent generation call per
/// temperature in [`ROBUSTNESS_TEMPERATURES`], settled in input order.
pub async fn run_robustness_test(
    client: &GeminiClient,
    requirements: &str,
) -> Result<RobustnessReport, SkemaError> {
    let requirements = crate::prompts::validate_requirements(requirements)?;

    let calls = ROBUSTNESS_TEMPERATURES.iter().map(|&temperature| async move {
        (
            temperature,
            client.generate_schema(requirements, temperature).await,
        )
    });
    // join_all preserves input order, so samples stay in ascending
    // temperature order regardless of network completion timing.
    let settled = futures::future::join_all(calls).await;

    let mut samples = Vec::with_capacity(settled.len());
    let mut failures = 0usize;
    let mut first_error: Option<GeminiError> = None;
    for (temperature, result) in settled {
        match result {
            Ok(response) => samples.push(TemperatureSample {
                temperature,
                response: Some(response),
                error: None,
            }),
            Err(err) => {
                warn!(temperature, error = %err, "generation call failed");
                failures += 1;
                let reason = err.to_string();
                if first_error.is_none() {
                    first_error = Some(err);
                }
                samples.push(TemperatureSample {
                    temperature,
                    response: None,
                    error: Some(reason),
                });
            }
        }
    }

    if failures > 0 && failures == samples.len() {
        if let Some(err) = first_error {
            return Err(SkemaError::Generation(err));
        }
    }

    Ok(group_samples(&samples))
}
