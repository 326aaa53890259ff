//! Per-feature state machines.
//!
//! One tagged union per user-facing operation (single generation and the
//! robustness test) instead of independent loading/error flags, so a
//! feature can never show a stale result next to a fresh error. Entering
//! `Running` clears any prior result or error unconditionally; the two
//! features keep separate error slots so one path never clobbers the
//! other.

use crate::robustness::RobustnessReport;
use crate::schema::GenerationResponse;

/// Lifecycle of a single generation request.
#[derive(Debug, Clone, Default)]
pub enum GenerationState {
    #[default]
    Idle,
    Running,
    Succeeded(Box<GenerationResponse>),
    Failed(String),
}

impl GenerationState {
    /// Start a run, discarding any previous outcome.
    pub fn begin(&mut self) {
        *self = Self::Running;
    }

    /// Settle a running request with its response.
    pub fn succeed(&mut self, response: GenerationResponse) {
        *self = Self::Succeeded(Box::new(response));
    }

    /// Settle a running request with a user-facing error message.
    pub fn fail(&mut self, error: impl Into<String>) {
        *self = Self::Failed(error.into());
    }

    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }

    pub fn response(&self) -> Option<&GenerationResponse> {
        match self {
            Self::Succeeded(response) => Some(response),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(error) => Some(error),
            _ => None,
        }
    }
}

impl std::fmt::Display for GenerationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "IDLE"),
            Self::Running => write!(f, "RUNNING"),
            Self::Succeeded(_) => write!(f, "SUCCEEDED"),
            Self::Failed(_) => write!(f, "FAILED"),
        }
    }
}

/// Lifecycle of a robustness test run.
#[derive(Debug, Clone, Default)]
pub enum RobustnessState {
    #[default]
    Idle,
    Running,
    Succeeded(RobustnessReport),
    Failed(String),
}

impl RobustnessState {
    /// Start a run, discarding any previous groups, score, or error.
    pub fn begin(&mut self) {
        *self = Self::Running;
    }

    pub fn succeed(&mut self, report: RobustnessReport) {
        *self = Self::Succeeded(report);
    }

    pub fn fail(&mut self, error: impl Into<String>) {
        *self = Self::Failed(error.into());
    }

    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }

    pub fn report(&self) -> Option<&RobustnessReport> {
        match self {
            Self::Succeeded(report) => Some(report),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(error) => Some(error),
            _ => None,
        }
    }
}

impl std::fmt::Display for RobustnessState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "IDLE"),
            Self::Running => write!(f, "RUNNING"),
            Self::Succeeded(_) => write!(f, "SUCCEEDED"),
            Self::Failed(_) => write!(f, "FAILED"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::robustness::group_samples;

    #[test]
    fn begin_clears_prior_outcome() {
        let mut state = GenerationState::default();
        state.begin();
        state.succeed(GenerationResponse::default());
        assert!(state.response().is_some());

        state.begin();
        assert!(state.is_running());
        assert!(state.response().is_none());
        assert!(state.error().is_none());
    }

    #[test]
    fn failure_is_kept_until_next_begin() {
        let mut state = GenerationState::default();
        state.begin();
        state.fail("API error (status 500): boom");
        assert_eq!(state.error(), Some("API error (status 500): boom"));
        assert_eq!(state.to_string(), "FAILED");

        state.begin();
        assert!(state.error().is_none());
    }

    #[test]
    fn robustness_state_carries_report() {
        let mut state = RobustnessState::default();
        assert_eq!(state.to_string(), "IDLE");
        state.begin();
        state.succeed(group_samples(&[]));
        let report = state.report().unwrap();
        assert_eq!(report.stability_score, 0);

        state.begin();
        assert!(state.report().is_none());
    }
}
