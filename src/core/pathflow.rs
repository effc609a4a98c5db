//! Path-flow runner: drives the promotion engine over synthetic score ramps
//!
//! Scenario file (YAML):
//!
//! ```yaml
//! - name: steady-ramp
//!   expect: { steps_max: 10 }
//! - name: cold-start
//!   start: { m_cbd: 0.0, m_cgt: 0.0, m_nhy: 0.0 }
//!   step: 0.25
//!   expect: { steps_max: 6, omega: DELIVERED }
//! ```
//!
//! Each scenario starts at ABSENT and stops early at DELIVERED. The point
//! is repeatability, not realism.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

use crate::core::omega::PromotionEngine;
use crate::error::PathflowError;
use crate::types::{EvaluationResult, MembershipScores, OmegaState};

/// Scores at step 0 when a scenario gives none
pub const DEFAULT_START: MembershipScores = MembershipScores {
    m_cbd: 0.60,
    m_cgt: 0.55,
    m_nhy: 0.50,
};

/// Per-step increment on every axis
pub const DEFAULT_STEP: f64 = 0.05;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub expect: Expectation,
    #[serde(default)]
    pub start: Option<MembershipScores>,
    #[serde(default)]
    pub step: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expectation {
    /// Upper bound on engine calls
    pub steps_max: usize,
    /// Final state the scenario should reach, if checked
    #[serde(default)]
    pub omega: Option<OmegaState>,
}

impl Scenario {
    /// Scores fed to the engine at step `k`
    pub fn scores_at(&self, k: usize) -> MembershipScores {
        let start = self.start.unwrap_or(DEFAULT_START);
        let step = self.step.unwrap_or(DEFAULT_STEP);
        let delta = step * k as f64;
        MembershipScores::new(start.m_cbd + delta, start.m_cgt + delta, start.m_nhy + delta)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioOutcome {
    /// State after the last step
    pub omega: OmegaState,
    /// Engine calls made
    pub steps: usize,
    /// Last evaluation (none when zero steps ran)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<EvaluationResult>,
    /// Whether `expect.omega` was met, when one was given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathflowReport {
    pub generated_at: DateTime<Utc>,
    pub thresholds_version: String,
    pub thresholds_fingerprint: String,
    pub scenarios: BTreeMap<String, ScenarioOutcome>,
}

impl PathflowReport {
    /// Scenarios whose expected final state was not reached
    pub fn mismatches(&self) -> Vec<&str> {
        self.scenarios
            .iter()
            .filter(|(_, o)| o.matched == Some(false))
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

/// Run one scenario from ABSENT
pub fn run_scenario(engine: &PromotionEngine, scenario: &Scenario) -> ScenarioOutcome {
    let mut prev = OmegaState::Absent;
    let mut meta = None;
    let mut steps = scenario.expect.steps_max;

    for k in 0..scenario.expect.steps_max {
        let result = engine.evaluate_from(&scenario.scores_at(k), prev);
        prev = result.next;
        meta = Some(result);
        if prev.is_terminal() {
            steps = k + 1;
            break;
        }
    }

    debug!(scenario = %scenario.name, omega = %prev, steps, "scenario finished");
    ScenarioOutcome {
        omega: prev,
        steps,
        meta,
        matched: scenario.expect.omega.map(|want| want == prev),
    }
}

/// Run every scenario; later duplicates of a name overwrite earlier ones
pub fn run_all(engine: &PromotionEngine, scenarios: &[Scenario]) -> PathflowReport {
    let outcomes = scenarios
        .iter()
        .map(|s| (s.name.clone(), run_scenario(engine, s)))
        .collect();
    PathflowReport {
        generated_at: Utc::now(),
        thresholds_version: engine.thresholds().version.clone(),
        thresholds_fingerprint: engine.thresholds().fingerprint(),
        scenarios: outcomes,
    }
}

pub fn parse_scenarios(yaml: &str) -> Result<Vec<Scenario>, PathflowError> {
    Ok(serde_yaml::from_str(yaml)?)
}

pub fn load_scenarios(path: &Path) -> Result<Vec<Scenario>, PathflowError> {
    let content = std::fs::read_to_string(path).map_err(|source| PathflowError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_scenarios(&content)
}

/// Write the report as pretty JSON
pub fn write_report(report: &PathflowReport, path: &Path) -> Result<(), PathflowError> {
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json).map_err(|source| PathflowError::Io {
        path: path.display().to_string(),
        source,
    })?;
    info!(path = %path.display(), scenarios = report.scenarios.len(), "pathflow report written");
    Ok(())
}
