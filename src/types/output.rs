//! Evaluation result

use serde::{Deserialize, Serialize};

use crate::types::{MembershipScores, OmegaState};

/// Immutable result of one promotion evaluation
///
/// Serializes flat: `prev`, `next`, `reasons`, `m_cbd`, `m_cgt`, `m_nhy`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "FlatResult", into = "FlatResult")]
pub struct EvaluationResult {
    /// Normalized previous state
    pub prev: OmegaState,
    /// State reached this call (rank >= prev)
    pub next: OmegaState,
    /// One reason per rule fired, in evaluation order
    pub reasons: Vec<String>,
    /// Clamped scores actually used
    pub scores: MembershipScores,
}

/// Wire form of [`EvaluationResult`]. `#[serde(flatten)]` cannot read
/// numbers back under serde_json's `arbitrary_precision`, so the score
/// fields are spelled out here.
#[derive(Serialize, Deserialize)]
struct FlatResult {
    prev: OmegaState,
    next: OmegaState,
    reasons: Vec<String>,
    m_cbd: f64,
    m_cgt: f64,
    m_nhy: f64,
}

impl From<FlatResult> for EvaluationResult {
    fn from(flat: FlatResult) -> Self {
        EvaluationResult {
            prev: flat.prev,
            next: flat.next,
            reasons: flat.reasons,
            scores: MembershipScores::new(flat.m_cbd, flat.m_cgt, flat.m_nhy),
        }
    }
}

impl From<EvaluationResult> for FlatResult {
    fn from(result: EvaluationResult) -> Self {
        FlatResult {
            prev: result.prev,
            next: result.next,
            reasons: result.reasons,
            m_cbd: result.scores.m_cbd,
            m_cgt: result.scores.m_cgt,
            m_nhy: result.scores.m_nhy,
        }
    }
}

impl EvaluationResult {
    /// Did this call move up the lattice?
    pub fn promoted(&self) -> bool {
        self.next > self.prev
    }

    /// Number of ranks climbed this call
    pub fn ranks_climbed(&self) -> usize {
        self.next.rank() - self.prev.rank()
    }

    /// One-line summary without colors
    pub fn to_parseable_string(&self) -> String {
        format!(
            "prev={} | next={} | cbd={:.3} cgt={:.3} nhy={:.3} | reasons={}",
            self.prev,
            self.next,
            self.scores.m_cbd,
            self.scores.m_cgt,
            self.scores.m_nhy,
            if self.reasons.is_empty() {
                "-".to_string()
            } else {
                self.reasons.join(",")
            }
        )
    }
}
