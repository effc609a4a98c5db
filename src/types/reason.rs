//! Promotion rules and the reasons they emit
//!
//! Six rules, one per promotable state, evaluated in fixed order.

use serde::{Deserialize, Serialize};

use crate::types::{MembershipScores, OmegaState, ThresholdSet};

/// One gated transition of the Ω lattice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromotionRule {
    /// Any signal > 0
    Seeded,
    /// m_cbd >= cbd_norm
    Normalized,
    /// m_cbd >= cbd_link
    Linked,
    /// m_cgt >= cgt_trust
    Trusted,
    /// min of all axes >= all_actionable
    Actionable,
    /// m_nhy >= nhy_deliver
    Delivered,
}

impl PromotionRule {
    /// Evaluation order
    pub const ORDERED: [PromotionRule; 6] = [
        PromotionRule::Seeded,
        PromotionRule::Normalized,
        PromotionRule::Linked,
        PromotionRule::Trusted,
        PromotionRule::Actionable,
        PromotionRule::Delivered,
    ];

    /// State this rule promotes to
    pub fn target(&self) -> OmegaState {
        match self {
            Self::Seeded => OmegaState::Seeded,
            Self::Normalized => OmegaState::Normalized,
            Self::Linked => OmegaState::Linked,
            Self::Trusted => OmegaState::Trusted,
            Self::Actionable => OmegaState::Actionable,
            Self::Delivered => OmegaState::Delivered,
        }
    }

    /// Gating condition over already-clamped scores
    pub fn holds(&self, scores: &MembershipScores, t: &ThresholdSet) -> bool {
        match self {
            Self::Seeded => scores.max() > 0.0,
            Self::Normalized => scores.m_cbd >= t.cbd_norm,
            Self::Linked => scores.m_cbd >= t.cbd_link,
            Self::Trusted => scores.m_cgt >= t.cgt_trust,
            Self::Actionable => scores.min() >= t.all_actionable,
            Self::Delivered => scores.m_nhy >= t.nhy_deliver,
        }
    }

    /// Reason string recorded when the rule fires, e.g. `trusted[cgt>=0.70]`
    pub fn reason(&self, t: &ThresholdSet) -> String {
        match self {
            Self::Seeded => "seeded[signal>0]".to_string(),
            Self::Normalized => format!("normalized[cbd>={:.2}]", t.cbd_norm),
            Self::Linked => format!("linked[cbd>={:.2}]", t.cbd_link),
            Self::Trusted => format!("trusted[cgt>={:.2}]", t.cgt_trust),
            Self::Actionable => format!("actionable[all>={:.2}]", t.all_actionable),
            Self::Delivered => format!("delivered[nhy>={:.2}]", t.nhy_deliver),
        }
    }

    /// Concept used to label the rule in explanations
    pub fn concept(&self) -> &'static str {
        match self {
            Self::Seeded | Self::Normalized => "Observation",
            Self::Linked => "Linkage",
            Self::Trusted | Self::Actionable => "Consent",
            Self::Delivered => "Export",
        }
    }

    /// Human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::Seeded => "Some meaningful signal exists",
            Self::Normalized => "Coherence/boundedness is strong enough",
            Self::Linked => "Linkage confidence connects contexts",
            Self::Trusted => "Governance/consent/trust membership is adequate",
            Self::Actionable => "All axes are high enough to act on",
            Self::Delivered => "Delivery/usefulness is high enough",
        }
    }
}

impl std::fmt::Display for PromotionRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.target(), self.description())
    }
}
