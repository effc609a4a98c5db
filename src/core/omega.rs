//! Ω Promotion Engine: (prev state, membership scores) → (next state, reasons)
//!
//! Rules, each applied only while rank is still below its target:
//! - → SEEDED:     max(cbd, cgt, nhy) > 0
//! - → NORMALIZED: cbd >= cbd_norm
//! - → LINKED:     cbd >= cbd_link
//! - → TRUSTED:    cgt >= cgt_trust
//! - → ACTIONABLE: min(cbd, cgt, nhy) >= all_actionable
//! - → DELIVERED:  nhy >= nhy_deliver
//!
//! One call may chain several promotions. Rank never decreases; demotion
//! is a policy decision made elsewhere.

use tracing::trace;

use crate::types::{EvaluationResult, MembershipScores, OmegaState, PromotionRule, ThresholdSet};

/// Stateless promotion engine over a fixed threshold set
#[derive(Debug, Clone, Default)]
pub struct PromotionEngine {
    thresholds: ThresholdSet,
}

impl PromotionEngine {
    /// Engine with default thresholds
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine with a custom (already validated) threshold set
    pub fn with_thresholds(thresholds: ThresholdSet) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &ThresholdSet {
        &self.thresholds
    }

    /// Evaluate from a wire label; unknown labels count as ABSENT
    pub fn evaluate(&self, scores: &MembershipScores, prev: &str) -> EvaluationResult {
        self.evaluate_from(scores, OmegaState::normalize(prev))
    }

    /// Evaluate from a typed previous state
    pub fn evaluate_from(&self, scores: &MembershipScores, prev: OmegaState) -> EvaluationResult {
        let scores = scores.clamped();
        let mut state = prev;
        let mut reasons = Vec::new();

        for rule in PromotionRule::ORDERED {
            if state < rule.target() && rule.holds(&scores, &self.thresholds) {
                trace!(from = %state, to = %rule.target(), "promotion rule fired");
                state = rule.target();
                reasons.push(rule.reason(&self.thresholds));
            }
        }

        EvaluationResult {
            prev,
            next: state,
            reasons,
            scores,
        }
    }

    /// Rules that fired for a given result, in order
    ///
    /// Used for explanations; the result itself only carries reason strings.
    pub fn fired_rules(&self, result: &EvaluationResult) -> Vec<PromotionRule> {
        PromotionRule::ORDERED
            .into_iter()
            .filter(|rule| {
                let target = rule.target();
                target > result.prev && target <= result.next && rule.holds(&result.scores, &self.thresholds)
            })
            .collect()
    }

    /// Advisory repair hints for the clamped scores
    ///
    /// Independent of the state reached; not part of the lattice.
    pub fn repair_plan(&self, scores: &MembershipScores) -> Vec<String> {
        let s = scores.clamped();
        let t = &self.thresholds;
        let mut repair = Vec::new();
        if s.m_cgt < t.cgt_trust {
            repair.push(format!("increase_governance_trust[m_cgt<{:.2}]", t.cgt_trust));
        }
        if s.m_cbd < t.cbd_norm {
            repair.push(format!("normalize_inputs[m_cbd<{:.2}]", t.cbd_norm));
        }
        if s.m_nhy < t.nhy_deliver {
            repair.push(format!("validate_delivery_signal[m_nhy<{:.2}]", t.nhy_deliver));
        }
        repair
    }
}

/// Evaluate with the default threshold set
pub fn evaluate(scores: &MembershipScores, prev: &str) -> EvaluationResult {
    PromotionEngine::new().evaluate(scores, prev)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(cbd: f64, cgt: f64, nhy: f64) -> MembershipScores {
        MembershipScores::new(cbd, cgt, nhy)
    }

    #[test]
    fn test_zero_scores_stay_absent() {
        let r = evaluate(&scores(0.0, 0.0, 0.0), "ABSENT");
        assert_eq!(r.next, OmegaState::Absent);
        assert!(r.reasons.is_empty());
    }

    #[test]
    fn test_chained_promotion_to_trusted() {
        let r = evaluate(&scores(0.7, 0.8, 0.6), "ABSENT");
        assert_eq!(r.next, OmegaState::Trusted);
        assert_eq!(
            r.reasons,
            vec!["seeded[signal>0]", "normalized[cbd>=0.60]", "trusted[cgt>=0.70]"]
        );
    }

    #[test]
    fn test_linked_needs_cbd_link() {
        let r = evaluate(&scores(0.8, 0.8, 0.6), "ABSENT");
        assert_eq!(r.next, OmegaState::Trusted);
        assert_eq!(
            r.reasons,
            vec![
                "seeded[signal>0]",
                "normalized[cbd>=0.60]",
                "linked[cbd>=0.75]",
                "trusted[cgt>=0.70]"
            ]
        );
    }

    #[test]
    fn test_actionable_to_delivered() {
        let r = evaluate(&scores(1.0, 1.0, 0.81), "ACTIONABLE");
        assert_eq!(r.next, OmegaState::Delivered);
        assert_eq!(r.reasons, vec!["delivered[nhy>=0.80]"]);
    }

    #[test]
    fn test_full_climb_in_one_call() {
        let r = evaluate(&scores(1.0, 1.0, 1.0), "ABSENT");
        assert_eq!(r.next, OmegaState::Delivered);
        assert_eq!(r.reasons.len(), 6);
        assert_eq!(r.ranks_climbed(), 6);
    }

    #[test]
    fn test_never_demotes() {
        let r = evaluate(&scores(0.0, 0.0, 0.0), "ACTIONABLE");
        assert_eq!(r.prev, OmegaState::Actionable);
        assert_eq!(r.next, OmegaState::Actionable);
        assert!(r.reasons.is_empty());
    }

    #[test]
    fn test_higher_rule_can_fire_past_unmet_lower_rule() {
        // cbd below cbd_link, but delivery alone gates DELIVERED
        let r = evaluate(&scores(0.1, 0.1, 0.9), "SEEDED");
        assert_eq!(r.next, OmegaState::Delivered);
        assert_eq!(r.reasons, vec!["delivered[nhy>=0.80]"]);
    }

    #[test]
    fn test_unknown_prev_defaults_to_absent() {
        let r = evaluate(&scores(0.5, 0.0, 0.0), "not-a-state");
        assert_eq!(r.prev, OmegaState::Absent);
        assert_eq!(r.next, OmegaState::Seeded);
    }

    #[test]
    fn test_out_of_range_scores_are_clamped() {
        let r = evaluate(&scores(7.0, -3.0, f64::NAN), "ABSENT");
        assert_eq!(r.scores, scores(1.0, 0.0, 0.0));
        assert_eq!(r.next, OmegaState::Linked);
    }

    #[test]
    fn test_custom_thresholds() {
        let engine = PromotionEngine::with_thresholds(ThresholdSet {
            cgt_trust: 0.95,
            ..Default::default()
        });
        let r = engine.evaluate(&scores(0.7, 0.8, 0.6), "ABSENT");
        assert_eq!(r.next, OmegaState::Normalized);
    }

    #[test]
    fn test_fired_rules_match_reasons() {
        let engine = PromotionEngine::new();
        let r = engine.evaluate(&scores(0.8, 0.8, 0.6), "ABSENT");
        let rules = engine.fired_rules(&r);
        assert_eq!(rules.len(), r.reasons.len());
        assert_eq!(
            rules,
            vec![
                PromotionRule::Seeded,
                PromotionRule::Normalized,
                PromotionRule::Linked,
                PromotionRule::Trusted
            ]
        );
    }

    #[test]
    fn test_repair_plan_is_independent_of_state() {
        let engine = PromotionEngine::new();
        assert_eq!(
            engine.repair_plan(&scores(0.0, 0.0, 0.0)),
            vec![
                "increase_governance_trust[m_cgt<0.70]",
                "normalize_inputs[m_cbd<0.60]",
                "validate_delivery_signal[m_nhy<0.80]"
            ]
        );
        assert!(engine.repair_plan(&scores(0.6, 0.7, 0.8)).is_empty());
        assert_eq!(
            engine.repair_plan(&scores(2.0, 0.5, 1.0)),
            vec!["increase_governance_trust[m_cgt<0.70]"]
        );
    }
}
