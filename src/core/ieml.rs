//! IEML concept labels
//!
//! Read-only mapping from concept names to short symbolic labels built
//! from the E, U, A, S, B, T primitives. Used for explanations only; no
//! promotion decision depends on it.

/// Label returned for concepts not in the table
pub const DEFAULT_LABEL: &str = "E";

const IEML_TABLE: [(&str, &str); 4] = [
    ("Observation", "E.U"),
    ("Consent", "A.S"),
    ("Export", "B.T"),
    ("Linkage", "U.A"),
];

/// Label for a concept, or `DEFAULT_LABEL`
pub fn lookup(concept: &str) -> &'static str {
    IEML_TABLE
        .iter()
        .find(|(name, _)| *name == concept)
        .map(|(_, label)| *label)
        .unwrap_or(DEFAULT_LABEL)
}

/// All known concepts with their labels
pub fn concepts() -> impl Iterator<Item = (&'static str, &'static str)> {
    IEML_TABLE.iter().copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PromotionRule;

    #[test]
    fn test_known_concepts() {
        assert_eq!(lookup("Observation"), "E.U");
        assert_eq!(lookup("Consent"), "A.S");
        assert_eq!(lookup("Export"), "B.T");
        assert_eq!(lookup("Linkage"), "U.A");
    }

    #[test]
    fn test_unknown_concept_gets_default() {
        assert_eq!(lookup("Telepathy"), DEFAULT_LABEL);
        assert_eq!(lookup("consent"), DEFAULT_LABEL);
    }

    #[test]
    fn test_every_rule_concept_has_a_label() {
        for rule in PromotionRule::ORDERED {
            assert_ne!(lookup(rule.concept()), DEFAULT_LABEL, "{:?}", rule);
        }
        assert_eq!(concepts().count(), 4);
    }
}
