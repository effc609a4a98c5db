//! Ω readiness lattice

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The seven Ω states, in rank order
///
/// Declaration order is the lattice order, so `Ord` compares ranks.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OmegaState {
    /// Nothing measured yet
    #[default]
    Absent,
    /// Some signal exists
    Seeded,
    /// Coherence/boundedness strong enough
    Normalized,
    /// Enough linkage confidence to connect contexts
    Linked,
    /// Consent/governance/trust membership adequate
    Trusted,
    /// All axes high enough to act on
    Actionable,
    /// Delivery/usefulness high enough to hand over
    Delivered,
}

impl OmegaState {
    /// Full lattice, lowest rank first
    pub const ALL: [OmegaState; 7] = [
        OmegaState::Absent,
        OmegaState::Seeded,
        OmegaState::Normalized,
        OmegaState::Linked,
        OmegaState::Trusted,
        OmegaState::Actionable,
        OmegaState::Delivered,
    ];

    /// Position in the lattice (ABSENT = 0)
    pub fn rank(&self) -> usize {
        *self as usize
    }

    /// State at a given rank, if any
    pub fn from_rank(rank: usize) -> Option<Self> {
        Self::ALL.get(rank).copied()
    }

    /// Wire label, e.g. "TRUSTED"
    pub fn label(&self) -> &'static str {
        match self {
            OmegaState::Absent => "ABSENT",
            OmegaState::Seeded => "SEEDED",
            OmegaState::Normalized => "NORMALIZED",
            OmegaState::Linked => "LINKED",
            OmegaState::Trusted => "TRUSTED",
            OmegaState::Actionable => "ACTIONABLE",
            OmegaState::Delivered => "DELIVERED",
        }
    }

    /// Exact, case-sensitive label lookup
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|s| s.label() == label)
    }

    /// Lenient lookup: unknown labels fall back to the lowest rank
    pub fn normalize(label: &str) -> Self {
        Self::from_label(label).unwrap_or_default()
    }

    /// DELIVERED is the top of the lattice
    pub fn is_terminal(&self) -> bool {
        *self == OmegaState::Delivered
    }
}

impl FromStr for OmegaState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s).ok_or_else(|| format!("unknown omega state '{}'", s))
    }
}

impl std::fmt::Display for OmegaState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
