//! KFS membership scores

use serde::{Deserialize, Serialize};

/// Clamp one score into [0,1]
///
/// NaN collapses to 0.0; infinities go to the nearest bound.
pub fn clamp01(x: f64) -> f64 {
    if x.is_nan() {
        0.0
    } else {
        x.clamp(0.0, 1.0)
    }
}

/// The three membership axes
///
/// Values are not guaranteed to be in range until `clamped()` is called.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MembershipScores {
    /// Coherence/boundedness
    #[serde(default)]
    pub m_cbd: f64,
    /// Consent/governance/trust
    #[serde(default)]
    pub m_cgt: f64,
    /// Delivery/usefulness (hype-adjusted)
    #[serde(default)]
    pub m_nhy: f64,
}

impl MembershipScores {
    pub fn new(m_cbd: f64, m_cgt: f64, m_nhy: f64) -> Self {
        Self { m_cbd, m_cgt, m_nhy }
    }

    /// Same score on every axis
    pub fn uniform(m: f64) -> Self {
        Self::new(m, m, m)
    }

    /// Copy with every axis clamped independently
    pub fn clamped(&self) -> Self {
        Self {
            m_cbd: clamp01(self.m_cbd),
            m_cgt: clamp01(self.m_cgt),
            m_nhy: clamp01(self.m_nhy),
        }
    }

    pub fn max(&self) -> f64 {
        self.m_cbd.max(self.m_cgt).max(self.m_nhy)
    }

    pub fn min(&self) -> f64 {
        self.m_cbd.min(self.m_cgt).min(self.m_nhy)
    }

    /// True when every axis already lies in [0,1]
    pub fn in_range(&self) -> bool {
        [self.m_cbd, self.m_cgt, self.m_nhy]
            .iter()
            .all(|m| (0.0..=1.0).contains(m))
    }
}
