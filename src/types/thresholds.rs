//! Threshold set gating each promotion

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::ConfigError;
use crate::{
    THRESHOLD_ALL_ACTIONABLE, THRESHOLD_CBD_LINK, THRESHOLD_CBD_NORM, THRESHOLD_CGT_TRUST,
    THRESHOLD_NHY_DELIVER, THRESHOLD_VERSION,
};

/// Named cutoffs, keyed by the transition they gate
///
/// Configuration only: the engine never mutates it. Every field has a
/// serde default so partial TOML tables are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdSet {
    /// Version label, pinned alongside the schema the set is validated against
    pub version: String,
    pub cbd_norm: f64,
    pub cbd_link: f64,
    pub cgt_trust: f64,
    pub all_actionable: f64,
    pub nhy_deliver: f64,
}

impl Default for ThresholdSet {
    fn default() -> Self {
        Self {
            version: THRESHOLD_VERSION.to_string(),
            cbd_norm: THRESHOLD_CBD_NORM,
            cbd_link: THRESHOLD_CBD_LINK,
            cgt_trust: THRESHOLD_CGT_TRUST,
            all_actionable: THRESHOLD_ALL_ACTIONABLE,
            nhy_deliver: THRESHOLD_NHY_DELIVER,
        }
    }
}

impl ThresholdSet {
    /// Cutoffs by name, in rule order
    pub fn named(&self) -> [(&'static str, f64); 5] {
        [
            ("cbd_norm", self.cbd_norm),
            ("cbd_link", self.cbd_link),
            ("cgt_trust", self.cgt_trust),
            ("all_actionable", self.all_actionable),
            ("nhy_deliver", self.nhy_deliver),
        ]
    }

    /// Every cutoff must be finite and inside [0,1]
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in self.named() {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidThreshold { name, value });
            }
        }
        Ok(())
    }

    /// SHA-256 over version + cutoffs, hex encoded
    ///
    /// Cutoffs are rendered with fixed precision so the digest is stable
    /// across platforms.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.version.as_bytes());
        for (name, value) in self.named() {
            hasher.update(format!("|{}={:.6}", name, value).as_bytes());
        }
        let digest: [u8; 32] = hasher.finalize().into();
        digest.iter().map(|b| format!("{:02x}", b)).collect()
    }
}
