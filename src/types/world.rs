//! Possible-worlds weighting types

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// World id → weight, ordered by id
pub type WorldWeightMap = BTreeMap<String, f64>;

/// Undirected relation between two worlds
pub type WorldEdge = (String, String);

/// One entry of the wire `worlds` list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldWeight {
    pub id: String,
    pub w: f64,
}

/// Supported weighting strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightStrategy {
    /// Share of edge endpoints
    Degree,
    /// Degree scaled by per-world reliability, renormalized
    Empirical,
}

impl WeightStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            WeightStrategy::Degree => "degree",
            WeightStrategy::Empirical => "empirical",
        }
    }

    /// Exact lowercase name; anything else is unsupported
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "degree" => Some(WeightStrategy::Degree),
            "empirical" => Some(WeightStrategy::Empirical),
            _ => None,
        }
    }
}

impl std::fmt::Display for WeightStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_names() {
        assert_eq!(WeightStrategy::from_name("degree"), Some(WeightStrategy::Degree));
        assert_eq!(WeightStrategy::from_name("empirical"), Some(WeightStrategy::Empirical));
        assert_eq!(WeightStrategy::from_name("Degree"), None);
        assert_eq!(WeightStrategy::from_name("pagerank"), None);
        assert_eq!(WeightStrategy::Empirical.to_string(), "empirical");
    }
}
