//! World weights over competing interpretations ("worlds")
//!
//! Default strategy is degree-based over an undirected edge list. Pure and
//! small so it can be reused by the shim, batch runs and audit replays.

use std::collections::HashMap;

use crate::types::{clamp01, WeightStrategy, WorldEdge, WorldWeight, WorldWeightMap};
use crate::DEFAULT_RELIABILITY;

/// Share of edge endpoints per world
///
/// Self-loops count twice, duplicate edges accumulate.
pub fn degree_weights(edges: &[WorldEdge]) -> WorldWeightMap {
    let mut degree = WorldWeightMap::new();
    for (u, v) in edges {
        *degree.entry(u.clone()).or_insert(0.0) += 1.0;
        *degree.entry(v.clone()).or_insert(0.0) += 1.0;
    }
    normalize(degree)
}

/// Degree weights scaled by `0.5 + 0.5 * reliability`, renormalized
///
/// Unknown worlds use reliability 0.5. Hints are clamped to [0,1].
pub fn empirical_weights(edges: &[WorldEdge], reliability: &HashMap<String, f64>) -> WorldWeightMap {
    let mixed = degree_weights(edges)
        .into_iter()
        .map(|(world, base)| {
            let r = reliability
                .get(&world)
                .map(|r| clamp01(*r))
                .unwrap_or(DEFAULT_RELIABILITY);
            (world, base * (0.5 + 0.5 * r))
        })
        .collect();
    normalize(mixed)
}

/// Dispatch by strategy name; unknown strategies yield an empty map
pub fn world_weights(
    strategy: &str,
    edges: &[WorldEdge],
    reliability: &HashMap<String, f64>,
) -> WorldWeightMap {
    match WeightStrategy::from_name(strategy) {
        Some(WeightStrategy::Degree) => degree_weights(edges),
        Some(WeightStrategy::Empirical) => empirical_weights(edges, reliability),
        None => WorldWeightMap::new(),
    }
}

/// Flatten a map into the sorted wire list
pub fn to_world_list(weights: &WorldWeightMap) -> Vec<WorldWeight> {
    weights
        .iter()
        .map(|(id, w)| WorldWeight { id: id.clone(), w: *w })
        .collect()
}

fn normalize(map: WorldWeightMap) -> WorldWeightMap {
    let total: f64 = map.values().sum();
    let total = if total == 0.0 { 1.0 } else { total };
    map.into_iter().map(|(k, v)| (k, v / total)).collect()
}
