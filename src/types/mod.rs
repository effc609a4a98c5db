//! Core types for HDT Omega

mod state;
mod scores;
mod thresholds;
mod reason;
mod output;
mod world;

pub use state::OmegaState;
pub use scores::{MembershipScores, clamp01};
pub use thresholds::ThresholdSet;
pub use reason::PromotionRule;
pub use output::EvaluationResult;
pub use world::{WorldWeightMap, WorldEdge, WorldWeight, WeightStrategy};
