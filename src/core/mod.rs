//! Core modules for HDT Omega

pub mod omega;
pub mod world_weights;
pub mod protocol;
pub mod shim;
pub mod ieml;
pub mod pathflow;

pub use omega::{PromotionEngine, evaluate};
pub use world_weights::{world_weights, degree_weights, empirical_weights, to_world_list};
pub use protocol::{Request, Response, handle, handle_bytes, SUPPORTED_RPCS};
pub use shim::{ShimServer, ShimClient};
pub use pathflow::{Scenario, ScenarioOutcome, PathflowReport, run_scenario, run_all, load_scenarios, write_report};
