//! HDT Omega: readiness lattice for artifacts crossing a governance boundary
//!
//! Continuous membership scores (0..1) → discrete, explainable Ω states:
//! ABSENT → SEEDED → NORMALIZED → LINKED → TRUSTED → ACTIONABLE → DELIVERED

pub mod config;
pub mod core;
pub mod error;
pub mod types;

// =============================================================================
// THRESHOLDS [C] - default di-eval cutoffs
// =============================================================================

/// m_cbd needed for NORMALIZED
pub const THRESHOLD_CBD_NORM: f64 = 0.60;

/// m_cbd needed for LINKED
pub const THRESHOLD_CBD_LINK: f64 = 0.75;

/// m_cgt needed for TRUSTED
pub const THRESHOLD_CGT_TRUST: f64 = 0.70;

/// min(m_cbd, m_cgt, m_nhy) needed for ACTIONABLE
/// Guards against acting on one-axis hype
pub const THRESHOLD_ALL_ACTIONABLE: f64 = 0.75;

/// m_nhy needed for DELIVERED (separate from consent)
pub const THRESHOLD_NHY_DELIVER: f64 = 0.80;

/// Version label of the default threshold set
pub const THRESHOLD_VERSION: &str = "di-eval/1";

// =============================================================================
// WORLD WEIGHTING [C]
// =============================================================================

/// Reliability assumed for worlds without a hint (multiplier 0.75)
pub const DEFAULT_RELIABILITY: f64 = 0.5;

// =============================================================================
// SHIM [C]
// =============================================================================

/// Default Unix socket path for the local RPC shim
pub const DEFAULT_SOCKET_PATH: &str = "/tmp/devine_intel.sock";

/// Largest request the shim will buffer (1 MiB)
pub const DEFAULT_MAX_REQUEST_BYTES: usize = 1024 * 1024;

/// Read timeout per connection (milliseconds)
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 5000;

// =============================================================================
// VERSION
// =============================================================================

pub const VERSION: &str = "0.1.0";
