//! Request/response envelopes for the local RPC shim
//!
//! Requests:
//! - `{"rpc":"Evaluate","prev":"ABSENT","kfs":{"m_cbd":0.7,"m_cgt":0.8,"m_nhy":0.6}}`
//! - `{"rpc":"Promote", ...same fields...}`
//! - `{"rpc":"WorldWeighting","strategy":"degree","edges":[["A","B"]],"reliability":{"A":0.9}}`
//!
//! Field decoding is lenient: missing or malformed fields take documented
//! defaults instead of failing the request. Only an unparseable payload or
//! a non-object envelope is a decode failure.

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::core::omega::PromotionEngine;
use crate::core::world_weights::{to_world_list, world_weights};
use crate::error::ShimError;
use crate::types::{EvaluationResult, MembershipScores, OmegaState, WorldEdge, WorldWeight};

/// Operation names the shim answers to
pub const SUPPORTED_RPCS: [&str; 3] = ["Evaluate", "Promote", "WorldWeighting"];

/// Older name for `WorldWeighting`, still accepted
pub const LEGACY_WORLD_WEIGHTS_RPC: &str = "WorldWeights";

/// Strategy used when a WorldWeighting request omits one
pub const DEFAULT_STRATEGY: &str = "degree";

/// Decoded request
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Evaluate {
        prev: Option<String>,
        scores: MembershipScores,
    },
    Promote {
        prev: Option<String>,
        scores: MembershipScores,
    },
    WorldWeighting {
        strategy: String,
        edges: Vec<WorldEdge>,
        reliability: HashMap<String, f64>,
    },
    /// Well-formed envelope with a missing or unknown `rpc`
    Unsupported { rpc: Option<String> },
}

impl Request {
    /// Decode raw bytes; an empty payload is treated as `{}`
    pub fn decode(bytes: &[u8]) -> Result<Self, ShimError> {
        if bytes.iter().all(|b| b.is_ascii_whitespace()) {
            return Ok(Request::Unsupported { rpc: None });
        }
        let value: Value = serde_json::from_slice(bytes)?;
        Self::from_value(&value)
    }

    pub fn from_value(value: &Value) -> Result<Self, ShimError> {
        let obj = value
            .as_object()
            .ok_or_else(|| ShimError::Protocol("request envelope must be a JSON object".into()))?;

        let request = match obj.get("rpc").and_then(Value::as_str) {
            Some("Evaluate") => Request::Evaluate {
                prev: prev_field(obj),
                scores: scores_field(obj),
            },
            Some("Promote") => Request::Promote {
                prev: prev_field(obj),
                scores: scores_field(obj),
            },
            Some("WorldWeighting") | Some(LEGACY_WORLD_WEIGHTS_RPC) => Request::WorldWeighting {
                strategy: strategy_field(obj),
                edges: edges_field(obj),
                reliability: reliability_field(obj),
            },
            Some(other) => Request::Unsupported {
                rpc: Some(other.to_string()),
            },
            // missing or null stays None; other non-strings echo their JSON text
            None => Request::Unsupported {
                rpc: obj
                    .get("rpc")
                    .filter(|v| !v.is_null())
                    .map(Value::to_string),
            },
        };
        Ok(request)
    }

    /// Operation name for logging
    pub fn rpc_name(&self) -> &str {
        match self {
            Request::Evaluate { .. } => "Evaluate",
            Request::Promote { .. } => "Promote",
            Request::WorldWeighting { .. } => "WorldWeighting",
            Request::Unsupported { rpc } => rpc.as_deref().unwrap_or("<missing>"),
        }
    }
}

fn prev_field(obj: &Map<String, Value>) -> Option<String> {
    obj.get("prev").and_then(Value::as_str).map(str::to_string)
}

/// Numbers and numeric strings; anything else is `None`
///
/// Numbers are parsed from their literal text, so `1e400` becomes +∞
/// rather than failing.
fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.to_string().parse::<f64>().ok(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn lenient_f64(value: Option<&Value>) -> f64 {
    value.and_then(numeric).unwrap_or(0.0)
}

fn scores_field(obj: &Map<String, Value>) -> MembershipScores {
    let empty = Map::new();
    let kfs = obj.get("kfs").and_then(Value::as_object).unwrap_or(&empty);
    MembershipScores::new(
        lenient_f64(kfs.get("m_cbd")),
        lenient_f64(kfs.get("m_cgt")),
        lenient_f64(kfs.get("m_nhy")),
    )
}

fn strategy_field(obj: &Map<String, Value>) -> String {
    match obj.get("strategy") {
        None | Some(Value::Null) => DEFAULT_STRATEGY.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Keeps only `[string, string]` pairs
fn edges_field(obj: &Map<String, Value>) -> Vec<WorldEdge> {
    let Some(raw) = obj.get("edges").and_then(Value::as_array) else {
        return Vec::new();
    };
    raw.iter()
        .filter_map(|e| match e.as_array().map(Vec::as_slice) {
            Some([Value::String(u), Value::String(v)]) => Some((u.clone(), v.clone())),
            _ => None,
        })
        .collect()
}

fn reliability_field(obj: &Map<String, Value>) -> HashMap<String, f64> {
    let Some(raw) = obj.get("reliability").and_then(Value::as_object) else {
        return HashMap::new();
    };
    raw.iter()
        .filter_map(|(k, v)| numeric(v).map(|r| (k.clone(), r)))
        .collect()
}

// =============================================================================
// RESPONSES
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct EvaluateResponse {
    pub ok: bool,
    /// Legacy name for `next`
    pub omega: OmegaState,
    #[serde(flatten)]
    pub result: EvaluationResult,
}

#[derive(Debug, Clone, Serialize)]
pub struct PromoteResponse {
    pub ok: bool,
    pub omega: OmegaState,
    pub prev: OmegaState,
    pub next: OmegaState,
    /// Advisory only
    pub repair: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WorldWeightingResponse {
    pub ok: bool,
    /// Strategy echoed back
    pub w_model: String,
    /// Sorted by id
    pub worlds: Vec<WorldWeight>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FailureResponse {
    pub ok: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supported: Option<Vec<String>>,
}

/// Response envelope; every variant carries an explicit `ok` flag
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Response {
    Evaluate(EvaluateResponse),
    Promote(PromoteResponse),
    WorldWeighting(WorldWeightingResponse),
    Failure(FailureResponse),
}

impl Response {
    pub fn failure(error: impl Into<String>) -> Self {
        Response::Failure(FailureResponse {
            ok: false,
            error: error.into(),
            supported: None,
        })
    }

    pub fn unsupported(rpc: Option<&str>) -> Self {
        let error = match rpc {
            Some(name) => format!("unsupported rpc '{}'", name),
            None => "unsupported rpc (missing 'rpc' field)".to_string(),
        };
        Response::Failure(FailureResponse {
            ok: false,
            error,
            supported: Some(SUPPORTED_RPCS.iter().map(|s| s.to_string()).collect()),
        })
    }

    pub fn is_ok(&self) -> bool {
        !matches!(self, Response::Failure(_))
    }

    /// Serialized envelope; falls back to a fixed failure body
    pub fn to_bytes(&self) -> Vec<u8> {
        serde_json::to_vec(self).unwrap_or_else(|e| {
            format!(r#"{{"ok":false,"error":"failed to encode response: {}"}}"#, e).into_bytes()
        })
    }
}

/// Dispatch a decoded request to the engine or the weighting function
pub fn handle(engine: &PromotionEngine, request: Request) -> Response {
    match request {
        Request::Evaluate { prev, scores } => {
            let result = engine.evaluate(&scores, prev.as_deref().unwrap_or_default());
            Response::Evaluate(EvaluateResponse {
                ok: true,
                omega: result.next,
                result,
            })
        }
        Request::Promote { prev, scores } => {
            let result = engine.evaluate(&scores, prev.as_deref().unwrap_or_default());
            Response::Promote(PromoteResponse {
                ok: true,
                omega: result.next,
                prev: result.prev,
                next: result.next,
                repair: engine.repair_plan(&result.scores),
            })
        }
        Request::WorldWeighting {
            strategy,
            edges,
            reliability,
        } => {
            let weights = world_weights(&strategy, &edges, &reliability);
            Response::WorldWeighting(WorldWeightingResponse {
                ok: true,
                w_model: strategy,
                worlds: to_world_list(&weights),
            })
        }
        Request::Unsupported { rpc } => Response::unsupported(rpc.as_deref()),
    }
}

/// Decode and dispatch; decode errors become failure envelopes
pub fn handle_bytes(engine: &PromotionEngine, bytes: &[u8]) -> Response {
    match Request::decode(bytes) {
        Ok(request) => handle(engine, request),
        Err(e) => Response::failure(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn call(body: Value) -> Value {
        let engine = PromotionEngine::new();
        let bytes = serde_json::to_vec(&body).unwrap();
        serde_json::to_value(handle_bytes(&engine, &bytes)).unwrap()
    }

    #[test]
    fn test_decode_evaluate_defaults() {
        let req = Request::from_value(&json!({"rpc": "Evaluate"})).unwrap();
        assert_eq!(
            req,
            Request::Evaluate {
                prev: None,
                scores: MembershipScores::default()
            }
        );
    }

    #[test]
    fn test_decode_lenient_scores() {
        let req = Request::from_value(&json!({
            "rpc": "Promote",
            "prev": 42,
            "kfs": {"m_cbd": "0.7", "m_cgt": true, "m_nhy": null}
        }))
        .unwrap();
        assert_eq!(
            req,
            Request::Promote {
                prev: None,
                scores: MembershipScores::new(0.7, 0.0, 0.0)
            }
        );
    }

    #[test]
    fn test_decode_drops_malformed_edges() {
        let req = Request::from_value(&json!({
            "rpc": "WorldWeighting",
            "edges": [["A", "B"], ["A"], "AB", ["A", "B", "C"], [1, 2], ["B", "C"]],
            "reliability": {"A": 0.9, "B": "high"}
        }))
        .unwrap();
        match req {
            Request::WorldWeighting { strategy, edges, reliability } => {
                assert_eq!(strategy, "degree");
                assert_eq!(edges.len(), 2);
                assert_eq!(reliability.len(), 1);
                assert_eq!(reliability["A"], 0.9);
            }
            other => panic!("expected WorldWeighting, got {:?}", other),
        }
    }

    #[test]
    fn test_out_of_range_scores_clamp_instead_of_failing() {
        let engine = PromotionEngine::new();
        let body = br#"{"rpc":"Evaluate","kfs":{"m_cbd":1e400,"m_cgt":0.8,"m_nhy":0.6}}"#;
        let resp = serde_json::to_value(handle_bytes(&engine, body)).unwrap();
        assert_eq!(resp["ok"], true);
        assert_eq!(resp["m_cbd"], 1.0);
        assert_eq!(resp["omega"], "TRUSTED");

        let body = br#"{"rpc":"Evaluate","kfs":{"m_cbd":-1e400,"m_cgt":0.8,"m_nhy":0.6}}"#;
        let resp = serde_json::to_value(handle_bytes(&engine, body)).unwrap();
        assert_eq!(resp["ok"], true);
        assert_eq!(resp["m_cbd"], 0.0);
    }

    #[test]
    fn test_reliability_accepts_numeric_strings() {
        let engine = PromotionEngine::new();
        let body = br#"{"rpc":"WorldWeighting","strategy":"empirical","edges":[["A","B"]],"reliability":{"A":"1.0","B":0.0}}"#;
        let resp = serde_json::to_value(handle_bytes(&engine, body)).unwrap();
        assert_eq!(resp["ok"], true);
        let a = resp["worlds"][0]["w"].as_f64().unwrap();
        let b = resp["worlds"][1]["w"].as_f64().unwrap();
        assert!((a - 2.0 / 3.0).abs() < 1e-12, "A = {}", a);
        assert!((b - 1.0 / 3.0).abs() < 1e-12, "B = {}", b);
    }

    #[test]
    fn test_huge_reliability_decodes_as_infinity() {
        let req = Request::decode(br#"{"rpc":"WorldWeighting","reliability":{"A":1e400}}"#).unwrap();
        match req {
            Request::WorldWeighting { reliability, .. } => {
                assert_eq!(reliability["A"], f64::INFINITY);
            }
            other => panic!("expected WorldWeighting, got {:?}", other),
        }
    }

    #[test]
    fn test_legacy_world_weights_alias() {
        let req = Request::from_value(&json!({"rpc": "WorldWeights", "edges": []})).unwrap();
        assert_eq!(req.rpc_name(), "WorldWeighting");
    }

    #[test]
    fn test_non_object_envelope_is_decode_error() {
        assert!(Request::from_value(&json!([1, 2, 3])).is_err());
        assert!(Request::decode(b"{not json").is_err());
    }

    #[test]
    fn test_empty_payload_is_unsupported() {
        let req = Request::decode(b"  ").unwrap();
        assert_eq!(req, Request::Unsupported { rpc: None });
    }

    #[test]
    fn test_evaluate_response_shape() {
        let resp = call(json!({
            "rpc": "Evaluate",
            "prev": "ABSENT",
            "kfs": {"m_cbd": 0.7, "m_cgt": 0.8, "m_nhy": 0.6}
        }));
        assert_eq!(resp["ok"], true);
        assert_eq!(resp["omega"], "TRUSTED");
        assert_eq!(resp["next"], "TRUSTED");
        assert_eq!(resp["prev"], "ABSENT");
        assert_eq!(resp["m_cbd"], 0.7);
        assert_eq!(resp["reasons"][0], "seeded[signal>0]");
    }

    #[test]
    fn test_promote_response_shape() {
        let resp = call(json!({
            "rpc": "Promote",
            "kfs": {"m_cbd": 0.7, "m_cgt": 0.8, "m_nhy": 0.6}
        }));
        assert_eq!(resp["ok"], true);
        assert_eq!(resp["omega"], "TRUSTED");
        assert_eq!(resp["prev"], "ABSENT");
        assert_eq!(resp["repair"], json!(["validate_delivery_signal[m_nhy<0.80]"]));
        assert!(resp.get("reasons").is_none());
    }

    #[test]
    fn test_world_weighting_response_shape() {
        let resp = call(json!({
            "rpc": "WorldWeighting",
            "strategy": "degree",
            "edges": [["B", "C"], ["A", "B"]]
        }));
        assert_eq!(resp["ok"], true);
        assert_eq!(resp["w_model"], "degree");
        assert_eq!(
            resp["worlds"],
            json!([{"id": "A", "w": 0.25}, {"id": "B", "w": 0.5}, {"id": "C", "w": 0.25}])
        );
    }

    #[test]
    fn test_unsupported_rpc_lists_supported() {
        let resp = call(json!({"rpc": "Delete"}));
        assert_eq!(resp["ok"], false);
        assert_eq!(resp["supported"], json!(["Evaluate", "Promote", "WorldWeighting"]));
        assert!(resp["error"].as_str().unwrap().contains("Delete"));
    }

    #[test]
    fn test_non_string_rpc_is_not_reported_missing() {
        let resp = call(json!({"rpc": 5}));
        assert_eq!(resp["ok"], false);
        let error = resp["error"].as_str().unwrap();
        assert!(!error.contains("missing"), "{}", error);
        assert!(error.contains('5'), "{}", error);
        assert_eq!(resp["supported"], json!(["Evaluate", "Promote", "WorldWeighting"]));

        let resp = call(json!({"prev": "ABSENT"}));
        assert!(resp["error"].as_str().unwrap().contains("missing"));
    }

    #[test]
    fn test_decode_failure_envelope() {
        let engine = PromotionEngine::new();
        let resp = handle_bytes(&engine, b"{\"rpc\": ");
        assert!(!resp.is_ok());
        let json = serde_json::to_value(resp).unwrap();
        assert_eq!(json["ok"], false);
        assert!(json["error"].as_str().unwrap().starts_with("malformed envelope"));
        assert!(json.get("supported").is_none());
    }
}
