//! HDT Omega CLI
//!
//! Usage:
//!   hdt-omega evaluate --cbd 0.7 --cgt 0.8 --nhy 0.6        # One evaluation
//!   hdt-omega evaluate --prev LINKED --cgt 0.9 --repair     # With repair hints
//!   hdt-omega weights --edge A:B --edge B:C                 # World weights
//!   hdt-omega serve --socket /tmp/devine_intel.sock         # Local RPC shim
//!   hdt-omega call '{"rpc":"Evaluate","kfs":{"m_cbd":0.7}}' # Talk to the shim
//!   hdt-omega pathflows scenarios.yaml --out report.json    # Scenario runner
//!   hdt-omega lookup Consent                                # IEML label

use clap::{Parser, Subcommand};
use colored::{Color, Colorize};
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{error, info, warn};

use hdt_omega::config::Config;
use hdt_omega::core::{ieml, pathflow, world_weights, PromotionEngine, ShimClient, ShimServer};
use hdt_omega::types::{EvaluationResult, MembershipScores, OmegaState, WorldEdge};
use hdt_omega::VERSION;

#[derive(Parser, Debug)]
#[command(
    name = "hdt-omega",
    version = VERSION,
    about = "Omega readiness lattice - promote artifacts from membership scores",
    long_about = "Reduces continuous membership scores (0..1) to a discrete readiness state.\n\n\
                  States (lowest first):\n  \
                  ABSENT → SEEDED → NORMALIZED → LINKED → TRUSTED → ACTIONABLE → DELIVERED\n\n\
                  Axes:\n  \
                  m_cbd  coherence/boundedness\n  \
                  m_cgt  consent/governance/trust\n  \
                  m_nhy  delivery/usefulness"
)]
struct Cli {
    /// TOML config file (thresholds, shim settings)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Disable colors in output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate one set of scores
    Evaluate {
        /// Previous state label (unknown labels count as ABSENT)
        #[arg(long, default_value = "ABSENT")]
        prev: String,
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        cbd: f64,
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        cgt: f64,
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        nhy: f64,
        /// Include advisory repair hints
        #[arg(long)]
        repair: bool,
        /// JSON output
        #[arg(long)]
        json: bool,
        /// Explain each promotion with its concept label
        #[arg(long)]
        verbose: bool,
    },

    /// Compute world weights from an edge list
    Weights {
        /// degree | empirical
        #[arg(long, default_value = "degree")]
        strategy: String,
        /// Edge as FROM:TO (repeatable)
        #[arg(long = "edge")]
        edges: Vec<String>,
        /// Reliability hint as WORLD=R (repeatable)
        #[arg(long = "reliability")]
        reliability: Vec<String>,
        /// JSON output
        #[arg(long)]
        json: bool,
    },

    /// Run the local RPC shim
    Serve {
        /// Socket path (overrides config)
        #[arg(long)]
        socket: Option<PathBuf>,
    },

    /// Send one raw JSON request to a running shim
    Call {
        /// Request body
        request: String,
        /// Socket path (overrides config)
        #[arg(long)]
        socket: Option<PathBuf>,
    },

    /// Run pathflow scenarios and write a report
    Pathflows {
        /// YAML scenario file
        scenarios: PathBuf,
        /// Report destination
        #[arg(long, default_value = "report.json")]
        out: PathBuf,
    },

    /// Look up the IEML label of a concept
    Lookup {
        /// Concept name (omit to list all)
        concept: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("hdt_omega=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if cli.no_color {
        colored::control::set_override(false);
    }

    if let Err(e) = run(cli).await {
        error!("{}", e);
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default(cli.config.as_deref())?;
    let engine = PromotionEngine::with_thresholds(config.thresholds.clone());

    match cli.command {
        Command::Evaluate { prev, cbd, cgt, nhy, repair, json, verbose } => {
            let scores = MembershipScores::new(cbd, cgt, nhy);
            let result = engine.evaluate(&scores, &prev);
            let hints = if repair { engine.repair_plan(&scores) } else { Vec::new() };
            if json {
                print_json_evaluation(&result, repair.then_some(&hints))?;
            } else {
                print_evaluation(&engine, &result, verbose);
                for hint in &hints {
                    println!("  {} {}", "repair:".yellow(), hint);
                }
            }
        }

        Command::Weights { strategy, edges, reliability, json } => {
            let edges = parse_edges(&edges)?;
            let reliability = parse_reliability(&reliability)?;
            let weights = world_weights::world_weights(&strategy, &edges, &reliability);
            let worlds = world_weights::to_world_list(&weights);
            if json {
                let out = serde_json::json!({ "w_model": strategy, "worlds": worlds });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else if worlds.is_empty() {
                println!("{}", format!("no weighting available (strategy '{}')", strategy).dimmed());
            } else {
                for world in worlds {
                    println!("{:<16} {:.4}", world.id, world.w);
                }
            }
        }

        Command::Serve { socket } => {
            let mut shim = config.shim.clone();
            if let Some(path) = socket {
                shim.socket_path = path;
            }
            info!(version = VERSION, thresholds = %engine.thresholds().fingerprint(), "starting omega shim");
            let server = ShimServer::new(shim, engine);
            server
                .run_until(async {
                    if let Err(e) = tokio::signal::ctrl_c().await {
                        warn!(error = %e, "failed to listen for ctrl-c");
                    }
                })
                .await?;
        }

        Command::Call { request, socket } => {
            let path = socket.unwrap_or(config.shim.socket_path);
            let response = ShimClient::new(path).call_raw(request.as_bytes()).await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }

        Command::Pathflows { scenarios, out } => {
            let scenarios = pathflow::load_scenarios(&scenarios)?;
            let report = pathflow::run_all(&engine, &scenarios);
            pathflow::write_report(&report, &out)?;
            for (name, outcome) in &report.scenarios {
                let mark = match outcome.matched {
                    Some(true) => "✓".green(),
                    Some(false) => "✗".red(),
                    None => "·".normal(),
                };
                println!(
                    "{} {:<24} {} in {} step(s)",
                    mark,
                    name,
                    paint(outcome.omega),
                    outcome.steps
                );
            }
            println!("{}", format!("report written to {}", out.display()).dimmed());
        }

        Command::Lookup { concept } => match concept {
            Some(c) => println!("{}", ieml::lookup(&c)),
            None => {
                for (name, label) in ieml::concepts() {
                    println!("{:<12} {}", name, label);
                }
            }
        },
    }
    Ok(())
}

/// Parse FROM:TO edges
fn parse_edges(raw: &[String]) -> Result<Vec<WorldEdge>, String> {
    raw.iter()
        .map(|e| match e.split_once(':') {
            Some((u, v)) if !u.is_empty() && !v.is_empty() => Ok((u.to_string(), v.to_string())),
            _ => Err(format!("edge '{}' must look like FROM:TO", e)),
        })
        .collect()
}

/// Parse WORLD=R reliability hints
fn parse_reliability(raw: &[String]) -> Result<HashMap<String, f64>, String> {
    raw.iter()
        .map(|r| {
            let (world, value) = r
                .split_once('=')
                .ok_or_else(|| format!("reliability '{}' must look like WORLD=R", r))?;
            let value: f64 = value
                .parse()
                .map_err(|_| format!("reliability '{}' is not a number", r))?;
            Ok((world.to_string(), value))
        })
        .collect()
}

fn state_color(state: OmegaState) -> Color {
    match state {
        OmegaState::Absent => Color::BrightBlack,
        OmegaState::Seeded | OmegaState::Normalized => Color::Yellow,
        OmegaState::Linked | OmegaState::Trusted => Color::Cyan,
        OmegaState::Actionable => Color::Blue,
        OmegaState::Delivered => Color::Green,
    }
}

fn paint(state: OmegaState) -> colored::ColoredString {
    state.label().color(state_color(state)).bold()
}

fn print_evaluation(engine: &PromotionEngine, result: &EvaluationResult, verbose: bool) {
    println!(
        "{} → {} | cbd={:.3} cgt={:.3} nhy={:.3}",
        paint(result.prev),
        paint(result.next),
        result.scores.m_cbd,
        result.scores.m_cgt,
        result.scores.m_nhy
    );

    if verbose {
        for rule in engine.fired_rules(result) {
            println!(
                "  {} {:<24} [{} {}] {}",
                "↑".green(),
                rule.reason(engine.thresholds()),
                rule.concept(),
                ieml::lookup(rule.concept()),
                rule.description().dimmed()
            );
        }
        if !result.promoted() {
            println!("  {}", "no promotion".dimmed());
        }
    } else if !result.reasons.is_empty() {
        println!("  {}", result.reasons.join(", ").dimmed());
    }
}

fn print_json_evaluation(
    result: &EvaluationResult,
    repair: Option<&Vec<String>>,
) -> Result<(), serde_json::Error> {
    let mut out = serde_json::to_value(result)?;
    if let (Some(hints), Some(obj)) = (repair, out.as_object_mut()) {
        obj.insert("repair".to_string(), serde_json::to_value(hints)?);
    }
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
