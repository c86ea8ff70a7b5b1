//! MedSim Headless Simulation Harness
//!
//! Drives the clinical tables and engines end to end and checks their
//! invariants. Runs entirely in-process: no UI, no persistence.
//!
//! Usage:
//!   cargo run -p medsim-simtest
//!   cargo run -p medsim-simtest -- --verbose
//!   cargo run -p medsim-simtest -- --config sim.json --seed 42
//!
//! Set `RUST_LOG=debug` to watch patient events as they happen.

use clap::Parser;
use medsim_core::disease::DiseaseProgressionEngine;
use medsim_core::engine::{ContinuousSimulationEngine, SimulationMetrics, SimulationState};
use medsim_core::error::CallbackError;
use medsim_core::events::SimulationEvent;
use medsim_core::evolution::PatientStateEvolutionEngine;
use medsim_core::interventions::{InterventionManager, OrderRequest, OrderStatus};
use medsim_core::queue::PatientQueueManager;
use medsim_logic::config::{self, QueueConfig, SimulationConfig};
use medsim_logic::disease::{self as table, DiseaseStage};
use medsim_logic::interventions;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Simulated hours covered by the stepped scheduler run.
const SCHEDULER_HOURS: f64 = 24.0;

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

impl TestResult {
    fn check(name: &str, passed: bool, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed,
            detail: detail.into(),
        }
    }
}

/// Command-line options for the harness
#[derive(Parser, Debug)]
#[command(name = "medsim-simtest")]
#[command(about = "Headless MedSim simulation harness")]
struct Options {
    /// Print every check, not only failures
    #[arg(long)]
    verbose: bool,
    /// JSON simulation config; missing sections use defaults
    #[arg(long = "config", value_name = "PATH")]
    config_path: Option<String>,
    /// Seed overriding the config's
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let options = Options::parse();
    println!("=== MedSim Simulation Harness ===\n");

    let mut results = Vec::new();

    // 1. Configuration
    let config = match load_config(&options, &mut results) {
        Some(config) => config,
        None => SimulationConfig::default(),
    };
    let seed = config.seed.unwrap_or(42);

    // 2. Disease progression sweep
    results.extend(validate_disease_progression(seed, options.verbose));

    // 3. Intervention catalog
    results.extend(validate_interventions(seed, options.verbose));

    // 4. Organ evolution
    results.extend(validate_evolution(&config, seed, options.verbose));

    // 5. Admission queue
    results.extend(validate_queue(seed, options.verbose));

    // 6. Stepped scheduler run
    results.extend(validate_scheduler(&config, seed, options.verbose));

    // 7. Threaded lifecycle
    results.extend(validate_threaded_lifecycle(&config, seed));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.len() - passed;

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || options.verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!("\n=== RESULT: {}/{} passed, {} failed ===", passed, results.len(), failed);

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── 1. Configuration ────────────────────────────────────────────────────

fn load_config(options: &Options, results: &mut Vec<TestResult>) -> Option<SimulationConfig> {
    println!("--- Configuration ---");
    let mut config = match &options.config_path {
        None => SimulationConfig::default(),
        Some(path) => {
            let parsed = std::fs::read_to_string(path)
                .map_err(|e| e.to_string())
                .and_then(|text| serde_json::from_str::<SimulationConfig>(&text).map_err(|e| e.to_string()));
            match parsed {
                Ok(config) => config,
                Err(e) => {
                    results.push(TestResult::check("config_parse", false, format!("{path}: {e}")));
                    return None;
                }
            }
        }
    };
    if options.seed.is_some() {
        config.seed = options.seed;
    }

    let errors = config::validate_config(&config);
    results.push(TestResult::check(
        "config_valid",
        errors.is_empty(),
        if errors.is_empty() {
            format!(
                "capacity {}, {} providers, {:.1} arrivals/h",
                config.queue.max_simultaneous_patients,
                config.scheduler.providers.len(),
                config.scheduler.arrival_rate_per_hour
            )
        } else {
            errors.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
        },
    ));
    errors.is_empty().then_some(config)
}

// ── 2. Disease Progression ──────────────────────────────────────────────

fn validate_disease_progression(seed: u64, verbose: bool) -> Vec<TestResult> {
    println!("--- Disease Progression ---");
    let mut results = Vec::new();
    let mut engine = DiseaseProgressionEngine::new(Some(seed));

    let mut out_of_range = Vec::new();
    let mut regressed = Vec::new();
    let mut final_stages = BTreeMap::new();

    for (i, name) in table::staged_diseases().enumerate() {
        let patient = format!("D{i:03}");
        if engine.initialize_patient_disease(&patient, name, 0.0, 0.0).is_err() {
            out_of_range.push(format!("{name} (not loadable)"));
            continue;
        }
        let mut previous = DiseaseStage::Latent;
        for _ in 0..96 {
            let Some(state) = engine.progress_disease(&patient, name, 0.5) else {
                break;
            };
            if !(0.0..=1.0).contains(&state.severity) {
                out_of_range.push(format!("{name} severity {:.3}", state.severity));
            }
            if state.stage < previous {
                regressed.push(name.to_string());
            }
            previous = state.stage;
        }
        final_stages.insert(name, previous);
        if verbose {
            println!("  {name}: {previous:?} after 48h");
        }
    }

    results.push(TestResult::check(
        "disease_severity_bounded",
        out_of_range.is_empty(),
        if out_of_range.is_empty() {
            format!("{} diseases progressed 48h", final_stages.len())
        } else {
            out_of_range.join(", ")
        },
    ));
    results.push(TestResult::check(
        "disease_staging_monotonic",
        regressed.is_empty(),
        if regressed.is_empty() {
            "no untreated disease moved backwards".to_string()
        } else {
            format!("regressed: {}", regressed.join(", "))
        },
    ));

    let acs = final_stages.get("acute_coronary_syndrome").copied();
    results.push(TestResult::check(
        "acs_reaches_critical",
        acs == Some(DiseaseStage::Critical),
        format!("acute_coronary_syndrome at 48h: {acs:?}"),
    ));

    let unknown = engine.initialize_patient_disease("X", "not_a_disease", 0.0, 0.0);
    results.push(TestResult::check(
        "unknown_disease_rejected",
        unknown.is_err(),
        "unknown disease names return an error",
    ));
    results
}

// ── 3. Interventions ────────────────────────────────────────────────────

fn validate_interventions(seed: u64, verbose: bool) -> Vec<TestResult> {
    println!("--- Interventions ---");
    let mut results = Vec::new();
    let mut manager = InterventionManager::new(Some(seed));

    let catalog = interventions::catalog();
    let mut unplaced = Vec::new();
    for def in catalog {
        if manager.order_intervention(OrderRequest::new(def.name), 1.0).is_err() {
            unplaced.push(def.name);
        }
    }
    results.push(TestResult::check(
        "catalog_orderable",
        unplaced.is_empty(),
        if unplaced.is_empty() {
            format!("{} interventions ordered", catalog.len())
        } else {
            format!("failed: {}", unplaced.join(", "))
        },
    ));

    let executed = manager.execute_due_interventions(1.0);
    let left_open = manager.all_orders().iter().filter(|o| o.status.is_open()).count();
    let completed = executed.iter().filter(|o| o.status == OrderStatus::Completed).count();
    results.push(TestResult::check(
        "due_orders_reach_terminal_status",
        left_open == 0 && executed.len() == catalog.len(),
        format!("{completed}/{} completed, {left_open} left open", executed.len()),
    ));

    let finished_in_order = executed
        .iter()
        .filter_map(|o| o.completed_time.map(|t| (t, o.executed_time)))
        .all(|(done, started)| started.is_some_and(|s| done >= s));
    results.push(TestResult::check(
        "completion_after_execution",
        finished_in_order,
        "completed_time never precedes executed_time",
    ));

    if verbose {
        for (event, count) in manager.adverse_events_summary() {
            println!("  adverse {}: {count}", event.name());
        }
    }
    results
}

// ── 4. Organ Evolution ──────────────────────────────────────────────────

fn validate_evolution(config: &SimulationConfig, seed: u64, verbose: bool) -> Vec<TestResult> {
    println!("--- Organ Evolution ---");
    let mut results = Vec::new();
    let mut diseases = DiseaseProgressionEngine::new(Some(seed));
    let mut evolution = PatientStateEvolutionEngine::new(&config.evolution, Some(seed));

    let mut violations = Vec::new();
    let mut steps = 0;
    for (i, name) in table::staged_diseases().enumerate() {
        let patient = format!("E{i:03}");
        let Ok(disease) = diseases.initialize_patient_disease(&patient, name, 0.0, 0.0) else {
            continue;
        };
        let mut state = evolution.initialize_patient_state(vec![disease], None, 0.0);
        for step in 0..48 {
            let applied: &[&str] = if step % 6 == 0 { &["vasopressor", "oxygen_therapy"] } else { &[] };
            state = evolution.evolve(&state, 1.0, applied);
            steps += 1;
            if state.organ_systems.values().any(|o| !(0.0..=1.0).contains(&o.function_score)) {
                violations.push(format!("{name}: organ score"));
                break;
            }
            if !state.vitals.within_limits() {
                violations.push(format!("{name}: vitals"));
                break;
            }
        }
        if verbose {
            let worst = state
                .organ_systems
                .iter()
                .min_by(|a, b| a.1.function_score.total_cmp(&b.1.function_score))
                .map(|(organ, o)| format!("{} {:.2}", organ.name(), o.function_score))
                .unwrap_or_default();
            println!("  {name}: worst organ {worst}");
        }
    }

    results.push(TestResult::check(
        "organ_scores_and_vitals_bounded",
        violations.is_empty(),
        if violations.is_empty() {
            format!("{steps} evolution steps within limits")
        } else {
            violations.join(", ")
        },
    ));
    results
}

// ── 5. Admission Queue ──────────────────────────────────────────────────

fn validate_queue(seed: u64, verbose: bool) -> Vec<TestResult> {
    println!("--- Admission Queue ---");
    let mut results = Vec::new();
    let mut diseases = DiseaseProgressionEngine::new(Some(seed));
    let config = QueueConfig {
        max_simultaneous_patients: 3,
    };
    let mut queue = PatientQueueManager::new(&config, Some(seed), 0.0);

    let mut generation_errors = 0;
    for _ in 0..5 {
        match queue.generate_new_patient(0.0, &mut diseases) {
            Ok(item) => {
                if verbose {
                    println!(
                        "  {} priority {:.2} {} {}",
                        item.patient_id,
                        item.priority_score,
                        item.complexity.name(),
                        item.specialty.name()
                    );
                }
                queue.add_patient_to_queue(item);
            }
            Err(e) => {
                log::warn!("generation failed: {e}");
                generation_errors += 1;
            }
        }
    }
    results.push(TestResult::check(
        "queue_generation",
        generation_errors == 0 && queue.waiting_patients().len() == 5,
        format!("{} waiting", queue.waiting_patients().len()),
    ));

    let mut admitted = 0;
    for provider in ["Dr. A", "Dr. B", "Dr. C", "Dr. D"] {
        let Some(next) = queue.get_next_patient().map(str::to_string) else {
            break;
        };
        if queue.try_activate_patient(&next, provider, 0.1) {
            admitted += 1;
        }
    }
    results.push(TestResult::check(
        "queue_capacity_enforced",
        admitted == 3 && queue.active_patients().len() == 3 && !queue.can_accept_new_patient(),
        format!("{admitted} admitted, {} still waiting", queue.waiting_patients().len()),
    ));
    results
}

// ── 6. Scheduler ────────────────────────────────────────────────────────

fn validate_scheduler(config: &SimulationConfig, seed: u64, verbose: bool) -> Vec<TestResult> {
    println!("--- Scheduler ---");
    let mut results = Vec::new();
    let mut config = config.clone();
    config.seed = Some(seed);

    let mut engine = match ContinuousSimulationEngine::new(config.clone()) {
        Ok(engine) => engine,
        Err(e) => {
            results.push(TestResult::check("scheduler_create", false, e.to_string()));
            return results;
        }
    };

    let counts: Arc<Mutex<BTreeMap<&'static str, usize>>> = Arc::default();
    let sink = Arc::clone(&counts);
    engine.add_event_callback(Box::new(move |event: &SimulationEvent| -> Result<(), CallbackError> {
        let mut counts = sink.lock().map_err(|_| CallbackError::new("event counter poisoned"))?;
        *counts.entry(event.kind_name()).or_insert(0) += 1;
        Ok(())
    }));
    let last_metrics: Arc<Mutex<Option<SimulationMetrics>>> = Arc::default();
    let metrics_sink = Arc::clone(&last_metrics);
    engine.add_metrics_callback(Box::new(move |metrics: &SimulationMetrics| -> Result<(), CallbackError> {
        let mut slot = metrics_sink
            .lock()
            .map_err(|_| CallbackError::new("metrics slot poisoned"))?;
        *slot = Some(metrics.clone());
        Ok(())
    }));

    let ticks = (SCHEDULER_HOURS / config.scheduler.tick_hours()).ceil() as usize;
    let capacity = engine.max_simultaneous_patients();
    let mut over_capacity = 0;
    let mut step_errors = 0;
    for _ in 0..ticks {
        if engine.step().is_err() {
            step_errors += 1;
        }
        if engine.active_patients().len() > capacity {
            over_capacity += 1;
        }
    }

    let status = engine.simulation_status();
    results.push(TestResult::check(
        "scheduler_steps",
        step_errors == 0 && status.current_time >= SCHEDULER_HOURS - 1e-6,
        format!("{ticks} ticks, t={:.2}h, {} events", status.current_time, status.total_events),
    ));
    results.push(TestResult::check(
        "scheduler_capacity",
        over_capacity == 0,
        format!("{over_capacity} ticks over capacity {capacity}"),
    ));

    let counts = counts.lock().map(|c| c.clone()).unwrap_or_default();
    let arrivals = counts.get("patient_arrival").copied().unwrap_or(0);
    results.push(TestResult::check(
        "scheduler_arrivals",
        arrivals > 0,
        format!("{counts:?}"),
    ));

    let providers_accounted = status.available_providers.len() + status.queue.active_count
        == config.scheduler.providers.len();
    results.push(TestResult::check(
        "scheduler_providers_accounted",
        providers_accounted,
        format!(
            "{} free, {} busy",
            status.available_providers.len(),
            status.queue.active_count
        ),
    ));

    let metrics_seen = last_metrics.lock().map(|m| m.clone()).unwrap_or_default();
    results.push(TestResult::check(
        "scheduler_metrics_published",
        metrics_seen.as_ref() == Some(&status.metrics),
        format!(
            "{} processed, avg wait {:.2}h",
            status.metrics.total_patients_processed, status.metrics.average_wait_hours
        ),
    ));

    if verbose {
        for event in engine.recent_events(10) {
            println!("  [t={:.2}h] {}", event.timestamp, event.description);
        }
    }
    results
}

// ── 7. Threaded Lifecycle ───────────────────────────────────────────────

fn validate_threaded_lifecycle(config: &SimulationConfig, seed: u64) -> Vec<TestResult> {
    println!("--- Threaded Lifecycle ---");
    let mut results = Vec::new();
    let mut config = config.clone();
    config.seed = Some(seed);
    config.scheduler.sleep_ms = 1;

    let mut engine = match ContinuousSimulationEngine::new(config) {
        Ok(engine) => engine,
        Err(e) => {
            results.push(TestResult::check("lifecycle_create", false, e.to_string()));
            return results;
        }
    };

    let started = engine.start(Some(SCHEDULER_HOURS)).is_ok();
    std::thread::sleep(Duration::from_millis(30));
    let paused = engine.pause();
    let paused_at = engine.current_time();
    std::thread::sleep(Duration::from_millis(20));
    let held = engine.current_time() == paused_at;
    let resumed = engine.resume();

    let begin = Instant::now();
    engine.stop();
    let stop_time = begin.elapsed();

    results.push(TestResult::check(
        "lifecycle_transitions",
        started && paused && resumed && engine.state() == SimulationState::Stopped,
        format!("start {started}, pause {paused}, resume {resumed}"),
    ));
    results.push(TestResult::check(
        "lifecycle_pause_holds_time",
        held,
        format!("paused at t={paused_at:.3}h"),
    ));
    results.push(TestResult::check(
        "lifecycle_stop_bounded",
        stop_time < Duration::from_secs(3),
        format!("stopped in {stop_time:?}"),
    ));
    results.push(TestResult::check(
        "lifecycle_stop_is_terminal",
        engine.start(None).is_err() && engine.step().is_err(),
        "start and step refused after stop",
    ));
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valued_flags_parse() {
        let options =
            Options::try_parse_from(["medsim-simtest", "--verbose", "--config", "sim.json", "--seed", "7"]).unwrap();
        assert!(options.verbose);
        assert_eq!(options.config_path.as_deref(), Some("sim.json"));
        assert_eq!(options.seed, Some(7));
    }

    #[test]
    fn test_bad_values_rejected() {
        assert!(Options::try_parse_from(["medsim-simtest", "--seed", "abc"]).is_err());
        assert!(Options::try_parse_from(["medsim-simtest", "--seed", "-1"]).is_err());
        assert!(Options::try_parse_from(["medsim-simtest", "--config"]).is_err());
        assert!(Options::try_parse_from(["medsim-simtest", "--fast"]).is_err());
    }
}
