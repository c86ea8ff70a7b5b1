//! Integration tests across the simulation engines.
//!
//! Exercises: DynamicPatientLoader → PatientQueueManager → DiseaseProgressionEngine
//! → PatientStateEvolutionEngine → InterventionInterface → ContinuousSimulationEngine

use medsim_core::disease::{DiseaseProgressionEngine, DiseaseState};
use medsim_core::engine::{ContinuousSimulationEngine, SimulationState};
use medsim_core::events::{SimulationEvent, SimulationEventKind};
use medsim_core::evolution::{PatientState, PatientStateEvolutionEngine};
use medsim_core::interventions::{InterventionInterface, InterventionOrder, OrderRequest, OrderStatus};
use medsim_core::queue::PatientQueueManager;
use medsim_logic::adverse::AdverseEventType;
use medsim_logic::config::{EvolutionConfig, QueueConfig, SimulationConfig};
use medsim_logic::disease::DiseaseStage;
use medsim_logic::interventions::OrderPriority;
use medsim_logic::organs::OrganSystem;
use medsim_logic::vitals::VitalJitter;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// ── Helpers ────────────────────────────────────────────────────────────

fn quiet_evolution(seed: u64) -> PatientStateEvolutionEngine {
    let config = EvolutionConfig {
        jitter: VitalJitter::none(),
    };
    PatientStateEvolutionEngine::new(&config, Some(seed))
}

fn seeded_config(seed: u64) -> SimulationConfig {
    let mut config = SimulationConfig {
        seed: Some(seed),
        ..SimulationConfig::default()
    };
    config.scheduler.sleep_ms = 1;
    config.scheduler.arrival_rate_per_hour = 10.0;
    config.scheduler.time_acceleration = 10.0;
    config
}

fn admitted_patient(seed: u64) -> PatientState {
    let diseases = vec![
        DiseaseState::diagnose("sepsis", 0.0, 10.0).unwrap(),
        DiseaseState::diagnose("pneumonia", 0.0, 10.0).unwrap(),
    ];
    quiet_evolution(seed).initialize_patient_state(diseases, None, 10.0)
}

fn sick_patient(seed: u64) -> PatientState {
    let state = admitted_patient(seed);
    quiet_evolution(seed).evolve(&state, 2.0, &[])
}

// ── Disease invariants ─────────────────────────────────────────────────

#[test]
fn severity_stays_bounded_under_mixed_calls() {
    let mut engine = DiseaseProgressionEngine::new(Some(11));
    let mut rng = StdRng::seed_from_u64(11);
    let diseases = ["acute_coronary_syndrome", "sepsis", "pneumonia", "stroke"];
    for (i, disease) in diseases.iter().enumerate() {
        engine
            .initialize_patient_disease("P001", disease, -(i as f64), 0.0)
            .unwrap();
    }

    let mut now = 0.0;
    for _ in 0..200 {
        if rng.gen_bool(0.3) {
            let treatment = ["aspirin", "antibiotics", "tpa", "nitroglycerin"][rng.gen_range(0..4)];
            engine
                .administer_treatment("P001", treatment, None, None, now)
                .unwrap();
        } else {
            let dt = rng.gen_range(0.0..3.0);
            now += dt;
            engine.progress_patient("P001", dt);
        }
        for state in engine.patient_diseases("P001") {
            assert!((0.0..=1.0).contains(&state.severity), "{}: {}", state.disease, state.severity);
        }
    }
}

#[test]
fn acs_untreated_for_six_hours_is_critical() {
    let mut engine = DiseaseProgressionEngine::new(Some(3));
    engine
        .initialize_patient_disease("P001", "acute_coronary_syndrome", 0.0, 0.0)
        .unwrap();
    let mut previous = DiseaseStage::Latent;
    for _ in 0..12 {
        let state = engine
            .progress_disease("P001", "acute_coronary_syndrome", 0.5)
            .unwrap();
        assert!(state.stage >= previous);
        previous = state.stage;
    }
    let state = engine.disease_state("P001", "acute_coronary_syndrome").unwrap();
    assert_eq!(state.stage, DiseaseStage::Critical);
    assert!(state.severity >= 0.8 - 1e-9);
}

#[test]
fn complications_registered_once_per_patient() {
    let mut engine = DiseaseProgressionEngine::new(Some(5));
    engine.initialize_patient_disease("P001", "sepsis", -8.0, 0.0).unwrap();
    engine.initialize_patient_disease("P001", "pneumonia", -8.0, 0.0).unwrap();
    assert!(engine.develop_complication("P001", "respiratory_failure", "sepsis"));
    assert!(!engine.develop_complication("P001", "respiratory_failure", "sepsis"));
    assert!(!engine.develop_complication("P001", "respiratory_failure", "pneumonia"));
    let count = engine
        .patient_complications("P001")
        .iter()
        .filter(|c| c.name == "respiratory_failure")
        .count();
    assert_eq!(count, 1);
}

// ── Organ evolution ────────────────────────────────────────────────────

#[test]
fn organ_scores_bounded_for_any_step() {
    let mut engine = quiet_evolution(8);
    let mut state = sick_patient(8);
    let steps = [0.0, 0.01, 1.0, 6.0, 48.0];
    let orders: [&[&str]; 3] = [&[], &["vasopressor", "antibiotic"], &["sedative", "diuretic", "mechanical_ventilation"]];
    for (i, dt) in steps.iter().enumerate() {
        state = engine.evolve(&state, *dt, orders[i % orders.len()]);
        for (organ, o) in &state.organ_systems {
            assert!((0.0..=1.0).contains(&o.function_score), "{organ:?} out of range");
        }
        assert!(state.vitals.within_limits());
    }
}

#[test]
fn respiratory_dysfunction_lowers_saturation_by_twelve() {
    let mut engine = quiet_evolution(2);
    let mut state = engine.initialize_patient_state(Vec::new(), None, 0.0);
    state.set_function_score(OrganSystem::Respiratory, 0.2);
    let baseline = state.baseline_vitals.oxygen_saturation;
    let next = engine.evolve(&state, 0.25, &[]);
    let expected = (baseline - 12.0).clamp(70.0, 100.0);
    assert!((next.vitals.oxygen_saturation - expected).abs() < 1e-9);
}

// ── Admission queue ────────────────────────────────────────────────────

#[test]
fn queue_capacity_guard_with_five_patients() {
    let mut diseases = DiseaseProgressionEngine::new(Some(21));
    let config = QueueConfig {
        max_simultaneous_patients: 3,
    };
    let mut queue = PatientQueueManager::new(&config, Some(21), 0.0);
    for _ in 0..5 {
        let item = queue.generate_new_patient(0.0, &mut diseases).unwrap();
        queue.add_patient_to_queue(item);
    }
    assert_eq!(queue.waiting_patients().len(), 5);

    for provider in ["Dr. A", "Dr. B", "Dr. C"] {
        let next = queue.get_next_patient().unwrap().to_string();
        assert!(queue.can_accept_new_patient());
        assert!(queue.activate_patient(&next, provider, 0.1));
    }
    assert_eq!(queue.active_patients().len(), 3);
    assert!(!queue.can_accept_new_patient());

    let fourth = queue.get_next_patient().unwrap().to_string();
    assert!(!queue.try_activate_patient(&fourth, "Dr. D", 0.2));
    assert_eq!(queue.active_patients().len(), 3);
    assert_eq!(queue.waiting_patients().len(), 2);
}

// ── Interventions ──────────────────────────────────────────────────────

#[test]
fn urgent_vasopressor_never_left_open() {
    let engine = quiet_evolution(4);
    let state = engine.initialize_patient_state(Vec::new(), None, 0.0);
    let mut iface = InterventionInterface::new(Some(4));

    let response = iface.request_intervention(
        OrderRequest::new("vasopressor").with_priority(OrderPriority::Urgent),
        &state,
        1.0,
    );
    assert!(response.success, "{}", response.message);
    let order = response.order.unwrap();
    assert!(order.scheduled_time <= 1.0);

    let executed = iface.execute_due(1.0);
    assert_eq!(executed.len(), 1);
    assert!(matches!(executed[0].status, OrderStatus::Completed | OrderStatus::Failed));
    assert!(iface.active_orders().is_empty());
}

#[test]
fn completed_orders_feed_evolution() {
    let mut engine = quiet_evolution(6);
    let mut iface = InterventionInterface::new(Some(6));
    let state = admitted_patient(6);

    for name in ["antibiotic", "oxygen_therapy", "cbc"] {
        let response = iface.request_intervention(OrderRequest::new(name), &state, 12.0);
        assert!(response.success, "{name}: {}", response.message);
    }
    let applied: Vec<String> = iface
        .execute_due(12.0)
        .into_iter()
        .filter(|o| o.status == OrderStatus::Completed)
        .map(|o| o.name)
        .collect();
    let applied: Vec<&str> = applied.iter().map(String::as_str).collect();
    let next = engine.evolve(&state, 0.5, &applied);
    for name in &applied {
        assert!(next.interventions.iter().any(|i| i == name));
    }
}

// ── Serialization boundary ─────────────────────────────────────────────

#[test]
fn persisted_types_roundtrip_json_and_bincode() {
    let state = sick_patient(9);
    let json = serde_json::to_string(&state).unwrap();
    assert_eq!(serde_json::from_str::<PatientState>(&json).unwrap(), state);
    let bytes = bincode::serialize(&state).unwrap();
    assert_eq!(bincode::deserialize::<PatientState>(&bytes).unwrap(), state);

    let disease = state.disease_states[0].clone();
    let bytes = bincode::serialize(&disease).unwrap();
    assert_eq!(bincode::deserialize::<DiseaseState>(&bytes).unwrap(), disease);

    let mut iface = InterventionInterface::new(Some(9));
    iface.request_intervention(OrderRequest::new("troponin"), &state, 12.0);
    let order = iface.execute_due(12.0).remove(0);
    let json = serde_json::to_string(&order).unwrap();
    assert_eq!(serde_json::from_str::<InterventionOrder>(&json).unwrap(), order);
    let bytes = bincode::serialize(&order).unwrap();
    assert_eq!(bincode::deserialize::<InterventionOrder>(&bytes).unwrap(), order);

    let event = SimulationEvent::adverse_events(12.0, "P001", vec![AdverseEventType::Hypotension]);
    let bytes = bincode::serialize(&event).unwrap();
    assert_eq!(bincode::deserialize::<SimulationEvent>(&bytes).unwrap(), event);
}

#[test]
fn json_keeps_every_float_bit() {
    let mut disease = DiseaseState::diagnose("pneumonia", 0.0, 10.0).unwrap();
    disease.severity = 0.15 * 3.0;
    assert_ne!(disease.severity, 0.45);
    let json = serde_json::to_string(&disease).unwrap();
    let back: DiseaseState = serde_json::from_str(&json).unwrap();
    assert_eq!(back.severity.to_bits(), disease.severity.to_bits());
}

// ── Scheduler ──────────────────────────────────────────────────────────

#[test]
fn seeded_runs_are_reproducible() {
    let run = |seed| {
        let mut engine = ContinuousSimulationEngine::new(seeded_config(seed)).unwrap();
        for _ in 0..150 {
            engine.step().unwrap();
        }
        engine
            .recent_events(usize::MAX)
            .into_iter()
            .map(|e| (e.patient_id.clone(), e.kind_name()))
            .collect::<Vec<_>>()
    };
    let a = run(31);
    assert!(!a.is_empty());
    assert_eq!(a, run(31));
}

#[test]
fn every_event_names_a_known_patient() {
    let mut engine = ContinuousSimulationEngine::new(seeded_config(17)).unwrap();
    for _ in 0..300 {
        engine.step().unwrap();
    }
    let events = engine.recent_events(usize::MAX);
    let arrivals: Vec<&str> = events
        .iter()
        .filter(|e| matches!(e.kind, SimulationEventKind::Arrival { .. }))
        .map(|e| e.patient_id.as_str())
        .collect();
    assert!(!arrivals.is_empty());
    for event in &events {
        assert!(arrivals.contains(&event.patient_id.as_str()), "{}", event.description);
        assert!(engine.patient_details(&event.patient_id).is_some());
    }
    let status = engine.simulation_status();
    assert_eq!(status.total_events, events.len());
    assert!(status.queue.active_count <= engine.max_simultaneous_patients());
}

#[test]
fn orders_through_engine_reach_active_patients() {
    let mut engine = ContinuousSimulationEngine::new(seeded_config(23)).unwrap();
    while engine.active_patients().is_empty() {
        engine.step().unwrap();
    }
    let patient = engine.active_patients()[0].clone();
    let response = engine
        .order_intervention(&patient, OrderRequest::new("cbc"))
        .unwrap();
    assert!(response.success, "{}", response.message);
    engine.step().unwrap();

    let details = engine.patient_details(&patient).unwrap();
    let orders = details.orders.unwrap();
    assert_eq!(orders.total, 1);
    assert!(details.state.is_some());
    assert!(engine.timeline_len(&patient) >= 2);
}

#[test]
fn threaded_run_stops_cleanly() {
    let mut engine = ContinuousSimulationEngine::new(seeded_config(41)).unwrap();
    engine.start(Some(500.0)).unwrap();
    std::thread::sleep(std::time::Duration::from_millis(50));
    assert!(engine.pause());
    let paused_at = engine.current_time();
    std::thread::sleep(std::time::Duration::from_millis(30));
    assert!((engine.current_time() - paused_at).abs() < 1e-12);
    assert!(engine.resume());
    engine.stop();
    assert_eq!(engine.state(), SimulationState::Stopped);
}
