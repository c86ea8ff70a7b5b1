//! Patient state evolution
//!
//! A [`PatientState`] is an immutable snapshot. [`PatientStateEvolutionEngine::evolve`]
//! builds a complete new snapshot from the previous one, so a step either
//! happens in full or not at all. The engine's RNG is the only thing a step
//! mutates.
//!
//! Step order:
//! 1. Progress every active disease and sample complications
//! 2. Update organ systems (disease, intervention, cross-organ, recovery)
//! 3. Clamp scores and tag dysfunctions
//! 4. Derive vitals from the baseline and organ scores
//! 5. Collect symptoms
//! 6. Sample adverse events
//! 7. Derive qualitative flags

use crate::disease::DiseaseState;
use medsim_logic::adverse::{self, AdverseEventType};
use medsim_logic::config::EvolutionConfig;
use medsim_logic::effects::{self, ORGAN_INTERACTIONS};
use medsim_logic::flags::{self, PatientFlags};
use medsim_logic::interventions;
use medsim_logic::organs::{self, DysfunctionTier, OrganSystem, FAILURE_THRESHOLD, SYMPTOMATIC_THRESHOLD};
use medsim_logic::vitals::{self, Responsiveness, VitalJitter, VitalSigns, PAIN_PER_SYMPTOM};
use medsim_logic::SimTime;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// State of one organ system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganSystemState {
    pub organ: OrganSystem,
    /// 0.0 (failure) to 1.0 (normal)
    pub function_score: f64,
    pub dysfunctions: BTreeSet<String>,
    pub metrics: BTreeMap<String, f64>,
    /// Interventions that have acted on this organ
    pub interventions: Vec<String>,
    pub adverse_events: Vec<AdverseEventType>,
}

impl OrganSystemState {
    /// Fully functional organ with baseline metrics.
    pub fn baseline(organ: OrganSystem) -> Self {
        Self {
            organ,
            function_score: 1.0,
            dysfunctions: BTreeSet::new(),
            metrics: organ
                .baseline_metrics()
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect(),
            interventions: Vec::new(),
            adverse_events: Vec::new(),
        }
    }

    pub fn metric(&self, name: &str) -> Option<f64> {
        self.metrics.get(name).copied()
    }

    pub fn tier(&self) -> DysfunctionTier {
        DysfunctionTier::from_score(self.function_score)
    }

    /// Metrics are floored at zero.
    fn adjust_metric(&mut self, name: &str, delta: f64) {
        let value = self.metrics.entry(name.to_string()).or_insert(0.0);
        *value = (*value + delta).max(0.0);
    }
}

/// Complete patient snapshot at one instant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientState {
    pub vitals: VitalSigns,
    /// Vitals the organ maps are applied to every step
    pub baseline_vitals: VitalSigns,
    pub organ_systems: BTreeMap<OrganSystem, OrganSystemState>,
    pub disease_states: Vec<DiseaseState>,
    pub symptoms: BTreeSet<String>,
    /// Every intervention applied so far, in first-applied order
    pub interventions: Vec<String>,
    /// Adverse events raised by the step that produced this snapshot
    pub adverse_events: Vec<AdverseEventType>,
    pub flags: PatientFlags,
    pub timestamp: SimTime,
}

impl PatientState {
    /// Function score of an organ. Missing organs read as healthy.
    pub fn score(&self, organ: OrganSystem) -> f64 {
        self.organ_systems
            .get(&organ)
            .map(|o| o.function_score)
            .unwrap_or(1.0)
    }

    pub fn organ(&self, organ: OrganSystem) -> Option<&OrganSystemState> {
        self.organ_systems.get(&organ)
    }

    /// Overwrite an organ's function score, clamped to [0, 1].
    pub fn set_function_score(&mut self, organ: OrganSystem, score: f64) {
        self.organ_systems
            .entry(organ)
            .or_insert_with(|| OrganSystemState::baseline(organ))
            .function_score = score.clamp(0.0, 1.0);
    }

    pub fn active_diseases(&self) -> impl Iterator<Item = &DiseaseState> {
        self.disease_states.iter().filter(|d| d.is_active())
    }

    pub fn max_severity(&self) -> Option<f64> {
        self.active_diseases().map(|d| d.severity).reduce(f64::max)
    }

    pub fn has_symptom(&self, symptom: &str) -> bool {
        self.symptoms.contains(symptom)
    }
}

/// Append-only history of snapshots for one patient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientTimeline {
    history: Vec<PatientState>,
    current: PatientState,
}

impl PatientTimeline {
    pub fn new(initial: PatientState) -> Self {
        Self {
            history: Vec::new(),
            current: initial,
        }
    }

    pub fn push(&mut self, state: PatientState) {
        let previous = std::mem::replace(&mut self.current, state);
        self.history.push(previous);
    }

    pub fn latest(&self) -> &PatientState {
        &self.current
    }

    pub fn first(&self) -> &PatientState {
        self.history.first().unwrap_or(&self.current)
    }

    pub fn len(&self) -> usize {
        self.history.len() + 1
    }

    /// A timeline always holds its initial snapshot.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Snapshots oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &PatientState> {
        self.history.iter().chain(std::iter::once(&self.current))
    }

    /// Drop every snapshot but the latest. Returns how many were dropped.
    pub fn compact(&mut self) -> usize {
        let dropped = self.history.len();
        self.history = Vec::new();
        dropped
    }
}

/// Per-organ entry of a [`PatientSummary`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganSummary {
    pub function_score: f64,
    pub tier: DysfunctionTier,
    pub dysfunctions: Vec<String>,
    pub key_metrics: BTreeMap<String, f64>,
    pub interventions: Vec<String>,
    pub adverse_events: Vec<AdverseEventType>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiseaseBrief {
    pub disease: String,
    pub stage: String,
    pub severity: f64,
}

impl From<&DiseaseState> for DiseaseBrief {
    fn from(d: &DiseaseState) -> Self {
        Self {
            disease: d.disease.clone(),
            stage: d.stage.name().to_string(),
            severity: d.severity,
        }
    }
}

/// Read model handed to presentation layers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientSummary {
    pub vitals: VitalSigns,
    pub organ_systems: BTreeMap<OrganSystem, OrganSummary>,
    pub diseases: Vec<DiseaseBrief>,
    pub symptoms: Vec<String>,
    pub adverse_events: Vec<AdverseEventType>,
    pub flags: PatientFlags,
    pub timestamp: SimTime,
}

/// Summarize a snapshot for display.
pub fn patient_summary(state: &PatientState) -> PatientSummary {
    let organ_systems = state
        .organ_systems
        .iter()
        .map(|(organ, o)| {
            let key_metrics = organ
                .key_metrics()
                .iter()
                .filter_map(|k| o.metric(k).map(|v| (k.to_string(), v)))
                .collect();
            let summary = OrganSummary {
                function_score: o.function_score,
                tier: o.tier(),
                dysfunctions: o.dysfunctions.iter().cloned().collect(),
                key_metrics,
                interventions: o.interventions.clone(),
                adverse_events: o.adverse_events.clone(),
            };
            (*organ, summary)
        })
        .collect();

    PatientSummary {
        vitals: state.vitals,
        organ_systems,
        diseases: state.disease_states.iter().map(DiseaseBrief::from).collect(),
        symptoms: state.symptoms.iter().cloned().collect(),
        adverse_events: state.adverse_events.clone(),
        flags: state.flags,
        timestamp: state.timestamp,
    }
}

/// Advances patient snapshots through time
pub struct PatientStateEvolutionEngine {
    rng: StdRng,
    jitter: VitalJitter,
}

impl PatientStateEvolutionEngine {
    pub fn new(config: &EvolutionConfig, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng,
            jitter: config.jitter,
        }
    }

    /// Build the first snapshot for a patient: every organ at baseline and
    /// symptoms seeded from each disease's current stage.
    pub fn initialize_patient_state(
        &self,
        disease_states: Vec<DiseaseState>,
        base_vitals: Option<VitalSigns>,
        now: SimTime,
    ) -> PatientState {
        let baseline = base_vitals.unwrap_or_default();
        let organ_systems = OrganSystem::ALL
            .iter()
            .map(|o| (*o, OrganSystemState::baseline(*o)))
            .collect();
        let symptoms = disease_states
            .iter()
            .flat_map(|d| d.symptoms.iter().cloned())
            .collect();
        PatientState {
            vitals: baseline,
            baseline_vitals: baseline,
            organ_systems,
            disease_states,
            symptoms,
            interventions: Vec::new(),
            adverse_events: Vec::new(),
            flags: PatientFlags::default(),
            timestamp: now,
        }
    }

    /// Advance a snapshot by `delta_hours` with `applied` interventions
    /// acting during the step. Returns the new snapshot.
    pub fn evolve(&mut self, state: &PatientState, delta_hours: f64, applied: &[&str]) -> PatientState {
        let dt = delta_hours.max(0.0);

        // 1. diseases
        let disease_states: Vec<DiseaseState> = state
            .disease_states
            .iter()
            .map(|d| {
                let mut next = d.clone();
                next.advance(dt);
                let drawn = next.sample_complications(&mut self.rng);
                next.complications.extend(drawn.into_iter().map(str::to_string));
                next
            })
            .collect();

        // 2-3. organs, read from the pre-step map
        let mut organ_systems: BTreeMap<OrganSystem, OrganSystemState> = state
            .organ_systems
            .values()
            .map(|o| (o.organ, evolve_organ(o, state, &disease_states, applied, dt)))
            .collect();
        let score = |organ: OrganSystem| {
            organ_systems
                .get(&organ)
                .map(|o| o.function_score)
                .unwrap_or(1.0)
        };

        // 4. vitals
        let vitals = self.derive_vitals(&state.baseline_vitals, &score, &disease_states, applied);

        // 5. symptoms
        let symptoms = collect_symptoms(&disease_states, &organ_systems);

        // 6. adverse events
        let mut events = BTreeSet::new();
        for name in applied {
            let kind = interventions::definition(name).map(|d| d.kind);
            events.extend(adverse::intervention_adverse_events(name, kind, &score, &mut self.rng));
        }
        for d in disease_states.iter().filter(|d| d.is_active()) {
            events.extend(adverse::disease_adverse_events(&d.disease, d.severity, &mut self.rng));
        }
        events.extend(adverse::vital_adverse_events(&vitals));
        let failing: Vec<OrganSystem> = organ_systems
            .values()
            .filter(|o| adverse::is_organ_failure(o.function_score))
            .map(|o| o.organ)
            .collect();
        if !failing.is_empty() {
            events.insert(AdverseEventType::OrganFailure);
        }

        // 7. flags
        let flags = flags::derive_flags(&score, &vitals, applied.iter().copied());

        for organ in failing {
            if let Some(o) = organ_systems.get_mut(&organ) {
                if !o.adverse_events.contains(&AdverseEventType::OrganFailure) {
                    o.adverse_events.push(AdverseEventType::OrganFailure);
                }
            }
        }

        let mut all_interventions = state.interventions.clone();
        for name in applied {
            if !all_interventions.iter().any(|i| i == name) {
                all_interventions.push(name.to_string());
            }
        }

        PatientState {
            vitals,
            baseline_vitals: state.baseline_vitals,
            organ_systems,
            disease_states,
            symptoms,
            interventions: all_interventions,
            adverse_events: events.into_iter().collect(),
            flags,
            timestamp: state.timestamp + dt,
        }
    }

    fn derive_vitals(
        &mut self,
        baseline: &VitalSigns,
        score: impl Fn(OrganSystem) -> f64,
        diseases: &[DiseaseState],
        applied: &[&str],
    ) -> VitalSigns {
        let mut v = vitals::organ_adjusted_vitals(baseline, score);

        for d in diseases.iter().filter(|d| d.is_active()) {
            v.temperature += d.severity * effects::fever_response(&d.disease);
        }

        for effect in applied.iter().filter_map(|name| effects::vital_effect(name)) {
            v.bp_systolic += effect.bp_systolic;
            v.mean_arterial_pressure += effect.mean_arterial_pressure;
            v.respiratory_rate += effect.respiratory_rate;
            v.oxygen_saturation += effect.oxygen_saturation;
            v.temperature += effect.temperature;
            if effect.sedates && v.consciousness_level == Responsiveness::Alert {
                v.consciousness_level = Responsiveness::Sedated;
            }
        }

        let painful = diseases
            .iter()
            .filter(|d| d.is_active())
            .flat_map(|d| d.symptoms.iter())
            .filter(|s| s.contains("pain"))
            .count();
        v.pain_score += painful as f64 * PAIN_PER_SYMPTOM;

        self.jitter.apply(&mut v, &mut self.rng);
        v.clamped()
    }
}

impl Default for PatientStateEvolutionEngine {
    fn default() -> Self {
        Self::new(&EvolutionConfig::default(), None)
    }
}

fn evolve_organ(
    prev: &OrganSystemState,
    before: &PatientState,
    diseases: &[DiseaseState],
    applied: &[&str],
    dt: f64,
) -> OrganSystemState {
    let organ = prev.organ;
    let mut next = prev.clone();
    let mut diseased = false;

    for d in diseases.iter().filter(|d| d.is_active()) {
        let Some(effect) = effects::disease_effect(&d.disease, organ) else {
            continue;
        };
        diseased = true;
        next.function_score += effect.score_per_hour * d.severity * dt;
        for (metric, rate) in effect.metrics_per_hour {
            next.adjust_metric(metric, rate * d.severity * dt);
        }
        let (tag, threshold) = effect.dysfunction;
        if d.severity > threshold {
            next.dysfunctions.insert(tag.to_string());
        }
    }

    for name in applied {
        let mut acted = false;
        for effect in effects::intervention_effects(name).filter(|e| e.organ == organ) {
            acted = true;
            next.function_score += effect.score_delta;
            for (metric, delta) in effect.metrics {
                next.adjust_metric(metric, *delta);
            }
        }
        if acted && !next.interventions.iter().any(|i| i == name) {
            next.interventions.push(name.to_string());
        }
    }

    for rule in ORGAN_INTERACTIONS.iter().filter(|r| r.targets(organ)) {
        if before.score(rule.source) < rule.below {
            next.function_score += rule.score_per_hour * dt;
            if let Some((metric, rate)) = rule.metric_per_hour {
                next.adjust_metric(metric, rate * dt);
            }
        }
    }

    if !diseased {
        next.function_score = organs::natural_recovery(next.function_score, dt);
    }

    next.function_score = next.function_score.clamp(0.0, 1.0);
    let dysfunction = format!("{}_dysfunction", organ.name());
    let failure = format!("{}_failure", organ.name());
    if next.function_score < SYMPTOMATIC_THRESHOLD {
        next.dysfunctions.insert(dysfunction);
    }
    if next.function_score < FAILURE_THRESHOLD {
        next.dysfunctions.insert(failure);
    }
    next
}

fn collect_symptoms(
    diseases: &[DiseaseState],
    organs: &BTreeMap<OrganSystem, OrganSystemState>,
) -> BTreeSet<String> {
    let mut symptoms: BTreeSet<String> = diseases
        .iter()
        .filter(|d| d.is_active())
        .flat_map(|d| d.symptoms.iter().cloned())
        .collect();
    for o in organs.values() {
        if o.function_score < SYMPTOMATIC_THRESHOLD {
            symptoms.extend(o.organ.dysfunction_symptoms().iter().map(|s| s.to_string()));
        }
        if o.function_score < FAILURE_THRESHOLD {
            symptoms.insert(format!("{}_failure", o.organ.name()));
        }
    }
    symptoms
}

#[cfg(test)]
mod tests {
    use super::*;
    use medsim_logic::flags::{Consciousness, Mobility};

    fn quiet_engine(seed: u64) -> PatientStateEvolutionEngine {
        let config = EvolutionConfig {
            jitter: VitalJitter::none(),
        };
        PatientStateEvolutionEngine::new(&config, Some(seed))
    }

    fn diagnosed(disease: &str, hours: f64) -> DiseaseState {
        DiseaseState::diagnose(disease, 0.0, hours).unwrap()
    }

    #[test]
    fn test_initial_state_is_baseline() {
        let engine = quiet_engine(1);
        let state = engine.initialize_patient_state(vec![diagnosed("sepsis", 5.0)], None, 5.0);
        assert_eq!(state.organ_systems.len(), 11);
        assert!(state.organ_systems.values().all(|o| o.function_score == 1.0));
        assert_eq!(state.vitals, VitalSigns::default());
        assert!(state.has_symptom("tachypnea"));
        assert_eq!(state.timestamp, 5.0);
    }

    #[test]
    fn test_respiratory_failure_drops_spo2_by_twelve() {
        let mut engine = quiet_engine(2);
        let mut state = engine.initialize_patient_state(Vec::new(), None, 0.0);
        state.set_function_score(OrganSystem::Respiratory, 0.2);
        let before = state.baseline_vitals.oxygen_saturation;

        let next = engine.evolve(&state, 0.1, &[]);
        assert!((next.score(OrganSystem::Respiratory) - 0.2).abs() < 1e-9);
        let expected = (before - 12.0).clamp(70.0, 100.0);
        assert!((next.vitals.oxygen_saturation - expected).abs() < 1e-9);
    }

    #[test]
    fn test_evolve_does_not_mutate_input() {
        let mut engine = quiet_engine(3);
        let state = engine.initialize_patient_state(vec![diagnosed("sepsis", 4.0)], None, 4.0);
        let copy = state.clone();
        let next = engine.evolve(&state, 2.0, &["vasopressor"]);
        assert_eq!(state, copy);
        assert!((next.timestamp - 6.0).abs() < 1e-9);
        assert!(next.disease_states[0].hours_since_onset > state.disease_states[0].hours_since_onset);
    }

    #[test]
    fn test_scores_stay_in_range_for_long_steps() {
        let mut engine = quiet_engine(4);
        let diseases = ["sepsis", "stroke", "pneumonia", "acute_coronary_syndrome"]
            .iter()
            .map(|d| diagnosed(d, 10.0))
            .collect();
        let mut state = engine.initialize_patient_state(diseases, None, 10.0);
        let heavy = ["mechanical_ventilation", "dialysis", "vasopressor", "sedative"];
        for dt in [0.0, 0.5, 5.0, 48.0, 1000.0] {
            state = engine.evolve(&state, dt, &heavy);
            for o in state.organ_systems.values() {
                assert!((0.0..=1.0).contains(&o.function_score), "{:?}", o.organ);
                assert!(o.metrics.values().all(|m| *m >= 0.0));
            }
            assert!(state.vitals.within_limits());
            for d in &state.disease_states {
                assert!((0.0..=1.0).contains(&d.severity));
            }
        }
    }

    #[test]
    fn test_sepsis_damages_organs_and_raises_temperature() {
        let mut engine = quiet_engine(5);
        let state = engine.initialize_patient_state(vec![diagnosed("sepsis", 8.0)], None, 8.0);
        let next = engine.evolve(&state, 3.0, &[]);
        assert!(next.score(OrganSystem::Immune) < 1.0);
        assert!(next.score(OrganSystem::Cardiovascular) < 1.0);
        assert!((next.score(OrganSystem::Endocrine) - 1.0).abs() < 1e-9);
        assert!(next.vitals.temperature > state.baseline_vitals.temperature);
    }

    #[test]
    fn test_natural_recovery_only_without_disease() {
        let mut engine = quiet_engine(6);
        let mut state = engine.initialize_patient_state(Vec::new(), None, 0.0);
        state.set_function_score(OrganSystem::Hepatic, 0.6);
        state.set_function_score(OrganSystem::Renal, 0.3);
        let next = engine.evolve(&state, 10.0, &[]);
        assert!((next.score(OrganSystem::Hepatic) - 0.7).abs() < 1e-9);
        assert!((next.score(OrganSystem::Renal) - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_cardiac_dysfunction_spills_into_other_organs() {
        let mut engine = quiet_engine(7);
        let mut state = engine.initialize_patient_state(Vec::new(), None, 0.0);
        state.set_function_score(OrganSystem::Cardiovascular, 0.5);
        let next = engine.evolve(&state, 1.0, &[]);
        // -0.05 interaction then +0.01 recovery
        assert!((next.score(OrganSystem::Renal) - 0.96).abs() < 1e-9);
        assert!(next.vitals.heart_rate > state.baseline_vitals.heart_rate);
    }

    #[test]
    fn test_vasopressor_and_sedative_vitals() {
        let mut engine = quiet_engine(8);
        let state = engine.initialize_patient_state(Vec::new(), None, 0.0);
        let next = engine.evolve(&state, 0.1, &["vasopressor", "sedative"]);
        assert!((next.vitals.bp_systolic - 135.0).abs() < 1e-9);
        assert!((next.vitals.respiratory_rate - 13.0).abs() < 1e-9);
        assert_eq!(next.vitals.consciousness_level, Responsiveness::Sedated);
        assert_eq!(next.flags.consciousness, Consciousness::Sedated);
        assert_eq!(next.interventions, vec!["vasopressor", "sedative"]);
        let cardio = next.organ(OrganSystem::Cardiovascular).unwrap();
        assert!(cardio.interventions.contains(&"vasopressor".to_string()));
    }

    #[test]
    fn test_organ_failure_symptoms_and_events() {
        let mut engine = quiet_engine(9);
        let mut state = engine.initialize_patient_state(Vec::new(), None, 0.0);
        state.set_function_score(OrganSystem::Neurological, 0.1);
        let next = engine.evolve(&state, 0.1, &[]);
        assert!(next.has_symptom("neurological_failure"));
        assert!(next.has_symptom("seizures"));
        assert!(next.adverse_events.contains(&AdverseEventType::OrganFailure));
        assert_eq!(next.flags.consciousness, Consciousness::Coma);
        assert_eq!(next.flags.mobility, Mobility::Bedbound);
        assert_eq!(next.vitals.consciousness_level, Responsiveness::Unresponsive);
        let neuro = next.organ(OrganSystem::Neurological).unwrap();
        assert!(neuro.dysfunctions.contains("neurological_failure"));
    }

    #[test]
    fn test_unknown_disease_treated_as_resolved() {
        let mut engine = quiet_engine(10);
        let mut ghost = diagnosed("sepsis", 6.0);
        ghost.disease = "retired_disease".into();
        let state = engine.initialize_patient_state(vec![ghost], None, 6.0);
        let next = engine.evolve(&state, 1.0, &[]);
        assert!(!next.disease_states[0].is_active());
        assert!((next.score(OrganSystem::Immune) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_renal_failure_keeps_raising_map_metric() {
        let mut engine = quiet_engine(12);
        let mut state = engine.initialize_patient_state(Vec::new(), None, 0.0);
        state.set_function_score(OrganSystem::Renal, 0.1);
        let map = |s: &PatientState| {
            s.organ_systems[&OrganSystem::Cardiovascular]
                .metrics
                .get("mean_arterial_pressure")
                .copied()
                .unwrap_or(0.0)
        };
        let before = map(&state);
        for _ in 0..8 {
            state = engine.evolve(&state, 1.0, &[]);
            assert!(state.vitals.within_limits());
        }
        assert!((map(&state) - before - 8.0 * 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_timeline_and_summary() {
        let mut engine = quiet_engine(11);
        let state = engine.initialize_patient_state(vec![diagnosed("pneumonia", 30.0)], None, 30.0);
        let mut timeline = PatientTimeline::new(state);
        for _ in 0..3 {
            let next = engine.evolve(timeline.latest(), 1.0, &[]);
            timeline.push(next);
        }
        assert_eq!(timeline.len(), 4);
        assert!(timeline.latest().timestamp > timeline.first().timestamp);

        let latest = timeline.latest().clone();
        assert_eq!(timeline.compact(), 3);
        assert_eq!(timeline.len(), 1);
        assert_eq!(timeline.latest(), &latest);
        assert_eq!(timeline.first(), &latest);

        let summary = patient_summary(timeline.latest());
        assert_eq!(summary.organ_systems.len(), 11);
        let resp = &summary.organ_systems[&OrganSystem::Respiratory];
        assert!(resp.key_metrics.contains_key("pao2"));
        assert!(!resp.key_metrics.contains_key("fev1"));
        assert_eq!(summary.diseases[0].disease, "pneumonia");
        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("pao2"));
    }
}
