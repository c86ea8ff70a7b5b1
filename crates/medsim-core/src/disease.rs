//! Disease progression engine
//!
//! Tracks every (patient, disease) pair as a [`DiseaseState`] and drives it
//! through the stage tables in `medsim_logic::disease`. Each disease keeps
//! its own clock: progression adds elapsed hours to `hours_since_onset` and
//! restages from scratch, so severity only moves down through the
//! persistent treatment offset.

use crate::error::{SimError, SimResult};
use medsim_logic::disease::{
    self as table, ComplicationType, DiseaseStage, OverallPrognosis, Prognosis, TreatmentResponse,
    COMPLICATION_RISK_FACTOR, TREATMENT_SEVERITY_REDUCTION,
};
use medsim_logic::SimTime;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Treatments kept in a disease summary.
const RECENT_TREATMENTS: usize = 5;

/// Hours a treatment is considered active after administration.
const TREATMENT_DURATION_HOURS: f64 = 4.0;

/// Current state of one disease in one patient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiseaseState {
    pub disease: String,
    pub stage: DiseaseStage,
    /// Effective severity in [0, 1] after treatment
    pub severity: f64,
    pub onset_time: SimTime,
    /// The disease's own clock, advanced by progression
    pub hours_since_onset: f64,
    pub last_updated: SimTime,
    pub progression_rate: f64,
    pub complications: BTreeSet<String>,
    pub treatment_history: Vec<TreatmentRecord>,
    pub risk_factors: Vec<String>,
    pub prognosis: Prognosis,
    /// Cumulative severity reduction from every treatment so far
    pub treatment_offset: f64,
    /// Symptoms of the current stage
    pub symptoms: Vec<String>,
}

/// One treatment applied to a specific disease
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreatmentRecord {
    pub treatment: String,
    pub effectiveness: f64,
    pub response: TreatmentResponse,
    pub administered_at: SimTime,
}

impl DiseaseState {
    /// Stage a freshly diagnosed disease at `now`.
    ///
    /// Fails if the disease is not registered.
    pub fn diagnose(disease: &str, onset_time: SimTime, now: SimTime) -> SimResult<Self> {
        let def = table::disease(disease).ok_or_else(|| SimError::UnknownDisease(disease.into()))?;
        let mut state = Self {
            disease: def.name.to_string(),
            stage: DiseaseStage::Latent,
            severity: 0.0,
            onset_time,
            hours_since_onset: (now - onset_time).max(0.0),
            last_updated: now,
            progression_rate: def.progression_rate,
            complications: BTreeSet::new(),
            treatment_history: Vec::new(),
            risk_factors: def.risk_factors.iter().map(|r| r.to_string()).collect(),
            prognosis: Prognosis::Good,
            treatment_offset: 0.0,
            symptoms: Vec::new(),
        };
        state.restage();
        Ok(state)
    }

    pub fn is_active(&self) -> bool {
        self.stage.is_active()
    }

    /// Advance the disease clock by `delta_hours` and restage.
    ///
    /// Resolved diseases are terminal and stay untouched.
    pub fn advance(&mut self, delta_hours: f64) {
        if !self.is_active() {
            return;
        }
        let delta = delta_hours.max(0.0);
        self.hours_since_onset += delta;
        self.last_updated += delta;
        self.restage();
    }

    /// Recompute stage, severity, prognosis and symptoms from the clock and
    /// treatment offset. A disease missing from the table counts as resolved.
    pub fn restage(&mut self) {
        let Some(def) = table::disease(&self.disease) else {
            self.stage = DiseaseStage::Resolved;
            self.severity = 0.0;
            self.prognosis = table::disease_prognosis(DiseaseStage::Resolved);
            self.symptoms.clear();
            return;
        };
        let (stage, severity) = table::restage(def, self.hours_since_onset, self.treatment_offset);
        self.stage = stage;
        self.severity = severity;
        self.prognosis = table::disease_prognosis(stage);
        self.symptoms = table::stage_symptoms(def, stage)
            .iter()
            .map(|s| s.to_string())
            .collect();
    }

    /// Listed complications drawn this step, each at `severity * 0.3`.
    /// Complications already present are skipped.
    pub fn sample_complications(&self, rng: &mut impl Rng) -> Vec<&'static str> {
        let Some(def) = table::disease(&self.disease) else {
            return Vec::new();
        };
        if !self.is_active() {
            return Vec::new();
        }
        let risk = self.severity * COMPLICATION_RISK_FACTOR;
        def.complications
            .iter()
            .copied()
            .filter(|c| !self.complications.contains(*c))
            .filter(|_| rng.gen::<f64>() < risk)
            .collect()
    }

    /// Apply a treatment reduction and restage.
    fn apply_treatment(&mut self, effect: &TreatmentEffect) {
        self.treatment_offset += effect.effectiveness * TREATMENT_SEVERITY_REDUCTION;
        self.treatment_history.push(TreatmentRecord {
            treatment: effect.treatment.clone(),
            effectiveness: effect.effectiveness,
            response: effect.response,
            administered_at: effect.administered_at,
        });
        self.restage();
    }
}

/// A complication a patient has developed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Complication {
    pub name: String,
    pub complication_type: ComplicationType,
    pub severity: f64,
    pub onset_time: SimTime,
    /// Disease it arose from
    pub disease: String,
    pub symptoms: Vec<String>,
    pub treatments: Vec<String>,
}

/// Outcome of administering a treatment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreatmentEffect {
    pub treatment: String,
    pub response: TreatmentResponse,
    pub effectiveness: f64,
    pub side_effects: Vec<String>,
    pub duration_hours: f64,
    pub administered_at: SimTime,
    pub dose: String,
    pub route: String,
    /// The disease whose severity was reduced, if any listed this treatment
    pub treated_disease: Option<String>,
}

/// Everything known about a patient's diseases
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiseaseSummary {
    pub diseases: Vec<DiseaseState>,
    pub complications: Vec<Complication>,
    pub recent_treatments: Vec<TreatmentEffect>,
    pub overall_prognosis: OverallPrognosis,
}

/// Per-patient disease state machine
pub struct DiseaseProgressionEngine {
    rng: StdRng,
    diseases: BTreeMap<String, Vec<DiseaseState>>,
    complications: BTreeMap<String, Vec<Complication>>,
    treatments: BTreeMap<String, Vec<TreatmentEffect>>,
}

impl DiseaseProgressionEngine {
    /// Create an engine. `None` seeds the RNG from entropy.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng,
            diseases: BTreeMap::new(),
            complications: BTreeMap::new(),
            treatments: BTreeMap::new(),
        }
    }

    /// Diagnose `disease` in a patient. Elapsed time since onset is staged
    /// immediately. Diagnosing a disease the patient already has returns
    /// the existing state.
    pub fn initialize_patient_disease(
        &mut self,
        patient_id: &str,
        disease: &str,
        onset_time: SimTime,
        now: SimTime,
    ) -> SimResult<DiseaseState> {
        if let Some(existing) = self.disease_state(patient_id, disease) {
            return Ok(existing.clone());
        }
        let state = DiseaseState::diagnose(disease, onset_time, now)?;
        self.diseases
            .entry(patient_id.to_string())
            .or_default()
            .push(state.clone());
        Ok(state)
    }

    /// Advance one disease by `delta_hours` and sample complications.
    ///
    /// Returns `None` when the patient or disease is unknown.
    pub fn progress_disease(
        &mut self,
        patient_id: &str,
        disease: &str,
        delta_hours: f64,
    ) -> Option<DiseaseState> {
        let state = self.disease_state_mut(patient_id, disease)?;
        if !state.is_active() {
            return Some(state.clone());
        }
        state.advance(delta_hours);
        self.check_for_complications(patient_id, disease);
        self.disease_state(patient_id, disease).cloned()
    }

    /// Advance every disease a patient has. Returns the updated states.
    pub fn progress_patient(&mut self, patient_id: &str, delta_hours: f64) -> Vec<DiseaseState> {
        let names: Vec<String> = self
            .patient_diseases(patient_id)
            .iter()
            .map(|d| d.disease.clone())
            .collect();
        names
            .iter()
            .filter_map(|name| self.progress_disease(patient_id, name, delta_hours))
            .collect()
    }

    /// Sample complications for one disease at its current severity.
    /// Returns the names that were newly developed.
    pub fn check_for_complications(&mut self, patient_id: &str, disease: &str) -> Vec<String> {
        let state = self
            .diseases
            .get(patient_id)
            .and_then(|states| states.iter().find(|d| d.disease == disease));
        let drawn = match state {
            Some(state) => state.sample_complications(&mut self.rng),
            None => return Vec::new(),
        };
        drawn
            .into_iter()
            .filter(|name| self.develop_complication(patient_id, name, disease))
            .map(str::to_string)
            .collect()
    }

    /// Register a complication for a patient.
    ///
    /// Idempotent per (patient, complication): returns `true` only the
    /// first time. Complications without a definition use the generic
    /// systemic profile.
    pub fn develop_complication(&mut self, patient_id: &str, complication: &str, disease: &str) -> bool {
        let onset = match self.disease_state(patient_id, disease) {
            Some(state) => state.last_updated,
            None => return false,
        };
        if !self.register_complication(patient_id, complication, disease, onset) {
            return false;
        }
        if let Some(state) = self.disease_state_mut(patient_id, disease) {
            state.complications.insert(complication.to_string());
        }
        true
    }

    fn register_complication(
        &mut self,
        patient_id: &str,
        complication: &str,
        disease: &str,
        onset_time: SimTime,
    ) -> bool {
        if self.has_complication(patient_id, complication) {
            return false;
        }
        let def = table::complication_or_generic(complication);
        let (lo, hi) = def.severity_range;
        let severity = if hi > lo { self.rng.gen_range(lo..=hi) } else { lo };
        log::debug!("{patient_id}: {complication} developed from {disease} (severity {severity:.2})");
        self.complications
            .entry(patient_id.to_string())
            .or_default()
            .push(Complication {
                name: complication.to_string(),
                complication_type: def.complication_type,
                severity,
                onset_time,
                disease: disease.to_string(),
                symptoms: def.symptoms.iter().map(|s| s.to_string()).collect(),
                treatments: def.treatments.iter().map(|t| t.to_string()).collect(),
            });
        true
    }

    pub fn has_complication(&self, patient_id: &str, complication: &str) -> bool {
        self.patient_complications(patient_id)
            .iter()
            .any(|c| c.name == complication)
    }

    /// Administer a treatment at `now`.
    ///
    /// Effectiveness is scaled down by the sickest disease. The first active
    /// disease whose response table lists the treatment is reduced by
    /// `effectiveness * 0.3` through its treatment offset.
    pub fn administer_treatment(
        &mut self,
        patient_id: &str,
        treatment: &str,
        dose: Option<&str>,
        route: Option<&str>,
        now: SimTime,
    ) -> SimResult<TreatmentEffect> {
        let def = table::treatment(treatment).ok_or_else(|| SimError::UnknownTreatment(treatment.into()))?;

        let modifier = table::treatment_modifier(self.max_severity(patient_id));
        let effectiveness = (def.effectiveness * modifier).min(1.0);
        let side_effect_p = table::side_effect_probability(effectiveness);
        let side_effects = def
            .side_effects
            .iter()
            .filter(|_| self.rng.gen::<f64>() < side_effect_p)
            .map(|s| s.to_string())
            .collect();

        let mut effect = TreatmentEffect {
            treatment: def.name.to_string(),
            response: TreatmentResponse::from_effectiveness(effectiveness),
            effectiveness,
            side_effects,
            duration_hours: TREATMENT_DURATION_HOURS,
            administered_at: now,
            dose: dose.unwrap_or(def.dosage).to_string(),
            route: route.unwrap_or(def.route).to_string(),
            treated_disease: None,
        };

        let target = self.diseases.get_mut(patient_id).and_then(|states| {
            states.iter_mut().find(|s| {
                s.is_active()
                    && table::disease(&s.disease).is_some_and(|d| d.treatment_response(treatment).is_some())
            })
        });
        if let Some(state) = target {
            state.apply_treatment(&effect);
            effect.treated_disease = Some(state.disease.clone());
        }

        self.treatments
            .entry(patient_id.to_string())
            .or_default()
            .push(effect.clone());
        Ok(effect)
    }

    /// Replace a patient's tracked diseases with states evolved elsewhere
    /// and register any complications they gained. Returns the names of
    /// newly registered complications.
    pub fn sync_patient_diseases(&mut self, patient_id: &str, states: Vec<DiseaseState>) -> Vec<String> {
        let mut gained = Vec::new();
        for state in &states {
            for name in &state.complications {
                if self.register_complication(patient_id, name, &state.disease, state.last_updated) {
                    gained.push(name.clone());
                }
            }
        }
        self.diseases.insert(patient_id.to_string(), states);
        gained
    }

    pub fn patient_diseases(&self, patient_id: &str) -> &[DiseaseState] {
        self.diseases.get(patient_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn patient_complications(&self, patient_id: &str) -> &[Complication] {
        self.complications.get(patient_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn patient_treatments(&self, patient_id: &str) -> &[TreatmentEffect] {
        self.treatments.get(patient_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn disease_state(&self, patient_id: &str, disease: &str) -> Option<&DiseaseState> {
        self.patient_diseases(patient_id)
            .iter()
            .find(|d| d.disease == disease)
    }

    fn disease_state_mut(&mut self, patient_id: &str, disease: &str) -> Option<&mut DiseaseState> {
        self.diseases
            .get_mut(patient_id)?
            .iter_mut()
            .find(|d| d.disease == disease)
    }

    /// Highest severity across the patient's diseases.
    pub fn max_severity(&self, patient_id: &str) -> Option<f64> {
        self.patient_diseases(patient_id)
            .iter()
            .map(|d| d.severity)
            .reduce(f64::max)
    }

    pub fn overall_prognosis(&self, patient_id: &str) -> OverallPrognosis {
        table::overall_prognosis(
            self.max_severity(patient_id),
            self.patient_complications(patient_id).len(),
        )
    }

    pub fn patient_disease_summary(&self, patient_id: &str) -> DiseaseSummary {
        let treatments = self.patient_treatments(patient_id);
        let recent = treatments.len().saturating_sub(RECENT_TREATMENTS);
        DiseaseSummary {
            diseases: self.patient_diseases(patient_id).to_vec(),
            complications: self.patient_complications(patient_id).to_vec(),
            recent_treatments: treatments[recent..].to_vec(),
            overall_prognosis: self.overall_prognosis(patient_id),
        }
    }

    pub fn available_diseases() -> Vec<&'static str> {
        table::available_diseases().collect()
    }

    pub fn available_complications() -> Vec<&'static str> {
        table::available_complications().collect()
    }

    pub fn available_treatments() -> Vec<&'static str> {
        table::available_treatments()
    }
}

impl Default for DiseaseProgressionEngine {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> DiseaseProgressionEngine {
        DiseaseProgressionEngine::new(Some(42))
    }

    #[test]
    fn test_unknown_disease_rejected() {
        let mut engine = engine();
        let err = engine
            .initialize_patient_disease("P001", "dragon_pox", 0.0, 0.0)
            .unwrap_err();
        assert_eq!(err, SimError::UnknownDisease("dragon_pox".into()));
    }

    #[test]
    fn test_acs_reaches_critical_after_six_hours() {
        let mut engine = engine();
        let state = engine
            .initialize_patient_disease("P001", "acute_coronary_syndrome", 0.0, 0.0)
            .unwrap();
        assert_eq!(state.stage, DiseaseStage::Latent);

        let state = engine
            .progress_disease("P001", "acute_coronary_syndrome", 6.0)
            .unwrap();
        assert_eq!(state.stage, DiseaseStage::Critical);
        assert!(state.severity >= 0.8 - 1e-9);
        assert!(state.severity <= 1.0);
        assert!((state.hours_since_onset - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_onset_in_past_is_staged_immediately() {
        let mut engine = engine();
        let state = engine
            .initialize_patient_disease("P001", "acute_coronary_syndrome", 0.0, 2.5)
            .unwrap();
        assert_eq!(state.stage, DiseaseStage::Moderate);
        assert!(!state.symptoms.is_empty());
    }

    #[test]
    fn test_progress_unknown_is_none() {
        let mut engine = engine();
        assert!(engine.progress_disease("P404", "sepsis", 1.0).is_none());
        engine
            .initialize_patient_disease("P001", "sepsis", 0.0, 0.0)
            .unwrap();
        assert!(engine.progress_disease("P001", "stroke", 1.0).is_none());
    }

    #[test]
    fn test_monotonic_stage_without_treatment() {
        let mut engine = engine();
        engine
            .initialize_patient_disease("P001", "pneumonia", 0.0, 0.0)
            .unwrap();
        let mut prev_stage = DiseaseStage::Latent;
        let mut prev_severity = 0.0;
        for _ in 0..200 {
            let state = engine.progress_disease("P001", "pneumonia", 0.5).unwrap();
            assert!(state.stage >= prev_stage);
            assert!(state.severity + 1e-12 >= prev_severity);
            assert!((0.0..=1.0).contains(&state.severity));
            prev_stage = state.stage;
            prev_severity = state.severity;
        }
    }

    #[test]
    fn test_complication_development_is_idempotent() {
        let mut engine = engine();
        engine
            .initialize_patient_disease("P001", "acute_coronary_syndrome", 0.0, 0.0)
            .unwrap();
        assert!(engine.develop_complication("P001", "cardiogenic_shock", "acute_coronary_syndrome"));
        assert!(!engine.develop_complication("P001", "cardiogenic_shock", "acute_coronary_syndrome"));
        assert_eq!(engine.patient_complications("P001").len(), 1);
        let state = engine
            .disease_state("P001", "acute_coronary_syndrome")
            .unwrap();
        assert_eq!(state.complications.len(), 1);

        let comp = &engine.patient_complications("P001")[0];
        let (lo, hi) = table::complication("cardiogenic_shock").unwrap().severity_range;
        assert!(comp.severity >= lo && comp.severity <= hi);
    }

    #[test]
    fn test_unknown_complication_uses_generic_profile() {
        let mut engine = engine();
        engine
            .initialize_patient_disease("P001", "pneumonia", 0.0, 0.0)
            .unwrap();
        assert!(engine.develop_complication("P001", "empyema", "pneumonia"));
        let comp = &engine.patient_complications("P001")[0];
        assert_eq!(comp.complication_type, ComplicationType::Systemic);
        assert!(comp.severity >= 0.3 && comp.severity <= 0.7);
    }

    #[test]
    fn test_repeated_progress_never_duplicates_complications() {
        let mut engine = engine();
        engine
            .initialize_patient_disease("P001", "sepsis", 0.0, 0.0)
            .unwrap();
        for _ in 0..500 {
            engine.progress_disease("P001", "sepsis", 0.25);
        }
        let names: Vec<&str> = engine
            .patient_complications("P001")
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        let unique: BTreeSet<&str> = names.iter().copied().collect();
        assert_eq!(names.len(), unique.len());
        assert!(!names.is_empty(), "critical sepsis should develop complications");
    }

    #[test]
    fn test_complication_checks_return_only_new_names() {
        let mut engine = engine();
        assert!(engine.check_for_complications("P404", "sepsis").is_empty());
        engine
            .initialize_patient_disease("P001", "sepsis", -24.0, 0.0)
            .unwrap();
        let mut seen = BTreeSet::new();
        for _ in 0..200 {
            for name in engine.check_for_complications("P001", "sepsis") {
                assert!(seen.insert(name.clone()), "{name} reported twice");
            }
        }
        assert!(!seen.is_empty());
        assert!(seen.iter().all(|name| engine.has_complication("P001", name)));
    }

    #[test]
    fn test_treatment_reduces_first_listing_disease() {
        let mut engine = engine();
        engine
            .initialize_patient_disease("P001", "acute_coronary_syndrome", 0.0, 4.0)
            .unwrap();
        let before = engine
            .disease_state("P001", "acute_coronary_syndrome")
            .unwrap()
            .severity;

        let effect = engine
            .administer_treatment("P001", "aspirin", None, None, 4.0)
            .unwrap();
        assert_eq!(effect.route, "oral");
        assert_eq!(effect.treated_disease.as_deref(), Some("acute_coronary_syndrome"));

        let state = engine
            .disease_state("P001", "acute_coronary_syndrome")
            .unwrap();
        let expected = (before - effect.effectiveness * 0.3).max(0.0);
        assert!((state.severity - expected).abs() < 1e-9);
        assert_eq!(state.treatment_history.len(), 1);
    }

    #[test]
    fn test_treatment_offset_persists_across_progression() {
        let mut engine = engine();
        engine
            .initialize_patient_disease("P001", "acute_coronary_syndrome", 0.0, 4.0)
            .unwrap();
        let effect = engine
            .administer_treatment("P001", "aspirin", None, None, 4.0)
            .unwrap();
        let state = engine
            .progress_disease("P001", "acute_coronary_syndrome", 1.0)
            .unwrap();
        let def = table::disease("acute_coronary_syndrome").unwrap();
        let stage = table::stage_for_hours(def, 5.0);
        let raw = table::untreated_severity(def, stage, 5.0);
        let expected = (raw - effect.effectiveness * 0.3).clamp(0.0, 1.0);
        assert!((state.severity - expected).abs() < 1e-9);
    }

    #[test]
    fn test_heavy_treatment_resolves_and_stays_resolved() {
        let mut engine = engine();
        engine
            .initialize_patient_disease("P001", "influenza", 0.0, 1.0)
            .unwrap();
        for _ in 0..20 {
            engine
                .administer_treatment("P001", "antivirals", None, None, 1.0)
                .unwrap();
        }
        let state = engine.disease_state("P001", "influenza").unwrap().clone();
        assert_eq!(state.stage, DiseaseStage::Resolved);
        let after = engine.progress_disease("P001", "influenza", 100.0).unwrap();
        assert_eq!(after.stage, DiseaseStage::Resolved);
        assert_eq!(after.hours_since_onset, state.hours_since_onset);
    }

    #[test]
    fn test_unknown_treatment_rejected() {
        let mut engine = engine();
        let err = engine
            .administer_treatment("P001", "leeches", None, None, 0.0)
            .unwrap_err();
        assert_eq!(err, SimError::UnknownTreatment("leeches".into()));
    }

    #[test]
    fn test_severity_scales_effectiveness() {
        let mut engine = engine();
        let healthy = engine
            .administer_treatment("P000", "aspirin", None, None, 0.0)
            .unwrap();
        engine
            .initialize_patient_disease("P001", "sepsis", 0.0, 48.0)
            .unwrap();
        let sick = engine
            .administer_treatment("P001", "aspirin", Some("81mg"), Some("oral"), 48.0)
            .unwrap();
        assert!(sick.effectiveness < healthy.effectiveness);
        assert_eq!(sick.dose, "81mg");
        assert!(sick.treated_disease.is_none());
    }

    #[test]
    fn test_summary_and_prognosis() {
        let mut engine = engine();
        assert_eq!(engine.overall_prognosis("P001"), OverallPrognosis::Healthy);
        engine
            .initialize_patient_disease("P001", "acute_coronary_syndrome", 0.0, 6.0)
            .unwrap();
        let summary = engine.patient_disease_summary("P001");
        assert_eq!(summary.diseases.len(), 1);
        assert_eq!(summary.overall_prognosis, OverallPrognosis::Critical);
        assert!(summary.recent_treatments.is_empty());
    }

    #[test]
    fn test_sync_registers_new_complications() {
        let mut engine = engine();
        let mut state = engine
            .initialize_patient_disease("P001", "pneumonia", 0.0, 0.0)
            .unwrap();
        state.complications.insert("sepsis".into());
        state.advance(3.0);
        let gained = engine.sync_patient_diseases("P001", vec![state.clone()]);
        assert_eq!(gained, vec!["sepsis".to_string()]);
        assert_eq!(engine.disease_state("P001", "pneumonia"), Some(&state));
        assert!(engine.sync_patient_diseases("P001", vec![state]).is_empty());
    }

    #[test]
    fn test_catalog_queries() {
        assert!(DiseaseProgressionEngine::available_diseases().contains(&"stroke"));
        assert!(DiseaseProgressionEngine::available_complications().contains(&"cardiogenic_shock"));
        assert!(DiseaseProgressionEngine::available_treatments().contains(&"aspirin"));
    }
}
