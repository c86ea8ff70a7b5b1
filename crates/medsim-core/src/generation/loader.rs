//! Synthetic patient generation
//!
//! A patient is built once, at arrival: demographics, social context,
//! initial diseases (diagnosed in the shared [`DiseaseProgressionEngine`]),
//! comorbidities, home medications and presenting vitals. Scores derived
//! from those feed admission priority.

use super::names::{generate_age, generate_name, Gender, PatientName};
use crate::disease::{Complication, DiseaseProgressionEngine, DiseaseState};
use crate::error::SimResult;
use medsim_logic::disease as table;
use medsim_logic::social::{self, HealthLiteracy, RealisticFactors, ScoreInputs, SocialContext};
use medsim_logic::triage::{Complexity, Difficulty, Specialty};
use medsim_logic::vitals::VitalSigns;
use medsim_logic::SimTime;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// What kind of patient to generate. Every section can be switched off.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadConfig {
    /// Restricts the disease pool. `None` draws from every staged disease.
    pub specialty: Option<Specialty>,
    pub difficulty: Difficulty,
    pub complexity: Complexity,
    pub age_range: Option<(u32, u32)>,
    pub gender: Option<Gender>,
    pub social_determinants: bool,
    pub comorbidities: bool,
    pub disease_progression: bool,
    pub realistic_vitals: bool,
    pub medication_history: bool,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            specialty: None,
            difficulty: Difficulty::Medium,
            complexity: Complexity::Moderate,
            age_range: None,
            gender: None,
            social_determinants: true,
            comorbidities: true,
            disease_progression: true,
            realistic_vitals: true,
            medication_history: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialHistory {
    pub insurance_status: String,
    pub occupation: String,
    pub marital_status: String,
    pub primary_language: String,
    pub health_literacy: HealthLiteracy,
}

impl Default for SocialHistory {
    fn default() -> Self {
        Self {
            insurance_status: "Private".into(),
            occupation: "Employed".into(),
            marital_status: "Married".into(),
            primary_language: "English".into(),
            health_literacy: HealthLiteracy::Adequate,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientProfile {
    pub patient_id: String,
    pub name: PatientName,
    pub age: u32,
    pub gender: Gender,
    pub specialty: Option<Specialty>,
    /// Diagnosed diseases followed by comorbidities and risk factors
    pub conditions: Vec<String>,
    pub medications: Vec<String>,
    pub symptoms: Vec<String>,
    pub vitals: VitalSigns,
    pub social_context: SocialContext,
    pub social_history: SocialHistory,
}

/// Everything produced for one new patient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadedPatient {
    pub profile: PatientProfile,
    pub disease_states: Vec<DiseaseState>,
    pub complications: Vec<Complication>,
    pub medical_complexity: f64,
    pub risk_score: f64,
    pub realistic_factors: RealisticFactors,
}

impl LoadedPatient {
    pub fn severities(&self) -> impl Iterator<Item = f64> + '_ {
        self.disease_states.iter().map(|d| d.severity)
    }
}

pub struct DynamicPatientLoader {
    rng: StdRng,
}

impl DynamicPatientLoader {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }

    /// Generate a patient arriving at `now`. Diseases are diagnosed in
    /// `diseases` under `patient_id`.
    pub fn load_patient(
        &mut self,
        patient_id: &str,
        config: &LoadConfig,
        now: SimTime,
        diseases: &mut DiseaseProgressionEngine,
    ) -> SimResult<LoadedPatient> {
        let mut profile = self.base_profile(patient_id, config);

        if config.social_determinants {
            self.add_social_determinants(&mut profile);
        }

        if config.disease_progression {
            self.add_diseases(&mut profile, config, now, diseases)?;
            self.add_complications(patient_id, diseases);
        }
        let disease_states = diseases.patient_diseases(patient_id).to_vec();
        let complications = diseases.patient_complications(patient_id).to_vec();

        if config.comorbidities {
            social::expand_comorbidities(&mut profile.conditions, &mut self.rng);
        }
        if config.medication_history {
            profile.medications = social::medication_history(
                &profile.conditions,
                profile.age,
                profile.social_context.has("poverty"),
            );
        }
        if config.realistic_vitals {
            let presenting = disease_states.iter().map(|d| (d.disease.as_str(), d.severity));
            profile.vitals = social::admission_vitals(presenting, &mut self.rng);
        }

        let severities: Vec<f64> = disease_states.iter().map(|d| d.severity).collect();
        let inputs = ScoreInputs {
            age: profile.age,
            conditions: &profile.conditions,
            severities: &severities,
            complication_count: complications.len(),
            medication_count: profile.medications.len(),
            social: &profile.social_context,
        };
        let medical_complexity = social::medical_complexity(&inputs);
        let risk_score = social::risk_score(&inputs);
        let realistic_factors = social::realistic_factors(&profile.social_context);
        profile.social_history.health_literacy = realistic_factors.health_literacy;

        Ok(LoadedPatient {
            profile,
            disease_states,
            complications,
            medical_complexity,
            risk_score,
            realistic_factors,
        })
    }

    fn base_profile(&mut self, patient_id: &str, config: &LoadConfig) -> PatientProfile {
        let gender = config.gender.unwrap_or_else(|| Gender::random(&mut self.rng));
        PatientProfile {
            patient_id: patient_id.to_string(),
            name: generate_name(gender, &mut self.rng),
            age: generate_age(config.age_range, &mut self.rng),
            gender,
            specialty: config.specialty,
            conditions: Vec::new(),
            medications: Vec::new(),
            symptoms: Vec::new(),
            vitals: VitalSigns::default(),
            social_context: SocialContext::default(),
            social_history: SocialHistory::default(),
        }
    }

    fn add_social_determinants(&mut self, profile: &mut PatientProfile) {
        let ctx = social::sample_social_context(&mut self.rng);
        let history = &mut profile.social_history;

        if ctx.has("poverty") {
            history.insurance_status = "Medicaid".into();
            history.occupation = pick(&["Unemployed", "Part-time", "Service Worker"], &mut self.rng);
        }
        if ctx.has("homelessness") {
            history.occupation = "Unemployed".into();
            history.marital_status = "Single".into();
        }
        if ctx.has("language_barriers") {
            history.primary_language = pick(&["Spanish", "French", "Mandarin"], &mut self.rng);
        }
        profile.social_context = ctx;
    }

    fn add_diseases(
        &mut self,
        profile: &mut PatientProfile,
        config: &LoadConfig,
        now: SimTime,
        diseases: &mut DiseaseProgressionEngine,
    ) -> SimResult<()> {
        let (lo, hi) = social::disease_count_range(config.complexity);
        let count = self.rng.gen_range(lo..=hi);
        let pool: Vec<&'static str> = match config.specialty {
            Some(specialty) => social::specialty_diseases(specialty).to_vec(),
            None => table::staged_diseases().collect(),
        };

        for name in pool.choose_multiple(&mut self.rng, count) {
            let (earliest, latest) = social::onset_hours_range(name);
            let hours_ago = self.rng.gen_range(earliest..=latest);
            let state = diseases.initialize_patient_disease(&profile.patient_id, name, now - hours_ago, now)?;

            profile.symptoms.extend(state.symptoms.iter().cloned());
            profile.conditions.push(state.disease.clone());
        }
        Ok(())
    }

    /// Sicker diseases may already carry one of their listed complications.
    fn add_complications(&mut self, patient_id: &str, diseases: &mut DiseaseProgressionEngine) {
        let candidates: Vec<(String, f64)> = diseases
            .patient_diseases(patient_id)
            .iter()
            .map(|d| (d.disease.clone(), d.severity))
            .collect();
        for (disease, severity) in candidates {
            if self.rng.gen::<f64>() >= social::initial_complication_risk(severity) {
                continue;
            }
            let listed = table::disease(&disease).map_or(&[][..], |d| d.complications);
            if let Some(complication) = listed.choose(&mut self.rng) {
                diseases.develop_complication(patient_id, complication, &disease);
            }
        }
    }
}

impl Default for DynamicPatientLoader {
    fn default() -> Self {
        Self::new(None)
    }
}

fn pick(options: &[&str], rng: &mut impl Rng) -> String {
    options.choose(rng).copied().unwrap_or_default().to_string()
}

/// Draw specialty, complexity and difficulty for an unscripted arrival.
pub fn random_load_config(rng: &mut impl Rng) -> LoadConfig {
    LoadConfig {
        specialty: Some(Specialty::draw(rng)),
        difficulty: Difficulty::draw(rng),
        complexity: Complexity::draw(rng),
        ..LoadConfig::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(config: &LoadConfig, seed: u64) -> (LoadedPatient, DiseaseProgressionEngine) {
        let mut engine = DiseaseProgressionEngine::new(Some(seed));
        let mut loader = DynamicPatientLoader::new(Some(seed));
        let patient = loader
            .load_patient("P001", config, 100.0, &mut engine)
            .expect("catalog diseases load");
        (patient, engine)
    }

    #[test]
    fn test_complex_patient_has_diseases() {
        let config = LoadConfig {
            complexity: Complexity::Complex,
            specialty: Some(Specialty::EmergencyMedicine),
            ..LoadConfig::default()
        };
        let (patient, engine) = load(&config, 4);
        let n = patient.disease_states.len();
        assert!((2..=4).contains(&n));
        assert_eq!(engine.patient_diseases("P001").len(), n);
        for state in &patient.disease_states {
            assert!(social::specialty_diseases(Specialty::EmergencyMedicine).contains(&state.disease.as_str()));
            assert!(patient.profile.conditions.contains(&state.disease));
            assert!(state.onset_time < 100.0);
        }
    }

    #[test]
    fn test_disabled_sections() {
        let config = LoadConfig {
            social_determinants: false,
            comorbidities: false,
            disease_progression: false,
            realistic_vitals: false,
            medication_history: false,
            ..LoadConfig::default()
        };
        let (patient, _) = load(&config, 9);
        assert!(patient.disease_states.is_empty());
        assert!(patient.profile.conditions.is_empty());
        assert!(patient.profile.medications.is_empty());
        assert_eq!(patient.profile.vitals, VitalSigns::default());
        assert_eq!(patient.profile.social_context, SocialContext::default());
    }

    #[test]
    fn test_demographic_overrides() {
        let config = LoadConfig {
            age_range: Some((70, 75)),
            gender: Some(Gender::Female),
            ..LoadConfig::default()
        };
        let (patient, _) = load(&config, 12);
        assert!((70..=75).contains(&patient.profile.age));
        assert_eq!(patient.profile.gender, Gender::Female);
    }

    #[test]
    fn test_scores_bounded() {
        let mut engine = DiseaseProgressionEngine::new(Some(1));
        let mut loader = DynamicPatientLoader::new(Some(1));
        let mut rng = StdRng::seed_from_u64(1);
        for i in 0..30 {
            let config = random_load_config(&mut rng);
            let patient = loader
                .load_patient(&format!("P{i:03}"), &config, 0.0, &mut engine)
                .unwrap();
            assert!((0.0..=1.0).contains(&patient.medical_complexity));
            assert!((0.0..=1.0).contains(&patient.risk_score));
            assert!(patient.profile.vitals.within_limits());
            for c in &patient.complications {
                assert!(patient.disease_states.iter().any(|d| d.complications.contains(&c.name)));
            }
        }
    }
}
