//! Social determinants, comorbidities and risk scoring for new patients.
//!
//! Everything here runs once, when a patient is synthesized. Nothing in
//! this module is time-stepped.

use crate::triage::{Complexity, Specialty};
use crate::vitals::VitalSigns;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy)]
pub struct SocialDeterminant {
    pub name: &'static str,
    /// Population prevalence, drawn independently per patient.
    pub frequency: f64,
    pub effects: &'static [&'static str],
    pub risk_multiplier: f64,
}

pub static SOCIAL_DETERMINANTS: &[SocialDeterminant] = &[
    SocialDeterminant {
        name: "poverty",
        frequency: 0.15,
        effects: &[
            "limited_access_to_care",
            "medication_noncompliance",
            "delayed_presentation",
        ],
        risk_multiplier: 1.5,
    },
    SocialDeterminant {
        name: "homelessness",
        frequency: 0.05,
        effects: &["poor_hygiene", "exposure", "substance_abuse"],
        risk_multiplier: 2.0,
    },
    SocialDeterminant {
        name: "language_barriers",
        frequency: 0.12,
        effects: &["communication_difficulty", "misunderstanding_instructions"],
        risk_multiplier: 1.3,
    },
    SocialDeterminant {
        name: "transportation_barriers",
        frequency: 0.08,
        effects: &["missed_appointments", "delayed_care"],
        risk_multiplier: 1.4,
    },
    SocialDeterminant {
        name: "food_insecurity",
        frequency: 0.10,
        effects: &["malnutrition", "diabetes_control_issues"],
        risk_multiplier: 1.6,
    },
    SocialDeterminant {
        name: "social_isolation",
        frequency: 0.07,
        effects: &["depression", "lack_of_support"],
        risk_multiplier: 1.2,
    },
    SocialDeterminant {
        name: "discrimination",
        frequency: 0.05,
        effects: &["mistrust_in_healthcare", "delayed_care"],
        risk_multiplier: 1.3,
    },
    SocialDeterminant {
        name: "health_literacy",
        frequency: 0.10,
        effects: &["misunderstanding_instructions", "poor_compliance"],
        risk_multiplier: 1.2,
    },
    SocialDeterminant {
        name: "housing_insecurity",
        frequency: 0.07,
        effects: &["unstable_housing", "missed_appointments"],
        risk_multiplier: 1.4,
    },
];

/// Determinants present for one patient and their combined effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialContext {
    pub determinants: Vec<String>,
    pub effects: Vec<String>,
    pub risk_multiplier: f64,
}

impl Default for SocialContext {
    fn default() -> Self {
        Self {
            determinants: Vec::new(),
            effects: Vec::new(),
            risk_multiplier: 1.0,
        }
    }
}

impl SocialContext {
    pub fn has(&self, determinant: &str) -> bool {
        self.determinants.iter().any(|d| d == determinant)
    }

    /// Builds a context from named determinants. Unknown names are skipped.
    pub fn from_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        let mut ctx = Self::default();
        for name in names {
            if let Some(d) = SOCIAL_DETERMINANTS.iter().find(|d| d.name == name) {
                ctx.push(d);
            }
        }
        ctx
    }

    fn push(&mut self, d: &SocialDeterminant) {
        self.determinants.push(d.name.to_string());
        self.effects.extend(d.effects.iter().map(|e| e.to_string()));
        self.risk_multiplier *= d.risk_multiplier;
    }
}

pub fn sample_social_context(rng: &mut impl Rng) -> SocialContext {
    let mut ctx = SocialContext::default();
    for d in SOCIAL_DETERMINANTS {
        if rng.gen::<f64>() < d.frequency {
            ctx.push(d);
        }
    }
    ctx
}

// ── Comorbidities and medications ──

#[derive(Debug, Clone, Copy)]
pub struct ComorbidityPattern {
    /// Matched as a substring of an existing condition.
    pub condition: &'static str,
    pub comorbidities: &'static [&'static str],
    pub risk_factors: &'static [&'static str],
}

pub const COMORBIDITY_CHANCE: f64 = 0.3;
pub const RISK_FACTOR_CHANCE: f64 = 0.4;

pub static COMORBIDITY_PATTERNS: &[ComorbidityPattern] = &[
    ComorbidityPattern {
        condition: "diabetes",
        comorbidities: &["hypertension", "hyperlipidemia", "diabetic_retinopathy"],
        risk_factors: &["obesity", "family_history", "sedentary_lifestyle"],
    },
    ComorbidityPattern {
        condition: "hypertension",
        comorbidities: &["diabetes", "heart_disease", "chronic_kidney_disease"],
        risk_factors: &["age", "obesity", "high_salt_diet"],
    },
    ComorbidityPattern {
        condition: "copd",
        comorbidities: &["heart_failure", "pneumonia", "depression"],
        risk_factors: &["smoking", "environmental_exposure", "age"],
    },
    ComorbidityPattern {
        condition: "heart_failure",
        comorbidities: &["hypertension", "diabetes", "atrial_fibrillation"],
        risk_factors: &["previous_mi", "valvular_disease", "age"],
    },
    ComorbidityPattern {
        condition: "lupus",
        comorbidities: &["renal_failure", "anemia", "vasculitis"],
        risk_factors: &["female", "african_ancestry", "autoimmune_disorder"],
    },
    ComorbidityPattern {
        condition: "coronary",
        comorbidities: &["hypertension", "hyperlipidemia", "diabetes"],
        risk_factors: &["smoking", "family_history", "age"],
    },
];

/// Adds comorbidities and risk factors implied by `conditions`, each with
/// an independent chance. Existing entries are never duplicated.
pub fn expand_comorbidities(conditions: &mut Vec<String>, rng: &mut impl Rng) {
    let snapshot = conditions.clone();
    for condition in &snapshot {
        for pattern in COMORBIDITY_PATTERNS
            .iter()
            .filter(|p| condition.contains(p.condition))
        {
            let draws = pattern
                .comorbidities
                .iter()
                .map(|c| (*c, COMORBIDITY_CHANCE))
                .chain(pattern.risk_factors.iter().map(|r| (*r, RISK_FACTOR_CHANCE)));
            for (extra, chance) in draws {
                if rng.gen::<f64>() < chance && !conditions.iter().any(|c| c == extra) {
                    conditions.push(extra.to_string());
                }
            }
        }
    }
}

fn condition_medications(condition: &str) -> &'static [&'static str] {
    if condition.contains("diabetes") {
        &["metformin", "insulin", "glipizide"]
    } else if condition.contains("hypertension") {
        &["lisinopril", "amlodipine", "hydrochlorothiazide"]
    } else if condition.contains("copd") {
        &["albuterol", "tiotropium", "prednisone"]
    } else if condition.contains("heart_failure") {
        &["furosemide", "carvedilol", "lisinopril"]
    } else if condition.contains("depression") {
        &["sertraline", "fluoxetine", "bupropion"]
    } else {
        &[]
    }
}

/// Home medication list. Patients over 65 add supplements; poverty caps the
/// list at two drugs. Order of first appearance is kept.
pub fn medication_history(conditions: &[String], age: u32, poverty: bool) -> Vec<String> {
    let mut meds: Vec<&str> = conditions
        .iter()
        .flat_map(|c| condition_medications(c))
        .copied()
        .collect();
    if age > 65 {
        meds.extend(["aspirin", "vitamin_d", "calcium"]);
    }
    if poverty {
        meds.truncate(2);
    }
    let mut seen = BTreeSet::new();
    meds.into_iter()
        .filter(|m| seen.insert(*m))
        .map(str::to_string)
        .collect()
}

// ── Presentation ──

/// Presenting vitals for a patient with the given `(disease, severity)`
/// pairs, with bounded random variation.
pub fn admission_vitals<'a>(
    diseases: impl IntoIterator<Item = (&'a str, f64)>,
    rng: &mut impl Rng,
) -> VitalSigns {
    let mut v = VitalSigns {
        heart_rate: 70.0,
        ..VitalSigns::default()
    };
    for (name, severity) in diseases {
        if name.contains("coronary") {
            v.heart_rate += (severity * 30.0).trunc();
            v.bp_systolic += (severity * 40.0).trunc();
            v.bp_diastolic += (severity * 20.0).trunc();
        } else if name.contains("pneumonia") {
            v.respiratory_rate += (severity * 10.0).trunc();
            v.oxygen_saturation -= (severity * 8.0).trunc();
            v.temperature += severity * 3.0;
        } else if name.contains("sepsis") {
            v.heart_rate += (severity * 40.0).trunc();
            v.respiratory_rate += (severity * 15.0).trunc();
            v.temperature += severity * 4.0;
            v.bp_systolic -= (severity * 20.0).trunc();
        } else if name.contains("stroke") {
            v.bp_systolic += (severity * 30.0).trunc();
            v.heart_rate += (severity * 15.0).trunc();
        }
    }

    v.heart_rate += f64::from(rng.gen_range(-5i32..=5));
    v.bp_systolic += f64::from(rng.gen_range(-10i32..=10));
    v.bp_diastolic += f64::from(rng.gen_range(-5i32..=5));
    v.respiratory_rate += f64::from(rng.gen_range(-2i32..=2));
    v.oxygen_saturation += f64::from(rng.gen_range(-2i32..=2));
    v.temperature += rng.gen_range(-0.5..=0.5);

    v.heart_rate = v.heart_rate.clamp(40.0, 180.0);
    v.bp_systolic = v.bp_systolic.clamp(80.0, 200.0);
    v.bp_diastolic = v.bp_diastolic.clamp(50.0, 120.0);
    v.respiratory_rate = v.respiratory_rate.clamp(8.0, 40.0);
    v.oxygen_saturation = v.oxygen_saturation.clamp(85.0, 100.0);
    v.temperature = v.temperature.clamp(95.0, 105.0);
    v.mean_arterial_pressure = VitalSigns::mean_arterial_from(v.bp_systolic, v.bp_diastolic);
    v
}

// ── Scores ──

/// Inputs shared by the complexity and risk scores.
#[derive(Debug, Clone, Copy)]
pub struct ScoreInputs<'a> {
    pub age: u32,
    pub conditions: &'a [String],
    pub severities: &'a [f64],
    pub complication_count: usize,
    pub medication_count: usize,
    pub social: &'a SocialContext,
}

/// Medical complexity in [0, 1].
pub fn medical_complexity(inputs: &ScoreInputs<'_>) -> f64 {
    let age = match inputs.age {
        a if a > 80 => 0.3,
        a if a > 65 => 0.2,
        a if a < 18 => 0.1,
        _ => 0.0,
    };
    let score = age
        + inputs.conditions.len() as f64 * 0.1
        + inputs.severities.iter().map(|s| s * 0.2).sum::<f64>()
        + inputs.complication_count as f64 * 0.15
        + inputs.social.determinants.len() as f64 * 0.1
        + inputs.medication_count as f64 * 0.05;
    score.min(1.0)
}

const HIGH_RISK_CONDITIONS: [&str; 4] = ["diabetes", "hypertension", "heart_failure", "copd"];

/// Overall risk in [0, 1]. Social determinants multiply the age and
/// severity terms only.
pub fn risk_score(inputs: &ScoreInputs<'_>) -> f64 {
    let age = match inputs.age {
        a if a > 80 => 0.4,
        a if a > 65 => 0.2,
        _ => 0.0,
    };
    let mut risk = age + inputs.severities.iter().map(|s| s * 0.3).sum::<f64>();
    risk *= inputs.social.risk_multiplier;
    let high_risk = inputs
        .conditions
        .iter()
        .filter(|c| HIGH_RISK_CONDITIONS.iter().any(|h| c.contains(*h)))
        .count();
    (risk + high_risk as f64 * 0.1).min(1.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthLiteracy {
    Low,
    Adequate,
}

/// Behavioural factors that shape how a patient presents and follows up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RealisticFactors {
    pub presentation_delay_hours: f64,
    pub medication_compliance: f64,
    pub follow_up_likelihood: f64,
    pub health_literacy: HealthLiteracy,
    pub communication_barriers: usize,
}

pub fn realistic_factors(ctx: &SocialContext) -> RealisticFactors {
    let mut delay = 0.0;
    let mut compliance: f64 = 0.8;
    let mut follow_up: f64 = 0.7;
    if ctx.has("poverty") {
        delay += 2.0;
        compliance -= 0.2;
        follow_up -= 0.2;
    }
    if ctx.has("homelessness") {
        delay += 4.0;
        compliance -= 0.4;
        follow_up -= 0.4;
    }
    if ctx.has("transportation_barriers") {
        delay += 1.5;
        follow_up -= 0.3;
    }
    if ctx.has("language_barriers") {
        delay += 1.0;
        compliance -= 0.1;
    }
    let health_literacy = if ctx.has("language_barriers") || ctx.has("health_literacy") {
        HealthLiteracy::Low
    } else {
        HealthLiteracy::Adequate
    };
    RealisticFactors {
        presentation_delay_hours: delay,
        medication_compliance: compliance.max(0.1),
        follow_up_likelihood: follow_up.max(0.1),
        health_literacy,
        communication_barriers: ctx
            .determinants
            .iter()
            .filter(|d| d.contains("language") || d.contains("barrier"))
            .count(),
    }
}

// ── Disease selection ──

/// Inclusive range of initial diseases for a case of this complexity.
pub fn disease_count_range(complexity: Complexity) -> (usize, usize) {
    match complexity {
        Complexity::Simple => (0, 1),
        Complexity::Moderate => (1, 2),
        Complexity::Complex => (2, 4),
    }
}

/// Diseases a specialty typically sees. All have full stage tables.
pub fn specialty_diseases(specialty: Specialty) -> &'static [&'static str] {
    match specialty {
        Specialty::EmergencyMedicine => &[
            "acute_coronary_syndrome",
            "sepsis",
            "stroke",
            "pneumonia",
            "diabetic_ketoacidosis",
            "aortic_dissection",
            "tension_pneumothorax",
            "cardiac_tamponade",
            "drug_induced_serotonin_syndrome",
        ],
        Specialty::Cardiology => &[
            "acute_coronary_syndrome",
            "aortic_dissection",
            "cardiac_tamponade",
            "drug_induced_qt_prolongation",
        ],
        Specialty::Neurology => &[
            "stroke",
            "autoimmune_encephalitis",
            "drug_induced_serotonin_syndrome",
        ],
        Specialty::Rheumatology => &[
            "rheumatoid_arthritis",
            "psoriasis",
            "drug_induced_lupus",
            "erythromelalgia",
        ],
        Specialty::Hematology => &[
            "sickle_cell_crisis",
            "immune_thrombocytopenia",
            "drug_induced_neutropenia",
        ],
        Specialty::InfectiousDisease => &["sepsis", "pneumonia", "pyelonephritis", "influenza"],
    }
}

/// Hours before arrival that a disease began. Acute presentations are recent.
pub fn onset_hours_range(disease: &str) -> (f64, f64) {
    match disease {
        "acute_coronary_syndrome" | "stroke" | "sepsis" => (0.5, 6.0),
        _ => (1.0, 72.0),
    }
}

/// Chance that a freshly synthesized disease already carries a complication.
pub fn initial_complication_risk(severity: f64) -> f64 {
    if severity > 0.7 {
        0.4
    } else if severity > 0.4 {
        0.2
    } else {
        0.05
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::disease;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_social_context_multiplies_risk() {
        let ctx = SocialContext::from_names(["poverty", "homelessness", "nonsense"]);
        assert_eq!(ctx.determinants.len(), 2);
        assert!((ctx.risk_multiplier - 3.0).abs() < 1e-9);
        assert_eq!(ctx.effects.len(), 6);
    }

    #[test]
    fn test_medication_history_rules() {
        let conditions = strings(&["diabetes_mellitus", "hypertension"]);
        let meds = medication_history(&conditions, 70, false);
        assert_eq!(meds.len(), 9);
        assert!(meds.contains(&"vitamin_d".to_string()));

        let poor = medication_history(&conditions, 70, true);
        assert_eq!(poor, strings(&["metformin", "insulin"]));

        let dup = medication_history(&strings(&["hypertension", "heart_failure"]), 40, false);
        assert_eq!(dup.iter().filter(|m| *m == "lisinopril").count(), 1);
    }

    #[test]
    fn test_expand_comorbidities_never_duplicates() {
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..50 {
            let mut conditions = strings(&["diabetes_mellitus", "hypertension"]);
            expand_comorbidities(&mut conditions, &mut rng);
            let unique: BTreeSet<_> = conditions.iter().collect();
            assert_eq!(unique.len(), conditions.len());
        }
    }

    #[test]
    fn test_admission_vitals_ranges() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..100 {
            let v = admission_vitals([("sepsis", 1.0), ("pneumonia", 1.0)], &mut rng);
            assert!((40.0..=180.0).contains(&v.heart_rate));
            assert!((85.0..=100.0).contains(&v.oxygen_saturation));
            assert!((95.0..=105.0).contains(&v.temperature));
            assert!(v.within_limits());
        }
    }

    #[test]
    fn test_scores_capped() {
        let conditions = strings(&["diabetes_mellitus", "hypertension", "copd", "heart_failure"]);
        let ctx = SocialContext::from_names(["homelessness"]);
        let inputs = ScoreInputs {
            age: 85,
            conditions: &conditions,
            severities: &[0.9, 0.8],
            complication_count: 2,
            medication_count: 8,
            social: &ctx,
        };
        assert_eq!(medical_complexity(&inputs), 1.0);
        assert_eq!(risk_score(&inputs), 1.0);

        let healthy_ctx = SocialContext::default();
        let young = ScoreInputs {
            age: 30,
            conditions: &[],
            severities: &[0.5],
            complication_count: 0,
            medication_count: 0,
            social: &healthy_ctx,
        };
        assert!((risk_score(&young) - 0.15).abs() < 1e-9);
        assert!((medical_complexity(&young) - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_realistic_factors_floor() {
        let ctx = SocialContext::from_names(["poverty", "homelessness", "transportation_barriers"]);
        let f = realistic_factors(&ctx);
        assert!((f.presentation_delay_hours - 7.5).abs() < 1e-9);
        assert!((f.medication_compliance - 0.2).abs() < 1e-9);
        assert!((f.follow_up_likelihood - 0.1).abs() < 1e-9);
        assert_eq!(f.communication_barriers, 1);
        assert_eq!(
            realistic_factors(&SocialContext::default()).health_literacy,
            HealthLiteracy::Adequate
        );
    }

    #[test]
    fn test_specialty_pools_are_staged_diseases() {
        for (specialty, _) in Specialty::WEIGHTS {
            for name in specialty_diseases(specialty) {
                let def = disease::disease(name).expect("pool disease registered");
                assert!(def.has_full_table(), "{name} lacks a stage table");
            }
        }
    }
}
