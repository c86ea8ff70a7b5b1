//! Organ systems, baseline physiology and dysfunction tiers.
//!
//! Every patient carries the same eleven organ systems. Each starts at a
//! function score of 1.0 with the baseline metrics below; disease and
//! intervention effects move both the score and the metrics.

use serde::{Deserialize, Serialize};

/// One of the eleven tracked organ systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OrganSystem {
    Cardiovascular,
    Respiratory,
    Renal,
    Hepatic,
    Neurological,
    Hematological,
    Immune,
    Endocrine,
    Gastrointestinal,
    Musculoskeletal,
    Integumentary,
}

impl OrganSystem {
    /// All organ systems in canonical order.
    pub const ALL: [OrganSystem; 11] = [
        OrganSystem::Cardiovascular,
        OrganSystem::Respiratory,
        OrganSystem::Renal,
        OrganSystem::Hepatic,
        OrganSystem::Neurological,
        OrganSystem::Hematological,
        OrganSystem::Immune,
        OrganSystem::Endocrine,
        OrganSystem::Gastrointestinal,
        OrganSystem::Musculoskeletal,
        OrganSystem::Integumentary,
    ];

    pub fn name(self) -> &'static str {
        match self {
            OrganSystem::Cardiovascular => "cardiovascular",
            OrganSystem::Respiratory => "respiratory",
            OrganSystem::Renal => "renal",
            OrganSystem::Hepatic => "hepatic",
            OrganSystem::Neurological => "neurological",
            OrganSystem::Hematological => "hematological",
            OrganSystem::Immune => "immune",
            OrganSystem::Endocrine => "endocrine",
            OrganSystem::Gastrointestinal => "gastrointestinal",
            OrganSystem::Musculoskeletal => "musculoskeletal",
            OrganSystem::Integumentary => "integumentary",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|o| o.name() == name)
    }

    /// Healthy adult reference values for this system's metrics.
    pub fn baseline_metrics(self) -> &'static [(&'static str, f64)] {
        match self {
            OrganSystem::Cardiovascular => &[
                ("cardiac_output", 5.0),
                ("stroke_volume", 70.0),
                ("ejection_fraction", 65.0),
                ("central_venous_pressure", 8.0),
                ("mean_arterial_pressure", 93.0),
            ],
            OrganSystem::Respiratory => &[
                ("tidal_volume", 500.0),
                ("vital_capacity", 4000.0),
                ("fev1", 3500.0),
                ("pao2", 95.0),
                ("paco2", 40.0),
            ],
            OrganSystem::Renal => &[
                ("glomerular_filtration_rate", 100.0),
                ("creatinine_clearance", 100.0),
                ("urine_specific_gravity", 1.020),
                ("sodium_excretion", 150.0),
                ("urine_output", 50.0),
            ],
            OrganSystem::Hepatic => &[
                ("bilirubin_total", 1.0),
                ("bilirubin_direct", 0.3),
                ("alt", 25.0),
                ("ast", 25.0),
                ("albumin", 4.0),
            ],
            OrganSystem::Neurological => &[
                ("glasgow_coma_scale", 15.0),
                ("pupil_size", 3.0),
                ("motor_response", 6.0),
                ("verbal_response", 5.0),
            ],
            OrganSystem::Hematological => &[
                ("hemoglobin", 14.0),
                ("white_blood_cells", 7000.0),
                ("platelets", 250_000.0),
                ("prothrombin_time", 12.0),
            ],
            OrganSystem::Immune => &[
                ("cd4_count", 800.0),
                ("immunoglobulin_g", 1000.0),
                ("complement_c3", 120.0),
                ("esr", 15.0),
            ],
            OrganSystem::Endocrine => &[
                ("glucose", 100.0),
                ("insulin", 10.0),
                ("cortisol", 15.0),
                ("tsh", 2.5),
            ],
            OrganSystem::Gastrointestinal => &[
                ("gastric_ph", 2.0),
                ("bowel_sounds", 1.0),
                ("liver_size", 15.0),
                ("spleen_size", 12.0),
            ],
            OrganSystem::Musculoskeletal => &[
                ("muscle_strength", 5.0),
                ("range_of_motion", 1.0),
                ("bone_density", 1.0),
                ("joint_stability", 1.0),
            ],
            OrganSystem::Integumentary => &[
                ("skin_turgor", 1.0),
                ("capillary_refill", 2.0),
                ("skin_temperature", 98.6),
                ("wound_healing", 1.0),
            ],
        }
    }

    /// Metrics surfaced in patient summaries.
    pub fn key_metrics(self) -> &'static [&'static str] {
        match self {
            OrganSystem::Cardiovascular => &[
                "cardiac_output",
                "ejection_fraction",
                "mean_arterial_pressure",
            ],
            OrganSystem::Respiratory => &["pao2", "paco2", "tidal_volume"],
            OrganSystem::Renal => &["glomerular_filtration_rate", "urine_output"],
            OrganSystem::Hepatic => &["bilirubin_total", "albumin", "alt"],
            OrganSystem::Neurological => &["glasgow_coma_scale"],
            OrganSystem::Hematological => &["hemoglobin", "platelets", "white_blood_cells"],
            OrganSystem::Immune => &["cd4_count"],
            OrganSystem::Endocrine => &["glucose", "insulin"],
            OrganSystem::Gastrointestinal => &["gastric_ph"],
            OrganSystem::Musculoskeletal => &["muscle_strength"],
            OrganSystem::Integumentary => &["skin_turgor", "capillary_refill"],
        }
    }

    /// Symptoms a patient shows once this system drops below
    /// [`SYMPTOMATIC_THRESHOLD`].
    pub fn dysfunction_symptoms(self) -> &'static [&'static str] {
        match self {
            OrganSystem::Cardiovascular => {
                &["chest_pain", "dyspnea", "fatigue", "edema", "palpitations"]
            }
            OrganSystem::Respiratory => &[
                "dyspnea",
                "cough",
                "wheezing",
                "cyanosis",
                "respiratory_distress",
            ],
            OrganSystem::Renal => &["oliguria", "edema", "hypertension", "fatigue", "nausea"],
            OrganSystem::Hepatic => &["jaundice", "ascites", "confusion", "bleeding", "fatigue"],
            OrganSystem::Neurological => {
                &["confusion", "seizures", "weakness", "numbness", "headache"]
            }
            OrganSystem::Hematological => &["bleeding", "bruising", "fatigue", "pallor", "fever"],
            OrganSystem::Immune => &["fever", "fatigue", "recurrent_infections", "weight_loss"],
            OrganSystem::Endocrine => &[
                "polyuria",
                "polydipsia",
                "weight_loss",
                "fatigue",
                "confusion",
            ],
            OrganSystem::Gastrointestinal => &[
                "nausea",
                "vomiting",
                "abdominal_pain",
                "diarrhea",
                "constipation",
            ],
            OrganSystem::Musculoskeletal => &["weakness", "pain", "stiffness", "decreased_mobility"],
            OrganSystem::Integumentary => &["rash", "ulcers", "edema", "pruritus", "discoloration"],
        }
    }
}

impl std::fmt::Display for OrganSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Below this score an organ contributes its dysfunction symptoms.
pub const SYMPTOMATIC_THRESHOLD: f64 = 0.5;

/// Below this score an organ also reports `<organ>_failure`.
pub const FAILURE_THRESHOLD: f64 = 0.3;

/// Below this score an organ triggers an organ-failure adverse event.
pub const ORGAN_FAILURE_EVENT_THRESHOLD: f64 = 0.2;

/// Function score recovered per hour by organs that can recover naturally.
pub const NATURAL_RECOVERY_RATE: f64 = 0.01;

/// Dysfunction tiers based on function score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DysfunctionTier {
    /// Score >= 0.7. Recovers on its own.
    Healthy,
    /// Score 0.4..0.7. Slow natural recovery.
    Light,
    /// Score 0.2..0.4. No natural recovery.
    Moderate,
    /// Score < 0.2. Failing.
    Critical,
}

impl DysfunctionTier {
    pub fn from_score(score: f64) -> Self {
        if score >= 0.7 {
            Self::Healthy
        } else if score >= 0.4 {
            Self::Light
        } else if score >= 0.2 {
            Self::Moderate
        } else {
            Self::Critical
        }
    }

    /// Whether the organ heals without intervention.
    pub fn can_recover_naturally(self) -> bool {
        matches!(self, Self::Healthy | Self::Light)
    }
}

/// Natural recovery for one organ over `delta_hours`.
///
/// Returns the new score. Organs at moderate or critical dysfunction do
/// not recover without intervention.
pub fn natural_recovery(score: f64, delta_hours: f64) -> f64 {
    if score >= 1.0 {
        return 1.0;
    }
    if DysfunctionTier::from_score(score).can_recover_naturally() {
        (score + NATURAL_RECOVERY_RATE * delta_hours.max(0.0)).min(1.0)
    } else {
        score
    }
}
