//! Effect tables keyed by (disease | intervention) × organ system.
//!
//! Disease and cross-organ effects are per-hour rates scaled by the time
//! step. Intervention effects apply once per administered intervention.

use crate::organs::OrganSystem;

/// Harm a set of diseases does to one organ.
#[derive(Debug, Clone, Copy)]
pub struct DiseaseOrganEffect {
    pub organ: OrganSystem,
    pub diseases: &'static [&'static str],
    /// Function score change per hour at severity 1.0.
    pub score_per_hour: f64,
    /// Metric changes per hour at severity 1.0.
    pub metrics_per_hour: &'static [(&'static str, f64)],
    /// Dysfunction tag and the disease severity above which it applies.
    pub dysfunction: (&'static str, f64),
}

impl DiseaseOrganEffect {
    pub fn applies_to(&self, disease: &str) -> bool {
        self.diseases.contains(&disease)
    }
}

/// Organ effects of a disease.
pub fn disease_effects(disease: &str) -> impl Iterator<Item = &'static DiseaseOrganEffect> + '_ {
    DISEASE_EFFECTS.iter().filter(move |e| e.applies_to(disease))
}

/// Effect of `disease` on `organ`, if any.
pub fn disease_effect(disease: &str, organ: OrganSystem) -> Option<&'static DiseaseOrganEffect> {
    DISEASE_EFFECTS
        .iter()
        .find(|e| e.organ == organ && e.applies_to(disease))
}

static DISEASE_EFFECTS: &[DiseaseOrganEffect] = &[
    DiseaseOrganEffect {
        organ: OrganSystem::Cardiovascular,
        diseases: &[
            "sepsis",
            "acute_coronary_syndrome",
            "heart_failure",
            "cardiac_tamponade",
            "aortic_dissection",
            "drug_induced_qt_prolongation",
            "atrial_fibrillation",
        ],
        score_per_hour: -0.10,
        metrics_per_hour: &[("cardiac_output", -0.5), ("ejection_fraction", -5.0)],
        dysfunction: ("cardiogenic_shock", 0.7),
    },
    DiseaseOrganEffect {
        organ: OrganSystem::Respiratory,
        diseases: &[
            "pneumonia",
            "sepsis",
            "acute_respiratory_distress_syndrome",
            "influenza",
            "tension_pneumothorax",
            "drug_induced_pneumonitis",
            "sickle_cell_crisis",
        ],
        score_per_hour: -0.12,
        metrics_per_hour: &[("pao2", -15.0), ("tidal_volume", -100.0)],
        dysfunction: ("respiratory_failure", 0.6),
    },
    DiseaseOrganEffect {
        organ: OrganSystem::Renal,
        diseases: &[
            "sepsis",
            "acute_kidney_injury",
            "heart_failure",
            "pyelonephritis",
            "drug_induced_kidney_disease",
            "chronic_kidney_disease",
            "diabetic_ketoacidosis",
        ],
        score_per_hour: -0.08,
        metrics_per_hour: &[("glomerular_filtration_rate", -20.0)],
        dysfunction: ("acute_kidney_injury", 0.8),
    },
    DiseaseOrganEffect {
        organ: OrganSystem::Hepatic,
        diseases: &[
            "sepsis",
            "liver_failure",
            "hepatitis",
            "drug_induced_liver_disease",
            "cirrhosis",
        ],
        score_per_hour: -0.06,
        metrics_per_hour: &[("albumin", -0.5)],
        dysfunction: ("hepatic_failure", 0.7),
    },
    DiseaseOrganEffect {
        organ: OrganSystem::Neurological,
        diseases: &[
            "stroke",
            "sepsis",
            "encephalopathy",
            "autoimmune_encephalitis",
            "drug_induced_serotonin_syndrome",
        ],
        score_per_hour: -0.15,
        metrics_per_hour: &[("glasgow_coma_scale", -3.0)],
        dysfunction: ("altered_mental_status", 0.6),
    },
    DiseaseOrganEffect {
        organ: OrganSystem::Hematological,
        diseases: &[
            "sepsis",
            "disseminated_intravascular_coagulation",
            "immune_thrombocytopenia",
            "sickle_cell_crisis",
            "drug_induced_neutropenia",
        ],
        score_per_hour: -0.10,
        metrics_per_hour: &[("platelets", -50_000.0)],
        dysfunction: ("coagulopathy", 0.7),
    },
    DiseaseOrganEffect {
        organ: OrganSystem::Immune,
        diseases: &["sepsis", "immunodeficiency", "drug_induced_neutropenia"],
        score_per_hour: -0.20,
        metrics_per_hour: &[("cd4_count", -200.0)],
        dysfunction: ("immunosuppression", 0.5),
    },
    DiseaseOrganEffect {
        organ: OrganSystem::Endocrine,
        diseases: &[
            "diabetes_mellitus",
            "diabetic_ketoacidosis",
            "drug_induced_diabetes",
            "diabetes_insipidus",
            "adrenal_insufficiency",
        ],
        score_per_hour: -0.05,
        metrics_per_hour: &[("glucose", 50.0)],
        dysfunction: ("metabolic_dysfunction", 0.6),
    },
    DiseaseOrganEffect {
        organ: OrganSystem::Gastrointestinal,
        diseases: &["sepsis", "bowel_obstruction", "pancreatitis"],
        score_per_hour: -0.07,
        metrics_per_hour: &[("gastric_ph", 1.0)],
        dysfunction: ("ileus", 0.6),
    },
    DiseaseOrganEffect {
        organ: OrganSystem::Musculoskeletal,
        diseases: &["sepsis", "immobility", "rheumatoid_arthritis"],
        score_per_hour: -0.03,
        metrics_per_hour: &[("muscle_strength", -1.0)],
        dysfunction: ("muscle_atrophy", 0.5),
    },
    DiseaseOrganEffect {
        organ: OrganSystem::Integumentary,
        diseases: &[
            "sepsis",
            "immobility",
            "psoriasis",
            "drug_induced_stevens_johnson",
            "erythromelalgia",
        ],
        score_per_hour: -0.04,
        metrics_per_hour: &[("skin_turgor", -0.2)],
        dysfunction: ("pressure_ulcer_risk", 0.6),
    },
];

/// One-shot effect of an intervention on one organ.
#[derive(Debug, Clone, Copy)]
pub struct InterventionOrganEffect {
    pub intervention: &'static str,
    pub organ: OrganSystem,
    pub score_delta: f64,
    pub metrics: &'static [(&'static str, f64)],
}

pub fn intervention_effects(
    intervention: &str,
) -> impl Iterator<Item = &'static InterventionOrganEffect> + '_ {
    INTERVENTION_EFFECTS
        .iter()
        .filter(move |e| e.intervention == intervention)
}

const fn ie(
    intervention: &'static str,
    organ: OrganSystem,
    score_delta: f64,
    metrics: &'static [(&'static str, f64)],
) -> InterventionOrganEffect {
    InterventionOrganEffect {
        intervention,
        organ,
        score_delta,
        metrics,
    }
}

static INTERVENTION_EFFECTS: &[InterventionOrganEffect] = &[
    ie(
        "vasopressor",
        OrganSystem::Cardiovascular,
        0.10,
        &[("cardiac_output", 0.5), ("mean_arterial_pressure", 10.0)],
    ),
    ie("antibiotic", OrganSystem::Immune, 0.05, &[("white_blood_cells", 1000.0)]),
    ie("diuretic", OrganSystem::Renal, 0.0, &[("urine_output", 20.0)]),
    ie(
        "diuretic",
        OrganSystem::Cardiovascular,
        0.0,
        &[("central_venous_pressure", -2.0)],
    ),
    ie("insulin", OrganSystem::Endocrine, 0.0, &[("glucose", -30.0)]),
    ie("sedative", OrganSystem::Neurological, 0.0, &[("glasgow_coma_scale", -2.0)]),
    ie("sedative", OrganSystem::Respiratory, -0.05, &[]),
    ie("intubation", OrganSystem::Respiratory, 0.15, &[("pao2", 10.0)]),
    ie("emergency_intubation", OrganSystem::Respiratory, 0.15, &[("pao2", 10.0)]),
    ie(
        "dialysis",
        OrganSystem::Renal,
        0.20,
        &[("glomerular_filtration_rate", 10.0)],
    ),
    ie("oxygen_therapy", OrganSystem::Respiratory, 0.0, &[("pao2", 5.0)]),
    ie(
        "mechanical_ventilation",
        OrganSystem::Respiratory,
        0.25,
        &[("tidal_volume", 200.0)],
    ),
    ie("noninvasive_ventilation", OrganSystem::Respiratory, 0.10, &[("pao2", 8.0)]),
    ie("bronchodilator", OrganSystem::Respiratory, 0.05, &[("fev1", 300.0)]),
    ie(
        "iv_fluids",
        OrganSystem::Cardiovascular,
        0.03,
        &[("central_venous_pressure", 2.0)],
    ),
    ie("iv_fluids", OrganSystem::Renal, 0.03, &[("urine_output", 10.0)]),
    ie("blood_transfusion", OrganSystem::Hematological, 0.10, &[("hemoglobin", 1.0)]),
    ie("anticoagulant", OrganSystem::Hematological, 0.0, &[("prothrombin_time", 3.0)]),
    ie("thrombolytic", OrganSystem::Cardiovascular, 0.10, &[]),
    ie("chest_tube", OrganSystem::Respiratory, 0.10, &[]),
    ie("needle_decompression", OrganSystem::Respiratory, 0.20, &[]),
    ie("needle_decompression", OrganSystem::Cardiovascular, 0.10, &[]),
    ie("pericardiocentesis", OrganSystem::Cardiovascular, 0.25, &[("cardiac_output", 1.0)]),
    ie("nutrition", OrganSystem::Gastrointestinal, 0.03, &[]),
];

/// Vital-sign effect of an intervention, applied after organ maps.
#[derive(Debug, Clone, Copy, Default)]
pub struct VitalEffect {
    pub bp_systolic: f64,
    pub mean_arterial_pressure: f64,
    pub respiratory_rate: f64,
    pub oxygen_saturation: f64,
    pub temperature: f64,
    pub sedates: bool,
}

pub fn vital_effect(intervention: &str) -> Option<VitalEffect> {
    let effect = match intervention {
        "vasopressor" => VitalEffect {
            bp_systolic: 15.0,
            mean_arterial_pressure: 10.0,
            ..VitalEffect::default()
        },
        "sedative" => VitalEffect {
            respiratory_rate: -3.0,
            sedates: true,
            ..VitalEffect::default()
        },
        "antibiotic" | "antipyretic" => VitalEffect {
            temperature: -0.5,
            ..VitalEffect::default()
        },
        "oxygen_therapy" => VitalEffect {
            oxygen_saturation: 3.0,
            ..VitalEffect::default()
        },
        "mechanical_ventilation" => VitalEffect {
            oxygen_saturation: 4.0,
            ..VitalEffect::default()
        },
        _ => return None,
    };
    Some(effect)
}

/// Degrees Fahrenheit added at severity 1.0 for febrile diseases.
pub fn fever_response(disease: &str) -> f64 {
    match disease {
        "sepsis" => 3.0,
        "pneumonia" | "pyelonephritis" | "influenza" => 2.0,
        "drug_induced_serotonin_syndrome" => 2.5,
        "autoimmune_encephalitis" | "drug_induced_neutropenia" => 1.0,
        _ => 0.0,
    }
}

/// Which organs a cross-organ rule penalizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionTarget {
    AllOthers,
    Organ(OrganSystem),
}

/// Dysfunction in one organ spilling into others.
#[derive(Debug, Clone, Copy)]
pub struct OrganInteraction {
    pub source: OrganSystem,
    /// Rule fires while the source score is below this.
    pub below: f64,
    pub target: InteractionTarget,
    /// Function score change per hour on each target.
    pub score_per_hour: f64,
    /// Metric change per hour on the target organ.
    pub metric_per_hour: Option<(&'static str, f64)>,
}

pub static ORGAN_INTERACTIONS: &[OrganInteraction] = &[
    OrganInteraction {
        source: OrganSystem::Cardiovascular,
        below: 0.6,
        target: InteractionTarget::AllOthers,
        score_per_hour: -0.05,
        metric_per_hour: None,
    },
    OrganInteraction {
        source: OrganSystem::Respiratory,
        below: 0.5,
        target: InteractionTarget::Organ(OrganSystem::Cardiovascular),
        score_per_hour: -0.08,
        metric_per_hour: Some(("cardiac_output", -1.0)),
    },
    // Fluid retention. The cardiovascular MAP metric keeps climbing for as
    // long as renal function stays low; it has no ceiling of its own. The
    // displayed vitals are clamped separately.
    OrganInteraction {
        source: OrganSystem::Renal,
        below: 0.4,
        target: InteractionTarget::Organ(OrganSystem::Cardiovascular),
        score_per_hour: 0.0,
        metric_per_hour: Some(("mean_arterial_pressure", 15.0)),
    },
    OrganInteraction {
        source: OrganSystem::Hepatic,
        below: 0.5,
        target: InteractionTarget::Organ(OrganSystem::Hematological),
        score_per_hour: 0.0,
        metric_per_hour: Some(("prothrombin_time", 3.0)),
    },
];

impl OrganInteraction {
    pub fn targets(&self, organ: OrganSystem) -> bool {
        match self.target {
            InteractionTarget::AllOthers => organ != self.source,
            InteractionTarget::Organ(o) => o == organ,
        }
    }
}
