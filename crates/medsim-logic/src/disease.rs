//! Disease staging tables and pure progression math.
//!
//! A disease advances through `Latent → Early → Moderate → Severe →
//! Critical` as hours since onset cross cumulative stage thresholds.
//! Severity is the stage baseline plus a small time bonus; treatment
//! pulls it back down through a persistent offset.

use serde::{Deserialize, Serialize};

/// Discrete disease-progression phase.
///
/// The five progression stages are ordered. `Resolving` and `Resolved` sit
/// after them and are only reached through treatment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DiseaseStage {
    Latent,
    Early,
    Moderate,
    Severe,
    Critical,
    Resolving,
    Resolved,
}

impl DiseaseStage {
    /// Time-driven stages in order.
    pub const PROGRESSION: [DiseaseStage; 5] = [
        DiseaseStage::Latent,
        DiseaseStage::Early,
        DiseaseStage::Moderate,
        DiseaseStage::Severe,
        DiseaseStage::Critical,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DiseaseStage::Latent => "latent",
            DiseaseStage::Early => "early",
            DiseaseStage::Moderate => "moderate",
            DiseaseStage::Severe => "severe",
            DiseaseStage::Critical => "critical",
            DiseaseStage::Resolving => "resolving",
            DiseaseStage::Resolved => "resolved",
        }
    }

    /// Whether the disease still contributes to the patient's physiology.
    pub fn is_active(self) -> bool {
        self != DiseaseStage::Resolved
    }

    fn table_index(self) -> Option<usize> {
        Self::PROGRESSION.iter().position(|s| *s == self)
    }
}

/// One row of a stage table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageSpec {
    /// Hours since onset at which this stage begins.
    pub threshold_hours: f64,
    /// Baseline severity while in this stage.
    pub severity: f64,
    pub symptoms: &'static [&'static str],
}

/// How well a disease responds to a named treatment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreatmentResponseEntry {
    pub treatment: &'static str,
    pub effectiveness: f64,
    pub response_time_hours: f64,
}

/// Static definition of a registered disease.
#[derive(Debug, Clone, Copy)]
pub struct DiseaseDefinition {
    pub name: &'static str,
    /// Latent..Critical rows. `None` falls back to [`DEFAULT_STAGES`].
    pub stages: Option<[StageSpec; 5]>,
    pub complications: &'static [&'static str],
    pub risk_factors: &'static [&'static str],
    pub progression_rate: f64,
    pub treatments: &'static [TreatmentResponseEntry],
}

impl DiseaseDefinition {
    pub fn stage_table(&self) -> &[StageSpec; 5] {
        self.stages.as_ref().unwrap_or(&DEFAULT_STAGES)
    }

    pub fn has_full_table(&self) -> bool {
        self.stages.is_some()
    }

    /// Effectiveness of `treatment` against this disease, if listed.
    pub fn treatment_response(&self, treatment: &str) -> Option<&TreatmentResponseEntry> {
        self.treatments.iter().find(|t| t.treatment == treatment)
    }
}

const fn st(threshold_hours: f64, severity: f64, symptoms: &'static [&'static str]) -> StageSpec {
    StageSpec {
        threshold_hours,
        severity,
        symptoms,
    }
}

const fn tr(
    treatment: &'static str,
    effectiveness: f64,
    response_time_hours: f64,
) -> TreatmentResponseEntry {
    TreatmentResponseEntry {
        treatment,
        effectiveness,
        response_time_hours,
    }
}

/// Staircase for diseases registered without their own table.
pub const DEFAULT_STAGES: [StageSpec; 5] = [
    st(0.0, 0.1, &[]),
    st(1.0, 0.3, &[]),
    st(2.0, 0.6, &[]),
    st(6.0, 0.8, &[]),
    st(12.0, 0.95, &[]),
];

/// Severity added per day since onset, saturating after 24h.
pub const TIME_SEVERITY_BONUS: f64 = 0.3;

/// Per-complication chance per tick, scaled by severity.
pub const COMPLICATION_RISK_FACTOR: f64 = 0.3;

/// Severity removed per unit of treatment effectiveness.
pub const TREATMENT_SEVERITY_REDUCTION: f64 = 0.3;

/// A treated disease whose effective severity drops below this resolves.
pub const RESOLVED_SEVERITY: f64 = 0.1;

/// Look up a registered disease.
pub fn disease(name: &str) -> Option<&'static DiseaseDefinition> {
    DISEASES.iter().find(|d| d.name == name)
}

/// Names of all registered diseases.
pub fn available_diseases() -> impl Iterator<Item = &'static str> {
    DISEASES.iter().map(|d| d.name)
}

/// Names of diseases with their own stage tables.
pub fn staged_diseases() -> impl Iterator<Item = &'static str> {
    DISEASES.iter().filter(|d| d.has_full_table()).map(|d| d.name)
}

/// Stage reached after `hours` since onset: the last stage whose
/// threshold is at or below `hours`.
pub fn stage_for_hours(def: &DiseaseDefinition, hours: f64) -> DiseaseStage {
    let table = def.stage_table();
    let mut stage = DiseaseStage::Latent;
    for (spec, candidate) in table.iter().zip(DiseaseStage::PROGRESSION) {
        if spec.threshold_hours <= hours {
            stage = candidate;
        }
    }
    stage
}

/// Baseline severity of a stage.
pub fn stage_severity(def: &DiseaseDefinition, stage: DiseaseStage) -> f64 {
    match stage.table_index() {
        Some(i) => def.stage_table()[i].severity,
        None => 0.0,
    }
}

/// Symptoms listed for a stage. Resolving and resolved diseases have none.
pub fn stage_symptoms(def: &DiseaseDefinition, stage: DiseaseStage) -> &'static [&'static str] {
    match (def.stages.as_ref(), stage.table_index()) {
        (Some(table), Some(i)) => table[i].symptoms,
        _ => &[],
    }
}

/// Untreated severity at `hours` since onset.
pub fn untreated_severity(def: &DiseaseDefinition, stage: DiseaseStage, hours: f64) -> f64 {
    let bonus = (hours.max(0.0) / 24.0).min(1.0) * TIME_SEVERITY_BONUS;
    (stage_severity(def, stage) + bonus).min(1.0)
}

/// Stage and severity after `hours` since onset with a cumulative
/// treatment offset applied.
pub fn restage(def: &DiseaseDefinition, hours: f64, treatment_offset: f64) -> (DiseaseStage, f64) {
    let stage = stage_for_hours(def, hours);
    let raw = untreated_severity(def, stage, hours);
    let severity = (raw - treatment_offset.max(0.0)).clamp(0.0, 1.0);

    if treatment_offset > 0.0 {
        if severity < RESOLVED_SEVERITY {
            return (DiseaseStage::Resolved, severity);
        }
        if severity < stage_severity(def, stage) {
            return (DiseaseStage::Resolving, severity);
        }
    }
    (stage, severity)
}

/// Per-disease outlook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Prognosis {
    Good,
    Fair,
    Poor,
    Critical,
}

pub fn disease_prognosis(stage: DiseaseStage) -> Prognosis {
    match stage {
        DiseaseStage::Latent | DiseaseStage::Early | DiseaseStage::Resolved => Prognosis::Good,
        DiseaseStage::Moderate | DiseaseStage::Resolving => Prognosis::Fair,
        DiseaseStage::Severe => Prognosis::Poor,
        DiseaseStage::Critical => Prognosis::Critical,
    }
}

/// Whole-patient outlook across all diseases and complications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OverallPrognosis {
    Healthy,
    Good,
    Fair,
    Poor,
    Critical,
}

/// `None` for `max_severity` means the patient has no diseases.
pub fn overall_prognosis(max_severity: Option<f64>, complication_count: usize) -> OverallPrognosis {
    let Some(max_severity) = max_severity else {
        return OverallPrognosis::Healthy;
    };
    if max_severity >= 0.8 || complication_count >= 3 {
        OverallPrognosis::Critical
    } else if max_severity >= 0.6 || complication_count >= 2 {
        OverallPrognosis::Poor
    } else if max_severity >= 0.4 || complication_count >= 1 {
        OverallPrognosis::Fair
    } else {
        OverallPrognosis::Good
    }
}

// ── Complications ───────────────────────────────────────────────────────

/// Broad category of a complication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComplicationType {
    Cardiovascular,
    Respiratory,
    Neurological,
    Renal,
    Hepatic,
    Hematological,
    Infectious,
    Metabolic,
    Systemic,
}

#[derive(Debug, Clone, Copy)]
pub struct ComplicationDefinition {
    pub name: &'static str,
    pub complication_type: ComplicationType,
    pub risk_factors: &'static [&'static str],
    pub symptoms: &'static [&'static str],
    pub treatments: &'static [&'static str],
    pub severity_range: (f64, f64),
}

/// Profile used for complications that have no dedicated entry.
pub static GENERIC_COMPLICATION: ComplicationDefinition = ComplicationDefinition {
    name: "generic",
    complication_type: ComplicationType::Systemic,
    risk_factors: &[],
    symptoms: &[],
    treatments: &[],
    severity_range: (0.3, 0.7),
};

pub fn complication(name: &str) -> Option<&'static ComplicationDefinition> {
    COMPLICATIONS.iter().find(|c| c.name == name)
}

pub fn complication_or_generic(name: &str) -> &'static ComplicationDefinition {
    complication(name).unwrap_or(&GENERIC_COMPLICATION)
}

pub fn available_complications() -> impl Iterator<Item = &'static str> {
    COMPLICATIONS.iter().map(|c| c.name)
}

static COMPLICATIONS: &[ComplicationDefinition] = &[
    ComplicationDefinition {
        name: "status_epilepticus",
        complication_type: ComplicationType::Neurological,
        risk_factors: &["epilepsy", "encephalitis"],
        symptoms: &["continuous seizures", "unresponsiveness"],
        treatments: &["benzodiazepines", "antiepileptics"],
        severity_range: (0.8, 1.0),
    },
    ComplicationDefinition {
        name: "acute_chest_syndrome",
        complication_type: ComplicationType::Respiratory,
        risk_factors: &["sickle_cell_disease", "infection"],
        symptoms: &["chest pain", "hypoxemia", "infiltrates on xray"],
        treatments: &["oxygen", "antibiotics", "exchange_transfusion"],
        severity_range: (0.7, 1.0),
    },
    ComplicationDefinition {
        name: "arrhythmia",
        complication_type: ComplicationType::Cardiovascular,
        risk_factors: &["myocardial_infarction", "electrolyte_imbalance"],
        symptoms: &["palpitations", "dizziness", "syncope"],
        treatments: &["antiarrhythmics", "cardioversion", "pacemaker"],
        severity_range: (0.4, 0.8),
    },
    ComplicationDefinition {
        name: "cardiogenic_shock",
        complication_type: ComplicationType::Cardiovascular,
        risk_factors: &["extensive_mi", "heart_failure"],
        symptoms: &["hypotension", "cold_extremities", "altered_mental_status"],
        treatments: &["inotropes", "intra_aortic_balloon_pump", "mechanical_support"],
        severity_range: (0.8, 1.0),
    },
    ComplicationDefinition {
        name: "pleural_effusion",
        complication_type: ComplicationType::Respiratory,
        risk_factors: &["pneumonia", "heart_failure", "malignancy"],
        symptoms: &["shortness_of_breath", "chest_pain", "cough"],
        treatments: &["thoracentesis", "chest_tube", "diuretics"],
        severity_range: (0.3, 0.7),
    },
    ComplicationDefinition {
        name: "cerebral_edema",
        complication_type: ComplicationType::Neurological,
        risk_factors: &["stroke", "trauma", "metabolic_disorder"],
        symptoms: &["headache", "nausea", "altered_mental_status"],
        treatments: &["mannitol", "hypertonic_saline", "decompressive_craniectomy"],
        severity_range: (0.7, 1.0),
    },
    ComplicationDefinition {
        name: "acute_kidney_injury",
        complication_type: ComplicationType::Renal,
        risk_factors: &["sepsis", "hypotension", "nephrotoxins"],
        symptoms: &["oliguria", "edema", "confusion"],
        treatments: &["fluid_resuscitation", "dialysis", "nephroprotective_measures"],
        severity_range: (0.5, 0.9),
    },
    ComplicationDefinition {
        name: "respiratory_failure",
        complication_type: ComplicationType::Respiratory,
        risk_factors: &["pneumonia", "neuromuscular_weakness", "sedation"],
        symptoms: &["severe_dyspnea", "cyanosis", "hypoxemia"],
        treatments: &["oxygen", "noninvasive_ventilation", "intubation"],
        severity_range: (0.7, 1.0),
    },
    ComplicationDefinition {
        name: "heart_failure",
        complication_type: ComplicationType::Cardiovascular,
        risk_factors: &["myocardial_infarction", "hypertension"],
        symptoms: &["dyspnea", "orthopnea", "edema"],
        treatments: &["diuretics", "ace_inhibitors", "beta_blockers"],
        severity_range: (0.5, 0.9),
    },
    ComplicationDefinition {
        name: "sepsis",
        complication_type: ComplicationType::Infectious,
        risk_factors: &["pneumonia", "immunocompromised", "indwelling_lines"],
        symptoms: &["fever", "tachycardia", "hypotension"],
        treatments: &["antibiotics", "fluids", "vasopressors"],
        severity_range: (0.6, 1.0),
    },
    ComplicationDefinition {
        name: "acute_respiratory_distress_syndrome",
        complication_type: ComplicationType::Respiratory,
        risk_factors: &["sepsis", "aspiration", "trauma"],
        symptoms: &["refractory_hypoxemia", "bilateral_infiltrates"],
        treatments: &["mechanical_ventilation", "prone_positioning"],
        severity_range: (0.7, 1.0),
    },
    ComplicationDefinition {
        name: "disseminated_intravascular_coagulation",
        complication_type: ComplicationType::Hematological,
        risk_factors: &["sepsis", "trauma", "malignancy"],
        symptoms: &["bleeding", "petechiae", "organ_dysfunction"],
        treatments: &["blood_products", "treat_underlying_cause"],
        severity_range: (0.7, 1.0),
    },
    ComplicationDefinition {
        name: "seizures",
        complication_type: ComplicationType::Neurological,
        risk_factors: &["stroke", "electrolyte_imbalance", "encephalitis"],
        symptoms: &["convulsions", "postictal_confusion"],
        treatments: &["benzodiazepines", "antiepileptics"],
        severity_range: (0.5, 0.9),
    },
    ComplicationDefinition {
        name: "cardiac_arrest",
        complication_type: ComplicationType::Cardiovascular,
        risk_factors: &["arrhythmia", "hypoxia", "hyperkalemia"],
        symptoms: &["pulselessness", "apnea", "unresponsiveness"],
        treatments: &["cpr", "defibrillation", "epinephrine"],
        severity_range: (0.9, 1.0),
    },
    ComplicationDefinition {
        name: "hypokalemia",
        complication_type: ComplicationType::Metabolic,
        risk_factors: &["insulin_therapy", "diuretics"],
        symptoms: &["weakness", "cramps", "arrhythmia"],
        treatments: &["potassium_replacement"],
        severity_range: (0.3, 0.7),
    },
    ComplicationDefinition {
        name: "deep_vein_thrombosis",
        complication_type: ComplicationType::Hematological,
        risk_factors: &["immobility", "hypercoagulability"],
        symptoms: &["leg_swelling", "calf_pain"],
        treatments: &["anticoagulation"],
        severity_range: (0.3, 0.6),
    },
];

// ── Treatments ──────────────────────────────────────────────────────────

/// A treatment the progression engine can administer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreatmentDefinition {
    pub name: &'static str,
    pub category: &'static str,
    pub effectiveness: f64,
    pub side_effects: &'static [&'static str],
    pub contraindications: &'static [&'static str],
    pub dosage: &'static str,
    pub route: &'static str,
}

/// Response bucket for an administered treatment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TreatmentResponse {
    Excellent,
    Good,
    Moderate,
    Poor,
    Resistant,
}

impl TreatmentResponse {
    pub fn from_effectiveness(effectiveness: f64) -> Self {
        if effectiveness >= 0.8 {
            Self::Excellent
        } else if effectiveness >= 0.6 {
            Self::Good
        } else if effectiveness >= 0.4 {
            Self::Moderate
        } else if effectiveness >= 0.2 {
            Self::Poor
        } else {
            Self::Resistant
        }
    }
}

/// Side-effect probability per listed side effect.
pub fn side_effect_probability(effectiveness: f64) -> f64 {
    (0.3 * (1.0 - effectiveness)).clamp(0.0, 1.0)
}

/// Effectiveness multiplier from the sickest disease the patient carries.
/// Never below 0.1.
pub fn treatment_modifier(max_severity: Option<f64>) -> f64 {
    match max_severity {
        Some(s) => (1.0 - s * 0.3).max(0.1),
        None => 1.0,
    }
}

/// Look up a treatment.
///
/// Treatments that only appear in disease response tables get a derived
/// definition carrying the best listed effectiveness.
pub fn treatment(name: &str) -> Option<TreatmentDefinition> {
    if let Some(def) = TREATMENTS.iter().find(|t| t.name == name) {
        return Some(*def);
    }
    let listed = DISEASES
        .iter()
        .filter_map(|d| d.treatment_response(name))
        .max_by(|a, b| a.effectiveness.total_cmp(&b.effectiveness))?;
    Some(TreatmentDefinition {
        name: listed.treatment,
        category: "disease_specific",
        effectiveness: listed.effectiveness,
        side_effects: &[],
        contraindications: &[],
        dosage: "variable",
        route: "iv",
    })
}

/// Every administrable treatment name, defined or listed, without duplicates.
pub fn available_treatments() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = TREATMENTS.iter().map(|t| t.name).collect();
    for d in DISEASES {
        for t in d.treatments {
            if !names.contains(&t.treatment) {
                names.push(t.treatment);
            }
        }
    }
    names
}

static TREATMENTS: &[TreatmentDefinition] = &[
    TreatmentDefinition {
        name: "ivig",
        category: "immunotherapy",
        effectiveness: 0.8,
        side_effects: &["headache", "renal_dysfunction"],
        contraindications: &["selective_iga_deficiency"],
        dosage: "2g/kg",
        route: "iv",
    },
    TreatmentDefinition {
        name: "plasmapheresis",
        category: "immunotherapy",
        effectiveness: 0.6,
        side_effects: &["hypotension", "bleeding"],
        contraindications: &["coagulopathy"],
        dosage: "variable",
        route: "iv",
    },
    TreatmentDefinition {
        name: "exchange_transfusion",
        category: "hematology",
        effectiveness: 0.9,
        side_effects: &["transfusion_reaction", "volume_overload"],
        contraindications: &["heart_failure"],
        dosage: "variable",
        route: "iv",
    },
    TreatmentDefinition {
        name: "aspirin",
        category: "antiplatelet",
        effectiveness: 0.8,
        side_effects: &["gastrointestinal_bleeding", "allergic_reaction"],
        contraindications: &["active_bleeding", "allergy"],
        dosage: "325mg",
        route: "oral",
    },
    TreatmentDefinition {
        name: "nitroglycerin",
        category: "vasodilator",
        effectiveness: 0.7,
        side_effects: &["headache", "hypotension"],
        contraindications: &["severe_hypotension", "viagra_use"],
        dosage: "0.4mg",
        route: "sublingual",
    },
    TreatmentDefinition {
        name: "antibiotics",
        category: "antimicrobial",
        effectiveness: 0.85,
        side_effects: &["diarrhea", "allergic_reaction", "resistance"],
        contraindications: &["allergy", "pregnancy"],
        dosage: "variable",
        route: "iv/oral",
    },
    TreatmentDefinition {
        name: "insulin",
        category: "hormone",
        effectiveness: 0.95,
        side_effects: &["hypoglycemia", "weight_gain"],
        contraindications: &["hypoglycemia"],
        dosage: "variable",
        route: "subcutaneous",
    },
    TreatmentDefinition {
        name: "tpa",
        category: "thrombolytic",
        effectiveness: 0.9,
        side_effects: &["intracranial_hemorrhage", "systemic_bleeding"],
        contraindications: &["recent_surgery", "bleeding_disorder"],
        dosage: "0.9mg/kg",
        route: "iv",
    },
];

// ── Disease table ───────────────────────────────────────────────────────

static DISEASES: &[DiseaseDefinition] = &[
    DiseaseDefinition {
        name: "autoimmune_encephalitis",
        stages: Some([
            st(0.0, 0.0, &[]),
            st(24.0, 0.2, &["headache", "fever"]),
            st(48.0, 0.6, &["confusion", "seizures"]),
            st(72.0, 0.9, &["psychosis", "coma"]),
            st(96.0, 1.0, &["respiratory failure"]),
        ]),
        complications: &["status_epilepticus", "respiratory_failure"],
        risk_factors: &["autoimmune_disorder", "young_adult"],
        progression_rate: 0.1,
        treatments: &[
            tr("steroids", 0.7, 1.0),
            tr("ivig", 0.8, 2.0),
            tr("plasmapheresis", 0.6, 2.5),
        ],
    },
    DiseaseDefinition {
        name: "sickle_cell_crisis",
        stages: Some([
            st(0.0, 0.0, &[]),
            st(6.0, 0.3, &["pain"]),
            st(12.0, 0.6, &["severe pain", "tachycardia"]),
            st(24.0, 0.9, &["acute chest syndrome", "splenic sequestration"]),
            st(36.0, 1.0, &["multi-organ failure"]),
        ]),
        complications: &["acute_chest_syndrome", "stroke", "renal_failure"],
        risk_factors: &["sickle_cell_trait", "infection", "dehydration"],
        progression_rate: 0.2,
        treatments: &[
            tr("opioids", 0.8, 0.5),
            tr("oxygen", 0.7, 0.3),
            tr("exchange_transfusion", 0.9, 1.5),
        ],
    },
    DiseaseDefinition {
        name: "acute_coronary_syndrome",
        stages: Some([
            st(0.0, 0.0, &[]),
            st(1.0, 0.3, &["chest discomfort"]),
            st(2.0, 0.6, &["chest pain", "shortness of breath"]),
            st(4.0, 0.8, &["severe chest pain", "sweating", "nausea"]),
            st(6.0, 1.0, &["crushing chest pain", "cardiac arrest"]),
        ]),
        complications: &[
            "arrhythmia",
            "cardiogenic_shock",
            "heart_failure",
            "ventricular_fibrillation",
            "cardiac_rupture",
        ],
        risk_factors: &["hypertension", "diabetes", "smoking", "hyperlipidemia"],
        progression_rate: 0.15,
        treatments: &[
            tr("aspirin", 0.8, 0.5),
            tr("nitroglycerin", 0.7, 0.3),
            tr("thrombolytics", 0.9, 1.0),
        ],
    },
    DiseaseDefinition {
        name: "pneumonia",
        stages: Some([
            st(0.0, 0.0, &[]),
            st(12.0, 0.3, &["cough", "fever"]),
            st(24.0, 0.6, &["cough", "fever", "shortness of breath"]),
            st(48.0, 0.8, &["severe cough", "high fever", "respiratory distress"]),
            st(72.0, 1.0, &["respiratory failure", "sepsis"]),
        ]),
        complications: &["pleural_effusion", "empyema", "sepsis", "respiratory_failure"],
        risk_factors: &["smoking", "copd", "immunocompromised", "age"],
        progression_rate: 0.08,
        treatments: &[
            tr("antibiotics", 0.85, 2.0),
            tr("oxygen_therapy", 0.9, 0.5),
            tr("steroids", 0.7, 1.5),
        ],
    },
    DiseaseDefinition {
        name: "diabetic_ketoacidosis",
        stages: Some([
            st(0.0, 0.0, &[]),
            st(6.0, 0.3, &["polyuria", "polydipsia"]),
            st(12.0, 0.6, &["nausea", "vomiting", "abdominal pain"]),
            st(18.0, 0.8, &["dehydration", "confusion", "kussmaul_breathing"]),
            st(24.0, 1.0, &["coma", "shock"]),
        ]),
        complications: &[
            "cerebral_edema",
            "hypokalemia",
            "acute_renal_failure",
            "acute_kidney_injury",
            "electrolyte_imbalance",
            "cardiac_arrest",
        ],
        risk_factors: &["type_1_diabetes", "infection", "noncompliance"],
        progression_rate: 0.12,
        treatments: &[
            tr("insulin", 0.95, 1.0),
            tr("fluids", 0.9, 0.5),
            tr("electrolytes", 0.8, 1.5),
        ],
    },
    DiseaseDefinition {
        name: "sepsis",
        stages: Some([
            st(0.0, 0.0, &[]),
            st(2.0, 0.4, &["fever", "tachycardia"]),
            st(4.0, 0.6, &["fever", "tachycardia", "tachypnea"]),
            st(6.0, 0.8, &["hypotension", "organ_dysfunction"]),
            st(8.0, 1.0, &["shock", "multiple_organ_failure"]),
        ]),
        complications: &[
            "acute_respiratory_distress_syndrome",
            "acute_kidney_injury",
            "disseminated_intravascular_coagulation",
        ],
        risk_factors: &["immunocompromised", "elderly", "chronic_disease"],
        progression_rate: 0.25,
        treatments: &[
            tr("antibiotics", 0.8, 1.5),
            tr("fluids", 0.9, 0.5),
            tr("vasopressors", 0.7, 1.0),
        ],
    },
    DiseaseDefinition {
        name: "stroke",
        stages: Some([
            st(0.0, 0.0, &[]),
            st(0.5, 0.5, &["sudden_weakness", "speech_difficulty"]),
            st(1.0, 0.7, &["hemiparesis", "aphasia"]),
            st(2.0, 0.9, &["severe_hemiparesis", "coma"]),
            st(4.0, 1.0, &["brain_herniation", "death"]),
        ]),
        complications: &[
            "cerebral_edema",
            "hemorrhagic_transformation",
            "seizures",
            "dysphagia",
            "aspiration_pneumonia",
            "deep_vein_thrombosis",
            "herniation",
            "hydrocephalus",
        ],
        risk_factors: &["hypertension", "atrial_fibrillation", "diabetes", "smoking"],
        progression_rate: 0.5,
        treatments: &[
            tr("tpa", 0.9, 0.5),
            tr("mechanical_thrombectomy", 0.95, 1.0),
            tr("blood_pressure_control", 0.8, 0.5),
        ],
    },
    DiseaseDefinition {
        name: "rheumatoid_arthritis",
        stages: Some([
            st(0.0, 0.0, &[]),
            st(48.0, 0.2, &["joint_pain", "fatigue"]),
            st(168.0, 0.5, &["joint_pain", "swelling", "morning_stiffness"]),
            st(720.0, 0.8, &["joint_pain", "deformity", "fatigue"]),
            st(1440.0, 1.0, &["joint_pain", "loss_of_function", "systemic_symptoms"]),
        ]),
        complications: &["joint_destruction", "vasculitis", "anemia"],
        risk_factors: &["female", "family_history", "smoking"],
        progression_rate: 0.01,
        treatments: &[
            tr("nsaids", 0.5, 1.0),
            tr("dmards", 0.8, 2.0),
            tr("steroids", 0.7, 1.0),
        ],
    },
    DiseaseDefinition {
        name: "psoriasis",
        stages: Some([
            st(0.0, 0.0, &[]),
            st(72.0, 0.2, &["rash", "itching"]),
            st(336.0, 0.5, &["rash", "scaling", "joint_pain"]),
            st(720.0, 0.8, &["rash", "erythroderma", "arthropathy"]),
            st(1440.0, 1.0, &["rash", "systemic_symptoms"]),
        ]),
        complications: &["psoriatic_arthritis", "infection"],
        risk_factors: &["family_history", "stress", "obesity"],
        progression_rate: 0.01,
        treatments: &[
            tr("topical_steroids", 0.7, 1.0),
            tr("phototherapy", 0.6, 2.0),
            tr("biologics", 0.8, 3.0),
        ],
    },
    DiseaseDefinition {
        name: "pyelonephritis",
        stages: Some([
            st(0.0, 0.0, &[]),
            st(12.0, 0.3, &["dysuria", "fever"]),
            st(24.0, 0.6, &["dysuria", "flank_pain", "nausea"]),
            st(48.0, 0.8, &["dysuria", "vomiting", "sepsis"]),
            st(72.0, 1.0, &["shock", "multi_organ_failure"]),
        ]),
        complications: &["renal_abscess", "sepsis", "acute_kidney_injury"],
        risk_factors: &["female", "urinary_tract_abnormality", "diabetes"],
        progression_rate: 0.1,
        treatments: &[tr("antibiotics", 0.9, 1.0), tr("fluids", 0.8, 0.5)],
    },
    DiseaseDefinition {
        name: "diabetes_insipidus",
        stages: Some([
            st(0.0, 0.0, &[]),
            st(24.0, 0.3, &["polyuria", "polydipsia"]),
            st(48.0, 0.6, &["polyuria", "dehydration", "fatigue"]),
            st(72.0, 0.8, &["polyuria", "confusion", "electrolyte_imbalance"]),
            st(96.0, 1.0, &["coma", "shock"]),
        ]),
        complications: &["severe_dehydration", "seizures"],
        risk_factors: &["head_trauma", "pituitary_tumor", "genetic"],
        progression_rate: 0.1,
        treatments: &[tr("desmopressin", 0.95, 1.0), tr("fluids", 0.8, 0.5)],
    },
    DiseaseDefinition {
        name: "immune_thrombocytopenia",
        stages: Some([
            st(0.0, 0.0, &[]),
            st(24.0, 0.3, &["easy_bruising", "petechiae"]),
            st(48.0, 0.6, &["easy_bruising", "mucosal_bleeding"]),
            st(72.0, 0.9, &["easy_bruising", "severe_bleeding"]),
            st(96.0, 1.0, &["life_threatening_bleed"]),
        ]),
        complications: &["intracranial_hemorrhage", "severe_anemia"],
        risk_factors: &["autoimmune_disease", "recent_infection", "medications"],
        progression_rate: 0.1,
        treatments: &[tr("steroids", 0.7, 1.0), tr("ivig", 0.8, 1.5)],
    },
    DiseaseDefinition {
        name: "schizophrenia",
        stages: Some([
            st(0.0, 0.0, &[]),
            st(168.0, 0.3, &["hallucinations", "delusions"]),
            st(720.0, 0.6, &["hallucinations", "disorganized_thoughts", "social_withdrawal"]),
            st(1440.0, 0.9, &["hallucinations", "catatonia", "aggression"]),
            st(2880.0, 1.0, &["suicidal_behavior", "violent_behavior"]),
        ]),
        complications: &["self_harm", "substance_abuse", "homelessness"],
        risk_factors: &["family_history", "urban_environment", "cannabis_use"],
        progression_rate: 0.005,
        treatments: &[tr("antipsychotics", 0.8, 2.0), tr("psychotherapy", 0.5, 4.0)],
    },
    DiseaseDefinition {
        name: "erythromelalgia",
        stages: Some([
            st(0.0, 0.0, &[]),
            st(12.0, 0.3, &["erythromelalgia", "burning_pain"]),
            st(24.0, 0.6, &["erythromelalgia", "swelling"]),
            st(48.0, 0.8, &["erythromelalgia", "ulceration"]),
            st(72.0, 1.0, &["erythromelalgia", "gangrene"]),
        ]),
        complications: &["ulceration", "infection", "gangrene"],
        risk_factors: &["myeloproliferative_disorder", "autoimmune_disease"],
        progression_rate: 0.05,
        treatments: &[tr("aspirin", 0.7, 1.0), tr("cooling", 0.6, 0.5)],
    },
    DiseaseDefinition {
        name: "influenza",
        stages: Some([
            st(0.0, 0.0, &[]),
            st(24.0, 0.2, &["fever", "cough", "fatigue"]),
            st(48.0, 0.5, &["fever", "cough", "myalgia", "headache"]),
            st(96.0, 0.8, &["fever", "shortness_of_breath", "chest_pain"]),
            st(168.0, 1.0, &["respiratory_failure", "shock"]),
        ]),
        complications: &["pneumonia", "myocarditis", "encephalitis"],
        risk_factors: &["elderly", "immunocompromised", "chronic_disease"],
        progression_rate: 0.08,
        treatments: &[tr("antivirals", 0.7, 1.0), tr("supportive_care", 0.6, 0.5)],
    },
    DiseaseDefinition {
        name: "diabetes_mellitus",
        stages: Some([
            st(0.0, 0.0, &[]),
            st(720.0, 0.2, &["polyuria", "polydipsia", "fatigue"]),
            st(8760.0, 0.5, &["polyuria", "blurred_vision", "weight_loss"]),
            st(17520.0, 0.8, &["polyuria", "neuropathy", "retinopathy"]),
            st(26280.0, 1.0, &["coma", "multi_organ_failure"]),
        ]),
        complications: &[
            "diabetic_ketoacidosis",
            "chronic_kidney_disease",
            "coronary_artery_disease",
        ],
        risk_factors: &["obesity", "family_history", "sedentary_lifestyle"],
        progression_rate: 0.001,
        treatments: &[
            tr("insulin", 0.95, 1.0),
            tr("oral_hypoglycemics", 0.8, 2.0),
            tr("lifestyle_modification", 0.7, 6.0),
        ],
    },
    DiseaseDefinition {
        name: "hypertension",
        stages: None,
        complications: &["stroke", "heart_failure", "chronic_kidney_disease"],
        risk_factors: &[],
        progression_rate: 0.01,
        treatments: &[],
    },
    DiseaseDefinition {
        name: "atrial_fibrillation",
        stages: None,
        complications: &["stroke", "heart_failure"],
        risk_factors: &[],
        progression_rate: 0.01,
        treatments: &[],
    },
    DiseaseDefinition {
        name: "chronic_kidney_disease",
        stages: None,
        complications: &["anemia", "bone_disease", "pericarditis"],
        risk_factors: &[],
        progression_rate: 0.01,
        treatments: &[],
    },
    DiseaseDefinition {
        name: "cirrhosis",
        stages: None,
        complications: &[
            "hepatic_encephalopathy",
            "spontaneous_bacterial_peritonitis",
            "hepatorenal_syndrome",
        ],
        risk_factors: &[],
        progression_rate: 0.01,
        treatments: &[],
    },
    DiseaseDefinition {
        name: "drug_induced_lupus",
        stages: Some([
            st(0.0, 0.0, &[]),
            st(168.0, 0.3, &["rash", "joint_pain", "fatigue"]),
            st(720.0, 0.6, &["rash", "joint_pain", "fever", "photosensitivity"]),
            st(1440.0, 0.8, &["rash", "pleuritis", "pericarditis"]),
            st(2880.0, 1.0, &["nephritis", "central_nervous_system_involvement"]),
        ]),
        complications: &["nephritis", "pericarditis", "pleuritis"],
        risk_factors: &["procainamide", "hydralazine", "isoniazid", "minocycline"],
        progression_rate: 0.01,
        treatments: &[
            tr("discontinue_offending_drug", 0.9, 2.0),
            tr("steroids", 0.7, 1.0),
        ],
    },
    DiseaseDefinition {
        name: "drug_induced_diabetes",
        stages: Some([
            st(0.0, 0.0, &[]),
            st(720.0, 0.3, &["polyuria", "polydipsia"]),
            st(1440.0, 0.6, &["polyuria", "fatigue", "weight_loss"]),
            st(2880.0, 0.8, &["polyuria", "blurred_vision", "neuropathy"]),
            st(4320.0, 1.0, &["diabetic_ketoacidosis", "coma"]),
        ]),
        complications: &["diabetic_ketoacidosis", "chronic_kidney_disease"],
        risk_factors: &["steroids", "thiazide_diuretics", "atypical_antipsychotics"],
        progression_rate: 0.002,
        treatments: &[
            tr("discontinue_offending_drug", 0.8, 3.0),
            tr("insulin", 0.95, 1.0),
        ],
    },
    DiseaseDefinition {
        name: "drug_induced_pneumonitis",
        stages: Some([
            st(0.0, 0.0, &[]),
            st(48.0, 0.3, &["cough", "shortness_of_breath"]),
            st(96.0, 0.6, &["cough", "shortness_of_breath", "fever"]),
            st(168.0, 0.8, &["respiratory_distress", "hypoxemia"]),
            st(240.0, 1.0, &["respiratory_failure", "shock"]),
        ]),
        complications: &["respiratory_failure", "pulmonary_fibrosis"],
        risk_factors: &["amiodarone", "nitrofurantoin", "bleomycin", "methotrexate"],
        progression_rate: 0.05,
        treatments: &[
            tr("discontinue_offending_drug", 0.8, 2.0),
            tr("steroids", 0.7, 1.0),
        ],
    },
    DiseaseDefinition {
        name: "drug_induced_liver_disease",
        stages: Some([
            st(0.0, 0.0, &[]),
            st(168.0, 0.3, &["fatigue", "nausea", "abdominal_pain"]),
            st(336.0, 0.6, &["jaundice", "easy_bruising", "ascites"]),
            st(720.0, 0.8, &["hepatic_encephalopathy", "coagulopathy"]),
            st(1440.0, 1.0, &["liver_failure", "coma"]),
        ]),
        complications: &["liver_failure", "hepatic_encephalopathy", "coagulopathy"],
        risk_factors: &["acetaminophen", "statins", "isoniazid", "valproate"],
        progression_rate: 0.03,
        treatments: &[
            tr("discontinue_offending_drug", 0.9, 1.0),
            tr("n_acetylcysteine", 0.8, 0.5),
        ],
    },
    DiseaseDefinition {
        name: "drug_induced_kidney_disease",
        stages: Some([
            st(0.0, 0.0, &[]),
            st(168.0, 0.3, &["fatigue", "nausea"]),
            st(336.0, 0.6, &["oliguria", "edema", "hypertension"]),
            st(720.0, 0.8, &["uremia", "anemia", "bone_disease"]),
            st(1440.0, 1.0, &["dialysis_dependent", "death"]),
        ]),
        complications: &["chronic_kidney_disease", "anemia", "bone_disease"],
        risk_factors: &["nsaids", "aminoglycosides", "contrast_dye", "ace_inhibitors"],
        progression_rate: 0.02,
        treatments: &[
            tr("discontinue_offending_drug", 0.8, 2.0),
            tr("dialysis", 0.9, 0.5),
        ],
    },
    DiseaseDefinition {
        name: "aortic_dissection",
        stages: Some([
            st(0.0, 0.0, &[]),
            st(0.5, 0.4, &["chest_pain", "syncope"]),
            st(1.0, 0.7, &["chest_pain", "hypertension", "pulse_deficit"]),
            st(2.0, 0.9, &["shock", "organ_malperfusion"]),
            st(4.0, 1.0, &["death"]),
        ]),
        complications: &["cardiac_tamponade", "stroke", "mesenteric_ischemia"],
        risk_factors: &["hypertension", "marfan_syndrome", "trauma"],
        progression_rate: 0.8,
        treatments: &[tr("surgery", 0.9, 0.5), tr("blood_pressure_control", 0.7, 0.2)],
    },
    DiseaseDefinition {
        name: "tension_pneumothorax",
        stages: Some([
            st(0.0, 0.0, &[]),
            st(0.1, 0.5, &["chest_pain", "shortness_of_breath"]),
            st(0.2, 0.8, &["respiratory_distress", "tachycardia"]),
            st(0.5, 1.0, &["shock", "cardiac_arrest"]),
            st(1.0, 1.0, &["death"]),
        ]),
        complications: &["cardiac_arrest", "death"],
        risk_factors: &["trauma", "copd", "mechanical_ventilation"],
        progression_rate: 2.0,
        treatments: &[
            tr("needle_decompression", 0.95, 0.1),
            tr("chest_tube", 0.9, 0.5),
        ],
    },
    DiseaseDefinition {
        name: "cardiac_tamponade",
        stages: Some([
            st(0.0, 0.0, &[]),
            st(0.5, 0.4, &["chest_pain", "dyspnea"]),
            st(1.0, 0.7, &["pulsus_paradoxus", "hypotension"]),
            st(2.0, 1.0, &["shock", "cardiac_arrest"]),
            st(4.0, 1.0, &["death"]),
        ]),
        complications: &["cardiac_arrest", "death"],
        risk_factors: &["trauma", "pericarditis", "malignancy"],
        progression_rate: 1.0,
        treatments: &[tr("pericardiocentesis", 0.9, 0.3), tr("surgery", 0.95, 1.0)],
    },
    DiseaseDefinition {
        name: "drug_induced_stevens_johnson",
        stages: Some([
            st(0.0, 0.0, &[]),
            st(24.0, 0.3, &["rash", "fever", "malaise"]),
            st(48.0, 0.7, &["rash", "mucosal_involvement", "blistering"]),
            st(72.0, 0.9, &["extensive_blistering", "sepsis"]),
            st(96.0, 1.0, &["death"]),
        ]),
        complications: &["sepsis", "blindness", "death"],
        risk_factors: &["sulfa_drugs", "anticonvulsants", "allopurinol", "nsaids"],
        progression_rate: 0.1,
        treatments: &[
            tr("discontinue_offending_drug", 0.8, 1.0),
            tr("steroids", 0.6, 2.0),
            tr("burn_unit_care", 0.9, 0.5),
        ],
    },
    DiseaseDefinition {
        name: "drug_induced_serotonin_syndrome",
        stages: Some([
            st(0.0, 0.0, &[]),
            st(2.0, 0.4, &["agitation", "tachycardia", "diaphoresis"]),
            st(4.0, 0.7, &["hyperthermia", "rigidity", "tremor"]),
            st(6.0, 0.9, &["seizures", "rhabdomyolysis"]),
            st(8.0, 1.0, &["death"]),
        ]),
        complications: &["rhabdomyolysis", "renal_failure", "death"],
        risk_factors: &["ssris", "snris", "maois", "triptans"],
        progression_rate: 0.3,
        treatments: &[
            tr("discontinue_offending_drug", 0.9, 0.5),
            tr("cyproheptadine", 0.8, 1.0),
            tr("supportive_care", 0.7, 0.5),
        ],
    },
    DiseaseDefinition {
        name: "drug_induced_neutropenia",
        stages: Some([
            st(0.0, 0.0, &[]),
            st(168.0, 0.3, &["fatigue", "fever"]),
            st(336.0, 0.6, &["fever", "infection", "mucosal_ulcers"]),
            st(504.0, 0.9, &["severe_infection", "sepsis"]),
            st(672.0, 1.0, &["death"]),
        ]),
        complications: &["sepsis", "death"],
        risk_factors: &["chemotherapy", "clozapine", "sulfa_drugs", "antithyroid_medications"],
        progression_rate: 0.02,
        treatments: &[
            tr("discontinue_offending_drug", 0.8, 2.0),
            tr("g_csf", 0.9, 1.0),
            tr("antibiotics", 0.8, 0.5),
        ],
    },
    DiseaseDefinition {
        name: "drug_induced_qt_prolongation",
        stages: Some([
            st(0.0, 0.0, &[]),
            st(24.0, 0.3, &["palpitations", "dizziness"]),
            st(48.0, 0.7, &["syncope", "arrhythmia"]),
            st(72.0, 0.9, &["torsades_de_pointes", "cardiac_arrest"]),
            st(96.0, 1.0, &["death"]),
        ]),
        complications: &["torsades_de_pointes", "cardiac_arrest", "death"],
        risk_factors: &["quinidine", "amiodarone", "erythromycin", "antipsychotics"],
        progression_rate: 0.05,
        treatments: &[
            tr("discontinue_offending_drug", 0.9, 1.0),
            tr("magnesium", 0.8, 0.5),
            tr("defibrillation", 0.9, 0.1),
        ],
    },
];
