//! Intervention catalog and order priorities.
//!
//! The catalog is read-only reference data. Orders built from it live in
//! `medsim-core`.

use crate::organs::OrganSystem;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterventionType {
    Medication,
    Procedure,
    Laboratory,
    Imaging,
    Supportive,
    Monitoring,
    Emergency,
}

impl InterventionType {
    pub const ALL: [InterventionType; 7] = [
        InterventionType::Medication,
        InterventionType::Procedure,
        InterventionType::Laboratory,
        InterventionType::Imaging,
        InterventionType::Supportive,
        InterventionType::Monitoring,
        InterventionType::Emergency,
    ];

    pub fn name(self) -> &'static str {
        match self {
            InterventionType::Medication => "medication",
            InterventionType::Procedure => "procedure",
            InterventionType::Laboratory => "laboratory",
            InterventionType::Imaging => "imaging",
            InterventionType::Supportive => "supportive",
            InterventionType::Monitoring => "monitoring",
            InterventionType::Emergency => "emergency",
        }
    }
}

/// Order priority. Levels 1 (low) through 4 (urgent).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum OrderPriority {
    Low = 1,
    #[default]
    Medium = 2,
    High = 3,
    Urgent = 4,
}

impl OrderPriority {
    pub const ALL: [OrderPriority; 4] = [
        OrderPriority::Low,
        OrderPriority::Medium,
        OrderPriority::High,
        OrderPriority::Urgent,
    ];

    pub fn level(self) -> u8 {
        self as u8
    }

    /// Levels outside 1..=4 saturate to the nearest priority.
    pub fn from_level(level: u8) -> Self {
        match level {
            0 | 1 => OrderPriority::Low,
            2 => OrderPriority::Medium,
            3 => OrderPriority::High,
            _ => OrderPriority::Urgent,
        }
    }

    /// Added to the base success rate when an order executes.
    pub fn success_adjustment(self) -> f64 {
        match self {
            OrderPriority::Urgent => 0.05,
            OrderPriority::Low => -0.05,
            _ => 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct InterventionDefinition {
    pub name: &'static str,
    pub kind: InterventionType,
    pub target_organs: &'static [OrganSystem],
    /// Zero for continuous interventions.
    pub duration_minutes: u32,
    pub success_rate: f64,
    pub adverse_event_risk: f64,
    pub contraindications: &'static [&'static str],
    pub parameters: &'static [(&'static str, &'static str)],
    pub description: &'static str,
}

impl InterventionDefinition {
    pub fn targets(&self, organ: OrganSystem) -> bool {
        self.target_organs.contains(&organ)
    }

    pub fn is_continuous(&self) -> bool {
        self.duration_minutes == 0
    }

    pub fn default_parameter(&self, key: &str) -> Option<&'static str> {
        self.parameters
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| *v)
    }

    /// Success probability for an order at `priority`, clamped to [0, 1].
    pub fn success_rate_for(&self, priority: OrderPriority) -> f64 {
        (self.success_rate + priority.success_adjustment()).clamp(0.0, 1.0)
    }
}

pub fn definition(name: &str) -> Option<&'static InterventionDefinition> {
    CATALOG.iter().find(|d| d.name == name)
}

pub fn catalog() -> &'static [InterventionDefinition] {
    CATALOG
}

pub fn targeting(organ: OrganSystem) -> impl Iterator<Item = &'static InterventionDefinition> {
    CATALOG.iter().filter(move |d| d.targets(organ))
}

pub fn of_type(kind: InterventionType) -> impl Iterator<Item = &'static InterventionDefinition> {
    CATALOG.iter().filter(move |d| d.kind == kind)
}

use InterventionType as T;
use OrganSystem as O;

#[allow(clippy::too_many_arguments)]
const fn def(
    name: &'static str,
    kind: InterventionType,
    target_organs: &'static [OrganSystem],
    duration_minutes: u32,
    success_rate: f64,
    adverse_event_risk: f64,
    contraindications: &'static [&'static str],
    parameters: &'static [(&'static str, &'static str)],
    description: &'static str,
) -> InterventionDefinition {
    InterventionDefinition {
        name,
        kind,
        target_organs,
        duration_minutes,
        success_rate,
        adverse_event_risk,
        contraindications,
        parameters,
        description,
    }
}

static CATALOG: &[InterventionDefinition] = &[
    // Medications
    def(
        "antibiotic",
        T::Medication,
        &[O::Immune, O::Renal, O::Hepatic],
        60,
        0.85,
        0.08,
        &["allergy", "renal_failure"],
        &[("route", "iv"), ("dose", "1g"), ("frequency", "q8h")],
        "Broad-spectrum antibiotic therapy",
    ),
    def(
        "vasopressor",
        T::Medication,
        &[O::Cardiovascular, O::Renal],
        30,
        0.90,
        0.12,
        &["arrhythmia", "severe_hypertension"],
        &[("agent", "norepinephrine"), ("dose", "0.1mcg/kg/min")],
        "Vasopressor support for hypotension",
    ),
    def(
        "anticoagulant",
        T::Medication,
        &[O::Hematological, O::Cardiovascular],
        45,
        0.88,
        0.15,
        &["bleeding", "thrombocytopenia"],
        &[("agent", "heparin"), ("dose", "5000u")],
        "Anticoagulation",
    ),
    def(
        "sedative",
        T::Medication,
        &[O::Neurological, O::Respiratory],
        20,
        0.95,
        0.10,
        &["respiratory_failure", "shock"],
        &[("agent", "midazolam"), ("dose", "2mg")],
        "Sedation",
    ),
    def(
        "insulin",
        T::Medication,
        &[O::Endocrine, O::Cardiovascular],
        120,
        0.92,
        0.05,
        &["hypoglycemia"],
        &[("type", "regular"), ("dose", "10u")],
        "Insulin therapy",
    ),
    def(
        "diuretic",
        T::Medication,
        &[O::Renal, O::Cardiovascular],
        90,
        0.87,
        0.08,
        &["hypovolemia", "renal_failure"],
        &[("agent", "furosemide"), ("dose", "40mg")],
        "Loop diuretic",
    ),
    def(
        "bronchodilator",
        T::Medication,
        &[O::Respiratory, O::Cardiovascular],
        30,
        0.89,
        0.06,
        &["arrhythmia"],
        &[("agent", "albuterol"), ("dose", "2.5mg")],
        "Nebulized bronchodilator",
    ),
    def(
        "antiemetic",
        T::Medication,
        &[O::Gastrointestinal, O::Neurological],
        60,
        0.90,
        0.03,
        &["bowel_obstruction"],
        &[("agent", "ondansetron"), ("dose", "4mg")],
        "Antiemetic",
    ),
    def(
        "analgesic",
        T::Medication,
        &[O::Neurological],
        30,
        0.92,
        0.06,
        &["respiratory_failure"],
        &[("agent", "morphine"), ("dose", "4mg")],
        "Opioid analgesia",
    ),
    def(
        "antipyretic",
        T::Medication,
        &[O::Immune, O::Hepatic],
        45,
        0.94,
        0.02,
        &["liver_failure"],
        &[("agent", "acetaminophen"), ("dose", "1g")],
        "Fever reduction",
    ),
    def(
        "thrombolytic",
        T::Medication,
        &[O::Cardiovascular, O::Hematological, O::Neurological],
        60,
        0.75,
        0.20,
        &["bleeding", "recent_surgery"],
        &[("agent", "alteplase"), ("dose", "0.9mg/kg")],
        "Thrombolysis",
    ),
    def(
        "antiarrhythmic",
        T::Medication,
        &[O::Cardiovascular],
        30,
        0.80,
        0.10,
        &["shock"],
        &[("agent", "amiodarone"), ("dose", "150mg")],
        "Rhythm control",
    ),
    def(
        "corticosteroid",
        T::Medication,
        &[O::Immune, O::Endocrine],
        30,
        0.90,
        0.05,
        &["active_infection"],
        &[("agent", "methylprednisolone"), ("dose", "125mg")],
        "Systemic corticosteroid",
    ),
    def(
        "anticonvulsant",
        T::Medication,
        &[O::Neurological],
        30,
        0.85,
        0.07,
        &[],
        &[("agent", "levetiracetam"), ("dose", "1g")],
        "Seizure control",
    ),
    // Procedures
    def(
        "intubation",
        T::Procedure,
        &[O::Respiratory, O::Neurological],
        15,
        0.95,
        0.08,
        &["facial_trauma", "cervical_spine_injury"],
        &[("tube_size", "7.5"), ("depth", "22cm")],
        "Endotracheal intubation",
    ),
    def(
        "central_line",
        T::Procedure,
        &[O::Cardiovascular, O::Integumentary],
        30,
        0.90,
        0.12,
        &["coagulopathy", "infection"],
        &[("site", "subclavian"), ("catheter_type", "triple_lumen")],
        "Central venous catheter",
    ),
    def(
        "chest_tube",
        T::Procedure,
        &[O::Respiratory, O::Cardiovascular],
        25,
        0.88,
        0.15,
        &["coagulopathy"],
        &[("size", "28f"), ("site", "5th_ics")],
        "Tube thoracostomy",
    ),
    def(
        "lumbar_puncture",
        T::Procedure,
        &[O::Neurological],
        20,
        0.85,
        0.05,
        &["increased_icp", "coagulopathy"],
        &[("needle_size", "22g"), ("site", "l4-l5")],
        "Lumbar puncture",
    ),
    def(
        "paracentesis",
        T::Procedure,
        &[O::Gastrointestinal, O::Renal],
        45,
        0.92,
        0.08,
        &["coagulopathy", "infection"],
        &[("site", "right_lower_quadrant"), ("volume", "2l")],
        "Abdominal paracentesis",
    ),
    def(
        "dialysis",
        T::Procedure,
        &[O::Renal, O::Cardiovascular],
        240,
        0.95,
        0.10,
        &["hypotension", "bleeding"],
        &[("type", "hemodialysis"), ("duration", "4h")],
        "Hemodialysis",
    ),
    def(
        "cardiac_catheterization",
        T::Procedure,
        &[O::Cardiovascular],
        120,
        0.88,
        0.18,
        &["coagulopathy", "renal_failure"],
        &[("access", "femoral"), ("contrast_volume", "100ml")],
        "Coronary angiography",
    ),
    def(
        "endoscopy",
        T::Procedure,
        &[O::Gastrointestinal],
        60,
        0.90,
        0.08,
        &["perforation", "obstruction"],
        &[("type", "upper_gi"), ("scope_size", "9.8mm")],
        "Upper endoscopy",
    ),
    def(
        "thoracentesis",
        T::Procedure,
        &[O::Respiratory],
        30,
        0.90,
        0.10,
        &["coagulopathy"],
        &[("site", "posterior"), ("volume", "1l")],
        "Pleural fluid drainage",
    ),
    def(
        "pericardiocentesis",
        T::Procedure,
        &[O::Cardiovascular],
        30,
        0.85,
        0.15,
        &["coagulopathy"],
        &[("approach", "subxiphoid"), ("guidance", "ultrasound")],
        "Pericardial drainage",
    ),
    def(
        "bronchoscopy",
        T::Procedure,
        &[O::Respiratory],
        45,
        0.92,
        0.06,
        &["severe_hypoxemia"],
        &[("type", "flexible"), ("lavage", "yes")],
        "Flexible bronchoscopy",
    ),
    def(
        "urinary_catheterization",
        T::Procedure,
        &[O::Renal],
        10,
        0.97,
        0.05,
        &["urethral_injury"],
        &[("size", "16f"), ("type", "foley")],
        "Foley catheter placement",
    ),
    // Laboratory
    def(
        "cbc",
        T::Laboratory,
        &[O::Hematological],
        30,
        0.98,
        0.01,
        &[],
        &[("volume", "3ml"), ("tube", "lavender")],
        "Complete blood count",
    ),
    def(
        "chemistry",
        T::Laboratory,
        &[O::Renal, O::Hepatic],
        45,
        0.97,
        0.01,
        &[],
        &[("volume", "5ml"), ("tube", "red")],
        "Basic metabolic panel",
    ),
    def(
        "troponin",
        T::Laboratory,
        &[O::Cardiovascular],
        20,
        0.96,
        0.01,
        &[],
        &[("volume", "2ml"), ("tube", "red")],
        "Cardiac troponin",
    ),
    def(
        "blood_culture",
        T::Laboratory,
        &[O::Immune],
        15,
        0.95,
        0.02,
        &[],
        &[("volume", "10ml"), ("bottles", "2")],
        "Blood cultures",
    ),
    def(
        "arterial_blood_gas",
        T::Laboratory,
        &[O::Respiratory, O::Cardiovascular],
        10,
        0.90,
        0.05,
        &[],
        &[("site", "radial"), ("volume", "1ml")],
        "Arterial blood gas",
    ),
    def(
        "coagulation_studies",
        T::Laboratory,
        &[O::Hematological],
        40,
        0.96,
        0.01,
        &[],
        &[("volume", "2ml"), ("tube", "blue")],
        "PT, PTT and INR",
    ),
    def(
        "lactate",
        T::Laboratory,
        &[O::Cardiovascular, O::Hepatic],
        15,
        0.97,
        0.01,
        &[],
        &[("volume", "1ml"), ("tube", "gray")],
        "Serum lactate",
    ),
    def(
        "liver_function_tests",
        T::Laboratory,
        &[O::Hepatic],
        45,
        0.97,
        0.01,
        &[],
        &[("volume", "3ml"), ("tube", "gold")],
        "Hepatic panel",
    ),
    def(
        "urinalysis",
        T::Laboratory,
        &[O::Renal],
        20,
        0.98,
        0.005,
        &[],
        &[("volume", "10ml"), ("container", "sterile_cup")],
        "Urinalysis",
    ),
    // Imaging
    def(
        "chest_xray",
        T::Imaging,
        &[O::Respiratory, O::Cardiovascular],
        15,
        0.99,
        0.001,
        &[],
        &[("views", "pa_lateral"), ("radiation", "0.1msv")],
        "Chest radiograph",
    ),
    def(
        "ct_chest",
        T::Imaging,
        &[O::Respiratory, O::Cardiovascular],
        30,
        0.98,
        0.005,
        &[],
        &[("contrast", "iv"), ("radiation", "7msv")],
        "CT chest",
    ),
    def(
        "ct_head",
        T::Imaging,
        &[O::Neurological],
        20,
        0.98,
        0.005,
        &[],
        &[("contrast", "none"), ("radiation", "2msv")],
        "Non-contrast head CT",
    ),
    def(
        "echocardiogram",
        T::Imaging,
        &[O::Cardiovascular],
        45,
        0.95,
        0.001,
        &[],
        &[("type", "transthoracic"), ("views", "standard")],
        "Transthoracic echo",
    ),
    def(
        "mri_brain",
        T::Imaging,
        &[O::Neurological],
        60,
        0.97,
        0.001,
        &[],
        &[("sequences", "t1_t2_flair"), ("contrast", "gadolinium")],
        "Brain MRI",
    ),
    def(
        "ultrasound_abdomen",
        T::Imaging,
        &[O::Gastrointestinal, O::Hepatic],
        30,
        0.94,
        0.001,
        &[],
        &[("probe", "3.5mhz"), ("views", "standard")],
        "Abdominal ultrasound",
    ),
    def(
        "ct_abdomen",
        T::Imaging,
        &[O::Gastrointestinal, O::Renal],
        30,
        0.98,
        0.005,
        &[],
        &[("contrast", "iv_oral"), ("radiation", "8msv")],
        "CT abdomen and pelvis",
    ),
    // Supportive
    def(
        "oxygen_therapy",
        T::Supportive,
        &[O::Respiratory],
        0,
        0.99,
        0.01,
        &[],
        &[("flow", "2lpm"), ("device", "nasal_cannula")],
        "Supplemental oxygen",
    ),
    def(
        "mechanical_ventilation",
        T::Supportive,
        &[O::Respiratory, O::Cardiovascular],
        0,
        0.95,
        0.15,
        &[],
        &[("mode", "assist_control"), ("tidal_volume", "500ml")],
        "Invasive ventilation",
    ),
    def(
        "noninvasive_ventilation",
        T::Supportive,
        &[O::Respiratory],
        0,
        0.90,
        0.05,
        &["facial_trauma"],
        &[("mode", "bipap"), ("ipap", "12"), ("epap", "5")],
        "BiPAP support",
    ),
    def(
        "iv_fluids",
        T::Supportive,
        &[O::Cardiovascular, O::Renal],
        0,
        0.98,
        0.03,
        &[],
        &[("type", "normal_saline"), ("rate", "100ml/hr")],
        "Crystalloid infusion",
    ),
    def(
        "blood_transfusion",
        T::Supportive,
        &[O::Hematological, O::Cardiovascular],
        120,
        0.99,
        0.05,
        &[],
        &[("type", "prbc"), ("units", "2")],
        "Packed red cell transfusion",
    ),
    def(
        "temperature_control",
        T::Supportive,
        &[O::Integumentary, O::Neurological],
        0,
        0.97,
        0.02,
        &[],
        &[("method", "cooling_blanket"), ("target", "37c")],
        "Targeted temperature management",
    ),
    def(
        "nutrition",
        T::Supportive,
        &[O::Gastrointestinal, O::Endocrine],
        0,
        0.96,
        0.03,
        &[],
        &[("type", "enteral"), ("rate", "50ml/hr")],
        "Enteral feeding",
    ),
    def(
        "pressure_injury_prevention",
        T::Supportive,
        &[O::Integumentary, O::Musculoskeletal],
        0,
        0.98,
        0.001,
        &[],
        &[("turning", "q2h"), ("mattress", "alternating_pressure")],
        "Repositioning and pressure offloading",
    ),
    def(
        "physical_therapy",
        T::Supportive,
        &[O::Musculoskeletal],
        45,
        0.95,
        0.02,
        &["unstable_fracture"],
        &[("type", "early_mobilization"), ("frequency", "daily")],
        "Early mobilization",
    ),
    // Monitoring
    def(
        "ecg_monitoring",
        T::Monitoring,
        &[O::Cardiovascular],
        0,
        0.99,
        0.001,
        &[],
        &[("leads", "5_lead"), ("alarms", "enabled")],
        "Continuous ECG",
    ),
    def(
        "pulse_oximetry",
        T::Monitoring,
        &[O::Respiratory, O::Cardiovascular],
        0,
        0.99,
        0.001,
        &[],
        &[("site", "finger"), ("alarms", "enabled")],
        "Continuous SpO2",
    ),
    def(
        "arterial_line",
        T::Monitoring,
        &[O::Cardiovascular],
        0,
        0.90,
        0.08,
        &[],
        &[("site", "radial"), ("calibration", "q4h")],
        "Invasive arterial pressure",
    ),
    def(
        "central_venous_pressure",
        T::Monitoring,
        &[O::Cardiovascular],
        0,
        0.92,
        0.05,
        &[],
        &[("site", "subclavian"), ("calibration", "q4h")],
        "CVP monitoring",
    ),
    def(
        "intracranial_pressure",
        T::Monitoring,
        &[O::Neurological],
        0,
        0.85,
        0.12,
        &[],
        &[("type", "intraventricular"), ("calibration", "q8h")],
        "ICP monitoring",
    ),
    def(
        "neuro_checks",
        T::Monitoring,
        &[O::Neurological],
        0,
        0.99,
        0.001,
        &[],
        &[("frequency", "q1h"), ("scale", "gcs")],
        "Serial neurological exams",
    ),
    def(
        "glucose_monitoring",
        T::Monitoring,
        &[O::Endocrine],
        0,
        0.99,
        0.002,
        &[],
        &[("method", "fingerstick"), ("frequency", "q1h")],
        "Point-of-care glucose",
    ),
    // Emergency
    def(
        "cpr",
        T::Emergency,
        &[O::Cardiovascular, O::Respiratory],
        5,
        0.40,
        0.20,
        &[],
        &[("compression_rate", "100/min"), ("depth", "2in")],
        "Cardiopulmonary resuscitation",
    ),
    def(
        "defibrillation",
        T::Emergency,
        &[O::Cardiovascular],
        1,
        0.60,
        0.05,
        &[],
        &[("energy", "200j"), ("paddle_position", "sternal_apex")],
        "Defibrillation",
    ),
    def(
        "emergency_intubation",
        T::Emergency,
        &[O::Respiratory, O::Neurological],
        3,
        0.85,
        0.25,
        &[],
        &[("tube_size", "7.5"), ("cricoid_pressure", "yes")],
        "Rapid sequence intubation",
    ),
    def(
        "emergency_thoracotomy",
        T::Emergency,
        &[O::Cardiovascular, O::Respiratory],
        30,
        0.30,
        0.50,
        &[],
        &[("approach", "left_anterolateral"), ("indication", "cardiac_arrest")],
        "Resuscitative thoracotomy",
    ),
    def(
        "emergency_laparotomy",
        T::Emergency,
        &[O::Gastrointestinal, O::Cardiovascular],
        60,
        0.70,
        0.40,
        &[],
        &[("approach", "midline"), ("indication", "peritonitis")],
        "Exploratory laparotomy",
    ),
    def(
        "needle_decompression",
        T::Emergency,
        &[O::Respiratory, O::Cardiovascular],
        2,
        0.90,
        0.10,
        &[],
        &[("site", "2nd_ics_mcl"), ("needle", "14g")],
        "Needle thoracostomy",
    ),
    def(
        "cardioversion",
        T::Emergency,
        &[O::Cardiovascular],
        5,
        0.75,
        0.08,
        &[],
        &[("energy", "120j"), ("mode", "synchronized")],
        "Synchronized cardioversion",
    ),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_size_and_unique_names() {
        assert!(CATALOG.len() >= 60);
        let names: HashSet<_> = CATALOG.iter().map(|d| d.name).collect();
        assert_eq!(names.len(), CATALOG.len());
    }

    #[test]
    fn test_every_type_represented() {
        for kind in InterventionType::ALL {
            assert!(of_type(kind).count() >= 5, "{} underpopulated", kind.name());
        }
    }

    #[test]
    fn test_rates_in_range() {
        for d in CATALOG {
            assert!((0.0..=1.0).contains(&d.success_rate), "{}", d.name);
            assert!((0.0..=1.0).contains(&d.adverse_event_risk), "{}", d.name);
            assert!(!d.target_organs.is_empty(), "{}", d.name);
        }
    }

    #[test]
    fn test_priority_adjustment() {
        let vaso = definition("vasopressor").expect("vasopressor in catalog");
        assert!((vaso.success_rate_for(OrderPriority::Urgent) - 0.95).abs() < 1e-9);
        assert!((vaso.success_rate_for(OrderPriority::Low) - 0.85).abs() < 1e-9);
        assert!((vaso.success_rate_for(OrderPriority::High) - 0.90).abs() < 1e-9);
        let oxygen = definition("oxygen_therapy").expect("oxygen in catalog");
        assert_eq!(oxygen.success_rate_for(OrderPriority::Urgent), 1.0);
    }

    #[test]
    fn test_priority_levels() {
        assert_eq!(OrderPriority::Urgent.level(), 4);
        assert_eq!(OrderPriority::from_level(1), OrderPriority::Low);
        assert_eq!(OrderPriority::from_level(9), OrderPriority::Urgent);
        assert!(OrderPriority::Urgent > OrderPriority::High);
    }

    #[test]
    fn test_lookup_helpers() {
        assert!(definition("bloodletting").is_none());
        let ab = definition("antibiotic").expect("antibiotic in catalog");
        assert_eq!(ab.default_parameter("route"), Some("iv"));
        assert!(targeting(OrganSystem::Renal).any(|d| d.name == "dialysis"));
        assert!(definition("ecg_monitoring").is_some_and(|d| d.is_continuous()));
    }
}
