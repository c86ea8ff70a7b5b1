//! Adverse event kinds and the tables that sample them.
//!
//! Two independent samplers share the same event vocabulary: one runs when
//! an intervention order executes, the other runs on every evolution step.

use crate::interventions::InterventionType;
use crate::organs::{OrganSystem, ORGAN_FAILURE_EVENT_THRESHOLD};
use crate::vitals::VitalSigns;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdverseEventType {
    AllergicReaction,
    Arrhythmia,
    Hypotension,
    Hypertension,
    RespiratoryDepression,
    RenalInjury,
    HepaticInjury,
    Bleeding,
    Infection,
    Thrombosis,
    Embolism,
    Sepsis,
    Shock,
    CardiacArrest,
    Stroke,
    Seizure,
    Coma,
    OrganFailure,
    MedicationError,
    ProcedureComplication,
    Hypoglycemia,
    Hyperglycemia,
    ElectrolyteImbalance,
    AcidBaseDisturbance,
    Delirium,
    PressureUlcer,
    DeepVeinThrombosis,
    PulmonaryEmbolism,
    Aspiration,
    Malnutrition,
}

impl AdverseEventType {
    pub fn name(self) -> &'static str {
        use AdverseEventType::*;
        match self {
            AllergicReaction => "allergic_reaction",
            Arrhythmia => "arrhythmia",
            Hypotension => "hypotension",
            Hypertension => "hypertension",
            RespiratoryDepression => "respiratory_depression",
            RenalInjury => "renal_injury",
            HepaticInjury => "hepatic_injury",
            Bleeding => "bleeding",
            Infection => "infection",
            Thrombosis => "thrombosis",
            Embolism => "embolism",
            Sepsis => "sepsis",
            Shock => "shock",
            CardiacArrest => "cardiac_arrest",
            Stroke => "stroke",
            Seizure => "seizure",
            Coma => "coma",
            OrganFailure => "organ_failure",
            MedicationError => "medication_error",
            ProcedureComplication => "procedure_complication",
            Hypoglycemia => "hypoglycemia",
            Hyperglycemia => "hyperglycemia",
            ElectrolyteImbalance => "electrolyte_imbalance",
            AcidBaseDisturbance => "acid_base_disturbance",
            Delirium => "delirium",
            PressureUlcer => "pressure_ulcer",
            DeepVeinThrombosis => "deep_vein_thrombosis",
            PulmonaryEmbolism => "pulmonary_embolism",
            Aspiration => "aspiration",
            Malnutrition => "malnutrition",
        }
    }
}

impl std::fmt::Display for AdverseEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ── Order execution ──

/// Events an order risks per target organ, as multipliers of the
/// definition's `adverse_event_risk`.
pub fn organ_order_risks(organ: OrganSystem) -> &'static [(AdverseEventType, f64)] {
    use AdverseEventType::*;
    match organ {
        OrganSystem::Cardiovascular => &[(Arrhythmia, 0.3), (Hypotension, 0.2), (CardiacArrest, 0.1)],
        OrganSystem::Respiratory => &[(RespiratoryDepression, 0.4), (Infection, 0.2)],
        OrganSystem::Renal => &[(RenalInjury, 0.5)],
        OrganSystem::Hepatic => &[(HepaticInjury, 0.4)],
        OrganSystem::Hematological => &[(Bleeding, 0.3), (Thrombosis, 0.2)],
        OrganSystem::Immune => &[(AllergicReaction, 0.3), (Infection, 0.2)],
        _ => &[],
    }
}

/// Events specific to the intervention itself. The first matching rule wins.
pub fn named_order_risks(name: &str) -> &'static [(AdverseEventType, f64)] {
    use AdverseEventType::*;
    match name {
        "antibiotic" => &[(AllergicReaction, 0.4)],
        "vasopressor" => &[(Arrhythmia, 0.5), (Hypertension, 0.3)],
        "anticoagulant" | "thrombolytic" => &[(Bleeding, 0.6)],
        "sedative" | "analgesic" => &[(RespiratoryDepression, 0.5)],
        n if n.contains("intubation") => &[(Infection, 0.3)],
        n if n.contains("catheterization") || n.contains("line") => {
            &[(Infection, 0.4), (Bleeding, 0.2)]
        }
        _ => &[],
    }
}

/// Samples adverse events for an executing order. Each draw is independent
/// and the result is de-duplicated.
pub fn sample_order_adverse_events(
    name: &str,
    target_organs: &[OrganSystem],
    base_risk: f64,
    rng: &mut impl Rng,
) -> Vec<AdverseEventType> {
    let mut events = BTreeSet::new();
    let organ_risks = target_organs.iter().flat_map(|o| organ_order_risks(*o));
    for &(event, multiplier) in organ_risks.chain(named_order_risks(name)) {
        if rng.gen::<f64>() < base_risk * multiplier {
            events.insert(event);
        }
    }
    events.into_iter().collect()
}

// ── Evolution step ──

/// Adverse events caused by an intervention applied during evolution.
///
/// `score` returns the current function score of an organ.
pub fn intervention_adverse_events(
    name: &str,
    kind: Option<InterventionType>,
    score: impl Fn(OrganSystem) -> f64,
    rng: &mut impl Rng,
) -> Vec<AdverseEventType> {
    use AdverseEventType::*;
    let mut events = Vec::new();
    let mut roll = |p: f64, event: AdverseEventType, events: &mut Vec<AdverseEventType>| {
        if rng.gen::<f64>() < p {
            events.push(event);
        }
    };
    match kind {
        Some(InterventionType::Medication) => match name {
            "antibiotic" => roll(0.05, AllergicReaction, &mut events),
            "vasopressor" if score(OrganSystem::Cardiovascular) < 0.5 => {
                roll(0.10, Arrhythmia, &mut events)
            }
            "anticoagulant" => roll(0.08, Bleeding, &mut events),
            "sedative" if score(OrganSystem::Respiratory) < 0.6 => {
                roll(0.15, RespiratoryDepression, &mut events)
            }
            "insulin" => roll(0.03, Hypoglycemia, &mut events),
            _ => {}
        },
        Some(InterventionType::Procedure) | Some(InterventionType::Emergency) => {
            if name.contains("intubation") {
                roll(0.08, Infection, &mut events);
            }
            if name.contains("catheterization") {
                roll(0.12, Infection, &mut events);
            }
            if name.contains("dialysis") {
                roll(0.05, Hypotension, &mut events);
            }
        }
        _ => {}
    }
    events
}

/// Adverse events driven by a single disease's severity.
pub fn disease_adverse_events(
    disease: &str,
    severity: f64,
    rng: &mut impl Rng,
) -> Vec<AdverseEventType> {
    use AdverseEventType::*;
    let mut events = Vec::new();
    if severity > 0.95 && rng.gen::<f64>() < 0.2 {
        events.push(CardiacArrest);
    }
    if disease == "sepsis" && severity > 0.9 && rng.gen::<f64>() < 0.15 {
        events.push(Sepsis);
    }
    if disease == "stroke" && severity > 0.8 && rng.gen::<f64>() < 0.1 {
        events.push(Stroke);
    }
    events
}

/// Deterministic vital-threshold breaches.
pub fn vital_adverse_events(vitals: &VitalSigns) -> Vec<AdverseEventType> {
    use AdverseEventType::*;
    let mut events = Vec::new();
    if vitals.heart_rate > 150.0 || vitals.heart_rate < 40.0 {
        events.push(Arrhythmia);
    }
    if vitals.bp_systolic < 80.0 {
        events.push(Hypotension);
    }
    if vitals.oxygen_saturation < 85.0 {
        events.push(RespiratoryDepression);
    }
    if vitals.temperature > 104.0 {
        events.push(Sepsis);
    }
    events
}

pub fn is_organ_failure(score: f64) -> bool {
    score < ORGAN_FAILURE_EVENT_THRESHOLD
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_zero_risk_never_fires() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..100 {
            let events = sample_order_adverse_events(
                "vasopressor",
                &[OrganSystem::Cardiovascular, OrganSystem::Renal],
                0.0,
                &mut rng,
            );
            assert!(events.is_empty());
        }
    }

    #[test]
    fn test_certain_risk_is_deduplicated() {
        let mut rng = StdRng::seed_from_u64(1);
        // Risk high enough that every multiplier >= 0.1 fires.
        let events = sample_order_adverse_events(
            "central_line",
            &[OrganSystem::Respiratory, OrganSystem::Immune],
            10.0,
            &mut rng,
        );
        let infections = events
            .iter()
            .filter(|e| **e == AdverseEventType::Infection)
            .count();
        assert_eq!(infections, 1);
        assert!(events.contains(&AdverseEventType::Bleeding));
        assert!(events.contains(&AdverseEventType::AllergicReaction));
    }

    #[test]
    fn test_named_risks_first_match() {
        assert_eq!(named_order_risks("emergency_intubation").len(), 1);
        assert_eq!(named_order_risks("arterial_line").len(), 2);
        assert!(named_order_risks("cbc").is_empty());
    }

    #[test]
    fn test_vital_breaches() {
        let v = VitalSigns {
            heart_rate: 160.0,
            bp_systolic: 75.0,
            oxygen_saturation: 80.0,
            temperature: 105.0,
            ..VitalSigns::default()
        };
        let events = vital_adverse_events(&v);
        assert_eq!(events.len(), 4);
        assert!(vital_adverse_events(&VitalSigns::default()).is_empty());
    }

    #[test]
    fn test_disease_events_need_severity() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..200 {
            assert!(disease_adverse_events("sepsis", 0.5, &mut rng).is_empty());
        }
    }

    #[test]
    fn test_vasopressor_arrhythmia_needs_weak_heart() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..200 {
            let events = intervention_adverse_events(
                "vasopressor",
                Some(InterventionType::Medication),
                |_| 1.0,
                &mut rng,
            );
            assert!(events.is_empty());
        }
    }

    #[test]
    fn test_organ_failure_threshold() {
        assert!(is_organ_failure(0.19));
        assert!(!is_organ_failure(0.2));
    }
}
