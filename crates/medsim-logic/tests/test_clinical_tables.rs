//! Cross-table consistency checks for the clinical reference data.
//!
//! Exercises: triage → social → disease → interventions → config
//!
//! All tests are pure logic: no engine state, no threads.

use medsim_logic::config::{validate_config, SimulationConfig};
use medsim_logic::disease::{self, DiseaseStage};
use medsim_logic::interventions::{self, InterventionType};
use medsim_logic::organs::OrganSystem;
use medsim_logic::social::{self, onset_hours_range, specialty_diseases};
use medsim_logic::triage::{priority_score, Complexity, Difficulty, Specialty};
use rand::rngs::StdRng;
use rand::SeedableRng;

// ── Reference data ─────────────────────────────────────────────────────

#[test]
fn specialty_pools_use_fully_staged_diseases() {
    for (specialty, _) in Specialty::WEIGHTS {
        let pool = specialty_diseases(specialty);
        assert!(!pool.is_empty(), "{} has no diseases", specialty.name());
        for name in pool {
            let def = disease::disease(name).unwrap_or_else(|| panic!("{name} not registered"));
            assert!(def.has_full_table(), "{name} lacks a stage table");
            let (lo, hi) = onset_hours_range(name);
            assert!(0.0 < lo && lo <= hi);
        }
    }
}

#[test]
fn stage_tables_ascend() {
    for name in disease::available_diseases() {
        let def = disease::disease(name).unwrap();
        let table = def.stage_table();
        for pair in table.windows(2) {
            assert!(pair[0].threshold_hours <= pair[1].threshold_hours, "{name} thresholds");
            assert!(pair[0].severity <= pair[1].severity, "{name} severities");
        }
    }
}

#[test]
fn listed_treatments_and_complications_resolve() {
    for name in disease::available_diseases() {
        let def = disease::disease(name).unwrap();
        for entry in def.treatments {
            assert!(
                disease::treatment(entry.treatment).is_some(),
                "{name} lists unknown treatment {}",
                entry.treatment
            );
            assert!((0.0..=1.0).contains(&entry.effectiveness));
        }
        for complication in def.complications {
            let c = disease::complication_or_generic(complication);
            assert!(c.severity_range.0 <= c.severity_range.1);
        }
    }
}

#[test]
fn restaging_stays_bounded_and_monotonic() {
    for name in disease::staged_diseases() {
        let def = disease::disease(name).unwrap();
        let mut previous = (DiseaseStage::Latent, 0.0);
        for step in 0..=200 {
            let hours = f64::from(step) * 0.5;
            let (stage, severity) = disease::restage(def, hours, 0.0);
            assert!((0.0..=1.0).contains(&severity), "{name} at {hours}h: {severity}");
            assert!(stage >= previous.0, "{name} regressed at {hours}h");
            assert!(severity >= previous.1 - 1e-9, "{name} severity dropped at {hours}h");
            previous = (stage, severity);

            let (_, treated) = disease::restage(def, hours, 2.0);
            assert!((0.0..=1.0).contains(&treated));
        }
    }
}

// ── Intervention catalog ───────────────────────────────────────────────

#[test]
fn catalog_names_unique_and_probabilities_valid() {
    let catalog = interventions::catalog();
    for (i, def) in catalog.iter().enumerate() {
        assert!(catalog[..i].iter().all(|other| other.name != def.name), "duplicate {}", def.name);
        assert!((0.0..=1.0).contains(&def.success_rate));
        assert!((0.0..=1.0).contains(&def.adverse_event_risk));
        assert_eq!(interventions::definition(def.name).map(|d| d.name), Some(def.name));
    }
}

#[test]
fn every_type_and_organ_is_covered() {
    for kind in [
        InterventionType::Medication,
        InterventionType::Procedure,
        InterventionType::Laboratory,
        InterventionType::Imaging,
        InterventionType::Supportive,
        InterventionType::Monitoring,
        InterventionType::Emergency,
    ] {
        assert!(interventions::of_type(kind).next().is_some(), "no {} interventions", kind.name());
    }
    let respiratory: Vec<&str> = interventions::targeting(OrganSystem::Respiratory)
        .map(|d| d.name)
        .collect();
    assert!(respiratory.contains(&"oxygen_therapy"));
}

// ── Scoring ────────────────────────────────────────────────────────────

#[test]
fn priority_scores_bounded_for_extreme_inputs() {
    let mut rng = StdRng::seed_from_u64(5);
    let cases: [(&[f64], f64); 3] = [(&[], 0.0), (&[1.0, 1.0, 1.0, 1.0], 1.0), (&[0.5], 0.3)];
    for (severities, risk) in cases {
        for complexity in [Complexity::Simple, Complexity::Moderate, Complexity::Complex] {
            for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
                let p = priority_score(severities.iter().copied(), risk, complexity, difficulty, &mut rng);
                assert!((0.0..=1.0).contains(&p));
            }
        }
    }
}

#[test]
fn social_context_scores_bounded() {
    let mut rng = StdRng::seed_from_u64(8);
    for _ in 0..50 {
        let ctx = social::sample_social_context(&mut rng);
        assert!(ctx.risk_multiplier >= 1.0 - 1e-9);
        assert_eq!(ctx.determinants.is_empty(), (ctx.risk_multiplier - 1.0).abs() < 1e-9);
        let factors = social::realistic_factors(&ctx);
        assert!((0.1..=0.8).contains(&factors.medication_compliance));
        assert!((0.1..=0.7).contains(&factors.follow_up_likelihood));
        assert!(factors.presentation_delay_hours >= 0.0);
    }
}

// ── Configuration ──────────────────────────────────────────────────────

#[test]
fn default_config_roundtrips_and_validates() {
    let config = SimulationConfig::default();
    assert!(validate_config(&config).is_empty());
    let json = serde_json::to_string(&config).unwrap();
    let back: SimulationConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, config);
    let sparse: SimulationConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(sparse, config);
}
