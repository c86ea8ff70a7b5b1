//! Pure clinical simulation logic for MedSim.
//!
//! This crate holds the reference tables and decision functions the engines
//! in `medsim-core` are built from. Nothing here owns state or threads:
//! functions take plain data (plus an `Rng` where a draw is needed) and
//! return results, so every rule is unit-testable on its own.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`adverse`] | Adverse event kinds, order-execution and per-step samplers |
//! | [`config`] | Simulation configuration, JSON defaults, validation |
//! | [`disease`] | Disease stage tables, severity math, complications, treatments |
//! | [`effects`] | Disease × organ and intervention × organ effect tables |
//! | [`flags`] | Consciousness, mobility, nutrition and skin decision tables |
//! | [`interventions`] | Intervention catalog (7 types) and order priorities |
//! | [`organs`] | The 11 organ systems, baseline metrics, dysfunction tiers |
//! | [`social`] | Social determinants, comorbidities, risk and complexity scores |
//! | [`triage`] | Specialty/complexity/difficulty draws and admission priority |
//! | [`vitals`] | Vital signs, physiologic clamps, organ-to-vitals maps, jitter |

pub mod adverse;
pub mod config;
pub mod disease;
pub mod effects;
pub mod flags;
pub mod interventions;
pub mod organs;
pub mod social;
pub mod triage;
pub mod vitals;

/// Simulated time in hours since the session epoch.
pub type SimTime = f64;
