//! Vital signs and their derivation from organ function.
//!
//! Vitals are never accumulated tick over tick. Each step starts from the
//! patient's baseline and applies fixed linear maps from organ scores, so
//! the same organ state always yields the same deterministic part.

use crate::organs::OrganSystem;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Responsiveness as charted with the vitals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Responsiveness {
    Alert,
    Sedated,
    Confused,
    Unresponsive,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VitalSigns {
    pub heart_rate: f64,
    pub bp_systolic: f64,
    pub bp_diastolic: f64,
    pub mean_arterial_pressure: f64,
    pub respiratory_rate: f64,
    pub oxygen_saturation: f64,
    /// Degrees Fahrenheit.
    pub temperature: f64,
    pub pain_score: f64,
    pub consciousness_level: Responsiveness,
    /// Seconds.
    pub capillary_refill: f64,
    /// ml/hr.
    pub urine_output: f64,
}

impl Default for VitalSigns {
    fn default() -> Self {
        Self {
            heart_rate: 80.0,
            bp_systolic: 120.0,
            bp_diastolic: 80.0,
            mean_arterial_pressure: 93.0,
            respiratory_rate: 16.0,
            oxygen_saturation: 98.0,
            temperature: 98.6,
            pain_score: 0.0,
            consciousness_level: Responsiveness::Alert,
            capillary_refill: 2.0,
            urine_output: 50.0,
        }
    }
}

/// Physiologic clamp ranges.
pub mod limits {
    pub const HEART_RATE: (f64, f64) = (30.0, 180.0);
    pub const BP_SYSTOLIC: (f64, f64) = (60.0, 200.0);
    pub const BP_DIASTOLIC: (f64, f64) = (30.0, 120.0);
    pub const MEAN_ARTERIAL_PRESSURE: (f64, f64) = (40.0, 150.0);
    pub const RESPIRATORY_RATE: (f64, f64) = (6.0, 40.0);
    pub const OXYGEN_SATURATION: (f64, f64) = (70.0, 100.0);
    pub const TEMPERATURE: (f64, f64) = (93.0, 107.0);
    pub const PAIN_SCORE: (f64, f64) = (0.0, 10.0);
    pub const URINE_OUTPUT: (f64, f64) = (0.0, 200.0);
}

fn clamp_to(value: f64, (lo, hi): (f64, f64)) -> f64 {
    value.clamp(lo, hi)
}

impl VitalSigns {
    pub fn mean_arterial_from(systolic: f64, diastolic: f64) -> f64 {
        (systolic + 2.0 * diastolic) / 3.0
    }

    /// Copy with every vital pulled into its physiologic range.
    pub fn clamped(self) -> Self {
        Self {
            heart_rate: clamp_to(self.heart_rate, limits::HEART_RATE),
            bp_systolic: clamp_to(self.bp_systolic, limits::BP_SYSTOLIC),
            bp_diastolic: clamp_to(self.bp_diastolic, limits::BP_DIASTOLIC),
            mean_arterial_pressure: clamp_to(
                self.mean_arterial_pressure,
                limits::MEAN_ARTERIAL_PRESSURE,
            ),
            respiratory_rate: clamp_to(self.respiratory_rate, limits::RESPIRATORY_RATE),
            oxygen_saturation: clamp_to(self.oxygen_saturation, limits::OXYGEN_SATURATION),
            temperature: clamp_to(self.temperature, limits::TEMPERATURE),
            pain_score: clamp_to(self.pain_score, limits::PAIN_SCORE),
            urine_output: clamp_to(self.urine_output, limits::URINE_OUTPUT),
            ..self
        }
    }

    /// Whether every vital sits inside its clamp range.
    pub fn within_limits(&self) -> bool {
        let inside = |v: f64, (lo, hi): (f64, f64)| v >= lo && v <= hi;
        inside(self.heart_rate, limits::HEART_RATE)
            && inside(self.bp_systolic, limits::BP_SYSTOLIC)
            && inside(self.bp_diastolic, limits::BP_DIASTOLIC)
            && inside(self.mean_arterial_pressure, limits::MEAN_ARTERIAL_PRESSURE)
            && inside(self.respiratory_rate, limits::RESPIRATORY_RATE)
            && inside(self.oxygen_saturation, limits::OXYGEN_SATURATION)
            && inside(self.temperature, limits::TEMPERATURE)
            && inside(self.pain_score, limits::PAIN_SCORE)
            && inside(self.urine_output, limits::URINE_OUTPUT)
    }
}

/// Bounded random perturbation applied after the deterministic maps.
///
/// Oxygen saturation is deliberately absent: it follows respiratory
/// function exactly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VitalJitter {
    /// Max absolute beats per minute.
    pub heart_rate: f64,
    /// Max absolute breaths per minute.
    pub respiratory_rate: f64,
    /// Max absolute degrees.
    pub temperature: f64,
}

impl Default for VitalJitter {
    fn default() -> Self {
        Self {
            heart_rate: 2.0,
            respiratory_rate: 1.0,
            temperature: 0.1,
        }
    }
}

impl VitalJitter {
    pub fn none() -> Self {
        Self {
            heart_rate: 0.0,
            respiratory_rate: 0.0,
            temperature: 0.0,
        }
    }

    pub fn apply(&self, vitals: &mut VitalSigns, rng: &mut impl Rng) {
        vitals.heart_rate += symmetric(rng, self.heart_rate);
        vitals.respiratory_rate += symmetric(rng, self.respiratory_rate);
        vitals.temperature += symmetric(rng, self.temperature);
    }
}

fn symmetric(rng: &mut impl Rng, bound: f64) -> f64 {
    if bound > 0.0 {
        rng.gen_range(-bound..=bound)
    } else {
        0.0
    }
}

/// Pain score added per current symptom mentioning pain.
pub const PAIN_PER_SYMPTOM: f64 = 2.0;

/// Vitals implied by organ function, before interventions and jitter.
///
/// `score` returns the function score for an organ.
pub fn organ_adjusted_vitals(baseline: &VitalSigns, score: impl Fn(OrganSystem) -> f64) -> VitalSigns {
    let mut v = *baseline;

    let cardio = score(OrganSystem::Cardiovascular);
    if cardio < 0.7 {
        v.heart_rate += (1.0 - cardio) * 20.0;
        v.bp_systolic -= (1.0 - cardio) * 20.0;
        v.mean_arterial_pressure = VitalSigns::mean_arterial_from(v.bp_systolic, v.bp_diastolic);
    }

    let resp = score(OrganSystem::Respiratory);
    if resp < 0.7 {
        v.oxygen_saturation -= (1.0 - resp) * 15.0;
        v.respiratory_rate += (1.0 - resp) * 8.0;
    }

    let renal = score(OrganSystem::Renal);
    if renal < 0.6 {
        v.urine_output -= (1.0 - renal) * 30.0;
    }

    let neuro = score(OrganSystem::Neurological);
    if neuro < 0.3 {
        v.consciousness_level = Responsiveness::Unresponsive;
    } else if neuro < 0.5 {
        v.consciousness_level = Responsiveness::Confused;
    }

    v
}
