//! Qualitative patient flags derived from organ scores and vitals.

use crate::organs::OrganSystem;
use crate::vitals::{Responsiveness, VitalSigns};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Consciousness {
    #[default]
    Alert,
    Sedated,
    Confused,
    Stupor,
    Coma,
}

impl Consciousness {
    pub fn is_depressed(self) -> bool {
        matches!(self, Consciousness::Stupor | Consciousness::Coma)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mobility {
    #[default]
    Independent,
    Limited,
    Assisted,
    Bedbound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Nutrition {
    #[default]
    Adequate,
    Supplemented,
    Impaired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkinIntegrity {
    #[default]
    Intact,
    AtRisk,
    Compromised,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PatientFlags {
    pub consciousness: Consciousness,
    pub mobility: Mobility,
    pub nutrition: Nutrition,
    pub skin: SkinIntegrity,
}

pub fn consciousness(neuro: f64, vitals: &VitalSigns) -> Consciousness {
    if neuro < 0.3 {
        Consciousness::Coma
    } else if neuro < 0.5 {
        Consciousness::Stupor
    } else if neuro < 0.7 {
        Consciousness::Confused
    } else if vitals.consciousness_level == Responsiveness::Sedated {
        Consciousness::Sedated
    } else {
        Consciousness::Alert
    }
}

pub fn mobility(level: Consciousness, musculoskeletal: f64, vitals: &VitalSigns) -> Mobility {
    if level.is_depressed() {
        Mobility::Bedbound
    } else if musculoskeletal < 0.4 {
        Mobility::Assisted
    } else if vitals.heart_rate > 120.0 || vitals.bp_systolic < 90.0 {
        Mobility::Limited
    } else {
        Mobility::Independent
    }
}

pub fn nutrition(gastrointestinal: f64, fed: bool) -> Nutrition {
    if gastrointestinal < 0.3 {
        Nutrition::Impaired
    } else if fed {
        Nutrition::Supplemented
    } else {
        Nutrition::Adequate
    }
}

pub fn skin(level: Consciousness, integumentary: f64, musculoskeletal: f64) -> SkinIntegrity {
    if integumentary < 0.4 {
        SkinIntegrity::Compromised
    } else if level.is_depressed() || musculoskeletal < 0.3 {
        SkinIntegrity::AtRisk
    } else {
        SkinIntegrity::Intact
    }
}

/// All four flags. Mobility and skin read the consciousness flag computed
/// here, not the charted responsiveness.
pub fn derive_flags<'a>(
    score: impl Fn(OrganSystem) -> f64,
    vitals: &VitalSigns,
    interventions: impl IntoIterator<Item = &'a str>,
) -> PatientFlags {
    let level = consciousness(score(OrganSystem::Neurological), vitals);
    let msk = score(OrganSystem::Musculoskeletal);
    let fed = interventions.into_iter().any(|i| i.contains("nutrition"));
    PatientFlags {
        consciousness: level,
        mobility: mobility(level, msk, vitals),
        nutrition: nutrition(score(OrganSystem::Gastrointestinal), fed),
        skin: skin(level, score(OrganSystem::Integumentary), msk),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consciousness_table() {
        let v = VitalSigns::default();
        assert_eq!(consciousness(0.2, &v), Consciousness::Coma);
        assert_eq!(consciousness(0.4, &v), Consciousness::Stupor);
        assert_eq!(consciousness(0.6, &v), Consciousness::Confused);
        assert_eq!(consciousness(0.9, &v), Consciousness::Alert);
        let sedated = VitalSigns {
            consciousness_level: Responsiveness::Sedated,
            ..v
        };
        assert_eq!(consciousness(0.9, &sedated), Consciousness::Sedated);
    }

    #[test]
    fn test_coma_makes_bedbound_and_at_risk() {
        let flags = derive_flags(
            |o| if o == OrganSystem::Neurological { 0.1 } else { 1.0 },
            &VitalSigns::default(),
            std::iter::empty::<&str>(),
        );
        assert_eq!(flags.consciousness, Consciousness::Coma);
        assert_eq!(flags.mobility, Mobility::Bedbound);
        assert_eq!(flags.skin, SkinIntegrity::AtRisk);
        assert_eq!(flags.nutrition, Nutrition::Adequate);
    }

    #[test]
    fn test_mobility_limited_by_vitals() {
        let tachy = VitalSigns {
            heart_rate: 130.0,
            ..VitalSigns::default()
        };
        assert_eq!(mobility(Consciousness::Alert, 1.0, &tachy), Mobility::Limited);
        assert_eq!(mobility(Consciousness::Alert, 0.3, &tachy), Mobility::Assisted);
    }

    #[test]
    fn test_nutrition_supplemented() {
        let flags = derive_flags(|_| 1.0, &VitalSigns::default(), ["nutrition"]);
        assert_eq!(flags.nutrition, Nutrition::Supplemented);
        assert_eq!(nutrition(0.2, true), Nutrition::Impaired);
    }

    #[test]
    fn test_defaults_are_healthy() {
        let flags = PatientFlags::default();
        assert_eq!(flags.consciousness, Consciousness::Alert);
        assert_eq!(flags.skin, SkinIntegrity::Intact);
    }
}
