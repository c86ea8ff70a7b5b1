//! Case-mix draws and priority scoring for arriving patients.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Pick one value from `(value, weight)` pairs. Falls back to the first
/// entry when the weights are unusable.
pub fn weighted_choice<T: Copy>(items: &[(T, f64)], rng: &mut impl Rng) -> Option<T> {
    items
        .choose_weighted(rng, |(_, w)| *w)
        .ok()
        .or_else(|| items.first())
        .map(|(v, _)| *v)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Specialty {
    EmergencyMedicine,
    Cardiology,
    Neurology,
    Rheumatology,
    Hematology,
    InfectiousDisease,
}

impl Specialty {
    pub const WEIGHTS: [(Specialty, f64); 6] = [
        (Specialty::EmergencyMedicine, 0.40),
        (Specialty::Cardiology, 0.20),
        (Specialty::Neurology, 0.15),
        (Specialty::Rheumatology, 0.10),
        (Specialty::Hematology, 0.10),
        (Specialty::InfectiousDisease, 0.05),
    ];

    pub fn name(self) -> &'static str {
        match self {
            Specialty::EmergencyMedicine => "emergency_medicine",
            Specialty::Cardiology => "cardiology",
            Specialty::Neurology => "neurology",
            Specialty::Rheumatology => "rheumatology",
            Specialty::Hematology => "hematology",
            Specialty::InfectiousDisease => "infectious_disease",
        }
    }

    pub fn draw(rng: &mut impl Rng) -> Self {
        weighted_choice(&Self::WEIGHTS, rng).unwrap_or(Specialty::EmergencyMedicine)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Complexity {
    Simple,
    Moderate,
    Complex,
}

impl Complexity {
    pub const WEIGHTS: [(Complexity, f64); 3] = [
        (Complexity::Simple, 0.3),
        (Complexity::Moderate, 0.5),
        (Complexity::Complex, 0.2),
    ];

    pub fn name(self) -> &'static str {
        match self {
            Complexity::Simple => "simple",
            Complexity::Moderate => "moderate",
            Complexity::Complex => "complex",
        }
    }

    pub fn draw(rng: &mut impl Rng) -> Self {
        weighted_choice(&Self::WEIGHTS, rng).unwrap_or(Complexity::Moderate)
    }

    /// Contribution to the priority score.
    pub fn priority_weight(self) -> f64 {
        match self {
            Complexity::Simple => 0.1,
            Complexity::Moderate => 0.3,
            Complexity::Complex => 0.5,
        }
    }

    /// Inclusive range of minutes an encounter of this complexity takes.
    pub fn completion_minutes(self) -> (u32, u32) {
        match self {
            Complexity::Simple => (15, 45),
            Complexity::Moderate => (30, 90),
            Complexity::Complex => (60, 180),
        }
    }

    pub fn draw_completion_minutes(self, rng: &mut impl Rng) -> u32 {
        let (lo, hi) = self.completion_minutes();
        rng.gen_range(lo..=hi)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const WEIGHTS: [(Difficulty, f64); 3] = [
        (Difficulty::Easy, 0.2),
        (Difficulty::Medium, 0.5),
        (Difficulty::Hard, 0.3),
    ];

    pub fn name(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn draw(rng: &mut impl Rng) -> Self {
        weighted_choice(&Self::WEIGHTS, rng).unwrap_or(Difficulty::Medium)
    }

    pub fn priority_weight(self) -> f64 {
        match self {
            Difficulty::Easy => 0.1,
            Difficulty::Medium => 0.3,
            Difficulty::Hard => 0.5,
        }
    }
}

/// Deterministic part of the admission priority, before jitter and clamping.
pub fn base_priority(
    severities: impl IntoIterator<Item = f64>,
    risk_score: f64,
    complexity: Complexity,
    difficulty: Difficulty,
) -> f64 {
    let medical: f64 = severities.into_iter().map(|s| s * 0.4).sum();
    medical + risk_score * 0.2 + complexity.priority_weight() + difficulty.priority_weight()
}

/// Admission priority in [0, 1]. Higher is more urgent.
pub fn priority_score(
    severities: impl IntoIterator<Item = f64>,
    risk_score: f64,
    complexity: Complexity,
    difficulty: Difficulty,
    rng: &mut impl Rng,
) -> f64 {
    let jitter = rng.gen_range(-0.1..=0.1);
    (base_priority(severities, risk_score, complexity, difficulty) + jitter).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;

    #[test]
    fn test_weights_sum_to_one() {
        let sum = |ws: &[f64]| ws.iter().sum::<f64>();
        assert!((sum(&Specialty::WEIGHTS.map(|(_, w)| w)) - 1.0).abs() < 1e-9);
        assert!((sum(&Complexity::WEIGHTS.map(|(_, w)| w)) - 1.0).abs() < 1e-9);
        assert!((sum(&Difficulty::WEIGHTS.map(|(_, w)| w)) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_specialty_distribution_roughly_weighted() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut counts: HashMap<Specialty, u32> = HashMap::new();
        for _ in 0..10_000 {
            *counts.entry(Specialty::draw(&mut rng)).or_default() += 1;
        }
        let em = counts[&Specialty::EmergencyMedicine] as f64 / 10_000.0;
        assert!((em - 0.4).abs() < 0.03, "emergency share {em}");
        assert!(counts[&Specialty::InfectiousDisease] < counts[&Specialty::Cardiology]);
    }

    #[test]
    fn test_weighted_choice_degenerate() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(weighted_choice::<u8>(&[], &mut rng), None);
        assert_eq!(weighted_choice(&[(7u8, 0.0)], &mut rng), Some(7));
    }

    #[test]
    fn test_priority_clamped() {
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..100 {
            let p = priority_score(
                [0.9, 0.9, 0.9],
                1.0,
                Complexity::Complex,
                Difficulty::Hard,
                &mut rng,
            );
            assert_eq!(p, 1.0);
            let low = priority_score([0.0; 0], 0.0, Complexity::Simple, Difficulty::Easy, &mut rng);
            assert!(low > 0.1 - 1e-9 && low < 0.3 + 1e-9);
        }
    }

    #[test]
    fn test_base_priority_formula() {
        let p = base_priority([0.5], 0.5, Complexity::Moderate, Difficulty::Medium);
        assert!((p - (0.2 + 0.1 + 0.3 + 0.3)).abs() < 1e-9);
    }

    #[test]
    fn test_completion_ranges() {
        let mut rng = StdRng::seed_from_u64(4);
        for c in [Complexity::Simple, Complexity::Moderate, Complexity::Complex] {
            let (lo, hi) = c.completion_minutes();
            for _ in 0..50 {
                let m = c.draw_completion_minutes(&mut rng);
                assert!(m >= lo && m <= hi);
            }
        }
    }
}
