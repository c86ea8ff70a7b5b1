//! Names and demographics for synthetic patients

use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientName {
    pub given: String,
    pub family: String,
}

impl PatientName {
    pub fn new(given: impl Into<String>, family: impl Into<String>) -> Self {
        Self {
            given: given.into(),
            family: family.into(),
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.given, self.family)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Female,
    Male,
}

impl Gender {
    pub fn random(rng: &mut impl Rng) -> Self {
        if rng.gen_bool(0.5) {
            Gender::Female
        } else {
            Gender::Male
        }
    }
}

/// Adult ages seen in the admissions the simulator models.
pub const AGE_RANGE: (u32, u32) = (18, 90);

/// Generate a random name
pub fn generate_name(gender: Gender, rng: &mut impl Rng) -> PatientName {
    let given_pool = match gender {
        Gender::Female => FEMALE_NAMES,
        Gender::Male => MALE_NAMES,
    };
    let given = given_pool[rng.gen_range(0..given_pool.len())];
    let family = FAMILY_NAMES[rng.gen_range(0..FAMILY_NAMES.len())];

    PatientName::new(given, family)
}

/// Inclusive draw from `range`, or [`AGE_RANGE`]. A reversed range is
/// read low to high.
pub fn generate_age(range: Option<(u32, u32)>, rng: &mut impl Rng) -> u32 {
    let (a, b) = range.unwrap_or(AGE_RANGE);
    rng.gen_range(a.min(b)..=a.max(b))
}

static FEMALE_NAMES: &[&str] = &[
    "Mary",
    "Patricia",
    "Jennifer",
    "Linda",
    "Elizabeth",
    "Barbara",
    "Susan",
    "Sarah",
    "Aisha",
    "Ingrid",
    "Fatima",
    "Olga",
    "Amara",
    "Elena",
    "Priya",
    "Akiko",
    "Katya",
    "Nadia",
    "Leila",
    "Mei",
];

static MALE_NAMES: &[&str] = &[
    "James",
    "John",
    "Robert",
    "Michael",
    "William",
    "David",
    "Joseph",
    "Charles",
    "Wei",
    "Pavel",
    "Carlos",
    "Kenji",
    "Raj",
    "Dmitri",
    "Hassan",
    "Sven",
    "Omar",
    "Diego",
    "Hiroshi",
    "Kwame",
];

static FAMILY_NAMES: &[&str] = &[
    "Smith",
    "Johnson",
    "Williams",
    "Brown",
    "Jones",
    "Miller",
    "Davis",
    "Wilson",
    "Taylor",
    "Anderson",
    "Thomas",
    "Jackson",
    "Chen",
    "Nakamura",
    "Patel",
    "Ivanov",
    "Mueller",
    "Garcia",
    "Kim",
    "Okonkwo",
    "Johansson",
    "Ali",
    "Nguyen",
    "Kowalski",
    "Santos",
    "Singh",
    "Rodriguez",
    "Park",
    "O'Brien",
    "De Silva",
];
