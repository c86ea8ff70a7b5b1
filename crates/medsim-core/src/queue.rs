//! Admission queue
//!
//! Patients move waiting → active → completed, or to transferred from
//! waiting or active. Waiting patients are served by priority score.
//!
//! Capacity is the caller's concern: [`PatientQueueManager::activate_patient`]
//! does not check free slots, while
//! [`PatientQueueManager::try_activate_patient`] refuses when the queue is
//! full. The scheduler only uses the checked form.

use crate::disease::DiseaseProgressionEngine;
use crate::error::SimResult;
use crate::evolution::DiseaseBrief;
use crate::generation::{random_load_config, DynamicPatientLoader, LoadedPatient, PatientName};
use medsim_logic::config::QueueConfig;
use medsim_logic::triage::{self, Complexity, Difficulty, Specialty};
use medsim_logic::SimTime;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatientStatus {
    Waiting,
    Active,
    Completed,
    Transferred,
}

impl PatientStatus {
    pub fn name(self) -> &'static str {
        match self {
            PatientStatus::Waiting => "waiting",
            PatientStatus::Active => "active",
            PatientStatus::Completed => "completed",
            PatientStatus::Transferred => "transferred",
        }
    }
}

/// Where a critically ill patient is sent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransferDestination {
    #[serde(rename = "ICU")]
    Icu,
    #[serde(rename = "OR")]
    OperatingRoom,
    Specialist,
}

impl TransferDestination {
    pub const ALL: [TransferDestination; 3] = [
        TransferDestination::Icu,
        TransferDestination::OperatingRoom,
        TransferDestination::Specialist,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TransferDestination::Icu => "ICU",
            TransferDestination::OperatingRoom => "OR",
            TransferDestination::Specialist => "Specialist",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientQueueItem {
    pub patient_id: String,
    pub patient: LoadedPatient,
    pub arrival_time: SimTime,
    /// In [0, 1]; higher is more urgent
    pub priority_score: f64,
    pub status: PatientStatus,
    pub assigned_provider: Option<String>,
    pub activation_time: Option<SimTime>,
    pub estimated_completion_time: SimTime,
    pub actual_completion_time: Option<SimTime>,
    pub specialty: Specialty,
    pub complexity: Complexity,
    pub difficulty: Difficulty,
    pub transfer_destination: Option<TransferDestination>,
    pub notes: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueueMetrics {
    pub total_patients: usize,
    pub waiting_patients: usize,
    pub active_patients: usize,
    pub completed_patients: usize,
    pub transferred_patients: usize,
    /// Arrival to completion, over completed patients
    pub average_wait_hours: f64,
    /// Activation to completion, over completed patients
    pub average_treatment_hours: f64,
    pub patients_per_hour: f64,
    pub complexity_distribution: BTreeMap<Complexity, usize>,
    pub specialty_distribution: BTreeMap<Specialty, usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaitingEntry {
    pub patient_id: String,
    pub priority: f64,
    pub complexity: Complexity,
    pub specialty: Specialty,
    pub wait_hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveEntry {
    pub patient_id: String,
    pub provider: Option<String>,
    pub estimated_completion: SimTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueStatus {
    pub waiting_count: usize,
    pub active_count: usize,
    pub completed_count: usize,
    pub transferred_count: usize,
    pub available_slots: usize,
    /// In arrival order
    pub waiting: Vec<WaitingEntry>,
    pub active: Vec<ActiveEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueuePatientSummary {
    pub patient_id: String,
    pub name: PatientName,
    pub age: u32,
    pub arrival_time: SimTime,
    pub priority_score: f64,
    pub status: PatientStatus,
    pub specialty: Specialty,
    pub complexity: Complexity,
    pub conditions: Vec<String>,
    pub symptoms: Vec<String>,
    pub social_determinants: Vec<String>,
    pub medical_complexity: f64,
    pub risk_score: f64,
    pub diseases: Vec<DiseaseBrief>,
    pub assigned_provider: Option<String>,
    pub estimated_completion: SimTime,
    pub actual_completion: Option<SimTime>,
    pub notes: Vec<String>,
}

pub struct PatientQueueManager {
    max_simultaneous_patients: usize,
    rng: StdRng,
    loader: DynamicPatientLoader,
    patients: BTreeMap<String, PatientQueueItem>,
    waiting: Vec<String>,
    active: Vec<String>,
    completed: Vec<String>,
    transferred: Vec<String>,
    metrics: QueueMetrics,
    start_time: SimTime,
    next_id: usize,
}

impl PatientQueueManager {
    pub fn new(config: &QueueConfig, seed: Option<u64>, start_time: SimTime) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            max_simultaneous_patients: config.max_simultaneous_patients,
            rng,
            loader: DynamicPatientLoader::new(seed.map(|s| s.wrapping_add(1))),
            patients: BTreeMap::new(),
            waiting: Vec::new(),
            active: Vec::new(),
            completed: Vec::new(),
            transferred: Vec::new(),
            metrics: QueueMetrics::default(),
            start_time,
            next_id: 1,
        }
    }

    /// Synthesize an arrival at `now`. The patient is not queued until
    /// passed to [`add_patient_to_queue`](Self::add_patient_to_queue).
    pub fn generate_new_patient(
        &mut self,
        now: SimTime,
        diseases: &mut DiseaseProgressionEngine,
    ) -> SimResult<PatientQueueItem> {
        let config = random_load_config(&mut self.rng);
        let patient_id = format!("P{:03}", self.next_id);
        let patient = self.loader.load_patient(&patient_id, &config, now, diseases)?;
        self.next_id += 1;

        let priority_score = triage::priority_score(
            patient.severities(),
            patient.risk_score,
            config.complexity,
            config.difficulty,
            &mut self.rng,
        );
        let completion_minutes = config.complexity.draw_completion_minutes(&mut self.rng);

        Ok(PatientQueueItem {
            patient_id,
            patient,
            arrival_time: now,
            priority_score,
            status: PatientStatus::Waiting,
            assigned_provider: None,
            activation_time: None,
            estimated_completion_time: now + f64::from(completion_minutes) / 60.0,
            actual_completion_time: None,
            // random_load_config always picks a specialty
            specialty: config.specialty.unwrap_or(Specialty::EmergencyMedicine),
            complexity: config.complexity,
            difficulty: config.difficulty,
            transfer_destination: None,
            notes: Vec::new(),
        })
    }

    pub fn add_patient_to_queue(&mut self, patient: PatientQueueItem) {
        self.metrics.total_patients += 1;
        *self
            .metrics
            .complexity_distribution
            .entry(patient.complexity)
            .or_insert(0) += 1;
        *self
            .metrics
            .specialty_distribution
            .entry(patient.specialty)
            .or_insert(0) += 1;

        log::debug!(
            "{} queued (priority {:.2}, {})",
            patient.patient_id,
            patient.priority_score,
            patient.specialty.name()
        );
        self.waiting.push(patient.patient_id.clone());
        self.patients.insert(patient.patient_id.clone(), patient);
        self.refresh_counts();
    }

    /// Start treating a waiting patient. Returns false unless the patient
    /// is waiting. Free slots are not checked.
    pub fn activate_patient(&mut self, patient_id: &str, provider: &str, now: SimTime) -> bool {
        let Some(pos) = self.waiting.iter().position(|p| p == patient_id) else {
            return false;
        };
        let Some(patient) = self.patients.get_mut(patient_id) else {
            return false;
        };
        let minutes = patient.complexity.draw_completion_minutes(&mut self.rng);
        patient.status = PatientStatus::Active;
        patient.assigned_provider = Some(provider.to_string());
        patient.activation_time = Some(now);
        patient.estimated_completion_time = now + f64::from(minutes) / 60.0;

        self.waiting.remove(pos);
        self.active.push(patient_id.to_string());
        self.refresh_counts();
        log::debug!("{patient_id} activated with {provider}");
        true
    }

    /// [`activate_patient`](Self::activate_patient) that refuses when no
    /// slot is free.
    pub fn try_activate_patient(&mut self, patient_id: &str, provider: &str, now: SimTime) -> bool {
        self.can_accept_new_patient() && self.activate_patient(patient_id, provider, now)
    }

    /// Finish an active patient. Returns false unless the patient is active.
    pub fn complete_patient(&mut self, patient_id: &str, now: SimTime) -> bool {
        let Some(pos) = self.active.iter().position(|p| p == patient_id) else {
            return false;
        };
        if let Some(patient) = self.patients.get_mut(patient_id) {
            patient.status = PatientStatus::Completed;
            patient.actual_completion_time = Some(now);
        }
        self.active.remove(pos);
        self.completed.push(patient_id.to_string());
        self.refresh_counts();
        log::debug!("{patient_id} completed at t={now:.2}h");
        true
    }

    /// Transfer a waiting or active patient out of the queue.
    pub fn transfer_patient(&mut self, patient_id: &str, destination: TransferDestination, now: SimTime) -> bool {
        let from_active = self.active.iter().position(|p| p == patient_id);
        let from_waiting = self.waiting.iter().position(|p| p == patient_id);
        match (from_active, from_waiting) {
            (Some(pos), _) => {
                self.active.remove(pos);
            }
            (None, Some(pos)) => {
                self.waiting.remove(pos);
            }
            (None, None) => return false,
        }
        if let Some(patient) = self.patients.get_mut(patient_id) {
            patient.status = PatientStatus::Transferred;
            patient.transfer_destination = Some(destination);
            patient
                .notes
                .push(format!("Transferred to {} at t={now:.2}h", destination.name()));
        }
        self.transferred.push(patient_id.to_string());
        self.refresh_counts();
        log::debug!("{patient_id} transferred to {}", destination.name());
        true
    }

    /// Highest-priority waiting patient. Earlier arrivals win ties.
    pub fn get_next_patient(&self) -> Option<&str> {
        let mut best: Option<(&str, f64)> = None;
        for id in &self.waiting {
            let Some(patient) = self.patients.get(id) else {
                continue;
            };
            if best.map_or(true, |(_, score)| patient.priority_score > score) {
                best = Some((id.as_str(), patient.priority_score));
            }
        }
        best.map(|(id, _)| id)
    }

    pub fn available_slots(&self) -> usize {
        self.max_simultaneous_patients.saturating_sub(self.active.len())
    }

    pub fn can_accept_new_patient(&self) -> bool {
        self.active.len() < self.max_simultaneous_patients
    }

    pub fn max_simultaneous_patients(&self) -> usize {
        self.max_simultaneous_patients
    }

    pub fn patient(&self, patient_id: &str) -> Option<&PatientQueueItem> {
        self.patients.get(patient_id)
    }

    pub fn waiting_patients(&self) -> &[String] {
        &self.waiting
    }

    pub fn active_patients(&self) -> &[String] {
        &self.active
    }

    pub fn completed_patients(&self) -> &[String] {
        &self.completed
    }

    pub fn transferred_patients(&self) -> &[String] {
        &self.transferred
    }

    pub fn queue_status(&self, now: SimTime) -> QueueStatus {
        let waiting = self
            .waiting
            .iter()
            .filter_map(|id| self.patients.get(id))
            .map(|p| WaitingEntry {
                patient_id: p.patient_id.clone(),
                priority: p.priority_score,
                complexity: p.complexity,
                specialty: p.specialty,
                wait_hours: (now - p.arrival_time).max(0.0),
            })
            .collect();
        let active = self
            .active
            .iter()
            .filter_map(|id| self.patients.get(id))
            .map(|p| ActiveEntry {
                patient_id: p.patient_id.clone(),
                provider: p.assigned_provider.clone(),
                estimated_completion: p.estimated_completion_time,
            })
            .collect();
        QueueStatus {
            waiting_count: self.waiting.len(),
            active_count: self.active.len(),
            completed_count: self.completed.len(),
            transferred_count: self.transferred.len(),
            available_slots: self.available_slots(),
            waiting,
            active,
        }
    }

    /// Recompute averages and throughput as of `now`.
    pub fn update_metrics(&mut self, now: SimTime) {
        let finished: Vec<&PatientQueueItem> = self
            .completed
            .iter()
            .filter_map(|id| self.patients.get(id))
            .collect();
        if !finished.is_empty() {
            let n = finished.len() as f64;
            let waits: f64 = finished
                .iter()
                .filter_map(|p| p.actual_completion_time.map(|t| t - p.arrival_time))
                .sum();
            let treatment: f64 = finished
                .iter()
                .filter_map(|p| Some(p.actual_completion_time? - p.activation_time?))
                .sum();
            self.metrics.average_wait_hours = waits / n;
            self.metrics.average_treatment_hours = treatment / n;
        }

        let elapsed = now - self.start_time;
        if elapsed > 0.0 {
            self.metrics.patients_per_hour = self.completed.len() as f64 / elapsed;
        }
        self.refresh_counts();
    }

    pub fn metrics(&self) -> &QueueMetrics {
        &self.metrics
    }

    pub fn patient_summary(&self, patient_id: &str) -> Option<QueuePatientSummary> {
        let item = self.patients.get(patient_id)?;
        let loaded = &item.patient;
        let profile = &loaded.profile;
        Some(QueuePatientSummary {
            patient_id: item.patient_id.clone(),
            name: profile.name.clone(),
            age: profile.age,
            arrival_time: item.arrival_time,
            priority_score: item.priority_score,
            status: item.status,
            specialty: item.specialty,
            complexity: item.complexity,
            conditions: profile.conditions.clone(),
            symptoms: profile.symptoms.clone(),
            social_determinants: profile.social_context.determinants.clone(),
            medical_complexity: loaded.medical_complexity,
            risk_score: loaded.risk_score,
            diseases: loaded.disease_states.iter().map(DiseaseBrief::from).collect(),
            assigned_provider: item.assigned_provider.clone(),
            estimated_completion: item.estimated_completion_time,
            actual_completion: item.actual_completion_time,
            notes: item.notes.clone(),
        })
    }

    fn refresh_counts(&mut self) {
        self.metrics.waiting_patients = self.waiting.len();
        self.metrics.active_patients = self.active.len();
        self.metrics.completed_patients = self.completed.len();
        self.metrics.transferred_patients = self.transferred.len();
    }
}
