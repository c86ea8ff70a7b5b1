//! Simulation events published to observers

use crate::queue::TransferDestination;
use medsim_logic::adverse::AdverseEventType;
use medsim_logic::triage::{Complexity, Specialty};
use medsim_logic::SimTime;
use serde::{Deserialize, Serialize};

/// Something that happened to one patient at one instant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationEvent {
    pub timestamp: SimTime,
    pub patient_id: String,
    pub description: String,
    pub kind: SimulationEventKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimulationEventKind {
    Arrival {
        priority_score: f64,
        complexity: Complexity,
        specialty: Specialty,
        conditions: Vec<String>,
    },
    Activation {
        provider: String,
        priority_score: f64,
    },
    Completion {
        provider: Option<String>,
        estimated_completion_time: SimTime,
    },
    Transfer {
        destination: TransferDestination,
        reason: String,
        disease: String,
        severity: f64,
    },
    /// A disease gained a complication during a tick.
    Complication {
        disease: String,
        complication: String,
    },
    /// Adverse events raised by a tick of physiology.
    AdverseEvents {
        events: Vec<AdverseEventType>,
    },
}

impl SimulationEventKind {
    pub fn name(&self) -> &'static str {
        match self {
            SimulationEventKind::Arrival { .. } => "patient_arrival",
            SimulationEventKind::Activation { .. } => "patient_activation",
            SimulationEventKind::Completion { .. } => "patient_completion",
            SimulationEventKind::Transfer { .. } => "patient_transfer",
            SimulationEventKind::Complication { .. } => "complication",
            SimulationEventKind::AdverseEvents { .. } => "adverse_events",
        }
    }
}

impl SimulationEvent {
    pub fn arrival(
        timestamp: SimTime,
        patient_id: &str,
        priority_score: f64,
        complexity: Complexity,
        specialty: Specialty,
        conditions: Vec<String>,
    ) -> Self {
        Self {
            timestamp,
            patient_id: patient_id.to_string(),
            description: format!(
                "Patient {patient_id} arrived with {} {} case",
                complexity.name(),
                specialty.name()
            ),
            kind: SimulationEventKind::Arrival {
                priority_score,
                complexity,
                specialty,
                conditions,
            },
        }
    }

    pub fn activation(timestamp: SimTime, patient_id: &str, provider: &str, priority_score: f64) -> Self {
        Self {
            timestamp,
            patient_id: patient_id.to_string(),
            description: format!("Patient {patient_id} activated by {provider}"),
            kind: SimulationEventKind::Activation {
                provider: provider.to_string(),
                priority_score,
            },
        }
    }

    pub fn completion(
        timestamp: SimTime,
        patient_id: &str,
        provider: Option<String>,
        estimated_completion_time: SimTime,
    ) -> Self {
        Self {
            timestamp,
            patient_id: patient_id.to_string(),
            description: format!("Patient {patient_id} completed treatment"),
            kind: SimulationEventKind::Completion {
                provider,
                estimated_completion_time,
            },
        }
    }

    pub fn transfer(
        timestamp: SimTime,
        patient_id: &str,
        destination: TransferDestination,
        disease: &str,
        severity: f64,
    ) -> Self {
        Self {
            timestamp,
            patient_id: patient_id.to_string(),
            description: format!(
                "Patient {patient_id} transferred to {} due to critical condition",
                destination.name()
            ),
            kind: SimulationEventKind::Transfer {
                destination,
                reason: "critical_condition".into(),
                disease: disease.to_string(),
                severity,
            },
        }
    }

    pub fn complication(timestamp: SimTime, patient_id: &str, disease: &str, complication: &str) -> Self {
        Self {
            timestamp,
            patient_id: patient_id.to_string(),
            description: format!("Patient {patient_id} developed {complication} from {disease}"),
            kind: SimulationEventKind::Complication {
                disease: disease.to_string(),
                complication: complication.to_string(),
            },
        }
    }

    pub fn adverse_events(timestamp: SimTime, patient_id: &str, events: Vec<AdverseEventType>) -> Self {
        let names: Vec<&str> = events.iter().map(|e| e.name()).collect();
        Self {
            timestamp,
            patient_id: patient_id.to_string(),
            description: format!("Patient {patient_id} adverse events: {}", names.join(", ")),
            kind: SimulationEventKind::AdverseEvents { events },
        }
    }

    pub fn kind_name(&self) -> &'static str {
        self.kind.name()
    }
}
