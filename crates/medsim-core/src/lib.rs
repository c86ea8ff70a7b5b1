//! MedSim Core - Patient Simulation Engine
//!
//! Stateful engines that turn the rules in `medsim-logic` into a running
//! ward: synthetic patients arrive, wait for a provider, get treated while
//! their diseases progress and organs evolve, and leave by completion or
//! critical transfer.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`disease`] | Per-patient disease states, staging, complications, treatments |
//! | [`evolution`] | Whole-patient snapshots: organs, vitals, flags, adverse events |
//! | [`interventions`] | Order lifecycle, result synthesis, contraindication checks |
//! | [`generation`] | Synthetic patients: demographics, social context, diseases |
//! | [`queue`] | Waiting/active/completed/transferred bookkeeping and capacity |
//! | [`engine`] | The threaded scheduling loop and its control surface |
//! | [`events`] | Events published to observers |
//! | [`error`] | Error types |
//!
//! # Example
//!
//! ```rust,no_run
//! use medsim_core::prelude::*;
//!
//! let config = SimulationConfig { seed: Some(7), ..SimulationConfig::default() };
//! let mut engine = ContinuousSimulationEngine::new(config).unwrap();
//!
//! // Drive it by hand...
//! for _ in 0..120 {
//!     engine.step().unwrap();
//! }
//!
//! // ...or on its own thread for eight simulated hours
//! engine.start(Some(8.0)).unwrap();
//! engine.stop();
//! ```

pub mod disease;
pub mod engine;
pub mod error;
pub mod events;
pub mod evolution;
pub mod generation;
pub mod interventions;
pub mod queue;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::disease::{DiseaseProgressionEngine, DiseaseState};
    pub use crate::engine::{ContinuousSimulationEngine, SimulationMetrics, SimulationState, SimulationStatus};
    pub use crate::error::{CallbackError, SimError, SimResult};
    pub use crate::events::{SimulationEvent, SimulationEventKind};
    pub use crate::evolution::{PatientState, PatientStateEvolutionEngine};
    pub use crate::interventions::{InterventionInterface, OrderRequest};
    pub use crate::queue::PatientQueueManager;
    pub use medsim_logic::config::SimulationConfig;
    pub use medsim_logic::SimTime;
}
