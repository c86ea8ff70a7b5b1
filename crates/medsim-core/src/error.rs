//! Error types for the simulation engines

use medsim_logic::config::ConfigError;
use thiserror::Error;

/// Errors returned by engine operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimError {
    /// The disease name is not in the disease table.
    #[error("Unknown disease: {0}")]
    UnknownDisease(String),

    /// Neither a defined treatment nor listed by any disease.
    #[error("Unknown treatment: {0}")]
    UnknownTreatment(String),

    #[error("Unknown intervention: {0}")]
    UnknownIntervention(String),

    #[error("Unknown patient: {0}")]
    UnknownPatient(String),

    #[error("Invalid configuration: {}", join_errors(.0))]
    InvalidConfig(Vec<ConfigError>),

    #[error("Simulation is already running")]
    AlreadyRunning,

    /// Stopped is terminal; a new engine is needed to run again.
    #[error("Simulation has been stopped")]
    Stopped,
}

fn join_errors(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Failure reported by an event or metrics observer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Callback failed: {0}")]
pub struct CallbackError(pub String);

impl CallbackError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

pub type SimResult<T> = Result<T, SimError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_config_lists_every_error() {
        let err = SimError::InvalidConfig(vec![ConfigError::ZeroCapacity, ConfigError::NoProviders]);
        let text = err.to_string();
        assert!(text.contains("max_simultaneous_patients"));
        assert!(text.contains("provider"));
    }

    #[test]
    fn test_callback_error_message() {
        assert_eq!(CallbackError::new("ui closed").to_string(), "Callback failed: ui closed");
    }
}
