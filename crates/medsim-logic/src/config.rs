//! Simulation configuration and validation.
//!
//! Every section deserializes with `#[serde(default)]`, so a JSON file only
//! needs the fields it changes:
//!
//! ```
//! use medsim_logic::config::{validate_config, SimulationConfig};
//!
//! let mut config = SimulationConfig::default();
//! config.queue.max_simultaneous_patients = 5;
//! config.scheduler.arrival_rate_per_hour = 4.0;
//! assert!(validate_config(&config).is_empty());
//! ```

use crate::vitals::VitalJitter;
use serde::{Deserialize, Serialize};

/// Bounds applied by `set_arrival_rate`.
pub const ARRIVAL_RATE_RANGE: (f64, f64) = (0.1, 10.0);
/// Bounds applied by `set_time_acceleration`.
pub const TIME_ACCELERATION_RANGE: (f64, f64) = (0.1, 10.0);

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub queue: QueueConfig,
    pub evolution: EvolutionConfig,
    pub scheduler: SchedulerConfig,
    /// RNG seed shared by every engine. `None` seeds from entropy.
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    pub max_simultaneous_patients: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            max_simultaneous_patients: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    pub jitter: VitalJitter,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub arrival_rate_per_hour: f64,
    /// Simulated seconds per tick before acceleration.
    pub tick_interval_seconds: f64,
    pub time_acceleration: f64,
    /// Wall-clock pause between ticks.
    pub sleep_ms: u64,
    /// Run length when `start` is given no duration.
    pub max_duration_hours: f64,
    /// How long `stop` waits for the loop thread before detaching it.
    pub stop_timeout_ms: u64,
    pub providers: Vec<String>,
    /// Chance per tick that a critically ill patient is transferred.
    pub transfer_probability: f64,
    /// Disease severity above which transfer is considered.
    pub transfer_severity: f64,
    /// Evolve full patient physiology and execute orders each tick.
    pub model_physiology: bool,
    /// Skip the arrival draw while every slot is occupied.
    pub gate_arrivals_on_capacity: bool,
    /// Oldest events are dropped past this many.
    pub max_events: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            arrival_rate_per_hour: 2.5,
            tick_interval_seconds: 30.0,
            time_acceleration: 1.0,
            sleep_ms: 100,
            max_duration_hours: 24.0,
            stop_timeout_ms: 2000,
            providers: ["Dr. Smith", "Dr. Johnson", "Dr. Williams", "Dr. Brown"]
                .map(String::from)
                .to_vec(),
            transfer_probability: 0.1,
            transfer_severity: 0.9,
            model_physiology: true,
            gate_arrivals_on_capacity: true,
            max_events: 10_000,
        }
    }
}

impl SchedulerConfig {
    /// Simulated hours advanced by one tick.
    pub fn tick_hours(&self) -> f64 {
        self.tick_interval_seconds * self.time_acceleration / 3600.0
    }

    /// Bernoulli arrival probability per tick.
    pub fn arrival_probability(&self) -> f64 {
        (self.arrival_rate_per_hour * self.tick_interval_seconds / 3600.0).clamp(0.0, 1.0)
    }
}

pub fn clamp_arrival_rate(rate: f64) -> f64 {
    rate.clamp(ARRIVAL_RATE_RANGE.0, ARRIVAL_RATE_RANGE.1)
}

pub fn clamp_time_acceleration(acceleration: f64) -> f64 {
    acceleration.clamp(TIME_ACCELERATION_RANGE.0, TIME_ACCELERATION_RANGE.1)
}

/// Configuration validation error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// No patient can ever be active.
    #[error("max_simultaneous_patients must be at least 1")]
    ZeroCapacity,
    #[error("arrival_rate_per_hour {0} outside {range:?}", range = ARRIVAL_RATE_RANGE)]
    ArrivalRateOutOfRange(f64),
    #[error("time_acceleration {0} outside {range:?}", range = TIME_ACCELERATION_RANGE)]
    TimeAccelerationOutOfRange(f64),
    /// Tick interval must be positive.
    #[error("tick_interval_seconds {0} must be > 0")]
    InvalidTickInterval(f64),
    /// Max duration must be positive.
    #[error("max_duration_hours {0} must be > 0")]
    InvalidMaxDuration(f64),
    #[error("at least one provider is required")]
    NoProviders,
    /// Provider names must be non-empty and unique.
    #[error("provider {0:?} is empty or duplicated")]
    InvalidProvider(String),
    /// Probability outside [0, 1].
    #[error("transfer_probability {0} outside [0, 1]")]
    InvalidTransferProbability(f64),
    #[error("transfer_severity {0} outside [0, 1]")]
    InvalidTransferSeverity(f64),
    /// Jitter bounds must be non-negative.
    #[error("vital jitter bounds must be >= 0")]
    NegativeJitter,
    #[error("max_events must be at least 1")]
    ZeroEventLog,
}

fn in_range(value: f64, (lo, hi): (f64, f64)) -> bool {
    value >= lo && value <= hi
}

/// Validate a simulation configuration, returning all errors found.
pub fn validate_config(config: &SimulationConfig) -> Vec<ConfigError> {
    let mut errors = Vec::new();
    let sched = &config.scheduler;

    if config.queue.max_simultaneous_patients == 0 {
        errors.push(ConfigError::ZeroCapacity);
    }
    if !in_range(sched.arrival_rate_per_hour, ARRIVAL_RATE_RANGE) {
        errors.push(ConfigError::ArrivalRateOutOfRange(sched.arrival_rate_per_hour));
    }
    if !in_range(sched.time_acceleration, TIME_ACCELERATION_RANGE) {
        errors.push(ConfigError::TimeAccelerationOutOfRange(sched.time_acceleration));
    }
    if sched.tick_interval_seconds.is_nan() || sched.tick_interval_seconds <= 0.0 {
        errors.push(ConfigError::InvalidTickInterval(sched.tick_interval_seconds));
    }
    if sched.max_duration_hours.is_nan() || sched.max_duration_hours <= 0.0 {
        errors.push(ConfigError::InvalidMaxDuration(sched.max_duration_hours));
    }
    if sched.providers.is_empty() {
        errors.push(ConfigError::NoProviders);
    }
    for (i, provider) in sched.providers.iter().enumerate() {
        if provider.trim().is_empty() || sched.providers[..i].contains(provider) {
            errors.push(ConfigError::InvalidProvider(provider.clone()));
        }
    }
    if !in_range(sched.transfer_probability, (0.0, 1.0)) {
        errors.push(ConfigError::InvalidTransferProbability(sched.transfer_probability));
    }
    if !in_range(sched.transfer_severity, (0.0, 1.0)) {
        errors.push(ConfigError::InvalidTransferSeverity(sched.transfer_severity));
    }
    let jitter = &config.evolution.jitter;
    if jitter.heart_rate < 0.0 || jitter.respiratory_rate < 0.0 || jitter.temperature < 0.0 {
        errors.push(ConfigError::NegativeJitter);
    }
    if sched.max_events == 0 {
        errors.push(ConfigError::ZeroEventLog);
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let errors = validate_config(&SimulationConfig::default());
        assert!(errors.is_empty(), "default config should be valid: {errors:?}");
    }

    #[test]
    fn test_zero_capacity() {
        let mut config = SimulationConfig::default();
        config.queue.max_simultaneous_patients = 0;
        assert!(validate_config(&config).contains(&ConfigError::ZeroCapacity));
    }

    #[test]
    fn test_rates_out_of_range() {
        let mut config = SimulationConfig::default();
        config.scheduler.arrival_rate_per_hour = 20.0;
        config.scheduler.time_acceleration = 0.0;
        let errors = validate_config(&config);
        assert!(errors.contains(&ConfigError::ArrivalRateOutOfRange(20.0)));
        assert!(errors.contains(&ConfigError::TimeAccelerationOutOfRange(0.0)));
    }

    #[test]
    fn test_nan_tick_rejected() {
        let mut config = SimulationConfig::default();
        config.scheduler.tick_interval_seconds = f64::NAN;
        assert!(validate_config(&config)
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidTickInterval(_))));
    }

    #[test]
    fn test_duplicate_and_empty_providers() {
        let mut config = SimulationConfig::default();
        config.scheduler.providers = vec!["Dr. A".into(), "Dr. A".into(), " ".into()];
        let errors = validate_config(&config);
        assert_eq!(
            errors
                .iter()
                .filter(|e| matches!(e, ConfigError::InvalidProvider(_)))
                .count(),
            2
        );
        config.scheduler.providers.clear();
        assert!(validate_config(&config).contains(&ConfigError::NoProviders));
    }

    #[test]
    fn test_collects_every_error() {
        let mut config = SimulationConfig::default();
        config.queue.max_simultaneous_patients = 0;
        config.scheduler.transfer_probability = 2.0;
        config.evolution.jitter.heart_rate = -1.0;
        assert_eq!(validate_config(&config).len(), 3);
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ConfigError::ZeroCapacity.to_string(),
            "max_simultaneous_patients must be at least 1"
        );
        assert_eq!(
            ConfigError::ArrivalRateOutOfRange(20.0).to_string(),
            "arrival_rate_per_hour 20 outside (0.1, 10.0)"
        );
        assert_eq!(
            ConfigError::InvalidProvider("Dr. A".into()).to_string(),
            "provider \"Dr. A\" is empty or duplicated"
        );
        let err: &dyn std::error::Error = &ConfigError::NoProviders;
        assert!(err.source().is_none());
    }

    #[test]
    fn test_tick_math() {
        let sched = SchedulerConfig::default();
        assert!((sched.tick_hours() - 30.0 / 3600.0).abs() < 1e-12);
        assert!((sched.arrival_probability() - 2.5 * 30.0 / 3600.0).abs() < 1e-12);
        assert_eq!(clamp_arrival_rate(50.0), 10.0);
        assert_eq!(clamp_time_acceleration(0.01), 0.1);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: SimulationConfig =
            serde_json::from_str(r#"{"queue":{"max_simultaneous_patients":5},"seed":7}"#)
                .expect("partial config parses");
        assert_eq!(config.queue.max_simultaneous_patients, 5);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.scheduler, SchedulerConfig::default());
    }
}
