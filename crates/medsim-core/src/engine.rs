//! Continuous simulation engine - the multi-patient scheduling loop
//!
//! All mutable state lives in [`SimulationCore`] behind one mutex. A single
//! background thread runs ticks while the engine is running; control calls
//! from other threads only flip atomics in [`SimulationControl`], which the
//! loop reads at the top of every tick.
//!
//! One tick, in order:
//! 1. arrival draw
//! 2. completion sweep
//! 3. admission of waiting patients into free slots
//! 4. disease progression (or full physiology) and critical transfers
//! 5. time advance and metrics

use crate::disease::{DiseaseProgressionEngine, DiseaseSummary};
use crate::error::{CallbackError, SimError, SimResult};
use crate::events::SimulationEvent;
use crate::evolution::{patient_summary, PatientState, PatientStateEvolutionEngine, PatientSummary, PatientTimeline};
use crate::interventions::{InterventionInterface, InterventionResponse, OrderRequest, OrderStatus, OrdersSummary};
use crate::queue::{PatientQueueManager, QueuePatientSummary, QueueStatus, TransferDestination};
use medsim_logic::config::{self, SimulationConfig};
use medsim_logic::triage::{Complexity, Difficulty, Specialty};
use medsim_logic::SimTime;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicU8, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

pub type EventCallback = Box<dyn FnMut(&SimulationEvent) -> Result<(), CallbackError> + Send>;
pub type MetricsCallback = Box<dyn FnMut(&SimulationMetrics) -> Result<(), CallbackError> + Send>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimulationState {
    Idle,
    Running,
    Paused,
    /// Terminal.
    Stopped,
}

impl SimulationState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => SimulationState::Idle,
            1 => SimulationState::Running,
            2 => SimulationState::Paused,
            _ => SimulationState::Stopped,
        }
    }

    fn as_u8(self) -> u8 {
        match self {
            SimulationState::Idle => 0,
            SimulationState::Running => 1,
            SimulationState::Paused => 2,
            SimulationState::Stopped => 3,
        }
    }
}

/// Signals shared between the engine handle and the loop thread
#[derive(Debug)]
pub struct SimulationControl {
    state: AtomicU8,
    stop_requested: AtomicBool,
    /// f64 bits
    time_acceleration: AtomicU64,
    /// f64 bits
    arrival_rate: AtomicU64,
}

impl SimulationControl {
    fn new(time_acceleration: f64, arrival_rate: f64) -> Self {
        Self {
            state: AtomicU8::new(SimulationState::Idle.as_u8()),
            stop_requested: AtomicBool::new(false),
            time_acceleration: AtomicU64::new(time_acceleration.to_bits()),
            arrival_rate: AtomicU64::new(arrival_rate.to_bits()),
        }
    }

    pub fn state(&self) -> SimulationState {
        SimulationState::from_u8(self.state.load(Ordering::SeqCst))
    }

    fn set_state(&self, state: SimulationState) {
        self.state.store(state.as_u8(), Ordering::SeqCst);
    }

    /// Move `from` → `to` only if the current state is `from`.
    fn transition(&self, from: SimulationState, to: SimulationState) -> bool {
        self.state
            .compare_exchange(from.as_u8(), to.as_u8(), Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    fn stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::SeqCst)
    }

    pub fn time_acceleration(&self) -> f64 {
        f64::from_bits(self.time_acceleration.load(Ordering::SeqCst))
    }

    pub fn arrival_rate(&self) -> f64 {
        f64::from_bits(self.arrival_rate.load(Ordering::SeqCst))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderStats {
    pub completed: usize,
    pub transferred: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationMetrics {
    pub total_patients_processed: usize,
    pub total_simulation_hours: f64,
    pub average_patients_per_hour: f64,
    pub average_wait_hours: f64,
    pub average_treatment_hours: f64,
    pub specialty_distribution: BTreeMap<Specialty, usize>,
    pub complexity_distribution: BTreeMap<Complexity, usize>,
    pub difficulty_distribution: BTreeMap<Difficulty, usize>,
    pub provider_performance: BTreeMap<String, ProviderStats>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationStatus {
    pub state: SimulationState,
    pub current_time: SimTime,
    pub start_time: Option<SimTime>,
    pub end_time: Option<SimTime>,
    pub total_events: usize,
    pub time_acceleration: f64,
    pub arrival_rate_per_hour: f64,
    pub available_providers: Vec<String>,
    pub queue: QueueStatus,
    pub metrics: SimulationMetrics,
}

/// Everything known about one patient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientDetails {
    pub queue: QueuePatientSummary,
    pub diseases: DiseaseSummary,
    /// Latest physiology snapshot, once the patient has been active
    pub state: Option<PatientSummary>,
    /// Orders of an active patient. Cleared on completion or transfer.
    pub orders: Option<OrdersSummary>,
}

/// State advanced by the simulation loop
pub struct SimulationCore {
    config: SimulationConfig,
    rng: StdRng,
    queue: PatientQueueManager,
    diseases: DiseaseProgressionEngine,
    evolution: PatientStateEvolutionEngine,
    current_time: SimTime,
    start_time: Option<SimTime>,
    end_time: Option<SimTime>,
    available_providers: Vec<String>,
    events: VecDeque<SimulationEvent>,
    total_events: usize,
    metrics: SimulationMetrics,
    timelines: BTreeMap<String, PatientTimeline>,
    interventions: BTreeMap<String, InterventionInterface>,
    event_callbacks: Vec<EventCallback>,
    metrics_callbacks: Vec<MetricsCallback>,
}

impl SimulationCore {
    fn new(config: SimulationConfig) -> Self {
        let seed = config.seed;
        let derived = |offset: u64| seed.map(|s| s.wrapping_add(offset));
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng,
            queue: PatientQueueManager::new(&config.queue, derived(1), 0.0),
            diseases: DiseaseProgressionEngine::new(derived(3)),
            evolution: PatientStateEvolutionEngine::new(&config.evolution, derived(4)),
            current_time: 0.0,
            start_time: None,
            end_time: None,
            available_providers: config.scheduler.providers.clone(),
            events: VecDeque::new(),
            total_events: 0,
            metrics: SimulationMetrics::default(),
            timelines: BTreeMap::new(),
            interventions: BTreeMap::new(),
            event_callbacks: Vec::new(),
            metrics_callbacks: Vec::new(),
            config,
        }
    }

    fn apply_control(&mut self, control: &SimulationControl) {
        self.config.scheduler.time_acceleration = control.time_acceleration();
        self.config.scheduler.arrival_rate_per_hour = control.arrival_rate();
    }

    /// Run one tick and advance simulated time.
    fn tick(&mut self) {
        self.process_arrivals();
        self.check_completions();
        self.activate_waiting_patients();
        self.progress_active_patients();

        self.current_time += self.config.scheduler.tick_hours();
        self.update_metrics();
    }

    fn process_arrivals(&mut self) {
        let sched = &self.config.scheduler;
        if sched.gate_arrivals_on_capacity && !self.queue.can_accept_new_patient() {
            return;
        }
        if self.rng.gen::<f64>() >= sched.arrival_probability() {
            return;
        }

        let now = self.current_time;
        let item = match self.queue.generate_new_patient(now, &mut self.diseases) {
            Ok(item) => item,
            Err(e) => {
                log::warn!("Patient generation failed: {e}");
                return;
            }
        };
        *self.metrics.difficulty_distribution.entry(item.difficulty).or_insert(0) += 1;
        let event = SimulationEvent::arrival(
            now,
            &item.patient_id,
            item.priority_score,
            item.complexity,
            item.specialty,
            item.patient.profile.conditions.clone(),
        );
        self.queue.add_patient_to_queue(item);
        self.emit(event);
    }

    fn check_completions(&mut self) {
        let now = self.current_time;
        let due: Vec<(String, Option<String>, SimTime)> = self
            .queue
            .active_patients()
            .iter()
            .filter_map(|id| self.queue.patient(id))
            .filter(|p| p.estimated_completion_time <= now)
            .map(|p| (p.patient_id.clone(), p.assigned_provider.clone(), p.estimated_completion_time))
            .collect();

        for (id, provider, estimated) in due {
            if !self.queue.complete_patient(&id, now) {
                continue;
            }
            self.discharge(&id);
            if let Some(provider) = &provider {
                self.release_provider(provider);
                self.provider_stats(provider).completed += 1;
            }
            self.emit(SimulationEvent::completion(now, &id, provider, estimated));
        }
    }

    fn activate_waiting_patients(&mut self) {
        let now = self.current_time;
        while self.queue.available_slots() > 0 && !self.available_providers.is_empty() {
            let Some(id) = self.queue.get_next_patient().map(str::to_string) else {
                break;
            };
            let idx = self.rng.gen_range(0..self.available_providers.len());
            let provider = self.available_providers.swap_remove(idx);
            if !self.queue.try_activate_patient(&id, &provider, now) {
                self.available_providers.push(provider);
                break;
            }

            let base_vitals = self.queue.patient(&id).map(|p| p.patient.profile.vitals);
            let diseases = self.diseases.patient_diseases(&id).to_vec();
            let initial = self.evolution.initialize_patient_state(diseases, base_vitals, now);
            self.timelines.insert(id.clone(), PatientTimeline::new(initial));
            let order_seed = self.config.seed.map(|_| self.rng.gen());
            self.interventions
                .insert(id.clone(), InterventionInterface::new(order_seed));

            let priority = self.queue.patient(&id).map_or(0.0, |p| p.priority_score);
            self.emit(SimulationEvent::activation(now, &id, &provider, priority));
        }
    }

    fn progress_active_patients(&mut self) {
        let now = self.current_time;
        let dt = self.config.scheduler.tick_hours();
        let active: Vec<String> = self.queue.active_patients().to_vec();

        for id in active {
            if self.config.scheduler.model_physiology {
                self.evolve_patient(&id, now, dt);
            } else {
                for gained in self.progress_diseases(&id, dt) {
                    self.emit(gained);
                }
            }
            self.consider_transfer(&id, now);
        }
    }

    /// Plain disease progression. Returns complication events.
    fn progress_diseases(&mut self, id: &str, dt: f64) -> Vec<SimulationEvent> {
        let known = self.diseases.patient_complications(id).len();
        self.diseases.progress_patient(id, dt);
        self.diseases.patient_complications(id)[known..]
            .iter()
            .map(|c| SimulationEvent::complication(self.current_time, id, &c.disease, &c.name))
            .collect()
    }

    /// Execute due orders, evolve physiology and fold the evolved diseases
    /// back into the disease engine.
    fn evolve_patient(&mut self, id: &str, now: SimTime, dt: f64) {
        let completed: Vec<String> = match self.interventions.get_mut(id) {
            Some(iface) => iface
                .execute_due(now)
                .into_iter()
                .filter(|o| o.status == OrderStatus::Completed)
                .map(|o| o.name)
                .collect(),
            None => Vec::new(),
        };
        let applied: Vec<&str> = completed.iter().map(String::as_str).collect();

        let Some(timeline) = self.timelines.get_mut(id) else {
            return;
        };
        let next = self.evolution.evolve(timeline.latest(), dt, &applied);
        let adverse = next.adverse_events.clone();
        let evolved_diseases = next.disease_states.clone();
        timeline.push(next);

        let gained = self.diseases.sync_patient_diseases(id, evolved_diseases);
        for complication in gained {
            let disease = self
                .diseases
                .patient_complications(id)
                .iter()
                .find(|c| c.name == complication)
                .map(|c| c.disease.clone())
                .unwrap_or_default();
            self.emit(SimulationEvent::complication(now, id, &disease, &complication));
        }
        if !adverse.is_empty() {
            self.emit(SimulationEvent::adverse_events(now, id, adverse));
        }
    }

    fn consider_transfer(&mut self, id: &str, now: SimTime) {
        let sched = &self.config.scheduler;
        let worst = self
            .diseases
            .patient_diseases(id)
            .iter()
            .filter(|d| d.is_active())
            .max_by(|a, b| a.severity.total_cmp(&b.severity))
            .map(|d| (d.disease.clone(), d.severity));
        let Some((disease, severity)) = worst else {
            return;
        };
        if severity <= sched.transfer_severity || self.rng.gen::<f64>() >= sched.transfer_probability {
            return;
        }

        let destination = TransferDestination::ALL
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(TransferDestination::Icu);
        let provider = self.queue.patient(id).and_then(|p| p.assigned_provider.clone());
        if !self.queue.transfer_patient(id, destination, now) {
            return;
        }
        self.discharge(id);
        if let Some(provider) = &provider {
            self.release_provider(provider);
            self.provider_stats(provider).transferred += 1;
        }
        self.emit(SimulationEvent::transfer(now, id, destination, &disease, severity));
    }

    /// A patient that left keeps only its final snapshot. Its orders go
    /// with it.
    fn discharge(&mut self, id: &str) {
        if let Some(timeline) = self.timelines.get_mut(id) {
            let dropped = timeline.compact();
            log::trace!("{id} discharged, {dropped} snapshots released");
        }
        self.interventions.remove(id);
    }

    fn release_provider(&mut self, provider: &str) {
        let known = self.config.scheduler.providers.iter().any(|p| p == provider);
        if known && !self.available_providers.iter().any(|p| p == provider) {
            self.available_providers.push(provider.to_string());
        }
    }

    fn provider_stats(&mut self, provider: &str) -> &mut ProviderStats {
        self.metrics
            .provider_performance
            .entry(provider.to_string())
            .or_default()
    }

    fn update_metrics(&mut self) {
        self.queue.update_metrics(self.current_time);
        let queue = self.queue.metrics();

        self.metrics.total_simulation_hours = self.start_time.map_or(0.0, |start| self.current_time - start);
        self.metrics.total_patients_processed = queue.completed_patients;
        self.metrics.average_patients_per_hour = queue.patients_per_hour;
        self.metrics.average_wait_hours = queue.average_wait_hours;
        self.metrics.average_treatment_hours = queue.average_treatment_hours;
        self.metrics.specialty_distribution = queue.specialty_distribution.clone();
        self.metrics.complexity_distribution = queue.complexity_distribution.clone();

        for callback in &mut self.metrics_callbacks {
            let metrics = &self.metrics;
            isolate("metrics", || callback(metrics));
        }
    }

    /// Record an event and hand it to every event callback.
    fn emit(&mut self, event: SimulationEvent) {
        log::debug!("[t={:.2}h] {}", event.timestamp, event.description);
        for callback in &mut self.event_callbacks {
            isolate("event", || callback(&event));
        }
        self.events.push_back(event);
        self.total_events += 1;
        while self.events.len() > self.config.scheduler.max_events {
            self.events.pop_front();
        }
    }

    fn order_intervention(&mut self, patient_id: &str, request: OrderRequest) -> SimResult<InterventionResponse> {
        let state = self
            .timelines
            .get(patient_id)
            .map(|t| t.latest())
            .ok_or_else(|| SimError::UnknownPatient(patient_id.to_string()))?;
        let iface = self
            .interventions
            .get_mut(patient_id)
            .ok_or_else(|| SimError::UnknownPatient(patient_id.to_string()))?;
        Ok(iface.request_intervention(request, state, self.current_time))
    }

    fn patient_details(&self, patient_id: &str) -> Option<PatientDetails> {
        Some(PatientDetails {
            queue: self.queue.patient_summary(patient_id)?,
            diseases: self.diseases.patient_disease_summary(patient_id),
            state: self.timelines.get(patient_id).map(|t| patient_summary(t.latest())),
            orders: self.interventions.get(patient_id).map(|i| i.orders_summary()),
        })
    }
}

/// Run an observer, logging and swallowing any error or panic.
fn isolate(kind: &str, callback: impl FnOnce() -> Result<(), CallbackError>) {
    match panic::catch_unwind(AssertUnwindSafe(callback)) {
        Ok(Ok(())) => {}
        Ok(Err(e)) => log::warn!("{kind} callback error: {e}"),
        Err(_) => log::warn!("{kind} callback panicked"),
    }
}

fn lock(core: &Mutex<SimulationCore>) -> MutexGuard<'_, SimulationCore> {
    core.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Handle to a simulation and its loop thread
pub struct ContinuousSimulationEngine {
    core: Arc<Mutex<SimulationCore>>,
    control: Arc<SimulationControl>,
    handle: Option<JoinHandle<()>>,
    sleep: Duration,
    stop_timeout: Duration,
}

impl ContinuousSimulationEngine {
    /// Build an engine from a validated configuration.
    pub fn new(config: SimulationConfig) -> SimResult<Self> {
        let errors = config::validate_config(&config);
        if !errors.is_empty() {
            for e in &errors {
                log::warn!("Invalid configuration: {e}");
            }
            return Err(SimError::InvalidConfig(errors));
        }
        let sched = &config.scheduler;
        let control = SimulationControl::new(sched.time_acceleration, sched.arrival_rate_per_hour);
        let sleep = Duration::from_millis(sched.sleep_ms);
        let stop_timeout = Duration::from_millis(sched.stop_timeout_ms);
        Ok(Self {
            core: Arc::new(Mutex::new(SimulationCore::new(config))),
            control: Arc::new(control),
            handle: None,
            sleep,
            stop_timeout,
        })
    }

    pub fn state(&self) -> SimulationState {
        self.control.state()
    }

    /// Start the loop thread. Runs for `duration_hours` of simulated time,
    /// or the configured maximum.
    pub fn start(&mut self, duration_hours: Option<f64>) -> SimResult<()> {
        match self.control.state() {
            SimulationState::Running | SimulationState::Paused => return Err(SimError::AlreadyRunning),
            SimulationState::Stopped => return Err(SimError::Stopped),
            SimulationState::Idle => {}
        }

        let end = {
            let mut core = lock(&self.core);
            let duration = duration_hours
                .filter(|h| *h > 0.0)
                .unwrap_or(core.config.scheduler.max_duration_hours);
            let start = core.current_time;
            core.start_time.get_or_insert(start);
            core.end_time = None;
            start + duration
        };

        self.control.set_state(SimulationState::Running);
        let core = Arc::clone(&self.core);
        let control = Arc::clone(&self.control);
        let sleep = self.sleep;
        self.handle = Some(thread::spawn(move || run_loop(&core, &control, end, sleep)));
        log::info!("Simulation started, running until t={end:.2}h");
        Ok(())
    }

    pub fn pause(&self) -> bool {
        let paused = self.control.transition(SimulationState::Running, SimulationState::Paused);
        if paused {
            log::info!("Simulation paused");
        }
        paused
    }

    pub fn resume(&self) -> bool {
        let resumed = self.control.transition(SimulationState::Paused, SimulationState::Running);
        if resumed {
            log::info!("Simulation resumed");
        }
        resumed
    }

    /// Stop the loop and wait for it up to the configured timeout. A loop
    /// that does not finish in time is detached.
    pub fn stop(&mut self) {
        self.control.stop_requested.store(true, Ordering::SeqCst);
        self.control.set_state(SimulationState::Stopped);

        if let Some(handle) = self.handle.take() {
            let deadline = Instant::now() + self.stop_timeout;
            while !handle.is_finished() && Instant::now() < deadline {
                thread::sleep(Duration::from_millis(5));
            }
            if handle.is_finished() {
                if handle.join().is_err() {
                    log::warn!("Simulation loop panicked");
                }
            } else {
                log::warn!("Simulation loop did not stop within {:?}; detaching", self.stop_timeout);
            }
        }

        let mut core = lock(&self.core);
        if core.end_time.is_none() {
            core.end_time = Some(core.current_time);
        }
        log::info!("Simulation stopped at t={:.2}h", core.current_time);
    }

    /// Run one tick on the calling thread. Only legal while no loop is
    /// running.
    pub fn step(&mut self) -> SimResult<()> {
        match self.control.state() {
            SimulationState::Running | SimulationState::Paused => Err(SimError::AlreadyRunning),
            SimulationState::Stopped => Err(SimError::Stopped),
            SimulationState::Idle => {
                let mut core = lock(&self.core);
                let now = core.current_time;
                core.start_time.get_or_insert(now);
                core.apply_control(&self.control);
                core.tick();
                Ok(())
            }
        }
    }

    /// Clamped to 0.1–10. Takes effect on the next tick. Returns the value
    /// stored.
    pub fn set_time_acceleration(&self, acceleration: f64) -> f64 {
        let value = config::clamp_time_acceleration(acceleration);
        self.control
            .time_acceleration
            .store(value.to_bits(), Ordering::SeqCst);
        value
    }

    /// Clamped to 0.1–10 per hour. Takes effect on the next tick. Returns
    /// the value stored.
    pub fn set_arrival_rate(&self, rate_per_hour: f64) -> f64 {
        let value = config::clamp_arrival_rate(rate_per_hour);
        self.control.arrival_rate.store(value.to_bits(), Ordering::SeqCst);
        value
    }

    pub fn add_event_callback(&self, callback: EventCallback) {
        lock(&self.core).event_callbacks.push(callback);
    }

    pub fn add_metrics_callback(&self, callback: MetricsCallback) {
        lock(&self.core).metrics_callbacks.push(callback);
    }

    pub fn current_time(&self) -> SimTime {
        lock(&self.core).current_time
    }

    pub fn simulation_status(&self) -> SimulationStatus {
        let core = lock(&self.core);
        SimulationStatus {
            state: self.control.state(),
            current_time: core.current_time,
            start_time: core.start_time,
            end_time: core.end_time,
            total_events: core.total_events,
            time_acceleration: self.control.time_acceleration(),
            arrival_rate_per_hour: self.control.arrival_rate(),
            available_providers: core.available_providers.clone(),
            queue: core.queue.queue_status(core.current_time),
            metrics: core.metrics.clone(),
        }
    }

    /// The last `count` events, oldest first.
    pub fn recent_events(&self, count: usize) -> Vec<SimulationEvent> {
        let core = lock(&self.core);
        let skip = core.events.len().saturating_sub(count);
        core.events.iter().skip(skip).cloned().collect()
    }

    pub fn metrics(&self) -> SimulationMetrics {
        lock(&self.core).metrics.clone()
    }

    pub fn patient_details(&self, patient_id: &str) -> Option<PatientDetails> {
        lock(&self.core).patient_details(patient_id)
    }

    /// Latest physiology snapshot of a patient that has been active.
    pub fn patient_state(&self, patient_id: &str) -> Option<PatientState> {
        lock(&self.core)
            .timelines
            .get(patient_id)
            .map(|t| t.latest().clone())
    }

    pub fn timeline_len(&self, patient_id: &str) -> usize {
        lock(&self.core).timelines.get(patient_id).map_or(0, PatientTimeline::len)
    }

    /// Snapshots held across every timeline.
    pub fn retained_snapshots(&self) -> usize {
        lock(&self.core).timelines.values().map(PatientTimeline::len).sum()
    }

    /// Order an intervention for an active patient, judged against the
    /// patient's latest snapshot.
    pub fn order_intervention(&self, patient_id: &str, request: OrderRequest) -> SimResult<InterventionResponse> {
        let mut core = lock(&self.core);
        let active = core.queue.active_patients().iter().any(|p| p == patient_id);
        if !active {
            return Err(SimError::UnknownPatient(patient_id.to_string()));
        }
        core.order_intervention(patient_id, request)
    }

    pub fn active_patients(&self) -> Vec<String> {
        lock(&self.core).queue.active_patients().to_vec()
    }

    pub fn waiting_patients(&self) -> Vec<String> {
        lock(&self.core).queue.waiting_patients().to_vec()
    }

    /// Completed and transferred patients, in discharge order per list.
    pub fn discharged_patients(&self) -> Vec<String> {
        let core = lock(&self.core);
        core.queue
            .completed_patients()
            .iter()
            .chain(core.queue.transferred_patients())
            .cloned()
            .collect()
    }

    pub fn max_simultaneous_patients(&self) -> usize {
        lock(&self.core).queue.max_simultaneous_patients()
    }
}

impl Drop for ContinuousSimulationEngine {
    fn drop(&mut self) {
        self.control.stop_requested.store(true, Ordering::SeqCst);
    }
}

fn run_loop(core: &Mutex<SimulationCore>, control: &SimulationControl, end: SimTime, sleep: Duration) {
    loop {
        if control.stop_requested() {
            break;
        }
        match control.state() {
            SimulationState::Running => {}
            SimulationState::Paused | SimulationState::Idle => {
                thread::sleep(sleep);
                continue;
            }
            SimulationState::Stopped => break,
        }
        {
            let mut core = lock(core);
            if control.state() != SimulationState::Running {
                continue;
            }
            if core.current_time >= end {
                break;
            }
            core.apply_control(control);
            core.tick();
        }
        thread::sleep(sleep);
    }

    let mut core = lock(core);
    core.end_time = Some(core.current_time);
    control.set_state(SimulationState::Stopped);
    log::info!("Simulation loop finished at t={:.2}h", core.current_time);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn config(seed: u64) -> SimulationConfig {
        let mut config = SimulationConfig {
            seed: Some(seed),
            ..SimulationConfig::default()
        };
        config.scheduler.sleep_ms = 1;
        config
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut bad = config(1);
        bad.queue.max_simultaneous_patients = 0;
        match ContinuousSimulationEngine::new(bad) {
            Err(SimError::InvalidConfig(errors)) => assert_eq!(errors.len(), 1),
            _ => panic!("expected InvalidConfig"),
        }
    }

    #[test]
    fn test_step_advances_time() {
        let mut engine = ContinuousSimulationEngine::new(config(2)).unwrap();
        engine.step().unwrap();
        engine.step().unwrap();
        let expected = 2.0 * 30.0 / 3600.0;
        assert!((engine.current_time() - expected).abs() < 1e-9);
        assert_eq!(engine.state(), SimulationState::Idle);
    }

    #[test]
    fn test_capacity_never_exceeded() {
        let mut cfg = config(3);
        cfg.scheduler.arrival_rate_per_hour = 10.0;
        cfg.scheduler.time_acceleration = 10.0;
        cfg.scheduler.gate_arrivals_on_capacity = false;
        let mut engine = ContinuousSimulationEngine::new(cfg).unwrap();
        for _ in 0..400 {
            engine.step().unwrap();
            assert!(engine.active_patients().len() <= engine.max_simultaneous_patients());
        }
        let status = engine.simulation_status();
        assert!(status.total_events > 0);
        assert_eq!(status.available_providers.len() + status.queue.active_count, 4);
    }

    #[test]
    fn test_set_rates_clamped() {
        let mut engine = ContinuousSimulationEngine::new(config(4)).unwrap();
        assert_eq!(engine.set_time_acceleration(50.0), 10.0);
        assert_eq!(engine.set_arrival_rate(0.0), 0.1);
        engine.step().unwrap();
        let expected = 30.0 * 10.0 / 3600.0;
        assert!((engine.current_time() - expected).abs() < 1e-9);
        assert_eq!(engine.simulation_status().arrival_rate_per_hour, 0.1);
    }

    #[test]
    fn test_failing_callbacks_do_not_stop_the_loop() {
        let mut cfg = config(5);
        cfg.scheduler.arrival_rate_per_hour = 10.0;
        cfg.scheduler.time_acceleration = 10.0;
        let mut engine = ContinuousSimulationEngine::new(cfg).unwrap();
        let seen = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&seen);
        engine.add_event_callback(Box::new(|_: &SimulationEvent| -> Result<(), CallbackError> {
            Err(CallbackError::new("display closed"))
        }));
        engine.add_event_callback(Box::new(|_: &SimulationEvent| -> Result<(), CallbackError> {
            panic!("observer bug")
        }));
        engine.add_metrics_callback(Box::new(|_: &SimulationMetrics| -> Result<(), CallbackError> {
            Err(CallbackError::new("chart closed"))
        }));
        engine.add_event_callback(Box::new(move |_: &SimulationEvent| -> Result<(), CallbackError> {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }));
        for _ in 0..200 {
            engine.step().unwrap();
        }
        assert!(seen.load(Ordering::SeqCst) > 0);
    }

    #[test]
    fn test_lifecycle() {
        let mut engine = ContinuousSimulationEngine::new(config(6)).unwrap();
        assert!(!engine.pause());
        engine.start(Some(1000.0)).unwrap();
        assert_eq!(engine.start(None), Err(SimError::AlreadyRunning));
        assert_eq!(engine.step(), Err(SimError::AlreadyRunning));
        assert!(engine.pause());
        assert_eq!(engine.state(), SimulationState::Paused);
        assert!(engine.resume());
        engine.stop();
        assert_eq!(engine.state(), SimulationState::Stopped);
        assert_eq!(engine.start(None), Err(SimError::Stopped));
        assert!(engine.simulation_status().end_time.is_some());
    }

    #[test]
    fn test_loop_ends_at_duration() {
        let mut cfg = config(7);
        cfg.scheduler.sleep_ms = 0;
        let mut engine = ContinuousSimulationEngine::new(cfg).unwrap();
        engine.start(Some(0.05)).unwrap();
        let deadline = Instant::now() + Duration::from_secs(10);
        while engine.state() != SimulationState::Stopped && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(engine.state(), SimulationState::Stopped);
        assert!(engine.current_time() >= 0.05);
        engine.stop();
    }

    #[test]
    fn test_discharged_patients_release_history() {
        let mut cfg = config(9);
        cfg.scheduler.arrival_rate_per_hour = 10.0;
        cfg.scheduler.time_acceleration = 10.0;
        let mut engine = ContinuousSimulationEngine::new(cfg).unwrap();
        for _ in 0..1500 {
            engine.step().unwrap();
        }
        let discharged = engine.discharged_patients();
        assert!(!discharged.is_empty());
        for id in &discharged {
            assert_eq!(engine.timeline_len(id), 1, "{id} kept its history");
            assert!(engine.patient_state(id).is_some());
            assert!(engine.patient_details(id).unwrap().orders.is_none());
        }
        let active: usize = engine
            .active_patients()
            .iter()
            .map(|id| engine.timeline_len(id))
            .sum();
        assert_eq!(engine.retained_snapshots(), active + discharged.len());
    }

    #[test]
    fn test_order_requires_active_patient() {
        let engine = ContinuousSimulationEngine::new(config(8)).unwrap();
        let err = engine
            .order_intervention("P001", OrderRequest::new("cbc"))
            .unwrap_err();
        assert_eq!(err, SimError::UnknownPatient("P001".into()));
    }
}
