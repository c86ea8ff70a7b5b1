//! Intervention orders and their lifecycle
//!
//! Orders move one way: pending or scheduled, then executing, then
//! completed or failed. Cancellation is the only other edge and is allowed
//! from pending or scheduled.

use crate::error::{SimError, SimResult};
use medsim_logic::adverse::{self, AdverseEventType};
use medsim_logic::interventions::{self as catalog, InterventionDefinition, InterventionType, OrderPriority};
use medsim_logic::organs::OrganSystem;
use medsim_logic::SimTime;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Orders listed in an orders summary.
const RECENT_ORDERS: usize = 10;

const IMAGING_IMPRESSION: &str = "clinical correlation recommended";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Scheduled,
    Executing,
    Completed,
    Failed,
    Cancelled,
}

impl OrderStatus {
    pub fn name(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Scheduled => "scheduled",
            OrderStatus::Executing => "executing",
            OrderStatus::Completed => "completed",
            OrderStatus::Failed => "failed",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Waiting to execute; the only states that can be cancelled.
    pub fn is_open(self) -> bool {
        matches!(self, OrderStatus::Pending | OrderStatus::Scheduled)
    }

    pub fn is_active(self) -> bool {
        self.is_open() || self == OrderStatus::Executing
    }
}

/// One measured analyte
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabValue {
    pub analyte: String,
    pub value: f64,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabResult {
    Panel { values: Vec<LabValue> },
    Culture { growth: bool, organism: Option<String> },
}

impl LabResult {
    pub fn value(&self, analyte: &str) -> Option<f64> {
        match self {
            LabResult::Panel { values } => values.iter().find(|v| v.analyte == analyte).map(|v| v.value),
            LabResult::Culture { .. } => None,
        }
    }
}

/// Simulated outcome attached to a finished order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterventionResult {
    Laboratory(LabResult),
    Imaging {
        findings: String,
        impression: String,
        ejection_fraction: Option<f64>,
    },
    Medication {
        route: String,
        dose: String,
    },
    Procedure {
        duration_minutes: u32,
        technique: String,
    },
    /// Supportive, monitoring and emergency interventions.
    Started,
    Failed {
        reason: String,
    },
}

/// A request to order an intervention. Built with the `with_*` methods:
///
/// ```
/// use medsim_core::interventions::OrderRequest;
/// use medsim_logic::interventions::OrderPriority;
///
/// let request = OrderRequest::new("vasopressor")
///     .with_priority(OrderPriority::Urgent)
///     .with_parameter("dose", "0.1 mcg/kg/min");
/// assert_eq!(request.delay_minutes, 0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub name: String,
    pub parameters: BTreeMap<String, String>,
    pub delay_minutes: u32,
    pub priority: OrderPriority,
    pub provider: Option<String>,
    pub notes: Option<String>,
}

impl OrderRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: BTreeMap::new(),
            delay_minutes: 0,
            priority: OrderPriority::default(),
            provider: None,
            notes: None,
        }
    }

    pub fn with_priority(mut self, priority: OrderPriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_delay(mut self, minutes: u32) -> Self {
        self.delay_minutes = minutes;
        self
    }

    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterventionOrder {
    pub id: String,
    pub name: String,
    pub kind: InterventionType,
    pub target_organs: Vec<OrganSystem>,
    /// Definition defaults overlaid with the caller's parameters
    pub parameters: BTreeMap<String, String>,
    pub ordered_time: SimTime,
    pub scheduled_time: SimTime,
    pub executed_time: Option<SimTime>,
    pub completed_time: Option<SimTime>,
    pub status: OrderStatus,
    pub result: Option<InterventionResult>,
    pub adverse_events: Vec<AdverseEventType>,
    pub notes: Vec<String>,
    pub provider: Option<String>,
    pub priority: OrderPriority,
}

impl InterventionOrder {
    pub fn is_due(&self, now: SimTime) -> bool {
        self.status.is_open() && self.scheduled_time <= now
    }

    pub fn targets(&self, organ: OrganSystem) -> bool {
        self.target_organs.contains(&organ)
    }

    fn parameter(&self, key: &str) -> Option<&str> {
        self.parameters.get(key).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBrief {
    pub id: String,
    pub name: String,
    pub status: OrderStatus,
    pub priority: OrderPriority,
    pub ordered_time: SimTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrdersSummary {
    pub total: usize,
    pub by_status: BTreeMap<String, usize>,
    pub by_type: BTreeMap<InterventionType, usize>,
    pub by_priority: BTreeMap<OrderPriority, usize>,
    pub adverse_events: BTreeMap<AdverseEventType, usize>,
    /// Most recent first
    pub recent: Vec<OrderBrief>,
}

/// Orders for one patient
pub struct InterventionManager {
    rng: StdRng,
    orders: Vec<InterventionOrder>,
    next_id: u32,
}

impl InterventionManager {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng,
            orders: Vec::new(),
            next_id: 1,
        }
    }

    /// Place an order at `now`. Delayed orders start out scheduled.
    pub fn order_intervention(&mut self, request: OrderRequest, now: SimTime) -> SimResult<InterventionOrder> {
        let def = catalog::definition(&request.name)
            .ok_or_else(|| SimError::UnknownIntervention(request.name.clone()))?;

        let mut parameters: BTreeMap<String, String> = def
            .parameters
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        parameters.extend(request.parameters);

        let status = if request.delay_minutes > 0 {
            OrderStatus::Scheduled
        } else {
            OrderStatus::Pending
        };
        let order = InterventionOrder {
            id: format!("ORD{:04}", self.next_id),
            name: def.name.to_string(),
            kind: def.kind,
            target_organs: def.target_organs.to_vec(),
            parameters,
            ordered_time: now,
            scheduled_time: now + f64::from(request.delay_minutes) / 60.0,
            executed_time: None,
            completed_time: None,
            status,
            result: None,
            adverse_events: Vec::new(),
            notes: request.notes.into_iter().collect(),
            provider: request.provider,
            priority: request.priority,
        };
        self.next_id += 1;

        log::debug!("Ordered {} ({}) for t={:.2}h", order.id, order.name, order.scheduled_time);
        self.orders.push(order.clone());
        Ok(order)
    }

    /// Execute every open order whose scheduled time has passed. Returns
    /// the orders executed, each completed or failed.
    pub fn execute_due_interventions(&mut self, now: SimTime) -> Vec<InterventionOrder> {
        let mut updated = self.orders.clone();
        let mut executed = Vec::new();
        for order in updated.iter_mut().filter(|o| o.is_due(now)) {
            // Orders only enter the catalog-backed list through order_intervention.
            let Some(def) = catalog::definition(&order.name) else {
                continue;
            };
            execute_order(order, def, now, &mut self.rng);
            executed.push(order.clone());
        }
        self.orders = updated;
        executed
    }

    /// Cancel an open order. Any other state is left untouched.
    pub fn cancel_order(&mut self, order_id: &str) -> bool {
        match self.orders.iter_mut().find(|o| o.id == order_id) {
            Some(order) if order.status.is_open() => {
                order.status = OrderStatus::Cancelled;
                log::debug!("Cancelled {order_id}");
                true
            }
            _ => false,
        }
    }

    pub fn order(&self, order_id: &str) -> Option<&InterventionOrder> {
        self.orders.iter().find(|o| o.id == order_id)
    }

    pub fn all_orders(&self) -> &[InterventionOrder] {
        &self.orders
    }

    pub fn active_orders(&self) -> Vec<&InterventionOrder> {
        self.orders.iter().filter(|o| o.status.is_active()).collect()
    }

    pub fn completed_orders(&self) -> Vec<&InterventionOrder> {
        self.with_status(OrderStatus::Completed)
    }

    pub fn failed_orders(&self) -> Vec<&InterventionOrder> {
        self.with_status(OrderStatus::Failed)
    }

    fn with_status(&self, status: OrderStatus) -> Vec<&InterventionOrder> {
        self.orders.iter().filter(|o| o.status == status).collect()
    }

    pub fn orders_by_organ(&self, organ: OrganSystem) -> Vec<&InterventionOrder> {
        self.orders.iter().filter(|o| o.targets(organ)).collect()
    }

    pub fn orders_by_type(&self, kind: InterventionType) -> Vec<&InterventionOrder> {
        self.orders.iter().filter(|o| o.kind == kind).collect()
    }

    pub fn orders_by_priority(&self, priority: OrderPriority) -> Vec<&InterventionOrder> {
        self.orders.iter().filter(|o| o.priority == priority).collect()
    }

    /// Count of each adverse event kind across all orders.
    pub fn adverse_events_summary(&self) -> BTreeMap<AdverseEventType, usize> {
        let mut counts = BTreeMap::new();
        for event in self.orders.iter().flat_map(|o| &o.adverse_events) {
            *counts.entry(*event).or_insert(0) += 1;
        }
        counts
    }

    pub fn orders_summary(&self) -> OrdersSummary {
        let mut by_status = BTreeMap::new();
        let mut by_type = BTreeMap::new();
        let mut by_priority = BTreeMap::new();
        for order in &self.orders {
            *by_status.entry(order.status.name().to_string()).or_insert(0) += 1;
            *by_type.entry(order.kind).or_insert(0) += 1;
            *by_priority.entry(order.priority).or_insert(0) += 1;
        }

        // Later ids were ordered later, so they win ties.
        let mut recent: Vec<&InterventionOrder> = self.orders.iter().collect();
        recent.sort_by(|a, b| b.ordered_time.total_cmp(&a.ordered_time).then_with(|| b.id.cmp(&a.id)));
        let recent = recent
            .into_iter()
            .take(RECENT_ORDERS)
            .map(|o| OrderBrief {
                id: o.id.clone(),
                name: o.name.clone(),
                status: o.status,
                priority: o.priority,
                ordered_time: o.ordered_time,
            })
            .collect();

        OrdersSummary {
            total: self.orders.len(),
            by_status,
            by_type,
            by_priority,
            adverse_events: self.adverse_events_summary(),
            recent,
        }
    }

    /// Catalog names, optionally limited to one organ system.
    pub fn available_interventions(organ: Option<OrganSystem>) -> Vec<&'static str> {
        catalog::catalog()
            .iter()
            .filter(|d| organ.map_or(true, |o| d.targets(o)))
            .map(|d| d.name)
            .collect()
    }

    pub fn intervention_info(name: &str) -> Option<&'static InterventionDefinition> {
        catalog::definition(name)
    }
}

impl Default for InterventionManager {
    fn default() -> Self {
        Self::new(None)
    }
}

fn execute_order(order: &mut InterventionOrder, def: &InterventionDefinition, now: SimTime, rng: &mut StdRng) {
    order.status = OrderStatus::Executing;
    order.executed_time = Some(now);

    if rng.gen::<f64>() < def.success_rate_for(order.priority) {
        order.result = Some(simulate_result(order, def, rng));
        order.status = OrderStatus::Completed;
        order.completed_time = Some(now + f64::from(def.duration_minutes) / 60.0);
    } else {
        order.result = Some(InterventionResult::Failed {
            reason: "execution_failed".into(),
        });
        order.status = OrderStatus::Failed;
    }

    order.adverse_events =
        adverse::sample_order_adverse_events(&order.name, &order.target_organs, def.adverse_event_risk, rng);

    log::debug!(
        "Executed {} ({}): {}, {} adverse event(s)",
        order.id,
        order.name,
        order.status.name(),
        order.adverse_events.len()
    );
}

fn simulate_result(order: &InterventionOrder, def: &InterventionDefinition, rng: &mut impl Rng) -> InterventionResult {
    match def.kind {
        InterventionType::Laboratory => InterventionResult::Laboratory(lab_result(&order.name, rng)),
        InterventionType::Imaging => imaging_result(&order.name, rng),
        InterventionType::Medication => InterventionResult::Medication {
            route: order.parameter("route").unwrap_or("iv").to_string(),
            dose: order.parameter("dose").unwrap_or("standard").to_string(),
        },
        InterventionType::Procedure => InterventionResult::Procedure {
            duration_minutes: def.duration_minutes,
            technique: order.parameter("technique").unwrap_or("standard").to_string(),
        },
        InterventionType::Supportive | InterventionType::Monitoring | InterventionType::Emergency => {
            InterventionResult::Started
        }
    }
}

// ── Simulated results ──

type Analyte = (&'static str, f64, f64, &'static str);

fn lab_panel(name: &str) -> &'static [Analyte] {
    match name {
        "cbc" => &[
            ("wbc", 4.0, 12.0, "k/ul"),
            ("hgb", 12.0, 16.0, "g/dl"),
            ("plt", 150.0, 450.0, "k/ul"),
        ],
        "chemistry" => &[
            ("na", 135.0, 145.0, "meq/l"),
            ("k", 3.5, 5.0, "meq/l"),
            ("cl", 95.0, 105.0, "meq/l"),
            ("co2", 22.0, 28.0, "meq/l"),
            ("bun", 7.0, 20.0, "mg/dl"),
            ("creatinine", 0.6, 1.2, "mg/dl"),
        ],
        "troponin" => &[("troponin_i", 0.0, 0.04, "ng/ml")],
        "arterial_blood_gas" => &[
            ("ph", 7.35, 7.45, ""),
            ("pco2", 35.0, 45.0, "mmhg"),
            ("po2", 80.0, 100.0, "mmhg"),
            ("hco3", 22.0, 28.0, "meq/l"),
        ],
        "coagulation_studies" => &[
            ("pt", 11.0, 13.0, "s"),
            ("ptt", 25.0, 35.0, "s"),
            ("inr", 0.9, 1.1, ""),
        ],
        "lactate" => &[("lactate", 0.5, 2.2, "mmol/l")],
        "liver_function_tests" => &[
            ("alt", 7.0, 56.0, "u/l"),
            ("ast", 10.0, 40.0, "u/l"),
            ("bilirubin", 0.1, 1.2, "mg/dl"),
        ],
        "urinalysis" => &[("specific_gravity", 1.005, 1.030, ""), ("ph", 4.5, 8.0, "")],
        _ => &[],
    }
}

const CULTURE_ORGANISMS: [&str; 3] = ["staph_aureus", "e_coli", "pseudomonas"];

fn lab_result(name: &str, rng: &mut impl Rng) -> LabResult {
    if name == "blood_culture" {
        let growth = rng.gen::<f64>() <= 0.3;
        let organism = if growth && rng.gen::<f64>() < 0.3 {
            CULTURE_ORGANISMS.choose(rng).map(|o| o.to_string())
        } else {
            None
        };
        return LabResult::Culture { growth, organism };
    }
    let values = lab_panel(name)
        .iter()
        .map(|&(analyte, lo, hi, unit)| LabValue {
            analyte: analyte.to_string(),
            value: rng.gen_range(lo..=hi),
            unit: unit.to_string(),
        })
        .collect();
    LabResult::Panel { values }
}

fn imaging_findings(name: &str) -> &'static [&'static str] {
    match name {
        "chest_xray" => &["normal", "pneumonia", "pulmonary_edema", "pneumothorax", "effusion"],
        "ct_chest" => &["normal", "pneumonia", "pulmonary_embolism", "mass", "effusion"],
        "ct_head" => &["normal", "hemorrhage", "infarct", "mass", "edema"],
        "echocardiogram" => &["normal", "systolic_dysfunction", "valvular_disease", "pericardial_effusion"],
        "mri_brain" => &["normal", "stroke", "tumor", "demyelination", "hemorrhage"],
        "ultrasound_abdomen" => &["normal", "ascites", "gallstones", "mass", "free_fluid"],
        "ct_abdomen" => &["normal", "appendicitis", "obstruction", "mass", "free_fluid"],
        _ => &["normal"],
    }
}

fn imaging_result(name: &str, rng: &mut impl Rng) -> InterventionResult {
    let findings = imaging_findings(name).choose(rng).copied().unwrap_or("normal");
    let ejection_fraction = (name == "echocardiogram").then(|| rng.gen_range(50.0..=70.0));
    InterventionResult::Imaging {
        findings: findings.to_string(),
        impression: IMAGING_IMPRESSION.to_string(),
        ejection_fraction,
    }
}
