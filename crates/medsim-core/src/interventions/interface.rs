//! Validation and recommendation layer over [`InterventionManager`]
//!
//! Every check reads the patient snapshot passed to the call, so a request
//! is always judged against the state the caller is looking at.

use super::manager::{InterventionManager, InterventionOrder, OrderRequest, OrdersSummary};
use crate::evolution::PatientState;
use medsim_logic::adverse::AdverseEventType;
use medsim_logic::interventions::{InterventionDefinition, InterventionType, OrderPriority};
use medsim_logic::organs::OrganSystem;
use medsim_logic::SimTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Below this an organ blocks interventions that target it.
const CONTRAINDICATION_SCORE: f64 = 0.3;
/// Below this an organ raises a warning.
const WARNING_SCORE: f64 = 0.6;
/// Below this an organ gets treatment recommendations.
const RECOMMENDATION_SCORE: f64 = 0.7;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterventionResponse {
    pub success: bool,
    pub order: Option<InterventionOrder>,
    pub message: String,
    pub warnings: Vec<String>,
    pub contraindications: Vec<String>,
}

impl InterventionResponse {
    fn rejected(message: impl Into<String>, contraindications: Vec<String>) -> Self {
        Self {
            success: false,
            order: None,
            message: message.into(),
            warnings: Vec::new(),
            contraindications,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationSeverity {
    Moderate,
    Severe,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub intervention: String,
    pub reason: String,
    pub severity: RecommendationSeverity,
    pub priority: OrderPriority,
}

impl Recommendation {
    fn new(intervention: &str, reason: impl Into<String>, severe: bool, priority: OrderPriority) -> Self {
        Self {
            intervention: intervention.to_string(),
            reason: reason.into(),
            severity: if severe {
                RecommendationSeverity::Severe
            } else {
                RecommendationSeverity::Moderate
            },
            priority,
        }
    }
}

/// Outcome statistics for one intervention name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InterventionStats {
    pub total_orders: usize,
    pub successful_orders: usize,
    pub failed_orders: usize,
    pub adverse_events: usize,
    pub avg_duration_minutes: f64,
    pub success_rate: f64,
    pub adverse_event_rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EffectivenessReport {
    pub by_intervention: BTreeMap<String, InterventionStats>,
    pub by_type: BTreeMap<InterventionType, usize>,
    pub success_rate: f64,
    pub adverse_event_rate: f64,
}

pub struct InterventionInterface {
    manager: InterventionManager,
}

impl InterventionInterface {
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            manager: InterventionManager::new(seed),
        }
    }

    pub fn manager(&self) -> &InterventionManager {
        &self.manager
    }

    /// Validate a request against `state` and place the order if nothing
    /// contraindicates it. Warnings never block.
    pub fn request_intervention(
        &mut self,
        request: OrderRequest,
        state: &PatientState,
        now: SimTime,
    ) -> InterventionResponse {
        let Some(def) = InterventionManager::intervention_info(&request.name) else {
            return InterventionResponse::rejected(format!("unknown intervention: {}", request.name), Vec::new());
        };

        let contraindications = contraindications(def, state);
        if !contraindications.is_empty() {
            log::debug!("Blocked {}: {}", def.name, contraindications.join(", "));
            return InterventionResponse::rejected("contraindications detected", contraindications);
        }
        let warnings = warnings(def, state);

        match self.manager.order_intervention(request, now) {
            Ok(order) => InterventionResponse {
                success: true,
                order: Some(order),
                message: "intervention ordered successfully".into(),
                warnings,
                contraindications: Vec::new(),
            },
            Err(e) => InterventionResponse::rejected(format!("failed to order intervention: {e}"), Vec::new()),
        }
    }

    pub fn execute_due(&mut self, now: SimTime) -> Vec<InterventionOrder> {
        self.manager.execute_due_interventions(now)
    }

    pub fn cancel(&mut self, order_id: &str) -> bool {
        self.manager.cancel_order(order_id)
    }

    pub fn available_interventions(&self, organ: Option<OrganSystem>) -> Vec<&'static str> {
        InterventionManager::available_interventions(organ)
    }

    pub fn active_orders(&self) -> Vec<&InterventionOrder> {
        self.manager.active_orders()
    }

    pub fn completed_orders(&self) -> Vec<&InterventionOrder> {
        self.manager.completed_orders()
    }

    pub fn failed_orders(&self) -> Vec<&InterventionOrder> {
        self.manager.failed_orders()
    }

    pub fn orders_by_organ(&self, organ: OrganSystem) -> Vec<&InterventionOrder> {
        self.manager.orders_by_organ(organ)
    }

    pub fn orders_by_type(&self, kind: InterventionType) -> Vec<&InterventionOrder> {
        self.manager.orders_by_type(kind)
    }

    pub fn orders_by_priority(&self, priority: OrderPriority) -> Vec<&InterventionOrder> {
        self.manager.orders_by_priority(priority)
    }

    pub fn adverse_events_summary(&self) -> BTreeMap<AdverseEventType, usize> {
        self.manager.adverse_events_summary()
    }

    pub fn orders_summary(&self) -> OrdersSummary {
        self.manager.orders_summary()
    }

    /// Interventions suggested by the patient's organs, vitals and symptoms.
    /// Each name appears once at the highest priority suggested for it.
    pub fn recommendations(&self, state: &PatientState) -> Vec<Recommendation> {
        recommendations(state)
    }

    /// Success and adverse event rates over every executed order.
    pub fn effectiveness_report(&self) -> EffectivenessReport {
        let mut report = EffectivenessReport::default();
        let mut executed = 0usize;
        let mut successes = 0usize;
        let mut adverse = 0usize;

        let finished = self
            .manager
            .all_orders()
            .iter()
            .filter(|o| o.executed_time.is_some());
        for order in finished {
            let stats = report.by_intervention.entry(order.name.clone()).or_default();
            stats.total_orders += 1;
            if order.completed_time.is_some() {
                stats.successful_orders += 1;
            } else {
                stats.failed_orders += 1;
            }
            stats.adverse_events += order.adverse_events.len();
            if let (Some(start), Some(end)) = (order.executed_time, order.completed_time) {
                let minutes = (end - start) * 60.0;
                let n = stats.successful_orders as f64;
                stats.avg_duration_minutes += (minutes - stats.avg_duration_minutes) / n;
            }
            *report.by_type.entry(order.kind).or_insert(0) += 1;

            executed += 1;
            successes += usize::from(order.completed_time.is_some());
            adverse += order.adverse_events.len();
        }

        for stats in report.by_intervention.values_mut() {
            let n = stats.total_orders as f64;
            stats.success_rate = stats.successful_orders as f64 / n;
            stats.adverse_event_rate = stats.adverse_events as f64 / n;
        }
        if executed > 0 {
            report.success_rate = successes as f64 / executed as f64;
            report.adverse_event_rate = adverse as f64 / executed as f64;
        }
        report
    }
}

impl Default for InterventionInterface {
    fn default() -> Self {
        Self::new(None)
    }
}

fn contraindications(def: &InterventionDefinition, state: &PatientState) -> Vec<String> {
    let mut found: Vec<String> = def
        .target_organs
        .iter()
        .filter(|o| state.score(**o) < CONTRAINDICATION_SCORE)
        .map(|o| format!("severe_{}_dysfunction", o.name()))
        .collect();

    let vitals = &state.vitals;
    let listed = |name: &str| def.contraindications.contains(&name);
    if listed("arrhythmia") && vitals.heart_rate > 150.0 {
        found.push("tachyarrhythmia".into());
    }
    if listed("respiratory_failure") && vitals.oxygen_saturation < 85.0 {
        found.push("respiratory_failure".into());
    }
    if listed("shock") && vitals.bp_systolic < 80.0 {
        found.push("shock".into());
    }
    found
}

fn warnings(def: &InterventionDefinition, state: &PatientState) -> Vec<String> {
    let mut found: Vec<String> = def
        .target_organs
        .iter()
        .filter(|o| state.score(**o) < WARNING_SCORE)
        .map(|o| format!("moderate_{}_dysfunction", o.name()))
        .collect();
    if !state.adverse_events.is_empty() {
        found.push("patient_has_existing_adverse_events".into());
    }
    found
}

fn recommendations(state: &PatientState) -> Vec<Recommendation> {
    let mut all = Vec::new();

    for (organ, organ_state) in &state.organ_systems {
        let score = organ_state.function_score;
        if score >= RECOMMENDATION_SCORE {
            continue;
        }
        let severe = score < 0.5;
        let priority = if severe { OrderPriority::High } else { OrderPriority::Medium };
        let treatments = medsim_logic::interventions::targeting(*organ)
            .filter(|d| matches!(d.kind, InterventionType::Medication | InterventionType::Supportive));
        for def in treatments {
            all.push(Recommendation::new(
                def.name,
                format!("{}_dysfunction", organ.name()),
                severe,
                priority,
            ));
        }
    }

    let vitals = &state.vitals;
    if vitals.oxygen_saturation < 90.0 {
        let severe = vitals.oxygen_saturation < 85.0;
        let priority = if severe { OrderPriority::Urgent } else { OrderPriority::High };
        all.push(Recommendation::new("oxygen_therapy", "hypoxemia", severe, priority));
    }
    if vitals.bp_systolic < 90.0 {
        let severe = vitals.bp_systolic < 80.0;
        let priority = if severe { OrderPriority::Urgent } else { OrderPriority::High };
        all.push(Recommendation::new("vasopressor", "hypotension", severe, priority));
    }
    if vitals.heart_rate > 120.0 {
        all.push(Recommendation::new("ecg_monitoring", "tachycardia", false, OrderPriority::High));
    }

    for symptom in &state.symptoms {
        if symptom.contains("pain") {
            all.push(Recommendation::new("sedative", "pain_management", false, OrderPriority::Medium));
        } else if symptom.contains("fever") {
            all.push(Recommendation::new("antibiotic", "infection_treatment", false, OrderPriority::High));
        }
    }

    let mut best: BTreeMap<String, Recommendation> = BTreeMap::new();
    for rec in all {
        match best.get(&rec.intervention) {
            Some(existing) if existing.priority >= rec.priority => {}
            _ => {
                best.insert(rec.intervention.clone(), rec);
            }
        }
    }
    let mut out: Vec<Recommendation> = best.into_values().collect();
    out.sort_by(|a, b| b.priority.cmp(&a.priority).then_with(|| a.intervention.cmp(&b.intervention)));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evolution::PatientStateEvolutionEngine;

    fn healthy() -> PatientState {
        PatientStateEvolutionEngine::new(&Default::default(), Some(1)).initialize_patient_state(Vec::new(), None, 0.0)
    }

    #[test]
    fn test_request_places_order() {
        let mut iface = InterventionInterface::new(Some(7));
        let response = iface.request_intervention(OrderRequest::new("cbc"), &healthy(), 0.0);
        assert!(response.success);
        assert!(response.warnings.is_empty());
        assert_eq!(response.order.unwrap().id, "ORD0001");
    }

    #[test]
    fn test_unknown_request_rejected() {
        let mut iface = InterventionInterface::new(Some(7));
        let response = iface.request_intervention(OrderRequest::new("bloodletting"), &healthy(), 0.0);
        assert!(!response.success);
        assert!(response.message.contains("bloodletting"));
        assert!(iface.manager().all_orders().is_empty());
    }

    #[test]
    fn test_severe_dysfunction_blocks() {
        let mut iface = InterventionInterface::new(Some(7));
        let mut state = healthy();
        state.set_function_score(OrganSystem::Cardiovascular, 0.2);
        let response = iface.request_intervention(OrderRequest::new("vasopressor"), &state, 0.0);
        assert!(!response.success);
        assert!(response
            .contraindications
            .contains(&"severe_cardiovascular_dysfunction".to_string()));
    }

    #[test]
    fn test_tachyarrhythmia_blocks_vasopressor() {
        let mut iface = InterventionInterface::new(Some(7));
        let mut state = healthy();
        state.vitals.heart_rate = 165.0;
        let response = iface.request_intervention(OrderRequest::new("vasopressor"), &state, 0.0);
        assert_eq!(response.contraindications, vec!["tachyarrhythmia".to_string()]);
    }

    #[test]
    fn test_warnings_do_not_block() {
        let mut iface = InterventionInterface::new(Some(7));
        let mut state = healthy();
        state.set_function_score(OrganSystem::Renal, 0.5);
        state.adverse_events.push(AdverseEventType::Hypotension);
        let response = iface.request_intervention(OrderRequest::new("vasopressor"), &state, 0.0);
        assert!(response.success);
        assert!(response.warnings.contains(&"moderate_renal_dysfunction".to_string()));
        assert!(response
            .warnings
            .contains(&"patient_has_existing_adverse_events".to_string()));
    }

    #[test]
    fn test_recommendations_from_vitals() {
        let mut state = healthy();
        state.vitals.oxygen_saturation = 82.0;
        state.vitals.bp_systolic = 85.0;
        state.vitals.heart_rate = 130.0;
        let recs = recommendations(&state);
        let find = |name: &str| recs.iter().find(|r| r.intervention == name).cloned();
        assert_eq!(find("oxygen_therapy").unwrap().priority, OrderPriority::Urgent);
        assert_eq!(find("vasopressor").unwrap().priority, OrderPriority::High);
        assert_eq!(find("ecg_monitoring").unwrap().priority, OrderPriority::High);
        assert_eq!(recs[0].intervention, "oxygen_therapy");
    }

    #[test]
    fn test_recommendations_deduplicate_by_priority() {
        let mut state = healthy();
        state.set_function_score(OrganSystem::Cardiovascular, 0.6);
        state.vitals.bp_systolic = 70.0;
        let recs = recommendations(&state);
        let vaso: Vec<_> = recs.iter().filter(|r| r.intervention == "vasopressor").collect();
        assert_eq!(vaso.len(), 1);
        assert_eq!(vaso[0].priority, OrderPriority::Urgent);
        assert!(recs.iter().all(|r| r.intervention != "cbc"));
    }

    #[test]
    fn test_symptom_recommendations() {
        let mut state = healthy();
        state.symptoms.insert("chest_pain".into());
        state.symptoms.insert("fever".into());
        let recs = recommendations(&state);
        assert!(recs.iter().any(|r| r.intervention == "sedative" && r.reason == "pain_management"));
        assert!(recs.iter().any(|r| r.intervention == "antibiotic" && r.priority == OrderPriority::High));
    }

    #[test]
    fn test_effectiveness_report() {
        let mut iface = InterventionInterface::new(Some(11));
        let state = healthy();
        for _ in 0..10 {
            iface.request_intervention(OrderRequest::new("cbc"), &state, 0.0);
        }
        iface.request_intervention(OrderRequest::new("chest_xray").with_delay(60), &state, 0.0);
        iface.execute_due(0.0);

        let report = iface.effectiveness_report();
        let cbc = &report.by_intervention["cbc"];
        assert_eq!(cbc.total_orders, 10);
        assert_eq!(cbc.successful_orders + cbc.failed_orders, 10);
        assert!(!report.by_intervention.contains_key("chest_xray"));
        assert_eq!(report.by_type.get(&InterventionType::Laboratory), Some(&10));
        assert!((0.0..=1.0).contains(&report.success_rate));
    }
}
