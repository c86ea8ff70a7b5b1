//! Intervention orders: the per-patient manager and the validating
//! interface in front of it.

pub mod interface;
pub mod manager;

pub use interface::{EffectivenessReport, InterventionInterface, InterventionResponse, Recommendation};
pub use manager::{
    InterventionManager, InterventionOrder, InterventionResult, LabResult, OrderRequest, OrderStatus,
    OrdersSummary,
};
