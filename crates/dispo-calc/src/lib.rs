//! # Dispo Calculation Engine
//!
//! 純計算函式庫：細分彙總、庫存推算、自適應預測

pub mod breakdown;
pub mod forecast;
pub mod inventory;

// Re-export 主要類型
pub use breakdown::{forecast_total, procurement_total, BreakdownAggregator};
pub use dispo_core::{get_week_temporal_state, is_editable};
pub use forecast::{calculate_adaptive_forecast, ForecastEstimator};
pub use inventory::{calculate_inventory_end, InventoryProjector, WeekProjection};
