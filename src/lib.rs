//! # Dispo
//!
//! 庫存/採購計劃核心：週庫存推算、使用者變更覆寫、採購單連結

pub mod logging;

pub use dispo_calc::{
    calculate_adaptive_forecast, calculate_inventory_end, forecast_total, procurement_total,
    BreakdownAggregator, ForecastEstimator, InventoryProjector, WeekProjection,
};
pub use dispo_core::{
    get_week_temporal_state, is_editable, ArticlePlan, BaseValues, CellRef, Change, ChangeDraft,
    DispoError, EffectiveValues, OrderField, PlanningCalendar, PlanningConfig,
    ProcurementBreakdown, PromoBreakdown, PurchaseOrder, Result, RowEditability, SalesBreakdown,
    TemporalState, WeekField, WeekId, WeeklyRecord,
};
pub use dispo_session::{ChangeOutcome, ChangeStore, PlanningSession, PoLinkRegistry};
