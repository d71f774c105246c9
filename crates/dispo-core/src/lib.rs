//! # Dispo Core
//!
//! 核心資料模型與類型定義

pub mod calendar;
pub mod change;
pub mod config;
pub mod purchase;
pub mod record;

// Re-export 主要類型
pub use calendar::{
    get_week_temporal_state, is_editable, PlanningCalendar, RowEditability, TemporalState, WeekId,
};
pub use change::{
    BaseValues, CellRef, Change, ChangeDraft, ChangeKey, EffectiveValues, OrderField, WeekField,
};
pub use config::{FieldPolicies, PlanningConfig};
pub use purchase::{PoLine, PoStatus, PurchaseOrder};
pub use record::{ArticlePlan, ProcurementBreakdown, PromoBreakdown, SalesBreakdown, WeeklyRecord};

/// Dispo 錯誤類型
#[derive(Debug, thiserror::Error)]
pub enum DispoError {
    #[error("無效的週次: {year}/KW {week}")]
    InvalidWeek { year: i32, week: u32 },

    #[error("無效的配置: {0}")]
    InvalidConfig(String),

    #[error("週次順序錯誤: {previous} 之後出現 {next}")]
    SequenceOutOfOrder { previous: WeekId, next: WeekId },

    #[error("索引超出範圍: {index}（共 {len} 週）")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("找不到物料: {0}")]
    ArticleNotFound(String),

    #[error("找不到採購單: {0}")]
    PurchaseOrderNotFound(String),

    #[error("採購單 {po_nummer} 已連結到 {week}")]
    PurchaseOrderAlreadyLinked { po_nummer: String, week: WeekId },

    #[error("{0} 沒有連結的採購單")]
    WeekNotLinked(WeekId),

    #[error("{week} 連結的採購單為 {actual}，而非 {expected}")]
    LinkMismatch {
        week: WeekId,
        expected: String,
        actual: String,
    },

    #[error("找不到變更: {0}")]
    ChangeNotFound(uuid::Uuid),

    #[error("欄位 {field:?} 在 {week} 不可編輯")]
    NotEditable { field: WeekField, week: WeekId },

    #[error("序列化錯誤: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DispoError>;
