//! 變更（覆寫）模型

use chrono::{DateTime, Utc, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::WeekId;

/// 以週次為鍵的可編輯欄位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeekField {
    /// 銷售預測基準量
    SalesForecastBaseline,
    /// 促銷：紙箱貨（Kartonware）
    PromoKartonware,
    /// 促銷：陳列架（Displays）
    PromoDisplays,
    /// 採購預測
    ProcurementForecast,
}

impl WeekField {
    /// 所有週次欄位
    pub const ALL: [WeekField; 4] = [
        WeekField::SalesForecastBaseline,
        WeekField::PromoKartonware,
        WeekField::PromoDisplays,
        WeekField::ProcurementForecast,
    ];

    /// 此欄位是否參與庫存推算
    pub fn affects_inventory(&self) -> bool {
        match self {
            WeekField::SalesForecastBaseline
            | WeekField::PromoKartonware
            | WeekField::PromoDisplays
            | WeekField::ProcurementForecast => true,
        }
    }
}

/// 以訂單號為鍵的可編輯欄位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderField {
    /// 採購單數量
    PurchaseQuantity,
    /// 客戶訂單數量
    SalesOrderQuantity,
}

/// 儲存格引用：欄位與其鍵（週次或訂單號）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellRef {
    Week { field: WeekField, week: WeekId },
    Order { field: OrderField, order_id: String },
}

impl CellRef {
    pub fn week(field: WeekField, week: WeekId) -> Self {
        CellRef::Week { field, week }
    }

    pub fn order(field: OrderField, order_id: impl Into<String>) -> Self {
        CellRef::Order {
            field,
            order_id: order_id.into(),
        }
    }

    /// 週次欄位所在的週（訂單欄位回傳 None）
    pub fn week_id(&self) -> Option<WeekId> {
        match self {
            CellRef::Week { week, .. } => Some(*week),
            CellRef::Order { .. } => None,
        }
    }
}

/// 變更的複合鍵（物料、儲存格、日）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChangeKey {
    pub article_id: String,
    pub cell: CellRef,
    pub day: Option<Weekday>,
}

/// 使用者提交的變更草稿
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeDraft {
    /// 物料ID
    pub article_id: String,

    /// 目標儲存格
    pub cell: CellRef,

    /// 日（週內細分，可選）
    pub day: Option<Weekday>,

    /// 原始值
    pub original_value: Decimal,

    /// 新值
    pub new_value: Decimal,

    /// 備註
    pub comment: String,
}

impl ChangeDraft {
    /// 創建新的變更草稿
    pub fn new(
        article_id: String,
        cell: CellRef,
        original_value: Decimal,
        new_value: Decimal,
    ) -> Self {
        Self {
            article_id,
            cell,
            day: None,
            original_value,
            new_value,
            comment: String::new(),
        }
    }

    /// 建構器模式：設置日
    pub fn with_day(mut self, day: Weekday) -> Self {
        self.day = Some(day);
        self
    }

    /// 建構器模式：設置備註
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    /// 新值等於原始值且沒有備註：不構成變更
    pub fn is_noop(&self) -> bool {
        self.new_value == self.original_value && self.comment.trim().is_empty()
    }

    pub fn key(&self) -> ChangeKey {
        ChangeKey {
            article_id: self.article_id.clone(),
            cell: self.cell.clone(),
            day: self.day,
        }
    }
}

/// 已接受的變更
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Change {
    /// 變更ID
    pub id: Uuid,

    pub article_id: String,
    pub cell: CellRef,
    pub day: Option<Weekday>,
    pub original_value: Decimal,
    pub new_value: Decimal,
    pub comment: String,

    /// 接受時間
    pub timestamp: DateTime<Utc>,
}

impl Change {
    /// 從草稿創建變更
    pub fn from_draft(draft: ChangeDraft, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            article_id: draft.article_id,
            cell: draft.cell,
            day: draft.day,
            original_value: draft.original_value,
            new_value: draft.new_value,
            comment: draft.comment,
            timestamp,
        }
    }

    pub fn key(&self) -> ChangeKey {
        ChangeKey {
            article_id: self.article_id.clone(),
            cell: self.cell.clone(),
            day: self.day,
        }
    }

    /// 變更量（新值 - 原始值）
    pub fn delta(&self) -> Decimal {
        self.new_value - self.original_value
    }
}

/// 有效值讀取路徑
///
/// 下游計算一律透過此 trait 讀取可編輯欄位，而非直接讀取原始資料。
pub trait EffectiveValues {
    /// 儲存格的覆寫值（沒有覆寫時為 None）
    fn override_value(&self, article_id: &str, cell: &CellRef, day: Option<Weekday>) -> Option<Decimal>;

    /// 有覆寫時回傳覆寫值，否則回傳原始值
    fn effective_value(
        &self,
        article_id: &str,
        cell: &CellRef,
        day: Option<Weekday>,
        original: Decimal,
    ) -> Decimal {
        self.override_value(article_id, cell, day).unwrap_or(original)
    }
}

/// 無覆寫：一律回傳原始值
#[derive(Debug, Clone, Copy, Default)]
pub struct BaseValues;

impl EffectiveValues for BaseValues {
    fn override_value(&self, _article_id: &str, _cell: &CellRef, _day: Option<Weekday>) -> Option<Decimal> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn week(w: u32) -> WeekId {
        WeekId::new(2025, w).unwrap()
    }

    #[test]
    fn test_draft_noop() {
        let cell = CellRef::week(WeekField::SalesForecastBaseline, week(12));
        let draft = ChangeDraft::new("ART-001".to_string(), cell.clone(), Decimal::from(100), Decimal::from(100));
        assert!(draft.is_noop());

        // 有備註就不是空變更
        let draft = draft.with_comment("已與客戶確認");
        assert!(!draft.is_noop());

        let draft = ChangeDraft::new("ART-001".to_string(), cell, Decimal::from(100), Decimal::from(120));
        assert!(!draft.is_noop());
    }

    #[test]
    fn test_key_includes_day() {
        let cell = CellRef::order(OrderField::SalesOrderQuantity, "SO-4711");
        let a = ChangeDraft::new("ART-001".to_string(), cell.clone(), Decimal::ZERO, Decimal::ONE);
        let b = a.clone().with_day(Weekday::Tue);

        assert_ne!(a.key(), b.key());
        assert_eq!(a.key().cell.week_id(), None);
    }

    #[test]
    fn test_change_from_draft() {
        let draft = ChangeDraft::new(
            "ART-002".to_string(),
            CellRef::week(WeekField::PromoDisplays, week(20)),
            Decimal::from(40),
            Decimal::from(65),
        )
        .with_comment("Aktion Frühjahr");

        let change = Change::from_draft(draft.clone(), Utc::now());
        assert_eq!(change.key(), draft.key());
        assert_eq!(change.delta(), Decimal::from(25));
        assert_eq!(change.comment, "Aktion Frühjahr");
    }

    #[test]
    fn test_base_values_returns_original() {
        let cell = CellRef::week(WeekField::ProcurementForecast, week(3));
        let value = BaseValues.effective_value("ART-001", &cell, None, Decimal::from(7));
        assert_eq!(value, Decimal::from(7));
    }
}
