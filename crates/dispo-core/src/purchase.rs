//! 採購單模型

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::WeekId;

/// 採購單連結狀態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PoStatus {
    /// 未連結到任何週
    Unlinked,
    /// 已連結到採購預測週
    Linked,
}

/// 採購單（PO）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseOrder {
    /// 採購單號
    pub po_nummer: String,

    /// 數量
    pub menge: Decimal,

    /// 交貨日期
    pub delivery_date: Option<NaiveDate>,

    /// 供應商
    pub supplier: Option<String>,

    /// 連結狀態
    pub status: PoStatus,

    /// 連結的週
    pub linked_week: Option<WeekId>,
}

impl PurchaseOrder {
    /// 創建新的採購單（未連結）
    pub fn new(po_nummer: String, menge: Decimal) -> Self {
        Self {
            po_nummer,
            menge,
            delivery_date: None,
            supplier: None,
            status: PoStatus::Unlinked,
            linked_week: None,
        }
    }

    /// 建構器模式：設置交貨日期
    pub fn with_delivery_date(mut self, date: NaiveDate) -> Self {
        self.delivery_date = Some(date);
        self
    }

    /// 建構器模式：設置供應商
    pub fn with_supplier(mut self, supplier: String) -> Self {
        self.supplier = Some(supplier);
        self
    }

    /// 交貨日期所屬的週
    pub fn delivery_week(&self) -> Option<WeekId> {
        self.delivery_date.map(WeekId::from_date)
    }

    pub fn is_linked(&self) -> bool {
        self.status == PoStatus::Linked
    }

    /// 標記為已連結
    pub fn mark_linked(&mut self, week: WeekId) {
        self.status = PoStatus::Linked;
        self.linked_week = Some(week);
    }

    /// 標記為未連結（數量保留）
    pub fn mark_unlinked(&mut self) {
        self.status = PoStatus::Unlinked;
        self.linked_week = None;
    }
}

/// 採購明細行（用於彙總已訂購/已交貨數量）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoLine {
    /// 採購單號
    pub order_id: String,

    /// 數量
    pub quantity: Decimal,

    /// 是否已交貨
    pub delivered: bool,
}

impl PoLine {
    pub fn ordered(order_id: String, quantity: Decimal) -> Self {
        Self {
            order_id,
            quantity,
            delivered: false,
        }
    }

    pub fn delivered(order_id: String, quantity: Decimal) -> Self {
        Self {
            order_id,
            quantity,
            delivered: true,
        }
    }
}
