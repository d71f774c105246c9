//! 週庫存記錄模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{DispoError, PoLine, Result, WeekId};

/// 促銷銷量細分
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromoBreakdown {
    /// 紙箱貨
    pub kartonware: Decimal,
    /// 陳列架
    pub displays: Decimal,
}

/// 銷量細分（基準量 + 促銷）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesBreakdown {
    pub baseline: Decimal,
    pub promo: PromoBreakdown,
}

impl SalesBreakdown {
    pub fn new(baseline: Decimal, kartonware: Decimal, displays: Decimal) -> Self {
        Self {
            baseline,
            promo: PromoBreakdown {
                kartonware,
                displays,
            },
        }
    }

    /// 只有基準量、沒有促銷
    pub fn baseline_only(baseline: Decimal) -> Self {
        Self::new(baseline, Decimal::ZERO, Decimal::ZERO)
    }
}

/// 採購細分
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcurementBreakdown {
    /// 採購預測
    pub forecast: Decimal,
    /// 已訂購（未交貨）
    pub ordered: Decimal,
    /// 已交貨
    pub delivered: Decimal,
}

impl ProcurementBreakdown {
    pub fn new(forecast: Decimal, ordered: Decimal, delivered: Decimal) -> Self {
        Self {
            forecast,
            ordered,
            delivered,
        }
    }

    /// 從採購明細行彙總已訂購與已交貨數量
    pub fn from_po_lines(forecast: Decimal, lines: &[PoLine]) -> Self {
        let (delivered, ordered): (Vec<&PoLine>, Vec<&PoLine>) =
            lines.iter().partition(|line| line.delivered);

        Self {
            forecast,
            ordered: ordered.iter().map(|line| line.quantity).sum(),
            delivered: delivered.iter().map(|line| line.quantity).sum(),
        }
    }

    /// 實際採購量（已訂購 + 已交貨）
    pub fn actual(&self) -> Decimal {
        self.ordered + self.delivered
    }
}

/// 單一物料單一週的記錄
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyRecord {
    /// 週次
    pub week: WeekId,

    /// 期初庫存（等於上週期末庫存）
    pub inventory_start: Decimal,

    /// 年度銷售預算（建立後不變）
    pub sales_budget: Decimal,

    pub sales_budget_breakdown: SalesBreakdown,
    pub sales_forecast_breakdown: SalesBreakdown,

    /// 系統中的客戶訂單量
    pub sales_order_in_system: Decimal,

    /// 實際銷量（只有過去週才有）
    pub sales_actuals: Option<Decimal>,

    pub procurement: ProcurementBreakdown,

    /// 期末庫存（計算值，可為負）
    pub inventory_end: Decimal,
}

impl WeeklyRecord {
    /// 創建空白的週記錄
    pub fn new(week: WeekId) -> Self {
        Self {
            week,
            inventory_start: Decimal::ZERO,
            sales_budget: Decimal::ZERO,
            sales_budget_breakdown: SalesBreakdown::default(),
            sales_forecast_breakdown: SalesBreakdown::default(),
            sales_order_in_system: Decimal::ZERO,
            sales_actuals: None,
            procurement: ProcurementBreakdown::default(),
            inventory_end: Decimal::ZERO,
        }
    }

    /// 建構器模式：設置期初庫存
    pub fn with_inventory_start(mut self, qty: Decimal) -> Self {
        self.inventory_start = qty;
        self
    }

    /// 建構器模式：設置銷售預算（總量與細分）
    pub fn with_budget(mut self, breakdown: SalesBreakdown) -> Self {
        self.sales_budget = breakdown.baseline + breakdown.promo.kartonware + breakdown.promo.displays;
        self.sales_budget_breakdown = breakdown;
        self
    }

    /// 建構器模式：設置銷售預測
    pub fn with_forecast(mut self, breakdown: SalesBreakdown) -> Self {
        self.sales_forecast_breakdown = breakdown;
        self
    }

    /// 建構器模式：設置客戶訂單量
    pub fn with_sales_orders(mut self, qty: Decimal) -> Self {
        self.sales_order_in_system = qty;
        self
    }

    /// 建構器模式：設置實際銷量
    pub fn with_actuals(mut self, qty: Decimal) -> Self {
        self.sales_actuals = Some(qty);
        self
    }

    /// 建構器模式：設置採購細分
    pub fn with_procurement(mut self, procurement: ProcurementBreakdown) -> Self {
        self.procurement = procurement;
        self
    }
}

/// 單一物料的週記錄序列（按時間排序）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticlePlan {
    /// 物料ID
    pub article_id: String,

    /// 週記錄
    pub weeks: Vec<WeeklyRecord>,
}

impl ArticlePlan {
    pub fn new(article_id: String, weeks: Vec<WeeklyRecord>) -> Self {
        Self { article_id, weeks }
    }

    /// 初始庫存（第一週的期初庫存）
    pub fn initial_inventory(&self) -> Decimal {
        self.weeks
            .first()
            .map(|w| w.inventory_start)
            .unwrap_or(Decimal::ZERO)
    }

    /// 查找週次的索引
    pub fn position(&self, week: WeekId) -> Option<usize> {
        self.weeks.iter().position(|w| w.week == week)
    }

    /// 取得指定週的記錄
    pub fn record(&self, week: WeekId) -> Option<&WeeklyRecord> {
        self.weeks.iter().find(|w| w.week == week)
    }

    /// 驗證週次嚴格遞增
    pub fn validate_order(&self) -> Result<()> {
        for pair in self.weeks.windows(2) {
            if pair[0].week >= pair[1].week {
                return Err(DispoError::SequenceOutOfOrder {
                    previous: pair[0].week,
                    next: pair[1].week,
                });
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.weeks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weeks.is_empty()
    }
}
