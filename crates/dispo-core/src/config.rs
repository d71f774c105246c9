//! 計劃配置模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{DispoError, Result, RowEditability, WeekField};

/// 計劃會話參數配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanningConfig {
    /// 執行率係數下限
    pub min_run_rate_factor: Decimal,

    /// 執行率係數上限
    pub max_run_rate_factor: Decimal,

    /// 執行率回看週數（只計入有實際銷量的週）
    pub run_rate_horizon_weeks: usize,

    /// 各週次欄位的編輯權限
    pub field_policies: FieldPolicies,
}

impl Default for PlanningConfig {
    fn default() -> Self {
        Self {
            min_run_rate_factor: Decimal::new(5, 1),
            max_run_rate_factor: Decimal::new(15, 1),
            run_rate_horizon_weeks: 4,
            field_policies: FieldPolicies::default(),
        }
    }
}

impl PlanningConfig {
    /// 創建預設配置
    pub fn new() -> Self {
        Self::default()
    }

    /// 從 JSON 載入配置（缺少的欄位使用預設值）
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// 建構器模式：設置執行率係數範圍
    pub fn with_run_rate_bounds(mut self, min: Decimal, max: Decimal) -> Self {
        self.min_run_rate_factor = min;
        self.max_run_rate_factor = max;
        self
    }

    /// 建構器模式：設置回看週數
    pub fn with_run_rate_horizon(mut self, weeks: usize) -> Self {
        self.run_rate_horizon_weeks = weeks;
        self
    }

    /// 建構器模式：設置單一欄位的編輯權限
    pub fn with_field_policy(mut self, field: WeekField, policy: RowEditability) -> Self {
        self.field_policies.set(field, policy);
        self
    }

    /// 取得欄位的編輯權限
    pub fn policy_for(&self, field: WeekField) -> RowEditability {
        self.field_policies.get(field)
    }

    /// 驗證配置
    pub fn validate(&self) -> Result<()> {
        if self.min_run_rate_factor < Decimal::ZERO {
            return Err(DispoError::InvalidConfig(format!(
                "執行率係數下限不可為負: {}",
                self.min_run_rate_factor
            )));
        }
        if self.min_run_rate_factor > self.max_run_rate_factor {
            return Err(DispoError::InvalidConfig(format!(
                "執行率係數下限 {} 大於上限 {}",
                self.min_run_rate_factor, self.max_run_rate_factor
            )));
        }
        if self.run_rate_horizon_weeks == 0 {
            return Err(DispoError::InvalidConfig("回看週數必須大於 0".to_string()));
        }
        Ok(())
    }

    /// 將係數限制在配置範圍內
    pub fn clamp_factor(&self, factor: Decimal) -> Decimal {
        factor
            .max(self.min_run_rate_factor)
            .min(self.max_run_rate_factor)
    }
}

/// 週次欄位的編輯權限表
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldPolicies {
    pub sales_forecast_baseline: RowEditability,
    pub promo_kartonware: RowEditability,
    pub promo_displays: RowEditability,
    /// 當前週的採購已下達，只允許調整未來週
    pub procurement_forecast: RowEditability,
}

impl Default for FieldPolicies {
    fn default() -> Self {
        Self {
            sales_forecast_baseline: RowEditability::Editable,
            promo_kartonware: RowEditability::Editable,
            promo_displays: RowEditability::Editable,
            procurement_forecast: RowEditability::EditableInFuture,
        }
    }
}

impl FieldPolicies {
    pub fn get(&self, field: WeekField) -> RowEditability {
        match field {
            WeekField::SalesForecastBaseline => self.sales_forecast_baseline,
            WeekField::PromoKartonware => self.promo_kartonware,
            WeekField::PromoDisplays => self.promo_displays,
            WeekField::ProcurementForecast => self.procurement_forecast,
        }
    }

    pub fn set(&mut self, field: WeekField, policy: RowEditability) {
        match field {
            WeekField::SalesForecastBaseline => self.sales_forecast_baseline = policy,
            WeekField::PromoKartonware => self.promo_kartonware = policy,
            WeekField::PromoDisplays => self.promo_displays = policy,
            WeekField::ProcurementForecast => self.procurement_forecast = policy,
        }
    }
}
