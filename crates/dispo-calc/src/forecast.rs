//! 自適應預測（執行率）

use dispo_core::{
    ArticlePlan, CellRef, DispoError, EffectiveValues, PlanningCalendar, PlanningConfig,
    TemporalState, WeekField, WeekId, WeeklyRecord,
};
use rust_decimal::{Decimal, RoundingStrategy};

/// 系統建議基準量 = round(預算 × 執行率係數)
pub fn calculate_adaptive_forecast(budget: Decimal, run_rate_factor: Decimal) -> Decimal {
    (budget * run_rate_factor).round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// 自適應預測估算器
pub struct ForecastEstimator;

impl ForecastEstimator {
    /// 計算執行率係數
    ///
    /// 取歷史中最近 H 個有實際銷量的週，實際銷量總和 / 預算總和，並限制在配置範圍內。
    /// 預算總和為 0 時回傳 1.0。
    pub fn run_rate_factor(history: &[WeeklyRecord], config: &PlanningConfig) -> Decimal {
        let (actual_sum, budget_sum) = history
            .iter()
            .rev()
            .filter_map(|w| w.sales_actuals.map(|actual| (actual, w.sales_budget)))
            .take(config.run_rate_horizon_weeks)
            .fold((Decimal::ZERO, Decimal::ZERO), |(a, b), (actual, budget)| {
                (a + actual, b + budget)
            });

        if budget_sum.is_zero() {
            return Decimal::ONE;
        }

        config.clamp_factor(actual_sum / budget_sum)
    }

    /// 指定週的系統建議基準量
    ///
    /// 若該週已有人工覆寫，直接回傳覆寫值，不計算執行率。
    pub fn system_baseline<V>(
        plan: &ArticlePlan,
        index: usize,
        config: &PlanningConfig,
        overlay: &V,
    ) -> dispo_core::Result<Decimal>
    where
        V: EffectiveValues + ?Sized,
    {
        let record = plan.weeks.get(index).ok_or(DispoError::IndexOutOfRange {
            index,
            len: plan.weeks.len(),
        })?;

        let cell = CellRef::week(WeekField::SalesForecastBaseline, record.week);
        if let Some(manual) = overlay.override_value(&plan.article_id, &cell, None) {
            return Ok(manual);
        }

        let factor = Self::run_rate_factor(&plan.weeks[..index], config);
        Ok(calculate_adaptive_forecast(
            record.sales_budget_breakdown.baseline,
            factor,
        ))
    }

    /// 所有非過去週的系統建議基準量
    pub fn suggested_baselines<V>(
        plan: &ArticlePlan,
        calendar: &PlanningCalendar,
        config: &PlanningConfig,
        overlay: &V,
    ) -> dispo_core::Result<Vec<(WeekId, Decimal)>>
    where
        V: EffectiveValues + ?Sized,
    {
        plan.validate_order()?;

        let mut suggestions = Vec::new();
        for (index, record) in plan.weeks.iter().enumerate() {
            if calendar.classify(record.week) == TemporalState::Past {
                continue;
            }
            let baseline = Self::system_baseline(plan, index, config, overlay)?;
            suggestions.push((record.week, baseline));
        }

        tracing::debug!(
            "物料 {} 建議基準量 {} 週",
            plan.article_id,
            suggestions.len()
        );

        Ok(suggestions)
    }
}
