//! 庫存推算（逐週鏈式遞推）

use dispo_core::{ArticlePlan, DispoError, EffectiveValues, WeekId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::breakdown::BreakdownAggregator;

/// 單週庫存推算結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekProjection {
    /// 週次
    pub week: WeekId,
    /// 期初庫存
    pub inventory_start: Decimal,
    /// 有效預測總量
    pub forecast_total: Decimal,
    /// 系統中的客戶訂單量
    pub sales_order_in_system: Decimal,
    /// 消耗量（兩個需求訊號取大）
    pub consumption: Decimal,
    /// 有效採購量
    pub procurement_total: Decimal,
    /// 期末庫存
    pub inventory_end: Decimal,
}

impl WeekProjection {
    /// 是否缺貨（期末庫存為負）
    pub fn is_shortage(&self) -> bool {
        self.inventory_end < Decimal::ZERO
    }
}

/// 計算期末庫存
///
/// 預測與客戶訂單取較大者扣除（不相加）。負值代表欠貨，不做截斷。
pub fn calculate_inventory_end(
    inventory_start: Decimal,
    forecast_total: Decimal,
    sales_order_in_system: Decimal,
    procurement_total: Decimal,
) -> Decimal {
    inventory_start - forecast_total.max(sales_order_in_system) + procurement_total
}

/// 庫存推算器
pub struct InventoryProjector;

impl InventoryProjector {
    /// 推算整個序列（不修改計劃）
    pub fn project<V>(plan: &ArticlePlan, overlay: &V) -> dispo_core::Result<Vec<WeekProjection>>
    where
        V: EffectiveValues + ?Sized,
    {
        plan.validate_order()?;

        let mut results = Vec::with_capacity(plan.weeks.len());
        let mut current_inventory = plan.initial_inventory();

        for record in &plan.weeks {
            let forecast_total =
                BreakdownAggregator::effective_forecast_total(&plan.article_id, record, overlay);
            let procurement_total =
                BreakdownAggregator::effective_procurement_total(&plan.article_id, record, overlay);
            let consumption = forecast_total.max(record.sales_order_in_system);
            let inventory_end = calculate_inventory_end(
                current_inventory,
                forecast_total,
                record.sales_order_in_system,
                procurement_total,
            );

            results.push(WeekProjection {
                week: record.week,
                inventory_start: current_inventory,
                forecast_total,
                sales_order_in_system: record.sales_order_in_system,
                consumption,
                procurement_total,
                inventory_end,
            });

            current_inventory = inventory_end;
        }

        Ok(results)
    }

    /// 從 `from_index` 起重新推算並寫回計劃
    ///
    /// 第 0 週使用計劃自身的期初庫存，其餘週的期初取上一週已存的期末庫存。
    /// 重複執行結果相同。
    pub fn recompute<V>(plan: &mut ArticlePlan, from_index: usize, overlay: &V) -> dispo_core::Result<()>
    where
        V: EffectiveValues + ?Sized,
    {
        plan.validate_order()?;

        let len = plan.weeks.len();
        if from_index > len {
            return Err(DispoError::IndexOutOfRange {
                index: from_index,
                len,
            });
        }
        if from_index == len {
            return Ok(());
        }

        let ArticlePlan { article_id, weeks } = plan;
        let mut current_inventory = if from_index == 0 {
            weeks[0].inventory_start
        } else {
            weeks[from_index - 1].inventory_end
        };

        for record in weeks.iter_mut().skip(from_index) {
            let forecast_total =
                BreakdownAggregator::effective_forecast_total(article_id, record, overlay);
            let procurement_total =
                BreakdownAggregator::effective_procurement_total(article_id, record, overlay);

            record.inventory_start = current_inventory;
            record.inventory_end = calculate_inventory_end(
                current_inventory,
                forecast_total,
                record.sales_order_in_system,
                procurement_total,
            );
            current_inventory = record.inventory_end;
        }

        tracing::debug!(
            "物料 {} 自第 {} 週起重新推算 {} 週，最終庫存 {}",
            article_id,
            from_index,
            len - from_index,
            current_inventory
        );

        Ok(())
    }

    /// 第一個缺貨週
    pub fn first_shortage(projections: &[WeekProjection]) -> Option<&WeekProjection> {
        projections.iter().find(|p| p.is_shortage())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dispo_core::{BaseValues, ProcurementBreakdown, SalesBreakdown, WeeklyRecord};

    fn week(w: u32) -> WeekId {
        WeekId::new(2025, w).unwrap()
    }

    fn record(w: u32, forecast: i64, orders: i64, procurement: i64) -> WeeklyRecord {
        WeeklyRecord::new(week(w))
            .with_forecast(SalesBreakdown::baseline_only(Decimal::from(forecast)))
            .with_sales_orders(Decimal::from(orders))
            .with_procurement(ProcurementBreakdown::new(
                Decimal::from(procurement),
                Decimal::ZERO,
                Decimal::ZERO,
            ))
    }

    #[test]
    fn test_calculate_inventory_end_uses_higher_demand() {
        // 2000 - max(1000, 700) + 0 = 1000
        assert_eq!(
            calculate_inventory_end(Decimal::from(2000), Decimal::from(1000), Decimal::from(700), Decimal::ZERO),
            Decimal::from(1000)
        );
        // 客戶訂單較高時以訂單扣除
        assert_eq!(
            calculate_inventory_end(Decimal::from(2000), Decimal::from(300), Decimal::from(700), Decimal::from(100)),
            Decimal::from(1400)
        );
    }

    #[test]
    fn test_project_chain() {
        let mut first = record(1, 1000, 700, 0);
        first.inventory_start = Decimal::from(2000);
        let plan = ArticlePlan::new(
            "ART-001".to_string(),
            vec![first, record(2, 600, 400, 500), record(3, 200, 900, 0)],
        );

        let result = InventoryProjector::project(&plan, &BaseValues).unwrap();

        assert_eq!(result.len(), 3);
        assert_eq!(result[0].inventory_end, Decimal::from(1000));
        assert_eq!(result[1].inventory_start, Decimal::from(1000));
        assert_eq!(result[1].consumption, Decimal::from(600));
        assert_eq!(result[1].inventory_end, Decimal::from(900)); // 1000 - 600 + 500
        assert_eq!(result[2].consumption, Decimal::from(900));
        assert_eq!(result[2].inventory_end, Decimal::ZERO);

        for pair in result.windows(2) {
            assert_eq!(pair[1].inventory_start, pair[0].inventory_end);
        }
    }

    #[test]
    fn test_negative_inventory_propagates() {
        let mut first = record(1, 600, 0, 0);
        first.inventory_start = Decimal::from(400);
        let plan = ArticlePlan::new(
            "ART-NEG".to_string(),
            vec![first, record(2, 100, 0, 0), record(3, 0, 0, 0)],
        );

        let result = InventoryProjector::project(&plan, &BaseValues).unwrap();

        assert_eq!(result[0].inventory_end, Decimal::from(-200));
        assert_eq!(result[1].inventory_start, Decimal::from(-200));
        assert_eq!(result[1].inventory_end, Decimal::from(-300));
        assert_eq!(result[2].inventory_start, Decimal::from(-300));

        let shortage = InventoryProjector::first_shortage(&result).unwrap();
        assert_eq!(shortage.week, week(1));
    }

    #[test]
    fn test_recompute_writes_back_and_is_idempotent() {
        let mut first = record(1, 1000, 700, 0);
        first.inventory_start = Decimal::from(2000);
        let mut plan = ArticlePlan::new(
            "ART-001".to_string(),
            vec![first, record(2, 500, 0, 200), record(3, 300, 0, 0)],
        );

        InventoryProjector::recompute(&mut plan, 0, &BaseValues).unwrap();
        let once = plan.clone();
        InventoryProjector::recompute(&mut plan, 0, &BaseValues).unwrap();

        assert_eq!(plan, once);
        assert_eq!(plan.weeks[0].inventory_end, Decimal::from(1000));
        assert_eq!(plan.weeks[1].inventory_start, Decimal::from(1000));
        assert_eq!(plan.weeks[1].inventory_end, Decimal::from(700));
        assert_eq!(plan.weeks[2].inventory_start, Decimal::from(700));
        assert_eq!(plan.weeks[2].inventory_end, Decimal::from(400));
    }

    #[test]
    fn test_recompute_from_middle_uses_previous_end() {
        let mut first = record(1, 100, 0, 0);
        first.inventory_start = Decimal::from(1000);
        let mut plan = ArticlePlan::new(
            "ART-001".to_string(),
            vec![first, record(2, 100, 0, 0), record(3, 100, 0, 0)],
        );
        InventoryProjector::recompute(&mut plan, 0, &BaseValues).unwrap();

        // 修改第 2 週的預測後只重算後半段
        plan.weeks[1].sales_forecast_breakdown.baseline = Decimal::from(400);
        InventoryProjector::recompute(&mut plan, 1, &BaseValues).unwrap();

        assert_eq!(plan.weeks[0].inventory_end, Decimal::from(900));
        assert_eq!(plan.weeks[1].inventory_start, Decimal::from(900));
        assert_eq!(plan.weeks[1].inventory_end, Decimal::from(500));
        assert_eq!(plan.weeks[2].inventory_end, Decimal::from(400));
    }

    #[test]
    fn test_recompute_bounds() {
        let mut plan = ArticlePlan::new("ART-001".to_string(), vec![record(1, 0, 0, 0)]);

        assert!(InventoryProjector::recompute(&mut plan, 1, &BaseValues).is_ok());
        assert!(matches!(
            InventoryProjector::recompute(&mut plan, 2, &BaseValues),
            Err(DispoError::IndexOutOfRange { index: 2, len: 1 })
        ));

        let mut empty = ArticlePlan::new("ART-002".to_string(), Vec::new());
        assert!(InventoryProjector::recompute(&mut empty, 0, &BaseValues).is_ok());
    }

    #[test]
    fn test_project_rejects_unordered_weeks() {
        let plan = ArticlePlan::new(
            "ART-001".to_string(),
            vec![record(5, 0, 0, 0), record(4, 0, 0, 0)],
        );
        assert!(matches!(
            InventoryProjector::project(&plan, &BaseValues),
            Err(DispoError::SequenceOutOfOrder { .. })
        ));
    }
}
