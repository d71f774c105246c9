//! 細分彙總

use dispo_core::{
    CellRef, EffectiveValues, ProcurementBreakdown, PromoBreakdown, SalesBreakdown, WeekField,
    WeeklyRecord,
};
use rust_decimal::Decimal;

/// 預測總量 = 基準量 + 紙箱貨 + 陳列架
pub fn forecast_total(breakdown: &SalesBreakdown) -> Decimal {
    breakdown.baseline + breakdown.promo.kartonware + breakdown.promo.displays
}

/// 有效採購量
///
/// 只要已訂購或已交貨（即使只有部分）大於 0，就完全以實際採購量為準，
/// 否則使用採購預測。
pub fn procurement_total(breakdown: &ProcurementBreakdown) -> Decimal {
    let actual = breakdown.ordered + breakdown.delivered;
    if actual > Decimal::ZERO {
        actual
    } else {
        breakdown.forecast
    }
}

/// 細分彙總器（套用覆寫後的有效細分）
pub struct BreakdownAggregator;

impl BreakdownAggregator {
    /// 套用覆寫後的銷售預測細分
    pub fn effective_sales_forecast<V>(
        article_id: &str,
        record: &WeeklyRecord,
        overlay: &V,
    ) -> SalesBreakdown
    where
        V: EffectiveValues + ?Sized,
    {
        let original = &record.sales_forecast_breakdown;
        let resolve = |field: WeekField, value: Decimal| {
            overlay.effective_value(article_id, &CellRef::week(field, record.week), None, value)
        };

        SalesBreakdown {
            baseline: resolve(WeekField::SalesForecastBaseline, original.baseline),
            promo: PromoBreakdown {
                kartonware: resolve(WeekField::PromoKartonware, original.promo.kartonware),
                displays: resolve(WeekField::PromoDisplays, original.promo.displays),
            },
        }
    }

    /// 套用覆寫後的採購細分（只有採購預測可被覆寫）
    pub fn effective_procurement<V>(
        article_id: &str,
        record: &WeeklyRecord,
        overlay: &V,
    ) -> ProcurementBreakdown
    where
        V: EffectiveValues + ?Sized,
    {
        let cell = CellRef::week(WeekField::ProcurementForecast, record.week);
        ProcurementBreakdown {
            forecast: overlay.effective_value(article_id, &cell, None, record.procurement.forecast),
            ..record.procurement
        }
    }

    /// 有效預測總量
    pub fn effective_forecast_total<V>(article_id: &str, record: &WeeklyRecord, overlay: &V) -> Decimal
    where
        V: EffectiveValues + ?Sized,
    {
        forecast_total(&Self::effective_sales_forecast(article_id, record, overlay))
    }

    /// 有效採購總量
    pub fn effective_procurement_total<V>(
        article_id: &str,
        record: &WeeklyRecord,
        overlay: &V,
    ) -> Decimal
    where
        V: EffectiveValues + ?Sized,
    {
        procurement_total(&Self::effective_procurement(article_id, record, overlay))
    }
}
