//! 週次日曆與時態分類

use std::fmt;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::{DispoError, PlanningConfig, Result, WeekField};

/// 日曆週（ISO 週次）
///
/// 排序先比較年份，再比較週次，欄位順序不可調換。
/// 只有 [`WeekId::new`] 與反序列化會驗證週次；直接以結構字面值建構時不驗證。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawWeekId")]
pub struct WeekId {
    /// 年份（ISO 週年）
    pub year: i32,

    /// 週次（1-53）
    pub week: u32,
}

impl WeekId {
    /// 創建週次，驗證該年是否存在此 ISO 週
    pub fn new(year: i32, week: u32) -> Result<Self> {
        if week == 0 || week > Self::weeks_in_year(year) {
            return Err(DispoError::InvalidWeek { year, week });
        }
        Ok(Self { year, week })
    }

    /// 從日期取得所屬的 ISO 週
    pub fn from_date(date: NaiveDate) -> Self {
        let iso = date.iso_week();
        Self {
            year: iso.year(),
            week: iso.week(),
        }
    }

    /// 該 ISO 年共有幾週（52 或 53）
    pub fn weeks_in_year(year: i32) -> u32 {
        if NaiveDate::from_isoywd_opt(year, 53, Weekday::Mon).is_some() {
            53
        } else {
            52
        }
    }

    /// 下一週（跨年時回到第 1 週）
    pub fn succ(&self) -> Self {
        if self.week >= Self::weeks_in_year(self.year) {
            Self {
                year: self.year + 1,
                week: 1,
            }
        } else {
            Self {
                year: self.year,
                week: self.week + 1,
            }
        }
    }

    /// 該週的週一
    pub fn monday(&self) -> Option<NaiveDate> {
        NaiveDate::from_isoywd_opt(self.year, self.week, Weekday::Mon)
    }
}

/// 反序列化用的未驗證週次
#[derive(Deserialize)]
struct RawWeekId {
    year: i32,
    week: u32,
}

impl TryFrom<RawWeekId> for WeekId {
    type Error = DispoError;

    fn try_from(raw: RawWeekId) -> Result<Self> {
        WeekId::new(raw.year, raw.week)
    }
}

impl fmt::Display for WeekId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KW {:02}/{}", self.week, self.year)
    }
}

/// 週次相對於當前週的時態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TemporalState {
    /// 過去週
    Past,
    /// 當前週
    Current,
    /// 未來週
    Future,
}

/// 列的編輯權限
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowEditability {
    /// 唯讀
    ReadOnly,
    /// 當前週與未來週皆可編輯
    Editable,
    /// 僅未來週可編輯（當前週不可）
    EditableInFuture,
}

/// 判斷週次的時態：先比較年份，再比較週次
pub fn get_week_temporal_state(week: WeekId, current: WeekId) -> TemporalState {
    match week.cmp(&current) {
        std::cmp::Ordering::Less => TemporalState::Past,
        std::cmp::Ordering::Equal => TemporalState::Current,
        std::cmp::Ordering::Greater => TemporalState::Future,
    }
}

/// 判斷欄位在指定時態下是否可編輯
///
/// `EditableInFuture` 只在嚴格的未來週可編輯，當前週不算。
pub fn is_editable(policy: RowEditability, state: TemporalState) -> bool {
    match policy {
        RowEditability::ReadOnly => false,
        RowEditability::Editable => state != TemporalState::Past,
        RowEditability::EditableInFuture => state == TemporalState::Future,
    }
}

/// 計劃日曆（以當前週為參考點）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanningCalendar {
    /// 當前週
    pub current: WeekId,
}

impl PlanningCalendar {
    /// 創建計劃日曆
    pub fn new(current: WeekId) -> Self {
        Self { current }
    }

    /// 以今天的日期創建計劃日曆
    pub fn from_date(today: NaiveDate) -> Self {
        Self::new(WeekId::from_date(today))
    }

    /// 分類週次
    pub fn classify(&self, week: WeekId) -> TemporalState {
        get_week_temporal_state(week, self.current)
    }

    /// 檢查欄位在指定週是否可編輯（依配置中的欄位權限）
    pub fn is_field_editable(&self, field: WeekField, week: WeekId, config: &PlanningConfig) -> bool {
        is_editable(config.policy_for(field), self.classify(week))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_week_validation() {
        assert!(WeekId::new(2025, 1).is_ok());
        assert!(WeekId::new(2025, 52).is_ok());
        // 2025 只有 52 週，2026 有 53 週
        assert!(WeekId::new(2025, 53).is_err());
        assert!(WeekId::new(2026, 53).is_ok());
        assert!(WeekId::new(2025, 0).is_err());
    }

    #[test]
    fn test_week_succ_rolls_over() {
        let last_2025 = WeekId::new(2025, 52).unwrap();
        assert_eq!(last_2025.succ(), WeekId::new(2026, 1).unwrap());

        let w53 = WeekId::new(2026, 52).unwrap().succ();
        assert_eq!(w53, WeekId::new(2026, 53).unwrap());
        assert_eq!(w53.succ(), WeekId::new(2027, 1).unwrap());
    }

    #[test]
    fn test_week_from_date() {
        // 2025-10-06 是週一，ISO 第 41 週
        let week = WeekId::from_date(NaiveDate::from_ymd_opt(2025, 10, 6).unwrap());
        assert_eq!(week, WeekId::new(2025, 41).unwrap());
        assert_eq!(week.monday(), NaiveDate::from_ymd_opt(2025, 10, 6));

        // 2024-12-30 屬於 2025 年第 1 週
        let week = WeekId::from_date(NaiveDate::from_ymd_opt(2024, 12, 30).unwrap());
        assert_eq!(week, WeekId::new(2025, 1).unwrap());
    }

    #[test]
    fn test_week_deserialize_validates() {
        let week: WeekId = serde_json::from_str(r#"{"year":2026,"week":53}"#).unwrap();
        assert_eq!(week, WeekId::new(2026, 53).unwrap());

        assert!(serde_json::from_str::<WeekId>(r#"{"year":2025,"week":60}"#).is_err());
        assert!(serde_json::from_str::<WeekId>(r#"{"year":2025,"week":53}"#).is_err());
        assert!(serde_json::from_str::<WeekId>(r#"{"year":2025,"week":0}"#).is_err());

        // 序列化格式不變
        let json = serde_json::to_string(&WeekId::new(2025, 41).unwrap()).unwrap();
        assert_eq!(json, r#"{"year":2025,"week":41}"#);
    }

    #[test]
    fn test_week_label() {
        assert_eq!(WeekId::new(2025, 5).unwrap().to_string(), "KW 05/2025");
    }

    #[rstest]
    #[case(2024, 52, TemporalState::Past)]
    #[case(2025, 9, TemporalState::Past)]
    #[case(2025, 10, TemporalState::Current)]
    #[case(2025, 11, TemporalState::Future)]
    #[case(2026, 1, TemporalState::Future)]
    fn test_temporal_state(#[case] year: i32, #[case] week: u32, #[case] expected: TemporalState) {
        let current = WeekId::new(2025, 10).unwrap();
        let week = WeekId::new(year, week).unwrap();
        assert_eq!(get_week_temporal_state(week, current), expected);
    }

    #[test]
    fn test_year_compared_before_week() {
        // 2024 年第 52 週在 2025 年第 1 週之前，即使週次較大
        let current = WeekId::new(2025, 1).unwrap();
        let week = WeekId::new(2024, 52).unwrap();
        assert_eq!(get_week_temporal_state(week, current), TemporalState::Past);
    }

    #[rstest]
    #[case(RowEditability::ReadOnly, TemporalState::Future, false)]
    #[case(RowEditability::Editable, TemporalState::Past, false)]
    #[case(RowEditability::Editable, TemporalState::Current, true)]
    #[case(RowEditability::Editable, TemporalState::Future, true)]
    #[case(RowEditability::EditableInFuture, TemporalState::Past, false)]
    #[case(RowEditability::EditableInFuture, TemporalState::Current, false)]
    #[case(RowEditability::EditableInFuture, TemporalState::Future, true)]
    fn test_is_editable(
        #[case] policy: RowEditability,
        #[case] state: TemporalState,
        #[case] expected: bool,
    ) {
        assert_eq!(is_editable(policy, state), expected);
    }

    #[test]
    fn test_calendar_field_policy() {
        let config = PlanningConfig::default();
        let calendar = PlanningCalendar::new(WeekId::new(2025, 10).unwrap());
        let current = WeekId::new(2025, 10).unwrap();
        let next = WeekId::new(2025, 11).unwrap();

        // 預測基準量：當前週可編輯
        assert!(calendar.is_field_editable(WeekField::SalesForecastBaseline, current, &config));
        // 採購預測：僅未來週可編輯
        assert!(!calendar.is_field_editable(WeekField::ProcurementForecast, current, &config));
        assert!(calendar.is_field_editable(WeekField::ProcurementForecast, next, &config));
    }
}
