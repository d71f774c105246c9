//! 計劃會話

use std::collections::HashMap;

use dispo_calc::{ForecastEstimator, InventoryProjector, WeekProjection};
use dispo_core::{
    ArticlePlan, CellRef, Change, ChangeDraft, DispoError, PlanningCalendar, PlanningConfig,
    WeekId,
};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::dirty_tracking::DirtyTracker;
use crate::overlay::{ChangeOutcome, ChangeStore};
use crate::po_link::PoLinkRegistry;

/// 單一計劃會話
///
/// 持有變更儲存、採購單連結與物料計劃。變更不會自動觸發重算，
/// 呼叫端必須在變更後呼叫 [`PlanningSession::refresh`]。
#[derive(Debug)]
pub struct PlanningSession {
    config: PlanningConfig,
    calendar: PlanningCalendar,
    changes: ChangeStore,
    links: PoLinkRegistry,
    dirty: DirtyTracker,
    plans: HashMap<String, ArticlePlan>,
}

impl PlanningSession {
    /// 創建新的會話
    pub fn new(config: PlanningConfig, calendar: PlanningCalendar) -> dispo_core::Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            calendar,
            changes: ChangeStore::new(),
            links: PoLinkRegistry::new(),
            dirty: DirtyTracker::new(),
            plans: HashMap::new(),
        })
    }

    /// 載入物料計劃並推算一次
    pub fn load_plan(&mut self, mut plan: ArticlePlan) -> dispo_core::Result<()> {
        InventoryProjector::recompute(&mut plan, 0, &self.changes)?;

        tracing::info!(
            "載入物料 {} 計劃：{} 週，初始庫存 {}",
            plan.article_id,
            plan.len(),
            plan.initial_inventory()
        );

        self.dirty.clear_article(&plan.article_id);
        self.plans.insert(plan.article_id.clone(), plan);
        Ok(())
    }

    /// 接受使用者變更
    ///
    /// 週次欄位必須在當前時態下可編輯；影響庫存的欄位會將該週標記為髒。
    pub fn accept_change(&mut self, draft: ChangeDraft) -> dispo_core::Result<ChangeOutcome> {
        let article_id = draft.article_id.clone();
        let dirty_week = match &draft.cell {
            CellRef::Week { field, week } => {
                if !self.calendar.is_field_editable(*field, *week, &self.config) {
                    tracing::warn!("物料 {} 欄位 {:?} 在 {} 不可編輯", article_id, field, week);
                    return Err(DispoError::NotEditable {
                        field: *field,
                        week: *week,
                    });
                }
                field.affects_inventory().then_some(*week)
            }
            CellRef::Order { .. } => None,
        };

        let outcome = self.changes.add_change(draft);
        if let Some(week) = dirty_week {
            self.dirty.mark_dirty(&article_id, week);
        }

        tracing::debug!("物料 {} 變更結果: {:?}", article_id, outcome);
        Ok(outcome)
    }

    /// 拒絕（移除）變更
    pub fn reject_change(&mut self, id: Uuid) -> dispo_core::Result<Change> {
        let change = self.changes.remove_change(id)?;
        if let CellRef::Week { field, week } = &change.cell {
            if field.affects_inventory() {
                self.dirty.mark_dirty(&change.article_id, *week);
            }
        }
        Ok(change)
    }

    /// 重新推算所有髒物料，回傳已重算的物料ID
    ///
    /// 某個物料重算失敗時，它與尚未處理的物料都保留髒標記。
    pub fn refresh(&mut self) -> dispo_core::Result<Vec<String>> {
        let dirty = self.dirty.take_dirty();
        let mut refreshed = Vec::new();

        for (position, (article_id, from_week)) in dirty.iter().enumerate() {
            let Some(plan) = self.plans.get_mut(article_id) else {
                tracing::debug!("物料 {} 未載入計劃，略過重算", article_id);
                continue;
            };

            let from_index = plan
                .weeks
                .iter()
                .position(|w| w.week >= *from_week)
                .unwrap_or(plan.weeks.len());

            if let Err(err) = InventoryProjector::recompute(plan, from_index, &self.changes) {
                tracing::warn!("物料 {} 重算失敗: {}", article_id, err);
                for (pending, week) in &dirty[position..] {
                    self.dirty.mark_dirty(pending, *week);
                }
                return Err(err);
            }
            refreshed.push(article_id.clone());
        }

        if !refreshed.is_empty() {
            tracing::info!("重算物料 {} 個: {:?}", refreshed.len(), refreshed);
        }
        Ok(refreshed)
    }

    /// 物料的庫存推算（套用會話中的變更）
    pub fn projection(&self, article_id: &str) -> dispo_core::Result<Vec<WeekProjection>> {
        let plan = self.require_plan(article_id)?;
        InventoryProjector::project(plan, &self.changes)
    }

    /// 物料非過去週的系統建議基準量
    pub fn suggested_baselines(&self, article_id: &str) -> dispo_core::Result<Vec<(WeekId, Decimal)>> {
        let plan = self.require_plan(article_id)?;
        ForecastEstimator::suggested_baselines(plan, &self.calendar, &self.config, &self.changes)
    }

    /// 物料是否有待重算的變更
    pub fn is_dirty(&self, article_id: &str) -> bool {
        self.dirty.is_dirty(article_id)
    }

    pub fn plan(&self, article_id: &str) -> Option<&ArticlePlan> {
        self.plans.get(article_id)
    }

    pub fn changes(&self) -> &ChangeStore {
        &self.changes
    }

    pub fn links(&self) -> &PoLinkRegistry {
        &self.links
    }

    /// 採購單連結不影響庫存推算，不產生髒標記
    pub fn links_mut(&mut self) -> &mut PoLinkRegistry {
        &mut self.links
    }

    pub fn calendar(&self) -> &PlanningCalendar {
        &self.calendar
    }

    pub fn config(&self) -> &PlanningConfig {
        &self.config
    }

    fn require_plan(&self, article_id: &str) -> dispo_core::Result<&ArticlePlan> {
        self.plans
            .get(article_id)
            .ok_or_else(|| DispoError::ArticleNotFound(article_id.to_string()))
    }
}
