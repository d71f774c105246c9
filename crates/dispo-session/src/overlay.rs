//! 變更覆寫儲存

use std::collections::HashMap;

use chrono::{DateTime, Utc, Weekday};
use dispo_core::{CellRef, Change, ChangeDraft, ChangeKey, DispoError, EffectiveValues};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 新增變更的結果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeOutcome {
    /// 已記錄（取代同鍵的舊變更）
    Recorded(Uuid),
    /// 空變更：清除同鍵的舊變更（如有）
    Cleared(Option<Uuid>),
}

#[derive(Debug, Clone)]
struct StoredChange {
    sequence: u64,
    change: Change,
}

/// 變更覆寫儲存（單一計劃會話）
///
/// 每個 (物料, 儲存格, 日) 鍵最多只有一筆變更。
#[derive(Debug, Default)]
pub struct ChangeStore {
    entries: HashMap<ChangeKey, StoredChange>,
    keys_by_id: HashMap<Uuid, ChangeKey>,
    next_sequence: u64,
}

impl ChangeStore {
    /// 創建空的儲存
    pub fn new() -> Self {
        Self::default()
    }

    /// 新增變更，時間戳為現在
    pub fn add_change(&mut self, draft: ChangeDraft) -> ChangeOutcome {
        self.add_change_at(draft, Utc::now())
    }

    /// 新增變更並指定時間戳
    pub fn add_change_at(&mut self, draft: ChangeDraft, timestamp: DateTime<Utc>) -> ChangeOutcome {
        let key = draft.key();

        if draft.is_noop() {
            let removed = self.remove_key(&key).map(|change| change.id);
            tracing::debug!("物料 {} 空變更，清除舊變更: {:?}", key.article_id, removed);
            return ChangeOutcome::Cleared(removed);
        }

        if let Some(replaced) = self.remove_key(&key) {
            tracing::debug!("物料 {} 取代變更 {}", key.article_id, replaced.id);
        }

        let change = Change::from_draft(draft, timestamp);
        let id = change.id;
        let sequence = self.next_sequence;
        self.next_sequence += 1;

        self.keys_by_id.insert(id, key.clone());
        self.entries.insert(key, StoredChange { sequence, change });

        ChangeOutcome::Recorded(id)
    }

    /// 依 ID 移除變更
    pub fn remove_change(&mut self, id: Uuid) -> dispo_core::Result<Change> {
        let key = self
            .keys_by_id
            .get(&id)
            .cloned()
            .ok_or(DispoError::ChangeNotFound(id))?;

        self.remove_key(&key).ok_or(DispoError::ChangeNotFound(id))
    }

    /// 精確匹配儲存格的變更
    pub fn get_change_for_cell(
        &self,
        article_id: &str,
        cell: &CellRef,
        day: Option<Weekday>,
    ) -> Option<&Change> {
        let key = ChangeKey {
            article_id: article_id.to_string(),
            cell: cell.clone(),
            day,
        };
        self.entries.get(&key).map(|stored| &stored.change)
    }

    /// 有效值：有變更時回傳新值，否則回傳原始值
    pub fn get_effective_value(
        &self,
        article_id: &str,
        cell: &CellRef,
        original: Decimal,
        day: Option<Weekday>,
    ) -> Decimal {
        self.effective_value(article_id, cell, day, original)
    }

    /// 物料的所有變更（最新的在前）
    pub fn get_changes_for_article(&self, article_id: &str) -> Vec<&Change> {
        let mut stored: Vec<&StoredChange> = self
            .entries
            .values()
            .filter(|s| s.change.article_id == article_id)
            .collect();
        stored.sort_by(|a, b| b.sequence.cmp(&a.sequence));
        stored.into_iter().map(|s| &s.change).collect()
    }

    /// 依 ID 取得變更
    pub fn get(&self, id: Uuid) -> Option<&Change> {
        self.keys_by_id
            .get(&id)
            .and_then(|key| self.entries.get(key))
            .map(|stored| &stored.change)
    }

    /// 清除物料的所有變更，回傳清除數量
    pub fn clear_article(&mut self, article_id: &str) -> usize {
        let keys: Vec<ChangeKey> = self
            .entries
            .keys()
            .filter(|k| k.article_id == article_id)
            .cloned()
            .collect();

        for key in &keys {
            self.remove_key(key);
        }
        keys.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn remove_key(&mut self, key: &ChangeKey) -> Option<Change> {
        let stored = self.entries.remove(key)?;
        self.keys_by_id.remove(&stored.change.id);
        Some(stored.change)
    }
}

impl EffectiveValues for ChangeStore {
    fn override_value(&self, article_id: &str, cell: &CellRef, day: Option<Weekday>) -> Option<Decimal> {
        self.get_change_for_cell(article_id, cell, day)
            .map(|change| change.new_value)
    }
}
