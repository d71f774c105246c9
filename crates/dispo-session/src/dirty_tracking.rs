//! 髒標記追蹤（每個物料最早受影響的週）

use std::collections::HashMap;

use dispo_core::WeekId;

/// 髒標記追蹤器
#[derive(Debug, Default)]
pub struct DirtyTracker {
    dirty_articles: HashMap<String, WeekId>,
}

impl DirtyTracker {
    /// 創建新的追蹤器
    pub fn new() -> Self {
        Self::default()
    }

    /// 標記物料自某週起為髒（保留最早的週）
    pub fn mark_dirty(&mut self, article_id: &str, week: WeekId) {
        self.dirty_articles
            .entry(article_id.to_string())
            .and_modify(|earliest| *earliest = (*earliest).min(week))
            .or_insert(week);
    }

    /// 檢查物料是否為髒
    pub fn is_dirty(&self, article_id: &str) -> bool {
        self.dirty_articles.contains_key(article_id)
    }

    /// 物料最早的髒週
    pub fn dirty_from(&self, article_id: &str) -> Option<WeekId> {
        self.dirty_articles.get(article_id).copied()
    }

    /// 清除物料的髒標記
    pub fn clear_article(&mut self, article_id: &str) {
        self.dirty_articles.remove(article_id);
    }

    /// 取出並清除所有髒標記（按物料ID排序）
    pub fn take_dirty(&mut self) -> Vec<(String, WeekId)> {
        let mut dirty: Vec<(String, WeekId)> = self.dirty_articles.drain().collect();
        dirty.sort();
        dirty
    }

    pub fn is_empty(&self) -> bool {
        self.dirty_articles.is_empty()
    }
}
