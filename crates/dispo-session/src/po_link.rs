//! 採購單與採購預測週的連結

use std::collections::{BTreeMap, HashMap};

use dispo_core::{DispoError, PurchaseOrder, WeekId};

/// 單一物料的連結狀態
#[derive(Debug, Clone, Default)]
struct ArticleLinks {
    /// 未連結的採購單（按載入順序）
    unlinked: Vec<PurchaseOrder>,
    /// 週 → 已連結的採購單
    linked: BTreeMap<WeekId, PurchaseOrder>,
}

impl ArticleLinks {
    fn linked_week_of(&self, po_nummer: &str) -> Option<WeekId> {
        self.linked
            .iter()
            .find(|(_, po)| po.po_nummer == po_nummer)
            .map(|(week, _)| *week)
    }

    fn return_to_pool(&mut self, mut po: PurchaseOrder) -> PurchaseOrder {
        po.mark_unlinked();
        self.unlinked.push(po.clone());
        po
    }
}

/// 採購單連結登記表
///
/// 一張採購單同時只連結一週，一週同時只連結一張採購單；
/// 採購單號不會同時出現在未連結池與連結表中。
#[derive(Debug, Default)]
pub struct PoLinkRegistry {
    articles: HashMap<String, ArticleLinks>,
}

impl PoLinkRegistry {
    /// 創建空的登記表
    pub fn new() -> Self {
        Self::default()
    }

    /// 載入物料的採購單（全部進入未連結池）
    ///
    /// 已在池中的同號採購單會被取代；已連結的同號採購單保持不變。
    pub fn load_purchase_orders(&mut self, article_id: &str, orders: Vec<PurchaseOrder>) {
        let links = self.articles.entry(article_id.to_string()).or_default();

        for mut po in orders {
            if let Some(week) = links.linked_week_of(&po.po_nummer) {
                tracing::warn!(
                    "採購單 {} 已連結到 {}，忽略重新載入",
                    po.po_nummer,
                    week
                );
                continue;
            }

            po.mark_unlinked();
            match links.unlinked.iter_mut().find(|p| p.po_nummer == po.po_nummer) {
                Some(existing) => *existing = po,
                None => links.unlinked.push(po),
            }
        }

        tracing::debug!(
            "物料 {} 未連結採購單 {} 張",
            article_id,
            links.unlinked.len()
        );
    }

    /// 將未連結的採購單連結到週
    ///
    /// 若該週已連結其他採購單，舊的採購單回到未連結池（數量保留）並回傳。
    pub fn link_po(
        &mut self,
        article_id: &str,
        week: WeekId,
        po_nummer: &str,
    ) -> dispo_core::Result<Option<PurchaseOrder>> {
        let links = self
            .articles
            .get_mut(article_id)
            .ok_or_else(|| DispoError::ArticleNotFound(article_id.to_string()))?;

        let Some(position) = links.unlinked.iter().position(|p| p.po_nummer == po_nummer) else {
            return Err(match links.linked_week_of(po_nummer) {
                Some(linked_week) => DispoError::PurchaseOrderAlreadyLinked {
                    po_nummer: po_nummer.to_string(),
                    week: linked_week,
                },
                None => DispoError::PurchaseOrderNotFound(po_nummer.to_string()),
            });
        };

        let mut po = links.unlinked.remove(position);
        po.mark_linked(week);

        let displaced = links
            .linked
            .insert(week, po)
            .map(|old| links.return_to_pool(old));

        match &displaced {
            Some(old) => tracing::info!(
                "物料 {} {} 改連結採購單 {}（取代 {}）",
                article_id,
                week,
                po_nummer,
                old.po_nummer
            ),
            None => tracing::info!("物料 {} {} 連結採購單 {}", article_id, week, po_nummer),
        }

        Ok(displaced)
    }

    /// 解除週的連結，採購單回到未連結池（數量保留）
    pub fn unlink(&mut self, article_id: &str, week: WeekId) -> dispo_core::Result<PurchaseOrder> {
        let links = self
            .articles
            .get_mut(article_id)
            .ok_or_else(|| DispoError::ArticleNotFound(article_id.to_string()))?;

        let po = links
            .linked
            .remove(&week)
            .ok_or(DispoError::WeekNotLinked(week))?;

        tracing::info!("物料 {} {} 解除連結採購單 {}", article_id, week, po.po_nummer);
        Ok(links.return_to_pool(po))
    }

    /// 解除連結，並驗證該週連結的是指定的採購單
    pub fn unlink_po(
        &mut self,
        article_id: &str,
        week: WeekId,
        po_nummer: &str,
    ) -> dispo_core::Result<PurchaseOrder> {
        let linked = self
            .get_linked_po(article_id, week)
            .ok_or(DispoError::WeekNotLinked(week))?;

        if linked.po_nummer != po_nummer {
            return Err(DispoError::LinkMismatch {
                week,
                expected: po_nummer.to_string(),
                actual: linked.po_nummer.clone(),
            });
        }

        self.unlink(article_id, week)
    }

    /// 週是否已連結採購單
    pub fn is_linked(&self, article_id: &str, week: WeekId) -> bool {
        self.get_linked_po(article_id, week).is_some()
    }

    /// 採購預測週是否已連結採購單
    pub fn is_forecast_linked(&self, article_id: &str, week: WeekId) -> bool {
        self.is_linked(article_id, week)
    }

    /// 週連結的採購單
    pub fn get_linked_po(&self, article_id: &str, week: WeekId) -> Option<&PurchaseOrder> {
        self.articles
            .get(article_id)
            .and_then(|links| links.linked.get(&week))
    }

    /// 物料的未連結採購單
    pub fn get_unlinked_pos(&self, article_id: &str) -> &[PurchaseOrder] {
        self.articles
            .get(article_id)
            .map(|links| links.unlinked.as_slice())
            .unwrap_or(&[])
    }

    /// 物料所有已連結的週（按週排序）
    pub fn linked_weeks(&self, article_id: &str) -> Vec<(WeekId, &PurchaseOrder)> {
        self.articles
            .get(article_id)
            .map(|links| links.linked.iter().map(|(week, po)| (*week, po)).collect())
            .unwrap_or_default()
    }
}
