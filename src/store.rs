//! Active notifications and the latest ranking snapshot.
//!
//! Records keep their posting order; a repost replaces the record in place.
//! A ranking update that no longer lists a record removes it.

use std::collections::HashMap;
use std::sync::Arc;

use crate::types::{NotificationRecord, RankingSnapshot};

#[derive(Debug, Default)]
pub struct NotificationStore {
    order: Vec<String>,
    records: HashMap<String, NotificationRecord>,
    ranking: Arc<RankingSnapshot>,
}

impl NotificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a record. Returns the record it replaced.
    pub fn on_posted(&mut self, record: NotificationRecord) -> Option<NotificationRecord> {
        let key = record.key.key.clone();
        let previous = self.records.insert(key.clone(), record);
        if previous.is_none() {
            self.order.push(key);
        }
        previous
    }

    pub fn on_removed(&mut self, key: &str) -> Option<NotificationRecord> {
        let removed = self.records.remove(key);
        if removed.is_some() {
            self.order.retain(|k| k != key);
        }
        removed
    }

    /// Swap in a new snapshot and drop records it no longer ranks.
    pub fn on_ranking_update(&mut self, snapshot: RankingSnapshot) -> Vec<NotificationRecord> {
        let excluded: Vec<String> = self
            .order
            .iter()
            .filter(|key| !snapshot.contains(key))
            .cloned()
            .collect();

        self.ranking = Arc::new(snapshot);

        let removed: Vec<NotificationRecord> = excluded
            .iter()
            .filter_map(|key| self.on_removed(key))
            .collect();
        if !removed.is_empty() {
            log::info!(
                "Ranking update dropped {} notification(s) no longer ranked",
                removed.len()
            );
        }
        removed
    }

    pub fn get(&self, key: &str) -> Option<&NotificationRecord> {
        self.records.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.records.contains_key(key)
    }

    /// Records in posting order.
    pub fn iter(&self) -> impl Iterator<Item = &NotificationRecord> {
        self.order.iter().filter_map(|key| self.records.get(key))
    }

    pub fn records(&self) -> Vec<NotificationRecord> {
        self.iter().cloned().collect()
    }

    pub fn ranking(&self) -> Arc<RankingSnapshot> {
        Arc::clone(&self.ranking)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.records.clear();
        self.ranking = Arc::new(RankingSnapshot::default());
    }
}
