//! Heads-up overlay: eligibility and the single visible slot.
//!
//! At most one heads-up is visible. Showing a new one replaces the current
//! one and cancels its dismissal timer. Timers do not touch the slot: they
//! report an expiry that the owner applies on its own queue. A generation
//! counter makes an expiry for an older heads-up a no-op.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::types::{Category, HeadsUpConfig, Importance, NotificationRecord, RankingSnapshot};

/// Whether a newly posted record should pop up over the current screen.
///
/// Ongoing and summary records are excluded before any inclusion rule.
pub fn should_show_heads_up(record: &NotificationRecord, snapshot: &RankingSnapshot) -> bool {
    if record.ongoing || record.foreground {
        return false;
    }
    if record.is_group_summary {
        return false;
    }
    if snapshot
        .importance(&record.key.key)
        .is_some_and(|importance| importance >= Importance::High)
    {
        return true;
    }
    record.has_category(&Category::CarEmergency) || record.has_category(&Category::CarWarning)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DismissReason {
    Timeout,
    Removed,
    /// A ranking update no longer lists the record.
    Excluded,
    Reset,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum HeadsUpChange {
    Shown { key: String },
    /// The visible heads-up was reposted; content refreshed, timer restarted.
    Updated { key: String },
    Replaced { previous: String, key: String },
    Dismissed { key: String, reason: DismissReason },
}

/// Sent by a dismissal timer when its heads-up is still the visible one.
///
/// The owner hands it back to `HeadsUpManager::expire` from its own queue, so
/// the slot only ever changes on that queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadsUpExpiry {
    key: String,
    generation: u64,
}

impl HeadsUpExpiry {
    pub fn key(&self) -> &str {
        &self.key
    }
}

#[derive(Debug, Default)]
struct Slot {
    record: Option<NotificationRecord>,
    generation: u64,
}

pub struct HeadsUpManager {
    config: HeadsUpConfig,
    slot: Arc<Mutex<Slot>>,
    dismissal: Option<JoinHandle<()>>,
    expiries: mpsc::UnboundedSender<HeadsUpExpiry>,
}

impl HeadsUpManager {
    pub fn new(config: HeadsUpConfig, expiries: mpsc::UnboundedSender<HeadsUpExpiry>) -> Self {
        Self {
            config,
            slot: Arc::new(Mutex::new(Slot::default())),
            dismissal: None,
            expiries,
        }
    }

    /// Show `record`, replacing whatever is visible.
    ///
    /// Returns `None` when heads-ups are disabled. Must be called inside a
    /// tokio runtime; the dismissal timer is a spawned task.
    pub fn show(&mut self, record: NotificationRecord) -> Option<HeadsUpChange> {
        if !self.config.enabled {
            return None;
        }

        let key = record.key.key.clone();
        let (change, generation) = {
            let mut slot = self.slot.lock();
            let change = match slot.record.as_ref() {
                Some(current) if current.key.key == key => {
                    HeadsUpChange::Updated { key: key.clone() }
                }
                Some(current) => HeadsUpChange::Replaced {
                    previous: current.key.key.clone(),
                    key: key.clone(),
                },
                None => HeadsUpChange::Shown { key: key.clone() },
            };
            slot.record = Some(record);
            slot.generation += 1;
            (change, slot.generation)
        };

        self.schedule_dismissal(key, generation);
        Some(change)
    }

    fn schedule_dismissal(&mut self, key: String, generation: u64) {
        self.cancel_dismissal();

        let slot = Arc::clone(&self.slot);
        let expiries = self.expiries.clone();
        let duration = Duration::from_millis(self.config.duration_ms);
        self.dismissal = Some(tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            if slot.lock().generation != generation {
                return;
            }
            log::debug!("Heads-up {} timed out", key);
            if expiries.send(HeadsUpExpiry { key, generation }).is_err() {
                log::debug!("Heads-up expiry receiver dropped");
            }
        }));
    }

    fn cancel_dismissal(&mut self) {
        if let Some(handle) = self.dismissal.take() {
            handle.abort();
        }
    }

    /// Apply a timer expiry. Stale expiries (the slot moved on) change nothing.
    pub fn expire(&mut self, expiry: HeadsUpExpiry) -> Option<HeadsUpChange> {
        let mut slot = self.slot.lock();
        if slot.generation != expiry.generation {
            return None;
        }
        let record = slot.record.take()?;
        slot.generation += 1;
        drop(slot);
        self.dismissal = None;
        Some(HeadsUpChange::Dismissed {
            key: record.key.key,
            reason: DismissReason::Timeout,
        })
    }

    /// Hide the heads-up for `key` if it is the visible one.
    pub fn dismiss(&mut self, key: &str, reason: DismissReason) -> Option<HeadsUpChange> {
        {
            let mut slot = self.slot.lock();
            match slot.record.as_ref() {
                Some(current) if current.key.key == key => {
                    slot.record = None;
                    slot.generation += 1;
                }
                _ => return None,
            }
        }
        self.cancel_dismissal();
        Some(HeadsUpChange::Dismissed {
            key: key.to_string(),
            reason,
        })
    }

    /// Hide whatever is visible.
    pub fn clear(&mut self) -> Option<HeadsUpChange> {
        let previous = {
            let mut slot = self.slot.lock();
            slot.generation += 1;
            slot.record.take()
        };
        self.cancel_dismissal();
        previous.map(|record| HeadsUpChange::Dismissed {
            key: record.key.key,
            reason: DismissReason::Reset,
        })
    }

    pub fn current(&self) -> Option<NotificationRecord> {
        self.slot.lock().record.clone()
    }

    pub fn current_key(&self) -> Option<String> {
        self.slot.lock().record.as_ref().map(|r| r.key.key.clone())
    }
}

impl Drop for HeadsUpManager {
    fn drop(&mut self) {
        self.cancel_dismissal();
    }
}
