//! Per-notification mute state for messaging notifications.
//!
//! Entries are created lazily the first time a message-capable record is
//! seen and live until the session is reset.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

use crate::capability::CapabilityChecker;
use crate::types::NotificationRecord;

/// Outcome of a mute toggle request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MuteToggle {
    Muted,
    Unmuted,
    /// Record was never registered; nothing changed.
    Unknown,
    /// Record is not a messaging notification; nothing changed.
    NotMessage,
}

pub struct MuteTracker {
    capabilities: Arc<dyn CapabilityChecker>,
    muted: HashMap<String, bool>,
}

impl MuteTracker {
    pub fn new(capabilities: Arc<dyn CapabilityChecker>) -> Self {
        Self {
            capabilities,
            muted: HashMap::new(),
        }
    }

    /// Register a messaging record as unmuted unless already known.
    pub fn add_new_message_notification(&mut self, record: &NotificationRecord) {
        if self.capabilities.is_message_capable(record) {
            self.muted.entry(record.key.key.clone()).or_insert(false);
        }
    }

    pub fn is_message_notification_muted(&mut self, record: &NotificationRecord) -> bool {
        if !self.muted.contains_key(&record.key.key) {
            self.add_new_message_notification(record);
        }
        self.muted.get(&record.key.key).copied().unwrap_or(false)
    }

    pub fn toggle_mute(&mut self, record: &NotificationRecord) -> MuteToggle {
        if !self.capabilities.is_message_capable(record) {
            return MuteToggle::NotMessage;
        }
        match self.muted.get_mut(&record.key.key) {
            Some(muted) => {
                *muted = !*muted;
                if *muted {
                    MuteToggle::Muted
                } else {
                    MuteToggle::Unmuted
                }
            }
            None => {
                log::warn!(
                    "Mute toggled for unregistered notification {}, ignoring",
                    record.key
                );
                MuteToggle::Unknown
            }
        }
    }

    pub fn len(&self) -> usize {
        self.muted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.muted.is_empty()
    }

    pub fn clear(&mut self) {
        self.muted.clear();
    }
}
