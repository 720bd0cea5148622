//! Capability checks supplied by the host platform.

use crate::types::{Category, NotificationRecord, NotificationStyle, SemanticAction};

/// Answers what the car can do with a record. Treated as opaque by the pipeline.
pub trait CapabilityChecker: Send + Sync {
    /// Messaging notification the car can read out and reply to.
    fn is_message_capable(&self, record: &NotificationRecord) -> bool;

    fn is_voice_action_supported(&self, action: SemanticAction) -> bool;
}

/// Built-in checker: a messaging notification with a supported Reply action.
#[derive(Debug, Clone)]
pub struct DefaultCapabilities {
    voice_actions: Vec<SemanticAction>,
}

impl DefaultCapabilities {
    pub fn new(voice_actions: Vec<SemanticAction>) -> Self {
        Self { voice_actions }
    }
}

impl Default for DefaultCapabilities {
    fn default() -> Self {
        Self::new(vec![SemanticAction::Reply, SemanticAction::MarkAsRead])
    }
}

impl CapabilityChecker for DefaultCapabilities {
    fn is_message_capable(&self, record: &NotificationRecord) -> bool {
        let messaging = record.style == NotificationStyle::Messaging
            || record.has_category(&Category::Message);
        messaging
            && record.actions.iter().any(|a| {
                a.semantic_action == SemanticAction::Reply
                    && self.is_voice_action_supported(a.semantic_action)
            })
    }

    fn is_voice_action_supported(&self, action: SemanticAction) -> bool {
        self.voice_actions.contains(&action)
    }
}
