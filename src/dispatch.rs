//! Click and action dispatch for the view layer.
//!
//! The pipeline never sends intents itself. It hands the view layer callbacks
//! that send through the host dispatcher and log failures instead of
//! propagating them.

use std::sync::Arc;

use crate::error::DispatchError;
use crate::types::{NotificationRecord, RecordKey};

/// Sends the content intent (`None`) or an action intent of a record.
pub trait ActionDispatcher: Send + Sync {
    fn send(&self, key: &RecordKey, action_index: Option<usize>) -> Result<(), DispatchError>;
}

/// Send and log. Returns whether the intent went out.
pub fn dispatch_or_log(
    dispatcher: &dyn ActionDispatcher,
    record: &NotificationRecord,
    action_index: Option<usize>,
) -> bool {
    if let Some(index) = action_index {
        if index >= record.actions.len() {
            log::warn!(
                "Action {} out of range for {} ({} actions)",
                index,
                record.key,
                record.actions.len()
            );
            return false;
        }
    }

    match dispatcher.send(&record.key, action_index) {
        Ok(()) => true,
        Err(e) => {
            log::warn!("Dispatch for {} failed: {}", record.key, e);
            false
        }
    }
}

/// Callback the view layer binds to a card or an action button.
pub fn click_handler(
    dispatcher: Arc<dyn ActionDispatcher>,
    record: &NotificationRecord,
    action_index: Option<usize>,
) -> impl Fn() -> bool + Send + Sync {
    let record = record.clone();
    move || dispatch_or_log(dispatcher.as_ref(), &record, action_index)
}
