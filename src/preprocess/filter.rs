//! Records that never reach the list: media playback cards and low-importance
//! foreground service notifications.

use crate::types::{CenterConfig, Importance, NotificationRecord, RankingSnapshot};

/// Foreground notification below `Default` importance.
pub fn is_less_important_foreground(
    record: &NotificationRecord,
    snapshot: &RankingSnapshot,
) -> bool {
    record.foreground
        && snapshot
            .importance(&record.key.key)
            .is_some_and(|importance| importance < Importance::Default)
}

pub fn filter_notifications(
    records: Vec<NotificationRecord>,
    snapshot: &RankingSnapshot,
    config: &CenterConfig,
) -> Vec<NotificationRecord> {
    let before = records.len();
    let kept: Vec<NotificationRecord> = records
        .into_iter()
        .filter(|r| !(config.filter_media && r.is_media()))
        .filter(|r| config.show_less_important || !is_less_important_foreground(r, snapshot))
        .collect();

    if kept.len() < before {
        log::debug!("Filtered {} of {} notifications", before - kept.len(), before);
    }
    kept
}
