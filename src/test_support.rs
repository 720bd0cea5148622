//! Record fixtures shared by unit tests.

use chrono::{DateTime, TimeZone, Utc};

use crate::types::{
    Category, Importance, NotificationAction, NotificationRecord, NotificationStyle,
    RankingSnapshot, RecordKey, SemanticAction,
};

/// Fixed base time plus `secs`, so post-time ordering is deterministic.
pub fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
}

pub fn record(package: &str, id: i32, secs: i64) -> NotificationRecord {
    NotificationRecord::new(RecordKey::new(package, None, id, 0), at(secs))
}

pub fn grouped(package: &str, id: i32, group: &str, secs: i64) -> NotificationRecord {
    let mut r = record(package, id, secs);
    r.group_key = Some(group.to_string());
    r
}

pub fn summary(package: &str, id: i32, group: &str, secs: i64) -> NotificationRecord {
    let mut r = grouped(package, id, group, secs);
    r.is_group_summary = true;
    r
}

pub fn with_category(mut r: NotificationRecord, category: Category) -> NotificationRecord {
    r.category = Some(category);
    r
}

/// A messaging-style record with a Reply action.
pub fn message(package: &str, id: i32, secs: i64) -> NotificationRecord {
    let mut r = with_category(record(package, id, secs), Category::Message);
    r.style = NotificationStyle::Messaging;
    r.actions.push(NotificationAction {
        title: "Reply".to_string(),
        semantic_action: SemanticAction::Reply,
        has_remote_input: true,
    });
    r
}

/// Snapshot ranking `records` in the given order with one importance.
pub fn ranked(records: &[&NotificationRecord], importance: Importance) -> RankingSnapshot {
    records
        .iter()
        .enumerate()
        .fold(RankingSnapshot::new(), |snap, (i, r)| {
            snap.with_entry(&r.key.key, importance, i as i32)
        })
}
