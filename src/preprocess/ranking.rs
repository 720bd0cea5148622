//! Ordering of groups and flat records.
//!
//! Both orders are pure functions of the item and the ranking snapshot.
//! Items missing from the snapshot sort last instead of failing.

use std::cmp::Ordering;

use crate::types::{Category, Importance, NotificationRecord, RankingSnapshot};

use super::group::NotificationGroup;

// ---------------------------------------------------------------------------
// Group order
// ---------------------------------------------------------------------------

/// `(unranked, rank)`: ranked groups first, then by ascending rank.
fn group_sort_key(group: &NotificationGroup, snapshot: &RankingSnapshot) -> (bool, i32) {
    match group
        .representative()
        .and_then(|r| snapshot.get(&r.key.key))
    {
        Some(entry) => (false, entry.rank),
        None => (true, 0),
    }
}

pub fn compare_groups(
    a: &NotificationGroup,
    b: &NotificationGroup,
    snapshot: &RankingSnapshot,
) -> Ordering {
    group_sort_key(a, snapshot).cmp(&group_sort_key(b, snapshot))
}

/// Stable sort of groups by their representative's rank.
pub fn rank_groups(
    mut groups: Vec<NotificationGroup>,
    snapshot: &RankingSnapshot,
) -> Vec<NotificationGroup> {
    for group in &groups {
        if group_sort_key(group, snapshot).0 {
            log::debug!(
                "No ranking for group {}, sorting it last",
                group.group_key()
            );
        }
    }
    groups.sort_by(|a, b| compare_groups(a, b, snapshot));
    groups
}

// ---------------------------------------------------------------------------
// Flat order
// ---------------------------------------------------------------------------

/// Priority key compared in descending order:
/// emergency, high importance, warning, information, then importance.
fn flat_sort_key(
    record: &NotificationRecord,
    snapshot: &RankingSnapshot,
) -> (bool, bool, bool, bool, Option<Importance>) {
    let importance = snapshot.importance(&record.key.key);
    (
        record.has_category(&Category::CarEmergency),
        importance == Some(Importance::High),
        record.has_category(&Category::CarWarning),
        record.has_category(&Category::CarInformation),
        importance,
    )
}

pub fn compare_notifications(
    a: &NotificationRecord,
    b: &NotificationRecord,
    snapshot: &RankingSnapshot,
) -> Ordering {
    flat_sort_key(b, snapshot).cmp(&flat_sort_key(a, snapshot))
}

/// Stable sort of records by category and importance.
pub fn rank_notifications(
    mut records: Vec<NotificationRecord>,
    snapshot: &RankingSnapshot,
) -> Vec<NotificationRecord> {
    records.sort_by(|a, b| compare_notifications(a, b, snapshot));
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{grouped, ranked, record, summary, with_category};

    fn single(r: NotificationRecord) -> NotificationGroup {
        NotificationGroup::single(r.key.key.clone(), r)
    }

    #[test]
    fn groups_sort_by_rank() {
        let a = record("pkg", 1, 0);
        let b = record("pkg", 2, 0);
        let c = record("pkg", 3, 0);
        let snapshot = RankingSnapshot::new()
            .with_entry(&a.key.key, Importance::Default, 2)
            .with_entry(&b.key.key, Importance::Default, 0)
            .with_entry(&c.key.key, Importance::Default, 1);

        let ordered = rank_groups(vec![single(a), single(b), single(c)], &snapshot);
        let ids: Vec<i32> = ordered
            .iter()
            .map(|g| g.representative().unwrap().key.id)
            .collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn unranked_groups_sort_last_in_encounter_order() {
        let a = record("pkg", 1, 0);
        let b = record("pkg", 2, 0);
        let c = record("pkg", 3, 0);
        let snapshot = ranked(&[&c], Importance::Default);

        let ordered = rank_groups(vec![single(a), single(b), single(c)], &snapshot);
        let ids: Vec<i32> = ordered
            .iter()
            .map(|g| g.representative().unwrap().key.id)
            .collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn group_uses_header_rank() {
        let header = summary("pkg", 0, "G", 0);
        let child = grouped("pkg", 1, "G", 10);
        let other = record("pkg", 2, 0);
        let snapshot = RankingSnapshot::new()
            .with_entry(&header.key.key, Importance::Default, 0)
            .with_entry(&child.key.key, Importance::Default, 9)
            .with_entry(&other.key.key, Importance::Default, 5);

        let mut group = NotificationGroup::new("g:G|pkg");
        group.add_notification(child).unwrap();
        group.add_notification(header).unwrap();

        let ordered = rank_groups(vec![single(other), group], &snapshot);
        assert_eq!(ordered[0].group_key(), "g:G|pkg");
    }

    #[test]
    fn emergency_beats_high_importance() {
        let emergency = with_category(record("car", 1, 0), Category::CarEmergency);
        let high = record("app", 2, 0);
        let snapshot = RankingSnapshot::new()
            .with_entry(&emergency.key.key, Importance::Default, 1)
            .with_entry(&high.key.key, Importance::High, 0);

        let ordered = rank_notifications(vec![high, emergency], &snapshot);
        assert_eq!(ordered[0].key.id, 1);
    }

    #[test]
    fn flat_rule_order() {
        let info = with_category(record("car", 1, 0), Category::CarInformation);
        let warning = with_category(record("car", 2, 0), Category::CarWarning);
        let high = record("app", 3, 0);
        let low = record("app", 4, 0);
        let default = record("app", 5, 0);
        let snapshot = RankingSnapshot::new()
            .with_entry(&info.key.key, Importance::Low, 0)
            .with_entry(&warning.key.key, Importance::Low, 0)
            .with_entry(&high.key.key, Importance::High, 0)
            .with_entry(&low.key.key, Importance::Low, 0)
            .with_entry(&default.key.key, Importance::Default, 0);

        let ordered = rank_notifications(vec![low, default, info, warning, high], &snapshot);
        let ids: Vec<i32> = ordered.iter().map(|r| r.key.id).collect();
        assert_eq!(ids, vec![3, 2, 1, 5, 4]);
    }

    #[test]
    fn missing_importance_sorts_after_min() {
        let known = record("app", 1, 0);
        let unknown = record("app", 2, 0);
        let snapshot = RankingSnapshot::new().with_entry(&known.key.key, Importance::Min, 0);

        let ordered = rank_notifications(vec![unknown, known], &snapshot);
        assert_eq!(ordered[0].key.id, 1);
    }

    #[test]
    fn flat_order_is_antisymmetric_and_stable() {
        let records = vec![
            with_category(record("car", 1, 0), Category::CarEmergency),
            with_category(record("car", 2, 0), Category::CarWarning),
            record("app", 3, 0),
            record("app", 4, 0),
            with_category(record("car", 5, 0), Category::CarInformation),
            record("app", 6, 0),
        ];
        let snapshot = RankingSnapshot::new()
            .with_entry(&records[0].key.key, Importance::Low, 0)
            .with_entry(&records[1].key.key, Importance::High, 0)
            .with_entry(&records[2].key.key, Importance::High, 0)
            .with_entry(&records[3].key.key, Importance::Default, 0)
            .with_entry(&records[5].key.key, Importance::Default, 0);

        for a in &records {
            assert_eq!(compare_notifications(a, a, &snapshot), Ordering::Equal);
            for b in &records {
                let ab = compare_notifications(a, b, &snapshot);
                let ba = compare_notifications(b, a, &snapshot);
                assert_eq!(ab, ba.reverse(), "{} vs {}", a.key, b.key);
            }
        }

        let ordered = rank_notifications(records, &snapshot);
        let ids: Vec<i32> = ordered.iter().map(|r| r.key.id).collect();
        // Information outranks plain importance; 4 and 6 tie and keep encounter order.
        assert_eq!(ids, vec![1, 2, 3, 5, 4, 6]);
    }
}
