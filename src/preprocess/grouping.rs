//! Partition records into cards keyed by group identity.

use std::collections::HashMap;

use crate::error::PipelineError;
use crate::types::{CenterConfig, Category, NotificationRecord};

use super::group::NotificationGroup;

/// Which categories may be coalesced into multi-item groups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupingPolicy {
    never_group: Vec<Category>,
}

impl GroupingPolicy {
    pub fn new(never_group: Vec<Category>) -> Self {
        Self { never_group }
    }

    /// Policy that coalesces every category.
    pub fn group_everything() -> Self {
        Self::new(Vec::new())
    }

    pub fn from_config(config: &CenterConfig) -> Self {
        Self::new(config.never_group_categories.clone())
    }

    pub fn may_group(&self, record: &NotificationRecord) -> bool {
        match &record.category {
            Some(category) => !self.never_group.contains(category),
            None => true,
        }
    }
}

impl Default for GroupingPolicy {
    fn default() -> Self {
        Self::from_config(&CenterConfig::default())
    }
}

/// Identity shared by records that belong on one card.
///
/// Declared groups key on group + package; everything else gets a per-record
/// identity under a different prefix, so the two never collide.
pub fn group_identity(record: &NotificationRecord, policy: &GroupingPolicy) -> String {
    match &record.group_key {
        Some(group) if policy.may_group(record) => format!("g:{}|{}", group, record.package()),
        _ => record_identity(record),
    }
}

/// Identity unique to one record.
pub fn record_identity(record: &NotificationRecord) -> String {
    let k = &record.key;
    format!(
        "u:{}|{}|{}|{}|{}",
        k.user,
        k.package,
        k.id,
        k.tag.as_deref().unwrap_or(""),
        k.key
    )
}

/// Group records in first-seen order of their identity.
pub fn group_notifications<I>(
    records: I,
    policy: &GroupingPolicy,
) -> Result<Vec<NotificationGroup>, PipelineError>
where
    I: IntoIterator<Item = NotificationRecord>,
{
    let mut groups: Vec<NotificationGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for record in records {
        let identity = group_identity(&record, policy);
        let slot = match index.get(&identity) {
            Some(&slot) => slot,
            None => {
                groups.push(NotificationGroup::new(identity.clone()));
                index.insert(identity, groups.len() - 1);
                groups.len() - 1
            }
        };
        groups[slot].add_notification(record)?;
    }

    Ok(groups)
}

/// Every record of every group, header first.
pub fn flatten(groups: Vec<NotificationGroup>) -> Vec<NotificationRecord> {
    groups
        .into_iter()
        .flat_map(NotificationGroup::into_records)
        .collect()
}
