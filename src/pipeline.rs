//! Preprocessing pipeline: filter, group, rank, and diff against the last list.
//!
//! `process` is pure over its inputs. `process_update` additionally remembers
//! the list it produced so the next call can return an edit script.

use serde::Serialize;

use crate::diff::{diff, EditScript, GroupDiff};
use crate::error::PipelineError;
use crate::preprocess::filter::filter_notifications;
use crate::preprocess::{
    group_notifications, rank_groups, rank_notifications, record_identity, GroupingPolicy,
    NotificationGroup,
};
use crate::types::{CenterConfig, NotificationRecord, RankingSnapshot};

/// An ordered list plus the edits that produce it from the previous one.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListUpdate {
    pub groups: Vec<NotificationGroup>,
    pub edits: EditScript,
}

pub struct Pipeline {
    config: CenterConfig,
    policy: GroupingPolicy,
    previous: Vec<NotificationGroup>,
}

impl Pipeline {
    pub fn new(config: CenterConfig) -> Self {
        let policy = GroupingPolicy::from_config(&config);
        Self {
            config,
            policy,
            previous: Vec::new(),
        }
    }

    pub fn config(&self) -> &CenterConfig {
        &self.config
    }

    /// Turn raw records into ordered display groups.
    pub fn process(
        &self,
        records: Vec<NotificationRecord>,
        snapshot: &RankingSnapshot,
    ) -> Result<Vec<NotificationGroup>, PipelineError> {
        let total = records.len();
        let filtered = filter_notifications(records, snapshot, &self.config);

        let mut groups = if self.config.group_notifications {
            let grouped = group_notifications(filtered, &self.policy)?;
            rank_groups(grouped, snapshot)
        } else {
            rank_notifications(filtered, snapshot)
                .into_iter()
                .map(|record| NotificationGroup::single(record_identity(&record), record))
                .collect()
        };
        drop_childless_summaries(&mut groups);

        log::debug!(
            "Processed {} notifications into {} groups",
            total,
            groups.len()
        );
        Ok(groups)
    }

    /// `process`, then diff against the previously produced list.
    pub fn process_update(
        &mut self,
        records: Vec<NotificationRecord>,
        snapshot: &RankingSnapshot,
    ) -> Result<ListUpdate, PipelineError> {
        let groups = self.process(records, snapshot)?;
        let edits = diff(&self.previous, &groups, &GroupDiff);
        self.previous = groups.clone();
        Ok(ListUpdate { groups, edits })
    }

    /// The list returned by the last `process_update`.
    pub fn previous(&self) -> &[NotificationGroup] {
        &self.previous
    }

    pub fn reset(&mut self) {
        self.previous.clear();
    }
}

/// A summary whose children are all gone has nothing to show.
fn drop_childless_summaries(groups: &mut Vec<NotificationGroup>) {
    groups.retain(|group| {
        let keep = group.child_count() > 0;
        if !keep {
            log::debug!("Dropping group {} with only a summary", group.group_key());
        }
        keep
    });
}
