//! A renderable notification card: one record, or a summary header plus children.

use serde::Serialize;

use crate::error::PipelineError;
use crate::types::{NotificationRecord, RenderHint};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationGroup {
    group_key: String,
    package: Option<String>,
    header: Option<NotificationRecord>,
    /// Most recent first.
    children: Vec<NotificationRecord>,
}

impl NotificationGroup {
    pub fn new(group_key: impl Into<String>) -> Self {
        Self {
            group_key: group_key.into(),
            package: None,
            header: None,
            children: Vec::new(),
        }
    }

    /// Wrap a lone record. Summaries become the header of an empty group.
    pub fn single(group_key: impl Into<String>, record: NotificationRecord) -> Self {
        let mut group = Self::new(group_key);
        group.package = Some(record.package().to_string());
        if record.is_group_summary {
            group.header = Some(record);
        } else {
            group.children.push(record);
        }
        group
    }

    /// Add a record: summaries replace the header, everything else is a child.
    ///
    /// Fails if the record belongs to another package than the group.
    pub fn add_notification(&mut self, record: NotificationRecord) -> Result<(), PipelineError> {
        self.check_package(&record)?;
        if record.is_group_summary {
            self.header = Some(record);
        } else {
            self.children.push(record);
            self.children.sort_by(|a, b| b.post_time.cmp(&a.post_time));
        }
        Ok(())
    }

    fn check_package(&mut self, record: &NotificationRecord) -> Result<(), PipelineError> {
        match &self.package {
            Some(package) if package != record.package() => Err(PipelineError::PackageMismatch {
                group: self.group_key.clone(),
                expected: package.clone(),
                found: record.package().to_string(),
            }),
            Some(_) => Ok(()),
            None => {
                self.package = Some(record.package().to_string());
                Ok(())
            }
        }
    }

    pub fn group_key(&self) -> &str {
        &self.group_key
    }

    pub fn package(&self) -> Option<&str> {
        self.package.as_deref()
    }

    pub fn header(&self) -> Option<&NotificationRecord> {
        self.header.as_ref()
    }

    pub fn children(&self) -> &[NotificationRecord] {
        &self.children
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// A header with more than one child.
    pub fn is_multi_group(&self) -> bool {
        self.header.is_some() && self.children.len() > 1
    }

    /// Record whose ranking orders this group: the header, else the most recent child.
    pub fn representative(&self) -> Option<&NotificationRecord> {
        self.header.as_ref().or_else(|| self.children.first())
    }

    /// Record shown when the group is not rendered as a multi-item card.
    pub fn display_record(&self) -> Option<&NotificationRecord> {
        if self.is_multi_group() {
            self.header.as_ref()
        } else {
            self.children.first().or(self.header.as_ref())
        }
    }

    pub fn render_hint(&self) -> RenderHint {
        if self.is_multi_group() {
            return RenderHint::Group;
        }
        self.display_record()
            .map(NotificationRecord::render_hint)
            .unwrap_or(RenderHint::Basic)
    }

    /// Header first, then children in display order.
    pub fn records(&self) -> impl Iterator<Item = &NotificationRecord> {
        self.header.iter().chain(self.children.iter())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.records().any(|r| r.key.key == key)
    }

    pub fn into_records(self) -> Vec<NotificationRecord> {
        self.header.into_iter().chain(self.children).collect()
    }
}
