use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Configuration
// =============================================================================

/// Configuration stored in ~/.carnotif/config.json
///
/// Every field has a default so a partial (or missing) file is valid.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CenterConfig {
    /// Coalesce records that share a group key into multi-item cards.
    /// When false the flat ranking path is used instead.
    #[serde(default = "default_true")]
    pub group_notifications: bool,
    /// Categories whose records are never coalesced into multi-item groups.
    #[serde(default = "default_never_group_categories")]
    pub never_group_categories: Vec<Category>,
    /// Keep foreground notifications below `Default` importance in the list.
    #[serde(default)]
    pub show_less_important: bool,
    /// Drop media notifications (the media center shows them).
    #[serde(default = "default_true")]
    pub filter_media: bool,
    #[serde(default)]
    pub heads_up: HeadsUpConfig,
}

impl Default for CenterConfig {
    fn default() -> Self {
        Self {
            group_notifications: true,
            never_group_categories: default_never_group_categories(),
            show_less_important: false,
            filter_media: true,
            heads_up: HeadsUpConfig::default(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_never_group_categories() -> Vec<Category> {
    vec![Category::CarEmergency, Category::System]
}

/// Heads-up overlay settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadsUpConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// How long a heads-up stays visible before it is dismissed.
    #[serde(default = "default_heads_up_duration_ms")]
    pub duration_ms: u64,
}

impl Default for HeadsUpConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            duration_ms: default_heads_up_duration_ms(),
        }
    }
}

fn default_heads_up_duration_ms() -> u64 {
    8000
}

// =============================================================================
// Records
// =============================================================================

/// Identity of a posted notification.
///
/// `key` is unique per record and addresses the store and ranking snapshot.
/// Package, tag, id and user identify the *same notification* across reposts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordKey {
    pub key: String,
    pub package: String,
    #[serde(default)]
    pub tag: Option<String>,
    pub id: i32,
    #[serde(default)]
    pub user: i32,
}

impl RecordKey {
    /// Build an identity, synthesizing the unique key the way the platform does.
    pub fn new(package: &str, tag: Option<&str>, id: i32, user: i32) -> Self {
        let key = format!("{}|{}|{}|{}", user, package, id, tag.unwrap_or("null"));
        Self {
            key,
            package: package.to_string(),
            tag: tag.map(|t| t.to_string()),
            id,
            user,
        }
    }

    /// True when both keys name the same notification (package, tag, id, user).
    pub fn same_notification(&self, other: &RecordKey) -> bool {
        self.id == other.id
            && self.user == other.user
            && self.package == other.package
            && self.tag == other.tag
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

/// Notification category as posted by the app.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    CarEmergency,
    CarWarning,
    CarInformation,
    Message,
    Call,
    Navigation,
    Transport,
    System,
    Status,
    Progress,
    Other(String),
}

impl Category {
    pub fn as_str(&self) -> &str {
        match self {
            Category::CarEmergency => "car_emergency",
            Category::CarWarning => "car_warning",
            Category::CarInformation => "car_information",
            Category::Message => "msg",
            Category::Call => "call",
            Category::Navigation => "navigation",
            Category::Transport => "transport",
            Category::System => "sys",
            Category::Status => "status",
            Category::Progress => "progress",
            Category::Other(s) => s,
        }
    }
}

impl From<&str> for Category {
    fn from(s: &str) -> Self {
        match s {
            "car_emergency" => Category::CarEmergency,
            "car_warning" => Category::CarWarning,
            "car_information" => Category::CarInformation,
            "msg" => Category::Message,
            "call" => Category::Call,
            "navigation" => Category::Navigation,
            "transport" => Category::Transport,
            "sys" => Category::System,
            "status" => Category::Status,
            "progress" => Category::Progress,
            other => Category::Other(other.to_string()),
        }
    }
}

impl From<String> for Category {
    fn from(s: String) -> Self {
        Category::from(s.as_str())
    }
}

impl From<Category> for String {
    fn from(c: Category) -> Self {
        c.as_str().to_string()
    }
}

/// Template family the app requested for the notification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NotificationStyle {
    #[default]
    Default,
    Messaging,
    Inbox,
    Media,
    BigText,
}

/// What an action does, independent of its label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SemanticAction {
    #[default]
    None,
    Reply,
    MarkAsRead,
    MarkAsUnread,
    Delete,
    Archive,
    Mute,
    Unmute,
    Call,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationAction {
    pub title: String,
    #[serde(default)]
    pub semantic_action: SemanticAction,
    #[serde(default)]
    pub has_remote_input: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    pub max: u32,
    pub current: u32,
    #[serde(default)]
    pub indeterminate: bool,
}

/// One posted notification. Immutable; a repost replaces the whole record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRecord {
    #[serde(flatten)]
    pub key: RecordKey,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_key: Option<String>,
    #[serde(default)]
    pub is_group_summary: bool,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default)]
    pub style: NotificationStyle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<Progress>,
    #[serde(default)]
    pub actions: Vec<NotificationAction>,
    pub post_time: DateTime<Utc>,
    #[serde(default)]
    pub ongoing: bool,
    #[serde(default)]
    pub foreground: bool,
}

impl NotificationRecord {
    pub fn new(key: RecordKey, post_time: DateTime<Utc>) -> Self {
        Self {
            key,
            group_key: None,
            is_group_summary: false,
            title: String::new(),
            text: String::new(),
            category: None,
            style: NotificationStyle::Default,
            progress: None,
            actions: Vec::new(),
            post_time,
            ongoing: false,
            foreground: false,
        }
    }

    pub fn package(&self) -> &str {
        &self.key.package
    }

    pub fn has_category(&self, category: &Category) -> bool {
        self.category.as_ref() == Some(category)
    }

    pub fn is_media(&self) -> bool {
        self.style == NotificationStyle::Media || self.has_category(&Category::Transport)
    }

    /// Template hint for a record rendered on its own.
    pub fn render_hint(&self) -> RenderHint {
        if self.is_group_summary {
            RenderHint::GroupSummary
        } else if self.has_category(&Category::CarEmergency) {
            RenderHint::Emergency
        } else if self.style == NotificationStyle::Messaging
            || self.has_category(&Category::Message)
        {
            RenderHint::Message
        } else if self.is_media() {
            RenderHint::Media
        } else if self.style == NotificationStyle::Inbox {
            RenderHint::Inbox
        } else if self.progress.is_some() {
            RenderHint::Progress
        } else {
            RenderHint::Basic
        }
    }
}

/// Template the view layer should use for a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RenderHint {
    Basic,
    Message,
    Progress,
    Group,
    GroupSummary,
    Media,
    Inbox,
    Emergency,
}

// =============================================================================
// Ranking
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    Min,
    Low,
    Default,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingEntry {
    pub importance: Importance,
    /// Lower rank sorts first.
    pub rank: i32,
}

/// Point-in-time ranking data keyed by record key. Replaced wholesale on update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RankingSnapshot {
    entries: HashMap<String, RankingEntry>,
}

impl RankingSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, key: &str, importance: Importance, rank: i32) -> Self {
        self.entries
            .insert(key.to_string(), RankingEntry { importance, rank });
        self
    }

    pub fn get(&self, key: &str) -> Option<&RankingEntry> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn importance(&self, key: &str) -> Option<Importance> {
        self.entries.get(key).map(|e| e.importance)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, RankingEntry)> for RankingSnapshot {
    fn from_iter<I: IntoIterator<Item = (String, RankingEntry)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
