use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;

use crate::capability::{CapabilityChecker, DefaultCapabilities};
use crate::error::{ConfigError, PipelineError};
use crate::heads_up::should_show_heads_up;
use crate::pipeline::{ListUpdate, Pipeline};
use crate::preprocess::NotificationGroup;
use crate::store::NotificationStore;
use crate::tracking::{MuteToggle, MuteTracker, SeenTracker};
use crate::types::{CenterConfig, NotificationRecord, RankingSnapshot};

/// What happened when a record was posted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostOutcome {
    pub key: String,
    /// A record with the same key was replaced.
    pub replaced: bool,
    /// The record qualifies for a heads-up and is not muted.
    pub heads_up: bool,
}

/// Everything the notification center knows during one session.
///
/// Constructed at session start and passed to whoever drives it; there is no
/// global instance. `reset` starts a fresh session in place.
pub struct SessionState {
    config: CenterConfig,
    store: NotificationStore,
    pipeline: Pipeline,
    mute: MuteTracker,
    seen: SeenTracker,
}

impl SessionState {
    pub fn new(config: CenterConfig, capabilities: Arc<dyn CapabilityChecker>) -> Self {
        Self {
            pipeline: Pipeline::new(config.clone()),
            config,
            store: NotificationStore::new(),
            mute: MuteTracker::new(capabilities),
            seen: SeenTracker::new(),
        }
    }

    pub fn with_config(config: CenterConfig) -> Self {
        Self::new(config, Arc::new(DefaultCapabilities::default()))
    }

    pub fn config(&self) -> &CenterConfig {
        &self.config
    }

    pub fn store(&self) -> &NotificationStore {
        &self.store
    }

    /// Store a posted record, optionally with the ranking that came with it.
    pub fn on_posted(
        &mut self,
        record: NotificationRecord,
        ranking: Option<RankingSnapshot>,
    ) -> PostOutcome {
        let key = record.key.key.clone();
        self.mute.add_new_message_notification(&record);
        self.seen.mark_unseen(&key);
        let replaced = self.store.on_posted(record).is_some();

        if let Some(snapshot) = ranking {
            self.on_ranking_update(snapshot);
        }

        let heads_up = match self.store.get(&key) {
            Some(record) => {
                should_show_heads_up(record, &self.store.ranking())
                    && !self.mute.is_message_notification_muted(record)
            }
            None => false,
        };

        PostOutcome {
            key,
            replaced,
            heads_up,
        }
    }

    pub fn on_removed(&mut self, key: &str) -> Option<NotificationRecord> {
        self.seen.forget(key);
        let removed = self.store.on_removed(key);
        if removed.is_none() {
            log::debug!("Removal for unknown notification {}", key);
        }
        removed
    }

    pub fn on_ranking_update(&mut self, snapshot: RankingSnapshot) -> Vec<NotificationRecord> {
        let removed = self.store.on_ranking_update(snapshot);
        let store = &self.store;
        self.seen.retain(|key| store.contains(key));
        removed
    }

    /// Rerun the pipeline over the store and diff against the last list.
    pub fn refresh(&mut self) -> Result<ListUpdate, PipelineError> {
        let ranking = self.store.ranking();
        self.pipeline.process_update(self.store.records(), &ranking)
    }

    /// The list produced by the last `refresh`.
    pub fn current_list(&self) -> &[NotificationGroup] {
        self.pipeline.previous()
    }

    pub fn toggle_mute(&mut self, key: &str) -> MuteToggle {
        match self.store.get(key) {
            Some(record) => self.mute.toggle_mute(record),
            None => {
                log::warn!("Mute toggled for notification {} not in store", key);
                MuteToggle::Unknown
            }
        }
    }

    pub fn is_muted(&mut self, key: &str) -> bool {
        match self.store.get(key) {
            Some(record) => self.mute.is_message_notification_muted(record),
            None => false,
        }
    }

    pub fn mark_seen<'a>(&mut self, keys: impl IntoIterator<Item = &'a str>) {
        self.seen.mark_seen(keys);
    }

    pub fn unseen_count(&self) -> usize {
        self.seen.unseen_count()
    }

    /// Start over: empty store, fresh mute and unseen state, no previous list.
    pub fn reset(&mut self) {
        log::info!("Resetting notification session");
        self.store.clear();
        self.mute.clear();
        self.seen.clear();
        self.pipeline.reset();
    }
}

// =============================================================================
// Config loading
// =============================================================================

/// ~/.carnotif/config.json
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    let home = dirs::home_dir().ok_or(ConfigError::HomeDirNotFound)?;
    Ok(home.join(".carnotif").join("config.json"))
}

pub fn load_config(path: &Path) -> Result<CenterConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load the user config, or defaults when there is no config file.
pub fn load_default_config() -> Result<CenterConfig, ConfigError> {
    let path = default_config_path()?;
    if !path.exists() {
        log::info!("No config at {}, using defaults", path.display());
        return Ok(CenterConfig::default());
    }
    load_config(&path)
}
