//! Serialized event loop in front of the session.
//!
//! Events are applied one at a time. Each one reruns the pipeline and
//! publishes the new list together with the edits from the previous one.
//! Heads-up timer expiries arrive on a second channel and are applied on the
//! same loop, between events.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::diff::EditScript;
use crate::error::PipelineError;
use crate::heads_up::{DismissReason, HeadsUpChange, HeadsUpExpiry, HeadsUpManager};
use crate::preprocess::NotificationGroup;
use crate::state::SessionState;
use crate::tracking::MuteToggle;
use crate::types::{NotificationRecord, RankingSnapshot};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CenterEvent {
    Posted {
        record: NotificationRecord,
        #[serde(default)]
        ranking: Option<RankingSnapshot>,
    },
    Removed {
        key: String,
    },
    RankingUpdated {
        ranking: RankingSnapshot,
    },
    MarkSeen {
        keys: Vec<String>,
    },
    ToggleMute {
        key: String,
    },
    Reset,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CenterUpdate {
    pub groups: Vec<NotificationGroup>,
    pub edits: EditScript,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heads_up: Option<HeadsUpChange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mute: Option<MuteToggle>,
    pub unseen_count: usize,
}

enum Input {
    Event(CenterEvent),
    Expired(HeadsUpExpiry),
}

pub struct NotificationCenter {
    state: SessionState,
    heads_up: HeadsUpManager,
    expiries: mpsc::UnboundedReceiver<HeadsUpExpiry>,
}

impl NotificationCenter {
    pub fn new(state: SessionState) -> Self {
        let (expiry_tx, expiries) = mpsc::unbounded_channel();
        let heads_up = HeadsUpManager::new(state.config().heads_up.clone(), expiry_tx);
        Self {
            state,
            heads_up,
            expiries,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn heads_up(&self) -> &HeadsUpManager {
        &self.heads_up
    }

    /// Apply one event and recompute the list.
    ///
    /// Posting may start a heads-up timer, so this must run inside a tokio
    /// runtime.
    pub fn handle(&mut self, event: CenterEvent) -> Result<CenterUpdate, PipelineError> {
        let mut heads_up = None;
        let mut mute = None;

        match event {
            CenterEvent::Posted { record, ranking } => {
                let outcome = self.state.on_posted(record, ranking);
                if outcome.heads_up {
                    if let Some(record) = self.state.store().get(&outcome.key) {
                        heads_up = self.heads_up.show(record.clone());
                    }
                }
            }
            CenterEvent::Removed { key } => {
                self.state.on_removed(&key);
                heads_up = self.heads_up.dismiss(&key, DismissReason::Removed);
            }
            CenterEvent::RankingUpdated { ranking } => {
                for removed in self.state.on_ranking_update(ranking) {
                    if let Some(change) =
                        self.heads_up.dismiss(&removed.key.key, DismissReason::Excluded)
                    {
                        heads_up = Some(change);
                    }
                }
            }
            CenterEvent::MarkSeen { keys } => {
                self.state.mark_seen(keys.iter().map(String::as_str));
            }
            CenterEvent::ToggleMute { key } => {
                mute = Some(self.state.toggle_mute(&key));
            }
            CenterEvent::Reset => {
                heads_up = self.heads_up.clear();
                self.state.reset();
            }
        }

        let list = self.state.refresh()?;
        Ok(CenterUpdate {
            groups: list.groups,
            edits: list.edits,
            heads_up,
            mute,
            unseen_count: self.state.unseen_count(),
        })
    }

    /// Apply a heads-up timer expiry. `None` when it was already superseded.
    ///
    /// The list itself is unchanged, so the update carries no edits.
    pub fn expire(&mut self, expiry: HeadsUpExpiry) -> Option<CenterUpdate> {
        let change = self.heads_up.expire(expiry)?;
        Some(CenterUpdate {
            groups: self.state.current_list().to_vec(),
            edits: EditScript::default(),
            heads_up: Some(change),
            mute: None,
            unseen_count: self.state.unseen_count(),
        })
    }

    /// Consume events and heads-up expiries until the event sender closes or
    /// nobody listens anymore.
    pub async fn run(
        &mut self,
        mut receiver: mpsc::Receiver<CenterEvent>,
        updates: mpsc::Sender<CenterUpdate>,
    ) {
        loop {
            let input = tokio::select! {
                event = receiver.recv() => match event {
                    Some(event) => Input::Event(event),
                    None => break,
                },
                Some(expiry) = self.expiries.recv() => Input::Expired(expiry),
            };

            let update = match input {
                Input::Event(event) => match self.handle(event) {
                    Ok(update) => update,
                    Err(e) => {
                        log::error!("Notification pipeline failed: {}", e);
                        continue;
                    }
                },
                Input::Expired(expiry) => match self.expire(expiry) {
                    Some(update) => update,
                    None => continue,
                },
            };

            if updates.send(update).await.is_err() {
                log::info!("Update receiver dropped, stopping notification center");
                break;
            }
        }
        log::debug!("Notification center loop exited");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::EditOp;
    use crate::test_support::{message, ranked, record, with_category};
    use crate::types::{CenterConfig, Category, Importance};
    use std::time::Duration;

    fn center() -> NotificationCenter {
        NotificationCenter::new(SessionState::with_config(CenterConfig::default()))
    }

    fn posted(record: &NotificationRecord, importance: Importance) -> CenterEvent {
        CenterEvent::Posted {
            record: record.clone(),
            ranking: Some(ranked(&[record], importance)),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn high_importance_post_shows_heads_up() {
        let mut center = center();
        let r = record("chat", 1, 0);

        let update = center.handle(posted(&r, Importance::High)).unwrap();
        assert_eq!(update.groups.len(), 1);
        assert_eq!(update.edits.ops(), &[EditOp::Insert { position: 0 }]);
        assert_eq!(
            update.heads_up,
            Some(HeadsUpChange::Shown { key: r.key.key.clone() })
        );
        assert_eq!(update.unseen_count, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn removal_dismisses_heads_up() {
        let mut center = center();
        let alert = with_category(record("car", 1, 0), Category::CarEmergency);
        center.handle(posted(&alert, Importance::Default)).unwrap();
        assert!(center.heads_up().current().is_some());

        let update = center
            .handle(CenterEvent::Removed { key: alert.key.key.clone() })
            .unwrap();
        assert!(update.groups.is_empty());
        assert_eq!(update.edits.ops(), &[EditOp::Remove { position: 0 }]);
        assert_eq!(
            update.heads_up,
            Some(HeadsUpChange::Dismissed {
                key: alert.key.key.clone(),
                reason: DismissReason::Removed,
            })
        );
        assert!(center.heads_up().current().is_none());
        assert_eq!(update.unseen_count, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn muted_message_does_not_pop_up_again() {
        let mut center = center();
        let msg = message("chat", 1, 0);
        center.handle(posted(&msg, Importance::High)).unwrap();

        let update = center
            .handle(CenterEvent::ToggleMute { key: msg.key.key.clone() })
            .unwrap();
        assert_eq!(update.mute, Some(MuteToggle::Muted));

        let update = center.handle(posted(&msg, Importance::High)).unwrap();
        assert_eq!(update.heads_up, None);
    }

    #[tokio::test(start_paused = true)]
    async fn mark_seen_and_reset() {
        let mut center = center();
        let a = record("pkg", 1, 0);
        center.handle(posted(&a, Importance::High)).unwrap();

        let update = center
            .handle(CenterEvent::MarkSeen { keys: vec![a.key.key.clone()] })
            .unwrap();
        assert_eq!(update.unseen_count, 0);

        let update = center.handle(CenterEvent::Reset).unwrap();
        assert_eq!(
            update.heads_up,
            Some(HeadsUpChange::Dismissed {
                key: a.key.key.clone(),
                reason: DismissReason::Reset,
            })
        );
        assert!(update.groups.is_empty());
        assert!(update.edits.is_empty(), "reset forgets the previous list");
        assert!(center.heads_up().current().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn ranking_update_drops_visible_heads_up() {
        let mut center = center();
        let a = record("pkg", 1, 0);
        let b = record("pkg", 2, 0);
        center.handle(posted(&a, Importance::High)).unwrap();
        center
            .handle(CenterEvent::Posted {
                record: b.clone(),
                ranking: Some(ranked(&[&a, &b], Importance::Low)),
            })
            .unwrap();

        let update = center
            .handle(CenterEvent::RankingUpdated {
                ranking: ranked(&[&b], Importance::Low),
            })
            .unwrap();
        assert_eq!(update.groups.len(), 1);
        assert_eq!(
            update.heads_up,
            Some(HeadsUpChange::Dismissed {
                key: a.key.key.clone(),
                reason: DismissReason::Excluded,
            })
        );
        assert!(center.heads_up().current().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn run_publishes_heads_up_timeout() {
        let (event_tx, event_rx) = mpsc::channel(8);
        let (update_tx, mut update_rx) = mpsc::channel(8);
        let r = record("chat", 1, 0);

        let handle = tokio::spawn(async move {
            let mut center = center();
            center.run(event_rx, update_tx).await;
        });

        event_tx.send(posted(&r, Importance::High)).await.unwrap();
        let shown = update_rx.recv().await.unwrap();
        assert_eq!(
            shown.heads_up,
            Some(HeadsUpChange::Shown { key: r.key.key.clone() })
        );

        let started = tokio::time::Instant::now();
        let timed_out = update_rx.recv().await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(8_000));
        assert_eq!(
            timed_out.heads_up,
            Some(HeadsUpChange::Dismissed {
                key: r.key.key.clone(),
                reason: DismissReason::Timeout,
            })
        );
        assert!(timed_out.edits.is_empty());
        assert_eq!(timed_out.groups, shown.groups);

        event_tx
            .send(CenterEvent::Removed { key: r.key.key.clone() })
            .await
            .unwrap();
        let removed = update_rx.recv().await.unwrap();
        assert_eq!(removed.heads_up, None, "already dismissed by the timer");
        assert!(removed.groups.is_empty());

        drop(event_tx);
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn superseded_expiry_publishes_nothing() {
        let mut center = center();
        let first = record("chat", 1, 0);
        let second = record("chat", 2, 0);

        center.handle(posted(&first, Importance::High)).unwrap();
        let stale = center.expiries.recv().await.unwrap();
        center
            .handle(CenterEvent::Posted {
                record: second.clone(),
                ranking: Some(ranked(&[&first, &second], Importance::High)),
            })
            .unwrap();

        assert_eq!(center.expire(stale), None);
        assert_eq!(center.heads_up().current_key(), Some(second.key.key.clone()));
    }

    #[tokio::test]
    async fn run_publishes_one_update_per_event() {
        let (event_tx, event_rx) = mpsc::channel(8);
        let (update_tx, mut update_rx) = mpsc::channel(8);
        let a = record("pkg", 1, 0);
        let b = record("pkg", 2, 0);

        let handle = tokio::spawn(async move {
            let mut center = center();
            center.run(event_rx, update_tx).await;
        });

        event_tx.send(posted(&a, Importance::Default)).await.unwrap();
        event_tx
            .send(CenterEvent::Posted {
                record: b.clone(),
                ranking: Some(ranked(&[&b, &a], Importance::Default)),
            })
            .await
            .unwrap();
        drop(event_tx);

        let first = update_rx.recv().await.unwrap();
        assert_eq!(first.groups.len(), 1);
        let second = update_rx.recv().await.unwrap();
        let ids: Vec<i32> = second
            .groups
            .iter()
            .map(|g| g.representative().unwrap().key.id)
            .collect();
        assert_eq!(ids, vec![2, 1]);

        handle.await.unwrap();
        assert!(update_rx.recv().await.is_none());
    }

    #[test]
    fn events_parse_from_json() {
        let event: CenterEvent =
            serde_json::from_str(r#"{ "type": "toggleMute", "key": "0|chat|1|null" }"#).unwrap();
        assert_eq!(
            event,
            CenterEvent::ToggleMute { key: "0|chat|1|null".to_string() }
        );

        let event: CenterEvent = serde_json::from_str(r#"{ "type": "reset" }"#).unwrap();
        assert_eq!(event, CenterEvent::Reset);
    }
}
