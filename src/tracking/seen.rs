//! Unseen-notification bookkeeping for the notification center badge.

use std::collections::HashSet;

#[derive(Debug, Default)]
pub struct SeenTracker {
    unseen: HashSet<String>,
}

impl SeenTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// A freshly posted record starts unseen.
    pub fn mark_unseen(&mut self, key: &str) {
        self.unseen.insert(key.to_string());
    }

    /// The user opened the list showing these records.
    pub fn mark_seen<'a>(&mut self, keys: impl IntoIterator<Item = &'a str>) {
        for key in keys {
            self.unseen.remove(key);
        }
    }

    pub fn forget(&mut self, key: &str) {
        self.unseen.remove(key);
    }

    /// Drop keys no longer present in the store.
    pub fn retain(&mut self, live: impl Fn(&str) -> bool) {
        self.unseen.retain(|key| live(key));
    }

    pub fn is_unseen(&self, key: &str) -> bool {
        self.unseen.contains(key)
    }

    pub fn unseen_count(&self) -> usize {
        self.unseen.len()
    }

    pub fn clear(&mut self) {
        self.unseen.clear();
    }
}
