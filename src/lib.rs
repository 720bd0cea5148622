//! Notification preprocessing for the in-car notification center.
//!
//! Raw records are filtered, grouped and ranked into display groups, and each
//! new list is diffed against the previous one. Heads-up, mute and unseen
//! state live next to the pipeline in a per-session `SessionState`.

pub mod capability;
pub mod center;
pub mod diff;
pub mod dispatch;
pub mod error;
pub mod heads_up;
pub mod pipeline;
pub mod preprocess;
pub mod state;
pub mod store;
pub mod tracking;
pub mod types;

#[cfg(test)]
mod test_support;

pub use center::{CenterEvent, CenterUpdate, NotificationCenter};
pub use pipeline::{ListUpdate, Pipeline};
pub use state::SessionState;
