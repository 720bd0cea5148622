//! Session-lifetime per-notification state: mute flags and unseen badges.

pub mod mute;
pub mod seen;

pub use mute::{MuteToggle, MuteTracker};
pub use seen::SeenTracker;
