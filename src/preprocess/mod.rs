//! Notification preprocessing: filter, group, rank.
//!
//! Raw records go in, ordered display-ready groups come out. Groups are
//! rebuilt from scratch on every call.

pub mod filter;
pub mod group;
pub mod grouping;
pub mod ranking;

pub use group::NotificationGroup;
pub use grouping::{
    flatten, group_identity, group_notifications, record_identity, GroupingPolicy,
};
pub use ranking::{compare_groups, compare_notifications, rank_groups, rank_notifications};
