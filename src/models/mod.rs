//! Data models module
//!
//! This module contains all data structures used throughout the application

pub mod group_config;
pub mod membership;

// Re-export commonly used models
pub use group_config::{GroupConfig, CreateGroupConfigRequest, JOIN_REQUEST_DEFAULT_MS, DIRECT_JOIN_DEFAULT_MS};
pub use membership::{MembershipRecord, TrackMemberRequest};
