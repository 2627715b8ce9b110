//! Database repositories module
//!
//! This module contains all repository implementations for data access

pub mod group_config;
pub mod membership;

// Re-export repositories
pub use group_config::GroupConfigRepository;
pub use membership::MembershipRepository;
