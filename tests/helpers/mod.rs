//! Test helpers module
//!
//! This module provides utilities and helpers for testing the StayBuddy
//! application: in-memory store and chat API fakes for the service tests,
//! and a mock Telegram API server for the HTTP client tests.

pub mod fakes;
pub mod telegram_mock;

pub use fakes::*;
pub use telegram_mock::*;
