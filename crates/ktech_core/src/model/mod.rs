//! Domain model for tasks, accounts, preferences and generated alerts.
//!
//! # Responsibility
//! - Define canonical data structures shared by stores and services.
//! - Keep the JSON wire shape stable so previously stored data still parses.
//!
//! # Invariants
//! - Task and user ids are immutable once assigned.
//! - Notifications are transient and never persisted.

pub mod ids;
pub mod notification;
pub mod settings;
pub mod task;
pub mod user;
