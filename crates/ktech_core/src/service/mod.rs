//! Core use-case services.
//!
//! # Responsibility
//! - Hold the domain rules: task transforms, notification derivation,
//!   account validation and derived statistics.
//! - Stay storage-agnostic; persistence goes through stores and repositories.

pub mod auth_service;
pub mod notifications;
pub mod stats;
pub mod task_ops;
