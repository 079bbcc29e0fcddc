//! Core domain logic for ktech.
//! This crate is the single source of truth for task, session and
//! notification rules; presentation layers only drive `AppStore`.

pub mod app;
pub mod clock;
pub mod config;
pub mod db;
pub mod feed;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use app::router::Screen;
pub use app::{AppError, AppResult, AppStore, StoreEvent, SubscriptionId};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{AppConfig, ConfigError};
pub use feed::{fetch_or_fallback, DemoTodo, DemoTodoSource, FeedError, HttpDemoTodoSource};
pub use logging::{default_log_level, init_logging, logging_status, LogConfig, LoggingError};
pub use model::notification::{Notification, NotificationId, NotificationKind};
pub use model::settings::Settings;
pub use model::task::{NewTask, Priority, Task, TaskId, TaskPatch, TaskValidationError};
pub use model::user::{ProfileUpdate, RegisteredUser, User, UserId};
pub use repo::kv_repo::{KvRepository, RepoError, RepoResult, SqliteKvRepository};
pub use service::auth_service::{AuthError, AuthService, SignupRequest};
pub use service::notifications::{NotificationCenter, NotificationFeed, MAX_NOTIFICATIONS};
pub use service::stats::{FavoriteStats, TaskStats};
pub use service::task_ops::{DeleteOutcome, TaskOpError};
pub use store::{StoreError, StoreResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
