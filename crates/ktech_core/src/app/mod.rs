//! Application state container.
//!
//! # Responsibility
//! - Own session, tasks, settings, notification feed and screen state.
//! - Run every user action as: pure transform -> persist -> notify
//!   subscribers -> recompute notifications.
//!
//! # Invariants
//! - Single writer: all mutation goes through `&mut AppStore`.
//! - Subscribers only hear about mutations that were persisted.
//! - Task mutations require a signed-in session.

pub mod router;

use crate::clock::Clock;
use crate::config::AppConfig;
use crate::model::ids::TimeIdGenerator;
use crate::model::notification::NotificationId;
use crate::model::settings::{is_supported_language, Settings};
use crate::model::task::{NewTask, Task, TaskId, TaskPatch};
use crate::model::user::{ProfileUpdate, User};
use crate::repo::kv_repo::KvRepository;
use crate::service::auth_service::{AuthError, AuthService, SignupRequest};
use crate::service::notifications::{NotificationCenter, NotificationFeed};
use crate::service::stats::{favorites, FavoriteStats, TaskStats};
use crate::service::task_ops::{self, TaskOpError};
use crate::store::session_store::SessionStore;
use crate::store::settings_store::SettingsStore;
use crate::store::task_store::TaskStore;
use crate::store::user_ledger::UserLedger;
use crate::store::StoreError;
use log::info;
use router::Screen;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

/// Change notification delivered to subscribers after a committed mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    SessionChanged,
    TasksChanged,
    SettingsChanged,
    NotificationsChanged,
    ScreenChanged(Screen),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(&StoreEvent)>;

#[derive(Debug)]
pub enum AppError {
    Store(StoreError),
    Auth(AuthError),
    Task(TaskOpError),
    NotSignedIn,
    /// Navigation to a screen that needs a session or a selected task.
    ScreenUnavailable(Screen),
    UnsupportedLanguage(String),
    InvalidProfile(&'static str),
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::Auth(err) => write!(f, "{err}"),
            Self::Task(err) => write!(f, "{err}"),
            Self::NotSignedIn => write!(f, "no user is signed in"),
            Self::ScreenUnavailable(screen) => {
                write!(f, "screen `{}` is not available", screen.as_str())
            }
            Self::UnsupportedLanguage(code) => write!(f, "unsupported language: `{code}`"),
            Self::InvalidProfile(reason) => write!(f, "invalid profile: {reason}"),
        }
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Auth(err) => Some(err),
            Self::Task(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for AppError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<AuthError> for AppError {
    fn from(value: AuthError) -> Self {
        match value {
            AuthError::Store(err) => Self::Store(err),
            other => Self::Auth(other),
        }
    }
}

impl From<TaskOpError> for AppError {
    fn from(value: TaskOpError) -> Self {
        Self::Task(value)
    }
}

pub type AppResult<T> = Result<T, AppError>;

pub struct AppStore<R: KvRepository, C: Clock> {
    repo: R,
    clock: C,
    auth_latency: Duration,
    ids: TimeIdGenerator,
    session: SessionStore,
    tasks: TaskStore,
    settings: SettingsStore,
    notifications: NotificationCenter,
    screen: Screen,
    selected_task: Option<TaskId>,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
}

impl<R: KvRepository, C: Clock> AppStore<R, C> {
    /// Restores all persisted state and runs the initial notification scan.
    pub fn load(repo: R, clock: C, config: &AppConfig) -> AppResult<Self> {
        let session = SessionStore::load(&repo)?;
        let tasks = TaskStore::load(&repo)?;
        let settings = SettingsStore::load(&repo)?;

        let mut ids = TimeIdGenerator::new();
        tasks.seed_ids(&mut ids);
        if let Some(user) = session.user() {
            ids.observe(&user.id);
        }
        for account in UserLedger::new(&repo).list()? {
            ids.observe(&account.id);
        }

        let mut notifications = NotificationCenter::new(
            settings.settings().notifications,
            config.notification_interval,
        );
        notifications.on_tasks_changed(tasks.tasks(), clock.now());

        let screen = Screen::initial(session.is_signed_in());
        info!(
            "event=app_load module=app status=ok signed_in={} tasks={} screen={}",
            session.is_signed_in(),
            tasks.len(),
            screen.as_str()
        );

        Ok(Self {
            repo,
            clock,
            auth_latency: config.auth_latency,
            ids,
            session,
            tasks,
            settings,
            notifications,
            screen,
            selected_task: None,
            subscribers: Vec::new(),
            next_subscription: 0,
        })
    }

    pub fn user(&self) -> Option<&User> {
        self.session.user()
    }

    pub fn tasks(&self) -> &[Task] {
        self.tasks.tasks()
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.get(id)
    }

    pub fn favorites(&self) -> Vec<&Task> {
        favorites(self.tasks.tasks())
    }

    pub fn settings(&self) -> &Settings {
        self.settings.settings()
    }

    pub fn notifications(&self) -> &NotificationFeed {
        self.notifications.feed()
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.selected_task
            .as_deref()
            .and_then(|id| self.tasks.get(id))
    }

    pub fn stats(&self) -> TaskStats {
        TaskStats::from_tasks(self.tasks.tasks(), self.clock.now())
    }

    pub fn favorite_stats(&self) -> FavoriteStats {
        FavoriteStats::from_tasks(self.tasks.tasks())
    }

    pub fn subscribe(&mut self, subscriber: impl FnMut(&StoreEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(existing, _)| *existing != id);
        self.subscribers.len() != before
    }

    pub fn signup(&mut self, request: &SignupRequest) -> AppResult<&User> {
        let now = self.clock.now();
        let id = self.ids.next_id(now);
        let user = AuthService::with_latency(&self.repo, self.auth_latency).signup(request, id)?;
        self.start_session(user)
    }

    pub fn login(&mut self, email: &str, password: &str) -> AppResult<&User> {
        let user = AuthService::with_latency(&self.repo, self.auth_latency).login(email, password)?;
        self.start_session(user)
    }

    /// Ends the session; tasks and settings stay on this device.
    pub fn logout(&mut self) -> AppResult<()> {
        self.session.clear(&self.repo)?;
        self.selected_task = None;
        info!("event=auth_logout module=app status=ok");
        self.emit(StoreEvent::SessionChanged);
        self.set_screen(Screen::Login);
        Ok(())
    }

    pub fn update_profile(&mut self, update: &ProfileUpdate) -> AppResult<&User> {
        let mut user = self.session.user().cloned().ok_or(AppError::NotSignedIn)?;
        update.apply_to(&mut user);
        if user.username.trim().is_empty() {
            return Err(AppError::InvalidProfile("username must not be blank"));
        }
        if !user.email.contains('@') {
            return Err(AppError::InvalidProfile("email must contain `@`"));
        }

        self.session.set(&self.repo, user)?;
        self.emit(StoreEvent::SessionChanged);
        self.session.user().ok_or(AppError::NotSignedIn)
    }

    fn start_session(&mut self, user: User) -> AppResult<&User> {
        let user = user.with_session_defaults(self.clock.now());
        self.ids.observe(&user.id);
        self.session.set(&self.repo, user)?;
        self.emit(StoreEvent::SessionChanged);
        self.set_screen(Screen::Home);
        self.session.user().ok_or(AppError::NotSignedIn)
    }

    pub fn add_task(&mut self, draft: NewTask) -> AppResult<TaskId> {
        self.require_session()?;
        let id = self.ids.next_id(self.clock.now());
        let next = task_ops::add_task(self.tasks.tasks(), draft, id.clone())?;
        self.commit_tasks(next)?;
        info!("event=task_add module=app status=ok task_id={id}");
        Ok(id)
    }

    pub fn update_task(&mut self, id: &str, patch: &TaskPatch) -> AppResult<()> {
        self.require_session()?;
        let next = task_ops::update_task(self.tasks.tasks(), id, patch)?;
        self.commit_tasks(next)?;
        info!("event=task_update module=app status=ok task_id={id}");
        Ok(())
    }

    /// Deletes a task; leaves the detail screen if it was showing this task.
    pub fn delete_task(&mut self, id: &str) -> AppResult<Task> {
        self.require_session()?;
        let viewing = match self.screen {
            Screen::Detail => self.selected_task.as_deref(),
            _ => None,
        };
        let outcome = task_ops::delete_task(self.tasks.tasks(), id, viewing)?;
        self.commit_tasks(outcome.tasks)?;
        info!("event=task_delete module=app status=ok task_id={id}");

        if self.selected_task.as_deref() == Some(id) {
            self.selected_task = None;
        }
        if outcome.navigate_away {
            self.set_screen(Screen::Home);
        }
        Ok(outcome.removed)
    }

    pub fn toggle_favorite(&mut self, id: &str) -> AppResult<bool> {
        self.require_session()?;
        let next = task_ops::toggle_favorite(self.tasks.tasks(), id)?;
        self.commit_tasks(next)?;
        Ok(self.tasks.get(id).is_some_and(|task| task.favorite))
    }

    pub fn toggle_completed(&mut self, id: &str) -> AppResult<bool> {
        self.require_session()?;
        let next = task_ops::toggle_completed(self.tasks.tasks(), id)?;
        self.commit_tasks(next)?;
        Ok(self.tasks.get(id).is_some_and(|task| task.completed))
    }

    fn commit_tasks(&mut self, next: Vec<Task>) -> AppResult<()> {
        self.tasks.commit(&self.repo, next)?;
        self.emit(StoreEvent::TasksChanged);

        let now = self.clock.now();
        if self.notifications.on_tasks_changed(self.tasks.tasks(), now) > 0 {
            self.emit(StoreEvent::NotificationsChanged);
        }
        Ok(())
    }

    /// Selects a task and opens the detail screen.
    pub fn view_task(&mut self, id: &str) -> AppResult<()> {
        self.require_session()?;
        if !self.tasks.contains(id) {
            return Err(TaskOpError::NotFound(id.to_string()).into());
        }
        self.selected_task = Some(id.to_string());
        self.set_screen(Screen::Detail);
        Ok(())
    }

    pub fn navigate(&mut self, screen: Screen) -> AppResult<()> {
        if screen.requires_session() && !self.session.is_signed_in() {
            return Err(AppError::ScreenUnavailable(screen));
        }
        if screen == Screen::Detail && self.selected_task().is_none() {
            return Err(AppError::ScreenUnavailable(screen));
        }
        self.set_screen(screen);
        Ok(())
    }

    pub fn back(&mut self) -> Screen {
        let target = self.screen.back_target();
        let target = if target.requires_session() && !self.session.is_signed_in() {
            Screen::Login
        } else {
            target
        };
        self.set_screen(target);
        target
    }

    fn set_screen(&mut self, screen: Screen) {
        if self.screen != screen {
            self.screen = screen;
            self.emit(StoreEvent::ScreenChanged(screen));
        }
    }

    pub fn update_settings(&mut self, settings: Settings) -> AppResult<()> {
        if !is_supported_language(&settings.language) {
            return Err(AppError::UnsupportedLanguage(settings.language));
        }
        let notifications = settings.notifications;
        self.settings.replace(&self.repo, settings)?;
        self.emit(StoreEvent::SettingsChanged);

        let now = self.clock.now();
        if self
            .notifications
            .set_enabled(notifications, self.tasks.tasks(), now)
            > 0
        {
            self.emit(StoreEvent::NotificationsChanged);
        }
        Ok(())
    }

    pub fn toggle_notifications(&mut self) -> AppResult<bool> {
        let mut settings = self.settings.settings().clone();
        settings.notifications = !settings.notifications;
        let enabled = settings.notifications;
        self.update_settings(settings)?;
        Ok(enabled)
    }

    pub fn toggle_dark_mode(&mut self) -> AppResult<bool> {
        let mut settings = self.settings.settings().clone();
        settings.dark_mode = !settings.dark_mode;
        let dark = settings.dark_mode;
        self.update_settings(settings)?;
        Ok(dark)
    }

    pub fn set_language(&mut self, code: &str) -> AppResult<()> {
        let mut settings = self.settings.settings().clone();
        settings.language = code.to_string();
        self.update_settings(settings)
    }

    /// Periodic driver; rescans when the configured interval has elapsed.
    pub fn tick(&mut self) -> usize {
        let now = self.clock.now();
        let created = self.notifications.tick(self.tasks.tasks(), now);
        if created > 0 {
            self.emit(StoreEvent::NotificationsChanged);
        }
        created
    }

    pub fn mark_notification_read(&mut self, id: NotificationId) -> bool {
        let changed = self.notifications.mark_read(id);
        if changed {
            self.emit(StoreEvent::NotificationsChanged);
        }
        changed
    }

    pub fn mark_all_notifications_read(&mut self) -> usize {
        let changed = self.notifications.mark_all_read();
        if changed > 0 {
            self.emit(StoreEvent::NotificationsChanged);
        }
        changed
    }

    pub fn dismiss_notification(&mut self, id: NotificationId) -> bool {
        let removed = self.notifications.dismiss(id);
        if removed {
            self.emit(StoreEvent::NotificationsChanged);
        }
        removed
    }

    fn require_session(&self) -> AppResult<()> {
        if self.session.is_signed_in() {
            Ok(())
        } else {
            Err(AppError::NotSignedIn)
        }
    }

    fn emit(&mut self, event: StoreEvent) {
        for (_, subscriber) in self.subscribers.iter_mut() {
            subscriber(&event);
        }
    }
}
