//! Decorative "sample todos" feed from a public demo API.
//!
//! # Responsibility
//! - Fetch a handful of sample todos behind a typed adapter.
//! - Fail open to a fixed local list.
//!
//! # Invariants
//! - Results never exceed the requested limit.
//! - Records with a blank title are dropped.
//! - No retries; one attempt per call.

use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

pub const DEFAULT_FEED_URL: &str = "https://jsonplaceholder.typicode.com/todos";
pub const DEFAULT_FEED_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemoTodo {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedError {
    Transport(String),
    Status(u16),
    Decode(String),
}

impl Display for FeedError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(message) => write!(f, "feed request failed: {message}"),
            Self::Status(code) => write!(f, "feed responded with status {code}"),
            Self::Decode(message) => write!(f, "feed payload is invalid: {message}"),
        }
    }
}

impl Error for FeedError {}

/// Source of sample todos.
pub trait DemoTodoSource {
    fn fetch(&self, limit: usize) -> Result<Vec<DemoTodo>, FeedError>;
}

/// JSON-over-HTTP source (`GET {base_url}?_limit={limit}`).
pub struct HttpDemoTodoSource {
    base_url: String,
    agent: ureq::Agent,
}

impl HttpDemoTodoSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_secs(5))
            .timeout_read(Duration::from_secs(10))
            .build();
        Self {
            base_url: base_url.into(),
            agent,
        }
    }
}

impl Default for HttpDemoTodoSource {
    fn default() -> Self {
        Self::new(DEFAULT_FEED_URL)
    }
}

impl DemoTodoSource for HttpDemoTodoSource {
    fn fetch(&self, limit: usize) -> Result<Vec<DemoTodo>, FeedError> {
        let url = format!("{}?_limit={limit}", self.base_url);
        let response = self.agent.get(&url).call().map_err(|err| match err {
            ureq::Error::Status(code, _) => FeedError::Status(code),
            other => FeedError::Transport(other.to_string()),
        })?;
        let body = response
            .into_string()
            .map_err(|err| FeedError::Transport(err.to_string()))?;
        parse_todos(&body, limit)
    }
}

/// Decodes a JSON array of todos, dropping blank titles and capping at `limit`.
pub fn parse_todos(body: &str, limit: usize) -> Result<Vec<DemoTodo>, FeedError> {
    let todos: Vec<DemoTodo> =
        serde_json::from_str(body).map_err(|err| FeedError::Decode(err.to_string()))?;
    Ok(todos
        .into_iter()
        .filter(|todo| !todo.title.trim().is_empty())
        .take(limit)
        .collect())
}

/// Local list shown when the remote feed is unavailable.
pub fn fallback_todos() -> Vec<DemoTodo> {
    [
        (1, "Complete project proposal", false),
        (2, "Review team feedback", true),
        (3, "Schedule client meeting", false),
    ]
    .into_iter()
    .map(|(id, title, completed)| DemoTodo {
        id,
        title: title.to_string(),
        completed,
    })
    .collect()
}

/// Fetches from `source`, falling back to `fallback_todos` on any failure.
pub fn fetch_or_fallback(source: &dyn DemoTodoSource, limit: usize) -> Vec<DemoTodo> {
    match source.fetch(limit) {
        Ok(todos) => {
            info!("event=feed_fetch module=feed status=ok count={}", todos.len());
            todos
        }
        Err(err) => {
            warn!("event=feed_fetch module=feed status=fallback error={err}");
            let mut fallback = fallback_todos();
            fallback.truncate(limit);
            fallback
        }
    }
}
