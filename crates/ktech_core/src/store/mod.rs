//! Typed JSON stores over the key-value repository.
//!
//! # Responsibility
//! - Map each piece of application state to its fixed storage key.
//! - Load state on startup and write the full structure on every mutation.
//!
//! # Invariants
//! - A missing key and an unparsable value both load as the default value.
//! - Repository (transport) failures are never masked.

use crate::repo::kv_repo::{KvRepository, RepoError};
use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod session_store;
pub mod settings_store;
pub mod task_store;
pub mod user_ledger;

pub const CURRENT_USER_KEY: &str = "currentUser";
pub const TASKS_KEY: &str = "userTasks";
pub const SETTINGS_KEY: &str = "userSettings";
pub const REGISTERED_USERS_KEY: &str = "registeredUsers";

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug)]
pub enum StoreError {
    Repo(RepoError),
    Encode {
        key: &'static str,
        source: serde_json::Error,
    },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::Encode { key, source } => write!(f, "failed to encode `{key}`: {source}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Encode { source, .. } => Some(source),
        }
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Reads and decodes `key`, returning `None` when absent or unparsable.
pub(crate) fn load_json<T, R>(repo: &R, key: &'static str) -> StoreResult<Option<T>>
where
    T: DeserializeOwned,
    R: KvRepository + ?Sized,
{
    let Some(raw) = repo.get(key)? else {
        return Ok(None);
    };

    match serde_json::from_str::<T>(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(err) => {
            warn!(
                "event=storage_parse_failed module=store status=defaulted key={key} line={} column={}",
                err.line(),
                err.column()
            );
            Ok(None)
        }
    }
}

pub(crate) fn save_json<T, R>(repo: &R, key: &'static str, value: &T) -> StoreResult<()>
where
    T: Serialize + ?Sized,
    R: KvRepository + ?Sized,
{
    let encoded =
        serde_json::to_string(value).map_err(|source| StoreError::Encode { key, source })?;
    repo.put(key, &encoded)?;
    Ok(())
}
