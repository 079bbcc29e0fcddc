//! Registered account ledger.
//!
//! Read fresh from storage on every call, so accounts created by another
//! store instance on the same database are visible immediately.

use crate::model::user::RegisteredUser;
use crate::repo::kv_repo::KvRepository;
use crate::store::{load_json, save_json, StoreResult, REGISTERED_USERS_KEY};

pub struct UserLedger<R: KvRepository> {
    repo: R,
}

impl<R: KvRepository> UserLedger<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn list(&self) -> StoreResult<Vec<RegisteredUser>> {
        Ok(load_json(&self.repo, REGISTERED_USERS_KEY)?.unwrap_or_default())
    }

    /// Exact, case-sensitive email match.
    pub fn find_by_email(&self, email: &str) -> StoreResult<Option<RegisteredUser>> {
        Ok(self.list()?.into_iter().find(|user| user.email == email))
    }

    /// Appends one account. Uniqueness is checked by the caller.
    pub fn append(&self, account: RegisteredUser) -> StoreResult<()> {
        let mut accounts = self.list()?;
        accounts.push(account);
        save_json(&self.repo, REGISTERED_USERS_KEY, &accounts)
    }
}
