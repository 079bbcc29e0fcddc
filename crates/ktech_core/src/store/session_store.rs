//! Signed-in user held across restarts.

use crate::model::user::User;
use crate::repo::kv_repo::KvRepository;
use crate::store::{load_json, save_json, StoreResult, CURRENT_USER_KEY};
use log::info;

#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    user: Option<User>,
}

impl SessionStore {
    pub fn load<R: KvRepository + ?Sized>(repo: &R) -> StoreResult<Self> {
        let user: Option<User> = load_json(repo, CURRENT_USER_KEY)?;
        info!(
            "event=session_restore module=store status=ok signed_in={}",
            user.is_some()
        );
        Ok(Self { user })
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }

    /// Writes `user` as the current session (login, signup, profile edit).
    pub fn set<R: KvRepository + ?Sized>(&mut self, repo: &R, user: User) -> StoreResult<()> {
        save_json(repo, CURRENT_USER_KEY, &user)?;
        self.user = Some(user);
        Ok(())
    }

    /// Ends the session. The account itself stays in the ledger.
    pub fn clear<R: KvRepository + ?Sized>(&mut self, repo: &R) -> StoreResult<()> {
        repo.remove(CURRENT_USER_KEY)?;
        self.user = None;
        Ok(())
    }
}
