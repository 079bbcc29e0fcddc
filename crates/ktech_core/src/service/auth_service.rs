//! Local mock authentication.
//!
//! # Responsibility
//! - Validate signup/login form input and report one message per attempt.
//! - Register accounts in the ledger and match credentials on login.
//!
//! # Invariants
//! - Validation runs in a fixed order; the first failure wins.
//! - Email uniqueness is exact-match, case-sensitive.
//! - Credentials and emails are never logged.

use crate::model::user::{RegisteredUser, User, UserId};
use crate::repo::kv_repo::KvRepository;
use crate::store::user_ledger::UserLedger;
use crate::store::StoreError;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

pub const MIN_USERNAME_CHARS: usize = 3;
pub const MIN_PASSWORD_CHARS: usize = 6;
pub const DEFAULT_AUTH_LATENCY: Duration = Duration::from_secs(1);

#[derive(Debug)]
pub enum AuthError {
    MissingFields,
    UsernameTooShort,
    InvalidEmail,
    PasswordTooShort,
    PasswordMismatch,
    AccountExists,
    InvalidCredentials,
    Store(StoreError),
}

impl AuthError {
    /// Stable reason code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingFields => "missing_fields",
            Self::UsernameTooShort => "username_too_short",
            Self::InvalidEmail => "invalid_email",
            Self::PasswordTooShort => "password_too_short",
            Self::PasswordMismatch => "password_mismatch",
            Self::AccountExists => "account_exists",
            Self::InvalidCredentials => "invalid_credentials",
            Self::Store(_) => "storage",
        }
    }
}

impl Display for AuthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingFields => write!(f, "Please fill in all fields"),
            Self::UsernameTooShort => write!(
                f,
                "Username must be at least {MIN_USERNAME_CHARS} characters long"
            ),
            Self::InvalidEmail => write!(f, "Please enter a valid email address"),
            Self::PasswordTooShort => write!(
                f,
                "Password must be at least {MIN_PASSWORD_CHARS} characters long"
            ),
            Self::PasswordMismatch => write!(f, "Passwords do not match"),
            Self::AccountExists => write!(f, "An account with this email already exists"),
            Self::InvalidCredentials => write!(f, "Invalid email or password"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AuthError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for AuthError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Signup form input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

pub struct AuthService<R: KvRepository> {
    ledger: UserLedger<R>,
    latency: Duration,
}

impl<R: KvRepository> AuthService<R> {
    pub fn new(repo: R) -> Self {
        Self::with_latency(repo, DEFAULT_AUTH_LATENCY)
    }

    /// `latency` is slept before validating each attempt.
    pub fn with_latency(repo: R, latency: Duration) -> Self {
        Self {
            ledger: UserLedger::new(repo),
            latency,
        }
    }

    /// Registers a new account under `id` and returns its session user.
    pub fn signup(&self, request: &SignupRequest, id: UserId) -> Result<User, AuthError> {
        self.simulate_latency();
        let result = self.try_signup(request, id);
        log_outcome("auth_signup", &result);
        result
    }

    /// Matches email and password against the ledger.
    pub fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        self.simulate_latency();
        let result = self.try_login(email, password);
        log_outcome("auth_login", &result);
        result
    }

    fn try_signup(&self, request: &SignupRequest, id: UserId) -> Result<User, AuthError> {
        validate_signup(request)?;
        if self.ledger.find_by_email(&request.email)?.is_some() {
            return Err(AuthError::AccountExists);
        }

        let account = RegisteredUser {
            id,
            username: request.username.clone(),
            email: request.email.clone(),
            password: request.password.clone(),
        };
        let user = account.to_user();
        self.ledger.append(account)?;
        Ok(user)
    }

    fn try_login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        if email.is_empty() || password.is_empty() {
            return Err(AuthError::MissingFields);
        }
        if !email.contains('@') {
            return Err(AuthError::InvalidEmail);
        }

        self.ledger
            .list()?
            .into_iter()
            .find(|account| account.email == email && account.password == password)
            .map(|account| account.to_user())
            .ok_or(AuthError::InvalidCredentials)
    }

    fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            std::thread::sleep(self.latency);
        }
    }
}

fn validate_signup(request: &SignupRequest) -> Result<(), AuthError> {
    let fields = [
        &request.username,
        &request.email,
        &request.password,
        &request.confirm_password,
    ];
    if fields.iter().any(|field| field.is_empty()) {
        return Err(AuthError::MissingFields);
    }
    if request.username.chars().count() < MIN_USERNAME_CHARS {
        return Err(AuthError::UsernameTooShort);
    }
    if !request.email.contains('@') || !request.email.contains('.') {
        return Err(AuthError::InvalidEmail);
    }
    if request.password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(AuthError::PasswordTooShort);
    }
    if request.password != request.confirm_password {
        return Err(AuthError::PasswordMismatch);
    }
    Ok(())
}

fn log_outcome(event: &str, result: &Result<User, AuthError>) {
    match result {
        Ok(user) => info!("event={event} module=auth status=ok user_id={}", user.id),
        Err(err) => warn!(
            "event={event} module=auth status=rejected reason={}",
            err.code()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::{validate_signup, AuthError, SignupRequest};

    fn request() -> SignupRequest {
        SignupRequest {
            username: "ada".to_string(),
            email: "a@b.com".to_string(),
            password: "secret1".to_string(),
            confirm_password: "secret1".to_string(),
        }
    }

    #[test]
    fn valid_request_passes() {
        assert!(validate_signup(&request()).is_ok());
    }

    #[test]
    fn validation_reports_first_failure_in_order() {
        let mut missing = request();
        missing.confirm_password.clear();
        missing.username = "x".to_string();
        assert!(matches!(
            validate_signup(&missing),
            Err(AuthError::MissingFields)
        ));

        let mut short = request();
        short.username = "al".to_string();
        short.email = "nope".to_string();
        assert!(matches!(
            validate_signup(&short),
            Err(AuthError::UsernameTooShort)
        ));

        let mut no_dot = request();
        no_dot.email = "a@b".to_string();
        assert!(matches!(validate_signup(&no_dot), Err(AuthError::InvalidEmail)));

        let mut weak = request();
        weak.password = "12345".to_string();
        weak.confirm_password = "12345".to_string();
        assert!(matches!(
            validate_signup(&weak),
            Err(AuthError::PasswordTooShort)
        ));

        let mut mismatch = request();
        mismatch.confirm_password = "secret2".to_string();
        assert!(matches!(
            validate_signup(&mismatch),
            Err(AuthError::PasswordMismatch)
        ));
    }

    #[test]
    fn messages_match_form_copy() {
        assert_eq!(
            AuthError::UsernameTooShort.to_string(),
            "Username must be at least 3 characters long"
        );
        assert_eq!(
            AuthError::AccountExists.to_string(),
            "An account with this email already exists"
        );
    }
}
