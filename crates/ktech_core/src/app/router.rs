//! Screen state and navigation rules.
//!
//! Only the discrete screen selection lives here; rendering belongs to the
//! presentation layer.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    Login,
    Signup,
    Home,
    Detail,
    Settings,
    Profile,
    Favorites,
    About,
    Help,
}

impl Screen {
    /// Screen shown at startup.
    pub fn initial(signed_in: bool) -> Self {
        if signed_in {
            Self::Home
        } else {
            Self::Login
        }
    }

    /// Destination of the back action.
    pub fn back_target(self) -> Self {
        match self {
            Self::About | Self::Help => Self::Settings,
            Self::Signup => Self::Login,
            Self::Login => Self::Login,
            Self::Home | Self::Detail | Self::Settings | Self::Profile | Self::Favorites => {
                Self::Home
            }
        }
    }

    pub fn requires_session(self) -> bool {
        !matches!(self, Self::Login | Self::Signup)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Signup => "signup",
            Self::Home => "home",
            Self::Detail => "detail",
            Self::Settings => "settings",
            Self::Profile => "profile",
            Self::Favorites => "favorites",
            Self::About => "about",
            Self::Help => "help",
        }
    }
}
