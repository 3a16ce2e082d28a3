//! Preference DTOs

use serde::{Deserialize, Serialize};

use domain_session::{Preferences, Theme};

#[derive(Debug, Default, Deserialize)]
pub struct SidebarToggleRequest {
    /// Forces the sidebar open or closed instead of flipping it
    pub open: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct PreferencesResponse {
    pub theme: Theme,
    pub sidebar_open: bool,
}

impl From<Preferences> for PreferencesResponse {
    fn from(preferences: Preferences) -> Self {
        Self {
            theme: preferences.theme,
            sidebar_open: preferences.sidebar_open,
        }
    }
}
