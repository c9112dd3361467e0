// SPDX-License-Identifier: MPL-2.0
//! Persisting the user's locale choice.
//!
//! The tag is written to client storage under a fixed key and mirrored into a
//! long-lived cookie. Persistence is always an explicit call; switching the
//! active locale never writes anything.

use super::locale::Locale;
use crate::config::{
    PreferenceConfig, DEFAULT_COOKIE_MAX_AGE_DAYS, DEFAULT_COOKIE_NAME, DEFAULT_STORAGE_KEY,
    MAX_COOKIE_MAX_AGE_DAYS, MIN_COOKIE_MAX_AGE_DAYS,
};
use crate::storage::{ClientStorage, Cookie};
use chrono::TimeDelta;

/// Where the preference is stored and how long the cookie lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preferences {
    storage_key: String,
    cookie_name: String,
    cookie_max_age: TimeDelta,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            cookie_name: DEFAULT_COOKIE_NAME.to_string(),
            cookie_max_age: TimeDelta::days(i64::from(DEFAULT_COOKIE_MAX_AGE_DAYS)),
        }
    }
}

impl From<&PreferenceConfig> for Preferences {
    fn from(config: &PreferenceConfig) -> Self {
        let days = config
            .cookie_max_age_days
            .clamp(MIN_COOKIE_MAX_AGE_DAYS, MAX_COOKIE_MAX_AGE_DAYS);
        Self {
            storage_key: config.storage_key.clone(),
            cookie_name: config.cookie_name.clone(),
            cookie_max_age: TimeDelta::days(i64::from(days)),
        }
    }
}

impl Preferences {
    #[must_use]
    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    #[must_use]
    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    #[must_use]
    pub fn cookie_max_age(&self) -> TimeDelta {
        self.cookie_max_age
    }

    /// Raw stored preference, unvalidated.
    #[must_use]
    pub fn stored(&self, storage: Option<&dyn ClientStorage>) -> Option<String> {
        storage.and_then(|storage| storage.get_item(&self.storage_key))
    }

    /// Writes `locale` to storage and to the preference cookie.
    ///
    /// Returns the cookie when it was stored. Without storage this does
    /// nothing; write failures are logged and otherwise ignored.
    pub fn save(
        &self,
        storage: Option<&mut dyn ClientStorage>,
        locale: &Locale,
    ) -> Option<Cookie> {
        let Some(storage) = storage else {
            tracing::debug!(%locale, "no client storage, preference not saved");
            return None;
        };

        let tag = locale.to_string();
        if let Err(err) = storage.set_item(&self.storage_key, &tag) {
            tracing::warn!(%err, key = %self.storage_key, "failed to store locale preference");
        }

        let cookie = Cookie::persistent(self.cookie_name.as_str(), tag, self.cookie_max_age);
        match storage.set_cookie(cookie.clone()) {
            Ok(()) => Some(cookie),
            Err(err) => {
                tracing::warn!(%err, cookie = %self.cookie_name, "failed to set locale cookie");
                None
            }
        }
    }
}

/// Saves `locale` with the default key and cookie settings.
pub fn save_preference(
    storage: Option<&mut dyn ClientStorage>,
    locale: &Locale,
) -> Option<Cookie> {
    Preferences::default().save(storage, locale)
}
