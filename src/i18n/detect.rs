// SPDX-License-Identifier: MPL-2.0
//! Initial locale detection.
//!
//! Resolution order:
//! 1. the stored preference, if it names a supported locale
//! 2. the two-letter prefix of the environment's language signal, if supported
//! 3. the default locale (`en`)

use super::locale::Locale;
use super::preference::Preferences;
use crate::storage::ClientStorage;

/// Resolves a locale from explicit inputs.
///
/// Depends only on its arguments, so it can be evaluated anywhere, including
/// where neither storage nor an OS locale exists.
#[must_use]
pub fn detect_locale(
    stored: Option<&str>,
    language_signal: Option<&str>,
    supported: &[Locale],
) -> Locale {
    if let Some(locale) = stored
        .and_then(|tag| Locale::parse(tag).ok())
        .filter(|locale| locale.is_in(supported))
    {
        tracing::debug!(%locale, "using stored locale preference");
        return locale;
    }

    if let Some(locale) = language_signal
        .and_then(language_prefix)
        .and_then(|prefix| Locale::parse(&prefix).ok())
        .filter(|locale| locale.is_in(supported))
    {
        tracing::debug!(%locale, "using environment language");
        return locale;
    }

    Locale::default()
}

/// Detects the locale from client storage and the operating system language.
#[must_use]
pub fn detect_browser_locale(
    storage: Option<&dyn ClientStorage>,
    preferences: &Preferences,
    supported: &[Locale],
) -> Locale {
    let stored = preferences.stored(storage);
    let system = sys_locale::get_locale();
    detect_locale(stored.as_deref(), system.as_deref(), supported)
}

fn language_prefix(signal: &str) -> Option<String> {
    signal
        .trim()
        .get(..2)
        .filter(|prefix| prefix.chars().all(|c| c.is_ascii_alphabetic()))
        .map(str::to_ascii_lowercase)
}
