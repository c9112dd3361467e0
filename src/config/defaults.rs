// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for configuration constants.

// ==========================================================================
// Preference Persistence Defaults
// ==========================================================================

/// Client storage key holding the preferred locale tag.
pub const DEFAULT_STORAGE_KEY: &str = "preferred_locale";

/// Cookie mirroring the preferred locale for server-rendered paths.
pub const DEFAULT_COOKIE_NAME: &str = "locale";

/// Cookie lifetime in days (one year).
pub const DEFAULT_COOKIE_MAX_AGE_DAYS: u32 = 365;

/// Shortest accepted cookie lifetime in days.
pub const MIN_COOKIE_MAX_AGE_DAYS: u32 = 1;

/// Longest accepted cookie lifetime in days (browsers cap at ~400).
pub const MAX_COOKIE_MAX_AGE_DAYS: u32 = 400;

// ==========================================================================
// Compile-time Validation
// ==========================================================================

const _: () = {
    assert!(MIN_COOKIE_MAX_AGE_DAYS > 0);
    assert!(MAX_COOKIE_MAX_AGE_DAYS >= MIN_COOKIE_MAX_AGE_DAYS);
    assert!(DEFAULT_COOKIE_MAX_AGE_DAYS >= MIN_COOKIE_MAX_AGE_DAYS);
    assert!(DEFAULT_COOKIE_MAX_AGE_DAYS <= MAX_COOKIE_MAX_AGE_DAYS);
};
