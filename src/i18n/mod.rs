// SPDX-License-Identifier: MPL-2.0
//! Internationalization (i18n) support.
//!
//! # Features
//!
//! - Translation bundles embedded at build time, one JSON file per locale
//! - A [`LocaleStore`] that broadcasts locale changes to subscribed components
//! - Locale detection from a stored preference or the system language
//! - Preference persistence to client storage and a long-lived cookie
//! - Fallback to a caller-provided string, then to the key itself

pub mod catalog;
pub mod detect;
pub mod locale;
pub mod preference;
pub mod store;

pub use catalog::{Catalog, MessageMap};
pub use detect::{detect_browser_locale, detect_locale};
pub use locale::Locale;
pub use preference::{save_preference, Preferences};
pub use store::{Listener, ListenerId, LocaleStore, Subscription};
