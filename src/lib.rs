// SPDX-License-Identifier: MPL-2.0
//! `locale_store` keeps the active UI language and its translated strings in
//! one place and tells subscribed components when the language changes.
//!
//! It also detects the initial language from a stored preference or the
//! system locale, and persists the user's choice to client storage.

#![doc(html_root_url = "https://docs.rs/locale_store/0.3.0")]

pub mod config;
pub mod error;
pub mod i18n;
pub mod logging;
pub mod paths;
pub mod storage;
