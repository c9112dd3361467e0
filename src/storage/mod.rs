// SPDX-License-Identifier: MPL-2.0
//! Durable client storage.
//!
//! A small key/value facility scoped to the user, plus a cookie channel that
//! server-rendered paths can observe. Environments without client storage
//! (server-side rendering, sandboxes) simply pass `None` where a storage is
//! expected.

pub mod cookie;
pub mod file;

pub use cookie::{cookie_value, Cookie};
pub use file::FileStorage;

use crate::error::Result;
use chrono::Utc;
use std::collections::HashMap;

/// Key/value storage with a cookie side channel.
pub trait ClientStorage {
    fn get_item(&self, key: &str) -> Option<String>;

    fn set_item(&mut self, key: &str, value: &str) -> Result<()>;

    /// Returns the value of a cookie unless it is missing or expired.
    fn cookie(&self, name: &str) -> Option<String>;

    fn set_cookie(&mut self, cookie: Cookie) -> Result<()>;
}

/// Volatile storage, lost with the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
    cookies: HashMap<String, Cookie>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw cookie lookup, including expired ones.
    #[must_use]
    pub fn raw_cookie(&self, name: &str) -> Option<&Cookie> {
        self.cookies.get(name)
    }
}

impl ClientStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn cookie(&self, name: &str) -> Option<String> {
        self.cookies
            .get(name)
            .filter(|cookie| !cookie.is_expired_at(Utc::now()))
            .map(|cookie| cookie.value.clone())
    }

    fn set_cookie(&mut self, cookie: Cookie) -> Result<()> {
        self.cookies.insert(cookie.name.clone(), cookie);
        Ok(())
    }
}
