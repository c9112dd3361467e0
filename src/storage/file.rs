// SPDX-License-Identifier: MPL-2.0
//! Client storage persisted to a `storage.toml` file.
//!
//! Every write rewrites the whole document. A failed write leaves both the
//! file and the in-memory state unchanged.

use super::{ClientStorage, Cookie};
use crate::error::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const STORAGE_FILE: &str = "storage.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
struct Document {
    #[serde(default)]
    items: BTreeMap<String, String>,
    #[serde(default)]
    cookies: BTreeMap<String, Cookie>,
}

#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
    document: Document,
}

impl FileStorage {
    /// Opens the storage file at `path`.
    ///
    /// A missing file starts empty; an unreadable TOML document is discarded
    /// and replaced on the next write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let document = if path.exists() {
            let content = fs::read_to_string(&path)?;
            toml::from_str(&content).unwrap_or_else(|err| {
                tracing::warn!(path = %path.display(), %err, "discarding malformed storage file");
                Document::default()
            })
        } else {
            Document::default()
        };
        Ok(Self { path, document })
    }

    /// Opens `storage.toml` inside `dir`.
    pub fn open_in(dir: &Path) -> Result<Self> {
        Self::open(dir.join(STORAGE_FILE))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes `document` to disk and adopts it only if the write succeeds.
    fn commit(&mut self, document: Document) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(&document)?;
        fs::write(&self.path, content)?;
        self.document = document;
        Ok(())
    }
}

impl ClientStorage for FileStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.document.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        let mut document = self.document.clone();
        document.items.insert(key.to_string(), value.to_string());
        self.commit(document)
    }

    fn cookie(&self, name: &str) -> Option<String> {
        self.document
            .cookies
            .get(name)
            .filter(|cookie| !cookie.is_expired_at(Utc::now()))
            .map(|cookie| cookie.value.clone())
    }

    fn set_cookie(&mut self, cookie: Cookie) -> Result<()> {
        let mut document = self.document.clone();
        document.cookies.insert(cookie.name.clone(), cookie);
        self.commit(document)
    }
}
