// SPDX-License-Identifier: MPL-2.0
//! Translation bundles.
//!
//! Every supported locale ships one flat `key -> string` JSON file under
//! `assets/i18n/`, embedded at build time and parsed once when the
//! [`Catalog`] is built.

use super::locale::Locale;
use crate::error::{Error, Result};
use rust_embed::RustEmbed;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(RustEmbed)]
#[folder = "assets/i18n/"]
struct Asset;

/// Flat mapping from translation key to localized string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageMap(HashMap<String, String>);

impl MessageMap {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MessageMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// The set of bundles known to the application, one per supported locale.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    bundles: HashMap<Locale, Arc<MessageMap>>,
    available_locales: Vec<Locale>,
}

impl Catalog {
    /// Loads every `<locale>.json` bundle embedded in the binary.
    ///
    /// Files whose stem is not a language tag are skipped; a bundle that is
    /// not a flat JSON object of strings is an error.
    pub fn embedded() -> Result<Self> {
        let mut catalog = Self::default();

        for file in Asset::iter() {
            let filename = file.as_ref();
            let Some(stem) = filename.strip_suffix(".json") else {
                continue;
            };
            let Ok(locale) = Locale::parse(stem) else {
                tracing::debug!(file = filename, "skipping bundle with non-locale name");
                continue;
            };
            let Some(content) = Asset::get(filename) else {
                continue;
            };
            let json = std::str::from_utf8(content.data.as_ref())
                .map_err(|err| Error::Bundle(format!("{}: {}", filename, err)))?;
            let messages = MessageMap::from_json(json)
                .map_err(|err| Error::Bundle(format!("{}: {}", filename, err)))?;
            catalog.insert(locale, messages);
        }

        tracing::debug!(locales = catalog.available_locales.len(), "loaded embedded catalog");
        Ok(catalog)
    }

    /// Builds a catalog from in-memory bundles.
    pub fn from_bundles<I>(bundles: I) -> Self
    where
        I: IntoIterator<Item = (Locale, MessageMap)>,
    {
        let mut catalog = Self::default();
        for (locale, messages) in bundles {
            catalog.insert(locale, messages);
        }
        catalog
    }

    /// Adds or replaces the bundle for `locale`.
    pub fn insert(&mut self, locale: Locale, messages: MessageMap) {
        if self.bundles.insert(locale.clone(), Arc::new(messages)).is_none() {
            self.available_locales.push(locale);
            self.available_locales
                .sort_by_key(|locale| locale.to_string());
        }
    }

    /// Locales that have a bundle, sorted by tag.
    #[must_use]
    pub fn available_locales(&self) -> &[Locale] {
        &self.available_locales
    }

    #[must_use]
    pub fn supports(&self, locale: &Locale) -> bool {
        self.bundles.contains_key(locale)
    }

    #[must_use]
    pub fn messages(&self, locale: &Locale) -> Option<Arc<MessageMap>> {
        self.bundles.get(locale).cloned()
    }

    /// Keys of the default-locale bundle that `locale` does not translate.
    ///
    /// Returns every reference key when `locale` has no bundle at all.
    #[must_use]
    pub fn missing_keys(&self, locale: &Locale) -> Vec<String> {
        let Some(reference) = self.bundles.get(&Locale::default()) else {
            return Vec::new();
        };
        let target = self.bundles.get(locale);
        let mut missing: Vec<String> = reference
            .keys()
            .filter(|key| !target.is_some_and(|messages| messages.contains_key(key)))
            .map(str::to_string)
            .collect();
        missing.sort();
        missing
    }
}
