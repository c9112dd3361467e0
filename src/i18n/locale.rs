// SPDX-License-Identifier: MPL-2.0
//! Locale value type.
//!
//! A [`Locale`] is any syntactically valid language identifier. Whether a
//! locale is *supported* is decided by the [`Catalog`](super::catalog::Catalog)
//! that ships a bundle for it, not by this type.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use unic_langid::{langid, LanguageIdentifier};

/// Language tag of the active UI language (e.g. `en`, `pt`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Locale(LanguageIdentifier);

impl Locale {
    /// Parses a language tag, accepting `_` as a subtag separator.
    pub fn parse(tag: &str) -> Result<Self> {
        let normalized = tag.trim().replace('_', "-");
        normalized
            .parse::<LanguageIdentifier>()
            .map(Self)
            .map_err(|err| Error::Locale(format!("invalid language tag '{}': {}", tag, err)))
    }

    /// Primary language subtag, lowercase (`pt` for `pt-BR`).
    #[must_use]
    pub fn language(&self) -> &str {
        self.0.language.as_str()
    }

    #[must_use]
    pub fn as_langid(&self) -> &LanguageIdentifier {
        &self.0
    }

    /// Returns whether `self` is one of `supported`.
    #[must_use]
    pub fn is_in(&self, supported: &[Locale]) -> bool {
        supported.contains(self)
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self(langid!("en"))
    }
}

impl From<LanguageIdentifier> for Locale {
    fn from(id: LanguageIdentifier) -> Self {
        Self(id)
    }
}

impl FromStr for Locale {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Locale {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<Locale> for String {
    fn from(locale: Locale) -> Self {
        locale.to_string()
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}
