// SPDX-License-Identifier: MPL-2.0
//! Cookie-style secondary preference channel.
//!
//! The locale preference is mirrored into a cookie so that server-rendered
//! paths can read it from the request headers.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// A named value with an absolute expiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    /// Expiry as a Unix timestamp in seconds.
    pub expires_at: i64,
    pub max_age_secs: i64,
}

impl Cookie {
    /// Creates a cookie expiring `max_age` from now.
    pub fn persistent(name: impl Into<String>, value: impl Into<String>, max_age: TimeDelta) -> Self {
        Self::persistent_at(name, value, max_age, Utc::now())
    }

    /// Creates a cookie expiring `max_age` after `now`.
    pub fn persistent_at(
        name: impl Into<String>,
        value: impl Into<String>,
        max_age: TimeDelta,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            expires_at: (now + max_age).timestamp(),
            max_age_secs: max_age.num_seconds(),
        }
    }

    #[must_use]
    pub fn expires(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.expires_at, 0)
    }

    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.expires_at
    }

    /// Renders the cookie as a `Set-Cookie` header value.
    #[must_use]
    pub fn to_header_value(&self) -> String {
        let mut header = format!(
            "{}={}; Path=/; Max-Age={}",
            self.name, self.value, self.max_age_secs
        );
        if let Some(expires) = self.expires() {
            header.push_str("; Expires=");
            header.push_str(&expires.format("%a, %d %b %Y %H:%M:%S GMT").to_string());
        }
        header.push_str("; SameSite=Lax");
        header
    }
}

/// Finds the value of cookie `name` in a `Cookie:` request header.
#[must_use]
pub fn cookie_value<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then_some(value)
    })
}
