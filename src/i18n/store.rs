// SPDX-License-Identifier: MPL-2.0
//! The locale store: active locale, its messages, and change listeners.
//!
//! The application root creates one `Rc<LocaleStore>` and hands clones to
//! every component that renders text. Components subscribe on mount, keep the
//! returned [`Subscription`], and call [`Subscription::unsubscribe`] on
//! unmount.
//!
//! # Invariants
//!
//! - The active locale and its message map are replaced together in a single
//!   assignment; no reader can observe one without the other.
//! - [`LocaleStore::set_locale`] runs every listener exactly once, in
//!   subscription order, before it returns.
//! - No internal borrow is held while listeners run, so a listener may read
//!   the store, switch locale again, subscribe or unsubscribe.

use super::catalog::{Catalog, MessageMap};
use super::detect;
use super::locale::Locale;
use super::preference::Preferences;
use crate::storage::{ClientStorage, Cookie};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::Arc;

/// Zero-argument callback run after every locale change.
pub type Listener = Rc<dyn Fn()>;

/// Stable identity of a registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct Entry {
    id: ListenerId,
    listener: Listener,
    live: Cell<bool>,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    entries: Vec<Rc<Entry>>,
}

impl Registry {
    fn insert(&mut self, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push(Rc::new(Entry {
            id,
            listener,
            live: Cell::new(true),
        }));
        id
    }

    /// Unlinks the entry and clears its `live` flag, so an in-flight
    /// notification pass holding the entry skips it.
    fn remove(&mut self, id: ListenerId) -> bool {
        let Some(index) = self.entries.iter().position(|entry| entry.id == id) else {
            return false;
        };
        self.entries.remove(index).live.set(false);
        true
    }

    fn contains(&self, id: ListenerId) -> bool {
        self.entries.iter().any(|entry| entry.id == id)
    }
}

/// Handle returned by [`LocaleStore::subscribe`].
///
/// Dropping the handle does not unsubscribe.
#[must_use = "keep the subscription to be able to unsubscribe"]
#[derive(Debug, Clone)]
pub struct Subscription {
    id: ListenerId,
    registry: Weak<RefCell<Registry>>,
}

impl Subscription {
    #[must_use]
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Removes the listener. Calling this more than once is harmless.
    pub fn unsubscribe(&self) {
        if let Some(registry) = self.registry.upgrade() {
            if registry.borrow_mut().remove(self.id) {
                tracing::trace!(id = self.id.0, "listener removed");
            }
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.registry
            .upgrade()
            .is_some_and(|registry| registry.borrow().contains(self.id))
    }
}

struct Active {
    locale: Locale,
    messages: Arc<MessageMap>,
}

pub struct LocaleStore {
    catalog: Catalog,
    preferences: Preferences,
    active: RefCell<Active>,
    registry: Rc<RefCell<Registry>>,
}

impl fmt::Debug for LocaleStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocaleStore")
            .field("locale", &self.active.borrow().locale)
            .field("listeners", &self.listener_count())
            .field("available_locales", &self.catalog.available_locales())
            .finish()
    }
}

impl LocaleStore {
    /// Creates a store on the default locale.
    #[must_use]
    pub fn new(catalog: Catalog) -> Self {
        Self::with_locale(catalog, Locale::default())
    }

    #[must_use]
    pub fn with_locale(catalog: Catalog, locale: Locale) -> Self {
        let active = RefCell::new(Active {
            messages: messages_for(&catalog, &locale),
            locale,
        });
        Self {
            catalog,
            preferences: Preferences::default(),
            active,
            registry: Rc::default(),
        }
    }

    /// Replaces the storage key and cookie settings used by
    /// [`save_preference`](Self::save_preference) and detection.
    #[must_use]
    pub fn with_preferences(mut self, preferences: Preferences) -> Self {
        self.preferences = preferences;
        self
    }

    /// Switches the active locale and notifies every listener.
    ///
    /// Locales without a bundle are accepted; lookups then resolve through
    /// the fallback chain.
    pub fn set_locale(&self, locale: Locale) {
        let messages = messages_for(&self.catalog, &locale);
        if messages.is_empty() {
            tracing::debug!(%locale, "no messages for locale");
        }
        *self.active.borrow_mut() = Active {
            locale: locale.clone(),
            messages,
        };
        tracing::debug!(%locale, listeners = self.listener_count(), "locale changed");
        self.notify();
    }

    #[must_use]
    pub fn locale(&self) -> Locale {
        self.active.borrow().locale.clone()
    }

    /// Message map of the active locale.
    #[must_use]
    pub fn messages(&self) -> Arc<MessageMap> {
        Arc::clone(&self.active.borrow().messages)
    }

    /// Looks up `key`; falls back to `fallback`, then to `key` itself.
    #[must_use]
    pub fn translate(&self, key: &str, fallback: Option<&str>) -> String {
        let active = self.active.borrow();
        resolve(&active.messages, key, fallback).to_string()
    }

    /// Shorthand for `translate(key, None)`.
    #[must_use]
    pub fn tr(&self, key: &str) -> String {
        self.translate(key, None)
    }

    /// Translates `key` and substitutes `{name}` placeholders from `args`.
    ///
    /// Substitution is a single pass; placeholders without an argument are
    /// left as written.
    #[must_use]
    pub fn translate_with(&self, key: &str, args: &[(&str, &str)]) -> String {
        let active = self.active.borrow();
        interpolate(resolve(&active.messages, key, None), args)
    }

    pub fn subscribe(&self, listener: impl Fn() + 'static) -> Subscription {
        let id = self.registry.borrow_mut().insert(Rc::new(listener));
        tracing::trace!(id = id.0, "listener added");
        Subscription {
            id,
            registry: Rc::downgrade(&self.registry),
        }
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.registry.borrow().entries.len()
    }

    #[must_use]
    pub fn available_locales(&self) -> &[Locale] {
        self.catalog.available_locales()
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    /// Detects the initial locale from `storage` and the OS language.
    ///
    /// Independent of the store's current locale.
    #[must_use]
    pub fn detect_browser_locale(&self, storage: Option<&dyn ClientStorage>) -> Locale {
        detect::detect_browser_locale(storage, &self.preferences, self.available_locales())
    }

    /// Persists `locale` to `storage`; a no-op when `storage` is `None`.
    ///
    /// Returns the preference cookie if it was stored.
    pub fn save_preference(
        &self,
        storage: Option<&mut dyn ClientStorage>,
        locale: &Locale,
    ) -> Option<Cookie> {
        self.preferences.save(storage, locale)
    }

    fn notify(&self) {
        let snapshot: Vec<Rc<Entry>> = self.registry.borrow().entries.clone();

        for entry in snapshot {
            // Skip listeners removed by an earlier listener in this pass.
            if entry.live.get() {
                (entry.listener)();
            }
        }
    }
}

fn messages_for(catalog: &Catalog, locale: &Locale) -> Arc<MessageMap> {
    catalog.messages(locale).unwrap_or_default()
}

fn resolve<'a>(messages: &'a MessageMap, key: &'a str, fallback: Option<&'a str>) -> &'a str {
    match (messages.get(key), fallback) {
        (Some(value), _) => value,
        (None, Some(fallback)) => fallback,
        (None, None) => key,
    }
}

fn interpolate(template: &str, args: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            out.push_str(&rest[open..]);
            return out;
        };
        let name = &after[..close];
        match args.iter().find(|(arg, _)| *arg == name) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&rest[open..open + close + 2]),
        }
        rest = &after[close + 1..];
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locale(tag: &str) -> Locale {
        Locale::parse(tag).unwrap()
    }

    fn test_catalog() -> Catalog {
        Catalog::from_bundles([
            (
                locale("en"),
                [("nav.home", "Home"), ("greet", "Hello, {name}!")]
                    .into_iter()
                    .collect(),
            ),
            (
                locale("es"),
                [("nav.home", "Inicio"), ("greet", "¡Hola, {name}!")]
                    .into_iter()
                    .collect(),
            ),
        ])
    }

    #[test]
    fn starts_on_default_locale() {
        let store = LocaleStore::new(test_catalog());
        assert_eq!(store.locale(), Locale::default());
        assert_eq!(store.tr("nav.home"), "Home");
    }

    #[test]
    fn set_locale_swaps_messages_with_locale() {
        let store = LocaleStore::new(test_catalog());
        store.set_locale(locale("es"));
        assert_eq!(store.locale(), locale("es"));
        assert_eq!(store.tr("nav.home"), "Inicio");
        assert_eq!(store.messages().get("nav.home"), Some("Inicio"));
    }

    #[test]
    fn translate_fallback_chain() {
        let store = LocaleStore::new(test_catalog());
        assert_eq!(store.translate("nav.home", Some("X")), "Home");
        assert_eq!(store.translate("welcome.title", Some("Hello")), "Hello");
        assert_eq!(store.translate("welcome.title", None), "welcome.title");
    }

    #[test]
    fn unknown_locale_is_accepted_with_empty_messages() {
        let store = LocaleStore::new(test_catalog());
        store.set_locale(locale("fr"));
        assert_eq!(store.locale(), locale("fr"));
        assert!(store.messages().is_empty());
        assert_eq!(store.tr("nav.home"), "nav.home");
    }

    #[test]
    fn listeners_run_once_in_subscription_order() {
        let store = LocaleStore::new(test_catalog());
        let calls = Rc::new(RefCell::new(Vec::new()));

        let subs: Vec<Subscription> = (0..3)
            .map(|n| {
                let calls = Rc::clone(&calls);
                store.subscribe(move || calls.borrow_mut().push(n))
            })
            .collect();

        store.set_locale(locale("es"));
        assert_eq!(*calls.borrow(), vec![0, 1, 2]);
        assert_eq!(subs.len(), store.listener_count());
    }

    #[test]
    fn unsubscribe_is_idempotent_and_removes_only_that_listener() {
        let store = LocaleStore::new(test_catalog());
        let first = Rc::new(Cell::new(0));
        let second = Rc::new(Cell::new(0));

        let sub_first = {
            let first = Rc::clone(&first);
            store.subscribe(move || first.set(first.get() + 1))
        };
        let _sub_second = {
            let second = Rc::clone(&second);
            store.subscribe(move || second.set(second.get() + 1))
        };

        sub_first.unsubscribe();
        sub_first.unsubscribe();
        assert!(!sub_first.is_active());

        store.set_locale(locale("es"));
        assert_eq!(first.get(), 0);
        assert_eq!(second.get(), 1);
        assert_eq!(store.listener_count(), 1);
    }

    #[test]
    fn listener_can_read_store_during_notification() {
        let store = Rc::new(LocaleStore::new(test_catalog()));
        let seen = Rc::new(RefCell::new(String::new()));

        let _sub = {
            let weak = Rc::downgrade(&store);
            let seen = Rc::clone(&seen);
            store.subscribe(move || {
                if let Some(store) = weak.upgrade() {
                    *seen.borrow_mut() = store.tr("nav.home");
                }
            })
        };

        store.set_locale(locale("es"));
        assert_eq!(*seen.borrow(), "Inicio");
    }

    #[test]
    fn listener_can_switch_locale_reentrantly() {
        let store = Rc::new(LocaleStore::new(test_catalog()));
        let hits = Rc::new(Cell::new(0));

        let _sub = {
            let weak = Rc::downgrade(&store);
            let hits = Rc::clone(&hits);
            store.subscribe(move || {
                hits.set(hits.get() + 1);
                if let Some(store) = weak.upgrade() {
                    if store.locale() == locale("es") {
                        store.set_locale(locale("pt"));
                    }
                }
            })
        };

        store.set_locale(locale("es"));
        assert_eq!(store.locale(), locale("pt"));
        assert!(store.messages().is_empty());
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn resubscribing_does_not_revive_a_removed_entry() {
        let store = LocaleStore::new(test_catalog());
        let calls = Rc::new(Cell::new(0));
        let sub = {
            let calls = Rc::clone(&calls);
            store.subscribe(move || calls.set(calls.get() + 1))
        };
        sub.unsubscribe();
        let _again = {
            let calls = Rc::clone(&calls);
            store.subscribe(move || calls.set(calls.get() + 10))
        };

        store.set_locale(locale("es"));
        assert!(!sub.is_active());
        assert_eq!(calls.get(), 10);
    }

    #[test]
    fn subscribing_during_notification_does_not_panic() {
        let store = Rc::new(LocaleStore::new(test_catalog()));
        let late_calls = Rc::new(Cell::new(0));

        let _sub = {
            let weak = Rc::downgrade(&store);
            let late_calls = Rc::clone(&late_calls);
            store.subscribe(move || {
                if let Some(store) = weak.upgrade() {
                    let late_calls = Rc::clone(&late_calls);
                    let _late = store.subscribe(move || late_calls.set(late_calls.get() + 1));
                }
            })
        };

        store.set_locale(locale("es"));
        assert_eq!(late_calls.get(), 0);
        assert_eq!(store.listener_count(), 2);
    }

    #[test]
    fn listener_removed_mid_pass_is_skipped() {
        let store = LocaleStore::new(test_catalog());
        let victim_calls = Rc::new(Cell::new(0));
        let victim_slot: Rc<RefCell<Option<Subscription>>> = Rc::default();

        let _killer = {
            let victim_slot = Rc::clone(&victim_slot);
            store.subscribe(move || {
                if let Some(victim) = victim_slot.borrow().as_ref() {
                    victim.unsubscribe();
                }
            })
        };
        let victim = {
            let victim_calls = Rc::clone(&victim_calls);
            store.subscribe(move || victim_calls.set(victim_calls.get() + 1))
        };
        *victim_slot.borrow_mut() = Some(victim);

        store.set_locale(locale("es"));
        assert_eq!(victim_calls.get(), 0);
    }

    #[test]
    fn unsubscribe_after_store_is_dropped_is_harmless() {
        let store = LocaleStore::new(test_catalog());
        let sub = store.subscribe(|| {});
        drop(store);
        sub.unsubscribe();
        assert!(!sub.is_active());
    }

    #[test]
    fn translate_with_substitutes_placeholders() {
        let store = LocaleStore::new(test_catalog());
        assert_eq!(store.translate_with("greet", &[("name", "Ana")]), "Hello, Ana!");
        store.set_locale(locale("es"));
        assert_eq!(store.translate_with("greet", &[("name", "Ana")]), "¡Hola, Ana!");
    }

    #[test]
    fn interpolate_leaves_unknown_and_unclosed_placeholders() {
        assert_eq!(interpolate("a {x} b", &[]), "a {x} b");
        assert_eq!(interpolate("open {x", &[("x", "1")]), "open {x");
        assert_eq!(interpolate("{x}{y}", &[("x", "{y}"), ("y", "2")]), "{y}2");
        assert_eq!(interpolate("no braces", &[("x", "1")]), "no braces");
    }
}
