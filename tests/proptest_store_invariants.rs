// SPDX-License-Identifier: MPL-2.0
//! Property-based invariant tests for the locale store.
//!
//! 1. `set_locale` then `locale` returns the same locale
//! 2. The active messages always belong to the active locale
//! 3. Absent keys resolve to the fallback, or to the key itself
//! 4. Each registered listener runs exactly once per `set_locale`
//! 5. Detection always yields a supported locale
//! 6. Interpolation without placeholders is the identity

use locale_store::i18n::{detect_locale, Catalog, Locale, LocaleStore};
use proptest::prelude::*;
use std::cell::Cell;
use std::rc::Rc;

// ── Helpers ──────────────────────────────────────────────────────────

const TAGS: [&str; 4] = ["en", "es", "pt", "cl"];

fn supported() -> Vec<Locale> {
    TAGS.iter().map(|tag| Locale::parse(tag).unwrap()).collect()
}

fn catalog() -> Catalog {
    Catalog::from_bundles(TAGS.iter().map(|tag| {
        (
            Locale::parse(tag).unwrap(),
            [("owner", tag.to_string()), ("plain", "no placeholders".to_string())]
                .into_iter()
                .collect(),
        )
    }))
}

fn tag_strategy() -> impl Strategy<Value = &'static str> {
    prop::sample::select(TAGS.to_vec())
}

// ═════════════════════════════════════════════════════════════════════════
// 1 + 2. Locale and messages move together
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn set_locale_is_observable_and_consistent(tags in prop::collection::vec(tag_strategy(), 1..20)) {
        let store = LocaleStore::new(catalog());
        for tag in tags {
            let locale = Locale::parse(tag).unwrap();
            store.set_locale(locale.clone());
            prop_assert_eq!(store.locale(), locale);
            prop_assert_eq!(store.tr("owner"), tag);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Fallback chain
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn absent_keys_resolve_to_fallback_or_key(key in "[a-z]{1,8}\\.[a-z]{1,8}", fallback in ".*") {
        let store = LocaleStore::new(catalog());
        prop_assert_eq!(store.translate(&key, Some(fallback.as_str())), fallback);
        prop_assert_eq!(store.translate(&key, None), key);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Listener fan-out
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn every_listener_runs_once_per_change(listeners in 0usize..16, changes in 1usize..8) {
        let store = LocaleStore::new(catalog());
        let counters: Vec<Rc<Cell<usize>>> = (0..listeners).map(|_| Rc::new(Cell::new(0))).collect();
        let _subs: Vec<_> = counters
            .iter()
            .map(|counter| {
                let counter = Rc::clone(counter);
                store.subscribe(move || counter.set(counter.get() + 1))
            })
            .collect();

        for n in 0..changes {
            store.set_locale(Locale::parse(TAGS[n % TAGS.len()]).unwrap());
        }
        for counter in &counters {
            prop_assert_eq!(counter.get(), changes);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Detection totality
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn detection_never_leaves_supported_set(stored in proptest::option::of(".*"), signal in proptest::option::of(".*")) {
        let locale = detect_locale(stored.as_deref(), signal.as_deref(), &supported());
        prop_assert!(locale.is_in(&supported()));
    }

    #[test]
    fn valid_stored_preference_always_wins(tag in tag_strategy(), signal in proptest::option::of(".*")) {
        let locale = detect_locale(Some(tag), signal.as_deref(), &supported());
        prop_assert_eq!(locale.to_string(), tag);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Interpolation identity
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn interpolation_without_placeholders_is_identity(value in "[^{}]*") {
        let store = LocaleStore::new(catalog());
        prop_assert_eq!(store.translate_with("plain", &[("x", value.as_str())]), "no placeholders");
        let key = format!("absent:{}", value);
        prop_assert_eq!(store.translate_with(&key, &[("x", "1")]), key);
    }
}
