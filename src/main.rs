// SPDX-License-Identifier: MPL-2.0
use locale_store::config::{self, Config};
use locale_store::error::{Error, Result};
use locale_store::i18n::{Catalog, Locale, LocaleStore, Preferences};
use locale_store::storage::{ClientStorage, FileStorage};
use locale_store::{logging, paths};
use std::process::ExitCode;
use std::rc::Rc;

const HELP: &str = "\
locale_store - inspect and change the UI language

USAGE:
  locale_store [OPTIONS] <COMMAND> [ARGS]

COMMANDS:
  get                  Print the startup locale
  detect               Print the locale detected from storage and the system
  set <TAG>            Switch to TAG and save it as the preference
  tr <KEY> [FALLBACK]  Translate KEY in the startup locale
  locales              List the supported locales
  check                Report keys missing from each bundle

OPTIONS:
  --lang <TAG>         Override the startup locale
  --config-dir <DIR>   Directory holding settings.toml
  --data-dir <DIR>     Directory holding storage.toml
  -h, --help           Print this help
";

struct Flags {
    lang: Option<String>,
    config_dir: Option<String>,
    data_dir: Option<String>,
    free: Vec<String>,
}

fn main() -> ExitCode {
    logging::init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
    }
}

fn parse_flags() -> Result<Option<Flags>> {
    let mut args = pico_args::Arguments::from_env();
    if args.contains(["-h", "--help"]) {
        return Ok(None);
    }

    let lang = args.opt_value_from_str("--lang")?;
    let config_dir = args.opt_value_from_str("--config-dir")?;
    let data_dir = args.opt_value_from_str("--data-dir")?;
    let free = args
        .finish()
        .into_iter()
        .map(|arg| {
            arg.into_string()
                .map_err(|arg| Error::Usage(format!("argument is not UTF-8: {:?}", arg)))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Some(Flags {
        lang,
        config_dir,
        data_dir,
        free,
    }))
}

fn run() -> Result<()> {
    let Some(flags) = parse_flags()? else {
        print!("{}", HELP);
        return Ok(());
    };
    paths::init_cli_overrides(flags.data_dir, flags.config_dir);

    let config = config::load().unwrap_or_else(|err| {
        tracing::warn!(%err, "failed to read settings, using defaults");
        Config::default()
    });
    let mut storage = open_storage();

    let store = Rc::new(
        LocaleStore::new(Catalog::embedded()?)
            .with_preferences(Preferences::from(&config.preference)),
    );
    let explicit = flags.lang.or(config.general.language);
    let initial = startup_locale(&store, explicit.as_deref(), storage.as_ref());
    store.set_locale(initial);

    let mut free = flags.free.into_iter();
    let command = free.next();
    let operands: Vec<String> = free.collect();

    match command.as_deref() {
        Some("get") => println!("{}", store.locale()),
        Some("detect") => println!("{}", store.detect_browser_locale(as_dyn(storage.as_ref()))),
        Some("set") => {
            let tag = operands
                .first()
                .ok_or_else(|| Error::Usage("set requires a locale tag".into()))?;
            set_locale(&store, Locale::parse(tag)?, storage.as_mut());
        }
        Some("tr") => {
            let key = operands
                .first()
                .ok_or_else(|| Error::Usage("tr requires a translation key".into()))?;
            println!("{}", store.translate(key, operands.get(1).map(String::as_str)));
        }
        Some("locales") => list_locales(&store),
        Some("check") => check_catalog(store.catalog()),
        Some(other) => {
            return Err(Error::Usage(format!(
                "unknown command '{}'\n\n{}",
                other, HELP
            )))
        }
        None => return Err(Error::Usage(format!("missing command\n\n{}", HELP))),
    }

    Ok(())
}

fn open_storage() -> Option<FileStorage> {
    let dir = paths::get_app_data_dir()?;
    match FileStorage::open_in(&dir) {
        Ok(storage) => Some(storage),
        Err(err) => {
            tracing::warn!(%err, dir = %dir.display(), "client storage unavailable");
            None
        }
    }
}

fn as_dyn(storage: Option<&FileStorage>) -> Option<&dyn ClientStorage> {
    storage.map(|storage| storage as &dyn ClientStorage)
}

/// Explicit `--lang`/config override if supported, otherwise detection.
fn startup_locale(
    store: &LocaleStore,
    explicit: Option<&str>,
    storage: Option<&FileStorage>,
) -> Locale {
    if let Some(tag) = explicit {
        match Locale::parse(tag) {
            Ok(locale) if store.catalog().supports(&locale) => return locale,
            Ok(locale) => tracing::warn!(%locale, "requested locale is not supported"),
            Err(err) => tracing::warn!(%err, "ignoring requested locale"),
        }
    }
    store.detect_browser_locale(as_dyn(storage))
}

fn set_locale(store: &Rc<LocaleStore>, locale: Locale, storage: Option<&mut FileStorage>) {
    let _announce = {
        let weak = Rc::downgrade(store);
        store.subscribe(move || {
            if let Some(store) = weak.upgrade() {
                println!("{}: {}", store.tr("locale.switch"), store.tr("locale.name"));
            }
        })
    };

    store.set_locale(locale.clone());
    let saved = store.save_preference(
        storage.map(|storage| storage as &mut dyn ClientStorage),
        &locale,
    );

    match saved {
        Some(cookie) => println!("Set-Cookie: {}", cookie.to_header_value()),
        None => eprintln!("preference not saved"),
    }
}

fn list_locales(store: &LocaleStore) {
    let current = store.locale();
    for locale in store.available_locales() {
        let name = store
            .catalog()
            .messages(locale)
            .and_then(|messages| messages.get("locale.name").map(str::to_string))
            .unwrap_or_else(|| locale.to_string());
        let marker = if *locale == current { '*' } else { ' ' };
        println!("{} {:<4} {}", marker, locale.to_string(), name);
    }
}

fn check_catalog(catalog: &Catalog) {
    for locale in catalog.available_locales() {
        let missing = catalog.missing_keys(locale);
        if missing.is_empty() {
            println!("{}: complete", locale);
        } else {
            println!("{}: {} missing", locale, missing.len());
            for key in missing {
                println!("  {}", key);
            }
        }
    }
}
