//! Locale preference and text direction.
//!
//! The active locale is read from the `NEXT_LOCALE` cookie key at session
//! start. Unsupported or missing values fall back to English; resolution
//! never fails. Urdu is the only right-to-left locale.

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::storage::Storage;

/// Storage key holding the persisted locale preference.
pub const LOCALE_COOKIE: &str = "NEXT_LOCALE";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Locale {
    #[default]
    En,
    Es,
    Fr,
    De,
    Ur,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ltr,
    Rtl,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Ltr => "ltr",
            Direction::Rtl => "rtl",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when parsing a code outside the supported set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported locale: {0}")]
pub struct UnsupportedLocale(pub String);

impl Locale {
    const ALL: [Locale; 5] = [Locale::En, Locale::Es, Locale::Fr, Locale::De, Locale::Ur];

    pub fn all() -> &'static [Locale] {
        &Self::ALL
    }

    pub fn code(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Es => "es",
            Locale::Fr => "fr",
            Locale::De => "de",
            Locale::Ur => "ur",
        }
    }

    /// Name of the language in that language.
    pub fn display_name(&self) -> &'static str {
        match self {
            Locale::En => "English",
            Locale::Es => "Español",
            Locale::Fr => "Français",
            Locale::De => "Deutsch",
            Locale::Ur => "اردو",
        }
    }

    pub fn direction(&self) -> Direction {
        direction_for(*self)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = UnsupportedLocale;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Locale::ALL
            .into_iter()
            .find(|l| l.code() == s)
            .ok_or_else(|| UnsupportedLocale(s.to_string()))
    }
}

pub fn direction_for(locale: Locale) -> Direction {
    match locale {
        Locale::Ur => Direction::Rtl,
        _ => Direction::Ltr,
    }
}

/// Prefix `path` with the locale segment. English paths stay unprefixed.
pub fn localized_path(path: &str, locale: Locale) -> String {
    match locale {
        Locale::En => path.to_string(),
        other => format!("/{}/{}", other.code(), path.trim_start_matches('/')),
    }
}

/// Reads and writes the locale preference in a `Storage`.
#[derive(Debug)]
pub struct LocaleResolver<S> {
    storage: S,
}

impl<S: Storage> LocaleResolver<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn stored(&self) -> Option<Locale> {
        self.storage.get(LOCALE_COOKIE)?.trim().parse().ok()
    }

    pub fn resolve_locale(&self) -> Locale {
        self.stored().unwrap_or_default()
    }

    /// Like `resolve_locale`, but consults an `Accept-Language` header value
    /// before falling back to English.
    pub fn resolve_locale_with(&self, accept_language: Option<&str>) -> Locale {
        self.stored()
            .or_else(|| accept_language.and_then(preferred_from_header))
            .unwrap_or_default()
    }

    pub fn direction(&self) -> Direction {
        self.resolve_locale().direction()
    }

    /// Persist `code` if it is supported and return the resulting direction.
    /// Unsupported codes leave the stored preference untouched.
    pub fn set_locale(&self, code: &str) -> Direction {
        match code.parse::<Locale>() {
            Ok(locale) => {
                self.storage.set(LOCALE_COOKIE, locale.code());
                debug!(locale = locale.code(), "locale changed");
                locale.direction()
            }
            Err(e) => {
                debug!(error = %e, "ignoring locale change");
                self.direction()
            }
        }
    }
}

/// First supported primary subtag in an `Accept-Language` value, in the
/// order listed (`ur-PK,en;q=0.8` yields `ur`).
fn preferred_from_header(header: &str) -> Option<Locale> {
    header
        .split(',')
        .filter_map(|entry| entry.split(';').next())
        .filter_map(|tag| tag.trim().split('-').next())
        .find_map(|primary| primary.to_ascii_lowercase().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn unsupported_cookie_falls_back_to_english() {
        let resolver = LocaleResolver::new(MemoryStorage::new());
        resolver.storage().set(LOCALE_COOKIE, "xx");
        assert_eq!(resolver.resolve_locale(), Locale::En);
    }

    #[test]
    fn missing_cookie_is_english() {
        let resolver = LocaleResolver::new(MemoryStorage::new());
        assert_eq!(resolver.resolve_locale(), Locale::En);
        assert_eq!(resolver.direction(), Direction::Ltr);
    }

    #[test]
    fn urdu_is_rtl() {
        let resolver = LocaleResolver::new(MemoryStorage::new());
        resolver.storage().set(LOCALE_COOKIE, "ur");
        assert_eq!(resolver.resolve_locale(), Locale::Ur);
        assert_eq!(direction_for(Locale::Ur), Direction::Rtl);
        assert_eq!(direction_for(Locale::Ur).as_str(), "rtl");
    }

    #[test]
    fn every_other_locale_is_ltr() {
        for locale in Locale::all().iter().filter(|l| **l != Locale::Ur) {
            assert_eq!(direction_for(*locale), Direction::Ltr, "{locale}");
        }
    }

    #[test]
    fn set_locale_round_trips() {
        let resolver = LocaleResolver::new(MemoryStorage::new());
        assert_eq!(resolver.set_locale("de"), Direction::Ltr);
        assert_eq!(resolver.resolve_locale(), Locale::De);
        assert_eq!(resolver.set_locale("ur"), Direction::Rtl);
        assert_eq!(resolver.resolve_locale(), Locale::Ur);
    }

    #[test]
    fn set_locale_ignores_unsupported_codes() {
        let resolver = LocaleResolver::new(MemoryStorage::new());
        resolver.set_locale("fr");
        assert_eq!(resolver.set_locale("klingon"), Direction::Ltr);
        assert_eq!(resolver.resolve_locale(), Locale::Fr);
        assert_eq!(resolver.storage().get(LOCALE_COOKIE).as_deref(), Some("fr"));
    }

    #[test]
    fn accept_language_is_a_fallback_only() {
        let resolver = LocaleResolver::new(MemoryStorage::new());
        assert_eq!(resolver.resolve_locale_with(Some("ur-PK,en;q=0.8")), Locale::Ur);
        assert_eq!(resolver.resolve_locale_with(Some("ja, FR-ca;q=0.5")), Locale::Fr);
        assert_eq!(resolver.resolve_locale_with(Some("ja")), Locale::En);
        assert_eq!(resolver.resolve_locale_with(None), Locale::En);

        resolver.set_locale("es");
        assert_eq!(resolver.resolve_locale_with(Some("ur-PK")), Locale::Es);
    }

    #[test]
    fn localized_paths() {
        assert_eq!(localized_path("/dashboard", Locale::En), "/dashboard");
        assert_eq!(localized_path("/dashboard", Locale::Ur), "/ur/dashboard");
        assert_eq!(localized_path("complaints", Locale::De), "/de/complaints");
    }

    #[test]
    fn parse_and_display() {
        assert_eq!("es".parse::<Locale>(), Ok(Locale::Es));
        assert_eq!("EN".parse::<Locale>(), Err(UnsupportedLocale("EN".to_string())));
        assert_eq!(Locale::Fr.to_string(), "fr");
        assert_eq!(Locale::Ur.display_name(), "اردو");
    }
}
