use std::fmt::Display;

use chrono::{DateTime, Locale, TimeZone, Timelike};

use crate::models::Theme;
use crate::storage::SharedStore;

pub const THEME_KEY: &str = "theme";
pub const DEFAULT_LOCALE: Locale = Locale::en_US;

const CLOCK_FORMAT: &str = "%H:%M:%S";
const DATE_FORMAT: &str = "%A, %B %-d, %Y";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockFace {
    pub clock: String,
    pub date: String,
    pub greeting: &'static str,
}

pub fn greeting(hour: u32) -> &'static str {
    match hour {
        0..=11 => "Good Morning!",
        12..=17 => "Good Afternoon!",
        _ => "Good Evening!",
    }
}

/// Maps a BCP 47 / POSIX locale tag (`en-US`, `de_DE.UTF-8`) to a chrono locale.
pub fn resolve_locale(tag: Option<&str>) -> Locale {
    let Some(tag) = tag else {
        return DEFAULT_LOCALE;
    };
    let base = tag.split(['.', '@']).next().unwrap_or("").replace('-', "_");
    Locale::try_from(base.as_str())
        .or_else(|_| {
            // A bare language ("de") gets its own region ("de_DE").
            let region = base.to_uppercase();
            Locale::try_from(format!("{base}_{region}").as_str())
        })
        .unwrap_or_else(|_| {
            log::debug!("unknown locale {tag:?}; using {DEFAULT_LOCALE:?}");
            DEFAULT_LOCALE
        })
}

/// Theme preference plus the clock/date/greeting header.
pub struct ThemeClock {
    theme: Theme,
    locale: Locale,
    kv: SharedStore,
}

impl ThemeClock {
    pub fn load(kv: SharedStore, locale: Locale) -> Self {
        let theme = match kv.get(THEME_KEY) {
            Ok(Some(value)) => Theme::from_stored(&value),
            Ok(None) => Theme::default(),
            Err(error) => {
                log::warn!("theme preference unreadable, using default: {error}");
                Theme::default()
            }
        };
        Self { theme, locale, kv }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        if let Err(error) = self.kv.set(THEME_KEY, self.theme.as_str()) {
            log::error!("theme preference not saved: {error}");
        }
        log::debug!("theme switched to {}", self.theme.as_str());
        self.theme
    }

    pub fn tick<Tz>(&self, now: &DateTime<Tz>) -> ClockFace
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        ClockFace {
            clock: now.format(CLOCK_FORMAT).to_string(),
            date: now.format_localized(DATE_FORMAT, self.locale).to_string(),
            greeting: greeting(now.hour()),
        }
    }
}
