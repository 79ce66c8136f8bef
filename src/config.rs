use std::path::PathBuf;

use chrono::Locale;

use crate::widget::resolve_locale;

pub const APP_DIR_NAME: &str = "pocket-desk";
pub const ENV_DATA_DIR: &str = "POCKET_DESK_DATA_DIR";
pub const ENV_LOCALE: &str = "POCKET_DESK_LOCALE";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub locale: Locale,
}

impl AppConfig {
    /// Resolves settings from the process environment and the system locale.
    pub fn from_env() -> Self {
        Self::resolve(
            |name| std::env::var(name).ok(),
            sys_locale::get_locale(),
        )
    }

    fn resolve(env: impl Fn(&str) -> Option<String>, system_locale: Option<String>) -> Self {
        let non_empty = |name: &str| env(name).filter(|value| !value.trim().is_empty());
        let data_dir = non_empty(ENV_DATA_DIR)
            .map(PathBuf::from)
            .unwrap_or_else(default_data_dir);
        let locale_tag = non_empty(ENV_LOCALE).or(system_locale);
        Self {
            data_dir,
            locale: resolve_locale(locale_tag.as_deref()),
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from(format!(".{APP_DIR_NAME}")))
}
