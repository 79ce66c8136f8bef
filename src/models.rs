use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type TaskId = i64;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Lenient parse of a stored preference; anything unrecognized is light.
    pub fn from_stored(value: &str) -> Self {
        match value.trim() {
            "dark" => Theme::Dark,
            _ => Theme::Light,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Glyph shown on the toggle button: it offers the opposite theme.
    pub fn toggle_icon(self) -> &'static str {
        match self {
            Theme::Light => "\u{1F319}",
            Theme::Dark => "\u{2600}\u{FE0F}",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    #[default]
    Newest,
    Oldest,
    Alphabetical,
}

impl SortMode {
    /// Parses a sort control value. Unknown values fall back to newest-first.
    pub fn from_control(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "oldest" => SortMode::Oldest,
            "alphabetical" => SortMode::Alphabetical,
            _ => SortMode::Newest,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortMode::Newest => "newest",
            SortMode::Oldest => "oldest",
            SortMode::Alphabetical => "alphabetical",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn task_serializes_with_camel_case_and_iso_timestamp() {
        let task = Task {
            id: 1_700_000_000_000,
            title: "write report".to_string(),
            description: String::new(),
            created_at: Utc.timestamp_millis_opt(1_700_000_000_000).unwrap(),
        };
        let value = serde_json::to_value(&task).expect("serialize task");
        assert_eq!(
            value,
            serde_json::json!({
              "id": 1_700_000_000_000_i64,
              "title": "write report",
              "description": "",
              "createdAt": "2023-11-14T22:13:20Z"
            })
        );
    }

    #[test]
    fn task_deserializes_browser_style_timestamps() {
        let json = r#"
        {
          "id": 1712345678901,
          "title": "groceries",
          "createdAt": "2024-04-05T19:34:38.901Z"
        }
        "#;

        let task: Task = serde_json::from_str(json).expect("task should deserialize");
        assert_eq!(task.id, 1712345678901);
        assert_eq!(task.description, "");
        assert_eq!(task.created_at.timestamp_millis(), 1712345678901);
    }

    #[test]
    fn theme_parsing_and_toggling() {
        assert_eq!(Theme::default(), Theme::Light);
        assert_eq!(Theme::from_stored("dark"), Theme::Dark);
        assert_eq!(Theme::from_stored("light"), Theme::Light);
        assert_eq!(Theme::from_stored("purple"), Theme::Light);
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled().as_str(), "light");
        assert_ne!(Theme::Light.toggle_icon(), Theme::Dark.toggle_icon());
    }

    #[test]
    fn sort_mode_unknown_values_fall_back_to_newest() {
        assert_eq!(SortMode::from_control("oldest"), SortMode::Oldest);
        assert_eq!(SortMode::from_control("Alphabetical"), SortMode::Alphabetical);
        assert_eq!(SortMode::from_control("newest"), SortMode::Newest);
        assert_eq!(SortMode::from_control("random"), SortMode::Newest);
        assert_eq!(SortMode::from_control(""), SortMode::Newest);
    }
}
