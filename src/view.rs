use std::cmp::Ordering;
use std::fmt::Write;

use crate::models::{SortMode, Task};

pub const EMPTY_PLACEHOLDER: &str = "No tasks found.";

/// Current search box and sort control values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewQuery {
    pub query: String,
    pub sort: SortMode,
}

impl ViewQuery {
    pub fn project(&self, tasks: &[Task]) -> Vec<Task> {
        project(tasks, &self.query, self.sort)
    }
}

/// Filtered, sorted copy of `tasks` for display. Never touches the input.
pub fn project(tasks: &[Task], query: &str, sort: SortMode) -> Vec<Task> {
    let needle = query.to_lowercase();
    let mut out: Vec<Task> = tasks
        .iter()
        .filter(|t| {
            needle.is_empty()
                || t.title.to_lowercase().contains(&needle)
                || t.description.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect();

    // `sort_by` is stable, so equal keys keep input order.
    match sort {
        SortMode::Newest => out.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortMode::Oldest => out.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        SortMode::Alphabetical => out.sort_by(|a, b| collate(&a.title, &b.title)),
    }
    out
}

/// Dictionary-style comparison: base letters first (accents and case
/// ignored), then accents, then lowercase before uppercase.
pub fn collate(a: &str, b: &str) -> Ordering {
    base_key(a)
        .cmp(&base_key(b))
        .then_with(|| {
            a.chars()
                .flat_map(char::to_lowercase)
                .cmp(b.chars().flat_map(char::to_lowercase))
        })
        .then_with(|| a.chars().map(case_rank).cmp(b.chars().map(case_rank)))
}

fn base_key(text: &str) -> String {
    deunicode::deunicode(text).to_lowercase()
}

fn case_rank(c: char) -> u8 {
    if c.is_uppercase() {
        1
    } else {
        0
    }
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Full markup for the task list. Every card carries its id on the edit and
/// delete affordances.
pub fn render_cards(tasks: &[Task]) -> String {
    if tasks.is_empty() {
        return format!(r#"<p class="task-empty">{EMPTY_PLACEHOLDER}</p>"#);
    }
    let mut html = String::new();
    for task in tasks {
        let _ = write!(
            html,
            concat!(
                r#"<div class="task-card" data-id="{id}">"#,
                "<h3>{title}</h3>",
                "<p>{description}</p>",
                r#"<div class="task-actions">"#,
                r#"<button class="btn-icon" data-action="edit" data-id="{id}" title="Edit">&#9999;&#65039;</button>"#,
                r#"<button class="btn-icon btn-delete" data-action="delete" data-id="{id}" title="Delete">&#128465;&#65039;</button>"#,
                "</div></div>\n",
            ),
            id = task.id,
            title = escape_html(&task.title),
            description = escape_html(&task.description),
        );
    }
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn make_task(id: i64, title: &str, description: &str) -> Task {
        Task {
            id,
            title: title.to_string(),
            description: description.to_string(),
            created_at: Utc.timestamp_millis_opt(id).unwrap(),
        }
    }

    fn titles(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|t| t.title.as_str()).collect()
    }

    #[test]
    fn sort_modes_order_two_tasks_created_in_sequence() {
        // Storage order is most-recent-first.
        let tasks = vec![make_task(2, "B", ""), make_task(1, "A", "")];
        assert_eq!(titles(&project(&tasks, "", SortMode::Newest)), ["B", "A"]);
        assert_eq!(titles(&project(&tasks, "", SortMode::Oldest)), ["A", "B"]);
        assert_eq!(
            titles(&project(&tasks, "", SortMode::Alphabetical)),
            ["A", "B"]
        );
    }

    #[test]
    fn newest_ignores_storage_order() {
        let tasks = vec![
            make_task(10, "mid", ""),
            make_task(30, "late", ""),
            make_task(5, "early", ""),
        ];
        assert_eq!(
            titles(&project(&tasks, "", SortMode::Newest)),
            ["late", "mid", "early"]
        );
        assert_eq!(
            titles(&project(&tasks, "", SortMode::Oldest)),
            ["early", "mid", "late"]
        );
    }

    #[test]
    fn filter_is_case_insensitive_over_title_and_description() {
        let tasks = vec![
            make_task(3, "Buy milk", ""),
            make_task(2, "Call mom", "about the MILK delivery"),
            make_task(1, "Write report", "quarterly"),
        ];
        assert_eq!(
            titles(&project(&tasks, "Milk", SortMode::Oldest)),
            ["Call mom", "Buy milk"]
        );
        assert_eq!(project(&tasks, "", SortMode::Newest).len(), 3);
        assert!(project(&tasks, "zzz", SortMode::Newest).is_empty());
        assert!(project(&tasks, "zzz", SortMode::Alphabetical).is_empty());
    }

    #[test]
    fn alphabetical_is_case_insensitive_and_stable_on_ties() {
        let tasks = vec![
            make_task(1, "banana", "first"),
            make_task(2, "Apple", ""),
            make_task(3, "banana", "second"),
            make_task(4, "apple", ""),
            make_task(5, "Cherry", ""),
        ];
        let out = project(&tasks, "", SortMode::Alphabetical);
        assert_eq!(
            titles(&out),
            ["apple", "Apple", "banana", "banana", "Cherry"]
        );
        assert_eq!(out[2].description, "first");
        assert_eq!(out[3].description, "second");
    }

    #[test]
    fn alphabetical_places_accented_titles_by_base_letter() {
        let tasks = vec![
            make_task(1, "Zebra", ""),
            make_task(2, "Äpfel", ""),
            make_task(3, "éclair", ""),
            make_task(4, "fig", ""),
        ];
        assert_eq!(
            titles(&project(&tasks, "", SortMode::Alphabetical)),
            ["Äpfel", "éclair", "fig", "Zebra"]
        );
        assert_eq!(collate("resume", "résumé"), Ordering::Less);
        assert_eq!(collate("Ärger", "apfel"), Ordering::Greater);
    }

    #[test]
    fn projection_leaves_input_untouched() {
        let tasks = vec![make_task(1, "A", ""), make_task(2, "B", "")];
        let before = tasks.clone();
        let query = ViewQuery {
            query: "b".to_string(),
            sort: SortMode::Alphabetical,
        };
        assert_eq!(titles(&query.project(&tasks)), ["B"]);
        assert_eq!(tasks, before);
    }

    #[test]
    fn escape_html_neutralizes_markup() {
        assert_eq!(
            escape_html(r#"<script>alert("x") & 'y'</script>"#),
            "&lt;script&gt;alert(&quot;x&quot;) &amp; &#39;y&#39;&lt;/script&gt;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn rendered_cards_show_markup_as_literal_text() {
        let tasks = vec![make_task(7, "<b>bold</b>", "<img src=x onerror=alert(1)>")];
        let html = render_cards(&tasks);
        assert!(html.contains("<h3>&lt;b&gt;bold&lt;/b&gt;</h3>"));
        assert!(html.contains("<p>&lt;img src=x onerror=alert(1)&gt;</p>"));
        assert!(!html.contains("<b>"));
        assert!(!html.contains("<img"));
        assert!(html.contains(r#"data-action="edit" data-id="7""#));
        assert!(html.contains(r#"data-action="delete" data-id="7""#));
    }

    #[test]
    fn empty_projection_renders_placeholder() {
        let html = render_cards(&[]);
        assert!(html.contains(EMPTY_PLACEHOLDER));
        assert!(!html.contains("task-card"));
    }
}
