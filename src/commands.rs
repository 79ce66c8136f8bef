use std::fmt::Display;
use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, TimeZone};

use crate::events::InputEvent;
use crate::models::{SortMode, Task, TaskId, Theme};
use crate::state::AppState;
use crate::storage::{write_atomic, StorageError};
use crate::view::{escape_html, render_cards};
use crate::widget::ClockFace;

pub const DELETE_PROMPT: &str = "Are you sure you want to delete this task?";
const EXPORT_FILE: &str = "tasks.html";

/// The presentation layer as seen from the handlers.
pub trait CommandCtx {
    fn app_data_dir(&self) -> Result<PathBuf, StorageError>;
    fn show_display(&mut self, buffer: &str);
    fn show_tasks(&mut self, visible: &[Task]);
    fn show_clock(&mut self, face: &ClockFace);
    fn apply_theme(&mut self, theme: Theme);
    fn show_edit_form(&mut self, task: &Task);
    fn ask_confirmation(&mut self, message: &str);
    fn notify(&mut self, message: &str);
}

/// Paints every widget once; used at startup.
pub fn render_all<Tz>(ctx: &mut impl CommandCtx, state: &AppState, now: &DateTime<Tz>)
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    ctx.apply_theme(state.widget.theme());
    ctx.show_display(state.composer.buffer());
    render_tasks(ctx, state);
    tick(ctx, state, now);
}

pub fn tick<Tz>(ctx: &mut impl CommandCtx, state: &AppState, now: &DateTime<Tz>)
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    ctx.show_clock(&state.widget.tick(now));
}

pub fn handle_event(ctx: &mut impl CommandCtx, state: &mut AppState, event: InputEvent) {
    // Anything other than an answer dismisses an open delete prompt.
    if !matches!(event, InputEvent::ConfirmDelete(_)) {
        if let Some(token) = state.take_pending_delete() {
            log::debug!("delete of task {} abandoned", token.task_id());
        }
    }

    match event {
        InputEvent::Key(key) => {
            state.composer.press(key);
            ctx.show_display(state.composer.buffer());
        }
        InputEvent::SubmitTask {
            id,
            title,
            description,
        } => submit_task(ctx, state, id, &title, &description),
        InputEvent::OpenEdit(id) => match state.tasks.get(id) {
            Some(task) => ctx.show_edit_form(task),
            None => not_found(ctx, id),
        },
        InputEvent::DeleteClicked(id) => match state.tasks.request_delete(id) {
            Ok(token) => {
                state.set_pending_delete(token);
                ctx.ask_confirmation(DELETE_PROMPT);
            }
            Err(_) => not_found(ctx, id),
        },
        InputEvent::ConfirmDelete(confirmed) => answer_delete(ctx, state, confirmed),
        InputEvent::SearchChanged(query) => {
            state.view.query = query;
            render_tasks(ctx, state);
        }
        InputEvent::SortChanged(mode) => {
            state.view.sort = SortMode::from_control(&mode);
            render_tasks(ctx, state);
        }
        InputEvent::ToggleTheme => {
            let theme = state.widget.toggle_theme();
            ctx.apply_theme(theme);
        }
        InputEvent::ExportTasks => match export_tasks_html(&*ctx, state) {
            Ok(path) => ctx.notify(&format!("Exported to {}", path.display())),
            Err(error) => {
                log::error!("export failed: {error}");
                ctx.notify(&format!("Export failed: {error}"));
            }
        },
    }
}

fn submit_task(
    ctx: &mut impl CommandCtx,
    state: &mut AppState,
    id: Option<TaskId>,
    title: &str,
    description: &str,
) {
    let title = title.trim();
    if title.is_empty() {
        ctx.notify("Title is required.");
        return;
    }
    match id {
        None => {
            state.tasks.create(title, description);
        }
        Some(id) => {
            if state.tasks.update(id, title, description).is_err() {
                not_found(ctx, id);
                return;
            }
        }
    }
    after_mutation(ctx, state);
}

fn answer_delete(ctx: &mut impl CommandCtx, state: &mut AppState, confirmed: bool) {
    let Some(token) = state.take_pending_delete() else {
        ctx.notify("Nothing to confirm.");
        return;
    };
    if !confirmed {
        ctx.notify("Delete cancelled.");
        return;
    }
    let id = token.task_id();
    match state.tasks.confirm_delete(token) {
        Ok(_) => after_mutation(ctx, state),
        Err(_) => not_found(ctx, id),
    }
}

fn after_mutation(ctx: &mut impl CommandCtx, state: &mut AppState) {
    if state.should_warn_unsaved() {
        ctx.notify("Tasks can't be saved; changes will be lost when you quit.");
    }
    render_tasks(ctx, state);
}

fn render_tasks(ctx: &mut impl CommandCtx, state: &AppState) {
    let visible = state.view.project(state.tasks.tasks());
    ctx.show_tasks(&visible);
}

fn not_found(ctx: &mut impl CommandCtx, id: TaskId) {
    log::warn!("task {id} not found");
    ctx.notify(&format!("Task {id} no longer exists."));
}

/// Writes the current projection as a standalone HTML page into the data dir.
pub fn export_tasks_html(ctx: &impl CommandCtx, state: &AppState) -> Result<PathBuf, StorageError> {
    let root = ctx.app_data_dir()?;
    fs::create_dir_all(&root)?;
    let visible = state.view.project(state.tasks.tasks());
    let page = format!(
        concat!(
            "<!DOCTYPE html>\n",
            r#"<html data-theme="{theme}">"#,
            "<head><meta charset=\"utf-8\"><title>Tasks</title></head>\n",
            "<body>\n",
            r#"<p class="task-filter">search: {query} / sort: {sort}</p>"#,
            "\n",
            r#"<div id="taskList">"#,
            "\n{cards}</div>\n</body></html>\n",
        ),
        theme = state.widget.theme().as_str(),
        query = escape_html(&state.view.query),
        sort = state.view.sort.as_str(),
        cards = render_cards(&visible),
    );
    let path = root.join(EXPORT_FILE);
    write_atomic(&path, page.as_bytes())?;
    log::info!("exported {} tasks to {}", visible.len(), path.display());
    Ok(path)
}
