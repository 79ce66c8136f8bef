use std::io::Write;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use chrono::Local;
use tokio::io::{AsyncBufReadExt, BufReader};

use pocket_desk_lib::commands::{handle_event, render_all, tick, CommandCtx};
use pocket_desk_lib::config::AppConfig;
use pocket_desk_lib::events::{parse_command, Command, ParseCommandError, HELP};
use pocket_desk_lib::logging::init_logging;
use pocket_desk_lib::models::{Task, Theme};
use pocket_desk_lib::scheduler::clock_interval;
use pocket_desk_lib::state::AppState;
use pocket_desk_lib::storage::{FileStore, MemoryStore, SharedStore, StorageError};
use pocket_desk_lib::widget::ClockFace;

/// Line-oriented presentation layer on stdout.
struct ConsoleCtx {
    data_dir: PathBuf,
    header: Option<(String, &'static str)>,
    clock: String,
}

impl ConsoleCtx {
    fn new(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            header: None,
            clock: String::new(),
        }
    }

    fn prompt(&self) {
        print!("[{}] > ", self.clock);
        let _ = std::io::stdout().flush();
    }
}

// Task text is user input; keep control sequences from reaching the terminal.
fn printable(text: &str) -> String {
    text.chars()
        .map(|c| {
            if c.is_control() {
                c.escape_default().to_string()
            } else {
                c.to_string()
            }
        })
        .collect()
}

impl CommandCtx for ConsoleCtx {
    fn app_data_dir(&self) -> Result<PathBuf, StorageError> {
        Ok(self.data_dir.clone())
    }

    fn show_display(&mut self, buffer: &str) {
        println!("calc: {buffer}");
    }

    fn show_tasks(&mut self, visible: &[Task]) {
        if visible.is_empty() {
            println!("No tasks found.");
            return;
        }
        for task in visible {
            println!(
                "#{} {}  ({})",
                task.id,
                printable(&task.title),
                task.created_at.with_timezone(&Local).format("%Y-%m-%d %H:%M")
            );
            if !task.description.is_empty() {
                println!("    {}", printable(&task.description));
            }
        }
    }

    fn show_clock(&mut self, face: &ClockFace) {
        self.clock = face.clock.clone();
        let header = (face.date.clone(), face.greeting);
        if self.header.as_ref() != Some(&header) {
            println!("\n{}  {}", header.1, header.0);
            self.header = Some(header);
        }
    }

    fn apply_theme(&mut self, theme: Theme) {
        println!("theme: {} {}", theme.as_str(), theme.toggle_icon());
    }

    fn show_edit_form(&mut self, task: &Task) {
        println!(
            "edit: save {} {} | {}",
            task.id,
            printable(&task.title),
            printable(&task.description)
        );
    }

    fn ask_confirmation(&mut self, message: &str) {
        println!("{message} (yes/no)");
    }

    fn notify(&mut self, message: &str) {
        println!("! {message}");
    }
}

fn open_store(data_dir: &Path) -> SharedStore {
    let store = FileStore::new(data_dir.to_path_buf());
    match store.ensure_dirs() {
        Ok(()) => Rc::new(store),
        Err(error) => {
            log::error!("data dir {} unusable: {error}", data_dir.display());
            eprintln!("warning: nothing will be saved this session ({error})");
            Rc::new(MemoryStore::new())
        }
    }
}

/// Returns false when the session should end.
fn run_line(ctx: &mut ConsoleCtx, state: &mut AppState, line: &str) -> bool {
    match parse_command(line) {
        Ok(Command::Events(events)) => {
            for event in events {
                handle_event(ctx, state, event);
            }
        }
        Ok(Command::Help) => println!("{HELP}"),
        Ok(Command::Quit) => return false,
        Err(ParseCommandError::Empty) => {}
        Err(error) => ctx.notify(&error.to_string()),
    }
    true
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let config = AppConfig::from_env();
    let _logger = match init_logging(&config.data_dir) {
        Ok(handle) => Some(handle),
        Err(error) => {
            eprintln!("warning: logging disabled ({error})");
            None
        }
    };
    log::info!(
        "starting data_dir={} locale={:?}",
        config.data_dir.display(),
        config.locale
    );

    let kv = open_store(&config.data_dir);
    let mut state = AppState::load(kv, config.locale);
    let mut ctx = ConsoleCtx::new(config.data_dir.clone());
    println!("pocket-desk: type `help` for commands");
    render_all(&mut ctx, &state, &Local::now());
    ctx.prompt();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut clock = clock_interval();
    loop {
        tokio::select! {
            _ = clock.tick() => tick(&mut ctx, &state, &Local::now()),
            line = lines.next_line() => match line {
                Ok(Some(line)) => {
                    if !run_line(&mut ctx, &mut state, &line) {
                        break;
                    }
                    ctx.prompt();
                }
                Ok(None) => break,
                Err(error) => {
                    log::error!("stdin read failed: {error}");
                    break;
                }
            },
        }
    }
    log::info!("session ended tasks={}", state.tasks.tasks().len());
}
