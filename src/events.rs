use crate::composer::Key;
use crate::models::TaskId;

/// Everything the presentation layer can send in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Key(Key),
    SubmitTask {
        id: Option<TaskId>,
        title: String,
        description: String,
    },
    OpenEdit(TaskId),
    DeleteClicked(TaskId),
    ConfirmDelete(bool),
    SearchChanged(String),
    SortChanged(String),
    ToggleTheme,
    ExportTasks,
}

/// One line of console input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Events(Vec<InputEvent>),
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseCommandError {
    Empty,
    UnknownCommand(String),
    MissingArgument(&'static str),
    InvalidId(String),
    InvalidKey(char),
}

impl std::fmt::Display for ParseCommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseCommandError::Empty => write!(f, "empty command"),
            ParseCommandError::UnknownCommand(name) => {
                write!(f, "unknown command {name:?} (try `help`)")
            }
            ParseCommandError::MissingArgument(what) => write!(f, "missing {what}"),
            ParseCommandError::InvalidId(raw) => write!(f, "invalid task id {raw:?}"),
            ParseCommandError::InvalidKey(c) => write!(f, "no calculator key for {c:?}"),
        }
    }
}

impl std::error::Error for ParseCommandError {}

pub const HELP: &str = "\
calc <keys>            press calculator keys, e.g. `calc 12.5*4=`
del | clear            delete last character | clear the display
add <title>[ | desc]   create a task
edit <id>              show a task in the edit form
save <id> <title>[ | desc]
                       submit the edit form
rm <id>                delete a task (asks for yes/no)
yes | no               answer the delete prompt
search [text]          filter tasks (empty clears)
sort newest|oldest|alphabetical
theme                  toggle light/dark
export                 write the visible tasks to tasks.html
help | quit";

pub fn parse_command(line: &str) -> Result<Command, ParseCommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(ParseCommandError::Empty);
    }
    let (name, rest) = match line.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (line, ""),
    };
    let single = |event: InputEvent| -> Result<Command, ParseCommandError> {
        Ok(Command::Events(vec![event]))
    };
    match name.to_lowercase().as_str() {
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        "calc" => parse_keys(rest),
        "del" => single(InputEvent::Key(Key::Delete)),
        "clear" => single(InputEvent::Key(Key::Clear)),
        "add" => {
            let (title, description) = split_form(rest);
            if title.is_empty() {
                return Err(ParseCommandError::MissingArgument("title"));
            }
            single(InputEvent::SubmitTask {
                id: None,
                title,
                description,
            })
        }
        "save" => {
            let (raw_id, rest) = rest
                .split_once(char::is_whitespace)
                .unwrap_or((rest, ""));
            let id = parse_id(raw_id)?;
            let (title, description) = split_form(rest);
            single(InputEvent::SubmitTask {
                id: Some(id),
                title,
                description,
            })
        }
        "edit" => single(InputEvent::OpenEdit(parse_id(rest)?)),
        "rm" | "delete" => single(InputEvent::DeleteClicked(parse_id(rest)?)),
        "yes" | "y" => single(InputEvent::ConfirmDelete(true)),
        "no" | "n" => single(InputEvent::ConfirmDelete(false)),
        "search" => single(InputEvent::SearchChanged(rest.to_string())),
        "sort" => {
            if rest.is_empty() {
                return Err(ParseCommandError::MissingArgument("sort mode"));
            }
            single(InputEvent::SortChanged(rest.to_string()))
        }
        "theme" => single(InputEvent::ToggleTheme),
        "export" => single(InputEvent::ExportTasks),
        _ => Err(ParseCommandError::UnknownCommand(name.to_string())),
    }
}

fn parse_keys(keys: &str) -> Result<Command, ParseCommandError> {
    if keys.is_empty() {
        return Err(ParseCommandError::MissingArgument("keys"));
    }
    keys.chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| {
            Key::from_char(c)
                .map(InputEvent::Key)
                .ok_or(ParseCommandError::InvalidKey(c))
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Command::Events)
}

fn parse_id(raw: &str) -> Result<TaskId, ParseCommandError> {
    if raw.is_empty() {
        return Err(ParseCommandError::MissingArgument("task id"));
    }
    raw.parse()
        .map_err(|_| ParseCommandError::InvalidId(raw.to_string()))
}

// "title | description"; the description may itself contain '|'.
fn split_form(text: &str) -> (String, String) {
    match text.split_once('|') {
        Some((title, description)) => (title.trim().to_string(), description.trim().to_string()),
        None => (text.trim().to_string(), String::new()),
    }
}
