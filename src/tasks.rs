use chrono::{DateTime, Duration, SubsecRound, Utc};

use crate::models::{Task, TaskId};
use crate::storage::{SharedStore, StorageError};

pub const TASKS_KEY: &str = "tasks";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    NotFound(TaskId),
}

impl std::fmt::Display for TaskError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskError::NotFound(id) => write!(f, "task {id} not found"),
        }
    }
}

impl std::error::Error for TaskError {}

/// Proof that a delete was requested for an existing task.
///
/// Only the store can mint one; dropping it is how a delete is declined.
#[derive(Debug, PartialEq, Eq)]
pub struct DeleteToken {
    id: TaskId,
}

impl DeleteToken {
    pub fn task_id(&self) -> TaskId {
        self.id
    }
}

/// Canonical task collection, most recently created first.
pub struct TaskStore {
    tasks: Vec<Task>,
    kv: SharedStore,
    persistent: bool,
}

impl TaskStore {
    /// Reads the collection from `kv`. Missing or unreadable data yields an empty store.
    pub fn load(kv: SharedStore) -> Self {
        let tasks = match read_tasks(&kv) {
            Ok(Some(tasks)) => tasks,
            Ok(None) => Vec::new(),
            Err(error) => {
                log::warn!("discarding stored tasks: {error}");
                Vec::new()
            }
        };
        log::info!("task store loaded count={}", tasks.len());
        Self {
            tasks,
            kv,
            persistent: true,
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// False once a write has failed; the session then continues in memory only.
    pub fn is_persistent(&self) -> bool {
        self.persistent
    }

    pub fn create(&mut self, title: &str, description: &str) -> Task {
        self.create_at(Utc::now(), title, description)
    }

    pub(crate) fn create_at(&mut self, now: DateTime<Utc>, title: &str, description: &str) -> Task {
        let created_at = self.next_creation_instant(now);
        let task = Task {
            id: self.next_id(created_at),
            title: title.to_string(),
            description: description.to_string(),
            created_at,
        };
        self.tasks.insert(0, task.clone());
        log::debug!("task created id={}", task.id);
        self.persist();
        task
    }

    pub fn update(&mut self, id: TaskId, title: &str, description: &str) -> Result<Task, TaskError> {
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(TaskError::NotFound(id))?;
        task.title = title.to_string();
        task.description = description.to_string();
        let updated = task.clone();
        log::debug!("task updated id={id}");
        self.persist();
        Ok(updated)
    }

    pub fn request_delete(&self, id: TaskId) -> Result<DeleteToken, TaskError> {
        if self.get(id).is_none() {
            return Err(TaskError::NotFound(id));
        }
        Ok(DeleteToken { id })
    }

    pub fn confirm_delete(&mut self, token: DeleteToken) -> Result<Task, TaskError> {
        let index = self
            .tasks
            .iter()
            .position(|t| t.id == token.id)
            .ok_or(TaskError::NotFound(token.id))?;
        let removed = self.tasks.remove(index);
        log::debug!("task deleted id={}", removed.id);
        self.persist();
        Ok(removed)
    }

    // Creation instants strictly increase even when two tasks land in the
    // same millisecond or the clock steps back.
    fn next_creation_instant(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let now = now.trunc_subsecs(3);
        match self.tasks.iter().map(|t| t.created_at).max() {
            Some(latest) if latest >= now => latest + Duration::milliseconds(1),
            _ => now,
        }
    }

    // Stored ids need not match their createdAt, so uniqueness is checked
    // against the ids themselves.
    fn next_id(&self, created_at: DateTime<Utc>) -> TaskId {
        let candidate = created_at.timestamp_millis();
        match self.tasks.iter().map(|t| t.id).max() {
            Some(highest) if highest >= candidate => highest + 1,
            _ => candidate,
        }
    }

    fn persist(&mut self) {
        if !self.persistent {
            log::debug!("skipping task write; store is in-memory only");
            return;
        }
        if let Err(error) = write_tasks(&self.kv, &self.tasks) {
            log::error!("task write failed, continuing in memory only: {error}");
            self.persistent = false;
        }
    }
}

fn read_tasks(kv: &SharedStore) -> Result<Option<Vec<Task>>, StorageError> {
    match kv.get(TASKS_KEY)? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

fn write_tasks(kv: &SharedStore, tasks: &[Task]) -> Result<(), StorageError> {
    let json = serde_json::to_string(tasks)?;
    kv.set(TASKS_KEY, &json)
}
