use chrono::Locale;

use crate::composer::Composer;
use crate::storage::SharedStore;
use crate::tasks::{DeleteToken, TaskStore};
use crate::view::ViewQuery;
use crate::widget::ThemeClock;

/// Everything both utilities know at runtime. Owned by the event loop and
/// mutated only through `commands`.
pub struct AppState {
    pub tasks: TaskStore,
    pub view: ViewQuery,
    pub composer: Composer,
    pub widget: ThemeClock,
    pending_delete: Option<DeleteToken>,
    unsaved_notice_shown: bool,
}

impl AppState {
    pub fn load(kv: SharedStore, locale: Locale) -> Self {
        Self {
            tasks: TaskStore::load(kv.clone()),
            view: ViewQuery::default(),
            composer: Composer::new(),
            widget: ThemeClock::load(kv, locale),
            pending_delete: None,
            unsaved_notice_shown: false,
        }
    }

    pub fn pending_delete(&self) -> Option<&DeleteToken> {
        self.pending_delete.as_ref()
    }

    pub fn set_pending_delete(&mut self, token: DeleteToken) {
        self.pending_delete = Some(token);
    }

    pub fn take_pending_delete(&mut self) -> Option<DeleteToken> {
        self.pending_delete.take()
    }

    /// True exactly once, after the task store has lost its backing store.
    pub fn should_warn_unsaved(&mut self) -> bool {
        if self.tasks.is_persistent() || self.unsaved_notice_shown {
            return false;
        }
        self.unsaved_notice_shown = true;
        true
    }
}
