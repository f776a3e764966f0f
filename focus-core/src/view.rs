//! Read shapes over the same ranking core.
//!
//! The variants differ only in which fields pass through to the result;
//! the task set itself is chosen by the caller before the engine runs.

use serde::{Deserialize, Serialize};

use crate::task::{Assignee, Task};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FocusView {
    /// "My tasks": one assignee, assignee fields omitted.
    #[default]
    Personal,
    /// "Assigned across members": assignee retained on every entry.
    Team,
}

impl FocusView {
    pub fn assignee_of(self, task: &Task) -> Option<Assignee> {
        match self {
            FocusView::Personal => None,
            FocusView::Team => task.assignee.clone(),
        }
    }
}
