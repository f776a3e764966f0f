//! Task model consumed by the focus engine.
//!
//! Records arrive already materialized and scoped by the caller. The engine
//! never mutates them; everything it derives lives in the ranking output.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TaskStatus {
    #[default]
    Open,
    InProgress,
    Completed,
    Discarded,
}

impl TaskStatus {
    /// Completed and discarded tasks no longer block their successors.
    pub fn is_resolved(self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Discarded)
    }
}

/// Ordered priority. `Low < Medium < High < Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    pub fn label(self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
            Priority::Critical => "Critical",
        }
    }
}

/// Parent item or workspace reference with its human-readable code and name.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParentRef {
    pub id: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub name: String,
}

impl ParentRef {
    pub fn new(id: impl Into<String>, code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            code: code.into(),
            name: name.into(),
        }
    }
}

/// Optional task-type classification (e.g. "Review", "Bug").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskType {
    pub id: String,
    #[serde(default)]
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignee {
    pub id: String,
    pub display_name: String,
}

/// A unit of work.
///
/// `due_at` is optional only so that an upstream contract violation can be
/// represented and reported; scoring rejects tasks without it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    #[serde(default)]
    pub sequence: i32,
    pub item: ParentRef,
    pub workspace: ParentRef,
    pub content: String,

    #[serde(default)]
    pub task_type: Option<TaskType>,
    #[serde(default)]
    pub priority: Option<Priority>,

    /// Hard deadline (UTC).
    #[serde(default)]
    pub due_at: Option<DateTime<Utc>>,

    /// Hours.
    #[serde(default)]
    pub estimated_hours: Option<f64>,

    /// 0-100, display only.
    #[serde(default, deserialize_with = "percent")]
    pub progress: u8,

    #[serde(default)]
    pub status: TaskStatus,

    #[serde(default)]
    pub assignee: Option<Assignee>,
}

impl Task {
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            sequence: 0,
            item: ParentRef::default(),
            workspace: ParentRef::default(),
            content: content.into(),
            task_type: None,
            priority: None,
            due_at: None,
            estimated_hours: None,
            progress: 0,
            status: TaskStatus::Open,
            assignee: None,
        }
    }

    pub fn with_due(mut self, due_at: DateTime<Utc>) -> Self {
        self.due_at = Some(due_at);
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_item(mut self, item: ParentRef) -> Self {
        self.item = item;
        self
    }

    pub fn with_workspace(mut self, workspace: ParentRef) -> Self {
        self.workspace = workspace;
        self
    }

    pub fn with_sequence(mut self, sequence: i32) -> Self {
        self.sequence = sequence;
        self
    }

    pub fn with_estimate(mut self, hours: f64) -> Self {
        self.estimated_hours = Some(hours);
        self
    }

    pub fn with_progress(mut self, progress: u8) -> Self {
        self.progress = progress.min(100);
        self
    }

    pub fn with_task_type(mut self, task_type: TaskType) -> Self {
        self.task_type = Some(task_type);
        self
    }

    pub fn with_assignee(mut self, id: impl Into<String>, display_name: impl Into<String>) -> Self {
        self.assignee = Some(Assignee {
            id: id.into(),
            display_name: display_name.into(),
        });
        self
    }

    pub fn is_resolved(&self) -> bool {
        self.status.is_resolved()
    }

    pub fn is_assigned_to(&self, member_id: &str) -> bool {
        self.assignee.as_ref().is_some_and(|a| a.id == member_id)
    }
}

/// Progress above 100 is capped, same as [`Task::with_progress`].
fn percent<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = u64::deserialize(deserializer)?;
    Ok(raw.min(100) as u8)
}

/// Directed edge: `predecessor` must be resolved before `successor` can start.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyEdge {
    pub predecessor: String,
    pub successor: String,
}

impl DependencyEdge {
    pub fn new(predecessor: impl Into<String>, successor: impl Into<String>) -> Self {
        Self {
            predecessor: predecessor.into(),
            successor: successor.into(),
        }
    }
}

/// Everything one invocation needs, already scoped by the caller.
///
/// `tasks` is the scoped collection whose open members get ranked.
/// `related` holds graph-only context (for instance a predecessor owned by
/// another member); those tasks resolve edges but are never ranked.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSnapshot {
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub related: Vec<Task>,
    #[serde(default)]
    pub edges: Vec<DependencyEdge>,
}

impl TaskSnapshot {
    pub fn new(tasks: Vec<Task>, edges: Vec<DependencyEdge>) -> Self {
        Self {
            tasks,
            related: Vec::new(),
            edges,
        }
    }

    pub fn with_related(mut self, related: Vec<Task>) -> Self {
        self.related = related;
        self
    }

    /// Keep only tasks matching `keep` in scope; the rest become graph
    /// context so edges through them still resolve.
    pub fn narrow<F>(mut self, keep: F) -> Self
    where
        F: Fn(&Task) -> bool,
    {
        let (kept, moved): (Vec<Task>, Vec<Task>) = self.tasks.into_iter().partition(|t| keep(t));
        self.tasks = kept;
        self.related.extend(moved);
        self
    }

    pub fn narrow_to_member(self, member_id: &str) -> Self {
        self.narrow(|t| t.is_assigned_to(member_id))
    }
}
