//! Partition & rank: split scored candidates into Focus and Waiting lists.
//!
//! Both lists use the same ordering:
//! - total score DESC
//! - due date ASC
//! - task id ASC
//!
//! so that repeated runs over the same input are byte-identical.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::graph::DependencyGraph;
use crate::readiness::Readiness;
use crate::scoring::ScoreDetail;
use crate::task::{Assignee, ParentRef, Priority, Task, TaskType};
use crate::view::FocusView;

/// A task that has been scored but not yet classified.
#[derive(Debug, Clone)]
pub struct ScoredTask<'a> {
    pub task: &'a Task,
    pub total: f64,
    pub detail: ScoreDetail,
}

impl<'a> ScoredTask<'a> {
    pub fn classify(self, readiness: Readiness<'a>) -> ClassifiedTask<'a> {
        ClassifiedTask {
            scored: self,
            readiness,
        }
    }
}

/// A scored task with its readiness decided. Terminal stage of a run.
#[derive(Debug, Clone)]
pub struct ClassifiedTask<'a> {
    pub scored: ScoredTask<'a>,
    pub readiness: Readiness<'a>,
}

/// Compact reference used for "blocked by X" / "unblocks X" display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSummary {
    pub id: String,
    pub content: String,
    pub item_code: String,
}

impl From<&Task> for TaskSummary {
    fn from(t: &Task) -> Self {
        Self {
            id: t.id.clone(),
            content: t.content.clone(),
            item_code: t.item.code.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusEntry {
    pub id: String,
    pub sequence: i32,
    pub item: ParentRef,
    pub workspace: ParentRef,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_type: Option<TaskType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    pub due_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_hours: Option<f64>,
    pub progress: u8,
    pub total_score: f64,
    /// Open direct successors.
    pub successor_count: usize,
    /// First direct successor ("unblocks X"); Focus entries only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub successor: Option<TaskSummary>,
    pub predecessor_ids: Vec<String>,
    pub predecessor_tasks: Vec<TaskSummary>,
    /// First unresolved direct predecessor; Waiting entries only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocked_by: Option<TaskSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<Assignee>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score_detail: Option<ScoreDetail>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusResult {
    pub focus_tasks: Vec<FocusEntry>,
    pub waiting_tasks: Vec<FocusEntry>,
    pub total_task_count: usize,
    pub generated_at: DateTime<Utc>,
}

impl FocusResult {
    pub fn empty(generated_at: DateTime<Utc>) -> Self {
        Self {
            focus_tasks: Vec::new(),
            waiting_tasks: Vec::new(),
            total_task_count: 0,
            generated_at,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total_task_count == 0
    }

    pub fn focus_ids(&self) -> Vec<&str> {
        self.focus_tasks.iter().map(|e| e.id.as_str()).collect()
    }

    pub fn waiting_ids(&self) -> Vec<&str> {
        self.waiting_tasks.iter().map(|e| e.id.as_str()).collect()
    }

    pub fn find(&self, id: &str) -> Option<&FocusEntry> {
        self.focus_tasks
            .iter()
            .chain(self.waiting_tasks.iter())
            .find(|e| e.id == id)
    }
}

/// Output knobs that do not affect ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankOptions {
    pub view: FocusView,
    pub include_score_detail: bool,
}

/// Sort and split classified tasks. Returns `(focus, waiting)`.
pub fn partition_and_rank(
    graph: &DependencyGraph<'_>,
    classified: Vec<ClassifiedTask<'_>>,
    opts: RankOptions,
) -> (Vec<FocusEntry>, Vec<FocusEntry>) {
    let (mut ready, mut blocked): (Vec<_>, Vec<_>) = classified
        .into_iter()
        .partition(|c| c.readiness.is_ready());

    ready.sort_by(|a, b| rank_order(&a.scored, &b.scored));
    blocked.sort_by(|a, b| rank_order(&a.scored, &b.scored));

    let focus = ready
        .into_iter()
        .map(|c| to_entry(graph, c, opts))
        .collect();
    let waiting = blocked
        .into_iter()
        .map(|c| to_entry(graph, c, opts))
        .collect();

    (focus, waiting)
}

fn rank_order(a: &ScoredTask<'_>, b: &ScoredTask<'_>) -> Ordering {
    b.total
        .total_cmp(&a.total)
        .then_with(|| a.task.due_at.cmp(&b.task.due_at))
        .then_with(|| a.task.id.cmp(&b.task.id))
}

fn to_entry(graph: &DependencyGraph<'_>, c: ClassifiedTask<'_>, opts: RankOptions) -> FocusEntry {
    let ClassifiedTask { scored, readiness } = c;
    let task = scored.task;

    let predecessors: Vec<&Task> = graph.predecessors(&task.id).collect();

    let (successor, blocked_by) = match readiness {
        Readiness::Ready => {
            let first = graph
                .successors(&task.id)
                .find(|s| s.id != task.id)
                .map(TaskSummary::from);
            (first, None)
        }
        Readiness::Blocked { blocker } => (None, Some(TaskSummary::from(blocker))),
    };

    FocusEntry {
        id: task.id.clone(),
        sequence: task.sequence,
        item: task.item.clone(),
        workspace: task.workspace.clone(),
        content: task.content.clone(),
        task_type: task.task_type.clone(),
        priority: task.priority,
        due_at: task.due_at,
        estimated_hours: task.estimated_hours,
        progress: task.progress,
        total_score: scored.total,
        successor_count: scored.detail.open_successor_count,
        successor,
        predecessor_ids: predecessors.iter().map(|p| p.id.clone()).collect(),
        predecessor_tasks: predecessors.into_iter().map(TaskSummary::from).collect(),
        blocked_by,
        assignee: opts.view.assignee_of(task),
        score_detail: opts.include_score_detail.then_some(scored.detail),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::readiness::{ReadinessPolicy, classify};
    use crate::scoring::{ScoreWeights, ScoringContext, score_task};
    use crate::task::DependencyEdge;
    use chrono::{Duration, TimeZone};
    use chrono_tz::Tz;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 21, 8, 25, 0).unwrap()
    }

    fn run(tasks: &[Task], edges: &[DependencyEdge]) -> (Vec<FocusEntry>, Vec<FocusEntry>) {
        let g = DependencyGraph::build(tasks, &[], edges);
        let ctx = ScoringContext::new(now(), Tz::UTC);
        let classified = g
            .candidates()
            .map(|t| {
                let (total, detail) = score_task(t, &g, &ScoreWeights::default(), &ctx).unwrap();
                ScoredTask { task: t, total, detail }
                    .classify(classify(&g, &t.id, ReadinessPolicy::enforced()))
            })
            .collect();
        partition_and_rank(
            &g,
            classified,
            RankOptions {
                view: FocusView::Personal,
                include_score_detail: true,
            },
        )
    }

    #[test]
    fn ties_break_by_due_date_then_id() {
        let due = now() + Duration::days(3);
        let tasks = vec![
            Task::new("b", "b").with_due(due),
            Task::new("a", "a").with_due(due),
            Task::new("c", "c").with_due(due - Duration::hours(1)),
        ];
        let (focus, waiting) = run(&tasks, &[]);

        assert!(waiting.is_empty());
        let ids: Vec<&str> = focus.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn waiting_entries_name_their_blocker() {
        let due = now() + Duration::days(3);
        let tasks = vec![
            Task::new("pre", "Draft outline").with_due(due),
            Task::new("post", "Review outline").with_due(due),
        ];
        let edges = vec![DependencyEdge::new("pre", "post")];
        let (focus, waiting) = run(&tasks, &edges);

        assert_eq!(focus.len(), 1);
        assert_eq!(focus[0].id, "pre");
        assert_eq!(focus[0].successor.as_ref().unwrap().id, "post");
        assert!(focus[0].blocked_by.is_none());

        assert_eq!(waiting.len(), 1);
        let w = &waiting[0];
        assert_eq!(w.blocked_by.as_ref().unwrap().content, "Draft outline");
        assert_eq!(w.predecessor_ids, vec!["pre".to_string()]);
        assert!(w.successor.is_none());
    }

    #[test]
    fn focus_successor_is_first_in_edge_order() {
        let due = now() + Duration::days(3);
        let tasks = vec![
            Task::new("a", "a").with_due(due),
            Task::new("b", "b").with_due(due),
            Task::new("c", "c").with_due(due),
        ];
        let edges = vec![DependencyEdge::new("a", "c"), DependencyEdge::new("a", "b")];
        let (focus, _) = run(&tasks, &edges);
        let a = focus.iter().find(|e| e.id == "a").unwrap();
        assert_eq!(a.successor_count, 2);
        assert_eq!(a.successor.as_ref().unwrap().id, "c");
    }

    #[test]
    fn personal_view_strips_assignee() {
        let tasks = vec![
            Task::new("a", "a")
                .with_due(now())
                .with_assignee("u1", "Ada"),
        ];
        let (focus, _) = run(&tasks, &[]);
        assert!(focus[0].assignee.is_none());
        assert!(focus[0].score_detail.is_some());
    }

    #[test]
    fn result_serializes_in_camel_case() {
        let result = FocusResult::empty(now());
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["totalTaskCount"], 0);
        assert!(json["focusTasks"].as_array().unwrap().is_empty());
        assert!(json.get("generatedAt").is_some());
    }
}
