//! Focus engine: one readiness/priority snapshot per call.
//!
//! Pipeline per candidate task:
//! `&Task` (unscored) -> [`ScoredTask`] -> [`ClassifiedTask`] (ready or blocked)
//!
//! Every task moves forward exactly once per call. All candidates are scored,
//! blocked ones included, so waiting entries carry the same breakdown.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tracing::debug;

use crate::error::Result;
use crate::graph::DependencyGraph;
use crate::ranking::{ClassifiedTask, FocusResult, RankOptions, ScoredTask, partition_and_rank};
use crate::readiness::{ReadinessPolicy, classify};
use crate::scoring::{ScoreWeights, ScoringContext, score_task};
use crate::task::{Task, TaskSnapshot};
use crate::view::FocusView;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FocusEngine {
    weights: ScoreWeights,
    policy: ReadinessPolicy,
    timezone: Tz,
    include_score_detail: bool,
}

impl Default for FocusEngine {
    fn default() -> Self {
        Self {
            weights: ScoreWeights::default(),
            policy: ReadinessPolicy::default(),
            timezone: Tz::UTC,
            include_score_detail: true,
        }
    }
}

impl FocusEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_weights(mut self, weights: ScoreWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_policy(mut self, policy: ReadinessPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Timezone used to decide what "due today" means.
    pub fn with_timezone(mut self, timezone: Tz) -> Self {
        self.timezone = timezone;
        self
    }

    pub fn with_score_detail(mut self, include: bool) -> Self {
        self.include_score_detail = include;
        self
    }

    pub fn weights(&self) -> &ScoreWeights {
        &self.weights
    }

    pub fn policy(&self) -> ReadinessPolicy {
        self.policy
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Rank a pre-scoped snapshot.
    ///
    /// `now` is used for every deadline band in this call. Fails only on
    /// invalid weights or a candidate without a due date.
    pub fn run(
        &self,
        snapshot: &TaskSnapshot,
        view: FocusView,
        now: DateTime<Utc>,
    ) -> Result<FocusResult> {
        self.weights.validate()?;

        let graph = DependencyGraph::build(&snapshot.tasks, &snapshot.related, &snapshot.edges);
        let ctx = ScoringContext::new(now, self.timezone);

        let classified = graph
            .candidates()
            .map(|task| self.advance(&graph, task, &ctx))
            .collect::<Result<Vec<_>>>()?;

        let total_task_count = classified.len();
        let (focus_tasks, waiting_tasks) = partition_and_rank(
            &graph,
            classified,
            RankOptions {
                view,
                include_score_detail: self.include_score_detail,
            },
        );

        debug!(
            ?view,
            nodes = graph.len(),
            dropped_edges = graph.dropped_edge_count(),
            focus = focus_tasks.len(),
            waiting = waiting_tasks.len(),
            enforce = self.policy.enforce_predecessor_completion,
            "focus snapshot ranked"
        );

        Ok(FocusResult {
            focus_tasks,
            waiting_tasks,
            total_task_count,
            generated_at: now,
        })
    }

    /// Unscored -> scored -> classified.
    fn advance<'a>(
        &self,
        graph: &DependencyGraph<'a>,
        task: &'a Task,
        ctx: &ScoringContext,
    ) -> Result<ClassifiedTask<'a>> {
        let (total, detail) = score_task(task, graph, &self.weights, ctx)?;
        let readiness = classify(graph, &task.id, self.policy);
        Ok(ScoredTask { task, total, detail }.classify(readiness))
    }

    /// "My tasks": the snapshot is already narrowed to one assignee.
    pub fn my_tasks(&self, snapshot: &TaskSnapshot, now: DateTime<Utc>) -> Result<FocusResult> {
        self.run(snapshot, FocusView::Personal, now)
    }

    /// "Assigned across members", optionally narrowed to one member.
    ///
    /// Filtered-out tasks stay in the graph as context so that edges through
    /// them still block or resolve.
    pub fn team_tasks(
        &self,
        snapshot: &TaskSnapshot,
        member_id: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<FocusResult> {
        match member_id {
            Some(member) => {
                let narrowed = snapshot.clone().narrow_to_member(member);
                self.run(&narrowed, FocusView::Team, now)
            }
            None => self.run(snapshot, FocusView::Team, now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FocusError;
    use crate::task::{DependencyEdge, ParentRef, Priority, TaskStatus, TaskType};
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 21, 8, 25, 0).unwrap()
    }

    #[test]
    fn empty_snapshot_is_not_an_error() {
        let out = FocusEngine::new()
            .my_tasks(&TaskSnapshot::default(), now())
            .unwrap();
        assert!(out.is_empty());
        assert!(out.focus_tasks.is_empty());
        assert!(out.waiting_tasks.is_empty());
        assert_eq!(out.generated_at, now());
    }

    #[test]
    fn missing_due_date_fails_the_whole_run() {
        let snap = TaskSnapshot::new(
            vec![
                Task::new("ok", "fine").with_due(now()),
                Task::new("bad", "no due date"),
            ],
            vec![],
        );
        let err = FocusEngine::new().my_tasks(&snap, now()).unwrap_err();
        assert!(matches!(err, FocusError::MissingDueDate { ref task_id } if task_id == "bad"));
    }

    #[test]
    fn resolved_tasks_without_due_date_are_not_scored() {
        let snap = TaskSnapshot::new(
            vec![
                Task::new("done", "old").with_status(TaskStatus::Completed),
                Task::new("a", "a").with_due(now()),
            ],
            vec![DependencyEdge::new("done", "a")],
        );
        let out = FocusEngine::new().my_tasks(&snap, now()).unwrap();
        assert_eq!(out.focus_ids(), vec!["a"]);
        assert_eq!(out.total_task_count, 1);
    }

    #[test]
    fn invalid_weights_are_rejected() {
        let engine = FocusEngine::new().with_weights(ScoreWeights::new(2.0, -3.0, 5.0));
        let err = engine.my_tasks(&TaskSnapshot::default(), now()).unwrap_err();
        assert!(matches!(err, FocusError::InvalidWeight { name: "deadline", .. }));
    }

    #[test]
    fn score_detail_can_be_omitted() {
        let snap = TaskSnapshot::new(vec![Task::new("a", "a").with_due(now())], vec![]);
        let out = FocusEngine::new()
            .with_score_detail(false)
            .my_tasks(&snap, now())
            .unwrap();
        assert!(out.focus_tasks[0].score_detail.is_none());
        assert!(out.focus_tasks[0].total_score > 0.0);
    }

    #[test]
    fn team_view_retains_assignee_and_filters_member() {
        let due = now() + Duration::days(2);
        let snap = TaskSnapshot::new(
            vec![
                Task::new("a", "Ada's task")
                    .with_due(due)
                    .with_assignee("u1", "Ada"),
                Task::new("b", "Bo's task")
                    .with_due(due)
                    .with_priority(Priority::High)
                    .with_assignee("u2", "Bo"),
            ],
            vec![DependencyEdge::new("b", "a")],
        );
        let engine = FocusEngine::new();

        let all = engine.team_tasks(&snap, None, now()).unwrap();
        assert_eq!(all.total_task_count, 2);
        assert_eq!(all.focus_ids(), vec!["b"]);
        assert_eq!(all.focus_tasks[0].assignee.as_ref().unwrap().display_name, "Bo");
        assert_eq!(all.waiting_ids(), vec!["a"]);

        // Ada only: Bo's task stays as context and still blocks hers.
        let ada = engine.team_tasks(&snap, Some("u1"), now()).unwrap();
        assert_eq!(ada.total_task_count, 1);
        assert_eq!(ada.waiting_ids(), vec!["a"]);
        assert_eq!(ada.waiting_tasks[0].blocked_by.as_ref().unwrap().id, "b");
    }

    #[test]
    fn entry_carries_task_fields_through() {
        let due = now() + Duration::days(2);
        let review = TaskType {
            id: "tt-1".to_string(),
            code: "REV".to_string(),
            name: "Review".to_string(),
        };
        let task = Task::new("a", "Review draft")
            .with_sequence(4)
            .with_item(ParentRef::new("i-1", "DOC-3", "Handbook"))
            .with_workspace(ParentRef::new("w-1", "OPS", "Operations"))
            .with_task_type(review.clone())
            .with_priority(Priority::Medium)
            .with_estimate(1.5)
            .with_progress(40)
            .with_due(due);
        let upstream = Task::new("ctx", "Other team's sign-off")
            .with_status(TaskStatus::Completed)
            .with_item(ParentRef::new("i-9", "LEGAL-1", "Sign-off"));
        let snap = TaskSnapshot::new(vec![task], vec![DependencyEdge::new("ctx", "a")])
            .with_related(vec![upstream]);

        let out = FocusEngine::new().my_tasks(&snap, now()).unwrap();
        assert_eq!(out.total_task_count, 1);
        let e = &out.focus_tasks[0];
        assert_eq!(e.sequence, 4);
        assert_eq!(e.item, ParentRef::new("i-1", "DOC-3", "Handbook"));
        assert_eq!(e.workspace, ParentRef::new("w-1", "OPS", "Operations"));
        assert_eq!(e.task_type.as_ref(), Some(&review));
        assert_eq!(e.priority, Some(Priority::Medium));
        assert_eq!(e.estimated_hours, Some(1.5));
        assert_eq!(e.progress, 40);
        assert_eq!(e.due_at, Some(due));
        assert_eq!(e.predecessor_ids, vec!["ctx".to_string()]);
        assert_eq!(e.predecessor_tasks[0].item_code, "LEGAL-1");

        let json = serde_json::to_value(e).unwrap();
        assert_eq!(json["taskType"]["name"], "Review");
        assert_eq!(json["estimatedHours"], 1.5);
        assert_eq!(json["workspace"]["code"], "OPS");
    }

    #[test]
    fn timezone_changes_today_band() {
        use crate::scoring::DeadlineBand;

        // now: 22:00 Chicago on Feb 20; due: 01:00 Chicago on Feb 21.
        // In UTC both fall on Feb 21.
        let now = Utc.with_ymd_and_hms(2026, 2, 21, 4, 0, 0).unwrap();
        let due = Utc.with_ymd_and_hms(2026, 2, 21, 7, 0, 0).unwrap();
        let snap = TaskSnapshot::new(vec![Task::new("a", "a").with_due(due)], vec![]);

        let band = |engine: FocusEngine| {
            let out = engine.my_tasks(&snap, now).unwrap();
            out.focus_tasks[0].score_detail.as_ref().unwrap().deadline_band
        };

        let chicago = crate::time::parse_timezone("America/Chicago").unwrap();
        assert_eq!(band(FocusEngine::new()), DeadlineBand::Today);
        assert_eq!(band(FocusEngine::new().with_timezone(chicago)), DeadlineBand::ThisWeek);
    }

    #[test]
    fn engine_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FocusEngine>();
        assert_send_sync::<TaskSnapshot>();
        assert_send_sync::<FocusResult>();
    }
}
