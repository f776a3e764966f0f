//! Weighted composite scoring.
//!
//! `total = priority * w_priority + deadline * w_deadline + impact * w_impact`
//!
//! Sub-score scales:
//! - priority: Low=1, Medium=2, High=3, Critical=4 (absent scores as Low)
//! - deadline: band score, see [`DeadlineBand`]
//! - successor impact: `min(10, open_successors * 3)`
//!
//! Deadline bands are evaluated in the organization timezone so that "today"
//! means the local calendar day:
//!
//! | band        | condition                          | score |
//! |-------------|------------------------------------|-------|
//! | `Overdue`   | due before now                     | 10    |
//! | `Today`     | due later on the same local day    | 9     |
//! | `ThisWeek`  | due within 7 days                  | 6     |
//! | `ThisMonth` | due within 30 days                 | 3     |
//! | `Later`     | anything further out               | 1     |

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{FocusError, Result};
use crate::graph::DependencyGraph;
use crate::task::{Priority, Task};
use crate::time::same_local_day;

pub const SUCCESSOR_IMPACT_STEP: u32 = 3;
pub const SUCCESSOR_IMPACT_MAX: u32 = 10;
pub const THIS_WEEK_DAYS: i64 = 7;
pub const THIS_MONTH_DAYS: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreWeights {
    pub priority: f64,
    pub deadline: f64,
    pub successor_impact: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            priority: 2.0,
            deadline: 3.0,
            successor_impact: 5.0,
        }
    }
}

impl ScoreWeights {
    pub fn new(priority: f64, deadline: f64, successor_impact: f64) -> Self {
        Self {
            priority,
            deadline,
            successor_impact,
        }
    }

    /// Weights must be finite and non-negative.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("priority", self.priority),
            ("deadline", self.deadline),
            ("successor impact", self.successor_impact),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(FocusError::InvalidWeight { name, value });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DeadlineBand {
    Later,
    ThisMonth,
    ThisWeek,
    Today,
    Overdue,
}

impl DeadlineBand {
    pub fn classify(due_at: DateTime<Utc>, now: DateTime<Utc>, tz: Tz) -> Self {
        if due_at < now {
            return DeadlineBand::Overdue;
        }
        if same_local_day(due_at, now, tz) {
            return DeadlineBand::Today;
        }

        let left = due_at - now;
        if left <= Duration::days(THIS_WEEK_DAYS) {
            DeadlineBand::ThisWeek
        } else if left <= Duration::days(THIS_MONTH_DAYS) {
            DeadlineBand::ThisMonth
        } else {
            DeadlineBand::Later
        }
    }

    pub fn score(self) -> u32 {
        match self {
            DeadlineBand::Overdue => 10,
            DeadlineBand::Today => 9,
            DeadlineBand::ThisWeek => 6,
            DeadlineBand::ThisMonth => 3,
            DeadlineBand::Later => 1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DeadlineBand::Overdue => "overdue",
            DeadlineBand::Today => "due today",
            DeadlineBand::ThisWeek => "due this week",
            DeadlineBand::ThisMonth => "due this month",
            DeadlineBand::Later => "due later",
        }
    }
}

pub fn priority_score(priority: Option<Priority>) -> u32 {
    match priority {
        None | Some(Priority::Low) => 1,
        Some(Priority::Medium) => 2,
        Some(Priority::High) => 3,
        Some(Priority::Critical) => 4,
    }
}

pub fn successor_impact_score(open_successors: usize) -> u32 {
    let n = u32::try_from(open_successors).unwrap_or(u32::MAX);
    n.saturating_mul(SUCCESSOR_IMPACT_STEP)
        .min(SUCCESSOR_IMPACT_MAX)
}

/// Instant and timezone shared by every task scored in one invocation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringContext {
    pub now: DateTime<Utc>,
    pub tz: Tz,
}

impl ScoringContext {
    pub fn new(now: DateTime<Utc>, tz: Tz) -> Self {
        Self { now, tz }
    }
}

/// Numeric breakdown behind a total score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreDetail {
    pub priority_score: u32,
    pub deadline_score: u32,
    pub successor_impact_score: u32,
    pub priority_weight: f64,
    pub deadline_weight: f64,
    pub successor_impact_weight: f64,
    pub deadline_band: DeadlineBand,
    pub open_successor_count: usize,
    pub explanation: String,
}

impl ScoreDetail {
    pub fn total(&self) -> f64 {
        f64::from(self.priority_score) * self.priority_weight
            + f64::from(self.deadline_score) * self.deadline_weight
            + f64::from(self.successor_impact_score) * self.successor_impact_weight
    }
}

/// Score one task against the graph.
///
/// Fails only when the task carries no due date.
pub fn score_task(
    task: &Task,
    graph: &DependencyGraph<'_>,
    weights: &ScoreWeights,
    ctx: &ScoringContext,
) -> Result<(f64, ScoreDetail)> {
    let due_at = task.due_at.ok_or_else(|| FocusError::MissingDueDate {
        task_id: task.id.clone(),
    })?;

    let band = DeadlineBand::classify(due_at, ctx.now, ctx.tz);
    let open_successors = graph.open_successor_count(&task.id);

    let mut detail = ScoreDetail {
        priority_score: priority_score(task.priority),
        deadline_score: band.score(),
        successor_impact_score: successor_impact_score(open_successors),
        priority_weight: weights.priority,
        deadline_weight: weights.deadline,
        successor_impact_weight: weights.successor_impact,
        deadline_band: band,
        open_successor_count: open_successors,
        explanation: String::new(),
    };
    let total = detail.total();
    detail.explanation = explain(task.priority, &detail, total);

    Ok((total, detail))
}

fn explain(priority: Option<Priority>, d: &ScoreDetail, total: f64) -> String {
    let priority_label = priority.map(Priority::label).unwrap_or("no priority");
    let successors = match d.open_successor_count {
        1 => "1 open successor".to_string(),
        n => format!("{n} open successors"),
    };

    format!(
        "priority {} ({}) x {} + deadline {} ({}) x {} + successor impact {} ({}) x {} = {}",
        d.priority_score,
        priority_label,
        d.priority_weight,
        d.deadline_score,
        d.deadline_band.label(),
        d.deadline_weight,
        d.successor_impact_score,
        successors,
        d.successor_impact_weight,
        total,
    )
}
