//! focus-core: dependency-aware task focus engine.
//!
//! Given a scoped set of tasks and predecessor/successor edges, decide which
//! tasks can start now, score every candidate, and return a ranked
//! Focus / Waiting split. Pure and synchronous; no I/O.

pub mod engine;
pub mod error;
pub mod graph;
pub mod ranking;
pub mod readiness;
pub mod scoring;
pub mod service;
pub mod task;
pub mod time;
pub mod view;

pub use engine::FocusEngine;
pub use error::{FocusError, Result};
pub use graph::DependencyGraph;
pub use ranking::{FocusEntry, FocusResult, TaskSummary, partition_and_rank};
pub use readiness::{Readiness, ReadinessPolicy, can_start, classify};
pub use scoring::{DeadlineBand, ScoreDetail, ScoreWeights, ScoringContext, score_task};
pub use service::{FocusService, PolicySource, Scope, TaskSource};
pub use task::{Assignee, DependencyEdge, ParentRef, Priority, Task, TaskSnapshot, TaskStatus, TaskType};
pub use time::{Clock, FixedClock, SystemClock};
pub use view::FocusView;
