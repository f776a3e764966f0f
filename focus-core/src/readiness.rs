//! Readiness classification over direct predecessors.
//!
//! Only immediate predecessors matter. A task is never blocked by a
//! predecessor-of-a-predecessor, so classification is a bounded lookup and
//! cannot loop on cycles. A self-edge makes the task its own unresolved
//! predecessor while it is open.

use serde::{Deserialize, Serialize};

use crate::graph::DependencyGraph;
use crate::task::Task;

/// Organization-level policy toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadinessPolicy {
    pub enforce_predecessor_completion: bool,
}

impl Default for ReadinessPolicy {
    fn default() -> Self {
        Self {
            enforce_predecessor_completion: true,
        }
    }
}

impl ReadinessPolicy {
    pub fn enforced() -> Self {
        Self::default()
    }

    pub fn relaxed() -> Self {
        Self {
            enforce_predecessor_completion: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Readiness<'a> {
    Ready,
    /// Blocked; `blocker` is the first unresolved direct predecessor.
    Blocked { blocker: &'a Task },
}

impl Readiness<'_> {
    pub fn is_ready(&self) -> bool {
        matches!(self, Readiness::Ready)
    }
}

/// `true` when the policy is off or every direct predecessor is resolved.
pub fn can_start(graph: &DependencyGraph<'_>, id: &str, policy: ReadinessPolicy) -> bool {
    classify(graph, id, policy).is_ready()
}

pub fn classify<'a>(
    graph: &DependencyGraph<'a>,
    id: &str,
    policy: ReadinessPolicy,
) -> Readiness<'a> {
    if !policy.enforce_predecessor_completion {
        return Readiness::Ready;
    }
    match first_unresolved_predecessor(graph, id) {
        Some(blocker) => Readiness::Blocked { blocker },
        None => Readiness::Ready,
    }
}

/// First unresolved direct predecessor in adjacency order.
pub fn first_unresolved_predecessor<'a>(graph: &DependencyGraph<'a>, id: &str) -> Option<&'a Task> {
    graph.predecessors(id).find(|p| !p.is_resolved())
}
