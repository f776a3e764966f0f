//! Focus service: binds the engine to its collaborators.
//!
//! The loader, the organization policy and the clock are external. This
//! module only defines the seams; real adapters live with the caller.

use anyhow::Result as SourceResult;

use crate::engine::FocusEngine;
use crate::error::Result;
use crate::ranking::FocusResult;
use crate::readiness::ReadinessPolicy;
use crate::task::TaskSnapshot;
use crate::time::Clock;

/// Who the caller is asking about. Resolved to a snapshot by a [`TaskSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    User {
        user_id: String,
    },
    Team {
        workspace_id: String,
        member_id: Option<String>,
    },
}

impl Scope {
    pub fn user(user_id: impl Into<String>) -> Self {
        Scope::User {
            user_id: user_id.into(),
        }
    }

    pub fn team(workspace_id: impl Into<String>, member_id: Option<String>) -> Self {
        Scope::Team {
            workspace_id: workspace_id.into(),
            member_id,
        }
    }
}

/// Authorization-scoped task + edge loader.
pub trait TaskSource {
    fn load(&self, scope: &Scope) -> SourceResult<TaskSnapshot>;
}

/// Organization-level readiness policy lookup.
pub trait PolicySource {
    fn readiness_policy(&self, scope: &Scope) -> ReadinessPolicy;
}

impl PolicySource for ReadinessPolicy {
    fn readiness_policy(&self, _scope: &Scope) -> ReadinessPolicy {
        *self
    }
}

#[derive(Debug, Clone)]
pub struct FocusService<S: TaskSource, P: PolicySource, C: Clock> {
    engine: FocusEngine,
    source: S,
    policy: P,
    clock: C,
}

impl<S: TaskSource, P: PolicySource, C: Clock> FocusService<S, P, C> {
    pub fn new(engine: FocusEngine, source: S, policy: P, clock: C) -> Self {
        Self {
            engine,
            source,
            policy,
            clock,
        }
    }

    pub fn engine(&self) -> &FocusEngine {
        &self.engine
    }

    /// Load, rank and return the focus snapshot for `scope`.
    ///
    /// The clock is read once, before loading, and used for the whole call.
    pub fn focus(&self, scope: &Scope) -> Result<FocusResult> {
        let now = self.clock.now();
        let snapshot = self.source.load(scope)?;
        let engine = self.engine.with_policy(self.policy.readiness_policy(scope));

        match scope {
            Scope::User { .. } => engine.my_tasks(&snapshot, now),
            Scope::Team { member_id, .. } => engine.team_tasks(&snapshot, member_id.as_deref(), now),
        }
    }
}
