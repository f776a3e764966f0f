//! Crate-wide error type.
//!
//! Only contract violations surface here. Malformed, duplicate or cyclic
//! edges are recovered inside the graph builder and never become errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FocusError {
    #[error("task {task_id} has no due date")]
    MissingDueDate { task_id: String },

    #[error("invalid {name} weight: {value} (expected a finite, non-negative number)")]
    InvalidWeight { name: &'static str, value: f64 },

    #[error("invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("invalid local time: {0}")]
    InvalidLocalTime(String),

    /// A collaborator (task loader) failed.
    #[error(transparent)]
    Source(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, FocusError>;
