//! File-backed task source.
//!
//! The snapshot file *is* the authorization scope: whatever it contains was
//! exported for the caller. `--user` / `--workspace` only narrow it further.

use anyhow::{Context, Result};
use focus_core::{DependencyEdge, Scope, TaskSnapshot, TaskSource};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Clone, Default)]
pub struct FileSource {
    pub snapshot: PathBuf,
    /// Optional `predecessor,successor` CSV appended after the JSON edges.
    pub edges: Option<PathBuf>,
    /// Narrow "my tasks" to this assignee.
    pub user: Option<String>,
    /// Narrow team runs to this workspace id.
    pub workspace: Option<String>,
}

impl TaskSource for FileSource {
    fn load(&self, scope: &Scope) -> Result<TaskSnapshot> {
        let mut snapshot = read_snapshot(&self.snapshot)?;

        if let Some(path) = &self.edges {
            let extra = read_edges_csv(path)?;
            debug!(count = extra.len(), path = %path.display(), "loaded extra edges");
            snapshot.edges.extend(extra);
        }

        let snapshot = match scope {
            Scope::User { .. } => match &self.user {
                Some(user) => snapshot.narrow_to_member(user),
                None => snapshot,
            },
            Scope::Team { .. } => match &self.workspace {
                Some(ws) => snapshot.narrow(|t| &t.workspace.id == ws),
                None => snapshot,
            },
        };

        info!(
            ?scope,
            tasks = snapshot.tasks.len(),
            related = snapshot.related.len(),
            edges = snapshot.edges.len(),
            "snapshot loaded"
        );
        Ok(snapshot)
    }
}

pub fn read_snapshot(path: &Path) -> Result<TaskSnapshot> {
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    parse_snapshot(&s).with_context(|| format!("parse {}", path.display()))
}

pub fn parse_snapshot(s: &str) -> Result<TaskSnapshot> {
    Ok(serde_json::from_str(s)?)
}

pub fn read_edges_csv(path: &Path) -> Result<Vec<DependencyEdge>> {
    let file = fs::File::open(path).with_context(|| format!("open {}", path.display()))?;
    parse_edges_csv(file).with_context(|| format!("parse {}", path.display()))
}

/// Header must be `predecessor,successor`.
pub fn parse_edges_csv<R: Read>(reader: R) -> Result<Vec<DependencyEdge>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut edges = Vec::new();
    for (i, row) in rdr.deserialize::<DependencyEdge>().enumerate() {
        // +2: 1-based, plus the header line.
        let edge = row.with_context(|| format!("edge row {}", i + 2))?;
        edges.push(edge);
    }
    Ok(edges)
}
