//! Resolution traces
//!
//! An append-only log of pipeline transitions. `record` never mutates the
//! receiver: it returns a new trace that shares the old one's entries
//! without being able to change them, so a trace captured mid-resolution stays
//! valid for replay and audit.

use crate::value_objects::ResolutionState;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

/// What happened at a stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceOutcome {
    /// The stage found what it looked for
    Hit,
    /// The stage found nothing and passed control on
    Miss,
    /// The stage had nothing to do
    Skipped,
    /// The stage aborted the resolution
    Failed,
}

/// One recorded transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceEntry {
    /// Service identifier the stage ran for
    pub stage: String,
    /// Outcome of the stage
    pub outcome: TraceOutcome,
    /// Pipeline state
    pub state: ResolutionState,
    /// Microseconds since the trace was started
    pub elapsed_us: u64,
}

/// Link in the shared entry list, newest first
struct TraceNode {
    entry: TraceEntry,
    prev: Option<Arc<TraceNode>>,
}

/// Immutable per-request transition log
///
/// Entries live in a persistent list: recording one allocates a single node
/// that points at the previous head, so every trace derived from the same
/// base shares its history.
#[derive(Clone)]
pub struct ResolutionTrace {
    started: Instant,
    head: Option<Arc<TraceNode>>,
    len: usize,
}

impl ResolutionTrace {
    /// Start an empty trace
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
            head: None,
            len: 0,
        }
    }

    /// Return a new trace with one more entry
    pub fn record<S: Into<String>>(
        &self,
        state: ResolutionState,
        stage: S,
        outcome: TraceOutcome,
    ) -> Self {
        let entry = TraceEntry {
            stage: stage.into(),
            outcome,
            state,
            elapsed_us: u64::try_from(self.started.elapsed().as_micros()).unwrap_or(u64::MAX),
        };
        Self {
            started: self.started,
            head: Some(Arc::new(TraceNode {
                entry,
                prev: self.head.clone(),
            })),
            len: self.len + 1,
        }
    }

    /// Entries from newest to oldest
    pub fn iter_rev(&self) -> impl Iterator<Item = &TraceEntry> {
        std::iter::successors(self.head.as_deref(), |node| node.prev.as_deref())
            .map(|node| &node.entry)
    }

    /// Recorded entries in order
    pub fn entries(&self) -> Vec<TraceEntry> {
        let mut entries: Vec<TraceEntry> = self.iter_rev().cloned().collect();
        entries.reverse();
        entries
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Most recent entry
    pub fn last(&self) -> Option<&TraceEntry> {
        self.head.as_deref().map(|node| &node.entry)
    }

    /// States visited for one service, in order
    pub fn states_for(&self, stage: &str) -> Vec<ResolutionState> {
        let mut states: Vec<ResolutionState> = self
            .iter_rev()
            .filter(|entry| entry.stage == stage)
            .map(|entry| entry.state)
            .collect();
        states.reverse();
        states
    }

    /// Whether any stage failed
    pub fn has_failure(&self) -> bool {
        self.iter_rev()
            .any(|entry| entry.outcome == TraceOutcome::Failed)
    }
}

// Unlink iteratively so dropping a long trace cannot exhaust the stack
impl Drop for ResolutionTrace {
    fn drop(&mut self) {
        let mut next = self.head.take();
        while let Some(node) = next {
            next = Arc::into_inner(node).and_then(|mut node| node.prev.take());
        }
    }
}

impl fmt::Debug for ResolutionTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolutionTrace")
            .field("len", &self.len)
            .field("entries", &self.entries())
            .finish()
    }
}

impl Default for ResolutionTrace {
    fn default() -> Self {
        Self::start()
    }
}
