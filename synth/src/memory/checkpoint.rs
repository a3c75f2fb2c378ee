//! Checkpoint and metadata types.

use std::time::SystemTime;

/// Current version of checkpoint format.
pub const CHECKPOINT_VERSION: u32 = 1;

/// Source of the checkpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CheckpointSource {
    /// Created from the input of a run.
    #[default]
    Input,
    /// Created at the end of a graph run.
    Loop,
    /// Created from a manual state update.
    Update,
}

impl CheckpointSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::Loop => "loop",
            Self::Update => "update",
        }
    }

    /// Parses a stored source; unknown values read as `Update`.
    pub fn parse(s: &str) -> Self {
        match s {
            "input" => Self::Input,
            "loop" => Self::Loop,
            _ => Self::Update,
        }
    }
}

/// Metadata for a single checkpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckpointMetadata {
    pub source: CheckpointSource,
    /// Number of node steps the run took before this checkpoint.
    pub step: i64,
    pub created_at: Option<SystemTime>,
}

/// Checkpoint id + metadata, as returned by `Checkpointer::list`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckpointListItem {
    pub checkpoint_id: String,
    pub metadata: CheckpointMetadata,
}

/// One checkpoint: state snapshot plus id and timestamp.
///
/// Stored by a Checkpointer keyed by (thread_id, checkpoint_ns, checkpoint_id).
#[derive(Debug, Clone)]
pub struct Checkpoint<S> {
    pub v: u32,
    /// Time-ordered id (UUID v7).
    pub id: String,
    /// RFC 3339 creation time.
    pub ts: String,
    /// The graph state.
    pub channel_values: S,
    pub metadata: CheckpointMetadata,
}

impl<S> Checkpoint<S> {
    /// Snapshot of `state` with a fresh id.
    pub fn from_state(state: S, source: CheckpointSource, step: i64) -> Self {
        Self::with_id(uuid::Uuid::now_v7().to_string(), state, source, step)
    }

    /// Snapshot with a caller-chosen id.
    pub fn with_id(id: String, state: S, source: CheckpointSource, step: i64) -> Self {
        let now = SystemTime::now();
        Self {
            v: CHECKPOINT_VERSION,
            id,
            ts: chrono::DateTime::<chrono::Utc>::from(now).to_rfc3339(),
            channel_values: state,
            metadata: CheckpointMetadata {
                source,
                step,
                created_at: Some(now),
            },
        }
    }
}
