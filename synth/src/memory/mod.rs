//! Checkpointing: persist the conversation state per session (thread).
//!
//! - [`Checkpointer`]: `put` / `get_tuple` / `list` keyed by [`RunnableConfig::thread_id`].
//! - [`MemorySaver`]: in-process, lost on restart; default for the CLI and tests.
//! - [`SqliteSaver`]: SQLite file via `rusqlite`, state encoded by a [`Serializer`].

mod checkpoint;
mod checkpointer;
mod config;
mod memory_saver;
mod serializer;
mod sqlite_saver;

pub use checkpoint::{Checkpoint, CheckpointListItem, CheckpointMetadata, CheckpointSource, CHECKPOINT_VERSION};
pub use checkpointer::{CheckpointError, Checkpointer};
pub use config::RunnableConfig;
pub use memory_saver::MemorySaver;
pub use serializer::{JsonSerializer, Serializer};
pub use sqlite_saver::SqliteSaver;
