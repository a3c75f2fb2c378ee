//! SQLite-backed checkpointer (SqliteSaver). Persistent across process restarts.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use rusqlite::params;

use crate::memory::checkpoint::{
    Checkpoint, CheckpointListItem, CheckpointMetadata, CheckpointSource, CHECKPOINT_VERSION,
};
use crate::memory::checkpointer::{CheckpointError, Checkpointer};
use crate::memory::config::RunnableConfig;
use crate::memory::serializer::Serializer;

fn storage(e: impl std::fmt::Display) -> CheckpointError {
    CheckpointError::Storage(e.to_string())
}

fn created_at_to_millis(t: Option<SystemTime>) -> Option<i64> {
    t.and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_millis() as i64)
}

fn millis_to_created_at(v: Option<i64>) -> Option<SystemTime> {
    v.and_then(|ms| UNIX_EPOCH.checked_add(Duration::from_millis(ms.max(0) as u64)))
}

/// SQLite-backed checkpointer. Key: (thread_id, checkpoint_ns, checkpoint_id).
///
/// Each call opens its own connection inside `spawn_blocking`. Rows are ordered by
/// insertion (`rowid`), so "latest" is the last one written.
///
/// **Interaction**: Used as `Arc<dyn Checkpointer<S>>` in `StateGraph::compile_with_checkpointer`.
pub struct SqliteSaver<S> {
    db_path: PathBuf,
    serializer: Arc<dyn Serializer<S>>,
}

impl<S> SqliteSaver<S>
where
    S: Clone + Send + Sync + 'static,
{
    /// Opens (or creates) the database at `path` and ensures the table exists.
    pub fn new(
        path: impl AsRef<Path>,
        serializer: Arc<dyn Serializer<S>>,
    ) -> Result<Self, CheckpointError> {
        let db_path = path.as_ref().to_path_buf();
        let conn = rusqlite::Connection::open(&db_path).map_err(storage)?;
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS checkpoints (
                thread_id TEXT NOT NULL,
                checkpoint_ns TEXT NOT NULL,
                checkpoint_id TEXT NOT NULL,
                ts TEXT NOT NULL,
                payload BLOB NOT NULL,
                metadata_source TEXT NOT NULL,
                metadata_step INTEGER NOT NULL,
                metadata_created_at INTEGER,
                PRIMARY KEY (thread_id, checkpoint_ns, checkpoint_id)
            )
            "#,
            [],
        )
        .map_err(storage)?;
        Ok(Self {
            db_path,
            serializer,
        })
    }

    fn thread_id_required(config: &RunnableConfig) -> Result<String, CheckpointError> {
        config
            .thread_id
            .clone()
            .ok_or(CheckpointError::ThreadIdRequired)
    }
}

type Row = (String, String, Vec<u8>, String, i64, Option<i64>);

#[async_trait]
impl<S> Checkpointer<S> for SqliteSaver<S>
where
    S: Clone + Send + Sync + 'static,
{
    async fn put(
        &self,
        config: &RunnableConfig,
        checkpoint: &Checkpoint<S>,
    ) -> Result<String, CheckpointError> {
        let thread_id = Self::thread_id_required(config)?;
        let checkpoint_ns = config.checkpoint_ns.clone();
        let payload = self.serializer.serialize(&checkpoint.channel_values)?;
        let source = checkpoint.metadata.source.as_str();
        let step = checkpoint.metadata.step;
        let created_at = created_at_to_millis(checkpoint.metadata.created_at);
        let id = checkpoint.id.clone();
        let ts = checkpoint.ts.clone();

        let db_path = self.db_path.clone();
        tokio::task::spawn_blocking(move || {
            let conn = rusqlite::Connection::open(&db_path).map_err(storage)?;
            conn.execute(
                r#"
                INSERT OR REPLACE INTO checkpoints
                (thread_id, checkpoint_ns, checkpoint_id, ts, payload,
                 metadata_source, metadata_step, metadata_created_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                "#,
                params![thread_id, checkpoint_ns, id, ts, payload, source, step, created_at],
            )
            .map_err(storage)?;
            Ok::<String, CheckpointError>(id)
        })
        .await
        .map_err(storage)?
    }

    async fn get_tuple(
        &self,
        config: &RunnableConfig,
    ) -> Result<Option<(Checkpoint<S>, CheckpointMetadata)>, CheckpointError> {
        let thread_id = Self::thread_id_required(config)?;
        let checkpoint_ns = config.checkpoint_ns.clone();
        let want_id = config.checkpoint_id.clone();
        let db_path = self.db_path.clone();

        let row: Option<Row> = tokio::task::spawn_blocking(move || {
            let conn = rusqlite::Connection::open(&db_path).map_err(storage)?;
            let sql = if want_id.is_some() {
                "SELECT checkpoint_id, ts, payload, metadata_source, metadata_step, metadata_created_at
                 FROM checkpoints WHERE thread_id = ?1 AND checkpoint_ns = ?2 AND checkpoint_id = ?3"
            } else {
                "SELECT checkpoint_id, ts, payload, metadata_source, metadata_step, metadata_created_at
                 FROM checkpoints WHERE thread_id = ?1 AND checkpoint_ns = ?2
                 ORDER BY rowid DESC LIMIT 1"
            };
            let mut stmt = conn.prepare(sql).map_err(storage)?;
            let mut rows = match want_id {
                Some(ref cid) => stmt.query(params![thread_id, checkpoint_ns, cid]),
                None => stmt.query(params![thread_id, checkpoint_ns]),
            }
            .map_err(storage)?;
            let Some(row) = rows.next().map_err(storage)? else {
                return Ok::<_, CheckpointError>(None);
            };
            Ok(Some((
                row.get(0).map_err(storage)?,
                row.get(1).map_err(storage)?,
                row.get(2).map_err(storage)?,
                row.get(3).map_err(storage)?,
                row.get(4).map_err(storage)?,
                row.get(5).map_err(storage)?,
            )))
        })
        .await
        .map_err(storage)??;

        let Some((checkpoint_id, ts, payload, source, step, created_at)) = row else {
            return Ok(None);
        };

        let channel_values = self.serializer.deserialize(&payload)?;
        let metadata = CheckpointMetadata {
            source: CheckpointSource::parse(&source),
            step,
            created_at: millis_to_created_at(created_at),
        };
        let checkpoint = Checkpoint {
            v: CHECKPOINT_VERSION,
            id: checkpoint_id,
            ts,
            channel_values,
            metadata: metadata.clone(),
        };
        Ok(Some((checkpoint, metadata)))
    }

    async fn list(
        &self,
        config: &RunnableConfig,
        limit: Option<usize>,
        before: Option<&str>,
        after: Option<&str>,
    ) -> Result<Vec<CheckpointListItem>, CheckpointError> {
        let thread_id = Self::thread_id_required(config)?;
        let checkpoint_ns = config.checkpoint_ns.clone();
        let db_path = self.db_path.clone();

        let rows: Vec<(String, String, i64, Option<i64>)> =
            tokio::task::spawn_blocking(move || {
                let conn = rusqlite::Connection::open(&db_path).map_err(storage)?;
                let mut stmt = conn
                    .prepare(
                        "SELECT checkpoint_id, metadata_source, metadata_step, metadata_created_at
                         FROM checkpoints WHERE thread_id = ?1 AND checkpoint_ns = ?2
                         ORDER BY rowid ASC",
                    )
                    .map_err(storage)?;
                let mapped = stmt
                    .query_map(params![thread_id, checkpoint_ns], |r| {
                        Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?))
                    })
                    .map_err(storage)?;
                mapped
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(storage)
            })
            .await
            .map_err(storage)??;

        let mut items: Vec<CheckpointListItem> = rows
            .into_iter()
            .map(|(checkpoint_id, source, step, created_at)| CheckpointListItem {
                checkpoint_id,
                metadata: CheckpointMetadata {
                    source: CheckpointSource::parse(&source),
                    step,
                    created_at: millis_to_created_at(created_at),
                },
            })
            .collect();

        if let Some(a) = after {
            if let Some(pos) = items.iter().position(|i| i.checkpoint_id == a) {
                items.drain(..=pos);
            }
        }
        if let Some(b) = before {
            if let Some(pos) = items.iter().position(|i| i.checkpoint_id == b) {
                items.truncate(pos);
            }
        }
        if let Some(n) = limit {
            let len = items.len();
            if len > n {
                items.drain(..len - n);
            }
        }
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn created_at_millis_round_trip() {
        let t = UNIX_EPOCH + Duration::from_millis(1_700_000_000_123);
        let ms = created_at_to_millis(Some(t));
        assert_eq!(ms, Some(1_700_000_000_123));
        assert_eq!(millis_to_created_at(ms), Some(t));
        assert_eq!(millis_to_created_at(None), None);
    }
}
