use std::path::{Path, PathBuf};

use rusqlite::Connection;
use serde::Deserialize;

use crate::db;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

/// Everything the sidecar remembers between requests. At most one workspace
/// (and so one connection) is open at a time.
#[derive(Default)]
pub struct AppState {
    pub workspace: Option<PathBuf>,
    pub db: Option<Connection>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens `path` as the active workspace, closing any previous one first.
    /// On failure the previous workspace is already closed and the state is empty.
    pub fn open(&mut self, path: &Path) -> anyhow::Result<()> {
        self.close();
        let conn = db::open_db(path)?;
        self.workspace = Some(path.to_path_buf());
        self.db = Some(conn);
        Ok(())
    }

    pub fn close(&mut self) {
        let workspace = self.workspace.take();
        let Some(conn) = self.db.take() else {
            return;
        };
        match conn.close() {
            Ok(()) => tracing::info!(workspace = ?workspace, "closed gradebook database"),
            Err((_conn, e)) => {
                tracing::error!(workspace = ?workspace, error = %e, "failed to close database cleanly")
            }
        }
    }
}

impl Drop for AppState {
    fn drop(&mut self) {
        self.close();
    }
}
