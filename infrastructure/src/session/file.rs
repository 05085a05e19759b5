//! JSON-file session store
//!
//! Layout under the root directory:
//!
//! ```text
//! users/<encoded user id>/sessions.json   array of sessions, oldest first
//! users/<encoded user id>/progress.json   progress record
//! ```
//!
//! Files are replaced through a temporary file and a rename, so a crash
//! mid-write leaves the previous contents intact.

use async_trait::async_trait;
use coach_application::{SessionStore, SessionStoreError};
use coach_domain::{PracticeSession, UserProgress};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::debug;

const SESSIONS_FILE: &str = "sessions.json";
const PROGRESS_FILE: &str = "progress.json";

/// Session store that survives process restarts
pub struct FileSessionStore {
    root: PathBuf,
    /// Serializes read-modify-write cycles within this process
    write_lock: Mutex<()>,
}

impl FileSessionStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Platform data directory, e.g. `~/.local/share/pitch-coach` on Linux.
    pub fn default_root() -> Option<PathBuf> {
        dirs::data_dir().map(|d| d.join("pitch-coach"))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn user_dir(&self, user_id: &str) -> PathBuf {
        self.root.join("users").join(encode_user_id(user_id))
    }

    async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, SessionStoreError> {
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(backend(path, e)),
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| backend(path, e))
    }

    async fn write_json<T: Serialize + ?Sized>(
        path: &Path,
        value: &T,
    ) -> Result<(), SessionStoreError> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| backend(parent, e))?;
        }
        let bytes = serde_json::to_vec_pretty(value).map_err(|e| backend(path, e))?;
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, bytes)
            .await
            .map_err(|e| backend(&tmp, e))?;
        tokio::fs::rename(&tmp, path)
            .await
            .map_err(|e| backend(path, e))
    }

    async fn read_sessions(&self, user_id: &str) -> Result<Vec<PracticeSession>, SessionStoreError> {
        let path = self.user_dir(user_id).join(SESSIONS_FILE);
        Ok(Self::read_json(&path).await?.unwrap_or_default())
    }
}

fn backend(path: &Path, err: impl std::fmt::Display) -> SessionStoreError {
    SessionStoreError::Backend(format!("{}: {}", path.display(), err))
}

/// Map a user id onto a single safe path component.
///
/// ASCII alphanumerics, `-` and `_` are kept, every other byte becomes
/// `%XX`, so distinct ids never share a directory.
fn encode_user_id(user_id: &str) -> String {
    if user_id.is_empty() {
        return "%".to_string();
    }
    let mut out = String::with_capacity(user_id.len());
    for byte in user_id.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' {
            out.push(char::from(byte));
        } else {
            out.push_str(&format!("%{:02X}", byte));
        }
    }
    out
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn store_session(&self, session: &PracticeSession) -> Result<(), SessionStoreError> {
        let _guard = self.write_lock.lock().await;
        let mut history = self.read_sessions(&session.user_id).await?;
        if let Some(existing) = history.iter_mut().find(|s| s.id == session.id) {
            *existing = session.clone();
        } else {
            history.push(session.clone());
        }
        let path = self.user_dir(&session.user_id).join(SESSIONS_FILE);
        Self::write_json(&path, &history).await?;
        debug!(user_id = %session.user_id, session_id = %session.id, path = %path.display(), "Stored session");
        Ok(())
    }

    async fn load_session(
        &self,
        user_id: &str,
        session_id: &str,
    ) -> Result<PracticeSession, SessionStoreError> {
        self.read_sessions(user_id)
            .await?
            .into_iter()
            .find(|s| s.id == session_id)
            .ok_or_else(|| SessionStoreError::NotFound(session_id.to_string()))
    }

    async fn list_sessions(&self, user_id: &str) -> Result<Vec<PracticeSession>, SessionStoreError> {
        let mut history = self.read_sessions(user_id).await?;
        history.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(history)
    }

    async fn load_progress(&self, user_id: &str) -> Result<Option<UserProgress>, SessionStoreError> {
        Self::read_json(&self.user_dir(user_id).join(PROGRESS_FILE)).await
    }

    async fn store_progress(&self, progress: &UserProgress) -> Result<(), SessionStoreError> {
        let _guard = self.write_lock.lock().await;
        let path = self.user_dir(&progress.user_id).join(PROGRESS_FILE);
        Self::write_json(&path, progress).await
    }
}
