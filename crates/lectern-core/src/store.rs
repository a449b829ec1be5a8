use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::state::ViewState;

#[derive(Debug)]
pub struct StateStore {
    pub data_dir: PathBuf,
    pub state_path: PathBuf,
    pub session_path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub username: String,
}

impl StateStore {
    #[tracing::instrument(skip(data_dir))]
    pub fn open(data_dir: &Path) -> anyhow::Result<Self> {
        let data_dir = data_dir.to_path_buf();
        fs::create_dir_all(&data_dir)
            .with_context(|| format!("failed to create {}", data_dir.display()))?;

        let state_path = data_dir.join("view_state.json");
        let session_path = data_dir.join("session.json");

        info!(
            data_dir = %data_dir.display(),
            state = %state_path.display(),
            session = %session_path.display(),
            "opened state store"
        );

        Ok(Self {
            data_dir,
            state_path,
            session_path,
        })
    }

    #[tracing::instrument(skip(self))]
    pub fn load_view_state(&self) -> anyhow::Result<Option<ViewState>> {
        load_json(&self.state_path).context("failed to load view_state.json")
    }

    #[tracing::instrument(skip(self, state))]
    pub fn save_view_state(&self, state: &ViewState) -> anyhow::Result<()> {
        save_json_atomic(&self.state_path, state).context("failed to save view_state.json")
    }

    #[tracing::instrument(skip(self))]
    pub fn load_session(&self) -> anyhow::Result<Option<Session>> {
        load_json(&self.session_path).context("failed to load session.json")
    }

    #[tracing::instrument(skip(self, session))]
    pub fn save_session(&self, session: &Session) -> anyhow::Result<()> {
        save_json_atomic(&self.session_path, session).context("failed to save session.json")
    }

    #[tracing::instrument(skip(self))]
    pub fn clear_session(&self) -> anyhow::Result<()> {
        if self.session_path.exists() {
            fs::remove_file(&self.session_path)
                .with_context(|| format!("failed removing {}", self.session_path.display()))?;
            info!(file = %self.session_path.display(), "cleared session");
        }
        Ok(())
    }
}

#[tracing::instrument(skip(path))]
fn load_json<T>(path: &Path) -> anyhow::Result<Option<T>>
where
    T: serde::de::DeserializeOwned,
{
    if !path.exists() {
        debug!(file = %path.display(), "file not present; nothing stored yet");
        return Ok(None);
    }

    let raw =
        fs::read_to_string(path).with_context(|| format!("failed reading {}", path.display()))?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let value = serde_json::from_str(trimmed)
        .with_context(|| format!("failed parsing {}", path.display()))?;
    Ok(Some(value))
}

#[tracing::instrument(skip(path, value))]
fn save_json_atomic<T>(path: &Path, value: &T) -> anyhow::Result<()>
where
    T: Serialize,
{
    debug!(file = %path.display(), "saving json atomically");

    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut temp = NamedTempFile::new_in(dir)?;
    let serialized = serde_json::to_string_pretty(value)?;
    writeln!(temp, "{serialized}")?;
    temp.flush()?;

    temp.persist(path)
        .map_err(|err| anyhow!("failed to persist {}: {}", path.display(), err))?;

    Ok(())
}
