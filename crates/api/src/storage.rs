//! JSON file holding the saved dashboard layout.
//!
//! The file is read once at startup and kept in memory behind a
//! [`RwLock`]. Writes go to a sibling temp file first and are renamed into
//! place, so a crash mid-write never leaves a truncated layout behind.
//! Concurrent saves are last-writer-wins.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use mirrorboard_core::DashboardLayout;
use tokio::sync::RwLock;

use crate::error::{AppError, AppResult};

pub struct LayoutFile {
    path: PathBuf,
    current: RwLock<DashboardLayout>,
}

impl LayoutFile {
    /// Load the layout at `path`.
    ///
    /// A missing, unreadable or invalid file yields the default empty 6x4
    /// board; the file is only created on the first save.
    pub async fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let layout = match read_layout(&path).await {
            Ok(Some(layout)) => {
                tracing::info!(
                    path = %path.display(),
                    widget_count = layout.widgets.len(),
                    "Loaded layout file",
                );
                layout
            }
            Ok(None) => {
                tracing::info!(path = %path.display(), "No layout file yet, using default");
                DashboardLayout::default()
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "Unreadable layout file, using default");
                DashboardLayout::default()
            }
        };

        Self {
            path,
            current: RwLock::new(layout),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn current(&self) -> DashboardLayout {
        self.current.read().await.clone()
    }

    /// Apply `change` to a copy of the current layout, write the result and
    /// make it current.
    ///
    /// Runs under the write lock, so concurrent updates apply one after the
    /// other. If `change` or the write fails, the in-memory layout is left as
    /// it was.
    pub async fn update<F>(&self, change: F) -> AppResult<DashboardLayout>
    where
        F: FnOnce(&mut DashboardLayout) -> AppResult<()>,
    {
        let mut current = self.current.write().await;
        let mut next = current.clone();
        change(&mut next)?;

        let json = serde_json::to_vec_pretty(&next)
            .map_err(|e| AppError::InternalError(e.to_string()))?;

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        tracing::debug!(path = %self.path.display(), bytes = json.len(), "Layout file written");
        *current = next.clone();
        Ok(next)
    }
}

#[derive(Debug, thiserror::Error)]
enum ReadError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Layout(#[from] mirrorboard_core::LayoutError),
}

async fn read_layout(path: &Path) -> Result<Option<DashboardLayout>, ReadError> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err.into()),
    };
    let layout: DashboardLayout = serde_json::from_slice(&bytes)?;
    layout.validate()?;
    Ok(Some(layout))
}
