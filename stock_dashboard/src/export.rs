//! Hand-off of a finished [`DashboardView`] to external consumers.
//!
//! The terminal only shows a trailing preview; charting tools (candlestick with
//! MA overlay, volume bars) read the full export instead.

use std::path::PathBuf;

use async_trait::async_trait;
use snafu::{Backtrace, ResultExt, Snafu};
use tracing::info;

use crate::pipeline::DashboardView;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum SinkError {
    /// Converting the view into the destination format failed.
    #[snafu(display("Failed to serialize dashboard: {source}"))]
    Serialize {
        source: serde_json::Error,
        backtrace: Backtrace,
    },

    /// Writing to the destination failed.
    #[snafu(display("Failed to write {}: {source}", path.display()))]
    Io {
        path: PathBuf,
        source: std::io::Error,
        backtrace: Backtrace,
    },
}

#[async_trait]
pub trait DataSink {
    /// What a successful write hands back (a path, a row count, ...).
    type Output;

    /// Writes the whole view to the destination.
    async fn write(&self, view: &DashboardView) -> Result<Self::Output, SinkError>;
}

/// Writes the view as pretty-printed JSON to a single file.
///
/// Undefined indicator values are written as `null`.
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DataSink for JsonFileSink {
    type Output = PathBuf;

    async fn write(&self, view: &DashboardView) -> Result<PathBuf, SinkError> {
        let json = serde_json::to_vec_pretty(view).context(SerializeSnafu)?;
        tokio::fs::write(&self.path, json)
            .await
            .context(IoSnafu { path: &self.path })?;

        info!(path = %self.path.display(), rows = view.enriched.len(), "exported dashboard");
        Ok(self.path.clone())
    }
}
