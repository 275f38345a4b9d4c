use std::path::PathBuf;
use thiserror::Error;

/// Central error type for the distribution core.
/// Every module returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── IO ──────────────────────────────────────────────
    #[error("IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    // ── Network ─────────────────────────────────────────
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Download failed for {url}: HTTP {status}")]
    DownloadFailed { url: String, status: u16 },

    // ── Distribution shape ──────────────────────────────
    #[error("Invalid server id: {0}")]
    InvalidServerId(String),

    #[error("No mod loader module found for server {0}")]
    NoLoaderFound(String),

    #[error("Mod loader module {0} has no version manifest submodule")]
    NoManifestSubmodule(String),

    #[error("Extracted version descriptor has no 'id' field")]
    DescriptorMissingId,

    // ── Versions ────────────────────────────────────────
    #[error("Unsupported version format '{0}' - a launcher compatibility patch is required")]
    MalformedVersion(String),

    // ── Maven ───────────────────────────────────────────
    #[error("Invalid Maven coordinate: {0}")]
    InvalidMavenCoordinate(String),

    // ── JSON ────────────────────────────────────────────
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ── Archive ─────────────────────────────────────────
    #[error("Zip extraction error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

/// Convenience alias used throughout the crate.
pub type CoreResult<T> = Result<T, CoreError>;

impl From<std::io::Error> for CoreError {
    fn from(source: std::io::Error) -> Self {
        CoreError::Io {
            path: PathBuf::new(),
            source,
        }
    }
}
