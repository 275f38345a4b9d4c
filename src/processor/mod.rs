// ─── Staged Processing Contract ───
// The uniform lifecycle every bundle-integrity processor implements:
// init → totalStages → validate (with per-stage progress) → postDownload.
// Distinct processor types implement the trait and are dispatched
// polymorphically by the driver.

pub mod distribution;

pub use distribution::{DistributionIndexProcessor, DISTRIBUTION_CATEGORY};

use std::collections::HashMap;

use async_trait::async_trait;
use futures_util::future::BoxFuture;

use crate::error::CoreResult;
use crate::integrity::validator::ArtifactMismatch;

/// Async no-argument progress callback, fired once per completed stage.
pub type StageCallback<'a> = &'a (dyn Fn() -> BoxFuture<'static, ()> + Send + Sync);

#[async_trait]
pub trait IndexProcessor: Send + Sync {
    /// Idempotent setup. May be a no-op.
    async fn init(&mut self) -> CoreResult<()>;

    /// Number of discrete stages `validate` reports. Progress display only.
    fn total_stages(&self) -> usize;

    /// Validate every tracked artifact, invoking `on_stage_complete` exactly
    /// once per declared stage as that stage's work finishes, whether or not
    /// mismatches were found. Returns mismatches by category, in traversal
    /// order.
    async fn validate(
        &self,
        on_stage_complete: StageCallback<'_>,
    ) -> CoreResult<HashMap<String, Vec<ArtifactMismatch>>>;

    /// Runs after an external downloader has fetched all reported mismatches.
    async fn post_download(&self) -> CoreResult<()>;
}
