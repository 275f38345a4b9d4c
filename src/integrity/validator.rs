// ─── Module Tree Validation ───
// Walks a server's module tree and reports every artifact whose on-disk
// bytes are missing or fail their declared checksum.

use std::path::PathBuf;

use futures_util::stream::{self, StreamExt};
use tracing::debug;

use crate::config::LauncherDirs;
use crate::distribution::model::Module;
use crate::error::CoreResult;
use crate::integrity::hash::{validate_local_file, HashAlgorithm};

/// How many artifacts are hashed concurrently.
const VALIDATION_CONCURRENCY: usize = 8;

/// A module whose local artifact failed presence/checksum validation.
/// Consumed by an external downloader.
#[derive(Debug, Clone)]
pub struct ArtifactMismatch {
    pub id: String,
    pub hash: String,
    pub algorithm: HashAlgorithm,
    pub size: u64,
    pub url: String,
    pub path: PathBuf,
}

fn flatten<'a>(modules: &'a [Module], out: &mut Vec<&'a Module>) {
    for module in modules {
        out.push(module);
        if module.has_sub_modules() {
            flatten(&module.sub_modules, out);
        }
    }
}

/// Validate a module tree depth-first, in declaration order.
///
/// Children are validated unconditionally: a stale parent never skips its
/// subtree. Hashing runs through a bounded order-preserving stream, so the
/// returned mismatches follow traversal order even though individual digests
/// interleave. Every call re-hashes every artifact; there is no cache to go
/// stale.
pub async fn validate_modules(
    modules: &[Module],
    dirs: &LauncherDirs,
) -> CoreResult<Vec<ArtifactMismatch>> {
    let mut flat = Vec::new();
    flatten(modules, &mut flat);

    // Resolve each artifact's on-disk path up front so the hashing futures own
    // their inputs and borrow nothing — required for the buffered stream to be
    // `Send`. `local_path` is synchronous, so this changes no async concurrency.
    let mut inputs = Vec::with_capacity(flat.len());
    for module in &flat {
        let path = module.local_path(dirs)?;
        inputs.push((path, module.artifact.algorithm, module.artifact.hash.clone()));
    }

    let checks = stream::iter(inputs)
        .map(|(path, algorithm, hash)| async move {
            let valid = validate_local_file(&path, algorithm, &hash).await;
            (path, valid)
        })
        .buffered(VALIDATION_CONCURRENCY)
        .collect::<Vec<_>>()
        .await;

    let mut mismatches = Vec::new();
    for (module, (path, valid)) in flat.into_iter().zip(checks) {
        if !valid {
            debug!("Artifact invalid or missing: {} at {:?}", module.id, path);
            mismatches.push(ArtifactMismatch {
                id: module.id.clone(),
                hash: module.artifact.hash.clone(),
                algorithm: module.artifact.algorithm,
                size: module.artifact.size,
                url: module.artifact.url.clone(),
                path,
            });
        }
    }

    Ok(mismatches)
}
