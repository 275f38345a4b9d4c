// ─── Artifact Hashing ───
// Streaming file digests and the presence-plus-checksum validity check that
// drives re-download decisions.

use std::fmt;
use std::path::Path;

use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};
use sha1::Sha1;
use sha2::Sha256;
use tokio::io::AsyncReadExt;
use tracing::warn;

use crate::error::{CoreError, CoreResult};

const HASH_CHUNK_SIZE: usize = 64 * 1024;

/// Digest algorithm declared by the distribution manifest for an artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    Md5,
    Sha1,
    Sha256,
}

impl Default for HashAlgorithm {
    fn default() -> Self {
        HashAlgorithm::Md5
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashAlgorithm::Md5 => write!(f, "md5"),
            HashAlgorithm::Sha1 => write!(f, "sha1"),
            HashAlgorithm::Sha256 => write!(f, "sha256"),
        }
    }
}

async fn hash_file<D: Digest + Send>(path: &Path) -> CoreResult<String> {
    let mut file = tokio::fs::File::open(path)
        .await
        .map_err(|e| CoreError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

    let mut hasher = D::new();
    let mut buf = vec![0u8; HASH_CHUNK_SIZE];
    loop {
        let n = file.read(&mut buf).await.map_err(|e| CoreError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// Stream a file through the named digest. Large artifacts are read in
/// fixed-size chunks, never loaded whole.
pub async fn digest_file(path: &Path, algorithm: HashAlgorithm) -> CoreResult<String> {
    match algorithm {
        HashAlgorithm::Md5 => hash_file::<Md5>(path).await,
        HashAlgorithm::Sha1 => hash_file::<Sha1>(path).await,
        HashAlgorithm::Sha256 => hash_file::<Sha256>(path).await,
    }
}

/// Whether a local artifact is present and matches its expected digest.
///
/// An unreadable file counts as invalid rather than an error: it usually
/// means a partial write, and the remedy either way is a re-download.
pub async fn validate_local_file(path: &Path, algorithm: HashAlgorithm, expected: &str) -> bool {
    match tokio::fs::try_exists(path).await {
        Ok(true) => {}
        _ => return false,
    }

    match digest_file(path, algorithm).await {
        Ok(actual) => actual.eq_ignore_ascii_case(expected),
        Err(err) => {
            warn!("Failed to hash {:?}, treating as invalid: {}", path, err);
            false
        }
    }
}
