// ─── Agent Updater ───
// Keeps an auxiliary Java agent (authlib-injector style) current against its
// remote metadata endpoint: fetch metadata, compare the local file's digest
// to the declared checksum, re-download on mismatch.

use std::path::{Path, PathBuf};

use reqwest::Client;
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::{CoreError, CoreResult};
use crate::integrity::hash::{digest_file, HashAlgorithm};

/// Metadata JSON published at the agent's `latest.json` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct AgentMetadata {
    #[serde(default)]
    pub version: Option<String>,
    pub download_url: String,
    pub checksums: AgentChecksums,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AgentChecksums {
    pub sha256: String,
}

/// Self-updating handle to one remote-managed agent JAR.
pub struct AgentUpdater {
    client: Client,
    meta_url: String,
    agent_dir: PathBuf,
    agent_path: PathBuf,
}

impl AgentUpdater {
    pub fn new(
        client: Client,
        meta_url: impl Into<String>,
        agent_dir: PathBuf,
        file_name: &str,
    ) -> Self {
        let agent_path = agent_dir.join(file_name);
        Self {
            client,
            meta_url: meta_url.into(),
            agent_dir,
            agent_path,
        }
    }

    pub fn agent_path(&self) -> &Path {
        &self.agent_path
    }

    /// Ensure the agent exists and matches the remote checksum.
    ///
    /// A failing staleness check (unreachable endpoint, malformed metadata)
    /// is absorbed: the local copy is assumed current rather than forcing a
    /// redundant download through a transient outage. A failing download is
    /// fatal, since a required agent cannot be silently absent.
    pub async fn ensure_up_to_date(&self) -> CoreResult<PathBuf> {
        tokio::fs::create_dir_all(&self.agent_dir)
            .await
            .map_err(|e| CoreError::Io {
                path: self.agent_dir.clone(),
                source: e,
            })?;

        let metadata = match self.fetch_metadata().await {
            Ok(metadata) => metadata,
            Err(err) => {
                warn!("Agent update check failed, assuming up to date: {}", err);
                return Ok(self.agent_path.clone());
            }
        };

        if self.is_stale(&metadata).await {
            self.download(&metadata).await?;
        }

        Ok(self.agent_path.clone())
    }

    async fn fetch_metadata(&self) -> CoreResult<AgentMetadata> {
        let response = self.client.get(&self.meta_url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CoreError::DownloadFailed {
                url: self.meta_url.clone(),
                status: status.as_u16(),
            });
        }
        Ok(response.json::<AgentMetadata>().await?)
    }

    async fn is_stale(&self, metadata: &AgentMetadata) -> bool {
        match tokio::fs::try_exists(&self.agent_path).await {
            Ok(true) => {}
            _ => return true,
        }

        // An undigestable local file is half-written; replace it.
        let local = match digest_file(&self.agent_path, HashAlgorithm::Sha256).await {
            Ok(digest) => digest,
            Err(err) => {
                warn!("Failed to hash local agent {:?}: {}", self.agent_path, err);
                return true;
            }
        };

        !local.eq_ignore_ascii_case(&metadata.checksums.sha256)
    }

    async fn download(&self, metadata: &AgentMetadata) -> CoreResult<()> {
        info!("Downloading agent from {}", metadata.download_url);

        let response = self.client.get(&metadata.download_url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CoreError::DownloadFailed {
                url: metadata.download_url.clone(),
                status: status.as_u16(),
            });
        }
        let bytes = response.bytes().await?;

        // Write a sibling and rename over the target: the agent is replaced
        // whole or not at all.
        let part_path = self.agent_path.with_extension("part");
        tokio::fs::write(&part_path, &bytes)
            .await
            .map_err(|e| CoreError::Io {
                path: part_path.clone(),
                source: e,
            })?;
        tokio::fs::rename(&part_path, &self.agent_path)
            .await
            .map_err(|e| CoreError::Io {
                path: self.agent_path.clone(),
                source: e,
            })?;

        info!("Agent updated ({} bytes)", bytes.len());
        Ok(())
    }

    /// JVM arguments splicing the agent into a launch command
    /// (authlib-injector convention).
    pub fn javaagent_args(&self, auth_server_url: &str) -> Vec<String> {
        vec![
            format!(
                "-javaagent:{}={}",
                self.agent_path.display(),
                auth_server_url
            ),
            "-Dauthlibinjector.side=client".to_string(),
        ]
    }
}
