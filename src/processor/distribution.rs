// ─── Distribution Index Processor ───
// Validates a server's module tree against the distribution manifest and,
// after the downloader has filled the gaps, resolves the mod loader's
// version descriptor into the local versions cache.

use std::collections::HashMap;
use std::io::Cursor;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info};

use super::{IndexProcessor, StageCallback};
use crate::config::LauncherDirs;
use crate::distribution::model::{Distribution, Module, ModuleType, Server};
use crate::error::{CoreError, CoreResult};
use crate::integrity::validator::{validate_modules, ArtifactMismatch};
use crate::version::compare::is_forge_gradle3;

/// Category key under which this processor reports its mismatches.
pub const DISTRIBUTION_CATEGORY: &str = "distribution";

pub struct DistributionIndexProcessor {
    dirs: LauncherDirs,
    distribution: Distribution,
    server_id: String,
}

impl DistributionIndexProcessor {
    pub fn new(
        dirs: LauncherDirs,
        distribution: Distribution,
        server_id: impl Into<String>,
    ) -> Self {
        Self {
            dirs,
            distribution,
            server_id: server_id.into(),
        }
    }

    fn server(&self) -> CoreResult<&Server> {
        self.distribution
            .get_server(&self.server_id)
            .ok_or_else(|| CoreError::InvalidServerId(self.server_id.clone()))
    }

    /// Resolve the server's mod loader version descriptor.
    ///
    /// Fabric always ships the descriptor as a sidecar manifest submodule, as
    /// does ForgeGradle-3-era Forge. Older Forge builds bury it as a
    /// `version.json` entry inside the loader JAR itself, from which it is
    /// extracted and persisted to the versions cache. Assumes the referenced
    /// artifacts are on disk (i.e. runs post-download) and fails loudly when
    /// they are not.
    pub async fn load_mod_loader_version_json(&self) -> CoreResult<Value> {
        let server = self.server()?;
        let loader = server
            .modules
            .iter()
            .find(|m| m.is_mod_loader())
            .ok_or_else(|| CoreError::NoLoaderFound(server.id.clone()))?;

        let sidecar = loader.module_type == ModuleType::Fabric
            || is_forge_gradle3(
                &server.minecraft_version,
                &loader.maven_components()?.version,
            )?;

        if sidecar {
            self.load_version_manifest(loader).await
        } else {
            self.extract_version_json(loader).await
        }
    }

    /// Read the descriptor from the loader's VersionManifest submodule.
    async fn load_version_manifest(&self, loader: &Module) -> CoreResult<Value> {
        let manifest = loader
            .sub_modules
            .iter()
            .find(|m| m.module_type == ModuleType::VersionManifest)
            .ok_or_else(|| CoreError::NoManifestSubmodule(loader.id.clone()))?;

        let path = manifest.local_path(&self.dirs)?;
        let raw = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| CoreError::Io {
                path: path.clone(),
                source: e,
            })?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Pull `version.json` out of the loader JAR and persist it under
    /// `versions/<id>/<id>.json`. Overwrites any previous copy.
    async fn extract_version_json(&self, loader: &Module) -> CoreResult<Value> {
        let jar_path = loader.local_path(&self.dirs)?;
        let bytes = tokio::fs::read(&jar_path)
            .await
            .map_err(|e| CoreError::Io {
                path: jar_path.clone(),
                source: e,
            })?;

        // Archive handle lives only inside this block; parse failures
        // release it the same as success.
        let descriptor: Value = {
            let cursor = Cursor::new(&bytes);
            let mut archive = zip::ZipArchive::new(cursor)?;
            let entry = archive.by_name("version.json")?;
            serde_json::from_reader(entry)?
        };

        let version_id = descriptor
            .get("id")
            .and_then(Value::as_str)
            .ok_or(CoreError::DescriptorMissingId)?
            .to_string();

        let write_path = self.dirs.version_json_path(&version_id);
        if let Some(parent) = write_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| CoreError::Io {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }
        let pretty = serde_json::to_string_pretty(&descriptor)?;
        tokio::fs::write(&write_path, pretty)
            .await
            .map_err(|e| CoreError::Io {
                path: write_path.clone(),
                source: e,
            })?;

        info!("Cached version descriptor {} at {:?}", version_id, write_path);
        Ok(descriptor)
    }
}

#[async_trait]
impl IndexProcessor for DistributionIndexProcessor {
    async fn init(&mut self) -> CoreResult<()> {
        Ok(())
    }

    fn total_stages(&self) -> usize {
        1
    }

    async fn validate(
        &self,
        on_stage_complete: StageCallback<'_>,
    ) -> CoreResult<HashMap<String, Vec<ArtifactMismatch>>> {
        let server = self.server()?;
        debug!(
            "Validating {} root modules for server {}",
            server.modules.len(),
            server.id
        );

        let mismatches = validate_modules(&server.modules, &self.dirs).await?;
        on_stage_complete().await;

        let mut result = HashMap::new();
        result.insert(DISTRIBUTION_CATEGORY.to_string(), mismatches);
        Ok(result)
    }

    async fn post_download(&self) -> CoreResult<()> {
        self.load_mod_loader_version_json().await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Write;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use futures_util::future::BoxFuture;

    fn distro(server: serde_json::Value) -> Distribution {
        serde_json::from_value(serde_json::json!({ "servers": [server] })).unwrap()
    }

    fn forge_server(
        minecraft_version: &str,
        loader_id: &str,
        sub_modules: serde_json::Value,
    ) -> serde_json::Value {
        serde_json::json!({
            "id": "test-server",
            "minecraftVersion": minecraft_version,
            "modules": [
                {
                    "id": loader_id,
                    "type": "Forge",
                    "artifact": {
                        "size": 1,
                        "url": "https://files.example.net/forge.jar",
                        "hash": "00"
                    },
                    "subModules": sub_modules
                }
            ]
        })
    }

    fn manifest_submodule(loader_id: &str) -> serde_json::Value {
        serde_json::json!([{
            "id": format!("{}@json", loader_id),
            "type": "VersionManifest",
            "artifact": {
                "size": 1,
                "url": "https://files.example.net/forge.json",
                "hash": "00"
            }
        }])
    }

    fn stage_counter() -> (Arc<AtomicUsize>, impl Fn() -> BoxFuture<'static, ()> + Send + Sync) {
        let calls = Arc::new(AtomicUsize::new(0));
        let captured = calls.clone();
        let cb = move || -> BoxFuture<'static, ()> {
            let calls = captured.clone();
            Box::pin(async move {
                calls.fetch_add(1, Ordering::SeqCst);
            })
        };
        (calls, cb)
    }

    #[tokio::test]
    async fn validate_rejects_unknown_server_id() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = LauncherDirs::new(tmp.path().to_path_buf());
        let processor = DistributionIndexProcessor::new(
            dirs,
            distro(forge_server("1.12.2", "net.minecraftforge:forge:1.12.2-14.23.5.2860", serde_json::json!([]))),
            "not-a-server",
        );

        let (_, cb) = stage_counter();
        assert!(matches!(
            processor.validate(&cb).await,
            Err(CoreError::InvalidServerId(_))
        ));
    }

    #[tokio::test]
    async fn validate_fires_stage_callback_once_and_reports_misses() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = LauncherDirs::new(tmp.path().to_path_buf());
        let loader_id = "net.minecraftforge:forge:1.12.2-14.23.5.2860";
        let processor = DistributionIndexProcessor::new(
            dirs,
            distro(forge_server("1.12.2", loader_id, manifest_submodule(loader_id))),
            "test-server",
        );

        let (calls, cb) = stage_counter();
        let result = processor.validate(&cb).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(processor.total_stages(), 1);
        // Nothing on disk: loader and its manifest submodule both mismatch.
        let misses = &result[DISTRIBUTION_CATEGORY];
        assert_eq!(misses.len(), 2);
        assert_eq!(misses[0].id, loader_id);
    }

    #[tokio::test]
    async fn post_cutover_forge_requires_manifest_submodule() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = LauncherDirs::new(tmp.path().to_path_buf());
        let processor = DistributionIndexProcessor::new(
            dirs,
            distro(forge_server(
                "1.16.5",
                "net.minecraftforge:forge:1.16.5-36.2.39",
                serde_json::json!([]),
            )),
            "test-server",
        );

        // Must surface the missing submodule, never fall back to the archive.
        assert!(matches!(
            processor.load_mod_loader_version_json().await,
            Err(CoreError::NoManifestSubmodule(_))
        ));
    }

    #[tokio::test]
    async fn post_cutover_forge_reads_sidecar_manifest() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = LauncherDirs::new(tmp.path().to_path_buf());
        let loader_id = "net.minecraftforge:forge:1.16.5-36.2.39";

        let descriptor_path = dirs.version_json_path("1.16.5-36.2.39");
        std::fs::create_dir_all(descriptor_path.parent().unwrap()).unwrap();
        std::fs::write(
            &descriptor_path,
            serde_json::json!({"id": "1.16.5-forge-36.2.39", "mainClass": "cpw.mods.bootstraplauncher.BootstrapLauncher"})
                .to_string(),
        )
        .unwrap();

        let processor = DistributionIndexProcessor::new(
            dirs,
            distro(forge_server("1.16.5", loader_id, manifest_submodule(loader_id))),
            "test-server",
        );

        let descriptor = processor.load_mod_loader_version_json().await.unwrap();
        assert_eq!(descriptor["id"], "1.16.5-forge-36.2.39");
    }

    #[tokio::test]
    async fn fabric_reads_sidecar_even_before_cutover() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = LauncherDirs::new(tmp.path().to_path_buf());
        let loader_id = "net.fabricmc:fabric-loader:0.16.10";

        let descriptor_path = dirs.version_json_path("0.16.10");
        std::fs::create_dir_all(descriptor_path.parent().unwrap()).unwrap();
        std::fs::write(
            &descriptor_path,
            serde_json::json!({"id": "fabric-loader-0.16.10"}).to_string(),
        )
        .unwrap();

        let server = serde_json::json!({
            "id": "test-server",
            "minecraftVersion": "1.7.10",
            "modules": [{
                "id": loader_id,
                "type": "Fabric",
                "artifact": {"size": 1, "url": "https://files.example.net/fabric.jar", "hash": "00"},
                "subModules": [{
                    "id": format!("{}@json", loader_id),
                    "type": "VersionManifest",
                    "artifact": {"size": 1, "url": "https://files.example.net/fabric.json", "hash": "00"}
                }]
            }]
        });

        let processor = DistributionIndexProcessor::new(dirs, distro(server), "test-server");
        let descriptor = processor.load_mod_loader_version_json().await.unwrap();
        assert_eq!(descriptor["id"], "fabric-loader-0.16.10");
    }

    #[tokio::test]
    async fn legacy_forge_extracts_descriptor_from_jar_and_caches_it() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = LauncherDirs::new(tmp.path().to_path_buf());
        let loader_id = "net.minecraftforge:forge:1.7.10-10.13.4.1614";

        let processor = DistributionIndexProcessor::new(
            dirs.clone(),
            distro(forge_server("1.7.10", loader_id, serde_json::json!([]))),
            "test-server",
        );

        // Place the loader JAR with an embedded version.json where the
        // manifest says it lives.
        let jar_path = dirs
            .libraries_dir()
            .join("net/minecraftforge/forge/1.7.10-10.13.4.1614/forge-1.7.10-10.13.4.1614.jar");
        std::fs::create_dir_all(jar_path.parent().unwrap()).unwrap();
        let file = std::fs::File::create(&jar_path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        writer
            .start_file("version.json", zip::write::SimpleFileOptions::default())
            .unwrap();
        writer
            .write_all(
                serde_json::json!({"id": "1.7.10-Forge10.13.4.1614", "mainClass": "net.minecraft.launchwrapper.Launch"})
                    .to_string()
                    .as_bytes(),
            )
            .unwrap();
        writer.finish().unwrap();

        let descriptor = processor.load_mod_loader_version_json().await.unwrap();
        assert_eq!(descriptor["id"], "1.7.10-Forge10.13.4.1614");

        let cached = dirs.version_json_path("1.7.10-Forge10.13.4.1614");
        let raw = std::fs::read_to_string(cached).unwrap();
        let reparsed: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(reparsed, descriptor);
    }

    #[tokio::test]
    async fn server_without_loader_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = LauncherDirs::new(tmp.path().to_path_buf());
        let server = serde_json::json!({
            "id": "test-server",
            "minecraftVersion": "1.12.2",
            "modules": [{
                "id": "com.example:somelib:1.0",
                "type": "Library",
                "artifact": {"size": 1, "url": "https://files.example.net/lib.jar", "hash": "00"}
            }]
        });

        let processor = DistributionIndexProcessor::new(dirs, distro(server), "test-server");
        assert!(matches!(
            processor.load_mod_loader_version_json().await,
            Err(CoreError::NoLoaderFound(_))
        ));
    }
}
