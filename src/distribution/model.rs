// ─── Distribution Model ───
// Read-only snapshot of the distribution manifest: servers and their module
// trees. The core never mutates these; local paths are computed on read.

use std::path::PathBuf;

use serde::Deserialize;

use crate::config::LauncherDirs;
use crate::error::CoreResult;
use crate::integrity::hash::HashAlgorithm;
use crate::maven::MavenComponents;

/// The full distribution manifest.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Distribution {
    #[serde(default)]
    pub version: Option<String>,
    pub servers: Vec<Server>,
}

impl Distribution {
    pub fn get_server(&self, server_id: &str) -> Option<&Server> {
        self.servers.iter().find(|s| s.id == server_id)
    }

    /// The server flagged as main, falling back to the first listed one.
    pub fn main_server(&self) -> Option<&Server> {
        self.servers
            .iter()
            .find(|s| s.main_server)
            .or_else(|| self.servers.first())
    }
}

/// One server entry: an ordered module tree plus launch metadata.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Server {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub minecraft_version: String,
    #[serde(default)]
    pub main_server: bool,
    #[serde(default)]
    pub modules: Vec<Module>,
}

/// Module kinds carried by a distribution. ForgeHosted, Forge and Fabric are
/// the mod-loader kinds; only those carry a VersionManifest submodule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum ModuleType {
    ForgeHosted,
    Forge,
    Fabric,
    Library,
    File,
    VersionManifest,
}

/// One artifact node in a server's dependency tree.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    /// Maven-style identifier, e.g. `net.minecraftforge:forge:1.12.2-14.23.5.2860`.
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub module_type: ModuleType,
    pub artifact: Artifact,
    #[serde(default)]
    pub sub_modules: Vec<Module>,
}

/// Remote source of truth for a module's bytes.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    pub size: u64,
    pub url: String,
    #[serde(default)]
    pub algorithm: HashAlgorithm,
    pub hash: String,
    /// Optional layout override, relative to the module kind's base directory.
    #[serde(default)]
    pub path: Option<String>,
}

impl Module {
    pub fn is_mod_loader(&self) -> bool {
        matches!(
            self.module_type,
            ModuleType::ForgeHosted | ModuleType::Forge | ModuleType::Fabric
        )
    }

    pub fn has_sub_modules(&self) -> bool {
        !self.sub_modules.is_empty()
    }

    /// Maven components of the module identifier.
    pub fn maven_components(&self) -> CoreResult<MavenComponents> {
        MavenComponents::parse(&self.id)
    }

    /// Where this module's artifact lives on disk.
    ///
    /// Version manifests cache under `versions/<ver>/<ver>.json`; `File`
    /// modules resolve against the common directory; everything else lands
    /// in the maven-layout `libraries/` store, honoring an explicit
    /// `artifact.path` override when the manifest carries one.
    pub fn local_path(&self, dirs: &LauncherDirs) -> CoreResult<PathBuf> {
        match self.module_type {
            ModuleType::VersionManifest => {
                let version = self.maven_components()?.version;
                Ok(dirs.version_json_path(&version))
            }
            ModuleType::File => match &self.artifact.path {
                Some(rel) => Ok(dirs.common_dir.join(rel)),
                None => Ok(dirs.common_dir.join(self.maven_components()?.local_path())),
            },
            _ => match &self.artifact.path {
                Some(rel) => Ok(dirs.libraries_dir().join(rel)),
                None => Ok(dirs.libraries_dir().join(self.maven_components()?.local_path())),
            },
        }
    }
}
