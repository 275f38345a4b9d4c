use std::path::PathBuf;

use serde::{Deserialize, Serialize};

const APP_DIR_NAME: &str = "NetheriteLauncher";

/// Directory layout of the launcher's shared data directory.
///
/// Everything the core reads or writes lives under `common_dir`:
/// - `libraries/` — maven-layout artifact store (libraries, loader JARs)
/// - `versions/<id>/<id>.json` — cached version descriptors
/// - one directory per auxiliary agent (e.g. `authlib-injector/`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LauncherDirs {
    pub common_dir: PathBuf,
}

impl LauncherDirs {
    pub fn new(common_dir: PathBuf) -> Self {
        Self { common_dir }
    }

    /// Platform data dir fallback (`~/.local/share`, `%APPDATA%`, ...).
    pub fn default_data_dir() -> Self {
        let base = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::new(base.join(APP_DIR_NAME))
    }

    pub fn libraries_dir(&self) -> PathBuf {
        self.common_dir.join("libraries")
    }

    pub fn versions_dir(&self) -> PathBuf {
        self.common_dir.join("versions")
    }

    /// Cache path for a version descriptor: `versions/<id>/<id>.json`.
    pub fn version_json_path(&self, version_id: &str) -> PathBuf {
        self.versions_dir()
            .join(version_id)
            .join(format!("{}.json", version_id))
    }

    /// Home directory for an auxiliary agent (e.g. "authlib-injector").
    pub fn agent_dir(&self, agent_name: &str) -> PathBuf {
        self.common_dir.join(agent_name)
    }
}
