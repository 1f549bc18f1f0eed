//! Lifecycle adapter
//!
//! The narrow slice of the Cloud Native Buildpacks contract this buildpack
//! needs: the contexts handed to `detect` and `build`, and the results they
//! return, plus writing those results where the lifecycle expects them.
//!
//! ```text
//! bin/detect <platform> <plan>          → DetectContext → DetectResult → plan.toml
//! bin/build  <layers> <platform> <plan> → BuildContext  → BuildResult  → <layers>/<name>.toml
//! ```

mod environment;
mod layer;
mod plan;

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{HandlerError, Result};

pub use environment::Environment;
pub use layer::{Layer, LayerTypes, Layers};
pub use plan::{BuildPlan, Provision, Requirement, RequirementMetadata};

/// `[buildpack]` table of `buildpack.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BuildpackInfo {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: String,
}

#[derive(Deserialize)]
struct BuildpackToml {
    buildpack: BuildpackInfo,
}

impl BuildpackInfo {
    /// Read `<cnb_path>/buildpack.toml`
    pub fn load(cnb_path: &Path) -> Result<Self> {
        let path = cnb_path.join("buildpack.toml");
        let content = fs::read_to_string(&path).map_err(|e| HandlerError::fs(&path, e))?;
        let parsed: BuildpackToml =
            toml::from_str(&content).map_err(|e| HandlerError::Metadata {
                path,
                reason: e.to_string(),
            })?;
        Ok(parsed.buildpack)
    }
}

#[derive(Debug, Clone)]
pub struct DetectContext {
    pub cnb_path: PathBuf,
    pub platform_dir: PathBuf,
    pub buildpack: BuildpackInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetectResult {
    pub plan: BuildPlan,
}

#[derive(Debug, Clone)]
pub struct BuildContext {
    pub cnb_path: PathBuf,
    pub platform_dir: PathBuf,
    pub layers: Layers,
    pub buildpack: BuildpackInfo,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildResult {
    pub layers: Vec<Layer>,
}

impl BuildResult {
    /// Write every layer's TOML and environment files
    pub fn persist(&self, layers_dir: &Path) -> Result<()> {
        for layer in &self.layers {
            layer.persist(layers_dir)?;
        }
        Ok(())
    }
}
