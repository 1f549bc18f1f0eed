//! Layers: directories the lifecycle may cache or export into the image
//!
//! Each layer `<layers>/<name>/` is described by `<layers>/<name>.toml`:
//!
//! ```toml
//! [types]
//! launch = true
//! build = false
//! cache = false
//!
//! [metadata]
//! ```

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::environment::Environment;
use crate::error::{HandlerError, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerTypes {
    #[serde(default)]
    pub launch: bool,
    #[serde(default)]
    pub build: bool,
    #[serde(default)]
    pub cache: bool,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct LayerToml {
    #[serde(default)]
    types: LayerTypes,
    #[serde(default)]
    metadata: toml::Table,
}

/// One layer and the changes made to it during this build
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub name: String,
    pub path: PathBuf,
    pub launch: bool,
    pub build: bool,
    pub cache: bool,
    pub shared_env: Environment,
    pub build_env: Environment,
    pub launch_env: Environment,
    pub metadata: toml::Table,
}

impl Layer {
    /// Empty the layer directory and forget previous flags and environments
    pub fn reset(&mut self) -> Result<()> {
        self.launch = false;
        self.build = false;
        self.cache = false;
        self.shared_env.clear();
        self.build_env.clear();
        self.launch_env.clear();
        self.metadata.clear();

        match fs::remove_dir_all(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(HandlerError::fs(&self.path, e)),
        }
        fs::create_dir_all(&self.path).map_err(|e| HandlerError::fs(&self.path, e))
    }

    pub fn types(&self) -> LayerTypes {
        LayerTypes {
            launch: self.launch,
            build: self.build,
            cache: self.cache,
        }
    }

    /// Write `<layers>/<name>.toml` and the env directories
    pub fn persist(&self, layers_dir: &Path) -> Result<()> {
        let toml_path = layers_dir.join(format!("{}.toml", self.name));
        let content = toml::to_string(&LayerToml {
            types: self.types(),
            metadata: self.metadata.clone(),
        })
        .map_err(|e| HandlerError::Metadata {
            path: toml_path.clone(),
            reason: e.to_string(),
        })?;
        fs::write(&toml_path, content).map_err(|e| HandlerError::fs(&toml_path, e))?;

        self.shared_env.persist(&self.path.join("env"))?;
        self.build_env.persist(&self.path.join("env.build"))?;
        self.launch_env.persist(&self.path.join("env.launch"))?;
        Ok(())
    }
}

/// The lifecycle's layers directory for this buildpack
#[derive(Debug, Clone)]
pub struct Layers {
    pub path: PathBuf,
}

impl Layers {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Open (creating if needed) the layer `name`, restoring flags and
    /// metadata from a previous build
    pub fn get(&self, name: &str) -> Result<Layer> {
        let path = self.path.join(name);
        let toml_path = self.path.join(format!("{}.toml", name));

        let stored = match fs::read_to_string(&toml_path) {
            Ok(content) => toml::from_str::<LayerToml>(&content).map_err(|e| {
                HandlerError::Metadata {
                    path: toml_path.clone(),
                    reason: e.to_string(),
                }
            })?,
            Err(e) if e.kind() == ErrorKind::NotFound => LayerToml::default(),
            Err(e) => return Err(HandlerError::fs(&toml_path, e)),
        };

        fs::create_dir_all(&path).map_err(|e| HandlerError::fs(&path, e))?;

        Ok(Layer {
            name: name.to_string(),
            path,
            launch: stored.types.launch,
            build: stored.types.build,
            cache: stored.types.cache,
            shared_env: Environment::new(),
            build_env: Environment::new(),
            launch_env: Environment::new(),
            metadata: stored.metadata,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_get_creates_layer_directory() {
        let layers = TempDir::new().unwrap();

        let layer = Layers::new(layers.path()).get("php-redis-config").unwrap();

        assert_eq!(layer.name, "php-redis-config");
        assert_eq!(layer.path, layers.path().join("php-redis-config"));
        assert!(layer.path.is_dir());
        assert_eq!(layer.types(), LayerTypes::default());
    }

    #[test]
    fn test_get_restores_previous_flags() {
        let layers = TempDir::new().unwrap();
        fs::write(
            layers.path().join("php-redis-config.toml"),
            "[types]\nlaunch = true\ncache = true\n\n[metadata]\nkey = \"value\"\n",
        )
        .unwrap();

        let layer = Layers::new(layers.path()).get("php-redis-config").unwrap();

        assert!(layer.launch);
        assert!(layer.cache);
        assert!(!layer.build);
        assert_eq!(layer.metadata.get("key").and_then(|v| v.as_str()), Some("value"));
    }

    #[test]
    fn test_get_rejects_malformed_toml() {
        let layers = TempDir::new().unwrap();
        fs::write(layers.path().join("broken.toml"), "[types\n").unwrap();

        let err = Layers::new(layers.path()).get("broken").unwrap_err();
        assert!(matches!(err, HandlerError::Metadata { .. }));
    }

    #[test]
    fn test_get_fails_when_layer_path_is_a_file() {
        let layers = TempDir::new().unwrap();
        fs::write(layers.path().join("php-redis-config"), "").unwrap();

        let err = Layers::new(layers.path()).get("php-redis-config").unwrap_err();
        assert!(matches!(err, HandlerError::FileSystem { .. }));
    }

    #[test]
    fn test_reset_clears_contents_and_state() {
        let layers = TempDir::new().unwrap();
        let mut layer = Layers::new(layers.path()).get("php-redis-config").unwrap();
        fs::create_dir_all(layer.path.join("some-dir")).unwrap();
        fs::write(layer.path.join("php-redis.ini"), "old").unwrap();
        layer.launch = true;
        layer.launch_env.append("PHP_INI_SCAN_DIR", "/x", ":");

        layer.reset().unwrap();

        assert!(layer.path.is_dir());
        assert_eq!(fs::read_dir(&layer.path).unwrap().count(), 0);
        assert!(!layer.launch);
        assert!(layer.launch_env.is_empty());
    }

    #[test]
    fn test_persist_writes_types_and_launch_env() {
        let layers = TempDir::new().unwrap();
        let mut layer = Layers::new(layers.path()).get("php-redis-config").unwrap();
        layer.launch = true;
        layer
            .launch_env
            .append("PHP_INI_SCAN_DIR", layer.path.clone(), ":");

        layer.persist(layers.path()).unwrap();

        let stored: toml::Table = toml::from_str(
            &fs::read_to_string(layers.path().join("php-redis-config.toml")).unwrap(),
        )
        .unwrap();
        let types = stored["types"].as_table().unwrap();
        assert_eq!(types["launch"].as_bool(), Some(true));
        assert_eq!(types["build"].as_bool(), Some(false));
        assert_eq!(types["cache"].as_bool(), Some(false));

        let env_dir = layer.path.join("env.launch");
        assert_eq!(
            fs::read_to_string(env_dir.join("PHP_INI_SCAN_DIR.append")).unwrap(),
            layer.path.to_string_lossy()
        );
        assert!(!layer.path.join("env.build").exists());
    }
}
