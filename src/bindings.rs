//! Service binding discovery
//!
//! Reads bindings from `$SERVICE_BINDING_ROOT` (injected by `main`) or
//! `<platform>/bindings`. Two layouts are understood:
//!
//! ```text
//! <root>/<name>/type              service binding spec
//! <root>/<name>/provider          (optional)
//! <root>/<name>/<entry>...
//!
//! <root>/<name>/metadata/kind     legacy CNB bindings
//! <root>/<name>/metadata/provider
//! <root>/<name>/secret/<entry>...
//! ```

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{HandlerError, Result};

/// A bound service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub name: String,
    /// Directory holding the binding's entries
    pub path: PathBuf,
    pub kind: String,
    pub provider: String,
}

/// Finds bindings by type (and optionally provider)
pub trait BindingResolver {
    /// All matching bindings, possibly none
    fn resolve(&self, kind: &str, provider: &str, platform_dir: &Path) -> Result<Vec<Binding>>;

    /// Exactly one matching binding
    fn resolve_one(&self, kind: &str, provider: &str, platform_dir: &Path) -> Result<Binding> {
        let mut bindings = self.resolve(kind, provider, platform_dir)?;
        match bindings.len() {
            1 => Ok(bindings.remove(0)),
            n => Err(HandlerError::BindingResolution {
                reason: format!(
                    "found {} bindings with type '{}' and provider '{}' but expected exactly 1",
                    n, kind, provider
                ),
            }),
        }
    }
}

impl<T: BindingResolver + ?Sized> BindingResolver for &T {
    fn resolve(&self, kind: &str, provider: &str, platform_dir: &Path) -> Result<Vec<Binding>> {
        (**self).resolve(kind, provider, platform_dir)
    }

    fn resolve_one(&self, kind: &str, provider: &str, platform_dir: &Path) -> Result<Binding> {
        (**self).resolve_one(kind, provider, platform_dir)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ServiceBindingResolver {
    binding_root: Option<PathBuf>,
}

impl ServiceBindingResolver {
    /// `binding_root` is the value of `SERVICE_BINDING_ROOT`, if set
    pub fn new(binding_root: Option<PathBuf>) -> Self {
        Self {
            binding_root: binding_root.filter(|p| !p.as_os_str().is_empty()),
        }
    }

    fn root(&self, platform_dir: &Path) -> PathBuf {
        self.binding_root
            .clone()
            .unwrap_or_else(|| platform_dir.join("bindings"))
    }

    /// Every binding under `root`, sorted by name
    fn load_all(root: &Path) -> Result<Vec<Binding>> {
        let entries = match fs::read_dir(root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(HandlerError::BindingResolution {
                    reason: format!("failed to list service bindings at {}: {}", root.display(), e),
                })
            }
        };

        let mut bindings = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| HandlerError::fs(root, e))?;
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            if let Some(binding) = Self::load(&path)? {
                bindings.push(binding);
            }
        }

        bindings.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(bindings)
    }

    /// Directories without a type are not bindings
    fn load(dir: &Path) -> Result<Option<Binding>> {
        let name = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        if let Some(kind) = read_entry(&dir.join("type"))? {
            let provider = read_entry(&dir.join("provider"))?.unwrap_or_default();
            return Ok(Some(Binding {
                name,
                path: dir.to_path_buf(),
                kind,
                provider,
            }));
        }

        let metadata = dir.join("metadata");
        if let Some(kind) = read_entry(&metadata.join("kind"))? {
            let provider = read_entry(&metadata.join("provider"))?.unwrap_or_default();
            return Ok(Some(Binding {
                name,
                path: dir.join("secret"),
                kind,
                provider,
            }));
        }

        Ok(None)
    }
}

impl BindingResolver for ServiceBindingResolver {
    fn resolve(&self, kind: &str, provider: &str, platform_dir: &Path) -> Result<Vec<Binding>> {
        let bindings = Self::load_all(&self.root(platform_dir))?;

        Ok(bindings
            .into_iter()
            .filter(|b| b.kind.eq_ignore_ascii_case(kind))
            .filter(|b| provider.is_empty() || b.provider.eq_ignore_ascii_case(provider))
            .collect())
    }
}

fn read_entry(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(s) => Ok(Some(s.trim().to_string())),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(HandlerError::fs(path, e)),
    }
}
