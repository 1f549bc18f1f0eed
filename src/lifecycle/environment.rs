//! Layer environment modifications
//!
//! Stored the way the lifecycle reads them: one file per `NAME.<action>`,
//! e.g. `env.launch/PHP_INI_SCAN_DIR.append`.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::{HandlerError, Result};

/// Environment modifications for one scope of a layer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment(BTreeMap<String, String>);

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `value` to `name`, joined with `delim`
    pub fn append(&mut self, name: &str, value: impl AsRef<Path>, delim: &str) {
        self.0.insert(
            format!("{}.append", name),
            value.as_ref().to_string_lossy().into_owned(),
        );
        self.0.insert(format!("{}.delim", name), delim.to_string());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Human readable lines, e.g. `PATH -> "$PATH:/layer/bin"`
    pub fn summary(&self) -> Vec<String> {
        self.0
            .iter()
            .filter_map(|(key, value)| {
                let name = key.strip_suffix(".append")?;
                let delim = self.get(&format!("{}.delim", name)).unwrap_or_default();
                Some(format!("{} -> \"${}{}{}\"", name, name, delim, value))
            })
            .collect()
    }

    /// Write one file per entry into `dir`; nothing is written when empty
    pub fn persist(&self, dir: &Path) -> Result<()> {
        if self.is_empty() {
            return Ok(());
        }

        fs::create_dir_all(dir).map_err(|e| HandlerError::fs(dir, e))?;
        for (key, value) in &self.0 {
            let path = dir.join(key);
            fs::write(&path, value).map_err(|e| HandlerError::fs(&path, e))?;
        }
        Ok(())
    }
}
