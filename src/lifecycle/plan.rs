//! Build plan written by `detect`

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{HandlerError, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildPlan {
    #[serde(default)]
    pub provides: Vec<Provision>,
    #[serde(default)]
    pub requires: Vec<Requirement>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provision {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    pub name: String,
    #[serde(default)]
    pub metadata: RequirementMetadata,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementMetadata {
    #[serde(default)]
    pub launch: bool,
}

impl BuildPlan {
    pub fn persist(&self, plan_path: &Path) -> Result<()> {
        let content = toml::to_string(self).map_err(|e| HandlerError::Metadata {
            path: plan_path.to_path_buf(),
            reason: e.to_string(),
        })?;
        fs::write(plan_path, content).map_err(|e| HandlerError::fs(plan_path, e))
    }
}
