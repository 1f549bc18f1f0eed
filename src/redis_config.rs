//! Redis connection settings read from a service binding
//!
//! A binding directory may carry any of `host`, `hostname`, `port` and
//! `password`. Missing files fall back to defaults; files that exist but
//! cannot be read are errors.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{HandlerError, Result};

pub const DEFAULT_HOSTNAME: &str = "127.0.0.1";
pub const DEFAULT_PORT: i64 = 6379;

/// Connection details for the session store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedisConfig {
    pub hostname: String,
    pub port: i64,
    /// Empty means no authentication
    pub password: String,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            hostname: DEFAULT_HOSTNAME.to_string(),
            port: DEFAULT_PORT,
            password: String::new(),
        }
    }
}

/// Turns a binding directory into a [`RedisConfig`]
pub trait ConfigParser {
    fn parse(&self, dir: &Path) -> Result<RedisConfig>;
}

impl<T: ConfigParser + ?Sized> ConfigParser for &T {
    fn parse(&self, dir: &Path) -> Result<RedisConfig> {
        (**self).parse(dir)
    }
}

#[derive(Debug, Clone, Copy)]
enum Field {
    Hostname,
    Port,
    Password,
}

/// Binding files per field. Within an entry the first existing file wins,
/// so `host` shadows `hostname`.
const BINDING_FILES: &[(&[&str], Field)] = &[
    (&["host", "hostname"], Field::Hostname),
    (&["port"], Field::Port),
    (&["password"], Field::Password),
];

#[derive(Debug, Clone, Copy, Default)]
pub struct RedisConfigParser;

impl RedisConfigParser {
    pub fn new() -> Self {
        Self
    }
}

impl ConfigParser for RedisConfigParser {
    fn parse(&self, dir: &Path) -> Result<RedisConfig> {
        let mut config = RedisConfig::default();

        for (names, field) in BINDING_FILES {
            let Some((path, value)) = read_first(dir, names)? else {
                continue;
            };

            match field {
                Field::Hostname => config.hostname = value,
                Field::Port => {
                    config.port = value
                        .parse()
                        .map_err(|source| HandlerError::InvalidPortFormat { path, source })?;
                }
                Field::Password => config.password = value,
            }
        }

        Ok(config)
    }
}

/// Read the first of `names` that exists in `dir`, trimmed
fn read_first(dir: &Path, names: &[&str]) -> Result<Option<(PathBuf, String)>> {
    for name in names {
        let path = dir.join(name);
        if !exists(&path)? {
            continue;
        }

        let raw = fs::read_to_string(&path).map_err(|e| HandlerError::fs(&path, e))?;
        let value = raw.trim().to_string();
        return Ok(Some((path, value)));
    }

    Ok(None)
}

/// Like `Path::exists`, but only "not found" counts as absent
fn exists(path: &Path) -> Result<bool> {
    match fs::metadata(path) {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(HandlerError::fs(path, e)),
    }
}
