//! Renders `php-redis.ini` into the layer
//!
//! The template ships with the buildpack at `config/php-redis.ini` and has a
//! single `{{.}}` placeholder that receives the session save path.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;
use url::form_urlencoded;

use crate::error::{HandlerError, Result};
use crate::redis_config::RedisConfig;
use crate::template::Template;

pub const CONFIG_FILE_NAME: &str = "php-redis.ini";

/// Writes the PHP session configuration for a [`RedisConfig`]
pub trait ConfigWriter {
    /// Returns the path of the written file
    fn write(&self, config: &RedisConfig, layer_path: &Path, cnb_path: &Path) -> Result<PathBuf>;
}

impl<T: ConfigWriter + ?Sized> ConfigWriter for &T {
    fn write(&self, config: &RedisConfig, layer_path: &Path, cnb_path: &Path) -> Result<PathBuf> {
        (**self).write(config, layer_path, cnb_path)
    }
}

/// Build the `session.save_path` value: `tcp://host:port[?auth=password]`
pub fn session_save_path(config: &RedisConfig) -> String {
    let mut path = format!("tcp://{}:{}", config.hostname, config.port);
    if !config.password.is_empty() {
        let auth: String = form_urlencoded::byte_serialize(config.password.as_bytes()).collect();
        path.push_str("?auth=");
        path.push_str(&auth);
    }
    path
}

/// Path of the template inside the buildpack root
pub fn template_path(cnb_path: &Path) -> PathBuf {
    cnb_path.join("config").join(CONFIG_FILE_NAME)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RedisConfigWriter;

impl RedisConfigWriter {
    pub fn new() -> Self {
        Self
    }

    fn load_template(cnb_path: &Path) -> Result<Template> {
        let path = template_path(cnb_path);
        let source = fs::read_to_string(&path).map_err(|e| HandlerError::Template {
            reason: format!("{}: {}", path.display(), e),
        })?;
        Template::parse(source).map_err(|reason| HandlerError::Template { reason })
    }
}

impl ConfigWriter for RedisConfigWriter {
    fn write(&self, config: &RedisConfig, layer_path: &Path, cnb_path: &Path) -> Result<PathBuf> {
        let template = Self::load_template(cnb_path)?;

        debug!(
            "    Including session save path: tcp://{}:{}",
            config.hostname, config.port
        );
        if !config.password.is_empty() {
            debug!("    Including a password on the session save path");
        }

        let rendered = template.render(&session_save_path(config));

        let output = layer_path.join(CONFIG_FILE_NAME);
        fs::write(&output, rendered).map_err(|e| HandlerError::fs(&output, e))?;

        Ok(output)
    }
}
