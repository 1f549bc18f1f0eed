//! PHP Redis session handler buildpack
//!
//! Detects a `php-redis-session` service binding and, at build time, writes
//! a `php-redis.ini` that points PHP's session handler at that Redis.

pub mod bindings;
pub mod build;
pub mod config_writer;
pub mod detect;
pub mod error;
pub mod lifecycle;
pub mod logging;
pub mod redis_config;
pub mod template;

/// Service binding type this buildpack looks for
pub const REDIS_BINDING_TYPE: &str = "php-redis-session";

/// Layer holding `php-redis.ini`
pub const PHP_REDIS_LAYER: &str = "php-redis-config";

pub use bindings::{Binding, BindingResolver, ServiceBindingResolver};
pub use build::Build;
pub use config_writer::{session_save_path, ConfigWriter, RedisConfigWriter};
pub use detect::detect;
pub use error::{FixSuggestion, HandlerError, Result};
pub use logging::LogLevel;
pub use redis_config::{ConfigParser, RedisConfig, RedisConfigParser};
