//! Build phase
//!
//! Resolve the binding, render `php-redis.ini` into the `php-redis-config`
//! layer and point `PHP_INI_SCAN_DIR` at it for launch.

use tracing::{debug, info};

use crate::bindings::BindingResolver;
use crate::config_writer::ConfigWriter;
use crate::error::Result;
use crate::lifecycle::{BuildContext, BuildResult};
use crate::redis_config::ConfigParser;
use crate::{PHP_REDIS_LAYER, REDIS_BINDING_TYPE};

#[cfg(not(windows))]
pub const PATH_LIST_SEPARATOR: &str = ":";
#[cfg(windows)]
pub const PATH_LIST_SEPARATOR: &str = ";";

/// The build step with its collaborators
pub struct Build<P, R, W> {
    parser: P,
    resolver: R,
    writer: W,
}

impl<P, R, W> Build<P, R, W>
where
    P: ConfigParser,
    R: BindingResolver,
    W: ConfigWriter,
{
    pub fn new(parser: P, resolver: R, writer: W) -> Self {
        Self {
            parser,
            resolver,
            writer,
        }
    }

    pub fn run(&self, context: &BuildContext) -> Result<BuildResult> {
        info!("{} {}", context.buildpack.name, context.buildpack.version);

        debug!("  Getting the layer associated with the redis configuration");
        let mut layer = context.layers.get(PHP_REDIS_LAYER)?;
        debug!("    {}", layer.path.display());
        layer.reset()?;

        debug!("  Resolving the {} service binding", REDIS_BINDING_TYPE);
        let binding = self
            .resolver
            .resolve_one(REDIS_BINDING_TYPE, "", &context.platform_dir)?;

        debug!("  Parsing the {} service binding", REDIS_BINDING_TYPE);
        let config = self.parser.parse(&binding.path)?;

        info!("  Writing the redis configuration");
        let written = self.writer.write(&config, &layer.path, &context.cnb_path)?;
        info!("    Redis configuration written to: {}", written.display());

        layer
            .launch_env
            .append("PHP_INI_SCAN_DIR", &layer.path, PATH_LIST_SEPARATOR);
        info!("  Configuring launch environment");
        for line in layer.launch_env.summary() {
            info!("    {}", line);
        }

        layer.launch = true;

        Ok(BuildResult {
            layers: vec![layer],
        })
    }
}
