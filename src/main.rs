//! Buildpack entry point
//!
//! Installed once and linked as `bin/detect` and `bin/build`; the invoked
//! name picks the phase. The subcommands work too, for local runs.

use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use colored::Colorize;

use php_redis_session_handler::lifecycle::{BuildContext, BuildpackInfo, DetectContext, Layers};
use php_redis_session_handler::{
    detect, logging, Build, FixSuggestion, HandlerError, LogLevel, RedisConfigParser,
    RedisConfigWriter, ServiceBindingResolver,
};

/// Exit code telling the lifecycle that detection did not pass
const DETECT_FAIL: u8 = 100;

#[derive(Parser)]
#[command(name = "php-redis-session-handler")]
#[command(about = "Configures PHP to store sessions in a bound Redis")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check for a php-redis-session binding
    Detect {
        /// Platform directory
        platform: PathBuf,
        /// Where to write the build plan
        plan: PathBuf,
    },

    /// Write php-redis.ini into a launch layer
    Build {
        /// Layers directory for this buildpack
        layers: PathBuf,
        /// Platform directory
        platform: PathBuf,
        /// Buildpack plan (unused)
        plan: PathBuf,
    },
}

fn main() -> ExitCode {
    logging::init(LogLevel::from_setting(env::var("BP_LOG_LEVEL").ok().as_deref()));

    let cli = Cli::parse_from(phase_args(env::args_os().collect()));
    let resolver = ServiceBindingResolver::new(env::var_os("SERVICE_BINDING_ROOT").map(PathBuf::from));

    let result = cnb_path().and_then(|cnb_path| match cli.command {
        Commands::Detect { platform, plan } => run_detect(&resolver, cnb_path, platform, &plan),
        Commands::Build {
            layers, platform, ..
        } => run_build(resolver, cnb_path, layers, platform),
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.is_detect_failure() => {
            println!("{}", e);
            ExitCode::from(DETECT_FAIL)
        }
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            if let Some(suggestion) = e.fix_suggestion() {
                eprintln!("  {} {}", "Fix:".yellow(), suggestion);
            }
            ExitCode::FAILURE
        }
    }
}

/// When invoked as `bin/detect` or `bin/build`, insert the phase as the
/// subcommand
fn phase_args(mut args: Vec<OsString>) -> Vec<OsString> {
    let phase = args
        .first()
        .and_then(|arg0| Path::new(arg0).file_name())
        .and_then(|name| name.to_str())
        .filter(|name| matches!(*name, "detect" | "build"))
        .map(OsString::from);

    if let Some(phase) = phase {
        args.insert(1, phase);
    }
    args
}

/// Buildpack root: `CNB_BUILDPACK_DIR`, else the parent of `bin/`
fn cnb_path() -> Result<PathBuf, HandlerError> {
    if let Some(dir) = env::var_os("CNB_BUILDPACK_DIR").filter(|d| !d.is_empty()) {
        return Ok(PathBuf::from(dir));
    }

    let exe = env::current_exe().map_err(|e| HandlerError::fs("current executable", e))?;
    exe.parent()
        .and_then(Path::parent)
        .map(Path::to_path_buf)
        .ok_or_else(|| HandlerError::Metadata {
            path: exe.clone(),
            reason: "cannot locate the buildpack directory".to_string(),
        })
}

fn run_detect(
    resolver: &ServiceBindingResolver,
    cnb_path: PathBuf,
    platform_dir: PathBuf,
    plan_path: &Path,
) -> Result<(), HandlerError> {
    let context = DetectContext {
        buildpack: BuildpackInfo::load(&cnb_path)?,
        cnb_path,
        platform_dir,
    };

    let result = detect(resolver, &context)?;
    result.plan.persist(plan_path)
}

fn run_build(
    resolver: ServiceBindingResolver,
    cnb_path: PathBuf,
    layers_dir: PathBuf,
    platform_dir: PathBuf,
) -> Result<(), HandlerError> {
    let context = BuildContext {
        buildpack: BuildpackInfo::load(&cnb_path)?,
        cnb_path,
        platform_dir,
        layers: Layers::new(&layers_dir),
    };

    let build = Build::new(RedisConfigParser::new(), resolver, RedisConfigWriter::new());
    let result = build.run(&context)?;
    result.persist(&layers_dir)
}
