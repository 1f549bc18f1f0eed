//! Detect phase tests

use std::fs;
use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use tempfile::TempDir;

use php_redis_session_handler::lifecycle::{
    BuildPlan, BuildpackInfo, DetectContext, Requirement, RequirementMetadata,
};
use php_redis_session_handler::{detect, Binding, BindingResolver, HandlerError, Result, ServiceBindingResolver};

/// Returns a fixed number of bindings, or an error
struct StubResolver {
    count: usize,
    fail: bool,
}

impl BindingResolver for StubResolver {
    fn resolve(&self, kind: &str, provider: &str, platform_dir: &Path) -> Result<Vec<Binding>> {
        assert_eq!(kind, "php-redis-session");
        assert_eq!(provider, "");
        assert_eq!(platform_dir, Path::new("some-platform-path"));

        if self.fail {
            return Err(HandlerError::BindingResolution {
                reason: "failed to resolve bindings".into(),
            });
        }
        Ok((0..self.count)
            .map(|i| Binding {
                name: format!("redis-{}", i),
                path: PathBuf::from(format!("/bindings/redis-{}", i)),
                kind: kind.into(),
                provider: String::new(),
            })
            .collect())
    }
}

fn context(platform_dir: impl Into<PathBuf>) -> DetectContext {
    DetectContext {
        cnb_path: PathBuf::from("some-cnb-path"),
        platform_dir: platform_dir.into(),
        buildpack: BuildpackInfo::default(),
    }
}

fn php_at_launch() -> BuildPlan {
    BuildPlan {
        provides: vec![],
        requires: vec![Requirement {
            name: "php".into(),
            metadata: RequirementMetadata { launch: true },
        }],
    }
}

#[test]
fn test_requires_php_during_launch_and_provides_nothing() {
    let resolver = StubResolver { count: 1, fail: false };

    let result = detect(&resolver, &context("some-platform-path")).unwrap();

    assert_eq!(result.plan, php_at_launch());
}

#[test]
fn test_several_bindings_still_pass() {
    let resolver = StubResolver { count: 3, fail: false };

    let result = detect(&resolver, &context("some-platform-path")).unwrap();

    assert_eq!(result.plan, php_at_launch());
}

#[test]
fn test_no_bindings_fails_detection() {
    let resolver = StubResolver { count: 0, fail: false };

    let err = detect(&resolver, &context("some-platform-path")).unwrap_err();

    assert!(err.is_detect_failure());
    assert_eq!(
        err.to_string(),
        "no service bindings of type `php-redis-session` provided"
    );
}

#[test]
fn test_resolver_errors_propagate() {
    let resolver = StubResolver { count: 0, fail: true };

    let err = detect(&resolver, &context("some-platform-path")).unwrap_err();

    assert!(!err.is_detect_failure());
    assert_eq!(err.to_string(), "failed to resolve bindings");
}

#[test]
fn test_detects_binding_on_disk() {
    let platform = TempDir::new().unwrap();
    let binding = platform.path().join("bindings").join("redis");
    fs::create_dir_all(&binding).unwrap();
    fs::write(binding.join("type"), "php-redis-session\n").unwrap();

    let result = detect(&ServiceBindingResolver::new(None), &context(platform.path())).unwrap();

    assert_eq!(result.plan, php_at_launch());
}

#[test]
fn test_other_binding_types_do_not_count() {
    let platform = TempDir::new().unwrap();
    let binding = platform.path().join("bindings").join("db");
    fs::create_dir_all(&binding).unwrap();
    fs::write(binding.join("type"), "mysql").unwrap();

    let err = detect(&ServiceBindingResolver::new(None), &context(platform.path())).unwrap_err();

    assert!(err.is_detect_failure());
}
