//! Detect phase
//!
//! Passes when at least one `php-redis-session` binding is visible. The
//! buildpack provides nothing; it only needs PHP at launch.

use tracing::debug;

use crate::bindings::BindingResolver;
use crate::error::{HandlerError, Result};
use crate::lifecycle::{BuildPlan, DetectContext, DetectResult, Requirement, RequirementMetadata};
use crate::REDIS_BINDING_TYPE;

pub fn detect<R: BindingResolver>(resolver: &R, context: &DetectContext) -> Result<DetectResult> {
    let bindings = resolver.resolve(REDIS_BINDING_TYPE, "", &context.platform_dir)?;

    if bindings.is_empty() {
        return Err(HandlerError::DetectionFailed {
            message: format!(
                "no service bindings of type `{}` provided",
                REDIS_BINDING_TYPE
            ),
        });
    }
    debug!("Found {} `{}` binding(s)", bindings.len(), REDIS_BINDING_TYPE);

    Ok(DetectResult {
        plan: BuildPlan {
            provides: vec![],
            requires: vec![Requirement {
                name: "php".to_string(),
                metadata: RequirementMetadata { launch: true },
            }],
        },
    })
}
