//! Subscriber setup for the `coexpr` binaries
//!
//! Logs always go to stderr; stdout is reserved for command output such
//! as `database verify` summaries.

use std::sync::Once;

use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Logging profile configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Human-readable output for interactive use
    Development,
    /// One JSON object per line, for batch jobs whose logs are collected
    Production,
    /// No output; tests install their own capture layer
    Test,
}

impl Profile {
    /// Directive used when `RUST_LOG` is unset
    ///
    /// Every crate of the workspace has a target starting with `coexpr`.
    pub fn default_directive(self) -> &'static str {
        match self {
            Profile::Development => "coexpr=debug",
            Profile::Production => "coexpr=info",
            Profile::Test => "off",
        }
    }

    fn filter(self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.default_directive()))
    }
}

static INIT_ONCE: Once = Once::new();

/// Install the global subscriber for `profile`
///
/// Only the first call has an effect. `RUST_LOG` overrides the profile's
/// default filter.
///
/// ```
/// use coexpr_core::logging_facility::{init, Profile};
///
/// init(Profile::Development);
/// ```
pub fn init(profile: Profile) {
    INIT_ONCE.call_once(|| {
        let builder = tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(profile.filter());
        // another subscriber may already be installed, e.g. by a test harness
        let _ = match profile {
            Profile::Production => builder.json().finish().try_init(),
            Profile::Development => builder.finish().try_init(),
            Profile::Test => tracing_subscriber::registry().try_init(),
        };
    });
}
