//! Process-wide subscriber installation

use std::error::Error;
use std::sync::Once;

use tracing_subscriber::{util::SubscriberInitExt, EnvFilter};

/// Output flavour of the installed subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Human-readable lines, engine events at debug
    Development,
    /// One JSON object per line, info and above
    Production,
    /// Nothing is printed; `init_test_capture` records events instead
    Test,
}

impl Profile {
    /// Filter used when `RUST_LOG` is unset. `None` means no output at all.
    pub fn default_directive(self) -> Option<&'static str> {
        match self {
            Profile::Development => Some("refract_core=debug"),
            Profile::Production => Some("refract_core=info"),
            Profile::Test => None,
        }
    }

    fn filter(directive: &'static str) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive))
    }
}

static INSTALL: Once = Once::new();

/// Install the global subscriber for `profile`
///
/// Only the first call in a process has any effect. If some other subscriber
/// already owns the global slot, the call leaves it in place.
///
/// ```
/// use refract_core::logging_facility::{init, Profile};
///
/// init(Profile::Development);
/// ```
pub fn init(profile: Profile) {
    INSTALL.call_once(|| {
        let outcome: Result<(), Box<dyn Error + Send + Sync>> =
            match (profile, profile.default_directive()) {
                (Profile::Production, Some(directive)) => tracing_subscriber::fmt()
                    .json()
                    .with_env_filter(Profile::filter(directive))
                    .try_init(),
                (_, Some(directive)) => tracing_subscriber::fmt()
                    .with_env_filter(Profile::filter(directive))
                    .try_init(),
                (_, None) => tracing_subscriber::registry().try_init().map_err(Into::into),
            };
        if let Err(e) = outcome {
            tracing::debug!(?profile, error = %e, "subscriber left in place");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_init_is_harmless() {
        for profile in [Profile::Test, Profile::Development, Profile::Production] {
            init(profile);
        }
    }

    #[test]
    fn test_only_test_profile_is_silent() {
        assert_eq!(Profile::Test.default_directive(), None);
        assert!(Profile::Development
            .default_directive()
            .is_some_and(|d| d.ends_with("debug")));
        assert!(Profile::Production
            .default_directive()
            .is_some_and(|d| d.ends_with("info")));
    }
}
