//! Logging initialization
//!
//! One process-wide subscriber, chosen by [`Profile`]. Events go to stderr
//! so that markup printed on stdout stays clean.

use std::sync::Once;
use tracing_subscriber::{util::SubscriberInitExt, EnvFilter};

/// Logging profile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Human-readable lines, `domslim=debug`
    Development,
    /// JSON lines, `domslim=info`
    Production,
    /// Bare registry; tests install [`init_test_capture`](super::init_test_capture) instead
    Test,
}

impl Profile {
    /// Filter used when `RUST_LOG` is unset or invalid
    ///
    /// The `domslim` target prefix covers both the library and the CLI.
    pub fn default_directive(self) -> &'static str {
        match self {
            Profile::Development => "domslim=debug",
            Profile::Production => "domslim=info",
            Profile::Test => "off",
        }
    }

    fn env_filter(self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.default_directive()))
    }
}

impl std::str::FromStr for Profile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dev" | "development" => Ok(Profile::Development),
            "prod" | "production" => Ok(Profile::Production),
            "test" => Ok(Profile::Test),
            other => Err(format!("unknown logging profile: {other}")),
        }
    }
}

static INIT_ONCE: Once = Once::new();

/// Install the subscriber for `profile`
///
/// Only the first call in a process has any effect.
pub fn init(profile: Profile) {
    INIT_ONCE.call_once(|| {
        let builder = tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(profile.env_filter());
        match profile {
            Profile::Development => builder.init(),
            Profile::Production => builder.json().init(),
            Profile::Test => tracing_subscriber::registry().init(),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_from_str() {
        assert_eq!("dev".parse::<Profile>(), Ok(Profile::Development));
        assert_eq!("Production".parse::<Profile>(), Ok(Profile::Production));
        assert!("verbose".parse::<Profile>().is_err());
    }

    #[test]
    fn test_default_directives_follow_profile() {
        assert_eq!(Profile::Development.default_directive(), "domslim=debug");
        assert_eq!(Profile::Production.default_directive(), "domslim=info");
    }
}
