//! Tracing subscriber setup

use crate::cli::OutputConfig;
use crate::error::{FsError, Result};
use tracing::Level;

/// Maximum level emitted for the given output options
///
/// Quiet keeps errors only; each `-v` raises the level by one step from
/// the default of warnings.
#[must_use]
pub const fn max_level(output: &OutputConfig) -> Level {
    if output.quiet {
        return Level::ERROR;
    }
    match output.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Install the global fmt subscriber
///
/// # Errors
///
/// Returns [`FsError::Config`] if a global subscriber is already installed.
pub fn init_tracing(output: &OutputConfig) -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(max_level(output))
        .with_target(false)
        .try_init()
        .map_err(|e| FsError::Config(format!("Failed to initialize logging: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, false, Level::WARN)]
    #[case(1, false, Level::INFO)]
    #[case(2, false, Level::DEBUG)]
    #[case(3, false, Level::TRACE)]
    #[case(7, false, Level::TRACE)]
    #[case(0, true, Level::ERROR)]
    fn test_max_level(#[case] verbose: u8, #[case] quiet: bool, #[case] expected: Level) {
        let output = OutputConfig { verbose, quiet };
        assert_eq!(max_level(&output), expected);
    }

    #[test]
    fn test_second_init_is_config_error() {
        let output = OutputConfig::default();
        // Another test may have installed the subscriber first
        let _ = init_tracing(&output);
        assert!(matches!(init_tracing(&output), Err(FsError::Config(_))));
    }
}
