//! Application-wide constants.
//!
//! This module defines constants used throughout the application,
//! including the application name and config locations.

/// The display name of the application.
pub const APP_NAME: &str = "hyperlayer";

/// Directory name under the platform config directory.
pub const APP_DIR_NAME: &str = "hyperlayer";

/// Environment variable overriding the config directory.
pub const CONFIG_DIR_ENV: &str = "HYPERLAYER_CONFIG_DIR";
