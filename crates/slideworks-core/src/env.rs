// Environment detection.

use std::sync::OnceLock;

/// Cached environment mode.
static ENV_MODE: OnceLock<EnvMode> = OnceLock::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvMode {
    Production,
    Development,
    Test,
}

/// Detect the current environment mode from environment variables.
/// Checks `SLIDEWORKS_ENV` then `RUST_ENV`.
pub fn detect_env_mode() -> EnvMode {
    *ENV_MODE.get_or_init(|| {
        let env_val = std::env::var("SLIDEWORKS_ENV")
            .or_else(|_| std::env::var("RUST_ENV"))
            .unwrap_or_default()
            .to_lowercase();

        match env_val.as_str() {
            "production" | "prod" => EnvMode::Production,
            "test" | "testing" => EnvMode::Test,
            _ => EnvMode::Development,
        }
    })
}

pub fn is_production() -> bool {
    detect_env_mode() == EnvMode::Production
}

pub fn is_development() -> bool {
    detect_env_mode() == EnvMode::Development
}

pub fn is_test() -> bool {
    detect_env_mode() == EnvMode::Test
}
