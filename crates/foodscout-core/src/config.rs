use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

pub const DEFAULT_API_BASE_URL: &str = "https://world.openfoodfacts.org";
pub const DEFAULT_PAGE_SIZE: u32 = 12;
pub const DEFAULT_USER_AGENT: &str = "foodscout/0.1 (food-explorer)";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every setting has a default; only malformed values are rejected.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("FOODSCOUT_ENV", "development"));
    let log_level = or_default("FOODSCOUT_LOG_LEVEL", "info");

    let api_base_url = or_default("FOODSCOUT_API_BASE_URL", DEFAULT_API_BASE_URL)
        .trim_end_matches('/')
        .to_string();
    if !(api_base_url.starts_with("http://") || api_base_url.starts_with("https://")) {
        return Err(invalid(
            "FOODSCOUT_API_BASE_URL",
            format!("'{api_base_url}' is not an http(s) URL"),
        ));
    }

    let page_size = parse_u32("FOODSCOUT_PAGE_SIZE", &DEFAULT_PAGE_SIZE.to_string())?;
    if page_size == 0 {
        return Err(invalid("FOODSCOUT_PAGE_SIZE", "must be at least 1".to_string()));
    }

    let request_timeout_secs = parse_u64("FOODSCOUT_REQUEST_TIMEOUT_SECS", "30")?;
    if request_timeout_secs == 0 {
        return Err(invalid(
            "FOODSCOUT_REQUEST_TIMEOUT_SECS",
            "must be at least 1".to_string(),
        ));
    }

    let user_agent = or_default("FOODSCOUT_USER_AGENT", DEFAULT_USER_AGENT);
    let max_retries = parse_u32("FOODSCOUT_MAX_RETRIES", "2")?;
    let retry_backoff_base_ms = parse_u64("FOODSCOUT_RETRY_BACKOFF_BASE_MS", "500")?;
    let cart_path = PathBuf::from(or_default("FOODSCOUT_CART_PATH", "./foodscout-cart.json"));

    Ok(AppConfig {
        env,
        log_level,
        api_base_url,
        page_size,
        request_timeout_secs,
        user_agent,
        max_retries,
        retry_backoff_base_ms,
        cart_path,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::env::VarError;

    use super::*;

    fn lookup_from_map<'a>(
        map: &'a HashMap<&'a str, &'a str>,
    ) -> impl Fn(&str) -> Result<String, VarError> + 'a {
        move |key| {
            map.get(key)
                .map(|v| (*v).to_string())
                .ok_or(VarError::NotPresent)
        }
    }

    fn config_with(pairs: &[(&'static str, &'static str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<&str, &str> = pairs.iter().copied().collect();
        build_app_config(lookup_from_map(&map))
    }

    fn assert_invalid(result: Result<AppConfig, ConfigError>, expected: &str) {
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == expected),
            "expected InvalidEnvVar({expected}), got: {result:?}"
        );
    }

    #[test]
    fn parse_environment_known_values() {
        assert_eq!(parse_environment("development"), Environment::Development);
        assert_eq!(parse_environment("test"), Environment::Test);
        assert_eq!(parse_environment("production"), Environment::Production);
    }

    #[test]
    fn parse_environment_unknown_defaults_to_development() {
        assert_eq!(parse_environment("unknown"), Environment::Development);
    }

    #[test]
    fn build_app_config_defaults() {
        let cfg = config_with(&[]).unwrap();
        assert_eq!(cfg.env, Environment::Development);
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.api_base_url, "https://world.openfoodfacts.org");
        assert_eq!(cfg.page_size, 12);
        assert_eq!(cfg.request_timeout_secs, 30);
        assert_eq!(cfg.user_agent, "foodscout/0.1 (food-explorer)");
        assert_eq!(cfg.max_retries, 2);
        assert_eq!(cfg.retry_backoff_base_ms, 500);
        assert_eq!(cfg.cart_path.to_str(), Some("./foodscout-cart.json"));
    }

    #[test]
    fn api_base_url_trailing_slash_is_trimmed() {
        let cfg = config_with(&[("FOODSCOUT_API_BASE_URL", "http://localhost:8080/")]).unwrap();
        assert_eq!(cfg.api_base_url, "http://localhost:8080");
    }

    #[test]
    fn api_base_url_must_be_http() {
        assert_invalid(
            config_with(&[("FOODSCOUT_API_BASE_URL", "ftp://example.org")]),
            "FOODSCOUT_API_BASE_URL",
        );
    }

    #[test]
    fn page_size_override() {
        let cfg = config_with(&[("FOODSCOUT_PAGE_SIZE", "24")]).unwrap();
        assert_eq!(cfg.page_size, 24);
    }

    #[test]
    fn page_size_zero_is_rejected() {
        assert_invalid(config_with(&[("FOODSCOUT_PAGE_SIZE", "0")]), "FOODSCOUT_PAGE_SIZE");
    }

    #[test]
    fn page_size_invalid() {
        assert_invalid(
            config_with(&[("FOODSCOUT_PAGE_SIZE", "twelve")]),
            "FOODSCOUT_PAGE_SIZE",
        );
    }

    #[test]
    fn request_timeout_zero_is_rejected() {
        assert_invalid(
            config_with(&[("FOODSCOUT_REQUEST_TIMEOUT_SECS", "0")]),
            "FOODSCOUT_REQUEST_TIMEOUT_SECS",
        );
    }

    #[test]
    fn max_retries_invalid() {
        assert_invalid(
            config_with(&[("FOODSCOUT_MAX_RETRIES", "-1")]),
            "FOODSCOUT_MAX_RETRIES",
        );
    }

    #[test]
    fn retry_backoff_override() {
        let cfg = config_with(&[("FOODSCOUT_RETRY_BACKOFF_BASE_MS", "0")]).unwrap();
        assert_eq!(cfg.retry_backoff_base_ms, 0);
    }

    #[test]
    fn cart_path_override() {
        let cfg = config_with(&[("FOODSCOUT_CART_PATH", "/tmp/cart.json")]).unwrap();
        assert_eq!(cfg.cart_path.to_str(), Some("/tmp/cart.json"));
    }

    #[test]
    fn user_agent_override() {
        let cfg = config_with(&[("FOODSCOUT_USER_AGENT", "custom-agent/2.0")]).unwrap();
        assert_eq!(cfg.user_agent, "custom-agent/2.0");
    }
}
