use std::env;
use std::path::PathBuf;
use std::time::Duration;

use fieldops_core::{AppError, AppResult, NonEmptyString};
use tracing_subscriber::EnvFilter;
use url::Url;

#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    pub api_base_url: Url,
    pub storage_dir: PathBuf,
    pub fallback_route: NonEmptyString,
    pub http_timeout: Duration,
}

impl ConsoleConfig {
    pub fn load() -> AppResult<Self> {
        let api_base_url = parse_api_base_url(required_env("CONSOLE_API_BASE_URL")?.as_str())?;
        let storage_dir = env::var("CONSOLE_STORAGE_DIR")
            .ok()
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| ".fieldops".to_owned());
        let fallback_route =
            env::var("CONSOLE_FALLBACK_ROUTE").unwrap_or_else(|_| "/dashboard".to_owned());
        if !fallback_route.starts_with('/') {
            return Err(AppError::Validation(format!(
                "CONSOLE_FALLBACK_ROUTE must start with '/', got '{fallback_route}'"
            )));
        }
        let http_timeout_secs = parse_env_u64("CONSOLE_HTTP_TIMEOUT_SECS", 15)?;

        if http_timeout_secs == 0 {
            return Err(AppError::Validation(
                "CONSOLE_HTTP_TIMEOUT_SECS must be greater than zero".to_owned(),
            ));
        }

        Ok(Self {
            api_base_url,
            storage_dir: PathBuf::from(storage_dir),
            fallback_route: NonEmptyString::new(fallback_route)?,
            http_timeout: Duration::from_secs(http_timeout_secs),
        })
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn parse_api_base_url(value: &str) -> AppResult<Url> {
    let url = Url::parse(value.trim().trim_end_matches('/')).map_err(|error| {
        AppError::Validation(format!("invalid CONSOLE_API_BASE_URL '{value}': {error}"))
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(AppError::Validation(format!(
            "CONSOLE_API_BASE_URL must use http or https, got '{}'",
            url.scheme()
        )));
    }

    Ok(url)
}

fn required_env(name: &str) -> AppResult<String> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}

fn parse_env_u64(name: &str, default: u64) -> AppResult<u64> {
    match env::var(name) {
        Ok(value) => value.parse::<u64>().map_err(|error| {
            AppError::Validation(format!("invalid {name} value '{value}': {error}"))
        }),
        Err(_) => Ok(default),
    }
}
