use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use csrd_core::AppError;
use tracing_subscriber::EnvFilter;
use url::Url;

/// Where repositories read and write their data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataBackendConfig {
    /// In-memory repositories seeded from JSON files.
    Fixtures { data_dir: PathBuf },
    /// json-server style REST backends.
    Rest {
        api_url: Url,
        org_unit_api_url: Url,
        timeout: Duration,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub api_host: String,
    pub api_port: u16,
    pub frontend_url: String,
    pub cookie_secure: bool,
    pub data_backend: DataBackendConfig,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from a variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let frontend_url =
            lookup("FRONTEND_URL").unwrap_or_else(|| "http://localhost:3000".to_owned());
        let api_host = lookup("API_HOST").unwrap_or_else(|| "127.0.0.1".to_owned());
        let api_port = lookup("API_PORT")
            .map(|value| {
                value
                    .parse::<u16>()
                    .map_err(|error| AppError::Validation(format!("invalid API_PORT: {error}")))
            })
            .transpose()?
            .unwrap_or(3001);
        let cookie_secure = lookup("SESSION_COOKIE_SECURE")
            .unwrap_or_else(|| "false".to_owned())
            .eq_ignore_ascii_case("true");

        let data_backend = match lookup("DATA_BACKEND")
            .unwrap_or_else(|| "fixtures".to_owned())
            .as_str()
        {
            "fixtures" => DataBackendConfig::Fixtures {
                data_dir: lookup("DATA_DIR")
                    .filter(|value| !value.trim().is_empty())
                    .map_or_else(|| PathBuf::from("data"), PathBuf::from),
            },
            "rest" => {
                let api_url = required_non_empty(&lookup, "MOCK_API_URL")
                    .and_then(|value| parse_url("MOCK_API_URL", &value))?;
                let org_unit_api_url = lookup("ORG_UNIT_API_URL")
                    .filter(|value| !value.trim().is_empty())
                    .map(|value| parse_url("ORG_UNIT_API_URL", &value))
                    .transpose()?
                    .unwrap_or_else(|| api_url.clone());
                let timeout_secs = lookup("HTTP_TIMEOUT_SECS")
                    .map(|value| {
                        value.parse::<u64>().map_err(|error| {
                            AppError::Validation(format!("invalid HTTP_TIMEOUT_SECS: {error}"))
                        })
                    })
                    .transpose()?
                    .unwrap_or(10);

                DataBackendConfig::Rest {
                    api_url,
                    org_unit_api_url,
                    timeout: Duration::from_secs(timeout_secs.max(1)),
                }
            }
            other => {
                return Err(AppError::Validation(format!(
                    "DATA_BACKEND must be either 'fixtures' or 'rest', got '{other}'"
                )));
            }
        };

        Ok(Self {
            api_host,
            api_port,
            frontend_url,
            cookie_secure,
            data_backend,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
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

fn required_non_empty(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
) -> Result<String, AppError> {
    let value = lookup(name).ok_or_else(|| AppError::Validation(format!("{name} is required")))?;
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{name} must not be empty")));
    }

    Ok(value)
}

fn parse_url(name: &str, value: &str) -> Result<Url, AppError> {
    Url::parse(value).map_err(|error| AppError::Validation(format!("invalid {name}: {error}")))
}
