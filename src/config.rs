use std::time::Duration;

use crate::common::ConfigError;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_STATIC_DIR: &str = "./static";
const DEFAULT_SHOWS_DELAY_MS: u64 = 300;
const DEFAULT_PHOTOS_DELAY_MS: u64 = 600;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Location and public key of the hosted data/auth/storage service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    pub url: String,
    pub anon_key: String,
}

/// Pacing of the home screen's staged sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HomeStaging {
    pub shows_delay: Duration,
    pub photos_delay: Duration,
}

impl Default for HomeStaging {
    fn default() -> Self {
        Self {
            shows_delay: Duration::from_millis(DEFAULT_SHOWS_DELAY_MS),
            photos_delay: Duration::from_millis(DEFAULT_PHOTOS_DELAY_MS),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteConfig {
    pub backend: BackendConfig,
    pub bind_addr: String,
    pub static_dir: String,
    pub home: HomeStaging,
    pub max_upload_bytes: usize,
    pub secure_cookies: bool,
}

impl SiteConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let url = get("SUPABASE_URL").ok_or(ConfigError::Missing("SUPABASE_URL"))?;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                key: "SUPABASE_URL",
                value: url,
            });
        }
        let anon_key =
            get("SUPABASE_ANON_KEY").ok_or(ConfigError::Missing("SUPABASE_ANON_KEY"))?;

        let shows_delay_ms = parse_or(
            "HOME_SHOWS_DELAY_MS",
            get("HOME_SHOWS_DELAY_MS"),
            DEFAULT_SHOWS_DELAY_MS,
        )?;
        let photos_delay_ms = parse_or(
            "HOME_PHOTOS_DELAY_MS",
            get("HOME_PHOTOS_DELAY_MS"),
            DEFAULT_PHOTOS_DELAY_MS,
        )?;

        Ok(Self {
            backend: BackendConfig {
                url: url.trim_end_matches('/').to_string(),
                anon_key,
            },
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            static_dir: get("STATIC_DIR").unwrap_or_else(|| DEFAULT_STATIC_DIR.to_string()),
            home: HomeStaging {
                shows_delay: Duration::from_millis(shows_delay_ms),
                // Photos always load after the shows section.
                photos_delay: Duration::from_millis(photos_delay_ms.max(shows_delay_ms)),
            },
            max_upload_bytes: parse_or(
                "MAX_UPLOAD_BYTES",
                get("MAX_UPLOAD_BYTES"),
                DEFAULT_MAX_UPLOAD_BYTES,
            )?,
            secure_cookies: parse_or("SECURE_COOKIES", get("SECURE_COOKIES"), true)?,
        })
    }

    /// Config pointing at a placeholder backend, for wiring tests and fakes.
    pub fn for_backend(url: &str, anon_key: &str) -> Self {
        Self {
            backend: BackendConfig {
                url: url.trim_end_matches('/').to_string(),
                anon_key: anon_key.to_string(),
            },
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            static_dir: DEFAULT_STATIC_DIR.to_string(),
            home: HomeStaging::default(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            secure_cookies: false,
        }
    }
}

fn parse_or<T: std::str::FromStr>(
    key: &'static str,
    value: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(raw) => raw
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
    }
}
