//! Process-wide configuration, built once from the environment at startup.
//!
//! One frozen `Settings` value constructed at process start and handed by
//! `Arc` to every component. No global mutable config after init.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Default Bittensor network endpoints.
pub const FINNEY_ENTRYPOINT: &str = "wss://entrypoint-finney.opentensor.ai:443";
pub const ARCHIVE_ENTRYPOINT: &str = "wss://archive.chain.opentensor.ai:443";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {name}: {value:?}: {source}")]
    Invalid {
        name: &'static str,
        value: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("PYLON_IDENTITIES is not valid JSON: {0}")]
    InvalidIdentitiesJson(#[from] serde_json::Error),
    #[error("identity {0} is missing {1}")]
    IdentityMissingField(String, &'static str),
}

fn env_var(name: &'static str) -> Option<String> {
    env::var(name).ok().filter(|s| !s.is_empty())
}

fn env_parse<T>(name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env_var(name) {
        None => Ok(default),
        Some(raw) => raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            value: raw,
            source: Box::new(e),
        }),
    }
}

/// Per-identity wallet/auth configuration: `PYLON_ID_<NAME>_*`.
#[derive(Debug, Clone)]
pub struct Identity {
    pub name: String,
    pub wallet_name: String,
    pub hotkey_name: String,
    pub netuid: u16,
    pub token: String,
}

fn identity_env(name: &str, suffix: &'static str) -> Option<String> {
    env_var_owned(&format!("PYLON_ID_{}_{}", name.to_uppercase(), suffix))
}

fn env_var_owned(name: &str) -> Option<String> {
    env::var(name).ok().filter(|s| !s.is_empty())
}

/// Parse `PYLON_IDENTITIES` (a JSON list of names) plus each identity's
/// `PYLON_ID_<NAME>_{WALLET_NAME,HOTKEY_NAME,NETUID,TOKEN}` variables.
pub fn load_identities() -> Result<Vec<Identity>, ConfigError> {
    let Some(raw) = env_var("PYLON_IDENTITIES") else {
        return Ok(Vec::new());
    };
    let names: Vec<String> = serde_json::from_str(&raw)?;

    names
        .into_iter()
        .map(|name| {
            let wallet_name = identity_env(&name, "WALLET_NAME")
                .ok_or_else(|| ConfigError::IdentityMissingField(name.clone(), "WALLET_NAME"))?;
            let hotkey_name = identity_env(&name, "HOTKEY_NAME")
                .ok_or_else(|| ConfigError::IdentityMissingField(name.clone(), "HOTKEY_NAME"))?;
            let netuid: u16 = identity_env(&name, "NETUID")
                .ok_or_else(|| ConfigError::IdentityMissingField(name.clone(), "NETUID"))?
                .parse()
                .map_err(|e: std::num::ParseIntError| ConfigError::Invalid {
                    name: "NETUID",
                    value: name.clone(),
                    source: Box::new(e),
                })?;
            let token = identity_env(&name, "TOKEN")
                .ok_or_else(|| ConfigError::IdentityMissingField(name.clone(), "TOKEN"))?;

            Ok(Identity {
                name,
                wallet_name,
                hotkey_name,
                netuid,
                token,
            })
        })
        .collect()
}

/// Frozen process configuration, built once at startup via [`Settings::from_env`].
#[derive(Debug, Clone)]
pub struct Settings {
    pub bittensor_netuid: u16,
    pub bittensor_network: String,
    pub bittensor_archive_network: String,
    pub bittensor_archive_blocks_cutoff: u64,
    pub bittensor_wallet_name: String,
    pub bittensor_wallet_hotkey_name: String,
    pub bittensor_wallet_path: PathBuf,

    pub tempo: u16,
    pub commit_cycle_length: u64,
    pub commit_window_start_offset: u64,
    pub commit_window_end_buffer: u64,

    pub weights_retry_attempts: u32,
    pub weights_retry_delay_seconds: u64,

    pub metagraph_cache_ttl: Duration,
    pub metagraph_cache_maxsize: u64,

    pub metrics_token: Option<String>,
    pub identities: Vec<Identity>,

    pub http_bind_addr: String,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            bittensor_netuid: env_parse("BITTENSOR_NETUID", 1u16)?,
            bittensor_network: env_var("BITTENSOR_NETWORK")
                .unwrap_or_else(|| "finney".to_string()),
            bittensor_archive_network: env_var("BITTENSOR_ARCHIVE_NETWORK")
                .unwrap_or_else(|| "archive".to_string()),
            bittensor_archive_blocks_cutoff: env_parse(
                "BITTENSOR_ARCHIVE_BLOCKS_CUTOFF",
                300u64,
            )?,
            bittensor_wallet_name: env_var("BITTENSOR_WALLET_NAME")
                .unwrap_or_else(|| "default".to_string()),
            bittensor_wallet_hotkey_name: env_var("BITTENSOR_WALLET_HOTKEY_NAME")
                .unwrap_or_else(|| "default".to_string()),
            bittensor_wallet_path: env_var("BITTENSOR_WALLET_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| {
                    dirs::home_dir()
                        .unwrap_or_default()
                        .join(".bittensor")
                        .join("wallets")
                }),

            tempo: env_parse("TEMPO", 360u16)?,
            commit_cycle_length: env_parse("COMMIT_CYCLE_LENGTH", 3u64)?,
            commit_window_start_offset: env_parse("COMMIT_WINDOW_START_OFFSET", 180u64)?,
            commit_window_end_buffer: env_parse("COMMIT_WINDOW_END_BUFFER", 10u64)?,

            weights_retry_attempts: env_parse("WEIGHTS_RETRY_ATTEMPTS", 200u32)?,
            weights_retry_delay_seconds: env_parse("WEIGHTS_RETRY_DELAY_SECONDS", 1u64)?,

            metagraph_cache_ttl: Duration::from_secs(env_parse("METAGRAPH_CACHE_TTL", 600u64)?),
            metagraph_cache_maxsize: env_parse("METAGRAPH_CACHE_MAXSIZE", 1000u64)?,

            metrics_token: env_var("PYLON_METRICS_TOKEN"),
            identities: load_identities()?,

            http_bind_addr: env_var("PYLON_HTTP_BIND_ADDR")
                .unwrap_or_else(|| "0.0.0.0:8000".to_string()),
        })
    }

    pub fn network_endpoint(&self) -> String {
        network_endpoint(&self.bittensor_network)
    }

    pub fn archive_network_endpoint(&self) -> String {
        network_endpoint(&self.bittensor_archive_network)
    }
}

fn network_endpoint(network: &str) -> String {
    if network.starts_with("ws://") || network.starts_with("wss://") {
        return network.to_string();
    }
    match network {
        "archive" => ARCHIVE_ENTRYPOINT.to_string(),
        "local" => env::var("BT_SUBTENSOR_CHAIN_ENDPOINT")
            .unwrap_or_else(|_| "ws://127.0.0.1:9944".to_string()),
        _ => FINNEY_ENTRYPOINT.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn defaults_are_sane() {
        let _guard = ENV_LOCK.lock().unwrap();
        for (k, _) in env::vars() {
            if k.starts_with("PYLON_") || k.starts_with("BITTENSOR_") || k == "TEMPO" {
                env::remove_var(k);
            }
        }
        let settings = Settings::from_env().unwrap();
        assert_eq!(settings.tempo, 360);
        assert_eq!(settings.commit_cycle_length, 3);
        assert_eq!(settings.bittensor_archive_blocks_cutoff, 300);
        assert_eq!(settings.weights_retry_attempts, 200);
        assert!(settings.identities.is_empty());
    }

    #[test]
    fn network_endpoint_passes_through_explicit_urls() {
        assert_eq!(network_endpoint("wss://custom:443"), "wss://custom:443");
        assert_eq!(network_endpoint("archive"), ARCHIVE_ENTRYPOINT);
    }
}
