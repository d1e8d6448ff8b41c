use std::path::PathBuf;
use std::time::Duration;

use alloy_primitives::Address;

use crate::artifact::{ArtifactKind, ArtifactStore};
use crate::error::{Result, VerifierError};
use crate::layout::CallLayout;
use crate::rpc::RpcEndpointConfig;
use crate::verifier::CallMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// HTTP service.
    Serve,
    /// One verification attempt, report printed to stdout.
    Once(CallMode),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub run_mode: RunMode,
    pub artifacts_dir: PathBuf,
    pub artifact_prefix: String,
    /// Per-artifact file names, from `ARTIFACT_FILE_<KIND>`.
    pub artifact_files: Vec<(ArtifactKind, String)>,
    pub layout: CallLayout,
    pub rpc: RpcEndpointConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let port = parse_number(&var("PORT", "4003"), "PORT")?;

        let run_mode = match var("RUN_MODE", "serve").trim().to_ascii_lowercase().as_str() {
            "serve" => RunMode::Serve,
            other => RunMode::Once(other.parse().map_err(|_| {
                VerifierError::InvalidConfig(format!(
                    "RUN_MODE must be serve, estimate or execute, got {}",
                    other
                ))
            })?),
        };

        let layout: CallLayout = var("VERIFY_ARGS", "mixed").parse()?;

        let verifier = lookup("VERIFIER_ADDRESS")
            .ok_or_else(|| VerifierError::InvalidConfig("VERIFIER_ADDRESS is required".to_string()))
            .and_then(|v| parse_address(&v, "VERIFIER_ADDRESS"))?;

        let sender = lookup("SENDER_ADDRESS")
            .filter(|v| !v.trim().is_empty())
            .map(|v| parse_address(&v, "SENDER_ADDRESS"))
            .transpose()?;

        let gas_limit = lookup("GAS_LIMIT")
            .filter(|v| !v.trim().is_empty())
            .map(|v| parse_number(&v, "GAS_LIMIT"))
            .transpose()?;

        let artifact_files = ArtifactKind::ALL
            .into_iter()
            .filter_map(|kind| {
                lookup(format!("ARTIFACT_FILE_{}", kind.name().to_ascii_uppercase()).as_str())
                    .map(|file| file.trim().to_string())
                    .filter(|file| !file.is_empty())
                    .map(|file| (kind, file))
            })
            .collect();

        let timeout_secs: u64 = parse_number(&var("RPC_TIMEOUT_SECS", "60"), "RPC_TIMEOUT_SECS")?;

        Ok(Self {
            port,
            run_mode,
            artifacts_dir: PathBuf::from(var("ARTIFACTS_DIR", "./output")),
            artifact_prefix: var("ARTIFACT_PREFIX", ""),
            artifact_files,
            layout,
            rpc: RpcEndpointConfig {
                url: var("RPC_URL", "http://127.0.0.1:8545"),
                verifier,
                sender,
                gas_limit,
                timeout: Duration::from_secs(timeout_secs),
                receipt_poll_interval: Duration::from_millis(500),
            },
        })
    }

    pub fn artifact_store(&self) -> ArtifactStore {
        self.artifact_files.iter().fold(
            ArtifactStore::new(self.artifacts_dir.clone(), self.artifact_prefix.clone()),
            |store, (kind, file)| store.with_file(*kind, file.clone()),
        )
    }
}

fn parse_number<T: std::str::FromStr>(value: &str, key: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| VerifierError::InvalidConfig(format!("{} is not a valid number: {}", key, value)))
}

fn parse_address(value: &str, key: &str) -> Result<Address> {
    value
        .trim()
        .parse()
        .map_err(|_| VerifierError::InvalidConfig(format!("{} is not a valid address: {}", key, value)))
}
