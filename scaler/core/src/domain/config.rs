// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Scaler Configuration
//
// Kubernetes-style manifest (apiVersion/kind/metadata/spec) describing:
// - How fleet containers are named and created
// - Which singleton services receive vertical updates alongside the fleet
// - How the load balancer is reloaded
// - How to reach the container runtime

use crate::domain::fleet::FleetNaming;
use crate::domain::plan::RemovalPolicy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub const API_VERSION: &str = "fleetscale/v1";
pub const KIND: &str = "ScalerConfig";

/// Top-level scaler configuration manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScalerConfig {
    /// API version (must be "fleetscale/v1")
    #[serde(rename = "apiVersion")]
    pub api_version: String,

    /// Resource kind (must be "ScalerConfig")
    pub kind: String,

    pub metadata: ManifestMetadata,

    #[serde(default)]
    pub spec: ScalerSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestMetadata {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScalerSpec {
    #[serde(default)]
    pub fleet: FleetConfig,

    /// Non-fleet containers that scale vertically with the fleet
    #[serde(default = "default_singletons")]
    pub singletons: Vec<String>,

    #[serde(default)]
    pub reload: ReloadConfig,

    #[serde(default)]
    pub runtime: RuntimeConfig,

    #[serde(default)]
    pub policy: PolicyConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FleetConfig {
    /// Letter prefix of fleet container names (`f` -> f1, f2, ...)
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// Image each fleet member runs
    #[serde(default = "default_image")]
    pub image: String,

    /// Docker network to attach new members to (None = default bridge)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,

    #[serde(default)]
    pub env: HashMap<String, String>,

    #[serde(default)]
    pub labels: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReloadConfig {
    /// Program and arguments run after every horizontal reconciliation
    #[serde(default = "default_reload_command")]
    pub command: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Path to Docker socket. None auto-detects.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docker_socket_path: Option<String>,

    /// Per-request timeout for Docker API calls, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolicyConfig {
    #[serde(default)]
    pub removal: RemovalPolicy,
}

fn default_prefix() -> String {
    "f".to_string()
}

fn default_image() -> String {
    "counter-service:latest".to_string()
}

fn default_singletons() -> Vec<String> {
    vec!["leader".to_string(), "load_balancer".to_string()]
}

fn default_reload_command() -> Vec<String> {
    vec!["./load_balancer.sh".to_string(), "reload".to_string()]
}

fn default_timeout_secs() -> u64 {
    120
}

impl Default for ScalerSpec {
    fn default() -> Self {
        Self {
            fleet: FleetConfig::default(),
            singletons: default_singletons(),
            reload: ReloadConfig::default(),
            runtime: RuntimeConfig::default(),
            policy: PolicyConfig::default(),
        }
    }
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            image: default_image(),
            network: None,
            env: HashMap::new(),
            labels: HashMap::new(),
        }
    }
}

impl Default for ReloadConfig {
    fn default() -> Self {
        Self {
            command: default_reload_command(),
        }
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            docker_socket_path: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for ScalerConfig {
    fn default() -> Self {
        Self {
            api_version: API_VERSION.to_string(),
            kind: KIND.to_string(),
            metadata: ManifestMetadata {
                name: "fleetscale".to_string(),
                labels: None,
            },
            spec: ScalerSpec::default(),
        }
    }
}

impl ScalerConfig {
    /// Load configuration from YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Parse configuration from YAML string
    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        let config = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    pub fn to_yaml_string(&self) -> anyhow::Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Discover configuration file using precedence order
    /// 1. FLEETSCALE_CONFIG_PATH environment variable
    /// 2. ./fleetscale.yaml (working directory)
    /// 3. ~/.fleetscale/config.yaml (user home)
    /// 4. /etc/fleetscale/config.yaml
    pub fn discover_config() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("FLEETSCALE_CONFIG_PATH") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        let cwd = PathBuf::from("./fleetscale.yaml");
        if cwd.exists() {
            return Some(cwd);
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".fleetscale").join("config.yaml");
            if user_config.exists() {
                return Some(user_config);
            }
        }

        let system_config = PathBuf::from("/etc/fleetscale/config.yaml");
        if system_config.exists() {
            return Some(system_config);
        }

        None
    }

    /// Load configuration with discovery, fallback to default
    pub fn load_or_default(cli_path: Option<PathBuf>) -> anyhow::Result<Self> {
        // Explicit CLI path must exist and parse
        if let Some(path) = cli_path {
            tracing::info!("Loading configuration from explicit path: {:?}", path);
            let mut config = Self::from_yaml_file(&path).map_err(|e| {
                anyhow::anyhow!("Failed to load config at {:?}: {}", path, e)
            })?;
            config.apply_env_overrides();
            return Ok(config);
        }

        let mut config = match Self::discover_config() {
            Some(config_path) => {
                tracing::info!("Loading configuration from discovered path: {:?}", config_path);
                Self::from_yaml_file(config_path)?
            }
            None => {
                tracing::debug!("No configuration file found in standard locations. Using defaults.");
                Self::default()
            }
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides to configuration
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("FLEETSCALE_FLEET_PREFIX") {
            tracing::info!("Environment override: FLEETSCALE_FLEET_PREFIX={}", val);
            self.spec.fleet.prefix = val;
        }

        if let Ok(val) = std::env::var("FLEETSCALE_FLEET_IMAGE") {
            tracing::info!("Environment override: FLEETSCALE_FLEET_IMAGE={}", val);
            self.spec.fleet.image = val;
        }

        if let Ok(val) = std::env::var("FLEETSCALE_REMOVAL_POLICY") {
            match val.parse::<RemovalPolicy>() {
                Ok(policy) => {
                    tracing::info!("Environment override: FLEETSCALE_REMOVAL_POLICY={}", val);
                    self.spec.policy.removal = policy;
                }
                Err(e) => {
                    tracing::warn!("Invalid value for FLEETSCALE_REMOVAL_POLICY: {}. Ignoring.", e);
                }
            }
        }
    }

    /// Fleet naming convention derived from `spec.fleet.prefix`
    pub fn naming(&self) -> anyhow::Result<FleetNaming> {
        Ok(FleetNaming::new(self.spec.fleet.prefix.clone())?)
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.api_version != API_VERSION {
            anyhow::bail!(
                "Invalid apiVersion: '{}'. Must be '{}'",
                self.api_version,
                API_VERSION
            );
        }

        if self.kind != KIND {
            anyhow::bail!("Invalid kind: '{}'. Must be '{}'", self.kind, KIND);
        }

        if self.metadata.name.is_empty() {
            anyhow::bail!("metadata.name cannot be empty");
        }

        let naming = self.naming()?;

        if self.spec.fleet.image.is_empty() {
            anyhow::bail!("spec.fleet.image cannot be empty");
        }

        if self.spec.reload.command.first().map_or(true, |p| p.is_empty()) {
            anyhow::bail!("spec.reload.command must name a program");
        }

        for name in &self.spec.singletons {
            if name.is_empty() {
                anyhow::bail!("spec.singletons cannot contain empty names");
            }
            if naming.parse(name).is_some() {
                anyhow::bail!(
                    "Singleton '{}' collides with the fleet naming pattern '{}<n>'",
                    name,
                    naming.prefix()
                );
            }
        }

        if self.spec.runtime.timeout_secs == 0 {
            anyhow::bail!("spec.runtime.timeout_secs must be positive");
        }

        Ok(())
    }
}
