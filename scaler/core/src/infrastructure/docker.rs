// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use crate::domain::config::ScalerConfig;
use crate::domain::resources::NormalizedProfile;
use crate::domain::runtime::{ContainerRuntime, RuntimeError};
use async_trait::async_trait;
use bollard::container::{
    Config, CreateContainerOptions, ListContainersOptions, RemoveContainerOptions,
    StartContainerOptions, UpdateContainerOptions,
};
use bollard::image::CreateImageOptions;
use bollard::Docker;
use futures::StreamExt;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Label stamped on every container this runtime creates.
pub const MEMBER_LABEL: &str = "fleetscale.member";

pub struct DockerRuntime {
    docker: Docker,
    image: String,
    network_mode: Option<String>,
    env: Vec<String>,
    labels: HashMap<String, String>,
}

impl DockerRuntime {
    pub fn new(config: &ScalerConfig) -> Result<Self, RuntimeError> {
        let runtime = &config.spec.runtime;

        // Connect to Docker daemon (custom socket or auto-detect)
        let docker = if let Some(path) = &runtime.docker_socket_path {
            Docker::connect_with_unix(path, runtime.timeout_secs, bollard::API_DEFAULT_VERSION)
                .map_err(|e| RuntimeError::Unavailable(format!(
                    "Failed to connect to Docker at {}: {}\n\n\
                     Ensure Docker is running and the socket path is correct.",
                    path, e
                )))?
        } else {
            Docker::connect_with_local_defaults()
                .map_err(|e| RuntimeError::Unavailable(format!(
                    "Failed to connect to Docker: {}\n\n\
                     Common causes:\n\
                     - Docker daemon not running (check: docker ps)\n\
                     - Permission denied accessing Docker socket\n\
                     - Current user not in 'docker' group",
                    e
                )))?
                .with_timeout(std::time::Duration::from_secs(runtime.timeout_secs))
        };

        let fleet = &config.spec.fleet;
        let env = fleet
            .env
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect();

        Ok(Self {
            docker,
            image: fleet.image.clone(),
            network_mode: fleet.network.clone(),
            env,
            labels: fleet.labels.clone(),
        })
    }

    async fn ensure_image(&self) -> Result<(), RuntimeError> {
        if self.docker.inspect_image(&self.image).await.is_ok() {
            return Ok(());
        }

        info!("Image {} not found locally, pulling", self.image);
        let options = Some(CreateImageOptions {
            from_image: self.image.clone(),
            ..Default::default()
        });

        let mut stream = self.docker.create_image(options, None, None);
        while let Some(result) = stream.next().await {
            if let Err(e) = result {
                return Err(RuntimeError::Unavailable(format!(
                    "failed to pull image {}: {}",
                    self.image, e
                )));
            }
        }
        info!("Successfully pulled image: {}", self.image);
        Ok(())
    }
}

#[async_trait]
impl ContainerRuntime for DockerRuntime {
    async fn list_names(&self) -> Result<Vec<String>, RuntimeError> {
        let options = Some(ListContainersOptions::<String> {
            all: false,
            ..Default::default()
        });

        let containers = self
            .docker
            .list_containers(options)
            .await
            .map_err(|e| RuntimeError::Unavailable(e.to_string()))?;

        // Docker reports names with a leading slash.
        let names = containers
            .into_iter()
            .flat_map(|c| c.names.unwrap_or_default())
            .map(|n| n.trim_start_matches('/').to_string())
            .collect();
        Ok(names)
    }

    async fn prepare(&self) -> Result<(), RuntimeError> {
        self.ensure_image().await
    }

    async fn create(&self, name: &str) -> Result<(), RuntimeError> {
        let create_failed = |reason: String| RuntimeError::CreateFailed {
            name: name.to_string(),
            reason,
        };

        let host_config = bollard::service::HostConfig {
            network_mode: self.network_mode.clone(),
            ..Default::default()
        };

        let mut labels = self.labels.clone();
        labels.insert(MEMBER_LABEL.to_string(), name.to_string());

        let container_config = Config {
            image: Some(self.image.clone()),
            env: Some(self.env.clone()),
            labels: Some(labels),
            hostname: Some(name.to_string()),
            host_config: Some(host_config),
            ..Default::default()
        };

        let options = CreateContainerOptions {
            name: name.to_string(),
            platform: None,
        };

        let res = self
            .docker
            .create_container(Some(options), container_config)
            .await
            .map_err(|e| create_failed(e.to_string()))?;

        if let Err(e) = self
            .docker
            .start_container(&res.id, None::<StartContainerOptions<String>>)
            .await
        {
            // Leave nothing half-created behind under a fleet name.
            let remove = RemoveContainerOptions {
                force: true,
                ..Default::default()
            };
            if let Err(cleanup) = self.docker.remove_container(&res.id, Some(remove)).await {
                warn!("Failed to clean up unstarted container {}: {}", name, cleanup);
            }
            return Err(create_failed(format!("failed to start container: {}", e)));
        }

        info!("Created fleet container: {} ({})", name, res.id);
        Ok(())
    }

    async fn destroy(&self, name: &str) -> Result<(), RuntimeError> {
        let options = RemoveContainerOptions {
            force: true,
            ..Default::default()
        };

        self.docker
            .remove_container(name, Some(options))
            .await
            .map_err(|e| RuntimeError::DestroyFailed {
                name: name.to_string(),
                reason: e.to_string(),
            })?;

        info!("Destroyed fleet container: {}", name);
        Ok(())
    }

    async fn update_limits(
        &self,
        names: &[String],
        profile: &NormalizedProfile,
    ) -> Result<(), RuntimeError> {
        let mut errors = Vec::new();

        for name in names {
            let options = UpdateContainerOptions::<String> {
                memory: Some(profile.memory_bytes),
                memory_swap: Some(profile.memory_swap_bytes),
                cpuset_cpus: Some(profile.cpuset_cpus.clone()),
                ..Default::default()
            };

            match self.docker.update_container(name, options).await {
                Ok(()) => debug!("Updated limits on {}", name),
                Err(e) => {
                    warn!("Failed to update limits on {}: {}", name, e);
                    errors.push(format!("{}: {}", name, e));
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(RuntimeError::UpdateFailed(errors.join("; ")))
        }
    }
}
