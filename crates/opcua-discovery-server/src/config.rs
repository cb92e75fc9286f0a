// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Discovery Server configuration.

use crate::server::find_servers::EndpointUrlProvider;
use crate::server::types::{ApplicationDescription, ApplicationType, LocalizedText};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};
use std::path::Path;
use thiserror::Error;

/// Discovery Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind to (default: 0.0.0.0)
    #[serde(default = "default_bind_address")]
    pub bind_address: IpAddr,

    /// TCP port to listen on (default: 4840, the well-known discovery port)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Path appended to advertised discovery URLs
    #[serde(default = "default_endpoint_path")]
    pub endpoint_path: String,

    /// Hostname used in advertised discovery URLs.
    /// When unset, the local address of each connection is used.
    #[serde(default)]
    pub advertised_hostname: Option<String>,

    /// Additional discovery URLs advertised after the TCP endpoint
    #[serde(default)]
    pub extra_discovery_urls: Vec<String>,

    /// Application URI of the discovery server (default: urn:<hostname>:UADiscoveryServer)
    #[serde(default)]
    pub application_uri: Option<String>,

    /// Application name
    #[serde(default = "default_application_name")]
    pub application_name: String,

    /// Locale of the application name
    #[serde(default)]
    pub application_locale: Option<String>,

    /// Product URI
    #[serde(default = "default_product_uri")]
    pub product_uri: String,

    /// Maximum message size (bytes)
    #[serde(default = "default_max_message_size")]
    pub max_message_size: usize,

    /// Disable Nagle on client connections
    #[serde(default = "default_true")]
    pub tcp_nodelay: bool,
}

fn default_bind_address() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    4840
}

fn default_endpoint_path() -> String {
    "/UADiscovery".to_string()
}

fn default_application_name() -> String {
    "UADiscoveryServer".to_string()
}

fn default_product_uri() -> String {
    "UADiscoveryServer".to_string()
}

fn default_max_message_size() -> usize {
    16 * 1024 * 1024 // 16 MB
}

fn default_true() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
            endpoint_path: default_endpoint_path(),
            advertised_hostname: None,
            extra_discovery_urls: Vec::new(),
            application_uri: None,
            application_name: default_application_name(),
            application_locale: None,
            product_uri: default_product_uri(),
            max_message_size: default_max_message_size(),
            tcp_nodelay: true,
        }
    }
}

impl ServerConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::InvalidValue("port cannot be 0".into()));
        }
        if self.max_message_size == 0 {
            return Err(ConfigError::InvalidValue(
                "max_message_size cannot be 0".into(),
            ));
        }
        if !self.endpoint_path.is_empty() && !self.endpoint_path.starts_with('/') {
            return Err(ConfigError::InvalidValue(
                "endpoint_path must start with '/'".into(),
            ));
        }
        if self.extra_discovery_urls.iter().any(|u| u.trim().is_empty()) {
            return Err(ConfigError::InvalidValue(
                "extra_discovery_urls cannot contain empty URLs".into(),
            ));
        }
        Ok(())
    }

    /// Own application description. Discovery URLs are filled per query.
    pub fn server_info(&self) -> ApplicationDescription {
        let application_uri = self
            .application_uri
            .clone()
            .unwrap_or_else(default_application_uri);

        ApplicationDescription {
            application_uri,
            product_uri: self.product_uri.clone(),
            application_name: LocalizedText {
                text: self.application_name.clone(),
                locale: self.application_locale.clone(),
            },
            application_type: ApplicationType::DiscoveryServer,
            gateway_server_uri: String::new(),
            discovery_profile_uri: String::new(),
            discovery_urls: Vec::new(),
        }
    }

    /// Discovery URL provider for the configured endpoint.
    pub fn url_provider(&self) -> EndpointUrlProvider {
        EndpointUrlProvider {
            advertised_hostname: self.advertised_hostname.clone(),
            port: self.port,
            path: self.endpoint_path.clone(),
            extra_urls: self.extra_discovery_urls.clone(),
        }
    }
}

fn default_application_uri() -> String {
    let host = hostname::get()
        .ok()
        .and_then(|h| h.into_string().ok())
        .unwrap_or_else(|| "localhost".to_string());
    format!("urn:{}:UADiscoveryServer", host)
}

/// Configuration error types.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid value: {0}")]
    InvalidValue(String),
}
