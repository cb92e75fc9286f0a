// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Application descriptions, registered servers and status codes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// OPC UA status code (numeric, as carried in response headers).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusCode(pub u32);

impl StatusCode {
    pub const GOOD: Self = Self(0x0000_0000);
    pub const BAD_INVALID_ARGUMENT: Self = Self(0x80AB_0000);
    pub const BAD_SERVER_NAME_MISSING: Self = Self(0x8050_0000);
    pub const BAD_DISCOVERY_URL_MISSING: Self = Self(0x8051_0000);

    /// Severity bits are `00` for Good.
    pub fn is_good(self) -> bool {
        self.0 & 0xC000_0000 == 0
    }

    /// Symbolic name, if the code is one this service produces.
    pub fn name(self) -> Option<&'static str> {
        match self {
            Self::GOOD => Some("Good"),
            Self::BAD_INVALID_ARGUMENT => Some("BadInvalidArgument"),
            Self::BAD_SERVER_NAME_MISSING => Some("BadServerNameMissing"),
            Self::BAD_DISCOVERY_URL_MISSING => Some("BadDiscoveryUrlMissing"),
            _ => None,
        }
    }
}

impl Default for StatusCode {
    fn default() -> Self {
        Self::GOOD
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{} (0x{:08X})", name, self.0),
            None => write!(f, "0x{:08X}", self.0),
        }
    }
}

/// Application type as defined for `ApplicationDescription`.
///
/// Encoded on the wire as its numeric value. Values outside the known range
/// are kept as [`ApplicationType::Unrecognized`] so that registration can
/// reject them with a status code instead of failing to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub enum ApplicationType {
    Server,
    Client,
    ClientAndServer,
    DiscoveryServer,
    Unrecognized(u32),
}

impl ApplicationType {
    /// Whether an application of this type may register with a discovery server.
    pub fn is_registrable(self) -> bool {
        matches!(
            self,
            Self::Server | Self::ClientAndServer | Self::DiscoveryServer
        )
    }
}

impl From<u32> for ApplicationType {
    fn from(value: u32) -> Self {
        match value {
            0 => Self::Server,
            1 => Self::Client,
            2 => Self::ClientAndServer,
            3 => Self::DiscoveryServer,
            other => Self::Unrecognized(other),
        }
    }
}

impl From<ApplicationType> for u32 {
    fn from(value: ApplicationType) -> Self {
        match value {
            ApplicationType::Server => 0,
            ApplicationType::Client => 1,
            ApplicationType::ClientAndServer => 2,
            ApplicationType::DiscoveryServer => 3,
            ApplicationType::Unrecognized(other) => other,
        }
    }
}

/// Human readable text with an optional locale identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedText {
    pub text: String,
    #[serde(default)]
    pub locale: Option<String>,
}

impl LocalizedText {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            locale: None,
        }
    }

    pub fn with_locale(text: impl Into<String>, locale: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            locale: Some(locale.into()),
        }
    }
}

/// Identity and connection record of one application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationDescription {
    pub application_uri: String,
    pub product_uri: String,
    pub application_name: LocalizedText,
    pub application_type: ApplicationType,
    #[serde(default)]
    pub gateway_server_uri: String,
    #[serde(default)]
    pub discovery_profile_uri: String,
    /// Order is significant.
    #[serde(default)]
    pub discovery_urls: Vec<String>,
}

/// Server description carried by a RegisterServer request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredServer {
    /// Globally unique identifier of the server instance; the registry key.
    pub server_uri: String,
    #[serde(default)]
    pub product_uri: String,
    #[serde(default)]
    pub server_names: Vec<LocalizedText>,
    pub server_type: ApplicationType,
    #[serde(default)]
    pub gateway_server_uri: Option<String>,
    #[serde(default)]
    pub discovery_urls: Vec<String>,
    /// Not interpreted by the discovery server.
    #[serde(default)]
    pub semaphore_file_path: Option<String>,
    pub is_online: bool,
}

/// One row of the server registry.
///
/// Only built from a [`RegisteredServer`] that passed validation and was
/// online, so `server_names` and `discovery_urls` are never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredServerEntry {
    pub server_uri: String,
    pub server_type: ApplicationType,
    pub server_names: Vec<LocalizedText>,
    pub discovery_urls: Vec<String>,
    pub product_uri: String,
    pub gateway_server_uri: Option<String>,
    pub is_online: bool,
    /// Projection returned by FindServers.
    pub server_info: ApplicationDescription,
}

impl RegisteredServerEntry {
    /// Build a registry row and its FindServers projection.
    pub(crate) fn from_validated(server: RegisteredServer) -> Self {
        let server_info = ApplicationDescription {
            application_uri: server.server_uri.clone(),
            product_uri: server.product_uri.clone(),
            application_name: server.server_names.first().cloned().unwrap_or_default(),
            application_type: server.server_type,
            gateway_server_uri: server.gateway_server_uri.clone().unwrap_or_default(),
            discovery_profile_uri: String::new(),
            discovery_urls: server.discovery_urls.clone(),
        };

        Self {
            server_uri: server.server_uri,
            server_type: server.server_type,
            server_names: server.server_names,
            discovery_urls: server.discovery_urls,
            product_uri: server.product_uri,
            gateway_server_uri: server.gateway_server_uri,
            is_online: true,
            server_info,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_application_type_numeric_mapping() {
        assert_eq!(ApplicationType::from(0), ApplicationType::Server);
        assert_eq!(ApplicationType::from(3), ApplicationType::DiscoveryServer);
        assert_eq!(ApplicationType::from(42), ApplicationType::Unrecognized(42));
        assert_eq!(u32::from(ApplicationType::ClientAndServer), 2);
    }

    #[test]
    fn test_application_type_registrable() {
        assert!(ApplicationType::Server.is_registrable());
        assert!(ApplicationType::ClientAndServer.is_registrable());
        assert!(ApplicationType::DiscoveryServer.is_registrable());
        assert!(!ApplicationType::Client.is_registrable());
        assert!(!ApplicationType::Unrecognized(7).is_registrable());
    }

    #[test]
    fn test_unrecognized_type_decodes() {
        let json = r#"{"server_uri":"uri:x","server_type":9,"is_online":true}"#;
        let server: RegisteredServer = serde_json::from_str(json).unwrap();
        assert_eq!(server.server_type, ApplicationType::Unrecognized(9));
        assert!(server.server_names.is_empty());
        assert!(server.discovery_urls.is_empty());
    }

    #[test]
    fn test_status_code_display() {
        assert!(StatusCode::GOOD.is_good());
        assert!(!StatusCode::BAD_DISCOVERY_URL_MISSING.is_good());
        assert_eq!(
            StatusCode::BAD_INVALID_ARGUMENT.to_string(),
            "BadInvalidArgument (0x80AB0000)"
        );
        assert_eq!(StatusCode(0x8001_0000).to_string(), "0x80010000");
    }

    #[test]
    fn test_entry_projection() {
        let entry = RegisteredServerEntry::from_validated(RegisteredServer {
            server_uri: "uri:MyServerURI".into(),
            product_uri: "productUri".into(),
            server_names: vec![LocalizedText::new("first"), LocalizedText::new("second")],
            server_type: ApplicationType::ClientAndServer,
            gateway_server_uri: None,
            discovery_urls: vec!["opc.tcp://host:1234".into()],
            semaphore_file_path: Some("/tmp/sem".into()),
            is_online: true,
        });

        let info = &entry.server_info;
        assert_eq!(info.application_uri, "uri:MyServerURI");
        assert_eq!(info.application_name.text, "first");
        assert_eq!(info.application_type, ApplicationType::ClientAndServer);
        assert_eq!(info.product_uri, "productUri");
        assert_eq!(info.gateway_server_uri, "");
        assert_eq!(info.discovery_profile_uri, "");
        assert_eq!(info.discovery_urls, vec!["opc.tcp://host:1234".to_string()]);
        assert!(entry.is_online);
    }
}
