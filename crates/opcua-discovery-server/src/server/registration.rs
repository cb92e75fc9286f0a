// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! RegisterServer service.
//!
//! Validation runs in a fixed order and the first failure wins:
//!
//! 1. server type must be Server, ClientAndServer or DiscoveryServer
//!    (`BadInvalidArgument`)
//! 2. at least one server name (`BadServerNameMissing`)
//! 3. at least one discovery URL (`BadDiscoveryUrlMissing`)
//!
//! A rejected request never touches the registry. An accepted request with
//! `is_online` upserts the server; without it the server is removed, and
//! removing an unknown server is not an error.

use super::protocol::{RegisterServerRequest, RegisterServerResponse, ResponseHeader};
use super::registry::ServerRegistry;
use super::types::{RegisteredServer, RegisteredServerEntry, StatusCode};
use tracing::{debug, info, warn};

/// Check a registration against the protocol rules.
pub fn validate_registration(server: &RegisteredServer) -> Result<(), StatusCode> {
    if !server.server_type.is_registrable() {
        return Err(StatusCode::BAD_INVALID_ARGUMENT);
    }
    if server.server_names.is_empty() {
        return Err(StatusCode::BAD_SERVER_NAME_MISSING);
    }
    if server.discovery_urls.is_empty() {
        return Err(StatusCode::BAD_DISCOVERY_URL_MISSING);
    }
    Ok(())
}

/// Apply a validated registration to the registry.
pub fn apply_registration(registry: &mut ServerRegistry, server: RegisteredServer) {
    if server.is_online {
        let uri = server.server_uri.clone();
        let entry = RegisteredServerEntry::from_validated(server);
        if registry.put(entry).is_some() {
            info!("Re-registered server {}", uri);
        } else {
            info!("Registered server {}", uri);
        }
    } else if registry.remove(&server.server_uri).is_some() {
        info!("Unregistered server {}", server.server_uri);
    } else {
        debug!("Unregister for unknown server {}", server.server_uri);
    }
}

/// Handle a RegisterServer request.
pub fn handle_register_server(
    registry: &mut ServerRegistry,
    request: RegisterServerRequest,
) -> RegisterServerResponse {
    let RegisterServerRequest {
        request_header,
        server,
    } = request;

    let service_result = match validate_registration(&server) {
        Ok(()) => {
            apply_registration(registry, server);
            StatusCode::GOOD
        }
        Err(code) => {
            warn!("Rejected registration of {}: {}", server.server_uri, code);
            code
        }
    };

    RegisterServerResponse {
        response_header: ResponseHeader::for_request(&request_header, service_result),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::protocol::RequestHeader;
    use crate::server::types::{ApplicationType, LocalizedText};

    fn make_server(uri: &str) -> RegisteredServer {
        RegisteredServer {
            server_uri: uri.into(),
            product_uri: "productUri".into(),
            server_names: vec![LocalizedText::new("some name")],
            server_type: ApplicationType::Server,
            gateway_server_uri: None,
            discovery_urls: vec!["opc.tcp://host:1234".into()],
            semaphore_file_path: None,
            is_online: true,
        }
    }

    fn register(registry: &mut ServerRegistry, server: RegisteredServer) -> StatusCode {
        let request = RegisterServerRequest {
            request_header: RequestHeader::default(),
            server,
        };
        handle_register_server(registry, request)
            .response_header
            .service_result
    }

    #[test]
    fn test_register_and_unregister() {
        let mut reg = ServerRegistry::new();

        assert_eq!(register(&mut reg, make_server("uri:MyServerURI")), StatusCode::GOOD);
        assert_eq!(reg.count(), 1);
        let entry = reg.get("uri:MyServerURI").unwrap();
        assert_eq!(entry.server_info.application_uri, "uri:MyServerURI");
        assert_eq!(entry.server_info.application_name.text, "some name");

        let mut offline = make_server("uri:MyServerURI");
        offline.is_online = false;
        assert_eq!(register(&mut reg, offline), StatusCode::GOOD);
        assert_eq!(reg.count(), 0);
    }

    #[test]
    fn test_register_accepts_all_server_types() {
        let mut reg = ServerRegistry::new();
        for (i, server_type) in [
            ApplicationType::Server,
            ApplicationType::ClientAndServer,
            ApplicationType::DiscoveryServer,
        ]
        .into_iter()
        .enumerate()
        {
            let mut server = make_server(&format!("uri:{}", i));
            server.server_type = server_type;
            assert_eq!(register(&mut reg, server), StatusCode::GOOD);
        }
        assert_eq!(reg.count(), 3);
    }

    #[test]
    fn test_client_type_rejected() {
        let mut reg = ServerRegistry::new();
        let mut server = make_server("uri:MyServerURI");
        server.server_type = ApplicationType::Client;

        assert_eq!(register(&mut reg, server), StatusCode::BAD_INVALID_ARGUMENT);
        assert_eq!(reg.count(), 0);
    }

    #[test]
    fn test_unrecognized_type_rejected() {
        let mut reg = ServerRegistry::new();
        let mut server = make_server("uri:MyServerURI");
        server.server_type = ApplicationType::Unrecognized(17);

        assert_eq!(register(&mut reg, server), StatusCode::BAD_INVALID_ARGUMENT);
        assert_eq!(reg.count(), 0);
    }

    #[test]
    fn test_missing_server_name() {
        let mut reg = ServerRegistry::new();
        let mut server = make_server("uri:MyServerURI");
        server.server_names.clear();

        assert_eq!(register(&mut reg, server), StatusCode::BAD_SERVER_NAME_MISSING);
        assert_eq!(reg.count(), 0);
    }

    #[test]
    fn test_missing_discovery_url() {
        let mut reg = ServerRegistry::new();
        let mut server = make_server("uri:MyServerURI");
        server.discovery_urls.clear();

        assert_eq!(register(&mut reg, server), StatusCode::BAD_DISCOVERY_URL_MISSING);
        assert_eq!(reg.count(), 0);
    }

    #[test]
    fn test_validation_order() {
        // Client with no names and no URLs: the type check comes first.
        let mut server = make_server("uri:x");
        server.server_type = ApplicationType::Client;
        server.server_names.clear();
        server.discovery_urls.clear();
        assert_eq!(
            validate_registration(&server),
            Err(StatusCode::BAD_INVALID_ARGUMENT)
        );

        // Then names before URLs.
        server.server_type = ApplicationType::Server;
        assert_eq!(
            validate_registration(&server),
            Err(StatusCode::BAD_SERVER_NAME_MISSING)
        );
    }

    #[test]
    fn test_rejected_unregister_keeps_entry() {
        let mut reg = ServerRegistry::new();
        register(&mut reg, make_server("uri:a"));

        let mut offline = make_server("uri:a");
        offline.is_online = false;
        offline.discovery_urls.clear();

        assert_eq!(register(&mut reg, offline), StatusCode::BAD_DISCOVERY_URL_MISSING);
        assert!(reg.contains("uri:a"));
    }

    #[test]
    fn test_unregister_unknown_is_good() {
        let mut reg = ServerRegistry::new();
        register(&mut reg, make_server("uri:a"));

        let mut offline = make_server("uri:other");
        offline.is_online = false;

        assert_eq!(register(&mut reg, offline), StatusCode::GOOD);
        assert_eq!(reg.count(), 1);
    }

    #[test]
    fn test_reregister_replaces() {
        let mut reg = ServerRegistry::new();
        register(&mut reg, make_server("uri:a"));

        let mut updated = make_server("uri:a");
        updated.server_names = vec![LocalizedText::with_locale("renamed", "en")];
        updated.discovery_urls = vec!["opc.tcp://other:4841".into()];
        updated.gateway_server_uri = Some("uri:gateway".into());
        assert_eq!(register(&mut reg, updated), StatusCode::GOOD);

        assert_eq!(reg.count(), 1);
        let info = &reg.get("uri:a").unwrap().server_info;
        assert_eq!(info.application_name, LocalizedText::with_locale("renamed", "en"));
        assert_eq!(info.discovery_urls, vec!["opc.tcp://other:4841".to_string()]);
        assert_eq!(info.gateway_server_uri, "uri:gateway");
    }

    #[test]
    fn test_response_echoes_request_handle() {
        let mut reg = ServerRegistry::new();
        let response = handle_register_server(
            &mut reg,
            RegisterServerRequest {
                request_header: RequestHeader { request_handle: 42 },
                server: make_server("uri:a"),
            },
        );
        assert_eq!(response.response_header.request_handle, 42);
    }
}
