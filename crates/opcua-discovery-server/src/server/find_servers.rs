// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! FindServers service.

use super::connection::ConnectionContext;
use super::protocol::{FindServersRequest, FindServersResponse, ResponseHeader};
use super::registry::ServerRegistry;
use super::types::{ApplicationDescription, StatusCode};
use tracing::debug;

/// Source of the discovery URLs advertised for the server's own entry.
///
/// URLs may depend on the interface a client connected through, so they are
/// asked for on every query.
pub trait DiscoveryUrlProvider: Send + Sync {
    fn discovery_urls_for(&self, ctx: &ConnectionContext) -> Vec<String>;
}

/// Builds `opc.tcp://host:port/path` URLs for the listening endpoint.
#[derive(Debug, Clone)]
pub struct EndpointUrlProvider {
    /// Hostname to advertise; the connection's local address when unset.
    pub advertised_hostname: Option<String>,
    /// Port paired with `advertised_hostname`. Without a hostname the port
    /// the connection arrived on is used.
    pub port: u16,
    pub path: String,
    /// Appended after the endpoint URL.
    pub extra_urls: Vec<String>,
}

impl DiscoveryUrlProvider for EndpointUrlProvider {
    fn discovery_urls_for(&self, ctx: &ConnectionContext) -> Vec<String> {
        let authority = match &self.advertised_hostname {
            Some(host) => format!("{}:{}", host, self.port),
            None => ctx.local_addr.to_string(),
        };

        let mut urls = Vec::with_capacity(1 + self.extra_urls.len());
        urls.push(format!("opc.tcp://{}{}", authority, self.path));
        urls.extend(self.extra_urls.iter().cloned());
        urls
    }
}

/// Own description with fresh discovery URLs, then every registered server.
pub fn find_servers(
    server_info: &ApplicationDescription,
    registry: &ServerRegistry,
    discovery_urls: Vec<String>,
) -> Vec<ApplicationDescription> {
    let mut own = server_info.clone();
    own.discovery_urls = discovery_urls;

    let mut servers = Vec::with_capacity(1 + registry.count());
    servers.push(own);
    servers.extend(registry.all().map(|entry| entry.server_info.clone()));
    servers
}

/// Handle a FindServers request.
pub fn handle_find_servers(
    server_info: &ApplicationDescription,
    registry: &ServerRegistry,
    urls: &dyn DiscoveryUrlProvider,
    ctx: &ConnectionContext,
    request: FindServersRequest,
) -> FindServersResponse {
    debug!(
        "FindServers from {} (endpoint {:?})",
        ctx.peer_addr, request.endpoint_url
    );

    FindServersResponse {
        response_header: ResponseHeader::for_request(&request.request_header, StatusCode::GOOD),
        servers: find_servers(server_info, registry, urls.discovery_urls_for(ctx)),
    }
}
