// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! OPC UA Discovery Server
//!
//! Lets server applications announce and withdraw themselves
//! (RegisterServer) and lets clients list the known applications and their
//! discovery URLs (FindServers).
//!
//! - Registration is validated (server type, names, discovery URLs) before
//!   the registry is touched.
//! - Re-registering a server replaces its entry; unregistering an unknown
//!   server is not an error.
//! - FindServers returns the discovery server's own description first,
//!   with discovery URLs computed for the requesting connection, followed by
//!   registered servers in registration order.
//!
//! Registrations are kept in memory only and never expire.
//!
//! # Quick Start
//!
//! ```no_run
//! use opcua_discovery_server::{DiscoveryServer, ServerConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let server = DiscoveryServer::new(ServerConfig::default())?;
//! server.run().await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod server;

pub use config::{ConfigError, ServerConfig};
pub use server::protocol::{
    FindServersRequest, FindServersResponse, RegisterServerRequest, RegisterServerResponse,
    RequestHeader, ResponseHeader, ServiceRequest, ServiceResponse,
};
pub use server::types::{
    ApplicationDescription, ApplicationType, LocalizedText, RegisteredServer,
    RegisteredServerEntry, StatusCode,
};
pub use server::{
    ConnectionContext, DiscoveryServer, DiscoveryUrlProvider, EndpointUrlProvider, ServerError,
    ServerRegistry,
};
