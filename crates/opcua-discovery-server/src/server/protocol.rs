// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Discovery service messages.
//!
//! Requests and responses travel as length-prefixed JSON, tagged by
//! message type. This framing stands in for the OPC UA secure channel and
//! is not interoperable with OPC UA binary clients.
//!
//! Wire format:
//! ```text
//! +----------------+-------------------+
//! | Length (4B BE) | JSON payload      |
//! +----------------+-------------------+
//! ```

use super::types::{ApplicationDescription, RegisteredServer, StatusCode};
use serde::{Deserialize, Serialize};

/// Header carried by every request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestHeader {
    /// Client-chosen handle echoed back in the response.
    #[serde(default)]
    pub request_handle: u32,
}

/// Header carried by every response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseHeader {
    pub request_handle: u32,
    pub service_result: StatusCode,
}

impl ResponseHeader {
    /// Response header answering `request` with `service_result`.
    pub fn for_request(request: &RequestHeader, service_result: StatusCode) -> Self {
        Self {
            request_handle: request.request_handle,
            service_result,
        }
    }
}

/// Requests accepted by the discovery server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServiceRequest {
    /// A server announces or withdraws itself.
    #[serde(rename = "register_server")]
    RegisterServer(RegisterServerRequest),

    /// A client asks for the known applications.
    #[serde(rename = "find_servers")]
    FindServers(FindServersRequest),
}

impl ServiceRequest {
    pub fn request_header(&self) -> &RequestHeader {
        match self {
            Self::RegisterServer(r) => &r.request_header,
            Self::FindServers(r) => &r.request_header,
        }
    }
}

/// Responses sent by the discovery server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServiceResponse {
    #[serde(rename = "register_server_response")]
    RegisterServer(RegisterServerResponse),

    #[serde(rename = "find_servers_response")]
    FindServers(FindServersResponse),
}

impl ServiceResponse {
    pub fn response_header(&self) -> &ResponseHeader {
        match self {
            Self::RegisterServer(r) => &r.response_header,
            Self::FindServers(r) => &r.response_header,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterServerRequest {
    #[serde(default)]
    pub request_header: RequestHeader,
    pub server: RegisteredServer,
}

/// Result only; success carries no payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterServerResponse {
    pub response_header: ResponseHeader,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FindServersRequest {
    #[serde(default)]
    pub request_header: RequestHeader,
    /// Endpoint the client used to reach the server.
    #[serde(default)]
    pub endpoint_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FindServersResponse {
    pub response_header: ResponseHeader,
    /// Own description first, then registered servers in registration order.
    #[serde(default)]
    pub servers: Vec<ApplicationDescription>,
}
