// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Discovery Server core implementation.

use crate::config::{ConfigError, ServerConfig};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{watch, RwLock};
use tracing::{debug, error, info, warn};

pub mod connection;
pub mod find_servers;
pub mod protocol;
pub mod registration;
pub mod registry;
pub mod types;

pub use connection::{ClientConnection, ConnectionContext, ConnectionError};
pub use find_servers::{DiscoveryUrlProvider, EndpointUrlProvider};
use protocol::{ServiceRequest, ServiceResponse};
pub use registry::ServerRegistry;
use types::ApplicationDescription;

/// State owned by one discovery server instance.
#[derive(Debug)]
pub struct DiscoveryState {
    /// Own description; `application_type` is always DiscoveryServer.
    pub server_info: ApplicationDescription,
    pub registry: ServerRegistry,
}

/// Discovery Server - server registration and FindServers lookup.
///
/// Each instance owns its registry; clones share it.
#[derive(Clone)]
pub struct DiscoveryServer {
    config: Arc<ServerConfig>,
    state: Arc<RwLock<DiscoveryState>>,
    urls: Arc<dyn DiscoveryUrlProvider>,
    shutdown: Arc<watch::Sender<bool>>,
    running: Arc<AtomicBool>,
}

impl DiscoveryServer {
    /// Create a new discovery server advertising the configured endpoint.
    pub fn new(config: ServerConfig) -> Result<Self, ServerError> {
        let urls = config.url_provider();
        Self::with_url_provider(config, Arc::new(urls))
    }

    /// Create a new discovery server with a custom discovery URL source.
    pub fn with_url_provider(
        config: ServerConfig,
        urls: Arc<dyn DiscoveryUrlProvider>,
    ) -> Result<Self, ServerError> {
        config.validate()?;

        let state = DiscoveryState {
            server_info: config.server_info(),
            registry: ServerRegistry::new(),
        };
        let (shutdown, _) = watch::channel(false);

        Ok(Self {
            config: Arc::new(config),
            state: Arc::new(RwLock::new(state)),
            urls,
            shutdown: Arc::new(shutdown),
            running: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Bind the configured address and serve until shutdown.
    pub async fn run(&self) -> Result<(), ServerError> {
        let addr = SocketAddr::new(self.config.bind_address, self.config.port);
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;

        self.serve(listener).await
    }

    /// Serve connections from an already bound listener until shutdown.
    ///
    /// A stopped server can serve again; a `shutdown` issued while it is not
    /// running is discarded.
    pub async fn serve(&self, listener: TcpListener) -> Result<(), ServerError> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(ServerError::AlreadyRunning);
        }
        self.shutdown.send_replace(false);

        info!("Discovery server listening on {}", listener.local_addr()?);

        let mut shutdown = self.shutdown.subscribe();
        while !*shutdown.borrow() {
            tokio::select! {
                result = listener.accept() => {
                    match result {
                        Ok((stream, peer_addr)) => {
                            info!("New connection from {}", peer_addr);

                            let server = self.clone();
                            tokio::spawn(async move {
                                if let Err(e) = server.handle_connection(stream, peer_addr).await {
                                    warn!("Connection error from {}: {}", peer_addr, e);
                                }
                            });
                        }
                        Err(e) => {
                            error!("Accept error: {}", e);
                        }
                    }
                }
                _ = shutdown.changed() => {
                    info!("Shutdown signal received");
                }
            }
        }

        self.running.store(false, Ordering::SeqCst);
        Ok(())
    }

    /// Handle a client connection.
    async fn handle_connection(
        &self,
        stream: TcpStream,
        peer_addr: SocketAddr,
    ) -> Result<(), ServerError> {
        if let Err(e) = stream.set_nodelay(self.config.tcp_nodelay) {
            debug!("Failed to set TCP_NODELAY for {}: {}", peer_addr, e);
        }

        let ctx = ConnectionContext {
            peer_addr,
            local_addr: stream.local_addr()?,
        };
        let mut conn = ClientConnection::new(stream, ctx, self.config.max_message_size);
        let mut shutdown = self.shutdown.subscribe();

        while !*shutdown.borrow() {
            tokio::select! {
                result = conn.read_request() => {
                    match result {
                        Ok(Some(request)) => {
                            let response = self.dispatch(conn.context(), request).await;
                            conn.send_response(&response).await?;
                        }
                        Ok(None) => {
                            info!("Connection closed: {}", peer_addr);
                            break;
                        }
                        Err(e) => {
                            warn!("Read error from {}: {}", peer_addr, e);
                            break;
                        }
                    }
                }
                _ = shutdown.changed() => {
                    debug!("Connection handler shutting down: {}", peer_addr);
                }
            }
        }

        Ok(())
    }

    /// Handle one decoded request. The message type selects the service.
    pub async fn dispatch(&self, ctx: &ConnectionContext, request: ServiceRequest) -> ServiceResponse {
        match request {
            ServiceRequest::RegisterServer(req) => {
                let mut state = self.state.write().await;
                ServiceResponse::RegisterServer(registration::handle_register_server(
                    &mut state.registry,
                    req,
                ))
            }
            ServiceRequest::FindServers(req) => {
                let state = self.state.read().await;
                ServiceResponse::FindServers(find_servers::handle_find_servers(
                    &state.server_info,
                    &state.registry,
                    self.urls.as_ref(),
                    ctx,
                    req,
                ))
            }
        }
    }

    /// Applications visible to a client on `ctx`.
    pub async fn servers(&self, ctx: &ConnectionContext) -> Vec<ApplicationDescription> {
        let state = self.state.read().await;
        find_servers::find_servers(
            &state.server_info,
            &state.registry,
            self.urls.discovery_urls_for(ctx),
        )
    }

    /// Signal the running `serve` loop and its connections to stop.
    pub fn shutdown(&self) {
        self.shutdown.send_replace(true);
    }

    /// Get the current registered server count.
    pub async fn registered_server_count(&self) -> usize {
        self.state.read().await.registry.count()
    }

    /// Check if server is running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}

/// Server error types.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Bind error on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },

    #[error("Server already running")]
    AlreadyRunning,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Connection error: {0}")]
    Connection(#[from] ConnectionError),
}
