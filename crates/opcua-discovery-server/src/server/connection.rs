// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Client connection handling for discovery server.

use super::protocol::{ServiceRequest, ServiceResponse};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::net::SocketAddr;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;

/// Per-connection context handed to request handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionContext {
    /// Remote address of the client.
    pub peer_addr: SocketAddr,
    /// Local address the connection was accepted on.
    pub local_addr: SocketAddr,
}

/// A connected client.
pub struct ClientConnection {
    stream: TcpStream,
    context: ConnectionContext,
    max_message_size: usize,
    read_buffer: Vec<u8>,
}

impl ClientConnection {
    /// Create a new client connection.
    pub fn new(stream: TcpStream, context: ConnectionContext, max_message_size: usize) -> Self {
        Self {
            stream,
            context,
            max_message_size,
            read_buffer: Vec::with_capacity(4096),
        }
    }

    pub fn context(&self) -> &ConnectionContext {
        &self.context
    }

    /// Read a request from the client.
    ///
    /// Returns `Ok(None)` if the connection is closed gracefully.
    pub async fn read_request(&mut self) -> Result<Option<ServiceRequest>, ConnectionError> {
        read_frame(&mut self.stream, self.max_message_size, &mut self.read_buffer).await
    }

    /// Send a response to the client.
    pub async fn send_response(&mut self, response: &ServiceResponse) -> Result<(), ConnectionError> {
        write_frame(&mut self.stream, self.max_message_size, response).await
    }
}

/// Read one length-prefixed JSON frame.
///
/// Returns `Ok(None)` on EOF before the first byte of the length prefix.
pub async fn read_frame<R, T>(
    reader: &mut R,
    max_message_size: usize,
    buffer: &mut Vec<u8>,
) -> Result<Option<T>, ConnectionError>
where
    R: AsyncRead + Unpin,
    T: DeserializeOwned,
{
    // Length prefix (4 bytes, big-endian). Only EOF before its first byte
    // is a clean close.
    let mut len_buf = [0u8; 4];
    if reader.read(&mut len_buf[..1]).await? == 0 {
        return Ok(None);
    }
    match reader.read_exact(&mut len_buf[1..]).await {
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
            return Err(ConnectionError::Protocol("Truncated length prefix".into()));
        }
        Err(e) => return Err(e.into()),
    }

    let len = u32::from_be_bytes(len_buf) as usize;
    if len == 0 {
        return Err(ConnectionError::Protocol("Empty message".into()));
    }
    if len > max_message_size {
        return Err(ConnectionError::Protocol(format!(
            "Message too large: {} > {}",
            len, max_message_size
        )));
    }

    buffer.clear();
    buffer.resize(len, 0);
    reader.read_exact(buffer).await?;

    let msg = serde_json::from_slice(buffer)
        .map_err(|e| ConnectionError::Protocol(format!("Invalid JSON: {}", e)))?;

    Ok(Some(msg))
}

/// Write one length-prefixed JSON frame and flush.
pub async fn write_frame<W, T>(
    writer: &mut W,
    max_message_size: usize,
    msg: &T,
) -> Result<(), ConnectionError>
where
    W: AsyncWrite + Unpin,
    T: Serialize,
{
    let json = serde_json::to_vec(msg)
        .map_err(|e| ConnectionError::Protocol(format!("Serialize error: {}", e)))?;

    if json.len() > max_message_size {
        return Err(ConnectionError::Protocol(format!(
            "Message too large: {} > {}",
            json.len(),
            max_message_size
        )));
    }

    let len = u32::try_from(json.len())
        .map_err(|_| ConnectionError::Protocol("Message length exceeds u32".into()))?;
    writer.write_all(&len.to_be_bytes()).await?;
    writer.write_all(&json).await?;
    writer.flush().await?;

    Ok(())
}

/// Connection error types.
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Protocol error: {0}")]
    Protocol(String),
}
