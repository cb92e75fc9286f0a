// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Registry of servers announced to the discovery server.

use super::types::RegisteredServerEntry;
use std::collections::HashMap;

/// Registered servers indexed by server URI.
///
/// Iteration follows first-registration order so that FindServers
/// responses are reproducible. Re-registering a known URI replaces the
/// entry in place.
#[derive(Debug, Default)]
pub struct ServerRegistry {
    /// Entries indexed by server URI
    servers: HashMap<String, RegisteredServerEntry>,

    /// Server URIs in registration order
    order: Vec<String>,
}

impl ServerRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry, replacing any previous entry with the same URI.
    ///
    /// Returns the replaced entry, if any.
    pub fn put(&mut self, entry: RegisteredServerEntry) -> Option<RegisteredServerEntry> {
        let key = entry.server_uri.clone();
        let previous = self.servers.insert(key.clone(), entry);
        if previous.is_none() {
            self.order.push(key);
        }
        previous
    }

    /// Remove an entry. Unknown URIs are ignored.
    pub fn remove(&mut self, server_uri: &str) -> Option<RegisteredServerEntry> {
        let removed = self.servers.remove(server_uri)?;
        self.order.retain(|uri| uri != server_uri);
        Some(removed)
    }

    /// Get an entry by server URI.
    pub fn get(&self, server_uri: &str) -> Option<&RegisteredServerEntry> {
        self.servers.get(server_uri)
    }

    pub fn contains(&self, server_uri: &str) -> bool {
        self.servers.contains_key(server_uri)
    }

    /// All entries, in registration order.
    pub fn all(&self) -> impl Iterator<Item = &RegisteredServerEntry> {
        self.order.iter().filter_map(|uri| self.servers.get(uri))
    }

    /// Number of registered servers.
    pub fn count(&self) -> usize {
        self.servers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }
}
