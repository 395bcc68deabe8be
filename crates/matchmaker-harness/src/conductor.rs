//! In-process stand-in for the external application runtime.
//!
//! One [`SimNetwork`] is shared by every instance of a harness run; it
//! holds the entries that have propagated to the simulated network state.
//! Calls are dispatched to a pluggable [`ZomeHandler`] that stands in for
//! the compiled application artifact. Entries committed during a call are
//! staged in the [`CallContext`] and only published to the shared store
//! when the call succeeds, right before `call_sync` returns.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;

use crate::error::HarnessResult;
use crate::instance::Instance;
use crate::middleware::Middleware;
use crate::types::{Address, AgentId, CallResult};

/// A published entry as seen by every participant
#[derive(Debug, Clone, PartialEq)]
pub struct EntryRecord {
    /// Application-defined entry type ("game", "move", ...)
    pub entry_type: String,
    /// Canonical entry content
    pub content: Value,
    /// Identity of the committing agent
    pub author: AgentId,
}

#[derive(Default)]
struct NetworkStore {
    entries: BTreeMap<Address, EntryRecord>,
}

/// Shared simulated network state.
///
/// Cloning yields another handle to the same store.
#[derive(Clone, Default)]
pub struct SimNetwork {
    store: Arc<RwLock<NetworkStore>>,
}

impl SimNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch a propagated entry
    pub fn get(&self, address: &Address) -> Option<EntryRecord> {
        self.store.read().entries.get(address).cloned()
    }

    /// All propagated entries of one type, in address order
    pub fn entries_of_type(&self, entry_type: &str) -> Vec<(Address, EntryRecord)> {
        self.store
            .read()
            .entries
            .iter()
            .filter(|(_, record)| record.entry_type == entry_type)
            .map(|(address, record)| (address.clone(), record.clone()))
            .collect()
    }

    /// Number of propagated entries
    pub fn entry_count(&self) -> usize {
        self.store.read().entries.len()
    }

    /// Propagate a batch of staged commits to the shared state
    fn publish(&self, staged: Vec<(Address, EntryRecord)>) {
        let mut store = self.store.write();
        for (address, record) in staged {
            store.entries.insert(address, record);
        }
    }
}

/// Per-call view handed to the application handler.
///
/// Commits are staged here and only published when the call produces an
/// `Ok` result; an application `Err` discards them, so a failed call never
/// leaves partial state behind.
pub struct CallContext<'a> {
    agent_id: &'a AgentId,
    network: &'a SimNetwork,
    staged: Vec<(Address, EntryRecord)>,
}

impl<'a> CallContext<'a> {
    fn new(agent_id: &'a AgentId, network: &'a SimNetwork) -> Self {
        Self {
            agent_id,
            network,
            staged: Vec::new(),
        }
    }

    /// Identity of the calling agent
    pub fn agent_id(&self) -> &AgentId {
        self.agent_id
    }

    /// Stage an entry commit and mint its content address
    pub fn commit_entry(&mut self, entry_type: &str, content: Value) -> Address {
        let address = Address::from_content(content.to_string().as_bytes());
        self.staged.push((
            address.clone(),
            EntryRecord {
                entry_type: entry_type.to_string(),
                content,
                author: self.agent_id.clone(),
            },
        ));
        address
    }

    /// Fetch an entry, seeing staged commits before propagated state
    pub fn get_entry(&self, address: &Address) -> Option<EntryRecord> {
        self.staged
            .iter()
            .rev()
            .find(|(a, _)| a == address)
            .map(|(_, record)| record.clone())
            .or_else(|| self.network.get(address))
    }

    /// All visible entries of one type, staged commits included
    pub fn entries_of_type(&self, entry_type: &str) -> Vec<(Address, EntryRecord)> {
        let mut entries = self.network.entries_of_type(entry_type);
        for (address, record) in &self.staged {
            if record.entry_type == entry_type {
                entries.push((address.clone(), record.clone()));
            }
        }
        entries
    }

    fn into_staged(self) -> Vec<(Address, EntryRecord)> {
        self.staged
    }
}

/// The application behavior behind the remote-call surface.
///
/// Stands in for the compiled artifact; the harness only ever talks to it
/// through this trait, so tests inject whatever double they need.
#[async_trait]
pub trait ZomeHandler: Send + Sync {
    async fn handle(
        &self,
        ctx: &mut CallContext<'_>,
        zome: &str,
        func: &str,
        args: Value,
    ) -> CallResult;
}

/// A simulated participant wired to the shared network
pub struct SimInstance {
    name: String,
    agent_id: AgentId,
    network: SimNetwork,
    handler: Arc<dyn ZomeHandler>,
    middleware: Arc<dyn Middleware>,
    debug_log: bool,
}

impl SimInstance {
    pub fn new(
        name: &str,
        network: SimNetwork,
        handler: Arc<dyn ZomeHandler>,
        middleware: Arc<dyn Middleware>,
        debug_log: bool,
    ) -> Self {
        Self {
            name: name.to_string(),
            agent_id: AgentId::generate(),
            network,
            handler,
            middleware,
            debug_log,
        }
    }
}

#[async_trait]
impl Instance for SimInstance {
    fn agent_id(&self) -> &AgentId {
        &self.agent_id
    }

    fn name(&self) -> &str {
        &self.name
    }

    async fn call_sync(&self, zome: &str, func: &str, args: Value) -> HarnessResult<CallResult> {
        let args = self.middleware.adapt_request(zome, func, args)?;

        if self.debug_log {
            tracing::debug!(instance = %self.name, zome, func, args = %args, "Dispatching call");
        }

        let mut ctx = CallContext::new(&self.agent_id, &self.network);
        let result = self.handler.handle(&mut ctx, zome, func, args).await;

        // Synchronous-call contract: side effects reach the shared state
        // before control returns to the scenario. Failed calls commit
        // nothing.
        match &result {
            CallResult::Ok(_) => self.network.publish(ctx.into_staged()),
            CallResult::Err(err) => {
                if self.debug_log {
                    tracing::debug!(instance = %self.name, func, err = %err, "Call returned Err");
                }
            }
        }

        Ok(self.middleware.adapt_response(result))
    }
}
