//! Opaque instance handles.
//!
//! A scenario never owns a participant; it borrows a capability-typed
//! handle exposing the participant's identity and a synchronous-style
//! remote-call operation.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::HarnessResult;
use crate::types::{AgentId, CallResult};

/// A simulated application participant.
///
/// `call_sync` has synchronous-call semantics: it returns only after the
/// instance has processed the call and any resulting side effects have
/// propagated to the simulated network state. Application-level failures
/// come back as [`CallResult::Err`]; dispatch failures are `HarnessResult`
/// errors.
#[async_trait]
pub trait Instance: Send + Sync {
    /// Identity of the agent running this instance
    fn agent_id(&self) -> &AgentId;

    /// Instance name within the topology
    fn name(&self) -> &str;

    /// Invoke a remote procedure and await full propagation
    async fn call_sync(&self, zome: &str, func: &str, args: Value) -> HarnessResult<CallResult>;
}
