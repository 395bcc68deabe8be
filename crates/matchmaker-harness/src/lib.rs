//! Scenario harness for the matchmaker application.
//!
//! Spins up a fixed topology of named, simulated application instances that
//! all share one application artifact, registers named asynchronous
//! scenarios against them, and executes the scenarios under a TAP-style
//! reporting executor.
//!
//! ## Overview
//!
//! The application under test lives behind an opaque remote-call surface:
//! each participant is an [`Instance`] exposing an agent identity and a
//! synchronous-style `call_sync` operation. The harness itself never
//! interprets application semantics; calls are dispatched to a pluggable
//! [`ZomeHandler`] standing in for the compiled artifact, and results come
//! back as a [`CallResult`] with exactly one of its `Ok`/`Err` sides
//! populated.
//!
//! ## Quick Start
//!
//! ```ignore
//! use matchmaker_harness::{Dna, Harness, HarnessConfig, TapExecutor};
//!
//! let dna = Dna::from_file(base_dir, "dist/matchmaker-tats.dna.json", "matchmaker-tats")?;
//! let config = HarnessConfig::builder(dna, handler)
//!     .instance("alice")
//!     .instance("bob")
//!     .debug_log(false)
//!     .build()?;
//!
//! let mut harness = Harness::new(config, Box::new(TapExecutor::new()));
//! harness.register_scenario("Can create a new game", |s, t, instances| {
//!     Box::pin(async move {
//!         let alice = instances.get("alice").unwrap();
//!         let result = alice.call_sync("main", "create_game", args).await?;
//!         t.assert(result.err().is_none(), "create_game succeeds");
//!         Ok(())
//!     })
//! })?;
//!
//! let summary = harness.run().await;
//! std::process::exit(summary.exit_code());
//! ```

pub mod conductor;
pub mod dna;
pub mod error;
pub mod executor;
pub mod faults;
pub mod harness;
pub mod instance;
pub mod middleware;
pub mod types;

// Re-exports
pub use conductor::{CallContext, EntryRecord, SimInstance, SimNetwork, ZomeHandler};
pub use dna::Dna;
pub use error::{HarnessError, HarnessResult};
pub use executor::{AssertionRecord, Executor, RunSummary, ScenarioOutcome, TapExecutor, TestHandle};
pub use faults::{install_fault_observer, FAULT_LOG_PREFIX};
pub use harness::{Bridge, Harness, HarnessConfig, Instances, ScenarioFuture, ScenarioHandle};
pub use instance::Instance;
pub use middleware::{LegacyResultAdapter, Middleware, Passthrough};
pub use types::{Address, AgentId, CallResult, ADDRESS_LEN};
