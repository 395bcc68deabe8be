//! Scenario registration and execution.
//!
//! A [`Harness`] owns a fixed topology description ([`HarnessConfig`]) and
//! a list of named scenarios. [`Harness::run`] executes the scenarios
//! sequentially, spawning fresh instances over a fresh simulated network
//! for each one, so no state survives from one scenario run into the next.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use futures::FutureExt;

use crate::conductor::{SimInstance, SimNetwork, ZomeHandler};
use crate::dna::Dna;
use crate::error::{HarnessError, HarnessResult};
use crate::executor::{Executor, RunSummary, ScenarioOutcome, TestHandle};
use crate::instance::Instance;
use crate::middleware::{Middleware, Passthrough};

/// Name-to-handle map handed to scenario bodies
pub type Instances = HashMap<String, Arc<dyn Instance>>;

/// Future returned by a scenario body
pub type ScenarioFuture = Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send>>;

/// A registered scenario body
pub type ScenarioFn = Box<dyn Fn(ScenarioHandle, TestHandle, Instances) -> ScenarioFuture + Send>;

struct Scenario {
    name: String,
    body: ScenarioFn,
}

/// Handle to the running scenario's surroundings
pub struct ScenarioHandle {
    scenario: String,
    network: SimNetwork,
}

impl ScenarioHandle {
    /// Name the scenario was registered under
    pub fn name(&self) -> &str {
        &self.scenario
    }

    /// The scenario's simulated network state (read-only inspection)
    pub fn network(&self) -> &SimNetwork {
        &self.network
    }

    /// Wait until all published state has propagated.
    ///
    /// Propagation in the simulated conductor completes inside `call_sync`,
    /// so this only yields to the runtime; the method exists because the
    /// contract promises a consistency point, not because the simulation
    /// needs one.
    pub async fn consistency(&self) {
        tokio::task::yield_now().await;
    }
}

/// A declared bridge between two instances.
///
/// The matchmaker topology declares none; the field exists so a topology
/// that needs one fails loudly at build time if it names an unknown
/// instance.
#[derive(Debug, Clone)]
pub struct Bridge {
    pub caller: String,
    pub callee: String,
    pub handle: String,
}

/// Fixed topology shared by every scenario run
pub struct HarnessConfig {
    dna: Dna,
    handler: Arc<dyn ZomeHandler>,
    instance_names: Vec<String>,
    bridges: Vec<Bridge>,
    debug_log: bool,
    middleware: Arc<dyn Middleware>,
}

impl std::fmt::Debug for HarnessConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HarnessConfig")
            .field("dna", &self.dna)
            .field("instance_names", &self.instance_names)
            .field("bridges", &self.bridges)
            .field("debug_log", &self.debug_log)
            .finish_non_exhaustive()
    }
}

impl HarnessConfig {
    pub fn builder(dna: Dna, handler: Arc<dyn ZomeHandler>) -> HarnessConfigBuilder {
        HarnessConfigBuilder {
            dna,
            handler,
            instance_names: Vec::new(),
            bridges: Vec::new(),
            debug_log: false,
            middleware: Arc::new(Passthrough),
        }
    }

    /// Names of the configured instances, in declaration order
    pub fn instance_names(&self) -> &[String] {
        &self.instance_names
    }

    pub fn dna(&self) -> &Dna {
        &self.dna
    }

    /// Spawn a fresh set of instances over a fresh network
    fn spawn(&self) -> (SimNetwork, Instances) {
        let network = SimNetwork::new();
        let mut instances: Instances = HashMap::new();
        for name in &self.instance_names {
            let instance = SimInstance::new(
                name,
                network.clone(),
                self.handler.clone(),
                self.middleware.clone(),
                self.debug_log,
            );
            tracing::debug!(
                instance = %name,
                agent_id = %instance.agent_id(),
                dna = %self.dna.name(),
                "Spawned instance"
            );
            instances.insert(name.clone(), Arc::new(instance));
        }
        (network, instances)
    }
}

/// Builder for [`HarnessConfig`]
pub struct HarnessConfigBuilder {
    dna: Dna,
    handler: Arc<dyn ZomeHandler>,
    instance_names: Vec<String>,
    bridges: Vec<Bridge>,
    debug_log: bool,
    middleware: Arc<dyn Middleware>,
}

impl HarnessConfigBuilder {
    /// Add a named instance backed by the shared artifact
    pub fn instance(mut self, name: &str) -> Self {
        self.instance_names.push(name.to_string());
        self
    }

    /// Declare a bridge between two instances
    pub fn bridge(mut self, caller: &str, callee: &str, handle: &str) -> Self {
        self.bridges.push(Bridge {
            caller: caller.to_string(),
            callee: callee.to_string(),
            handle: handle.to_string(),
        });
        self
    }

    /// Enable per-call debug logging (off by default)
    pub fn debug_log(mut self, enabled: bool) -> Self {
        self.debug_log = enabled;
        self
    }

    /// Install a call adaptation layer
    pub fn middleware(mut self, middleware: Arc<dyn Middleware>) -> Self {
        self.middleware = middleware;
        self
    }

    pub fn build(self) -> HarnessResult<HarnessConfig> {
        if self.instance_names.is_empty() {
            return Err(HarnessError::InvalidConfig(
                "topology declares no instances".to_string(),
            ));
        }
        let mut seen = std::collections::HashSet::new();
        for name in &self.instance_names {
            if !seen.insert(name.clone()) {
                return Err(HarnessError::DuplicateInstance(name.clone()));
            }
        }
        for bridge in &self.bridges {
            for endpoint in [&bridge.caller, &bridge.callee] {
                if !seen.contains(endpoint) {
                    return Err(HarnessError::InstanceNotFound(endpoint.clone()));
                }
            }
        }
        Ok(HarnessConfig {
            dna: self.dna,
            handler: self.handler,
            instance_names: self.instance_names,
            bridges: self.bridges,
            debug_log: self.debug_log,
            middleware: self.middleware,
        })
    }
}

/// The scenario runner
pub struct Harness {
    config: HarnessConfig,
    scenarios: Vec<Scenario>,
    executor: Box<dyn Executor>,
}

impl Harness {
    pub fn new(config: HarnessConfig, executor: Box<dyn Executor>) -> Self {
        Self {
            config,
            scenarios: Vec::new(),
            executor,
        }
    }

    /// Register a named scenario. Names are unique within a run.
    pub fn register_scenario(
        &mut self,
        name: &str,
        body: impl Fn(ScenarioHandle, TestHandle, Instances) -> ScenarioFuture + Send + 'static,
    ) -> HarnessResult<()> {
        if self.scenarios.iter().any(|s| s.name == name) {
            return Err(HarnessError::DuplicateScenario(name.to_string()));
        }
        self.scenarios.push(Scenario {
            name: name.to_string(),
            body: Box::new(body),
        });
        Ok(())
    }

    /// Execute every registered scenario, in registration order.
    ///
    /// Each scenario gets fresh instances over a fresh network. A failing
    /// or panicking scenario is reported and the run continues with the
    /// next one.
    pub async fn run(mut self) -> RunSummary {
        for scenario in &self.scenarios {
            tracing::info!(scenario = %scenario.name, "Running scenario");
            self.executor.scenario_started(&scenario.name);

            let (network, instances) = self.config.spawn();
            let handle = ScenarioHandle {
                scenario: scenario.name.clone(),
                network,
            };
            let t = TestHandle::new();

            let future = (scenario.body)(handle, t.clone(), instances);
            let result = std::panic::AssertUnwindSafe(future).catch_unwind().await;

            let error = match result {
                Ok(Ok(())) => None,
                Ok(Err(err)) => Some(format!("{:#}", err)),
                Err(panic) => Some(describe_panic(panic)),
            };
            if let Some(reason) = &error {
                tracing::error!(scenario = %scenario.name, reason = %reason, "Scenario aborted");
            }

            let outcome = ScenarioOutcome {
                assertions: t.take_records(),
                error,
            };
            self.executor.scenario_finished(&scenario.name, outcome);
        }

        self.executor.summary()
    }
}

fn describe_panic(panic: Box<dyn std::any::Any + Send>) -> String {
    panic
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "panic with non-string payload".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conductor::CallContext;
    use crate::executor::TapExecutor;
    use crate::types::CallResult;
    use async_trait::async_trait;
    use serde_json::{json, Value};

    struct Echo;

    #[async_trait]
    impl ZomeHandler for Echo {
        async fn handle(
            &self,
            _ctx: &mut CallContext<'_>,
            _zome: &str,
            _func: &str,
            args: Value,
        ) -> CallResult {
            CallResult::Ok(args)
        }
    }

    fn test_dna(dir: &std::path::Path) -> Dna {
        let artifact = dir.join("test.dna.json");
        std::fs::write(&artifact, b"{}").unwrap();
        Dna::from_file(dir, "test.dna.json", "test").unwrap()
    }

    #[test]
    fn test_builder_rejects_duplicate_instance() {
        let dir = tempfile::tempdir().unwrap();
        let err = HarnessConfig::builder(test_dna(dir.path()), Arc::new(Echo))
            .instance("alice")
            .instance("alice")
            .build()
            .unwrap_err();
        assert!(matches!(err, HarnessError::DuplicateInstance(_)));
    }

    #[test]
    fn test_builder_rejects_empty_topology() {
        let dir = tempfile::tempdir().unwrap();
        let err = HarnessConfig::builder(test_dna(dir.path()), Arc::new(Echo))
            .build()
            .unwrap_err();
        assert!(matches!(err, HarnessError::InvalidConfig(_)));
    }

    #[test]
    fn test_builder_rejects_bridge_to_unknown_instance() {
        let dir = tempfile::tempdir().unwrap();
        let err = HarnessConfig::builder(test_dna(dir.path()), Arc::new(Echo))
            .instance("alice")
            .bridge("alice", "carol", "matchmaking")
            .build()
            .unwrap_err();
        assert!(matches!(err, HarnessError::InstanceNotFound(_)));
    }

    #[test]
    fn test_duplicate_scenario_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let config = HarnessConfig::builder(test_dna(dir.path()), Arc::new(Echo))
            .instance("alice")
            .build()
            .unwrap();
        let mut harness = Harness::new(config, Box::new(TapExecutor::new()));

        harness
            .register_scenario("same name", |_s, _t, _i| Box::pin(async { Ok(()) }))
            .unwrap();
        let err = harness
            .register_scenario("same name", |_s, _t, _i| Box::pin(async { Ok(()) }))
            .unwrap_err();
        assert!(matches!(err, HarnessError::DuplicateScenario(_)));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_failing_scenario_does_not_stop_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let config = HarnessConfig::builder(test_dna(dir.path()), Arc::new(Echo))
            .instance("alice")
            .build()
            .unwrap();
        let mut harness = Harness::new(config, Box::new(TapExecutor::new()));

        harness
            .register_scenario("fails", |_s, t, _i| {
                Box::pin(async move {
                    t.assert(false, "always fails");
                    Ok(())
                })
            })
            .unwrap();
        harness
            .register_scenario("panics", |_s, _t, _i| {
                Box::pin(async move { panic!("scenario blew up") })
            })
            .unwrap();
        harness
            .register_scenario("passes", |_s, t, _i| {
                Box::pin(async move {
                    t.assert(true, "still runs");
                    Ok(())
                })
            })
            .unwrap();

        let summary = harness.run().await;
        assert_eq!(summary.scenarios, 3);
        assert_eq!(summary.scenarios_failed, 2);
        assert!(!summary.success());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_each_scenario_gets_fresh_instances() {
        struct Counter;

        #[async_trait]
        impl ZomeHandler for Counter {
            async fn handle(
                &self,
                ctx: &mut CallContext<'_>,
                _zome: &str,
                _func: &str,
                args: Value,
            ) -> CallResult {
                ctx.commit_entry("mark", args);
                CallResult::Ok(json!(ctx.entries_of_type("mark").len()))
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let config = HarnessConfig::builder(test_dna(dir.path()), Arc::new(Counter))
            .instance("alice")
            .build()
            .unwrap();
        let mut harness = Harness::new(config, Box::new(TapExecutor::new()));

        // Both scenarios observe an empty store before their own commit:
        // nothing leaks from one run into the next.
        for name in ["first run", "second run"] {
            harness
                .register_scenario(name, move |s, t, instances| {
                    Box::pin(async move {
                        let alice = instances
                            .get("alice")
                            .cloned()
                            .ok_or_else(|| anyhow::anyhow!("alice not configured"))?;
                        let result = alice
                            .call_sync("main", "mark", json!({"run": s.name()}))
                            .await?;
                        t.equal(result.ok().cloned(), Some(json!(1)), "store starts empty");
                        Ok(())
                    })
                })
                .unwrap();
        }

        let summary = harness.run().await;
        assert_eq!(summary.scenarios, 2);
        assert!(summary.success());
    }
}
