//! Trainable-process abstraction and factory registry.
//!
//! The optimization engine itself is an external collaborator. It enters
//! the harness as a [`TrainableProcess`] handle produced by a
//! [`ProcessFactory`] from a run-scoped [`Properties`] store, one fresh
//! handle per run. Resources held by a handle are released when the handle
//! is dropped, which the orchestrator does before the next run starts.

use std::collections::BTreeMap;

use crate::config::{Properties, PROCESS_NAME_KEY};
use crate::error::{HarnessError, Result};

/// One run of the optimization process.
///
/// `execute` blocks for the full duration of the run and may take
/// arbitrarily long; the harness offers no timeout or cancellation. After
/// it returns, both series must hold exactly one entry per generation.
pub trait TrainableProcess {
    /// Run the process to completion. Failures abort the whole
    /// orchestration.
    fn execute(&mut self) -> anyhow::Result<()>;

    /// Best performance recorded at each generation of the completed run.
    fn performance_series(&self) -> &[f64];

    /// Best fitness recorded at each generation of the completed run.
    fn fitness_series(&self) -> &[f64];
}

impl std::fmt::Debug for dyn TrainableProcess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn TrainableProcess")
    }
}

/// Constructs one process handle per run from a run-scoped configuration.
pub trait ProcessFactory {
    fn create(&self, config: &Properties) -> Result<Box<dyn TrainableProcess>>;
}

/// Name-keyed factory registry, dispatching on the `process.name` property.
///
/// This replaces dynamic instantiation from configuration with explicit
/// registration: embedding crates register their engines at startup and the
/// registry acts as the harness's single [`ProcessFactory`].
#[derive(Default)]
pub struct FactoryRegistry {
    factories: BTreeMap<String, Box<dyn ProcessFactory>>,
}

impl FactoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `factory` under `name`. A later registration under the same
    /// name replaces the earlier one.
    pub fn register(&mut self, name: &str, factory: Box<dyn ProcessFactory>) {
        self.factories.insert(name.to_string(), factory);
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl ProcessFactory for FactoryRegistry {
    fn create(&self, config: &Properties) -> Result<Box<dyn TrainableProcess>> {
        let name = config.get(PROCESS_NAME_KEY)?;
        let factory = self.factories.get(name).ok_or_else(|| {
            HarnessError::Configuration(format!(
                "no trainable process registered under '{name}'"
            ))
        })?;
        factory.create(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoopProcess;

    impl TrainableProcess for NoopProcess {
        fn execute(&mut self) -> anyhow::Result<()> {
            Ok(())
        }

        fn performance_series(&self) -> &[f64] {
            &[]
        }

        fn fitness_series(&self) -> &[f64] {
            &[]
        }
    }

    struct NoopFactory;

    impl ProcessFactory for NoopFactory {
        fn create(&self, _config: &Properties) -> Result<Box<dyn TrainableProcess>> {
            Ok(Box::new(NoopProcess))
        }
    }

    #[test]
    fn test_registry_dispatches_on_process_name() {
        let mut registry = FactoryRegistry::new();
        registry.register("noop", Box::new(NoopFactory));

        let mut config = Properties::new();
        config.set(PROCESS_NAME_KEY, "noop");
        assert!(registry.create(&config).is_ok());
    }

    #[test]
    fn test_registry_rejects_unknown_name() {
        let registry = FactoryRegistry::new();
        let mut config = Properties::new();
        config.set(PROCESS_NAME_KEY, "missing");

        let err = registry.create(&config).unwrap_err();
        assert!(matches!(err, HarnessError::Configuration(_)));
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_registry_requires_process_name_key() {
        let registry = FactoryRegistry::new();
        let err = registry.create(&Properties::new()).unwrap_err();
        assert!(matches!(err, HarnessError::Configuration(_)));
    }
}
