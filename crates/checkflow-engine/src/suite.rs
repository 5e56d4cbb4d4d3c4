//! Check suites: the registry and run entry point
//!
//! A [`CheckSuite`] pairs a parameter contract with an explicit list of
//! registered checks. Registration replaces the original's reflective
//! member scan: each check is a stable name plus a closure, and duplicate
//! names are rejected up front.
//!
//! `run()` drives the whole pipeline in order: contract validation, prefix
//! discovery, skip propagation, dependency resolution, the execution loop,
//! and aggregation into a [`RunReport`].

use crate::{executor, resolver};
use checkflow_types::{
    CheckFailure, CheckMetadata, ContractError, ContractResult, ExecutionContext, IntoVerdict,
    ParameterContract, RunArgs, RunId, RunReport,
};
use std::collections::BTreeSet;

/// A registered check body: reads the context, yields an attempt outcome
pub type CheckBody = Box<dyn Fn(&ExecutionContext) -> Result<(), CheckFailure> + Send + Sync>;

/// A setup or teardown hook
pub type Hook = Box<dyn Fn(&ExecutionContext) -> Result<(), CheckFailure> + Send + Sync>;

/// A check entry: static metadata plus the body to invoke
pub struct CheckEntry {
    pub metadata: CheckMetadata,
    pub(crate) body: CheckBody,
}

impl std::fmt::Debug for CheckEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckEntry")
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}

/// Options for one run invocation
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct RunOptions {
    /// Only checks whose name starts with this prefix are discovered
    pub prefix: String,
    /// Log each check at info level instead of debug
    pub verbose: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            prefix: "test_".to_string(),
            verbose: false,
        }
    }
}

/// A declarative check suite — contract, checks, and hooks
pub struct CheckSuite {
    name: String,
    contract: ParameterContract,
    checks: Vec<CheckEntry>,
    setup: Option<Hook>,
    teardown: Option<Hook>,
}

impl CheckSuite {
    /// Create an empty suite with no declared parameters
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            contract: ParameterContract::new(),
            checks: Vec::new(),
            setup: None,
            teardown: None,
        }
    }

    /// Attach the parameter contract (builder style)
    pub fn with_contract(mut self, contract: ParameterContract) -> Self {
        self.contract = contract;
        self
    }

    /// Register a check.
    ///
    /// The body may return `bool`, `()`, or a `Result` over those; see
    /// [`IntoVerdict`] for the conversion rules.
    ///
    /// # Errors
    ///
    /// [`ContractError::DuplicateCheck`] if a check with the same name is
    /// already registered.
    pub fn register<F, R>(&mut self, metadata: CheckMetadata, body: F) -> ContractResult<()>
    where
        F: Fn(&ExecutionContext) -> R + Send + Sync + 'static,
        R: IntoVerdict,
    {
        if self.checks.iter().any(|c| c.metadata.name == metadata.name) {
            return Err(ContractError::DuplicateCheck(metadata.name));
        }
        self.checks.push(CheckEntry {
            metadata,
            body: Box::new(move |ctx| body(ctx).into_verdict()),
        });
        Ok(())
    }

    /// Install the setup hook, run once before any check
    pub fn on_setup<F, R>(&mut self, hook: F)
    where
        F: Fn(&ExecutionContext) -> R + Send + Sync + 'static,
        R: IntoVerdict,
    {
        self.setup = Some(Box::new(move |ctx| hook(ctx).into_verdict()));
    }

    /// Install the teardown hook, run once after all checks
    pub fn on_teardown<F, R>(&mut self, hook: F)
    where
        F: Fn(&ExecutionContext) -> R + Send + Sync + 'static,
        R: IntoVerdict,
    {
        self.teardown = Some(Box::new(move |ctx| hook(ctx).into_verdict()));
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn contract(&self) -> &ParameterContract {
        &self.contract
    }

    /// Names of all registered checks, in registration order
    pub fn check_names(&self) -> Vec<&str> {
        self.checks.iter().map(|c| c.metadata.name.as_str()).collect()
    }

    pub fn check_count(&self) -> usize {
        self.checks.len()
    }

    /// Run the suite with default options (`"test_"` prefix, not verbose)
    pub fn run(&self, args: RunArgs) -> ContractResult<RunReport> {
        self.run_with_options(RunOptions::default(), args)
    }

    /// Run the suite.
    ///
    /// Contract-validation errors ([`ContractError`]) propagate to the
    /// caller before any check executes. Failures inside check bodies or
    /// hooks never propagate; they are recorded in the returned report.
    pub fn run_with_options(
        &self,
        options: RunOptions,
        args: RunArgs,
    ) -> ContractResult<RunReport> {
        let run_id = RunId::generate();
        let started_at = chrono::Utc::now();
        let span = tracing::info_span!("check_run", suite = %self.name, run = %run_id.short());
        let _enter = span.enter();

        // Phase 1: contract validation. Any error here is a hard error.
        let context = self.contract.validate(&args)?;

        // Phase 2: discovery by name prefix.
        let discovered: Vec<&CheckEntry> = self
            .checks
            .iter()
            .filter(|c| c.metadata.name.starts_with(&options.prefix))
            .collect();
        let discovered_names: BTreeSet<&str> = discovered
            .iter()
            .map(|c| c.metadata.name.as_str())
            .collect();

        tracing::info!(
            discovered = discovered.len(),
            registered = self.checks.len(),
            "check run started"
        );

        // Phase 3: skip propagation, entirely before resolution.
        let propagation = resolver::propagate_skips(&discovered);

        // Phase 4: dependency resolution. Cycles and dangling references
        // are detected here, before anything executes.
        let ordered = resolver::resolve_order(&propagation.active, &discovered_names)?;

        // Phases 5-7: setup, execution loop, teardown.
        let results = executor::execute(
            &ordered,
            propagation.recorded,
            &context,
            self.setup.as_ref(),
            self.teardown.as_ref(),
            options.verbose,
        );

        let report = RunReport::new(run_id, started_at, results);
        tracing::info!(
            result = ?report.overall,
            total = report.summary.total,
            passed = report.summary.passed,
            failed = report.summary.failed,
            skipped = report.summary.skipped,
            "check run finished"
        );
        Ok(report)
    }
}
