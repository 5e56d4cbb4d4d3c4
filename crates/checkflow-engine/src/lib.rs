//! Checkflow Execution Engine
//!
//! The engine takes a declarative [`CheckSuite`] — a parameter contract
//! plus named checks with dependency, skip, repeat, and expected-failure
//! metadata — and turns one invocation into a structured [`RunReport`].
//!
//! # Run pipeline
//!
//! 1. Contract validation: the caller's arguments are checked against the
//!    declared contract; any violation is a hard error raised before
//!    anything executes.
//! 2. Discovery: registered checks are filtered by name prefix.
//! 3. Skip propagation: explicit skips cascade to all transitive
//!    dependents, to any depth, before execution.
//! 4. Dependency resolution: Kahn's algorithm orders the remaining checks;
//!    dangling references and cycles are hard errors.
//! 5. Execution: checks run sequentially with repeat, delay, and
//!    expected-failure semantics; a failed dependency skips its dependents.
//! 6. Aggregation: results tally into the report's summary and verdict.
//!
//! The engine performs no I/O of its own. Check bodies may interrogate an
//! external [`Target`]; the engine only sees each body's verdict.
//!
//! # Example
//!
//! ```rust
//! use checkflow_engine::CheckSuite;
//! use checkflow_types::{CheckMetadata, ParamSpec, ParameterContract, RunArgs};
//!
//! let mut suite = CheckSuite::new("connectivity").with_contract(
//!     ParameterContract::new().require(ParamSpec::typed("host", "str")),
//! );
//! suite
//!     .register(CheckMetadata::new("test_ping"), |ctx| {
//!         matches!(
//!             ctx.get_str("host"),
//!             Some("google.com" | "8.8.8.8" | "127.0.0.1")
//!         )
//!     })
//!     .unwrap();
//!
//! let report = suite.run(RunArgs::new().arg("host", "127.0.0.1")).unwrap();
//! assert!(report.passed());
//! ```

#![deny(unsafe_code)]

mod executor;
mod resolver;
pub mod suite;
pub mod target;

// Re-export main types
pub use suite::{CheckBody, CheckEntry, CheckSuite, Hook, RunOptions};
pub use target::{Target, TargetError};
