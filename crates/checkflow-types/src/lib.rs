//! Checkflow Domain Types
//!
//! A check suite is a declarative grouping of a parameter contract and a
//! set of named checks with dependency, skip, repeat, and expected-failure
//! semantics.
//!
//! # Key Concepts
//!
//! - **ParameterContract**: the declared interface of a suite — required
//!   and optional parameters plus mutually-exclusive groups. Validated
//!   against the caller's arguments before any check executes.
//! - **ExecutionContext**: the accepted parameter values for one run,
//!   passed read-only into every check body.
//! - **CheckMetadata**: per-check attributes — dependency, skip flag and
//!   reason, repeat count and delay, expected-failure flag.
//! - **CheckResult / RunReport**: per-check outcomes and the aggregated,
//!   machine-readable report of a whole run.
//!
//! # Design Principles
//!
//! 1. Contracts and metadata are static: defined once with the suite,
//!    immutable afterwards.
//! 2. Context and report are per-run: created fresh on every invocation,
//!    discarded once the caller consumes the report.
//! 3. Contract errors and check failures never mix. A contract error is a
//!    suite or invocation bug; a check failure is data in the report.

#![deny(unsafe_code)]

mod context;
mod contract;
mod errors;
mod metadata;
mod report;
mod verdict;

pub use context::*;
pub use contract::*;
pub use errors::*;
pub use metadata::*;
pub use report::*;
pub use verdict::*;
