//! The execution loop: setup, ordered check invocation, teardown
//!
//! Runs strictly sequentially in the resolved order. Only failure
//! propagation happens here; skip propagation was fully resolved before
//! resolution, because a failure is only knowable after execution.
//!
//! Failures inside check bodies and hooks are always converted into
//! recorded results. Nothing in this module returns an error.

use crate::suite::{CheckEntry, Hook};
use checkflow_types::{CheckResult, CheckStatus, ExecutionContext};
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

/// Execute the ordered checks, extending the results recorded during skip
/// propagation until every discovered check has a terminal status.
pub(crate) fn execute(
    ordered: &[&CheckEntry],
    mut recorded: BTreeMap<String, CheckResult>,
    context: &ExecutionContext,
    setup: Option<&Hook>,
    teardown: Option<&Hook>,
    verbose: bool,
) -> BTreeMap<String, CheckResult> {
    // Setup runs once before any check. If it fails, every check that has
    // no recorded status yet is marked FAIL with the setup error and the
    // run ends immediately; teardown is not invoked.
    if let Some(hook) = setup {
        if let Err(failure) = hook(context) {
            tracing::error!(error = %failure, "setup hook failed, aborting run");
            for entry in ordered {
                recorded
                    .entry(entry.metadata.name.clone())
                    .or_insert_with(|| CheckResult::fail(failure.message(), 0.0));
            }
            return recorded;
        }
    }

    for entry in ordered {
        let meta = &entry.metadata;

        // Failure propagation: a dependency that already failed, or was
        // itself skipped for a failed dependency, skips this check.
        if let Some(dep) = &meta.depends_on {
            let dep_failed = recorded.get(dep).is_some_and(|r| {
                matches!(
                    r.status,
                    CheckStatus::Fail | CheckStatus::SkippedDueToDependencyFail
                )
            });
            if dep_failed {
                tracing::debug!(
                    check = %meta.name,
                    dependency = %dep,
                    "check skipped due to failed dependency"
                );
                recorded.insert(meta.name.clone(), CheckResult::skipped_dependency_failed(dep));
                continue;
            }
        }

        let result = run_check(entry, context, verbose);
        recorded.insert(meta.name.clone(), result);
    }

    // Teardown runs once after all checks. A failure adds a synthetic
    // "teardown" entry, which forces the overall result to FAIL.
    if let Some(hook) = teardown {
        if let Err(failure) = hook(context) {
            tracing::error!(error = %failure, "teardown hook failed");
            recorded.insert(
                "teardown".to_string(),
                CheckResult::fail(failure.message(), 0.0),
            );
        }
    }

    recorded
}

/// Run a single check's attempts and judge the outcome.
///
/// All `repeat_count` attempts must succeed for a structural pass; the
/// first failed attempt short-circuits the rest. `expected_failure`
/// inverts the structural outcome. Elapsed time accumulates across
/// attempts; sleeps between attempts are not counted.
fn run_check(entry: &CheckEntry, context: &ExecutionContext, verbose: bool) -> CheckResult {
    let meta = &entry.metadata;
    if verbose {
        tracing::info!(check = %meta.name, attempts = meta.repeat_count, "check started");
    } else {
        tracing::debug!(check = %meta.name, attempts = meta.repeat_count, "check started");
    }

    let mut successes: u32 = 0;
    let mut last_failure = None;
    let mut elapsed = 0.0f64;

    for attempt in 1..=meta.repeat_count {
        if attempt > 1 && meta.repeat_delay_secs > 0.0 {
            std::thread::sleep(Duration::from_secs_f64(meta.repeat_delay_secs));
        }
        let clock = Instant::now();
        let outcome = (entry.body)(context);
        elapsed += clock.elapsed().as_secs_f64();

        match outcome {
            Ok(()) => successes += 1,
            Err(failure) => {
                // Conjunctive semantics: the first failure ends the attempts.
                last_failure = Some(failure);
                break;
            }
        }
    }

    let result = match (last_failure, meta.expected_failure) {
        (None, false) => CheckResult::pass(elapsed),
        (Some(_), true) => CheckResult::pass(elapsed),
        (None, true) => {
            CheckResult::fail("check passed but a failure was expected", elapsed)
        }
        (Some(failure), false) => {
            let message = if meta.repeat_count > 1 && successes >= 1 {
                format!(
                    "{}/{} successful runs; last failure: {}",
                    successes,
                    meta.repeat_count,
                    failure.message()
                )
            } else {
                failure.0
            };
            CheckResult::fail(message, elapsed)
        }
    };

    if verbose {
        tracing::info!(check = %meta.name, status = ?result.status, "check finished");
    } else {
        tracing::debug!(check = %meta.name, status = ?result.status, "check finished");
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suite::CheckBody;
    use checkflow_types::{CheckFailure, CheckMetadata};
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn entry(metadata: CheckMetadata, body: CheckBody) -> CheckEntry {
        CheckEntry { metadata, body }
    }

    fn passing(metadata: CheckMetadata) -> CheckEntry {
        entry(metadata, Box::new(|_| Ok(())))
    }

    fn failing(metadata: CheckMetadata, message: &str) -> CheckEntry {
        let message = message.to_string();
        entry(
            metadata,
            Box::new(move |_| Err(CheckFailure::new(message.clone()))),
        )
    }

    fn run(ordered: &[&CheckEntry]) -> BTreeMap<String, CheckResult> {
        execute(
            ordered,
            BTreeMap::new(),
            &ExecutionContext::default(),
            None,
            None,
            false,
        )
    }

    #[test]
    fn test_pass_has_empty_message() {
        let a = passing(CheckMetadata::new("test_a"));
        let results = run(&[&a]);
        assert_eq!(results["test_a"].status, CheckStatus::Pass);
        assert_eq!(results["test_a"].message, "");
    }

    #[test]
    fn test_fail_carries_message_verbatim() {
        let a = failing(CheckMetadata::new("test_a"), "device unreachable");
        let results = run(&[&a]);
        assert_eq!(results["test_a"].status, CheckStatus::Fail);
        assert_eq!(results["test_a"].message, "device unreachable");
    }

    #[test]
    fn test_repeat_failure_short_circuits() {
        // Fails on the 3rd attempt; attempt 4 must never run.
        let calls = Arc::new(AtomicU32::new(0));
        let seen = calls.clone();
        let a = entry(
            CheckMetadata::new("test_a").repeat(4),
            Box::new(move |_| {
                let n = seen.fetch_add(1, Ordering::SeqCst) + 1;
                if n < 3 {
                    Ok(())
                } else {
                    Err(CheckFailure::new("flaked"))
                }
            }),
        );

        let results = run(&[&a]);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(results["test_a"].status, CheckStatus::Fail);
        assert_eq!(
            results["test_a"].message,
            "2/4 successful runs; last failure: flaked"
        );
    }

    #[test]
    fn test_repeat_first_attempt_failure_keeps_message_verbatim() {
        let a = failing(CheckMetadata::new("test_a").repeat(3), "boom");
        let results = run(&[&a]);
        assert_eq!(results["test_a"].message, "boom");
    }

    #[test]
    fn test_repeat_all_successes_pass() {
        let calls = Arc::new(AtomicU32::new(0));
        let seen = calls.clone();
        let a = entry(
            CheckMetadata::new("test_a").repeat(3),
            Box::new(move |_| {
                seen.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }),
        );

        let results = run(&[&a]);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(results["test_a"].status, CheckStatus::Pass);
    }

    #[test]
    fn test_expected_failure_inverts_outcome() {
        let fails = failing(
            CheckMetadata::new("test_fails").expected_failure(),
            "known bug",
        );
        let passes = passing(CheckMetadata::new("test_passes").expected_failure());

        let results = run(&[&fails, &passes]);
        assert_eq!(results["test_fails"].status, CheckStatus::Pass);
        assert_eq!(results["test_fails"].message, "");
        assert_eq!(results["test_passes"].status, CheckStatus::Fail);
        assert_eq!(
            results["test_passes"].message,
            "check passed but a failure was expected"
        );
    }

    #[test]
    fn test_failure_propagates_to_dependents() {
        let a = failing(CheckMetadata::new("test_a"), "down");
        let b = passing(CheckMetadata::new("test_b").depends_on("test_a"));
        let c = passing(CheckMetadata::new("test_c").depends_on("test_b"));

        let results = run(&[&a, &b, &c]);
        assert_eq!(results["test_a"].status, CheckStatus::Fail);
        assert_eq!(
            results["test_b"].status,
            CheckStatus::SkippedDueToDependencyFail
        );
        assert!(results["test_b"].message.contains("test_a"));
        // c's dependency b is itself dependency-failed, so c cascades too
        assert_eq!(
            results["test_c"].status,
            CheckStatus::SkippedDueToDependencyFail
        );
    }

    #[test]
    fn test_dependent_of_passing_check_runs() {
        let a = passing(CheckMetadata::new("test_a"));
        let b = passing(CheckMetadata::new("test_b").depends_on("test_a"));

        let results = run(&[&a, &b]);
        assert_eq!(results["test_b"].status, CheckStatus::Pass);
    }

    #[test]
    fn test_setup_failure_fails_everything_and_skips_teardown() {
        let a = passing(CheckMetadata::new("test_a"));
        let b = passing(CheckMetadata::new("test_b"));
        let teardown_ran = Arc::new(AtomicU32::new(0));
        let seen = teardown_ran.clone();

        let setup: Hook = Box::new(|_| Err(CheckFailure::new("no credentials")));
        let teardown: Hook = Box::new(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        let results = execute(
            &[&a, &b],
            BTreeMap::new(),
            &ExecutionContext::default(),
            Some(&setup),
            Some(&teardown),
            false,
        );

        assert_eq!(results.len(), 2);
        for result in results.values() {
            assert_eq!(result.status, CheckStatus::Fail);
            assert_eq!(result.message, "no credentials");
        }
        assert_eq!(teardown_ran.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_setup_failure_preserves_recorded_skips() {
        let a = passing(CheckMetadata::new("test_a"));
        let mut recorded = BTreeMap::new();
        recorded.insert("test_skipped".to_string(), CheckResult::skipped("off"));

        let setup: Hook = Box::new(|_| Err(CheckFailure::new("bad auth")));
        let results = execute(
            &[&a],
            recorded,
            &ExecutionContext::default(),
            Some(&setup),
            None,
            false,
        );

        assert_eq!(results["test_skipped"].status, CheckStatus::Skipped);
        assert_eq!(results["test_a"].status, CheckStatus::Fail);
    }

    #[test]
    fn test_teardown_failure_adds_synthetic_entry() {
        let a = passing(CheckMetadata::new("test_a"));
        let teardown: Hook = Box::new(|_| Err(CheckFailure::new("session leak")));

        let results = execute(
            &[&a],
            BTreeMap::new(),
            &ExecutionContext::default(),
            None,
            Some(&teardown),
            false,
        );

        assert_eq!(results["test_a"].status, CheckStatus::Pass);
        assert_eq!(results["teardown"].status, CheckStatus::Fail);
        assert_eq!(results["teardown"].message, "session leak");
    }

    #[test]
    fn test_elapsed_accumulates_over_attempts() {
        let a = entry(
            CheckMetadata::new("test_a").repeat(3),
            Box::new(|_| {
                std::thread::sleep(Duration::from_millis(5));
                Ok(())
            }),
        );
        let results = run(&[&a]);
        assert!(results["test_a"].elapsed_secs >= 0.015);
    }
}
