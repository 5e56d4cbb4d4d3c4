//! Per-check metadata: the static attributes attached to a check
//!
//! The original decorator model (flags stored on the callable) becomes an
//! explicit value registered alongside the check body. Metadata is defined
//! once with the suite and immutable afterwards.

use serde::{Deserialize, Serialize};

/// Static attributes of a single check
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CheckMetadata {
    /// Check name, unique within the suite
    pub name: String,
    /// Name of the check that must reach a terminal status first
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depends_on: Option<String>,
    /// Skip this check (and, transitively, its dependents)
    #[serde(default)]
    pub skip: bool,
    /// Optional reason recorded with the skip
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_reason: Option<String>,
    /// Number of attempts that must all succeed (conjunctive, >= 1)
    #[serde(default = "default_repeat")]
    pub repeat_count: u32,
    /// Delay in seconds before each attempt after the first (>= 0)
    #[serde(default)]
    pub repeat_delay_secs: f64,
    /// Invert the structural pass/fail outcome
    #[serde(default)]
    pub expected_failure: bool,
}

fn default_repeat() -> u32 {
    1
}

impl CheckMetadata {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            depends_on: None,
            skip: false,
            skip_reason: None,
            repeat_count: 1,
            repeat_delay_secs: 0.0,
            expected_failure: false,
        }
    }

    /// Require another check to reach a terminal status before this one runs
    pub fn depends_on(mut self, name: impl Into<String>) -> Self {
        self.depends_on = Some(name.into());
        self
    }

    /// Skip this check without a reason
    pub fn skip(mut self) -> Self {
        self.skip = true;
        self
    }

    /// Skip this check, recording the given reason
    pub fn skip_because(mut self, reason: impl Into<String>) -> Self {
        self.skip = true;
        self.skip_reason = Some(reason.into());
        self
    }

    /// Run the check `count` times; all attempts must succeed.
    ///
    /// A count of zero is clamped to one.
    pub fn repeat(mut self, count: u32) -> Self {
        self.repeat_count = count.max(1);
        self
    }

    /// Like [`repeat`](Self::repeat), sleeping `delay_secs` before each
    /// attempt after the first. Negative delays are clamped to zero.
    pub fn repeat_with_delay(mut self, count: u32, delay_secs: f64) -> Self {
        self.repeat_count = count.max(1);
        self.repeat_delay_secs = delay_secs.max(0.0);
        self
    }

    /// Mark the check as expected to fail
    pub fn expected_failure(mut self) -> Self {
        self.expected_failure = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let meta = CheckMetadata::new("test_ping");
        assert_eq!(meta.name, "test_ping");
        assert!(meta.depends_on.is_none());
        assert!(!meta.skip);
        assert_eq!(meta.repeat_count, 1);
        assert_eq!(meta.repeat_delay_secs, 0.0);
        assert!(!meta.expected_failure);
    }

    #[test]
    fn test_builder_chain() {
        let meta = CheckMetadata::new("test_routes")
            .depends_on("test_connect")
            .repeat_with_delay(3, 0.5)
            .expected_failure();

        assert_eq!(meta.depends_on.as_deref(), Some("test_connect"));
        assert_eq!(meta.repeat_count, 3);
        assert_eq!(meta.repeat_delay_secs, 0.5);
        assert!(meta.expected_failure);
    }

    #[test]
    fn test_skip_with_reason() {
        let meta = CheckMetadata::new("test_bgp").skip_because("no BGP on this device");
        assert!(meta.skip);
        assert_eq!(meta.skip_reason.as_deref(), Some("no BGP on this device"));
    }

    #[test]
    fn test_repeat_clamps_to_one() {
        let meta = CheckMetadata::new("test_x").repeat(0);
        assert_eq!(meta.repeat_count, 1);

        let meta = CheckMetadata::new("test_y").repeat_with_delay(2, -1.0);
        assert_eq!(meta.repeat_delay_secs, 0.0);
    }
}
