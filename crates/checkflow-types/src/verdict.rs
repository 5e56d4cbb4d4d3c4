//! Verdict conversion: what a check body is allowed to return
//!
//! The original contract accepted a boolean, a void return (implicit pass),
//! or a raised error. [`IntoVerdict`] expresses the same contract in types:
//! any body returning `bool`, `()`, or a `Result` over those converts into
//! a single attempt outcome. Returning anything else is rejected at compile
//! time instead of at run time.

use crate::CheckFailure;

/// Conversion from a check body's return value into an attempt outcome.
///
/// `Ok(())` is a passed attempt; `Err` carries the failure message that
/// gets recorded.
pub trait IntoVerdict {
    fn into_verdict(self) -> Result<(), CheckFailure>;
}

/// `true` passes, `false` fails
impl IntoVerdict for bool {
    fn into_verdict(self) -> Result<(), CheckFailure> {
        if self {
            Ok(())
        } else {
            Err(CheckFailure::new("check returned false"))
        }
    }
}

/// A void return is an implicit pass
impl IntoVerdict for () {
    fn into_verdict(self) -> Result<(), CheckFailure> {
        Ok(())
    }
}

/// An `Err` is a failed attempt carrying the error's message
impl<E: std::fmt::Display> IntoVerdict for Result<bool, E> {
    fn into_verdict(self) -> Result<(), CheckFailure> {
        match self {
            Ok(passed) => passed.into_verdict(),
            Err(e) => Err(CheckFailure::new(e.to_string())),
        }
    }
}

impl<E: std::fmt::Display> IntoVerdict for Result<(), E> {
    fn into_verdict(self) -> Result<(), CheckFailure> {
        self.map_err(|e| CheckFailure::new(e.to_string()))
    }
}
