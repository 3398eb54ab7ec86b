//! Bounded retry with relaxed verification.
//!
//! Some package installs fail for reasons a single, less strict attempt
//! resolves (a vendor re-uploaded a binary and the package checksum went
//! stale). [`with_relaxed_retry`] runs the operation strictly, and at most
//! once more in relaxed mode when the caller's predicate asks for it.

use crate::error::Result;

/// Which attempt is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attempt {
    /// First attempt, full verification.
    Strict,
    /// The single retry, with verification relaxed.
    Relaxed,
}

impl Attempt {
    /// Whether this is the relaxed retry.
    #[must_use]
    pub fn is_relaxed(&self) -> bool {
        matches!(self, Self::Relaxed)
    }
}

/// Run `operation` strictly, then at most once relaxed.
///
/// The relaxed attempt only happens when the strict attempt returned
/// `Ok(value)` and `should_relax(&value)` is true. Errors (spawn failures,
/// timeouts) are returned as-is without a retry.
pub fn with_relaxed_retry<T, F, P>(mut operation: F, should_relax: P) -> Result<T>
where
    F: FnMut(Attempt) -> Result<T>,
    P: Fn(&T) -> bool,
{
    let first = operation(Attempt::Strict)?;
    if !should_relax(&first) {
        return Ok(first);
    }

    log::warn!("Retrying once with relaxed verification");
    operation(Attempt::Relaxed)
}
