use tracing::warn;

use crate::error::Error;

/// Receives failures caught at the get/set boundary of a member reference.
pub trait Diagnostics {
    fn report(&self, failure: &Error);
}

/// Default sink, logs through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn report(&self, failure: &Error) {
        warn!(error = %failure, "member reference operation failed");
    }
}

impl<F> Diagnostics for F
where
    F: Fn(&Error),
{
    fn report(&self, failure: &Error) {
        self(failure);
    }
}
