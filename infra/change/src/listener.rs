use crate::error::PropertyVetoError;
use crate::event::PropertyChangeEvent;
use std::error::Error;
use tracing::warn;

/// Observer of bound properties, told about a change after it has committed.
///
/// It cannot reject anything. Panics are not caught by the dispatcher and surface
/// to whoever triggered the change.
pub trait PropertyChangeListener: Send + Sync {
    fn property_change(&self, event: &PropertyChangeEvent);
}

/// Observer of constrained properties, consulted before a change commits.
///
/// Returning `Ok(())` accepts the proposal. Returning a [`PropertyVetoError`] built from
/// the same event rejects it; no later listener is consulted and the value stays put.
pub trait VetoableChangeListener: Send + Sync {
    /// # Errors
    /// Returns [`PropertyVetoError`] to reject the proposed change.
    fn vetoable_change(&self, event: &PropertyChangeEvent) -> Result<(), PropertyVetoError>;
}

/// Observer of failures a host recovered from instead of propagating.
pub trait ExceptionListener: Send + Sync {
    fn exception_thrown(&self, error: &(dyn Error + 'static));
}

impl<F> PropertyChangeListener for F
where
    F: Fn(&PropertyChangeEvent) + Send + Sync,
{
    fn property_change(&self, event: &PropertyChangeEvent) {
        self(event);
    }
}

impl<F> VetoableChangeListener for F
where
    F: Fn(&PropertyChangeEvent) -> Result<(), PropertyVetoError> + Send + Sync,
{
    fn vetoable_change(&self, event: &PropertyChangeEvent) -> Result<(), PropertyVetoError> {
        self(event)
    }
}

impl<F> ExceptionListener for F
where
    F: Fn(&(dyn Error + 'static)) + Send + Sync,
{
    fn exception_thrown(&self, error: &(dyn Error + 'static)) {
        self(error);
    }
}

/// Logs every recovered failure at `warn` level, including its source chain.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingExceptionListener;

impl ExceptionListener for TracingExceptionListener {
    fn exception_thrown(&self, error: &(dyn Error + 'static)) {
        let mut causes = Vec::new();
        let mut next = error.source();
        while let Some(cause) = next {
            causes.push(cause.to_string());
            next = cause.source();
        }
        warn!(%error, ?causes, "Recovered failure reported");
    }
}
