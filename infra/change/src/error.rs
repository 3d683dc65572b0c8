use crate::event::PropertyChangeEvent;
use std::borrow::Cow;

/// A listener's rejection of a proposed change.
///
/// This is the only sanctioned way to reject a change. The rejected event is fixed at
/// construction, so the caller can always see which source, property and values were refused.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Property change vetoed ({property}: {old} -> {new}): {message}",
    property = .event.property_name().unwrap_or("*"),
    old = .event.old_value(),
    new = .event.new_value())]
pub struct PropertyVetoError {
    message: Cow<'static, str>,
    event: PropertyChangeEvent,
}

impl PropertyVetoError {
    pub fn new(message: impl Into<Cow<'static, str>>, event: PropertyChangeEvent) -> Self {
        Self { message: message.into(), event }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The exact event that was rejected.
    #[must_use]
    pub const fn event(&self) -> &PropertyChangeEvent {
        &self.event
    }

    #[must_use]
    pub fn into_event(self) -> PropertyChangeEvent {
        self.event
    }

    /// Same message, different event. Used when a listener vetoed with the wrong event.
    pub(crate) fn with_event(&self, event: PropertyChangeEvent) -> Self {
        Self { message: self.message.clone(), event }
    }
}

/// Failures raised or reported by the change crate.
#[beans_derive::beans_error]
pub enum ChangeError {
    /// A proposed change was rejected.
    #[error("Change rejected{}: {source}", format_context(.context))]
    Vetoed {
        #[source]
        source: PropertyVetoError,
        context: Option<Cow<'static, str>>,
    },

    /// A listener vetoed with an event other than the one it was handed.
    #[error("Veto event mismatch{}: {message}", format_context(.context))]
    MismatchedVetoEvent { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A listener tried to veto the revert of an already-vetoed change; ignored.
    #[error("Revert vetoed{}: {message}", format_context(.context))]
    RevertVetoed { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Capacity must be greater than zero for the change feed.
    #[error("Invalid capacity{}: {message}", format_context(.context))]
    InvalidCapacity { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Internal fallback for unexpected issues.
    #[error("Internal change error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
