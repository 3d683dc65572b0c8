use crate::error::{ChangeError, PropertyVetoError};
use crate::event::PropertyChangeEvent;
use crate::listener::{
    ExceptionListener, PropertyChangeListener, TracingExceptionListener, VetoableChangeListener,
};
use beans_domain::config::{ChangeConfig, DuplicatePolicy, VetoEventPolicy};
use beans_domain::id::BeanId;
use beans_domain::value::Value;
use parking_lot::RwLock;
use std::error::Error;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Outcome of consulting the vetoable listeners about one proposed change.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub enum Verdict {
    /// Every consulted listener returned normally.
    Accepted,
    /// A listener rejected the change; later listeners were not consulted.
    Rejected(PropertyVetoError),
}

impl Verdict {
    #[must_use]
    pub const fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }

    /// Converts the verdict into the caller-facing contract.
    ///
    /// # Errors
    /// Returns the [`PropertyVetoError`] of a rejected verdict.
    pub fn into_result(self) -> Result<(), PropertyVetoError> {
        match self {
            Self::Accepted => Ok(()),
            Self::Rejected(veto) => Err(veto),
        }
    }
}

/// One entry of a listener list: the listener and the property it watches
/// (`None` watches every property).
struct Registration<L: ?Sized> {
    scope: Option<Arc<str>>,
    listener: Arc<L>,
}

impl<L: ?Sized> Clone for Registration<L> {
    fn clone(&self) -> Self {
        Self { scope: self.scope.clone(), listener: Arc::clone(&self.listener) }
    }
}

impl<L: ?Sized> Registration<L> {
    fn is(&self, scope: Option<&str>, listener: &Arc<L>) -> bool {
        self.scope.as_deref() == scope
            && std::ptr::addr_eq(Arc::as_ptr(&self.listener), Arc::as_ptr(listener))
    }

    fn applies_to(&self, property: Option<&str>) -> bool {
        match (&self.scope, property) {
            (None, _) => true,
            (Some(scope), Some(property)) => scope.as_ref() == property,
            (Some(_), None) => false,
        }
    }
}

/// Copy-on-write listener list.
///
/// Dispatch clones the inner `Arc` and releases the lock before calling anyone, so a
/// listener may register or unregister during its own notification without affecting
/// the round in flight and without deadlocking.
struct Registry<L: ?Sized> {
    entries: RwLock<Arc<Vec<Registration<L>>>>,
}

impl<L: ?Sized> Default for Registry<L> {
    fn default() -> Self {
        Self { entries: RwLock::new(Arc::new(Vec::new())) }
    }
}

impl<L: ?Sized> Registry<L> {
    fn snapshot(&self) -> Arc<Vec<Registration<L>>> {
        Arc::clone(&self.entries.read())
    }

    /// Listeners the given property's events reach, in registration order.
    fn targets(&self, property: Option<&str>) -> Vec<Arc<L>> {
        self.snapshot()
            .iter()
            .filter(|r| r.applies_to(property))
            .map(|r| Arc::clone(&r.listener))
            .collect()
    }

    fn add(&self, scope: Option<Arc<str>>, listener: Arc<L>, policy: DuplicatePolicy) -> bool {
        let mut entries = self.entries.write();
        if policy == DuplicatePolicy::Once
            && entries.iter().any(|r| r.is(scope.as_deref(), &listener))
        {
            return false;
        }
        // Clones the list only if a dispatch still holds the previous snapshot.
        Arc::make_mut(&mut entries).push(Registration { scope, listener });
        true
    }

    fn remove(&self, scope: Option<&str>, listener: &Arc<L>) -> bool {
        let mut entries = self.entries.write();
        let Some(index) = entries.iter().position(|r| r.is(scope, listener)) else {
            return false;
        };
        Arc::make_mut(&mut entries).remove(index);
        true
    }

    fn len(&self) -> usize {
        self.entries.read().len()
    }

    fn any_for(&self, property: Option<&str>) -> bool {
        self.entries.read().iter().any(|r| r.applies_to(property))
    }
}

/// Listener lists and dispatch for the bound and constrained properties of one bean.
///
/// Each bean owns its own `ChangeSupport`; nothing is shared process-wide. Dispatch is
/// synchronous on the calling thread and follows registration order.
///
/// # Example
///
/// ```rust
/// use beans_change::{ChangeSupport, PropertyChangeEvent, PropertyVetoError};
/// use std::sync::Arc;
///
/// let support = ChangeSupport::new("slider:1");
/// support.add_vetoable_change_listener(Arc::new(|event: &PropertyChangeEvent| {
///     match event.new_value().as_int() {
///         Some(v) if v > 100 => Err(PropertyVetoError::new("above maximum", event.clone())),
///         _ => Ok(()),
///     }
/// }));
///
/// assert!(support.fire_vetoable_change("value", 10, 50).is_ok());
/// let veto = support.fire_vetoable_change("value", 50, 101).unwrap_err();
/// assert_eq!(veto.event().property_name(), Some("value"));
/// ```
pub struct ChangeSupport {
    source: BeanId,
    config: ChangeConfig,
    bound: Registry<dyn PropertyChangeListener>,
    constrained: Registry<dyn VetoableChangeListener>,
    exceptions: Registry<dyn ExceptionListener>,
}

impl fmt::Debug for ChangeSupport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeSupport")
            .field("source", &self.source)
            .field("config", &self.config)
            .field("property_change_listeners", &self.bound.len())
            .field("vetoable_change_listeners", &self.constrained.len())
            .field("exception_listeners", &self.exceptions.len())
            .finish()
    }
}

impl ChangeSupport {
    /// Creates support for the bean identified by `source`, with default settings.
    pub fn new(source: impl Into<BeanId>) -> Self {
        Self::with_config(source, ChangeConfig::default())
    }

    /// Creates support for `source` with explicit dispatch settings.
    pub fn with_config(source: impl Into<BeanId>, config: ChangeConfig) -> Self {
        Self {
            source: source.into(),
            config,
            bound: Registry::default(),
            constrained: Registry::default(),
            exceptions: Registry::default(),
        }
    }

    #[must_use]
    pub const fn source(&self) -> &BeanId {
        &self.source
    }

    #[must_use]
    pub const fn config(&self) -> &ChangeConfig {
        &self.config
    }

    // --- Registration ---

    /// Registers a listener for every bound property.
    ///
    /// Returns `false` when the duplicate policy skipped the registration.
    pub fn add_property_change_listener(&self, listener: Arc<dyn PropertyChangeListener>) -> bool {
        self.register_bound(None, listener)
    }

    /// Registers a listener for a single named property.
    pub fn add_property_change_listener_for(
        &self,
        property: impl Into<Arc<str>>,
        listener: Arc<dyn PropertyChangeListener>,
    ) -> bool {
        self.register_bound(Some(property.into()), listener)
    }

    /// Removes one all-properties registration of `listener`.
    pub fn remove_property_change_listener(
        &self,
        listener: &Arc<dyn PropertyChangeListener>,
    ) -> bool {
        self.bound.remove(None, listener)
    }

    /// Removes one registration of `listener` scoped to `property`.
    pub fn remove_property_change_listener_for(
        &self,
        property: &str,
        listener: &Arc<dyn PropertyChangeListener>,
    ) -> bool {
        self.bound.remove(Some(property), listener)
    }

    /// Registers a listener consulted before any constrained property changes.
    pub fn add_vetoable_change_listener(&self, listener: Arc<dyn VetoableChangeListener>) -> bool {
        self.register_constrained(None, listener)
    }

    /// Registers a vetoable listener consulted only for `property`.
    pub fn add_vetoable_change_listener_for(
        &self,
        property: impl Into<Arc<str>>,
        listener: Arc<dyn VetoableChangeListener>,
    ) -> bool {
        self.register_constrained(Some(property.into()), listener)
    }

    /// Removes one all-properties registration of `listener`.
    pub fn remove_vetoable_change_listener(
        &self,
        listener: &Arc<dyn VetoableChangeListener>,
    ) -> bool {
        self.constrained.remove(None, listener)
    }

    /// Removes one registration of `listener` scoped to `property`.
    pub fn remove_vetoable_change_listener_for(
        &self,
        property: &str,
        listener: &Arc<dyn VetoableChangeListener>,
    ) -> bool {
        self.constrained.remove(Some(property), listener)
    }

    /// Registers an observer for failures passed to [`Self::report_exception`].
    pub fn add_exception_listener(&self, listener: Arc<dyn ExceptionListener>) -> bool {
        self.exceptions.add(None, listener, self.config.duplicates)
    }

    /// Removes one registration of an exception listener.
    pub fn remove_exception_listener(&self, listener: &Arc<dyn ExceptionListener>) -> bool {
        self.exceptions.remove(None, listener)
    }

    /// Whether any bound or vetoable listener would hear about `property`.
    /// `None` asks about events that do not name a property.
    #[must_use]
    pub fn has_listeners(&self, property: Option<&str>) -> bool {
        self.bound.any_for(property) || self.constrained.any_for(property)
    }

    #[must_use]
    pub fn property_change_listener_count(&self) -> usize {
        self.bound.len()
    }

    #[must_use]
    pub fn vetoable_change_listener_count(&self) -> usize {
        self.constrained.len()
    }

    fn register_bound(
        &self,
        scope: Option<Arc<str>>,
        listener: Arc<dyn PropertyChangeListener>,
    ) -> bool {
        let added = self.bound.add(scope.clone(), listener, self.config.duplicates);
        trace!(bean = %self.source, property = scope.as_deref(), added, "Property change listener registration");
        added
    }

    fn register_constrained(
        &self,
        scope: Option<Arc<str>>,
        listener: Arc<dyn VetoableChangeListener>,
    ) -> bool {
        let added = self.constrained.add(scope.clone(), listener, self.config.duplicates);
        trace!(bean = %self.source, property = scope.as_deref(), added, "Vetoable change listener registration");
        added
    }

    // --- Vetoable stage ---

    /// Consults the vetoable listeners about `event` without touching any state.
    ///
    /// Listeners are taken from a snapshot made when the call starts and are invoked in
    /// registration order. The first rejection ends the round: later listeners are not
    /// consulted, and (when `revert_on_veto` is set) the listeners that already accepted
    /// are shown [`PropertyChangeEvent::reverted`]. The returned veto always carries
    /// `event` itself unless the [`VetoEventPolicy::Preserve`] policy is configured.
    pub fn propose(&self, event: &PropertyChangeEvent) -> Verdict {
        if event.is_noop() {
            trace!(bean = %self.source, property = event.property_name(), "Proposal skipped: value unchanged");
            return Verdict::Accepted;
        }

        let listeners = self.constrained.targets(event.property_name());
        trace!(bean = %self.source, property = event.property_name(), listeners = listeners.len(), "Proposing change");

        for (index, listener) in listeners.iter().enumerate() {
            if let Err(veto) = listener.vetoable_change(event) {
                let veto = self.reconcile(event, veto);
                debug!(
                    bean = %self.source,
                    property = event.property_name(),
                    listener = index,
                    reason = veto.message(),
                    "Change vetoed"
                );
                if self.config.revert_on_veto {
                    self.revert(event, &listeners[..index]);
                }
                return Verdict::Rejected(veto);
            }
        }

        Verdict::Accepted
    }

    /// Builds an event for `property` and consults the vetoable listeners.
    ///
    /// # Errors
    /// Returns [`PropertyVetoError`] carrying the proposed event when a listener rejects it.
    pub fn fire_vetoable_change(
        &self,
        property: impl Into<Arc<str>>,
        old_value: impl Into<Value>,
        new_value: impl Into<Value>,
    ) -> Result<(), PropertyVetoError> {
        let event = PropertyChangeEvent::new(self.source.clone(), property, old_value, new_value);
        self.propose(&event).into_result()
    }

    /// # Errors
    /// Returns [`PropertyVetoError`] when a listener rejects `event`.
    pub fn fire_vetoable_change_event(
        &self,
        event: &PropertyChangeEvent,
    ) -> Result<(), PropertyVetoError> {
        self.propose(event).into_result()
    }

    /// Runs one constrained mutation end to end.
    ///
    /// `commit` is called only after every vetoable listener accepted, and the committed
    /// event is then announced to property change listeners. On rejection `commit` never
    /// runs, so the bean's observable state is exactly what it was before the call.
    ///
    /// # Errors
    /// Returns [`PropertyVetoError`] carrying the proposed event when a listener rejects it.
    pub fn apply_vetoable<F>(
        &self,
        property: impl Into<Arc<str>>,
        old_value: impl Into<Value>,
        new_value: impl Into<Value>,
        commit: F,
    ) -> Result<(), PropertyVetoError>
    where
        F: FnOnce(),
    {
        let event = PropertyChangeEvent::new(self.source.clone(), property, old_value, new_value);
        self.apply_vetoable_event(&event, commit)
    }

    /// # Errors
    /// Returns [`PropertyVetoError`] when a listener rejects `event`.
    pub fn apply_vetoable_event<F>(
        &self,
        event: &PropertyChangeEvent,
        commit: F,
    ) -> Result<(), PropertyVetoError>
    where
        F: FnOnce(),
    {
        self.propose(event).into_result()?;
        commit();
        debug!(bean = %self.source, property = event.property_name(), value = %event.new_value(), "Change committed");
        self.fire_property_change_event(event);
        Ok(())
    }

    fn reconcile(&self, event: &PropertyChangeEvent, veto: PropertyVetoError) -> PropertyVetoError {
        if veto.event() == event {
            return veto;
        }

        warn!(
            bean = %self.source,
            property = event.property_name(),
            policy = ?self.config.veto_event,
            "Listener vetoed with an event other than the one it was given"
        );
        let mismatch = ChangeError::MismatchedVetoEvent {
            message: format!(
                "expected {:?}, listener raised {:?}",
                event.property_name(),
                veto.event().property_name()
            )
            .into(),
            context: Some(self.source.to_string().into()),
        };
        self.report_exception(&mismatch);

        match self.config.veto_event {
            VetoEventPolicy::Substitute => veto.with_event(event.clone()),
            VetoEventPolicy::Preserve => veto,
        }
    }

    fn revert(&self, event: &PropertyChangeEvent, accepted: &[Arc<dyn VetoableChangeListener>]) {
        if accepted.is_empty() {
            return;
        }
        let reverted = event.reverted();
        trace!(bean = %self.source, property = event.property_name(), listeners = accepted.len(), "Reverting vetoed change");

        for listener in accepted {
            if let Err(veto) = listener.vetoable_change(&reverted) {
                let error = ChangeError::RevertVetoed {
                    message: veto.message().to_owned().into(),
                    context: Some(self.source.to_string().into()),
                };
                self.report_exception(&error);
            }
        }
    }

    // --- Bound stage ---

    /// Announces an already-committed change to property change listeners.
    ///
    /// Returns the number of listeners notified.
    pub fn fire_property_change(
        &self,
        property: impl Into<Arc<str>>,
        old_value: impl Into<Value>,
        new_value: impl Into<Value>,
    ) -> usize {
        let event = PropertyChangeEvent::new(self.source.clone(), property, old_value, new_value);
        self.fire_property_change_event(&event)
    }

    pub fn fire_property_change_event(&self, event: &PropertyChangeEvent) -> usize {
        if event.is_noop() {
            return 0;
        }

        let listeners = self.bound.targets(event.property_name());
        for listener in &listeners {
            listener.property_change(event);
        }
        trace!(bean = %self.source, property = event.property_name(), count = listeners.len(), "Property change dispatched");
        listeners.len()
    }

    // --- Recovered failures ---

    /// Hands a failure the host recovered from to every exception listener.
    ///
    /// Best-effort: nothing is returned to the host. When no listener is registered the
    /// failure is logged through [`TracingExceptionListener`].
    pub fn report_exception(&self, error: &(dyn Error + 'static)) {
        let listeners = self.exceptions.targets(None);
        if listeners.is_empty() {
            TracingExceptionListener.exception_thrown(error);
            return;
        }
        for listener in &listeners {
            listener.exception_thrown(error);
        }
    }
}
