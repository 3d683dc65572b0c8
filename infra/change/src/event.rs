use beans_domain::id::BeanId;
use beans_domain::value::Value;
use std::sync::Arc;

/// An immutable record of one proposed or committed property change.
///
/// Created by the mutating bean and lent to listeners for the duration of a dispatch.
/// A listener that needs it afterwards clones it; the clone is equal by value.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyChangeEvent {
    source: BeanId,
    property_name: Option<Arc<str>>,
    old_value: Value,
    new_value: Value,
}

impl PropertyChangeEvent {
    pub fn new(
        source: BeanId,
        property_name: impl Into<Arc<str>>,
        old_value: impl Into<Value>,
        new_value: impl Into<Value>,
    ) -> Self {
        Self {
            source,
            property_name: Some(property_name.into()),
            old_value: old_value.into(),
            new_value: new_value.into(),
        }
    }

    /// An event that does not name a property: an unspecified set of properties changed.
    /// Only listeners registered for all properties receive it.
    pub fn unnamed(source: BeanId, old_value: impl Into<Value>, new_value: impl Into<Value>) -> Self {
        Self { source, property_name: None, old_value: old_value.into(), new_value: new_value.into() }
    }

    #[must_use]
    pub const fn source(&self) -> &BeanId {
        &self.source
    }

    #[must_use]
    pub fn property_name(&self) -> Option<&str> {
        self.property_name.as_deref()
    }

    #[must_use]
    pub const fn old_value(&self) -> &Value {
        &self.old_value
    }

    #[must_use]
    pub const fn new_value(&self) -> &Value {
        &self.new_value
    }

    /// The same change run backwards, sent to listeners that accepted a change that was
    /// later vetoed.
    #[must_use]
    pub fn reverted(&self) -> Self {
        Self {
            source: self.source.clone(),
            property_name: self.property_name.clone(),
            old_value: self.new_value.clone(),
            new_value: self.old_value.clone(),
        }
    }

    /// Equal non-null values mean nothing changed and nobody is notified.
    /// Two nulls still count as a change, since null carries no information.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        !self.old_value.is_null() && self.old_value == self.new_value
    }
}
