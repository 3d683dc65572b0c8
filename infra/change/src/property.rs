//! Ready-made property cells that drive [`ChangeSupport`] correctly.
//!
//! A bean stores each observable field in a [`Bound`] or [`Constrained`] cell and
//! forwards its setters to them. The cells guarantee the ordering the protocol relies
//! on: constrained values are written only after every vetoable listener accepted,
//! and bound listeners only run once the new value is readable.

use crate::error::PropertyVetoError;
use crate::support::ChangeSupport;
use beans_domain::value::Value;
use parking_lot::{ReentrantMutex, RwLock};
use std::sync::Arc;

/// A property whose changes are announced after they commit.
#[derive(Debug)]
pub struct Bound<T> {
    name: Arc<str>,
    value: RwLock<T>,
}

impl<T> Bound<T>
where
    T: Clone + PartialEq + Into<Value>,
{
    pub fn new(name: impl Into<Arc<str>>, initial: T) -> Self {
        Self { name: name.into(), value: RwLock::new(initial) }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn get(&self) -> T {
        self.value.read().clone()
    }

    /// Stores `new` and announces the change. Returns the previous value.
    pub fn set(&self, support: &ChangeSupport, new: T) -> T {
        let old = std::mem::replace(&mut *self.value.write(), new.clone());
        support.fire_property_change(Arc::clone(&self.name), old.clone(), new);
        old
    }
}

/// A property whose changes may be vetoed before they commit.
///
/// The write lock is taken only for the commit itself, never across listener calls,
/// so listeners may read the property (or any other) while being consulted.
///
/// Concurrent `set` calls on one cell are serialised: each proposal is built from the
/// value committed by the previous one. The guard is reentrant, so a listener may call
/// `set` on the same cell from the dispatching thread.
#[derive(Debug)]
pub struct Constrained<T> {
    name: Arc<str>,
    value: RwLock<T>,
    mutation: ReentrantMutex<()>,
}

impl<T> Constrained<T>
where
    T: Clone + PartialEq + Into<Value>,
{
    pub fn new(name: impl Into<Arc<str>>, initial: T) -> Self {
        Self { name: name.into(), value: RwLock::new(initial), mutation: ReentrantMutex::new(()) }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn get(&self) -> T {
        self.value.read().clone()
    }

    /// Proposes `new`, commits it if nobody objects, then announces it.
    ///
    /// # Errors
    /// Returns [`PropertyVetoError`] if a vetoable listener rejected the change; the stored
    /// value is then untouched.
    pub fn set(&self, support: &ChangeSupport, new: T) -> Result<(), PropertyVetoError> {
        let _mutation = self.mutation.lock();
        let old = self.get();
        if old == new {
            return Ok(());
        }
        support.apply_vetoable(Arc::clone(&self.name), old, new.clone(), || {
            *self.value.write() = new;
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::PropertyChangeEvent;

    #[test]
    fn bound_returns_previous_value() {
        let support = ChangeSupport::new("bean:1");
        let label = Bound::new("label", String::from("a"));
        assert_eq!(label.set(&support, String::from("b")), "a");
        assert_eq!(label.get(), "b");
    }

    #[test]
    fn listener_may_set_the_same_cell_reentrantly() {
        let support = Arc::new(ChangeSupport::new("bean:1"));
        let width = Arc::new(Constrained::new("width", 0_i32));

        let (host, cell) = (Arc::clone(&support), Arc::clone(&width));
        support.add_property_change_listener(Arc::new(move |event: &PropertyChangeEvent| {
            if event.new_value().as_int() == Some(5) {
                cell.set(&host, 6).unwrap();
            }
        }));

        width.set(&support, 5).unwrap();
        assert_eq!(width.get(), 6);
    }

    #[test]
    fn constrained_equal_value_skips_listeners() {
        let support = ChangeSupport::new("bean:1");
        support.add_vetoable_change_listener(Arc::new(|event: &PropertyChangeEvent| {
            Err(PropertyVetoError::new("never", event.clone()))
        }));

        let width = Constrained::new("width", 10_i32);
        assert!(width.set(&support, 10).is_ok());
        assert!(width.set(&support, 11).is_err());
        assert_eq!(width.get(), 10);
    }
}
