//! # Change Notification
//!
//! Bound and constrained property support for inspectable components ("beans").
//!
//! ## Overview
//!
//! A bean owns one [`ChangeSupport`] and fires through it whenever an observable property
//! changes. Two kinds of observer can register:
//!
//! * [`VetoableChangeListener`]s are consulted *before* a constrained property changes and
//!   may reject the proposal with a [`PropertyVetoError`].
//! * [`PropertyChangeListener`]s are told *after* a bound property changed and cannot object.
//!
//! A constrained mutation moves from proposed to either accepted (value written, then
//! announced) or rejected (value untouched, veto returned to the caller). Failures a host
//! recovers from can be handed to [`ExceptionListener`]s.
//!
//! ## Features
//!
//! * **Registration order**: every dispatch follows the order listeners were added.
//! * **Snapshot dispatch**: registering or removing listeners mid-dispatch never affects
//!   the round in flight.
//! * **Short-circuit veto**: the first rejection ends the round.
//! * **Async feed**: committed changes can be fanned out through `tokio` with [`ChangeFeed`].
//!
//! # Example
//!
//! ```rust
//! use beans_change::{ChangeSupport, Constrained, PropertyChangeEvent, PropertyVetoError};
//! use std::sync::Arc;
//!
//! let support = ChangeSupport::new("form:1");
//! support.add_vetoable_change_listener(Arc::new(|event: &PropertyChangeEvent| {
//!     if event.new_value().as_text().is_some_and(str::is_empty) {
//!         return Err(PropertyVetoError::new("name must not be empty", event.clone()));
//!     }
//!     Ok(())
//! }));
//!
//! let name = Constrained::new("name", String::from("Ada"));
//! assert!(name.set(&support, String::new()).is_err());
//! assert_eq!(name.get(), "Ada");
//!
//! name.set(&support, String::from("Grace")).unwrap();
//! assert_eq!(name.get(), "Grace");
//! ```

mod error;
mod event;
mod feed;
mod listener;
mod property;
mod support;

pub use error::{ChangeError, ChangeErrorExt, PropertyVetoError};
pub use event::PropertyChangeEvent;
pub use feed::{ChangeFeed, ChangeReceiverExt};
pub use listener::{
    ExceptionListener, PropertyChangeListener, TracingExceptionListener, VetoableChangeListener,
};
pub use property::{Bound, Constrained};
pub use support::{ChangeSupport, Verdict};
