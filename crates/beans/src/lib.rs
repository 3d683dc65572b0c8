//! Facade crate for inspectable components.
//! Re-exports domain/kernel primitives and the change protocol, and wires configuration into them.
//! Keep this crate thin: it should compose other crates, not implement business logic.
//!
//! ## Usage
//! - Load a [`domain::config::BeansConfig`] with `kernel::config::load_config` (or use the default).
//! - Give every bean a [`change::ChangeSupport`] built by [`change_support`].
//! - `use beans::prelude::*;` brings the descriptor, listener and visibility types into scope.

pub use beans_change as change;
pub use beans_domain as domain;
pub use beans_kernel as kernel;

use beans_change::{ChangeError, ChangeFeed, ChangeSupport};
use beans_domain::config::BeansConfig;
use std::sync::Arc;

/// Commonly used types in one import.
pub mod prelude {
    pub use beans_change::{
        Bound, ChangeFeed, ChangeReceiverExt, ChangeSupport, Constrained, ExceptionListener,
        PropertyChangeEvent, PropertyChangeListener, PropertyVetoError, Verdict,
        VetoableChangeListener,
    };
    pub use beans_domain::descriptor::{
        BeanDescriptor, FeatureDescriptor, FeatureFlags, MethodDescriptor, ParameterDescriptor,
        PropertyDescriptor,
    };
    pub use beans_domain::id::BeanId;
    pub use beans_domain::value::Value;
    pub use beans_kernel::bean_id;
    pub use beans_kernel::introspection::{BeanInfo, Introspect, IntrospectionError};
    pub use beans_kernel::visibility::{GuiAvoidance, Visibility};
}

/// Change support for a new bean of `kind`, configured from `config`.
#[must_use]
pub fn change_support(kind: &str, config: &BeansConfig) -> ChangeSupport {
    ChangeSupport::with_config(beans_kernel::bean_id(kind), config.change.clone())
}

/// Attaches a [`ChangeFeed`] sized by `config` to `support`.
///
/// # Errors
/// Returns [`ChangeError::InvalidCapacity`] if the configured capacity is zero.
pub fn attach_feed(support: &ChangeSupport, config: &BeansConfig) -> Result<ChangeFeed, ChangeError> {
    let feed = ChangeFeed::new(config.change.feed_capacity)?;
    support.add_property_change_listener(Arc::new(feed.clone()));
    Ok(feed)
}
