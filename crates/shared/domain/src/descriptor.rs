//! Metadata value objects describing the features of a bean.
//!
//! Every descriptor owns its attribute table outright. The explicit `copy` operations
//! are a hard contract: the copy shares no mutable state with its origin, so editing
//! either side is never visible through the other.

use crate::value::Value;
use bitflags::bitflags;
use std::collections::BTreeMap;
use std::ops::{Deref, DerefMut};

bitflags! {
    /// Presentation hints shared by all feature descriptors.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct FeatureFlags: u8 {
        /// Intended for expert users rather than casual ones.
        const EXPERT = 1 << 0;
        /// Intended for tool use only, not for humans.
        const HIDDEN = 1 << 1;
        /// Particularly important for presentation to humans.
        const PREFERRED = 1 << 2;
    }
}

/// Base descriptor: a name, presentation strings, flags and an open attribute table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureDescriptor {
    name: String,
    display_name: Option<String>,
    short_description: Option<String>,
    flags: FeatureFlags,
    attributes: BTreeMap<String, Value>,
}

impl FeatureDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    /// Deep copy of `existing`; the result shares nothing with it.
    #[must_use]
    pub fn copy(existing: &Self) -> Self {
        existing.clone()
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Localized display name, falling back to the programmatic name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }

    pub fn set_display_name(&mut self, display_name: impl Into<String>) {
        self.display_name = Some(display_name.into());
    }

    /// Short description, falling back to the display name.
    #[must_use]
    pub fn short_description(&self) -> &str {
        self.short_description.as_deref().unwrap_or_else(|| self.display_name())
    }

    pub fn set_short_description(&mut self, description: impl Into<String>) {
        self.short_description = Some(description.into());
    }

    #[must_use]
    pub const fn flags(&self) -> FeatureFlags {
        self.flags
    }

    pub fn set_flag(&mut self, flag: FeatureFlags, enabled: bool) {
        self.flags.set(flag, enabled);
    }

    #[must_use]
    pub const fn is_expert(&self) -> bool {
        self.flags.contains(FeatureFlags::EXPERT)
    }

    #[must_use]
    pub const fn is_hidden(&self) -> bool {
        self.flags.contains(FeatureFlags::HIDDEN)
    }

    #[must_use]
    pub const fn is_preferred(&self) -> bool {
        self.flags.contains(FeatureFlags::PREFERRED)
    }

    /// Associates a named attribute with this feature, returning the previous value.
    pub fn set_value(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.attributes.insert(name.into(), value.into())
    }

    #[must_use]
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    pub fn remove_value(&mut self, name: &str) -> Option<Value> {
        self.attributes.remove(name)
    }

    /// Attribute names in lexical order.
    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }

    #[must_use]
    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }
}

macro_rules! feature_deref {
    ($ty:ty) => {
        impl Deref for $ty {
            type Target = FeatureDescriptor;

            fn deref(&self) -> &Self::Target {
                &self.feature
            }
        }

        impl DerefMut for $ty {
            fn deref_mut(&mut self) -> &mut FeatureDescriptor {
                &mut self.feature
            }
        }
    };
}

/// Describes one parameter of a bean method. Adds nothing beyond the base descriptor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterDescriptor {
    feature: FeatureDescriptor,
}

feature_deref!(ParameterDescriptor);

impl ParameterDescriptor {
    /// An empty descriptor with no name and no attributes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self { feature: FeatureDescriptor::new(name) }
    }

    /// Deep copy of `existing`.
    #[must_use]
    pub fn copy(existing: &Self) -> Self {
        Self { feature: FeatureDescriptor::copy(&existing.feature) }
    }

    /// Copies `existing` when present, otherwise starts from an empty descriptor.
    #[must_use]
    pub fn from_existing(existing: Option<&Self>) -> Self {
        existing.map_or_else(Self::new, Self::copy)
    }
}

/// Describes a property exposed by a bean.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyDescriptor {
    feature: FeatureDescriptor,
    bound: bool,
    constrained: bool,
}

feature_deref!(PropertyDescriptor);

impl PropertyDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self { feature: FeatureDescriptor::new(name), bound: false, constrained: false }
    }

    #[must_use]
    pub fn copy(existing: &Self) -> Self {
        Self {
            feature: FeatureDescriptor::copy(&existing.feature),
            bound: existing.bound,
            constrained: existing.constrained,
        }
    }

    /// Marks the property as announcing its changes after they commit.
    #[must_use]
    pub const fn bound(mut self, bound: bool) -> Self {
        self.bound = bound;
        if !bound {
            self.constrained = false;
        }
        self
    }

    /// Marks the property as vetoable. A constrained property is always bound.
    #[must_use]
    pub const fn constrained(mut self, constrained: bool) -> Self {
        self.constrained = constrained;
        if constrained {
            self.bound = true;
        }
        self
    }

    #[must_use]
    pub const fn is_bound(&self) -> bool {
        self.bound
    }

    #[must_use]
    pub const fn is_constrained(&self) -> bool {
        self.constrained
    }
}

/// Describes a method exposed by a bean, with its ordered parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MethodDescriptor {
    feature: FeatureDescriptor,
    parameters: Vec<ParameterDescriptor>,
}

feature_deref!(MethodDescriptor);

impl MethodDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self { feature: FeatureDescriptor::new(name), parameters: Vec::new() }
    }

    #[must_use]
    pub fn copy(existing: &Self) -> Self {
        Self {
            feature: FeatureDescriptor::copy(&existing.feature),
            parameters: existing.parameters.iter().map(ParameterDescriptor::copy).collect(),
        }
    }

    #[must_use]
    pub fn parameter(mut self, parameter: ParameterDescriptor) -> Self {
        self.parameters.push(parameter);
        self
    }

    #[must_use]
    pub fn parameters(&self) -> &[ParameterDescriptor] {
        &self.parameters
    }

    pub fn parameters_mut(&mut self) -> &mut [ParameterDescriptor] {
        &mut self.parameters
    }
}

/// Describes the bean as a whole.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BeanDescriptor {
    feature: FeatureDescriptor,
}

feature_deref!(BeanDescriptor);

impl BeanDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self { feature: FeatureDescriptor::new(name) }
    }

    #[must_use]
    pub fn copy(existing: &Self) -> Self {
        Self { feature: FeatureDescriptor::copy(&existing.feature) }
    }
}
