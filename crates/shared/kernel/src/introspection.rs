//! Bean metadata assembly and lookup.
//!
//! A bean publishes a [`BeanInfo`] describing itself, its properties and its methods.
//! Lookups by name that cannot be resolved surface an [`IntrospectionError`] to the caller;
//! nothing here retries or falls back silently.

use beans_domain::descriptor::{BeanDescriptor, MethodDescriptor, PropertyDescriptor};
use fxhash::FxHashSet;
use std::borrow::Cow;
use tracing::trace;

#[beans_derive::beans_error]
pub enum IntrospectionError {
    /// A referenced feature name does not resolve to any descriptor.
    #[error("Unknown feature{}: {message}", format_context(.context))]
    UnknownFeature { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Two descriptors of the same kind share a name.
    #[error("Duplicate feature{}: {message}", format_context(.context))]
    DuplicateFeature { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A descriptor name is not a usable identifier.
    #[error("Invalid descriptor{}: {message}", format_context(.context))]
    InvalidDescriptor { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Internal fallback for unexpected issues.
    #[error("Internal introspection error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

/// Implemented by components that can describe themselves.
pub trait Introspect {
    /// # Errors
    /// Returns [`IntrospectionError`] if the component's metadata cannot be assembled.
    fn bean_info(&self) -> Result<BeanInfo, IntrospectionError>;
}

/// Checks that `name` is an identifier: a letter or `_` followed by letters, digits or `_`.
///
/// # Errors
/// Returns [`IntrospectionError::InvalidDescriptor`] otherwise.
pub fn verify_feature_name(name: &str, kind: &'static str) -> Result<(), IntrospectionError> {
    let mut chars = name.chars();
    let valid_head = chars.next().is_some_and(|c| c.is_alphabetic() || c == '_');
    if valid_head && chars.all(|c| c.is_alphanumeric() || c == '_') {
        return Ok(());
    }
    Err(IntrospectionError::InvalidDescriptor {
        message: format!("'{name}' is not a valid {kind} name").into(),
        context: None,
    })
}

/// The published metadata of one bean.
#[derive(Debug, Clone, PartialEq)]
pub struct BeanInfo {
    bean: BeanDescriptor,
    properties: Vec<PropertyDescriptor>,
    methods: Vec<MethodDescriptor>,
    default_property: Option<usize>,
}

impl BeanInfo {
    #[must_use = "The metadata is not assembled until you call .build()"]
    pub fn builder(bean: BeanDescriptor) -> BeanInfoBuilder {
        BeanInfoBuilder { bean, properties: Vec::new(), methods: Vec::new(), default_property: None }
    }

    #[must_use]
    pub const fn bean(&self) -> &BeanDescriptor {
        &self.bean
    }

    #[must_use]
    pub fn properties(&self) -> &[PropertyDescriptor] {
        &self.properties
    }

    #[must_use]
    pub fn methods(&self) -> &[MethodDescriptor] {
        &self.methods
    }

    /// # Errors
    /// Returns [`IntrospectionError::UnknownFeature`] if no property has this name.
    pub fn property(&self, name: &str) -> Result<&PropertyDescriptor, IntrospectionError> {
        self.properties.iter().find(|p| p.name() == name).ok_or_else(|| unknown("property", name, &self.bean))
    }

    /// # Errors
    /// Returns [`IntrospectionError::UnknownFeature`] if no method has this name.
    pub fn method(&self, name: &str) -> Result<&MethodDescriptor, IntrospectionError> {
        self.methods.iter().find(|m| m.name() == name).ok_or_else(|| unknown("method", name, &self.bean))
    }

    #[must_use]
    pub fn default_property(&self) -> Option<&PropertyDescriptor> {
        self.default_property.and_then(|i| self.properties.get(i))
    }

    /// Properties whose changes may be vetoed.
    pub fn constrained_properties(&self) -> impl Iterator<Item = &PropertyDescriptor> {
        self.properties.iter().filter(|p| p.is_constrained())
    }
}

fn unknown(kind: &str, name: &str, bean: &BeanDescriptor) -> IntrospectionError {
    IntrospectionError::UnknownFeature {
        message: format!("no {kind} named '{name}'").into(),
        context: Some(bean.name().to_owned().into()),
    }
}

/// Collects descriptors and validates them into a [`BeanInfo`].
#[derive(Debug)]
pub struct BeanInfoBuilder {
    bean: BeanDescriptor,
    properties: Vec<PropertyDescriptor>,
    methods: Vec<MethodDescriptor>,
    default_property: Option<String>,
}

impl BeanInfoBuilder {
    #[must_use = "The builder must be consumed with .build()"]
    pub fn property(mut self, property: PropertyDescriptor) -> Self {
        self.properties.push(property);
        self
    }

    #[must_use = "The builder must be consumed with .build()"]
    pub fn method(mut self, method: MethodDescriptor) -> Self {
        self.methods.push(method);
        self
    }

    #[must_use = "The builder must be consumed with .build()"]
    pub fn default_property(mut self, name: impl Into<String>) -> Self {
        self.default_property = Some(name.into());
        self
    }

    /// # Errors
    /// * [`IntrospectionError::InvalidDescriptor`] for names that are not identifiers.
    /// * [`IntrospectionError::DuplicateFeature`] for two properties or two methods sharing a name.
    /// * [`IntrospectionError::UnknownFeature`] for a default property that was never added.
    pub fn build(self) -> Result<BeanInfo, IntrospectionError> {
        let bean_name = self.bean.name().to_owned();

        ensure_unique(self.properties.iter().map(|p| p.name()), "property", &bean_name)?;
        ensure_unique(self.methods.iter().map(|m| m.name()), "method", &bean_name)?;
        for method in &self.methods {
            for parameter in method.parameters().iter().filter(|p| !p.name().is_empty()) {
                verify_feature_name(parameter.name(), "parameter")?;
            }
        }

        let default_property = match &self.default_property {
            Some(name) => Some(
                self.properties
                    .iter()
                    .position(|p| p.name() == name)
                    .ok_or_else(|| unknown("property", name, &self.bean))?,
            ),
            None => None,
        };

        trace!(
            bean = %bean_name,
            properties = self.properties.len(),
            methods = self.methods.len(),
            "Bean info assembled"
        );

        Ok(BeanInfo {
            bean: self.bean,
            properties: self.properties,
            methods: self.methods,
            default_property,
        })
    }
}

fn ensure_unique<'a>(
    names: impl Iterator<Item = &'a str>,
    kind: &'static str,
    bean: &str,
) -> Result<(), IntrospectionError> {
    let mut seen = FxHashSet::default();
    for name in names {
        verify_feature_name(name, kind)?;
        if !seen.insert(name) {
            return Err(IntrospectionError::DuplicateFeature {
                message: format!("{kind} '{name}' declared twice").into(),
                context: Some(bean.to_owned().into()),
            });
        }
    }
    Ok(())
}
