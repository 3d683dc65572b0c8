use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Identity of a bean, used as the `source` of every change event it fires.
///
/// Cloning is a reference-count bump; equality is by value so events can be compared
/// across dispatch rounds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BeanId(Arc<str>);

impl BeanId {
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The `kind` prefix of ids shaped like `kind:suffix`, if any.
    #[must_use]
    pub fn kind(&self) -> Option<&str> {
        self.0.split_once(':').map(|(kind, _)| kind)
    }
}

impl fmt::Display for BeanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BeanId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for BeanId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl AsRef<str> for BeanId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_is_prefix_before_colon() {
        assert_eq!(BeanId::from("button:42").kind(), Some("button"));
        assert_eq!(BeanId::from("anonymous").kind(), None);
    }

    #[test]
    fn equality_is_by_value() {
        assert_eq!(BeanId::from("a:1"), BeanId::new(String::from("a:1")));
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = BeanId::from("slider:7");
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""slider:7""#);
        assert_eq!(serde_json::from_str::<BeanId>(r#""slider:7""#).unwrap(), id);
    }
}
