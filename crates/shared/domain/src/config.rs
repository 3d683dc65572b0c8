use serde::Deserialize;

/// Top-level configuration for hosts embedding bean components.
#[derive(Default, Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BeansConfig {
    pub change: ChangeConfig,
    pub visibility: VisibilityConfig,
}

/// How listeners registered more than once are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Every registration is a separate entry and is invoked separately.
    #[default]
    PerRegistration,
    /// Registering an already-present listener for the same scope is a no-op.
    Once,
}

/// What to raise when a listener vetoes with an event other than the one it was given.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VetoEventPolicy {
    /// Re-raise with the original event so the caller always sees what it proposed.
    #[default]
    Substitute,
    /// Re-raise the listener's veto untouched.
    Preserve,
}

/// Change dispatch settings, one instance per change support.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ChangeConfig {
    pub duplicates: DuplicatePolicy,
    pub veto_event: VetoEventPolicy,
    /// Send a reverting event to listeners that accepted a change later vetoed.
    pub revert_on_veto: bool,
    /// Buffer size of the async change feed.
    pub feed_capacity: usize,
}

/// GUI negotiation defaults.
#[derive(Default, Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct VisibilityConfig {
    /// Hosts without an interactive surface start every component in GUI-avoidance mode.
    pub headless: bool,
}

// --- Default ---

impl Default for ChangeConfig {
    fn default() -> Self {
        Self {
            duplicates: DuplicatePolicy::PerRegistration,
            veto_event: VetoEventPolicy::Substitute,
            revert_on_veto: true,
            feed_capacity: 64,
        }
    }
}
