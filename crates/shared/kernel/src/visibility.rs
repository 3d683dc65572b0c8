//! GUI availability negotiation between a host and its components.

use beans_domain::config::VisibilityConfig;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

/// Implemented by components that can run with or without an interactive surface.
///
/// A host (a headless server, a test harness) calls [`Visibility::dont_use_gui`] to ask the
/// component to stay off-screen, and [`Visibility::needs_gui`] to learn whether that request
/// can be honoured at all.
pub trait Visibility {
    /// Whether the component cannot function without an interactive surface.
    fn needs_gui(&self) -> bool;

    fn dont_use_gui(&self);

    fn ok_to_use_gui(&self);

    fn avoiding_gui(&self) -> bool;
}

/// Atomic avoidance flag that components embed to implement [`Visibility`].
#[derive(Debug, Default)]
pub struct GuiAvoidance {
    needs_gui: bool,
    avoiding: AtomicBool,
}

impl GuiAvoidance {
    #[must_use]
    pub const fn new(needs_gui: bool) -> Self {
        Self { needs_gui, avoiding: AtomicBool::new(false) }
    }

    /// Headless hosts start out avoiding the GUI.
    #[must_use]
    pub const fn from_config(needs_gui: bool, config: &VisibilityConfig) -> Self {
        Self { needs_gui, avoiding: AtomicBool::new(config.headless) }
    }
}

impl Visibility for GuiAvoidance {
    fn needs_gui(&self) -> bool {
        self.needs_gui
    }

    fn dont_use_gui(&self) {
        if !self.avoiding.swap(true, Ordering::AcqRel) {
            debug!(needs_gui = self.needs_gui, "GUI avoidance enabled");
        }
    }

    fn ok_to_use_gui(&self) {
        if self.avoiding.swap(false, Ordering::AcqRel) {
            debug!("GUI avoidance lifted");
        }
    }

    fn avoiding_gui(&self) -> bool {
        self.avoiding.load(Ordering::Acquire)
    }
}
