//! Kernel utilities shared by bean hosts.
//! Keep this crate lightweight; it carries ids, config loading, introspection and GUI negotiation.
//!
//! ## ID generation
//! Use `safe_nanoid!` for URL-safe, unambiguous IDs, or [`bean_id`] for a ready [`BeanId`]:
//! ```rust
//! # use beans_kernel::{bean_id, safe_nanoid};
//! let id = safe_nanoid!();
//! assert_eq!(id.len(), 12);
//!
//! let bean = bean_id("slider");
//! assert_eq!(bean.kind(), Some("slider"));
//! ```
//!
//! ## Config loading (non-wasm)
//! ```rust,no_run
//! # #[cfg(not(target_arch = "wasm32"))]
//! # {
//! use beans_kernel::config::load_config;
//! use beans_kernel::domain::config::BeansConfig;
//!
//! let cfg: BeansConfig = load_config(Some("beans")).unwrap();
//! # let _ = cfg;
//! # }
//! ```
#[cfg(not(target_arch = "wasm32"))]
pub mod config;
pub mod introspection;
pub mod visibility;

use beans_domain::id::BeanId;

// Alphabet excludes visually ambiguous characters (I, O, l, 0, 1).
pub const SAFE_ALPHABET: &[char; 55] = &[
    '2', '3', '4', '5', '6', '7', '8', '9', 'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'J', 'K', 'L',
    'M', 'N', 'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z', 'a', 'b', 'c', 'd', 'e', 'f',
    'g', 'h', 'j', 'k', 'm', 'n', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z',
];

pub use beans_domain as domain;
pub use nanoid::nanoid;

/// Generates an unambiguous `NanoID` (no visually confusing characters).
#[macro_export]
macro_rules! safe_nanoid {
    () => {
        $crate::nanoid!(12, $crate::SAFE_ALPHABET)
    };
    ($size:expr) => {
        $crate::nanoid!($size, $crate::SAFE_ALPHABET)
    };
}

/// A fresh bean identity shaped like `kind:<safe nanoid>`.
#[must_use]
pub fn bean_id(kind: &str) -> BeanId {
    BeanId::new(format!("{kind}:{}", safe_nanoid!()))
}
