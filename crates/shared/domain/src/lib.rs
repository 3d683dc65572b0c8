//! # Domain Models
//!
//! Pure bean types with minimal dependencies (`serde`, `bitflags`).
//! Keep it lean: no I/O, no dispatch, no listeners. Just data and simple helpers.
//!
//! * [`value::Value`] is the dynamic payload carried by change events and descriptor attributes.
//! * [`id::BeanId`] identifies the component an event originated from.
//! * [`descriptor`] holds the metadata value objects attached to a bean's features.
//! * [`config`] holds the deserializable settings consumed by the change and kernel crates.

pub mod config;
pub mod descriptor;
pub mod id;
pub mod value;
