//! Runtime dependency-injection container.
//!
//! Bind capability contracts (`dyn Trait`) or record types to shared
//! instances or factories, resolve them back, and populate `#[inject]` tagged
//! fields of records recursively.

extern crate self as tagwire_core;

pub mod config;
pub mod container;
pub mod errors;
pub mod factory;
pub mod reflect;

pub use config::ContainerConfig;
pub use container::Container;
pub use errors::ContainerError;
pub use factory::{Argument, Factory};
pub use reflect::{
    DynError, Field, Implementation, Inject, Operand, Record, Reflect, Type, TypeKind, Value,
};
pub use tagwire_core_derive::Injectable;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get crate version
pub fn version() -> &'static str {
    VERSION
}
