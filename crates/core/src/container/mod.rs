//! The container: bindings, resolution and recursive field injection.

pub mod classifier;
#[allow(clippy::module_inception)]
pub mod container;
pub mod injector;
pub mod registry;

pub use classifier::{classify, contract_of, record_of, Shape};
pub use container::Container;
pub use registry::{Binding, Registry};
