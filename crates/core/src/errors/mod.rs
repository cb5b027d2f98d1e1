pub mod container;

pub use container::ContainerError;
