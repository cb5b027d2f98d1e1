use std::sync::Arc;

use crate::config::ContainerConfig;
use crate::container::classifier::{classify, record_of, Shape};
use crate::container::registry::{Binding, Registry};
use crate::errors::ContainerError;
use crate::factory::Argument;
use crate::reflect::{Operand, Reflect, Type, TypeKind, Value};

/// Dependency-resolution container.
///
/// Abstractions are contract types (`dyn Trait`) or record types; concretes are
/// shared instances or factories. Every resolution of an instance binding
/// returns the same allocation.
///
/// ```rust
/// use std::sync::Arc;
/// use tagwire_core::{contract, Container, Inject, Injectable, Type};
///
/// pub trait Greeter: Send + Sync {
///     fn greet(&self) -> String;
/// }
/// contract!(dyn Greeter);
///
/// #[derive(Injectable, Default)]
/// #[injectable(implements(dyn Greeter))]
/// pub struct English;
///
/// impl Greeter for English {
///     fn greet(&self) -> String {
///         "hello".to_string()
///     }
/// }
///
/// #[derive(Injectable, Default)]
/// pub struct Frontdesk {
///     #[inject]
///     pub greeter: Inject<dyn Greeter>,
/// }
///
/// let container = Container::new();
/// container.bind(Type::of::<dyn Greeter>(), Arc::new(English)).unwrap();
///
/// let desk = Arc::new(Frontdesk::default());
/// container.inject_into(&desk).unwrap();
/// assert_eq!(desk.greeter.get().unwrap().greet(), "hello");
/// ```
#[derive(Default)]
pub struct Container {
    registry: Registry,
    config: ContainerConfig,
}

impl Container {
    /// Create an empty container
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty container with custom settings
    pub fn with_config(config: ContainerConfig) -> Self {
        Self {
            registry: Registry::new(),
            config,
        }
    }

    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    /// Bind a concrete to an abstraction, replacing any previous binding.
    ///
    /// Contracts accept factories (unchecked) and references whose pointee
    /// satisfies the contract. Records accept a record value or a reference to
    /// one of the same type.
    pub fn bind(
        &self,
        abstraction: impl Into<Operand>,
        concrete: impl Into<Value>,
    ) -> Result<(), ContainerError> {
        let abstraction = abstraction.into();
        let concrete = concrete.into();

        match classify(&abstraction) {
            Shape::Contract(contract) => self.bind_contract(&contract, concrete),
            Shape::Record(record) => self.bind_record(&record, concrete),
            Shape::Invalid => {
                tracing::debug!(
                    abstraction = abstraction.ty().name(),
                    "rejected bind of unsupported abstraction"
                );
                Err(ContainerError::InvalidBindArguments)
            }
        }
    }

    fn bind_contract(&self, contract: &Type, concrete: Value) -> Result<(), ContainerError> {
        match concrete.kind() {
            TypeKind::Callable => {}
            TypeKind::Reference => {
                if !concrete.ty().satisfies(contract) {
                    return Err(ContainerError::concrete_does_not_implement_contract(
                        concrete.type_name(),
                        contract.name(),
                    ));
                }
            }
            kind => return Err(ContainerError::UnsupportedConcreteKind { kind }),
        }

        self.store(contract.name(), concrete);
        Ok(())
    }

    fn bind_record(&self, record: &Type, concrete: Value) -> Result<(), ContainerError> {
        let concrete_record = record_of(concrete.ty()).ok_or(ContainerError::ConcreteIsNotARecord)?;
        if concrete_record.name() != record.name() {
            return Err(ContainerError::record_type_mismatch(
                record.name(),
                concrete_record.name(),
            ));
        }

        self.store(record.name(), concrete);
        Ok(())
    }

    fn store(&self, key: &'static str, concrete: Value) {
        let kind = concrete.kind();
        if self.registry.store(key, Binding::from(concrete)).is_some() {
            tracing::debug!(abstraction = key, %kind, "replaced binding");
        } else {
            tracing::debug!(abstraction = key, %kind, "bound");
        }
    }

    /// Resolve an abstraction with no factory arguments
    pub fn resolve(&self, abstraction: impl Into<Operand>) -> Result<Value, ContainerError> {
        self.resolve_with(abstraction, Vec::new())
    }

    /// Resolve an abstraction, passing `args` to a bound factory.
    ///
    /// Instance bindings ignore `args`.
    pub fn resolve_with(
        &self,
        abstraction: impl Into<Operand>,
        args: Vec<Argument>,
    ) -> Result<Value, ContainerError> {
        let abstraction = abstraction.into();

        match classify(&abstraction) {
            Shape::Contract(contract) => self.resolve_contract(&contract, args),
            Shape::Record(record) => self.resolve_record(&record),
            Shape::Invalid => {
                tracing::debug!(
                    abstraction = abstraction.ty().name(),
                    "rejected resolve of unsupported abstraction"
                );
                Err(ContainerError::InvalidResolveArguments)
            }
        }
    }

    fn load(&self, abstraction: &Type) -> Result<Binding, ContainerError> {
        self.registry
            .load(abstraction.name())
            .ok_or_else(|| ContainerError::abstract_not_bound(abstraction.name()))
    }

    fn resolve_contract(
        &self,
        contract: &Type,
        args: Vec<Argument>,
    ) -> Result<Value, ContainerError> {
        match self.load(contract)? {
            Binding::Factory(factory) => {
                tracing::trace!(
                    abstraction = contract.name(),
                    arguments = args.len(),
                    "invoking factory"
                );
                factory.invoke(args)
            }
            Binding::Instance(value) if value.kind() == TypeKind::Reference => Ok(value),
            Binding::Instance(value) => Err(ContainerError::UnsupportedStoredConcreteKind {
                kind: value.kind(),
            }),
        }
    }

    fn resolve_record(&self, record: &Type) -> Result<Value, ContainerError> {
        match self.load(record)? {
            Binding::Instance(value)
                if matches!(value.kind(), TypeKind::Record | TypeKind::Reference) =>
            {
                Ok(value)
            }
            binding => Err(ContainerError::UnsupportedStoredConcreteKind {
                kind: binding.kind(),
            }),
        }
    }

    /// Resolve `T` and hand it back typed
    pub fn resolve_as<T: ?Sized + Reflect>(&self) -> Result<Arc<T>, ContainerError> {
        self.resolve_as_with::<T>(Vec::new())
    }

    /// Resolve `T` with factory arguments and hand it back typed
    pub fn resolve_as_with<T: ?Sized + Reflect>(
        &self,
        args: Vec<Argument>,
    ) -> Result<Arc<T>, ContainerError> {
        let value = self.resolve_with(Type::of::<T>(), args)?;
        value.downcast::<T>().ok_or_else(|| {
            ContainerError::resolved_type_mismatch(std::any::type_name::<T>(), value.type_name())
        })
    }

    /// Check if the abstraction has a binding
    pub fn is_bound(&self, abstraction: impl Into<Operand>) -> bool {
        classify(&abstraction.into())
            .key()
            .map(|key| self.registry.contains(key))
            .unwrap_or(false)
    }

    /// Number of bound abstractions
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Keys of every bound abstraction, sorted
    pub fn bound_abstractions(&self) -> Vec<&'static str> {
        self.registry.keys()
    }
}

impl std::fmt::Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Container")
            .field("bindings", &self.bound_abstractions())
            .field("config", &self.config)
            .finish()
    }
}
