use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::factory::Factory;
use crate::reflect::{Record, Reflect, Type, TypeKind};

#[derive(Clone)]
enum Inner {
    Instance {
        /// Always an erased `Arc<T>` for the value's own type `T`
        payload: Arc<dyn Any + Send + Sync>,
        record: Option<Arc<dyn Record>>,
        address: usize,
    },
    Callable(Factory),
}

/// A dynamically typed value: a shared instance, an owned value or a factory.
///
/// The descriptor is always the *dynamic* type of what is held, so a record
/// bound behind a contract still reports itself as a reference to that record.
/// Cloning a value never clones the underlying instance.
#[derive(Clone)]
pub struct Value {
    ty: Type,
    inner: Inner,
}

impl Value {
    /// Wrap an existing shared instance; the result has reference kind
    pub fn shared<T: ?Sized + Reflect>(instance: Arc<T>) -> Self {
        let record = T::as_record(&instance);
        let address = Arc::as_ptr(&instance).cast::<()>() as usize;
        Self {
            ty: Type::reference::<T>(),
            inner: Inner::Instance {
                payload: Arc::new(instance),
                record,
                address,
            },
        }
    }

    /// Wrap an owned value; the result has the kind of `T` itself
    pub fn of<T: Reflect>(value: T) -> Self {
        let instance = Arc::new(value);
        let record = T::as_record(&instance);
        let address = Arc::as_ptr(&instance).cast::<()>() as usize;
        Self {
            ty: T::type_of(),
            inner: Inner::Instance {
                payload: Arc::new(instance),
                record,
                address,
            },
        }
    }

    pub fn ty(&self) -> &Type {
        &self.ty
    }

    pub fn kind(&self) -> TypeKind {
        self.ty.kind()
    }

    pub fn type_name(&self) -> &'static str {
        self.ty.name()
    }

    /// Borrow the held instance as `Arc<T>`.
    ///
    /// Records held by reference can also be viewed through any contract
    /// they declare with `#[injectable(implements(..))]`.
    pub fn downcast<T: ?Sized + Reflect>(&self) -> Option<Arc<T>> {
        T::extract(self)
    }

    /// Check if both values hold the same allocation
    pub fn ptr_eq(&self, other: &Value) -> bool {
        match (&self.inner, &other.inner) {
            (Inner::Instance { address: a, .. }, Inner::Instance { address: b, .. }) => a == b,
            (Inner::Callable(a), Inner::Callable(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    pub fn as_factory(&self) -> Option<&Factory> {
        match &self.inner {
            Inner::Callable(factory) => Some(factory),
            Inner::Instance { .. } => None,
        }
    }

    pub fn as_record(&self) -> Option<&dyn Record> {
        match &self.inner {
            Inner::Instance { record, .. } => record.as_deref(),
            Inner::Callable(_) => None,
        }
    }

    pub(crate) fn cast_payload<T: ?Sized + Reflect>(&self) -> Option<Arc<T>> {
        let Inner::Instance { payload, .. } = &self.inner else {
            return None;
        };

        if let Some(instance) = payload.downcast_ref::<Arc<T>>() {
            return Some(Arc::clone(instance));
        }

        let target = T::type_of();
        if target.kind() != TypeKind::Contract {
            return None;
        }

        let implementation = self.ty.strip_references().implementation_of(&target)?;
        implementation
            .cast(&**payload)?
            .downcast::<Arc<T>>()
            .ok()
            .map(|instance| *instance)
    }
}

impl<T: ?Sized + Reflect> From<Arc<T>> for Value {
    fn from(instance: Arc<T>) -> Self {
        Value::shared(instance)
    }
}

impl From<Factory> for Value {
    fn from(factory: Factory) -> Self {
        Self {
            ty: factory.ty().clone(),
            inner: Inner::Callable(factory),
        }
    }
}

impl From<&Value> for Value {
    fn from(value: &Value) -> Self {
        value.clone()
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Value")
            .field("type", &self.ty.name())
            .field("kind", &self.ty.kind())
            .field("record", &self.as_record().is_some())
            .finish()
    }
}

/// Anything accepted where an abstraction is expected: a bare type handle or
/// a sample value whose type is used.
#[derive(Debug, Clone)]
pub enum Operand {
    Type(Type),
    Value(Value),
}

impl Operand {
    /// Type the operand stands for
    pub fn ty(&self) -> &Type {
        match self {
            Operand::Type(ty) => ty,
            Operand::Value(value) => value.ty(),
        }
    }
}

impl From<Type> for Operand {
    fn from(ty: Type) -> Self {
        Operand::Type(ty)
    }
}

impl From<&Type> for Operand {
    fn from(ty: &Type) -> Self {
        Operand::Type(ty.clone())
    }
}

impl From<Value> for Operand {
    fn from(value: Value) -> Self {
        Operand::Value(value)
    }
}

impl From<&Value> for Operand {
    fn from(value: &Value) -> Self {
        Operand::Value(value.clone())
    }
}

impl From<Factory> for Operand {
    fn from(factory: Factory) -> Self {
        Operand::Value(factory.into())
    }
}

impl<T: ?Sized + Reflect> From<Arc<T>> for Operand {
    fn from(instance: Arc<T>) -> Self {
        Operand::Value(Value::shared(instance))
    }
}
