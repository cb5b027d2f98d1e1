use std::any::TypeId;
use std::fmt;

use crate::reflect::record::Implementation;
use crate::reflect::Reflect;

/// Shape of a type as far as the container is concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// A capability contract, i.e. a trait object such as `dyn Logger`
    Contract,
    /// A plain struct carrying record metadata
    Record,
    /// A shared pointer (`Arc<T>`) to another type
    Reference,
    /// A factory closure
    Callable,
    /// Anything else (strings, numbers, ...)
    Other,
}

impl TypeKind {
    /// Check if values of this kind can be written into an injection slot
    pub fn is_injectable(&self) -> bool {
        matches!(
            self,
            TypeKind::Contract | TypeKind::Record | TypeKind::Reference
        )
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TypeKind::Contract => "contract",
            TypeKind::Record => "record",
            TypeKind::Reference => "reference",
            TypeKind::Callable => "callable",
            TypeKind::Other => "other",
        };
        f.write_str(name)
    }
}

/// A declared factory parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub type_id: TypeId,
    pub type_name: &'static str,
}

impl Parameter {
    /// Describe a parameter of type `T`
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
        }
    }
}

/// Declared inputs and output count of a factory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    inputs: Vec<Parameter>,
    outputs: usize,
}

impl Signature {
    pub fn new(inputs: Vec<Parameter>, outputs: usize) -> Self {
        Self { inputs, outputs }
    }

    pub fn inputs(&self) -> &[Parameter] {
        &self.inputs
    }

    pub fn arity(&self) -> usize {
        self.inputs.len()
    }

    pub fn outputs(&self) -> usize {
        self.outputs
    }
}

fn no_implementations() -> Vec<Implementation> {
    Vec::new()
}

/// Runtime descriptor of a type.
///
/// This is the container's stand-in for reflection: a kind tag, a canonical
/// name used as the registry key, the pointee of references, the signature of
/// callables and, for records, the table of contracts they implement.
#[derive(Clone)]
pub struct Type {
    id: TypeId,
    name: &'static str,
    kind: TypeKind,
    elem: Option<Box<Type>>,
    signature: Option<Signature>,
    implementations: fn() -> Vec<Implementation>,
}

impl Type {
    /// Descriptor of any reflectable type
    pub fn of<T: ?Sized + Reflect>() -> Self {
        T::type_of()
    }

    /// Descriptor of a capability contract (a trait object type)
    pub fn contract<C: ?Sized + 'static>() -> Self {
        Self::bare::<C>(TypeKind::Contract)
    }

    /// Descriptor of a record, carrying its contract implementation table
    pub fn record<R: Reflect>() -> Self {
        Self {
            implementations: R::implementations,
            ..Self::bare::<R>(TypeKind::Record)
        }
    }

    /// Descriptor of `Arc<T>`
    pub fn reference<T: ?Sized + Reflect>() -> Self {
        Self {
            elem: Some(Box::new(T::type_of())),
            ..Self::bare::<std::sync::Arc<T>>(TypeKind::Reference)
        }
    }

    /// Descriptor of a type the container never dispatches on
    pub fn other<T: ?Sized + 'static>() -> Self {
        Self::bare::<T>(TypeKind::Other)
    }

    /// Descriptor of a factory closure
    pub fn callable<F: 'static>(signature: Signature) -> Self {
        Self {
            signature: Some(signature),
            ..Self::bare::<F>(TypeKind::Callable)
        }
    }

    fn bare<T: ?Sized + 'static>(kind: TypeKind) -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
            kind,
            elem: None,
            signature: None,
            implementations: no_implementations,
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Canonical name, also the registry key
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    /// Pointee of a reference
    pub fn elem(&self) -> Option<&Type> {
        self.elem.as_deref()
    }

    pub fn signature(&self) -> Option<&Signature> {
        self.signature.as_ref()
    }

    /// Follow reference indirections until a non-reference type is reached
    pub fn strip_references(&self) -> &Type {
        let mut current = self;
        while let Some(elem) = current.elem() {
            current = elem;
        }
        current
    }

    /// Contracts this record declares it implements
    pub fn implementations(&self) -> Vec<Implementation> {
        (self.implementations)()
    }

    /// Find the implementation of `contract` declared by this record
    pub fn implementation_of(&self, contract: &Type) -> Option<Implementation> {
        self.implementations()
            .into_iter()
            .find(|implementation| implementation.contract().id() == contract.id())
    }

    /// Check if a value of this type can stand in for `contract`.
    ///
    /// References are looked through; a record satisfies the contracts in its
    /// implementation table and a contract satisfies itself.
    pub fn satisfies(&self, contract: &Type) -> bool {
        if contract.kind() != TypeKind::Contract {
            return false;
        }

        let base = self.strip_references();
        match base.kind() {
            TypeKind::Contract => base.id() == contract.id(),
            TypeKind::Record => base.implementation_of(contract).is_some(),
            _ => false,
        }
    }
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Type {}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Type")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("elem", &self.elem)
            .field("signature", &self.signature)
            .finish()
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
