use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::reflect::{Reflect, Type, TypeKind, Value};

/// Field access for records.
///
/// Usually implemented by `#[derive(Injectable)]`.
pub trait Record: Send + Sync + 'static {
    /// Fields in declaration order
    fn fields(&self) -> Vec<Field<'_>>;
}

/// A writable injection target inside a record
pub trait Slot: Send + Sync {
    /// The type resolved to fill this slot
    fn declared_type(&self) -> Type;

    /// Store `value`, returning `false` when it is not of the declared type
    fn assign(&self, value: &Value) -> bool;
}

/// Descriptor of one record field
pub struct Field<'a> {
    name: &'static str,
    declared_type: Option<Type>,
    tagged: bool,
    exported: bool,
    slot: Option<&'a dyn Slot>,
}

impl<'a> Field<'a> {
    /// A field backed by an injection slot
    pub fn slot(name: &'static str, slot: &'a dyn Slot, tagged: bool, exported: bool) -> Self {
        Self {
            name,
            declared_type: Some(slot.declared_type()),
            tagged,
            exported,
            slot: Some(slot),
        }
    }

    /// A field the container cannot write to
    pub fn plain(name: &'static str, tagged: bool, exported: bool) -> Self {
        Self {
            name,
            declared_type: None,
            tagged,
            exported,
            slot: None,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn declared_type(&self) -> Option<&Type> {
        self.declared_type.as_ref()
    }

    /// Kind of the declared type; plain fields report [`TypeKind::Other`]
    pub fn kind(&self) -> TypeKind {
        self.declared_type
            .as_ref()
            .map(Type::kind)
            .unwrap_or(TypeKind::Other)
    }

    /// Whether the field carries an `#[inject]` tag
    pub fn is_tagged(&self) -> bool {
        self.tagged
    }

    /// Whether the field is visible outside its record (declared `pub`)
    pub fn is_exported(&self) -> bool {
        self.exported
    }

    /// Tagged, exported and of contract, record or reference kind
    pub fn is_injectable(&self) -> bool {
        self.tagged && self.kind().is_injectable() && self.exported
    }

    pub(crate) fn target(&self) -> Option<&'a dyn Slot> {
        self.slot
    }
}

impl fmt::Debug for Field<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("declared_type", &self.declared_type.as_ref().map(Type::name))
            .field("tagged", &self.tagged)
            .field("exported", &self.exported)
            .finish()
    }
}

type Cast = dyn Fn(&(dyn Any + Send + Sync)) -> Option<Box<dyn Any + Send + Sync>> + Send + Sync;

/// A record's declared implementation of a contract.
///
/// Holds the unsizing coercion from `Arc<Record>` to `Arc<dyn Contract>`,
/// which only the code naming both types can write.
#[derive(Clone)]
pub struct Implementation {
    contract: Type,
    cast: Arc<Cast>,
}

impl Implementation {
    pub fn new<R, C>(coerce: fn(Arc<R>) -> Arc<C>) -> Self
    where
        R: Send + Sync + 'static,
        C: ?Sized + Reflect,
    {
        Self {
            contract: C::type_of(),
            cast: Arc::new(move |payload: &(dyn Any + Send + Sync)| {
                payload
                    .downcast_ref::<Arc<R>>()
                    .map(|this| Box::new(coerce(Arc::clone(this))) as Box<dyn Any + Send + Sync>)
            }),
        }
    }

    pub fn contract(&self) -> &Type {
        &self.contract
    }

    /// Turn an erased `Arc<R>` into an erased `Arc<C>`
    pub(crate) fn cast(
        &self,
        payload: &(dyn Any + Send + Sync),
    ) -> Option<Box<dyn Any + Send + Sync>> {
        (self.cast)(payload)
    }
}

impl fmt::Debug for Implementation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Implementation")
            .field("contract", &self.contract.name())
            .finish()
    }
}
