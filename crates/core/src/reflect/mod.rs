//! Runtime type descriptors.
//!
//! Rust has no runtime reflection, so the container works from an explicit
//! descriptor table instead:
//!
//! - capability contracts are trait objects declared with [`contract!`](crate::contract)
//! - records are structs deriving [`Injectable`](crate::Injectable)
//! - references are `Arc<T>` of either
//! - common scalars are reflectable so they can be passed around as values,
//!   but the container never dispatches on them
//!
//! ```rust
//! use std::sync::Arc;
//! use tagwire_core::{contract, reflect::{Type, TypeKind}, Inject, Injectable};
//!
//! pub trait Clock: Send + Sync {
//!     fn now(&self) -> u64;
//! }
//! contract!(dyn Clock);
//!
//! #[derive(Injectable, Default)]
//! #[injectable(implements(dyn Clock))]
//! pub struct FixedClock;
//!
//! impl Clock for FixedClock {
//!     fn now(&self) -> u64 {
//!         42
//!     }
//! }
//!
//! assert_eq!(Type::of::<dyn Clock>().kind(), TypeKind::Contract);
//! assert_eq!(Type::of::<FixedClock>().kind(), TypeKind::Record);
//! assert_eq!(Type::of::<Arc<FixedClock>>().kind(), TypeKind::Reference);
//! assert!(Type::of::<FixedClock>().satisfies(&Type::of::<dyn Clock>()));
//! ```

pub mod record;
pub mod slot;
pub mod types;
pub mod value;

pub use record::{Field, Implementation, Record, Slot};
pub use slot::Inject;
pub use types::{Parameter, Signature, Type, TypeKind};
pub use value::{Operand, Value};

use std::sync::Arc;

/// The stock `dyn Error` contract
pub type DynError = dyn std::error::Error + Send + Sync;

/// Types the container can describe at runtime
pub trait Reflect: Send + Sync + 'static {
    /// Descriptor of this type
    fn type_of() -> Type;

    /// Contracts this type implements (records only)
    fn implementations() -> Vec<Implementation> {
        Vec::new()
    }

    /// Field access for records
    fn as_record(_this: &Arc<Self>) -> Option<Arc<dyn Record>> {
        None
    }

    /// Pull a shared `Self` out of a dynamically typed value
    fn extract(value: &Value) -> Option<Arc<Self>> {
        value.cast_payload::<Self>()
    }
}

impl<T: ?Sized + Reflect> Reflect for Arc<T> {
    fn type_of() -> Type {
        Type::reference::<T>()
    }

    fn extract(value: &Value) -> Option<Arc<Self>> {
        T::extract(value).map(Arc::new)
    }
}

/// Declare trait objects as capability contracts.
///
/// The trait must have `Send + Sync` as supertraits.
///
/// ```rust
/// pub trait Mailer: Send + Sync {
///     fn send(&self, to: &str);
/// }
///
/// tagwire_core::contract!(dyn Mailer);
/// ```
///
/// A contract whose trait has [`Record`] as a supertrait can be declared with
/// `: Record`. Instances seen only through such a contract, for example the
/// `Arc<dyn Trait>` returned by a factory, keep their fields visible to
/// injection.
///
/// ```rust
/// use std::sync::Arc;
/// use tagwire_core::{contract, Inject, Injectable, Record, Value};
///
/// pub trait Clock: Record {
///     fn now(&self) -> u64;
/// }
/// contract!(dyn Clock: Record);
///
/// #[derive(Injectable, Default)]
/// #[injectable(implements(dyn Clock))]
/// pub struct FixedClock {
///     #[inject]
///     pub offset: Inject<dyn Clock>,
/// }
///
/// impl Clock for FixedClock {
///     fn now(&self) -> u64 {
///         42
///     }
/// }
///
/// let clock: Arc<dyn Clock> = Arc::new(FixedClock::default());
/// let value = Value::shared(clock);
/// assert_eq!(value.as_record().map(|record| record.fields().len()), Some(1));
/// ```
#[macro_export]
macro_rules! contract {
    (@declare $contract:ty : Record) => {
        impl $crate::reflect::Reflect for $contract {
            fn type_of() -> $crate::reflect::Type {
                $crate::reflect::Type::contract::<$contract>()
            }

            fn as_record(
                this: &::std::sync::Arc<Self>,
            ) -> ::std::option::Option<::std::sync::Arc<dyn $crate::reflect::Record>> {
                ::std::option::Option::Some(
                    ::std::sync::Arc::clone(this) as ::std::sync::Arc<dyn $crate::reflect::Record>,
                )
            }
        }
    };
    (@declare $contract:ty) => {
        impl $crate::reflect::Reflect for $contract {
            fn type_of() -> $crate::reflect::Type {
                $crate::reflect::Type::contract::<$contract>()
            }
        }
    };
    ($($contract:ty $(: $supertrait:ident)?),+ $(,)?) => {
        $(
            $crate::contract!(@declare $contract $(: $supertrait)?);
        )+
    };
}

contract!(DynError);

macro_rules! reflect_other {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Reflect for $ty {
                fn type_of() -> Type {
                    Type::other::<$ty>()
                }
            }
        )+
    };
}

reflect_other!(
    String,
    &'static str,
    bool,
    char,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    f32,
    f64,
);
