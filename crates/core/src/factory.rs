//! Factories: closures registered as concretes and invoked on resolution.
//!
//! Any `Fn` taking up to six owned arguments and returning `()`, an `Arc<T>`,
//! a [`Value`] or a tuple of those can be turned into a [`Factory`]. The
//! declared parameter types and output count are recorded so the container can
//! check a call before making it.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::errors::ContainerError;
use crate::reflect::{Parameter, Reflect, Signature, Type, Value};

/// One factory argument, type-erased
pub struct Argument {
    value: Box<dyn Any + Send>,
    type_name: &'static str,
}

impl Argument {
    pub fn new<T: Any + Send>(value: T) -> Self {
        Self {
            value: Box::new(value),
            type_name: std::any::type_name::<T>(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    fn take<T: Any>(self, index: usize) -> Result<T, ContainerError> {
        let got = self.type_name;
        self.value
            .downcast::<T>()
            .map(|value| *value)
            .map_err(|_| {
                ContainerError::argument_type_mismatch(index, std::any::type_name::<T>(), got)
            })
    }
}

impl fmt::Debug for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Argument").field(&self.type_name).finish()
    }
}

/// Build a `Vec<Argument>` for [`Container::resolve_with`](crate::Container::resolve_with)
#[macro_export]
macro_rules! args {
    () => {
        ::std::vec::Vec::<$crate::factory::Argument>::new()
    };
    ($($arg:expr),+ $(,)?) => {
        ::std::vec![$($crate::factory::Argument::new($arg)),+]
    };
}

type Invoker = dyn Fn(Vec<Argument>) -> Result<Vec<Value>, ContainerError> + Send + Sync;

/// A callable concrete
#[derive(Clone)]
pub struct Factory {
    ty: Type,
    signature: Signature,
    call: Arc<Invoker>,
}

impl Factory {
    /// Wrap a closure
    ///
    /// ```rust
    /// use std::sync::Arc;
    /// use tagwire_core::{args, Factory};
    ///
    /// let factory = Factory::new(|name: String, port: u16| Arc::new(format!("{name}:{port}")));
    /// assert_eq!(factory.arity(), 2);
    ///
    /// let value = factory.invoke(args!["localhost".to_string(), 8080u16]).unwrap();
    /// assert_eq!(value.downcast::<String>().unwrap().as_str(), "localhost:8080");
    /// ```
    pub fn new<Args, F>(factory: F) -> Self
    where
        F: IntoFactory<Args>,
    {
        factory.into_factory()
    }

    pub fn ty(&self) -> &Type {
        &self.ty
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Number of declared parameters
    pub fn arity(&self) -> usize {
        self.signature.arity()
    }

    pub fn ptr_eq(&self, other: &Factory) -> bool {
        Arc::ptr_eq(&self.call, &other.call)
    }

    /// Call the factory and keep its first output.
    ///
    /// The argument count must match the declared parameter count exactly;
    /// any outputs after the first are dropped unexamined.
    pub fn invoke(&self, args: Vec<Argument>) -> Result<Value, ContainerError> {
        let expected = self.arity();
        if args.len() != expected {
            return Err(ContainerError::insufficient_arguments(expected, args.len()));
        }

        (self.call)(args)?
            .into_iter()
            .next()
            .ok_or(ContainerError::NoValuesReturned)
    }
}

impl fmt::Debug for Factory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Factory")
            .field("type", &self.ty.name())
            .field("signature", &self.signature)
            .finish()
    }
}

/// Conversion of closures into [`Factory`], keyed by the parameter tuple
pub trait IntoFactory<Args>: Send + Sync + 'static {
    fn into_factory(self) -> Factory;
}

/// A single factory output
pub trait Output {
    fn into_value(self) -> Value;
}

impl<T: ?Sized + Reflect> Output for Arc<T> {
    fn into_value(self) -> Value {
        Value::shared(self)
    }
}

impl Output for Value {
    fn into_value(self) -> Value {
        self
    }
}

/// Everything a factory may return
pub trait Outputs {
    /// Declared number of outputs
    const COUNT: usize;

    fn into_values(self) -> Vec<Value>;
}

impl Outputs for () {
    const COUNT: usize = 0;

    fn into_values(self) -> Vec<Value> {
        Vec::new()
    }
}

impl<T: ?Sized + Reflect> Outputs for Arc<T> {
    const COUNT: usize = 1;

    fn into_values(self) -> Vec<Value> {
        vec![self.into_value()]
    }
}

impl Outputs for Value {
    const COUNT: usize = 1;

    fn into_values(self) -> Vec<Value> {
        vec![self]
    }
}

macro_rules! impl_outputs_for_tuple {
    ($count:expr; $($out:ident),+) => {
        impl<$($out: Output),+> Outputs for ($($out,)+) {
            const COUNT: usize = $count;

            #[allow(non_snake_case)]
            fn into_values(self) -> Vec<Value> {
                let ($($out,)+) = self;
                vec![$($out.into_value()),+]
            }
        }
    };
}

impl_outputs_for_tuple!(1; O1);
impl_outputs_for_tuple!(2; O1, O2);
impl_outputs_for_tuple!(3; O1, O2, O3);

macro_rules! impl_into_factory {
    ($($param:ident),*) => {
        impl<Func, Out, $($param,)*> IntoFactory<($($param,)*)> for Func
        where
            Func: Fn($($param),*) -> Out + Send + Sync + 'static,
            Out: Outputs,
            $($param: Any + Send,)*
        {
            #[allow(non_snake_case, unused_mut, unused_variables)]
            fn into_factory(self) -> Factory {
                let signature = Signature::new(vec![$(Parameter::of::<$param>()),*], Out::COUNT);
                let arity = signature.arity();
                let call = move |args: Vec<Argument>| -> Result<Vec<Value>, ContainerError> {
                    let got = args.len();
                    let mut args = args.into_iter().enumerate();
                    $(
                        let $param = match args.next() {
                            Some((index, argument)) => argument.take::<$param>(index)?,
                            None => return Err(ContainerError::insufficient_arguments(arity, got)),
                        };
                    )*
                    Ok(self($($param),*).into_values())
                };

                Factory {
                    ty: Type::callable::<Func>(signature.clone()),
                    signature,
                    call: Arc::new(call),
                }
            }
        }
    };
}

impl_into_factory!();
impl_into_factory!(A1);
impl_into_factory!(A1, A2);
impl_into_factory!(A1, A2, A3);
impl_into_factory!(A1, A2, A3, A4);
impl_into_factory!(A1, A2, A3, A4, A5);
impl_into_factory!(A1, A2, A3, A4, A5, A6);
