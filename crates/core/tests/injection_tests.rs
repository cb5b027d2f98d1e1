//! Integration tests for recursive field injection

use std::sync::Arc;

use tagwire_core::{
    args, contract, Container, ContainerConfig, ContainerError, DynError, Factory, Inject,
    Injectable, Record, Type, TypeKind, Value,
};

pub trait Fooer: Send + Sync {
    fn foo(&self) -> String;
}

pub trait Bazer: Send + Sync {
    fn baz(&self) -> String;
}

pub trait Linked: Send + Sync {}

contract!(dyn Fooer, dyn Bazer, dyn Linked);

#[derive(Injectable, Default)]
#[injectable(implements(dyn Fooer))]
pub struct Foo {
    #[inject]
    pub baz: Inject<dyn Bazer>,
}

impl Fooer for Foo {
    fn foo(&self) -> String {
        "Foo..".to_string()
    }
}

#[derive(Injectable, Default)]
#[injectable(implements(dyn Bazer))]
pub struct Baz;

impl Bazer for Baz {
    fn baz(&self) -> String {
        "Baz..".to_string()
    }
}

#[derive(Injectable, Default)]
pub struct ErrorHolder {
    #[inject]
    pub err: Inject<DynError>,
}

#[derive(Injectable, Default)]
pub struct RecursiveTarget {
    #[inject]
    pub err: Inject<DynError>,
    #[inject]
    pub foo: Inject<dyn Fooer>,
    #[inject]
    pub not_injectable_non_contract: String,
    #[inject]
    not_injectable_private: Inject<DynError>,
}

#[derive(Injectable)]
pub struct Coded {
    pub code: String,
    pub message: String,
}

#[derive(Injectable, Default)]
#[injectable(implements(dyn Linked))]
pub struct Node {
    #[inject]
    pub next: Inject<dyn Linked>,
}

impl Linked for Node {}

#[derive(Injectable, Default)]
pub struct RecordHolder {
    #[inject]
    pub baz: Inject<Baz>,
    #[inject]
    pub shared_baz: Inject<Arc<Baz>>,
}

pub trait Walker: Record {
    fn ready(&self) -> bool;
}

contract!(dyn Walker: Record);

#[derive(Injectable, Default)]
#[injectable(implements(dyn Walker))]
pub struct Trail {
    #[inject]
    pub baz: Inject<dyn Bazer>,
}

impl Walker for Trail {
    fn ready(&self) -> bool {
        self.baz.is_populated()
    }
}

#[derive(Injectable, Default)]
pub struct WalkerHolder {
    #[inject]
    pub walker: Inject<dyn Walker>,
}

fn trail_factory() -> Factory {
    Factory::new(|| -> Arc<dyn Walker> { Arc::new(Trail::default()) })
}

fn error(message: &str) -> Arc<DynError> {
    Arc::from(Box::<DynError>::from(message))
}

fn data_ptr<T: ?Sized>(instance: &Arc<T>) -> *const () {
    Arc::as_ptr(instance).cast::<()>()
}

#[test]
fn test_inject_rejects_owned_target() {
    let container = Container::new();
    let target = Coded {
        code: "my_code".to_string(),
        message: "my_message".to_string(),
    };
    let err = container.inject(Value::of(target)).unwrap_err();
    assert_eq!(err.to_string(), "injecting to record is not supported");

    let err = container.inject(Value::of(3u8)).unwrap_err();
    assert_eq!(
        err,
        ContainerError::InvalidInjectTargetType {
            kind: TypeKind::Other
        }
    );
}

#[test]
fn test_inject_reports_missing_binding() {
    let container = Container::new();
    let holder = Arc::new(ErrorHolder::default());
    let err = container.inject_into(&holder).unwrap_err();
    assert_eq!(
        err.to_string(),
        format!("{} is not bound yet", Type::of::<DynError>().name())
    );
    assert!(!holder.err.is_populated());
}

#[test]
fn test_inject_populates_field() {
    let container = Container::new();
    container
        .bind(Type::of::<DynError>(), error("my_message"))
        .unwrap();

    let holder = Arc::new(ErrorHolder::default());
    container.inject_into(&holder).unwrap();
    assert_eq!(holder.err.get().unwrap().to_string(), "my_message");
}

#[test]
fn test_inject_accepts_shared_value() {
    let container = Container::new();
    container
        .bind(Type::of::<DynError>(), error("my_message"))
        .unwrap();

    let holder = Arc::new(ErrorHolder::default());
    container.inject(holder.clone()).unwrap();
    assert!(holder.err.is_populated());
}

#[test]
fn test_inject_recursively() {
    let container = Container::new();
    let foo = Arc::new(Foo::default());
    container
        .bind(Type::of::<DynError>(), error("my_message"))
        .unwrap();
    container
        .bind(Type::of::<dyn Fooer>(), foo.clone())
        .unwrap();
    container
        .bind(Type::of::<dyn Bazer>(), Arc::new(Baz))
        .unwrap();

    let target = Arc::new(RecursiveTarget::default());
    container.inject_into(&target).unwrap();

    assert_eq!(target.err.get().unwrap().to_string(), "my_message");

    let injected = target.foo.get().unwrap();
    assert_eq!(injected.foo(), "Foo..");
    assert_eq!(data_ptr(&injected), data_ptr(&foo));
    assert_eq!(foo.baz.get().unwrap().baz(), "Baz..");

    assert!(target.not_injectable_non_contract.is_empty());
    assert!(!target.not_injectable_private.is_populated());
}

#[test]
fn test_inject_recurses_into_factory_results() {
    let container = Container::new();
    container
        .bind(Type::of::<DynError>(), error("my_message"))
        .unwrap();
    container
        .bind(
            Type::of::<dyn Fooer>(),
            Factory::new(|| Arc::new(Foo::default())),
        )
        .unwrap();
    container
        .bind(Type::of::<dyn Bazer>(), Arc::new(Baz))
        .unwrap();

    let target = Arc::new(RecursiveTarget::default());
    container.inject_into(&target).unwrap();
    assert_eq!(target.foo.get().unwrap().foo(), "Foo..");
}

#[test]
fn test_inject_walks_record_behind_contract_factory() {
    let container = Container::new();
    container
        .bind(Type::of::<dyn Walker>(), trail_factory())
        .unwrap();

    let holder = Arc::new(WalkerHolder::default());
    let err = container.inject_into(&holder).unwrap_err();
    assert_eq!(
        err,
        ContainerError::abstract_not_bound(Type::of::<dyn Bazer>().name())
    );
    assert!(!holder.walker.is_populated());

    container
        .bind(Type::of::<dyn Bazer>(), Arc::new(Baz))
        .unwrap();
    container.inject_into(&holder).unwrap();
    assert!(holder.walker.get().unwrap().ready());
}

#[test]
fn test_plain_contract_factory_result_has_no_fields() {
    let container = Container::new();
    container
        .bind(
            Type::of::<dyn Fooer>(),
            Factory::new(|| -> Arc<dyn Fooer> { Arc::new(Foo::default()) }),
        )
        .unwrap();

    let resolved = container.resolve(Type::of::<dyn Fooer>()).unwrap();
    assert!(resolved.as_record().is_none());

    let walker = container
        .bind(Type::of::<dyn Walker>(), trail_factory())
        .and_then(|_| container.resolve(Type::of::<dyn Walker>()))
        .unwrap();
    assert_eq!(walker.as_record().map(|record| record.fields().len()), Some(1));
}

#[test]
fn test_inject_stops_at_first_failure() {
    let container = Container::new();
    container
        .bind(Type::of::<DynError>(), error("my_message"))
        .unwrap();
    container
        .bind(Type::of::<dyn Fooer>(), Arc::new(Foo::default()))
        .unwrap();

    let target = Arc::new(RecursiveTarget::default());
    let err = container.inject_into(&target).unwrap_err();
    assert_eq!(
        err,
        ContainerError::abstract_not_bound(Type::of::<dyn Bazer>().name())
    );
    assert!(target.err.is_populated());
    assert!(!target.foo.is_populated());
}

#[test]
fn test_inject_reports_incompatible_factory_result() {
    let container = Container::new();
    container
        .bind(Type::of::<DynError>(), Factory::new(|| Arc::new(Baz)))
        .unwrap();

    let holder = Arc::new(ErrorHolder::default());
    let err = container.inject_into(&holder).unwrap_err();
    assert_eq!(
        err,
        ContainerError::incompatible_field_value(
            "err",
            Type::of::<DynError>().name(),
            Type::of::<Arc<Baz>>().name(),
        )
    );
}

#[test]
fn test_inject_factory_needing_arguments_fails() {
    let container = Container::new();
    container
        .bind(
            Type::of::<DynError>(),
            Factory::new(|message: String| -> Arc<DynError> {
                Arc::from(Box::<DynError>::from(message))
            }),
        )
        .unwrap();

    let holder = Arc::new(ErrorHolder::default());
    let err = container.inject_into(&holder).unwrap_err();
    assert_eq!(err, ContainerError::insufficient_arguments(1, 0));

    let resolved = container
        .resolve_as_with::<DynError>(args!["direct".to_string()])
        .unwrap();
    assert_eq!(resolved.to_string(), "direct");
}

#[test]
fn test_inject_record_fields() {
    let container = Container::new();
    let baz = Arc::new(Baz);
    container.bind(Type::of::<Baz>(), baz.clone()).unwrap();

    let holder = Arc::new(RecordHolder::default());
    container.inject_into(&holder).unwrap();

    assert!(Arc::ptr_eq(&holder.baz.get().unwrap(), &baz));
    assert!(Arc::ptr_eq(holder.shared_baz.get().unwrap().as_ref(), &baz));
}

#[test]
fn test_inject_owned_record_binding_fails() {
    let container = Container::new();
    container.bind(Type::of::<Baz>(), Value::of(Baz)).unwrap();

    let holder = Arc::new(RecordHolder::default());
    let err = container.inject_into(&holder).unwrap_err();
    assert_eq!(
        err,
        ContainerError::InvalidInjectTargetType {
            kind: TypeKind::Record
        }
    );
}

#[test]
fn test_depth_limit_stops_cycles() {
    let config = ContainerConfig::new().with_max_injection_depth(8);
    let container = Container::with_config(config);
    container
        .bind(Type::of::<dyn Linked>(), Arc::new(Node::default()))
        .unwrap();

    let head = Arc::new(Node::default());
    let err = container.inject_into(&head).unwrap_err();
    assert_eq!(err, ContainerError::InjectionDepthExceeded { limit: 8 });
    assert!(!head.next.is_populated());
}

#[test]
fn test_depth_limit_counts_nesting() {
    let container = Container::with_config(ContainerConfig::new().with_max_injection_depth(1));
    container
        .bind(Type::of::<DynError>(), error("my_message"))
        .unwrap();
    container
        .bind(Type::of::<dyn Fooer>(), Arc::new(Foo::default()))
        .unwrap();
    container
        .bind(Type::of::<dyn Bazer>(), Arc::new(Baz))
        .unwrap();

    let target = Arc::new(RecursiveTarget::default());
    let err = container.inject_into(&target).unwrap_err();
    assert_eq!(err, ContainerError::InjectionDepthExceeded { limit: 1 });

    let container = Container::with_config(ContainerConfig::new().with_max_injection_depth(2));
    container
        .bind(Type::of::<DynError>(), error("my_message"))
        .unwrap();
    container
        .bind(Type::of::<dyn Fooer>(), Arc::new(Foo::default()))
        .unwrap();
    container
        .bind(Type::of::<dyn Bazer>(), Arc::new(Baz))
        .unwrap();

    let target = Arc::new(RecursiveTarget::default());
    assert!(container.inject_into(&target).is_ok());
}

#[test]
fn test_concurrent_injection() {
    let container = Container::new();
    container
        .bind(Type::of::<DynError>(), error("my_message"))
        .unwrap();
    container
        .bind(
            Type::of::<dyn Fooer>(),
            Factory::new(|| Arc::new(Foo::default())),
        )
        .unwrap();
    container
        .bind(Type::of::<dyn Bazer>(), Arc::new(Baz))
        .unwrap();

    std::thread::scope(|scope| {
        for _ in 0..8 {
            let container = &container;
            scope.spawn(move || {
                for _ in 0..50 {
                    let target = Arc::new(RecursiveTarget::default());
                    container.inject_into(&target).unwrap();
                    assert_eq!(target.foo.get().unwrap().foo(), "Foo..");
                }
            });
        }
    });
}

#[test]
fn test_injection_emits_tracing_events() {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .finish();

    tracing::subscriber::with_default(subscriber, || {
        let container = Container::new();
        container
            .bind(Type::of::<DynError>(), error("my_message"))
            .unwrap();
        let holder = Arc::new(ErrorHolder::default());
        container.inject_into(&holder).unwrap();
        assert!(holder.err.is_populated());
    });
}
