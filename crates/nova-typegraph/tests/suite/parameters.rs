use std::collections::HashSet;
use std::sync::Arc;

use nova_typegraph::{
    DeclaredNameDiscoverer, OptionalityProbe, ParameterDescriptor, TypeGraphError, TypeSource,
};
use nova_types::{Annotation, ClassRef, Type, TypeEnv, TypeStore};
use pretty_assertions::assert_eq;

use super::fixtures::Fixture;

fn env(fx: &Fixture) -> Arc<dyn TypeEnv + Send + Sync> {
    fx.store.clone()
}

#[test]
fn indexes_outside_the_parameter_list_are_rejected() {
    let fx = Fixture::new();
    let engine = fx.engine();

    assert_eq!(
        engine.parameter(fx.put_all, 1).unwrap_err(),
        TypeGraphError::InvalidIndex { index: 1, max: 0 }
    );
    assert_eq!(
        engine.parameter(fx.lookup, -2).unwrap_err(),
        TypeGraphError::InvalidIndex { index: -2, max: 1 }
    );
    assert_eq!(
        engine.parameter(fx.get, 0).unwrap_err(),
        TypeGraphError::InvalidIndex { index: 0, max: -1 }
    );
    assert!(engine.for_method_parameter(fx.lookup, 2, fx.service).is_err());

    for index in -1..=1 {
        let parameter = engine.parameter(fx.lookup, index).expect("valid index");
        assert_eq!(parameter.parameter_index(), index);
        assert_eq!(parameter.is_return_type(), index == -1);
    }
}

#[test]
fn unknown_executables_are_rejected() {
    let fx = Fixture::new();
    let empty: Arc<dyn TypeEnv + Send + Sync> = Arc::new(TypeStore::default());

    assert_eq!(
        ParameterDescriptor::new(empty.clone(), fx.lookup, 0).unwrap_err(),
        TypeGraphError::UnknownExecutable(fx.lookup)
    );
    assert_eq!(
        ParameterDescriptor::for_method(empty, fx.lookup, 0).unwrap_err(),
        TypeGraphError::UnknownExecutable(fx.lookup)
    );
}

#[test]
fn method_and_constructor_factories_check_the_executable_kind() {
    let fx = Fixture::new();

    assert_eq!(
        ParameterDescriptor::for_constructor(env(&fx), fx.get, -1).unwrap_err(),
        TypeGraphError::ExecutableKindMismatch {
            executable: fx.get,
            expected: "constructor",
        }
    );
    assert_eq!(
        ParameterDescriptor::for_method(env(&fx), fx.ctor, 0).unwrap_err(),
        TypeGraphError::ExecutableKindMismatch {
            executable: fx.ctor,
            expected: "method",
        }
    );

    let hint = ParameterDescriptor::for_constructor(env(&fx), fx.ctor, 1).expect("constructor");
    assert!(hint.is_constructor());
    assert_eq!(hint.method_name(), None);
    let key = ParameterDescriptor::for_method(env(&fx), fx.lookup, 0).expect("method");
    assert!(!key.is_constructor());
    assert_eq!(key.method_name(), Some("lookup"));
}

#[test]
fn descriptors_display_their_position() {
    let fx = Fixture::new();
    let engine = fx.engine();

    assert_eq!(
        engine.parameter(fx.put_all, 0).unwrap().to_string(),
        "method 'putAll' parameter 0"
    );
    assert_eq!(
        engine.parameter(fx.get, -1).unwrap().to_string(),
        "method 'get' parameter -1"
    );
    assert_eq!(
        engine.parameter(fx.ctor, 1).unwrap().to_string(),
        "constructor parameter 1"
    );
}

#[test]
fn equality_ignores_nesting_and_containing_class() {
    let fx = Fixture::new();
    let engine = fx.engine();
    let items = engine.parameter(fx.put_all, 0).unwrap();
    let nested = items.nested();
    let contained = items.with_containing_class(fx.string_service);

    assert_eq!(nested.nesting_level(), 2);
    assert_eq!(items.nesting_level(), 1);
    assert_eq!(items, nested);
    assert_eq!(items, contained);
    assert_ne!(items, engine.parameter(fx.put_all, -1).unwrap());

    let set: HashSet<_> = [items, nested, contained].into_iter().collect();
    assert_eq!(set.len(), 1);
}

#[test]
fn declared_and_erased_types() {
    let fx = Fixture::new();
    let engine = fx.engine();

    let items = engine.parameter(fx.put_all, 0).unwrap();
    assert_eq!(
        items.generic_parameter_type(),
        &Type::parameterized(fx.list, vec![Type::TypeVar(fx.service_t)])
    );
    assert_eq!(items.parameter_type(), &fx.class(fx.list));

    let get = engine.parameter(fx.get, -1).unwrap();
    assert_eq!(get.generic_parameter_type(), &Type::TypeVar(fx.service_t));
    assert_eq!(get.parameter_type(), &fx.class(fx.object));

    let ids = engine.parameter(fx.lookup, 1).unwrap();
    assert_eq!(
        ids.parameter_type(),
        &ClassRef::array_of(fx.class(fx.integer))
    );

    let constructed = engine.parameter(fx.ctor, -1).unwrap();
    assert_eq!(constructed.generic_parameter_type(), &Type::class(fx.void));
    assert_eq!(constructed.parameter_type(), &fx.class(fx.void));

    assert_eq!(items.declaring_class(), fx.service);
    assert_eq!(items.containing_class(), fx.service);
    assert_eq!(
        items.with_containing_class(fx.string_service).containing_class(),
        fx.string_service
    );
}

#[test]
fn nested_parameter_types_walk_generic_arguments() {
    let fx = Fixture::new();
    let engine = fx.engine();
    let result = engine.parameter(fx.lookup, -1).unwrap();

    assert_eq!(result.nested_parameter_type(), fx.class(fx.map));
    let level2 = result.nested();
    assert_eq!(level2.nested_parameter_type(), fx.class(fx.list));
    assert_eq!(
        level2.nested_generic_parameter_type(),
        fx.parameterized(fx.list, &[fx.integer])
    );
    assert_eq!(level2.nested().nested_parameter_type(), fx.class(fx.integer));

    let mut key = result.nested();
    assert_eq!(key.type_index_for_current_level(), None);
    key.set_type_index_for_current_level(0);
    assert_eq!(key.type_index_for_current_level(), Some(0));
    assert_eq!(key.type_index_for_level(3), None);
    assert_eq!(key.nested_parameter_type(), fx.class(fx.string));

    // A bare variable erases to `Object`.
    let items = engine.parameter(fx.put_all, 0).unwrap().nested();
    assert_eq!(items.nested_parameter_type(), fx.class(fx.object));
}

#[test]
fn annotations_come_from_the_declaration() {
    let fx = Fixture::new();
    let engine = fx.engine();

    let lookup = engine.parameter(fx.lookup, 0).unwrap();
    assert_eq!(
        lookup.method_annotations(),
        &[Annotation::new("javax.annotation.CheckReturnValue")]
    );
    assert!(!lookup.has_parameter_annotations());

    let hint = engine.parameter(fx.ctor, 1).unwrap();
    assert!(hint.has_parameter_annotations());
    assert!(hint.has_nullable_annotation());
    assert!(hint.method_annotations().is_empty());

    assert!(engine.parameter(fx.lookup, -1).unwrap().parameter_annotations().is_empty());
}

#[derive(Debug)]
struct FirstLookupArgument;

impl OptionalityProbe for FirstLookupArgument {
    fn is_optional(&self, parameter: &ParameterDescriptor) -> bool {
        parameter.method_name() == Some("lookup") && parameter.parameter_index() == 0
    }
}

#[test]
fn optionality_comes_from_type_annotation_or_probe() {
    let fx = Fixture::new();
    let engine = fx.engine();

    assert!(!engine.parameter(fx.ctor, 0).unwrap().is_optional());
    assert!(engine.parameter(fx.ctor, 1).unwrap().is_optional());

    let key = engine.parameter(fx.lookup, 0).unwrap();
    assert!(!key.is_optional());
    assert!(key
        .with_optionality_probe(Arc::new(FirstLookupArgument))
        .is_optional());
}

#[test]
fn names_come_from_the_configured_discoverer() {
    let fx = Fixture::new();
    let engine = fx.engine();

    let items = engine.parameter(fx.put_all, 0).unwrap();
    assert_eq!(items.parameter_name(), None);
    let items = items.with_name_discoverer(Arc::new(DeclaredNameDiscoverer));
    assert_eq!(items.parameter_name(), Some("items"));

    let hint = engine
        .parameter(fx.ctor, 1)
        .unwrap()
        .with_name_discoverer(Arc::new(DeclaredNameDiscoverer));
    assert_eq!(hint.parameter_name(), Some("hint"));

    // `ids` is unnamed, so nothing is reported for the whole method.
    let key = engine
        .parameter(fx.lookup, 0)
        .unwrap()
        .with_name_discoverer(Arc::new(DeclaredNameDiscoverer));
    assert_eq!(key.parameter_name(), None);

    let result = engine
        .parameter(fx.get, -1)
        .unwrap()
        .with_name_discoverer(Arc::new(DeclaredNameDiscoverer));
    assert_eq!(result.parameter_name(), None);
}

#[test]
fn parameter_nodes_resolve_against_the_implementation_class() {
    let fx = Fixture::new();
    for engine in fx.engines() {
        let items = engine
            .for_method_parameter(fx.put_all, 0, fx.string_service)
            .unwrap();
        assert_eq!(items.resolve(), Some(fx.class(fx.list)));
        assert_eq!(items.generic(&[]).resolve(), Some(fx.class(fx.string)));

        let declared = engine.for_method_parameter(fx.put_all, 0, fx.service).unwrap();
        assert_eq!(declared.generic(&[]).resolve(), None);

        let get = engine.parameter(fx.get, -1).unwrap();
        assert_eq!(engine.for_parameter(&get).resolve(), None);
        assert_eq!(
            engine
                .for_parameter(&get.with_containing_class(fx.string_service))
                .resolve(),
            Some(fx.class(fx.string))
        );
    }
}

#[test]
fn parameter_nodes_honour_nesting() {
    let fx = Fixture::new();
    let engine = fx.engine();

    let items = engine
        .parameter(fx.put_all, 0)
        .unwrap()
        .with_containing_class(fx.string_service)
        .nested();
    assert_eq!(engine.for_parameter(&items).resolve(), Some(fx.class(fx.string)));

    let mut key = engine.parameter(fx.lookup, -1).unwrap().nested();
    key.set_type_index_for_current_level(0);
    assert_eq!(engine.for_parameter(&key).resolve(), Some(fx.class(fx.string)));
}

#[test]
fn parameter_nodes_remember_their_source() {
    let fx = Fixture::new();
    let engine = fx.engine();

    let result = engine.for_method_return_type(fx.lookup).unwrap();
    assert_eq!(result.resolve(), Some(fx.class(fx.map)));
    assert_eq!(
        result.source(),
        Some(TypeSource::Parameter {
            executable: fx.lookup,
            parameter_index: -1,
        })
    );

    let key = engine.parameter(fx.lookup, 0).unwrap();
    let target = engine.for_parameter_with_target(&key, Type::class(fx.integer));
    assert_eq!(target.resolve(), Some(fx.class(fx.integer)));
    assert_eq!(
        target.source(),
        Some(TypeSource::Parameter {
            executable: fx.lookup,
            parameter_index: 0,
        })
    );
}
