use nova_types::{ClassRef, Type};
use pretty_assertions::assert_eq;

use super::fixtures::Fixture;

#[test]
fn super_type_carries_bound_arguments() {
    let fx = Fixture::new();
    let engine = fx.engine();

    let parent = engine.for_class(fx.string_box).super_type();
    assert_eq!(parent.ty(), Some(&fx.parameterized(fx.boxed, &[fx.string])));
    assert_eq!(parent.generic(&[]).resolve(), Some(fx.class(fx.string)));

    let abstract_list = engine
        .for_type(fx.parameterized(fx.array_list, &[fx.string]))
        .super_type();
    assert_eq!(
        abstract_list.raw_class(),
        engine.for_class_name("java.util.AbstractList").resolve()
    );
    assert_eq!(abstract_list.generic(&[]).resolve(), Some(fx.class(fx.string)));
}

#[test]
fn root_types_have_no_super_type() {
    let fx = Fixture::new();
    let engine = fx.engine();

    assert!(engine.for_class(fx.object).super_type().is_none());
    assert!(engine.for_class(fx.list).super_type().is_none());
}

#[test]
fn interfaces_keep_declaration_order() {
    let fx = Fixture::new();
    let engine = fx.engine();

    let names: Vec<_> = engine
        .for_class(fx.array_list)
        .interfaces()
        .iter()
        .map(|iface| iface.raw_class())
        .collect();
    assert_eq!(
        names,
        vec![
            Some(fx.class(fx.list)),
            engine.for_class_name("java.util.RandomAccess").resolve(),
            engine.for_class_name("java.lang.Cloneable").resolve(),
            engine.for_class_name("java.io.Serializable").resolve(),
        ]
    );
}

#[test]
fn as_class_finds_the_generic_view_of_an_ancestor() {
    let fx = Fixture::new();
    let engine = fx.engine();

    let comparable = engine.for_class(fx.integer).as_class(&fx.class(fx.comparable));
    assert_eq!(comparable.raw_class(), Some(fx.class(fx.comparable)));
    assert_eq!(comparable.generic(&[]).resolve(), Some(fx.class(fx.integer)));

    // Three interface hops: ArrayList -> List -> Collection -> Iterable.
    let iterable = engine
        .for_type(fx.parameterized(fx.array_list, &[fx.string]))
        .as_class(&fx.class(fx.iterable));
    assert_eq!(iterable.raw_class(), Some(fx.class(fx.iterable)));
    assert_eq!(iterable.generic(&[]).resolve(), Some(fx.class(fx.string)));
}

#[test]
fn as_class_searches_interfaces_before_the_superclass() {
    let fx = Fixture::new();
    let engine = fx.engine();

    let comparable = engine.for_class(fx.derived).as_class(&fx.class(fx.comparable));
    assert_eq!(comparable.generic(&[]).resolve(), Some(fx.class(fx.string)));
}

#[test]
fn as_class_on_unrelated_types_is_empty() {
    let fx = Fixture::new();
    let engine = fx.engine();

    assert!(engine.for_class(fx.string).as_class(&fx.class(fx.list)).is_none());
}

#[test]
fn as_class_on_unresolvable_nodes_is_empty() {
    let fx = Fixture::new();
    let engine = fx.engine();

    let unbound = engine.for_type(Type::TypeVar(fx.box_t));
    assert_eq!(unbound.resolve(), None);
    assert!(unbound.as_class(&fx.class(fx.list)).is_none());
    assert!(unbound.as_class(&fx.class(fx.object)).is_none());
}

#[test]
fn bare_classes_expose_their_type_parameters() {
    let fx = Fixture::new();
    let engine = fx.engine();

    let boxed = engine.for_class(fx.boxed);
    assert!(boxed.has_generics());
    assert_eq!(boxed.generics().len(), 1);
    assert_eq!(boxed.generics()[0].ty(), Some(&Type::TypeVar(fx.box_t)));
    assert_eq!(boxed.generic(&[]).resolve(), None);

    assert!(!engine.for_class(fx.string).has_generics());
}

#[test]
fn bare_class_type_parameters_share_the_class_context() {
    let fx = Fixture::new();
    let engine = fx.engine();

    let declared = engine.for_class(fx.boxed).generic(&[]);
    assert_eq!(declared, engine.for_type(Type::TypeVar(fx.box_t)));

    // A class reached through a parameterized supertype passes its own context down.
    let owner = engine.for_type(fx.parameterized(fx.boxed, &[fx.string]));
    let nested = engine.for_type_in(Type::class(fx.boxed), &owner).generic(&[]);
    assert_eq!(nested, engine.for_type_in(Type::TypeVar(fx.box_t), &owner));
    assert_eq!(nested.resolve(), Some(fx.class(fx.string)));
}

#[test]
fn generic_walks_nested_indexes() {
    let fx = Fixture::new();
    let engine = fx.engine();
    let map = engine.for_type(fx.map_of_lists());

    assert_eq!(map.generic(&[]).resolve(), Some(fx.class(fx.string)));
    assert_eq!(map.generic(&[1]).resolve(), Some(fx.class(fx.list)));
    assert_eq!(map.generic(&[1, 0]).resolve(), Some(fx.class(fx.integer)));
    assert!(map.generic(&[2]).is_none());
    assert!(map.generic(&[0, 0]).is_none());
}

#[test]
fn array_classes_expose_their_component() {
    let fx = Fixture::new();
    let engine = fx.engine();

    let integers = engine.for_class(ClassRef::array_of(fx.class(fx.integer)));
    assert!(integers.is_array());
    assert_eq!(integers.component_type().resolve(), Some(fx.class(fx.integer)));

    let ints = engine.for_class(ClassRef::array_of(fx.class(fx.int)));
    assert_eq!(ints.component_type().resolve(), Some(fx.class(fx.int)));

    let string = engine.for_class(fx.string);
    assert!(!string.is_array());
    assert!(string.component_type().is_none());
}

#[test]
fn generic_arrays_expose_their_generic_component() {
    let fx = Fixture::new();
    let engine = fx.engine();

    let lists = engine.for_type(Type::generic_array(fx.parameterized(fx.list, &[fx.string])));
    assert!(lists.is_array());
    let component = lists.component_type();
    assert_eq!(component.raw_class(), Some(fx.class(fx.list)));
    assert_eq!(component.generic(&[]).resolve(), Some(fx.class(fx.string)));
}

#[test]
fn array_component_factory_keeps_the_component_node() {
    let fx = Fixture::new();
    let engine = fx.engine();

    let element = engine.for_type(fx.parameterized(fx.list, &[fx.string]));
    let array = engine.for_array_component(&element);
    assert_eq!(array.resolve(), Some(ClassRef::array_of(fx.class(fx.list))));
    assert!(array.is_array());
    assert_eq!(array.component_type(), element);
    assert_eq!(array.component_type().generic(&[]).resolve(), Some(fx.class(fx.string)));

    let unresolved = engine.for_type(Type::TypeVar(fx.box_t));
    assert!(engine.for_array_component(&unresolved).is_none());
}

#[test]
fn self_referential_bounds_terminate() {
    let fx = Fixture::new();
    let engine = fx.engine();

    let enum_class = engine.for_class_name("java.lang.Enum");
    let comparable = enum_class.as_class(&fx.class(fx.comparable));
    let e = comparable.generic(&[]);
    assert_eq!(e.resolve(), enum_class.resolve());
    assert_eq!(e.generic(&[]).resolve(), enum_class.resolve());

    let concrete = engine.for_class(fx.concrete).as_class(&fx.class(fx.self_ref));
    assert_eq!(concrete.generic(&[]).resolve(), Some(fx.class(fx.concrete)));
}
