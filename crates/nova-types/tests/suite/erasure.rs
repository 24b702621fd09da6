use nova_types::{
    erasure, generic_interfaces, generic_superclass, type_parameters, ClassRef, Type, TypeEnv,
    TypeParamDef, TypeStore,
};

use pretty_assertions::assert_eq;

#[test]
fn parameterized_types_erase_to_their_raw_class() {
    let store = TypeStore::with_minimal_jdk();
    let list = store.class_id("java.util.List").unwrap();
    let string = store.well_known().string;

    let list_string = Type::parameterized(list, vec![Type::class(string)]);
    assert_eq!(erasure(&store, &list_string), ClassRef::Declared(list));
}

#[test]
fn type_variables_erase_to_their_first_bound() {
    let mut store = TypeStore::default();
    let number = store.well_known().number;
    let t = store.add_type_param("T", vec![Type::class(number)]);

    assert_eq!(
        erasure(&store, &Type::generic_array(Type::TypeVar(t))),
        ClassRef::array_of(ClassRef::Declared(number))
    );
    assert_eq!(
        erasure(&store, &Type::wildcard_extends(Type::TypeVar(t))),
        ClassRef::Declared(number)
    );
}

#[test]
fn self_referential_bounds_erase_without_looping() {
    let mut store = TypeStore::default();
    let object = store.well_known().object;
    let t = store.add_type_param("T", vec![Type::class(object)]);
    store.define_type_param(
        t,
        TypeParamDef {
            name: "T".to_string(),
            upper_bounds: vec![Type::TypeVar(t)],
        },
    );

    assert_eq!(erasure(&store, &Type::TypeVar(t)), ClassRef::Declared(object));
}

#[test]
fn array_classes_report_jvm_supertypes() {
    let store = TypeStore::default();
    let wk = store.well_known().clone();
    let array = ClassRef::array_of(ClassRef::Declared(wk.string));

    assert_eq!(
        generic_superclass(&store, &array),
        Some(Type::class(wk.object))
    );
    assert_eq!(
        generic_interfaces(&store, &array),
        vec![Type::class(wk.cloneable), Type::class(wk.serializable)]
    );
    assert!(type_parameters(&store, &array).is_empty());
}

#[test]
fn interfaces_have_no_superclass() {
    let store = TypeStore::with_minimal_jdk();
    let list = ClassRef::Declared(store.class_id("java.util.List").unwrap());
    assert_eq!(generic_superclass(&store, &list), None);
    assert_eq!(generic_interfaces(&store, &list).len(), 1);
    assert_eq!(type_parameters(&store, &list).len(), 1);
}
