//! Built-in declarations for the handful of JDK classes the type graph relies on.
//!
//! This is not a JDK model: only supertypes and type parameters are recorded, which is all
//! generic resolution needs. Real projects load the rest from the classpath.

use crate::{
    ClassDef, ClassId, ClassKind, PrimitiveType, Type, TypeEnv, TypeParamDef, TypeStore, TypeVarId,
    WellKnownTypes,
};

pub(crate) fn define_core(store: &mut TypeStore) {
    let object = store.add_class(ClassDef::new("java.lang.Object", ClassKind::Class));
    let object_ty = Type::class(object);

    let serializable = interface(store, "java.io.Serializable", &[], vec![]);
    let cloneable = interface(store, "java.lang.Cloneable", &[], vec![]);
    let char_sequence = interface(store, "java.lang.CharSequence", &[], vec![]);

    let comparable = store.intern_class_id("java.lang.Comparable");
    let t = store.add_type_param("T", vec![object_ty.clone()]);
    store.define_class(
        comparable,
        ClassDef {
            type_params: vec![t],
            ..ClassDef::new("java.lang.Comparable", ClassKind::Interface)
        },
    );

    let number = class(
        store,
        "java.lang.Number",
        vec![],
        Some(object_ty.clone()),
        vec![Type::class(serializable)],
    );

    let string = store.intern_class_id("java.lang.String");
    class(
        store,
        "java.lang.String",
        vec![],
        Some(object_ty.clone()),
        vec![
            Type::class(serializable),
            Type::parameterized(comparable, vec![Type::class(string)]),
            Type::class(char_sequence),
        ],
    );

    let mut primitives = Vec::with_capacity(PrimitiveType::ALL.len());
    for primitive in PrimitiveType::ALL {
        let primitive_class = store.add_class(ClassDef::new(
            primitive.keyword(),
            ClassKind::Primitive(primitive),
        ));

        let wrapper_name = primitive.wrapper_name();
        let wrapper = store.intern_class_id(wrapper_name);
        let (super_class, interfaces) = match primitive {
            PrimitiveType::Void => (object_ty.clone(), vec![]),
            PrimitiveType::Boolean | PrimitiveType::Char => (
                object_ty.clone(),
                vec![
                    Type::class(serializable),
                    Type::parameterized(comparable, vec![Type::class(wrapper)]),
                ],
            ),
            _ => (
                Type::class(number),
                vec![Type::parameterized(comparable, vec![Type::class(wrapper)])],
            ),
        };
        class(store, wrapper_name, vec![], Some(super_class), interfaces);
        primitives.push((primitive, primitive_class, wrapper));
    }
    let integer = store.intern_class_id("java.lang.Integer");

    // `Enum<E extends Enum<E>>`: allocate first, bound second.
    let enum_id = store.intern_class_id("java.lang.Enum");
    let e = store.add_type_param("E", vec![object_ty.clone()]);
    store.define_type_param(
        e,
        TypeParamDef {
            name: "E".to_string(),
            upper_bounds: vec![Type::parameterized(enum_id, vec![Type::TypeVar(e)])],
        },
    );
    store.define_class(
        enum_id,
        ClassDef {
            type_params: vec![e],
            super_class: Some(object_ty.clone()),
            interfaces: vec![
                Type::parameterized(comparable, vec![Type::TypeVar(e)]),
                Type::class(serializable),
            ],
            ..ClassDef::new("java.lang.Enum", ClassKind::Class)
        },
    );

    let optional_t = store.add_type_param("T", vec![object_ty.clone()]);
    let optional = class(
        store,
        "java.util.Optional",
        vec![optional_t],
        Some(object_ty),
        vec![],
    );

    store.set_well_known(WellKnownTypes {
        object,
        serializable,
        cloneable,
        comparable,
        char_sequence,
        string,
        number,
        integer,
        optional,
        primitives,
    });
}

pub(crate) fn define_collections(store: &mut TypeStore) {
    let wk = store_well_known(store);
    let object_ty = Type::class(wk.object);

    let iterable = generic_interface(store, "java.lang.Iterable", "T", |_| vec![]);
    let collection = generic_interface(store, "java.util.Collection", "E", |e| {
        vec![Type::parameterized(iterable, vec![e])]
    });
    let list = generic_interface(store, "java.util.List", "E", |e| {
        vec![Type::parameterized(collection, vec![e])]
    });
    generic_interface(store, "java.util.Set", "E", |e| {
        vec![Type::parameterized(collection, vec![e])]
    });
    let random_access = interface(store, "java.util.RandomAccess", &[], vec![]);

    let e = store.add_type_param("E", vec![object_ty.clone()]);
    let abstract_collection = class(
        store,
        "java.util.AbstractCollection",
        vec![e],
        Some(object_ty.clone()),
        vec![Type::parameterized(collection, vec![Type::TypeVar(e)])],
    );

    let e = store.add_type_param("E", vec![object_ty.clone()]);
    let abstract_list = class(
        store,
        "java.util.AbstractList",
        vec![e],
        Some(Type::parameterized(abstract_collection, vec![Type::TypeVar(e)])),
        vec![Type::parameterized(list, vec![Type::TypeVar(e)])],
    );

    let e = store.add_type_param("E", vec![object_ty.clone()]);
    class(
        store,
        "java.util.ArrayList",
        vec![e],
        Some(Type::parameterized(abstract_list, vec![Type::TypeVar(e)])),
        vec![
            Type::parameterized(list, vec![Type::TypeVar(e)]),
            Type::class(random_access),
            Type::class(wk.cloneable),
            Type::class(wk.serializable),
        ],
    );

    let k = store.add_type_param("K", vec![object_ty.clone()]);
    let v = store.add_type_param("V", vec![object_ty.clone()]);
    let map = interface(store, "java.util.Map", &[k, v], vec![]);

    let k = store.add_type_param("K", vec![object_ty.clone()]);
    let v = store.add_type_param("V", vec![object_ty.clone()]);
    let abstract_map = class(
        store,
        "java.util.AbstractMap",
        vec![k, v],
        Some(object_ty.clone()),
        vec![Type::parameterized(
            map,
            vec![Type::TypeVar(k), Type::TypeVar(v)],
        )],
    );

    let k = store.add_type_param("K", vec![object_ty.clone()]);
    let v = store.add_type_param("V", vec![object_ty]);
    class(
        store,
        "java.util.HashMap",
        vec![k, v],
        Some(Type::parameterized(
            abstract_map,
            vec![Type::TypeVar(k), Type::TypeVar(v)],
        )),
        vec![
            Type::parameterized(map, vec![Type::TypeVar(k), Type::TypeVar(v)]),
            Type::class(wk.cloneable),
            Type::class(wk.serializable),
        ],
    );
}

fn store_well_known(store: &TypeStore) -> WellKnownTypes {
    store.well_known().clone()
}

fn class(
    store: &mut TypeStore,
    name: &str,
    type_params: Vec<TypeVarId>,
    super_class: Option<Type>,
    interfaces: Vec<Type>,
) -> ClassId {
    store.add_class(ClassDef {
        type_params,
        super_class,
        interfaces,
        ..ClassDef::new(name, ClassKind::Class)
    })
}

fn interface(
    store: &mut TypeStore,
    name: &str,
    type_params: &[TypeVarId],
    interfaces: Vec<Type>,
) -> ClassId {
    store.add_class(ClassDef {
        type_params: type_params.to_vec(),
        interfaces,
        ..ClassDef::new(name, ClassKind::Interface)
    })
}

/// Single-parameter generic interface whose super-interfaces mention the parameter.
fn generic_interface(
    store: &mut TypeStore,
    name: &str,
    param: &str,
    interfaces: impl FnOnce(Type) -> Vec<Type>,
) -> ClassId {
    let object = store_well_known(store).object;
    let tv = store.add_type_param(param, vec![Type::class(object)]);
    interface(store, name, &[tv], interfaces(Type::TypeVar(tv)))
}
