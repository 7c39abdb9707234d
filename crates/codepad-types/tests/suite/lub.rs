use codepad_types::{glb, lub, ClassType, LubContext, Type, TypeError, TypeStore};

use pretty_assertions::assert_eq;

fn raw(name: &str) -> ClassType {
    ClassType::raw(name)
}

#[test]
fn lub_of_unrelated_boxes_breaks_comparable_recursion() {
    let env = TypeStore::with_minimal_jdk();

    let ty = lub(&env, &[raw("java.lang.Integer"), raw("java.lang.String")]).unwrap();
    assert_eq!(
        ty.to_string(),
        "? extends java.io.Serializable&java.lang.Comparable<? extends \
         java.io.Serializable&java.lang.Comparable<?>>"
    );
}

#[test]
fn lub_of_sibling_lists_keeps_shared_type_argument() {
    let env = TypeStore::with_minimal_jdk();

    let array_list = ClassType::new("java.util.ArrayList", vec![Type::string()]);
    let linked_list = ClassType::new("java.util.LinkedList", vec![Type::string()]);
    let ty = lub(&env, &[array_list, linked_list]).unwrap();
    assert_eq!(
        ty.to_string(),
        "? extends java.util.AbstractList<java.lang.String>&java.lang.Cloneable&java.io.Serializable"
    );
}

#[test]
fn lub_of_enums_terminates() {
    let env = TypeStore::with_minimal_jdk();

    let ty = lub(
        &env,
        &[
            raw("java.util.concurrent.TimeUnit"),
            raw("java.lang.Thread$State"),
        ],
    )
    .unwrap();
    assert_eq!(
        ty.to_string(),
        "? extends java.lang.Enum<? extends java.lang.Enum<?>>"
    );
}

#[test]
fn lub_of_related_types_is_the_supertype() {
    let env = TypeStore::with_minimal_jdk();

    let ty = lub(&env, &[raw("java.lang.Integer"), raw("java.lang.Number")]).unwrap();
    assert_eq!(ty.to_string(), "? extends java.lang.Number");

    let ty = lub(&env, &[raw("java.lang.String")]).unwrap();
    assert_eq!(ty.to_string(), "? extends java.lang.String");
}

#[test]
fn lub_mixing_raw_and_parameterized_uses_raw() {
    let env = TypeStore::with_minimal_jdk();

    let ty = lub(
        &env,
        &[
            ClassType::new("java.util.ArrayList", vec![Type::string()]),
            raw("java.util.ArrayList"),
        ],
    )
    .unwrap();
    assert_eq!(ty.to_string(), "? extends java.util.ArrayList");
}

#[test]
fn lub_of_wildcard_arguments() {
    let env = TypeStore::with_minimal_jdk();

    let number = Type::class("java.lang.Number", vec![]);
    let integer = Type::class("java.lang.Integer", vec![]);

    let a = ClassType::new("java.util.List", vec![Type::super_of(integer.clone())]);
    let b = ClassType::new("java.util.List", vec![Type::super_of(number.clone())]);
    assert_eq!(
        lub(&env, &[a, b]).unwrap().to_string(),
        "? extends java.util.List<? super java.lang.Integer>"
    );

    let a = ClassType::new("java.util.List", vec![Type::extends(integer.clone())]);
    let b = ClassType::new("java.util.List", vec![Type::super_of(number)]);
    assert_eq!(
        lub(&env, &[a, b]).unwrap().to_string(),
        "? extends java.util.List<?>"
    );

    let a = ClassType::new("java.util.List", vec![integer]);
    let b = ClassType::new("java.util.List", vec![Type::unbounded()]);
    assert_eq!(
        lub(&env, &[a, b]).unwrap().to_string(),
        "? extends java.util.List<?>"
    );
}

#[test]
fn erased_supertypes_are_memoized_in_walk_order() {
    let env = TypeStore::with_minimal_jdk();
    let mut ctx = LubContext::new(&env);

    let first = ctx.erased_supertypes("java.lang.Integer");
    let names: Vec<&str> = first.iter().map(String::as_str).collect();
    assert_eq!(
        names,
        vec![
            "java.lang.Integer",
            "java.lang.Number",
            "java.lang.Object",
            "java.io.Serializable",
            "java.lang.Comparable",
        ]
    );

    let second = ctx.erased_supertypes("java.lang.Integer");
    assert!(std::rc::Rc::ptr_eq(&first, &second));
}

#[test]
fn depth_limit_degrades_to_unbounded_arguments() {
    let env = TypeStore::with_minimal_jdk();
    let mut ctx = LubContext::new(&env).with_max_depth(1);

    let lists = [
        ClassType::new("java.util.List", vec![Type::class("java.lang.Integer", vec![])]),
        ClassType::new("java.util.List", vec![Type::class("java.lang.Long", vec![])]),
    ];
    assert_eq!(
        ctx.lub(&lists).unwrap().to_string(),
        "? extends java.util.List<? extends java.lang.Number&java.lang.Comparable<?>>"
    );
    assert_eq!(
        lub(&env, &lists).unwrap().to_string(),
        "? extends java.util.List<? extends java.lang.Number&java.lang.Comparable<? extends \
         java.lang.Number&java.lang.Comparable<?>>>"
    );
}

#[test]
fn glb_drops_implied_bounds() {
    let env = TypeStore::with_minimal_jdk();

    let integer = Type::class("java.lang.Integer", vec![]);
    let bounds = glb(
        &env,
        &[
            Type::class("java.lang.Number", vec![]),
            integer.clone(),
            Type::class("java.lang.Comparable", vec![integer.clone()]),
            integer.clone(),
        ],
    )
    .unwrap();
    assert_eq!(bounds, vec![integer]);

    let serializable = Type::class("java.io.Serializable", vec![]);
    let runnable = Type::class("java.lang.Runnable", vec![]);
    let bounds = glb(&env, &[serializable.clone(), runnable.clone()]).unwrap();
    assert_eq!(bounds, vec![serializable, runnable]);
}

#[test]
fn glb_rejects_unrelated_classes() {
    let env = TypeStore::with_minimal_jdk();

    let err = glb(
        &env,
        &[
            Type::class("java.lang.Integer", vec![]),
            Type::string(),
        ],
    )
    .unwrap_err();
    assert_eq!(
        err,
        TypeError::IncompatibleBounds("java.lang.Integer".into(), "java.lang.String".into())
    );
}
