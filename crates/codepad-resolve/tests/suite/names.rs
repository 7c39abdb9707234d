use codepad_resolve::{ImportsCollection, InMemoryBench, JavaEntity, ResolveError, Resolver};
use codepad_types::{ClassDef, ClassType, Type, TypeStore};
use pretty_assertions::assert_eq;

#[test]
fn dotted_names_walk_packages_types_and_fields() {
    let jdk = TypeStore::with_minimal_jdk();
    let imports = ImportsCollection::new();
    let bench = InMemoryBench::new();
    let resolver = Resolver::new(&jdk, &imports, &bench);

    assert_eq!(
        resolver.resolve_value("System.out").unwrap(),
        Type::class("java.io.PrintStream", vec![])
    );
    assert_eq!(
        resolver.resolve_value("java.awt.Color.RED").unwrap(),
        Type::class("java.awt.Color", vec![])
    );
    assert_eq!(
        resolver.resolve_dotted("java.util").unwrap(),
        JavaEntity::package("java.util")
    );
    assert!(matches!(
        resolver.resolve_dotted("System.nothing"),
        Err(ResolveError::UnresolvedName(_))
    ));
}

#[test]
fn package_scope_is_tried_before_java_lang() {
    let jdk = TypeStore::with_minimal_jdk().with_class(ClassDef::class("app.String"));
    let imports = ImportsCollection::new();
    let bench = InMemoryBench::new();

    let plain = Resolver::new(&jdk, &imports, &bench);
    assert_eq!(
        plain.resolve_type_name("String").unwrap(),
        ClassType::raw("java.lang.String")
    );

    let scoped = Resolver::new(&jdk, &imports, &bench).with_package_scope("app");
    assert_eq!(
        scoped.resolve_type_name("String").unwrap(),
        ClassType::raw("app.String")
    );
}

#[test]
fn bench_values_expose_instance_fields() {
    let jdk = TypeStore::with_minimal_jdk();
    let imports = ImportsCollection::new();
    let bench = InMemoryBench::new().with("names", Type::array(Type::string()));
    let resolver = Resolver::new(&jdk, &imports, &bench);
    assert_eq!(resolver.resolve_value("names.length").unwrap(), Type::int());
}

#[test]
fn static_method_owners_follow_import_order() {
    let jdk = TypeStore::with_minimal_jdk();
    let mut imports = ImportsCollection::new();
    imports.add_static_wildcard_import(ClassType::raw("java.lang.Integer"));
    imports.add_static_import("max", ClassType::raw("java.lang.Math"));
    let bench = InMemoryBench::new();
    let resolver = Resolver::new(&jdk, &imports, &bench);
    assert_eq!(
        resolver.static_method_owners("max"),
        vec![
            ClassType::raw("java.lang.Math"),
            ClassType::raw("java.lang.Integer")
        ]
    );
}
