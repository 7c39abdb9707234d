use codepad_resolve::{ImportsCollection, InMemoryBench, JavaEntity, Resolver};
use codepad_syntax::parse_import;
use codepad_types::{ClassDef, ClassType, FieldDef, Type, TypeStore};
use pretty_assertions::assert_eq;

fn jdk_with_extras() -> TypeStore {
    TypeStore::with_minimal_jdk()
        .with_class(ClassDef::class("shapes.Color"))
        .with_class(
            ClassDef::class("consts.A").field(FieldDef::constant("VALUE", Type::int())),
        )
        .with_class(
            ClassDef::class("consts.B")
                .field(FieldDef::constant("VALUE", Type::string()))
                .field(FieldDef::constant("OTHER", Type::boolean())),
        )
}

fn import_all(jdk: &TypeStore, lines: &[&str]) -> ImportsCollection {
    let mut imports = ImportsCollection::new();
    for line in lines {
        let decl = parse_import(line).unwrap();
        imports.add_import_decl(jdk, &decl).unwrap();
    }
    imports
}

#[test]
fn single_import_beats_wildcard() {
    let jdk = jdk_with_extras();
    let imports = import_all(&jdk, &["import java.awt.*;", "import shapes.Color;"]);
    assert_eq!(
        imports.resolve_normal_import(&jdk, "Color"),
        Some(ClassType::raw("shapes.Color"))
    );
    assert_eq!(
        imports.resolve_wildcard_import(&jdk, "Color"),
        Some(ClassType::raw("java.awt.Color"))
    );

    let bench = InMemoryBench::new();
    let resolver = Resolver::new(&jdk, &imports, &bench);
    assert_eq!(
        resolver.resolve_package_or_class("Color"),
        JavaEntity::Type(ClassType::raw("shapes.Color"))
    );
}

#[test]
fn earlier_wildcards_shadow_later_ones() {
    let jdk = jdk_with_extras();
    let imports = import_all(&jdk, &["import shapes.*;", "import java.awt.*;"]);
    assert_eq!(
        imports.resolve_wildcard_import(&jdk, "Color"),
        Some(ClassType::raw("shapes.Color"))
    );
}

#[test]
fn class_wildcards_reach_member_types() {
    let jdk = jdk_with_extras();
    let imports = import_all(&jdk, &["import java.util.Map.*;"]);
    assert_eq!(
        imports.resolve_wildcard_import(&jdk, "Entry"),
        Some(ClassType::raw("java.util.Map$Entry"))
    );
}

#[test]
fn static_single_import_beats_static_wildcard() {
    let jdk = jdk_with_extras();
    let imports = import_all(
        &jdk,
        &["import static consts.B.*;", "import static consts.A.VALUE;"],
    );
    assert_eq!(imports.resolve_static_field(&jdk, "VALUE"), Some(Type::int()));
    assert_eq!(imports.resolve_static_field(&jdk, "OTHER"), Some(Type::boolean()));
    assert_eq!(imports.resolve_static_field(&jdk, "MISSING"), None);
}

#[test]
fn first_declaring_class_wins_for_a_static_name() {
    let jdk = jdk_with_extras();
    let imports = import_all(
        &jdk,
        &["import static java.lang.Math.VALUE;", "import static consts.B.VALUE;"],
    );
    assert_eq!(imports.static_imports_for("VALUE").len(), 2);
    assert_eq!(imports.resolve_static_field(&jdk, "VALUE"), Some(Type::string()));
}

#[test]
fn import_statements_are_grouped() {
    let jdk = jdk_with_extras();
    let imports = import_all(
        &jdk,
        &[
            "import static consts.A.*;",
            "import static java.lang.Math.max;",
            "import java.util.*;",
            "import java.util.Map.Entry;",
            "import static java.lang.Math.min;",
            "import static consts.B.VALUE;",
            "import java.util.List;",
        ],
    );
    assert_eq!(
        imports.to_import_statements(),
        vec![
            "import java.util.Map.Entry;",
            "import java.util.List;",
            "import java.util.*;",
            "import static java.lang.Math.max;",
            "import static java.lang.Math.min;",
            "import static consts.B.VALUE;",
            "import static consts.A.*;",
        ]
    );
    assert!(imports.to_string().ends_with("import static consts.A.*;\n"));
}

#[test]
fn imports_that_do_not_name_classes_are_rejected() {
    let jdk = jdk_with_extras();
    let mut imports = ImportsCollection::new();
    let decl = parse_import("import no.such.Thing;").unwrap();
    assert!(imports.add_import_decl(&jdk, &decl).is_err());
    let decl = parse_import("import static no.such.*;").unwrap();
    assert!(imports.add_import_decl(&jdk, &decl).is_err());
    assert!(imports.is_empty());

    // Packages are not verified, so an unknown package wildcard is accepted.
    let decl = parse_import("import no.such.*;").unwrap();
    assert!(imports.add_import_decl(&jdk, &decl).is_ok());

    imports.clear();
    assert!(imports.is_empty());
}
