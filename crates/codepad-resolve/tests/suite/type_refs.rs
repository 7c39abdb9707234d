use codepad_resolve::{ImportsCollection, InMemoryBench, ResolveError, Resolver};
use codepad_syntax::ast::{TypeArgRef, TypeRefKind};
use codepad_syntax::parse_type;
use codepad_types::{Type, TypeError, TypeStore};
use pretty_assertions::assert_eq;

fn resolve(text: &str) -> Result<Type, ResolveError> {
    let jdk = TypeStore::with_minimal_jdk();
    let mut imports = ImportsCollection::new();
    imports.add_wildcard_import(codepad_resolve::JavaEntity::package("java.util"));
    let bench = InMemoryBench::new();
    let resolver = Resolver::new(&jdk, &imports, &bench);
    resolver.resolve_type_ref(&parse_type(text).unwrap())
}

#[test]
fn generic_types_render_with_their_arguments() {
    let cases = [
        ("int", "int"),
        ("String[][]", "java.lang.String[][]"),
        ("List<String>", "java.util.List<java.lang.String>"),
        (
            "Map<String, List<? extends Number>>",
            "java.util.Map<java.lang.String,java.util.List<? extends java.lang.Number>>",
        ),
        ("List<? super Integer>", "java.util.List<? super java.lang.Integer>"),
        ("List<?>", "java.util.List<?>"),
        ("java.util.Map.Entry<String, Integer>", "java.util.Map.Entry<java.lang.String,java.lang.Integer>"),
        ("List", "java.util.List"),
    ];
    for (text, expected) in cases {
        assert_eq!(resolve(text).unwrap().to_string(), expected, "{text}");
    }
}

#[test]
fn argument_count_must_match() {
    assert_eq!(
        resolve("Map<String>"),
        Err(ResolveError::InvalidTypeArguments {
            name: "java.util.Map".to_string(),
            expected: 2,
            found: 1,
        })
    );
    assert!(matches!(
        resolve("String<Integer>"),
        Err(ResolveError::InvalidTypeArguments { expected: 0, .. })
    ));
}

#[test]
fn wildcard_bounds_must_meet_the_declared_bound() {
    assert_eq!(
        resolve("Enum<? extends String>"),
        Err(ResolveError::Type(TypeError::IncompatibleBounds(
            "java.lang.String".to_string(),
            "java.lang.Enum".to_string()
        )))
    );
    assert!(resolve("Enum<? extends java.util.concurrent.TimeUnit>").is_ok());
}

#[test]
fn unknown_types_do_not_resolve() {
    assert!(matches!(
        resolve("NoSuchType"),
        Err(ResolveError::UnresolvedName(_))
    ));
}

#[test]
fn primitive_type_arguments_are_rejected() {
    assert!(parse_type("List<int>").is_err());
    assert!(parse_type("List<? extends int>").is_err());

    // Built by hand, as the parser never produces these.
    let jdk = TypeStore::with_minimal_jdk();
    let mut imports = ImportsCollection::new();
    imports.add_wildcard_import(codepad_resolve::JavaEntity::package("java.util"));
    let bench = InMemoryBench::new();
    let resolver = Resolver::new(&jdk, &imports, &bench);

    let primitive = parse_type("int").unwrap();
    for arg in [
        TypeArgRef::Type(primitive.clone()),
        TypeArgRef::Extends(primitive.clone()),
        TypeArgRef::Super(primitive),
    ] {
        let mut list = parse_type("List<String>").unwrap();
        let TypeRefKind::Named(segments) = &mut list.kind else {
            panic!("expected a named type");
        };
        segments[0].args = vec![arg];
        assert_eq!(
            resolver.resolve_type_ref(&list),
            Err(ResolveError::NotAType("int".to_string()))
        );
    }

    assert_eq!(resolve("List<int[]>").unwrap().to_string(), "java.util.List<int[]>");
}
