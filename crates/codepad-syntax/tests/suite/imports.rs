use codepad_syntax::{parse_import, parse_type};
use pretty_assertions::assert_eq;

#[test]
fn import_forms() {
    let single = parse_import("import java.util.List;").unwrap();
    assert_eq!((single.is_static, single.is_star), (false, false));
    assert_eq!(single.path, "java.util.List");

    let star = parse_import("import java.util.*;").unwrap();
    assert!(star.is_star);
    assert_eq!(star.path, "java.util");

    let member = parse_import("import static java.lang.Math.max;").unwrap();
    assert!(member.is_static);
    assert_eq!(member.path, "java.lang.Math.max");

    let members = parse_import("import static java.lang.Math.*;;").unwrap();
    assert!(members.is_static && members.is_star);
    assert_eq!(members.path, "java.lang.Math");
}

#[test]
fn malformed_imports() {
    assert!(parse_import("import java.util.List").is_err());
    assert!(parse_import("import java.*.List;").is_err());
    assert!(parse_import("import static Math;").is_err());
    assert!(parse_import("import java.util.List; x = 1;").is_err());
    assert!(parse_import("java.util.List;").is_err());
}

#[test]
fn standalone_types() {
    let ty = parse_type("java.util.Map.Entry<String, ? extends Number>[]").unwrap();
    assert_eq!(ty.dims, 1);
    assert_eq!(ty.dotted_name().as_deref(), Some("java.util.Map.Entry"));
    assert!(parse_type("List<int>").is_err());
    assert!(parse_type("List<int[]>").is_ok());
}
