use codepad_eval::{ConstantValue, ExprValue, SemanticError, SnippetAnalyzer};
use codepad_resolve::InMemoryBench;
use codepad_syntax::parse_expression;
use codepad_types::{ClassDef, MethodDef, PrimitiveType, Type, TypeStore};
use pretty_assertions::assert_eq;

fn evaluate(jdk: &TypeStore, bench: &InMemoryBench, text: &str) -> Result<Option<ExprValue>, SemanticError> {
    let analyzer = SnippetAnalyzer::new(jdk);
    let evaluator = analyzer.evaluator(bench);
    let expr = parse_expression(text).unwrap();
    evaluator.evaluate(&expr)
}

fn type_name(jdk: &TypeStore, bench: &InMemoryBench, text: &str) -> String {
    evaluate(jdk, bench, text).unwrap().unwrap().ty.to_string()
}

#[test]
fn overloads_pick_the_most_specific_method() {
    let jdk = TypeStore::with_minimal_jdk();
    let bench = InMemoryBench::new();

    assert_eq!(type_name(&jdk, &bench, "Math.max(1, 2L)"), "long");
    assert_eq!(type_name(&jdk, &bench, "Math.max(1, 2)"), "int");
    assert_eq!(type_name(&jdk, &bench, "Math.abs((byte)1)"), "int");
    assert_eq!(type_name(&jdk, &bench, "Math.abs(Integer.valueOf(3))"), "int");
    assert_eq!(type_name(&jdk, &bench, "String.valueOf('c')"), "java.lang.String");
}

#[test]
fn ambiguous_overloads_are_reported() {
    let jdk = TypeStore::with_minimal_jdk().with_class(
        ClassDef::class("app.Pad")
            .method(MethodDef::new("f", vec![Type::object(), Type::string()], Type::int()))
            .method(MethodDef::new("f", vec![Type::string(), Type::object()], Type::int())),
    );
    let bench = InMemoryBench::new().with("pad", Type::class("app.Pad", vec![]));

    let err = evaluate(&jdk, &bench, "pad.f(\"a\", \"b\")").unwrap_err();
    assert!(matches!(err, SemanticError::AmbiguousMethod { ref name, .. } if name == "f"), "{err}");
    assert_eq!(type_name(&jdk, &bench, "pad.f(\"a\", new Object())"), "int");
}

#[test]
fn missing_methods_and_bad_receivers() {
    let jdk = TypeStore::with_minimal_jdk();
    let bench = InMemoryBench::new().with("n", Type::int());

    assert_eq!(
        evaluate(&jdk, &bench, "Math.nope(1, \"s\")"),
        Err(SemanticError::NoSuchMethod {
            name: "nope".into(),
            args: "int,java.lang.String".into()
        })
    );
    assert_eq!(
        evaluate(&jdk, &bench, "n.toString()"),
        Err(SemanticError::PrimitiveReceiver { ty: "int".into() })
    );
    assert!(matches!(
        evaluate(&jdk, &bench, "java.util.Collections.emptyList()"),
        Err(SemanticError::GenericMethod(_))
    ));
}

#[test]
fn arrays() {
    let jdk = TypeStore::with_minimal_jdk();
    let bench = InMemoryBench::new()
        .with("names", Type::array(Type::string()))
        .with("n", Type::int());

    assert_eq!(type_name(&jdk, &bench, "names[0]"), "java.lang.String");
    assert_eq!(type_name(&jdk, &bench, "names.length"), "int");
    assert_eq!(type_name(&jdk, &bench, "names.clone()"), "java.lang.String[]");
    assert_eq!(type_name(&jdk, &bench, "names.hashCode()"), "int");
    assert_eq!(type_name(&jdk, &bench, "new int[3][]"), "int[][]");
    assert_eq!(
        evaluate(&jdk, &bench, "n[0]"),
        Err(SemanticError::NotAnArray("int".into()))
    );
}

#[test]
fn class_literals_box_primitives() {
    let jdk = TypeStore::with_minimal_jdk();
    let bench = InMemoryBench::new();

    assert_eq!(type_name(&jdk, &bench, "int.class"), "java.lang.Class<java.lang.Integer>");
    assert_eq!(type_name(&jdk, &bench, "void.class"), "java.lang.Class<java.lang.Void>");
    assert_eq!(type_name(&jdk, &bench, "String.class"), "java.lang.Class<java.lang.String>");
}

#[test]
fn constant_expressions_are_folded() {
    let jdk = TypeStore::with_minimal_jdk();
    let bench = InMemoryBench::new();

    let narrowed = evaluate(&jdk, &bench, "(byte)(100 + 100)").unwrap().unwrap();
    assert_eq!(narrowed.ty, Type::Primitive(PrimitiveType::Byte));
    assert_eq!(narrowed.constant, Some(ConstantValue::Int(-56)));

    let char_sum = evaluate(&jdk, &bench, "'a' + 1").unwrap().unwrap();
    assert_eq!(char_sum, ExprValue::int(98));

    let shifted = evaluate(&jdk, &bench, "1L << 65").unwrap().unwrap();
    assert_eq!(shifted.long_value(), Some(2));

    let min = evaluate(&jdk, &bench, "-2147483648").unwrap().unwrap();
    assert_eq!(min.int_value(), Some(i32::MIN));

    let compared = evaluate(&jdk, &bench, "3 < 4 && !false").unwrap().unwrap();
    assert_eq!(compared, ExprValue::boolean(true));

    let by_zero = evaluate(&jdk, &bench, "1 / 0").unwrap().unwrap();
    assert_eq!(by_zero, ExprValue::new(Type::int()));
}

#[test]
fn malformed_literals_are_errors() {
    let jdk = TypeStore::with_minimal_jdk();
    let bench = InMemoryBench::new();

    assert!(matches!(
        evaluate(&jdk, &bench, "2147483648"),
        Err(SemanticError::LiteralFormat(_))
    ));
    assert!(matches!(
        evaluate(&jdk, &bench, "0x100000000"),
        Err(SemanticError::LiteralFormat(_))
    ));
}

#[test]
fn operator_type_errors() {
    let jdk = TypeStore::with_minimal_jdk();
    let bench = InMemoryBench::new().with("o", Type::object());

    assert_eq!(
        evaluate(&jdk, &bench, "true & 2"),
        Err(SemanticError::OperatorMismatch {
            op: "&",
            operands: "boolean, int".into()
        })
    );
    assert_eq!(type_name(&jdk, &bench, "3 | 4L"), "long");
    assert!(matches!(
        evaluate(&jdk, &bench, "o * 2"),
        Err(SemanticError::OperatorMismatch { op: "*", .. })
    ));
    assert_eq!(type_name(&jdk, &bench, "true ^ false"), "boolean");
    assert_eq!(type_name(&jdk, &bench, "o == null"), "boolean");
    assert_eq!(type_name(&jdk, &bench, "o + \"!\""), "java.lang.String");
}

#[test]
fn shifts_promote_the_left_operand_only() {
    let jdk = TypeStore::with_minimal_jdk();
    let bench = InMemoryBench::new();

    let shifted = evaluate(&jdk, &bench, "(byte)1 << 2L").unwrap().unwrap();
    assert_eq!(shifted, ExprValue::int(4));
    assert_eq!(type_name(&jdk, &bench, "'a' >> 1"), "int");
    assert_eq!(type_name(&jdk, &bench, "1L >>> Integer.valueOf(2)"), "long");
    assert_eq!(
        evaluate(&jdk, &bench, "1 << 2.0"),
        Err(SemanticError::OperatorMismatch {
            op: "<<",
            operands: "int, double".into()
        })
    );
    assert!(matches!(
        evaluate(&jdk, &bench, "1.5 << 2"),
        Err(SemanticError::OperatorMismatch { op: "<<", .. })
    ));
}

#[test]
fn bitwise_complement_needs_an_integral_operand() {
    let jdk = TypeStore::with_minimal_jdk();
    let bench = InMemoryBench::new();

    assert_eq!(
        evaluate(&jdk, &bench, "~1.5"),
        Err(SemanticError::OperatorMismatch {
            op: "~",
            operands: "double".into()
        })
    );
    assert!(matches!(
        evaluate(&jdk, &bench, "~true"),
        Err(SemanticError::OperatorMismatch { op: "~", .. })
    ));

    let complement = evaluate(&jdk, &bench, "~5L").unwrap().unwrap();
    assert_eq!(complement.ty, Type::Primitive(PrimitiveType::Long));
    assert_eq!(complement.long_value(), Some(-6));
    assert_eq!(type_name(&jdk, &bench, "~(short)3"), "int");
}

#[test]
fn assignments_have_the_type_of_their_target() {
    let jdk = TypeStore::with_minimal_jdk();
    let bench = InMemoryBench::new()
        .with("x", Type::int())
        .with("b", Type::Primitive(PrimitiveType::Byte))
        .with("s", Type::string());

    let assigned = evaluate(&jdk, &bench, "x = 5").unwrap().unwrap();
    assert_eq!(assigned, ExprValue::new(Type::int()));
    assert_eq!(type_name(&jdk, &bench, "b += 300"), "byte");
    assert_eq!(type_name(&jdk, &bench, "s += 1"), "java.lang.String");
    assert_eq!(type_name(&jdk, &bench, "x = b = 2"), "int");
}

#[test]
fn instanceof_is_boolean() {
    let jdk = TypeStore::with_minimal_jdk();
    let bench = InMemoryBench::new().with("x", Type::string());

    assert_eq!(type_name(&jdk, &bench, "x instanceof Object"), "boolean");
    assert_eq!(type_name(&jdk, &bench, "x instanceof java.util.List<?>"), "boolean");
    assert!(matches!(
        evaluate(&jdk, &bench, "x instanceof NoSuchType"),
        Err(SemanticError::Resolve(_))
    ));
}

#[test]
fn instance_creation_and_no_enclosing_instance() {
    let jdk = TypeStore::with_minimal_jdk();
    let bench = InMemoryBench::new();

    assert_eq!(
        type_name(&jdk, &bench, "new java.util.HashMap<String, Integer>()"),
        "java.util.HashMap<java.lang.String,java.lang.Integer>"
    );
    assert_eq!(
        type_name(&jdk, &bench, "new Runnable() { public void run() {} }"),
        "java.lang.Runnable"
    );
    assert_eq!(evaluate(&jdk, &bench, "this"), Ok(None));
}
