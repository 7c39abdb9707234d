use codepad_syntax::ast::{BinaryOp, Expr, LiteralKind, TypeArgRef, TypeRefKind, UnaryOp};
use codepad_syntax::parse_expression;
use pretty_assertions::assert_eq;

fn parse(text: &str) -> Expr {
    match parse_expression(text) {
        Ok(expr) => expr,
        Err(err) => panic!("failed to parse `{text}`: {err}"),
    }
}

/// Renders the tree with explicit grouping so precedence is easy to assert.
fn sexpr(expr: &Expr) -> String {
    match expr {
        Expr::Literal { text, .. } => text.clone(),
        Expr::Name { name, .. } => name.clone(),
        Expr::FieldAccess { receiver, name, .. } => format!("{}.{name}", sexpr(receiver)),
        Expr::MethodCall {
            receiver,
            name,
            args,
            ..
        } => {
            let args: Vec<String> = args.iter().map(sexpr).collect();
            match receiver {
                Some(r) => format!("{}.{name}({})", sexpr(r), args.join(", ")),
                None => format!("{name}({})", args.join(", ")),
            }
        }
        Expr::Binary { op, lhs, rhs, .. } => {
            format!("({} {:?} {})", sexpr(lhs), op, sexpr(rhs))
        }
        Expr::Unary { op, expr, .. } => format!("({op:?} {})", sexpr(expr)),
        Expr::Assign {
            op, target, value, ..
        } => format!("({} ={:?} {})", sexpr(target), op, sexpr(value)),
        Expr::Conditional {
            cond,
            then_expr,
            else_expr,
            ..
        } => format!(
            "({} ? {} : {})",
            sexpr(cond),
            sexpr(then_expr),
            sexpr(else_expr)
        ),
        Expr::Cast { ty, expr, .. } => format!("(cast {:?} {})", ty.kind, sexpr(expr)),
        Expr::Paren { expr, .. } => format!("[{}]", sexpr(expr)),
        Expr::ArrayAccess { array, index, .. } => format!("{}[{}]", sexpr(array), sexpr(index)),
        other => format!("{other:?}"),
    }
}

#[test]
fn binary_precedence() {
    assert_eq!(sexpr(&parse("1 + 2 * 3")), "(1 Add (2 Mul 3))");
    assert_eq!(sexpr(&parse("a || b && c")), "(a OrOr (b AndAnd c))");
    assert_eq!(sexpr(&parse("1 - 2 - 3")), "((1 Sub 2) Sub 3)");
    assert_eq!(
        sexpr(&parse("a == b | c < d")),
        "((a EqEq b) BitOr (c Lt d))"
    );
}

#[test]
fn greater_than_tokens_are_glued_when_adjacent() {
    assert_eq!(sexpr(&parse("a >> 2")), "(a Shr 2)");
    assert_eq!(sexpr(&parse("a >>> 2")), "(a UShr 2)");
    assert_eq!(sexpr(&parse("a >= 2")), "(a Ge 2)");
    assert_eq!(sexpr(&parse("x >>= 1")), "(x =Some(Shr) 1)");
    assert!(parse_expression("a > > 2").is_err());
}

#[test]
fn assignment_is_right_associative() {
    assert_eq!(sexpr(&parse("a = b = 3")), "(a =None (b =None 3))");
    assert!(parse_expression("1 = 2").is_err());
}

#[test]
fn conditional_nests_to_the_right() {
    assert_eq!(
        sexpr(&parse("a ? b : c ? d : e")),
        "(a ? b : (c ? d : e))"
    );
}

#[test]
fn casts_versus_parenthesised_expressions() {
    assert_eq!(
        sexpr(&parse("(int) -1")),
        "(cast Primitive(Int) (Minus 1))"
    );
    assert_eq!(sexpr(&parse("(a) + b")), "([a] Add b)");
    assert_eq!(sexpr(&parse("(a) - 1")), "([a] Sub 1)");

    let Expr::Cast { ty, .. } = parse("(java.util.List<String>) x") else {
        panic!("expected a cast");
    };
    assert_eq!(ty.dotted_name().as_deref(), Some("java.util.List"));
    let TypeRefKind::Named(segments) = &ty.kind else {
        panic!("expected a named type");
    };
    assert_eq!(segments[2].args.len(), 1);
    assert!(matches!(segments[2].args[0], TypeArgRef::Type(_)));
}

#[test]
fn method_calls_and_field_access() {
    assert_eq!(
        sexpr(&parse("System.out.println(\"hi\", 1 + 2)")),
        "System.out.println(\"hi\", (1 Add 2))"
    );
    assert_eq!(sexpr(&parse("a[0].length")), "a[0].length");
    assert_eq!(sexpr(&parse("i++")), "(PostInc i)");
    assert_eq!(sexpr(&parse("-x")), "(Minus x)");
}

#[test]
fn generic_method_call_keeps_type_arguments() {
    let Expr::MethodCall { type_args, name, .. } =
        parse("java.util.Collections.<String>emptyList()")
    else {
        panic!("expected a method call");
    };
    assert_eq!(name, "emptyList");
    assert_eq!(type_args.len(), 1);
}

#[test]
fn literals_keep_their_source_text() {
    let Expr::Literal { kind, text, .. } = parse("0x7fffffff") else {
        panic!("expected a literal");
    };
    assert_eq!(kind, LiteralKind::Int);
    assert_eq!(text, "0x7fffffff");

    assert!(matches!(
        parse("null"),
        Expr::Literal {
            kind: LiteralKind::Null,
            ..
        }
    ));
    assert!(matches!(
        parse("'\\n'"),
        Expr::Literal {
            kind: LiteralKind::Char,
            ..
        }
    ));
}

#[test]
fn instance_and_array_creation() {
    let Expr::New { ty, has_body, .. } = parse("new java.util.ArrayList<String>()") else {
        panic!("expected instance creation");
    };
    assert!(!has_body);
    assert_eq!(ty.dotted_name().as_deref(), Some("java.util.ArrayList"));

    assert!(matches!(
        parse("new Runnable() { public void run() { } }"),
        Expr::New { has_body: true, .. }
    ));

    let Expr::NewArray {
        dim_exprs,
        extra_dims,
        init,
        ..
    } = parse("new int[3][]")
    else {
        panic!("expected array creation");
    };
    assert_eq!(dim_exprs.len(), 1);
    assert_eq!(extra_dims, 1);
    assert!(init.is_none());

    assert!(matches!(
        parse("new String[] { \"a\", \"b\" }"),
        Expr::NewArray { init: Some(_), .. }
    ));
    assert!(parse_expression("new int[]").is_err());
    assert!(parse_expression("new int()").is_err());
}

#[test]
fn diamond_is_an_empty_argument_list() {
    let Expr::New { ty, .. } = parse("new java.util.HashMap<>()") else {
        panic!("expected instance creation");
    };
    let TypeRefKind::Named(segments) = &ty.kind else {
        panic!("expected a named type");
    };
    assert!(segments[2].args.is_empty());
}

#[test]
fn class_literals() {
    for text in ["String.class", "java.lang.String.class", "int.class", "void.class", "String[].class", "int[][].class"] {
        assert!(
            matches!(parse(text), Expr::ClassLiteral { .. }),
            "{text} should be a class literal"
        );
    }
    let Expr::ClassLiteral { ty, .. } = parse("int[][].class") else {
        unreachable!();
    };
    assert_eq!(ty.dims, 2);
}

#[test]
fn instanceof_binds_like_a_relational_operator() {
    let Expr::Binary { op, lhs, .. } = parse("x instanceof String && y") else {
        panic!("expected a binary expression");
    };
    assert_eq!(op, BinaryOp::AndAnd);
    assert!(matches!(*lhs, Expr::InstanceOf { .. }));
}

#[test]
fn trailing_separators_and_leftovers() {
    assert!(parse_expression("1 + 2;;;").is_ok());
    assert!(parse_expression("1 + 2 3").is_err());
    assert!(parse_expression("1 +").is_err());
    assert!(parse_expression("").is_err());
}

#[test]
fn spans_cover_the_whole_expression() {
    let expr = parse("  foo.bar(1)  ");
    assert_eq!(expr.range().start, 2);
    assert_eq!(expr.range().end, 12);
    let err = parse_expression("1 + #").unwrap_err();
    assert_eq!(err.range.start, 4);
}

#[test]
fn unary_operators_nest() {
    assert!(matches!(
        parse("!!b"),
        Expr::Unary {
            op: UnaryOp::Not,
            ..
        }
    ));
    assert_eq!(sexpr(&parse("~-x")), "(BitNot (Minus x))");
}

#[test]
fn nesting_depth_is_bounded() {
    let depth = 10_000;
    let parens = format!("{}1{}", "(".repeat(depth), ")".repeat(depth));
    assert!(parse_expression(&parens).is_err());
    assert!(parse_expression(&format!("{}1", "-".repeat(depth))).is_err());
    assert!(parse_expression(&format!("{}1", "(int)".repeat(depth))).is_err());
    assert!(parse_expression(&vec!["1"; depth].join(" + ")).is_err());
    assert!(parse_expression(&format!("x{}", ".f".repeat(depth))).is_err());
    assert!(parse_expression(&format!("a{}", " = a".repeat(depth))).is_err());

    let moderate = format!("{}1{}", "(".repeat(20), ")".repeat(20));
    let grouped = format!("{}1{}", "[".repeat(20), "]".repeat(20));
    assert_eq!(sexpr(&parse(&moderate)), grouped);
    let chain = vec!["1"; 60].join(" + ");
    assert!(parse_expression(&chain).is_ok());
}
