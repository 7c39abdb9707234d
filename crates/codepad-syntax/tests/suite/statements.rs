use codepad_syntax::ast::{Stmt, TypeRefKind, VarInit};
use codepad_syntax::parse_compound_statement;
use codepad_types::PrimitiveType;
use pretty_assertions::assert_eq;

fn parse(text: &str) -> Vec<Stmt> {
    match parse_compound_statement(text) {
        Ok(stmts) => stmts,
        Err(err) => panic!("failed to parse `{text}`: {err}"),
    }
}

#[test]
fn local_variable_declarations() {
    let stmts = parse("int x = 5, y, z[] = {1, 2};");
    assert_eq!(stmts.len(), 1);
    let Stmt::LocalVar(decl) = &stmts[0] else {
        panic!("expected a declaration");
    };
    assert!(!decl.is_final);
    assert_eq!(decl.ty.kind, TypeRefKind::Primitive(PrimitiveType::Int));
    let names: Vec<&str> = decl.declarators.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["x", "y", "z"]);
    assert!(decl.declarators[1].init.is_none());
    assert_eq!(decl.declarators[2].dims, 1);
    assert!(matches!(decl.declarators[2].init, Some(VarInit::Array(_))));
}

#[test]
fn generic_and_final_declarations() {
    let stmts = parse("final java.util.Map<String, java.util.List<Integer>> m = null;");
    let Stmt::LocalVar(decl) = &stmts[0] else {
        panic!("expected a declaration");
    };
    assert!(decl.is_final);
    assert_eq!(decl.ty.dotted_name().as_deref(), Some("java.util.Map"));
}

#[test]
fn comparison_is_not_mistaken_for_a_declaration() {
    let stmts = parse("b = a < c;");
    assert!(matches!(stmts[0], Stmt::Expr(_)));
}

#[test]
fn only_statement_expressions_stand_alone() {
    assert!(parse_compound_statement("3 + 4;").is_err());
    assert!(parse_compound_statement("x;").is_err());
    assert!(parse_compound_statement("x = 3;").is_ok());
    assert!(parse_compound_statement("x++;").is_ok());
    assert!(parse_compound_statement("new Object();").is_ok());
    assert!(parse_compound_statement("System.out.println(1);").is_ok());
}

#[test]
fn missing_semicolon_fails() {
    assert!(parse_compound_statement("int x = 5").is_err());
    assert!(parse_compound_statement("System.out.println(1)").is_err());
}

#[test]
fn several_statements_and_trailing_separators() {
    let stmts = parse("int a = 1; a++;;");
    assert_eq!(stmts.len(), 3);
    assert!(matches!(stmts[2], Stmt::Empty(_)));
}

#[test]
fn control_flow() {
    let stmts = parse(
        "for (int i = 0; i < 10; i++) { if (i % 2 == 0) continue; else break; }
         for (String s : list) System.out.println(s);
         while (true) { }
         do { x--; } while (x > 0);
         outer: for (;;) break outer;
         switch (k) { case 1: case 2: x = 1; break; default: x = 2; }
         try { f(); } catch (java.io.IOException | RuntimeException e) { } finally { g(); }
         synchronized (lock) { }
         return;",
    );
    assert_eq!(stmts.len(), 9);
    assert!(matches!(stmts[0], Stmt::For { .. }));
    assert!(matches!(stmts[1], Stmt::ForEach { .. }));
    assert!(matches!(stmts[4], Stmt::Labeled { .. }));
    let Stmt::Switch { groups, .. } = &stmts[5] else {
        panic!("expected a switch");
    };
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].labels.len(), 2);
    let Stmt::Try { catches, .. } = &stmts[6] else {
        panic!("expected a try statement");
    };
    assert_eq!(catches[0].types.len(), 2);
}

#[test]
fn comments_are_ignored() {
    assert_eq!(parse("x = 1; // set x").len(), 1);
    assert_eq!(parse("/* lead */ x = 1;").len(), 1);
}

#[test]
fn unbalanced_input_is_rejected() {
    assert!(parse_compound_statement("{ x = 1;").is_err());
    assert!(parse_compound_statement("x = 1; }").is_err());
    assert!(parse_compound_statement("try { }").is_err());
    assert!(parse_compound_statement("class A { }").is_err());
}

#[test]
fn blank_and_comment_only_input_is_not_a_statement() {
    assert!(parse_compound_statement("").is_err());
    assert!(parse_compound_statement("  // nothing here").is_err());
    assert!(parse_compound_statement("/* nor here */").is_err());
    assert!(parse_compound_statement("x = 1; /* unclosed").is_err());
    assert_eq!(parse(";").len(), 1);
}

#[test]
fn deeply_nested_blocks_are_rejected() {
    let depth = 5_000;
    let text = format!("{}{}", "{".repeat(depth), "}".repeat(depth));
    assert!(parse_compound_statement(&text).is_err());
    assert_eq!(parse("{{{ x = 1; }}}").len(), 1);
}
