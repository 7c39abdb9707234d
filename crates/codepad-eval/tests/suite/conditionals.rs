use codepad_eval::{Classification, ExpressionType, SemanticError, SnippetAnalyzer};
use codepad_resolve::InMemoryBench;
use codepad_syntax::{parse_expression, JavaLanguageLevel};
use codepad_types::{PrimitiveType, Type, TypeStore};
use pretty_assertions::assert_eq;

fn bench() -> InMemoryBench {
    InMemoryBench::new()
        .with("cond", Type::boolean())
        .with("x", Type::int())
}

fn type_of(analyzer: &mut SnippetAnalyzer<'_>, command: &str) -> Option<String> {
    analyzer.classify(command, &bench()).type_name()
}

#[test]
fn byte_and_short_meet_at_short() {
    let jdk = TypeStore::with_minimal_jdk();
    for level in [JavaLanguageLevel::JAVA_1_4, JavaLanguageLevel::JAVA_8] {
        let mut analyzer = SnippetAnalyzer::new(&jdk).with_language_level(level);
        assert_eq!(
            type_of(&mut analyzer, "true ? (byte)1 : (short)2").as_deref(),
            Some("short")
        );
    }
}

#[test]
fn int_constant_narrows_to_the_other_branch() {
    let jdk = TypeStore::with_minimal_jdk();
    for level in [JavaLanguageLevel::JAVA_1_4, JavaLanguageLevel::JAVA_8] {
        let mut analyzer = SnippetAnalyzer::new(&jdk).with_language_level(level);
        assert_eq!(type_of(&mut analyzer, "cond ? 5 : (byte)x").as_deref(), Some("byte"));
        assert_eq!(type_of(&mut analyzer, "cond ? 500 : (byte)x").as_deref(), Some("int"));
        assert_eq!(type_of(&mut analyzer, "cond ? x : (byte)x").as_deref(), Some("int"));
    }
}

#[test]
fn boxed_null_branch_keeps_its_type() {
    let jdk = TypeStore::with_minimal_jdk();
    let mut analyzer = SnippetAnalyzer::new(&jdk);
    assert_eq!(
        type_of(&mut analyzer, "cond ? (Integer)null : 5").as_deref(),
        Some("java.lang.Integer")
    );
    assert_eq!(
        type_of(&mut analyzer, "cond ? null : 5").as_deref(),
        Some("java.lang.Integer")
    );
    assert_eq!(
        type_of(&mut analyzer, "cond ? Integer.valueOf(1) : 5").as_deref(),
        Some("int")
    );
}

#[test]
fn legacy_rules_do_not_box() {
    let jdk = TypeStore::with_minimal_jdk();
    let mut analyzer = SnippetAnalyzer::new(&jdk).with_language_level(JavaLanguageLevel::JAVA_1_4);
    assert_eq!(
        analyzer.classify("cond ? (Integer)null : 5", &bench()),
        Classification::Expression(ExpressionType::Indeterminate)
    );
    assert_eq!(
        type_of(&mut analyzer, "cond ? \"s\" : null").as_deref(),
        Some("java.lang.String")
    );
}

#[test]
fn unrelated_references_meet_at_their_lub() {
    let jdk = TypeStore::with_minimal_jdk();
    let mut analyzer = SnippetAnalyzer::new(&jdk);
    assert_eq!(
        type_of(
            &mut analyzer,
            "cond ? new java.util.ArrayList<String>() : new java.util.LinkedList<String>()"
        )
        .as_deref(),
        Some("java.util.AbstractList<java.lang.String>")
    );
    assert_eq!(
        type_of(&mut analyzer, "cond ? Integer.valueOf(1) : \"s\"").as_deref(),
        Some("java.io.Serializable")
    );
}

#[test]
fn constant_condition_selects_a_branch_value() {
    let jdk = TypeStore::with_minimal_jdk();
    let analyzer = SnippetAnalyzer::new(&jdk);
    let bench = bench();
    let evaluator = analyzer.evaluator(&bench);

    let value = evaluator
        .evaluate(&parse_expression("false ? 1 : 2").unwrap())
        .unwrap()
        .unwrap();
    assert_eq!(value.ty, Type::int());
    assert_eq!(value.int_value(), Some(2));

    let value = evaluator
        .evaluate(&parse_expression("true ? 'a' : 0").unwrap())
        .unwrap()
        .unwrap();
    assert_eq!(value.ty, Type::Primitive(PrimitiveType::Char));
    assert_eq!(value.int_value(), Some(97));
}

#[test]
fn condition_must_be_boolean() {
    let jdk = TypeStore::with_minimal_jdk();
    let analyzer = SnippetAnalyzer::new(&jdk);
    let bench = bench();
    let evaluator = analyzer.evaluator(&bench);

    assert_eq!(
        evaluator.expression_type(&parse_expression("x ? 1 : 2").unwrap()),
        Err(SemanticError::NonBooleanCondition("int".into()))
    );
    assert_eq!(
        evaluator.expression_type(&parse_expression("cond ? System.out.println() : 2").unwrap()),
        Err(SemanticError::VoidConditionalBranch)
    );
}

#[test]
fn shallow_lub_depth_still_terminates() {
    let jdk = TypeStore::with_minimal_jdk();
    let mut analyzer = SnippetAnalyzer::new(&jdk).with_max_lub_depth(1);
    assert_eq!(
        type_of(&mut analyzer, "cond ? Integer.valueOf(1) : \"s\"").as_deref(),
        Some("java.io.Serializable")
    );
}
