use codepad_eval::{Classification, ExpressionType, SnippetAnalyzer};
use codepad_resolve::{DeclaredVar, InMemoryBench};
use codepad_types::{Type, TypeStore};
use pretty_assertions::assert_eq;

fn known(ty: Type) -> Classification {
    Classification::Expression(ExpressionType::Known(ty))
}

const INDETERMINATE: Classification = Classification::Expression(ExpressionType::Indeterminate);

#[test]
fn initialized_declaration_is_a_statement() {
    let jdk = TypeStore::with_minimal_jdk();
    let mut analyzer = SnippetAnalyzer::new(&jdk);
    let bench = InMemoryBench::new();

    assert_eq!(analyzer.classify("int x = 5;", &bench), Classification::Statement);
    assert_eq!(
        analyzer.declared_variables(),
        &[DeclaredVar::new("x", Type::int(), true, false)]
    );
    assert_eq!(analyzer.amended_command(), "int x = 5;");
}

#[test]
fn arithmetic_and_concatenation() {
    let jdk = TypeStore::with_minimal_jdk();
    let mut analyzer = SnippetAnalyzer::new(&jdk);
    let bench = InMemoryBench::new();

    assert_eq!(analyzer.classify("3 + 4", &bench), known(Type::int()));
    assert_eq!(analyzer.classify("\"a\" + 4", &bench), known(Type::string()));
    assert_eq!(analyzer.classify("1.5f * 2", &bench).type_name().as_deref(), Some("float"));
}

#[test]
fn void_call_is_a_statement() {
    let jdk = TypeStore::with_minimal_jdk();
    let mut analyzer = SnippetAnalyzer::new(&jdk);
    let bench = InMemoryBench::new();

    assert_eq!(
        analyzer.classify("System.out.println(\"hi\")", &bench),
        Classification::Statement
    );
    assert!(analyzer.declared_variables().is_empty());
}

#[test]
fn generic_receiver_substitutes_type_arguments() {
    let jdk = TypeStore::with_minimal_jdk();
    let mut analyzer = SnippetAnalyzer::new(&jdk);
    let bench = InMemoryBench::new().with("x", Type::class("java.util.List", vec![Type::string()]));

    assert_eq!(analyzer.classify("x.get(0)", &bench), known(Type::string()));
    assert_eq!(analyzer.classify("x.size()", &bench), known(Type::int()));
}

#[test]
fn incomplete_input_is_indeterminate() {
    let jdk = TypeStore::with_minimal_jdk();
    let mut analyzer = SnippetAnalyzer::new(&jdk);
    let bench = InMemoryBench::new();

    assert_eq!(analyzer.classify("1 +", &bench), INDETERMINATE);
    assert_eq!(analyzer.classify("nothing.here()", &bench), INDETERMINATE);
    assert_eq!(analyzer.classify("2147483648", &bench), INDETERMINATE);
    assert_eq!(analyzer.classify("1 +", &bench).type_name(), None);
}

#[test]
fn classification_is_repeatable() {
    let jdk = TypeStore::with_minimal_jdk();
    let mut analyzer = SnippetAnalyzer::new(&jdk);
    let bench = InMemoryBench::new().with("x", Type::class("java.util.List", vec![Type::string()]));

    for command in ["x.get(0)", "int y;", "1 +", "import java.util.*;"] {
        let first = analyzer.classify(command, &bench);
        let first_amended = analyzer.amended_command().to_owned();
        let first_vars = analyzer.declared_variables().to_vec();
        assert_eq!(analyzer.classify(command, &bench), first, "{command}");
        assert_eq!(analyzer.amended_command(), first_amended);
        assert_eq!(analyzer.declared_variables(), first_vars.as_slice());
    }
}

#[test]
fn uninitialized_variables_get_defaults() {
    let jdk = TypeStore::with_minimal_jdk();
    let mut analyzer = SnippetAnalyzer::new(&jdk);
    let bench = InMemoryBench::new();

    let command = "int[] a, b[]; boolean done; final String s;";
    assert_eq!(analyzer.classify(command, &bench), Classification::Statement);
    assert_eq!(
        analyzer.declared_variables(),
        &[
            DeclaredVar::new("a", Type::array(Type::int()), false, false),
            DeclaredVar::new("b", Type::array_of_depth(Type::int(), 2), false, false),
            DeclaredVar::new("done", Type::boolean(), false, false),
            DeclaredVar::new("s", Type::string(), false, true),
        ]
    );
    assert_eq!(
        analyzer.amended_command(),
        format!("{command}\na = null;\n\nb = null;\n\ndone = false;\n")
    );
}

#[test]
fn nested_declarations_are_not_reported() {
    let jdk = TypeStore::with_minimal_jdk();
    let mut analyzer = SnippetAnalyzer::new(&jdk);
    let bench = InMemoryBench::new();

    let command = "for (int i = 0; i < 3; i++) { int j = i; } long total;";
    assert_eq!(analyzer.classify(command, &bench), Classification::Statement);
    assert_eq!(
        analyzer.declared_variables(),
        &[DeclaredVar::new("total", Type::Primitive(codepad_types::PrimitiveType::Long), false, false)]
    );
    assert_eq!(analyzer.amended_command(), format!("{command}\ntotal = 0;\n"));
}

#[test]
fn unresolvable_declared_type_is_skipped() {
    let jdk = TypeStore::with_minimal_jdk();
    let mut analyzer = SnippetAnalyzer::new(&jdk);
    let bench = InMemoryBench::new();

    assert_eq!(analyzer.classify("Missing m; int n = 1;", &bench), Classification::Statement);
    assert_eq!(
        analyzer.declared_variables(),
        &[DeclaredVar::new("n", Type::int(), true, false)]
    );
}

#[test]
fn configured_analyzer_uses_package_scope() {
    let jdk = TypeStore::with_minimal_jdk().with_class(codepad_types::ClassDef::class("app.Widget"));
    let config = codepad_config::CodepadConfig::load_from_str(
        "[analysis]\nsource = \"1.8\"\npackage_scope = \"app\"\n",
    )
    .unwrap();
    let mut analyzer = SnippetAnalyzer::from_config(&jdk, &config.analysis);
    let bench = InMemoryBench::new();

    assert_eq!(
        analyzer.classify("new Widget()", &bench),
        known(Type::class("app.Widget", vec![]))
    );
}

#[test]
fn blank_and_unterminated_comment_lines_are_indeterminate() {
    let jdk = TypeStore::with_minimal_jdk();
    let mut analyzer = SnippetAnalyzer::new(&jdk);
    let bench = InMemoryBench::new();

    assert_eq!(analyzer.classify("1 + 2 /* oops", &bench), INDETERMINATE);
    assert_eq!(analyzer.classify("/*", &bench), INDETERMINATE);
    assert_eq!(analyzer.classify("//", &bench), INDETERMINATE);
    assert_eq!(analyzer.classify("", &bench), INDETERMINATE);
    assert_eq!(analyzer.classify("1 + 2 /* fine */", &bench), known(Type::int()));
    assert_eq!(analyzer.classify("int x = 1; // set", &bench), Classification::Statement);
}

#[test]
fn pathologically_nested_input_is_indeterminate() {
    let jdk = TypeStore::with_minimal_jdk();
    let mut analyzer = SnippetAnalyzer::new(&jdk);
    let bench = InMemoryBench::new();

    let depth = 10_000;
    let parens = format!("{}1{}", "(".repeat(depth), ")".repeat(depth));
    assert_eq!(analyzer.classify(&parens, &bench), INDETERMINATE);
    let negations = format!("{}1", "-".repeat(depth));
    assert_eq!(analyzer.classify(&negations, &bench), INDETERMINATE);
    let sum = vec!["1"; depth].join(" + ");
    assert_eq!(analyzer.classify(&sum, &bench), INDETERMINATE);
    let blocks = format!("{}{}", "{".repeat(depth), "}".repeat(depth));
    assert_eq!(analyzer.classify(&blocks, &bench), INDETERMINATE);

    let moderate = format!("{}1{}", "(".repeat(20), ")".repeat(20));
    assert_eq!(analyzer.classify(&moderate, &bench), known(Type::int()));
    let short_sum = vec!["1"; 30].join(" + ");
    assert_eq!(analyzer.classify(&short_sum, &bench), known(Type::int()));
}

#[test]
fn primitive_type_arguments_declare_nothing() {
    let jdk = TypeStore::with_minimal_jdk();
    let mut analyzer = SnippetAnalyzer::new(&jdk);
    let bench = InMemoryBench::new();

    assert_eq!(analyzer.classify("java.util.List<int> z = null;", &bench), INDETERMINATE);
    assert!(analyzer.declared_variables().is_empty());
    assert_eq!(
        analyzer.classify("java.util.List<int[]> z = null;", &bench),
        Classification::Statement
    );
}
