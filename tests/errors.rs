mod common;
use common::run;

#[test]
fn missing_expression_is_a_parse_error() {
    let (_, stderr, ok) = run("let x = ;\n");
    assert!(!ok);
    assert!(stderr.contains("Parse error"), "stderr: {stderr}");
}

#[test]
fn unterminated_string_is_a_scan_error() {
    let (_, stderr, ok) = run("\"hello\n");
    assert!(!ok);
    assert!(stderr.contains("Scan error"), "stderr: {stderr}");
}

#[test]
fn reading_a_variable_in_its_own_initializer_is_a_resolve_error() {
    let (_, stderr, ok) = run("let x = x + 1;\n");
    assert!(!ok);
    assert!(stderr.contains("cannot read variable in its own initializer"), "stderr: {stderr}");
}

#[test]
fn returning_from_top_level_code_is_a_resolve_error() {
    let (_, stderr, ok) = run("return 1;\n");
    assert!(!ok);
    assert!(stderr.contains("cannot return from top-level code"), "stderr: {stderr}");
}

#[test]
fn calling_a_non_callable_value_is_a_runtime_error() {
    let (_, stderr, ok) = run("let x = 1; x();\n");
    assert!(!ok);
    assert!(stderr.contains("can only call functions and classes"), "stderr: {stderr}");
}

#[test]
fn returning_a_value_from_an_initializer_is_a_resolve_error() {
    let (_, stderr, ok) = run(
        r#"
        class C {
            init() { return 1; }
        }
        "#,
    );
    assert!(!ok);
    assert!(stderr.contains("cannot return a value from an initializer"), "stderr: {stderr}");
}

#[test]
fn this_outside_a_class_is_a_resolve_error() {
    let (_, stderr, ok) = run("print(this);\n");
    assert!(!ok);
    assert!(stderr.contains("cannot use 'this' outside of a class"), "stderr: {stderr}");
}

#[test]
fn redeclaring_a_local_name_in_the_same_scope_is_a_resolve_error() {
    let (_, stderr, ok) = run(
        r#"
        {
            let a = 1;
            let a = 2;
        }
        "#,
    );
    assert!(!ok);
    assert!(stderr.contains("already declared in this scope"), "stderr: {stderr}");
}

#[test]
fn invalid_assignment_target_is_a_parse_error() {
    let (_, stderr, ok) = run("1 + 2 = 3;\n");
    assert!(!ok);
    assert!(stderr.contains("invalid assignment target"), "stderr: {stderr}");
}

#[test]
fn wrong_arity_call_reports_both_counts() {
    let (_, stderr, ok) = run("fn add(a, b) { return a + b; } print(add(1));\n");
    assert!(!ok);
    assert!(stderr.contains("expected 2 arguments but got 1"), "stderr: {stderr}");
}

#[test]
fn assigning_to_an_undefined_global_is_a_runtime_error() {
    let (_, stderr, ok) = run("never_defined = 1;\n");
    assert!(!ok);
    assert!(stderr.contains("undefined variable 'never_defined'"), "stderr: {stderr}");
}

#[test]
fn reading_an_undefined_global_is_a_runtime_error() {
    let (_, stderr, ok) = run("print(never_defined);\n");
    assert!(!ok);
    assert!(stderr.contains("undefined variable 'never_defined'"), "stderr: {stderr}");
}

#[test]
fn a_runtime_error_in_the_repl_does_not_corrupt_earlier_globals() {
    use rift::Rift;

    let mut rift = Rift::new();
    assert_eq!(rift.run("let x = 1;"), rift::exit_code::OK);
    assert_ne!(rift.run("print(1/0);"), rift::exit_code::OK);
    assert_eq!(rift.run("print(x);"), rift::exit_code::OK);
}
