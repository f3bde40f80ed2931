mod common;
use common::run;

#[test]
fn len_returns_character_count_of_a_string() {
    let (stdout, stderr, ok) = run(r#"print(len("hello"));"#);
    assert!(ok, "stderr: {stderr}");
    assert_eq!(stdout, "5\n");
}

#[test]
fn len_rejects_non_string_argument() {
    let (_, stderr, ok) = run("print(len(1));");
    assert!(!ok);
    assert!(stderr.contains("len() argument must be a string"), "stderr: {stderr}");
}

#[test]
fn str_stringifies_every_value_kind() {
    let (stdout, stderr, ok) = run(
        r#"
        print(str(1));
        print(str(1.5));
        print(str(true));
        print(str(nil));
        print(str("already a string"));
        "#,
    );
    assert!(ok, "stderr: {stderr}");
    assert_eq!(stdout, "1\n1.5\ntrue\nnil\nalready a string\n");
}

#[test]
fn num_parses_a_numeric_string() {
    let (stdout, stderr, ok) = run(r#"print(num("42") + num("0.5"));"#);
    assert!(ok, "stderr: {stderr}");
    assert_eq!(stdout, "42.5\n");
}

#[test]
fn num_rejects_a_non_numeric_string() {
    let (_, stderr, ok) = run(r#"print(num("not a number"));"#);
    assert!(!ok);
    assert!(stderr.contains("cannot convert"), "stderr: {stderr}");
}

#[test]
fn num_rejects_non_string_argument() {
    let (_, stderr, ok) = run("print(num(true));");
    assert!(!ok);
    assert!(stderr.contains("num() argument must be a string"), "stderr: {stderr}");
}

#[test]
fn type_reports_the_tag_of_every_value_kind() {
    let (stdout, stderr, ok) = run(
        r#"
        class Widget { }
        print(type(nil));
        print(type(true));
        print(type(1));
        print(type("s"));
        print(type(Widget));
        print(type(Widget()));
        fn f() { }
        print(type(f));
        "#,
    );
    assert!(ok, "stderr: {stderr}");
    assert_eq!(stdout, "nil\nbool\nnumber\nstring\nfunction\nWidget\nfunction\n");
}

#[test]
fn clock_returns_a_number() {
    let (stdout, stderr, ok) = run("print(type(clock()));");
    assert!(ok, "stderr: {stderr}");
    assert_eq!(stdout, "number\n");
}

#[test]
fn clock_is_called_with_no_arguments() {
    let (_, stderr, ok) = run("print(clock(1));");
    assert!(!ok);
    assert!(stderr.contains("expected 0 arguments but got 1"), "stderr: {stderr}");
}
