mod common;
use common::run;

#[test]
fn counter_closure_closes_over_a_cell_not_a_value() {
    let (stdout, stderr, ok) = run(
        r#"
        fn makeCounter() {
            let n = 0;
            fn inc() {
                n = n + 1;
                return n;
            }
            return inc;
        }
        let c = makeCounter();
        print(c());
        print(c());
        print(c());
        "#,
    );
    assert!(ok, "stderr: {stderr}");
    assert_eq!(stdout, "1\n2\n3\n");
}

#[test]
fn two_counters_have_independent_cells() {
    let (stdout, stderr, ok) = run(
        r#"
        fn makeCounter() {
            let n = 0;
            fn inc() { n = n + 1; return n; }
            return inc;
        }
        let a = makeCounter();
        let b = makeCounter();
        print(a());
        print(a());
        print(b());
        "#,
    );
    assert!(ok, "stderr: {stderr}");
    assert_eq!(stdout, "1\n2\n1\n");
}

#[test]
fn closure_captures_enclosing_local_by_reference() {
    let (stdout, stderr, ok) = run(
        r#"
        let x = "outer";
        fn showX() { print(x); }
        fn reassign() { x = "inner"; }
        showX();
        reassign();
        showX();
        "#,
    );
    assert!(ok, "stderr: {stderr}");
    assert_eq!(stdout, "outer\ninner\n");
}

#[test]
fn nested_functions_close_over_each_enclosing_scope() {
    let (stdout, stderr, ok) = run(
        r#"
        fn outer() {
            let a = "a";
            fn middle() {
                let b = "b";
                fn inner() {
                    print(a);
                    print(b);
                }
                return inner;
            }
            return middle();
        }
        outer()();
        "#,
    );
    assert!(ok, "stderr: {stderr}");
    assert_eq!(stdout, "a\nb\n");
}
