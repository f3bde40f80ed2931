mod common;
use common::run;

#[test]
fn init_sets_fields_and_methods_read_them() {
    let (stdout, stderr, ok) = run(
        r#"
        class Box {
            init(v) { this.value = v; }
            get() { return this.value; }
        }
        let b = Box(10);
        print(b.get());
        "#,
    );
    assert!(ok, "stderr: {stderr}");
    assert_eq!(stdout, "10\n");
}

#[test]
fn init_with_bare_return_still_yields_the_instance() {
    let (stdout, stderr, ok) = run(
        r#"
        class Thing {
            init(v) {
                this.v = v;
                return;
            }
        }
        let t = Thing(5);
        print(t.v);
        "#,
    );
    assert!(ok, "stderr: {stderr}");
    assert_eq!(stdout, "5\n");
}

#[test]
fn fields_are_created_by_assignment_and_shadow_nothing_until_set() {
    let (stdout, stderr, ok) = run(
        r#"
        class Point { }
        let p = Point();
        p.x = 1;
        p.y = 2;
        print(p.x + p.y);
        "#,
    );
    assert!(ok, "stderr: {stderr}");
    assert_eq!(stdout, "3\n");
}

#[test]
fn method_bound_to_instance_sees_that_instance_as_this() {
    let (stdout, stderr, ok) = run(
        r#"
        class Greeter {
            init(name) { this.name = name; }
            greet() { return "hi " + this.name; }
        }
        let g = Greeter("sam");
        let bound = g.greet;
        print(bound());
        "#,
    );
    assert!(ok, "stderr: {stderr}");
    assert_eq!(stdout, "hi sam\n");
}

#[test]
fn undefined_property_is_a_runtime_error() {
    let (_, stderr, ok) = run(
        r#"
        class Empty { }
        let e = Empty();
        print(e.missing);
        "#,
    );
    assert!(!ok);
    assert!(stderr.contains("undefined property 'missing'"), "stderr: {stderr}");
}

#[test]
fn calling_a_class_with_wrong_arity_is_a_runtime_error() {
    let (_, stderr, ok) = run(
        r#"
        class Pair {
            init(a, b) { this.a = a; this.b = b; }
        }
        Pair(1);
        "#,
    );
    assert!(!ok);
    assert!(stderr.contains("expected 2 arguments but got 1"), "stderr: {stderr}");
}
