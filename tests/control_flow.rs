mod common;
use common::run;

#[test]
fn if_else_picks_the_truthy_branch() {
    let (stdout, stderr, ok) = run(
        r#"
        if (true) { print("then"); } else { print("else"); }
        if (false) { print("then"); } else { print("else"); }
        "#,
    );
    assert!(ok, "stderr: {stderr}");
    assert_eq!(stdout, "then\nelse\n");
}

#[test]
fn truthiness_only_nil_and_false_take_the_else_branch() {
    let (stdout, stderr, ok) = run(
        r#"
        if (0) { print("0 then"); } else { print("0 else"); }
        if ("") { print("str then"); } else { print("str else"); }
        if (nil) { print("nil then"); } else { print("nil else"); }
        if (false) { print("false then"); } else { print("false else"); }
        "#,
    );
    assert!(ok, "stderr: {stderr}");
    assert_eq!(stdout, "0 then\nstr then\nnil else\nfalse else\n");
}

#[test]
fn while_loop_runs_while_condition_is_truthy() {
    let (stdout, stderr, ok) = run(
        r#"
        let i = 0;
        while (i < 3) {
            print(i);
            i = i + 1;
        }
        "#,
    );
    assert!(ok, "stderr: {stderr}");
    assert_eq!(stdout, "0\n1\n2\n");
}

#[test]
fn for_loop_desugars_to_initializer_condition_and_increment() {
    let (stdout, stderr, ok) = run("for (let i=0; i<3; i = i+1) print(i);\n");
    assert!(ok, "stderr: {stderr}");
    assert_eq!(stdout, "0\n1\n2\n");
}

#[test]
fn for_loop_with_absent_condition_runs_until_an_inner_return() {
    let (stdout, stderr, ok) = run(
        r#"
        fn countTo(n) {
            let i = 0;
            for (;;) {
                if (i >= n) { return i; }
                print(i);
                i = i + 1;
            }
        }
        print(countTo(3));
        "#,
    );
    assert!(ok, "stderr: {stderr}");
    assert_eq!(stdout, "0\n1\n2\n3\n");
}

#[test]
fn nested_blocks_restore_the_enclosing_environment_on_exit() {
    let (stdout, stderr, ok) = run(
        r#"
        let x = "outer";
        {
            let x = "inner";
            print(x);
        }
        print(x);
        "#,
    );
    assert!(ok, "stderr: {stderr}");
    assert_eq!(stdout, "inner\nouter\n");
}
