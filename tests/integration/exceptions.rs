mod common;
use common::{main_class, translate, translate_and_fail, translate_and_run};
use j2lua::diagnostics::CompileError;

fn unsupported(source: &str) -> String {
    match j2lua::translate(source, "Main.java") {
        Err(CompileError::UnsupportedConstruct { construct, .. }) => construct,
        other => panic!("expected an unsupported construct, got {other:?}"),
    }
}

#[test]
fn caught_message_round_trips() {
    let src = main_class(
        r#"        try {
            throw new Exception("Test error");
        } catch (Exception e) {
            System.out.println(e.getMessage());
        }
        System.out.println("after");"#,
    );
    let Some(out) = translate_and_run(&src) else { return };
    assert_eq!(out, "Test error\nafter\n");
}

#[test]
fn statements_after_throw_do_not_run() {
    let src = main_class(
        r#"        try {
            System.out.println("before");
            throw new RuntimeException("stop");
        } catch (RuntimeException e) {
            System.out.println("caught " + e.getMessage());
        }"#,
    );
    let Some(out) = translate_and_run(&src) else { return };
    assert_eq!(out, "before\ncaught stop\n");
}

#[test]
fn uncaught_throw_fails_the_chunk() {
    let src = main_class(r#"        System.out.println("start");
        throw new IllegalStateException("boom");"#);
    let Some(stderr) = translate_and_fail(&src) else { return };
    assert!(stderr.contains("boom"), "{stderr}");
}

#[test]
fn throw_with_computed_message() {
    let src = main_class(
        r#"        int code = 40 + 4;
        try {
            throw new Exception("code " + code);
        } catch (Exception e) {
            System.out.println(e.getMessage());
        }"#,
    );
    let Some(out) = translate_and_run(&src) else { return };
    assert_eq!(out, "code 44\n");
}

#[test]
fn throw_from_called_method_is_caught() {
    let src = r#"public class Main {
    static int check(int x) {
        if (x < 0) {
            throw new IllegalArgumentException("negative: " + x);
        }
        return x;
    }

    public static void main(String[] args) {
        try {
            System.out.println(check(3));
            System.out.println(check(-1));
            System.out.println("unreachable");
        } catch (RuntimeException e) {
            System.out.println(e.getMessage());
        }
    }
}
"#;
    let Some(out) = translate_and_run(src) else { return };
    assert_eq!(out, "3\nnegative: -1\n");
}

#[test]
fn runtime_errors_are_catchable() {
    let src = main_class(
        r#"        int zero = 0;
        try {
            int x = 1 / zero;
            System.out.println(x);
        } catch (RuntimeException e) {
            System.out.println("caught " + e.getMessage());
        }
        try {
            int n = Integer.parseInt("abc");
            System.out.println(n);
        } catch (Exception e) {
            System.out.println(e.getMessage());
        }"#,
    );
    let Some(out) = translate_and_run(&src) else { return };
    assert_eq!(out, "caught / by zero\nFor input string: \"abc\"\n");
}

#[test]
fn return_inside_try_leaves_the_method() {
    let src = r#"public class Main {
    static int safeDiv(int a, int b) {
        try {
            return a / b;
        } catch (RuntimeException e) {
            System.out.println("division failed");
            return -1;
        }
    }

    public static void main(String[] args) {
        System.out.println(safeDiv(10, 2));
        System.out.println(safeDiv(1, 0));
    }
}
"#;
    let Some(out) = translate_and_run(src) else { return };
    assert_eq!(out, "5\ndivision failed\n-1\n");
}

#[test]
fn void_return_inside_try() {
    let src = r#"public class Main {
    static void greet(boolean quiet) {
        try {
            if (quiet) {
                return;
            }
            System.out.println("hello");
        } catch (Exception e) {
            System.out.println("never");
        }
        System.out.println("done");
    }

    public static void main(String[] args) {
        greet(true);
        greet(false);
    }
}
"#;
    let lua = translate(src);
    assert!(lua.contains("local __ok1, __res1 = pcall(function()"), "{lua}");
    assert!(lua.contains("    elseif __res1 then\n        return\n    end\n"), "{lua}");
    let Some(out) = translate_and_run(src) else { return };
    assert_eq!(out, "hello\ndone\n");
}

#[test]
fn rethrow_reaches_outer_handler() {
    let src = r#"public class Main {
    static void risky() throws Exception {
        try {
            throw new Exception("inner");
        } catch (Exception e) {
            System.out.println("cleanup");
            throw e;
        }
    }

    public static void main(String[] args) {
        try {
            risky();
        } catch (Exception e) {
            System.out.println("outer " + e.getMessage());
        }
    }
}
"#;
    let Some(out) = translate_and_run(src) else { return };
    assert_eq!(out, "cleanup\nouter inner\n");
}

#[test]
fn nested_try_blocks() {
    let src = main_class(
        r#"        try {
            try {
                throw new Exception("first");
            } catch (Exception inner) {
                System.out.println("inner " + inner.getMessage());
            }
            throw new Exception("second");
        } catch (Exception outer) {
            System.out.println("outer " + outer.getMessage());
        }"#,
    );
    let lua = translate(&src);
    assert!(lua.contains("local __ok2, __res2 = pcall(function()"), "{lua}");
    let Some(out) = translate_and_run(&src) else { return };
    assert_eq!(out, "inner first\nouter second\n");
}

#[test]
fn break_inside_loop_inside_try_is_allowed() {
    let src = main_class(
        r#"        try {
            while (true) {
                System.out.println("once");
                break;
            }
        } catch (Exception e) {
            System.out.println("no");
        }"#,
    );
    let Some(out) = translate_and_run(&src) else { return };
    assert_eq!(out, "once\n");
}

#[test]
fn unsupported_exception_shapes() {
    assert_eq!(
        unsupported(&main_class(
            "        try { } catch (IllegalStateException a) { } catch (Exception b) { }"
        )),
        "multiple catch clauses"
    );
    assert_eq!(
        unsupported(&main_class("        try { } finally { }")),
        "finally block"
    );
    assert_eq!(
        unsupported(&main_class("        try { } catch (Exception e) { Exception f = e; }")),
        "use of a caught exception object"
    );
}

#[test]
fn narrow_catch_types_are_rejected() {
    let src = main_class(
        r#"        try {
            throw new IllegalStateException("boom");
        } catch (IllegalArgumentException e) {
            System.out.println("caught " + e.getMessage());
        }"#,
    );
    assert_eq!(unsupported(&src), "catch of specific exception type 'IllegalArgumentException'");
    assert_eq!(
        unsupported(&main_class(
            "        int zero = 0;\n        try { int x = 1 / zero; } catch (ArithmeticException e) { }"
        )),
        "catch of specific exception type 'ArithmeticException'"
    );
}

#[test]
fn runtime_exception_catch_needs_an_unchecked_body() {
    let checked_throw = main_class(
        r#"        try {
            throw new Exception("checked");
        } catch (RuntimeException e) {
            System.out.println(e.getMessage());
        }"#,
    );
    assert_eq!(unsupported(&checked_throw), "catch of specific exception type 'RuntimeException'");

    let checked_call = r#"public class Main {
    static void load() throws Exception {
        throw new Exception("missing");
    }

    public static void main(String[] args) throws Exception {
        try {
            load();
        } catch (RuntimeException e) {
            System.out.println(e.getMessage());
        }
    }
}
"#;
    assert_eq!(unsupported(checked_call), "catch of specific exception type 'RuntimeException'");

    let unchecked = main_class(
        r#"        try {
            throw new IllegalStateException("boom");
        } catch (RuntimeException e) {
            System.out.println("caught " + e.getMessage());
        }"#,
    );
    let Some(out) = translate_and_run(&unchecked) else { return };
    assert_eq!(out, "caught boom\n");
}

#[test]
fn errors_cannot_be_thrown() {
    assert_eq!(
        unsupported(&main_class(r#"        throw new AssertionError("bad");"#)),
        "throw of 'AssertionError', which is not an Exception"
    );
}
