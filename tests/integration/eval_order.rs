//! Java evaluates operands and arguments left to right; the generated Lua
//! must print in the same order and compute the same values.

mod common;
use common::{translate, translate_and_run};

const COUNTER: &str = r#"public class Main {
    static int counter = 0;

    static int next() {
        counter++;
        return counter;
    }

    static int trace(String label, int value) {
        System.out.println(label);
        return value;
    }

    static boolean check(int x) {
        System.out.println("check " + x);
        return x > 1;
    }

    public static void main(String[] args) {
BODY
    }
}
"#;

fn program(body: &str) -> String {
    COUNTER.replace("BODY", body)
}

#[test]
fn binary_operands_left_to_right() {
    let src = program("        int r = next() * 10 + next();\n        System.out.println(r);");
    let lua = translate(&src);
    assert!(lua.contains("local __t1 = next() * 10\nlocal r = __t1 + next()\n"), "{lua}");
    let Some(out) = translate_and_run(&src) else { return };
    assert_eq!(out, "12\n");
}

#[test]
fn field_read_before_call_that_changes_it() {
    let src = program("        System.out.println(counter + next());");
    let lua = translate(&src);
    assert!(lua.contains("local __t1 = counter\nprint(__t1 + next())\n"), "{lua}");
    let Some(out) = translate_and_run(&src) else { return };
    assert_eq!(out, "1\n");
}

#[test]
fn arguments_left_to_right() {
    let src = program(
        r#"        int sum = trace("a", 1) + trace("b", 2) + trace("c", 3);
        System.out.println(sum);
        System.out.println(Math.max(trace("x", 4), trace("y", 5)));"#,
    );
    let Some(out) = translate_and_run(&src) else { return };
    assert_eq!(out, "a\nb\nc\n6\nx\ny\n5\n");
}

#[test]
fn short_circuit_keeps_right_side_lazy() {
    let src = program(
        r#"        boolean ok = check(1) && check(2);
        System.out.println(ok);
        boolean any = check(2) || check(3);
        System.out.println(any);"#,
    );
    let lua = translate(&src);
    assert!(lua.contains("local __t1 = check(1)\nif __t1 then\n    __t1 = check(2)\nend\nlocal ok = __t1\n"), "{lua}");
    let Some(out) = translate_and_run(&src) else { return };
    assert_eq!(out, "check 1\nfalse\ncheck 2\ntrue\n");
}

#[test]
fn concatenation_with_calls() {
    let src = program(r#"        System.out.println("v" + next() + next());"#);
    let Some(out) = translate_and_run(&src) else { return };
    assert_eq!(out, "v12\n");
}

#[test]
fn while_condition_with_calls_is_reevaluated() {
    let src = program(
        "        while (next() + next() < 10) {
            System.out.println(counter);
        }",
    );
    let lua = translate(&src);
    assert!(lua.contains("while true do\n    local __t1 = next()\n    if not (__t1 + next() < 10) then break end\n"), "{lua}");
    let Some(out) = translate_and_run(&src) else { return };
    assert_eq!(out, "2\n4\n");
}

#[test]
fn pure_expressions_stay_inline() {
    let src = program("        int a = 2;\n        int b = a * 3 + a - 1;\n        System.out.println(b);");
    let lua = translate(&src);
    assert!(lua.contains("local b = a * 3 + a - 1\n"), "{lua}");
    assert!(!lua.contains("__t"), "{lua}");
}

#[test]
fn compound_assignment_reads_target_first() {
    let src = program("        counter += next();\n        System.out.println(counter);");
    let lua = translate(&src);
    assert!(lua.contains("local __t1 = counter\ncounter = __t1 + next()\n"), "{lua}");
    let Some(out) = translate_and_run(&src) else { return };
    assert_eq!(out, "1\n");
}
