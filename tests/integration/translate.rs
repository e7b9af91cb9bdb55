//! End-to-end translations: exact Lua text for representative programs, and
//! program output when a Lua interpreter is available.

mod common;
use common::{main_class, translate, translate_and_run, translate_and_run_with};
use insta::assert_snapshot;

const FIXTURE: &str = r#"public class Main {
    public static void main(String[] args) {
        int[] arr = {1, 2, 3, 4, 5};
        for (int i : arr) {
            System.out.println(i * 2);
        }
        try {
            throw new Exception("Test error");
        } catch (Exception e) {
            System.out.println(e.getMessage());
        }
    }
}
"#;

#[test]
fn fixture_translation() {
    let lua = j2lua::translate(FIXTURE, "Main.java").unwrap();
    assert_snapshot!(lua.trim_end(), @r#"
    -- Generated by j2lua from Main.java

    local arr = {1, 2, 3, 4, 5}
    for _, i in ipairs(arr) do
        print(i * 2)
    end
    local __ok1, __res1 = pcall(function()
        error("Test error", 0)
    end)
    if not __ok1 then
        local e = __res1
        print(e)
    end
    "#);
}

#[test]
fn fixture_runs() {
    let Some(out) = translate_and_run(FIXTURE) else { return };
    assert_eq!(out, "2\n4\n6\n8\n10\nTest error\n");
}

const SIGN: &str = r#"public class Main {
    static int sign(int x) {
        if (x > 0) {
            return 1;
        } else if (x < 0) {
            return -1;
        } else {
            return 0;
        }
    }

    public static void main(String[] args) {
        System.out.println(sign(5));
        System.out.println(sign(-3));
        System.out.println(sign(0));
    }
}
"#;

#[test]
fn helper_method_and_else_if_chain() {
    assert_snapshot!(translate(SIGN).trim_end(), @r"
    local sign

    function sign(x)
        if x > 0 then
            return 1
        elseif x < 0 then
            return -1
        else
            return 0
        end
    end

    print(sign(5))
    print(sign(-3))
    print(sign(0))
    ");
}

#[test]
fn helper_method_runs() {
    let Some(out) = translate_and_run(SIGN) else { return };
    assert_eq!(out, "1\n-1\n0\n");
}

const LOOP: &str = r#"public class Main {
    public static void main(String[] args) {
        int i = 0;
        int total = 0;
        while (true) {
            i++;
            if (i > 5) {
                break;
            }
            total += i;
        }
        System.out.println("total: " + total);
    }
}
"#;

#[test]
fn while_loop_with_break() {
    assert_snapshot!(translate(LOOP).trim_end(), @r#"
    local i = 0
    local total = 0
    while true do
        i = i + 1
        if i > 5 then
            break
        end
        total = total + i
    end
    print("total: " .. total)
    "#);
}

#[test]
fn while_loop_runs() {
    let Some(out) = translate_and_run(LOOP) else { return };
    assert_eq!(out, "total: 15\n");
}

const FIELDS: &str = r#"public class Main {
    static int counter = 10;
    static final int STEP = 5;

    static void bump() {
        counter += STEP;
    }

    public static void main(String[] args) {
        bump();
        bump();
        System.out.println(counter);
    }
}
"#;

#[test]
fn static_fields_are_chunk_locals() {
    assert_snapshot!(translate(FIELDS).trim_end(), @r"
    local counter, STEP, bump

    function bump()
        counter = counter + STEP
    end

    counter = 10
    STEP = 5
    bump()
    bump()
    print(counter)
    ");
}

#[test]
fn static_fields_run() {
    let Some(out) = translate_and_run(FIELDS) else { return };
    assert_eq!(out, "20\n");
}

#[test]
fn class_without_main_exports_public_methods() {
    let src = r#"public class MathUtil {
    public static int add(int a, int b) {
        return a + b;
    }

    public static int square(int x) {
        return x * x;
    }
}
"#;
    assert_snapshot!(translate(src).trim_end(), @r"
    local add, square

    function add(a, b)
        return a + b
    end

    function square(x)
        return x * x
    end

    return { add = add, square = square }
    ");
}

#[test]
fn integer_arithmetic_matches_java() {
    let src = main_class(
        "        System.out.println(7 / 2);
        System.out.println(-7 / 2);
        System.out.println(7 % -3);
        System.out.println(-7 % 3);
        System.out.println(2 + 3 * 4);
        System.out.println((2 + 3) * 4);
        System.out.println(10 - 4 - 3);",
    );
    let Some(out) = translate_and_run(&src) else { return };
    assert_eq!(out, "3\n-3\n1\n-1\n14\n20\n3\n");
}

#[test]
fn string_concatenation_matches_java() {
    let src = main_class(
        r#"        int n = 3;
        boolean ok = n > 2;
        String s = "n=" + n + ", ok=" + ok;
        System.out.println(s);
        System.out.println(1 + 2 + "x" + 1 + 2);
        System.out.println("len " + s.length());"#,
    );
    let Some(out) = translate_and_run(&src) else { return };
    assert_eq!(out, "n=3, ok=true\n3x12\nlen 12\n");
}

#[test]
fn library_calls() {
    let src = main_class(
        r#"        System.out.println(Math.max(3, 9));
        System.out.println(Math.min(3, 9));
        System.out.println(Math.abs(-4));
        System.out.println(Integer.parseInt("42") + 1);
        System.out.println(Integer.MAX_VALUE);
        System.out.println(String.valueOf(12) + "!");
        String word = "hi";
        System.out.println(word.equals("hi"));
        System.out.print("a");
        System.out.print(1);
        System.out.println();"#,
    );
    let Some(out) = translate_and_run(&src) else { return };
    assert_eq!(out, "9\n3\n4\n43\n2147483647\n12!\ntrue\na1\n");
}

#[test]
fn main_args_become_chunk_varargs() {
    let src = main_class(
        r#"        System.out.println(args.length);
        for (String a : args) {
            System.out.println("arg " + a);
        }"#,
    );
    let lua = translate(&src);
    assert!(lua.starts_with("local args = {...}\n"), "{lua}");
    let Some(out) = translate_and_run_with(&src, &["x", "y"]) else { return };
    assert_eq!(out, "2\narg x\narg y\n");
}

#[test]
fn unused_args_are_not_bound() {
    let lua = translate(&main_class("        System.out.println(1);"));
    assert_eq!(lua, "print(1)\n");
}

#[test]
fn block_statement_gets_its_own_scope() {
    let src = main_class(
        "        int x = 1;
        {
            int y = x + 1;
            System.out.println(y);
        }",
    );
    assert_eq!(translate(&src), "local x = 1\ndo\n    local y = x + 1\n    print(y)\nend\n");
}

#[test]
fn locals_named_like_lua_keywords_run() {
    let src = main_class(
        r#"        int end = 2;
        int local = end * 3;
        String print = "p" + local;
        System.out.println(print);"#,
    );
    let Some(out) = translate_and_run(&src) else { return };
    assert_eq!(out, "p6\n");
}

#[test]
fn renamed_locals_keep_their_own_values() {
    let src = main_class(
        "        int end_ = 1;
        int end = 2;
        System.out.println(end_);
        System.out.println(end);",
    );
    assert_snapshot!(translate(&src).trim_end(), @r"
    local end_ = 1
    local end__1 = 2
    print(end_)
    print(end__1)
    ");
    let Some(out) = translate_and_run(&src) else { return };
    assert_eq!(out, "1\n2\n");
}

#[test]
fn octal_literals_and_escapes_keep_java_values() {
    let src = main_class(r#"        System.out.println("\101\102" + 010);
        System.out.println(-2147483648);"#);
    assert_eq!(translate(&src), "print(\"AB\" .. 8)\nprint(-2147483648)\n");
    let Some(out) = translate_and_run(&src) else { return };
    assert_eq!(out, "AB8\n-2147483648\n");
}

#[test]
fn indent_width_is_configurable() {
    let opts = j2lua::config::TranslateOptions { indent_width: 2, header: false, module_exports: true };
    let src = main_class("        while (true) {\n            break;\n        }");
    let lua = j2lua::translate_with_options(&src, "Main.java", &opts).unwrap();
    assert_eq!(lua, "while true do\n  break\nend\n");
}
