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
fn foreach_over_literal_variable() {
    let src = main_class(
        "        int[] nums = {3, 4, 5};
        int sum = 0;
        for (int n : nums) {
            sum += n;
        }
        System.out.println(sum);",
    );
    assert_eq!(
        translate(&src),
        "local nums = {3, 4, 5}\nlocal sum = 0\nfor _, n in ipairs(nums) do\n    sum = sum + n\nend\nprint(sum)\n"
    );
    let Some(out) = translate_and_run(&src) else { return };
    assert_eq!(out, "12\n");
}

#[test]
fn foreach_over_inline_literal() {
    let src = main_class(
        r#"        for (String s : new String[] {"a", "b", "c"}) {
            System.out.print(s);
        }
        System.out.println();"#,
    );
    let lua = translate(&src);
    assert!(lua.starts_with("for _, s in ipairs({\"a\", \"b\", \"c\"}) do\n"), "{lua}");
    let Some(out) = translate_and_run(&src) else { return };
    assert_eq!(out, "abc\n");
}

#[test]
fn foreach_single_statement_body() {
    let src = main_class("        int[] xs = {1, 2};\n        for (int x : xs) System.out.println(x);");
    assert_eq!(translate(&src), "local xs = {1, 2}\nfor _, x in ipairs(xs) do\n    print(x)\nend\n");
}

#[test]
fn nested_arrays() {
    let src = main_class(
        "        int[][] grid = {{1, 2}, {3}};
        for (int[] row : grid) {
            for (int v : row) {
                System.out.println(v);
            }
        }",
    );
    let lua = translate(&src);
    assert!(lua.starts_with("local grid = {{1, 2}, {3}}\n"), "{lua}");
    let Some(out) = translate_and_run(&src) else { return };
    assert_eq!(out, "1\n2\n3\n");
}

#[test]
fn array_length() {
    let src = main_class(
        "        int[] xs = {9, 8, 7, 6};
        System.out.println(xs.length);
        int[] empty = {};
        System.out.println(empty.length);",
    );
    let lua = translate(&src);
    assert!(lua.contains("print(#xs)"), "{lua}");
    assert!(lua.contains("local empty = {}"), "{lua}");
    let Some(out) = translate_and_run(&src) else { return };
    assert_eq!(out, "4\n0\n");
}

#[test]
fn new_array_is_zero_filled() {
    let src = main_class(
        "        int[] zeros = new int[3];
        boolean[] flags = new boolean[2];
        System.out.println(zeros.length);
        for (int z : zeros) System.out.println(z);
        for (boolean f : flags) System.out.println(f);",
    );
    let lua = translate(&src);
    assert!(lua.starts_with("local function __j2lua_new_array(n, init)\n"), "{lua}");
    assert!(lua.contains("local zeros = __j2lua_new_array(3, 0)"), "{lua}");
    assert!(lua.contains("local flags = __j2lua_new_array(2, false)"), "{lua}");
    let Some(out) = translate_and_run(&src) else { return };
    assert_eq!(out, "3\n0\n0\n0\nfalse\nfalse\n");
}

#[test]
fn negative_array_size_raises() {
    let src = main_class("        int n = -2;\n        int[] xs = new int[n];\n        System.out.println(xs.length);");
    let Some(stderr) = translate_and_fail(&src) else { return };
    assert!(stderr.contains("-2"), "{stderr}");
}

#[test]
fn array_from_method_parameter() {
    let src = r#"public class Main {
    static int total(int[] values) {
        int t = 0;
        for (int v : values) {
            t += v;
        }
        return t;
    }

    public static void main(String[] args) {
        int[] data = {10, 20, 30};
        System.out.println(total(data));
    }
}
"#;
    let Some(out) = translate_and_run(src) else { return };
    assert_eq!(out, "60\n");
}

#[test]
fn indexing_is_rejected() {
    assert_eq!(unsupported(&main_class("        int[] a = {1};\n        int x = a[0];")), "array indexing");
    assert_eq!(unsupported(&main_class("        int[] a = {1};\n        a[0] = 5;")), "array indexing");
}

#[test]
fn string_array_without_initializer_is_rejected() {
    assert_eq!(
        unsupported(&main_class("        String[] names = new String[2];")),
        "array of String without initializer"
    );
}

#[test]
fn foreach_over_non_array_is_rejected() {
    assert_eq!(
        unsupported(&main_class("        int n = 3;\n        for (int i : n) { }")),
        "for-each over a non-array value"
    );
}
