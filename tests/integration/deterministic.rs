mod common;
use common::{main_class, translate};

const PROGRAM: &str = r#"public class Main {
    static int total = 0;

    static int add(int x) {
        total += x;
        return total;
    }

    public static void main(String[] args) {
        int[] xs = {4, 5, 6};
        for (int x : xs) {
            System.out.println(add(x) % 4 + add(1) / 2);
        }
        try {
            int[] empty = new int[add(0)];
            System.out.println(empty.length);
        } catch (Exception e) {
            System.out.println(e.getMessage());
        }
    }
}
"#;

#[test]
fn same_input_same_output() {
    let first = translate(PROGRAM);
    for _ in 0..5 {
        assert_eq!(translate(PROGRAM), first);
    }
}

#[test]
fn helpers_come_in_a_fixed_order() {
    let rem_first = translate(&main_class("        int a = 9;\n        System.out.println(a % 2);\n        System.out.println(a / 2);"));
    let div_first = translate(&main_class("        int a = 9;\n        System.out.println(a / 2);\n        System.out.println(a % 2);"));
    let prelude = |lua: &str| lua.split("\n\nlocal a = 9\n").next().unwrap_or_default().to_string();
    assert_eq!(prelude(&rem_first), prelude(&div_first));
    assert!(rem_first.find("__j2lua_idiv(a, b)").unwrap() < rem_first.find("__j2lua_irem(a, b)").unwrap());
}

#[test]
fn unit_name_only_changes_the_header() {
    let a = j2lua::translate(PROGRAM, "Main.java").unwrap();
    let b = j2lua::translate(PROGRAM, "Other.java").unwrap();
    assert_ne!(a, b);
    let body = |s: &str| s.lines().skip(1).collect::<Vec<_>>().join("\n");
    assert_eq!(body(&a), body(&b));
}

#[test]
fn output_ends_with_single_newline() {
    let lua = translate(PROGRAM);
    assert!(lua.ends_with("end\n") && !lua.ends_with("\n\n"), "{lua:?}");
}
