//! Property-based tests for pipeline invariants.
//!
//! Generated programs only use declared names and supported constructs, so
//! every one of them must translate.

use j2lua::lexer::lex;
use proptest::prelude::*;

fn arb_atom() -> impl Strategy<Value = String> {
    prop_oneof![
        (0i64..1000).prop_map(|n| n.to_string()),
        Just("a".to_string()),
        Just("b".to_string()),
        Just("counter".to_string()),
        (0i64..50).prop_map(|n| format!("twice({n})")),
    ]
}

fn arb_int_expr() -> impl Strategy<Value = String> {
    arb_atom().prop_recursive(3, 16, 2, |inner| {
        (inner.clone(), prop::sample::select(vec!["+", "-", "*", "/", "%"]), inner)
            .prop_map(|(l, op, r)| format!("({l} {op} {r})"))
    })
}

fn arb_condition() -> impl Strategy<Value = String> {
    (arb_int_expr(), prop::sample::select(vec!["<", ">", "<=", ">=", "==", "!="]), arb_int_expr())
        .prop_map(|(l, op, r)| format!("{l} {op} {r}"))
}

fn arb_statement() -> impl Strategy<Value = String> {
    prop_oneof![
        arb_int_expr().prop_map(|e| format!("System.out.println({e});")),
        arb_int_expr().prop_map(|e| format!("System.out.println(\"v=\" + {e});")),
        arb_int_expr().prop_map(|e| format!("a = {e};")),
        arb_int_expr().prop_map(|e| format!("b += {e};")),
        Just("counter++;".to_string()),
        (arb_condition(), arb_int_expr(), arb_int_expr()).prop_map(|(c, t, e)| {
            format!("if ({c}) {{ System.out.println({t}); }} else {{ a = {e}; }}")
        }),
        arb_int_expr().prop_map(|e| {
            format!("try {{ System.out.println({e}); }} catch (Exception ex) {{ System.out.println(ex.getMessage()); }}")
        }),
        arb_int_expr().prop_map(|e| format!("for (int x : xs) {{ b = x + {e}; }}")),
    ]
}

fn arb_program() -> impl Strategy<Value = String> {
    prop::collection::vec(arb_statement(), 1..6).prop_map(|stmts| {
        format!(
            "public class Main {{\n    static int counter = 0;\n\n    static int twice(int n) {{\n        counter++;\n        return n * 2;\n    }}\n\n    public static void main(String[] args) {{\n        int a = 1;\n        int b = 2;\n        int[] xs = {{1, 2, 3}};\n        {}\n    }}\n}}\n",
            stmts.join("\n        ")
        )
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Lexer spans are ordered and non-overlapping
    #[test]
    fn spans_are_monotonic(source in arb_program()) {
        let tokens = lex(&source).unwrap();
        for window in tokens.windows(2) {
            prop_assert!(window[0].span.end <= window[1].span.start, "{:?} then {:?}", window[0], window[1]);
        }
        prop_assert!(tokens.iter().all(|t| t.span.end <= source.len()));
    }

    #[test]
    fn generated_programs_translate(source in arb_program()) {
        let lua = j2lua::translate(&source, "Main.java");
        prop_assert!(lua.is_ok(), "{:?}\n{}", lua.err(), source);
    }

    #[test]
    fn translation_is_deterministic(source in arb_program()) {
        let first = j2lua::translate(&source, "Main.java").unwrap();
        let second = j2lua::translate(&source, "Main.java").unwrap();
        prop_assert_eq!(first, second);
    }

    /// Helpers appear only when the program uses the matching operator
    #[test]
    fn helpers_only_when_used(source in arb_program()) {
        let lua = j2lua::translate(&source, "Main.java").unwrap();
        prop_assert_eq!(lua.contains("local function __j2lua_idiv"), source.contains(" / "));
        prop_assert_eq!(lua.contains("local function __j2lua_irem"), source.contains(" % "));
        prop_assert!(!lua.contains("__j2lua_new_array"));
    }

    /// Output is balanced: every opened Lua block is closed
    #[test]
    fn blocks_are_balanced(source in arb_program()) {
        let lua = j2lua::translate(&source, "Main.java").unwrap();
        let opens = lua
            .lines()
            .map(str::trim)
            .filter(|l| l.ends_with(" do") || l.ends_with(" then") && l.starts_with("if ") || l.ends_with("function()") || l.starts_with("function ") || l.starts_with("local function "))
            .count();
        let closes = lua.lines().map(str::trim).filter(|l| *l == "end" || *l == "end)").count();
        prop_assert_eq!(opens, closes, "{}", lua);
    }
}
