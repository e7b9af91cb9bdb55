// Parser property tests:
// 1. No panics: the parser returns Ok or Err on any token soup
// 2. Determinism: same source, same result
// 3. Pretty round trip: parse -> pretty -> parse -> pretty is stable

use j2lua::lexer::lex;
use j2lua::parser::Parser;
use j2lua::pretty::pretty_print;
use proptest::prelude::*;

// Fragments that lex cleanly, glued in random order
fn arb_token_soup() -> impl Strategy<Value = String> {
    let fragments = vec![
        "class", "public", "static", "void", "int", "boolean", "Main", "x", "main", "(", ")", "{", "}", "[", "]",
        ";", ",", ".", ":", "=", "==", "+", "-", "*", "/", "<", "&&", "!", "1", "42", "\"s\"", "true", "try",
        "catch", "throw", "new", "return", "for", "while", "if", "else", "break", "switch", "do", "++",
    ];
    prop::collection::vec(prop::sample::select(fragments), 0..40).prop_map(|parts| parts.join(" "))
}

fn arb_expr() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![
        (0i64..100).prop_map(|n| n.to_string()),
        Just("x".to_string()),
        Just("y".to_string()),
        Just("true".to_string()),
        Just("\"t\\n\"".to_string()),
    ];
    leaf.prop_recursive(3, 12, 2, |inner| {
        prop_oneof![
            (inner.clone(), prop::sample::select(vec!["+", "-", "*", "/", "<", "==", "&&", "||"]), inner.clone())
                .prop_map(|(l, op, r)| format!("{l} {op} {r}")),
            inner.clone().prop_map(|e| format!("({e})")),
            inner.clone().prop_map(|e| format!("!{e}")),
            inner.prop_map(|e| format!("-({e})")),
        ]
    })
}

fn arb_class() -> impl Strategy<Value = String> {
    prop::collection::vec(arb_expr(), 1..5).prop_map(|exprs| {
        let body: Vec<String> = exprs
            .iter()
            .enumerate()
            .map(|(i, e)| match i % 3 {
                0 => format!("x = {e};"),
                1 => format!("if ({e}) {{ f(y); }} else if (x) y = 1; else {{ }}"),
                _ => format!("while ({e}) {{ break; }}"),
            })
            .collect();
        format!("class P {{ static int x; static void f(int y) {{ {} }} }}", body.join(" "))
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn parser_does_not_panic(source in arb_token_soup()) {
        let tokens = lex(&source).unwrap();
        let _ = Parser::new(&tokens, &source).parse_unit();
    }

    #[test]
    fn parse_is_deterministic(source in arb_token_soup()) {
        let tokens = lex(&source).unwrap();
        let first = Parser::new(&tokens, &source).parse_unit();
        let second = Parser::new(&tokens, &source).parse_unit();
        match (first, second) {
            (Ok(a), Ok(b)) => prop_assert_eq!(a, b),
            (Err(a), Err(b)) => prop_assert_eq!(a.to_string(), b.to_string()),
            _ => prop_assert!(false, "one parse failed and the other did not: {}", source),
        }
    }

    #[test]
    fn pretty_print_round_trips(source in arb_class()) {
        let class = j2lua::parse_unit(&source).unwrap();
        let printed = pretty_print(&class);
        let reparsed = j2lua::parse_unit(&printed);
        prop_assert!(reparsed.is_ok(), "{:?}\n{}", reparsed.err(), printed);
        let reprinted = reparsed.map(|c| pretty_print(&c)).unwrap_or_default();
        prop_assert_eq!(printed, reprinted);
    }
}
