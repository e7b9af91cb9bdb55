use super::*;

#[test]
fn fixture_program() {
    let src = r#"public class Main {
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
}"#;
    let tokens = lex_ok(src);
    assert_eq!(tokens.last().map(|(t, _)| t.clone()), Some(Token::Eof));
    assert!(tokens.iter().any(|(t, _)| *t == Token::StringLit("Test error".into())));
    assert_eq!(tokens.iter().filter(|(t, _)| *t == Token::Colon).count(), 1);
    assert_eq!(
        tokens.iter().filter(|(t, _)| *t == Token::LBrace).count(),
        tokens.iter().filter(|(t, _)| *t == Token::RBrace).count()
    );
}

#[test]
fn method_header() {
    assert_tokens(
        "static int twice(int x) { return x * 2; }",
        &[
            Token::Static, Token::Int, Token::Ident, Token::LParen, Token::Int, Token::Ident,
            Token::RParen, Token::LBrace, Token::Return, Token::Ident, Token::Star, Token::IntLit(2),
            Token::Semi, Token::RBrace,
        ],
    );
}

#[test]
fn package_and_imports_lex() {
    let src = "package demo;\nimport java.util.List;\nclass A { }";
    assert_eq!(token_count(src), 15);
}
