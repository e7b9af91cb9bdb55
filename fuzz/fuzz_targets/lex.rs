#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary text must lex or fail cleanly, and spans must stay in bounds
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(tokens) = j2lua::lexer::lex(s) {
            for tok in &tokens {
                assert!(tok.span.start <= tok.span.end && tok.span.end <= s.len());
            }
        }
    }
});
