pub mod span;
pub mod diagnostics;
pub mod lexer;
pub mod parser;
pub mod visit;
pub mod resolve;
pub mod codegen;
pub mod pretty;
pub mod config;

use std::path::Path;

use config::TranslateOptions;
use diagnostics::CompileError;
use parser::ast::ClassDecl;
use span::Spanned;

/// Translate one Java compilation unit to Lua with default options
/// (lex → parse → resolve → codegen). `name` only appears in the header.
pub fn translate(source: &str, name: &str) -> Result<String, CompileError> {
    translate_with_options(source, name, &TranslateOptions::default())
}

pub fn translate_with_options(source: &str, name: &str, opts: &TranslateOptions) -> Result<String, CompileError> {
    let class = parse_unit(source)?;
    let res = {
        let _stage = tracing::debug_span!("resolve", unit = name).entered();
        resolve::resolve(&class)?
    };
    let _stage = tracing::debug_span!("codegen", unit = name).entered();
    codegen::codegen(&class, &res, opts, name)
}

/// Lex and parse without resolving names.
pub fn parse_unit(source: &str) -> Result<Spanned<ClassDecl>, CompileError> {
    let tokens = {
        let _stage = tracing::debug_span!("lex").entered();
        lexer::lex(source)?
    };
    let _stage = tracing::debug_span!("parse").entered();
    let class = parser::Parser::new(&tokens, source).parse_unit()?;
    tracing::debug!(
        class = %class.node.name.node,
        fields = class.node.fields.len(),
        methods = class.node.methods.len(),
        "parsed unit"
    );
    Ok(class)
}

/// Lex, parse and resolve only; reports the first error.
pub fn check(source: &str) -> Result<(), CompileError> {
    let class = parse_unit(source)?;
    resolve::resolve(&class)?;
    Ok(())
}

/// Read `input`, translate it, and write the Lua chunk to `output`.
/// Nothing is written unless translation succeeds.
pub fn translate_file(input: &Path, output: &Path, opts: &TranslateOptions) -> Result<(), CompileError> {
    let source = read_source(input)?;
    let name = input.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    let lua = translate_with_options(&source, &name, opts)?;
    std::fs::write(output, lua)
        .map_err(|e| CompileError::io(format!("failed to write {}: {e}", output.display()), output.to_path_buf()))
}

pub fn read_source(path: &Path) -> Result<String, CompileError> {
    std::fs::read_to_string(path)
        .map_err(|e| CompileError::io(format!("failed to read {}: {e}", path.display()), path.to_path_buf()))
}
