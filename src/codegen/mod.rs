//! Lua code generation: walks the resolved class and emits one Lua chunk.
//!
//! Chunk layout: optional header comment, the runtime helpers the unit uses,
//! a forward declaration of static fields and helper methods, the method
//! bodies, field initialisers, then `main`'s body as top-level statements
//! (or an export table for classes without `main`).

pub mod effects;
pub mod emit;
pub mod lower;
pub mod runtime;

use std::collections::HashSet;

use crate::config::TranslateOptions;
use crate::diagnostics::CompileError;
use crate::parser::ast::*;
use crate::resolve::{CallTarget, Resolution};
use crate::span::Spanned;
use emit::EmissionBuffer;
use lower::{LowerContext, MemberNames};

pub fn codegen(
    class: &Spanned<ClassDecl>,
    res: &Resolution,
    opts: &TranslateOptions,
    unit_name: &str,
) -> Result<String, CompileError> {
    let class = &class.node;
    check_members(class, res)?;

    let main = class.main_method();
    let helpers: Vec<&MethodDecl> =
        class.methods.iter().map(|m| &m.node).filter(|m| !m.is_main()).collect();

    let member_order: Vec<&str> = class
        .fields
        .iter()
        .map(|f| f.node.name.node.as_str())
        .chain(helpers.iter().map(|m| m.name.node.as_str()))
        .collect();
    let members = MemberNames::new(member_order.iter().copied());
    let forward: Vec<String> = member_order.iter().map(|name| members.get(name)).collect();

    let mut cx = LowerContext::new(res, opts.indent_width, members);

    if !forward.is_empty() {
        cx.buf.line(format!("local {}", forward.join(", ")));
    }

    for method in &helpers {
        if !cx.buf.is_empty() {
            cx.buf.blank_line();
        }
        cx.lower_method(method)?;
    }

    if !cx.buf.is_empty() && (!class.fields.is_empty() || main.is_some() || opts.module_exports) {
        cx.buf.blank_line();
    }
    for field in &class.fields {
        cx.lower_field_init(&field.node)?;
    }

    match main {
        Some(main) => cx.lower_main(&main.node)?,
        None if opts.module_exports => emit_exports(&mut cx.buf, &cx.members, &helpers),
        None => {}
    }

    let mut out = EmissionBuffer::new(opts.indent_width);
    if opts.header {
        out.line(format!("-- Generated by j2lua from {unit_name}"));
        out.blank_line();
    }
    if !cx.runtime.is_empty() {
        cx.runtime.emit_prelude(&mut out);
        out.blank_line();
    }
    out.append(cx.buf);
    let text = out.finish();
    tracing::debug!(unit = unit_name, bytes = text.len(), "generated lua");
    Ok(text)
}

/// Class-level shapes the translation cannot express.
fn check_members(class: &ClassDecl, res: &Resolution) -> Result<(), CompileError> {
    for field in &class.fields {
        if !field.node.is_static() {
            return Err(CompileError::unsupported("instance field", field.span));
        }
    }
    let mut seen = HashSet::new();
    for method in &class.methods {
        let m = &method.node;
        if !m.is_static() {
            return Err(CompileError::unsupported("instance method", m.name.span));
        }
        if !seen.insert(m.name.node.as_str()) {
            return Err(CompileError::unsupported(format!("overloaded method '{}'", m.name.node), m.name.span));
        }
        if class.fields.iter().any(|f| f.node.name.node == m.name.node) {
            return Err(CompileError::unsupported(
                format!("field and method both named '{}'", m.name.node),
                m.name.span,
            ));
        }
    }
    if class.main_method().is_some() {
        // main runs as the chunk body and cannot be called
        let recursive = res
            .calls
            .iter()
            .filter(|(_, target)| matches!(target, CallTarget::Static(name) if name == "main"))
            .map(|(span, _)| *span)
            .min_by_key(|span| span.start);
        if let Some(span) = recursive {
            return Err(CompileError::unsupported("call to main", span));
        }
    }
    Ok(())
}

fn emit_exports(buf: &mut EmissionBuffer, members: &MemberNames, methods: &[&MethodDecl]) {
    let entries: Vec<String> = methods
        .iter()
        .filter(|m| m.is_pub())
        .map(|m| {
            let name = &m.name.node;
            let lua = members.get(name);
            if lua == *name { format!("{name} = {lua}") } else { format!("[\"{name}\"] = {lua}") }
        })
        .collect();
    if entries.is_empty() {
        buf.line("return {}");
    } else {
        buf.line(format!("return {{ {} }}", entries.join(", ")));
    }
}
