//! Lexing, literal decoding and parsing of code pad input.
//!
//! Three entry points mirror the ways a code pad line can be read: as an import
//! declaration, as a sequence of block statements, or as a single expression. Each
//! requires the whole input to be consumed (trailing `;` separators excepted).

use serde::Serialize;

use codepad_types::Span;

pub mod ast;
mod language_level;
pub mod lexer;
pub mod literals;
mod parser;

pub use language_level::{InvalidLanguageLevel, JavaFeature, JavaLanguageLevel};
pub use lexer::{lex, Token, TokenKind};
pub use literals::LiteralError;
pub use parser::is_reserved;

use parser::Parser;

/// The input does not conform to the grammar of the attempted entry point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{message} at {range:?}")]
pub struct ParseError {
    pub message: String,
    pub range: Span,
}

fn parser_for(text: &str) -> Result<Parser, ParseError> {
    let tokens = lex(text);
    if let Some(bad) = tokens.iter().find(|t| t.kind == TokenKind::Unknown) {
        return Err(ParseError {
            message: format!("unrecognised token `{}`", bad.text),
            range: bad.range,
        });
    }
    Ok(Parser::new(tokens, text.len()))
}

/// Parses `text` as the body of a block: one or more block statements.
pub fn parse_compound_statement(text: &str) -> Result<Vec<ast::Stmt>, ParseError> {
    let mut parser = parser_for(text)?;
    if parser.is_eof() {
        return Err(ParseError {
            message: "expected a statement, found end of input".to_string(),
            range: Span::new(text.len(), text.len()),
        });
    }
    let statements = parser.parse_statements_to_eof()?;
    parser.finish()?;
    tracing::trace!(count = statements.len(), "parsed block statements");
    Ok(statements)
}

/// Parses `text` as one expression, optionally followed by `;` separators.
pub fn parse_expression(text: &str) -> Result<ast::Expr, ParseError> {
    let mut parser = parser_for(text)?;
    let expr = parser.parse_expr()?;
    parser.finish()?;
    Ok(expr)
}

/// Parses a single `import` declaration.
pub fn parse_import(text: &str) -> Result<ast::ImportDecl, ParseError> {
    let mut parser = parser_for(text)?;
    let decl = parser.parse_import_decl()?;
    parser.finish()?;
    Ok(decl)
}

/// Parses a type as it would appear in a declaration, e.g. `java.util.List<String>[]`.
pub fn parse_type(text: &str) -> Result<ast::TypeRef, ParseError> {
    let mut parser = parser_for(text)?;
    let ty = parser.parse_type()?;
    parser.finish()?;
    Ok(ty)
}
