//! Command classification for the code pad.

use std::fmt;

use codepad_config::AnalysisConfig;
use codepad_resolve::{DeclaredVar, ImportsCollection, ObjectBench, Resolver};
use codepad_syntax::ast::{ImportDecl, Stmt};
use codepad_syntax::JavaLanguageLevel;
use codepad_types::{ClassLoader, LubContext, Type};
use serde::Serialize;

use crate::{Evaluator, SemanticError};

/// How a command line is to be executed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "type", rename_all = "snake_case")]
pub enum Classification {
    /// Statements, or an expression of type `void`.
    Statement,
    /// A complete import declaration, held until [`SnippetAnalyzer::confirm_command`].
    Import,
    Expression(ExpressionType),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpressionType {
    Known(Type),
    /// An expression whose type could not be determined, or a line that is neither a
    /// statement nor an expression.
    Indeterminate,
}

impl Classification {
    /// The expression's type in source form, if it has one.
    pub fn type_name(&self) -> Option<String> {
        match self {
            Classification::Expression(ExpressionType::Known(ty)) => Some(ty.to_string()),
            _ => None,
        }
    }

    pub fn is_statement(&self) -> bool {
        matches!(self, Classification::Statement)
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Classification::Statement => f.write_str("statement"),
            Classification::Import => f.write_str("import"),
            Classification::Expression(ExpressionType::Known(ty)) => write!(f, "expression: {ty}"),
            Classification::Expression(ExpressionType::Indeterminate) => {
                f.write_str("expression: <indeterminate>")
            }
        }
    }
}

struct PendingImport {
    text: String,
    decl: ImportDecl,
}

/// Classifies code pad commands and keeps the state that follows from them: the
/// imports in effect, the variables declared by the last statement and any import
/// waiting to be confirmed.
pub struct SnippetAnalyzer<'a> {
    loader: &'a dyn ClassLoader,
    imports: ImportsCollection,
    package_scope: String,
    level: JavaLanguageLevel,
    max_lub_depth: usize,
    declared: Vec<DeclaredVar>,
    amended: String,
    pending_import: Option<PendingImport>,
}

impl<'a> SnippetAnalyzer<'a> {
    pub fn new(loader: &'a dyn ClassLoader) -> Self {
        Self {
            loader,
            imports: ImportsCollection::new(),
            package_scope: String::new(),
            level: JavaLanguageLevel::default(),
            max_lub_depth: LubContext::DEFAULT_MAX_DEPTH,
            declared: Vec::new(),
            amended: String::new(),
            pending_import: None,
        }
    }

    /// An analyser set up from the `[analysis]` section of the configuration.
    pub fn from_config(loader: &'a dyn ClassLoader, config: &AnalysisConfig) -> Self {
        Self::new(loader)
            .with_language_level(config.language_level().unwrap_or_default())
            .with_package_scope(config.package_scope.clone())
            .with_max_lub_depth(config.max_lub_depth)
    }

    pub fn with_language_level(mut self, level: JavaLanguageLevel) -> Self {
        self.level = level;
        self
    }

    pub fn with_package_scope(mut self, package: impl Into<String>) -> Self {
        self.package_scope = package.into();
        self
    }

    pub fn with_max_lub_depth(mut self, depth: usize) -> Self {
        self.max_lub_depth = depth;
        self
    }

    pub fn imports(&self) -> &ImportsCollection {
        &self.imports
    }

    pub fn imports_mut(&mut self) -> &mut ImportsCollection {
        &mut self.imports
    }

    /// An evaluator over the current imports and the given bench.
    pub fn evaluator<'b>(&'b self, bench: &'b dyn ObjectBench) -> Evaluator<'b>
    where
        'a: 'b,
    {
        let resolver = Resolver::new(self.loader, &self.imports, bench)
            .with_package_scope(self.package_scope.clone());
        Evaluator::new(resolver)
            .with_language_level(self.level)
            .with_max_lub_depth(self.max_lub_depth)
    }

    /// Classifies one command.
    ///
    /// Tried in order: an import declaration, a sequence of statements, an expression.
    /// Never fails; anything that cannot be understood is an indeterminate expression.
    pub fn classify(&mut self, command: &str, bench: &dyn ObjectBench) -> Classification {
        self.declared.clear();
        self.amended = command.to_owned();
        self.pending_import = None;

        if let Ok(decl) = codepad_syntax::parse_import(command) {
            self.amended.clear();
            self.pending_import = Some(PendingImport {
                text: command.to_owned(),
                decl,
            });
            tracing::debug!(command, "classified as import");
            return Classification::Import;
        }

        if let Ok(statements) = codepad_syntax::parse_compound_statement(command) {
            let declared = self.declared_vars(&statements, bench);
            self.amended = amend_command(command, &declared);
            self.declared = declared;
            tracing::debug!(command, vars = self.declared.len(), "classified as statement");
            return Classification::Statement;
        }

        let outcome = match codepad_syntax::parse_expression(command) {
            Ok(expr) => match self.evaluator(bench).expression_type(&expr) {
                Ok(Some(ty)) if ty.is_void() => Classification::Statement,
                Ok(Some(ty)) => Classification::Expression(ExpressionType::Known(reportable(ty))),
                Ok(None) => Classification::Expression(ExpressionType::Indeterminate),
                Err(err) => {
                    tracing::debug!(command, error = %err, "expression type unavailable");
                    Classification::Expression(ExpressionType::Indeterminate)
                }
            },
            Err(err) => {
                tracing::debug!(command, error = %err, "neither statement nor expression");
                Classification::Expression(ExpressionType::Indeterminate)
            }
        };
        tracing::debug!(command, %outcome, "classified");
        outcome
    }

    /// Variables declared at the top level of the last statement command.
    pub fn declared_variables(&self) -> &[DeclaredVar] {
        &self.declared
    }

    /// The last command with default values assigned to variables it declared without
    /// an initializer. Empty after an import.
    pub fn amended_command(&self) -> &str {
        &self.amended
    }

    /// Records that the last command executed; a pending import takes effect.
    pub fn confirm_command(&mut self) -> Result<(), SemanticError> {
        if let Some(pending) = self.pending_import.take() {
            self.imports.add_import_decl(self.loader, &pending.decl)?;
        }
        Ok(())
    }

    /// Import statements for a compilation unit wrapping the next command: every
    /// confirmed import followed by the pending one, if any.
    pub fn import_statements(&self) -> String {
        let mut out = self.imports.to_string();
        if let Some(pending) = &self.pending_import {
            out.push_str(&pending.text);
        }
        out
    }

    /// Drops every import, as when the class loader is replaced.
    pub fn reset_imports(&mut self) {
        self.imports.clear();
        self.pending_import = None;
    }

    fn declared_vars(&self, statements: &[Stmt], bench: &dyn ObjectBench) -> Vec<DeclaredVar> {
        let evaluator = self.evaluator(bench);
        let mut vars = Vec::new();
        for stmt in statements {
            let Stmt::LocalVar(decl) = stmt else {
                continue;
            };
            let base = match evaluator.resolve_type(&decl.ty) {
                Ok(ty) => ty,
                Err(err) => {
                    tracing::debug!(error = %err, "declared variable type unresolved");
                    continue;
                }
            };
            for declarator in &decl.declarators {
                vars.push(DeclaredVar::new(
                    declarator.name.clone(),
                    Type::array_of_depth(base.clone(), declarator.dims),
                    declarator.init.is_some(),
                    decl.is_final,
                ));
            }
        }
        vars
    }
}

/// Appends `name = <default>;` for every variable that is neither initialized nor
/// final, so that executing the command leaves it definitely assigned.
fn amend_command(command: &str, vars: &[DeclaredVar]) -> String {
    let mut amended = command.to_owned();
    for var in vars.iter().filter(|v| !v.initialized && !v.is_final) {
        let default = match &var.ty {
            Type::Primitive(p) if p.is_numeric() => "0",
            Type::Primitive(_) => "false",
            _ => "null",
        };
        amended.push_str(&format!("\n{} = {default};\n", var.name));
    }
    amended
}

/// A type that can be written in source: a wildcard (from a least upper bound) is
/// reported as its first bound.
fn reportable(ty: Type) -> Type {
    match ty {
        Type::Wildcard(w) if !w.is_super() => w.upper.into_iter().next().unwrap_or_else(Type::object),
        Type::Wildcard(_) | Type::TypeVar(_) => Type::object(),
        other => other,
    }
}
