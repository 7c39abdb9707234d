use codepad_resolve::ResolveError;
use codepad_syntax::LiteralError;
use codepad_types::{OverloadError, TypeError};

/// Well-formed input whose meaning cannot be determined.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SemanticError {
    #[error("cannot find symbol `{0}`")]
    UnresolvedName(String),
    #[error("no applicable method {name}({args})")]
    NoSuchMethod { name: String, args: String },
    #[error("ambiguous call to {name}: {}", .candidates.join(", "))]
    AmbiguousMethod {
        name: String,
        candidates: Vec<String>,
    },
    #[error("generic method {0} is not supported")]
    GenericMethod(String),
    #[error("bad operand type(s) for `{op}`: {operands}")]
    OperatorMismatch { op: &'static str, operands: String },
    #[error("incompatible types in conditional expression: {0} and {1}")]
    IncompatibleConditional(String, String),
    #[error("conditional expression branch has type void")]
    VoidConditionalBranch,
    #[error("condition has type {0}, boolean required")]
    NonBooleanCondition(String),
    #[error("array required, but {0} found")]
    NotAnArray(String),
    #[error("{ty} cannot be dereferenced")]
    PrimitiveReceiver { ty: String },
    #[error("malformed literal: {0}")]
    LiteralFormat(LiteralError),
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error(transparent)]
    Type(#[from] TypeError),
}

impl SemanticError {
    /// A literal the lexer accepted but the decoder rejected. The two disagreeing is
    /// an internal inconsistency, so it is reported under its own log target.
    pub(crate) fn literal(text: &str, err: LiteralError) -> Self {
        tracing::warn!(
            target: "codepad.literal",
            literal = text,
            span = ?err.span,
            error = %err,
            "literal rejected by decoder"
        );
        SemanticError::LiteralFormat(err)
    }

    pub(crate) fn operator(op: &'static str, operands: &[&codepad_types::Type]) -> Self {
        SemanticError::OperatorMismatch {
            op,
            operands: operands
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

impl From<OverloadError> for SemanticError {
    fn from(value: OverloadError) -> Self {
        match value {
            OverloadError::NoApplicable { name, args } => SemanticError::NoSuchMethod { name, args },
            OverloadError::Ambiguous { name, candidates } => {
                SemanticError::AmbiguousMethod { name, candidates }
            }
            OverloadError::GenericMethod(signature) => SemanticError::GenericMethod(signature),
        }
    }
}
