use codepad_types::TypeError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("cannot resolve `{0}`")]
    UnresolvedName(String),
    #[error("`{0}` does not name a type")]
    NotAType(String),
    #[error("`{0}` does not name a value")]
    NotAValue(String),
    #[error("`{name}` takes {expected} type argument(s), {found} given")]
    InvalidTypeArguments {
        name: String,
        expected: usize,
        found: usize,
    },
    #[error(transparent)]
    Type(#[from] TypeError),
}
