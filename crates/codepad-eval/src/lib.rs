//! Static analysis of code pad commands.
//!
//! [`SnippetAnalyzer`] decides whether a line typed into the code pad is an import, a
//! sequence of statements or an expression, and for expressions computes the static
//! type that the value display needs. [`Evaluator`] does the expression typing on its
//! own, given a [`Resolver`](codepad_resolve::Resolver).
//!
//! ```
//! use codepad_eval::{Classification, ExpressionType, SnippetAnalyzer};
//! use codepad_resolve::InMemoryBench;
//! use codepad_types::{Type, TypeStore};
//!
//! let jdk = TypeStore::with_minimal_jdk();
//! let mut analyzer = SnippetAnalyzer::new(&jdk);
//! let bench = InMemoryBench::new();
//!
//! assert_eq!(
//!     analyzer.classify("\"a\" + 4", &bench),
//!     Classification::Expression(ExpressionType::Known(Type::string()))
//! );
//! ```

mod analyzer;
mod calls;
mod conditional;
mod error;
mod evaluator;
mod fold;
mod value;

pub use analyzer::{Classification, ExpressionType, SnippetAnalyzer};
pub use conditional::{conditional_legacy, conditional_modern};
pub use error::SemanticError;
pub use evaluator::Evaluator;
pub use value::{ConstantValue, ExprValue};
