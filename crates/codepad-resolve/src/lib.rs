//! Name resolution for code pad input.
//!
//! A name in expression position may denote a package, a type or a value; which one
//! depends on the object bench, the imports in effect, the package scope and the
//! classes the [`ClassLoader`](codepad_types::ClassLoader) can see.

mod bench;
mod entity;
mod error;
mod imports;
mod resolver;
mod type_ref;

pub use bench::{DeclaredVar, InMemoryBench, ObjectBench};
pub use entity::{resolve_import_path, JavaEntity};
pub use error::ResolveError;
pub use imports::ImportsCollection;
pub use resolver::Resolver;
