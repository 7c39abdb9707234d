use indexmap::IndexMap;
use serde::Serialize;

use codepad_types::Type;

/// Named live objects available to code pad expressions.
///
/// Only the declared (generic) type of each object matters for typing; the live value
/// itself belongs to whatever executes the command.
pub trait ObjectBench {
    fn object_type(&self, name: &str) -> Option<&Type>;
}

/// A variable declared at the top level of a code pad statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeclaredVar {
    pub name: String,
    pub ty: Type,
    pub initialized: bool,
    pub is_final: bool,
}

impl DeclaredVar {
    pub fn new(name: impl Into<String>, ty: Type, initialized: bool, is_final: bool) -> Self {
        Self {
            name: name.into(),
            ty,
            initialized,
            is_final,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryBench {
    objects: IndexMap<String, Type>,
}

impl InMemoryBench {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: impl Into<String>, ty: Type) {
        self.objects.insert(name.into(), ty);
    }

    pub fn with(mut self, name: impl Into<String>, ty: Type) -> Self {
        self.add(name, ty);
        self
    }

    pub fn remove(&mut self, name: &str) -> Option<Type> {
        self.objects.shift_remove(name)
    }

    /// Registers variables declared by an executed statement; later declarations
    /// replace earlier objects of the same name.
    pub fn register(&mut self, vars: &[DeclaredVar]) {
        for var in vars {
            tracing::debug!(name = %var.name, ty = %var.ty, "bench object registered");
            self.add(var.name.clone(), var.ty.clone());
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.objects.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl ObjectBench for InMemoryBench {
    fn object_type(&self, name: &str) -> Option<&Type> {
        self.objects.get(name)
    }
}
