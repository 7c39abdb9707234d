use codepad_types::{ClassLoader, ClassType, Type};

use crate::{ImportsCollection, JavaEntity, ObjectBench, ResolveError};

/// Resolves names in the context of a loader, the imports in effect, the object bench
/// and a package scope.
pub struct Resolver<'a> {
    loader: &'a dyn ClassLoader,
    imports: &'a ImportsCollection,
    bench: &'a dyn ObjectBench,
    /// Package whose classes are visible by simple name; empty for the default package.
    package_scope: String,
}

impl<'a> Resolver<'a> {
    pub fn new(
        loader: &'a dyn ClassLoader,
        imports: &'a ImportsCollection,
        bench: &'a dyn ObjectBench,
    ) -> Self {
        Self {
            loader,
            imports,
            bench,
            package_scope: String::new(),
        }
    }

    pub fn with_package_scope(mut self, package: impl Into<String>) -> Self {
        self.package_scope = package.into();
        self
    }

    pub fn loader(&self) -> &'a dyn ClassLoader {
        self.loader
    }

    pub fn imports(&self) -> &'a ImportsCollection {
        self.imports
    }

    /// A bare identifier in expression position.
    ///
    /// Values win: bench objects, then statically imported fields. Otherwise the name is
    /// looked up as a class, and failing that is taken to start a package name.
    pub fn resolve_bare_name(&self, name: &str) -> JavaEntity {
        if let Some(ty) = self.bench.object_type(name) {
            tracing::trace!(name, "resolved from bench");
            return JavaEntity::Value(ty.clone());
        }
        if let Some(ty) = self.imports.resolve_static_field(self.loader, name) {
            tracing::trace!(name, "resolved through static import");
            return JavaEntity::Value(ty);
        }
        self.resolve_package_or_class(name)
    }

    /// A bare identifier in type position (never a value).
    ///
    /// Order: single-type import, the package scope, `java.lang`, on-demand imports.
    pub fn resolve_package_or_class(&self, name: &str) -> JavaEntity {
        if let Some(ty) = self.imports.resolve_normal_import(self.loader, name) {
            return JavaEntity::Type(ty);
        }

        let scoped = if self.package_scope.is_empty() {
            name.to_string()
        } else {
            format!("{}.{name}", self.package_scope)
        };
        if self.loader.class(&scoped).is_some() {
            return JavaEntity::Type(ClassType::raw(scoped));
        }

        let lang = format!("java.lang.{name}");
        if self.loader.class(&lang).is_some() {
            return JavaEntity::Type(ClassType::raw(lang));
        }

        if let Some(ty) = self.imports.resolve_wildcard_import(self.loader, name) {
            return JavaEntity::Type(ty);
        }

        JavaEntity::package(name)
    }

    /// A dotted name in expression position, e.g. `System.out` or `java.awt.Color.RED`.
    pub fn resolve_dotted(&self, dotted: &str) -> Result<JavaEntity, ResolveError> {
        let mut segments = dotted.split('.');
        let first = segments.next().unwrap_or_default();
        let mut entity = self.resolve_bare_name(first);
        for segment in segments {
            entity = entity.sub_entity(self.loader, segment)?;
        }
        Ok(entity)
    }

    /// A dotted name in type position.
    pub fn resolve_type_name(&self, dotted: &str) -> Result<ClassType, ResolveError> {
        let mut segments = dotted.split('.');
        let first = segments.next().unwrap_or_default();
        let mut entity = self.resolve_package_or_class(first);
        for segment in segments {
            entity = entity.package_or_class_member(self.loader, segment)?;
        }
        match entity {
            JavaEntity::Type(ty) => Ok(ty),
            _ => Err(ResolveError::UnresolvedName(dotted.to_string())),
        }
    }

    /// Resolves a value name, failing for packages and types.
    pub fn resolve_value(&self, dotted: &str) -> Result<Type, ResolveError> {
        match self.resolve_dotted(dotted)? {
            JavaEntity::Value(ty) => Ok(ty),
            JavaEntity::Type(_) => Err(ResolveError::NotAValue(dotted.to_string())),
            JavaEntity::Package(_) => Err(ResolveError::UnresolvedName(dotted.to_string())),
        }
    }

    /// Classes that may declare a static method `name` called without a receiver:
    /// single static imports of that name first, then static imports on demand.
    pub fn static_method_owners(&self, name: &str) -> Vec<ClassType> {
        self.imports
            .static_imports_for(name)
            .iter()
            .chain(self.imports.static_wildcard_imports())
            .cloned()
            .collect()
    }
}
