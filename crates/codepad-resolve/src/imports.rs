use std::fmt;

use indexmap::IndexMap;

use codepad_syntax::ast::ImportDecl;
use codepad_types::{find_field, ClassLoader, ClassType, Type};

use crate::entity::source_name;
use crate::{resolve_import_path, JavaEntity, ResolveError};

/// The imports in effect for the code pad.
///
/// Four containers, each queried in a fixed order:
/// 1. single-type imports, keyed by simple name (last write wins);
/// 2. static single imports, keyed by member name, each naming one or more classes;
/// 3. type-import-on-demand (`pkg.*` or `Class.*`), in insertion order;
/// 4. static imports on demand, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportsCollection {
    normal: IndexMap<String, ClassType>,
    wildcard: Vec<JavaEntity>,
    static_imports: IndexMap<String, Vec<ClassType>>,
    static_wildcard: Vec<ClassType>,
}

impl ImportsCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.normal.is_empty()
            && self.wildcard.is_empty()
            && self.static_imports.is_empty()
            && self.static_wildcard.is_empty()
    }

    pub fn clear(&mut self) {
        self.normal.clear();
        self.wildcard.clear();
        self.static_imports.clear();
        self.static_wildcard.clear();
    }

    pub fn add_normal_import(&mut self, name: impl Into<String>, ty: ClassType) {
        self.normal.insert(name.into(), ty);
    }

    /// `entity` is the package or class before the trailing `.*`.
    pub fn add_wildcard_import(&mut self, entity: JavaEntity) {
        self.wildcard.push(entity);
    }

    pub fn add_static_import(&mut self, name: impl Into<String>, class: ClassType) {
        self.static_imports.entry(name.into()).or_default().push(class);
    }

    pub fn add_static_wildcard_import(&mut self, class: ClassType) {
        self.static_wildcard.push(class);
    }

    /// Resolves the imported class or package of `decl` and records it.
    pub fn add_import_decl(
        &mut self,
        loader: &dyn ClassLoader,
        decl: &ImportDecl,
    ) -> Result<(), ResolveError> {
        match (decl.is_static, decl.is_star) {
            (false, false) => {
                let ty = resolve_import_path(loader, &decl.path)?.into_type()?;
                let simple = decl.path.rsplit('.').next().unwrap_or(&decl.path);
                self.add_normal_import(simple, ty);
            }
            (false, true) => {
                let entity = resolve_import_path(loader, &decl.path)?;
                self.add_wildcard_import(entity);
            }
            (true, false) => {
                let Some((class_path, member)) = decl.path.rsplit_once('.') else {
                    return Err(ResolveError::NotAType(decl.path.clone()));
                };
                let class = resolve_import_path(loader, class_path)?.into_type()?;
                self.add_static_import(member, class);
            }
            (true, true) => {
                let class = resolve_import_path(loader, &decl.path)?.into_type()?;
                self.add_static_wildcard_import(class);
            }
        }
        tracing::debug!(path = %decl.path, is_static = decl.is_static, is_star = decl.is_star, "import added");
        Ok(())
    }

    /// A type imported by name: a single-type import, or a member type of a class
    /// named by a static single import.
    pub fn resolve_normal_import(&self, loader: &dyn ClassLoader, name: &str) -> Option<ClassType> {
        if let Some(ty) = self.normal.get(name) {
            return Some(ty.clone());
        }
        self.static_imports_for(name)
            .iter()
            .find_map(|class| nested_class(loader, class, name))
    }

    /// A type reachable through an on-demand import: first the non-static ones, then
    /// member types of statically imported classes.
    pub fn resolve_wildcard_import(&self, loader: &dyn ClassLoader, name: &str) -> Option<ClassType> {
        let from_wildcards = self.wildcard.iter().find_map(|entity| {
            match entity.package_or_class_member(loader, name) {
                Ok(JavaEntity::Type(ty)) => Some(ty),
                _ => None,
            }
        });
        if from_wildcards.is_some() {
            return from_wildcards;
        }
        self.static_wildcard
            .iter()
            .find_map(|class| nested_class(loader, class, name))
    }

    /// Classes named by `import static C.name;`, in import order.
    pub fn static_imports_for(&self, name: &str) -> &[ClassType] {
        self.static_imports
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn static_wildcard_imports(&self) -> &[ClassType] {
        &self.static_wildcard
    }

    /// Type of a static field `name` reachable through static imports.
    ///
    /// The first class that actually declares the field wins; single imports are
    /// consulted before on-demand ones.
    pub fn resolve_static_field(&self, loader: &dyn ClassLoader, name: &str) -> Option<Type> {
        self.static_imports_for(name)
            .iter()
            .chain(self.static_wildcard.iter())
            .find_map(|class| {
                let (_, field) = find_field(loader, class, name)?;
                field.is_static.then(|| field.ty.clone())
            })
    }

    /// Equivalent `import` statements: single imports, on-demand imports, static
    /// imports grouped by member name, then static imports on demand.
    pub fn to_import_statements(&self) -> Vec<String> {
        let mut out = Vec::new();
        for ty in self.normal.values() {
            out.push(format!("import {};", source_name(&ty.name)));
        }
        for entity in &self.wildcard {
            out.push(format!("import {}.*;", entity.name()));
        }
        for (member, classes) in &self.static_imports {
            for class in classes {
                out.push(format!("import static {}.{member};", source_name(&class.name)));
            }
        }
        for class in &self.static_wildcard {
            out.push(format!("import static {}.*;", source_name(&class.name)));
        }
        out
    }
}

impl fmt::Display for ImportsCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.to_import_statements() {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

fn nested_class(loader: &dyn ClassLoader, class: &ClassType, name: &str) -> Option<ClassType> {
    let binary = format!("{}${name}", class.name);
    loader.class(&binary).map(|_| ClassType::raw(binary))
}
