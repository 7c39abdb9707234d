use std::fmt;

use codepad_types::{find_field, member_type, ClassLoader, ClassType, Type};

use crate::ResolveError;

/// What a (possibly dotted) name denotes.
///
/// Only [`JavaEntity::Type`] and [`JavaEntity::Value`] carry a type; asking a package for
/// one is an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JavaEntity {
    /// A dotted package name. Packages are never verified to exist; a name that is
    /// nothing else is assumed to be one.
    Package(String),
    Type(ClassType),
    Value(Type),
}

impl JavaEntity {
    pub fn package(name: impl Into<String>) -> Self {
        JavaEntity::Package(name.into())
    }

    /// Source-form name: packages and classes by their dotted name, values by type.
    pub fn name(&self) -> String {
        match self {
            JavaEntity::Package(name) => name.clone(),
            JavaEntity::Type(ty) => source_name(&ty.name),
            JavaEntity::Value(ty) => ty.to_string(),
        }
    }

    /// The type of a value, or the class type named by a type entity.
    pub fn ty(&self) -> Option<Type> {
        match self {
            JavaEntity::Package(_) => None,
            JavaEntity::Type(ty) => Some(Type::Class(ty.clone())),
            JavaEntity::Value(ty) => Some(ty.clone()),
        }
    }

    pub fn as_class_type(&self) -> Option<&ClassType> {
        match self {
            JavaEntity::Type(ty) => Some(ty),
            _ => None,
        }
    }

    pub fn is_value(&self) -> bool {
        matches!(self, JavaEntity::Value(_))
    }

    pub fn into_type(self) -> Result<ClassType, ResolveError> {
        match self {
            JavaEntity::Type(ty) => Ok(ty),
            other => Err(ResolveError::NotAType(other.name())),
        }
    }

    /// Resolves `name` as a member of this entity.
    ///
    /// - A package yields a class `pkg.name` if one loads, else the nested package.
    /// - A type yields a static field of that name first, then a member type.
    /// - A value yields an instance field, seen through the value's type arguments.
    pub fn sub_entity(
        &self,
        loader: &dyn ClassLoader,
        name: &str,
    ) -> Result<JavaEntity, ResolveError> {
        match self {
            JavaEntity::Package(_) => Ok(self.package_member(loader, name)),
            JavaEntity::Type(owner) => {
                if let Some((declaring, field)) = find_field(loader, owner, name) {
                    if field.is_static {
                        return Ok(JavaEntity::Value(member_type(
                            loader, &declaring, &field.ty,
                        )));
                    }
                }
                self.member_type_entity(loader, name)
            }
            JavaEntity::Value(ty) => value_field(loader, ty, name),
        }
    }

    /// Like [`JavaEntity::sub_entity`] but only packages and types qualify, as in a
    /// type context or an import declaration.
    pub fn package_or_class_member(
        &self,
        loader: &dyn ClassLoader,
        name: &str,
    ) -> Result<JavaEntity, ResolveError> {
        match self {
            JavaEntity::Package(_) => Ok(self.package_member(loader, name)),
            JavaEntity::Type(_) => self.member_type_entity(loader, name),
            JavaEntity::Value(_) => Err(ResolveError::NotAType(self.name())),
        }
    }

    fn package_member(&self, loader: &dyn ClassLoader, name: &str) -> JavaEntity {
        let qualified = format!("{}.{name}", self.name());
        if loader.class(&qualified).is_some() {
            JavaEntity::Type(ClassType::raw(qualified))
        } else {
            JavaEntity::Package(qualified)
        }
    }

    fn member_type_entity(
        &self,
        loader: &dyn ClassLoader,
        name: &str,
    ) -> Result<JavaEntity, ResolveError> {
        let JavaEntity::Type(owner) = self else {
            return Err(ResolveError::NotAType(self.name()));
        };
        let binary = format!("{}${name}", owner.name);
        let Some(def) = loader.class(&binary) else {
            return Err(ResolveError::UnresolvedName(format!("{}.{name}", self.name())));
        };
        let mut nested = ClassType::raw(binary);
        if !def.is_static && !owner.args.is_empty() {
            nested = nested.with_outer(owner.clone());
        }
        Ok(JavaEntity::Type(nested))
    }
}

impl fmt::Display for JavaEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

fn value_field(loader: &dyn ClassLoader, ty: &Type, name: &str) -> Result<JavaEntity, ResolveError> {
    match ty {
        Type::Array(_) if name == "length" => Ok(JavaEntity::Value(Type::int())),
        Type::Class(owner) => match find_field(loader, owner, name) {
            Some((declaring, field)) => Ok(JavaEntity::Value(member_type(
                loader, &declaring, &field.ty,
            ))),
            None => Err(ResolveError::UnresolvedName(format!("{ty}.{name}"))),
        },
        other => Err(ResolveError::UnresolvedName(format!("{other}.{name}"))),
    }
}

pub(crate) fn source_name(binary: &str) -> String {
    binary.replace('$', ".")
}

/// Resolves the dotted path of an import declaration to a class or a package.
///
/// The first segment is a top-level class only when such a class loads; otherwise it
/// starts a package name.
pub fn resolve_import_path(
    loader: &dyn ClassLoader,
    path: &str,
) -> Result<JavaEntity, ResolveError> {
    let mut segments = path.split('.');
    let first = segments.next().unwrap_or_default();
    let mut entity = if loader.class(first).is_some() {
        JavaEntity::Type(ClassType::raw(first))
    } else {
        JavaEntity::package(first)
    };
    for segment in segments {
        entity = entity.package_or_class_member(loader, segment)?;
    }
    Ok(entity)
}
