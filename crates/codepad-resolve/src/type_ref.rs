//! AST type references to semantic [`Type`]s.

use codepad_syntax::ast::{TypeArgRef, TypeRef, TypeRefKind, TypeSegment};
use codepad_types::{glb, ClassType, Type};

use crate::{JavaEntity, ResolveError, Resolver};

impl Resolver<'_> {
    /// Resolves a written type, including type arguments and array dimensions.
    ///
    /// `new C<>()` arrives with an empty argument list on the last segment and is
    /// treated as the raw type.
    pub fn resolve_type_ref(&self, ty: &TypeRef) -> Result<Type, ResolveError> {
        let element = match &ty.kind {
            TypeRefKind::Primitive(p) => Type::Primitive(*p),
            TypeRefKind::Void => Type::Void,
            TypeRefKind::Named(segments) => Type::Class(self.resolve_segments(segments)?),
        };
        Ok(Type::array_of_depth(element, ty.dims))
    }

    fn resolve_segments(&self, segments: &[TypeSegment]) -> Result<ClassType, ResolveError> {
        let Some((first, rest)) = segments.split_first() else {
            return Err(ResolveError::UnresolvedName(String::new()));
        };

        let mut entity = self.resolve_package_or_class(&first.name);
        entity = self.apply_args(entity, first)?;
        for segment in rest {
            entity = entity.package_or_class_member(self.loader(), &segment.name)?;
            entity = self.apply_args(entity, segment)?;
        }

        match entity {
            JavaEntity::Type(ty) => Ok(ty),
            other => Err(ResolveError::UnresolvedName(other.name())),
        }
    }

    fn apply_args(
        &self,
        entity: JavaEntity,
        segment: &TypeSegment,
    ) -> Result<JavaEntity, ResolveError> {
        if segment.args.is_empty() {
            return Ok(entity);
        }
        let JavaEntity::Type(mut ty) = entity else {
            return Err(ResolveError::NotAType(entity.name()));
        };

        let loader = self.loader();
        let def = loader
            .class(&ty.name)
            .ok_or_else(|| ResolveError::UnresolvedName(ty.name.clone()))?;
        if def.type_params.len() != segment.args.len() {
            return Err(ResolveError::InvalidTypeArguments {
                name: ty.name.replace('$', "."),
                expected: def.type_params.len(),
                found: segment.args.len(),
            });
        }

        let mut args = Vec::with_capacity(segment.args.len());
        for (arg, param) in segment.args.iter().zip(&def.type_params) {
            let resolved = self.resolve_type_arg(arg)?;
            // An upper-bounded wildcard must be compatible with the declared bound.
            if let (TypeArgRef::Extends(_), Type::Wildcard(w)) = (arg, &resolved) {
                let declared: Vec<Type> = param
                    .upper_bounds
                    .iter()
                    .map(Type::erasure)
                    .filter(|bound| matches!(bound, Type::Class(_)))
                    .collect();
                if !declared.is_empty() {
                    let mut bounds = w.upper.clone();
                    bounds.extend(declared);
                    glb(loader, &bounds)?;
                }
            }
            args.push(resolved);
        }
        ty.args = args;
        Ok(JavaEntity::Type(ty))
    }

    fn resolve_type_arg(&self, arg: &TypeArgRef) -> Result<Type, ResolveError> {
        Ok(match arg {
            TypeArgRef::Type(ty) => self.resolve_reference_type(ty)?,
            TypeArgRef::Wildcard => Type::unbounded(),
            TypeArgRef::Extends(bound) => Type::extends(self.resolve_reference_type(bound)?),
            TypeArgRef::Super(bound) => Type::super_of(self.resolve_reference_type(bound)?),
        })
    }

    /// Type arguments and wildcard bounds must be class, interface or array types.
    fn resolve_reference_type(&self, ty: &TypeRef) -> Result<Type, ResolveError> {
        match self.resolve_type_ref(ty)? {
            invalid @ (Type::Primitive(_) | Type::Void) => {
                Err(ResolveError::NotAType(invalid.to_string()))
            }
            resolved => Ok(resolved),
        }
    }
}
