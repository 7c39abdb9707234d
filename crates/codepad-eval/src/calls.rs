//! Method invocation and instance creation.

use codepad_resolve::{JavaEntity, ResolveError};
use codepad_syntax::ast::{Expr, TypeArgRef, TypeRef};
use codepad_types::{
    collect_constructors, collect_methods, select_method, ClassType, MethodCandidate, Type,
};

use crate::evaluator::Evaluator;
use crate::{ExprValue, SemanticError};

impl Evaluator<'_> {
    pub(crate) fn method_call(
        &self,
        receiver: Option<&Expr>,
        type_args: &[TypeArgRef],
        name: &str,
        args: &[Expr],
    ) -> Result<Option<ExprValue>, SemanticError> {
        if !type_args.is_empty() {
            return Err(SemanticError::GenericMethod(name.to_owned()));
        }
        let Some(arg_types) = self.argument_types(args)? else {
            return Ok(None);
        };

        let candidates = match receiver {
            None => self.static_import_candidates(name),
            Some(receiver) => {
                let Some(entity) = self.entity(receiver)? else {
                    return Ok(None);
                };
                match entity {
                    JavaEntity::Package(package) => {
                        return Err(SemanticError::UnresolvedName(package))
                    }
                    // Through a type, only static methods are callable.
                    JavaEntity::Type(owner) => collect_methods(self.loader(), &owner, name)
                        .into_iter()
                        .filter(|candidate| candidate.method.is_static)
                        .collect(),
                    JavaEntity::Value(Type::Array(component)) if name == "clone" && args.is_empty() => {
                        return Ok(Some(ExprValue::new(Type::Array(component))));
                    }
                    JavaEntity::Value(ty) => {
                        let owner = receiver_class(&ty)?;
                        collect_methods(self.loader(), &owner, name)
                    }
                }
            }
        };

        if candidates.is_empty() {
            return Err(SemanticError::NoSuchMethod {
                name: name.to_owned(),
                args: join_types(&arg_types),
            });
        }
        let chosen = select_method(self.loader(), name, candidates, &arg_types)?;
        tracing::trace!(method = %chosen, ret = %chosen.return_type, "method selected");
        Ok(Some(ExprValue::new(chosen.return_type)))
    }

    /// Static methods reachable without a receiver: the first statically imported class
    /// (single imports before on-demand ones) that declares one wins.
    fn static_import_candidates(&self, name: &str) -> Vec<MethodCandidate> {
        self.resolver()
            .static_method_owners(name)
            .iter()
            .map(|owner| {
                collect_methods(self.loader(), owner, name)
                    .into_iter()
                    .filter(|candidate| candidate.method.is_static)
                    .collect::<Vec<_>>()
            })
            .find(|candidates| !candidates.is_empty())
            .unwrap_or_default()
    }

    /// `new T(args)`. The type is `T` as written; without an anonymous body a declared
    /// constructor must accept the arguments.
    pub(crate) fn instance_creation(
        &self,
        ty: &TypeRef,
        args: &[Expr],
        has_body: bool,
    ) -> Result<Option<ExprValue>, SemanticError> {
        let target = self.resolve_type(ty)?;
        let Type::Class(class) = &target else {
            return Err(ResolveError::NotAType(target.to_string()).into());
        };

        let arg_types = self.argument_types(args)?;
        if has_body {
            return Ok(Some(ExprValue::new(target)));
        }
        if let Some(arg_types) = arg_types {
            let constructors = collect_constructors(self.loader(), class);
            if !constructors.is_empty() {
                select_method(self.loader(), class.simple_name(), constructors, &arg_types)?;
            }
        }
        Ok(Some(ExprValue::new(target)))
    }

    /// Types of all arguments, or `None` if any of them is unknown.
    fn argument_types(&self, args: &[Expr]) -> Result<Option<Vec<Type>>, SemanticError> {
        let mut types = Vec::with_capacity(args.len());
        for arg in args {
            match self.evaluate(arg)? {
                Some(value) => types.push(value.ty),
                None => return Ok(None),
            }
        }
        Ok(Some(types))
    }
}

/// The class whose methods a value of type `ty` exposes.
fn receiver_class(ty: &Type) -> Result<ClassType, SemanticError> {
    match ty {
        Type::Class(class) => Ok(class.clone()),
        Type::Wildcard(w) => Ok(w
            .upper
            .first()
            .and_then(Type::as_class)
            .cloned()
            .unwrap_or_else(|| ClassType::raw(codepad_types::OBJECT))),
        Type::Array(_) | Type::TypeVar(_) => Ok(ClassType::raw(codepad_types::OBJECT)),
        Type::Primitive(_) | Type::Void | Type::Null => {
            Err(SemanticError::PrimitiveReceiver { ty: ty.to_string() })
        }
    }
}

fn join_types(types: &[Type]) -> String {
    types
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}
