use std::collections::{HashMap, HashSet, VecDeque};

use crate::java::overload::MethodCandidate;
use crate::{ClassDef, ClassLoader, ClassType, FieldDef, Type, TypeParamDef, WildcardType};

/// Type variable name to its binding.
pub type Subst = HashMap<String, Type>;

/// Replace every type variable bound in `subst`. Unbound variables are kept as-is.
pub fn substitute(ty: &Type, subst: &Subst) -> Type {
    match ty {
        Type::TypeVar(name) => subst.get(name).cloned().unwrap_or_else(|| ty.clone()),
        Type::Class(class) => Type::Class(substitute_class(class, subst)),
        Type::Array(component) => Type::array(substitute(component, subst)),
        Type::Wildcard(w) => Type::Wildcard(WildcardType {
            upper: w.upper.iter().map(|b| substitute(b, subst)).collect(),
            lower: w.lower.iter().map(|b| substitute(b, subst)).collect(),
        }),
        Type::Void | Type::Null | Type::Primitive(_) => ty.clone(),
    }
}

fn substitute_class(class: &ClassType, subst: &Subst) -> ClassType {
    ClassType {
        name: class.name.clone(),
        args: class.args.iter().map(|a| substitute(a, subst)).collect(),
        outer: class
            .outer
            .as_ref()
            .map(|outer| Box::new(substitute_class(outer, subst))),
    }
}

/// Erase `ty`, mapping the given type parameters to the erasure of their first bound.
pub fn erase_with_params(ty: &Type, params: &[TypeParamDef]) -> Type {
    match ty {
        Type::TypeVar(name) => params
            .iter()
            .find(|p| &p.name == name)
            .and_then(|p| p.upper_bounds.first())
            .map(Type::erasure)
            .unwrap_or_else(Type::object),
        Type::Array(component) => Type::array(erase_with_params(component, params)),
        other => other.erasure(),
    }
}

/// Bindings for `ty` viewed as an instance of its class, including those contributed by
/// a parameterized enclosing type. `None` when `ty` is a raw use.
pub fn class_subst(loader: &dyn ClassLoader, def: &ClassDef, ty: &ClassType) -> Option<Subst> {
    if def.is_raw_use(ty) {
        return None;
    }
    let mut subst = Subst::with_capacity(def.type_params.len());
    if let Some(outer) = &ty.outer {
        if let Some(outer_def) = loader.class(&outer.name) {
            if let Some(outer_subst) = class_subst(loader, outer_def, outer) {
                subst.extend(outer_subst);
            }
        }
    }
    for (param, arg) in def.type_params.iter().zip(&ty.args) {
        subst.insert(param.name.clone(), arg.clone());
    }
    Some(subst)
}

/// Direct supertypes of `ty` with its type arguments applied. Raw uses yield raw
/// supertypes; every interface additionally has `Object` as a supertype.
pub fn direct_supertypes(loader: &dyn ClassLoader, ty: &ClassType) -> Vec<ClassType> {
    let Some(def) = loader.class(&ty.name) else {
        return Vec::new();
    };
    let subst = class_subst(loader, def, ty);
    let view = |super_ty: &Type| -> Option<ClassType> {
        match &subst {
            Some(subst) => match substitute(super_ty, subst) {
                Type::Class(class) => Some(class),
                _ => None,
            },
            None => super_ty.as_class().map(ClassType::erasure),
        }
    };

    let mut out: Vec<ClassType> = def.super_class.iter().filter_map(view).collect();
    out.extend(def.interfaces.iter().filter_map(view));
    if def.is_interface() {
        out.push(ClassType::raw(crate::OBJECT));
    }
    out
}

/// Return `ty` viewed as `target` by walking the supertype graph and applying type
/// argument substitution along the way.
///
/// Example: `ArrayList<String>` instantiated as `java.util.List` returns `List<String>`.
pub fn instantiate_as_supertype(
    loader: &dyn ClassLoader,
    ty: &ClassType,
    target: &str,
) -> Option<ClassType> {
    supertype_walk(loader, ty).find(|current| current.name == target)
}

/// Breadth-first walk over `ty` and all of its supertypes, each visited once.
pub fn supertype_walk<'l>(
    loader: &'l dyn ClassLoader,
    ty: &ClassType,
) -> impl Iterator<Item = ClassType> + 'l {
    let mut queue = VecDeque::from([ty.clone()]);
    let mut seen: HashSet<String> = HashSet::new();
    std::iter::from_fn(move || {
        while let Some(current) = queue.pop_front() {
            if !seen.insert(current.name.clone()) {
                continue;
            }
            queue.extend(direct_supertypes(loader, &current));
            return Some(current);
        }
        None
    })
}

/// Type of a member declared in `owner`'s class, as seen through `owner`.
///
/// A raw owner erases the member type. A member whose type becomes a bare wildcard
/// is replaced by the upper bound of its capture: the wildcard's own bound when it
/// has one, otherwise the declared bound of the type parameter.
pub fn member_type(loader: &dyn ClassLoader, owner: &ClassType, ty: &Type) -> Type {
    let Some(def) = loader.class(&owner.name) else {
        return ty.clone();
    };
    let Some(subst) = class_subst(loader, def, owner) else {
        return erase_with_params(ty, &def.type_params);
    };
    match substitute(ty, &subst) {
        Type::Wildcard(w) => capture_upper_bound(&w, declared_bound(def, ty)),
        other => other,
    }
}

fn declared_bound(def: &ClassDef, ty: &Type) -> Option<Type> {
    let Type::TypeVar(name) = ty else {
        return None;
    };
    def.type_param(name)?
        .upper_bounds
        .first()
        .map(|bound| erase_with_params(bound, &def.type_params))
}

fn capture_upper_bound(w: &WildcardType, declared: Option<Type>) -> Type {
    if w.lower.is_empty() {
        if let Some(first) = w.upper.first() {
            return first.clone();
        }
    }
    declared.unwrap_or_else(Type::object)
}

/// Find the field `name` in `ty`'s class or its nearest supertype declaring it.
///
/// Returns the declaring class as an instantiation of `ty`'s arguments.
pub fn find_field<'l>(
    loader: &'l dyn ClassLoader,
    ty: &ClassType,
    name: &str,
) -> Option<(ClassType, &'l FieldDef)> {
    supertype_walk(loader, ty).find_map(|owner| {
        let field = loader.class(&owner.name)?.declared_field(name)?;
        Some((owner, field))
    })
}

/// Public methods named `name` visible on `ty`, overridden declarations removed.
///
/// Walks subtypes before supertypes so the most derived declaration of each erased
/// signature wins.
pub fn collect_methods(
    loader: &dyn ClassLoader,
    ty: &ClassType,
    name: &str,
) -> Vec<MethodCandidate> {
    let mut seen: HashSet<Vec<Type>> = HashSet::new();
    let mut out = Vec::new();
    for owner in supertype_walk(loader, ty) {
        let Some(def) = loader.class(&owner.name) else {
            continue;
        };
        for method in def.methods.iter().filter(|m| m.is_public && m.name == name) {
            let erased: Vec<Type> = method
                .params
                .iter()
                .map(|p| erase_with_params(p, &def.type_params))
                .collect();
            if !seen.insert(erased) {
                continue;
            }
            out.push(MethodCandidate::new(loader, &owner, method));
        }
    }
    out
}

/// Public constructors of `ty`'s class with the class type arguments applied.
pub fn collect_constructors(loader: &dyn ClassLoader, ty: &ClassType) -> Vec<MethodCandidate> {
    let Some(def) = loader.class(&ty.name) else {
        return Vec::new();
    };
    def.constructors
        .iter()
        .filter(|ctor| ctor.is_public)
        .map(|ctor| MethodCandidate::new(loader, ty, ctor))
        .collect()
}
