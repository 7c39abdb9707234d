//! Subtyping (JLS 4.10), type argument containment (JLS 4.5.1) and assignment
//! compatibility with and without boxing.

use crate::java::conversions::{box_type, unbox_type};
use crate::java::helpers::instantiate_as_supertype;
use crate::{ClassLoader, ClassType, PrimitiveType, Type, WildcardType};

/// Widening primitive conversion (JLS 5.1.2), identity included.
pub fn is_primitive_widening(from: PrimitiveType, to: PrimitiveType) -> bool {
    use PrimitiveType::*;
    if from == to {
        return true;
    }
    match from {
        Byte => matches!(to, Short | Int | Long | Float | Double),
        Short | Char => matches!(to, Int | Long | Float | Double),
        Int => matches!(to, Long | Float | Double),
        Long => matches!(to, Float | Double),
        Float => matches!(to, Double),
        Double | Boolean => false,
    }
}

pub fn is_subtype(loader: &dyn ClassLoader, sub: &Type, sup: &Type) -> bool {
    if sub == sup {
        return true;
    }
    match (sub, sup) {
        (Type::Null, sup) => sup.is_reference(),
        (Type::Wildcard(w), sup) => {
            if w.upper.is_empty() || w.is_super() {
                sup.is_class_named(crate::OBJECT)
            } else {
                w.upper.iter().any(|bound| is_subtype(loader, bound, sup))
            }
        }
        (sub, Type::Wildcard(w)) => {
            if w.is_super() || w.upper.is_empty() {
                sub.is_reference()
            } else {
                w.upper.iter().all(|bound| is_subtype(loader, sub, bound))
            }
        }
        (Type::TypeVar(_), sup) => sup.is_class_named(crate::OBJECT),
        (Type::Array(a), Type::Array(b)) => match (&**a, &**b) {
            (Type::Primitive(_), _) | (_, Type::Primitive(_)) => a == b,
            (a, b) => is_subtype(loader, a, b),
        },
        (Type::Array(_), Type::Class(c)) => {
            matches!(
                c.name.as_str(),
                crate::OBJECT | crate::CLONEABLE | crate::SERIALIZABLE
            )
        }
        (Type::Class(a), Type::Class(b)) => is_class_subtype(loader, a, b),
        _ => false,
    }
}

fn is_class_subtype(loader: &dyn ClassLoader, sub: &ClassType, sup: &ClassType) -> bool {
    let Some(view) = instantiate_as_supertype(loader, sub, &sup.name) else {
        return false;
    };
    // Either side raw: unchecked conversion.
    if sup.args.is_empty() || view.args.is_empty() {
        return true;
    }
    view.args.len() == sup.args.len()
        && sup
            .args
            .iter()
            .zip(&view.args)
            .all(|(outer, inner)| contains(loader, outer, inner))
}

/// Whether type argument `outer` contains type argument `inner`.
pub fn contains(loader: &dyn ClassLoader, outer: &Type, inner: &Type) -> bool {
    let Type::Wildcard(w) = outer else {
        return outer == inner;
    };
    if w.is_unbounded() {
        return true;
    }
    if w.is_super() {
        let lower_of_inner: Vec<&Type> = match inner {
            Type::Wildcard(iw) => iw.lower.iter().collect(),
            solid => vec![solid],
        };
        return !lower_of_inner.is_empty()
            && w.lower
                .iter()
                .all(|l| lower_of_inner.iter().any(|m| is_subtype(loader, l, m)));
    }
    match inner {
        Type::Wildcard(iw) if iw.is_super() || iw.upper.is_empty() => upper_is_object(w),
        Type::Wildcard(iw) => w
            .upper
            .iter()
            .all(|u| iw.upper.iter().any(|v| is_subtype(loader, v, u))),
        solid => w.upper.iter().all(|u| is_subtype(loader, solid, u)),
    }
}

fn upper_is_object(w: &WildcardType) -> bool {
    w.upper.iter().all(|u| u.is_class_named(crate::OBJECT))
}

/// Assignment compatibility without boxing: identity, widening primitive and widening
/// reference conversions (unchecked conversion included).
pub fn is_assignable(loader: &dyn ClassLoader, from: &Type, to: &Type) -> bool {
    match (from, to) {
        (Type::Primitive(a), Type::Primitive(b)) => is_primitive_widening(*a, *b),
        (Type::Primitive(_), _) | (_, Type::Primitive(_)) => false,
        (Type::Void, _) | (_, Type::Void) => false,
        (from, to) => is_subtype(loader, from, to),
    }
}

/// [`is_assignable`] extended with boxing and unboxing (JLS 5.3 loose invocation).
pub fn is_assignable_loose(loader: &dyn ClassLoader, from: &Type, to: &Type) -> bool {
    if is_assignable(loader, from, to) {
        return true;
    }
    match (from, to) {
        (Type::Primitive(_), to) if to.is_reference() => {
            is_subtype(loader, &box_type(from), to)
        }
        (Type::Class(_), Type::Primitive(target)) => match unbox_type(from) {
            Type::Primitive(p) => is_primitive_widening(p, *target),
            _ => false,
        },
        _ => false,
    }
}
