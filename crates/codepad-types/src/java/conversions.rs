//! Boxing, unboxing and numeric promotion (JLS 5.1.7, 5.1.8, 5.6).

use crate::{ClassType, PrimitiveType, Type};

/// Boxing conversion; non-primitive types are returned unchanged.
pub fn box_type(ty: &Type) -> Type {
    match ty {
        Type::Primitive(p) => Type::Class(ClassType::raw(p.box_class())),
        other => other.clone(),
    }
}

/// Unboxing conversion; types that are not wrapper classes are returned unchanged.
pub fn unbox_type(ty: &Type) -> Type {
    match ty {
        Type::Class(class) => match PrimitiveType::from_box_class(&class.name) {
            Some(p) => Type::Primitive(p),
            None => ty.clone(),
        },
        other => other.clone(),
    }
}

/// `byte`, `short` and `char`: the integral types narrower than `int`.
pub fn is_minor_integer(p: PrimitiveType) -> bool {
    matches!(
        p,
        PrimitiveType::Byte | PrimitiveType::Short | PrimitiveType::Char
    )
}

/// Unary numeric promotion: minor integers widen to `int`, other numerics are kept.
pub fn unary_numeric_promotion(p: PrimitiveType) -> Option<PrimitiveType> {
    match p {
        PrimitiveType::Boolean => None,
        p if is_minor_integer(p) => Some(PrimitiveType::Int),
        p => Some(p),
    }
}

/// Binary numeric promotion: `double` > `float` > `long` > `int`.
pub fn binary_numeric_promotion(a: PrimitiveType, b: PrimitiveType) -> Option<PrimitiveType> {
    if !a.is_numeric() || !b.is_numeric() {
        return None;
    }
    let rank = |p: PrimitiveType| match p {
        PrimitiveType::Double => 3,
        PrimitiveType::Float => 2,
        PrimitiveType::Long => 1,
        _ => 0,
    };
    Some(match rank(a).max(rank(b)) {
        3 => PrimitiveType::Double,
        2 => PrimitiveType::Float,
        1 => PrimitiveType::Long,
        _ => PrimitiveType::Int,
    })
}

/// Whether an `int` constant is representable in the given (minor) integer type.
pub fn value_fits(value: i64, target: PrimitiveType) -> bool {
    match target {
        PrimitiveType::Byte => (i8::MIN as i64..=i8::MAX as i64).contains(&value),
        PrimitiveType::Short => (i16::MIN as i64..=i16::MAX as i64).contains(&value),
        PrimitiveType::Char => (0..=u16::MAX as i64).contains(&value),
        PrimitiveType::Int => (i32::MIN as i64..=i32::MAX as i64).contains(&value),
        PrimitiveType::Long => true,
        _ => false,
    }
}
