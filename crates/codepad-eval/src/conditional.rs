//! Typing of `cond ? a : b`.
//!
//! Java 1.4 and Java 5 disagree on this operator and the later rules are not backwards
//! compatible, so both are kept: [`conditional_legacy`] follows JLS 2nd edition 15.25
//! (no boxing, no generics) and [`conditional_modern`] the Java 5 rules, where
//! unrelated reference branches meet at their least upper bound.
//!
//! Both take branches whose types are known and not `void`; the caller handles the
//! condition and unknown branches.

use codepad_types::{
    binary_numeric_promotion, box_type, is_assignable, is_minor_integer, unbox_type, value_fits,
    ClassLoader, LubContext, PrimitiveType, Type,
};

use crate::{ExprValue, SemanticError};

/// JLS 2nd edition 15.25.
pub fn conditional_legacy(
    loader: &dyn ClassLoader,
    then_value: &ExprValue,
    else_value: &ExprValue,
) -> Result<Type, SemanticError> {
    let (a, b) = (&then_value.ty, &else_value.ty);
    if a == b {
        return Ok(a.clone());
    }

    if let (Type::Primitive(pa), Type::Primitive(pb)) = (a, b) {
        if pa.is_numeric() && pb.is_numeric() {
            if let Some(p) = numeric_result(*pa, then_value, *pb, else_value) {
                return Ok(Type::Primitive(p));
            }
        }
    }

    if is_assignable(loader, b, a) {
        return Ok(a.clone());
    }
    if is_assignable(loader, a, b) {
        return Ok(b.clone());
    }
    Err(SemanticError::IncompatibleConditional(a.to_string(), b.to_string()))
}

/// Java 5 rules. `Ok(None)` when the branches have no expressible common type.
pub fn conditional_modern(
    lub: &mut LubContext<'_>,
    then_value: &ExprValue,
    else_value: &ExprValue,
) -> Result<Option<Type>, SemanticError> {
    let (a, b) = (&then_value.ty, &else_value.ty);
    if a == b {
        return Ok(Some(a.clone()));
    }

    // The null type against anything else yields that type, boxed if primitive.
    if a.is_null() {
        return Ok(Some(box_type(b)));
    }
    if b.is_null() {
        return Ok(Some(box_type(a)));
    }

    // A branch known to be null is never unboxed, so it keeps its boxed type.
    if then_value.is_known_null() && b.primitive().is_some() && box_type(b) == *a {
        return Ok(Some(a.clone()));
    }
    if else_value.is_known_null() && a.primitive().is_some() && box_type(a) == *b {
        return Ok(Some(b.clone()));
    }

    let (ua, ub) = (unbox_type(a), unbox_type(b));
    if let (Type::Primitive(pa), Type::Primitive(pb)) = (&ua, &ub) {
        if *pa == PrimitiveType::Boolean && *pb == PrimitiveType::Boolean {
            return Ok(Some(Type::boolean()));
        }
        if pa.is_numeric() && pb.is_numeric() {
            // Boxed branches never carry an int constant, so the narrowing rule only
            // sees primitive `int` branches.
            if let Some(p) = numeric_result(*pa, then_value, *pb, else_value) {
                return Ok(Some(Type::Primitive(p)));
            }
        }
    }

    match (box_type(a), box_type(b)) {
        (Type::Class(ca), Type::Class(cb)) => Ok(Some(lub.lub(&[ca, cb])?)),
        _ => Ok(None),
    }
}

/// Shared numeric rules: `byte`/`short` meet at `short`; an `int` constant that fits a
/// minor integer branch takes that branch's type; otherwise binary numeric promotion.
fn numeric_result(
    a: PrimitiveType,
    then_value: &ExprValue,
    b: PrimitiveType,
    else_value: &ExprValue,
) -> Option<PrimitiveType> {
    use PrimitiveType::{Byte, Int, Short};

    if matches!((a, b), (Byte, Short) | (Short, Byte)) {
        return Some(Short);
    }
    if is_minor_integer(a) && b == Int {
        if let Some(v) = else_value.int_value() {
            if value_fits(i64::from(v), a) {
                return Some(a);
            }
        }
    }
    if is_minor_integer(b) && a == Int {
        if let Some(v) = then_value.int_value() {
            if value_fits(i64::from(v), b) {
                return Some(b);
            }
        }
    }
    binary_numeric_promotion(a, b)
}
