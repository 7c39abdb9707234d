//! Constant folding with Java's wrapping integer arithmetic and IEEE floating point.

use codepad_syntax::ast::{BinaryOp, UnaryOp};
use codepad_types::PrimitiveType;

use crate::ConstantValue;

/// Folds `op operand`, where `promoted` is the operand's promoted type.
pub(crate) fn fold_unary(
    op: UnaryOp,
    operand: &ConstantValue,
    promoted: PrimitiveType,
) -> Option<ConstantValue> {
    let value = operand.cast_to(promoted)?;
    Some(match (op, value) {
        (UnaryOp::Plus, value) => value,
        (UnaryOp::Minus, ConstantValue::Int(v)) => ConstantValue::Int(v.wrapping_neg()),
        (UnaryOp::Minus, ConstantValue::Long(v)) => ConstantValue::Long(v.wrapping_neg()),
        (UnaryOp::Minus, ConstantValue::Float(v)) => ConstantValue::Float(-v),
        (UnaryOp::Minus, ConstantValue::Double(v)) => ConstantValue::Double(-v),
        (UnaryOp::BitNot, ConstantValue::Int(v)) => ConstantValue::Int(!v),
        (UnaryOp::BitNot, ConstantValue::Long(v)) => ConstantValue::Long(!v),
        (UnaryOp::Not, ConstantValue::Boolean(v)) => ConstantValue::Boolean(!v),
        _ => return None,
    })
}

/// Folds a non-shift binary operator. Both operands are first converted to
/// `operand_ty`, the promoted type (or `boolean` for logical operators).
pub(crate) fn fold_binary(
    op: BinaryOp,
    lhs: &ConstantValue,
    rhs: &ConstantValue,
    operand_ty: PrimitiveType,
) -> Option<ConstantValue> {
    let lhs = lhs.cast_to(operand_ty)?;
    let rhs = rhs.cast_to(operand_ty)?;
    match (lhs, rhs) {
        (ConstantValue::Boolean(a), ConstantValue::Boolean(b)) => fold_boolean(op, a, b),
        (ConstantValue::Int(a), ConstantValue::Int(b)) => fold_int(op, a, b),
        (ConstantValue::Long(a), ConstantValue::Long(b)) => fold_long(op, a, b),
        (ConstantValue::Float(a), ConstantValue::Float(b)) => {
            fold_floating(op, f64::from(a), f64::from(b)).map(|v| match v {
                ConstantValue::Double(d) => ConstantValue::Float(d as f32),
                other => other,
            })
        }
        (ConstantValue::Double(a), ConstantValue::Double(b)) => fold_floating(op, a, b),
        _ => None,
    }
}

/// Folds a shift. Only the low five (int) or six (long) bits of the distance count.
pub(crate) fn fold_shift(
    op: BinaryOp,
    lhs: &ConstantValue,
    rhs: &ConstantValue,
    promoted: PrimitiveType,
) -> Option<ConstantValue> {
    let distance = match rhs {
        ConstantValue::Int(v) => i64::from(*v),
        ConstantValue::Long(v) => *v,
        _ => return None,
    };
    match lhs.cast_to(promoted)? {
        ConstantValue::Int(v) => {
            let s = (distance & 0x1f) as u32;
            Some(ConstantValue::Int(match op {
                BinaryOp::Shl => v.wrapping_shl(s),
                BinaryOp::Shr => v >> s,
                BinaryOp::UShr => ((v as u32) >> s) as i32,
                _ => return None,
            }))
        }
        ConstantValue::Long(v) => {
            let s = (distance & 0x3f) as u32;
            Some(ConstantValue::Long(match op {
                BinaryOp::Shl => v.wrapping_shl(s),
                BinaryOp::Shr => v >> s,
                BinaryOp::UShr => ((v as u64) >> s) as i64,
                _ => return None,
            }))
        }
        _ => None,
    }
}

fn fold_boolean(op: BinaryOp, a: bool, b: bool) -> Option<ConstantValue> {
    let v = match op {
        BinaryOp::BitAnd | BinaryOp::AndAnd => a & b,
        BinaryOp::BitOr | BinaryOp::OrOr => a | b,
        BinaryOp::BitXor | BinaryOp::NotEq => a ^ b,
        BinaryOp::EqEq => a == b,
        _ => return None,
    };
    Some(ConstantValue::Boolean(v))
}

fn fold_int(op: BinaryOp, a: i32, b: i32) -> Option<ConstantValue> {
    if let Some(cmp) = compare(op, a, b) {
        return Some(cmp);
    }
    let v = match op {
        BinaryOp::Add => a.wrapping_add(b),
        BinaryOp::Sub => a.wrapping_sub(b),
        BinaryOp::Mul => a.wrapping_mul(b),
        // Division by zero throws at run time, so it is never a constant.
        BinaryOp::Div if b != 0 => a.wrapping_div(b),
        BinaryOp::Rem if b != 0 => a.wrapping_rem(b),
        BinaryOp::BitAnd => a & b,
        BinaryOp::BitOr => a | b,
        BinaryOp::BitXor => a ^ b,
        _ => return None,
    };
    Some(ConstantValue::Int(v))
}

fn fold_long(op: BinaryOp, a: i64, b: i64) -> Option<ConstantValue> {
    if let Some(cmp) = compare(op, a, b) {
        return Some(cmp);
    }
    let v = match op {
        BinaryOp::Add => a.wrapping_add(b),
        BinaryOp::Sub => a.wrapping_sub(b),
        BinaryOp::Mul => a.wrapping_mul(b),
        BinaryOp::Div if b != 0 => a.wrapping_div(b),
        BinaryOp::Rem if b != 0 => a.wrapping_rem(b),
        BinaryOp::BitAnd => a & b,
        BinaryOp::BitOr => a | b,
        BinaryOp::BitXor => a ^ b,
        _ => return None,
    };
    Some(ConstantValue::Long(v))
}

/// Returns a `Double`; float callers narrow the result.
fn fold_floating(op: BinaryOp, a: f64, b: f64) -> Option<ConstantValue> {
    if let Some(cmp) = compare(op, a, b) {
        return Some(cmp);
    }
    let v = match op {
        BinaryOp::Add => a + b,
        BinaryOp::Sub => a - b,
        BinaryOp::Mul => a * b,
        BinaryOp::Div => a / b,
        // Rust's `%` on floats truncates like Java's `fmod`.
        BinaryOp::Rem => a % b,
        _ => return None,
    };
    Some(ConstantValue::Double(v))
}

fn compare<T: PartialOrd>(op: BinaryOp, a: T, b: T) -> Option<ConstantValue> {
    let v = match op {
        BinaryOp::Lt => a < b,
        BinaryOp::Le => a <= b,
        BinaryOp::Gt => a > b,
        BinaryOp::Ge => a >= b,
        BinaryOp::EqEq => a == b,
        BinaryOp::NotEq => a != b,
        _ => return None,
    };
    Some(ConstantValue::Boolean(v))
}
