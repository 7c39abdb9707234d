use serde::Serialize;

use codepad_types::{PrimitiveType, Type};

/// A compile-time constant.
///
/// `byte`, `short`, `char` and `int` constants share [`ConstantValue::Int`]; the
/// accompanying type tells them apart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ConstantValue {
    Boolean(bool),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    /// The `null` literal, possibly cast to a reference type.
    Null,
}

impl ConstantValue {
    /// Casting conversion between primitive constants (JLS 5.5), with Java's
    /// truncating and saturating rules.
    pub fn cast_to(&self, target: PrimitiveType) -> Option<ConstantValue> {
        use PrimitiveType as P;

        if let ConstantValue::Boolean(b) = self {
            return (target == P::Boolean).then_some(ConstantValue::Boolean(*b));
        }
        if target == P::Boolean {
            return None;
        }

        let value = match *self {
            ConstantValue::Int(v) => Numeric::Integral(i64::from(v)),
            ConstantValue::Long(v) => Numeric::Integral(v),
            ConstantValue::Float(v) => Numeric::Floating(f64::from(v)),
            ConstantValue::Double(v) => Numeric::Floating(v),
            _ => return None,
        };

        Some(match (value, target) {
            (Numeric::Integral(v), P::Byte) => ConstantValue::Int(i32::from(v as i8)),
            (Numeric::Integral(v), P::Short) => ConstantValue::Int(i32::from(v as i16)),
            (Numeric::Integral(v), P::Char) => ConstantValue::Int(i32::from(v as u16)),
            (Numeric::Integral(v), P::Int) => ConstantValue::Int(v as i32),
            (Numeric::Integral(v), P::Long) => ConstantValue::Long(v),
            (Numeric::Integral(v), P::Float) => ConstantValue::Float(v as f32),
            (Numeric::Integral(v), P::Double) => ConstantValue::Double(v as f64),
            // Floating to integral goes through int or long first (JLS 5.1.3).
            (Numeric::Floating(v), P::Byte) => ConstantValue::Int(i32::from(v as i32 as i8)),
            (Numeric::Floating(v), P::Short) => ConstantValue::Int(i32::from(v as i32 as i16)),
            (Numeric::Floating(v), P::Char) => ConstantValue::Int(i32::from(v as i32 as u16)),
            (Numeric::Floating(v), P::Int) => ConstantValue::Int(v as i32),
            (Numeric::Floating(v), P::Long) => ConstantValue::Long(v as i64),
            (Numeric::Floating(v), P::Float) => ConstantValue::Float(v as f32),
            (Numeric::Floating(v), P::Double) => ConstantValue::Double(v),
            (_, P::Boolean) => return None,
        })
    }
}

#[derive(Clone, Copy)]
enum Numeric {
    Integral(i64),
    Floating(f64),
}

/// The static outcome of evaluating one expression: its type and, when it is a
/// constant expression, its value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExprValue {
    pub ty: Type,
    pub constant: Option<ConstantValue>,
}

impl ExprValue {
    pub fn new(ty: Type) -> Self {
        Self { ty, constant: None }
    }

    pub fn constant(ty: Type, value: ConstantValue) -> Self {
        Self {
            ty,
            constant: Some(value),
        }
    }

    pub fn boolean(value: bool) -> Self {
        Self::constant(Type::boolean(), ConstantValue::Boolean(value))
    }

    pub fn int(value: i32) -> Self {
        Self::constant(Type::int(), ConstantValue::Int(value))
    }

    pub fn null() -> Self {
        Self::constant(Type::Null, ConstantValue::Null)
    }

    pub fn has_known_value(&self) -> bool {
        self.constant.is_some()
    }

    /// Statically known to be `null`: the literal itself, or a cast of it.
    pub fn is_known_null(&self) -> bool {
        matches!(self.constant, Some(ConstantValue::Null))
    }

    pub fn int_value(&self) -> Option<i32> {
        match self.constant {
            Some(ConstantValue::Int(v)) => Some(v),
            _ => None,
        }
    }

    pub fn long_value(&self) -> Option<i64> {
        match self.constant {
            Some(ConstantValue::Int(v)) => Some(i64::from(v)),
            Some(ConstantValue::Long(v)) => Some(v),
            _ => None,
        }
    }

    pub fn float_value(&self) -> Option<f32> {
        match self.constant {
            Some(ConstantValue::Float(v)) => Some(v),
            _ => None,
        }
    }

    pub fn double_value(&self) -> Option<f64> {
        match self.constant {
            Some(ConstantValue::Float(v)) => Some(f64::from(v)),
            Some(ConstantValue::Double(v)) => Some(v),
            _ => None,
        }
    }

    pub fn boolean_value(&self) -> Option<bool> {
        match self.constant {
            Some(ConstantValue::Boolean(v)) => Some(v),
            _ => None,
        }
    }

    /// Same value seen as `ty`; primitive constants are converted, anything else drops
    /// the value unless it is `null` flowing into a reference type.
    pub fn converted_to(&self, ty: &Type) -> ExprValue {
        let constant = match (&self.constant, ty) {
            (Some(value), Type::Primitive(p)) => value.cast_to(*p),
            (Some(ConstantValue::Null), ty) if ty.is_reference() => Some(ConstantValue::Null),
            (Some(ConstantValue::String(s)), ty) if ty.is_class_named(codepad_types::STRING) => {
                Some(ConstantValue::String(s.clone()))
            }
            _ => None,
        };
        ExprValue {
            ty: ty.clone(),
            constant,
        }
    }
}
