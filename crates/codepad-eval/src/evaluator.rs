//! Static typing of code pad expressions.

use codepad_resolve::{JavaEntity, ResolveError, Resolver};
use codepad_syntax::ast::{BinaryOp, Expr, LiteralKind, TypeRef, UnaryOp};
use codepad_syntax::literals;
use codepad_syntax::JavaLanguageLevel;
use codepad_types::{
    binary_numeric_promotion, box_type, unary_numeric_promotion, unbox_type, ClassLoader,
    ClassType, LubContext, PrimitiveType, Type,
};

use crate::conditional::{conditional_legacy, conditional_modern};
use crate::fold::{fold_binary, fold_shift, fold_unary};
use crate::{ConstantValue, ExprValue, SemanticError};

/// Computes the static type (and constant value, when there is one) of expressions.
///
/// `Ok(None)` means the expression has no static type this evaluator can determine;
/// that is an expected outcome, not an error.
pub struct Evaluator<'a> {
    resolver: Resolver<'a>,
    level: JavaLanguageLevel,
    max_lub_depth: usize,
}

impl<'a> Evaluator<'a> {
    pub fn new(resolver: Resolver<'a>) -> Self {
        Self {
            resolver,
            level: JavaLanguageLevel::default(),
            max_lub_depth: LubContext::DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_language_level(mut self, level: JavaLanguageLevel) -> Self {
        self.level = level;
        self
    }

    pub fn with_max_lub_depth(mut self, depth: usize) -> Self {
        self.max_lub_depth = depth;
        self
    }

    pub fn resolver(&self) -> &Resolver<'a> {
        &self.resolver
    }

    pub(crate) fn loader(&self) -> &'a dyn ClassLoader {
        self.resolver.loader()
    }

    pub fn expression_type(&self, expr: &Expr) -> Result<Option<Type>, SemanticError> {
        Ok(self.evaluate(expr)?.map(|value| value.ty))
    }

    pub fn evaluate(&self, expr: &Expr) -> Result<Option<ExprValue>, SemanticError> {
        match expr {
            Expr::Literal { kind, text, .. } => self.literal(*kind, text, false).map(Some),
            Expr::Name { .. } | Expr::FieldAccess { .. } => self.value_of_name(expr),
            Expr::MethodCall {
                receiver,
                type_args,
                name,
                args,
                ..
            } => self.method_call(receiver.as_deref(), type_args, name, args),
            Expr::New {
                ty, args, has_body, ..
            } => self.instance_creation(ty, args, *has_body),
            Expr::NewArray {
                elem,
                dim_exprs,
                extra_dims,
                init,
                ..
            } => {
                for dim in dim_exprs {
                    self.evaluate(dim)?;
                }
                if init.is_some() {
                    tracing::trace!("array initializer elements are not typed");
                }
                let elem = self.resolve_type(elem)?;
                let dims = dim_exprs.len() + extra_dims;
                Ok(Some(ExprValue::new(Type::array_of_depth(elem, dims))))
            }
            Expr::Cast { ty, expr, .. } => {
                let target = self.resolve_type(ty)?;
                Ok(Some(match self.evaluate(expr)? {
                    Some(inner) => inner.converted_to(&target),
                    None => ExprValue::new(target),
                }))
            }
            Expr::ArrayAccess { array, index, .. } => {
                self.evaluate(index)?;
                let Some(array) = self.evaluate(array)? else {
                    return Ok(None);
                };
                match array.ty {
                    Type::Array(component) => Ok(Some(ExprValue::new(*component))),
                    other => Err(SemanticError::NotAnArray(other.to_string())),
                }
            }
            Expr::Unary { op, expr, .. } => self.unary(*op, expr),
            Expr::Binary { op, lhs, rhs, .. } => self.binary(*op, lhs, rhs),
            Expr::Assign { target, value, .. } => {
                self.evaluate(value)?;
                Ok(self.evaluate(target)?.map(|t| ExprValue::new(t.ty)))
            }
            Expr::Conditional {
                cond,
                then_expr,
                else_expr,
                ..
            } => self.conditional(cond, then_expr, else_expr),
            Expr::InstanceOf { expr, ty, .. } => {
                self.evaluate(expr)?;
                self.resolve_type(ty)?;
                Ok(Some(ExprValue::new(Type::boolean())))
            }
            Expr::ClassLiteral { ty, .. } => {
                let target = match self.resolve_type(ty)? {
                    Type::Void => Type::class("java.lang.Void", Vec::new()),
                    other => box_type(&other),
                };
                Ok(Some(ExprValue::new(Type::class(
                    codepad_types::CLASS,
                    vec![target],
                ))))
            }
            // There is no enclosing class at the code pad's top level.
            Expr::This(_) | Expr::Super(_) => Ok(None),
            Expr::Paren { expr, .. } => self.evaluate(expr),
        }
    }

    pub(crate) fn resolve_type(&self, ty: &TypeRef) -> Result<Type, SemanticError> {
        Ok(self.resolver.resolve_type_ref(ty)?)
    }

    /// Literal text decoded with a leading minus folded in when `negative` is set.
    fn literal(
        &self,
        kind: LiteralKind,
        text: &str,
        negative: bool,
    ) -> Result<ExprValue, SemanticError> {
        let decoded = match kind {
            LiteralKind::Int => literals::parse_int_literal(text, negative).map(ExprValue::int),
            LiteralKind::Long => literals::parse_long_literal(text, negative).map(|v| {
                ExprValue::constant(Type::Primitive(PrimitiveType::Long), ConstantValue::Long(v))
            }),
            LiteralKind::Float => literals::parse_float_literal(text, negative).map(|v| {
                ExprValue::constant(Type::Primitive(PrimitiveType::Float), ConstantValue::Float(v))
            }),
            LiteralKind::Double => literals::parse_double_literal(text, negative).map(|v| {
                ExprValue::constant(
                    Type::Primitive(PrimitiveType::Double),
                    ConstantValue::Double(v),
                )
            }),
            LiteralKind::Char => literals::unescape_char_literal(text).map(|unit| {
                ExprValue::constant(
                    Type::Primitive(PrimitiveType::Char),
                    ConstantValue::Int(i32::from(unit)),
                )
            }),
            LiteralKind::String => literals::unescape_string_literal(text)
                .map(|s| ExprValue::constant(Type::string(), ConstantValue::String(s))),
            LiteralKind::True => Ok(ExprValue::boolean(true)),
            LiteralKind::False => Ok(ExprValue::boolean(false)),
            LiteralKind::Null => Ok(ExprValue::null()),
        };
        decoded.map_err(|err| SemanticError::literal(text, err))
    }

    /// A name or field access in value position.
    fn value_of_name(&self, expr: &Expr) -> Result<Option<ExprValue>, SemanticError> {
        let Some(entity) = self.entity(expr)? else {
            return Ok(None);
        };
        match entity {
            JavaEntity::Value(ty) => Ok(Some(ExprValue::new(ty))),
            JavaEntity::Type(ty) => Err(ResolveError::NotAValue(entity_name(&ty)).into()),
            JavaEntity::Package(name) => Err(SemanticError::UnresolvedName(name)),
        }
    }

    /// What an expression denotes: a package, a type or a value.
    ///
    /// Names are resolved through the entity chain; any other expression is a value
    /// of its evaluated type.
    pub(crate) fn entity(&self, expr: &Expr) -> Result<Option<JavaEntity>, SemanticError> {
        match expr {
            Expr::Name { name, .. } => Ok(Some(self.resolver.resolve_bare_name(name))),
            Expr::FieldAccess { receiver, name, .. } => {
                let Some(owner) = self.entity(receiver)? else {
                    return Ok(None);
                };
                if let JavaEntity::Value(Type::Primitive(p)) = &owner {
                    return Err(SemanticError::PrimitiveReceiver { ty: p.to_string() });
                }
                Ok(Some(owner.sub_entity(self.loader(), name)?))
            }
            other => Ok(self.evaluate(other)?.map(|v| JavaEntity::Value(v.ty))),
        }
    }

    fn unary(&self, op: UnaryOp, operand: &Expr) -> Result<Option<ExprValue>, SemanticError> {
        if op == UnaryOp::Minus {
            if let Expr::Literal { kind, text, .. } = operand {
                if matches!(
                    kind,
                    LiteralKind::Int | LiteralKind::Long | LiteralKind::Float | LiteralKind::Double
                ) {
                    return self.literal(*kind, text, true).map(Some);
                }
            }
        }

        let Some(value) = self.evaluate(operand)? else {
            return Ok(None);
        };
        let unboxed = unbox_type(&value.ty);

        match op {
            UnaryOp::Plus => Ok(Some(value)),
            UnaryOp::PreInc | UnaryOp::PreDec | UnaryOp::PostInc | UnaryOp::PostDec => {
                Ok(Some(ExprValue::new(value.ty)))
            }
            UnaryOp::Not => {
                let constant = match value.constant.as_ref() {
                    Some(c) if unboxed == Type::boolean() => {
                        fold_unary(op, c, PrimitiveType::Boolean)
                    }
                    _ => None,
                };
                Ok(Some(with_constant(Type::boolean(), constant)))
            }
            UnaryOp::Minus | UnaryOp::BitNot => {
                let promoted = unboxed
                    .primitive()
                    .and_then(unary_numeric_promotion)
                    .filter(|p| op == UnaryOp::Minus || p.is_integral())
                    .ok_or_else(|| SemanticError::operator(op.symbol(), &[&value.ty]))?;
                let constant = value
                    .constant
                    .as_ref()
                    .and_then(|c| fold_unary(op, c, promoted));
                Ok(Some(with_constant(Type::Primitive(promoted), constant)))
            }
        }
    }

    fn binary(
        &self,
        op: BinaryOp,
        lhs: &Expr,
        rhs: &Expr,
    ) -> Result<Option<ExprValue>, SemanticError> {
        let lhs = self.evaluate(lhs)?;
        let rhs = self.evaluate(rhs)?;

        if op.is_shift() {
            let Some(lhs) = lhs else {
                return Ok(None);
            };
            let promoted = unbox_type(&lhs.ty)
                .primitive()
                .and_then(unary_numeric_promotion)
                .filter(|p| p.is_integral())
                .ok_or_else(|| SemanticError::operator(op.symbol(), &[&lhs.ty]))?;
            if let Some(rhs) = &rhs {
                let distance = unbox_type(&rhs.ty).primitive().and_then(unary_numeric_promotion);
                if !distance.is_some_and(|p| p.is_integral()) {
                    return Err(SemanticError::operator(op.symbol(), &[&lhs.ty, &rhs.ty]));
                }
            }
            let constant = match (&lhs.constant, rhs.as_ref().and_then(|r| r.constant.as_ref())) {
                (Some(l), Some(r)) => fold_shift(op, l, r, promoted),
                _ => None,
            };
            return Ok(Some(with_constant(Type::Primitive(promoted), constant)));
        }

        let (Some(lhs), Some(rhs)) = (lhs, rhs) else {
            return Ok(None);
        };
        let (ul, ur) = (unbox_type(&lhs.ty), unbox_type(&rhs.ty));

        if op.yields_boolean() {
            let operand_ty = match (ul.primitive(), ur.primitive()) {
                (Some(PrimitiveType::Boolean), Some(PrimitiveType::Boolean)) => {
                    Some(PrimitiveType::Boolean)
                }
                (Some(a), Some(b)) => binary_numeric_promotion(a, b),
                _ => None,
            };
            let constant = match (operand_ty, &lhs.constant, &rhs.constant) {
                (Some(p), Some(l), Some(r)) => fold_binary(op, l, r, p),
                _ => None,
            };
            return Ok(Some(with_constant(Type::boolean(), constant)));
        }

        if op == BinaryOp::Add
            && (ul.is_class_named(codepad_types::STRING) || ur.is_class_named(codepad_types::STRING))
        {
            return Ok(Some(ExprValue::new(Type::string())));
        }

        let mismatch = || SemanticError::operator(op.symbol(), &[&lhs.ty, &rhs.ty]);
        let (Some(pl), Some(pr)) = (ul.primitive(), ur.primitive()) else {
            return Err(mismatch());
        };

        let bitwise = matches!(op, BinaryOp::BitAnd | BinaryOp::BitOr | BinaryOp::BitXor);
        let result = if bitwise && pl == PrimitiveType::Boolean && pr == PrimitiveType::Boolean {
            PrimitiveType::Boolean
        } else {
            binary_numeric_promotion(pl, pr).ok_or_else(mismatch)?
        };

        let constant = match (&lhs.constant, &rhs.constant) {
            (Some(l), Some(r)) => fold_binary(op, l, r, result),
            _ => None,
        };
        Ok(Some(with_constant(Type::Primitive(result), constant)))
    }

    fn conditional(
        &self,
        cond: &Expr,
        then_expr: &Expr,
        else_expr: &Expr,
    ) -> Result<Option<ExprValue>, SemanticError> {
        let modern = self.level.supports_autoboxing();

        let Some(cond) = self.evaluate(cond)? else {
            return Ok(None);
        };
        let cond_ok = if modern {
            unbox_type(&cond.ty) == Type::boolean()
        } else {
            cond.ty == Type::boolean()
        };
        if !cond_ok {
            return Err(SemanticError::NonBooleanCondition(cond.ty.to_string()));
        }

        let then_value = self.evaluate(then_expr)?;
        let else_value = self.evaluate(else_expr)?;
        let (Some(then_value), Some(else_value)) = (then_value, else_value) else {
            return Ok(None);
        };
        if then_value.ty.is_void() || else_value.ty.is_void() {
            return Err(SemanticError::VoidConditionalBranch);
        }

        let ty = if modern {
            let mut lub = LubContext::new(self.loader()).with_max_depth(self.max_lub_depth);
            match conditional_modern(&mut lub, &then_value, &else_value)? {
                Some(ty) => ty,
                None => return Ok(None),
            }
        } else {
            conditional_legacy(self.loader(), &then_value, &else_value)?
        };

        // A constant condition selects one branch; the result is constant if that
        // branch is.
        let chosen = match cond.boolean_value() {
            Some(true) => Some(&then_value),
            Some(false) => Some(&else_value),
            None => None,
        };
        Ok(Some(match chosen {
            Some(branch) if branch.has_known_value() => branch.converted_to(&ty),
            _ => ExprValue::new(ty),
        }))
    }
}

fn with_constant(ty: Type, constant: Option<ConstantValue>) -> ExprValue {
    ExprValue { ty, constant }
}

pub(crate) fn entity_name(ty: &ClassType) -> String {
    ty.name.replace('$', ".")
}
