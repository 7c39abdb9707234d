//! Syntax tree for code pad input: block statements, expressions and type references.

use codepad_types::{PrimitiveType, Span};

/// A type as written in source, before resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRef {
    pub kind: TypeRefKind,
    /// Trailing `[]` pairs.
    pub dims: usize,
    pub range: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRefKind {
    Primitive(PrimitiveType),
    Void,
    /// `a.b.C<X>.D<Y>`: one segment per dotted name, each with its own arguments.
    Named(Vec<TypeSegment>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSegment {
    pub name: String,
    pub args: Vec<TypeArgRef>,
    pub range: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeArgRef {
    Type(TypeRef),
    Wildcard,
    Extends(TypeRef),
    Super(TypeRef),
}

impl TypeRef {
    /// The dotted name without type arguments, e.g. `java.util.Map.Entry`.
    pub fn dotted_name(&self) -> Option<String> {
        match &self.kind {
            TypeRefKind::Named(segments) => Some(
                segments
                    .iter()
                    .map(|s| s.name.as_str())
                    .collect::<Vec<_>>()
                    .join("."),
            ),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    Int,
    Long,
    Float,
    Double,
    Char,
    String,
    True,
    False,
    Null,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Plus,
    Minus,
    BitNot,
    Not,
    PreInc,
    PreDec,
    PostInc,
    PostDec,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    UShr,
    Lt,
    Le,
    Gt,
    Ge,
    EqEq,
    NotEq,
    AndAnd,
    OrOr,
}

impl UnaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Plus => "+",
            UnaryOp::Minus => "-",
            UnaryOp::BitNot => "~",
            UnaryOp::Not => "!",
            UnaryOp::PreInc | UnaryOp::PostInc => "++",
            UnaryOp::PreDec | UnaryOp::PostDec => "--",
        }
    }
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::UShr => ">>>",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::EqEq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::AndAnd => "&&",
            BinaryOp::OrOr => "||",
        }
    }

    pub fn is_shift(self) -> bool {
        matches!(self, BinaryOp::Shl | BinaryOp::Shr | BinaryOp::UShr)
    }

    /// Relational, equality and conditional-logical operators; all of them yield `boolean`.
    pub fn yields_boolean(self) -> bool {
        matches!(
            self,
            BinaryOp::Lt
                | BinaryOp::Le
                | BinaryOp::Gt
                | BinaryOp::Ge
                | BinaryOp::EqEq
                | BinaryOp::NotEq
                | BinaryOp::AndAnd
                | BinaryOp::OrOr
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal {
        kind: LiteralKind,
        text: String,
        range: Span,
    },
    Name {
        name: String,
        range: Span,
    },
    FieldAccess {
        receiver: Box<Expr>,
        name: String,
        range: Span,
    },
    MethodCall {
        receiver: Option<Box<Expr>>,
        type_args: Vec<TypeArgRef>,
        name: String,
        args: Vec<Expr>,
        range: Span,
    },
    New {
        ty: TypeRef,
        args: Vec<Expr>,
        /// An anonymous class body follows the arguments.
        has_body: bool,
        range: Span,
    },
    NewArray {
        /// Element type without dimensions.
        elem: TypeRef,
        dim_exprs: Vec<Expr>,
        /// Dimensions beyond the sized ones (`new int[3][]` has one).
        extra_dims: usize,
        init: Option<ArrayInit>,
        range: Span,
    },
    Cast {
        ty: TypeRef,
        expr: Box<Expr>,
        range: Span,
    },
    ArrayAccess {
        array: Box<Expr>,
        index: Box<Expr>,
        range: Span,
    },
    Unary {
        op: UnaryOp,
        expr: Box<Expr>,
        range: Span,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
        range: Span,
    },
    /// `op` is `None` for plain `=`, else the operator of the compound form.
    Assign {
        op: Option<BinaryOp>,
        target: Box<Expr>,
        value: Box<Expr>,
        range: Span,
    },
    Conditional {
        cond: Box<Expr>,
        then_expr: Box<Expr>,
        else_expr: Box<Expr>,
        range: Span,
    },
    InstanceOf {
        expr: Box<Expr>,
        ty: TypeRef,
        range: Span,
    },
    ClassLiteral {
        ty: TypeRef,
        range: Span,
    },
    This(Span),
    Super(Span),
    Paren {
        expr: Box<Expr>,
        range: Span,
    },
}

impl Expr {
    pub fn range(&self) -> Span {
        match self {
            Expr::Literal { range, .. }
            | Expr::Name { range, .. }
            | Expr::FieldAccess { range, .. }
            | Expr::MethodCall { range, .. }
            | Expr::New { range, .. }
            | Expr::NewArray { range, .. }
            | Expr::Cast { range, .. }
            | Expr::ArrayAccess { range, .. }
            | Expr::Unary { range, .. }
            | Expr::Binary { range, .. }
            | Expr::Assign { range, .. }
            | Expr::Conditional { range, .. }
            | Expr::InstanceOf { range, .. }
            | Expr::ClassLiteral { range, .. }
            | Expr::Paren { range, .. } => *range,
            Expr::This(range) | Expr::Super(range) => *range,
        }
    }

    /// JLS 14.8: only these expressions may stand alone as statements.
    pub fn is_statement_expression(&self) -> bool {
        match self {
            Expr::Assign { .. } | Expr::MethodCall { .. } | Expr::New { .. } => true,
            Expr::Unary { op, .. } => matches!(
                op,
                UnaryOp::PreInc | UnaryOp::PreDec | UnaryOp::PostInc | UnaryOp::PostDec
            ),
            _ => false,
        }
    }

    /// `a.b.c` as a dotted name, when the expression is made only of names.
    pub fn dotted_name(&self) -> Option<String> {
        match self {
            Expr::Name { name, .. } => Some(name.clone()),
            Expr::FieldAccess { receiver, name, .. } => {
                Some(format!("{}.{name}", receiver.dotted_name()?))
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayInit {
    pub elements: Vec<VarInit>,
    pub range: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum VarInit {
    Expr(Expr),
    Array(ArrayInit),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub statements: Vec<Stmt>,
    pub range: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LocalVarDecl {
    pub is_final: bool,
    pub ty: TypeRef,
    pub declarators: Vec<VarDeclarator>,
    pub range: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarDeclarator {
    pub name: String,
    /// `int x[]` style dimensions following the name.
    pub dims: usize,
    pub init: Option<VarInit>,
    pub range: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatchClause {
    pub types: Vec<TypeRef>,
    pub name: String,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwitchGroup {
    /// `None` is the `default` label.
    pub labels: Vec<Option<Expr>>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Block(Block),
    LocalVar(LocalVarDecl),
    Expr(Expr),
    If {
        cond: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },
    While {
        cond: Expr,
        body: Box<Stmt>,
    },
    Do {
        body: Box<Stmt>,
        cond: Expr,
    },
    For {
        init: Vec<Stmt>,
        cond: Option<Expr>,
        update: Vec<Expr>,
        body: Box<Stmt>,
    },
    ForEach {
        var: LocalVarDecl,
        iterable: Expr,
        body: Box<Stmt>,
    },
    Return(Option<Expr>),
    Throw(Expr),
    Break(Option<String>),
    Continue(Option<String>),
    Try {
        body: Block,
        catches: Vec<CatchClause>,
        finally: Option<Block>,
    },
    Switch {
        selector: Expr,
        groups: Vec<SwitchGroup>,
    },
    Synchronized {
        lock: Expr,
        body: Block,
    },
    Labeled {
        label: String,
        body: Box<Stmt>,
    },
    Empty(Span),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDecl {
    pub is_static: bool,
    pub is_star: bool,
    /// Dotted path without the trailing `.*`.
    pub path: String,
    pub range: Span,
}
