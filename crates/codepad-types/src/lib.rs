//! Java type model shared by the code pad crates.
//!
//! Types are plain values keyed by binary class name (`java.util.Map$Entry`). Class
//! metadata is supplied by a [`ClassLoader`]; [`TypeStore`] is the in-memory
//! implementation used by tests and embedders that have no live JVM at hand.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

mod format;
pub mod java;
mod minimal_jdk;

pub use java::conversions::{
    binary_numeric_promotion, box_type, is_minor_integer, unary_numeric_promotion, unbox_type,
    value_fits,
};
pub use java::helpers::{
    collect_constructors, collect_methods, find_field, instantiate_as_supertype, member_type,
    substitute, supertype_walk, Subst,
};
pub use java::lub::{glb, lub, LubContext};
pub use java::overload::{
    compare_specificity, is_applicable, select_method, InvocationPhase, MethodCandidate,
    OverloadError, Specificity,
};
pub use java::subtyping::{is_assignable, is_assignable_loose, is_primitive_widening, is_subtype};

pub const OBJECT: &str = "java.lang.Object";
pub const STRING: &str = "java.lang.String";
pub const CLASS: &str = "java.lang.Class";
pub const CLONEABLE: &str = "java.lang.Cloneable";
pub const SERIALIZABLE: &str = "java.io.Serializable";

/// A byte-span into a source string.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn cover(self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Span({}..{})", self.start, self.end)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimitiveType {
    Boolean,
    Byte,
    Short,
    Char,
    Int,
    Long,
    Float,
    Double,
}

impl PrimitiveType {
    pub const ALL: [PrimitiveType; 8] = [
        PrimitiveType::Boolean,
        PrimitiveType::Byte,
        PrimitiveType::Short,
        PrimitiveType::Char,
        PrimitiveType::Int,
        PrimitiveType::Long,
        PrimitiveType::Float,
        PrimitiveType::Double,
    ];

    pub fn keyword(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Byte => "byte",
            PrimitiveType::Short => "short",
            PrimitiveType::Char => "char",
            PrimitiveType::Int => "int",
            PrimitiveType::Long => "long",
            PrimitiveType::Float => "float",
            PrimitiveType::Double => "double",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.keyword() == keyword)
    }

    /// Binary name of the wrapper class.
    pub fn box_class(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "java.lang.Boolean",
            PrimitiveType::Byte => "java.lang.Byte",
            PrimitiveType::Short => "java.lang.Short",
            PrimitiveType::Char => "java.lang.Character",
            PrimitiveType::Int => "java.lang.Integer",
            PrimitiveType::Long => "java.lang.Long",
            PrimitiveType::Float => "java.lang.Float",
            PrimitiveType::Double => "java.lang.Double",
        }
    }

    pub fn from_box_class(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.box_class() == name)
    }

    pub fn is_numeric(self) -> bool {
        !matches!(self, PrimitiveType::Boolean)
    }

    pub fn is_integral(self) -> bool {
        matches!(
            self,
            PrimitiveType::Byte
                | PrimitiveType::Short
                | PrimitiveType::Char
                | PrimitiveType::Int
                | PrimitiveType::Long
        )
    }
}

/// A (possibly parameterized) class or interface type.
///
/// `args` is empty both for non-generic classes and for raw uses of generic ones; use
/// [`ClassDef::is_raw_use`] to tell the two apart before consulting the arguments.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClassType {
    pub name: String,
    pub args: Vec<Type>,
    pub outer: Option<Box<ClassType>>,
}

impl ClassType {
    pub fn new(name: impl Into<String>, args: Vec<Type>) -> Self {
        Self {
            name: name.into(),
            args,
            outer: None,
        }
    }

    pub fn raw(name: impl Into<String>) -> Self {
        Self::new(name, Vec::new())
    }

    pub fn with_outer(mut self, outer: ClassType) -> Self {
        self.outer = Some(Box::new(outer));
        self
    }

    pub fn erasure(&self) -> ClassType {
        ClassType::raw(self.name.clone())
    }

    /// Simple name, stripping the package and any enclosing classes.
    pub fn simple_name(&self) -> &str {
        let tail = self.name.rsplit('.').next().unwrap_or(&self.name);
        tail.rsplit('$').next().unwrap_or(tail)
    }
}

/// `?`, `? extends A & B` or `? super C`.
///
/// Having any lower bound means `super`; otherwise the upper bounds (if any) apply.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WildcardType {
    pub upper: Vec<Type>,
    pub lower: Vec<Type>,
}

impl WildcardType {
    pub fn is_unbounded(&self) -> bool {
        self.upper.is_empty() && self.lower.is_empty()
    }

    pub fn is_super(&self) -> bool {
        !self.lower.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
    Void,
    Null,
    Primitive(PrimitiveType),
    Class(ClassType),
    Array(Box<Type>),
    /// A declared type parameter, referenced by name from class or method metadata.
    TypeVar(String),
    Wildcard(WildcardType),
}

impl Type {
    pub fn class(name: impl Into<String>, args: Vec<Type>) -> Type {
        Type::Class(ClassType::new(name, args))
    }

    pub fn object() -> Type {
        Type::class(OBJECT, Vec::new())
    }

    pub fn string() -> Type {
        Type::class(STRING, Vec::new())
    }

    pub fn array(component: Type) -> Type {
        Type::Array(Box::new(component))
    }

    pub fn array_of_depth(mut component: Type, dims: usize) -> Type {
        for _ in 0..dims {
            component = Type::array(component);
        }
        component
    }

    pub fn type_var(name: impl Into<String>) -> Type {
        Type::TypeVar(name.into())
    }

    pub fn unbounded() -> Type {
        Type::Wildcard(WildcardType::default())
    }

    pub fn extends(bound: Type) -> Type {
        Type::Wildcard(WildcardType {
            upper: vec![bound],
            lower: Vec::new(),
        })
    }

    pub fn super_of(bound: Type) -> Type {
        Type::Wildcard(WildcardType {
            upper: Vec::new(),
            lower: vec![bound],
        })
    }

    pub fn boolean() -> Type {
        Type::Primitive(PrimitiveType::Boolean)
    }

    pub fn int() -> Type {
        Type::Primitive(PrimitiveType::Int)
    }

    pub fn primitive(&self) -> Option<PrimitiveType> {
        match self {
            Type::Primitive(p) => Some(*p),
            _ => None,
        }
    }

    pub fn as_class(&self) -> Option<&ClassType> {
        match self {
            Type::Class(class) => Some(class),
            _ => None,
        }
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Type::Void)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Type::Null)
    }

    pub fn is_numeric(&self) -> bool {
        self.primitive().is_some_and(PrimitiveType::is_numeric)
    }

    pub fn is_reference(&self) -> bool {
        matches!(
            self,
            Type::Class(_) | Type::Array(_) | Type::TypeVar(_) | Type::Wildcard(_) | Type::Null
        )
    }

    pub fn is_class_named(&self, name: &str) -> bool {
        matches!(self, Type::Class(class) if class.name == name)
    }

    pub fn array_component(&self) -> Option<&Type> {
        match self {
            Type::Array(component) => Some(component),
            _ => None,
        }
    }

    /// Number of array dimensions wrapped around the innermost element type.
    pub fn array_depth(&self) -> usize {
        match self {
            Type::Array(component) => 1 + component.array_depth(),
            _ => 0,
        }
    }

    /// Type erasure; type variables erase to `Object` since bounds are not tracked here.
    pub fn erasure(&self) -> Type {
        match self {
            Type::Class(class) => Type::Class(class.erasure()),
            Type::Array(component) => Type::array(component.erasure()),
            Type::TypeVar(_) => Type::object(),
            Type::Wildcard(w) => match w.upper.first() {
                Some(bound) => bound.erasure(),
                None => Type::object(),
            },
            other => other.clone(),
        }
    }
}

impl From<PrimitiveType> for Type {
    fn from(value: PrimitiveType) -> Self {
        Type::Primitive(value)
    }
}

impl From<ClassType> for Type {
    fn from(value: ClassType) -> Self {
        Type::Class(value)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClassKind {
    Class,
    Interface,
    Enum,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeParamDef {
    pub name: String,
    pub upper_bounds: Vec<Type>,
}

impl TypeParamDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            upper_bounds: vec![Type::object()],
        }
    }

    pub fn bounded(name: impl Into<String>, bounds: Vec<Type>) -> Self {
        Self {
            name: name.into(),
            upper_bounds: bounds,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    pub ty: Type,
    pub is_static: bool,
    pub is_final: bool,
    pub is_public: bool,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
            is_static: false,
            is_final: false,
            is_public: true,
        }
    }

    /// `public static final`.
    pub fn constant(name: impl Into<String>, ty: Type) -> Self {
        Self {
            is_static: true,
            is_final: true,
            ..Self::new(name, ty)
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDef {
    pub name: String,
    pub type_params: Vec<TypeParamDef>,
    pub params: Vec<Type>,
    pub return_type: Type,
    pub is_static: bool,
    pub is_public: bool,
}

impl MethodDef {
    pub fn new(name: impl Into<String>, params: Vec<Type>, return_type: Type) -> Self {
        Self {
            name: name.into(),
            type_params: Vec::new(),
            params,
            return_type,
            is_static: false,
            is_public: true,
        }
    }

    pub fn new_static(name: impl Into<String>, params: Vec<Type>, return_type: Type) -> Self {
        Self {
            is_static: true,
            ..Self::new(name, params, return_type)
        }
    }

    pub fn with_type_params(mut self, type_params: Vec<TypeParamDef>) -> Self {
        self.type_params = type_params;
        self
    }

    pub fn is_generic(&self) -> bool {
        !self.type_params.is_empty()
    }
}

/// Reflective metadata for one loaded class.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDef {
    /// Binary name, with `$` separating nested classes.
    pub name: String,
    pub kind: ClassKind,
    pub type_params: Vec<TypeParamDef>,
    pub super_class: Option<Type>,
    pub interfaces: Vec<Type>,
    pub fields: Vec<FieldDef>,
    pub constructors: Vec<MethodDef>,
    pub methods: Vec<MethodDef>,
    /// Nested classes declared `static` carry no enclosing instance type.
    pub is_static: bool,
}

impl ClassDef {
    pub fn new(name: impl Into<String>, kind: ClassKind) -> Self {
        let name = name.into();
        let super_class = match kind {
            ClassKind::Class if name != OBJECT => Some(Type::object()),
            _ => None,
        };
        Self {
            name,
            kind,
            type_params: Vec::new(),
            super_class,
            interfaces: Vec::new(),
            fields: Vec::new(),
            constructors: Vec::new(),
            methods: Vec::new(),
            is_static: false,
        }
    }

    pub fn class(name: impl Into<String>) -> Self {
        Self::new(name, ClassKind::Class)
    }

    pub fn interface(name: impl Into<String>) -> Self {
        Self::new(name, ClassKind::Interface)
    }

    pub fn enumeration(name: impl Into<String>) -> Self {
        let name = name.into();
        let self_ty = Type::class(name.clone(), Vec::new());
        let mut def = Self::new(name, ClassKind::Enum);
        def.super_class = Some(Type::class("java.lang.Enum", vec![self_ty]));
        def
    }

    pub fn type_params(mut self, params: Vec<TypeParamDef>) -> Self {
        self.type_params = params;
        self
    }

    pub fn extends(mut self, super_class: Type) -> Self {
        self.super_class = Some(super_class);
        self
    }

    pub fn implements(mut self, interface: Type) -> Self {
        self.interfaces.push(interface);
        self
    }

    pub fn field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    pub fn method(mut self, method: MethodDef) -> Self {
        self.methods.push(method);
        self
    }

    pub fn constructor(mut self, params: Vec<Type>) -> Self {
        self.constructors
            .push(MethodDef::new("<init>", params, Type::Void));
        self
    }

    pub fn nested_static(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn is_interface(&self) -> bool {
        self.kind == ClassKind::Interface
    }

    /// A generic class used without type arguments.
    pub fn is_raw_use(&self, ty: &ClassType) -> bool {
        ty.args.is_empty() && !self.type_params.is_empty()
    }

    pub fn type_param(&self, name: &str) -> Option<&TypeParamDef> {
        self.type_params.iter().find(|param| param.name == name)
    }

    pub fn declared_field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|field| field.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("class not found: {name}")]
pub struct ClassNotFound {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TypeError {
    #[error("incompatible bounds: {0} and {1}")]
    IncompatibleBounds(String, String),
}

/// Source of class metadata.
///
/// Loading is assumed idempotent; a loaded [`ClassDef`] is treated as immutable for
/// the rest of the session.
pub trait ClassLoader {
    fn load_class(&self, name: &str) -> Result<&ClassDef, ClassNotFound>;

    fn class(&self, name: &str) -> Option<&ClassDef> {
        self.load_class(name).ok()
    }
}

/// In-memory class metadata keyed by binary name.
#[derive(Clone, Debug, Default)]
pub struct TypeStore {
    classes: HashMap<String, ClassDef>,
}

impl TypeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a class, replacing any previous definition with the same name.
    pub fn add_class(&mut self, def: ClassDef) {
        self.classes.insert(def.name.clone(), def);
    }

    pub fn with_class(mut self, def: ClassDef) -> Self {
        self.add_class(def);
        self
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl ClassLoader for TypeStore {
    fn load_class(&self, name: &str) -> Result<&ClassDef, ClassNotFound> {
        self.classes.get(name).ok_or_else(|| ClassNotFound {
            name: name.to_owned(),
        })
    }
}
