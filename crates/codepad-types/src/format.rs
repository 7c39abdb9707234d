//! Canonical source-level rendering of types, e.g. `java.util.Map.Entry<K,V>[]`.

use std::fmt;

use crate::{ClassType, PrimitiveType, Type, WildcardType};

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl fmt::Display for ClassType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outer {
            Some(outer) => write!(f, "{outer}.{}", self.simple_name())?,
            None => f.write_str(&self.name.replace('$', "."))?,
        }
        if !self.args.is_empty() {
            f.write_str("<")?;
            write_joined(f, &self.args, ",")?;
            f.write_str(">")?;
        }
        Ok(())
    }
}

impl fmt::Display for WildcardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("?")?;
        if !self.lower.is_empty() {
            f.write_str(" super ")?;
            write_joined(f, &self.lower, "&")
        } else if !self.upper.is_empty() {
            f.write_str(" extends ")?;
            write_joined(f, &self.upper, "&")
        } else {
            Ok(())
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Void => f.write_str("void"),
            Type::Null => f.write_str("null"),
            Type::Primitive(p) => fmt::Display::fmt(p, f),
            Type::Class(class) => fmt::Display::fmt(class, f),
            Type::Array(component) => write!(f, "{component}[]"),
            Type::TypeVar(name) => f.write_str(name),
            Type::Wildcard(w) => fmt::Display::fmt(w, f),
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, types: &[Type], sep: &str) -> fmt::Result {
    for (idx, ty) in types.iter().enumerate() {
        if idx > 0 {
            f.write_str(sep)?;
        }
        fmt::Display::fmt(ty, f)?;
    }
    Ok(())
}
