//! Overload selection (JLS 15.12.2), restricted to fixed-arity, non-generic methods.

use std::fmt;

use crate::java::helpers::member_type;
use crate::java::subtyping::{is_assignable, is_assignable_loose};
use crate::{ClassLoader, ClassType, MethodDef, Type};

/// A method (or constructor) as seen through a particular receiver type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MethodCandidate {
    /// Declaring class, instantiated with the receiver's type arguments.
    pub owner: ClassType,
    pub method: MethodDef,
    pub params: Vec<Type>,
    pub return_type: Type,
}

impl MethodCandidate {
    pub fn new(loader: &dyn ClassLoader, owner: &ClassType, method: &MethodDef) -> Self {
        Self {
            owner: owner.clone(),
            method: method.clone(),
            params: method
                .params
                .iter()
                .map(|param| member_type(loader, owner, param))
                .collect(),
            return_type: member_type(loader, owner, &method.return_type),
        }
    }

    pub fn signature(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for MethodCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}(", self.owner.erasure(), self.method.name)?;
        for (idx, param) in self.params.iter().enumerate() {
            if idx > 0 {
                f.write_str(",")?;
            }
            write!(f, "{param}")?;
        }
        f.write_str(")")
    }
}

/// JLS 15.12.2.2 (strict: no boxing) and 15.12.2.3 (loose: boxing allowed).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InvocationPhase {
    Strict,
    Loose,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OverloadError {
    #[error("no applicable method {name}({args})")]
    NoApplicable { name: String, args: String },
    #[error("ambiguous call to {name}: {}", .candidates.join(", "))]
    Ambiguous {
        name: String,
        candidates: Vec<String>,
    },
    #[error("generic method {0} is not supported")]
    GenericMethod(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Specificity {
    MoreSpecific,
    LessSpecific,
    Same,
    Incomparable,
}

pub fn is_applicable(
    loader: &dyn ClassLoader,
    params: &[Type],
    args: &[Type],
    phase: InvocationPhase,
) -> bool {
    params.len() == args.len()
        && params.iter().zip(args).all(|(param, arg)| match phase {
            InvocationPhase::Strict => is_assignable(loader, arg, param),
            InvocationPhase::Loose => is_assignable_loose(loader, arg, param),
        })
}

/// `a` is more specific than `b` when every parameter of `a` is assignable to the
/// corresponding parameter of `b`.
pub fn compare_specificity(loader: &dyn ClassLoader, a: &[Type], b: &[Type]) -> Specificity {
    let covers = |x: &[Type], y: &[Type]| {
        x.len() == y.len() && x.iter().zip(y).all(|(p, q)| is_assignable(loader, p, q))
    };
    match (covers(a, b), covers(b, a)) {
        (true, true) => Specificity::Same,
        (true, false) => Specificity::MoreSpecific,
        (false, true) => Specificity::LessSpecific,
        (false, false) => Specificity::Incomparable,
    }
}

/// Pick the single most specific applicable candidate for `args`.
///
/// Candidates with the wrong arity are ignored. If a candidate with the right arity is
/// generic the call is rejected outright instead of inferring its type arguments.
pub fn select_method(
    loader: &dyn ClassLoader,
    name: &str,
    candidates: Vec<MethodCandidate>,
    args: &[Type],
) -> Result<MethodCandidate, OverloadError> {
    let by_arity: Vec<MethodCandidate> = candidates
        .into_iter()
        .filter(|candidate| candidate.params.len() == args.len())
        .collect();
    if let Some(generic) = by_arity.iter().find(|c| c.method.is_generic()) {
        return Err(OverloadError::GenericMethod(generic.signature()));
    }

    for phase in [InvocationPhase::Strict, InvocationPhase::Loose] {
        let applicable: Vec<&MethodCandidate> = by_arity
            .iter()
            .filter(|candidate| is_applicable(loader, &candidate.params, args, phase))
            .collect();
        if !applicable.is_empty() {
            return most_specific(loader, name, applicable);
        }
    }

    Err(OverloadError::NoApplicable {
        name: name.to_owned(),
        args: args
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(","),
    })
}

fn most_specific(
    loader: &dyn ClassLoader,
    name: &str,
    applicable: Vec<&MethodCandidate>,
) -> Result<MethodCandidate, OverloadError> {
    let maximal: Vec<&MethodCandidate> = applicable
        .iter()
        .filter(|candidate| {
            !applicable.iter().any(|other| {
                compare_specificity(loader, &other.params, &candidate.params)
                    == Specificity::MoreSpecific
            })
        })
        .copied()
        .collect();

    match maximal.as_slice() {
        [] => Err(OverloadError::NoApplicable {
            name: name.to_owned(),
            args: String::new(),
        }),
        [only] => Ok((*only).clone()),
        [first, rest @ ..]
            if rest.iter().all(|other| {
                compare_specificity(loader, &first.params, &other.params) == Specificity::Same
            }) =>
        {
            Ok((*first).clone())
        }
        _ => Err(OverloadError::Ambiguous {
            name: name.to_owned(),
            candidates: maximal.iter().map(|c| c.signature()).collect(),
        }),
    }
}
