//! Least upper bound of reference types (JLS 15.12.2.7) and greatest lower bound
//! (JLS 5.1.10).
//!
//! `lub` is computed from the minimal erased candidate set (MEC): the most derived
//! raw classes every input shares. Each candidate is then re-parameterized with the
//! least containing invocation (`lci`) of the inputs' views of it, which in turn needs
//! the least containing type argument (`lcta`) and may recurse into `lub`.
//!
//! Self-referential bounds such as `Enum<E extends Enum<E>>` make that recursion
//! unbounded. [`LubContext`] keeps the invocation sets currently being combined on a
//! stack; meeting the same set again yields `?` for every type argument instead of a
//! recursively defined type.

use std::collections::HashMap;
use std::rc::Rc;

use indexmap::IndexSet;

use crate::java::helpers::instantiate_as_supertype;
use crate::java::subtyping::is_subtype;
use crate::{ClassLoader, ClassType, Type, TypeError, WildcardType};

pub struct LubContext<'a> {
    loader: &'a dyn ClassLoader,
    erased: HashMap<String, Rc<IndexSet<String>>>,
    stack: Vec<Vec<ClassType>>,
    max_depth: usize,
}

impl<'a> LubContext<'a> {
    pub const DEFAULT_MAX_DEPTH: usize = 32;

    pub fn new(loader: &'a dyn ClassLoader) -> Self {
        Self {
            loader,
            erased: HashMap::new(),
            stack: Vec::new(),
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }

    /// Cap on nested `lci` frames; reaching it behaves like meeting a repeated set.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth.max(1);
        self
    }

    /// `lub(types)` as a wildcard `? extends C1 & ... & Cn`, one bound per MEC member.
    pub fn lub(&mut self, types: &[ClassType]) -> Result<Type, TypeError> {
        let inputs: Vec<Vec<ClassType>> = types.iter().map(|ty| vec![ty.clone()]).collect();
        let bounds = self.lub_bounds(&inputs)?;
        Ok(Type::Wildcard(WildcardType {
            upper: bounds.into_iter().map(Type::Class).collect(),
            lower: Vec::new(),
        }))
    }

    /// Each input is an intersection of class types.
    fn lub_bounds(&mut self, inputs: &[Vec<ClassType>]) -> Result<Vec<ClassType>, TypeError> {
        let mec = self.minimal_erased_candidates(inputs);
        let mut out = Vec::with_capacity(mec.len());
        for candidate in &mec {
            let invocations = self.relevant_invocations(candidate, inputs);
            out.push(self.lci(candidate, &invocations)?);
        }
        Ok(out)
    }

    /// Every raw supertype of `name`, itself included. Memoized by name.
    pub fn erased_supertypes(&mut self, name: &str) -> Rc<IndexSet<String>> {
        if let Some(hit) = self.erased.get(name) {
            return hit.clone();
        }
        // Placeholder so a cyclic hierarchy terminates.
        self.erased
            .insert(name.to_owned(), Rc::new(IndexSet::from([name.to_owned()])));

        let mut set = IndexSet::from([name.to_owned()]);
        let direct: Vec<String> = match self.loader.class(name) {
            Some(def) => {
                let mut direct: Vec<String> = def
                    .super_class
                    .iter()
                    .chain(&def.interfaces)
                    .filter_map(Type::as_class)
                    .map(|class| class.name.clone())
                    .collect();
                if def.is_interface() {
                    direct.push(crate::OBJECT.to_owned());
                }
                direct
            }
            None => Vec::new(),
        };
        for super_name in direct {
            let supers = self.erased_supertypes(&super_name);
            set.extend(supers.iter().cloned());
        }

        let set = Rc::new(set);
        self.erased.insert(name.to_owned(), set.clone());
        set
    }

    fn minimal_erased_candidates(&mut self, inputs: &[Vec<ClassType>]) -> Vec<String> {
        let mut common: Option<IndexSet<String>> = None;
        for input in inputs {
            let mut closure = IndexSet::new();
            for component in input {
                closure.extend(self.erased_supertypes(&component.name).iter().cloned());
            }
            common = Some(match common {
                None => closure,
                Some(prev) => prev.into_iter().filter(|n| closure.contains(n)).collect(),
            });
        }

        let names: Vec<String> = common.unwrap_or_default().into_iter().collect();
        let closures: Vec<Rc<IndexSet<String>>> =
            names.iter().map(|n| self.erased_supertypes(n)).collect();
        names
            .iter()
            .filter(|candidate| {
                !names
                    .iter()
                    .zip(&closures)
                    .any(|(other, closure)| other != *candidate && closure.contains(*candidate))
            })
            .cloned()
            .collect()
    }

    fn relevant_invocations(&self, candidate: &str, inputs: &[Vec<ClassType>]) -> Vec<ClassType> {
        inputs
            .iter()
            .flatten()
            .filter_map(|component| instantiate_as_supertype(self.loader, component, candidate))
            .collect()
    }

    fn lci(&mut self, candidate: &str, invocations: &[ClassType]) -> Result<ClassType, TypeError> {
        let Some((first, rest)) = invocations.split_first() else {
            return Ok(ClassType::raw(candidate));
        };

        let repeated = self.stack.iter().any(|seen| seen.as_slice() == invocations);
        let break_recursion = repeated || self.stack.len() >= self.max_depth;
        if break_recursion {
            tracing::trace!(
                target: "codepad.types",
                candidate,
                depth = self.stack.len(),
                "lub recursion guard hit"
            );
        }

        self.stack.push(invocations.to_vec());
        let mut result = Ok(first.clone());
        for next in rest {
            result = match result {
                Ok(acc) => self.lci_pair(&acc, next, break_recursion),
                err => err,
            };
        }
        self.stack.pop();
        result
    }

    fn lci_pair(
        &mut self,
        a: &ClassType,
        b: &ClassType,
        break_recursion: bool,
    ) -> Result<ClassType, TypeError> {
        let generic = self
            .loader
            .class(&a.name)
            .is_some_and(|def| !def.type_params.is_empty());
        if a.args.is_empty() && generic {
            return Ok(a.clone());
        }
        if b.args.is_empty() && generic {
            return Ok(b.clone());
        }
        if a.args.len() != b.args.len() {
            return Ok(a.erasure());
        }

        let outer = match (&a.outer, &b.outer) {
            (Some(oa), Some(ob)) => Some(Box::new(self.lci_pair(oa, ob, break_recursion)?)),
            _ => None,
        };

        let mut args = Vec::with_capacity(a.args.len());
        for (x, y) in a.args.iter().zip(&b.args) {
            args.push(if break_recursion {
                Type::unbounded()
            } else {
                self.lcta(x, y)?
            });
        }
        Ok(ClassType {
            name: a.name.clone(),
            args,
            outer,
        })
    }

    fn lcta(&mut self, a: &Type, b: &Type) -> Result<Type, TypeError> {
        if a == b {
            return Ok(a.clone());
        }
        match (a, b) {
            (Type::Wildcard(wa), Type::Wildcard(wb)) => match (wa.is_super(), wb.is_super()) {
                (true, true) => {
                    let lower: Vec<Type> = wa.lower.iter().chain(&wb.lower).cloned().collect();
                    self.super_of_glb(&lower)
                }
                (true, false) | (false, true) => Ok(Type::unbounded()),
                (false, false) if wa.is_unbounded() || wb.is_unbounded() => Ok(Type::unbounded()),
                (false, false) => self.extends_lub(&wa.upper, &wb.upper),
            },
            (solid, Type::Wildcard(w)) | (Type::Wildcard(w), solid) => {
                if w.is_super() {
                    let mut lower = w.lower.clone();
                    lower.push(solid.clone());
                    self.super_of_glb(&lower)
                } else if w.is_unbounded() {
                    Ok(Type::unbounded())
                } else {
                    self.extends_lub(std::slice::from_ref(solid), &w.upper)
                }
            }
            (a, b) => self.extends_lub(std::slice::from_ref(a), std::slice::from_ref(b)),
        }
    }

    fn super_of_glb(&self, lower: &[Type]) -> Result<Type, TypeError> {
        Ok(Type::Wildcard(WildcardType {
            upper: Vec::new(),
            lower: glb(self.loader, lower)?,
        }))
    }

    /// `? extends lub(a, b)` where `a` and `b` are intersections; `?` when either
    /// side has a non-class component.
    fn extends_lub(&mut self, a: &[Type], b: &[Type]) -> Result<Type, TypeError> {
        let as_classes = |types: &[Type]| -> Option<Vec<ClassType>> {
            types.iter().map(|ty| ty.as_class().cloned()).collect()
        };
        let (Some(a), Some(b)) = (as_classes(a), as_classes(b)) else {
            return Ok(Type::unbounded());
        };
        let bounds = self.lub_bounds(&[a, b])?;
        if bounds.is_empty() {
            return Ok(Type::unbounded());
        }
        Ok(Type::Wildcard(WildcardType {
            upper: bounds.into_iter().map(Type::Class).collect(),
            lower: Vec::new(),
        }))
    }
}

/// Convenience wrapper around [`LubContext::lub`] with a fresh context.
pub fn lub(loader: &dyn ClassLoader, types: &[ClassType]) -> Result<Type, TypeError> {
    LubContext::new(loader).lub(types)
}

/// Greatest lower bound of a set of bounds.
///
/// Any two class (non-interface) bounds must be related by subtyping; otherwise the
/// bounds are incompatible. The result drops duplicates and bounds implied by a more
/// specific one.
pub fn glb(loader: &dyn ClassLoader, bounds: &[Type]) -> Result<Vec<Type>, TypeError> {
    for (idx, a) in bounds.iter().enumerate() {
        for b in &bounds[idx + 1..] {
            if is_class_bound(loader, a)
                && is_class_bound(loader, b)
                && !is_subtype(loader, a, b)
                && !is_subtype(loader, b, a)
            {
                return Err(TypeError::IncompatibleBounds(a.to_string(), b.to_string()));
            }
        }
    }

    let mut out: Vec<Type> = Vec::new();
    for (idx, a) in bounds.iter().enumerate() {
        if out.contains(a) {
            continue;
        }
        let implied = bounds
            .iter()
            .enumerate()
            .any(|(other_idx, b)| other_idx != idx && b != a && is_subtype(loader, b, a));
        if !implied {
            out.push(a.clone());
        }
    }
    Ok(out)
}

fn is_class_bound(loader: &dyn ClassLoader, ty: &Type) -> bool {
    match ty {
        Type::Class(class) => loader
            .class(&class.name)
            .is_some_and(|def| !def.is_interface()),
        _ => false,
    }
}
