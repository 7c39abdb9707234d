//! Java-specific typing rules: conversions, subtyping, supertype instantiation, lub/glb
//! and overload selection.

pub mod conversions;
pub mod helpers;
pub mod lub;
pub mod overload;
pub mod subtyping;
