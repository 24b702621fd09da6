//! Java-specific helpers for Nova's host type model.
//!
//! These mirror what a JVM reflection layer answers about a class (its generic superclass,
//! generic interfaces, erasure, class-level assignability) over the [`crate::TypeStore`] arena.

pub mod env;
pub mod format;
pub mod helpers;
pub mod jdk;
pub mod subtyping;
