//! Navigable, resolvable generic types for Nova.
//!
//! A [`TypeNode`] wraps one raw [`nova_types::Type`] as reported at a declaration site (a field,
//! a parameter, a return type or a bare class) together with the context that binds its type
//! variables. From a node you can:
//! - resolve it to a concrete class ([`TypeNode::resolve`]),
//! - walk its superclass and interfaces, or view it as one of its supertypes
//!   ([`TypeNode::as_class`]),
//! - read generic arguments at any nesting depth ([`TypeNode::generic`], [`TypeNode::nested`]),
//! - check generic-aware assignability ([`TypeNode::is_assignable_from`]).
//!
//! Nodes are built by a [`TypeEngine`], which owns the host type model and a bounded structural
//! cache of resolved classes. Nothing here fails at navigation time: missing structure is the
//! empty node ([`TypeNode::none`]). The only errors come from building a [`ParameterDescriptor`]
//! for an unknown executable or an out-of-range index.

mod assignability;
mod cache;
pub mod config;
mod context;
mod engine;
mod error;
mod node;
mod parameter;
mod provider;
mod render;

pub use crate::cache::CacheStats;
pub use crate::config::{CacheConfig, ConfigError, EngineConfig};
pub use crate::context::VariableContext;
pub use crate::engine::TypeEngine;
pub use crate::error::{Result, TypeGraphError};
pub use crate::node::TypeNode;
pub use crate::parameter::{
    DeclaredNameDiscoverer, OptionalityProbe, ParameterDescriptor, ParameterNameDiscoverer,
    ParameterSite,
};
pub use crate::provider::{FixedTypeProvider, ParameterTypeProvider, TypeProvider, TypeSource};
