//! Generic-aware assignability between two [`TypeNode`]s.
//!
//! Class compatibility is delegated to [`nova_types::is_assignable`]; this module adds array,
//! wildcard and type-variable handling on top and recurses into generic arguments. Nested
//! arguments must match exactly (`List<CharSequence>` does not accept `List<String>`) unless a
//! wildcard says otherwise.

use std::collections::HashMap;

use nova_types::{is_assignable, ClassRef, Type};

use crate::node::TypeNode;

/// Raw type pairs already assumed assignable on the current path. Breaks cycles through
/// self-referential generics.
type MatchedPairs = HashMap<Type, Type>;

impl TypeNode {
    /// Can a value of type `other` be assigned to this type?
    ///
    /// Never fails: the empty node is assignable from nothing and accepts nothing.
    pub fn is_assignable_from(&self, other: &TypeNode) -> bool {
        self.assignable_from(other, None)
    }

    /// Shorthand for [`TypeNode::is_assignable_from`] with a bare class on the right.
    pub fn is_assignable_from_class(&self, other: &ClassRef) -> bool {
        match self.engine() {
            Some(engine) => self.is_assignable_from(&engine.for_class(other.clone())),
            None => false,
        }
    }

    fn assignable_from(&self, other: &TypeNode, matched: Option<&mut MatchedPairs>) -> bool {
        let (Some(ours), Some(theirs)) = (&self.data, &other.data) else {
            return false;
        };

        match (self.is_array(), other.is_array()) {
            (true, true) => {
                return self
                    .component_type()
                    .is_assignable_from(&other.component_type())
            }
            (false, false) => {}
            _ => return false,
        }

        if matched
            .as_deref()
            .is_some_and(|matched| matched.get(&ours.ty) == Some(&theirs.ty))
        {
            tracing::trace!(
                target: "nova.typegraph",
                ty = ?ours.ty,
                "assignability cycle, assuming match"
            );
            return true;
        }

        let our_bounds = WildcardBounds::of(self);
        if let Some(their_bounds) = WildcardBounds::of(other) {
            // `? extends A` is only compared with `? extends B`, and likewise for `super`.
            return our_bounds.is_some_and(|ours| {
                ours.kind == their_bounds.kind && ours.accepts_all(&their_bounds.bounds)
            });
        }
        if let Some(our_bounds) = our_bounds {
            return our_bounds.accepts_all(std::slice::from_ref(other));
        }

        let engine = &ours.engine;
        let env = engine.env();
        let mut exact_match = matched.is_some();
        let mut check_generics = true;
        let mut our_resolved = None;
        if let Type::TypeVar(var) = &ours.ty {
            if let Some(bound) = ours
                .context
                .as_ref()
                .and_then(|context| context.resolve_variable(*var))
            {
                our_resolved = bound.resolve();
            }
            if our_resolved.is_none() {
                // Bound only through the other side: the classes still have to line up but the
                // binding's own generics are not ours to compare.
                if let Some(bound) = theirs
                    .context
                    .as_ref()
                    .and_then(|context| context.resolve_variable(*var))
                {
                    our_resolved = bound.resolve();
                    check_generics = false;
                }
            }
            if our_resolved.is_none() {
                exact_match = false;
            }
        }

        let object = ClassRef::Declared(env.well_known().object);
        let our_resolved = our_resolved.unwrap_or_else(|| self.resolve_or(object.clone()));
        let their_resolved = other.resolve_or(object);

        let compatible = if exact_match {
            our_resolved == their_resolved
        } else {
            is_assignable(env, &our_resolved, &their_resolved)
        };
        if !compatible {
            return false;
        }

        if check_generics {
            let our_generics = self.generics();
            let their_view = other.as_class(&our_resolved);
            let their_generics = their_view.generics();
            if our_generics.len() != their_generics.len() {
                return false;
            }

            let mut fresh = MatchedPairs::new();
            let matched = match matched {
                Some(matched) => matched,
                None => &mut fresh,
            };
            matched.insert(ours.ty.clone(), theirs.ty.clone());
            for (our_arg, their_arg) in our_generics.iter().zip(their_generics) {
                if !our_arg.assignable_from(their_arg, Some(&mut *matched)) {
                    return false;
                }
            }
        }

        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BoundKind {
    Upper,
    Lower,
}

/// The bounds of the wildcard a node is, or resolves to.
struct WildcardBounds {
    kind: BoundKind,
    bounds: Vec<TypeNode>,
}

impl WildcardBounds {
    fn of(node: &TypeNode) -> Option<Self> {
        let mut current = node.clone();
        let wildcard = loop {
            if let Type::Wildcard(wildcard) = current.ty()? {
                break wildcard.clone();
            }
            current = current.resolve_type();
        };

        let (kind, bounds) = if wildcard.lower_bounds.is_empty() {
            (BoundKind::Upper, &wildcard.upper_bounds)
        } else {
            (BoundKind::Lower, &wildcard.lower_bounds)
        };
        let engine = node.engine()?;
        let context = node.context();
        Some(Self {
            kind,
            bounds: bounds
                .iter()
                .map(|bound| engine.build(Some(bound.clone()), None, context.cloned()))
                .collect(),
        })
    }

    /// Every bound must accept every type: `bound <- ty` for upper bounds, `ty <- bound` for
    /// lower bounds.
    fn accepts_all(&self, types: &[TypeNode]) -> bool {
        self.bounds.iter().all(|bound| {
            types.iter().all(|ty| match self.kind {
                BoundKind::Upper => bound.is_assignable_from(ty),
                BoundKind::Lower => ty.is_assignable_from(bound),
            })
        })
    }
}
