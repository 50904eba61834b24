use std::collections::{BTreeSet, HashMap};

use lachs::Span;

use crate::ast::{Node, NodeId, NodeKind};

use super::subst::Substitution;
use super::ty::{Type, TypeId};

/// Result a rule produced for one node, kept up to date as later
/// substitutions narrow the type.
#[derive(Debug, Clone)]
pub struct Slot {
    pub node: NodeId,
    pub kind: NodeKind,
    pub position: Span,
    /// Declared name, when the node is an identifier in binding position.
    pub binding: Option<String>,
    pub subst: Substitution,
    pub ty: Type,
}

/// Arena of slots for one pass, indexed by every type id a slot's type
/// carries. Back-patching overwrites slots in place.
#[derive(Debug, Default)]
pub struct NodeCache {
    slots: Vec<Slot>,
    by_type: HashMap<TypeId, BTreeSet<usize>>,
}

impl NodeCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn record(&mut self, node: &Node<'_>, subst: &Substitution, ty: &Type) -> usize {
        let index = self.slots.len();
        self.slots.push(Slot {
            node: node.id(),
            kind: node.kind(),
            position: node.position().clone(),
            binding: node.binding_name().map(str::to_string),
            subst: subst.clone(),
            ty: ty.clone(),
        });
        self.index(index);
        index
    }

    /// Re-apply `subst` to every slot whose type mentions an id it binds.
    /// Returns how many slots changed.
    pub fn patch(&mut self, subst: &Substitution) -> usize {
        let touched: BTreeSet<usize> = subst
            .ids()
            .filter_map(|id| self.by_type.get(&id))
            .flat_map(|slots| slots.iter().copied())
            .collect();

        let mut changed = 0;
        for index in touched {
            let narrowed = subst.apply(&self.slots[index].ty);
            if narrowed != self.slots[index].ty {
                self.slots[index].ty = narrowed;
                self.index(index);
                changed += 1;
            }
        }
        changed
    }

    fn index(&mut self, slot: usize) {
        for id in self.slots[slot].ty.ids() {
            self.by_type.entry(id).or_default().insert(slot);
        }
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn into_slots(self) -> Vec<Slot> {
        self.slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::expression::Ident;

    fn ident(value: &str, id: usize) -> Ident {
        Ident {
            value: value.to_string(),
            id: NodeId(id),
            position: Span {
                start: (0, 0),
                end: (0, 0),
                source: String::new(),
            },
        }
    }

    #[test]
    fn test_record_keeps_binding_name() {
        let x = ident("x", 1);
        let mut cache = NodeCache::new();
        cache.record(&Node::binding(&x), &Substitution::empty(), &Type::var(1));

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.slots()[0].binding.as_deref(), Some("x"));
        assert_eq!(cache.slots()[0].kind, NodeKind::Identifier);
    }

    #[test]
    fn test_patch_narrows_matching_slots_only() {
        let x = ident("x", 1);
        let y = ident("y", 2);
        let mut cache = NodeCache::new();
        cache.record(&Node::binding(&x), &Substitution::empty(), &Type::var(1));
        cache.record(&Node::binding(&y), &Substitution::empty(), &Type::var(2));

        let changed = cache.patch(&Substitution::singleton(1, Type::int(3)));
        assert_eq!(changed, 1);
        assert!(cache.slots()[0].ty.is_int());
        assert!(cache.slots()[1].ty.is_var());
    }

    #[test]
    fn test_patch_follows_nested_vars_and_new_ids() {
        let f = ident("f", 1);
        let mut cache = NodeCache::new();
        let ty = Type::func(10, vec![Type::var(11)], Type::var(11));
        cache.record(&Node::binding(&f), &Substitution::empty(), &ty);

        cache.patch(&Substitution::singleton(11, Type::var(12)));
        cache.patch(&Substitution::singleton(12, Type::str(13)));

        assert_eq!(
            cache.slots()[0].ty,
            Type::func(10, vec![Type::str(13)], Type::str(13))
        );
    }

    #[test]
    fn test_patch_with_error_on_concrete_id() {
        let s = ident("s", 1);
        let mut cache = NodeCache::new();
        cache.record(&Node::binding(&s), &Substitution::empty(), &Type::str(4));

        let err = Type::err(9, Type::str(4), Type::int(5));
        cache.patch(&Substitution::singleton(4, err.clone()));
        assert_eq!(cache.slots()[0].ty, err);
    }
}
