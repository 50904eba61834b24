//! # Traversal Driver
//!
//! Walks a syntax tree once, depth first, dispatching every node to its rule
//! in a [`VisitorTable`]. The driver owns everything that lives for exactly
//! one pass:
//!
//! - the [`FreshIds`] generator every rule draws type ids from
//! - the [`NodeCache`] holding each rule-visited node's result
//!
//! ## Back-patching
//!
//! Inference threads substitutions through the walk instead of solving one
//! global constraint set, so a node visited early may hold a type variable
//! that a later sibling or parent narrows. Whenever a rule returns, its
//! substitution is re-applied to every cached slot mentioning one of the ids
//! it binds:
//!
//! ```text
//! const i = f(1);
//!       ^ Identifier slot: 'v          (visited after the initializer)
//! VariableDeclarator returns ['v := int]
//!       ^ slot patched to int
//! ```
//!
//! ## Fallback
//!
//! Node kinds without a rule are handled structurally: their children are
//! visited in order with substitutions threaded through, and the last child's
//! type is the result. A leaf kind without a rule stops the pass with
//! [`EngineError::NoRule`].

use std::cmp::Reverse;

use log::{debug, trace};

use crate::ast::{Node, NodeId, Program};

use super::cache::{NodeCache, Slot};
use super::env::Context;
use super::error::{EngineError, TypeDiagnostic};
use super::subst::Substitution;
use super::ty::{FreshIds, Type, TypeId};
use super::visitor::VisitorTable;

/// What a rule hands back: the substitution discovered in the subtree and
/// the node's own type.
#[derive(Debug, Clone)]
pub struct Inferred {
    pub subst: Substitution,
    pub ty: Type,
}

impl Inferred {
    pub fn new(subst: Substitution, ty: Type) -> Self {
        Inferred { subst, ty }
    }
}

pub struct Traversal<'t> {
    table: &'t VisitorTable,
    ids: FreshIds,
    cache: NodeCache,
}

impl<'t> Traversal<'t> {
    pub fn new(table: &'t VisitorTable, ids: FreshIds) -> Self {
        Traversal {
            table,
            ids,
            cache: NodeCache::new(),
        }
    }

    pub fn fresh_id(&mut self) -> TypeId {
        self.ids.next_id()
    }

    pub fn fresh_var(&mut self) -> Type {
        Type::var(self.ids.next_id())
    }

    pub fn ids(&mut self) -> &mut FreshIds {
        &mut self.ids
    }

    pub fn cache(&self) -> &NodeCache {
        &self.cache
    }

    /// Infer `node` under `ctx`, recording and back-patching on the way out.
    pub fn visit(&mut self, node: Node<'_>, ctx: &Context) -> Result<Inferred, EngineError> {
        let kind = node.kind();
        let Some(rule) = self.table.rule(kind) else {
            return self.visit_children(node, ctx);
        };

        trace!("visit {kind} {}", node.id());
        let inferred = rule(self, node, ctx)?;

        self.cache.record(&node, &inferred.subst, &inferred.ty);
        let patched = self.cache.patch(&inferred.subst);
        if patched > 0 {
            trace!("{kind} {} back-patched {patched} cached results", node.id());
        }

        Ok(inferred)
    }

    fn visit_children(&mut self, node: Node<'_>, ctx: &Context) -> Result<Inferred, EngineError> {
        let kind = node.kind();
        if kind.is_leaf() {
            return Err(EngineError::NoRule {
                kind,
                position: node.position().clone(),
            });
        }

        let mut subst = Substitution::empty();
        let mut last = None;
        for child in node.children() {
            let inferred = self.visit(child, &ctx.apply(&subst))?;
            subst = inferred.subst.compose(&subst);
            last = Some(inferred.ty);
        }

        let ty = match last {
            Some(ty) => subst.apply(&ty),
            None => Type::void(self.fresh_id()),
        };
        Ok(Inferred::new(subst, ty))
    }

    /// Infer `root` and everything below it, consuming the driver.
    pub fn run(mut self, root: Node<'_>, ctx: &Context) -> Result<Inference, EngineError> {
        let inferred = self.visit(root, ctx)?;
        Ok(Inference {
            slots: self.cache.into_slots(),
            root: inferred,
            ids_issued: self.ids.issued(),
        })
    }
}

/// Infer a whole program with the standard rules, a fresh id space and an
/// empty context.
pub fn infer(program: &Program) -> Result<Inference, EngineError> {
    debug!("inferring program with {} statements", program.body.len());
    let traversal = Traversal::new(VisitorTable::standard(), FreshIds::new());
    let inference = traversal.run(Node::Program(program), &Context::empty())?;

    debug!(
        "inference finished: {} slots, {} type ids, {} type errors",
        inference.slots.len(),
        inference.ids_issued,
        inference.type_errors().len()
    );
    Ok(inference)
}

/// Everything one pass learned, in the order nodes finished.
#[derive(Debug, Clone)]
pub struct Inference {
    slots: Vec<Slot>,
    root: Inferred,
    ids_issued: usize,
}

impl Inference {
    /// Fold `reducer` over every cached slot in visitation order.
    pub fn fold<'s, C>(&'s self, initial: C, reducer: impl FnMut(C, &'s Slot) -> C) -> C {
        self.slots.iter().fold(initial, reducer)
    }

    pub fn entries(&self) -> &[Slot] {
        &self.slots
    }

    /// Result of the root node itself.
    pub fn root(&self) -> &Inferred {
        &self.root
    }

    pub fn ids_issued(&self) -> usize {
        self.ids_issued
    }

    pub fn slot(&self, node: NodeId) -> Option<&Slot> {
        self.slots.iter().find(|slot| slot.node == node)
    }

    /// Declared names with their types, in visitation order. Parameters count
    /// as declarations.
    pub fn bindings(&self) -> Vec<(&str, &Type)> {
        self.fold(Vec::new(), |mut acc, slot| {
            if let Some(name) = &slot.binding {
                acc.push((name.as_str(), &slot.ty));
            }
            acc
        })
    }

    /// Type of the last declaration of `name`.
    pub fn binding(&self, name: &str) -> Option<&Type> {
        self.bindings()
            .into_iter()
            .rev()
            .find(|(bound, _)| *bound == name)
            .map(|(_, ty)| ty)
    }

    /// Every node whose type ended up as an error.
    pub fn type_errors(&self) -> Vec<TypeDiagnostic> {
        self.fold(Vec::new(), |mut acc, slot| {
            if slot.ty.is_err() {
                acc.push(TypeDiagnostic {
                    node: slot.node,
                    kind: slot.kind,
                    position: slot.position.clone(),
                    ty: slot.ty.clone(),
                });
            }
            acc
        })
    }

    /// The innermost cached node whose span covers `(line, column)`.
    pub fn type_at(&self, line: usize, column: usize) -> Option<&Slot> {
        let point = (line, column);
        self.slots
            .iter()
            .filter(|slot| slot.position.start <= point && point <= slot.position.end)
            .min_by_key(|slot| (Reverse(slot.position.start), slot.position.end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::NodeKind;
    use crate::ast::statement::Statement;
    use crate::parse_source;

    #[test]
    fn test_empty_table_reaches_leaf_without_rule() {
        let program = parse_source("1;").unwrap();
        let table = VisitorTable::empty();
        let err = Traversal::new(&table, FreshIds::new())
            .run(Node::Program(&program), &Context::empty())
            .unwrap_err();

        assert!(matches!(
            err,
            EngineError::NoRule {
                kind: NodeKind::NumericLiteral,
                ..
            }
        ));
    }

    #[test]
    fn test_binding_slot_is_back_patched() {
        let program = parse_source("const n = 1;").unwrap();
        let inference = infer(&program).unwrap();

        assert!(inference.binding("n").unwrap().is_int());

        let Statement::Declaration(declaration) = &program.body[0] else {
            panic!("expected a declaration");
        };
        let name = &declaration.declarators[0].name;
        let slot = inference.slot(name.id).unwrap();
        assert_eq!(slot.binding.as_deref(), Some("n"));
        assert!(slot.ty.is_int());
    }

    #[test]
    fn test_structural_nodes_are_not_recorded() {
        let program = parse_source("1;").unwrap();
        let inference = infer(&program).unwrap();

        let kinds = inference.fold(Vec::new(), |mut acc, slot| {
            acc.push(slot.kind);
            acc
        });
        assert_eq!(kinds, vec![NodeKind::NumericLiteral, NodeKind::Program]);
    }

    #[test]
    fn test_fold_can_keep_references_into_the_slots() {
        let program = parse_source("const a = 1; const b = 'x';").unwrap();
        let inference = infer(&program).unwrap();

        let names: Vec<&str> = inference.fold(Vec::new(), |mut acc, slot| {
            if let Some(name) = &slot.binding {
                acc.push(name.as_str());
            }
            acc
        });
        assert_eq!(names, vec!["a", "b"]);

        let bound: Vec<&str> = inference.bindings().into_iter().map(|(name, _)| name).collect();
        assert_eq!(bound, names);
    }

    #[test]
    fn test_parameter_and_its_use_share_a_type_id() {
        let program = parse_source("const f = x => x;").unwrap();
        let inference = infer(&program).unwrap();

        let idents: Vec<_> = inference
            .entries()
            .iter()
            .filter(|slot| slot.kind == NodeKind::Identifier)
            .collect();
        assert_eq!(idents.len(), 3);
        assert_eq!(idents[0].binding.as_deref(), Some("x"));
        assert_eq!(idents[1].binding, None);
        assert_eq!(idents[0].ty.id, idents[1].ty.id);
    }

    #[test]
    fn test_root_result_is_void() {
        let program = parse_source("const a = true;").unwrap();
        let inference = infer(&program).unwrap();

        assert!(inference.root().ty.is_void());
        assert!(inference.type_errors().is_empty());
    }
}
