use std::collections::{BTreeSet, HashMap};

use super::subst::Substitution;
use super::ty::{FreshIds, Type, TypeId};

/// A possibly polymorphic binding: `vars` are the quantified ids of `ty`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scheme {
    pub vars: Vec<TypeId>,
    pub ty: Type,
}

impl Scheme {
    pub fn monomorphic(ty: Type) -> Self {
        Scheme {
            vars: Vec::new(),
            ty,
        }
    }

    pub fn polymorphic(vars: Vec<TypeId>, ty: Type) -> Self {
        Scheme { vars, ty }
    }

    pub fn free_vars(&self) -> BTreeSet<TypeId> {
        self.ty
            .free_vars()
            .into_iter()
            .filter(|id| !self.vars.contains(id))
            .collect()
    }

    /// Quantified ids are shielded from the substitution.
    pub fn apply(&self, subst: &Substitution) -> Scheme {
        Scheme {
            vars: self.vars.clone(),
            ty: subst.delete_bound_vars(&self.vars).apply(&self.ty),
        }
    }

    /// A fresh monomorphic copy: every quantified id is replaced by a new
    /// variable.
    pub fn instantiate(&self, ids: &mut FreshIds) -> Type {
        if self.vars.is_empty() {
            return self.ty.clone();
        }

        let mut subst = Substitution::empty();
        for var in &self.vars {
            subst.insert(*var, Type::var(ids.next_id()));
        }
        subst.apply(&self.ty)
    }
}

/// Names in scope during one inference pass, plus the return slot of the
/// innermost enclosing function body.
///
/// Contexts are values: extending one yields a new context and leaves the
/// original untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Context {
    bindings: HashMap<String, Scheme>,
    returns: Option<Type>,
}

impl Context {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_bindings(bindings: Vec<(String, Scheme)>) -> Self {
        Context {
            bindings: bindings.into_iter().collect(),
            returns: None,
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&Scheme> {
        self.bindings.get(name)
    }

    pub fn extend(&self, name: impl Into<String>, scheme: Scheme) -> Context {
        let mut bindings = self.bindings.clone();
        bindings.insert(name.into(), scheme);
        Context {
            bindings,
            returns: self.returns.clone(),
        }
    }

    pub fn extend_many(&self, entries: Vec<(String, Scheme)>) -> Context {
        let mut bindings = self.bindings.clone();
        bindings.extend(entries);
        Context {
            bindings,
            returns: self.returns.clone(),
        }
    }

    /// The same bindings minus `name`.
    pub fn without(&self, name: &str) -> Context {
        let mut bindings = self.bindings.clone();
        bindings.remove(name);
        Context {
            bindings,
            returns: self.returns.clone(),
        }
    }

    pub fn returns(&self) -> Option<&Type> {
        self.returns.as_ref()
    }

    pub fn with_returns(&self, ty: Type) -> Context {
        Context {
            bindings: self.bindings.clone(),
            returns: Some(ty),
        }
    }

    pub fn free_vars(&self) -> BTreeSet<TypeId> {
        let mut free: BTreeSet<TypeId> = self
            .bindings
            .values()
            .flat_map(|scheme| scheme.free_vars())
            .collect();
        if let Some(returns) = &self.returns {
            free.extend(returns.free_vars());
        }
        free
    }

    pub fn apply(&self, subst: &Substitution) -> Context {
        if subst.is_empty() {
            return self.clone();
        }

        Context {
            bindings: self
                .bindings
                .iter()
                .map(|(name, scheme)| (name.clone(), scheme.apply(subst)))
                .collect(),
            returns: self.returns.as_ref().map(|ty| subst.apply(ty)),
        }
    }

    /// Quantify every free variable of `ty` that this context does not
    /// mention.
    pub fn generalize(&self, ty: &Type) -> Scheme {
        let bound_here = self.free_vars();
        let vars = ty
            .free_vars()
            .into_iter()
            .filter(|id| !bound_here.contains(id))
            .collect();
        Scheme::polymorphic(vars, ty.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_context() {
        let ctx = Context::empty();
        assert!(ctx.lookup("x").is_none());
    }

    #[test]
    fn test_extend_shadows_and_copies() {
        let ctx = Context::empty().extend("x", Scheme::monomorphic(Type::int(1)));
        let shadowed = ctx.extend("x", Scheme::monomorphic(Type::str(2)));

        assert!(ctx.lookup("x").is_some_and(|s| s.ty.is_int()));
        assert!(shadowed.lookup("x").is_some_and(|s| s.ty.is_str()));
    }

    #[test]
    fn test_without_removes_binding() {
        let ctx = Context::with_bindings(vec![
            ("x".to_string(), Scheme::monomorphic(Type::int(1))),
            ("y".to_string(), Scheme::monomorphic(Type::int(2))),
        ]);
        let ctx = ctx.without("x");
        assert!(ctx.lookup("x").is_none());
        assert!(ctx.lookup("y").is_some());
    }

    #[test]
    fn test_free_vars_respect_quantifiers() {
        let ctx = Context::with_bindings(vec![
            ("mono".to_string(), Scheme::monomorphic(Type::var(1))),
            (
                "poly".to_string(),
                Scheme::polymorphic(vec![2], Type::func(3, vec![Type::var(2)], Type::var(2))),
            ),
        ]);
        let free = ctx.free_vars();
        assert_eq!(free.into_iter().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn test_generalize_skips_context_vars() {
        let ctx = Context::empty().extend("y", Scheme::monomorphic(Type::var(1)));
        let ty = Type::func(3, vec![Type::var(1)], Type::var(2));

        let scheme = ctx.generalize(&ty);
        assert_eq!(scheme.vars, vec![2]);
    }

    #[test]
    fn test_instantiate_renames_bound_vars() {
        let mut ids = FreshIds::new();
        for _ in 0..10 {
            ids.next_id();
        }
        let scheme = Scheme::polymorphic(vec![1], Type::func(2, vec![Type::var(1)], Type::var(1)));

        let first = scheme.instantiate(&mut ids);
        let second = scheme.instantiate(&mut ids);
        assert_ne!(first, second);
        assert!(!first.free_vars().contains(&1));
        assert_eq!(first.free_vars().len(), 1);
    }

    #[test]
    fn test_instantiate_monomorphic_is_identity() {
        let mut ids = FreshIds::new();
        let scheme = Scheme::monomorphic(Type::var(4));
        assert_eq!(scheme.instantiate(&mut ids), Type::var(4));
        assert_eq!(ids.issued(), 0);
    }

    #[test]
    fn test_apply_does_not_touch_quantified_ids() {
        let scheme = Scheme::polymorphic(vec![1], Type::func(2, vec![Type::var(1)], Type::var(3)));
        let mut subst = Substitution::singleton(1, Type::int(4));
        subst.insert(3, Type::str(5));

        let applied = scheme.apply(&subst);
        assert_eq!(
            applied.ty,
            Type::func(2, vec![Type::var(1)], Type::str(5))
        );
    }

    #[test]
    fn test_apply_reaches_return_slot() {
        let ctx = Context::empty().with_returns(Type::var(1));
        let ctx = ctx.apply(&Substitution::singleton(1, Type::bool(2)));
        assert!(ctx.returns().is_some_and(Type::is_bool));
    }
}
