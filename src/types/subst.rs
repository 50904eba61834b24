use std::collections::HashMap;

use super::ty::{Type, TypeId, TypeKind};

/// Finite map from type id to the type it has been narrowed to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Substitution(pub HashMap<TypeId, Type>);

impl Substitution {
    pub fn empty() -> Self {
        Substitution(HashMap::new())
    }

    pub fn singleton(id: TypeId, ty: Type) -> Self {
        let mut map = HashMap::new();
        map.insert(id, ty);
        Substitution(map)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, id: TypeId) -> Option<&Type> {
        self.0.get(&id)
    }

    pub fn ids(&self) -> impl Iterator<Item = TypeId> + '_ {
        self.0.keys().copied()
    }

    /// Entries that bind an id to an error value.
    pub fn errors(&self) -> impl Iterator<Item = (TypeId, &Type)> + '_ {
        self.0
            .iter()
            .filter(|(_, ty)| ty.is_err())
            .map(|(id, ty)| (*id, ty))
    }

    /// Rewrite `ty` under this substitution.
    ///
    /// An id already bound to an error short-circuits to that error, whatever
    /// the variant of `ty`; a known inconsistency is never narrowed further.
    /// Composite types keep their own id and rebuild their components.
    pub fn apply(&self, ty: &Type) -> Type {
        if let Some(bound) = self.0.get(&ty.id).filter(|bound| bound.is_err()) {
            return bound.clone();
        }

        match &ty.kind {
            TypeKind::Var => self.0.get(&ty.id).cloned().unwrap_or_else(|| ty.clone()),
            TypeKind::Func { params, returns } => Type::func(
                ty.id,
                params.iter().map(|param| self.apply(param)).collect(),
                self.apply(returns),
            ),
            TypeKind::Obj { properties } => Type::obj(
                ty.id,
                properties
                    .iter()
                    .map(|(name, prop)| (name.clone(), self.apply(prop)))
                    .collect(),
            ),
            TypeKind::Bool
            | TypeKind::Int
            | TypeKind::Str
            | TypeKind::Void
            | TypeKind::Err { .. } => ty.clone(),
        }
    }

    /// `self.compose(other)` applies `other` first, then `self`: the result
    /// holds every binding of `self`, plus every binding of `other` rewritten
    /// under `self`. On a shared key the rewritten `other` binding wins.
    pub fn compose(&self, other: &Substitution) -> Substitution {
        let mut result = self.0.clone();

        for (id, ty) in &other.0 {
            result.insert(*id, self.apply(ty));
        }

        Substitution(result)
    }

    /// Drop the bindings of a scheme's own quantified ids so that applying the
    /// rest never captures them.
    pub fn delete_bound_vars(&self, ids: &[TypeId]) -> Substitution {
        Substitution(
            self.0
                .iter()
                .filter(|(id, _)| !ids.contains(id))
                .map(|(id, ty)| (*id, ty.clone()))
                .collect(),
        )
    }

    pub fn insert(&mut self, id: TypeId, ty: Type) {
        self.0.insert(id, ty);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_substitution() {
        let subst = Substitution::empty();
        let ty = Type::int(1);
        assert_eq!(subst.apply(&ty), ty);
    }

    #[test]
    fn test_singleton_substitution() {
        let subst = Substitution::singleton(1, Type::int(2));
        assert_eq!(subst.apply(&Type::var(1)), Type::int(2));
    }

    #[test]
    fn test_apply_to_function_keeps_outer_id() {
        let subst = Substitution::singleton(1, Type::int(2));
        let ty = Type::func(10, vec![Type::var(1)], Type::str(3));
        assert_eq!(
            subst.apply(&ty),
            Type::func(10, vec![Type::int(2)], Type::str(3))
        );
    }

    #[test]
    fn test_apply_to_object() {
        let subst = Substitution::singleton(1, Type::bool(2));
        let ty = Type::obj(10, vec![("flag".to_string(), Type::var(1))]);
        assert_eq!(
            subst.apply(&ty),
            Type::obj(10, vec![("flag".to_string(), Type::bool(2))])
        );
    }

    #[test]
    fn test_apply_preserves_unbound_vars() {
        let subst = Substitution::singleton(1, Type::int(2));
        assert_eq!(subst.apply(&Type::var(3)), Type::var(3));
    }

    #[test]
    fn test_error_binding_wins_over_any_variant() {
        let err = Type::err(9, Type::str(4), Type::int(5));
        let subst = Substitution::singleton(4, err.clone());

        assert_eq!(subst.apply(&Type::str(4)), err);
        let wrapped = Type::func(1, vec![Type::str(4)], Type::int(2));
        assert_eq!(subst.apply(&wrapped), Type::func(1, vec![err], Type::int(2)));
    }

    #[test]
    fn test_compose_applies_right_first() {
        let s1 = Substitution::singleton(2, Type::int(5));
        let s2 = Substitution::singleton(1, Type::var(2));

        let composed = s1.compose(&s2);
        assert_eq!(composed.apply(&Type::var(1)), Type::int(5));
        assert_eq!(composed.apply(&Type::var(2)), Type::int(5));
    }

    #[test]
    fn test_compose_shared_key_keeps_right_binding() {
        let s1 = Substitution::singleton(1, Type::int(2));
        let s2 = Substitution::singleton(1, Type::str(3));

        let composed = s1.compose(&s2);
        assert_eq!(composed.apply(&Type::var(1)), Type::str(3));
    }

    #[test]
    fn test_apply_idempotent_once_composed() {
        let s1 = Substitution::singleton(2, Type::bool(7));
        let s2 = Substitution::singleton(1, Type::func(8, vec![Type::var(2)], Type::var(2)));
        let subst = s1.compose(&s2);

        let ty = Type::func(9, vec![Type::var(1)], Type::var(2));
        let once = subst.apply(&ty);
        let twice = subst.apply(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_delete_bound_vars() {
        let mut subst = Substitution::singleton(1, Type::int(5));
        subst.insert(2, Type::str(6));

        let pruned = subst.delete_bound_vars(&[1]);
        assert!(pruned.get(1).is_none());
        assert_eq!(pruned.get(2), Some(&Type::str(6)));
    }

    #[test]
    fn test_errors_lists_only_error_bindings() {
        let mut subst = Substitution::singleton(1, Type::int(5));
        subst.insert(2, Type::err(6, Type::int(7), Type::str(8)));

        let errors: Vec<_> = subst.errors().map(|(id, _)| id).collect();
        assert_eq!(errors, vec![2]);
    }
}
