use super::subst::Substitution;
use super::ty::{FreshIds, Type, TypeKind};

/// Check if a type variable occurs within a type (occurs check).
///
/// Binding `'a := ('a) => int` would describe an infinite type. The search is
/// structural: it walks function parameters, return types and object
/// properties.
///
/// ```text
/// occurs_in('a, int)          = false
/// occurs_in('a, ('a) => int)  = true
/// occurs_in('a, { k: 'a })    = true
/// occurs_in('a, ('b) => 'c)   = false
/// ```
fn occurs_in(var: &Type, ty: &Type) -> bool {
    ty.free_vars().contains(&var.id)
}

/// Unify two types, finding a substitution that makes them equal.
///
/// Unification never fails. A mismatch becomes data: the left-hand type's id
/// is bound to `Err(left, right)` and that error flows through every later
/// [`Substitution::apply`] like any resolved type, so inference carries on
/// around it.
///
/// # Rules
///
/// The rules are tried in order; the first that matches wins.
///
/// ```text
/// 0. Unify(t, t)                     = ∅       // same value
/// 1. Unify(int, int)                 = ∅       // likewise bool, str, void
/// 2. Unify((a1..an) => r, (b1..bn) => s):
///      S  = Unify(a1, b1)
///      S  = Unify(S(a2), S(b2)) ∘ S  ...       // left to right
///      S  = Unify(S(r), S(s)) ∘ S
/// 3. Unify('a, t) / Unify(t, 'a)     = ['a := t]
///      Unify('a, 'a)                 = ∅
///      'a occurs in t                = ['a := err]
/// 4. anything else                   = [left.id := err(left, right)]
/// ```
///
/// Functions of different arity fall through to rule 4, as does any
/// primitive/function or primitive/object pairing.
///
/// # Arguments
///
/// * `left` - The type on the left; its id keys any error binding
/// * `right` - The type on the right
/// * `ids` - Supplies the ids of error values created here
pub fn unify(left: &Type, right: &Type, ids: &mut FreshIds) -> Substitution {
    if left == right {
        return Substitution::empty();
    }

    match (&left.kind, &right.kind) {
        (TypeKind::Int, TypeKind::Int)
        | (TypeKind::Bool, TypeKind::Bool)
        | (TypeKind::Str, TypeKind::Str)
        | (TypeKind::Void, TypeKind::Void) => Substitution::empty(),

        (
            TypeKind::Func {
                params: left_params,
                returns: left_returns,
            },
            TypeKind::Func {
                params: right_params,
                returns: right_returns,
            },
        ) if left_params.len() == right_params.len() => {
            let mut subst = Substitution::empty();

            for (lp, rp) in left_params.iter().zip(right_params) {
                let next = unify(&subst.apply(lp), &subst.apply(rp), ids);
                subst = next.compose(&subst);
            }

            let returns = unify(
                &subst.apply(left_returns),
                &subst.apply(right_returns),
                ids,
            );
            returns.compose(&subst)
        }

        (TypeKind::Var, _) => bind(left, right, left, right, ids),
        (_, TypeKind::Var) => bind(right, left, left, right, ids),

        _ => mismatch(left, right, ids),
    }
}

/// Bind `var` to `ty`, refusing self-reference.
fn bind(var: &Type, ty: &Type, left: &Type, right: &Type, ids: &mut FreshIds) -> Substitution {
    if var.id == ty.id {
        Substitution::empty()
    } else if occurs_in(var, ty) {
        Substitution::singleton(var.id, Type::err(ids.next_id(), left.clone(), right.clone()))
    } else {
        Substitution::singleton(var.id, ty.clone())
    }
}

fn mismatch(left: &Type, right: &Type, ids: &mut FreshIds) -> Substitution {
    Substitution::singleton(
        left.id,
        Type::err(ids.next_id(), left.clone(), right.clone()),
    )
}
