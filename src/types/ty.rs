use std::collections::BTreeSet;

/// Identity of a type value. Unique within one inference pass; for variables it
/// doubles as the substitution key.
pub type TypeId = usize;

/// Hands out monotonically increasing type ids for a single pass.
#[derive(Debug, Clone, Default)]
pub struct FreshIds {
    next: TypeId,
}

impl FreshIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ids start at 1 so that a zeroed id never aliases a real type.
    pub fn next_id(&mut self) -> TypeId {
        self.next += 1;
        self.next
    }

    pub fn issued(&self) -> usize {
        self.next
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Type {
    pub id: TypeId,
    pub kind: TypeKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeKind {
    Bool,
    Int,
    Str,
    Void,
    Var,
    Func {
        params: Vec<Type>,
        returns: Box<Type>,
    },
    Obj {
        properties: Vec<(String, Type)>,
    },
    Err {
        expected: Box<Type>,
        actual: Box<Type>,
    },
}

impl Type {
    pub fn bool(id: TypeId) -> Self {
        Type {
            id,
            kind: TypeKind::Bool,
        }
    }

    pub fn int(id: TypeId) -> Self {
        Type {
            id,
            kind: TypeKind::Int,
        }
    }

    pub fn str(id: TypeId) -> Self {
        Type {
            id,
            kind: TypeKind::Str,
        }
    }

    pub fn void(id: TypeId) -> Self {
        Type {
            id,
            kind: TypeKind::Void,
        }
    }

    pub fn var(id: TypeId) -> Self {
        Type {
            id,
            kind: TypeKind::Var,
        }
    }

    pub fn func(id: TypeId, params: Vec<Type>, returns: Type) -> Self {
        Type {
            id,
            kind: TypeKind::Func {
                params,
                returns: Box::new(returns),
            },
        }
    }

    pub fn obj(id: TypeId, properties: Vec<(String, Type)>) -> Self {
        Type {
            id,
            kind: TypeKind::Obj { properties },
        }
    }

    pub fn err(id: TypeId, expected: Type, actual: Type) -> Self {
        Type {
            id,
            kind: TypeKind::Err {
                expected: Box::new(expected),
                actual: Box::new(actual),
            },
        }
    }

    pub fn is_bool(&self) -> bool {
        matches!(self.kind, TypeKind::Bool)
    }

    pub fn is_int(&self) -> bool {
        matches!(self.kind, TypeKind::Int)
    }

    pub fn is_str(&self) -> bool {
        matches!(self.kind, TypeKind::Str)
    }

    pub fn is_void(&self) -> bool {
        matches!(self.kind, TypeKind::Void)
    }

    pub fn is_var(&self) -> bool {
        matches!(self.kind, TypeKind::Var)
    }

    pub fn is_func(&self) -> bool {
        matches!(self.kind, TypeKind::Func { .. })
    }

    pub fn is_obj(&self) -> bool {
        matches!(self.kind, TypeKind::Obj { .. })
    }

    pub fn is_err(&self) -> bool {
        matches!(self.kind, TypeKind::Err { .. })
    }

    /// Variable ids reachable through function parameters, return types and
    /// object properties. Errors are opaque.
    pub fn free_vars(&self) -> BTreeSet<TypeId> {
        let mut vars = BTreeSet::new();
        self.collect_free_vars(&mut vars);
        vars
    }

    fn collect_free_vars(&self, vars: &mut BTreeSet<TypeId>) {
        match &self.kind {
            TypeKind::Var => {
                vars.insert(self.id);
            }
            TypeKind::Func { params, returns } => {
                for param in params {
                    param.collect_free_vars(vars);
                }
                returns.collect_free_vars(vars);
            }
            TypeKind::Obj { properties } => {
                for (_, ty) in properties {
                    ty.collect_free_vars(vars);
                }
            }
            TypeKind::Bool
            | TypeKind::Int
            | TypeKind::Str
            | TypeKind::Void
            | TypeKind::Err { .. } => {}
        }
    }

    /// Every id carried by this value or one of its components, the value's own
    /// id included.
    pub fn ids(&self) -> BTreeSet<TypeId> {
        let mut ids = BTreeSet::new();
        self.collect_ids(&mut ids);
        ids
    }

    fn collect_ids(&self, ids: &mut BTreeSet<TypeId>) {
        ids.insert(self.id);
        match &self.kind {
            TypeKind::Func { params, returns } => {
                for param in params {
                    param.collect_ids(ids);
                }
                returns.collect_ids(ids);
            }
            TypeKind::Obj { properties } => {
                for (_, ty) in properties {
                    ty.collect_ids(ids);
                }
            }
            TypeKind::Err { expected, actual } => {
                expected.collect_ids(ids);
                actual.collect_ids(ids);
            }
            _ => {}
        }
    }

    /// True if an error value appears anywhere inside this type.
    pub fn contains_err(&self) -> bool {
        match &self.kind {
            TypeKind::Err { .. } => true,
            TypeKind::Func { params, returns } => {
                params.iter().any(Type::contains_err) || returns.contains_err()
            }
            TypeKind::Obj { properties } => properties.iter().any(|(_, ty)| ty.contains_err()),
            _ => false,
        }
    }
}
