//! Rendering of inferred types.
//!
//! Variables have no names of their own. Each call to [`pretty`] hands out
//! letters from a fresh pool, so the same variable prints the same way within
//! one rendering but may print differently in the next.

use std::collections::HashMap;

use super::ty::{Type, TypeId, TypeKind};

const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz";

/// Render `ty` in source-like notation: `int`, `(a, b) => b`,
/// `{ name: str, age: int }`, `err: expected str and got int`.
pub fn pretty(ty: &Type) -> String {
    Printer::default().print(ty)
}

#[derive(Default)]
struct Printer {
    letters: HashMap<TypeId, char>,
}

impl Printer {
    fn letter(&mut self, id: TypeId) -> char {
        let next = self.letters.len();
        *self
            .letters
            .entry(id)
            .or_insert_with(|| ALPHABET[next % ALPHABET.len()] as char)
    }

    fn print(&mut self, ty: &Type) -> String {
        match &ty.kind {
            TypeKind::Bool => "bool".to_string(),
            TypeKind::Int => "int".to_string(),
            TypeKind::Str => "str".to_string(),
            TypeKind::Void => "void".to_string(),
            TypeKind::Var => self.letter(ty.id).to_string(),
            TypeKind::Func { params, returns } => {
                let params = params
                    .iter()
                    .map(|param| self.print(param))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("({}) => {}", params, self.print(returns))
            }
            TypeKind::Obj { properties } if properties.is_empty() => "{}".to_string(),
            TypeKind::Obj { properties } => {
                let properties = properties
                    .iter()
                    .map(|(name, prop)| format!("{}: {}", name, self.print(prop)))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{{ {} }}", properties)
            }
            TypeKind::Err { expected, actual } => {
                format!(
                    "err: expected {} and got {}",
                    self.print(expected),
                    self.print(actual)
                )
            }
        }
    }
}

impl std::fmt::Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&pretty(self))
    }
}
