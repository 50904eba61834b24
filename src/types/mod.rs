pub mod cache;
pub mod env;
pub mod error;
pub mod pretty;
pub mod subst;
pub mod traversal;
pub mod ty;
pub mod unify;
pub mod visitor;

pub use cache::Slot;
pub use env::{Context, Scheme};
pub use error::{EngineError, TypeDiagnostic};
pub use pretty::pretty;
pub use subst::Substitution;
pub use traversal::{Inference, Inferred, Traversal, infer};
pub use ty::{FreshIds, Type, TypeId, TypeKind};
pub use unify::unify;
pub use visitor::{Rule, RuleGroup, VisitorTable};
