//! # Inference Errors
//!
//! Two tiers of failure come out of an inference pass:
//!
//! - [`EngineError`]: the input uses something the rule table cannot handle,
//!   such as a name that was never declared or a leaf node kind without a
//!   rule. The pass stops and the error is returned.
//! - [`TypeDiagnostic`]: a genuine mismatch in the user's program. These are
//!   never raised; they are recorded as `Err` types in the node cache and
//!   collected afterwards by [`crate::types::Inference::type_errors`].

use lachs::Span;
use thiserror::Error;

use crate::ast::{NodeId, NodeKind};

use super::ty::{Type, TypeKind};

#[derive(Debug, Clone, Error)]
pub enum EngineError {
    /// An identifier whose name is in no enclosing scope.
    #[error("identifier '{name}' is not defined")]
    UnboundIdentifier { name: String, position: Span },

    /// A node kind that has neither an inference rule nor children to recurse
    /// into.
    #[error("no inference rule for {kind} nodes")]
    NoRule { kind: NodeKind, position: Span },
}

impl EngineError {
    pub fn position(&self) -> &Span {
        match self {
            EngineError::UnboundIdentifier { position, .. } => position,
            EngineError::NoRule { position, .. } => position,
        }
    }

    /// The message with source context, when the span carries any.
    pub fn report(&self) -> String {
        render(&self.to_string(), self.position())
    }
}

/// A node whose inferred type came out as an error.
#[derive(Debug, Clone)]
pub struct TypeDiagnostic {
    pub node: NodeId,
    pub kind: NodeKind,
    pub position: Span,
    pub ty: Type,
}

impl TypeDiagnostic {
    /// The innermost error value; an error can wrap another one.
    pub fn cause(&self) -> &Type {
        let mut ty = &self.ty;
        while let TypeKind::Err { expected, actual } = &ty.kind {
            if expected.is_err() {
                ty = expected.as_ref();
            } else if actual.is_err() {
                ty = actual.as_ref();
            } else {
                break;
            }
        }
        ty
    }

    pub fn message(&self) -> String {
        format!("type error in {}: {}", self.kind, self.cause())
    }

    pub fn report(&self) -> String {
        render(&self.message(), &self.position)
    }
}

impl std::fmt::Display for TypeDiagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message())
    }
}

fn render(message: &str, position: &Span) -> String {
    if position.source.is_empty() {
        message.to_string()
    } else {
        position.to_string(message)
    }
}
