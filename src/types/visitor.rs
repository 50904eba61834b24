//! Inference rules, one per node kind.
//!
//! Every rule has the same shape: given the node and the context it appears
//! in, produce the substitution its subtree discovered together with the
//! node's type. Rules recurse through [`Traversal::visit`] and draw fresh
//! variables from the traversal, so all of them share one id space.
//!
//! Rules are registered per [`RuleGroup`]. A group expands to the concrete
//! node kinds it covers when the [`VisitorTable`] is built; kinds without a
//! rule fall back to structural recursion in the traversal.

use std::collections::HashSet;
use std::sync::OnceLock;

use crate::ast::expression::{BinOpKind, FunctionBody};
use crate::ast::statement::Statement;
use crate::ast::{IdentRole, Node, NodeKind};

use super::env::{Context, Scheme};
use super::error::EngineError;
use super::subst::Substitution;
use super::traversal::{Inferred, Traversal};
use super::ty::{FreshIds, Type, TypeKind};
use super::unify::unify;

pub type Rule = fn(&mut Traversal<'_>, Node<'_>, &Context) -> Result<Inferred, EngineError>;

/// A rule registration key: either a single node kind or a family of kinds
/// sharing one rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleGroup {
    /// Boolean, numeric and string literals
    Literal,
    /// Arrow functions and function declarations
    Function,
    /// Programs and block statements
    Block,
    Kind(NodeKind),
}

impl RuleGroup {
    pub fn kinds(self) -> Vec<NodeKind> {
        match self {
            RuleGroup::Literal => vec![
                NodeKind::BooleanLiteral,
                NodeKind::NumericLiteral,
                NodeKind::StringLiteral,
            ],
            RuleGroup::Function => vec![
                NodeKind::ArrowFunctionExpression,
                NodeKind::FunctionDeclaration,
            ],
            RuleGroup::Block => vec![NodeKind::Program, NodeKind::BlockStatement],
            RuleGroup::Kind(kind) => vec![kind],
        }
    }
}

/// Dispatch table from node kind to rule.
#[derive(Clone)]
pub struct VisitorTable {
    rules: [Option<Rule>; NodeKind::ALL.len()],
}

impl VisitorTable {
    pub fn empty() -> Self {
        VisitorTable {
            rules: [None; NodeKind::ALL.len()],
        }
    }

    pub fn from_groups(registrations: &[(RuleGroup, Rule)]) -> Self {
        let mut table = Self::empty();
        for (group, rule) in registrations {
            table.register(*group, *rule);
        }
        table
    }

    pub fn register(&mut self, group: RuleGroup, rule: Rule) {
        for kind in group.kinds() {
            self.rules[kind.index()] = Some(rule);
        }
    }

    pub fn rule(&self, kind: NodeKind) -> Option<Rule> {
        self.rules[kind.index()]
    }

    pub fn covers(&self, kind: NodeKind) -> bool {
        self.rule(kind).is_some()
    }

    /// The rule set for the supported language subset, built once.
    pub fn standard() -> &'static VisitorTable {
        static TABLE: OnceLock<VisitorTable> = OnceLock::new();
        TABLE.get_or_init(|| {
            VisitorTable::from_groups(&[
                (RuleGroup::Literal, infer_literal as Rule),
                (RuleGroup::Kind(NodeKind::Identifier), infer_identifier as Rule),
                (RuleGroup::Kind(NodeKind::CallExpression), infer_call as Rule),
                (RuleGroup::Function, infer_function as Rule),
                (RuleGroup::Block, infer_block as Rule),
                (RuleGroup::Kind(NodeKind::ObjectExpression), infer_object as Rule),
                (RuleGroup::Kind(NodeKind::ObjectProperty), infer_property as Rule),
                (RuleGroup::Kind(NodeKind::VariableDeclarator), infer_declarator as Rule),
                (RuleGroup::Kind(NodeKind::BinaryExpression), infer_binary as Rule),
                (RuleGroup::Kind(NodeKind::ReturnStatement), infer_return as Rule),
            ])
        })
    }
}

impl std::fmt::Debug for VisitorTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(NodeKind::ALL.iter().filter(|kind| self.covers(**kind)))
            .finish()
    }
}

/// A rule was dispatched on a node it does not understand.
fn misrouted(node: Node<'_>) -> EngineError {
    EngineError::NoRule {
        kind: node.kind(),
        position: node.position().clone(),
    }
}

fn infer_literal(
    traversal: &mut Traversal<'_>,
    node: Node<'_>,
    _ctx: &Context,
) -> Result<Inferred, EngineError> {
    let id = traversal.fresh_id();
    let ty = match node {
        Node::Boolean(_) => Type::bool(id),
        Node::Number(_) => Type::int(id),
        Node::String(_) => Type::str(id),
        _ => return Err(misrouted(node)),
    };
    Ok(Inferred::new(Substitution::empty(), ty))
}

fn infer_identifier(
    traversal: &mut Traversal<'_>,
    node: Node<'_>,
    ctx: &Context,
) -> Result<Inferred, EngineError> {
    let Node::Identifier(ident, _) = node else {
        return Err(misrouted(node));
    };

    let scheme = ctx
        .lookup(&ident.value)
        .ok_or_else(|| EngineError::UnboundIdentifier {
            name: ident.value.clone(),
            position: ident.position.clone(),
        })?;

    Ok(Inferred::new(
        Substitution::empty(),
        scheme.instantiate(traversal.ids()),
    ))
}

/// The callee is generalized and instantiated before it meets the call
/// shape, so each call site of a polymorphic binding gets its own copy.
fn infer_call(
    traversal: &mut Traversal<'_>,
    node: Node<'_>,
    ctx: &Context,
) -> Result<Inferred, EngineError> {
    let Node::Call(call) = node else {
        return Err(misrouted(node));
    };

    let result = traversal.fresh_var();

    let callee = traversal.visit(Node::expression(&call.callee), ctx)?;
    let ctx = ctx.apply(&callee.subst);
    let callee_ty = ctx.generalize(&callee.ty).instantiate(traversal.ids());

    let mut args_subst = Substitution::empty();
    let mut arg_types = Vec::with_capacity(call.args.len());
    for arg in &call.args {
        let inferred = traversal.visit(Node::expression(arg), &ctx.apply(&args_subst))?;
        args_subst = inferred.subst.compose(&args_subst);
        arg_types.push(inferred.ty);
    }

    let shape = Type::func(
        traversal.fresh_id(),
        arg_types.iter().map(|ty| args_subst.apply(ty)).collect(),
        result.clone(),
    );
    let unified = unify(&shape, &args_subst.apply(&callee_ty), traversal.ids());
    let subst = unified.compose(&args_subst.compose(&callee.subst));

    // a callee that cannot take this call makes the call itself the error
    let ty = match unified.get(shape.id) {
        Some(err) if err.is_err() => err.clone(),
        _ => subst.apply(&result),
    };

    Ok(Inferred::new(subst, ty))
}

fn infer_function(
    traversal: &mut Traversal<'_>,
    node: Node<'_>,
    ctx: &Context,
) -> Result<Inferred, EngineError> {
    let (Node::Arrow(function) | Node::FunctionDeclaration(function)) = node else {
        return Err(misrouted(node));
    };

    let mut scope = ctx.clone();
    for param in &function.params {
        scope = scope.extend(param.value.clone(), Scheme::monomorphic(traversal.fresh_var()));
    }

    let mut param_subst = Substitution::empty();
    let mut param_types = Vec::with_capacity(function.params.len());
    for param in &function.params {
        let inferred = traversal.visit(Node::binding(param), &scope.apply(&param_subst))?;
        param_subst = inferred.subst.compose(&param_subst);
        param_types.push(inferred.ty);
    }
    let scope = scope.apply(&param_subst);

    let (body, body_ty) = match &function.body {
        FunctionBody::Expression(_) => {
            let body = traversal.visit(Node::function_body(&function.body), &scope)?;
            let ty = body.ty.clone();
            (body, ty)
        }
        FunctionBody::Block(_) => {
            let returns = traversal.fresh_var();
            let scope = scope.with_returns(returns.clone());
            let body = traversal.visit(Node::function_body(&function.body), &scope)?;
            let ty = if function.returns_value() {
                body.subst.apply(&returns)
            } else {
                Type::void(traversal.fresh_id())
            };
            (body, ty)
        }
    };

    // parameters as seen before and after the body must agree
    let func_id = traversal.fresh_id();
    let before = Type::func(
        func_id,
        param_types.iter().map(|ty| param_subst.apply(ty)).collect(),
        body_ty.clone(),
    );
    let after = Type::func(
        func_id,
        param_types.iter().map(|ty| body.subst.apply(ty)).collect(),
        body_ty.clone(),
    );
    let check = unify(&before, &after, traversal.ids());

    let mut subst = check.compose(&body.subst.compose(&param_subst));
    let mut ty = subst.apply(&Type::func(func_id, param_types, body_ty));

    if let Some(name) = &function.name {
        let named = traversal.visit(Node::binding(name), &ctx.apply(&subst))?;
        let bound = unify(&named.ty, &ty, traversal.ids());
        subst = bound.compose(&named.subst.compose(&subst));
        ty = bound.apply(&ty);
    }

    Ok(Inferred::new(subst, ty))
}

/// Declared names are bound to fresh variables up front so statements may
/// refer forward. Once a declaration has been inferred its names are
/// generalized for the rest of the block. A name declared again by a later
/// statement is rebound, so the last declaration wins.
fn infer_block(
    traversal: &mut Traversal<'_>,
    node: Node<'_>,
    ctx: &Context,
) -> Result<Inferred, EngineError> {
    let statements = match node {
        Node::Program(program) => &program.body,
        Node::Block(block) => &block.body,
        _ => return Err(misrouted(node)),
    };

    let mut scope = ctx.clone();
    for name in statements.iter().flat_map(Statement::declared_names) {
        scope = scope.extend(name.value.clone(), Scheme::monomorphic(traversal.fresh_var()));
    }

    let mut declared = HashSet::new();
    let mut subst = Substitution::empty();
    for statement in statements {
        // a redeclaration starts over instead of agreeing with the earlier one
        let redeclared: Vec<(String, Scheme)> = statement
            .declared_names()
            .into_iter()
            .filter(|name| declared.contains(name.value.as_str()))
            .map(|name| {
                let fresh = Scheme::monomorphic(traversal.fresh_var());
                (name.value.clone(), fresh)
            })
            .collect();
        if !redeclared.is_empty() {
            scope = scope.extend_many(redeclared);
        }

        let inferred = traversal.visit(Node::statement(statement), &scope.apply(&subst))?;
        subst = inferred.subst.compose(&subst);

        for name in statement.declared_names() {
            declared.insert(name.value.as_str());
            let current = scope.apply(&subst);
            if let Some(scheme) = current.lookup(&name.value) {
                let generalized = current.without(&name.value).generalize(&scheme.ty);
                scope = scope.extend(name.value.clone(), generalized);
            }
        }
    }

    Ok(Inferred::new(subst, Type::void(traversal.fresh_id())))
}

fn infer_object(
    traversal: &mut Traversal<'_>,
    node: Node<'_>,
    ctx: &Context,
) -> Result<Inferred, EngineError> {
    let Node::Object(object) = node else {
        return Err(misrouted(node));
    };

    let mut subst = Substitution::empty();
    let mut properties = Vec::with_capacity(object.properties.len());
    for property in &object.properties {
        let inferred = traversal.visit(Node::Property(property), &ctx.apply(&subst))?;
        subst = inferred.subst.compose(&subst);
        if let TypeKind::Obj { properties: entry } = inferred.ty.kind {
            properties.extend(entry);
        }
    }

    let properties = properties
        .into_iter()
        .map(|(name, ty)| (name, subst.apply(&ty)))
        .collect();

    Ok(Inferred::new(subst, Type::obj(traversal.fresh_id(), properties)))
}

/// The key is treated as a fresh local binding that must agree with the
/// value; the result is a single-property object.
fn infer_property(
    traversal: &mut Traversal<'_>,
    node: Node<'_>,
    ctx: &Context,
) -> Result<Inferred, EngineError> {
    let Node::Property(property) = node else {
        return Err(misrouted(node));
    };

    let value = traversal.visit(Node::expression(&property.value), ctx)?;

    let scope = ctx
        .extend(
            property.key.value.clone(),
            Scheme::monomorphic(traversal.fresh_var()),
        )
        .apply(&value.subst);
    let key = traversal.visit(Node::Identifier(&property.key, IdentRole::Key), &scope)?;

    let unified = unify(&key.subst.apply(&key.ty), &value.ty, traversal.ids());
    let subst = unified.compose(&key.subst.compose(&value.subst));

    let ty = Type::obj(
        traversal.fresh_id(),
        vec![(property.key.value.clone(), unified.apply(&key.ty))],
    );
    Ok(Inferred::new(subst, ty))
}

fn infer_declarator(
    traversal: &mut Traversal<'_>,
    node: Node<'_>,
    ctx: &Context,
) -> Result<Inferred, EngineError> {
    let Node::VariableDeclarator(declarator) = node else {
        return Err(misrouted(node));
    };

    let init = match &declarator.init {
        Some(init) => traversal.visit(Node::expression(init), ctx)?,
        None => Inferred::new(Substitution::empty(), traversal.fresh_var()),
    };

    let name = traversal.visit(Node::binding(&declarator.name), &ctx.apply(&init.subst))?;

    let unified = unify(&name.subst.apply(&name.ty), &init.ty, traversal.ids());
    let subst = unified.compose(&name.subst.compose(&init.subst));

    Ok(Inferred::new(subst, Type::void(traversal.fresh_id())))
}

fn infer_binary(
    traversal: &mut Traversal<'_>,
    node: Node<'_>,
    ctx: &Context,
) -> Result<Inferred, EngineError> {
    let Node::Binary(binary) = node else {
        return Err(misrouted(node));
    };

    let left = traversal.visit(Node::expression(&binary.left), ctx)?;
    let right = traversal.visit(Node::expression(&binary.right), &ctx.apply(&left.subst))?;
    let subst = right.subst.compose(&left.subst);

    let result = traversal.fresh_var();
    let shape = Type::func(
        traversal.fresh_id(),
        vec![subst.apply(&left.ty), subst.apply(&right.ty)],
        result.clone(),
    );
    let signature = operator_signature(binary.op, traversal.ids());
    let unified = unify(&shape, &signature, traversal.ids());
    let subst = unified.compose(&subst);

    let ty = subst.apply(&result);
    Ok(Inferred::new(subst, ty))
}

/// Operand and result types of a binary operator, as a function type.
///
/// ```text
/// + - * /          (int, int) => int
/// < > <= >=        (int, int) => bool
/// == != === !==    (a, a) => bool
/// && ||            (bool, bool) => bool
/// ```
pub fn operator_signature(op: BinOpKind, ids: &mut FreshIds) -> Type {
    let (left, right, result) = match op {
        BinOpKind::Add | BinOpKind::Sub | BinOpKind::Mul | BinOpKind::Div => (
            Type::int(ids.next_id()),
            Type::int(ids.next_id()),
            Type::int(ids.next_id()),
        ),
        BinOpKind::Lt | BinOpKind::Gt | BinOpKind::LtEq | BinOpKind::GtEq => (
            Type::int(ids.next_id()),
            Type::int(ids.next_id()),
            Type::bool(ids.next_id()),
        ),
        BinOpKind::Eq | BinOpKind::NotEq | BinOpKind::StrictEq | BinOpKind::StrictNotEq => {
            let operand = Type::var(ids.next_id());
            (operand.clone(), operand, Type::bool(ids.next_id()))
        }
        BinOpKind::And | BinOpKind::Or => (
            Type::bool(ids.next_id()),
            Type::bool(ids.next_id()),
            Type::bool(ids.next_id()),
        ),
    };
    Type::func(ids.next_id(), vec![left, right], result)
}

fn infer_return(
    traversal: &mut Traversal<'_>,
    node: Node<'_>,
    ctx: &Context,
) -> Result<Inferred, EngineError> {
    let Node::Return(ret) = node else {
        return Err(misrouted(node));
    };

    let argument = match &ret.argument {
        Some(argument) => traversal.visit(Node::expression(argument), ctx)?,
        None => Inferred::new(Substitution::empty(), Type::void(traversal.fresh_id())),
    };

    // outside a function body there is nothing to agree with
    let subst = match ctx.returns() {
        Some(returns) => {
            let expected = argument.subst.apply(returns);
            let unified = unify(&argument.ty, &expected, traversal.ids());
            unified.compose(&argument.subst)
        }
        None => argument.subst,
    };

    Ok(Inferred::new(subst, Type::void(traversal.fresh_id())))
}
